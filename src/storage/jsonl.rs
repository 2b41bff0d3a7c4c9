//! JSONL storage for shipments
//!
//! Shipments are stored in `.freightflow/shipments.jsonl` with one JSON
//! object per line. Uses file locking for concurrent access safety and
//! the shipment revision marker for optimistic concurrency: a save with a
//! stale expected revision fails with [`StoreError::Conflict`] instead of
//! silently overwriting.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Shipment, ShipmentId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Shipment {0} not found")]
    NotFound(ShipmentId),

    #[error("Shipment {id} was modified concurrently: expected revision {expected}, found {actual}")]
    Conflict {
        id: ShipmentId,
        expected: u64,
        actual: u64,
    },

    #[error("Shipment {0} already exists")]
    AlreadyExists(ShipmentId),
}

/// Store for shipment data in JSONL format
pub struct ShipmentStore {
    path: PathBuf,
}

impl ShipmentStore {
    /// Creates a new shipment store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".freightflow").join("shipments.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all shipments from the store
    pub fn read_all(&self) -> Result<HashMap<ShipmentId, Shipment>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open shipment store: {}", self.path.display()))?;

        // Shared lock for reading, released on drop
        file.lock_shared()
            .context("Failed to acquire read lock on shipment store")?;

        let reader = BufReader::new(&file);
        let mut shipments = HashMap::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let shipment: Shipment = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse shipment at line {}", line_num + 1))?;

            shipments.insert(shipment.id.clone(), shipment);
        }

        Ok(shipments)
    }

    /// Loads a single shipment, or [`StoreError::NotFound`]
    pub fn load(&self, id: &ShipmentId) -> Result<Shipment> {
        let mut shipments = self.read_all()?;
        shipments
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()).into())
    }

    /// Inserts a shipment that must not exist yet
    pub fn create(&self, shipment: &Shipment) -> Result<()> {
        let mut shipments = self.read_all()?;

        if shipments.contains_key(&shipment.id) {
            return Err(StoreError::AlreadyExists(shipment.id.clone()).into());
        }

        debug!(id = %shipment.id, "creating shipment");
        shipments.insert(shipment.id.clone(), shipment.clone());
        self.write_all(&shipments)
    }

    /// Saves a shipment, checking the caller's expected revision against
    /// the stored one
    ///
    /// `expected_revision` is the revision the caller loaded before
    /// applying its engine operation. A mismatch means a concurrent write
    /// landed in between; the caller should reload and retry. An expected
    /// revision of 0 on an id not yet stored is the first write of a
    /// fresh aggregate and creates it.
    pub fn save(&self, shipment: &Shipment, expected_revision: u64) -> Result<()> {
        let mut shipments = self.read_all()?;

        match shipments.get(&shipment.id) {
            Some(stored) if stored.revision != expected_revision => {
                warn!(
                    id = %shipment.id,
                    expected = expected_revision,
                    actual = stored.revision,
                    "stale save rejected"
                );
                return Err(StoreError::Conflict {
                    id: shipment.id.clone(),
                    expected: expected_revision,
                    actual: stored.revision,
                }
                .into());
            }
            None if expected_revision != 0 => {
                return Err(StoreError::NotFound(shipment.id.clone()).into());
            }
            _ => {}
        }

        debug!(id = %shipment.id, revision = shipment.revision, "saving shipment");
        shipments.insert(shipment.id.clone(), shipment.clone());
        self.write_all(&shipments)
    }

    /// Removes a shipment by ID
    ///
    /// Audit entries referencing it are untouched; their retention is an
    /// external policy.
    pub fn remove(&self, id: &ShipmentId) -> Result<bool> {
        let mut shipments = self.read_all()?;
        let removed = shipments.remove(id).is_some();
        if removed {
            self.write_all(&shipments)?;
        }
        Ok(removed)
    }

    /// Writes all shipments to the store (full rewrite)
    fn write_all(&self, shipments: &HashMap<ShipmentId, Shipment>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first, then rename atomically
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on shipment store")?;

            let mut writer = BufWriter::new(&file);

            // Sort by ID for consistent output
            let mut sorted: Vec<_> = shipments.values().collect();
            sorted.sort_by(|a, b| a.id.cmp(&b.id));

            for shipment in sorted {
                let line =
                    serde_json::to_string(shipment).context("Failed to serialize shipment")?;
                writeln!(writer, "{}", line).context("Failed to write shipment")?;
            }

            writer.flush().context("Failed to flush shipment store")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}
