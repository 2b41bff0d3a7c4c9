//! Append-only JSONL storage for audit log entries
//!
//! Entries are written one JSON object per line in append order and never
//! rewritten. Listing is bounded and newest-first, with the last-seen
//! entry id as the pagination cursor.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use tracing::debug;

use crate::domain::{AuditEntryId, AuditLogEntry, ShipmentId};

/// Store for the audit trail in append-only JSONL format
pub struct AuditStore {
    path: PathBuf,
}

impl AuditStore {
    /// Creates a new audit store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".freightflow").join("audit.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a single entry
    pub fn append(&self, entry: &AuditLogEntry) -> Result<()> {
        self.append_all(std::slice::from_ref(entry))
    }

    /// Appends a batch of entries under one lock
    pub fn append_all(&self, entries: &[AuditLogEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open audit store: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on audit store")?;

        let mut writer = BufWriter::new(&file);
        for entry in entries {
            let line = serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(writer, "{}", line).context("Failed to write audit entry")?;
        }

        writer.flush().context("Failed to flush audit store")?;
        debug!(count = entries.len(), "appended audit entries");

        Ok(())
    }

    /// Lists entries for a shipment, newest first
    ///
    /// `cursor` is the id of the last entry the caller has already seen;
    /// the page starts just past it. At most `limit` entries are
    /// returned.
    pub fn list_for(
        &self,
        shipment_id: &ShipmentId,
        limit: usize,
        cursor: Option<&AuditEntryId>,
    ) -> Result<Vec<AuditLogEntry>> {
        let mut entries = self.read_for(shipment_id)?;

        // File order is append order; newest first for display
        entries.reverse();

        let skip = match cursor {
            Some(cursor_id) => match entries.iter().position(|e| &e.id == cursor_id) {
                Some(index) => index + 1,
                // Unknown cursor: start from the top rather than guessing
                None => 0,
            },
            None => 0,
        };

        Ok(entries.into_iter().skip(skip).take(limit).collect())
    }

    /// Reads all entries for a shipment in append (chronological) order
    pub fn read_for(&self, shipment_id: &ShipmentId) -> Result<Vec<AuditLogEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| &e.shipment_id == shipment_id)
            .collect())
    }

    /// Reads the whole trail in append order
    pub fn read_all(&self) -> Result<Vec<AuditLogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open audit store: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on audit store")?;

        let reader = BufReader::new(&file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditLogEntry = serde_json::from_str(&line).with_context(|| {
                format!("Failed to parse audit entry at line {}", line_num + 1)
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }
}
