//! Project management
//!
//! Handles workspace initialization and provides access to the stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{AuditStore, Config, ShipmentStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a freightflow workspace")]
    NotInProject,
}

/// A freightflow workspace
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(".freightflow");

        if !data_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;
        Self::open(root)
    }

    /// Initializes a new workspace at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(".freightflow");

        fs::create_dir_all(&data_dir).with_context(|| {
            format!(
                "Failed to create .freightflow directory: {}",
                data_dir.display()
            )
        })?;

        let config_path = data_dir.join("config.toml");
        if !config_path.exists() {
            Config::default().save(&config_path)?;
        }

        Self::open(root)
    }

    /// Returns the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the data directory path
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(".freightflow")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the shipment store
    pub fn shipment_store(&self) -> ShipmentStore {
        ShipmentStore::for_project(&self.root)
    }

    /// Returns the audit store
    pub fn audit_store(&self) -> AuditStore {
        AuditStore::for_project(&self.root)
    }
}
