//! Configuration handling
//!
//! Configuration is stored in `.freightflow/config.toml` (project) and
//! `~/.config/freightflow/config.toml` (global). Project values override
//! global ones field by field.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page size for bounded audit history retrieval
    pub audit_page_size: usize,

    /// Shipping line pre-filled on new shipments
    pub default_shipping_line: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audit_page_size: 50,
            default_shipping_line: None,
        }
    }
}

/// Partial configuration as read from one file; fields absent from the
/// file leave the lower layer untouched
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigOverlay {
    audit_page_size: Option<usize>,
    default_shipping_line: Option<String>,
}

impl Config {
    /// Loads the configuration for a project: defaults, then the global
    /// file, then the project file
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_path() {
            if global_path.exists() {
                config.apply_file(&global_path)?;
            }
        }

        let project_path = project_root.join(".freightflow").join("config.toml");
        if project_path.exists() {
            config.apply_file(&project_path)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Path of the global config file, if a home directory is known
    pub fn global_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "freightflow")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Walks up from the current directory looking for a `.freightflow`
    /// project marker
    pub fn find_project_root() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;

        loop {
            if dir.join(".freightflow").is_dir() {
                return Some(dir);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Writes this configuration to the given path as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, toml)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let overlay: ConfigOverlay = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

        if let Some(size) = overlay.audit_page_size {
            self.audit_page_size = size;
        }
        if let Some(line) = overlay.default_shipping_line {
            self.default_shipping_line = Some(line);
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.audit_page_size == 0 {
            return Err(ConfigError::Invalid("audit_page_size must be at least 1".into()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project_config(root: &Path, content: &str) {
        let dir = root.join(".freightflow");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), content).unwrap();
    }

    #[test]
    fn defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config = Config::for_project(dir.path()).unwrap();

        assert_eq!(config.audit_page_size, 50);
        assert_eq!(config.default_shipping_line, None);
    }

    #[test]
    fn project_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        write_project_config(
            dir.path(),
            "audit_page_size = 25\ndefault_shipping_line = \"Maersk\"\n",
        );

        let config = Config::for_project(dir.path()).unwrap();
        assert_eq!(config.audit_page_size, 25);
        assert_eq!(config.default_shipping_line.as_deref(), Some("Maersk"));
    }

    #[test]
    fn partial_project_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "default_shipping_line = \"CMA CGM\"\n");

        let config = Config::for_project(dir.path()).unwrap();
        assert_eq!(config.audit_page_size, 50);
        assert_eq!(config.default_shipping_line.as_deref(), Some("CMA CGM"));
    }

    #[test]
    fn zero_page_size_rejected() {
        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "audit_page_size = 0\n");

        assert!(Config::for_project(dir.path()).is_err());
    }

    #[test]
    fn malformed_toml_rejected() {
        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "audit_page_size = \"lots\"\n");

        assert!(Config::for_project(dir.path()).is_err());
    }

    #[test]
    fn save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            audit_page_size: 10,
            default_shipping_line: Some("ONE".into()),
        };

        let path = dir.path().join(".freightflow").join("config.toml");
        config.save(&path).unwrap();

        let loaded = Config::for_project(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }
}
