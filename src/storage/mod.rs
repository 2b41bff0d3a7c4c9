//! # Storage Layer
//!
//! Persistence for the workflow engine with git-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Shipments | JSONL (one JSON per line) | `.freightflow/shipments.jsonl` |
//! | Audit trail | JSONL, append-only | `.freightflow/audit.jsonl` |
//! | Config | TOML | `.freightflow/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - Both stores use file locking (`fs2`) for concurrent access
//! - All writes are atomic (temp file + rename), except the audit trail
//!   which is strictly append-only
//! - Shipment saves carry the caller's expected revision; stale writes
//!   fail with [`StoreError::Conflict`] for retry-with-reload
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a workspace
//! - [`ShipmentStore`] - Read/write shipments as JSONL
//! - [`AuditStore`] - Append/list audit entries
//! - [`Config`] - Project and global configuration

mod audit;
mod config;
mod jsonl;
mod project;

pub use audit::AuditStore;
pub use config::{Config, ConfigError};
pub use jsonl::{ShipmentStore, StoreError};
pub use project::{Project, ProjectError};
