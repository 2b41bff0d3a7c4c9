//! Freightflow - shipment workflow engine
//!
//! Tracks a freight shipment through a fixed sequence of operational
//! phases (document intake, fumigation, inspection/certification,
//! forwarder handoff), where the task lists of two phases depend on the
//! partners chosen for that shipment. The crate owns task resolution,
//! checklist progress, and the audit trail; rendering, auth, and file
//! transfer belong to the embedding application.

pub mod domain;
pub mod storage;

pub use domain::{
    AuditLogEntry, ChecklistState, Forwarder, Fumigation, Phase, ProgressReport, ResolvedTasks,
    Shipment, ShipmentId, WorkflowError,
};
pub use storage::{AuditStore, Project, ShipmentStore, StoreError};
