//! Domain models for the shipment workflow engine
//!
//! Contains the core business logic without any I/O concerns.

mod audit;
mod catalog;
mod checklist;
pub mod engine;
mod id;
mod progress;
mod resolver;
mod shipment;

pub use audit::{summarize, AuditLogEntry, SUMMARY_VALUE_LEN, TRUNCATION_MARKER};
pub use catalog::{
    forwarder_tasks, fumigation_tasks, EmailTemplate, Phase, TaskSpec, Template,
    CERTIFICATION_TASKS, DOCUMENT_INTAKE_TASKS, FUMIGATION_HANDOFF_TASKS,
};
pub use checklist::{ChecklistChange, ChecklistState};
pub use engine::{Outcome, WorkflowError};
pub use id::{AuditEntryId, IdError, ShipmentId};
pub use progress::{next_task, phase_progress, report, PhaseProgress, ProgressReport};
pub use resolver::{resolve, RenderedEmail, ResolvedTask, ResolvedTasks};
pub use shipment::{
    Attachment, CommercialInfo, FieldEdit, Forwarder, Fumigation, Shipment, ShipmentDetails,
    FORWARDER_PLACEHOLDER, FUMIGATION_PLACEHOLDER, METHOD_PLACEHOLDER,
};
