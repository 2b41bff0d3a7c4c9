//! Workflow engine
//!
//! The mutation paths for a shipment. Every operation is a synchronous
//! snapshot-in/new-snapshot-out transformation: it clones the aggregate,
//! applies the change, reconciles the checklist where the task set may
//! have moved, bumps the revision marker, and returns the audit entries
//! observed alongside a fresh progress report.
//!
//! Serializing concurrent writers to the same shipment is the caller's
//! job; the revision marker plus the store's conflict check detect lost
//! updates.

use thiserror::Error;

use super::audit::AuditLogEntry;
use super::progress::{self, ProgressReport};
use super::resolver::resolve;
use super::shipment::{Attachment, FieldEdit, Forwarder, Fumigation, Shipment};

/// Recoverable validation errors from workflow operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Task '{0}' is not in the shipment's current task list")]
    UnknownTaskId(String),

    #[error("No attachment with file id '{0}'")]
    UnknownAttachment(String),
}

/// Result of one workflow operation
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The new shipment snapshot, revision bumped
    pub shipment: Shipment,

    /// Audit entries recording the mutation, in order of occurrence
    pub audit: Vec<AuditLogEntry>,

    /// Progress recomputed against the new snapshot
    pub progress: ProgressReport,
}

fn finish(mut shipment: Shipment, audit: Vec<AuditLogEntry>) -> Outcome {
    shipment.bump_revision();
    let resolved = resolve(&shipment);
    let progress = progress::report(&resolved, &shipment.checklist);

    Outcome {
        shipment,
        audit,
        progress,
    }
}

/// Creates a fresh shipment with its checklist seeded from the default
/// configuration's task list
pub fn create_shipment(customer: impl Into<String>) -> Outcome {
    let mut shipment = Shipment::new(customer);
    let resolved = resolve(&shipment);
    shipment.checklist.reconcile(&resolved);

    let entry = AuditLogEntry::note(shipment.id.clone(), "Shipment created");
    let progress = progress::report(&resolved, &shipment.checklist);

    Outcome {
        shipment,
        audit: vec![entry],
        progress,
    }
}

/// Flips a checklist task, recording the toggle
///
/// The task must be in the currently resolved list; stale ids from a
/// previous configuration are rejected, not silently flipped.
pub fn toggle_task(shipment: &Shipment, task_id: &str) -> Result<Outcome, WorkflowError> {
    let resolved = resolve(shipment);
    let task = resolved
        .get(task_id)
        .ok_or_else(|| WorkflowError::UnknownTaskId(task_id.to_string()))?;

    let mut next = shipment.clone();
    let change = next.checklist.toggle(task_id);
    let entry = AuditLogEntry::checklist_toggle(next.id.clone(), &change, &task.label);

    Ok(finish(next, vec![entry]))
}

/// Reassigns the forwarder, reconciling the checklist against the new
/// task set
///
/// Checklist keys for tasks only present under the old selection are
/// retained, so switching back restores their completed state.
pub fn set_forwarder(shipment: &Shipment, forwarder: Forwarder) -> Outcome {
    let mut next = shipment.clone();
    let old = next.forwarder.display_name().to_string();
    next.forwarder = forwarder;
    let new = next.forwarder.display_name().to_string();

    let resolved = resolve(&next);
    next.checklist.reconcile(&resolved);

    let entry = AuditLogEntry::field_change(next.id.clone(), "forwarder", Some(old), Some(new));
    finish(next, vec![entry])
}

/// Reassigns the fumigation provider, reconciling the checklist against
/// the new task set
pub fn set_fumigation(shipment: &Shipment, fumigation: Fumigation) -> Outcome {
    let mut next = shipment.clone();
    let old = next.fumigation.display_name().to_string();
    next.fumigation = fumigation;
    let new = next.fumigation.display_name().to_string();

    let resolved = resolve(&next);
    next.checklist.reconcile(&resolved);

    let entry = AuditLogEntry::field_change(next.id.clone(), "fumigation", Some(old), Some(new));
    finish(next, vec![entry])
}

/// Applies a direct field edit, recording before and after values
pub fn apply_edit(shipment: &Shipment, edit: FieldEdit) -> Outcome {
    let mut next = shipment.clone();
    let field = edit.field_name();
    let (old, new) = edit.apply(&mut next);

    let entry = AuditLogEntry::field_change(next.id.clone(), field, old, new);
    finish(next, vec![entry])
}

/// Records an uploaded document reference
pub fn attach_file(shipment: &Shipment, attachment: Attachment) -> Outcome {
    let mut next = shipment.clone();
    let summary = format!("Attached '{}'", attachment.file_name);
    let entry = AuditLogEntry::record(
        next.id.clone(),
        Some("documents".to_string()),
        None,
        Some(attachment.file_name.clone()),
        summary,
    );
    next.attachments.push(attachment);

    finish(next, vec![entry])
}

/// Removes a document reference by file id
pub fn detach_file(shipment: &Shipment, file_id: &str) -> Result<Outcome, WorkflowError> {
    let mut next = shipment.clone();
    let index = next
        .attachments
        .iter()
        .position(|a| a.file_id == file_id)
        .ok_or_else(|| WorkflowError::UnknownAttachment(file_id.to_string()))?;

    let removed = next.attachments.remove(index);
    let summary = format!("Removed '{}'", removed.file_name);
    let entry = AuditLogEntry::record(
        next.id.clone(),
        Some("documents".to_string()),
        Some(removed.file_name),
        None,
        summary,
    );

    Ok(finish(next, vec![entry]))
}
