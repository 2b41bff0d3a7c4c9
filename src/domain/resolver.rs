//! Task resolver
//!
//! Composes per-phase catalog resolution into the full, ordered task list
//! for a shipment snapshot. Resolution is pure and deterministic: calling
//! [`resolve`] twice on an unchanged shipment yields structurally equal
//! output, which is how callers detect whether a configuration change
//! altered the task set.

use serde::{Deserialize, Serialize};

use super::catalog::Phase;
use super::shipment::Shipment;

/// An email rendered against a shipment snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// A task as it applies to one shipment: catalog spec with all templates
/// rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTask {
    pub phase: Phase,
    pub id: String,
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<RenderedEmail>,
}

/// The ordered task list currently applicable to a shipment
///
/// Phases appear in fixed catalog order, tasks within a phase in
/// catalog-declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTasks(Vec<ResolvedTask>);

/// Resolves the full task list for a shipment snapshot
pub fn resolve(shipment: &Shipment) -> ResolvedTasks {
    let mut tasks = Vec::new();

    for phase in Phase::ALL {
        for spec in phase.tasks(shipment) {
            tasks.push(ResolvedTask {
                phase,
                id: spec.id.to_string(),
                label: spec.label.render(shipment),
                email: spec.email.as_ref().map(|e| RenderedEmail {
                    subject: e.subject.render(shipment),
                    body: e.body.render(shipment),
                }),
            });
        }
    }

    ResolvedTasks(tasks)
}

impl ResolvedTasks {
    /// Iterates over all tasks in resolver order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedTask> {
        self.0.iter()
    }

    /// Tasks belonging to one phase, in catalog order
    pub fn phase_tasks(&self, phase: Phase) -> impl Iterator<Item = &ResolvedTask> {
        self.0.iter().filter(move |t| t.phase == phase)
    }

    /// All task identifiers in resolver order
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|t| t.id.as_str())
    }

    /// Returns true if a task id is in the resolved set
    pub fn contains(&self, task_id: &str) -> bool {
        self.0.iter().any(|t| t.id == task_id)
    }

    /// Looks up a resolved task by id
    pub fn get(&self, task_id: &str) -> Option<&ResolvedTask> {
        self.0.iter().find(|t| t.id == task_id)
    }

    /// Returns the number of resolved tasks
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no tasks resolved
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedTasks {
    type Item = &'a ResolvedTask;
    type IntoIter = std::slice::Iter<'a, ResolvedTask>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shipment::{Forwarder, Fumigation};

    #[test]
    fn resolve_is_idempotent() {
        let mut shipment = Shipment::new("ACME");
        shipment.forwarder = Forwarder::Xpo;
        shipment.fumigation = Fumigation::Sgs;

        assert_eq!(resolve(&shipment), resolve(&shipment));
    }

    #[test]
    fn phases_appear_in_catalog_order() {
        let shipment = Shipment::new("ACME");
        let resolved = resolve(&shipment);

        let mut last_index = 0;
        for task in resolved.iter() {
            let index = Phase::ALL.iter().position(|p| *p == task.phase).unwrap();
            assert!(index >= last_index, "phase order violated at {}", task.id);
            last_index = index;
        }
    }

    #[test]
    fn switching_forwarder_changes_resolved_set() {
        let mut shipment = Shipment::new("ACME");
        shipment.forwarder = Forwarder::Xpo;

        let before = resolve(&shipment);
        assert!(before.contains("p4_xpo_booking"));
        assert!(!before.contains("p4_hmi_whatsapp"));

        shipment.forwarder = Forwarder::Hmi;
        let after = resolve(&shipment);

        assert!(!after.contains("p4_xpo_booking"));
        assert!(after.contains("p4_hmi_whatsapp"));
        assert_ne!(before, after);
    }

    #[test]
    fn static_phases_unaffected_by_partner_switch() {
        let mut shipment = Shipment::new("ACME");
        shipment.forwarder = Forwarder::Xpo;
        let before: Vec<_> = resolve(&shipment)
            .phase_tasks(Phase::DocumentIntake)
            .cloned()
            .collect();

        shipment.forwarder = Forwarder::Hmi;
        let after: Vec<_> = resolve(&shipment)
            .phase_tasks(Phase::DocumentIntake)
            .cloned()
            .collect();

        assert_eq!(before, after);
    }

    #[test]
    fn resolved_emails_are_rendered() {
        let mut shipment = Shipment::new("ACME");
        shipment.forwarder = Forwarder::Xpo;

        let resolved = resolve(&shipment);
        let docs = resolved.get("p4_xpo_docs").unwrap();
        let email = docs.email.as_ref().unwrap();

        assert_eq!(email.subject, format!("Final Docs - {}", shipment.id));
        assert_eq!(email.body, "Please find attached final documents.");
    }

    #[test]
    fn get_unknown_task_is_none() {
        let shipment = Shipment::new("ACME");
        let resolved = resolve(&shipment);

        assert!(resolved.get("p9_unknown").is_none());
        assert!(!resolved.contains("p9_unknown"));
    }
}
