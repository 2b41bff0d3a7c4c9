//! Checklist state
//!
//! Per-shipment mapping of task identifier to completion flag, the source
//! of truth for progress. Keys for tasks dropped from the resolved list
//! are retained so progress survives a configuration being toggled back;
//! [`ChecklistState::remove`] is the only deletion path and nothing calls
//! it implicitly.
//!
//! Backed by a `BTreeMap` so iteration order is stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::resolver::ResolvedTasks;

/// One observed flip of a checklist flag, for the audit log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistChange {
    pub task_id: String,
    pub old: bool,
    pub new: bool,
}

/// Task completion flags for one shipment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistState(BTreeMap<String, bool>);

impl ChecklistState {
    /// Creates an empty checklist
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the stored flag, or false if the task was never touched
    pub fn is_complete(&self, task_id: &str) -> bool {
        self.0.get(task_id).copied().unwrap_or(false)
    }

    /// Flips the flag for a task, creating the entry if absent
    ///
    /// A task starts at false, so the first toggle marks it complete.
    pub fn toggle(&mut self, task_id: &str) -> ChecklistChange {
        let entry = self.0.entry(task_id.to_string()).or_insert(false);
        let old = *entry;
        *entry = !old;

        ChecklistChange {
            task_id: task_id.to_string(),
            old,
            new: *entry,
        }
    }

    /// Inserts any resolved task ids not yet tracked, at false
    ///
    /// Never deletes: keys for tasks absent from the resolved set are kept
    /// so completed work survives a partner switch and back. Returns the
    /// ids that were inserted.
    pub fn reconcile(&mut self, resolved: &ResolvedTasks) -> Vec<String> {
        let mut inserted = Vec::new();

        for id in resolved.task_ids() {
            if !self.0.contains_key(id) {
                self.0.insert(id.to_string(), false);
                inserted.push(id.to_string());
            }
        }

        inserted
    }

    /// Explicitly deletes a key, returning its flag if present
    pub fn remove(&mut self, task_id: &str) -> Option<bool> {
        self.0.remove(task_id)
    }

    /// Returns true if the given key is tracked (regardless of flag)
    pub fn contains(&self, task_id: &str) -> bool {
        self.0.contains_key(task_id)
    }

    /// Keys tracked in state but absent from the resolved set
    pub fn stale_keys<'a>(&'a self, resolved: &'a ResolvedTasks) -> impl Iterator<Item = &'a str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|id| !resolved.contains(id))
    }

    /// Iterates over all tracked keys and flags in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns the number of tracked keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no keys are tracked
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
