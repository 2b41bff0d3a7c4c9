//! Progress calculator
//!
//! Turns checklist state plus the resolved task list into per-phase and
//! overall percentages and the next actionable task. Stale checklist
//! entries (tasks dropped from the resolved list) count toward nothing.

use serde::{Deserialize, Serialize};

use super::catalog::Phase;
use super::checklist::ChecklistState;
use super::resolver::{ResolvedTask, ResolvedTasks};

/// Completion figures for one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseProgress {
    pub phase: Phase,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

/// Full progress picture for one shipment snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub phases: Vec<PhaseProgress>,
    pub overall: u8,

    /// First incomplete task in resolver order; None when everything is done
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_task: Option<ResolvedTask>,
}

impl ProgressReport {
    /// Returns the progress entry for one phase
    pub fn phase(&self, phase: Phase) -> Option<&PhaseProgress> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    /// Returns true if every resolved task is complete
    pub fn is_complete(&self) -> bool {
        self.next_task.is_none()
    }
}

/// Computes completion for one phase over the currently resolved tasks
///
/// A phase that resolves to zero tasks does not apply and is vacuously
/// complete: its progress is 100.
pub fn phase_progress(
    resolved: &ResolvedTasks,
    checklist: &ChecklistState,
    phase: Phase,
) -> PhaseProgress {
    let mut total = 0;
    let mut completed = 0;

    for task in resolved.phase_tasks(phase) {
        total += 1;
        if checklist.is_complete(&task.id) {
            completed += 1;
        }
    }

    let percent = if total == 0 {
        100
    } else {
        (100.0 * completed as f64 / total as f64).round() as u8
    };

    PhaseProgress {
        phase,
        completed,
        total,
        percent,
    }
}

/// First task in resolver order whose flag is not set
///
/// Stable for identical (resolved list, checklist) pairs: resolver order
/// is deterministic and no unordered iteration is involved.
pub fn next_task<'a>(
    resolved: &'a ResolvedTasks,
    checklist: &ChecklistState,
) -> Option<&'a ResolvedTask> {
    resolved.iter().find(|task| !checklist.is_complete(&task.id))
}

/// Computes the full progress report for a shipment snapshot
///
/// Overall progress is the unweighted average of per-phase percentages,
/// rounded to the nearest integer and clamped to 0..=100.
pub fn report(resolved: &ResolvedTasks, checklist: &ChecklistState) -> ProgressReport {
    let phases: Vec<PhaseProgress> = Phase::ALL
        .iter()
        .map(|phase| phase_progress(resolved, checklist, *phase))
        .collect();

    let sum: u32 = phases.iter().map(|p| p.percent as u32).sum();
    let overall = (sum as f64 / phases.len() as f64).round().clamp(0.0, 100.0) as u8;

    ProgressReport {
        phases,
        overall,
        next_task: next_task(resolved, checklist).cloned(),
    }
}
