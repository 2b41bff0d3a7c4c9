//! Audit log entries
//!
//! Append-only, human-readable trail of every shipment mutation. Entries
//! are immutable once constructed; corrections are new entries, never
//! edits. Retention is an operational concern outside the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::checklist::ChecklistChange;
use super::id::{AuditEntryId, ShipmentId};

/// Values longer than this are cut in generated summaries
pub const SUMMARY_VALUE_LEN: usize = 60;

/// Marker appended to a truncated value
pub const TRUNCATION_MARKER: &str = "...";

fn truncate_value(value: &str) -> String {
    let mut truncated: String = value.chars().take(SUMMARY_VALUE_LEN).collect();
    if value.chars().count() > SUMMARY_VALUE_LEN {
        truncated.push_str(TRUNCATION_MARKER);
    }
    truncated
}

/// Generates a human-readable summary for a field mutation
///
/// With both values present the summary is diff-style with each value
/// truncated to 60 characters; with only a field name it degrades to
/// `updated {field}`.
pub fn summarize(field_name: Option<&str>, old: Option<&str>, new: Option<&str>) -> String {
    match (old, new) {
        (Some(old), Some(new)) => format!(
            "Changed {}: '{}' -> '{}'",
            field_name.unwrap_or("value"),
            truncate_value(old),
            truncate_value(new)
        ),
        _ => match field_name {
            Some(field) => format!("updated {}", field),
            None => "updated shipment".to_string(),
        },
    }
}

/// One immutable record of an observed mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique identifier
    pub id: AuditEntryId,

    /// The shipment this entry belongs to (weak reference by id)
    pub shipment_id: ShipmentId,

    /// Wall-clock time of the entry's creation
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,

    /// Human-readable summary
    pub summary: String,
}

impl AuditLogEntry {
    /// Appends-style constructor with an explicit summary
    pub fn record(
        shipment_id: ShipmentId,
        field_name: Option<String>,
        old_value: Option<String>,
        new_value: Option<String>,
        summary: impl Into<String>,
    ) -> Self {
        let timestamp = Utc::now();
        let seed = format!("{}:{}", shipment_id, field_name.as_deref().unwrap_or(""));

        Self {
            id: AuditEntryId::new(&seed, timestamp),
            shipment_id,
            timestamp,
            field_name,
            old_value,
            new_value,
            summary: summary.into(),
        }
    }

    /// Entry for a direct field edit, with a generated summary
    pub fn field_change(
        shipment_id: ShipmentId,
        field_name: &str,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        let summary = summarize(
            Some(field_name),
            old_value.as_deref(),
            new_value.as_deref(),
        );

        Self::record(
            shipment_id,
            Some(field_name.to_string()),
            old_value,
            new_value,
            summary,
        )
    }

    /// Entry for a checklist toggle; the summary names the task and its
    /// new state
    pub fn checklist_toggle(
        shipment_id: ShipmentId,
        change: &ChecklistChange,
        label: &str,
    ) -> Self {
        let state = if change.new { "complete" } else { "incomplete" };
        let summary = format!("Task '{}' marked {}", label, state);

        Self::record(
            shipment_id,
            Some(change.task_id.clone()),
            Some(change.old.to_string()),
            Some(change.new.to_string()),
            summary,
        )
    }

    /// Free-form entry with neither field nor values
    pub fn note(shipment_id: ShipmentId, summary: impl Into<String>) -> Self {
        Self::record(shipment_id, None, None, None, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipment_id() -> ShipmentId {
        ShipmentId::new("ACME", Utc::now())
    }

    #[test]
    fn summary_with_both_values_is_diff_style() {
        let summary = summarize(Some("container"), Some("MSKU1234567"), Some("TGHU7654321"));
        assert_eq!(summary, "Changed container: 'MSKU1234567' -> 'TGHU7654321'");
    }

    #[test]
    fn summary_truncates_long_values() {
        let old = "a".repeat(70);
        let summary = summarize(Some("notes"), Some(&old), Some("short"));

        let expected_fragment = format!("'{}{}'", "a".repeat(60), TRUNCATION_MARKER);
        assert!(summary.contains(&expected_fragment), "got: {}", summary);
    }

    #[test]
    fn summary_keeps_exact_boundary_untruncated() {
        let value = "b".repeat(60);
        let summary = summarize(Some("notes"), Some(&value), Some("x"));

        assert!(summary.contains(&format!("'{}'", value)));
        assert!(!summary.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn summary_with_field_only() {
        assert_eq!(summarize(Some("eta"), None, None), "updated eta");
        assert_eq!(summarize(Some("eta"), Some("old"), None), "updated eta");
    }

    #[test]
    fn summary_with_nothing() {
        assert_eq!(summarize(None, None, None), "updated shipment");
    }

    #[test]
    fn toggle_entry_carries_flag_strings() {
        let change = ChecklistChange {
            task_id: "p1_docs".into(),
            old: false,
            new: true,
        };

        let entry = AuditLogEntry::checklist_toggle(
            shipment_id(),
            &change,
            "Receive Documents from Client",
        );

        assert_eq!(entry.field_name.as_deref(), Some("p1_docs"));
        assert_eq!(entry.old_value.as_deref(), Some("false"));
        assert_eq!(entry.new_value.as_deref(), Some("true"));
        assert_eq!(
            entry.summary,
            "Task 'Receive Documents from Client' marked complete"
        );
    }

    #[test]
    fn toggle_back_reads_incomplete() {
        let change = ChecklistChange {
            task_id: "p1_docs".into(),
            old: true,
            new: false,
        };

        let entry = AuditLogEntry::checklist_toggle(shipment_id(), &change, "Receive Documents");
        assert!(entry.summary.ends_with("marked incomplete"));
    }

    #[test]
    fn entries_get_distinct_ids() {
        let sid = shipment_id();
        let a = AuditLogEntry::note(sid.clone(), "first");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = AuditLogEntry::note(sid, "second");

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serde_roundtrip() {
        let entry = AuditLogEntry::field_change(
            shipment_id(),
            "customer",
            Some("ACME".into()),
            Some("ACME Trading".into()),
        );

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: AuditLogEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(entry, parsed);
    }
}
