//! Shipment aggregate
//!
//! A shipment owns its checklist state and carries the partner selections
//! (forwarder, fumigation provider) that drive task resolution. Every
//! mutation path goes through the workflow engine, which bumps the revision
//! counter so callers can detect concurrent writes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::checklist::ChecklistState;
use super::id::ShipmentId;

/// Placeholder used when a manual forwarder has no name
pub const FORWARDER_PLACEHOLDER: &str = "Forwarder";

/// Placeholder used when a manual fumigation provider has no name
pub const FUMIGATION_PLACEHOLDER: &str = "Fumigation Provider";

/// Placeholder used when a manual partner has no contact method
pub const METHOD_PLACEHOLDER: &str = "preferred channel";

/// Freight forwarder selection
///
/// Known partners carry their own fixed task lists; the manual variant
/// falls back to generic tasks labelled with the free-text name and
/// contact method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "kebab-case")]
pub enum Forwarder {
    Xpo,
    Hmi,
    Manual {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        method: Option<String>,
    },
}

impl Default for Forwarder {
    fn default() -> Self {
        Forwarder::Manual {
            name: None,
            method: None,
        }
    }
}

impl Forwarder {
    /// Creates a manual forwarder entry
    pub fn manual(name: impl Into<String>, method: impl Into<String>) -> Self {
        Forwarder::Manual {
            name: Some(name.into()),
            method: Some(method.into()),
        }
    }

    /// Returns true if this is a free-text manual entry
    pub fn is_manual(&self) -> bool {
        matches!(self, Forwarder::Manual { .. })
    }

    /// Display name for labels and audit values, with placeholder fallback
    pub fn display_name(&self) -> &str {
        match self {
            Forwarder::Xpo => "XPO Logistics",
            Forwarder::Hmi => "HMI Logistics",
            Forwarder::Manual { name, .. } => {
                name.as_deref().unwrap_or(FORWARDER_PLACEHOLDER)
            }
        }
    }

    /// Contact method for manual task labels, with placeholder fallback
    pub fn contact_method(&self) -> &str {
        match self {
            Forwarder::Manual { method, .. } => {
                method.as_deref().unwrap_or(METHOD_PLACEHOLDER)
            }
            _ => METHOD_PLACEHOLDER,
        }
    }
}

/// Fumigation provider selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "kebab-case")]
pub enum Fumigation {
    SkyServices,
    Sgs,
    Manual {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        method: Option<String>,
    },
}

impl Default for Fumigation {
    fn default() -> Self {
        Fumigation::Manual {
            name: None,
            method: None,
        }
    }
}

impl Fumigation {
    /// Creates a manual fumigation provider entry
    pub fn manual(name: impl Into<String>, method: impl Into<String>) -> Self {
        Fumigation::Manual {
            name: Some(name.into()),
            method: Some(method.into()),
        }
    }

    /// Returns true if this is a free-text manual entry
    pub fn is_manual(&self) -> bool {
        matches!(self, Fumigation::Manual { .. })
    }

    /// Display name for labels and audit values, with placeholder fallback
    pub fn display_name(&self) -> &str {
        match self {
            Fumigation::SkyServices => "Sky Services",
            Fumigation::Sgs => "SGS",
            Fumigation::Manual { name, .. } => {
                name.as_deref().unwrap_or(FUMIGATION_PLACEHOLDER)
            }
        }
    }

    /// Contact method for manual task labels, with placeholder fallback
    pub fn contact_method(&self) -> &str {
        match self {
            Fumigation::Manual { method, .. } => {
                method.as_deref().unwrap_or(METHOD_PLACEHOLDER)
            }
            _ => METHOD_PLACEHOLDER,
        }
    }
}

/// Operational details of a shipment, all optional until supplied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipmentDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_line: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearing_agent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<NaiveDate>,
}

/// Commercial paperwork details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommercialInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Opaque reference to an uploaded document
///
/// The core never inspects file bytes; which storage backend a `file_id`
/// resolves through is an external concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_id: String,
    pub file_name: String,
}

impl Attachment {
    pub fn new(file_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
        }
    }
}

/// The shipment aggregate root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Unique identifier
    pub id: ShipmentId,

    /// Selected freight forwarder
    #[serde(default)]
    pub forwarder: Forwarder,

    /// Selected fumigation provider
    #[serde(default)]
    pub fumigation: Fumigation,

    /// Operational details
    #[serde(default)]
    pub details: ShipmentDetails,

    /// Commercial paperwork
    #[serde(default)]
    pub commercial: CommercialInfo,

    /// Uploaded document references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    /// Task completion flags, exclusively owned by this shipment
    #[serde(default, skip_serializing_if = "ChecklistState::is_empty")]
    pub checklist: ChecklistState,

    /// Revision marker for optimistic concurrency; bumped on every
    /// engine mutation
    #[serde(default)]
    pub revision: u64,

    /// When the shipment was created
    pub created_at: DateTime<Utc>,

    /// When the shipment was last updated
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    /// Creates a new shipment for the given customer
    pub fn new(customer: impl Into<String>) -> Self {
        let customer = customer.into();
        let now = Utc::now();
        let id = ShipmentId::new(&customer, now);

        Self {
            id,
            forwarder: Forwarder::default(),
            fumigation: Fumigation::default(),
            details: ShipmentDetails {
                customer: Some(customer),
                ..Default::default()
            },
            commercial: CommercialInfo::default(),
            attachments: Vec::new(),
            checklist: ChecklistState::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bumps the revision marker and refreshes `updated_at`
    ///
    /// Called once per engine operation, not per field touched.
    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
        self.updated_at = Utc::now();
    }

    /// Value shown in commercial email subjects: invoice number if known,
    /// otherwise the shipment id
    pub fn invoice_reference(&self) -> String {
        self.commercial
            .invoice
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Finds an attachment by file id
    pub fn attachment(&self, file_id: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.file_id == file_id)
    }
}

/// A direct edit to one scalar field of a shipment
///
/// Routing every field edit through one value keeps audit generation in a
/// single place: each variant knows its audit field name and how to apply
/// itself, returning the old and new values as display strings.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Customer(Option<String>),
    Container(Option<String>),
    ShippingLine(Option<String>),
    ClearingAgent(Option<String>),
    LoadingDate(Option<NaiveDate>),
    Eta(Option<NaiveDate>),
    Invoice(Option<String>),
    DeclaredValue(Option<String>),
    Notes(Option<String>),
}

impl FieldEdit {
    /// The audit field name for this edit
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldEdit::Customer(_) => "customer",
            FieldEdit::Container(_) => "container",
            FieldEdit::ShippingLine(_) => "shipping_line",
            FieldEdit::ClearingAgent(_) => "clearing_agent",
            FieldEdit::LoadingDate(_) => "loading_date",
            FieldEdit::Eta(_) => "eta",
            FieldEdit::Invoice(_) => "invoice",
            FieldEdit::DeclaredValue(_) => "declared_value",
            FieldEdit::Notes(_) => "notes",
        }
    }

    /// Applies the edit, returning `(old, new)` display values for the
    /// audit log
    pub(crate) fn apply(self, shipment: &mut Shipment) -> (Option<String>, Option<String>) {
        fn swap_text(slot: &mut Option<String>, value: Option<String>) -> (Option<String>, Option<String>) {
            let old = std::mem::replace(slot, value);
            (old, slot.clone())
        }

        fn swap_date(slot: &mut Option<NaiveDate>, value: Option<NaiveDate>) -> (Option<String>, Option<String>) {
            let old = std::mem::replace(slot, value);
            (old.map(|d| d.to_string()), slot.map(|d| d.to_string()))
        }

        match self {
            FieldEdit::Customer(v) => swap_text(&mut shipment.details.customer, v),
            FieldEdit::Container(v) => swap_text(&mut shipment.details.container, v),
            FieldEdit::ShippingLine(v) => swap_text(&mut shipment.details.shipping_line, v),
            FieldEdit::ClearingAgent(v) => swap_text(&mut shipment.details.clearing_agent, v),
            FieldEdit::LoadingDate(v) => swap_date(&mut shipment.details.loading_date, v),
            FieldEdit::Eta(v) => swap_date(&mut shipment.details.eta, v),
            FieldEdit::Invoice(v) => swap_text(&mut shipment.commercial.invoice, v),
            FieldEdit::DeclaredValue(v) => swap_text(&mut shipment.commercial.declared_value, v),
            FieldEdit::Notes(v) => swap_text(&mut shipment.commercial.notes, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_shipment_defaults() {
        let shipment = Shipment::new("ACME Trading");

        assert_eq!(shipment.revision, 0);
        assert_eq!(shipment.details.customer.as_deref(), Some("ACME Trading"));
        assert!(shipment.forwarder.is_manual());
        assert!(shipment.fumigation.is_manual());
        assert!(shipment.checklist.is_empty());
        assert!(shipment.attachments.is_empty());
    }

    #[test]
    fn known_partner_display_names() {
        assert_eq!(Forwarder::Xpo.display_name(), "XPO Logistics");
        assert_eq!(Forwarder::Hmi.display_name(), "HMI Logistics");
        assert_eq!(Fumigation::SkyServices.display_name(), "Sky Services");
        assert_eq!(Fumigation::Sgs.display_name(), "SGS");
    }

    #[test]
    fn manual_partner_placeholders() {
        let forwarder = Forwarder::default();
        assert_eq!(forwarder.display_name(), FORWARDER_PLACEHOLDER);
        assert_eq!(forwarder.contact_method(), METHOD_PLACEHOLDER);

        let fumigation = Fumigation::default();
        assert_eq!(fumigation.display_name(), FUMIGATION_PLACEHOLDER);
    }

    #[test]
    fn manual_partner_with_values() {
        let forwarder = Forwarder::manual("Oceanic Freight", "email");

        assert_eq!(forwarder.display_name(), "Oceanic Freight");
        assert_eq!(forwarder.contact_method(), "email");
    }

    #[test]
    fn partner_serde_is_tagged() {
        let json = serde_json::to_string(&Forwarder::Xpo).unwrap();
        assert_eq!(json, r#"{"provider":"xpo"}"#);

        let parsed: Forwarder =
            serde_json::from_str(r#"{"provider":"manual","name":"Oceanic","method":"phone"}"#)
                .unwrap();
        assert_eq!(parsed, Forwarder::manual("Oceanic", "phone"));
    }

    #[test]
    fn invoice_reference_falls_back_to_id() {
        let mut shipment = Shipment::new("ACME");
        assert_eq!(shipment.invoice_reference(), shipment.id.to_string());

        shipment.commercial.invoice = Some("INV-2041".into());
        assert_eq!(shipment.invoice_reference(), "INV-2041");
    }

    #[test]
    fn field_edit_returns_old_and_new() {
        let mut shipment = Shipment::new("ACME");
        shipment.details.container = Some("MSKU1234567".into());

        let (old, new) = FieldEdit::Container(Some("TGHU7654321".into())).apply(&mut shipment);

        assert_eq!(old.as_deref(), Some("MSKU1234567"));
        assert_eq!(new.as_deref(), Some("TGHU7654321"));
        assert_eq!(shipment.details.container.as_deref(), Some("TGHU7654321"));
    }

    #[test]
    fn field_edit_date_formats_iso() {
        let mut shipment = Shipment::new("ACME");
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let (old, new) = FieldEdit::Eta(Some(date)).apply(&mut shipment);

        assert_eq!(old, None);
        assert_eq!(new.as_deref(), Some("2026-03-14"));
    }

    #[test]
    fn serde_roundtrip() {
        let mut shipment = Shipment::new("ACME Trading");
        shipment.forwarder = Forwarder::Xpo;
        shipment.fumigation = Fumigation::Sgs;
        shipment.commercial.invoice = Some("INV-1".into());
        shipment.attachments.push(Attachment::new("f-1", "invoice.pdf"));

        let json = serde_json::to_string(&shipment).unwrap();
        let parsed: Shipment = serde_json::from_str(&json).unwrap();

        assert_eq!(shipment, parsed);
    }

    #[test]
    fn bump_revision_increments() {
        let mut shipment = Shipment::new("ACME");
        let before = shipment.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        shipment.bump_revision();

        assert_eq!(shipment.revision, 1);
        assert!(shipment.updated_at > before);
    }
}
