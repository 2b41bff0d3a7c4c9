//! Task catalog
//!
//! Canonical definitions of every task that can appear in the workflow,
//! partitioned by phase. Three phases are static; the fumigation and
//! forwarder-handoff phases are parametric on the shipment's selected
//! partner, with known partners mapping to fixed lists and anything else
//! falling back to generic manual tasks.
//!
//! Task definitions never mutate; extending the workflow means adding new
//! specs here.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::shipment::{Forwarder, Fumigation, Shipment};

/// A workflow phase, in fixed catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    DocumentIntake,
    FumigationHandoff,
    Fumigation,
    Certification,
    ForwarderHandoff,
}

impl Phase {
    /// All phases in workflow order
    pub const ALL: [Phase; 5] = [
        Phase::DocumentIntake,
        Phase::FumigationHandoff,
        Phase::Fumigation,
        Phase::Certification,
        Phase::ForwarderHandoff,
    ];

    /// Stable string key
    pub fn id(&self) -> &'static str {
        match self {
            Phase::DocumentIntake => "document_intake",
            Phase::FumigationHandoff => "fumigation_handoff",
            Phase::Fumigation => "fumigation",
            Phase::Certification => "certification",
            Phase::ForwarderHandoff => "forwarder_handoff",
        }
    }

    /// Human-readable phase title
    pub fn title(&self) -> &'static str {
        match self {
            Phase::DocumentIntake => "Document Intake",
            Phase::FumigationHandoff => "Fumigation Handoff",
            Phase::Fumigation => "Fumigation",
            Phase::Certification => "Inspection & Certification",
            Phase::ForwarderHandoff => "Forwarder Handoff",
        }
    }

    /// Resolves the task specs applicable to this phase for the given
    /// shipment. Pure and total: unknown configurations fall through to
    /// the manual branch, never an error.
    pub fn tasks(&self, shipment: &Shipment) -> &'static [TaskSpec] {
        match self {
            Phase::DocumentIntake => DOCUMENT_INTAKE_TASKS,
            Phase::FumigationHandoff => FUMIGATION_HANDOFF_TASKS,
            Phase::Fumigation => fumigation_tasks(&shipment.fumigation),
            Phase::Certification => CERTIFICATION_TASKS,
            Phase::ForwarderHandoff => forwarder_tasks(&shipment.forwarder),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A string template: either a literal or a pure function of the shipment
///
/// Literal templates are constant-returning render functions in disguise;
/// both cases sit behind [`Template::render`] so call sites never branch
/// on value shape.
#[derive(Clone, Copy)]
pub enum Template {
    Literal(&'static str),
    Render(fn(&Shipment) -> String),
}

impl Template {
    /// Renders the template against a shipment snapshot
    pub fn render(&self, shipment: &Shipment) -> String {
        match self {
            Template::Literal(text) => (*text).to_string(),
            Template::Render(f) => f(shipment),
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Template::Render(_) => f.debug_tuple("Render").field(&"<fn>").finish(),
        }
    }
}

/// Email template attached to a task
#[derive(Debug, Clone, Copy)]
pub struct EmailTemplate {
    pub subject: Template,
    pub body: Template,
}

/// Catalog-owned task definition
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    /// Stable identifier, unique within the catalog
    pub id: &'static str,

    /// Human-readable label, possibly interpolating shipment data
    pub label: Template,

    /// Optional email template rendered for the caller to deliver
    pub email: Option<EmailTemplate>,
}

fn docs_mail_subject(s: &Shipment) -> String {
    format!("Shipment {} - Docs", s.id)
}

fn docs_mail_body(s: &Shipment) -> String {
    format!("Please process the attached documents for shipment {}.", s.id)
}

fn fumigation_request_subject(s: &Shipment) -> String {
    format!("INV {} Fumigation Request", s.invoice_reference())
}

fn sky_docs_subject(s: &Shipment) -> String {
    format!("Fumigation Request - {}", s.id)
}

fn sgs_docs_subject(s: &Shipment) -> String {
    format!("SGS Fumigation - {}", s.id)
}

fn coc_subject(s: &Shipment) -> String {
    format!("COC Finalization - {}", s.id)
}

fn final_docs_subject(s: &Shipment) -> String {
    format!("Final Docs - {}", s.id)
}

fn manual_forwarder_contact(s: &Shipment) -> String {
    format!(
        "{}: Contact via {}",
        s.forwarder.display_name(),
        s.forwarder.contact_method()
    )
}

fn manual_forwarder_docs(s: &Shipment) -> String {
    format!("{}: Send Documents", s.forwarder.display_name())
}

fn manual_fumigation_contact(s: &Shipment) -> String {
    format!(
        "{}: Contact via {}",
        s.fumigation.display_name(),
        s.fumigation.contact_method()
    )
}

fn manual_fumigation_docs(s: &Shipment) -> String {
    format!("{}: Send Fumigation Documents", s.fumigation.display_name())
}

fn manual_fumigation_confirm(s: &Shipment) -> String {
    format!(
        "{}: Confirm Fumigation Completion",
        s.fumigation.display_name()
    )
}

/// Phase 1: receiving and forwarding the client's paperwork
pub const DOCUMENT_INTAKE_TASKS: &[TaskSpec] = &[
    TaskSpec {
        id: "p1_docs",
        label: Template::Literal("Receive Documents from Client"),
        email: None,
    },
    TaskSpec {
        id: "p1_mail",
        label: Template::Literal("Send Mail to Forwarder"),
        email: Some(EmailTemplate {
            subject: Template::Render(docs_mail_subject),
            body: Template::Render(docs_mail_body),
        }),
    },
    TaskSpec {
        id: "p1_attachments",
        label: Template::Literal("Check Attachments"),
        email: None,
    },
    TaskSpec {
        id: "p1_fumigation",
        label: Template::Literal("Book Fumigation (WhatsApp)"),
        email: None,
    },
];

/// Phase 2: handing commercial documents to the fumigation side
pub const FUMIGATION_HANDOFF_TASKS: &[TaskSpec] = &[
    TaskSpec {
        id: "p2_mail",
        label: Template::Literal("Send Fumigation Docs"),
        email: Some(EmailTemplate {
            subject: Template::Render(fumigation_request_subject),
            body: Template::Literal("Please find Commercial Invoice & Packing List attached."),
        }),
    },
    TaskSpec {
        id: "p2_attachments",
        label: Template::Literal("Docs sent to Agent"),
        email: None,
    },
    TaskSpec {
        id: "p3a_docs",
        label: Template::Literal("Reply to SGS Inspection Thread"),
        email: None,
    },
];

/// Phase 4: inspection draft, payment, and the final certificate
pub const CERTIFICATION_TASKS: &[TaskSpec] = &[
    TaskSpec {
        id: "p3b_draft",
        label: Template::Literal("Receive & Verify Draft"),
        email: None,
    },
    TaskSpec {
        id: "p3b_pay",
        label: Template::Literal("Process SGS Payment"),
        email: None,
    },
    TaskSpec {
        id: "p3b_confirm",
        label: Template::Literal("Request Final COC"),
        email: Some(EmailTemplate {
            subject: Template::Render(coc_subject),
            body: Template::Literal("COC Draft Confirmed. Payment attached. Please issue Final."),
        }),
    },
];

const XPO_TASKS: &[TaskSpec] = &[
    TaskSpec {
        id: "p4_xpo_booking",
        label: Template::Literal("XPO: Confirm Booking"),
        email: None,
    },
    TaskSpec {
        id: "p4_xpo_loading",
        label: Template::Literal("XPO: Confirm Loading"),
        email: None,
    },
    TaskSpec {
        id: "p4_xpo_docs",
        label: Template::Literal("XPO: Send Final Docs"),
        email: Some(EmailTemplate {
            subject: Template::Render(final_docs_subject),
            body: Template::Literal("Please find attached final documents."),
        }),
    },
];

const HMI_TASKS: &[TaskSpec] = &[
    TaskSpec {
        id: "p4_hmi_whatsapp",
        label: Template::Literal("HMI: Send WhatsApp Confirmation"),
        email: None,
    },
    TaskSpec {
        id: "p4_hmi_loading",
        label: Template::Literal("HMI: Confirm Loading"),
        email: None,
    },
];

const MANUAL_FORWARDER_TASKS: &[TaskSpec] = &[
    TaskSpec {
        id: "p4_manual_contact",
        label: Template::Render(manual_forwarder_contact),
        email: None,
    },
    TaskSpec {
        id: "p4_manual_docs",
        label: Template::Render(manual_forwarder_docs),
        email: None,
    },
];

const SKY_SERVICES_TASKS: &[TaskSpec] = &[
    TaskSpec {
        id: "p2_sky_booking",
        label: Template::Literal("Sky Services: Book Fumigation"),
        email: None,
    },
    TaskSpec {
        id: "p2_sky_docs",
        label: Template::Literal("Sky Services: Send Required Docs"),
        email: Some(EmailTemplate {
            subject: Template::Render(sky_docs_subject),
            body: Template::Literal(
                "Please find attached the required documents for fumigation.",
            ),
        }),
    },
    TaskSpec {
        id: "p2_sky_confirm",
        label: Template::Literal("Sky Services: Confirm Fumigation Date"),
        email: None,
    },
];

const SGS_TASKS: &[TaskSpec] = &[
    TaskSpec {
        id: "p2_sgs_booking",
        label: Template::Literal("SGS: Initiate Fumigation"),
        email: None,
    },
    TaskSpec {
        id: "p2_sgs_docs",
        label: Template::Literal("SGS: Submit Documentation"),
        email: Some(EmailTemplate {
            subject: Template::Render(sgs_docs_subject),
            body: Template::Literal(
                "Please find attached the required documents for SGS fumigation.",
            ),
        }),
    },
    TaskSpec {
        id: "p2_sgs_confirm",
        label: Template::Literal("SGS: Receive Fumigation Confirmation"),
        email: None,
    },
];

const MANUAL_FUMIGATION_TASKS: &[TaskSpec] = &[
    TaskSpec {
        id: "p2_manual_fum_contact",
        label: Template::Render(manual_fumigation_contact),
        email: None,
    },
    TaskSpec {
        id: "p2_manual_fum_docs",
        label: Template::Render(manual_fumigation_docs),
        email: None,
    },
    TaskSpec {
        id: "p2_manual_fum_confirm",
        label: Template::Render(manual_fumigation_confirm),
        email: None,
    },
];

/// Task list for the forwarder-handoff phase, keyed on the selected partner
pub fn forwarder_tasks(forwarder: &Forwarder) -> &'static [TaskSpec] {
    match forwarder {
        Forwarder::Xpo => XPO_TASKS,
        Forwarder::Hmi => HMI_TASKS,
        Forwarder::Manual { .. } => MANUAL_FORWARDER_TASKS,
    }
}

/// Task list for the fumigation phase, keyed on the selected provider
pub fn fumigation_tasks(fumigation: &Fumigation) -> &'static [TaskSpec] {
    match fumigation {
        Fumigation::SkyServices => SKY_SERVICES_TASKS,
        Fumigation::Sgs => SGS_TASKS,
        Fumigation::Manual { .. } => MANUAL_FUMIGATION_TASKS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_order_is_fixed() {
        let ids: Vec<_> = Phase::ALL.iter().map(|p| p.id()).collect();
        assert_eq!(
            ids,
            vec![
                "document_intake",
                "fumigation_handoff",
                "fumigation",
                "certification",
                "forwarder_handoff"
            ]
        );
    }

    #[test]
    fn catalog_ids_are_unique() {
        let shipment = Shipment::new("ACME");
        let mut seen = std::collections::HashSet::new();

        for phase in Phase::ALL {
            for spec in phase.tasks(&shipment) {
                assert!(seen.insert(spec.id), "duplicate task id: {}", spec.id);
            }
        }
    }

    #[test]
    fn known_forwarders_get_fixed_lists() {
        let xpo: Vec<_> = forwarder_tasks(&Forwarder::Xpo).iter().map(|t| t.id).collect();
        assert_eq!(xpo, vec!["p4_xpo_booking", "p4_xpo_loading", "p4_xpo_docs"]);

        let hmi: Vec<_> = forwarder_tasks(&Forwarder::Hmi).iter().map(|t| t.id).collect();
        assert_eq!(hmi, vec!["p4_hmi_whatsapp", "p4_hmi_loading"]);
    }

    #[test]
    fn known_fumigation_providers_get_fixed_lists() {
        let sgs: Vec<_> = fumigation_tasks(&Fumigation::Sgs).iter().map(|t| t.id).collect();
        assert_eq!(sgs, vec!["p2_sgs_booking", "p2_sgs_docs", "p2_sgs_confirm"]);

        let sky: Vec<_> = fumigation_tasks(&Fumigation::SkyServices)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(sky, vec!["p2_sky_booking", "p2_sky_docs", "p2_sky_confirm"]);
    }

    #[test]
    fn manual_labels_interpolate_name_and_method() {
        let mut shipment = Shipment::new("ACME");
        shipment.forwarder = Forwarder::manual("Oceanic Freight", "phone");

        let tasks = forwarder_tasks(&shipment.forwarder);
        assert_eq!(
            tasks[0].label.render(&shipment),
            "Oceanic Freight: Contact via phone"
        );
        assert_eq!(tasks[1].label.render(&shipment), "Oceanic Freight: Send Documents");
    }

    #[test]
    fn manual_labels_substitute_placeholders() {
        // Name unset, method set
        let mut shipment = Shipment::new("ACME");
        shipment.forwarder = Forwarder::Manual {
            name: None,
            method: Some("email".into()),
        };

        let tasks = forwarder_tasks(&shipment.forwarder);
        assert_eq!(tasks[0].label.render(&shipment), "Forwarder: Contact via email");
    }

    #[test]
    fn email_templates_render_shipment_data() {
        let mut shipment = Shipment::new("ACME");
        shipment.commercial.invoice = Some("INV-2041".into());

        let p2_mail = FUMIGATION_HANDOFF_TASKS
            .iter()
            .find(|t| t.id == "p2_mail")
            .unwrap();
        let email = p2_mail.email.as_ref().unwrap();

        assert_eq!(email.subject.render(&shipment), "INV INV-2041 Fumigation Request");
        assert_eq!(
            email.body.render(&shipment),
            "Please find Commercial Invoice & Packing List attached."
        );
    }

    #[test]
    fn email_subject_falls_back_to_shipment_id() {
        let shipment = Shipment::new("ACME");

        let p2_mail = FUMIGATION_HANDOFF_TASKS
            .iter()
            .find(|t| t.id == "p2_mail")
            .unwrap();
        let subject = p2_mail.email.as_ref().unwrap().subject.render(&shipment);

        assert_eq!(subject, format!("INV {} Fumigation Request", shipment.id));
    }
}
