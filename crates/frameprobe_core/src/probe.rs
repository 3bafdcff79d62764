//! Best-effort extraction probes against a mounted frame.
//!
//! Every probe yields exactly one [`ExtractionResult`] and at least one
//! [`LogEntry`]. Access refusals are handled at the narrowest read: optional
//! fields get a sentinel, required reads turn the whole probe into an error
//! result of the form `"<context>: <message>"`.

use rand::distributions::Alphanumeric;
use rand::Rng;
use url::Url;

use crate::access::{AccessError, FrameAccess, Guarded};
use crate::{ExtractionResult, LogEntry, Severity};

const PREVIEW_CHARS: usize = 200;
const USER_AGENT_CHARS: usize = 100;
const DOCUMENT_BLOCKED: &str = "Document access blocked (likely cross-origin)";
const FORMS_BLOCKED: &str = "Document access blocked - cannot interact with forms";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Basic,
    Document,
    Network,
    Forms,
}

impl ProbeKind {
    pub const ALL: [ProbeKind; 4] = [
        ProbeKind::Basic,
        ProbeKind::Document,
        ProbeKind::Network,
        ProbeKind::Forms,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProbeKind::Basic => "Basic Properties",
            ProbeKind::Document => "Document Content",
            ProbeKind::Network => "Network Details",
            ProbeKind::Forms => "Form Interaction",
        }
    }
}

/// Everything one probe run contributes to the panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub kind: ProbeKind,
    pub result: ExtractionResult,
    pub logs: Vec<LogEntry>,
}

/// Ordered `key: value` lines of a report.
#[derive(Debug, Default)]
struct Fields(Vec<(&'static str, String)>);

impl Fields {
    fn set(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    fn render(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

struct ReportBuilder {
    kind: ProbeKind,
    logs: Vec<LogEntry>,
}

impl ReportBuilder {
    fn start(kind: ProbeKind, announcement: &str) -> Self {
        Self {
            kind,
            logs: vec![LogEntry::new(announcement, Severity::Info)],
        }
    }

    fn log(&mut self, message: impl Into<String>, severity: Severity) {
        self.logs.push(LogEntry::new(message, severity));
    }

    fn finish(
        mut self,
        title: &str,
        fields: &Fields,
        severity: Severity,
        completion: &str,
    ) -> ProbeReport {
        self.log(completion, Severity::Success);
        ProbeReport {
            kind: self.kind,
            result: ExtractionResult::new(title, fields.render(), severity),
            logs: self.logs,
        }
    }

    fn fail(mut self, title: &str, context: &str, err: &AccessError) -> ProbeReport {
        let message = format!("{context}: {err}");
        self.log(message.clone(), Severity::Error);
        ProbeReport {
            kind: self.kind,
            result: ExtractionResult::new(title, message, Severity::Error),
            logs: self.logs,
        }
    }
}

/// Runs `kind` against the mounted frame; no frame means nothing happens.
pub fn run_probe<R: Rng + ?Sized>(
    kind: ProbeKind,
    frame: Option<&mut dyn FrameAccess>,
    rng: &mut R,
) -> Option<ProbeReport> {
    let frame = frame?;
    Some(match kind {
        ProbeKind::Basic => gather_basic_info(frame),
        ProbeKind::Document => gather_document_info(frame),
        ProbeKind::Network => gather_network_info(frame),
        ProbeKind::Forms => attempt_form_interaction(frame, rng),
    })
}

pub fn gather_basic_info(frame: &dyn FrameAccess) -> ProbeReport {
    let mut report = ReportBuilder::start(
        ProbeKind::Basic,
        "Attempting to gather basic frame information...",
    );

    let element = match frame.element() {
        Ok(element) => element,
        Err(err) => {
            return report.fail("Basic Properties Error", "Error gathering basic info", &err)
        }
    };

    let mut fields = Fields::default();
    fields.set("Source URL", element.src);
    fields.set(
        "Content Window",
        if frame.has_content_window() {
            "Available"
        } else {
            "Not Available"
        },
    );
    fields.set("Width", format!("{}px", element.width));
    fields.set("Height", format!("{}px", element.height));
    fields.set(
        "Loading State",
        if frame.document().is_some() {
            "Loaded"
        } else {
            "Loading/Blocked"
        },
    );

    if frame.has_content_window() {
        match Guarded::read(|| frame.location()) {
            Guarded::Read(location) => {
                fields.set("Window Location", location.href);
                fields.set("Window Origin", location.origin);
            }
            Guarded::Denied(err) => {
                fields.set("Window Location", format!("BLOCKED: {err}"));
                report.log("Cross-origin access blocked for location", Severity::Warning);
            }
        }
    }

    report.finish(
        "Basic Frame Properties",
        &fields,
        Severity::Success,
        "Basic information gathered successfully",
    )
}

pub fn gather_document_info(frame: &dyn FrameAccess) -> ProbeReport {
    let report = ReportBuilder::start(
        ProbeKind::Document,
        "Attempting to access frame document content...",
    );

    let Some(doc) = frame.document() else {
        return report.fail(
            "Document Access Blocked",
            "Cannot access document",
            &AccessError::denied(DOCUMENT_BLOCKED),
        );
    };

    let mut fields = Fields::default();
    let title = doc.title();
    fields.set("Title", if title.is_empty() { "No title" } else { title });
    fields.set("URL", doc.url());
    fields.set("Domain", doc.domain());
    fields.set("Ready State", doc.ready_state());
    fields.set("Character Set", doc.character_set());
    fields.set("Elements Count", doc.element_count().to_string());
    fields.set("Forms Count", doc.forms().len().to_string());
    fields.set("Images Count", doc.image_count().to_string());
    fields.set("Links Count", doc.link_count().to_string());

    let preview = match Guarded::read(|| doc.body_text()) {
        Guarded::Read(Some(text)) => preview_text(&text),
        Guarded::Read(None) => "No body content".to_string(),
        Guarded::Denied(_) => "Access denied".to_string(),
    };
    fields.set("Body Text Preview", preview);

    report.finish(
        "Document Information",
        &fields,
        Severity::Success,
        "Document information accessed successfully",
    )
}

pub fn gather_network_info(frame: &dyn FrameAccess) -> ProbeReport {
    let report = ReportBuilder::start(
        ProbeKind::Network,
        "Gathering network and security information...",
    );

    let element = match frame.element() {
        Ok(element) => element,
        Err(err) => {
            return report.fail(
                "Network Information Error",
                "Error gathering network info",
                &err,
            )
        }
    };
    let host = frame.host();

    let mut fields = Fields::default();
    fields.set("Frame Source", element.src.clone());
    fields.set("Current Origin", host.origin.clone());
    fields.set("Protocol", host.protocol.clone());
    let agent: String = host.user_agent.chars().take(USER_AGENT_CHARS).collect();
    fields.set("User Agent", format!("{agent}..."));

    match frame_origin(&element.src) {
        Some(origin) => {
            let same = if origin == host.origin { "Yes" } else { "No" };
            fields.set("Frame Origin", origin);
            fields.set("Same Origin", same);
        }
        None => fields.set("Frame Origin", "Cannot determine (data URL or invalid)"),
    }

    fields.set(
        "Sandbox Attributes",
        if element.sandbox.is_empty() {
            "None".to_string()
        } else {
            element.sandbox.join(" ")
        },
    );

    if let Some(doc) = frame.document() {
        let referrer = Guarded::read(|| doc.referrer())
            .or_sentinel(|_| "Access blocked".to_string());
        fields.set(
            "Referrer",
            if referrer.is_empty() {
                "None".to_string()
            } else {
                referrer
            },
        );
    }

    report.finish(
        "Network & Security Information",
        &fields,
        Severity::Info,
        "Network information gathered",
    )
}

pub fn attempt_form_interaction<R: Rng + ?Sized>(
    frame: &mut dyn FrameAccess,
    rng: &mut R,
) -> ProbeReport {
    let report = ReportBuilder::start(
        ProbeKind::Forms,
        "Attempting to interact with frame forms...",
    );

    let Some(doc) = frame.document_mut() else {
        return report.fail(
            "Form Interaction Blocked",
            "Cannot interact with forms",
            &AccessError::denied(FORMS_BLOCKED),
        );
    };

    let mut fields = Fields::default();
    fields.set("Forms Found", doc.forms().len().to_string());
    fields.set("Input Elements", doc.input_count().to_string());

    if let Some(first) = doc.forms().first().cloned() {
        fields.set(
            "First Form Action",
            if first.action.is_empty() {
                "No action".to_string()
            } else {
                first.action.clone()
            },
        );
        fields.set(
            "First Form Method",
            if first.method.is_empty() {
                "GET".to_string()
            } else {
                first.method.clone()
            },
        );

        let mut filled = 0usize;
        for (index, input) in first.inputs.iter().enumerate() {
            if input.input_type != "text" && input.input_type != "email" {
                continue;
            }
            let value = format!("Test value {}", placeholder_token(rng));
            if let Err(err) = doc.set_input_value(0, index, value) {
                return report.fail("Form Interaction Blocked", "Cannot interact with forms", &err);
            }
            filled += 1;
        }
        fields.set("Inputs Modified", filled.to_string());
    }

    report.finish(
        "Form Interaction Results",
        &fields,
        Severity::Success,
        "Form interaction completed successfully",
    )
}

/// Tuple origin of an absolute URL; opaque origins (data:, about:) yield `None`.
pub fn frame_origin(src: &str) -> Option<String> {
    let url = Url::parse(src).ok()?;
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

fn preview_text(text: &str) -> String {
    let preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if preview.chars().count() == PREVIEW_CHARS {
        format!("{preview}...")
    } else {
        preview
    }
}

fn placeholder_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..6)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
        .collect()
}
