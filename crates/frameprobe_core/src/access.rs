//! The frame surface that probes read from.
//!
//! A mounted frame exposes two kinds of state: element attributes the host can
//! always read, and privileged state (location, document) that the same-origin
//! policy may withhold. Privileged reads return [`AccessError`] instead of
//! panicking so each probe can degrade or fail locally.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The same-origin policy refused the read.
    #[error("{message}")]
    AccessDenied { message: String },
    /// The frame element is no longer attached to the host page.
    #[error("frame element is detached")]
    Detached,
}

impl AccessError {
    pub fn denied(message: impl Into<String>) -> Self {
        Self::AccessDenied {
            message: message.into(),
        }
    }
}

/// Attributes of the frame element itself, readable regardless of origin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameElement {
    /// Absolute content source as the element reports it.
    pub src: String,
    pub width: u32,
    pub height: u32,
    /// Sandbox tokens in declaration order; empty when the attribute is absent.
    pub sandbox: Vec<String>,
}

/// What the hosting page knows about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    pub origin: String,
    pub protocol: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLocation {
    pub href: String,
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputField {
    pub name: Option<String>,
    /// Lowercased `type` attribute; `text` when absent.
    pub input_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInfo {
    /// Resolved `action`, empty when the attribute is absent.
    pub action: String,
    /// Lowercased `method`, empty when the attribute is absent.
    pub method: String,
    pub inputs: Vec<InputField>,
}

/// Read/write surface of a frame's internal document.
pub trait FrameDocument {
    fn title(&self) -> &str;
    fn url(&self) -> &str;
    fn domain(&self) -> &str;
    fn ready_state(&self) -> &str;
    fn character_set(&self) -> &str;
    fn element_count(&self) -> usize;
    fn image_count(&self) -> usize;
    fn link_count(&self) -> usize;
    /// Every `<input>` in the document, inside a form or not.
    fn input_count(&self) -> usize;
    fn forms(&self) -> &[FormInfo];
    /// Rendered body text, `None` when the document has no body.
    fn body_text(&self) -> Result<Option<String>, AccessError>;
    fn referrer(&self) -> Result<String, AccessError>;
    fn set_input_value(
        &mut self,
        form_index: usize,
        input_index: usize,
        value: String,
    ) -> Result<(), AccessError>;
}

/// Capability to inspect a mounted frame.
///
/// Implementations decide access the way a browser would; test doubles can
/// raise [`AccessError::AccessDenied`] for any privileged read.
pub trait FrameAccess {
    fn host(&self) -> &HostContext;
    fn element(&self) -> Result<FrameElement, AccessError>;
    fn has_content_window(&self) -> bool;
    fn location(&self) -> Result<FrameLocation, AccessError>;
    /// `None` when the document is not reachable from the host.
    fn document(&self) -> Option<&dyn FrameDocument>;
    fn document_mut(&mut self) -> Option<&mut dyn FrameDocument>;
}

/// Outcome of a single privileged read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    Read(T),
    Denied(AccessError),
}

impl<T> Guarded<T> {
    /// Performs `read`, capturing a refusal as [`Guarded::Denied`].
    pub fn read(read: impl FnOnce() -> Result<T, AccessError>) -> Self {
        match read() {
            Ok(value) => Self::Read(value),
            Err(err) => Self::Denied(err),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    /// Collapses to the read value or a sentinel built from the refusal.
    pub fn or_sentinel(self, sentinel: impl FnOnce(&AccessError) -> T) -> T {
        match self {
            Self::Read(value) => value,
            Self::Denied(err) => sentinel(&err),
        }
    }
}

/// Plain-data document used by loaders that snapshot a parsed page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentSnapshot {
    pub title: String,
    pub url: String,
    pub domain: String,
    pub ready_state: String,
    pub character_set: String,
    pub element_count: usize,
    pub image_count: usize,
    pub link_count: usize,
    pub input_count: usize,
    pub forms: Vec<FormInfo>,
    pub body_text: Option<String>,
    pub referrer: String,
}

impl FrameDocument for DocumentSnapshot {
    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn domain(&self) -> &str {
        &self.domain
    }

    fn ready_state(&self) -> &str {
        &self.ready_state
    }

    fn character_set(&self) -> &str {
        &self.character_set
    }

    fn element_count(&self) -> usize {
        self.element_count
    }

    fn image_count(&self) -> usize {
        self.image_count
    }

    fn link_count(&self) -> usize {
        self.link_count
    }

    fn input_count(&self) -> usize {
        self.input_count
    }

    fn forms(&self) -> &[FormInfo] {
        &self.forms
    }

    fn body_text(&self) -> Result<Option<String>, AccessError> {
        Ok(self.body_text.clone())
    }

    fn referrer(&self) -> Result<String, AccessError> {
        Ok(self.referrer.clone())
    }

    fn set_input_value(
        &mut self,
        form_index: usize,
        input_index: usize,
        value: String,
    ) -> Result<(), AccessError> {
        let input = self
            .forms
            .get_mut(form_index)
            .and_then(|form| form.inputs.get_mut(input_index))
            .ok_or(AccessError::Detached)?;
        input.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_read_substitutes_sentinel_on_denial() {
        let read: Guarded<String> = Guarded::read(|| Err(AccessError::denied("cross-origin")));
        assert!(read.is_denied());
        let value = read.or_sentinel(|err| format!("BLOCKED: {err}"));
        assert_eq!(value, "BLOCKED: cross-origin");
    }

    #[test]
    fn guarded_read_keeps_value() {
        let read = Guarded::read(|| Ok::<_, AccessError>(7));
        assert_eq!(read.or_sentinel(|_| 0), 7);
    }

    #[test]
    fn snapshot_rejects_unknown_input() {
        let mut doc = DocumentSnapshot::default();
        let err = doc.set_input_value(0, 0, "x".into()).unwrap_err();
        assert_eq!(err, AccessError::Detached);
    }
}
