use frameprobe_core::{
    AccessError, DocumentSnapshot, FrameAccess, FrameDocument, FrameElement, FrameLocation,
    HostContext,
};
use url::Url;

use crate::fetch::DEFAULT_USER_AGENT;
use crate::policy::FrameAccessLevel;
use crate::LoadError;

pub const DEFAULT_HOST_ORIGIN: &str = "http://127.0.0.1:5000";

/// How the hosting page and its frame element are set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSettings {
    /// Origin of the page that embeds the frame; relative targets resolve here.
    pub host_origin: String,
    pub width: u32,
    pub height: u32,
    /// `sandbox` tokens; empty means no sandbox attribute.
    pub sandbox: Vec<String>,
    pub user_agent: String,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            host_origin: DEFAULT_HOST_ORIGIN.to_string(),
            width: 800,
            height: 384,
            sandbox: Vec::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FrameSettings {
    pub fn host_url(&self) -> Result<Url, LoadError> {
        Url::parse(&self.host_origin)
            .ok()
            .filter(|url| url.origin().is_tuple())
            .ok_or_else(|| LoadError::InvalidHostOrigin(self.host_origin.clone()))
    }

    /// Sandboxed frames get an opaque origin unless `allow-same-origin` is set.
    pub fn sandbox_isolates(&self) -> bool {
        !self.sandbox.is_empty()
            && !self
                .sandbox
                .iter()
                .any(|token| token.eq_ignore_ascii_case("allow-same-origin"))
    }

    pub(crate) fn host_context(&self, host: &Url) -> HostContext {
        HostContext {
            origin: host.origin().ascii_serialization(),
            protocol: format!("{}:", host.scheme()),
            user_agent: self.user_agent.clone(),
        }
    }

    /// Host context from the configured origin text, for when it does not parse.
    pub(crate) fn raw_host_context(&self) -> HostContext {
        let protocol = self
            .host_origin
            .split_once(':')
            .map(|(scheme, _)| format!("{scheme}:"))
            .unwrap_or_default();
        HostContext {
            origin: self.host_origin.clone(),
            protocol,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// A mounted frame element and whatever content finished loading into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFrame {
    pub host: HostContext,
    pub element: FrameElement,
    /// Where the frame's browsing context ended up, after redirects.
    pub location: FrameLocation,
    pub access: FrameAccessLevel,
    pub document: Option<DocumentSnapshot>,
}

impl LoadedFrame {
    /// The bare element while its load is pending or after it failed.
    pub fn unloaded(host: HostContext, element: FrameElement) -> Self {
        Self {
            host,
            location: FrameLocation {
                href: element.src.clone(),
                origin: "null".to_string(),
            },
            element,
            access: FrameAccessLevel::Unloaded,
            document: None,
        }
    }

    pub fn src(&self) -> &str {
        &self.element.src
    }

    pub fn document_reachable(&self) -> bool {
        self.access.is_full() && self.document.is_some()
    }

    fn cross_origin_error(&self) -> AccessError {
        AccessError::denied(format!(
            "Blocked a frame with origin \"{}\" from accessing a cross-origin frame.",
            self.host.origin
        ))
    }
}

impl FrameAccess for LoadedFrame {
    fn host(&self) -> &HostContext {
        &self.host
    }

    fn element(&self) -> Result<FrameElement, AccessError> {
        Ok(self.element.clone())
    }

    fn has_content_window(&self) -> bool {
        true
    }

    fn location(&self) -> Result<FrameLocation, AccessError> {
        if self.access.is_full() {
            Ok(self.location.clone())
        } else {
            Err(self.cross_origin_error())
        }
    }

    fn document(&self) -> Option<&dyn FrameDocument> {
        if !self.access.is_full() {
            return None;
        }
        self.document.as_ref().map(|doc| doc as &dyn FrameDocument)
    }

    fn document_mut(&mut self) -> Option<&mut dyn FrameDocument> {
        if !self.access.is_full() {
            return None;
        }
        self.document
            .as_mut()
            .map(|doc| doc as &mut dyn FrameDocument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_isolation_needs_tokens_without_same_origin() {
        let mut settings = FrameSettings::default();
        assert!(!settings.sandbox_isolates());
        settings.sandbox = vec!["allow-scripts".into()];
        assert!(settings.sandbox_isolates());
        settings.sandbox.push("allow-same-origin".into());
        assert!(!settings.sandbox_isolates());
    }

    #[test]
    fn host_origin_must_be_a_tuple_origin() {
        let settings = FrameSettings {
            host_origin: "data:text/plain,x".into(),
            ..FrameSettings::default()
        };
        assert!(matches!(
            settings.host_url(),
            Err(LoadError::InvalidHostOrigin(_))
        ));
    }

    #[test]
    fn unloaded_frame_exposes_only_its_element() {
        let settings = FrameSettings::default();
        let host = settings.host_url().unwrap();
        let element = FrameElement {
            src: "https://example.com/".into(),
            width: 800,
            height: 384,
            sandbox: Vec::new(),
        };
        let frame = LoadedFrame::unloaded(settings.host_context(&host), element.clone());

        assert_eq!(frame.element().unwrap(), element);
        assert!(frame.has_content_window());
        assert!(frame.document().is_none());
        assert!(!frame.document_reachable());
        assert!(matches!(
            frame.location(),
            Err(AccessError::AccessDenied { .. })
        ));
    }

    #[test]
    fn host_context_reports_protocol_with_colon() {
        let settings = FrameSettings::default();
        let host = settings.host_url().unwrap();
        let context = settings.host_context(&host);
        assert_eq!(context.origin, "http://127.0.0.1:5000");
        assert_eq!(context.protocol, "http:");
    }
}
