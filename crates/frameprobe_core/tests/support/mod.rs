#![allow(dead_code)]

use frameprobe_core::{
    AccessError, DocumentSnapshot, FormInfo, FrameAccess, FrameDocument, FrameElement,
    FrameLocation, HostContext, InputField,
};

pub const HOST_ORIGIN: &str = "http://127.0.0.1:5000";
pub const CROSS_ORIGIN_MESSAGE: &str =
    "Blocked a frame with origin \"http://127.0.0.1:5000\" from accessing a cross-origin frame.";

/// Frame double whose privileged reads can be switched off.
pub struct FakeFrame {
    pub host: HostContext,
    pub element: Result<FrameElement, AccessError>,
    pub document: Option<FakeDocument>,
    pub location_denied: bool,
}

impl FakeFrame {
    pub fn same_origin(path: &str, document: DocumentSnapshot) -> Self {
        Self {
            host: host(),
            element: Ok(FrameElement {
                src: format!("{HOST_ORIGIN}{path}"),
                width: 800,
                height: 384,
                sandbox: Vec::new(),
            }),
            document: Some(FakeDocument::new(document)),
            location_denied: false,
        }
    }

    pub fn cross_origin(src: &str) -> Self {
        Self {
            host: host(),
            element: Ok(FrameElement {
                src: src.to_string(),
                width: 800,
                height: 384,
                sandbox: Vec::new(),
            }),
            document: None,
            location_denied: true,
        }
    }
}

impl FrameAccess for FakeFrame {
    fn host(&self) -> &HostContext {
        &self.host
    }

    fn element(&self) -> Result<FrameElement, AccessError> {
        self.element.clone()
    }

    fn has_content_window(&self) -> bool {
        true
    }

    fn location(&self) -> Result<FrameLocation, AccessError> {
        if self.location_denied {
            return Err(AccessError::denied(CROSS_ORIGIN_MESSAGE));
        }
        let src = self.element.clone()?.src;
        Ok(FrameLocation {
            href: src,
            origin: HOST_ORIGIN.to_string(),
        })
    }

    fn document(&self) -> Option<&dyn FrameDocument> {
        self.document.as_ref().map(|doc| doc as &dyn FrameDocument)
    }

    fn document_mut(&mut self) -> Option<&mut dyn FrameDocument> {
        self.document
            .as_mut()
            .map(|doc| doc as &mut dyn FrameDocument)
    }
}

/// Document double that can refuse the body and referrer reads.
pub struct FakeDocument {
    pub inner: DocumentSnapshot,
    pub deny_body: bool,
    pub deny_referrer: bool,
}

impl FakeDocument {
    pub fn new(inner: DocumentSnapshot) -> Self {
        Self {
            inner,
            deny_body: false,
            deny_referrer: false,
        }
    }
}

impl FrameDocument for FakeDocument {
    fn title(&self) -> &str {
        self.inner.title()
    }

    fn url(&self) -> &str {
        self.inner.url()
    }

    fn domain(&self) -> &str {
        self.inner.domain()
    }

    fn ready_state(&self) -> &str {
        self.inner.ready_state()
    }

    fn character_set(&self) -> &str {
        self.inner.character_set()
    }

    fn element_count(&self) -> usize {
        self.inner.element_count()
    }

    fn image_count(&self) -> usize {
        self.inner.image_count()
    }

    fn link_count(&self) -> usize {
        self.inner.link_count()
    }

    fn input_count(&self) -> usize {
        self.inner.input_count()
    }

    fn forms(&self) -> &[FormInfo] {
        self.inner.forms()
    }

    fn body_text(&self) -> Result<Option<String>, AccessError> {
        if self.deny_body {
            return Err(AccessError::denied("body is not readable"));
        }
        self.inner.body_text()
    }

    fn referrer(&self) -> Result<String, AccessError> {
        if self.deny_referrer {
            return Err(AccessError::denied("referrer is not readable"));
        }
        self.inner.referrer()
    }

    fn set_input_value(
        &mut self,
        form_index: usize,
        input_index: usize,
        value: String,
    ) -> Result<(), AccessError> {
        self.inner.set_input_value(form_index, input_index, value)
    }
}

pub fn host() -> HostContext {
    HostContext {
        origin: HOST_ORIGIN.to_string(),
        protocol: "http:".to_string(),
        user_agent: "frameprobe-test-agent".to_string(),
    }
}

pub fn sample_document() -> DocumentSnapshot {
    DocumentSnapshot {
        title: "Same Origin Test".to_string(),
        url: format!("{HOST_ORIGIN}/api/test-pages/same-origin"),
        domain: "127.0.0.1".to_string(),
        ready_state: "complete".to_string(),
        character_set: "UTF-8".to_string(),
        element_count: 12,
        image_count: 1,
        link_count: 2,
        input_count: 0,
        forms: Vec::new(),
        body_text: Some("Hello from the same origin".to_string()),
        referrer: format!("{HOST_ORIGIN}/"),
    }
}

pub fn form_document() -> DocumentSnapshot {
    let input = |input_type: &str, name: &str| InputField {
        name: Some(name.to_string()),
        input_type: input_type.to_string(),
        value: String::new(),
    };
    DocumentSnapshot {
        input_count: 5,
        forms: vec![FormInfo {
            action: format!("{HOST_ORIGIN}/api/test-pages/form-handler"),
            method: "post".to_string(),
            inputs: vec![
                input("text", "name"),
                input("email", "email"),
                input("password", "secret"),
                input("checkbox", "agree"),
            ],
        }],
        ..sample_document()
    }
}
