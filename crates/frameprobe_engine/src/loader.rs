use std::sync::Arc;

use frameprobe_core::{DocumentSnapshot, FrameElement, FrameLocation};
use frameprobe_logging::{probe_debug, probe_info, probe_warn};
use url::Url;

use crate::decode::{charset_param, decode_html};
use crate::document::{plain_text_document, snapshot_document, DocumentOrigin};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::frame::{FrameSettings, LoadedFrame};
use crate::policy::{check_framing, FrameAccessLevel};
use crate::target::{resolve_target, DataUri, ResolvedTarget};
use crate::LoadError;

const BLANK_DOCUMENT: &str = "<html><head></head><body></body></html>";

/// Loads targets into a frame the way a browser would, minus rendering.
#[derive(Clone)]
pub struct FrameLoader {
    fetcher: Arc<dyn Fetcher>,
    settings: FrameSettings,
}

impl FrameLoader {
    pub fn new(fetch: FetchSettings, settings: FrameSettings) -> Self {
        let fetch = FetchSettings {
            user_agent: settings.user_agent.clone(),
            ..fetch
        };
        Self::with_fetcher(Arc::new(ReqwestFetcher::new(fetch)), settings)
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, settings: FrameSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn settings(&self) -> &FrameSettings {
        &self.settings
    }

    pub async fn load(&self, target: &str) -> Result<LoadedFrame, LoadError> {
        let host = self.settings.host_url()?;
        let resolved = resolve_target(target, &host)?;
        probe_debug!("loading {} into frame", resolved.src());

        let frame = match &resolved {
            ResolvedTarget::Http(url) => self.load_http(url, &host).await?,
            ResolvedTarget::Data { src, data } => self.load_data(src, data, &host)?,
            ResolvedTarget::Blank { src } => self.load_blank(src, &host),
        };

        match &frame.access {
            FrameAccessLevel::Blocked { reason } => probe_warn!("{reason}"),
            access if access.is_full() => probe_info!("frame loaded {}", frame.src()),
            _ => probe_info!("frame loaded cross-origin content {}", frame.src()),
        }
        Ok(frame)
    }

    /// The frame element for `target` before any content has loaded into it.
    ///
    /// Unresolvable targets keep their raw text as the element's source.
    pub fn unloaded_frame(&self, target: &str) -> LoadedFrame {
        let host = self.settings.host_url().ok();
        let src = host
            .as_ref()
            .and_then(|host| resolve_target(target, host).ok())
            .map_or_else(|| target.to_string(), |resolved| resolved.src().to_string());
        let context = match &host {
            Some(host) => self.settings.host_context(host),
            None => self.settings.raw_host_context(),
        };
        LoadedFrame::unloaded(context, self.element(&src))
    }

    async fn load_http(&self, url: &Url, host: &Url) -> Result<LoadedFrame, LoadError> {
        let output = self.fetcher.fetch(url).await?;
        let metadata = output.metadata;
        let final_url = Url::parse(&metadata.final_url).unwrap_or_else(|_| url.clone());
        let host_origin = host.origin();

        let access = match check_framing(&metadata.framing, &final_url, &host_origin) {
            Err(reason) => FrameAccessLevel::Blocked { reason },
            Ok(()) if self.settings.sandbox_isolates() => FrameAccessLevel::CrossOrigin,
            Ok(()) if final_url.origin() == host_origin => FrameAccessLevel::Full,
            Ok(()) => FrameAccessLevel::CrossOrigin,
        };

        let document = if matches!(access, FrameAccessLevel::Blocked { .. }) {
            None
        } else {
            let content_type = metadata.content_type.as_deref().unwrap_or("text/html");
            let decoded = decode_html(&output.bytes, charset_param(content_type).as_deref())?;
            let html = if is_plain_text(content_type) {
                plain_text_document(&decoded.html)
            } else {
                decoded.html
            };
            let referrer = format!("{}/", host_origin.ascii_serialization());
            Some(snapshot_document(
                &html,
                &DocumentOrigin {
                    url: final_url.as_str(),
                    character_set: &decoded.encoding_label,
                    referrer: &referrer,
                },
            ))
        };

        Ok(LoadedFrame {
            host: self.settings.host_context(host),
            element: self.element(url.as_str()),
            location: FrameLocation {
                href: final_url.to_string(),
                origin: final_url.origin().ascii_serialization(),
            },
            access,
            document,
        })
    }

    fn load_data(&self, src: &str, data: &DataUri, host: &Url) -> Result<LoadedFrame, LoadError> {
        let decoded = decode_html(&data.body, data.charset.as_deref())?;
        let html = if data.is_html() {
            decoded.html
        } else {
            plain_text_document(&decoded.html)
        };
        let document = snapshot_document(
            &html,
            &DocumentOrigin {
                url: src,
                character_set: &decoded.encoding_label,
                referrer: "",
            },
        );
        Ok(self.inline_frame(src, "null", document, host))
    }

    fn load_blank(&self, src: &str, host: &Url) -> LoadedFrame {
        let document = snapshot_document(
            BLANK_DOCUMENT,
            &DocumentOrigin {
                url: src,
                character_set: "UTF-8",
                referrer: "",
            },
        );
        let origin = host.origin().ascii_serialization();
        self.inline_frame(src, &origin, document, host)
    }

    fn inline_frame(
        &self,
        src: &str,
        origin: &str,
        document: DocumentSnapshot,
        host: &Url,
    ) -> LoadedFrame {
        let access = if self.settings.sandbox_isolates() {
            FrameAccessLevel::CrossOrigin
        } else {
            FrameAccessLevel::Full
        };
        LoadedFrame {
            host: self.settings.host_context(host),
            element: self.element(src),
            location: FrameLocation {
                href: src.to_string(),
                origin: origin.to_string(),
            },
            access,
            document: Some(document),
        }
    }

    fn element(&self, src: &str) -> FrameElement {
        FrameElement {
            src: src.to_string(),
            width: self.settings.width,
            height: self.settings.height,
            sandbox: self.settings.sandbox.clone(),
        }
    }
}

fn is_plain_text(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/plain"))
}
