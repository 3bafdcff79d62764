//! Same-origin and framing rules applied to a loaded frame.
//!
//! `frame-ancestors` in a Content-Security-Policy takes precedence over
//! `X-Frame-Options`; the legacy header is only consulted when no policy
//! carries the directive.

use url::{Origin, Url};

use crate::FramingHeaders;

/// How much of a loaded frame the host may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameAccessLevel {
    /// Same origin: location and document are readable.
    Full,
    /// Rendered, but on another origin.
    CrossOrigin,
    /// The page refused to be framed; the frame shows an error document.
    Blocked { reason: String },
    /// The element exists but no content has finished loading into it.
    Unloaded,
}

impl FrameAccessLevel {
    pub fn is_full(&self) -> bool {
        matches!(self, FrameAccessLevel::Full)
    }
}

/// Decides whether a response may be displayed inside a frame on `host`.
///
/// Returns the refusal message a browser would report when framing is denied.
pub fn check_framing(
    headers: &FramingHeaders,
    frame_url: &Url,
    host: &Origin,
) -> Result<(), String> {
    let frame_origin = frame_url.origin();

    if let Some(csp) = headers.content_security_policy.as_deref() {
        let mut saw_directive = false;
        for sources in frame_ancestors_directives(csp) {
            saw_directive = true;
            if !ancestors_allow(&sources, &frame_origin, host) {
                let directive = if sources.is_empty() {
                    "frame-ancestors".to_string()
                } else {
                    format!("frame-ancestors {}", sources.join(" "))
                };
                return Err(format!(
                    "Refused to frame '{frame_url}' because an ancestor violates the following Content Security Policy directive: \"{directive}\"."
                ));
            }
        }
        if saw_directive {
            return Ok(());
        }
    }

    if let Some(value) = headers.x_frame_options.as_deref() {
        let first = value.split(',').next().unwrap_or(value).trim().to_ascii_lowercase();
        let denied = match first.as_str() {
            "deny" => true,
            "sameorigin" => frame_origin != *host,
            _ => false,
        };
        if denied {
            return Err(format!(
                "Refused to display '{frame_url}' in a frame because it set 'X-Frame-Options' to '{first}'."
            ));
        }
    }

    Ok(())
}

/// Source lists of every `frame-ancestors` directive across comma-joined policies.
fn frame_ancestors_directives(csp: &str) -> Vec<Vec<String>> {
    csp.split(',')
        .filter_map(|policy| {
            policy.split(';').find_map(|directive| {
                let mut tokens = directive.split_ascii_whitespace();
                let name = tokens.next()?;
                name.eq_ignore_ascii_case("frame-ancestors")
                    .then(|| tokens.map(str::to_string).collect())
            })
        })
        .collect()
}

fn ancestors_allow(sources: &[String], frame_origin: &Origin, host: &Origin) -> bool {
    sources.iter().any(|source| source_matches(source, frame_origin, host))
}

fn source_matches(source: &str, frame_origin: &Origin, host: &Origin) -> bool {
    let Origin::Tuple(host_scheme, host_name, host_port) = host else {
        return false;
    };
    let lowered = source.to_ascii_lowercase();
    match lowered.as_str() {
        "'none'" => false,
        "'self'" => frame_origin == host,
        "*" => true,
        scheme if scheme.ends_with(':') && !scheme.contains('/') => {
            scheme.trim_end_matches(':') == *host_scheme
        }
        expression => {
            let (scheme, rest) = match expression.split_once("://") {
                Some((scheme, rest)) => (Some(scheme), rest),
                None => (None, expression),
            };
            if scheme.is_some_and(|scheme| scheme != *host_scheme) {
                return false;
            }
            let authority = rest.split('/').next().unwrap_or(rest);
            let (name, port) = match authority.rsplit_once(':') {
                Some((name, port)) => (name, Some(port)),
                None => (authority, None),
            };
            let host_text = host_name.to_string();
            let name_ok = match name.strip_prefix("*.") {
                Some(suffix) => host_text.ends_with(&format!(".{suffix}")),
                None => host_text == name,
            };
            let port_ok = match port {
                None => Some(*host_port) == default_port(host_scheme),
                Some("*") => true,
                Some(port) => port.parse::<u16>().ok() == Some(*host_port),
            };
            name_ok && port_ok
        }
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}
