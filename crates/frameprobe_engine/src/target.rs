//! Turns a user-entered target reference into something loadable.

use base64::Engine as _;
use url::{ParseError, Url};

use crate::LoadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// Network document; relative targets are joined onto the host origin.
    Http(Url),
    /// Inline document carried in the target itself.
    Data { src: String, data: DataUri },
    /// `about:` document with no content.
    Blank { src: String },
}

impl ResolvedTarget {
    /// Source string the frame element reports.
    pub fn src(&self) -> &str {
        match self {
            ResolvedTarget::Http(url) => url.as_str(),
            ResolvedTarget::Data { src, .. } | ResolvedTarget::Blank { src } => src.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Lowercased media type; `text/plain` when omitted.
    pub mime_type: String,
    pub charset: Option<String>,
    pub body: Vec<u8>,
}

impl DataUri {
    pub fn is_html(&self) -> bool {
        matches!(self.mime_type.as_str(), "text/html" | "application/xhtml+xml")
    }
}

pub fn resolve_target(target: &str, host: &Url) -> Result<ResolvedTarget, LoadError> {
    let target = target.trim();
    if has_scheme(target, "data") {
        let data = parse_data_uri(target)?;
        return Ok(ResolvedTarget::Data {
            src: target.to_string(),
            data,
        });
    }
    if has_scheme(target, "about") {
        return Ok(ResolvedTarget::Blank {
            src: target.to_string(),
        });
    }

    match Url::parse(target) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(ResolvedTarget::Http(url)),
        Ok(url) => Err(LoadError::UnsupportedScheme(url.scheme().to_string())),
        Err(ParseError::RelativeUrlWithoutBase) => host
            .join(target)
            .map(ResolvedTarget::Http)
            .map_err(|err| invalid(target, err)),
        Err(err) => Err(invalid(target, err)),
    }
}

/// Parses `data:[<mediatype>][;base64],<data>`.
pub fn parse_data_uri(uri: &str) -> Result<DataUri, LoadError> {
    let rest = uri
        .get("data:".len()..)
        .filter(|_| has_scheme(uri, "data"))
        .ok_or_else(|| LoadError::MalformedDataUri("missing data: scheme".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| LoadError::MalformedDataUri("missing ',' separator".into()))?;

    let mut params = meta.split(';').map(str::trim);
    let mime_type = match params.next() {
        Some(mime) if !mime.is_empty() => mime.to_ascii_lowercase(),
        _ => "text/plain".to_string(),
    };
    let mut charset = None;
    let mut is_base64 = false;
    for param in params {
        if param.eq_ignore_ascii_case("base64") {
            is_base64 = true;
        } else if let Some((key, value)) = param.split_once('=') {
            if key.trim().eq_ignore_ascii_case("charset") {
                charset = Some(value.trim().to_string());
            }
        }
    }

    let decoded = urlencoding::decode_binary(payload.as_bytes()).into_owned();
    let body = if is_base64 {
        let compact: Vec<u8> = decoded
            .into_iter()
            .filter(|byte| !byte.is_ascii_whitespace())
            .collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|err| LoadError::MalformedDataUri(err.to_string()))?
    } else {
        decoded
    };

    Ok(DataUri {
        mime_type,
        charset,
        body,
    })
}

fn has_scheme(target: &str, scheme: &str) -> bool {
    let bytes = target.as_bytes();
    bytes.len() > scheme.len()
        && bytes[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
        && bytes[scheme.len()] == b':'
}

fn invalid(target: &str, err: ParseError) -> LoadError {
    LoadError::InvalidTarget {
        target: target.to_string(),
        message: err.to_string(),
    }
}
