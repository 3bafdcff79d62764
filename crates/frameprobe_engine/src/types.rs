use std::fmt;

use crate::decode::DecodeError;
use crate::frame::LoadedFrame;

/// Tags a load so completions of superseded loads can be told apart.
pub type Generation = u64;

#[derive(Debug)]
pub enum EngineEvent {
    FrameLoaded {
        generation: Generation,
        frame: Box<LoadedFrame>,
    },
    LoadFailed {
        generation: Generation,
        error: LoadError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
    pub framing: FramingHeaders,
}

/// Response headers that govern whether a page may be framed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FramingHeaders {
    pub x_frame_options: Option<String>,
    pub content_security_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("invalid host origin {0}")]
    InvalidHostOrigin(String),
    #[error("invalid target {target}: {message}")]
    InvalidTarget { target: String, message: String },
    #[error("unsupported scheme {0}")]
    UnsupportedScheme(String),
    #[error("malformed data URI: {0}")]
    MalformedDataUri(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
