//! Frameprobe engine: loads targets into a frame and decides what the host may read.
mod decode;
mod document;
mod engine;
mod fetch;
mod frame;
mod loader;
mod policy;
mod target;
mod types;

pub use decode::{charset_param, decode_html, DecodeError, DecodedHtml};
pub use document::{plain_text_document, snapshot_document, DocumentOrigin};
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use frame::{FrameSettings, LoadedFrame, DEFAULT_HOST_ORIGIN};
pub use loader::FrameLoader;
pub use policy::{check_framing, FrameAccessLevel};
pub use target::{parse_data_uri, resolve_target, DataUri, ResolvedTarget};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, FramingHeaders, Generation,
    LoadError,
};
