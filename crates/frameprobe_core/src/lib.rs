//! Frameprobe core: pure state machine, probes and view-model helpers.
mod access;
mod effect;
mod msg;
mod presets;
mod probe;
mod state;
mod update;
mod view_model;

pub use access::{
    AccessError, DocumentSnapshot, FormInfo, FrameAccess, FrameDocument, FrameElement,
    FrameLocation, Guarded, HostContext, InputField,
};
pub use effect::Effect;
pub use msg::Msg;
pub use presets::{preset_target, BLOCKED_PRESET, PRESETS};
pub use probe::{
    attempt_form_interaction, frame_origin, gather_basic_info, gather_document_info,
    gather_network_info, run_probe, ProbeKind, ProbeReport,
};
pub use state::{AppState, ExtractionResult, FrameStatus, LogEntry, Severity, DEFAULT_TARGET};
pub use update::{update, BLOCK_CHECK_DELAY, PRESET_RELOAD_DELAY};
pub use view_model::{severity_class, AppViewModel, ConsoleLineView, ResultCardView};
