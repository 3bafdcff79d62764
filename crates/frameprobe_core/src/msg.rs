use crate::{ProbeKind, ProbeReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the target reference.
    TargetEdited(String),
    /// User asked to (re)load the frame with the current target.
    LoadRequested,
    /// User picked a named preset.
    PresetSelected(String),
    /// The frame finished loading; `source` is the absolute source it reports.
    FrameLoaded { generation: u64, source: String },
    /// The frame failed to load.
    FrameLoadFailed { generation: u64, message: String },
    /// The delayed post-load check is due.
    BlockCheckDue { generation: u64 },
    /// Result of the delayed post-load check.
    BlockCheckCompleted {
        generation: u64,
        document_reachable: bool,
    },
    /// User triggered a probe.
    ProbeRequested(ProbeKind),
    /// A probe ran against the mounted frame.
    ProbeCompleted(ProbeReport),
    /// User cleared the results panel.
    ClearResults,
    /// User cleared the console panel.
    ClearConsole,
}
