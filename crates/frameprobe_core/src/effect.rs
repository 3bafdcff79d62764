use std::time::Duration;

use crate::{Msg, ProbeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Point the frame at `target`; completion comes back tagged with `generation`.
    LoadFrame { generation: u64, target: String },
    /// Deliver `msg` after `delay`.
    Schedule { delay: Duration, msg: Msg },
    /// Report whether the mounted frame's document is reachable.
    CheckDocument { generation: u64 },
    /// Run a probe against the mounted frame, if any.
    RunProbe(ProbeKind),
}
