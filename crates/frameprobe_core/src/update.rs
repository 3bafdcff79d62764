use std::time::Duration;

use crate::presets::{preset_target, BLOCKED_PRESET};
use crate::{AppState, Effect, LogEntry, Msg, Severity};

/// Delay before a preset reload, so the new target is committed first.
pub const PRESET_RELOAD_DELAY: Duration = Duration::from_millis(100);
/// Delay before checking whether a loaded frame's content was blocked.
pub const BLOCK_CHECK_DELAY: Duration = Duration::from_millis(1000);

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TargetEdited(target) => {
            state.set_target(target);
            Vec::new()
        }
        Msg::LoadRequested => load_frame(&mut state),
        Msg::PresetSelected(name) => {
            let Some(target) = preset_target(&name) else {
                return (state, Vec::new());
            };
            state.set_target(target.to_string());
            if name == BLOCKED_PRESET {
                state.log(
                    "Loading blocked test page (demonstrates X-Frame-Options: DENY)",
                    Severity::Warning,
                );
            }
            vec![Effect::Schedule {
                delay: PRESET_RELOAD_DELAY,
                msg: Msg::LoadRequested,
            }]
        }
        Msg::FrameLoaded { generation, source } => {
            if state.pending_load(generation).is_none() {
                return (state, Vec::new());
            }
            state.record_loaded_source(generation, source);
            state.set_status("Loaded", Severity::Success);
            state.log("Frame loaded successfully", Severity::Success);
            vec![Effect::Schedule {
                delay: BLOCK_CHECK_DELAY,
                msg: Msg::BlockCheckDue { generation },
            }]
        }
        Msg::FrameLoadFailed {
            generation,
            message,
        } => {
            if state.pending_load(generation).is_none() {
                return (state, Vec::new());
            }
            state.set_status("Load Error", Severity::Error);
            state.log(format!("Failed to load frame: {message}"), Severity::Error);
            Vec::new()
        }
        Msg::BlockCheckDue { generation } => {
            if state.pending_load(generation).is_none() {
                Vec::new()
            } else {
                vec![Effect::CheckDocument { generation }]
            }
        }
        Msg::BlockCheckCompleted {
            generation,
            document_reachable,
        } => {
            let looks_networked = state
                .pending_load(generation)
                .is_some_and(|load| load.source.starts_with("http"));
            if looks_networked && !document_reachable {
                state.log(
                    "Content may be blocked by X-Frame-Options or CSP headers",
                    Severity::Warning,
                );
                state.set_status("Content Blocked", Severity::Warning);
            }
            Vec::new()
        }
        Msg::ProbeRequested(kind) => vec![Effect::RunProbe(kind)],
        Msg::ProbeCompleted(report) => {
            for entry in report.logs {
                state.push_log_entry(entry);
            }
            state.push_result(report.result);
            Vec::new()
        }
        Msg::ClearResults => {
            state.clear_results();
            state.log("Results cleared", Severity::Info);
            Vec::new()
        }
        Msg::ClearConsole => {
            state.reset_console(LogEntry::new("Console cleared", Severity::Info));
            Vec::new()
        }
    };

    (state, effects)
}

fn load_frame(state: &mut AppState) -> Vec<Effect> {
    let target = state.target().trim().to_string();
    if target.is_empty() {
        state.log("Please enter a URL", Severity::Error);
        return Vec::new();
    }

    state.set_status("Loading...", Severity::Warning);
    state.log(format!("Loading frame with URL: {target}"), Severity::Info);
    let generation = state.begin_load();
    vec![Effect::LoadFrame { generation, target }]
}
