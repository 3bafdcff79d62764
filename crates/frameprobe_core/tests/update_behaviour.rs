use std::sync::Once;

use frameprobe_core::{
    update, AppState, Effect, Msg, Severity, BLOCK_CHECK_DELAY, PRESETS, PRESET_RELOAD_DELAY,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(frameprobe_logging::initialize_for_tests);
}

fn start_load(state: AppState, target: &str) -> (AppState, u64) {
    let (state, _) = update(state, Msg::TargetEdited(target.to_string()));
    let (state, effects) = update(state, Msg::LoadRequested);
    let generation = match effects.as_slice() {
        [Effect::LoadFrame { generation, .. }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };
    (state, generation)
}

#[test]
fn initial_state_seeds_console() {
    init_logging();
    let state = AppState::new();

    assert_eq!(state.console().len(), 2);
    assert_eq!(state.console()[0].severity, Severity::Success);
    assert_eq!(state.console()[1].severity, Severity::Info);
    assert!(state.results().is_empty());
    assert_eq!(state.frame_status().label, "Ready");
    assert!(state.target().starts_with("data:text/html,"));
}

#[test]
fn empty_target_logs_one_error_and_keeps_status() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::TargetEdited(String::new()));
    let status_before = state.frame_status().clone();
    let console_before = state.console().len();

    let (state, effects) = update(state, Msg::LoadRequested);

    assert!(effects.is_empty());
    assert_eq!(state.frame_status(), &status_before);
    assert_eq!(state.console().len(), console_before + 1);
    let last = state.console().last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert_eq!(last.message, "Please enter a URL");
}

#[test]
fn load_sets_loading_status_and_emits_effect() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::TargetEdited("https://example.com".into()));
    let (state, effects) = update(state, Msg::LoadRequested);

    assert_eq!(
        effects,
        vec![Effect::LoadFrame {
            generation: 1,
            target: "https://example.com".into(),
        }]
    );
    assert_eq!(state.frame_status().label, "Loading...");
    assert_eq!(state.frame_status().severity, Severity::Warning);
    assert_eq!(
        state.console().last().unwrap().message,
        "Loading frame with URL: https://example.com"
    );
}

#[test]
fn frame_loaded_marks_success_and_schedules_check() {
    init_logging();
    let (state, generation) = start_load(AppState::new(), "https://example.com");

    let (state, effects) = update(
        state,
        Msg::FrameLoaded {
            generation,
            source: "https://example.com/".into(),
        },
    );

    assert_eq!(state.frame_status().label, "Loaded");
    assert_eq!(state.frame_status().severity, Severity::Success);
    assert_eq!(
        effects,
        vec![Effect::Schedule {
            delay: BLOCK_CHECK_DELAY,
            msg: Msg::BlockCheckDue { generation },
        }]
    );

    let (_state, effects) = update(
        state,
        Msg::BlockCheckDue { generation },
    );
    assert_eq!(effects, vec![Effect::CheckDocument { generation }]);
}

#[test]
fn unreachable_networked_document_is_downgraded() {
    init_logging();
    let (state, generation) = start_load(AppState::new(), "https://example.com");
    let (state, _) = update(
        state,
        Msg::FrameLoaded {
            generation,
            source: "https://example.com/".into(),
        },
    );

    let (state, effects) = update(
        state,
        Msg::BlockCheckCompleted {
            generation,
            document_reachable: false,
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.frame_status().label, "Content Blocked");
    assert_eq!(state.frame_status().severity, Severity::Warning);
    assert_eq!(state.console().last().unwrap().severity, Severity::Warning);
}

#[test]
fn unreachable_data_document_is_not_downgraded() {
    init_logging();
    let (state, generation) = start_load(AppState::new(), "data:text/html,<p>x</p>");
    let (state, _) = update(
        state,
        Msg::FrameLoaded {
            generation,
            source: "data:text/html,<p>x</p>".into(),
        },
    );

    let (state, _) = update(
        state,
        Msg::BlockCheckCompleted {
            generation,
            document_reachable: false,
        },
    );

    assert_eq!(state.frame_status().label, "Loaded");
}

#[test]
fn relative_target_uses_resolved_source_for_check() {
    init_logging();
    let (state, generation) = start_load(AppState::new(), "/api/test-pages/blocked");
    let (state, _) = update(
        state,
        Msg::FrameLoaded {
            generation,
            source: "http://127.0.0.1:5000/api/test-pages/blocked".into(),
        },
    );
    let (state, _) = update(
        state,
        Msg::BlockCheckCompleted {
            generation,
            document_reachable: false,
        },
    );

    assert_eq!(state.frame_status().label, "Content Blocked");
}

#[test]
fn load_failure_sets_error_status() {
    init_logging();
    let (state, generation) = start_load(AppState::new(), "https://unreachable.invalid");

    let (state, effects) = update(
        state,
        Msg::FrameLoadFailed {
            generation,
            message: "network error".into(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.frame_status().label, "Load Error");
    assert_eq!(state.frame_status().severity, Severity::Error);
    assert_eq!(
        state.console().last().unwrap().message,
        "Failed to load frame: network error"
    );
}

#[test]
fn superseded_load_signals_are_ignored() {
    init_logging();
    let (state, first) = start_load(AppState::new(), "https://first.example.com");
    let (state, second) = start_load(state, "https://second.example.com");
    assert_ne!(first, second);

    let (state, effects) = update(
        state,
        Msg::FrameLoaded {
            generation: first,
            source: "https://first.example.com/".into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.frame_status().label, "Loading...");

    let (state, _) = update(
        state,
        Msg::FrameLoadFailed {
            generation: first,
            message: "late".into(),
        },
    );
    assert_eq!(state.frame_status().label, "Loading...");
}

#[test]
fn preset_sets_exact_target_and_schedules_reload() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::PresetSelected("same-origin".into()));

    assert_eq!(state.target(), "/api/test-pages/same-origin");
    assert_eq!(
        effects,
        vec![Effect::Schedule {
            delay: PRESET_RELOAD_DELAY,
            msg: Msg::LoadRequested,
        }]
    );
}

#[test]
fn every_preset_maps_to_its_table_value() {
    init_logging();
    for (name, target) in PRESETS {
        let (state, _) = update(AppState::new(), Msg::PresetSelected(name.to_string()));
        assert_eq!(state.target(), *target);
    }
}

#[test]
fn blocked_preset_logs_warning() {
    init_logging();
    let state = AppState::new();
    let before = state.console().len();
    let (state, _) = update(state, Msg::PresetSelected("blocked-test".into()));

    assert_eq!(state.console().len(), before + 1);
    assert_eq!(state.console().last().unwrap().severity, Severity::Warning);
}

#[test]
fn unknown_preset_changes_nothing() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::PresetSelected("missing".into()));

    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn clear_results_empties_panel_and_logs() {
    init_logging();
    let state = AppState::new();
    let report = frameprobe_core::gather_network_info(&support::FakeFrame::cross_origin(
        "https://example.com/",
    ));
    let (state, _) = update(state, Msg::ProbeCompleted(report));
    assert_eq!(state.results().len(), 1);

    let (state, _) = update(state, Msg::ClearResults);

    assert_eq!(state.results().len(), 0);
    assert_eq!(state.console().last().unwrap().message, "Results cleared");
}

#[test]
fn clear_console_leaves_single_info_marker() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::LoadRequested);
    let (state, _) = update(state, Msg::ClearConsole);

    assert_eq!(state.console().len(), 1);
    assert_eq!(state.console()[0].severity, Severity::Info);
    assert_eq!(state.console()[0].message, "Console cleared");
}

#[test]
fn probe_request_becomes_effect() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::ProbeRequested(frameprobe_core::ProbeKind::Document),
    );

    assert_eq!(
        effects,
        vec![Effect::RunProbe(frameprobe_core::ProbeKind::Document)]
    );
    assert_eq!(state.console().len(), 2);
}

#[test]
fn view_reflects_state_and_dirty_flag() {
    init_logging();
    let (mut state, _) = update(AppState::new(), Msg::TargetEdited("about:blank".into()));
    let view = state.view();

    assert_eq!(view.target, "about:blank");
    assert!(view.dirty);
    assert_eq!(view.console.len(), 2);
    assert_eq!(view.console[0].class, "status-success");
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

mod support;
