use std::fmt::Write as _;

use chrono::Local;
use frameprobe_core::{
    severity_class, AppViewModel, ConsoleLineView, FrameStatus, ResultCardView, PRESETS,
};

const PRESET_PREVIEW_CHARS: usize = 60;

/// Prints only what changed since the previous view.
#[derive(Debug, Default)]
pub struct PanelRenderer {
    status: Option<FrameStatus>,
    results_shown: usize,
    results_clears: u64,
    console_shown: usize,
    console_clears: u64,
}

impl PanelRenderer {
    pub fn render_update(&mut self, view: &AppViewModel) -> String {
        let mut out = String::new();

        if self.status.as_ref() != Some(&view.frame_status) {
            push_line(&mut out, &status_line(&view.frame_status));
            self.status = Some(view.frame_status.clone());
        }

        if view.results_clears != self.results_clears {
            self.results_shown = 0;
            self.results_clears = view.results_clears;
        }
        for card in &view.results[self.results_shown..] {
            out.push_str(&result_card(card));
        }
        self.results_shown = view.results.len();

        if view.console_clears != self.console_clears {
            self.console_shown = 0;
            self.console_clears = view.console_clears;
        }
        for line in &view.console[self.console_shown..] {
            push_line(&mut out, &console_line(line));
        }
        self.console_shown = view.console.len();

        out
    }
}

/// Both panels in full, for the `show` command.
pub fn render_full(view: &AppViewModel) -> String {
    let mut out = String::new();
    push_line(&mut out, &format!("Target: {}", view.target));
    push_line(&mut out, &status_line(&view.frame_status));

    push_line(&mut out, &format!("-- Results ({}) --", view.results.len()));
    if view.results.is_empty() {
        push_line(&mut out, "No extraction results yet.");
    }
    for card in &view.results {
        out.push_str(&result_card(card));
    }

    push_line(&mut out, &format!("-- Console ({}) --", view.console.len()));
    for line in &view.console {
        push_line(&mut out, &console_line(line));
    }
    out
}

pub fn render_presets() -> String {
    let mut out = String::new();
    for (name, target) in PRESETS {
        let shown: String = target.chars().take(PRESET_PREVIEW_CHARS).collect();
        let ellipsis = if target.chars().count() > PRESET_PREVIEW_CHARS {
            "..."
        } else {
            ""
        };
        push_line(&mut out, &format!("  {name:<13} {shown}{ellipsis}"));
    }
    out
}

fn status_line(status: &FrameStatus) -> String {
    format!(
        "Frame: {} [{}]",
        status.label,
        severity_class(status.severity)
    )
}

fn result_card(card: &ResultCardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} [{}] ==", card.title, card.class);
    for line in card.content.lines() {
        let _ = writeln!(out, "   {line}");
    }
    out
}

fn console_line(line: &ConsoleLineView) -> String {
    format!(
        "[{}] [{}] {}",
        line.timestamp.with_timezone(&Local).format("%H:%M:%S"),
        line.class,
        line.message
    )
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
