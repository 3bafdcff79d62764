use chrono::{DateTime, Utc};

use crate::{ExtractionResult, FrameStatus, LogEntry, Severity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub target: String,
    pub frame_status: FrameStatus,
    pub results: Vec<ResultCardView>,
    pub console: Vec<ConsoleLineView>,
    /// How many times each panel has been cleared.
    pub results_clears: u64,
    pub console_clears: u64,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCardView {
    pub title: String,
    pub content: String,
    pub severity: Severity,
    pub class: &'static str,
}

impl From<&ExtractionResult> for ResultCardView {
    fn from(result: &ExtractionResult) -> Self {
        Self {
            title: result.title.clone(),
            content: result.content.clone(),
            severity: result.severity,
            class: severity_class(result.severity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLineView {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub class: &'static str,
}

impl From<&LogEntry> for ConsoleLineView {
    fn from(entry: &LogEntry) -> Self {
        Self {
            message: entry.message.clone(),
            timestamp: entry.timestamp,
            class: severity_class(entry.severity),
        }
    }
}

/// Visual class a panel uses for a severity.
pub fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "status-error",
        Severity::Warning => "status-warning",
        Severity::Success => "status-success",
        Severity::Info => "muted",
    }
}
