use chrono::{DateTime, Utc};

use crate::view_model::{AppViewModel, ConsoleLineView, ResultCardView};

/// Sample page shown before the user picks a target.
pub const DEFAULT_TARGET: &str = "data:text/html,<h1 style='font-family: Arial; color: %23333; padding: 20px;'>Sample Page</h1><p style='font-family: Arial; color: %23666; padding: 0 20px;'>This is a sample page for testing frame data extraction.</p>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub title: String,
    /// Multi-line `key: value` report.
    pub content: String,
    pub severity: Severity,
}

impl ExtractionResult {
    pub fn new(title: impl Into<String>, content: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStatus {
    pub label: String,
    pub severity: Severity,
}

impl FrameStatus {
    pub fn new(label: impl Into<String>, severity: Severity) -> Self {
        Self {
            label: label.into(),
            severity,
        }
    }
}

impl Default for FrameStatus {
    fn default() -> Self {
        Self::new("Ready", Severity::Success)
    }
}

/// The load currently owning the frame's completion signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingLoad {
    pub generation: u64,
    /// Source reported by the frame once loaded; the raw target until then.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    target: String,
    frame_status: FrameStatus,
    results: Vec<ExtractionResult>,
    console: Vec<LogEntry>,
    /// Bumped on every clear of the matching panel.
    results_clears: u64,
    console_clears: u64,
    load_generation: u64,
    pending_load: Option<PendingLoad>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            frame_status: FrameStatus::default(),
            results: Vec::new(),
            console: vec![
                LogEntry::new("Frame probe initialized", Severity::Success),
                LogEntry::new("Ready for extraction operations", Severity::Info),
            ],
            results_clears: 0,
            console_clears: 0,
            load_generation: 0,
            pending_load: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            target: self.target.clone(),
            frame_status: self.frame_status.clone(),
            results: self.results.iter().map(ResultCardView::from).collect(),
            console: self.console.iter().map(ConsoleLineView::from).collect(),
            results_clears: self.results_clears,
            console_clears: self.console_clears,
            dirty: self.dirty,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn frame_status(&self) -> &FrameStatus {
        &self.frame_status
    }

    pub fn results(&self) -> &[ExtractionResult] {
        &self.results
    }

    pub fn console(&self) -> &[LogEntry] {
        &self.console
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_target(&mut self, target: String) {
        self.target = target;
        self.dirty = true;
    }

    pub(crate) fn set_status(&mut self, label: &str, severity: Severity) {
        self.frame_status = FrameStatus::new(label, severity);
        self.dirty = true;
    }

    pub(crate) fn log(&mut self, message: impl Into<String>, severity: Severity) {
        self.console.push(LogEntry::new(message, severity));
        self.dirty = true;
    }

    pub(crate) fn push_log_entry(&mut self, entry: LogEntry) {
        self.console.push(entry);
        self.dirty = true;
    }

    pub(crate) fn push_result(&mut self, result: ExtractionResult) {
        self.results.push(result);
        self.dirty = true;
    }

    pub(crate) fn clear_results(&mut self) {
        self.results.clear();
        self.results_clears += 1;
        self.dirty = true;
    }

    pub(crate) fn reset_console(&mut self, marker: LogEntry) {
        self.console = vec![marker];
        self.console_clears += 1;
        self.dirty = true;
    }

    /// Arms a new load, superseding any pending one.
    pub(crate) fn begin_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.pending_load = Some(PendingLoad {
            generation: self.load_generation,
            source: self.target.clone(),
        });
        self.load_generation
    }

    pub(crate) fn pending_load(&self, generation: u64) -> Option<&PendingLoad> {
        self.pending_load
            .as_ref()
            .filter(|load| load.generation == generation)
    }

    pub(crate) fn record_loaded_source(&mut self, generation: u64, source: String) {
        if let Some(load) = self
            .pending_load
            .as_mut()
            .filter(|load| load.generation == generation)
        {
            load.source = source;
        }
    }
}
