#![deny(missing_docs)]
//! Logging macros for frameprobe.
//!
//! Frame loads, framing refusals, probe runs and test page requests are all
//! reported through `probe_*`, which forward to the `log` facade. The binaries
//! install the actual sink; tests call [`initialize_for_tests`].

use std::str::FromStr;

/// Overrides the level used by [`initialize_for_tests`], e.g. `trace` or `off`.
pub const TEST_LOG_ENV: &str = "FRAMEPROBE_TEST_LOG";

/// Trace output: per-load engine steps.
#[macro_export]
macro_rules! probe_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Debug output: target resolution, skipped probes, superseded loads.
#[macro_export]
macro_rules! probe_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Info output: loads started and finished, pages served.
#[macro_export]
macro_rules! probe_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Warnings: framing refusals, failed loads, missing test pages.
#[macro_export]
macro_rules! probe_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Errors: a worker thread or the test page server went away.
#[macro_export]
macro_rules! probe_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Installs a terminal logger for test binaries.
///
/// The level comes from [`TEST_LOG_ENV`] when set and valid, else debug in
/// debug builds and info in release builds. Calling it again is harmless.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = std::env::var(TEST_LOG_ENV)
        .ok()
        .and_then(|value| log::LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        });

    // Only the first call in a test binary installs the logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
