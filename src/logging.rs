//! Logging
//!
//! Everything goes to `spotlight.log` next to the executable, truncated on
//! each run. The terminal UI owns stdout/stderr while it runs, so nothing is
//! written there. Filtering follows `SPOTLIGHT_LOG` (an `EnvFilter`
//! directive), defaulting to `info`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "SPOTLIGHT_LOG";

const DEFAULT_FILTER: &str = "info";

/// Log file path (same directory as the executable)
pub fn log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spotlight.log")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Returns the log file in use, or `None` if
/// it could not be opened (logging is then disabled).
pub fn init() -> Option<PathBuf> {
    let path = log_path();
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .ok()?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(version = crate::VERSION, "Spotlight starting up");
        Some(path)
    } else {
        None
    }
}
