//! Structured logging for debugging neurotask.
//!
//! Log levels:
//! - ERROR: Failed API calls (transport, HTTP status, decode)
//! - WARN: Unexpected but recoverable conditions (stale responses, unknown status values)
//! - INFO: High-level notifications (startup, shutdown, task mutations)
//! - DEBUG: Command and message traces
//! - TRACE: Request/response detail
//!
//! The terminal is owned by the TUI, so everything goes to
//! `~/.neurotask/neurotask.log`. Debug mode can be enabled with the
//! `--debug` flag or `NEUROTASK_DEBUG=1`. `RUST_LOG` overrides both.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub const LOG_FILE_NAME: &str = "neurotask.log";

/// Initialize logging with explicit debug mode setting.
///
/// The returned guard flushes the non-blocking writer on drop; keep it alive
/// for the lifetime of the process. Returns `None` when no log directory is
/// available, in which case logging is silently disabled.
pub fn init_with_debug(debug: bool) -> Option<WorkerGuard> {
    let dir = Config::app_dir().ok()?;
    init_in_dir(&dir, debug)
}

/// Initialize logging into a specific directory.
pub fn init_in_dir(dir: &Path, debug: bool) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;
    let path = dir.join(LOG_FILE_NAME);
    // Truncate file on startup
    std::fs::write(&path, "").ok()?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug_enabled(debug))));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .ok()?;

    Some(guard)
}

/// Debug mode is on when the flag is passed or `NEUROTASK_DEBUG` is truthy.
pub fn debug_enabled(flag: bool) -> bool {
    flag || std::env::var("NEUROTASK_DEBUG")
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "neurotask=debug"
    } else {
        "neurotask=info"
    }
}
