//! Tracing setup for the REPL.
//!
//! Output goes to stdout and to `<config_dir>/hudsnap/hudsnap.log`. The file
//! is capped at 10 MB with one rotated copy. `DEBUG_LOGGING=1` raises the
//! hudsnap crates to debug.

use std::path::{Path, PathBuf};

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_FILE: &str = "hudsnap.log";
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;
const DEBUG_DIRECTIVE: &str = "info,hudsnap=debug,hudsnap_core=debug,hudsnap_overlay=debug";

/// Install the global subscriber. Hold the returned guard until exit so the
/// file writer is drained; `None` means only stdout is active.
pub fn init() -> Option<WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok_and(|v| v == "1");

    let appender = match log_dir().and_then(|dir| open_appender(&dir)) {
        Ok((appender, path)) => Some((appender, path)),
        Err(reason) => {
            // No subscriber yet to report through
            eprintln!("hudsnap: file logging disabled ({reason})");
            None
        }
    };

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let Some((appender, path)) = appender else {
        tracing_subscriber::registry()
            .with(stdout_layer)
            .with(filter(debug_logging))
            .init();
        tracing::info!(debug_logging, "Logging to stdout");
        return None;
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .with(filter(debug_logging))
        .init();
    tracing::info!(log_file = %path.display(), debug_logging, "Logging to stdout and file");

    Some(guard)
}

fn log_dir() -> Result<PathBuf, String> {
    let dir = dirs::config_dir()
        .ok_or("no config directory")?
        .join("hudsnap");
    std::fs::create_dir_all(&dir).map_err(|e| format!("{}: {e}", dir.display()))?;
    Ok(dir)
}

fn open_appender(dir: &Path) -> Result<(BasicRollingFileAppender, PathBuf), String> {
    let path = dir.join(LOG_FILE);
    let appender = BasicRollingFileAppender::new(
        &path,
        RollingConditionBasic::new().max_size(MAX_LOG_BYTES),
        1,
    )
    .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok((appender, path))
}

fn filter(debug_logging: bool) -> EnvFilter {
    EnvFilter::new(if debug_logging { DEBUG_DIRECTIVE } else { "info" })
}
