//! Logging initialization for petquest.
//!
//! TUI mode: logs to `<state>/logs/petquest-{datetime}.log`
//! CLI mode: logs to stderr

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Guard that must be kept alive for the duration of the program.
    /// When dropped, ensures all buffered logs are flushed.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set in TUI mode with file logging enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Build the session log file name for a given UTC instant
pub fn log_file_name(now: chrono::DateTime<chrono::Utc>) -> String {
    format!("petquest-{}.log", now.format("%Y%m%dT%H%M%SZ"))
}

/// Resolve the effective filter directive: `--debug` wins over the config level
fn effective_level(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// Where log records go for a given run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogSink {
    /// Session log file under `<state>/logs`
    File,
    Stderr,
    /// TUI with file logging turned off: the terminal belongs to the wizard
    Silent,
}

fn log_sink(config: &Config, is_tui_mode: bool) -> LogSink {
    match (is_tui_mode, config.logging.to_file) {
        (true, true) => LogSink::File,
        (true, false) => LogSink::Silent,
        (false, _) => LogSink::Stderr,
    }
}

/// Initialize logging based on mode and configuration.
///
/// Terminal output belongs to the TUI while it runs, so TUI mode sends
/// records to a file and CLI mode sends them to stderr.
pub fn init_logging(
    config: &Config,
    is_tui_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let log_level = effective_level(config, debug_override);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
    let sink = log_sink(config, is_tui_mode);

    let mut handle = LoggingHandle {
        _guard: None,
        log_file_path: None,
    };

    let file_layer = if sink == LogSink::File {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

        let log_filename = log_file_name(chrono::Utc::now());
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(&logs_dir, &log_filename));
        handle._guard = Some(guard);
        handle.log_file_path = Some(logs_dir.join(log_filename));

        Some(fmt::layer().with_target(false).with_ansi(false).with_writer(writer))
    } else {
        None
    };
    let stderr_layer = (sink == LogSink::Stderr)
        .then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.base_url(),
        level = %log_level,
        sink = ?sink,
        "petquest starting"
    );

    Ok(handle)
}
