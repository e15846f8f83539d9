use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{runtime_dir, LogLevel};

const LOG_PREFIX: &str = "juice";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMode {
    /// Daily-rolling file in the runtime dir; keeps stdio free for the channel.
    File { prefix: String },
    Stderr,
}

pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// Log file prefix for a `serve` session.
///
/// Each socket gets its own file so concurrent servers don't interleave;
/// stdio sessions share `juice-stdio`.
pub fn serve_log_prefix(socket: Option<&Path>) -> String {
    let name = socket
        .and_then(Path::file_stem)
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("stdio");
    format!("{}-{}", LOG_PREFIX, name)
}

/// Falls back to stderr when the log file cannot be opened.
pub fn init(level: LogLevel, mode: LogMode, cli_override: Option<LogLevel>) -> LogGuard {
    let Some(level) = cli_override.unwrap_or(level).as_tracing_level() else {
        return LogGuard { _guard: None };
    };

    let (writer, guard) = match &mode {
        LogMode::File { prefix } => match file_writer(prefix) {
            Some((writer, guard)) => (Some(writer), Some(guard)),
            None => (None, None),
        },
        LogMode::Stderr => (None, None),
    };

    let file_layer = writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_timer(UtcTime::rfc_3339())
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
    });
    let stderr_layer = file_layer.is_none().then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(UtcTime::rfc_3339())
    });

    let installed = tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
    if installed.is_err() {
        return LogGuard { _guard: None };
    }

    LogGuard { _guard: guard }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

fn file_writer(prefix: &str) -> Option<(NonBlocking, WorkerGuard)> {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: Failed to create log directory {:?}: {}", dir, e);
        return None;
    }

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(7)
        .build(&dir)
        .map_err(|e| eprintln!("Warning: Failed to open log file in {:?}: {}", dir, e))
        .ok()?;

    Some(tracing_appender::non_blocking(appender))
}

pub fn log_dir() -> PathBuf {
    runtime_dir()
}
