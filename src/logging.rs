//! Tracing setup
//!
//! The interactive interface owns the terminal, so its logs go to a file in
//! the cache directory. Plain-text mode logs to stderr. `RUST_LOG` controls
//! the level (default `warn`).

use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file written next to the launch snapshots
pub const LOG_FILE_NAME: &str = "launchboard.log";

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize the tracing subscriber
///
/// The returned guard flushes the file writer when dropped and must be held
/// until the program exits. Initialization is skipped silently if a
/// subscriber is already installed. File logging is disabled, and `None`
/// returned, when the log file cannot be created or opened.
pub fn init(target: LogTarget<'_>) -> Option<WorkerGuard> {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(env_filter())
                .try_init();
            None
        }
        LogTarget::File(dir) => {
            // Without a writable directory there is nowhere to log to
            std::fs::create_dir_all(dir).ok()?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(LOG_FILE_NAME)
                .build(dir)
                .ok()?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(env_filter())
                .try_init();
            Some(guard)
        }
    }
}
