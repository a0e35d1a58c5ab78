//! Structured logging infrastructure for Kindred.
//!
//! Installs a global `tracing` subscriber from a [`LoggingConfig`]. Console
//! and file output can be enabled independently; `RUST_LOG` overrides the
//! configured level when set.

#[cfg(test)]
mod tests;

use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Error type for logging operations
#[derive(Debug)]
pub enum LogError {
    /// IO error occurred
    IoError(std::io::Error),

    /// Error parsing log level
    InvalidLogLevel(String),

    /// Error in subscriber setup
    SubscriberError(Box<dyn std::error::Error + Send + Sync>),

    /// General error
    Other(String),
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::IoError(err)
    }
}

impl From<tracing_subscriber::util::TryInitError> for LogError {
    fn from(err: tracing_subscriber::util::TryInitError) -> Self {
        LogError::SubscriberError(Box::new(err))
    }
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Keeps the background file writer alive. Drop it only at shutdown.
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the logging system with the given configuration.
///
/// Calling this when a global subscriber is already installed is not an
/// error; the existing subscriber is kept.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    if tracing::dispatcher::has_been_set() {
        tracing::debug!("Global subscriber already installed, keeping it");
        return Ok(LoggingGuard::default());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = LoggingGuard::default();

    if config.stdout {
        layers.push(fmt_layer(config.format, std::io::stdout, true));
    }

    if let Some(file_path) = &config.file {
        let (writer, file_guard) = create_non_blocking_file(file_path)?;
        layers.push(fmt_layer(config.format, writer, false));
        guard._file = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(guard)
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_level(true)
        .with_target(true)
        .with_line_number(true)
        .with_thread_ids(true);

    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Default => layer.boxed(),
    }
}

/// Create a non-blocking file writer.
fn create_non_blocking_file(path: impl AsRef<Path>) -> Result<(NonBlocking, WorkerGuard)> {
    let path = path.as_ref();

    let Some(file_name) = path.file_name() else {
        return Err(LogError::Other(format!(
            "Log file path has no file name: {}",
            path.display()
        )));
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(file_appender))
}

/// Parse a log level string into a LogLevel enum.
pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    level
        .parse()
        .map_err(|_| LogError::InvalidLogLevel(level.to_string()))
}

/// Convert a tracing::Level to a LogLevel enum.
pub fn level_to_log_level(level: Level) -> LogLevel {
    match level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::IoError(e) => write!(f, "IO error: {}", e),
            LogError::SubscriberError(e) => write!(f, "Subscriber error: {}", e),
            LogError::InvalidLogLevel(s) => write!(f, "Invalid log level: {}", s),
            LogError::Other(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for LogError {}
