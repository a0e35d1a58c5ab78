use crate::config::{LogFormat, LogLevel, LoggingConfig};
use crate::logging::{LogError, create_non_blocking_file, level_to_log_level, parse_log_level};
use tempfile::tempdir;

#[test]
fn test_init_is_idempotent() {
    let config = LoggingConfig {
        level: LogLevel::Debug,
        format: LogFormat::Compact,
        file: None,
        stdout: true,
    };

    let first = crate::logging::init(&config);
    assert!(first.is_ok());

    // A second call keeps the installed subscriber instead of failing
    let second = crate::logging::init(&config);
    assert!(second.is_ok());
}

#[test]
fn test_file_writer_creates_directories() {
    let temp_dir = tempdir().unwrap();
    let log_path = temp_dir.path().join("logs").join("kindred.log");

    let (_writer, _guard) = create_non_blocking_file(&log_path).unwrap();

    assert!(log_path.parent().unwrap().is_dir());
}

#[test]
fn test_file_writer_rejects_bare_root() {
    let result = create_non_blocking_file("/");
    assert!(matches!(result, Err(LogError::Other(_))));
}

#[test]
fn test_level_conversion() {
    assert_eq!(parse_log_level("trace").unwrap(), LogLevel::Trace);
    assert_eq!(parse_log_level("DEBUG").unwrap(), LogLevel::Debug);
    assert_eq!(parse_log_level("info").unwrap(), LogLevel::Info);
    assert_eq!(parse_log_level("warn").unwrap(), LogLevel::Warn);
    assert_eq!(parse_log_level("error").unwrap(), LogLevel::Error);
    assert!(matches!(
        parse_log_level("loud"),
        Err(LogError::InvalidLogLevel(_))
    ));

    assert_eq!(level_to_log_level(tracing::Level::TRACE), LogLevel::Trace);
    assert_eq!(level_to_log_level(tracing::Level::DEBUG), LogLevel::Debug);
    assert_eq!(level_to_log_level(tracing::Level::INFO), LogLevel::Info);
    assert_eq!(level_to_log_level(tracing::Level::WARN), LogLevel::Warn);
    assert_eq!(level_to_log_level(tracing::Level::ERROR), LogLevel::Error);
}
