//! Configuration model definitions.
//!
//! This module contains the configuration structures for all Kindred components.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::graph::DEFAULT_MAX_PARENTS;

/// Main configuration structure for Kindred.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct KindredConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Graph rules
    pub graph: GraphConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Seed data
    pub seed: SeedConfig,
}

/// Configuration for the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Which backend holds the records
    pub backend: StorageBackend,

    /// JSON snapshot file for the memory backend. `None` keeps data in memory only.
    pub snapshot_path: Option<PathBuf>,

    /// SurrealDB-specific configuration
    pub surrealdb: SurrealDBConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            snapshot_path: None,
            surrealdb: SurrealDBConfig::default(),
        }
    }
}

/// Record store backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-process store, optionally persisted to a snapshot file
    Memory,

    /// Embedded SurrealDB (requires the `surrealdb-embedded` feature)
    SurrealDB,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::SurrealDB => write!(f, "surrealdb"),
        }
    }
}

/// SurrealDB configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurrealDBConfig {
    /// SurrealDB engine type
    pub engine: SurrealDBEngine,

    /// Database directory for the RocksDB engine
    pub path: PathBuf,

    /// Namespace
    pub namespace: String,

    /// Database name
    pub database: String,
}

impl Default for SurrealDBConfig {
    fn default() -> Self {
        let data_dir = directories::ProjectDirs::from("org", "kindred", "kindred")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"));

        Self {
            engine: SurrealDBEngine::Memory,
            path: data_dir.join("records"),
            namespace: "kindred".to_string(),
            database: "main".to_string(),
        }
    }
}

/// SurrealDB engine types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SurrealDBEngine {
    /// In-memory storage (for testing)
    Memory,
    /// RocksDB on-disk storage (embedded)
    RocksDB,
}

/// Structural rules for the family graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GraphConfig {
    /// Maximum number of distinct parents a member may have
    pub max_parents: usize,

    /// What happens to a member's relationships when the member is deleted
    pub member_deletion: DeletionPolicy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_parents: DEFAULT_MAX_PARENTS,
            member_deletion: DeletionPolicy::Restrict,
        }
    }
}

/// Member deletion policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeletionPolicy {
    /// Refuse to delete a member who still has relationships or partnerships
    #[default]
    Restrict,

    /// Delete the member's relationships and partnerships first
    Cascade,
}

impl FromStr for DeletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "restrict" => Ok(DeletionPolicy::Restrict),
            "cascade" => Ok(DeletionPolicy::Cascade),
            _ => Err(format!("Invalid deletion policy: {}", s)),
        }
    }
}

/// Seed data configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SeedConfig {
    /// Load the demo family into an empty store at startup
    pub demo: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// File to log to (if any)
    pub file: Option<PathBuf>,

    /// Whether to log to stdout
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Default,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level
    Trace,

    /// Debug level
    Debug,

    /// Info level
    Info,

    /// Warn level
    Warn,

    /// Error level
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default format
    Default,

    /// JSON format
    Json,

    /// Compact format
    Compact,

    /// Pretty format
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "full" => Ok(LogFormat::Default),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}
