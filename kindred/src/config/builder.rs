//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use std::path::Path;

/// Builder for creating KindredConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: KindredConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: KindredConfig::default(),
        }
    }

    /// Keep records in memory only.
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.backend = StorageBackend::Memory;
        self.config.storage.snapshot_path = None;
        self
    }

    /// Keep records in memory and persist them to a JSON snapshot file.
    pub fn with_snapshot<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.backend = StorageBackend::Memory;
        self.config.storage.snapshot_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use embedded SurrealDB on RocksDB at `path`.
    pub fn with_surrealdb<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.backend = StorageBackend::SurrealDB;
        self.config.storage.surrealdb.engine = SurrealDBEngine::RocksDB;
        self.config.storage.surrealdb.path = path.as_ref().to_path_buf();
        self
    }

    /// Use SurrealDB's in-memory engine.
    pub fn with_surrealdb_memory(mut self) -> Self {
        self.config.storage.backend = StorageBackend::SurrealDB;
        self.config.storage.surrealdb.engine = SurrealDBEngine::Memory;
        self
    }

    /// Set the maximum number of distinct parents per member.
    pub fn with_max_parents(mut self, max_parents: usize) -> Self {
        self.config.graph.max_parents = max_parents;
        self
    }

    /// Set what happens to relationships when a member is deleted.
    pub fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.config.graph.member_deletion = policy;
        self
    }

    /// Load the demo family at startup.
    pub fn with_demo_seed(mut self) -> Self {
        self.config.seed.demo = true;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Create a configuration for development.
    ///
    /// In-memory storage, the demo family and debug-level logging.
    pub fn development() -> Self {
        Self::new()
            .with_memory_storage()
            .with_demo_seed()
            .with_log_level(LogLevel::Debug)
    }

    /// Create a configuration for automated tests.
    pub fn testing() -> Self {
        Self::new()
            .with_memory_storage()
            .with_log_level(LogLevel::Warn)
    }

    /// Create a production configuration persisting to `kindred.json` with JSON logs.
    pub fn production() -> Self {
        Self::new()
            .with_snapshot("kindred.json")
            .with_log_level(LogLevel::Info)
            .with_log_format(LogFormat::Json)
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<KindredConfig> {
        validation::validate_config(&self.config)?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
