//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;

/// Validate the entire configuration.
pub fn validate_config(config: &KindredConfig) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_graph_config(&config.graph)?;

    Ok(())
}

/// Validate storage configuration.
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.snapshot_path
        && path.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "Snapshot path cannot be empty".to_string(),
        ));
    }

    if config.backend == StorageBackend::SurrealDB {
        if config.surrealdb.namespace.is_empty() {
            return Err(ConfigError::ValidationError(
                "SurrealDB namespace cannot be empty".to_string(),
            ));
        }
        if config.surrealdb.database.is_empty() {
            return Err(ConfigError::ValidationError(
                "SurrealDB database cannot be empty".to_string(),
            ));
        }
        if config.surrealdb.engine == SurrealDBEngine::RocksDB
            && config.surrealdb.path.as_os_str().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "SurrealDB path is required for the rocksdb engine".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate graph rules.
fn validate_graph_config(config: &GraphConfig) -> Result<(), ConfigError> {
    if config.max_parents == 0 {
        return Err(ConfigError::ValidationError(
            "max_parents must be at least 1".to_string(),
        ));
    }

    Ok(())
}
