//! Storage abstractions and implementations
//!
//! The record store holds members, parent→child relationships and
//! partnerships. The graph engine only reads snapshots from it and writes
//! through it after validation.
//!
//! ## Storage Implementations
//!
//! - **InMemoryStore**: default backend, optionally persisted to a JSON
//!   [`Snapshot`] file.
//! - **SurrealStore**: embedded SurrealDB (memory or RocksDB engine), behind
//!   the `surrealdb-embedded` feature.

pub mod errors;
pub mod filters;
pub mod memory;
pub mod snapshot;
#[cfg(feature = "surrealdb-embedded")]
pub mod surreal;
pub mod traits;

use std::sync::Arc;

pub use errors::{StorageError, StorageResult};
pub use filters::RelationshipFilter;
pub use memory::InMemoryStore;
pub use snapshot::Snapshot;
#[cfg(feature = "surrealdb-embedded")]
pub use surreal::SurrealStore;
pub use traits::{BaseStore, MemberStore, PartnershipStore, RecordStore, RelationshipStore};

use crate::config::{StorageBackend, StorageConfig};

/// Create the record store described by the configuration.
pub async fn create_record_store(
    config: &StorageConfig,
) -> Result<Arc<dyn RecordStore>, StorageError> {
    match config.backend {
        StorageBackend::Memory => match &config.snapshot_path {
            Some(path) => Ok(Arc::new(InMemoryStore::open(path).await?)),
            None => {
                tracing::info!("Creating in-memory record store");
                Ok(Arc::new(InMemoryStore::new()))
            }
        },
        #[cfg(feature = "surrealdb-embedded")]
        StorageBackend::SurrealDB => Ok(Arc::new(SurrealStore::connect(&config.surrealdb).await?)),
        #[cfg(not(feature = "surrealdb-embedded"))]
        StorageBackend::SurrealDB => Err(StorageError::UnsupportedStorageType(
            "surrealdb backend requires the 'surrealdb-embedded' feature".to_string(),
        )),
    }
}
