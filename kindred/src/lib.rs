//! # Kindred
//!
//! Genealogical records (members and parent→child relationships) kept
//! structurally valid and rendered as a deterministic graph.
//!
//! ## Quick Start
//!
//! ```rust
//! use kindred::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let family = init(ConfigBuilder::testing().build()?).await?;
//!
//! let mom = family
//!     .create_member(MemberBuilder::new("Mom", "Javier").born("1970-10-02").build())
//!     .await?;
//! let jr = family
//!     .create_member(MemberBuilder::new("Jr", "Javier").born("1984-04-20").build())
//!     .await?;
//! family.add_relationship(mom.id, jr.id).await?;
//!
//! // A member can never become their own ancestor
//! assert!(family.validate_new_relationship(jr.id, mom.id).await.is_err());
//!
//! let payload = family.get_graph().await?;
//! assert_eq!(payload.edges[0].id, "parent-1-child-2");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **graph**: the engine. Validator, sibling orderer, builder, serializer.
//! - **storage**: the record store traits and backends.
//! - **core**: [`FamilyManager`](core::FamilyManager), which wires the engine
//!   to a store and serialises writes.

pub mod config;
pub mod core;
pub mod graph;
pub mod logging;
pub mod models;
pub mod seed;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::init;

    pub use crate::config::{
        ConfigBuilder, ConfigLoader, DeletionPolicy, KindredConfig, LogLevel, StorageConfig,
    };

    pub use crate::models::{
        Member, MemberBuilder, MemberId, MemberUpdate, NewMember, Partnership, Relationship, Sex,
    };

    pub use crate::graph::{FamilyGraph, GraphPayload, ParentPolicy, Rejection};

    pub use crate::core::FamilyManager;

    pub use crate::storage::{RecordStore, StorageError};

    pub use crate::{KindredError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Kindred operations
#[derive(Debug, thiserror::Error)]
pub enum KindredError {
    /// A relationship failed a structural check
    #[error("Relationship rejected: {0}")]
    Rejected(#[from] graph::Rejection),

    /// A partnership failed a structural check
    #[error("Partnership rejected: {0}")]
    PartnershipRejected(#[from] graph::PartnershipRejection),

    /// Member or relationship does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation conflicts with the current records
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during storage operations
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    /// Payload could not be rendered
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),
}

impl KindredError {
    pub fn member_not_found(id: models::MemberId) -> Self {
        KindredError::NotFound(format!("member {} not found", id))
    }

    pub fn relationship_not_found(relationship: models::Relationship) -> Self {
        KindredError::NotFound(format!("relationship {} not found", relationship))
    }
}

impl From<config::ConfigError> for KindredError {
    fn from(err: config::ConfigError) -> Self {
        KindredError::Configuration(err.to_string())
    }
}

/// Result type for Kindred operations
pub type Result<T> = std::result::Result<T, KindredError>;

/// Initialize Kindred with the provided configuration
///
/// Opens the configured record store and, when `seed.demo` is set and the
/// store is empty, loads the demo family. Logging is left to the caller
/// (see [`logging::init`]).
pub async fn init(config: config::KindredConfig) -> Result<core::FamilyManager> {
    config::validate_config(&config)?;

    let store = storage::create_record_store(&config.storage).await?;
    let seed_demo = config.seed.demo;
    let manager = core::FamilyManager::new(store, config);

    if seed_demo {
        match manager.seed_demo().await {
            Ok(report) => tracing::info!(
                members = report.members,
                relationships = report.relationships,
                "Loaded demo family"
            ),
            Err(KindredError::Conflict(_)) => {
                tracing::debug!("Store already has members, skipping demo seed")
            }
            Err(e) => return Err(e),
        }
    }

    Ok(manager)
}
