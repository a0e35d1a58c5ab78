//! Trait definitions for the record store collaborator
//!
//! The engine reads snapshots through these traits and performs writes only
//! after validation succeeds. Backends never validate graph structure.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::models::{Member, MemberId, MemberUpdate, NewMember, Partnership, Relationship};
use crate::storage::errors::StorageError;
use crate::storage::filters::RelationshipFilter;

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> Result<bool, StorageError>;

    /// Clear all data in the store
    async fn clear(&self) -> Result<(), StorageError>;

    /// Get metadata about the store
    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError>;
}

/// Trait for member operations
#[async_trait]
pub trait MemberStore: BaseStore {
    /// Create a member; the store assigns the id
    async fn create_member(&self, member: NewMember) -> Result<Member, StorageError>;

    /// Get a member by id
    async fn get_member(&self, id: MemberId) -> Result<Option<Member>, StorageError>;

    /// Apply a partial update, returning the updated member or `None` if absent
    async fn update_member(
        &self,
        id: MemberId,
        update: MemberUpdate,
    ) -> Result<Option<Member>, StorageError>;

    /// Delete a member by id; `false` if it did not exist
    async fn delete_member(&self, id: MemberId) -> Result<bool, StorageError>;

    /// All members, ordered by id
    async fn list_members(&self) -> Result<Vec<Member>, StorageError>;
}

/// Trait for parent→child relationship operations
#[async_trait]
pub trait RelationshipStore: BaseStore {
    /// Persist a relationship; fails with `AlreadyExists` on a duplicate pair
    async fn create_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, StorageError>;

    /// Whether the exact pair is stored
    async fn get_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Option<Relationship>, StorageError>;

    /// Delete a relationship; `false` if it did not exist
    async fn delete_relationship(&self, relationship: Relationship) -> Result<bool, StorageError>;

    /// Swap `old` for `new` in one step. `new` takes the last insertion
    /// position. Either both changes land or neither does.
    async fn replace_relationship(
        &self,
        old: Relationship,
        new: Relationship,
    ) -> Result<Relationship, StorageError>;

    /// Relationships in insertion order, optionally filtered
    async fn list_relationships(
        &self,
        filter: Option<RelationshipFilter>,
    ) -> Result<Vec<Relationship>, StorageError>;

    /// Delete every relationship a member takes part in, returning how many went
    async fn delete_relationships_for_member(&self, id: MemberId) -> Result<usize, StorageError>;
}

/// Trait for partner pair operations
#[async_trait]
pub trait PartnershipStore: BaseStore {
    async fn create_partnership(
        &self,
        partnership: Partnership,
    ) -> Result<Partnership, StorageError>;

    async fn delete_partnership(&self, partnership: Partnership) -> Result<bool, StorageError>;

    /// Partnerships in insertion order
    async fn list_partnerships(&self) -> Result<Vec<Partnership>, StorageError>;

    async fn delete_partnerships_for_member(&self, id: MemberId) -> Result<usize, StorageError>;
}

/// Combined record store used by the engine
pub trait RecordStore: MemberStore + RelationshipStore + PartnershipStore {}

impl<T> RecordStore for T where T: MemberStore + RelationshipStore + PartnershipStore {}
