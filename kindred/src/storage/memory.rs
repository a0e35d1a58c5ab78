//! In-memory record store
//!
//! The default backend. Optionally write-through to a JSON [`Snapshot`] file
//! so data survives restarts. Every write is staged on a copy of the records
//! and only becomes visible once the snapshot has been saved.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Member, MemberId, MemberUpdate, NewMember, Partnership, Relationship};
use crate::storage::errors::StorageError;
use crate::storage::filters::RelationshipFilter;
use crate::storage::snapshot::Snapshot;
use crate::storage::traits::{BaseStore, MemberStore, PartnershipStore, RelationshipStore};

#[derive(Debug, Clone)]
struct Records {
    members: BTreeMap<MemberId, Member>,
    relationships: Vec<Relationship>,
    partnerships: Vec<Partnership>,
    next_id: i64,
}

impl Records {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let next_id = snapshot.next_free_id().get();
        Self {
            members: snapshot.members.into_iter().map(|m| (m.id, m)).collect(),
            relationships: snapshot.relationships,
            partnerships: snapshot.partnerships,
            next_id,
        }
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            members: self.members.values().cloned().collect(),
            relationships: self.relationships.clone(),
            partnerships: self.partnerships.clone(),
            next_member_id: Some(MemberId(self.next_id)),
        }
    }
}

/// Record store held entirely in memory
#[derive(Debug)]
pub struct InMemoryStore {
    records: RwLock<Records>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::from_snapshot(Snapshot::default())
    }

    /// Start from existing records, without file persistence
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            records: RwLock::new(Records::from_snapshot(snapshot)),
            snapshot_path: None,
        }
    }

    /// Load from `path` (if it exists) and write every change back to it
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let snapshot = Snapshot::load(&path).await?;
        tracing::info!(path = %path.display(), "Opened snapshot-backed store");
        Ok(Self {
            records: RwLock::new(Records::from_snapshot(snapshot)),
            snapshot_path: Some(path),
        })
    }

    /// Copy of the current records
    pub async fn snapshot(&self) -> Snapshot {
        self.records.read().await.to_snapshot()
    }

    /// Save `staged`, then make it current. A failed save leaves `current` as it was.
    async fn commit(&self, current: &mut Records, staged: Records) -> Result<(), StorageError> {
        if let Some(path) = &self.snapshot_path {
            staged.to_snapshot().save(path).await?;
        }
        *current = staged;
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseStore for InMemoryStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut records = self.records.write().await;
        // Issued ids stay issued
        let staged = Records {
            members: BTreeMap::new(),
            relationships: Vec::new(),
            partnerships: Vec::new(),
            next_id: records.next_id,
        };
        self.commit(&mut records, staged).await
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        let records = self.records.read().await;
        Ok(serde_json::json!({
            "type": "memory",
            "member_count": records.members.len(),
            "relationship_count": records.relationships.len(),
            "partnership_count": records.partnerships.len(),
            "snapshot_path": self.snapshot_path.as_ref().map(|p| p.display().to_string()),
        }))
    }
}

#[async_trait]
impl MemberStore for InMemoryStore {
    async fn create_member(&self, member: NewMember) -> Result<Member, StorageError> {
        let mut records = self.records.write().await;
        let mut staged = records.clone();
        let id = MemberId(staged.next_id);
        staged.next_id += 1;

        let member = Member::from_new(id, member);
        staged.members.insert(id, member.clone());
        self.commit(&mut records, staged).await?;
        Ok(member)
    }

    async fn get_member(&self, id: MemberId) -> Result<Option<Member>, StorageError> {
        Ok(self.records.read().await.members.get(&id).cloned())
    }

    async fn update_member(
        &self,
        id: MemberId,
        update: MemberUpdate,
    ) -> Result<Option<Member>, StorageError> {
        let mut records = self.records.write().await;
        let mut staged = records.clone();
        let Some(member) = staged.members.get_mut(&id) else {
            return Ok(None);
        };
        member.apply(update);
        let updated = member.clone();
        self.commit(&mut records, staged).await?;
        Ok(Some(updated))
    }

    async fn delete_member(&self, id: MemberId) -> Result<bool, StorageError> {
        let mut records = self.records.write().await;
        if !records.members.contains_key(&id) {
            return Ok(false);
        }
        let mut staged = records.clone();
        staged.members.remove(&id);
        self.commit(&mut records, staged).await?;
        Ok(true)
    }

    async fn list_members(&self) -> Result<Vec<Member>, StorageError> {
        Ok(self.records.read().await.members.values().cloned().collect())
    }
}

#[async_trait]
impl RelationshipStore for InMemoryStore {
    async fn create_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, StorageError> {
        let mut records = self.records.write().await;
        if records.relationships.contains(&relationship) {
            return Err(StorageError::AlreadyExists(format!(
                "Relationship {} already exists",
                relationship
            )));
        }
        let mut staged = records.clone();
        staged.relationships.push(relationship);
        self.commit(&mut records, staged).await?;
        Ok(relationship)
    }

    async fn get_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Option<Relationship>, StorageError> {
        let records = self.records.read().await;
        Ok(records
            .relationships
            .iter()
            .find(|r| **r == relationship)
            .copied())
    }

    async fn delete_relationship(&self, relationship: Relationship) -> Result<bool, StorageError> {
        let mut records = self.records.write().await;
        if !records.relationships.contains(&relationship) {
            return Ok(false);
        }
        let mut staged = records.clone();
        staged.relationships.retain(|r| *r != relationship);
        self.commit(&mut records, staged).await?;
        Ok(true)
    }

    async fn replace_relationship(
        &self,
        old: Relationship,
        new: Relationship,
    ) -> Result<Relationship, StorageError> {
        let mut records = self.records.write().await;
        if !records.relationships.contains(&old) {
            return Err(StorageError::NotFound(format!("Relationship {} not found", old)));
        }
        if records.relationships.contains(&new) {
            return Err(StorageError::AlreadyExists(format!(
                "Relationship {} already exists",
                new
            )));
        }
        let mut staged = records.clone();
        staged.relationships.retain(|r| *r != old);
        staged.relationships.push(new);
        self.commit(&mut records, staged).await?;
        Ok(new)
    }

    async fn list_relationships(
        &self,
        filter: Option<RelationshipFilter>,
    ) -> Result<Vec<Relationship>, StorageError> {
        let records = self.records.read().await;
        let filter = filter.unwrap_or_default();
        Ok(records
            .relationships
            .iter()
            .filter(|r| filter.matches(r))
            .copied()
            .collect())
    }

    async fn delete_relationships_for_member(&self, id: MemberId) -> Result<usize, StorageError> {
        let mut records = self.records.write().await;
        let mut staged = records.clone();
        staged.relationships.retain(|r| !r.involves(id));
        let removed = records.relationships.len() - staged.relationships.len();
        if removed > 0 {
            self.commit(&mut records, staged).await?;
        }
        Ok(removed)
    }
}

#[async_trait]
impl PartnershipStore for InMemoryStore {
    async fn create_partnership(
        &self,
        partnership: Partnership,
    ) -> Result<Partnership, StorageError> {
        let mut records = self.records.write().await;
        if records.partnerships.contains(&partnership) {
            return Err(StorageError::AlreadyExists(format!(
                "Partnership {} already exists",
                partnership
            )));
        }
        let mut staged = records.clone();
        staged.partnerships.push(partnership);
        self.commit(&mut records, staged).await?;
        Ok(partnership)
    }

    async fn delete_partnership(&self, partnership: Partnership) -> Result<bool, StorageError> {
        let mut records = self.records.write().await;
        if !records.partnerships.contains(&partnership) {
            return Ok(false);
        }
        let mut staged = records.clone();
        staged.partnerships.retain(|p| *p != partnership);
        self.commit(&mut records, staged).await?;
        Ok(true)
    }

    async fn list_partnerships(&self) -> Result<Vec<Partnership>, StorageError> {
        Ok(self.records.read().await.partnerships.clone())
    }

    async fn delete_partnerships_for_member(&self, id: MemberId) -> Result<usize, StorageError> {
        let mut records = self.records.write().await;
        let mut staged = records.clone();
        staged.partnerships.retain(|p| !p.involves(id));
        let removed = records.partnerships.len() - staged.partnerships.len();
        if removed > 0 {
            self.commit(&mut records, staged).await?;
        }
        Ok(removed)
    }
}
