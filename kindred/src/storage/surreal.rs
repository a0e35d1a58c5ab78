//! Embedded SurrealDB record store
//!
//! Records live in three tables keyed by their natural identity:
//! `member:<id>`, `relationship:<parent>_<child>` and
//! `partnership:<a>_<b>`. Relationships and partnerships carry a `seq` field
//! so listings come back in insertion order. The member id counter is kept
//! in `meta:counters` so ids of deleted members are never handed out again.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::config::{SurrealDBConfig, SurrealDBEngine};
use crate::models::{Member, MemberId, MemberUpdate, NewMember, Partnership, Relationship, Sex};
use crate::storage::errors::StorageError;
use crate::storage::filters::RelationshipFilter;
use crate::storage::traits::{BaseStore, MemberStore, PartnershipStore, RelationshipStore};

const MEMBER_TABLE: &str = "member";
const RELATIONSHIP_TABLE: &str = "relationship";
const PARTNERSHIP_TABLE: &str = "partnership";
const META_TABLE: &str = "meta";
const COUNTERS_KEY: &str = "counters";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CounterRecord {
    next_member_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MemberRecord {
    member_id: i64,
    firstname: String,
    lastname: String,
    date_of_birth: Option<NaiveDate>,
    date_of_death: Option<NaiveDate>,
    sex: Sex,
}

impl From<&Member> for MemberRecord {
    fn from(member: &Member) -> Self {
        Self {
            member_id: member.id.get(),
            firstname: member.firstname.clone(),
            lastname: member.lastname.clone(),
            date_of_birth: member.date_of_birth,
            date_of_death: member.date_of_death,
            sex: member.sex,
        }
    }
}

impl From<MemberRecord> for Member {
    fn from(record: MemberRecord) -> Self {
        Self {
            id: MemberId(record.member_id),
            firstname: record.firstname,
            lastname: record.lastname,
            date_of_birth: record.date_of_birth,
            date_of_death: record.date_of_death,
            sex: record.sex,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeRecord {
    parent_id: i64,
    child_id: i64,
    seq: u64,
}

impl From<EdgeRecord> for Relationship {
    fn from(record: EdgeRecord) -> Self {
        Relationship::new(record.parent_id, record.child_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PairRecord {
    partner1_id: i64,
    partner2_id: i64,
    seq: u64,
}

impl From<PairRecord> for Partnership {
    fn from(record: PairRecord) -> Self {
        Partnership::new(record.partner1_id, record.partner2_id)
    }
}

fn relationship_key(relationship: &Relationship) -> (&'static str, String) {
    (
        RELATIONSHIP_TABLE,
        format!("{}_{}", relationship.parent_id, relationship.child_id),
    )
}

fn partnership_key(partnership: &Partnership) -> (&'static str, String) {
    (
        PARTNERSHIP_TABLE,
        format!("{}_{}", partnership.partner1_id, partnership.partner2_id),
    )
}

/// Record store backed by embedded SurrealDB
#[derive(Debug)]
pub struct SurrealStore {
    client: Surreal<Db>,
    next_member_id: AtomicI64,
    next_seq: AtomicU64,
}

impl SurrealStore {
    /// Connect using the configured engine and select namespace/database.
    pub async fn connect(config: &SurrealDBConfig) -> Result<Self, StorageError> {
        let client = match config.engine {
            SurrealDBEngine::Memory => {
                tracing::info!("Creating SurrealDB in-memory record store");
                Surreal::new::<Mem>(()).await.map_err(|e| {
                    StorageError::Connection(format!("Failed to create memory client: {}", e))
                })?
            }
            SurrealDBEngine::RocksDB => {
                tracing::info!(path = %config.path.display(), "Creating SurrealDB RocksDB record store");
                Surreal::new::<RocksDb>(config.path.as_path())
                    .await
                    .map_err(|e| {
                        StorageError::Connection(format!("Failed to create RocksDB client: {}", e))
                    })?
            }
        };

        client
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to set namespace/database: {}", e))
            })?;

        Self::from_client(client).await
    }

    /// Wrap a connected client, picking the counters up from stored data.
    pub async fn from_client(client: Surreal<Db>) -> Result<Self, StorageError> {
        let store = Self {
            client,
            next_member_id: AtomicI64::new(1),
            next_seq: AtomicU64::new(0),
        };
        store.restore_counters().await?;
        Ok(store)
    }

    async fn restore_counters(&self) -> Result<(), StorageError> {
        let members = self.member_records().await?;
        let after_max = members.iter().map(|m| m.member_id).max().unwrap_or(0) + 1;
        let counters: Option<CounterRecord> = self
            .client
            .select((META_TABLE, COUNTERS_KEY))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to read counters: {}", e)))?;
        let next_id = counters.map_or(after_max, |c| c.next_member_id.max(after_max));
        self.next_member_id.store(next_id, Ordering::SeqCst);

        let edges = self.edge_records().await?;
        let pairs = self.pair_records().await?;
        let max_seq = edges
            .iter()
            .map(|e| e.seq + 1)
            .chain(pairs.iter().map(|p| p.seq + 1))
            .max()
            .unwrap_or(0);
        self.next_seq.store(max_seq, Ordering::SeqCst);
        Ok(())
    }

    async fn save_member_counter(&self, next_member_id: i64) -> Result<(), StorageError> {
        let _: Option<CounterRecord> = self
            .client
            .upsert((META_TABLE, COUNTERS_KEY))
            .content(CounterRecord { next_member_id })
            .await
            .map_err(|e| StorageError::Query(format!("Failed to save counters: {}", e)))?;
        Ok(())
    }

    async fn member_records(&self) -> Result<Vec<MemberRecord>, StorageError> {
        let mut records: Vec<MemberRecord> = self
            .client
            .select(MEMBER_TABLE)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list members: {}", e)))?;
        records.sort_by_key(|r| r.member_id);
        Ok(records)
    }

    async fn edge_records(&self) -> Result<Vec<EdgeRecord>, StorageError> {
        let mut records: Vec<EdgeRecord> = self
            .client
            .select(RELATIONSHIP_TABLE)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list relationships: {}", e)))?;
        records.sort_by_key(|r| r.seq);
        Ok(records)
    }

    async fn pair_records(&self) -> Result<Vec<PairRecord>, StorageError> {
        let mut records: Vec<PairRecord> = self
            .client
            .select(PARTNERSHIP_TABLE)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list partnerships: {}", e)))?;
        records.sort_by_key(|r| r.seq);
        Ok(records)
    }
}

#[async_trait]
impl BaseStore for SurrealStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(self.client.health().await.is_ok())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.client
            .query("DELETE member; DELETE relationship; DELETE partnership;")
            .await
            .map_err(|e| StorageError::Query(format!("Failed to clear store: {}", e)))?;
        self.next_seq.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        Ok(serde_json::json!({
            "type": "surrealdb",
            "member_count": self.member_records().await?.len(),
            "relationship_count": self.edge_records().await?.len(),
            "partnership_count": self.pair_records().await?.len(),
        }))
    }
}

#[async_trait]
impl MemberStore for SurrealStore {
    async fn create_member(&self, member: NewMember) -> Result<Member, StorageError> {
        let id = MemberId(self.next_member_id.fetch_add(1, Ordering::SeqCst));
        // Record the id as issued before the member exists
        self.save_member_counter(id.get() + 1).await?;
        let member = Member::from_new(id, member);

        let created: Option<MemberRecord> = self
            .client
            .create((MEMBER_TABLE, id.get()))
            .content(MemberRecord::from(&member))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to create member: {}", e)))?;

        created
            .map(Member::from)
            .ok_or_else(|| StorageError::Internal("No member created".to_string()))
    }

    async fn get_member(&self, id: MemberId) -> Result<Option<Member>, StorageError> {
        let record: Option<MemberRecord> = self
            .client
            .select((MEMBER_TABLE, id.get()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get member: {}", e)))?;

        Ok(record.map(Member::from))
    }

    async fn update_member(
        &self,
        id: MemberId,
        update: MemberUpdate,
    ) -> Result<Option<Member>, StorageError> {
        let Some(mut member) = self.get_member(id).await? else {
            return Ok(None);
        };
        member.apply(update);

        let updated: Option<MemberRecord> = self
            .client
            .update((MEMBER_TABLE, id.get()))
            .content(MemberRecord::from(&member))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update member: {}", e)))?;

        Ok(updated.map(Member::from))
    }

    async fn delete_member(&self, id: MemberId) -> Result<bool, StorageError> {
        let deleted: Option<MemberRecord> = self
            .client
            .delete((MEMBER_TABLE, id.get()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete member: {}", e)))?;

        Ok(deleted.is_some())
    }

    async fn list_members(&self) -> Result<Vec<Member>, StorageError> {
        Ok(self
            .member_records()
            .await?
            .into_iter()
            .map(Member::from)
            .collect())
    }
}

#[async_trait]
impl RelationshipStore for SurrealStore {
    async fn create_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, StorageError> {
        if self.get_relationship(relationship).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "Relationship {} already exists",
                relationship
            )));
        }

        let record = EdgeRecord {
            parent_id: relationship.parent_id.get(),
            child_id: relationship.child_id.get(),
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
        };
        let created: Option<EdgeRecord> = self
            .client
            .create(relationship_key(&relationship))
            .content(record)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to create relationship: {}", e)))?;

        created
            .map(Relationship::from)
            .ok_or_else(|| StorageError::Internal("No relationship created".to_string()))
    }

    async fn get_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Option<Relationship>, StorageError> {
        let record: Option<EdgeRecord> = self
            .client
            .select(relationship_key(&relationship))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get relationship: {}", e)))?;

        Ok(record.map(Relationship::from))
    }

    async fn delete_relationship(&self, relationship: Relationship) -> Result<bool, StorageError> {
        let deleted: Option<EdgeRecord> = self
            .client
            .delete(relationship_key(&relationship))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete relationship: {}", e)))?;

        Ok(deleted.is_some())
    }

    async fn replace_relationship(
        &self,
        old: Relationship,
        new: Relationship,
    ) -> Result<Relationship, StorageError> {
        if self.get_relationship(old).await?.is_none() {
            return Err(StorageError::NotFound(format!("Relationship {} not found", old)));
        }
        if self.get_relationship(new).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "Relationship {} already exists",
                new
            )));
        }

        let record = EdgeRecord {
            parent_id: new.parent_id.get(),
            child_id: new.child_id.get(),
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
        };
        self.client
            .query(
                "BEGIN TRANSACTION; \
                 DELETE type::thing($table, $old); \
                 CREATE type::thing($table, $new) CONTENT $record; \
                 COMMIT TRANSACTION;",
            )
            .bind(("table", RELATIONSHIP_TABLE))
            .bind(("old", relationship_key(&old).1))
            .bind(("new", relationship_key(&new).1))
            .bind(("record", record))
            .await
            .and_then(|response| response.check())
            .map_err(|e| StorageError::Query(format!("Failed to replace relationship: {}", e)))?;

        Ok(new)
    }

    async fn list_relationships(
        &self,
        filter: Option<RelationshipFilter>,
    ) -> Result<Vec<Relationship>, StorageError> {
        let filter = filter.unwrap_or_default();
        Ok(self
            .edge_records()
            .await?
            .into_iter()
            .map(Relationship::from)
            .filter(|r| filter.matches(r))
            .collect())
    }

    async fn delete_relationships_for_member(&self, id: MemberId) -> Result<usize, StorageError> {
        let mut removed = 0;
        for relationship in self.list_relationships(None).await? {
            if relationship.involves(id) && self.delete_relationship(relationship).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl PartnershipStore for SurrealStore {
    async fn create_partnership(
        &self,
        partnership: Partnership,
    ) -> Result<Partnership, StorageError> {
        let existing: Option<PairRecord> = self
            .client
            .select(partnership_key(&partnership))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get partnership: {}", e)))?;
        if existing.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "Partnership {} already exists",
                partnership
            )));
        }

        let record = PairRecord {
            partner1_id: partnership.partner1_id.get(),
            partner2_id: partnership.partner2_id.get(),
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
        };
        let created: Option<PairRecord> = self
            .client
            .create(partnership_key(&partnership))
            .content(record)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to create partnership: {}", e)))?;

        created
            .map(Partnership::from)
            .ok_or_else(|| StorageError::Internal("No partnership created".to_string()))
    }

    async fn delete_partnership(&self, partnership: Partnership) -> Result<bool, StorageError> {
        let deleted: Option<PairRecord> = self
            .client
            .delete(partnership_key(&partnership))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete partnership: {}", e)))?;

        Ok(deleted.is_some())
    }

    async fn list_partnerships(&self) -> Result<Vec<Partnership>, StorageError> {
        Ok(self
            .pair_records()
            .await?
            .into_iter()
            .map(Partnership::from)
            .collect())
    }

    async fn delete_partnerships_for_member(&self, id: MemberId) -> Result<usize, StorageError> {
        let mut removed = 0;
        for partnership in self.list_partnerships().await? {
            if partnership.involves(id) && self.delete_partnership(partnership).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberBuilder;

    async fn memory_store() -> SurrealStore {
        SurrealStore::connect(&SurrealDBConfig {
            engine: SurrealDBEngine::Memory,
            ..SurrealDBConfig::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_member_round_trip() {
        let store = memory_store().await;
        let created = store
            .create_member(
                MemberBuilder::new("Dorothy", "Javier")
                    .born("1947-11-10")
                    .sex(Sex::Female)
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(created.id, MemberId(1));

        let fetched = store.get_member(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        assert!(store.delete_member(created.id).await.unwrap());
        assert!(store.get_member(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_relationships_listed_in_insertion_order() {
        let store = memory_store().await;
        for (parent, child) in [(5, 9), (5, 7), (5, 8)] {
            store
                .create_relationship(Relationship::new(parent, child))
                .await
                .unwrap();
        }

        let children: Vec<i64> = store
            .list_relationships(None)
            .await
            .unwrap()
            .iter()
            .map(|r| r.child_id.get())
            .collect();
        assert_eq!(children, vec![9, 7, 8]);

        assert!(matches!(
            store.create_relationship(Relationship::new(5, 9)).await,
            Err(StorageError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_deleted_id_not_reissued_after_reconnect() {
        let store = memory_store().await;
        store
            .create_member(MemberBuilder::new("Mom", "Javier").build())
            .await
            .unwrap();
        let jr = store
            .create_member(MemberBuilder::new("Jr", "Javier").build())
            .await
            .unwrap();
        assert!(store.delete_member(jr.id).await.unwrap());

        let reopened = SurrealStore::from_client(store.client.clone()).await.unwrap();
        let kat = reopened
            .create_member(MemberBuilder::new("Kat", "Javier").build())
            .await
            .unwrap();
        assert_eq!(kat.id, MemberId(3));
    }

    #[tokio::test]
    async fn test_replace_relationship() {
        let store = memory_store().await;
        for (parent, child) in [(1, 2), (1, 3)] {
            store
                .create_relationship(Relationship::new(parent, child))
                .await
                .unwrap();
        }

        store
            .replace_relationship(Relationship::new(1, 2), Relationship::new(1, 4))
            .await
            .unwrap();
        assert_eq!(
            store.list_relationships(None).await.unwrap(),
            vec![Relationship::new(1, 3), Relationship::new(1, 4)]
        );
        assert!(matches!(
            store
                .replace_relationship(Relationship::new(1, 2), Relationship::new(1, 5))
                .await,
            Err(StorageError::NotFound(_))
        ));
    }
}
