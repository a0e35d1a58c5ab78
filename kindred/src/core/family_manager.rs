//! Family Manager interface for Kindred
//!
//! `FamilyManager` is the engine's front door. Reads take a fresh snapshot
//! from the record store and build a throwaway [`FamilyGraph`]; mutations run
//! validate-then-write under one writer lock so two overlapping inserts can
//! never both pass validation against a stale snapshot.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::{DeletionPolicy, KindredConfig};
use crate::graph::{self, FamilyGraph, GraphPayload, ParentPolicy};
use crate::models::{Member, MemberId, MemberUpdate, NewMember, Partnership, Relationship};
use crate::seed::{self, SeedReport};
use crate::storage::{RecordStore, RelationshipFilter};
use crate::{KindredError, Result};

/// The primary interface for interacting with the family records.
#[derive(Debug)]
pub struct FamilyManager {
    store: Arc<dyn RecordStore>,
    config: KindredConfig,
    write_lock: Mutex<()>,
}

impl FamilyManager {
    pub fn new(store: Arc<dyn RecordStore>, config: KindredConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the underlying record store
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Get the configuration
    pub fn config(&self) -> &KindredConfig {
        &self.config
    }

    /// Parent-count policy derived from the configuration
    pub fn policy(&self) -> ParentPolicy {
        ParentPolicy {
            max_parents: self.config.graph.max_parents,
        }
    }

    // Engine operations

    /// Read the current records and render the graph payload.
    pub async fn get_graph(&self) -> Result<GraphPayload> {
        let graph = self.build_graph().await?;
        Ok(graph::serialize(&graph))
    }

    /// Read the current records and build the graph without rendering it.
    pub async fn build_graph(&self) -> Result<FamilyGraph> {
        let members = self.store.list_members().await?;
        let relationships = self.store.list_relationships(None).await?;
        Ok(FamilyGraph::build(members, &relationships))
    }

    /// Check a proposed edge without writing it.
    ///
    /// Returns [`KindredError::Rejected`] with the first failing check.
    pub async fn validate_new_relationship(
        &self,
        parent_id: MemberId,
        child_id: MemberId,
    ) -> Result<()> {
        let candidate = Relationship::new(parent_id, child_id);
        let existing = self.store.list_relationships(None).await?;
        self.check(candidate, &existing)
    }

    /// Check that an edge exists and may be removed.
    pub async fn validate_relationship_removal(
        &self,
        parent_id: MemberId,
        child_id: MemberId,
    ) -> Result<()> {
        let candidate = Relationship::new(parent_id, child_id);
        let existing = self.store.list_relationships(None).await?;
        graph::validate_removal(candidate, &existing)
            .map_err(|e| KindredError::NotFound(e.to_string()))
    }

    /// Children of `parent_id`, oldest first.
    pub async fn order_children(&self, parent_id: MemberId) -> Result<Vec<MemberId>> {
        let members: HashMap<MemberId, Member> = self
            .store
            .list_members()
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        if !members.contains_key(&parent_id) {
            return Err(KindredError::member_not_found(parent_id));
        }

        let relationships = self
            .store
            .list_relationships(Some(RelationshipFilter::parent(parent_id)))
            .await?;
        // A duplicated stored edge counts once, as in the built graph
        let mut seen = HashSet::new();
        let children: Vec<&Member> = relationships
            .iter()
            .filter(|r| seen.insert(r.child_id))
            .filter_map(|r| members.get(&r.child_id))
            .collect();

        Ok(graph::order_children(&children))
    }

    /// Every ancestor of a member, nearest generation first.
    pub async fn ancestors(&self, id: MemberId) -> Result<Vec<Member>> {
        let graph = self.build_graph().await?;
        if !graph.contains(id) {
            return Err(KindredError::member_not_found(id));
        }
        Ok(Self::resolve(&graph, graph.ancestors(id)))
    }

    /// Every descendant of a member, nearest generation first.
    pub async fn descendants(&self, id: MemberId) -> Result<Vec<Member>> {
        let graph = self.build_graph().await?;
        if !graph.contains(id) {
            return Err(KindredError::member_not_found(id));
        }
        Ok(Self::resolve(&graph, graph.descendants(id)))
    }

    // Members

    pub async fn create_member(&self, member: NewMember) -> Result<Member> {
        member.validate().map_err(KindredError::InvalidInput)?;

        let _guard = self.write_lock.lock().await;
        let created = self.store.create_member(member).await?;
        tracing::debug!(id = %created.id, name = %created.display_name(), "Created member");
        Ok(created)
    }

    pub async fn get_member(&self, id: MemberId) -> Result<Member> {
        self.store
            .get_member(id)
            .await?
            .ok_or_else(|| KindredError::member_not_found(id))
    }

    /// All members, ordered by id
    pub async fn list_members(&self) -> Result<Vec<Member>> {
        Ok(self.store.list_members().await?)
    }

    pub async fn update_member(&self, id: MemberId, update: MemberUpdate) -> Result<Member> {
        let _guard = self.write_lock.lock().await;

        let current = self
            .store
            .get_member(id)
            .await?
            .ok_or_else(|| KindredError::member_not_found(id))?;
        if update.is_empty() {
            return Ok(current);
        }

        let mut candidate = current;
        candidate.apply(update.clone());
        NewMember::from(candidate)
            .validate()
            .map_err(KindredError::InvalidInput)?;

        self.store
            .update_member(id, update)
            .await?
            .ok_or_else(|| KindredError::member_not_found(id))
    }

    /// Delete a member according to the configured deletion policy.
    pub async fn delete_member(&self, id: MemberId) -> Result<Member> {
        let _guard = self.write_lock.lock().await;

        let member = self
            .store
            .get_member(id)
            .await?
            .ok_or_else(|| KindredError::member_not_found(id))?;

        let relationships = self.store.list_relationships(None).await?;
        let partnerships = self.store.list_partnerships().await?;
        let edge_count = relationships.iter().filter(|r| r.involves(id)).count();
        let pair_count = partnerships.iter().filter(|p| p.involves(id)).count();

        match self.config.graph.member_deletion {
            DeletionPolicy::Restrict if edge_count + pair_count > 0 => {
                return Err(KindredError::Conflict(format!(
                    "member {} still has {} relationship(s) and {} partnership(s)",
                    id, edge_count, pair_count
                )));
            }
            DeletionPolicy::Restrict => {}
            DeletionPolicy::Cascade => {
                let edges = self.store.delete_relationships_for_member(id).await?;
                let pairs = self.store.delete_partnerships_for_member(id).await?;
                tracing::debug!(%id, edges, pairs, "Cascaded member deletion");
            }
        }

        self.store.delete_member(id).await?;
        tracing::debug!(%id, "Deleted member");
        Ok(member)
    }

    // Relationships

    /// Validate and persist a parent→child edge.
    pub async fn add_relationship(
        &self,
        parent_id: MemberId,
        child_id: MemberId,
    ) -> Result<Relationship> {
        let candidate = Relationship::new(parent_id, child_id);
        let _guard = self.write_lock.lock().await;

        self.require_members(&[parent_id, child_id]).await?;
        let existing = self.store.list_relationships(None).await?;
        self.check(candidate, &existing)?;

        let created = self.store.create_relationship(candidate).await?;
        tracing::debug!(relationship = %created, "Added relationship");
        Ok(created)
    }

    pub async fn get_relationship(
        &self,
        parent_id: MemberId,
        child_id: MemberId,
    ) -> Result<Relationship> {
        let relationship = Relationship::new(parent_id, child_id);
        self.store
            .get_relationship(relationship)
            .await?
            .ok_or_else(|| KindredError::relationship_not_found(relationship))
    }

    /// Relationships in insertion order
    pub async fn list_relationships(
        &self,
        filter: Option<RelationshipFilter>,
    ) -> Result<Vec<Relationship>> {
        Ok(self.store.list_relationships(filter).await?)
    }

    /// Point an existing edge at a different child.
    pub async fn change_child(
        &self,
        parent_id: MemberId,
        child_id: MemberId,
        new_child_id: MemberId,
    ) -> Result<Relationship> {
        let old = Relationship::new(parent_id, child_id);
        let new = Relationship::new(parent_id, new_child_id);
        let _guard = self.write_lock.lock().await;

        let existing = self.store.list_relationships(None).await?;
        graph::validate_removal(old, &existing)
            .map_err(|e| KindredError::NotFound(e.to_string()))?;
        if old == new {
            return Ok(old);
        }
        self.require_members(&[new_child_id]).await?;

        if let Err(rejection) = graph::validate_replacement(old, new, &existing, self.policy()) {
            tracing::warn!(from = %old, to = %new, reason = rejection.code(), "Rejected relationship change");
            return Err(rejection.into());
        }

        let created = self.store.replace_relationship(old, new).await?;
        tracing::debug!(from = %old, to = %created, "Changed relationship child");
        Ok(created)
    }

    pub async fn remove_relationship(&self, parent_id: MemberId, child_id: MemberId) -> Result<()> {
        let candidate = Relationship::new(parent_id, child_id);
        let _guard = self.write_lock.lock().await;

        let existing = self.store.list_relationships(None).await?;
        graph::validate_removal(candidate, &existing)
            .map_err(|e| KindredError::NotFound(e.to_string()))?;

        self.store.delete_relationship(candidate).await?;
        tracing::debug!(relationship = %candidate, "Removed relationship");
        Ok(())
    }

    // Partnerships

    pub async fn add_partnership(&self, a: MemberId, b: MemberId) -> Result<Partnership> {
        let candidate = Partnership::new(a, b);
        let _guard = self.write_lock.lock().await;

        self.require_members(&[a, b]).await?;
        let existing = self.store.list_partnerships().await?;
        graph::validate_partnership(candidate, &existing)?;

        Ok(self.store.create_partnership(candidate).await?)
    }

    pub async fn list_partnerships(&self) -> Result<Vec<Partnership>> {
        Ok(self.store.list_partnerships().await?)
    }

    pub async fn remove_partnership(&self, a: MemberId, b: MemberId) -> Result<()> {
        let partnership = Partnership::new(a, b);
        let _guard = self.write_lock.lock().await;

        if !self.store.delete_partnership(partnership).await? {
            return Err(KindredError::NotFound(format!(
                "partnership {} not found",
                partnership
            )));
        }
        Ok(())
    }

    // Seeding

    /// Load the demo family. Only allowed on an empty store.
    pub async fn seed_demo(&self) -> Result<SeedReport> {
        let _guard = self.write_lock.lock().await;

        if !self.store.list_members().await?.is_empty() {
            return Err(KindredError::Conflict(
                "demo family can only be loaded into an empty store".to_string(),
            ));
        }
        Ok(seed::seed_store(self.store.as_ref(), self.policy()).await?)
    }

    fn check(&self, candidate: Relationship, existing: &[Relationship]) -> Result<()> {
        match graph::validate(candidate, existing, self.policy()) {
            Ok(()) => {
                tracing::debug!(relationship = %candidate, "Relationship accepted");
                Ok(())
            }
            Err(rejection) => {
                tracing::warn!(relationship = %candidate, reason = rejection.code(), "Relationship rejected");
                Err(rejection.into())
            }
        }
    }

    async fn require_members(&self, ids: &[MemberId]) -> Result<()> {
        for &id in ids {
            if self.store.get_member(id).await?.is_none() {
                return Err(KindredError::member_not_found(id));
            }
        }
        Ok(())
    }

    fn resolve(graph: &FamilyGraph, ids: Vec<MemberId>) -> Vec<Member> {
        ids.into_iter()
            .filter_map(|id| graph.member(id).cloned())
            .collect()
    }
}
