//! Filter types for storage queries

use serde::{Deserialize, Serialize};

use crate::models::{MemberId, Relationship};

/// Filter for relationship queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RelationshipFilter {
    /// Only relationships with this parent
    pub parent_id: Option<MemberId>,

    /// Only relationships with this child
    pub child_id: Option<MemberId>,
}

impl RelationshipFilter {
    pub fn parent(id: MemberId) -> Self {
        Self {
            parent_id: Some(id),
            child_id: None,
        }
    }

    pub fn child(id: MemberId) -> Self {
        Self {
            parent_id: None,
            child_id: Some(id),
        }
    }

    pub fn matches(&self, relationship: &Relationship) -> bool {
        self.parent_id.is_none_or(|id| relationship.parent_id == id)
            && self.child_id.is_none_or(|id| relationship.child_id == id)
    }
}
