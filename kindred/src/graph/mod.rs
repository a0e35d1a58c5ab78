//! Genealogical graph engine
//!
//! The pieces are leaf-first: [`validator`] guards the write path,
//! [`ordering`] ranks sibling groups, [`builder`] assembles the per-request
//! [`FamilyGraph`], and [`serializer`] renders it to a [`GraphPayload`].

pub mod builder;
pub mod ordering;
pub mod serializer;
pub mod validator;

pub use builder::{DropReason, DroppedEdge, FamilyGraph, GraphEdge};
pub use ordering::{order_children, sibling_ranks};
pub use serializer::{EdgeRecord, GraphPayload, NodeRecord, edge_id, node_id, serialize};
pub use validator::{
    DEFAULT_MAX_PARENTS, NotFound, ParentPolicy, PartnershipRejection, Rejection, find_cycle,
    is_descendant, validate, validate_partnership, validate_removal, validate_replacement,
};

use crate::models::{Member, Relationship};

/// Build and render in one pass.
pub fn render(members: Vec<Member>, relationships: &[Relationship]) -> GraphPayload {
    serialize(&FamilyGraph::build(members, relationships))
}
