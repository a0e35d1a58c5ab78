//! Domain models for family members, parent/child relationships and partnerships

pub mod member;
pub mod relationship;

// Re-export important models
pub use member::{Member, MemberBuilder, MemberId, MemberUpdate, NewMember, Sex};
pub use relationship::{Partnership, Relationship};
