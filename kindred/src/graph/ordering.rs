//! Sibling ordering
//!
//! Children of one parent are ranked oldest first. Members without a recorded
//! date of birth sort after every dated sibling and keep the order in which
//! their relationships were recorded.

use crate::models::{Member, MemberId};

/// Order a sibling group, oldest first.
///
/// `children` must be in relationship insertion order; the sort is stable so
/// that order decides ties and undated members.
pub fn order_children(children: &[&Member]) -> Vec<MemberId> {
    let mut ranked: Vec<&Member> = children.to_vec();
    // `None` would sort first; key on `is_none()` to push undated members last.
    ranked.sort_by_key(|member| (member.date_of_birth.is_none(), member.date_of_birth));
    ranked.into_iter().map(|member| member.id).collect()
}

/// Pair each child with its 0-based rank, oldest first.
pub fn sibling_ranks(children: &[&Member]) -> Vec<(MemberId, usize)> {
    order_children(children)
        .into_iter()
        .enumerate()
        .map(|(rank, id)| (id, rank))
        .collect()
}
