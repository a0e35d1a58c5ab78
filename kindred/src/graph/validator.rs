//! Relationship validation
//!
//! Decides whether a proposed parent→child edge keeps the relationship set
//! structurally sound: no self-parenting, no duplicate pair, a bounded number
//! of distinct parents per child, and no ancestry cycle. Every check here is a
//! pure function over a snapshot of the edge set; persisting an approved edge
//! is the caller's job.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{MemberId, Partnership, Relationship};

/// Default cap on distinct parents per child
pub const DEFAULT_MAX_PARENTS: usize = 2;

/// Reason a candidate edge was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "kebab-case")]
pub enum Rejection {
    #[error("a member cannot be their own parent")]
    SelfParenting,

    #[error("relationship already exists")]
    Duplicate,

    #[error("child already has the maximum number of parents")]
    ParentCountExceeded,

    #[error("relationship would make a member their own ancestor")]
    Cycle,
}

impl Rejection {
    /// Stable reason code reported to callers
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::SelfParenting => "self-parenting",
            Rejection::Duplicate => "duplicate",
            Rejection::ParentCountExceeded => "parent-count-exceeded",
            Rejection::Cycle => "cycle",
        }
    }
}

/// Reason a partnership was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "kebab-case")]
pub enum PartnershipRejection {
    #[error("a member cannot partner with themselves")]
    SelfPartnership,

    #[error("partnership already exists")]
    Duplicate,
}

impl PartnershipRejection {
    pub fn code(&self) -> &'static str {
        match self {
            PartnershipRejection::SelfPartnership => "self-partnership",
            PartnershipRejection::Duplicate => "duplicate",
        }
    }
}

/// Requested relationship does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("relationship {0} not found")]
pub struct NotFound(pub Relationship);

/// Policy knobs for the parent-count check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentPolicy {
    /// Maximum distinct parents a child may have
    pub max_parents: usize,
}

impl Default for ParentPolicy {
    fn default() -> Self {
        Self {
            max_parents: DEFAULT_MAX_PARENTS,
        }
    }
}

/// Validate a candidate edge against the existing relationship set.
///
/// Checks run in a fixed order and the first failure wins: self-parenting,
/// duplicate, parent count, cycle.
pub fn validate(
    candidate: Relationship,
    existing: &[Relationship],
    policy: ParentPolicy,
) -> Result<(), Rejection> {
    let Relationship {
        parent_id,
        child_id,
    } = candidate;

    if parent_id == child_id {
        return Err(Rejection::SelfParenting);
    }

    if existing.contains(&candidate) {
        return Err(Rejection::Duplicate);
    }

    let parents: HashSet<MemberId> = existing
        .iter()
        .filter(|r| r.child_id == child_id)
        .map(|r| r.parent_id)
        .collect();
    if parents.len() >= policy.max_parents && !parents.contains(&parent_id) {
        return Err(Rejection::ParentCountExceeded);
    }

    if is_descendant(existing, child_id, parent_id) {
        return Err(Rejection::Cycle);
    }

    Ok(())
}

/// Validate replacing `old` with `new`, checked against the set without `old`.
pub fn validate_replacement(
    old: Relationship,
    new: Relationship,
    existing: &[Relationship],
    policy: ParentPolicy,
) -> Result<(), Rejection> {
    let remaining: Vec<Relationship> = existing.iter().copied().filter(|r| *r != old).collect();
    validate(new, &remaining, policy)
}

/// Removal only requires the edge to exist.
pub fn validate_removal(candidate: Relationship, existing: &[Relationship]) -> Result<(), NotFound> {
    if existing.contains(&candidate) {
        Ok(())
    } else {
        Err(NotFound(candidate))
    }
}

/// Validate a candidate partnership against the stored pairs.
pub fn validate_partnership(
    candidate: Partnership,
    existing: &[Partnership],
) -> Result<(), PartnershipRejection> {
    if candidate.partner1_id == candidate.partner2_id {
        return Err(PartnershipRejection::SelfPartnership);
    }
    if existing.contains(&candidate) {
        return Err(PartnershipRejection::Duplicate);
    }
    Ok(())
}

/// Whether `target` is reachable from `start` by following parent→child edges.
///
/// Each member is visited at most once, so the walk is bounded by the size of
/// the edge set even when the stored data already contains a cycle.
pub fn is_descendant(edges: &[Relationship], start: MemberId, target: MemberId) -> bool {
    let children = children_index(edges);
    let mut visited = HashSet::new();
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(next) = children.get(&current) {
            stack.extend(next.iter().copied().filter(|id| !visited.contains(id)));
        }
    }

    false
}

/// Find one cycle in the edge set, returned as the member path that closes it.
///
/// Independent of [`validate`]: an iterative three-colour DFS over the whole
/// graph, used to audit data that may have bypassed validation.
pub fn find_cycle(edges: &[Relationship]) -> Option<Vec<MemberId>> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        InProgress,
        Done,
    }

    let children = children_index(edges);
    let mut roots: Vec<MemberId> = edges.iter().map(|r| r.parent_id).collect();
    roots.sort();
    roots.dedup();

    let mut marks: HashMap<MemberId, Mark> = HashMap::new();

    for root in roots {
        if marks.contains_key(&root) {
            continue;
        }

        // (member, index of the next child to explore)
        let mut stack: Vec<(MemberId, usize)> = vec![(root, 0)];
        let mut path: Vec<MemberId> = vec![root];
        marks.insert(root, Mark::InProgress);

        while let Some((node, next_index)) = stack.last_mut() {
            let node = *node;
            let kids = children.get(&node).map(Vec::as_slice).unwrap_or(&[]);

            if *next_index >= kids.len() {
                marks.insert(node, Mark::Done);
                stack.pop();
                path.pop();
                continue;
            }

            let child = kids[*next_index];
            *next_index += 1;

            match marks.get(&child) {
                Some(Mark::InProgress) => {
                    let start = path.iter().position(|id| *id == child).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(child);
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(child, Mark::InProgress);
                    stack.push((child, 0));
                    path.push(child);
                }
            }
        }
    }

    None
}

fn children_index(edges: &[Relationship]) -> HashMap<MemberId, Vec<MemberId>> {
    let mut index: HashMap<MemberId, Vec<MemberId>> = HashMap::new();
    for edge in edges {
        index.entry(edge.parent_id).or_default().push(edge.child_id);
    }
    index
}
