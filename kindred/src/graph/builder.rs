//! Graph construction
//!
//! Assembles members and relationships into an immutable, per-request
//! [`FamilyGraph`]. Every member becomes a node, isolated ones included. Each
//! relationship becomes an edge annotated with the child's rank in that
//! parent's sibling group. Edges pointing at unknown members are dropped and
//! reported rather than failing the build.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ordering::order_children;
use super::validator::find_cycle;
use crate::models::{Member, MemberId, Relationship};

/// One parent→child edge with its sibling rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub parent: MemberId,
    pub child: MemberId,
    /// 0-based rank of `child` among `parent`'s children
    pub order: usize,
}

/// Why an input relationship did not make it into the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropReason {
    DanglingParent,
    DanglingChild,
    Duplicate,
}

impl DropReason {
    pub fn code(&self) -> &'static str {
        match self {
            DropReason::DanglingParent => "dangling-parent",
            DropReason::DanglingChild => "dangling-child",
            DropReason::Duplicate => "duplicate",
        }
    }
}

/// A relationship omitted from the graph, kept for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedEdge {
    pub relationship: Relationship,
    pub reason: DropReason,
}

/// Derived, in-memory family graph built fresh for each request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyGraph {
    nodes: Vec<Member>,
    edges: Vec<GraphEdge>,
    dropped: Vec<DroppedEdge>,
    index: HashMap<MemberId, usize>,
}

impl FamilyGraph {
    /// Build the graph from a member list and a relationship list.
    ///
    /// Node order follows `members`; edge order follows `relationships`.
    pub fn build(members: Vec<Member>, relationships: &[Relationship]) -> Self {
        let mut nodes = Vec::with_capacity(members.len());
        let mut index = HashMap::with_capacity(members.len());
        for member in members {
            // First occurrence wins if a store ever hands back the same id twice.
            if index.contains_key(&member.id) {
                tracing::warn!(member_id = %member.id, "Duplicate member id in input, keeping first");
                continue;
            }
            index.insert(member.id, nodes.len());
            nodes.push(member);
        }

        let mut dropped = Vec::new();
        let mut seen = HashSet::with_capacity(relationships.len());
        let mut kept: Vec<Relationship> = Vec::with_capacity(relationships.len());

        for relationship in relationships {
            let reason = if !index.contains_key(&relationship.parent_id) {
                Some(DropReason::DanglingParent)
            } else if !index.contains_key(&relationship.child_id) {
                Some(DropReason::DanglingChild)
            } else if !seen.insert(*relationship) {
                Some(DropReason::Duplicate)
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    tracing::warn!(
                        parent_id = %relationship.parent_id,
                        child_id = %relationship.child_id,
                        reason = reason.code(),
                        "Dropping relationship from graph"
                    );
                    dropped.push(DroppedEdge {
                        relationship: *relationship,
                        reason,
                    });
                }
                None => kept.push(*relationship),
            }
        }

        // Sibling groups keyed by parent, children in relationship order.
        let mut groups: BTreeMap<MemberId, Vec<&Member>> = BTreeMap::new();
        for relationship in &kept {
            let child = &nodes[index[&relationship.child_id]];
            groups.entry(relationship.parent_id).or_default().push(child);
        }

        let mut ranks: HashMap<(MemberId, MemberId), usize> = HashMap::with_capacity(kept.len());
        for (parent, children) in &groups {
            for (rank, child) in order_children(children).into_iter().enumerate() {
                ranks.insert((*parent, child), rank);
            }
        }

        let edges: Vec<GraphEdge> = kept
            .iter()
            .map(|r| GraphEdge {
                parent: r.parent_id,
                child: r.child_id,
                order: ranks.get(&(r.parent_id, r.child_id)).copied().unwrap_or(0),
            })
            .collect();

        if let Some(cycle) = find_cycle(&kept) {
            let path: Vec<String> = cycle.iter().map(ToString::to_string).collect();
            tracing::warn!(cycle = %path.join(" -> "), "Stored relationships contain a cycle");
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            dropped = dropped.len(),
            "Built family graph"
        );

        Self {
            nodes,
            edges,
            dropped,
            index,
        }
    }

    pub fn nodes(&self) -> &[Member] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Relationships left out of the graph, with the reason for each
    pub fn dropped(&self) -> &[DroppedEdge] {
        &self.dropped
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.index.contains_key(&id)
    }

    /// Children of `parent`, oldest first
    pub fn children_of(&self, parent: MemberId) -> Vec<MemberId> {
        let mut children: Vec<&GraphEdge> =
            self.edges.iter().filter(|e| e.parent == parent).collect();
        children.sort_by_key(|e| e.order);
        children.into_iter().map(|e| e.child).collect()
    }

    /// Recorded parents of `child`, in relationship order
    pub fn parents_of(&self, child: MemberId) -> Vec<MemberId> {
        self.edges
            .iter()
            .filter(|e| e.child == child)
            .map(|e| e.parent)
            .collect()
    }

    /// Members with no recorded parents, in node order
    pub fn roots(&self) -> Vec<MemberId> {
        let with_parents: HashSet<MemberId> = self.edges.iter().map(|e| e.child).collect();
        self.nodes
            .iter()
            .map(|m| m.id)
            .filter(|id| !with_parents.contains(id))
            .collect()
    }

    /// Every ancestor of `id`, nearest generation first. Excludes `id` itself.
    pub fn ancestors(&self, id: MemberId) -> Vec<MemberId> {
        self.walk(id, |graph, current| graph.parents_of(current))
    }

    /// Every descendant of `id`, nearest generation first. Excludes `id` itself.
    pub fn descendants(&self, id: MemberId) -> Vec<MemberId> {
        self.walk(id, |graph, current| graph.children_of(current))
    }

    /// Breadth-first walk with a visited set; terminates on cyclic data.
    fn walk<F>(&self, start: MemberId, next: F) -> Vec<MemberId>
    where
        F: Fn(&Self, MemberId) -> Vec<MemberId>,
    {
        let mut visited = HashSet::from([start]);
        let mut queue = std::collections::VecDeque::from([start]);
        let mut found = Vec::new();

        while let Some(current) = queue.pop_front() {
            for neighbour in next(self, current) {
                if visited.insert(neighbour) {
                    found.push(neighbour);
                    queue.push_back(neighbour);
                }
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberBuilder;

    fn member(id: i64, born: Option<&str>) -> Member {
        let builder = MemberBuilder::new(format!("M{}", id), "Test");
        match born {
            Some(date) => builder.born(date).with_id(id),
            None => builder.with_id(id),
        }
    }

    fn edges(pairs: &[(i64, i64)]) -> Vec<Relationship> {
        pairs.iter().copied().map(Relationship::from).collect()
    }

    #[test]
    fn test_isolated_members_are_nodes() {
        let graph = FamilyGraph::build(vec![member(1, None), member(2, None)], &[]);
        assert_eq!(graph.nodes().len(), 2);
        assert!(graph.edges().is_empty());
        assert_eq!(graph.roots(), vec![MemberId(1), MemberId(2)]);
    }

    #[test]
    fn test_dangling_edge_is_dropped() {
        let graph = FamilyGraph::build(
            vec![member(1, None), member(2, None)],
            &edges(&[(1, 2), (1, 99)]),
        );

        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(
            graph.edges(),
            &[GraphEdge {
                parent: MemberId(1),
                child: MemberId(2),
                order: 0
            }]
        );
        assert_eq!(
            graph.dropped(),
            &[DroppedEdge {
                relationship: Relationship::new(1, 99),
                reason: DropReason::DanglingChild,
            }]
        );
    }

    #[test]
    fn test_dangling_parent_and_duplicate_are_dropped() {
        let graph = FamilyGraph::build(
            vec![member(1, None), member(2, None)],
            &edges(&[(50, 2), (1, 2), (1, 2)]),
        );

        assert_eq!(graph.edges().len(), 1);
        let reasons: Vec<DropReason> = graph.dropped().iter().map(|d| d.reason).collect();
        assert_eq!(reasons, vec![DropReason::DanglingParent, DropReason::Duplicate]);
    }

    #[test]
    fn test_edges_carry_sibling_rank() {
        let members = vec![
            member(1, Some("1960-01-01")),
            member(2, Some("1990-01-01")),
            member(3, None),
            member(4, Some("1985-06-01")),
            member(5, None),
        ];
        let graph = FamilyGraph::build(members, &edges(&[(1, 2), (1, 3), (1, 4), (1, 5)]));

        let orders: Vec<(i64, usize)> = graph
            .edges()
            .iter()
            .map(|e| (e.child.get(), e.order))
            .collect();
        assert_eq!(orders, vec![(2, 1), (3, 2), (4, 0), (5, 3)]);
        assert_eq!(
            graph.children_of(MemberId(1)),
            vec![MemberId(4), MemberId(2), MemberId(3), MemberId(5)]
        );
    }

    #[test]
    fn test_rank_is_per_parent() {
        // Child 4 is the eldest of parent 1 but the youngest of parent 2.
        let members = vec![
            member(1, None),
            member(2, None),
            member(3, Some("2000-01-01")),
            member(4, Some("1995-01-01")),
            member(5, Some("1990-01-01")),
        ];
        let graph = FamilyGraph::build(members, &edges(&[(1, 3), (1, 4), (2, 4), (2, 5)]));

        let rank = |parent: i64, child: i64| {
            graph
                .edges()
                .iter()
                .find(|e| e.parent == MemberId(parent) && e.child == MemberId(child))
                .map(|e| e.order)
        };
        assert_eq!(rank(1, 4), Some(0));
        assert_eq!(rank(2, 4), Some(1));
    }

    #[test]
    fn test_traversal_terminates_on_cycle() {
        let members = vec![member(1, None), member(2, None), member(3, None)];
        let graph = FamilyGraph::build(members, &edges(&[(1, 2), (2, 3), (3, 1)]));

        assert_eq!(graph.descendants(MemberId(1)), vec![MemberId(2), MemberId(3)]);
        assert_eq!(graph.ancestors(MemberId(1)), vec![MemberId(3), MemberId(2)]);
        assert!(graph.roots().is_empty());
    }

    #[test]
    fn test_ancestors_across_two_parents() {
        let members = (1..=7).map(|id| member(id, None)).collect();
        let graph = FamilyGraph::build(
            members,
            &edges(&[(3, 5), (4, 5), (1, 6), (2, 6), (5, 7), (6, 7)]),
        );

        assert_eq!(
            graph.ancestors(MemberId(7)),
            vec![
                MemberId(5),
                MemberId(6),
                MemberId(3),
                MemberId(4),
                MemberId(1),
                MemberId(2)
            ]
        );
        assert_eq!(graph.parents_of(MemberId(7)), vec![MemberId(5), MemberId(6)]);
        assert_eq!(graph.descendants(MemberId(7)), Vec::<MemberId>::new());
    }
}
