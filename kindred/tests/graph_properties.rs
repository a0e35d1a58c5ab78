//! Property tests for the graph engine
//!
//! Random insertion sequences are pushed through the validator; whatever it
//! accepts must stay acyclic and within the parent cap.

use std::collections::{HashMap, HashSet};

use kindred::graph::{self, FamilyGraph, ParentPolicy, Rejection, find_cycle};
use kindred::models::{Member, MemberBuilder, MemberId, Relationship};
use proptest::prelude::*;

const MEMBER_COUNT: i64 = 12;

fn edge_strategy() -> impl Strategy<Value = (i64, i64)> {
    (1..=MEMBER_COUNT, 1..=MEMBER_COUNT)
}

fn birth_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        (1900i32..2020, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| Some(format!("{:04}-{:02}-{:02}", y, m, d))),
    ]
}

fn members_strategy() -> impl Strategy<Value = Vec<Member>> {
    prop::collection::vec(birth_strategy(), MEMBER_COUNT as usize).prop_map(|births| {
        births
            .into_iter()
            .enumerate()
            .map(|(i, born)| {
                let builder = MemberBuilder::new(format!("M{}", i + 1), "Prop");
                let builder = match born {
                    Some(date) => builder.born(&date),
                    None => builder,
                };
                builder.with_id(i as i64 + 1)
            })
            .collect()
    })
}

/// Feed candidates through the validator, keeping the accepted ones
fn accept_all(candidates: &[(i64, i64)], policy: ParentPolicy) -> Vec<Relationship> {
    let mut accepted = Vec::new();
    for &(parent, child) in candidates {
        let candidate = Relationship::new(parent, child);
        if graph::validate(candidate, &accepted, policy).is_ok() {
            accepted.push(candidate);
        }
    }
    accepted
}

fn parent_counts(edges: &[Relationship]) -> HashMap<MemberId, HashSet<MemberId>> {
    let mut parents: HashMap<MemberId, HashSet<MemberId>> = HashMap::new();
    for edge in edges {
        parents.entry(edge.child_id).or_default().insert(edge.parent_id);
    }
    parents
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn accepted_edges_stay_acyclic(candidates in prop::collection::vec(edge_strategy(), 0..60)) {
        let accepted = accept_all(&candidates, ParentPolicy::default());
        prop_assert!(find_cycle(&accepted).is_none());
    }

    #[test]
    fn accepted_edges_respect_parent_cap(
        candidates in prop::collection::vec(edge_strategy(), 0..60),
        max_parents in 1usize..4,
    ) {
        let accepted = accept_all(&candidates, ParentPolicy { max_parents });
        for parents in parent_counts(&accepted).values() {
            prop_assert!(parents.len() <= max_parents);
        }
    }

    #[test]
    fn accepted_edges_are_unique_and_never_self_loops(
        candidates in prop::collection::vec(edge_strategy(), 0..60),
    ) {
        let accepted = accept_all(&candidates, ParentPolicy::default());
        let unique: HashSet<Relationship> = accepted.iter().copied().collect();
        prop_assert_eq!(unique.len(), accepted.len());
        prop_assert!(accepted.iter().all(|r| r.parent_id != r.child_id));
    }

    #[test]
    fn any_edge_closing_a_loop_is_rejected_as_cycle(
        candidates in prop::collection::vec(edge_strategy(), 0..60),
    ) {
        let accepted = accept_all(&candidates, ParentPolicy { max_parents: usize::MAX });
        for edge in &accepted {
            let reversed = Relationship::new(edge.child_id, edge.parent_id);
            prop_assert_eq!(
                graph::validate(reversed, &accepted, ParentPolicy { max_parents: usize::MAX }),
                Err(Rejection::Cycle)
            );
        }
    }

    #[test]
    fn rendering_is_deterministic(
        members in members_strategy(),
        candidates in prop::collection::vec(edge_strategy(), 0..40),
    ) {
        let accepted = accept_all(&candidates, ParentPolicy::default());

        let first = graph::render(members.clone(), &accepted).to_json_bytes().unwrap();
        let second = graph::render(members, &accepted).to_json_bytes().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn sibling_orders_form_a_dense_ranking(
        members in members_strategy(),
        candidates in prop::collection::vec(edge_strategy(), 0..40),
    ) {
        let accepted = accept_all(&candidates, ParentPolicy::default());
        let graph = FamilyGraph::build(members, &accepted);

        let mut orders: HashMap<MemberId, Vec<usize>> = HashMap::new();
        for edge in graph.edges() {
            orders.entry(edge.parent).or_default().push(edge.order);
        }
        for ranks in orders.values_mut() {
            ranks.sort_unstable();
            let expected: Vec<usize> = (0..ranks.len()).collect();
            prop_assert_eq!(ranks.clone(), expected);
        }

        // Known birth dates never rank after unknown ones in the same group
        for edge in graph.edges() {
            let Some(child) = graph.member(edge.child) else { continue };
            if child.date_of_birth.is_some() {
                continue;
            }
            for sibling in graph.edges().iter().filter(|e| e.parent == edge.parent) {
                if let Some(s) = graph.member(sibling.child)
                    && s.date_of_birth.is_some()
                {
                    prop_assert!(sibling.order < edge.order);
                }
            }
        }
    }

    #[test]
    fn walks_terminate_on_arbitrary_edges(
        members in members_strategy(),
        raw in prop::collection::vec(edge_strategy(), 0..40),
    ) {
        // Unvalidated input may contain cycles; traversal must still finish
        let edges: Vec<Relationship> = raw.into_iter().map(Relationship::from).collect();
        let graph = FamilyGraph::build(members, &edges);
        for id in 1..=MEMBER_COUNT {
            let ancestors = graph.ancestors(MemberId(id));
            let descendants = graph.descendants(MemberId(id));
            prop_assert!(ancestors.len() < MEMBER_COUNT as usize);
            prop_assert!(descendants.len() < MEMBER_COUNT as usize);
        }
    }
}
