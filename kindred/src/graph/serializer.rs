//! Graph payload rendering
//!
//! Projects a [`FamilyGraph`] onto the renderer-agnostic payload consumed by
//! visualisation clients. Identifiers are derived from member ids only, so the
//! same member always maps to the same node id across calls.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::builder::FamilyGraph;
use crate::models::{Member, MemberId, Sex};

/// Prefix for node identifiers
pub const NODE_ID_PREFIX: &str = "member-";

/// Node id for a member: `member-<id>`
pub fn node_id(id: MemberId) -> String {
    format!("{}{}", NODE_ID_PREFIX, id)
}

/// Edge id for a parent/child pair: `parent-<pid>-child-<cid>`
pub fn edge_id(parent: MemberId, child: MemberId) -> String {
    format!("parent-{}-child-{}", parent, child)
}

/// Rendered member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    pub firstname: String,
    pub lastname: String,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
}

impl From<&Member> for NodeRecord {
    fn from(member: &Member) -> Self {
        Self {
            id: node_id(member.id),
            label: member.display_name(),
            firstname: member.firstname.clone(),
            lastname: member.lastname.clone(),
            birth_date: member.date_of_birth,
            death_date: member.date_of_death,
            sex: member.sex.as_known(),
        }
    }
}

/// Rendered parent→child edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Sibling rank of the target under the source; a layout hint only
    pub order: usize,
}

/// Full graph payload: `{ "nodes": [...], "edges": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPayload {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphPayload {
    /// Compact JSON encoding; identical graphs give identical bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Render the graph. Pure; no I/O.
pub fn serialize(graph: &FamilyGraph) -> GraphPayload {
    let nodes = graph.nodes().iter().map(NodeRecord::from).collect();
    let edges = graph
        .edges()
        .iter()
        .map(|edge| EdgeRecord {
            id: edge_id(edge.parent, edge.child),
            source: node_id(edge.parent),
            target: node_id(edge.child),
            order: edge.order,
        })
        .collect();

    GraphPayload { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemberBuilder, Relationship};
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let members = vec![
            MemberBuilder::new("Dorothy", "Javier")
                .born("1947-11-10")
                .sex(Sex::Female)
                .with_id(3),
            MemberBuilder::new("Mom", "Javier")
                .born("1970-10-02")
                .died("2020-02-02")
                .with_id(5),
        ];
        let graph = FamilyGraph::build(members, &[Relationship::new(3, 5)]);
        let payload = serde_json::to_value(serialize(&graph)).unwrap();

        assert_eq!(
            payload,
            json!({
                "nodes": [
                    {
                        "id": "member-3",
                        "label": "Dorothy Javier",
                        "firstname": "Dorothy",
                        "lastname": "Javier",
                        "birthDate": "1947-11-10",
                        "deathDate": null,
                        "sex": "female"
                    },
                    {
                        "id": "member-5",
                        "label": "Mom Javier",
                        "firstname": "Mom",
                        "lastname": "Javier",
                        "birthDate": "1970-10-02",
                        "deathDate": "2020-02-02",
                        "sex": null
                    }
                ],
                "edges": [
                    {
                        "id": "parent-3-child-5",
                        "source": "member-3",
                        "target": "member-5",
                        "order": 0
                    }
                ]
            })
        );
    }

    #[test]
    fn test_serialization_is_byte_identical() {
        let members = vec![
            MemberBuilder::new("A", "B").with_id(1),
            MemberBuilder::new("C", "D").born("2000-01-01").with_id(2),
            MemberBuilder::new("E", "F").with_id(3),
        ];
        let relationships = [Relationship::new(1, 3), Relationship::new(1, 2)];

        let first = serialize(&FamilyGraph::build(members.clone(), &relationships))
            .to_json_bytes()
            .unwrap();
        let second = serialize(&FamilyGraph::build(members, &relationships))
            .to_json_bytes()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ids_are_derived_from_member_ids() {
        assert_eq!(node_id(MemberId(42)), "member-42");
        assert_eq!(edge_id(MemberId(7), MemberId(12)), "parent-7-child-12");
    }
}
