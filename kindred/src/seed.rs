//! Demo family
//!
//! Four generations: two grandparent couples, their children Mom and Dad,
//! five grandchildren and eight great-grandchildren.

use std::collections::HashMap;

use crate::graph::{self, ParentPolicy};
use crate::models::{MemberBuilder, MemberId, NewMember, Relationship, Sex};
use crate::storage::{RecordStore, StorageError};

/// Seed records. Relationship ids refer to 1-based positions in `members`.
#[derive(Debug, Clone)]
pub struct DemoFamily {
    pub members: Vec<NewMember>,
    pub relationships: Vec<(i64, i64)>,
}

/// What [`seed_store`] wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub members: usize,
    pub relationships: usize,
}

const MEMBERS: &[(&str, &str, &str, Sex)] = &[
    ("Margaret", "Chen", "1945-03-15", Sex::Female),
    ("Robert", "Chen", "1943-07-22", Sex::Male),
    ("Dorothy", "Javier", "1947-11-10", Sex::Female),
    ("James", "Javier", "1944-05-30", Sex::Male),
    ("Mom", "Javier", "1970-10-02", Sex::Female),
    ("Dad", "Javier", "1951-11-06", Sex::Male),
    ("Jr", "Javier", "1984-04-20", Sex::Male),
    ("wander", "Javier", "1992-02-05", Sex::Male),
    ("MO", "Javier", "1994-01-08", Sex::Male),
    ("Mich", "Javier", "1996-02-20", Sex::Male),
    ("Kat", "Javier", "1998-12-15", Sex::Female),
    ("CJ", "Javier", "2006-03-21", Sex::Male),
    ("DAYDAY", "Javier", "2010-01-27", Sex::Male),
    ("DORA", "Javier", "2014-07-14", Sex::Female),
    ("Mona", "Javier", "2016-05-27", Sex::Female),
    ("JJ", "Javier", "2018-08-08", Sex::Female),
    ("7", "Javier", "2020-03-11", Sex::Female),
    ("Summer", "Javier", "2017-08-12", Sex::Female),
    ("Matt", "Javier", "2019-04-05", Sex::Male),
];

const RELATIONSHIPS: &[(i64, i64)] = &[
    (3, 5),
    (4, 5),
    (1, 6),
    (2, 6),
    (5, 7),
    (6, 7),
    (5, 8),
    (6, 8),
    (5, 9),
    (6, 9),
    (5, 10),
    (6, 10),
    (5, 11),
    (6, 11),
    (7, 12),
    (7, 13),
    (7, 14),
    (7, 15),
    (7, 16),
    (7, 17),
    (8, 18),
    (11, 19),
];

/// The demo family records
pub fn demo_family() -> DemoFamily {
    let members = MEMBERS
        .iter()
        .map(|(first, last, born, sex)| {
            MemberBuilder::new(*first, *last)
                .born(born)
                .sex(*sex)
                .build()
        })
        .collect();

    DemoFamily {
        members,
        relationships: RELATIONSHIPS.to_vec(),
    }
}

/// Write the demo family into `store`.
///
/// Member ids are whatever the store assigns; relationships are remapped to
/// them and each one passes through the validator against the relationships
/// already in the store. Rejected edges are skipped with a warning.
pub async fn seed_store(
    store: &dyn RecordStore,
    policy: ParentPolicy,
) -> Result<SeedReport, StorageError> {
    let family = demo_family();
    let mut report = SeedReport::default();
    let mut ids: HashMap<i64, MemberId> = HashMap::new();

    for (position, member) in family.members.into_iter().enumerate() {
        let created = store.create_member(member).await?;
        ids.insert(position as i64 + 1, created.id);
        report.members += 1;
    }

    let mut existing = store.list_relationships(None).await?;
    for (parent, child) in family.relationships {
        let (Some(&parent_id), Some(&child_id)) = (ids.get(&parent), ids.get(&child)) else {
            continue;
        };
        let candidate = Relationship::new(parent_id, child_id);
        if let Err(rejection) = graph::validate(candidate, &existing, policy) {
            tracing::warn!(%candidate, reason = rejection.code(), "Skipping seed relationship");
            continue;
        }
        store.create_relationship(candidate).await?;
        existing.push(candidate);
        report.relationships += 1;
    }

    tracing::info!(
        members = report.members,
        relationships = report.relationships,
        "Seeded demo family"
    );
    Ok(report)
}
