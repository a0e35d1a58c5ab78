//! JSON snapshot of a whole record store
//!
//! Used to persist the in-memory backend between runs and as the CLI's
//! working file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{Member, MemberId, Partnership, Relationship};
use crate::storage::errors::StorageError;

/// Point-in-time copy of every record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub members: Vec<Member>,

    /// Insertion order is significant: it breaks sibling-order ties
    #[serde(default)]
    pub relationships: Vec<Relationship>,

    #[serde(default)]
    pub partnerships: Vec<Partnership>,

    /// Id the next created member receives. Files written before this was
    /// recorded fall back to one past the highest stored id.
    #[serde(default)]
    pub next_member_id: Option<MemberId>,
}

impl Snapshot {
    /// Read a snapshot; a missing file is an empty snapshot.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                tracing::debug!(
                    path = %path.display(),
                    members = snapshot.members.len(),
                    relationships = snapshot.relationships.len(),
                    "Loaded snapshot"
                );
                Ok(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No snapshot file, starting empty");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the snapshot as pretty JSON, creating parent directories.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    /// Next member id to hand out. Never at or below an id already issued.
    pub fn next_free_id(&self) -> MemberId {
        let after_max = self.members.iter().map(|m| m.id.get()).max().unwrap_or(0) + 1;
        match self.next_member_id {
            Some(recorded) => MemberId(recorded.get().max(after_max)),
            None => MemberId(after_max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberBuilder;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("family.json");

        let snapshot = Snapshot {
            members: vec![
                MemberBuilder::new("Robert", "Chen").born("1943-07-22").with_id(2),
                MemberBuilder::new("Dad", "Javier").with_id(6),
            ],
            relationships: vec![Relationship::new(2, 6)],
            partnerships: vec![],
            next_member_id: None,
        };
        snapshot.save(&path).await.unwrap();

        let loaded = Snapshot::load(&path).await.unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.next_free_id(), MemberId(7));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let loaded = Snapshot::load(dir.path().join("absent.json")).await.unwrap();
        assert_eq!(loaded, Snapshot::default());
        assert_eq!(loaded.next_free_id(), MemberId(1));
    }

    #[test]
    fn test_recorded_counter_outlives_deleted_members() {
        let snapshot = Snapshot {
            members: vec![MemberBuilder::new("Mom", "Javier").with_id(1)],
            next_member_id: Some(MemberId(5)),
            ..Snapshot::default()
        };
        assert_eq!(snapshot.next_free_id(), MemberId(5));

        // A counter behind the stored ids never wins
        let stale = Snapshot {
            members: vec![MemberBuilder::new("Jr", "Javier").with_id(9)],
            next_member_id: Some(MemberId(3)),
            ..Snapshot::default()
        };
        assert_eq!(stale.next_free_id(), MemberId(10));
    }

    #[test]
    fn test_file_without_counter_still_loads() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"members":[{"id":4,"firstname":"Kat","lastname":"Javier"}],"relationships":[]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.next_member_id, None);
        assert_eq!(snapshot.next_free_id(), MemberId(5));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"{not json").unwrap();

        assert!(matches!(
            Snapshot::load(&path).await,
            Err(StorageError::Serialization(_))
        ));
    }
}
