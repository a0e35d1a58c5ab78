//! Parent→child relationships and partner pairs

use serde::{Deserialize, Serialize};
use std::fmt;

use super::member::MemberId;

/// A directed parent→child fact. Identity is the ordered pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Relationship {
    pub parent_id: MemberId,
    pub child_id: MemberId,
}

impl Relationship {
    pub fn new(parent_id: impl Into<MemberId>, child_id: impl Into<MemberId>) -> Self {
        Self {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
        }
    }

    pub fn involves(&self, id: MemberId) -> bool {
        self.parent_id == id || self.child_id == id
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.parent_id, self.child_id)
    }
}

impl From<(i64, i64)> for Relationship {
    fn from((parent, child): (i64, i64)) -> Self {
        Self::new(parent, child)
    }
}

/// An undirected partner pair, stored with `partner1_id <= partner2_id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Partnership {
    pub partner1_id: MemberId,
    pub partner2_id: MemberId,
}

impl Partnership {
    /// Normalise the pair so `(a, b)` and `(b, a)` compare equal.
    pub fn new(a: impl Into<MemberId>, b: impl Into<MemberId>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self {
                partner1_id: a,
                partner2_id: b,
            }
        } else {
            Self {
                partner1_id: b,
                partner2_id: a,
            }
        }
    }

    pub fn involves(&self, id: MemberId) -> bool {
        self.partner1_id == id || self.partner2_id == id
    }
}

impl fmt::Display for Partnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.partner1_id, self.partner2_id)
    }
}
