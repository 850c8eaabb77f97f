use serde::{Deserialize, Serialize};
use std::fmt;

use super::Timestamp;

/// What happened to a package in a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Add,
    Update,
    Move,
    Remove,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateKind::Add => write!(f, "add"),
            UpdateKind::Update => write!(f, "update"),
            UpdateKind::Move => write!(f, "move"),
            UpdateKind::Remove => write!(f, "remove"),
        }
    }
}

/// An append-only history record of a package event.
///
/// Records are never mutated. `id` increases with insertion order and
/// breaks ties between records created at the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub id: u64,
    pub pkgname: String,
    pub repo: String,
    pub arch: String,
    pub created: Timestamp,
    pub kind: UpdateKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
}

impl UpdateRecord {
    /// Ordering key for "latest": creation time, then insertion order.
    pub fn recency(&self) -> (Timestamp, u64) {
        (self.created, self.id)
    }
}
