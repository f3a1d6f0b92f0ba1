// ABOUTME: Contract for a key-value store of named string sets
// ABOUTME: Single-key add/remove/members, multi-key intersection, and all-or-nothing batches

use async_trait::async_trait;

use crate::StorageResult;

/// One mutation inside an atomic batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOp {
    Add { key: String, members: Vec<String> },
    Remove { key: String, members: Vec<String> },
}

impl SetOp {
    pub fn add(key: impl Into<String>, members: Vec<String>) -> Self {
        SetOp::Add {
            key: key.into(),
            members,
        }
    }

    pub fn remove(key: impl Into<String>, members: Vec<String>) -> Self {
        SetOp::Remove {
            key: key.into(),
            members,
        }
    }
}

/// Named sets of opaque string members.
///
/// Adding a member that is already present, or removing one that is not, is a
/// no-op. An empty set is indistinguishable from an absent one. Every call is
/// atomic; `atomic_batch` extends that guarantee across several keys so that
/// concurrent readers see either all of the batch or none of it.
#[async_trait]
pub trait SetStore: Send + Sync {
    async fn add_members(&self, key: &str, members: &[String]) -> StorageResult<()>;

    async fn remove_members(&self, key: &str, members: &[String]) -> StorageResult<()>;

    /// Current members of `key` in ascending order; empty when the set is absent
    async fn members(&self, key: &str) -> StorageResult<Vec<String>>;

    /// Members present in every set named by `keys`, in ascending order.
    /// Duplicate keys are ignored and an empty key list yields an empty result.
    async fn intersect(&self, keys: &[String]) -> StorageResult<Vec<String>>;

    /// Apply every op or none of them
    async fn atomic_batch(&self, ops: Vec<SetOp>) -> StorageResult<()>;
}
