// ABOUTME: In-process set store backed by a locked hash map
// ABOUTME: Used by tests and by the server when no persistence is wanted

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::set_store::{SetOp, SetStore};
use crate::StorageResult;

type Sets = HashMap<String, BTreeSet<String>>;

#[derive(Debug, Default)]
pub struct MemorySetStore {
    sets: RwLock<Sets>,
}

impl MemorySetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys of every non-empty set, sorted
    pub async fn keys(&self) -> Vec<String> {
        let sets = self.sets.read().await;
        let mut keys: Vec<String> = sets.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn is_empty(&self) -> bool {
        self.sets.read().await.is_empty()
    }

    fn apply(sets: &mut Sets, op: &SetOp) {
        match op {
            SetOp::Add { key, members } => {
                if members.is_empty() {
                    return;
                }
                sets.entry(key.clone())
                    .or_default()
                    .extend(members.iter().cloned());
            }
            SetOp::Remove { key, members } => {
                if let Some(set) = sets.get_mut(key) {
                    for member in members {
                        set.remove(member);
                    }
                    if set.is_empty() {
                        sets.remove(key);
                    }
                }
            }
        }
    }
}

#[async_trait]
impl SetStore for MemorySetStore {
    async fn add_members(&self, key: &str, members: &[String]) -> StorageResult<()> {
        let mut sets = self.sets.write().await;
        Self::apply(&mut sets, &SetOp::add(key, members.to_vec()));
        Ok(())
    }

    async fn remove_members(&self, key: &str, members: &[String]) -> StorageResult<()> {
        let mut sets = self.sets.write().await;
        Self::apply(&mut sets, &SetOp::remove(key, members.to_vec()));
        Ok(())
    }

    async fn members(&self, key: &str) -> StorageResult<Vec<String>> {
        let sets = self.sets.read().await;
        Ok(sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn intersect(&self, keys: &[String]) -> StorageResult<Vec<String>> {
        let keys: BTreeSet<&String> = keys.iter().collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let sets = self.sets.read().await;
        let mut found = Vec::with_capacity(keys.len());
        for key in keys {
            match sets.get(key) {
                Some(set) => found.push(set),
                None => return Ok(Vec::new()),
            }
        }

        // Walk the smallest set and probe the rest
        found.sort_by_key(|set| set.len());
        let Some((smallest, rest)) = found.split_first() else {
            return Ok(Vec::new());
        };
        Ok(smallest
            .iter()
            .filter(|member| rest.iter().all(|set| set.contains(*member)))
            .cloned()
            .collect())
    }

    async fn atomic_batch(&self, ops: Vec<SetOp>) -> StorageResult<()> {
        debug!("Applying batch of {} set ops", ops.len());

        // One write guard for the whole batch: readers never observe a prefix
        let mut sets = self.sets.write().await;
        for op in &ops {
            Self::apply(&mut sets, op);
        }
        Ok(())
    }
}
