// ABOUTME: Tag index over a set store
// ABOUTME: Keeps users:{id}:tags and tags:{tag}:users mirrored on every attach/detach

use std::fmt::Display;

use tracing::debug;
use usertags_storage::{SetOp, SetStore, StorageResult};

use crate::keys::{tag_users_key, user_tags_key};

/// A short-lived view over one request's tag list.
///
/// For every user `u` and tag `t`, `t` is in `users:{u}:tags` exactly when `u`
/// is in `tags:{t}:users`. Both sides change together inside one atomic batch,
/// so readers never see one direction without the other.
///
/// Blank entries are dropped and the rest trimmed, but duplicates are kept:
/// repeating a tag is harmless because set adds and removes are idempotent.
pub struct TagIndex<'a> {
    store: &'a dyn SetStore,
    tags: Vec<String>,
}

impl<'a> TagIndex<'a> {
    pub fn new<I, S>(store: &'a dyn SetStore, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = tags
            .into_iter()
            .filter_map(|tag| {
                let trimmed = tag.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect();

        Self { store, tags }
    }

    /// The cleaned working list, in input order
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Associate every tag in the list with `user_id`.
    ///
    /// The caller is responsible for `user_id` naming an existing user.
    pub async fn attach(&self, user_id: impl Display) -> StorageResult<()> {
        if self.is_empty() {
            return Ok(());
        }

        let user_id = user_id.to_string();
        debug!("Attaching {} tag(s) to user {}", self.tags.len(), user_id);

        let mut ops = Vec::with_capacity(self.tags.len() + 1);
        ops.push(SetOp::add(user_tags_key(&user_id), self.tags.clone()));
        ops.extend(
            self.tags
                .iter()
                .map(|tag| SetOp::add(tag_users_key(tag), vec![user_id.clone()])),
        );

        self.store.atomic_batch(ops).await
    }

    /// Dissociate every tag in the list from `user_id`. Tags the user does not
    /// carry are skipped silently.
    pub async fn detach(&self, user_id: impl Display) -> StorageResult<()> {
        if self.is_empty() {
            return Ok(());
        }

        let user_id = user_id.to_string();
        debug!("Detaching {} tag(s) from user {}", self.tags.len(), user_id);

        let mut ops = Vec::with_capacity(self.tags.len() + 1);
        ops.push(SetOp::remove(user_tags_key(&user_id), self.tags.clone()));
        ops.extend(
            self.tags
                .iter()
                .map(|tag| SetOp::remove(tag_users_key(tag), vec![user_id.clone()])),
        );

        self.store.atomic_batch(ops).await
    }

    /// Identifiers of users carrying every tag in the list.
    ///
    /// An empty list matches nobody. Result order is not part of the contract.
    pub async fn search(&self) -> StorageResult<Vec<String>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = self.tags.iter().map(|tag| tag_users_key(tag)).collect();
        debug!("Searching users across {} tag key(s)", keys.len());

        self.store.intersect(&keys).await
    }
}
