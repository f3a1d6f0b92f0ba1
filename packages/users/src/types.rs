// ABOUTME: User type definitions
// ABOUTME: The persisted user record and its tag operations against the set store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usertags_storage::{SetStore, StorageResult};
use usertags_tags::{user_tags_key, TagIndex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserCreateInput {
    pub email: Option<String>,
}

impl User {
    /// Tags currently attached to this user, ascending
    pub async fn tags(&self, store: &dyn SetStore) -> StorageResult<Vec<String>> {
        store.members(&user_tags_key(self.id)).await
    }

    pub async fn add_tags<I, S>(&self, store: &dyn SetStore, tags: I) -> StorageResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        TagIndex::new(store, tags).attach(self.id).await
    }

    pub async fn remove_tags<I, S>(&self, store: &dyn SetStore, tags: I) -> StorageResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        TagIndex::new(store, tags).detach(self.id).await
    }
}
