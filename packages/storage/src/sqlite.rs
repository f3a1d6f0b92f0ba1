// ABOUTME: Set store persisted in the SQLite `set_members` table
// ABOUTME: Batches run inside a single transaction so they commit or roll back as a unit

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::set_store::{SetOp, SetStore};
use crate::{StorageError, StorageResult};

pub struct SqliteSetStore {
    pool: SqlitePool,
}

impl SqliteSetStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn apply(conn: &mut SqliteConnection, op: &SetOp) -> StorageResult<()> {
        match op {
            SetOp::Add { key, members } => {
                for member in members {
                    sqlx::query("INSERT OR IGNORE INTO set_members (set_key, member) VALUES (?, ?)")
                        .bind(key)
                        .bind(member)
                        .execute(&mut *conn)
                        .await
                        .map_err(StorageError::unavailable)?;
                }
            }
            SetOp::Remove { key, members } => {
                for member in members {
                    sqlx::query("DELETE FROM set_members WHERE set_key = ? AND member = ?")
                        .bind(key)
                        .bind(member)
                        .execute(&mut *conn)
                        .await
                        .map_err(StorageError::unavailable)?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SetStore for SqliteSetStore {
    async fn add_members(&self, key: &str, members: &[String]) -> StorageResult<()> {
        self.atomic_batch(vec![SetOp::add(key, members.to_vec())])
            .await
    }

    async fn remove_members(&self, key: &str, members: &[String]) -> StorageResult<()> {
        self.atomic_batch(vec![SetOp::remove(key, members.to_vec())])
            .await
    }

    async fn members(&self, key: &str) -> StorageResult<Vec<String>> {
        debug!("Fetching members of set: {}", key);

        sqlx::query_scalar("SELECT member FROM set_members WHERE set_key = ? ORDER BY member")
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::unavailable)
    }

    async fn intersect(&self, keys: &[String]) -> StorageResult<Vec<String>> {
        let keys: BTreeSet<&String> = keys.iter().collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Intersecting {} sets", keys.len());

        // A member belongs to the intersection when it shows up under every key
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT member FROM set_members WHERE set_key IN (");
        let mut separated = query_builder.separated(", ");
        for key in &keys {
            separated.push_bind(key.as_str());
        }
        separated.push_unseparated(")");
        query_builder.push(" GROUP BY member HAVING COUNT(DISTINCT set_key) = ");
        query_builder.push_bind(keys.len() as i64);
        query_builder.push(" ORDER BY member");

        query_builder
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::unavailable)
    }

    async fn atomic_batch(&self, ops: Vec<SetOp>) -> StorageResult<()> {
        debug!("Applying batch of {} set ops", ops.len());

        let mut tx = self.pool.begin().await.map_err(StorageError::unavailable)?;

        for op in &ops {
            // Dropping `tx` on error rolls back everything applied so far
            Self::apply(&mut *tx, op).await?;
        }

        tx.commit().await.map_err(StorageError::unavailable)?;

        Ok(())
    }
}
