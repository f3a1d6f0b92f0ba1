// ABOUTME: User storage layer using SQLite
// ABOUTME: Validates and persists user records; removes index entries on delete

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use usertags_core::{is_valid_email, FieldErrors, MSG_INVALID, MSG_TAKEN};
use usertags_storage::{SetStore, StorageError};
use usertags_tags::TagIndex;

use crate::error::{UserError, UserResult};
use crate::types::{User, UserCreateInput};

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_user(&self, user_id: i64) -> UserResult<User> {
        debug!("Fetching user: {}", user_id);

        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(UserError::NotFound(user_id))
    }

    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        debug!("Fetching all users");

        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(users)
    }

    async fn email_taken(&self, email: &str) -> UserResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(count > 0)
    }

    /// Check an input without persisting it
    pub async fn validate(&self, input: &UserCreateInput) -> UserResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = input.email.as_deref().unwrap_or_default();

        if !is_valid_email(email) {
            errors.add("email", MSG_INVALID);
        } else if self.email_taken(email).await? {
            errors.add("email", MSG_TAKEN);
        }

        Ok(errors)
    }

    pub async fn create_user(&self, input: UserCreateInput) -> UserResult<User> {
        let errors = self.validate(&input).await?;
        if !errors.is_empty() {
            return Err(UserError::Validation(errors));
        }

        let email = input.email.unwrap_or_default();
        let now = Utc::now();

        debug!("Creating user with email: {}", email);

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, created_at, updated_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&email)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        let user_id = match result {
            Ok(done) => done.last_insert_rowid(),
            // Lost a race with a concurrent create of the same email
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(UserError::Validation(FieldErrors::single("email", MSG_TAKEN)));
            }
            Err(e) => return Err(StorageError::Sqlx(e).into()),
        };

        info!("Created user {}", user_id);

        self.get_user(user_id).await
    }

    /// Delete a user record after detaching every tag it carries, so no
    /// orphaned identifier stays reachable through search.
    ///
    /// Tags attached by a request that passed its existence check before the
    /// row was removed are swept once more after the delete.
    pub async fn delete_user(&self, user_id: i64, store: &dyn SetStore) -> UserResult<()> {
        let user = self.get_user(user_id).await?;

        let tags = user.tags(store).await?;
        TagIndex::new(store, &tags).detach(user.id).await?;

        debug!("Deleting user: {} ({} tag(s) detached)", user_id, tags.len());

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let late = user.tags(store).await?;
        if !late.is_empty() {
            debug!("Detaching {} tag(s) added during delete of user {}", late.len(), user_id);
            TagIndex::new(store, &late).detach(user.id).await?;
        }

        info!("Deleted user {}", user_id);

        Ok(())
    }
}
