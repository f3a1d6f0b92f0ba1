// ABOUTME: Tests for user storage and user tag operations
// ABOUTME: Covers email validation, uniqueness, tagging, and cleanup on delete

#[cfg(test)]
mod tests {
    use crate::error::UserError;
    use crate::storage::UserStorage;
    use crate::types::UserCreateInput;
    use pretty_assertions::assert_eq;
    use async_trait::async_trait;
    use sqlx::SqlitePool;
    use std::sync::atomic::{AtomicBool, Ordering};
    use usertags_storage::{connect_in_memory, MemorySetStore, SetOp, SetStore, StorageResult};
    use usertags_tags::TagIndex;

    async fn setup_test_db() -> (UserStorage, SqlitePool) {
        let pool = connect_in_memory().await.unwrap();
        (UserStorage::new(pool.clone()), pool)
    }

    fn input(email: &str) -> UserCreateInput {
        UserCreateInput {
            email: Some(email.to_string()),
        }
    }

    fn assert_email_error(err: UserError, message: &str) {
        match err {
            UserError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors.get("email"), Some(&[message.to_string()][..]));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_user_with_valid_email() {
        let (storage, _pool) = setup_test_db().await;

        let user = storage.create_user(input("test@test.com")).await.unwrap();

        assert!(user.id > 0);
        assert_eq!(user.email, "test@test.com");
        assert_eq!(storage.get_user(user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_create_user_fails_with_missing_email() {
        let (storage, _pool) = setup_test_db().await;

        let err = storage
            .create_user(UserCreateInput::default())
            .await
            .unwrap_err();

        assert_email_error(err, "is not valid");
    }

    #[tokio::test]
    async fn test_create_user_fails_with_empty_email() {
        let (storage, _pool) = setup_test_db().await;

        let err = storage.create_user(input("")).await.unwrap_err();

        assert_email_error(err, "is not valid");
    }

    #[tokio::test]
    async fn test_create_user_fails_with_invalid_format() {
        let (storage, pool) = setup_test_db().await;

        let err = storage.create_user(input("testtest.com")).await.unwrap_err();
        assert_email_error(err, "is not valid");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_create_user_fails_on_duplicate_email() {
        let (storage, _pool) = setup_test_db().await;
        storage.create_user(input("test@test.com")).await.unwrap();

        let err = storage.create_user(input("test@test.com")).await.unwrap_err();

        assert_email_error(err, "has already been taken");
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let (storage, _pool) = setup_test_db().await;

        let err = storage.get_user(404).await.unwrap_err();

        assert!(matches!(err, UserError::NotFound(404)));
    }

    #[tokio::test]
    async fn test_list_users_in_creation_order() {
        let (storage, _pool) = setup_test_db().await;
        let first = storage.create_user(input("a@test.com")).await.unwrap();
        let second = storage.create_user(input("b@test.com")).await.unwrap();

        let ids: Vec<i64> = storage
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();

        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_user_tag_operations() {
        let (storage, _pool) = setup_test_db().await;
        let store = MemorySetStore::new();
        let user = storage.create_user(input("test@test.com")).await.unwrap();

        assert!(user.tags(&store).await.unwrap().is_empty());

        user.add_tags(&store, ["funny", "cyclist", "funny"])
            .await
            .unwrap();
        assert_eq!(user.tags(&store).await.unwrap(), vec!["cyclist", "funny"]);

        user.remove_tags(&store, ["cyclist", "runner"]).await.unwrap();
        assert_eq!(user.tags(&store).await.unwrap(), vec!["funny"]);

        user.add_tags(&store, Vec::<String>::new()).await.unwrap();
        user.remove_tags(&store, [" "]).await.unwrap();
        assert_eq!(user.tags(&store).await.unwrap(), vec!["funny"]);
    }

    #[tokio::test]
    async fn test_user_tags_and_search_agree() {
        let (storage, _pool) = setup_test_db().await;
        let store = MemorySetStore::new();
        let user = storage.create_user(input("test@test.com")).await.unwrap();
        user.add_tags(&store, ["a", "b"]).await.unwrap();

        for tag in ["a", "b", "c"] {
            let carries = user.tags(&store).await.unwrap().iter().any(|t| t == tag);
            let found = TagIndex::new(&store, [tag])
                .search()
                .await
                .unwrap()
                .contains(&user.id.to_string());
            assert_eq!(carries, found, "tag {}", tag);
        }
    }

    #[tokio::test]
    async fn test_delete_user_detaches_all_tags() {
        let (storage, pool) = setup_test_db().await;
        let store = MemorySetStore::new();
        let gone = storage.create_user(input("gone@test.com")).await.unwrap();
        let kept = storage.create_user(input("kept@test.com")).await.unwrap();
        gone.add_tags(&store, ["funny", "cyclist"]).await.unwrap();
        kept.add_tags(&store, ["cyclist"]).await.unwrap();

        storage.delete_user(gone.id, &store).await.unwrap();

        assert!(matches!(
            storage.get_user(gone.id).await.unwrap_err(),
            UserError::NotFound(_)
        ));
        assert!(TagIndex::new(&store, ["funny"])
            .search()
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            TagIndex::new(&store, ["cyclist"]).search().await.unwrap(),
            vec![kept.id.to_string()]
        );
        assert!(store
            .members(&usertags_tags::user_tags_key(gone.id))
            .await
            .unwrap()
            .is_empty());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let (storage, _pool) = setup_test_db().await;
        let store = MemorySetStore::new();

        let err = storage.delete_user(99, &store).await.unwrap_err();

        assert!(matches!(err, UserError::NotFound(99)));
    }

    /// Memory store that lets another writer attach a tag right after the
    /// first batch it applies, like a request racing a delete.
    struct RacingStore {
        inner: MemorySetStore,
        late_user: i64,
        fired: AtomicBool,
    }

    #[async_trait]
    impl SetStore for RacingStore {
        async fn add_members(&self, key: &str, members: &[String]) -> StorageResult<()> {
            self.inner.add_members(key, members).await
        }

        async fn remove_members(&self, key: &str, members: &[String]) -> StorageResult<()> {
            self.inner.remove_members(key, members).await
        }

        async fn members(&self, key: &str) -> StorageResult<Vec<String>> {
            self.inner.members(key).await
        }

        async fn intersect(&self, keys: &[String]) -> StorageResult<Vec<String>> {
            self.inner.intersect(keys).await
        }

        async fn atomic_batch(&self, ops: Vec<SetOp>) -> StorageResult<()> {
            self.inner.atomic_batch(ops).await?;
            if !self.fired.swap(true, Ordering::SeqCst) {
                TagIndex::new(&self.inner, ["late"])
                    .attach(self.late_user)
                    .await?;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_delete_user_sweeps_tags_attached_mid_delete() {
        let (storage, _pool) = setup_test_db().await;
        let user = storage.create_user(input("gone@test.com")).await.unwrap();

        let store = RacingStore {
            inner: MemorySetStore::new(),
            late_user: user.id,
            fired: AtomicBool::new(true),
        };
        user.add_tags(&store, ["funny"]).await.unwrap();
        store.fired.store(false, Ordering::SeqCst);

        storage.delete_user(user.id, &store).await.unwrap();

        assert!(TagIndex::new(&store, ["late"])
            .search()
            .await
            .unwrap()
            .is_empty());
        assert!(TagIndex::new(&store, ["funny"])
            .search()
            .await
            .unwrap()
            .is_empty());
        assert!(store.inner.is_empty().await);
    }
}
