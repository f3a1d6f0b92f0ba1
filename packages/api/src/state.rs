// ABOUTME: Shared state handed to every API handler
// ABOUTME: Bundles user storage, the tag set store, and the accepted credentials

use std::sync::Arc;

use usertags_storage::SetStore;
use usertags_users::UserStorage;

use crate::auth::Credentials;

#[derive(Clone)]
pub struct AppState {
    pub user_storage: Arc<UserStorage>,
    pub set_store: Arc<dyn SetStore>,
    pub credentials: Arc<Credentials>,
}

impl AppState {
    pub fn new(
        user_storage: UserStorage,
        set_store: Arc<dyn SetStore>,
        credentials: Credentials,
    ) -> Self {
        Self {
            user_storage: Arc::new(user_storage),
            set_store,
            credentials: Arc::new(credentials),
        }
    }

    /// The set store as a plain trait object reference
    pub fn store(&self) -> &dyn SetStore {
        self.set_store.as_ref()
    }
}
