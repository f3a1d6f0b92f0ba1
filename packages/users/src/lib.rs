// ABOUTME: User management module
// ABOUTME: Provides the user record, its storage, and its tag operations

pub mod error;
pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use error::{UserError, UserResult};
pub use storage::UserStorage;
pub use types::{User, UserCreateInput};
