// ABOUTME: Storage layer for Usertags: the set store contract and its backends
// ABOUTME: Also owns the SQLite pool bootstrap and schema migrations

use thiserror::Error;

pub mod db;
pub mod memory;
pub mod set_store;
pub mod sqlite;

pub use db::{connect, connect_in_memory};
pub use memory::MemorySetStore;
pub use set_store::{SetOp, SetStore};
pub use sqlite::SqliteSetStore;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    /// The set store could not be reached or a batch failed mid-flight.
    /// Nothing from the failed call was applied.
    #[error("Set store unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
