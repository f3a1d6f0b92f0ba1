use thiserror::Error;
use usertags_core::FieldErrors;
use usertags_storage::StorageError;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
    #[error("User not found: {0}")]
    NotFound(i64),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type UserResult<T> = Result<T, UserError>;
