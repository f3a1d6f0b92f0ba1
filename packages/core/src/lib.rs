// ABOUTME: Core constants and validation shared across Usertags packages
// ABOUTME: Foundational package with no storage or HTTP dependencies

pub mod constants;
pub mod validation;

// Re-export constants
pub use constants::{default_database_path, usertags_dir, DATABASE_FILE_NAME};

// Re-export validation
pub use validation::{is_valid_email, FieldErrors, MSG_INVALID, MSG_TAKEN};
