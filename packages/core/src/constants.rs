use std::env;
use std::path::PathBuf;

/// File name of the SQLite database inside the Usertags directory
pub const DATABASE_FILE_NAME: &str = "usertags.db";

/// Get the path to the Usertags directory (~/.usertags)
pub fn usertags_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".usertags")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".usertags")
    }
}

/// Get the default database path (~/.usertags/usertags.db)
pub fn default_database_path() -> PathBuf {
    usertags_dir().join(DATABASE_FILE_NAME)
}
