// ABOUTME: Tag index mapping users to tags and tags to users
// ABOUTME: Provides attach/detach/search over a pluggable set store

pub mod index;
pub mod keys;

// Re-export main types
pub use index::TagIndex;
pub use keys::{tag_users_key, user_tags_key};
