// ABOUTME: Set-key naming for the tag index
// ABOUTME: Must stay stable: existing persisted sets are addressed by these names

use std::fmt::Display;

/// Key of the set holding every tag attached to a user
pub fn user_tags_key(user_id: impl Display) -> String {
    format!("users:{}:tags", user_id)
}

/// Key of the set holding every user carrying a tag
pub fn tag_users_key(tag: &str) -> String {
    format!("tags:{}:users", tag)
}
