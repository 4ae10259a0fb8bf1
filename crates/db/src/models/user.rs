//! Account rows and the shapes they are exposed in.

use musicrev_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `users` row. Holds the password hash, so it has no `Serialize` impl.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub date_joined: Timestamp,
    pub updated_at: Timestamp,
}

/// What other clients see of a user; also embedded as `user` in track,
/// comment, like and report payloads.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub tracks_count: i64,
    /// Likes across all of the user's tracks.
    pub total_likes_received: i64,
    /// Comments across all of the user's tracks.
    pub total_comments_received: i64,
    pub date_joined: Timestamp,
}

/// Registration and login echo.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for RegisteredUser {
    fn from(user: &User) -> Self {
        RegisteredUser {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Profile edits. Role changes are not possible through this path.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    /// Already hashed.
    pub password_hash: Option<String>,
}
