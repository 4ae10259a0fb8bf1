//! Comment entity model and DTOs.

use musicrev_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::UserProfile;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: DbId,
    pub track_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: DbId,
    pub track: DbId,
    pub user: UserProfile,
    pub content: String,
    pub created_at: Timestamp,
}

impl Comment {
    pub fn into_response(self, user: UserProfile) -> CommentResponse {
        CommentResponse {
            id: self.id,
            track: self.track_id,
            user,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

/// DTO for creating a new comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub track_id: DbId,
    pub user_id: DbId,
    pub content: String,
}

/// Query parameters for listing comments.
#[derive(Debug, Default, Deserialize)]
pub struct CommentListParams {
    pub track: Option<DbId>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
