//! Like entity model.

use musicrev_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::UserProfile;

/// A row from the `likes` table. `(track_id, user_id)` is unique.
#[derive(Debug, Clone, FromRow)]
pub struct Like {
    pub id: DbId,
    pub track_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub id: DbId,
    pub track: DbId,
    pub user: UserProfile,
    pub created_at: Timestamp,
}

impl Like {
    pub fn into_response(self, user: UserProfile) -> LikeResponse {
        LikeResponse {
            id: self.id,
            track: self.track_id,
            user,
            created_at: self.created_at,
        }
    }
}

/// Query parameters for listing likes.
#[derive(Debug, Default, Deserialize)]
pub struct LikeListParams {
    pub user: Option<DbId>,
    pub track: Option<DbId>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
