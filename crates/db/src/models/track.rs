//! Track entity model and DTOs.

use musicrev_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::report::ReportResponse;
use super::user::UserProfile;

/// A row from the `tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub title: String,
    /// Path of the stored audio file relative to the media root.
    pub audio_file: String,
    pub description: Option<String>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_active: bool,
}

/// A track row joined with its like/comment counters and the viewer's like flag.
#[derive(Debug, Clone, FromRow)]
pub struct TrackRow {
    pub id: DbId,
    pub title: String,
    pub audio_file: String,
    pub description: Option<String>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_active: bool,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_liked: bool,
}

/// Track payload returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct TrackResponse {
    pub id: DbId,
    pub title: String,
    pub audio_file: String,
    pub description: Option<String>,
    pub user: UserProfile,
    pub likes_count: i64,
    pub comments_count: i64,
    /// Whether the requesting user has liked this track (false for anonymous).
    pub is_liked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_active: bool,
}

impl TrackRow {
    pub fn into_response(self, user: UserProfile) -> TrackResponse {
        TrackResponse {
            id: self.id,
            title: self.title,
            audio_file: self.audio_file,
            description: self.description,
            user,
            likes_count: self.likes_count,
            comments_count: self.comments_count,
            is_liked: self.is_liked,
            created_at: self.created_at,
            updated_at: self.updated_at,
            is_active: self.is_active,
        }
    }
}

/// Moderation view of a track with unresolved reports.
#[derive(Debug, Clone, FromRow)]
pub struct ReportedTrackRow {
    pub id: DbId,
    pub title: String,
    pub user_username: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub is_active: bool,
    /// Number of unresolved reports.
    pub reports_count: i64,
}

/// Payload of `GET /tracks/reported`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportedTrackResponse {
    pub id: DbId,
    pub title: String,
    pub user_username: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub is_active: bool,
    pub reports_count: i64,
    /// Every report on the track, resolved or not.
    pub reports_detail: Vec<ReportResponse>,
}

impl ReportedTrackRow {
    pub fn into_response(self, reports_detail: Vec<ReportResponse>) -> ReportedTrackResponse {
        ReportedTrackResponse {
            id: self.id,
            title: self.title,
            user_username: self.user_username,
            description: self.description,
            created_at: self.created_at,
            is_active: self.is_active,
            reports_count: self.reports_count,
            reports_detail,
        }
    }
}

/// DTO for creating a new track. The audio file is already stored.
#[derive(Debug, Clone)]
pub struct CreateTrack {
    pub title: String,
    pub audio_file: String,
    pub description: Option<String>,
    pub user_id: DbId,
}

/// DTO for updating an existing track. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTrack {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Query parameters for listing tracks.
#[derive(Debug, Default, Deserialize)]
pub struct TrackListParams {
    /// Only tracks owned by this user.
    pub user: Option<DbId>,
    /// Case-insensitive substring over title, description, and owner username.
    pub search: Option<String>,
    /// `created_at`, `-created_at`, `title`, or `-title`.
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
