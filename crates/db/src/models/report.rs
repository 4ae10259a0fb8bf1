//! Report entity model, DTOs, and moderation statistics.

use musicrev_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::UserProfile;

/// A row from the `reports` table.
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: DbId,
    pub track_id: DbId,
    pub user_id: DbId,
    pub reason: String,
    pub created_at: Timestamp,
    pub is_resolved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: DbId,
    pub track: DbId,
    pub user: UserProfile,
    pub reason: String,
    pub created_at: Timestamp,
    pub is_resolved: bool,
}

impl Report {
    pub fn into_response(self, user: UserProfile) -> ReportResponse {
        ReportResponse {
            id: self.id,
            track: self.track_id,
            user,
            reason: self.reason,
            created_at: self.created_at,
            is_resolved: self.is_resolved,
        }
    }
}

/// DTO for creating a new report. `reason` is already validated and trimmed.
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub track_id: DbId,
    pub user_id: DbId,
    pub reason: String,
}

/// Query parameters for listing reports.
#[derive(Debug, Default, Deserialize)]
pub struct ReportListParams {
    /// `true` / `false`; anything else disables the filter.
    pub resolved: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One entry of the "most reported tracks" block.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MostReportedTrack {
    pub track_id: DbId,
    pub track_title: String,
    /// Username of the track owner.
    pub user: String,
    pub report_count: i64,
}

/// Report counters from a single aggregate query.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReportCounts {
    pub total_reports: i64,
    pub resolved_reports: i64,
    pub unresolved_reports: i64,
}

/// Payload of `GET /reports/statistics`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportStatistics {
    pub total_reports: i64,
    pub unresolved_reports: i64,
    pub resolved_reports: i64,
    pub most_reported_tracks: Vec<MostReportedTrack>,
}
