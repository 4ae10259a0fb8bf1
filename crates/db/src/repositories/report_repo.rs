//! Repository for the `reports` table.

use musicrev_core::moderation::MOST_REPORTED_LIMIT;
use musicrev_core::search::Ordering;
use musicrev_core::types::DbId;
use sqlx::PgPool;

use crate::models::report::{
    CreateReport, MostReportedTrack, Report, ReportCounts, ReportStatistics,
};

/// Column list for `reports` queries.
const COLUMNS: &str = "id, track_id, user_id, reason, created_at, is_resolved";

pub const ORDERING_FIELDS: &[&str] = &["created_at", "is_resolved"];

pub const DEFAULT_ORDERING: Ordering = Ordering::desc("created_at");

/// Provides CRUD and moderation operations for reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Create a new report, returning the full row.
    ///
    /// A second report by the same user on the same track violates
    /// `uq_reports_track_user`.
    pub async fn create(pool: &PgPool, input: &CreateReport) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports (track_id, user_id, reason) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(input.track_id)
            .bind(input.user_id)
            .bind(&input.reason)
            .fetch_one(pool)
            .await
    }

    /// Whether `user_id` has already reported `track_id`.
    pub async fn exists_for(
        pool: &PgPool,
        track_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM reports WHERE track_id = $1 AND user_id = $2)",
        )
        .bind(track_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List reports, optionally filtered by resolution state.
    pub async fn list(
        pool: &PgPool,
        resolved: Option<bool>,
        ordering: Ordering,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report>, sqlx::Error> {
        let order_by = ordering.to_sql("r");
        match resolved {
            Some(resolved) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM reports r WHERE r.is_resolved = $1 \
                     ORDER BY {order_by} LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Report>(&query)
                    .bind(resolved)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM reports r ORDER BY {order_by} LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Report>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// All reports on the given tracks, newest first.
    pub async fn list_for_tracks(
        pool: &PgPool,
        track_ids: &[DbId],
    ) -> Result<Vec<Report>, sqlx::Error> {
        if track_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM reports r WHERE r.track_id = ANY($1) ORDER BY {}",
            DEFAULT_ORDERING.to_sql("r")
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(track_ids)
            .fetch_all(pool)
            .await
    }

    /// Replace the reason of a report. Returns `None` if it does not exist.
    pub async fn update_reason(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("UPDATE reports SET reason = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a report. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark one report resolved, optionally deactivating its track in the
    /// same transaction.
    ///
    /// Returns `None` if no report with the given `id` exists.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        deactivate_track: bool,
    ) -> Result<Option<Report>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query =
            format!("UPDATE reports SET is_resolved = true WHERE id = $1 RETURNING {COLUMNS}");
        let report = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(report), true) = (&report, deactivate_track) {
            sqlx::query("UPDATE tracks SET is_active = false WHERE id = $1")
                .bind(report.track_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(report)
    }

    /// Mark every pending report on a track resolved. Returns the count updated.
    pub async fn resolve_all_for_track(pool: &PgPool, track_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reports SET is_resolved = true WHERE track_id = $1 AND is_resolved = false",
        )
        .bind(track_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Aggregate counters plus the most reported active tracks.
    ///
    /// Tracks are ranked by total report count (resolved or not), ties broken
    /// by ascending track id.
    pub async fn statistics(pool: &PgPool) -> Result<ReportStatistics, sqlx::Error> {
        let counts = sqlx::query_as::<_, ReportCounts>(
            "SELECT COUNT(*) AS total_reports, \
                COUNT(*) FILTER (WHERE is_resolved) AS resolved_reports, \
                COUNT(*) FILTER (WHERE NOT is_resolved) AS unresolved_reports \
             FROM reports",
        )
        .fetch_one(pool)
        .await?;

        let most_reported_tracks = sqlx::query_as::<_, MostReportedTrack>(
            "SELECT t.id AS track_id, t.title AS track_title, u.username AS \"user\", \
                COUNT(r.id) AS report_count \
             FROM tracks t \
             JOIN users u ON u.id = t.user_id \
             JOIN reports r ON r.track_id = t.id \
             WHERE t.is_active = true \
             GROUP BY t.id, t.title, u.username \
             ORDER BY report_count DESC, t.id ASC \
             LIMIT $1",
        )
        .bind(MOST_REPORTED_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(ReportStatistics {
            total_reports: counts.total_reports,
            unresolved_reports: counts.unresolved_reports,
            resolved_reports: counts.resolved_reports,
            most_reported_tracks,
        })
    }
}
