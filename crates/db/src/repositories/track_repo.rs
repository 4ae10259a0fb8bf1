//! Repository for the `tracks` table.

use musicrev_core::search::{like_pattern, Ordering};
use musicrev_core::types::DbId;
use sqlx::PgPool;

use crate::models::track::{CreateTrack, ReportedTrackRow, Track, TrackRow, UpdateTrack};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, audio_file, description, user_id, created_at, updated_at, is_active";

/// Orderable columns for track lists.
pub const ORDERING_FIELDS: &[&str] = &["created_at", "title"];

/// Default track ordering: newest first.
pub const DEFAULT_ORDERING: Ordering = Ordering::desc("created_at");

/// Track projection with counters. `$1` is the viewer id (NULL for anonymous).
const ROW_SELECT: &str = "\
    SELECT t.id, t.title, t.audio_file, t.description, t.user_id, \
        t.created_at, t.updated_at, t.is_active, \
        (SELECT COUNT(*) FROM likes l WHERE l.track_id = t.id) AS likes_count, \
        (SELECT COUNT(*) FROM comments c WHERE c.track_id = t.id) AS comments_count, \
        EXISTS (SELECT 1 FROM likes l WHERE l.track_id = t.id AND l.user_id = $1) AS is_liked \
    FROM tracks t \
    JOIN users owner ON owner.id = t.user_id";

/// Filters for [`TrackRepo::list_active`].
#[derive(Debug, Clone, Default)]
pub struct TrackFilter<'a> {
    pub owner_id: Option<DbId>,
    pub search: Option<&'a str>,
}

/// Provides CRUD and moderation operations for tracks.
pub struct TrackRepo;

impl TrackRepo {
    /// Insert a new track, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTrack) -> Result<Track, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracks (title, audio_file, description, user_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(&input.title)
            .bind(&input.audio_file)
            .bind(&input.description)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find an active track by ID. Deactivated tracks are invisible here.
    pub async fn find_active(pool: &PgPool, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active track with counters, as seen by `viewer`.
    pub async fn find_active_row(
        pool: &PgPool,
        id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Option<TrackRow>, sqlx::Error> {
        let query = format!("{ROW_SELECT} WHERE t.id = $2 AND t.is_active = true");
        sqlx::query_as::<_, TrackRow>(&query)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active tracks with optional owner and text filters.
    pub async fn list_active(
        pool: &PgPool,
        viewer: Option<DbId>,
        filter: &TrackFilter<'_>,
        ordering: Ordering,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TrackRow>, sqlx::Error> {
        let mut conditions: Vec<String> = vec!["t.is_active = true".to_string()];
        // $1 is taken by the viewer.
        let mut param_idx: usize = 2;

        if filter.owner_id.is_some() {
            conditions.push(format!("t.user_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.search.is_some() {
            conditions.push(format!(
                "(t.title ILIKE ${param_idx} OR t.description ILIKE ${param_idx} \
                 OR owner.username ILIKE ${param_idx})"
            ));
            param_idx += 1;
        }

        let query = format!(
            "{ROW_SELECT} WHERE {} ORDER BY {} LIMIT ${param_idx} OFFSET ${}",
            conditions.join(" AND "),
            ordering.to_sql("t"),
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, TrackRow>(&query).bind(viewer);
        if let Some(owner_id) = filter.owner_id {
            q = q.bind(owner_id);
        }
        if let Some(search) = filter.search {
            q = q.bind(like_pattern(search));
        }
        q = q.bind(limit).bind(offset);

        q.fetch_all(pool).await
    }

    /// List every track owned by `owner_id`, including deactivated ones.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Vec<TrackRow>, sqlx::Error> {
        let query = format!(
            "{ROW_SELECT} WHERE t.user_id = $2 ORDER BY {}",
            DEFAULT_ORDERING.to_sql("t")
        );
        sqlx::query_as::<_, TrackRow>(&query)
            .bind(viewer)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update an active track. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrack,
    ) -> Result<Option<Track>, sqlx::Error> {
        let query = format!(
            "UPDATE tracks SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description) \
             WHERE id = $1 AND is_active = true \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a track (set `is_active = false`).
    ///
    /// Returns `true` if an active row was updated.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tracks SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate a track and resolve all of its pending reports atomically.
    ///
    /// Returns the number of reports resolved, or `None` if no active track
    /// with the given `id` exists.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deactivated =
            sqlx::query("UPDATE tracks SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        if deactivated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let resolved = sqlx::query(
            "UPDATE reports SET is_resolved = true WHERE track_id = $1 AND is_resolved = false",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(resolved.rows_affected()))
    }

    /// Tracks (active or not) with at least one unresolved report.
    ///
    /// Ordered by unresolved report count, then newest first.
    pub async fn list_reported(pool: &PgPool) -> Result<Vec<ReportedTrackRow>, sqlx::Error> {
        sqlx::query_as::<_, ReportedTrackRow>(
            "SELECT t.id, t.title, u.username AS user_username, t.description, \
                t.created_at, t.is_active, COUNT(r.id) AS reports_count \
             FROM tracks t \
             JOIN users u ON u.id = t.user_id \
             JOIN reports r ON r.track_id = t.id AND r.is_resolved = false \
             GROUP BY t.id, u.username \
             ORDER BY reports_count DESC, t.created_at DESC, t.id DESC",
        )
        .fetch_all(pool)
        .await
    }
}
