//! Repository for the `likes` table.

use musicrev_core::moderation::LikeToggle;
use musicrev_core::search::Ordering;
use musicrev_core::types::DbId;
use sqlx::PgPool;

use crate::models::like::Like;

const COLUMNS: &str = "id, track_id, user_id, created_at";

pub const ORDERING_FIELDS: &[&str] = &["created_at"];

pub const DEFAULT_ORDERING: Ordering = Ordering::desc("created_at");

/// Provides toggle and read operations for likes.
pub struct LikeRepo;

impl LikeRepo {
    /// Flip the like state of `(track_id, user_id)`.
    ///
    /// Runs in one transaction: an existing like is deleted, otherwise one is
    /// inserted. The `uq_likes_track_user` constraint absorbs a concurrent
    /// insert of the same pair, so a race never produces a duplicate.
    pub async fn toggle(
        pool: &PgPool,
        track_id: DbId,
        user_id: DbId,
    ) -> Result<LikeToggle, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM likes WHERE track_id = $1 AND user_id = $2")
            .bind(track_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let outcome = if removed.rows_affected() > 0 {
            LikeToggle::Unliked
        } else {
            sqlx::query(
                "INSERT INTO likes (track_id, user_id) VALUES ($1, $2) \
                 ON CONFLICT ON CONSTRAINT uq_likes_track_user DO NOTHING",
            )
            .bind(track_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
            LikeToggle::Liked
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Remove a like. Returns `true` if one existed.
    pub async fn remove(pool: &PgPool, track_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM likes WHERE track_id = $1 AND user_id = $2")
            .bind(track_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Like>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM likes WHERE id = $1");
        sqlx::query_as::<_, Like>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List likes with optional user and track filters.
    pub async fn list(
        pool: &PgPool,
        user_id: Option<DbId>,
        track_id: Option<DbId>,
        ordering: Ordering,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Like>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if user_id.is_some() {
            conditions.push(format!("l.user_id = ${param_idx}"));
            param_idx += 1;
        }
        if track_id.is_some() {
            conditions.push(format!("l.track_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT l.id, l.track_id, l.user_id, l.created_at FROM likes l {where_clause} \
             ORDER BY {} LIMIT ${param_idx} OFFSET ${}",
            ordering.to_sql("l"),
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Like>(&query);
        if let Some(uid) = user_id {
            q = q.bind(uid);
        }
        if let Some(tid) = track_id {
            q = q.bind(tid);
        }
        q = q.bind(limit).bind(offset);

        q.fetch_all(pool).await
    }
}
