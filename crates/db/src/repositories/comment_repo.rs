//! Repository for the `comments` table.

use musicrev_core::search::Ordering;
use musicrev_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

const COLUMNS: &str = "id, track_id, user_id, content, created_at";

pub const ORDERING_FIELDS: &[&str] = &["created_at"];

pub const DEFAULT_ORDERING: Ordering = Ordering::desc("created_at");

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (track_id, user_id, content) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.track_id)
            .bind(input.user_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List comments, optionally restricted to one track.
    pub async fn list(
        pool: &PgPool,
        track_id: Option<DbId>,
        ordering: Ordering,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let order_by = ordering.to_sql("c");
        match track_id {
            Some(track_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM comments c WHERE c.track_id = $1 \
                     ORDER BY {order_by} LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Comment>(&query)
                    .bind(track_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM comments c ORDER BY {order_by} LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Comment>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// All comments of a track, newest first.
    pub async fn list_for_track(
        pool: &PgPool,
        track_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments c WHERE c.track_id = $1 ORDER BY {}",
            DEFAULT_ORDERING.to_sql("c")
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(track_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the content of a comment. Returns `None` if it does not exist.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("UPDATE comments SET content = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a comment. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
