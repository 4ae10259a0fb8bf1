//! Accounts in `users`, plus the profile projection with per-user counters.

use musicrev_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User, UserProfile};

const COLUMNS: &str =
    "id, username, email, password_hash, role, is_active, date_joined, updated_at";

/// Counters span every track the user owns, active or not. Aliased as `u`.
const PROFILE_SELECT: &str = "\
    SELECT u.id, u.username, u.email, u.role, u.date_joined, \
        (SELECT COUNT(*) FROM tracks t WHERE t.user_id = u.id) AS tracks_count, \
        (SELECT COUNT(*) FROM likes l JOIN tracks t ON t.id = l.track_id \
            WHERE t.user_id = u.id) AS total_likes_received, \
        (SELECT COUNT(*) FROM comments c JOIN tracks t ON t.id = c.track_id \
            WHERE t.user_id = u.id) AS total_comments_received \
    FROM users u";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Exact, case-sensitive match.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Whether `username` belongs to a user other than `exclude_id`.
    pub async fn username_taken(
        pool: &PgPool,
        username: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 \
             AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(username)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_profile(pool: &PgPool, id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("{PROFILE_SELECT} WHERE u.id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Batch lookup used when embedding owners into list payloads.
    pub async fn find_profiles(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<UserProfile>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("{PROFILE_SELECT} WHERE u.id = ANY($1)");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Newest accounts first.
    pub async fn list_profiles(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query =
            format!("{PROFILE_SELECT} ORDER BY u.date_joined DESC, u.id DESC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// `None` fields keep their stored value. Account fields and the
    /// password hash change in one statement.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_optional(pool)
            .await
    }

    /// `(is_active, role)` of a user, read on every authenticated request.
    pub async fn find_access(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<(bool, String)>, sqlx::Error> {
        sqlx::query_as("SELECT is_active, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Clear `is_active`. False when the user is missing or already inactive.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
