//! The error type every handler returns.
//!
//! Rendered as `{"error": <message>, "code": <CODE>}`; field-level
//! validation failures add a `fields` map of messages per request field.
//! Internal details are logged, never sent.

use std::borrow::Cow;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use musicrev_core::error::CoreError;
use musicrev_core::types::DbId;
use musicrev_core::validation::FieldErrors;
use serde::Serialize;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request that is not tied to one field.
    #[error("bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: Cow<'a, str>,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl AppError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        AppError::Core(CoreError::NotFound { entity, id })
    }

    fn render(&self) -> (StatusCode, ErrorBody<'_>) {
        let (status, code, error): (StatusCode, &'static str, Cow<'_, str>) = match self {
            AppError::Core(CoreError::InvalidFields(fields)) => {
                return (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: Cow::Borrowed("Validation failed"),
                        code: "VALIDATION_ERROR",
                        fields: Some(fields),
                    },
                );
            }
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found").into(),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.into())
            }
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.into())
            }
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.into())
            }
            AppError::Core(CoreError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.into())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.into()),
            AppError::Database(err) => database_failure(err),
            AppError::Core(CoreError::Internal(detail)) => {
                tracing::error!(%detail, "Request failed");
                internal()
            }
        };

        (
            status,
            ErrorBody {
                error,
                code,
                fields: None,
            },
        )
    }
}

/// Map a unique violation to a [`CoreError::Conflict`] carrying `message`.
/// Used where a pre-check can lose a race with a concurrent insert.
pub fn conflict_on_unique(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Core(CoreError::Conflict(message.into()))
        }
        other => AppError::Database(other),
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Core(CoreError::InvalidFields(errors))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::from(errors))
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(e: argon2::password_hash::Error) -> Self {
        AppError::Core(CoreError::Internal(format!("password hashing: {e}")))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        AppError::Core(CoreError::Internal(format!("token signing: {e}")))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.render();
        (status, Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, Cow<'static, str>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        Cow::Borrowed(INTERNAL_MESSAGE),
    )
}

/// Unique violations are conflicts and dangling references are the
/// client's fault; any other database failure is a 500.
fn database_failure(err: &sqlx::Error) -> (StatusCode, &'static str, Cow<'static, str>) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            Cow::Borrowed("Resource not found"),
        ),
        sqlx::Error::Database(db) if db.is_unique_violation() => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!(
                "Duplicate value violates unique constraint: {}",
                db.constraint().unwrap_or("unknown")
            )
            .into(),
        ),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            Cow::Borrowed("Referenced resource does not exist"),
        ),
        other => {
            tracing::error!(error = %other, "Database failure");
            internal()
        }
    }
}
