//! Handlers for the `/comments` resource.
//!
//! Reads are public; creation requires authentication; edits and deletes
//! are restricted to the author or an admin.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use musicrev_core::permissions::{enforce_object, Operation, OwnerOrAdmin};
use musicrev_core::search::Ordering;
use musicrev_core::types::DbId;
use musicrev_core::validation::{not_blank, FieldErrors};
use musicrev_db::models::comment::{Comment, CommentListParams, CommentResponse, CreateComment};
use musicrev_db::repositories::comment_repo::{DEFAULT_ORDERING, ORDERING_FIELDS};
use musicrev_db::repositories::{CommentRepo, TrackRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::expand::{expand_all, expand_one};
use crate::extract::{Path, Query, ValidatedJson};
use crate::middleware::auth::MaybeUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::page;
use crate::state::AppState;

/// Request body for `POST /comments`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub track: DbId,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

/// Request body for `PUT|PATCH /comments/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(custom(function = "not_blank"))]
    pub content: Option<String>,
}

/// GET /api/v1/comments
///
/// Optional `?track=` filter and `?ordering=created_at|-created_at`.
pub async fn list(
    State(state): State<AppState>,
    _viewer: MaybeUser,
    Query(params): Query<CommentListParams>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let ordering = Ordering::parse(params.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDERING);
    let (limit, offset) = page(params.limit, params.offset);
    let comments = CommentRepo::list(&state.pool, params.track, ordering, limit, offset).await?;
    Ok(Json(expand_all(&state.pool, comments).await?))
}

/// POST /api/v1/comments
///
/// The referenced track must exist and be active.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    ValidatedJson(input): ValidatedJson<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    if TrackRepo::find_active(&state.pool, input.track).await?.is_none() {
        return Err(FieldErrors::single(
            "track",
            format!("Invalid pk \"{}\" - object does not exist.", input.track),
        )
        .into());
    }

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            track_id: input.track,
            user_id: auth.user_id,
            content: input.content.trim().to_string(),
        },
    )
    .await?;

    tracing::debug!(
        comment_id = comment.id,
        track_id = comment.track_id,
        user_id = auth.user_id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(expand_one(&state.pool, comment).await?)))
}

/// GET /api/v1/comments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _viewer: MaybeUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CommentResponse>> {
    let comment = find_comment(&state, id).await?;
    Ok(Json(expand_one(&state.pool, comment).await?))
}

/// PUT|PATCH /api/v1/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateCommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    let comment = find_comment(&state, id).await?;
    enforce_object(
        &OwnerOrAdmin,
        Operation::Write,
        Some(&auth.principal()),
        comment.user_id,
    )?;

    let comment = match input.content {
        Some(content) => CommentRepo::update_content(&state.pool, id, content.trim())
            .await?
            .ok_or_else(|| AppError::not_found("Comment", id))?,
        None => comment,
    };
    Ok(Json(expand_one(&state.pool, comment).await?))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let comment = find_comment(&state, id).await?;
    enforce_object(
        &OwnerOrAdmin,
        Operation::Write,
        Some(&auth.principal()),
        comment.user_id,
    )?;

    if CommentRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Comment", id))
    }
}

async fn find_comment(state: &AppState, id: DbId) -> AppResult<Comment> {
    CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment", id))
}
