//! Read-only handlers for the `/likes` resource.

use axum::extract::State;
use axum::Json;
use musicrev_core::search::Ordering;
use musicrev_core::types::DbId;
use musicrev_db::models::like::{LikeListParams, LikeResponse};
use musicrev_db::repositories::like_repo::{DEFAULT_ORDERING, ORDERING_FIELDS};
use musicrev_db::repositories::LikeRepo;

use crate::error::{AppError, AppResult};
use crate::expand::{expand_all, expand_one};
use crate::extract::{Path, Query};
use crate::middleware::auth::MaybeUser;
use crate::query::page;
use crate::state::AppState;

/// GET /api/v1/likes
///
/// Optional `?user=` and `?track=` filters.
pub async fn list(
    State(state): State<AppState>,
    _viewer: MaybeUser,
    Query(params): Query<LikeListParams>,
) -> AppResult<Json<Vec<LikeResponse>>> {
    let ordering = Ordering::parse(params.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDERING);
    let (limit, offset) = page(params.limit, params.offset);
    let likes =
        LikeRepo::list(&state.pool, params.user, params.track, ordering, limit, offset).await?;
    Ok(Json(expand_all(&state.pool, likes).await?))
}

/// GET /api/v1/likes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _viewer: MaybeUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<LikeResponse>> {
    let like = LikeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Like", id))?;
    Ok(Json(expand_one(&state.pool, like).await?))
}
