//! Handlers for the `/tracks` resource and its per-track actions.
//!
//! Reads are public. Creating a track, liking, and reporting require
//! authentication; editing and deleting require the owner or an admin;
//! moderation actions are admin-only. Only active tracks are visible to
//! detail lookups and actions.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use musicrev_core::error::CoreError;
use musicrev_core::media::audio_extension;
use musicrev_core::moderation::{
    LikeState, MSG_NOT_LIKED, MSG_REPORTS_RESOLVED, MSG_TRACK_DEACTIVATED,
};
use musicrev_core::permissions::{enforce_object, Operation, OwnerOrAdmin};
use musicrev_core::search::Ordering;
use musicrev_core::types::DbId;
use musicrev_core::validation::{
    non_blank, not_blank, validate_title, FieldErrors, REQUIRED_MESSAGE,
};
use musicrev_db::models::comment::CommentResponse;
use musicrev_db::models::report::ReportResponse;
use musicrev_db::models::track::{
    CreateTrack, ReportedTrackResponse, Track, TrackListParams, TrackResponse, UpdateTrack,
};
use musicrev_db::repositories::track_repo::{DEFAULT_ORDERING, ORDERING_FIELDS};
use musicrev_db::repositories::{CommentRepo, LikeRepo, ReportRepo, TrackFilter, TrackRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::expand::{expand_all, expand_one};
use crate::extract::{Path, Query, Upload, ValidatedJson};
use crate::handlers::reports::file_report;
use crate::middleware::auth::MaybeUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT|PATCH /tracks/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTrackRequest {
    #[validate(
        length(max = 200, message = "Ensure this field has no more than 200 characters."),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Request body for `POST /tracks/{id}/report`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ReportTrackRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeactivateResponse {
    pub deactivated: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ResolveReportsResponse {
    pub resolved: bool,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/tracks
///
/// Active tracks, filtered by `?user=` and `?search=`, ordered by `?ordering=`.
pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Query(params): Query<TrackListParams>,
) -> AppResult<Json<Vec<TrackResponse>>> {
    let ordering = Ordering::parse(params.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDERING);
    let (limit, offset) = page(params.limit, params.offset);
    let filter = TrackFilter {
        owner_id: params.user,
        search: non_blank(params.search.as_deref()),
    };

    let rows =
        TrackRepo::list_active(&state.pool, viewer.user_id(), &filter, ordering, limit, offset)
            .await?;
    Ok(Json(expand_all(&state.pool, rows).await?))
}

/// POST /api/v1/tracks (multipart/form-data)
///
/// Fields: `title`, `description` (optional), `audio_file`. The caller
/// becomes the owner.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Upload(mut multipart): Upload,
) -> AppResult<(StatusCode, Json<TrackResponse>)> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "description" => {
                description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "audio_file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, data.to_vec()));
            }
            _ => {} // ignore unknown fields
        }
    }

    let mut errors = FieldErrors::new();
    validate_title(&mut errors, title.as_deref());
    let ext = match &file_data {
        None => {
            errors.add("audio_file", REQUIRED_MESSAGE);
            None
        }
        Some((_, data)) if data.is_empty() => {
            errors.add("audio_file", "The submitted file is empty.");
            None
        }
        Some((filename, _)) => match audio_extension(filename) {
            Ok(ext) => Some(ext),
            Err(CoreError::InvalidFields(e)) => {
                errors.extend(e);
                None
            }
            Err(other) => return Err(other.into()),
        },
    };
    errors.into_result()?;

    let (Some(title), Some(ext), Some((_, data))) = (title, ext, file_data) else {
        return Err(AppError::BadRequest("Incomplete track upload".into()));
    };

    let stored = state.media.store_audio(&ext, &data).await.map_err(|e| {
        CoreError::Internal(format!("Failed to store audio file: {e}"))
    })?;

    let inserted = TrackRepo::create(
        &state.pool,
        &CreateTrack {
            title: title.trim().to_string(),
            audio_file: stored.path.clone(),
            description: non_blank(description.as_deref()).map(str::to_string),
            user_id: auth.user_id,
        },
    )
    .await;
    let track = match inserted {
        Ok(track) => track,
        Err(e) => {
            if stored.created {
                state.media.discard(&stored.path).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(track_id = track.id, user_id = auth.user_id, "Track uploaded");

    let response = load_response(&state, track.id, Some(auth.user_id)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/tracks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TrackResponse>> {
    Ok(Json(load_response(&state, id, viewer.user_id()).await?))
}

/// PUT|PATCH /api/v1/tracks/{id}
///
/// Partial update of `title` and `description`. Owner or admin only.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTrackRequest>,
) -> AppResult<Json<TrackResponse>> {
    let track = find_active(&state, id).await?;
    enforce_object(
        &OwnerOrAdmin,
        Operation::Write,
        Some(&auth.principal()),
        track.user_id,
    )?;

    let update = UpdateTrack {
        title: input.title.map(|t| t.trim().to_string()),
        description: input.description,
    };
    TrackRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| AppError::not_found("Track", id))?;

    Ok(Json(load_response(&state, id, Some(auth.user_id)).await?))
}

/// DELETE /api/v1/tracks/{id}
///
/// Soft delete (`is_active = false`). Owner or admin only. Returns 204.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let track = find_active(&state, id).await?;
    enforce_object(
        &OwnerOrAdmin,
        Operation::Write,
        Some(&auth.principal()),
        track.user_id,
    )?;

    if TrackRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(track_id = id, user_id = auth.user_id, "Track deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Track", id))
    }
}

// ---------------------------------------------------------------------------
// Per-track actions
// ---------------------------------------------------------------------------

/// GET /api/v1/tracks/{id}/comments
pub async fn comments(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    find_active(&state, id).await?;
    let comments = CommentRepo::list_for_track(&state.pool, id).await?;
    Ok(Json(expand_all(&state.pool, comments).await?))
}

/// POST /api/v1/tracks/{id}/like
///
/// Toggle the caller's like. 201 `{"liked": true}` when a like was created,
/// 200 `{"liked": false}` when an existing one was removed.
pub async fn like(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<LikeState>)> {
    find_active(&state, id).await?;
    let outcome = LikeRepo::toggle(&state.pool, id, auth.user_id).await?;

    tracing::debug!(
        track_id = id,
        user_id = auth.user_id,
        liked = outcome.is_liked(),
        "Like toggled"
    );

    let status = if outcome.is_liked() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(LikeState::from(outcome))))
}

/// DELETE /api/v1/tracks/{id}/unlike
pub async fn unlike(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<LikeState>> {
    find_active(&state, id).await?;
    if !LikeRepo::remove(&state.pool, id, auth.user_id).await? {
        return Err(CoreError::Validation(MSG_NOT_LIKED.into()).into());
    }
    Ok(Json(LikeState { liked: false }))
}

/// POST /api/v1/tracks/{id}/report
pub async fn report(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<ReportTrackRequest>,
) -> AppResult<(StatusCode, Json<ReportResponse>)> {
    let track = find_active(&state, id).await?;
    let report = file_report(&state, track.id, auth.user_id, input.reason.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

// ---------------------------------------------------------------------------
// Moderation (admin)
// ---------------------------------------------------------------------------

/// GET /api/v1/tracks/reported
///
/// Tracks with at least one unresolved report, each with every report on it.
pub async fn reported(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<ReportedTrackResponse>>> {
    let tracks = TrackRepo::list_reported(&state.pool).await?;
    let track_ids: Vec<DbId> = tracks.iter().map(|t| t.id).collect();

    let reports = ReportRepo::list_for_tracks(&state.pool, &track_ids).await?;
    let mut by_track: HashMap<DbId, Vec<ReportResponse>> = HashMap::new();
    for report in expand_all(&state.pool, reports).await? {
        by_track.entry(report.track).or_default().push(report);
    }

    let response = tracks
        .into_iter()
        .map(|t| {
            let detail = by_track.remove(&t.id).unwrap_or_default();
            t.into_response(detail)
        })
        .collect();
    Ok(Json(response))
}

/// PUT /api/v1/tracks/{id}/deactivate
///
/// Deactivate the track and resolve all of its pending reports atomically.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeactivateResponse>> {
    let resolved = TrackRepo::deactivate(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Track", id))?;

    tracing::info!(track_id = id, user_id = admin.user_id, resolved, "Track deactivated");

    Ok(Json(DeactivateResponse {
        deactivated: true,
        message: MSG_TRACK_DEACTIVATED,
    }))
}

/// PUT /api/v1/tracks/{id}/resolve_reports
pub async fn resolve_reports(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ResolveReportsResponse>> {
    find_active(&state, id).await?;
    let resolved = ReportRepo::resolve_all_for_track(&state.pool, id).await?;

    tracing::info!(track_id = id, user_id = admin.user_id, resolved, "Track reports resolved");

    Ok(Json(ResolveReportsResponse {
        resolved: true,
        message: MSG_REPORTS_RESOLVED,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_active(state: &AppState, id: DbId) -> AppResult<Track> {
    TrackRepo::find_active(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Track", id))
}

/// Load an active track with counters and its owner's profile.
async fn load_response(
    state: &AppState,
    id: DbId,
    viewer: Option<DbId>,
) -> AppResult<TrackResponse> {
    let row = TrackRepo::find_active_row(&state.pool, id, viewer)
        .await?
        .ok_or_else(|| AppError::not_found("Track", id))?;
    expand_one(&state.pool, row).await
}
