//! Handlers for the `/reports` resource.
//!
//! Any authenticated user may file a report; every other operation is
//! admin-only via [`RequireAdmin`].

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use musicrev_core::error::CoreError;
use musicrev_core::moderation::{
    parse_resolved_filter, validate_report_reason, MSG_DUPLICATE_REPORT,
};
use musicrev_core::search::Ordering;
use musicrev_core::types::DbId;
use musicrev_core::validation::FieldErrors;
use musicrev_db::models::report::{CreateReport, ReportListParams, ReportResponse, ReportStatistics};
use musicrev_db::repositories::report_repo::{DEFAULT_ORDERING, ORDERING_FIELDS};
use musicrev_db::repositories::{ReportRepo, TrackRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{conflict_on_unique, AppError, AppResult};
use crate::expand::{expand_all, expand_one};
use crate::extract::{Path, Query, ValidatedJson};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /reports`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    pub track: DbId,
    pub reason: Option<String>,
}

/// Request body for `PUT|PATCH /reports/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReportRequest {
    pub reason: Option<String>,
}

/// Optional body for `POST|PUT /reports/{id}/resolve`.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub deactivate_track: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/reports
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    ValidatedJson(input): ValidatedJson<CreateReportRequest>,
) -> AppResult<(StatusCode, Json<ReportResponse>)> {
    if TrackRepo::find_active(&state.pool, input.track).await?.is_none() {
        return Err(FieldErrors::single(
            "track",
            format!("Invalid pk \"{}\" - object does not exist.", input.track),
        )
        .into());
    }
    let report = file_report(&state, input.track, auth.user_id, input.reason.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/v1/reports
///
/// `?resolved=true|false` filters on the flag; any other value is ignored.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ReportListParams>,
) -> AppResult<Json<Vec<ReportResponse>>> {
    let resolved = parse_resolved_filter(params.resolved.as_deref());
    let ordering = Ordering::parse(params.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDERING);
    let (limit, offset) = page(params.limit, params.offset);

    let reports = ReportRepo::list(&state.pool, resolved, ordering, limit, offset).await?;
    Ok(Json(expand_all(&state.pool, reports).await?))
}

/// GET /api/v1/reports/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReportResponse>> {
    let report = ReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Report", id))?;
    Ok(Json(expand_one(&state.pool, report).await?))
}

/// PUT|PATCH /api/v1/reports/{id}
///
/// Only `reason` is writable.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateReportRequest>,
) -> AppResult<Json<ReportResponse>> {
    let report = match input.reason {
        Some(raw) => {
            let reason = validate_report_reason(Some(&raw))?;
            ReportRepo::update_reason(&state.pool, id, &reason).await?
        }
        None => ReportRepo::find_by_id(&state.pool, id).await?,
    }
    .ok_or_else(|| AppError::not_found("Report", id))?;

    Ok(Json(expand_one(&state.pool, report).await?))
}

/// DELETE /api/v1/reports/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ReportRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Report", id))
    }
}

/// POST|PUT /api/v1/reports/{id}/resolve
///
/// Mark the report resolved. With `{"deactivate_track": true}` the reported
/// track is deactivated in the same transaction. The body may be empty.
pub async fn resolve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<Json<ReportResponse>> {
    let input: ResolveRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ResolveRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?
    };

    let report = ReportRepo::resolve(&state.pool, id, input.deactivate_track)
        .await?
        .ok_or_else(|| AppError::not_found("Report", id))?;

    tracing::info!(
        report_id = id,
        track_id = report.track_id,
        user_id = admin.user_id,
        deactivate_track = input.deactivate_track,
        "Report resolved"
    );

    Ok(Json(expand_one(&state.pool, report).await?))
}

/// GET /api/v1/reports/statistics
pub async fn statistics(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ReportStatistics>> {
    Ok(Json(ReportRepo::statistics(&state.pool).await?))
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// File a report by `user_id` against an already-verified active track.
///
/// Rejects a blank reason and a second report by the same user on the same
/// track. A concurrent duplicate that slips past the check surfaces as a
/// `uq_reports_track_user` violation (409).
pub(crate) async fn file_report(
    state: &AppState,
    track_id: DbId,
    user_id: DbId,
    reason: Option<&str>,
) -> AppResult<ReportResponse> {
    let reason = validate_report_reason(reason)?;

    if ReportRepo::exists_for(&state.pool, track_id, user_id).await? {
        return Err(CoreError::Validation(MSG_DUPLICATE_REPORT.into()).into());
    }

    let report = ReportRepo::create(
        &state.pool,
        &CreateReport {
            track_id,
            user_id,
            reason,
        },
    )
    .await
    .map_err(conflict_on_unique(MSG_DUPLICATE_REPORT))?;

    tracing::info!(report_id = report.id, track_id, user_id, "Track reported");

    expand_one(&state.pool, report).await
}
