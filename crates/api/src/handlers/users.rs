//! Handlers for the `/users` resource.
//!
//! Registration is public; `profile`, `update_profile` and `my_tracks` act on
//! the caller; everything else is admin-only via [`RequireAdmin`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use musicrev_core::profile::validate_password_change;
use musicrev_core::roles::ROLE_USER;
use musicrev_core::types::DbId;
use musicrev_core::validation::{not_blank, optional_email, FieldErrors};
use musicrev_db::models::track::TrackResponse;
use musicrev_db::models::user::{CreateUser, RegisteredUser, UpdateUser, UserProfile};
use musicrev_db::repositories::{TrackRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{conflict_on_unique, AppError, AppResult};
use crate::expand::expand_all;
use crate::extract::{Path, Query, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::state::AppState;

const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";
const MSG_WRONG_PASSWORD: &str = "The current password is incorrect";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/register` and `POST /users`.
///
/// Any `role` key in the body is ignored; new accounts are always `user`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 150, message = "Ensure this field has no more than 150 characters."),
        custom(function = "not_blank")
    )]
    pub username: String,
    #[serde(default)]
    #[validate(custom(function = "optional_email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Ensure this field has at least 8 characters."))]
    pub password: String,
}

/// Request body for `PUT|PATCH /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 1, max = 150, message = "Ensure this field has no more than 150 characters."),
        custom(function = "not_blank")
    )]
    pub username: Option<String>,
    #[validate(custom(function = "optional_email"))]
    pub email: Option<String>,
}

/// Request body for `PUT|PATCH /users/update_profile`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = 150, message = "Ensure this field has no more than 150 characters."),
        custom(function = "not_blank")
    )]
    pub username: Option<String>,
    #[validate(custom(function = "optional_email"))]
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// POST /api/v1/users/register (alias: POST /api/v1/auth/register)
///
/// Self-service registration. Returns 201 with the new account.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisteredUser>)> {
    let user = create_account(&state, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// ---------------------------------------------------------------------------
// Caller's own account
// ---------------------------------------------------------------------------

/// GET /api/v1/users/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserProfile>> {
    let profile = UserRepo::find_profile(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;
    Ok(Json(profile))
}

/// PUT|PATCH /api/v1/users/update_profile
///
/// Partial update of the caller's username, email, and password. Changing
/// the password requires both `current_password` and `new_password`.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    let change = validate_password_change(
        input.current_password.as_deref(),
        input.new_password.as_deref(),
    )?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;

    let username = trimmed(input.username);
    let mut errors = FieldErrors::new();
    if let Some(username) = username.as_deref() {
        if UserRepo::username_taken(&state.pool, username, Some(user.id)).await? {
            errors.add("username", MSG_USERNAME_TAKEN);
        }
    }
    if let Some(change) = &change {
        if !verify_password(change.current, &user.password_hash)? {
            errors.add("current_password", MSG_WRONG_PASSWORD);
        }
    }
    errors.into_result()?;

    let password_hash = change.map(|c| hash_password(c.new)).transpose()?;
    let password_changed = password_hash.is_some();
    let update = UpdateUser {
        username,
        email: input.email,
        password_hash,
    };
    UserRepo::update(&state.pool, user.id, &update)
        .await
        .map_err(conflict_on_unique(MSG_USERNAME_TAKEN))?
        .ok_or_else(|| AppError::not_found("User", user.id))?;
    if password_changed {
        tracing::info!(user_id = user.id, "Password changed");
    }

    let profile = UserRepo::find_profile(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.id))?;
    Ok(Json(profile))
}

/// GET /api/v1/users/my_tracks
///
/// Every track the caller owns, including deactivated ones.
pub async fn my_tracks(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<TrackResponse>>> {
    let rows = TrackRepo::list_by_owner(&state.pool, auth.user_id, Some(auth.user_id)).await?;
    Ok(Json(expand_all(&state.pool, rows).await?))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<UserProfile>>> {
    let (limit, offset) = params.resolve();
    let users = UserRepo::list_profiles(&state.pool, limit, offset).await?;
    Ok(Json(users))
}

/// POST /api/v1/users
///
/// Admin account creation. Same rules as registration.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisteredUser>)> {
    let user = create_account(&state, input).await?;
    tracing::info!(user_id = user.id, admin_id = admin.user_id, "User created by admin");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserProfile>> {
    let profile = UserRepo::find_profile(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(profile))
}

/// PUT|PATCH /api/v1/users/{id}
///
/// Update username and/or email. The role cannot be changed here.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserProfile>> {
    let username = trimmed(input.username);
    if let Some(username) = username.as_deref() {
        if UserRepo::username_taken(&state.pool, username, Some(id)).await? {
            return Err(FieldErrors::single("username", MSG_USERNAME_TAKEN).into());
        }
    }

    let update = UpdateUser {
        username,
        email: input.email,
        ..UpdateUser::default()
    };
    UserRepo::update(&state.pool, id, &update)
        .await
        .map_err(conflict_on_unique(MSG_USERNAME_TAKEN))?
        .ok_or_else(|| AppError::not_found("User", id))?;

    let profile = UserRepo::find_profile(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(profile))
}

/// DELETE /api/v1/users/{id}
///
/// Deactivate the account (`is_active = false`). Returns 204 No Content.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    if UserRepo::deactivate(&state.pool, id).await? {
        tracing::info!(user_id = id, admin_id = admin.user_id, "User deactivated");
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Usernames are stored without surrounding whitespace.
fn trimmed(username: Option<String>) -> Option<String> {
    username.map(|u| u.trim().to_string())
}

/// Check username availability, hash the password, and insert a `user` account.
async fn create_account(state: &AppState, input: RegisterRequest) -> AppResult<RegisteredUser> {
    let username = input.username.trim().to_string();
    if UserRepo::username_taken(&state.pool, &username, None).await? {
        return Err(FieldErrors::single("username", MSG_USERNAME_TAKEN).into());
    }

    let hashed = hash_password(&input.password)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email: input.email,
            password_hash: hashed,
            role: ROLE_USER.to_string(),
        },
    )
    .await
    .map_err(conflict_on_unique(MSG_USERNAME_TAKEN))?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(RegisteredUser::from(&user))
}
