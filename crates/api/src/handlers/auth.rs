//! `POST /auth/login`.

use axum::extract::State;
use axum::Json;
use musicrev_core::error::CoreError;
use musicrev_db::models::user::RegisteredUser;
use musicrev_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::issue_access_token;
use crate::auth::password::verify_login;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

const MSG_BAD_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Seconds until `access_token` expires.
    pub expires_in: i64,
    pub user: RegisteredUser,
}

/// POST /api/v1/auth/login
///
/// Unknown usernames and wrong passwords both answer 401 with the same
/// message. A deactivated account with the right password gets 403.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username).await?;

    let matched = verify_login(
        &input.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    )?;
    let user = match user {
        Some(user) if matched => user,
        _ => {
            tracing::debug!(username = %input.username, "Login rejected");
            return Err(CoreError::Unauthorized(MSG_BAD_CREDENTIALS.into()).into());
        }
    };

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let issued = issue_access_token(user.id, &user.role, &state.config.jwt)?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token: issued.token,
        expires_in: issued.expires_in,
        user: RegisteredUser::from(&user),
    }))
}
