//! Bearer-token extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use musicrev_core::error::CoreError;
use musicrev_core::permissions::Principal;
use musicrev_core::types::DbId;
use musicrev_db::repositories::UserRepo;

use crate::auth::jwt::decode_access_token;
use crate::error::AppError;
use crate::state::AppState;

/// Caller identity decoded from a valid bearer token. Rejects with 401
/// when the header is missing.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// Current role from the `users` row, not the one in the token.
    pub role: String,
}

impl AuthUser {
    /// The requester as seen by the permission policies.
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user_id,
            role: self.role.clone(),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        MaybeUser::from_request_parts(parts, state)
            .await?
            .0
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })
    }
}

/// Optional authentication for public endpoints.
///
/// No `Authorization` header yields `MaybeUser(None)`. A header that is
/// present but malformed, expired or wrongly signed, or that belongs to a
/// deactivated account, is rejected with 401.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn principal(&self) -> Option<Principal> {
        self.0.as_ref().map(AuthUser::principal)
    }

    pub fn user_id(&self) -> Option<DbId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get("authorization") else {
            return Ok(MaybeUser(None));
        };

        let auth_header = header.to_str().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization header".into(),
            ))
        })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = decode_access_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // The account row is authoritative: deactivation and role changes
        // apply to tokens already handed out.
        match UserRepo::find_access(&state.pool, claims.sub).await? {
            Some((true, role)) => Ok(MaybeUser(Some(AuthUser {
                user_id: claims.sub,
                role,
            }))),
            _ => {
                tracing::debug!(user_id = claims.sub, "Token for inactive or missing user");
                Err(AppError::Core(CoreError::Unauthorized(
                    "User is inactive or deleted".into(),
                )))
            }
        }
    }
}
