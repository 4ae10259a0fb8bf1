//! Extractors that gate a handler on the caller's role.
//!
//! Both defer to the policies in `musicrev_core::permissions`: no token is
//! a 401, a token without the needed role is a 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use musicrev_core::error::CoreError;
use musicrev_core::permissions::{
    enforce, AdminOnly, AuthenticatedForWrite, Operation, PermissionPolicy,
};

use super::auth::{AuthUser, MaybeUser};
use crate::error::AppError;
use crate::state::AppState;

/// Any logged-in user.
pub struct RequireAuth(pub AuthUser);

/// A logged-in user with the `admin` role.
pub struct RequireAdmin(pub AuthUser);

/// Resolve the caller and check `policy` for the request's method.
async fn authorize<P: PermissionPolicy>(
    parts: &mut Parts,
    state: &AppState,
    policy: &P,
    op: Operation,
) -> Result<AuthUser, AppError> {
    let caller = MaybeUser::from_request_parts(parts, state).await?;
    enforce(policy, op, caller.principal().as_ref())?;
    caller.0.ok_or_else(|| {
        CoreError::Unauthorized("Authentication credentials were not provided".into()).into()
    })
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        authorize(parts, state, &AuthenticatedForWrite, Operation::Write)
            .await
            .map(RequireAuth)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let op = Operation::from_method(parts.method.as_str());
        authorize(parts, state, &AdminOnly, op)
            .await
            .map(RequireAdmin)
    }
}
