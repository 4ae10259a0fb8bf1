//! Startup provisioning of the administrator account.

use musicrev_core::error::CoreError;
use musicrev_core::roles::ROLE_ADMIN;
use musicrev_core::validation::MIN_PASSWORD_LENGTH;
use musicrev_db::models::user::CreateUser;
use musicrev_db::repositories::UserRepo;
use musicrev_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Create the configured admin account unless a user with that name exists.
///
/// An existing account is left untouched (its role and password are not
/// reset). Returns `true` when a new account was created.
pub async fn ensure_admin(pool: &DbPool, admin: &AdminBootstrap) -> AppResult<bool> {
    if UserRepo::find_by_username(pool, &admin.username)
        .await?
        .is_some()
    {
        tracing::debug!(username = %admin.username, "Admin account already present");
        return Ok(false);
    }

    if admin.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "ADMIN_PASSWORD must be at least {MIN_PASSWORD_LENGTH} characters"
        ))));
    }

    let password_hash = hash_password(&admin.password)?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Admin account created");
    Ok(true)
}
