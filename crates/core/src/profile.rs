//! Self-service profile update rules.

use crate::error::CoreError;
use crate::validation::{FieldErrors, MIN_PASSWORD_LENGTH};

/// A validated request to change the caller's password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange<'a> {
    pub current: &'a str,
    pub new: &'a str,
}

/// Check that the current/new password fields are supplied together.
///
/// Returns `Ok(None)` when neither is present, `Ok(Some(..))` when both are
/// and the new password is long enough. Verifying `current` against the
/// stored hash is left to the caller.
pub fn validate_password_change<'a>(
    current: Option<&'a str>,
    new: Option<&'a str>,
) -> Result<Option<PasswordChange<'a>>, CoreError> {
    match (current, new) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(FieldErrors::single(
            FieldErrors::NON_FIELD,
            "The current password is required to change the password",
        )
        .into()),
        (Some(_), None) => Err(FieldErrors::single(
            FieldErrors::NON_FIELD,
            "A new password is required",
        )
        .into()),
        (Some(current), Some(new)) => {
            if new.chars().count() < MIN_PASSWORD_LENGTH {
                return Err(FieldErrors::single(
                    "new_password",
                    format!(
                        "Ensure this field has at least {MIN_PASSWORD_LENGTH} characters."
                    ),
                )
                .into());
            }
            Ok(Some(PasswordChange { current, new }))
        }
    }
}
