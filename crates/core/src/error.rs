//! Domain failures. The HTTP layer decides how each one is rendered.

use crate::types::DbId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// A rule was broken that is not tied to a single request field.
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("invalid fields: {0}")]
    InvalidFields(FieldErrors),

    #[error("conflict: {0}")]
    Conflict(String),

    /// No usable credentials.
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed.
    #[error("permission denied: {0}")]
    Forbidden(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::InvalidFields(errors)
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        FieldErrors::from(&errors).into()
    }
}
