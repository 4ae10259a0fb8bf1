//! Route definitions for the read-only `/likes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::likes;
use crate::state::AppState;

/// Routes mounted at `/likes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(likes::list))
        .route("/{id}", get(likes::get_by_id))
}
