//! Route definitions for the `/comments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /                        -> list (public)
/// POST   /                        -> create (auth)
/// GET    /{id}                    -> get_by_id (public)
/// PUT    /{id}                    -> update (owner/admin; PATCH too)
/// DELETE /{id}                    -> delete (owner/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comments::list).post(comments::create))
        .route(
            "/{id}",
            get(comments::get_by_id)
                .put(comments::update)
                .patch(comments::update)
                .delete(comments::delete),
        )
}
