//! Route definitions for the `/reports` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// POST   /                        -> create (auth)
/// GET    /                        -> list (admin)
/// GET    /statistics              -> statistics (admin)
/// GET    /{id}                    -> get_by_id (admin)
/// PUT    /{id}                    -> update (admin; PATCH too)
/// DELETE /{id}                    -> delete (admin)
/// POST   /{id}/resolve            -> resolve (admin; PUT too)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list).post(reports::create))
        .route("/statistics", get(reports::statistics))
        .route(
            "/{id}",
            get(reports::get_by_id)
                .put(reports::update)
                .patch(reports::update)
                .delete(reports::delete),
        )
        .route("/{id}/resolve", post(reports::resolve).put(reports::resolve))
}
