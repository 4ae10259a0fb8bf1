//! Route definitions for the `/tracks` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::tracks;
use crate::state::AppState;

/// Routes mounted at `/tracks`.
///
/// ```text
/// GET    /                        -> list (public)
/// POST   /                        -> create (auth, multipart)
/// GET    /reported                -> reported (admin)
/// GET    /{id}                    -> get_by_id (public)
/// PUT    /{id}                    -> update (owner/admin; PATCH too)
/// DELETE /{id}                    -> delete (owner/admin, soft)
/// GET    /{id}/comments           -> comments (public)
/// POST   /{id}/like               -> like (auth, toggle)
/// DELETE /{id}/unlike             -> unlike (auth)
/// POST   /{id}/report             -> report (auth)
/// PUT    /{id}/deactivate         -> deactivate (admin)
/// PUT    /{id}/resolve_reports    -> resolve_reports (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tracks::list).post(tracks::create))
        .route("/reported", get(tracks::reported))
        .route(
            "/{id}",
            get(tracks::get_by_id)
                .put(tracks::update)
                .patch(tracks::update)
                .delete(tracks::delete),
        )
        .route("/{id}/comments", get(tracks::comments))
        .route("/{id}/like", post(tracks::like))
        .route("/{id}/unlike", delete(tracks::unlike))
        .route("/{id}/report", post(tracks::report))
        .route("/{id}/deactivate", put(tracks::deactivate))
        .route("/{id}/resolve_reports", put(tracks::resolve_reports))
}
