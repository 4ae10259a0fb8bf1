//! Route definitions for the `/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /register                -> register (public)
/// GET    /profile                 -> profile (auth)
/// PUT    /update_profile          -> update_profile (auth; PATCH too)
/// GET    /my_tracks               -> my_tracks (auth)
/// GET    /                        -> list_users (admin)
/// POST   /                        -> create_user (admin)
/// GET    /{id}                    -> get_user (admin)
/// PUT    /{id}                    -> update_user (admin; PATCH too)
/// DELETE /{id}                    -> deactivate_user (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/register", post(users::register))
        .route("/profile", get(users::profile))
        .route(
            "/update_profile",
            put(users::update_profile).patch(users::update_profile),
        )
        .route("/my_tracks", get(users::my_tracks))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .patch(users::update_user)
                .delete(users::deactivate_user),
        )
}
