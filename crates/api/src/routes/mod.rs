pub mod auth;
pub mod comments;
pub mod health;
pub mod likes;
pub mod reports;
pub mod tracks;
pub mod users;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/register                                   register (public)
///
/// /users                                           list, create (admin)
/// /users/register                                  register (public)
/// /users/profile                                   caller's profile
/// /users/update_profile                            update caller (PUT, PATCH)
/// /users/my_tracks                                 caller's tracks
/// /users/{id}                                      get, update, deactivate (admin)
///
/// /tracks                                          list (public), upload (auth)
/// /tracks/reported                                 reported tracks (admin)
/// /tracks/{id}                                     get, update, soft delete
/// /tracks/{id}/comments                            comments of a track
/// /tracks/{id}/like                                toggle like (POST)
/// /tracks/{id}/unlike                              remove like (DELETE)
/// /tracks/{id}/report                              report (POST)
/// /tracks/{id}/deactivate                          deactivate (PUT, admin)
/// /tracks/{id}/resolve_reports                     resolve all reports (PUT, admin)
///
/// /comments                                        list, create
/// /comments/{id}                                   get, update, delete
///
/// /likes                                           list (read only)
/// /likes/{id}                                      get
///
/// /reports                                         list (admin), create (auth)
/// /reports/statistics                              statistics (admin)
/// /reports/{id}                                    get, update, delete (admin)
/// /reports/{id}/resolve                            resolve (POST, PUT; admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/tracks", tracks::router())
        .nest("/comments", comments::router())
        .nest("/likes", likes::router())
        .nest("/reports", reports::router())
}

/// Fallback for paths no route matches.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "code": "NOT_FOUND" })),
    )
}
