//! How `AppError` values render as HTTP responses. No server or database.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use musicrev_api::error::AppError;
use musicrev_core::error::CoreError;
use musicrev_core::validation::FieldErrors;
use serde_json::Value;

async fn render(err: impl Into<AppError>) -> (StatusCode, Value) {
    let response = err.into().into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn status_and_code_per_domain_error() {
    let cases: Vec<(CoreError, StatusCode, &str)> = vec![
        (
            CoreError::Validation("You have not liked this track".into()),
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
        ),
        (
            CoreError::Conflict("already there".into()),
            StatusCode::CONFLICT,
            "CONFLICT",
        ),
        (
            CoreError::Unauthorized("no token".into()),
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
        ),
        (
            CoreError::Forbidden("not your track".into()),
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
        ),
    ];

    for (err, status, code) in cases {
        let message = err.to_string();
        let (got_status, json) = render(err).await;
        assert_eq!(got_status, status, "{message}");
        assert_eq!(json["code"], code, "{message}");
        assert!(json.get("fields").is_none());
    }
}

#[tokio::test]
async fn message_is_passed_through() {
    let (_, json) = render(CoreError::Forbidden("not your track".into())).await;
    assert_eq!(json["error"], "not your track");

    let (status, json) = render(AppError::BadRequest("Invalid JSON body".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Invalid JSON body");
}

#[tokio::test]
async fn missing_entity_names_kind_and_id() {
    let (status, json) = render(AppError::not_found("Track", 42)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Track with id 42 not found");
}

#[tokio::test]
async fn field_errors_list_messages_per_field() {
    let mut errors = FieldErrors::single("title", "This field may not be blank.");
    errors.add("audio_file", "No file was submitted.");
    let (status, json) = render(errors).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Validation failed");
    assert_eq!(json["fields"]["title"][0], "This field may not be blank.");
    assert_eq!(json["fields"]["audio_file"][0], "No file was submitted.");
}

#[tokio::test]
async fn internal_detail_stays_in_the_logs() {
    for err in [
        AppError::from(argon2::password_hash::Error::Password),
        AppError::Core(CoreError::Internal("pool exhausted".into())),
        AppError::Database(sqlx::Error::PoolTimedOut),
    ] {
        let (status, json) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");
    }
}

#[tokio::test]
async fn missing_row_is_404() {
    let (status, json) = render(sqlx::Error::RowNotFound).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
