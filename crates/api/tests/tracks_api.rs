//! HTTP-level integration tests for the `/tracks` resource.
//!
//! Tests cover multipart upload, listing filters, the viewer's like flag,
//! owner/admin edit rules, soft delete, likes, and reporting.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, delete_auth, get, get_auth, patch_json_auth, post_auth,
    post_json_auth, post_multipart, token_for, upload_track,
};
use http_body_util::BodyExt;
use musicrev_core::media::ContentDigest;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// A valid upload returns 201 with the owner embedded and zeroed counters.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_track(pool: PgPool) {
    let user = create_user(&pool, "uploader", "user").await;
    let app = common::build_test_app(pool);

    let response = post_multipart(
        app,
        "/api/v1/tracks",
        &[("title", "  Sunrise  "), ("description", "ambient")],
        Some(("audio_file", "Sunrise.MP3", b"ID3 sunrise bytes")),
        Some(&token_for(&user)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Sunrise");
    assert_eq!(json["description"], "ambient");
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "uploader");
    assert_eq!(json["likes_count"], 0);
    assert_eq!(json["comments_count"], 0);
    assert_eq!(json["is_liked"], false);
    assert_eq!(json["is_active"], true);

    let audio_file = json["audio_file"].as_str().unwrap();
    assert!(audio_file.starts_with("tracks/"));
    assert!(audio_file.ends_with(".mp3"));
}

/// Anonymous uploads are rejected before the body is read.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_multipart(
        app,
        "/api/v1/tracks",
        &[("title", "Nope")],
        Some(("audio_file", "nope.mp3", b"data")),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Stored audio is served back from the media root; unknown files are a
/// JSON 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_uploaded_audio_is_served(pool: PgPool) {
    let user = create_user(&pool, "uploader", "user").await;
    let app = common::build_test_app(pool);
    let token = token_for(&user);

    let track = upload_track(app.clone(), &token, "Served").await;
    let audio_file = track["audio_file"].as_str().unwrap();

    let response = get(app.clone(), &format!("/media/{audio_file}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ID3 fake audio for Served");

    let response = get(app, "/media/tracks/never-uploaded.mp3").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

/// A body that is not multipart is a JSON 400, not a plain-text rejection.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_requires_multipart(pool: PgPool) {
    let user = create_user(&pool, "uploader", "user").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/tracks",
        json!({ "title": "Not a form" }),
        &token_for(&user),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

/// When the track row cannot be written, a freshly stored file is removed.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_failed_insert_discards_new_audio(pool: PgPool) {
    let user = create_user(&pool, "uploader", "user").await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(&user);

    sqlx::query("ALTER TABLE tracks ADD CONSTRAINT no_orphans CHECK (title <> 'Orphan')")
        .execute(&pool)
        .await
        .unwrap();
    let audio: &[u8] = b"ID3 audio whose track never lands";
    let relative = ContentDigest::of(audio).track_path("mp3");
    let on_disk = common::test_config().media_root.join(&relative);

    let response = post_multipart(
        app,
        "/api/v1/tracks",
        &[("title", "Orphan")],
        Some(("audio_file", "orphan.mp3", audio)),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!on_disk.exists(), "{} should have been removed", on_disk.display());
}

/// Path and query values of the wrong type are JSON 400s.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_malformed_path_and_query_are_json_errors(pool: PgPool) {
    let app = common::build_test_app(pool);

    for uri in ["/api/v1/tracks/abc", "/api/v1/tracks?user=abc", "/api/v1/likes?track=x"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST", "{uri}");
        assert!(json["error"].is_string(), "{uri}");
    }
}

/// Missing title and unsupported format are reported together.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_validation(pool: PgPool) {
    let user = create_user(&pool, "uploader", "user").await;
    let app = common::build_test_app(pool);
    let token = token_for(&user);

    let response = post_multipart(
        app.clone(),
        "/api/v1/tracks",
        &[("title", "   ")],
        Some(("audio_file", "video.mp4", b"not audio")),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["title"].is_array());
    assert!(json["fields"]["audio_file"].is_array());

    let response = post_multipart(
        app,
        "/api/v1/tracks",
        &[("title", "No file")],
        None,
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["fields"]["audio_file"][0],
        "This field is required."
    );
}

// ---------------------------------------------------------------------------
// Listing and detail
// ---------------------------------------------------------------------------

/// Lists filter by owner and search text and honour title ordering.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_filters(pool: PgPool) {
    let alice = create_user(&pool, "alice", "user").await;
    let bob = create_user(&pool, "bob", "user").await;
    let app = common::build_test_app(pool);

    upload_track(app.clone(), &token_for(&alice), "Beta Song").await;
    upload_track(app.clone(), &token_for(&alice), "Alpha Song").await;
    upload_track(app.clone(), &token_for(&bob), "Gamma").await;

    let response = get(app.clone(), &format!("/api/v1/tracks?user={}", alice.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = get(app.clone(), "/api/v1/tracks?search=song&ordering=title").await;
    let json = body_json(response).await;
    let titles: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["Alpha Song", "Beta Song"]);

    // Unknown ordering falls back to newest first.
    let response = get(app, "/api/v1/tracks?ordering=password").await;
    let json = body_json(response).await;
    assert_eq!(json[0]["title"], "Gamma");
}

/// `is_liked` reflects the requesting user.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_is_liked_per_viewer(pool: PgPool) {
    let owner = create_user(&pool, "owner", "user").await;
    let fan = create_user(&pool, "fan", "user").await;
    let app = common::build_test_app(pool);

    let track = upload_track(app.clone(), &token_for(&owner), "Liked").await;
    let id = track["id"].as_i64().unwrap();
    post_auth(app.clone(), &format!("/api/v1/tracks/{id}/like"), &token_for(&fan)).await;

    let uri = format!("/api/v1/tracks/{id}");
    let as_fan = body_json(get_auth(app.clone(), &uri, &token_for(&fan)).await).await;
    assert_eq!(as_fan["is_liked"], true);
    assert_eq!(as_fan["likes_count"], 1);

    let as_owner = body_json(get_auth(app.clone(), &uri, &token_for(&owner)).await).await;
    assert_eq!(as_owner["is_liked"], false);

    let anonymous = body_json(get(app, &uri).await).await;
    assert_eq!(anonymous["is_liked"], false);
}

// ---------------------------------------------------------------------------
// Edit and delete
// ---------------------------------------------------------------------------

/// Only the owner or an admin may edit or delete a track.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_owner_or_admin_rules(pool: PgPool) {
    let owner = create_user(&pool, "owner", "user").await;
    let other = create_user(&pool, "other", "user").await;
    let admin = create_user(&pool, "mod", "admin").await;
    let app = common::build_test_app(pool);

    let track = upload_track(app.clone(), &token_for(&owner), "Mine").await;
    let uri = format!("/api/v1/tracks/{}", track["id"].as_i64().unwrap());

    let response = patch_json_auth(
        app.clone(),
        &uri,
        json!({ "title": "Hijacked" }),
        &token_for(&other),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &token_for(&other)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json_auth(
        app.clone(),
        &uri,
        json!({ "description": "notes" }),
        &token_for(&owner),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Mine");
    assert_eq!(json["description"], "notes");

    let response = patch_json_auth(
        app.clone(),
        &uri,
        json!({ "title": "Moderated" }),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Moderated");

    let response = patch_json_auth(app, &uri, json!({ "title": "  " }), &token_for(&owner)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Deleted tracks disappear from lists and detail lookups.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_soft_delete_hides_track(pool: PgPool) {
    let owner = create_user(&pool, "owner", "user").await;
    let app = common::build_test_app(pool);
    let token = token_for(&owner);

    let track = upload_track(app.clone(), &token, "Temporary").await;
    let uri = format!("/api/v1/tracks/{}", track["id"].as_i64().unwrap());

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app.clone(), "/api/v1/tracks").await;
    assert!(body_json(response).await.as_array().unwrap().is_empty());

    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

/// Like toggles: 201 on like, 200 on unlike.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_like_toggle(pool: PgPool) {
    let owner = create_user(&pool, "owner", "user").await;
    let fan = create_user(&pool, "fan", "user").await;
    let app = common::build_test_app(pool);
    let fan_token = token_for(&fan);

    let track = upload_track(app.clone(), &token_for(&owner), "Catchy").await;
    let id = track["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tracks/{id}/like");

    let response = post_auth(app.clone(), &uri, &fan_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["liked"], true);

    let response = post_auth(app.clone(), &uri, &fan_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["liked"], false);

    let response = get(app, &format!("/api/v1/tracks/{id}")).await;
    assert_eq!(body_json(response).await["likes_count"], 0);
}

/// Unlike without a like is a 400; with one it succeeds.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unlike(pool: PgPool) {
    let owner = create_user(&pool, "owner", "user").await;
    let fan = create_user(&pool, "fan", "user").await;
    let app = common::build_test_app(pool);
    let fan_token = token_for(&fan);

    let track = upload_track(app.clone(), &token_for(&owner), "Catchy").await;
    let id = track["id"].as_i64().unwrap();
    let unlike = format!("/api/v1/tracks/{id}/unlike");

    let response = delete_auth(app.clone(), &unlike, &fan_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "You have not liked this track");

    post_auth(app.clone(), &format!("/api/v1/tracks/{id}/like"), &fan_token).await;
    let response = delete_auth(app, &unlike, &fan_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["liked"], false);
}

/// Liking requires authentication and an active track.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_like_requires_auth_and_active_track(pool: PgPool) {
    let owner = create_user(&pool, "owner", "user").await;
    let app = common::build_test_app(pool);
    let token = token_for(&owner);

    let track = upload_track(app.clone(), &token, "Short lived").await;
    let id = track["id"].as_i64().unwrap();

    let like = format!("/api/v1/tracks/{id}/like");
    let response = common::post_json(app.clone(), &like, json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    delete_auth(app.clone(), &format!("/api/v1/tracks/{id}"), &token).await;
    let response = post_auth(app, &like, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// A user may report a track once, with a non-blank reason.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_report_track(pool: PgPool) {
    let owner = create_user(&pool, "owner", "user").await;
    let reporter = create_user(&pool, "reporter", "user").await;
    let app = common::build_test_app(pool);
    let token = token_for(&reporter);

    let track = upload_track(app.clone(), &token_for(&owner), "Offensive").await;
    let uri = format!("/api/v1/tracks/{}/report", track["id"].as_i64().unwrap());

    let response = post_json_auth(app.clone(), &uri, json!({ "reason": "   " }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["fields"]["reason"][0],
        "A reason is required to report a track"
    );

    let response = post_json_auth(app.clone(), &uri, json!({ "reason": "spam" }), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["reason"], "spam");
    assert_eq!(json["is_resolved"], false);
    assert_eq!(json["user"]["username"], "reporter");

    let response = post_json_auth(app, &uri, json!({ "reason": "again" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "You have already reported this track"
    );
}

/// The track's comment list is public and newest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_track_comments(pool: PgPool) {
    let owner = create_user(&pool, "owner", "user").await;
    let app = common::build_test_app(pool);
    let token = token_for(&owner);

    let track = upload_track(app.clone(), &token, "Discussed").await;
    let id = track["id"].as_i64().unwrap();
    for content in ["first", "second"] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/comments",
            json!({ "track": id, "content": content }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(app, &format!("/api/v1/tracks/{id}/comments")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["content"], "second");
}
