mod common;

use axum::http::StatusCode;
use common::{TestApp, ALICE_TOKEN, BOB_TOKEN};
use serde_json::json;

#[tokio::test]
async fn missing_profile_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/user/profile", Some(ALICE_TOKEN)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Profile not found");
}

#[tokio::test]
async fn created_profile_is_returned_unchanged() {
    let app = TestApp::new();
    let profile = json!({ "name": "A", "allergies": ["peanut"] });

    let (status, body) = app
        .post("/api/user/profile", Some(ALICE_TOKEN), profile.clone())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Profile created successfully");
    assert_eq!(body["profile"], profile);

    let (status, body) = app.get("/api/user/profile", Some(ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "A");
    assert_eq!(body["allergies"], json!(["peanut"]));
}

#[tokio::test]
async fn put_merges_into_existing_profile() {
    let app = TestApp::new();
    app.post(
        "/api/user/profile",
        Some(ALICE_TOKEN),
        json!({ "name": "A", "allergies": ["peanut"] }),
    )
    .await;

    let (status, body) = app
        .put(
            "/api/user/profile",
            Some(ALICE_TOKEN),
            json!({ "allergies": ["peanut", "egg"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["profile"], json!({ "allergies": ["peanut", "egg"] }));

    let (_, body) = app.get("/api/user/profile", Some(ALICE_TOKEN)).await;
    assert_eq!(body["name"], "A");
    assert_eq!(body["allergies"], json!(["peanut", "egg"]));
}

#[tokio::test]
async fn put_without_profile_does_not_create_one() {
    let app = TestApp::new();
    let (status, body) = app
        .put("/api/user/profile", Some(ALICE_TOKEN), json!({ "name": "A" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Profile not found");

    let (status, _) = app.get("/api/user/profile", Some(ALICE_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_overwrites_previous_profile() {
    let app = TestApp::new();
    app.post(
        "/api/user/profile",
        Some(ALICE_TOKEN),
        json!({ "name": "A", "allergies": ["peanut"], "notes": "old" }),
    )
    .await;
    app.post(
        "/api/user/profile",
        Some(ALICE_TOKEN),
        json!({ "name": "A2", "allergies": [] }),
    )
    .await;

    let (_, body) = app.get("/api/user/profile", Some(ALICE_TOKEN)).await;
    assert_eq!(body, json!({ "name": "A2", "allergies": [] }));
}

#[tokio::test]
async fn profiles_are_scoped_per_user() {
    let app = TestApp::new();
    app.post("/api/user/profile", Some(ALICE_TOKEN), json!({ "name": "A" }))
        .await;

    let (status, _) = app.get("/api/user/profile", Some(BOB_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
