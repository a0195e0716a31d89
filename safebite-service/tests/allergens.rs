mod common;

use axum::http::StatusCode;
use common::{object, TestApp};
use safebite_service::services::store::{paths, DocumentStore};
use serde_json::json;

#[tokio::test]
async fn allergen_detail_returns_stored_record() {
    let app = TestApp::new();
    let peanut = json!({ "id": "peanut", "name": "Peanut", "commonNames": ["groundnut"] });
    app.seed_allergen(peanut.clone()).await;

    let (status, body) = app.get("/api/allergens/peanut", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, peanut);
}

#[tokio::test]
async fn unknown_allergen_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/allergens/unobtainium", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Allergen not found");
}

#[tokio::test]
async fn allergen_list_contains_every_record() {
    let app = TestApp::new();
    app.seed_allergen(json!({ "id": "egg", "name": "Egg" })).await;
    app.seed_allergen(json!({ "id": "milk", "name": "Milk" })).await;

    let (status, body) = app.get("/api/allergens", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Egg", "Milk"]);
}

#[tokio::test]
async fn educational_resources_are_listed_verbatim() {
    let app = TestApp::new();
    let resource = json!({ "title": "Reading labels", "url": "https://example.org/labels" });
    app.store
        .add(&paths::educational_resources(), object(resource.clone()))
        .await
        .unwrap();

    let (status, body) = app.get("/api/educational-resources", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([resource]));
}
