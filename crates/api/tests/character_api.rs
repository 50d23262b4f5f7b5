//! Integration tests for public character reads and admin character CRUD.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    admin_delete, admin_get, admin_post, admin_put, body_json, create_character, get, with_key,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Public reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_characters_is_sorted_by_name() {
    let app = common::build_test_app();
    create_character(&app.router, "shopkeeper", "Gurpreet").await;
    create_character(&app.router, "bibi", "Bibi Jaswant").await;

    let response = get(&app.router, "/characters").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bibi Jaswant", "Gurpreet"]);
}

#[tokio::test]
async fn get_character_returns_detail() {
    let app = common::build_test_app();
    create_character(&app.router, "bibi", "Bibi Jaswant").await;

    let response = get(&app.router, "/characters/bibi").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], "bibi");
    assert_eq!(json["default_expression"], "neutral");
}

#[tokio::test]
async fn unknown_character_returns_404() {
    let app = common::build_test_app();
    let response = get(&app.router, "/characters/never-created").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Admin guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_routes_reject_missing_key() {
    let app = common::build_test_app();
    let response = common::get(&app.router, "/admin/characters").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn admin_routes_reject_wrong_key() {
    let app = common::build_test_app();
    for uri in ["/admin", "/admin/characters", "/admin/lessons"] {
        let response = with_key(&app.router, Method::GET, uri, "not-the-key").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn rejected_write_never_reaches_the_store() {
    let app = common::build_test_app();
    let response = common::post_json(
        &app.router,
        "/admin/characters",
        json!({ "id": "sneaky", "name": "Sneaky" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(&app.router, "/characters/sneaky").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_panel_is_served_with_key() {
    let app = common::build_test_app();
    let response = admin_get(&app.router, "/admin").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_text(response).await;
    assert!(body.contains("<html"));
}

// ---------------------------------------------------------------------------
// Admin CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_update_delete_character() {
    let app = common::build_test_app();
    create_character(&app.router, "bibi", "Bibi").await;

    let response = admin_put(
        &app.router,
        "/admin/characters/bibi",
        json!({ "name": "Bibi Jaswant", "default_expression": "happy" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Bibi Jaswant");
    assert_eq!(json["default_expression"], "happy");
    assert_eq!(json["role"], "grandmother");

    let response = admin_delete(&app.router, "/admin/characters/bibi").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = admin_delete(&app.router, "/admin/characters/bibi").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_character_is_conflict() {
    let app = common::build_test_app();
    create_character(&app.router, "bibi", "Bibi").await;

    let response = admin_post(
        &app.router,
        "/admin/characters",
        json!({ "id": "bibi", "name": "Another" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_character_payload_is_422() {
    let app = common::build_test_app();

    let response = admin_post(
        &app.router,
        "/admin/characters",
        json!({ "id": "Not A Slug", "name": "Bad" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = admin_post(&app.router, "/admin/characters", json!({ "id": "x" })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn update_unknown_character_is_404() {
    let app = common::build_test_app();
    let response = admin_put(
        &app.router,
        "/admin/characters/ghost",
        json!({ "name": "Ghost" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
