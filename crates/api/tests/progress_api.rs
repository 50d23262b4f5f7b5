//! Integration tests for learner progress.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{admin_post, body_json, create_character, get, post_json, put_json};

/// Bibi with two lessons of 3 and 1 steps.
async fn bibi_with_lessons(app: &axum::Router) {
    create_character(app, "bibi", "Bibi Jaswant").await;
    for (id, steps) in [("greetings", 3), ("family", 1)] {
        let steps: Vec<_> = (0..steps)
            .map(|i| json!({ "kind": "info", "text": { "english": format!("Step {i}") } }))
            .collect();
        let response = admin_post(
            app,
            "/admin/lessons",
            json!({ "id": id, "character_id": "bibi", "title": id, "steps": steps }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

// ---------------------------------------------------------------------------
// Test: start, read and move a learner's cursor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn progress_lifecycle() {
    let app = common::build_test_app();
    bibi_with_lessons(&app.router).await;

    let response = get(&app.router, "/progress/learner-1/bibi").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(&app.router, "/progress/learner-1/bibi", json!({})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let started = body_json(response).await;
    assert_eq!(started["current_lesson_index"], 0);
    assert_eq!(started["current_step_index"], 0);
    assert_eq!(started["completed"], false);
    assert_eq!(started["percent_complete"], 0);

    let response = post_json(&app.router, "/progress/learner-1/bibi", json!({})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json(
        &app.router,
        "/progress/learner-1/bibi",
        json!({ "current_lesson_index": 1, "current_step_index": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let moved = body_json(response).await;
    assert_eq!(moved["percent_complete"], 75);

    let fetched = body_json(get(&app.router, "/progress/learner-1/bibi").await).await;
    assert_eq!(fetched["current_lesson_index"], 1);

    let done = body_json(
        put_json(
            &app.router,
            "/progress/learner-1/bibi",
            json!({ "current_lesson_index": 2, "current_step_index": 0, "completed": true }),
        )
        .await,
    )
    .await;
    assert_eq!(done["completed"], true);
    assert_eq!(done["percent_complete"], 100);
}

#[tokio::test]
async fn cursor_outside_lesson_list_is_rejected() {
    let app = common::build_test_app();
    bibi_with_lessons(&app.router).await;
    post_json(&app.router, "/progress/learner-1/bibi", json!({})).await;

    for body in [
        json!({ "current_lesson_index": 0, "current_step_index": 4 }),
        json!({ "current_lesson_index": 3, "current_step_index": 0 }),
        json!({ "current_lesson_index": -1, "current_step_index": 0 }),
    ] {
        let response = put_json(&app.router, "/progress/learner-1/bibi", body.clone()).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    }

    let unchanged = body_json(get(&app.router, "/progress/learner-1/bibi").await).await;
    assert_eq!(unchanged["current_lesson_index"], 0);
}

#[tokio::test]
async fn unknown_character_and_missing_record() {
    let app = common::build_test_app();
    bibi_with_lessons(&app.router).await;

    let response = post_json(&app.router, "/progress/learner-1/ghost", json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json(
        &app.router,
        "/progress/learner-2/bibi",
        json!({ "current_lesson_index": 0, "current_step_index": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn progress_is_per_learner() {
    let app = common::build_test_app();
    bibi_with_lessons(&app.router).await;
    post_json(&app.router, "/progress/learner-1/bibi", json!({})).await;
    post_json(&app.router, "/progress/learner-2/bibi", json!({})).await;

    put_json(
        &app.router,
        "/progress/learner-1/bibi",
        json!({ "current_lesson_index": 0, "current_step_index": 2 }),
    )
    .await;

    let other = body_json(get(&app.router, "/progress/learner-2/bibi").await).await;
    assert_eq!(other["current_step_index"], 0);
}
