// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP-level tests: request validation, status codes, health reporting.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_degraded_subsystems() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["classifier_mode"], "fallback");
    assert_eq!(body["store"]["status"], "degraded");
}

#[tokio::test]
async fn test_sign_in_creates_user() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            serde_json::json!({ "name": "Jamie", "email": "jamie@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["user"]["email"], "jamie@example.com");
    assert_eq!(body["is_new_user"], true);
}

#[tokio::test]
async fn test_sign_in_rejects_invalid_email() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            serde_json::json!({ "name": "Jamie", "email": "not-an-email" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_log_activity_rejects_empty_text() {
    let (app, state) = common::create_test_app();
    common::seed_user(&state.store, "u-1", "a@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/activity-logs",
            serde_json::json!({ "user_id": "u-1", "text": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_log_activity_unknown_user_is_404() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/activity-logs",
            serde_json::json!({ "user_id": "ghost", "text": "went for a run" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_log_activity_returns_classification() {
    let (app, state) = common::create_test_app();
    common::seed_user(&state.store, "u-1", "a@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/activity-logs",
            serde_json::json!({ "user_id": "u-1", "text": "I did a 30 minute HIIT workout" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["intent"], "workout");
    assert_eq!(body["source"], "fallback");
    assert!(body["keywords"].as_array().unwrap().len() >= 3);
}

#[tokio::test]
async fn test_dashboard_unknown_user_is_404() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_returns_aggregates() {
    let (app, state) = common::create_test_app();
    common::seed_user(&state.store, "u-1", "a@example.com").await;

    state
        .wellness
        .log_activity("u-1", "morning gym session")
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard/u-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["total_activities"], 1);
    assert_eq!(body["activity_breakdown"]["workout"], 1);
    assert_eq!(body["user"]["id"], "u-1");
}

#[tokio::test]
async fn test_onboarding_rejects_out_of_range_age() {
    let (app, state) = common::create_test_app();
    common::seed_user(&state.store, "u-1", "a@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/onboarding",
            serde_json::json!({
                "user_id": "u-1",
                "age": 7,
                "primary_wellness_goal": "grow up healthy"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_patch() {
    let (app, state) = common::create_test_app();
    common::seed_user(&state.store, "u-1", "a@example.com").await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/api/users/u-1",
            serde_json::json!({ "name": "Renamed" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["name"], "Renamed");
}

#[tokio::test]
async fn test_list_activities_respects_limit() {
    let (app, state) = common::create_test_app();
    common::seed_user(&state.store, "u-1", "a@example.com").await;

    for text in ["run one", "run two", "run three"] {
        state.wellness.log_activity("u-1", text).await.unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/activity-logs/u-1?limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_security_headers_present() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
}
