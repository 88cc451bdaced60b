#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use obra_plan::{CrewRoster, TaskCatalog, TaskDefinition, http_api};
use serde_json::json;
use std::collections::HashMap;
use tower::util::ServiceExt;

fn new_router() -> axum::Router {
    let state = http_api::AppState::new(TaskCatalog::standard());
    http_api::router(state)
}

fn cyclic_catalog() -> TaskCatalog {
    let mut dependencies = HashMap::new();
    dependencies.insert("a".to_string(), vec!["b".to_string()]);
    dependencies.insert("b".to_string(), vec!["a".to_string()]);
    TaskCatalog::new(
        vec![
            TaskDefinition::new("a", 1.0),
            TaskDefinition::new("b", 1.0),
        ],
        dependencies,
        CrewRoster::default(),
    )
}

#[tokio::test]
async fn schedule_request_returns_the_calendar() {
    let app = new_router();
    let payload = json!({
        "area_m2": 4.0,
        "start_date": "2024-01-01",
        "tasks": ["demolicoes_rocos", "canalizacoes"],
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/schedule")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["scheduled_tasks"], json!(2));
    assert_eq!(body["entries"][0]["task"], json!("demolicoes_rocos"));
    assert_eq!(body["entries"][0]["start"], json!("2024-01-01"));
    assert_eq!(body["entries"][0]["end"], json!("2024-01-02"));
    assert_eq!(body["entries"][1]["task"], json!("canalizacoes"));
    assert_eq!(body["finishes_on"], json!("2024-01-03"));
    assert_eq!(body["defaulted_tasks"], json!([]));
}

#[tokio::test]
async fn empty_selection_is_a_bad_request() {
    let app = new_router();
    let payload = json!({
        "area_m2": 4.0,
        "start_date": "2024-01-01",
        "tasks": [],
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/schedule")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], json!("empty_selection"));
}

#[tokio::test]
async fn non_positive_area_is_rejected() {
    let app = new_router();
    let payload = json!({
        "area_m2": 0.0,
        "start_date": "2024-01-01",
        "tasks": ["pintura"],
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/schedule")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], json!("invalid_request"));
}

#[tokio::test]
async fn dependency_cycle_is_unprocessable() {
    let state = http_api::AppState::new(cyclic_catalog());
    let app = http_api::router(state);
    let payload = json!({
        "area_m2": 4.0,
        "start_date": "2024-01-01",
        "tasks": ["a", "b"],
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/schedule")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], json!("unresolved_dependencies"));
    assert_eq!(body["unscheduled"], json!(["a", "b"]));
    assert_eq!(body["cycle"], json!(["a", "b"]));
}

#[tokio::test]
async fn catalog_can_be_fetched_and_replaced() {
    let app = new_router();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/catalog")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let fetched: TaskCatalog = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(fetched.len(), 21);

    // A cyclic replacement is rejected by validation.
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/catalog")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&cyclic_catalog()).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
