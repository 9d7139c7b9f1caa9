//! Integration tests for rotaplan-server API

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use rotaplan_server::{create_router, ServerConfig, ServerState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let config = ServerConfig::default();
    let state = Arc::new(ServerState::new());
    create_router(&config, state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn roster_json(size: usize) -> Value {
    let players: Vec<Value> = (0..size)
        .map(|i| json!({ "name": format!("P{}", i) }))
        .collect();
    json!({ "players": players })
}

fn post_generate(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["engine"], "rotaplan");
}

#[tokio::test]
async fn test_formations_endpoint() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/formations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let formations = json["formations"].as_array().unwrap();
    assert_eq!(formations.len(), 5);

    let seven = formations
        .iter()
        .find(|f| f["field_size"] == 7)
        .expect("7-a-side in catalog");
    assert_eq!(seven["positions"][0], "Keeper");
    assert_eq!(seven["roles"][0], "keeper");
}

#[tokio::test]
async fn test_generate_round_trip() {
    let app = test_app();

    let payload = json!({
        "roster": roster_json(10),
        "field_size": 7,
        "seed": 42,
    });
    let response = app.oneshot(post_generate(&payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["clean"], true);

    let quarters = json["lineup"]["quarters"].as_array().unwrap();
    assert_eq!(quarters.len(), 4);
    for quarter in quarters {
        assert_eq!(quarter["assignments"].as_array().unwrap().len(), 7);
    }
    assert_eq!(json["lineup"]["captains"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_generate_is_deterministic_per_seed() {
    let payload = json!({
        "roster": roster_json(10),
        "field_size": 7,
        "seed": 7,
    });

    let first = body_json(
        test_app().oneshot(post_generate(&payload)).await.unwrap(),
    )
    .await;
    let second = body_json(
        test_app().oneshot(post_generate(&payload)).await.unwrap(),
    )
    .await;

    assert_eq!(first["lineup"]["quarters"], second["lineup"]["quarters"]);
}

#[tokio::test]
async fn test_generate_rejects_short_roster() {
    let app = test_app();

    let payload = json!({
        "roster": roster_json(5),
        "field_size": 7,
    });
    let response = app.oneshot(post_generate(&payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not enough"));
}

#[tokio::test]
async fn test_generate_rejects_unknown_field_size() {
    let app = test_app();

    let payload = json!({
        "roster": roster_json(10),
        "field_size": 8,
    });
    let response = app.oneshot(post_generate(&payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_with_custom_positions() {
    let app = test_app();

    let payload = json!({
        "roster": roster_json(6),
        "positions": ["Keeper", "Left Back", "Right Back", "Left Forward", "Right Forward"],
        "seed": 3,
    });
    let response = app.oneshot(post_generate(&payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["lineup"]["quarters"][0]["assignments"]
            .as_array()
            .unwrap()
            .len(),
        5
    );
}

#[tokio::test]
async fn test_progress_endpoint_idle() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/generate/progress")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["running"], false);
    assert_eq!(json["attempts"], 0);
}
