//! Integration tests against the assembled router, via `tower::ServiceExt`
//! directly -- no TCP listener needed.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use polity_db::{InMemoryStore, WorldStore};
use polity_server::router::build_router;
use polity_server::state::{AppState, ServerRuntimeConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn make_state() -> AppState {
    let store = Arc::new(WorldStore::InMemory(InMemoryStore::new()));
    AppState::new(store, ServerRuntimeConfig { max_players_per_server: 2, tick_interval_hours: 1 })
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let router = build_router(make_state());

    let response = router.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn create_server_then_view_round_trips() {
    let state = make_state();
    let router = build_router(state);

    let create_body = json!({"playerName": "Ada", "playerRole": "politician"});
    let response =
        router.clone().oneshot(json_request("POST", "/server/create", create_body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_to_json(response.into_body()).await;

    let server_id = created["serverId"].as_str().unwrap_or_default().to_owned();
    let player_id = created["playerId"].as_str().unwrap_or_default().to_owned();
    let token = created["playerToken"].as_str().unwrap_or_default().to_owned();

    let view_uri = format!("/server/{server_id}/view?playerId={player_id}&token={token}");
    let response = router.oneshot(Request::get(&view_uri).body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let view = body_to_json(response.into_body()).await;
    assert_eq!(view["tick"], 0);
}

#[tokio::test]
async fn view_with_wrong_token_is_unauthorized() {
    let state = make_state();
    let router = build_router(state);

    let create_body = json!({"playerName": "Ada", "playerRole": "politician"});
    let response =
        router.clone().oneshot(json_request("POST", "/server/create", create_body)).await.unwrap();
    let created = body_to_json(response.into_body()).await;
    let server_id = created["serverId"].as_str().unwrap_or_default().to_owned();
    let player_id = created["playerId"].as_str().unwrap_or_default().to_owned();

    let view_uri = format!("/server/{server_id}/view?playerId={player_id}&token=wrong");
    let response = router.oneshot(Request::get(&view_uri).body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn action_with_wrong_role_is_forbidden() {
    let state = make_state();
    let router = build_router(state);

    let create_body = json!({"playerName": "Ada", "playerRole": "citizen"});
    let response =
        router.clone().oneshot(json_request("POST", "/server/create", create_body)).await.unwrap();
    let created = body_to_json(response.into_body()).await;
    let server_id = created["serverId"].as_str().unwrap_or_default().to_owned();
    let player_id = created["playerId"].as_str().unwrap_or_default().to_owned();
    let token = created["playerToken"].as_str().unwrap_or_default().to_owned();

    let action_body = json!({
        "playerId": player_id,
        "playerToken": token,
        "action": {"actionType": "propose_law", "params": {}},
    });
    let uri = format!("/server/{server_id}/action");
    let response = router.oneshot(json_request("POST", &uri, action_body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn join_fills_server_then_next_join_is_full() {
    let state = make_state();
    let router = build_router(state);

    let create_body = json!({"playerName": "Ada", "playerRole": "politician"});
    let response =
        router.clone().oneshot(json_request("POST", "/server/create", create_body)).await.unwrap();
    let created = body_to_json(response.into_body()).await;
    let server_id = created["serverId"].as_str().unwrap_or_default().to_owned();

    let join_uri = format!("/server/{server_id}/join");
    let join_body = json!({"playerName": "Bo", "playerRole": "citizen"});
    let response = router.clone().oneshot(json_request("POST", &join_uri, join_body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let join_body = json!({"playerName": "Cy", "playerRole": "business_owner"});
    let response = router.oneshot(json_request("POST", &join_uri, join_body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn status_reports_player_count_without_auth() {
    let state = make_state();
    let router = build_router(state);

    let create_body = json!({"playerName": "Ada", "playerRole": "politician"});
    let response =
        router.clone().oneshot(json_request("POST", "/server/create", create_body)).await.unwrap();
    let created = body_to_json(response.into_body()).await;
    let server_id = created["serverId"].as_str().unwrap_or_default().to_owned();

    let uri = format!("/server/{server_id}/status");
    let response = router.oneshot(Request::get(&uri).body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status = body_to_json(response.into_body()).await;
    assert_eq!(status["playerCount"], 1);
}

#[tokio::test]
async fn unknown_server_id_is_not_found() {
    let router = build_router(make_state());

    let response =
        router.oneshot(Request::get("/server/ghost/status").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn nonexistent_route_returns_404() {
    let router = build_router(make_state());

    let response = router.oneshot(Request::get("/not/a/route").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
