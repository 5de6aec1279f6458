//! Route table assembly.
//!
//! Mirrors the teacher's `build_router`: a permissive CORS layer (the API
//! is meant to be called from a browser client on another origin), the
//! route table, a tracing layer, and shared state.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{create_server, health, join_server, status, submit_action, view_server};
use crate::state::AppState;

/// Assemble the full Axum router over the given application state.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/server/create", post(create_server))
        .route("/server/{id}/join", post(join_server))
        .route("/server/{id}/view", get(view_server))
        .route("/server/{id}/action", post(submit_action))
        .route("/server/{id}/status", get(status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
