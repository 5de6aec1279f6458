//! HTTP handlers for the six routes in `spec.md` §6.
//!
//! Each handler does the minimum possible locking: resolve the target
//! game from the registry, take its mutex for the duration of the
//! request, mutate/read, persist if it mutated, and release. Ticks never
//! run inside a handler -- they are driven by `polity_engine`'s scheduler,
//! which takes the same per-game mutex.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use polity_types::{ActionType, GamePhase, Player, PlayerId, Role};
use serde::{Deserialize, Serialize};
use tokio::sync::MutexGuard;

use crate::auth::{generate_server_id, generate_token, tokens_match};
use crate::error::ServerError;
use crate::state::{AppState, GameInstance};

async fn fetch_instance(state: &AppState, server_id: &str) -> Result<Arc<tokio::sync::Mutex<GameInstance>>, ServerError> {
    state.registry.get(server_id).await.ok_or_else(|| ServerError::GameNotFound(server_id.to_owned()))
}

async fn authorize<'a>(
    state: &AppState,
    server_id: &str,
    instance: &'a tokio::sync::Mutex<GameInstance>,
    player_id: &PlayerId,
    token: &str,
) -> Result<MutexGuard<'a, GameInstance>, ServerError> {
    let bound = state
        .store
        .player_token(server_id, player_id)
        .await?
        .ok_or(ServerError::Unauthorized)?;
    if !tokens_match(&bound, token) {
        return Err(ServerError::Unauthorized);
    }
    Ok(instance.lock().await)
}

// ---------------------------------------------------------------------------
// GET / or /health
// ---------------------------------------------------------------------------

/// Minimal health payload: `{game, status, timestamp}`.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "game": "political-simulation",
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}

// ---------------------------------------------------------------------------
// POST /server/create
// ---------------------------------------------------------------------------

/// Request body for `/server/create` and `/server/:id/join`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinBody {
    /// The joining player's display name.
    pub player_name: String,
    /// The joining player's fixed role.
    pub player_role: Role,
}

/// Response for `/server/create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    server_id: String,
    player_id: PlayerId,
    player_token: String,
    tick: u64,
    tick_deadline: chrono::DateTime<Utc>,
}

/// `POST /server/create`: start a new game with its first player bound.
pub async fn create_server(
    State(state): State<AppState>,
    Json(body): Json<JoinBody>,
) -> Result<Json<CreateResponse>, ServerError> {
    let server_id = generate_server_id();
    let seed: u32 = rand::random();
    let mut world = polity_types::WorldState::new(server_id.clone(), state.config.tick_interval_hours, seed);

    let player_id = PlayerId::new(format!("p-{}", generate_token()));
    let player = Player::new(player_id.clone(), body.player_name, body.player_role, world.meta.tick);
    world.players.insert(player_id.clone(), player);

    let token = generate_token();
    state.store.create_game(&server_id, &world).await?;
    state.store.join_game(&server_id, &world, &player_id, &token).await?;

    let tick = world.meta.tick;
    let tick_deadline = world.meta.tick_deadline;
    state.registry.insert(server_id.clone(), GameInstance::new(world)).await;

    Ok(Json(CreateResponse { server_id, player_id, player_token: token, tick, tick_deadline }))
}

// ---------------------------------------------------------------------------
// POST /server/:id/join
// ---------------------------------------------------------------------------

/// Response for `/server/:id/join`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    player_id: PlayerId,
    player_token: String,
    tick: u64,
    tick_deadline: chrono::DateTime<Utc>,
}

/// `POST /server/:id/join`: bind a new player to an existing game.
///
/// 409 if the game is not `accepting_actions`; 403 if the game is full.
pub async fn join_server(
    State(state): State<AppState>,
    Path(server_id): Path<String>,
    Json(body): Json<JoinBody>,
) -> Result<Json<JoinResponse>, ServerError> {
    let instance = fetch_instance(&state, &server_id).await?;
    let mut guard = instance.lock().await;

    if guard.state.meta.phase != GamePhase::AcceptingActions {
        return Err(ServerError::WrongPhase);
    }

    let bound_count = state.store.player_count(&server_id).await?;
    let bound_count = usize::try_from(bound_count).unwrap_or(usize::MAX);
    if bound_count >= state.config.max_players_per_server {
        return Err(ServerError::ServerFull);
    }

    let player_id = PlayerId::new(format!("p-{}", generate_token()));
    let player = Player::new(player_id.clone(), body.player_name, body.player_role, guard.state.meta.tick);
    guard.state.players.insert(player_id.clone(), player);

    let token = generate_token();
    state.store.join_game(&server_id, &guard.state, &player_id, &token).await?;

    let tick = guard.state.meta.tick;
    let tick_deadline = guard.state.meta.tick_deadline;
    Ok(Json(JoinResponse { player_id, player_token: token, tick, tick_deadline }))
}

// ---------------------------------------------------------------------------
// GET /server/:id/view
// ---------------------------------------------------------------------------

/// Query parameters for `/server/:id/view`.
#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    /// The viewing player's id.
    #[serde(rename = "playerId")]
    pub player_id: PlayerId,
    /// The viewing player's token.
    pub token: String,
}

/// Response for `/server/:id/view`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    view: polity_core::view::WorldView,
    tick: u64,
    phase: GamePhase,
    tick_deadline: chrono::DateTime<Utc>,
}

/// `GET /server/:id/view`: a role-specific, noise-biased projection of the
/// current world state.
pub async fn view_server(
    State(state): State<AppState>,
    Path(server_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ViewResponse>, ServerError> {
    let instance = fetch_instance(&state, &server_id).await?;
    let guard = authorize(&state, &server_id, &instance, &query.player_id, &query.token).await?;

    let view = polity_core::view::project(&guard.state, &query.player_id)
        .ok_or_else(|| ServerError::Internal("bound player missing from world state".to_owned()))?;

    Ok(Json(ViewResponse {
        view,
        tick: guard.state.meta.tick,
        phase: guard.state.meta.phase,
        tick_deadline: guard.state.meta.tick_deadline,
    }))
}

// ---------------------------------------------------------------------------
// POST /server/:id/action
// ---------------------------------------------------------------------------

/// The nested `action` object in an `/server/:id/action` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSubmission {
    /// The requested action type.
    pub action_type: ActionType,
    /// Structured parameters for that action type.
    #[serde(default)]
    pub params: polity_types::ActionParams,
}

/// Request body for `/server/:id/action`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionBody {
    player_id: PlayerId,
    player_token: String,
    action: ActionSubmission,
}

/// Response for `/server/:id/action`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    success: bool,
    pending_count: usize,
    tick: u64,
}

/// `POST /server/:id/action`: queue an action for the next tick.
///
/// User errors (never mutate state): wrong role for the action type,
/// wrong phase, over the 5-pending-actions limit.
pub async fn submit_action(
    State(state): State<AppState>,
    Path(server_id): Path<String>,
    Json(body): Json<ActionBody>,
) -> Result<Json<ActionResponse>, ServerError> {
    let instance = fetch_instance(&state, &server_id).await?;
    let mut guard = authorize(&state, &server_id, &instance, &body.player_id, &body.player_token).await?;

    if guard.state.meta.phase != GamePhase::AcceptingActions {
        return Err(ServerError::WrongPhase);
    }

    let tick = guard.state.meta.tick;
    let role = {
        let player = guard
            .state
            .players
            .get(&body.player_id)
            .ok_or(ServerError::Unauthorized)?;
        if !player.alive {
            return Err(ServerError::Unauthorized);
        }
        player.role
    };

    if !body.action.action_type.allowed_roles().contains(&role) {
        return Err(ServerError::WrongRole {
            role: format!("{role:?}"),
            action_type: format!("{:?}", body.action.action_type),
        });
    }

    let pending_count = {
        let Some(player) = guard.state.players.get_mut(&body.player_id) else {
            return Err(ServerError::Unauthorized);
        };
        if player.actions_pending.len() >= Player::MAX_PENDING {
            return Err(ServerError::TooManyPendingActions);
        }
        player.actions_pending.push(polity_types::QueuedAction {
            player_id: body.player_id,
            submitted_tick: tick,
            action_type: body.action.action_type,
            params: body.action.params,
        });
        player.actions_pending.len()
    };

    state.store.save_state(&server_id, &guard.state).await?;

    Ok(Json(ActionResponse { success: true, pending_count, tick }))
}

// ---------------------------------------------------------------------------
// GET /server/:id/status
// ---------------------------------------------------------------------------

/// Per-player summary entry in `/server/:id/status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    player_id: PlayerId,
    name: String,
    role: Role,
    alive: bool,
    pending_actions: usize,
}

/// Response for `/server/:id/status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    initialized: bool,
    tick: u64,
    phase: GamePhase,
    player_count: usize,
    active_law_count: usize,
    players: Vec<PlayerSummary>,
}

/// `GET /server/:id/status`: initialization flag, counts, and a per-player
/// summary. No authentication required -- this is server-wide, not
/// player-scoped, information.
pub async fn status(
    State(state): State<AppState>,
    Path(server_id): Path<String>,
) -> Result<Json<StatusResponse>, ServerError> {
    let instance = fetch_instance(&state, &server_id).await?;
    let guard = instance.lock().await;

    let players = guard
        .state
        .players
        .values()
        .map(|p| PlayerSummary {
            player_id: p.id.clone(),
            name: p.name.clone(),
            role: p.role,
            alive: p.alive,
            pending_actions: p.actions_pending.len(),
        })
        .collect::<Vec<_>>();

    let active_law_count =
        guard.state.laws.iter().filter(|l| l.status == polity_types::LawStatus::Active).count();

    Ok(Json(StatusResponse {
        initialized: true,
        tick: guard.state.meta.tick,
        phase: guard.state.meta.phase,
        player_count: players.len(),
        active_law_count,
        players,
    }))
}
