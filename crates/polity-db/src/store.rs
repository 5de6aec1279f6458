//! Enum-dispatch store abstraction, the same shape as `polity_advisors`'
//! `LlmBackend`: async methods on concrete variants avoid the
//! dyn-compatibility issues of an async trait, while callers (`polity_server`,
//! `polity_engine`) hold a single `WorldStore` without caring which backend
//! is live.

use polity_types::{PlayerId, WorldState};

use crate::error::DbError;
use crate::in_memory::InMemoryStore;
use crate::postgres::PostgresStore;

/// Backing store for game state: one opaque `WorldState` blob per game plus
/// a `playerId -> playerToken` sidecar.
pub enum WorldStore {
    /// `PostgreSQL`-backed, for production deployments.
    Postgres(PostgresStore),
    /// Process-local, for tests and single-process development.
    InMemory(InMemoryStore),
}

impl WorldStore {
    /// Create a new game.
    pub async fn create_game(&self, server_id: &str, state: &WorldState) -> Result<(), DbError> {
        match self {
            Self::Postgres(store) => store.create_game(server_id, state).await,
            Self::InMemory(store) => store.create_game(server_id, state),
        }
    }

    /// Load a game's current `WorldState`.
    pub async fn load_state(&self, server_id: &str) -> Result<Option<WorldState>, DbError> {
        match self {
            Self::Postgres(store) => store.load_state(server_id).await,
            Self::InMemory(store) => store.load_state(server_id),
        }
    }

    /// Overwrite a game's persisted `WorldState`, e.g. at tick finalize.
    pub async fn save_state(&self, server_id: &str, state: &WorldState) -> Result<(), DbError> {
        match self {
            Self::Postgres(store) => store.save_state(server_id, state).await,
            Self::InMemory(store) => store.save_state(server_id, state),
        }
    }

    /// Atomically persist state and bind a joining player's token.
    pub async fn join_game(
        &self,
        server_id: &str,
        state: &WorldState,
        player_id: &PlayerId,
        token: &str,
    ) -> Result<(), DbError> {
        match self {
            Self::Postgres(store) => store.join_game(server_id, state, player_id, token).await,
            Self::InMemory(store) => store.join_game(server_id, state, player_id, token),
        }
    }

    /// Fetch a bound player token, if the player has joined.
    pub async fn player_token(&self, server_id: &str, player_id: &PlayerId) -> Result<Option<String>, DbError> {
        match self {
            Self::Postgres(store) => store.player_token(server_id, player_id).await,
            Self::InMemory(store) => store.player_token(server_id, player_id),
        }
    }

    /// Count of players bound to a game, for the join-capacity check.
    pub async fn player_count(&self, server_id: &str) -> Result<i64, DbError> {
        match self {
            Self::Postgres(store) => store.player_count(server_id).await,
            Self::InMemory(store) => store.player_count(server_id),
        }
    }
}
