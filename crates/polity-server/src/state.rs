//! Per-game single-writer state and the cross-game registry.
//!
//! Each game is one [`GameInstance`] behind its own `tokio::sync::Mutex`,
//! mirroring the teacher's `AppState { snapshot: Arc<RwLock<SimulationSnapshot>>
//! }` shape but keyed per game rather than singleton: acquiring a game's
//! mutex serializes its HTTP handlers against its own tick processing,
//! while different games' mutexes are independent and fully parallelize,
//! per `spec.md` §5.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use polity_core::history::ScalarHistory;
use polity_core::threshold::WatchdogState;
use polity_core::tick::TickSummary;
use polity_core::TickError;
use polity_db::WorldStore;
use polity_types::WorldState;
use tokio::sync::{Mutex, RwLock};

/// One game's mutable runtime state: the persisted `WorldState` plus the
/// two pieces of per-game bookkeeping `spec.md` §5 calls out as in-memory
/// and reconstructable-or-best-effort (the threshold cooldown table and
/// the scalar history feeding the Crisis advisor).
pub struct GameInstance {
    /// The authoritative world state.
    pub state: WorldState,
    /// Threshold trigger cooldowns.
    pub watchdog: WatchdogState,
    /// Recent GDP/stability scalar history for the Crisis stage.
    pub history: ScalarHistory,
}

impl GameInstance {
    /// Wrap a freshly-created or freshly-loaded `WorldState`.
    pub fn new(state: WorldState) -> Self {
        Self { state, watchdog: WatchdogState::default(), history: ScalarHistory::new() }
    }

    /// Drive one full tick: Action Resolver through Advisor Pipeline
    /// through finalize. The advisor transport is the only suspension
    /// point besides storage I/O, per `spec.md` §5.
    ///
    /// # Errors
    /// Propagates a [`TickError`] if the deterministic phases reject a
    /// modifier batch (see `polity_core::tick::begin_tick`).
    pub async fn run_tick(
        &mut self,
        backend: &polity_advisors::LlmBackend,
        stage_timeout: Duration,
    ) -> Result<TickSummary, TickError> {
        let mut phase1 = polity_core::tick::begin_tick(&mut self.state)?;
        polity_core::tick::attach_history(&mut phase1.inputs, &self.history);
        let tick = self.state.meta.tick;

        let outputs = polity_advisors::run_pipeline(backend, phase1.inputs.clone(), stage_timeout, tick).await;

        polity_core::tick::finish_tick(&mut self.state, phase1, outputs, &mut self.watchdog, &mut self.history)
    }
}

/// The cross-game registry: one entry per live game, each independently
/// lockable.
#[derive(Clone, Default)]
pub struct GameRegistry {
    games: Arc<RwLock<BTreeMap<String, Arc<Mutex<GameInstance>>>>>,
}

impl GameRegistry {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new game, replacing any existing entry with the same id.
    pub async fn insert(&self, server_id: String, instance: GameInstance) {
        self.games.write().await.insert(server_id, Arc::new(Mutex::new(instance)));
    }

    /// Fetch a game's shared handle, if it exists.
    pub async fn get(&self, server_id: &str) -> Option<Arc<Mutex<GameInstance>>> {
        self.games.read().await.get(server_id).cloned()
    }

    /// All currently-registered server ids, for the engine's tick scheduler.
    pub async fn server_ids(&self) -> Vec<String> {
        self.games.read().await.keys().cloned().collect()
    }
}

/// Process-wide configuration the HTTP surface enforces, per `spec.md`
/// §6's "Environment inputs".
#[derive(Debug, Clone)]
pub struct ServerRuntimeConfig {
    /// Maximum bound players per game.
    pub max_players_per_server: usize,
    /// The `tick_interval_hours` new games are created with.
    pub tick_interval_hours: u32,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self { max_players_per_server: 6, tick_interval_hours: 1 }
    }
}

/// Shared Axum application state.
#[derive(Clone)]
pub struct AppState {
    /// The cross-game registry.
    pub registry: GameRegistry,
    /// The persistence layer.
    pub store: Arc<WorldStore>,
    /// Process-wide runtime configuration.
    pub config: ServerRuntimeConfig,
}

impl AppState {
    /// Construct application state from a store and configuration.
    pub fn new(store: Arc<WorldStore>, config: ServerRuntimeConfig) -> Self {
        Self { registry: GameRegistry::new(), store, config }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registry_insert_and_get_round_trip() {
        let registry = GameRegistry::new();
        let state = WorldState::new("srv-1", 6, 1);
        registry.insert("srv-1".to_owned(), GameInstance::new(state)).await;

        let handle = registry.get("srv-1").await.expect("game was inserted");
        let guard = handle.lock().await;
        assert_eq!(guard.state.meta.server_id, "srv-1");
    }

    #[tokio::test]
    async fn registry_get_missing_game_is_none() {
        let registry = GameRegistry::new();
        assert!(registry.get("ghost").await.is_none());
    }

    #[tokio::test]
    async fn server_ids_lists_all_registered_games() {
        let registry = GameRegistry::new();
        registry.insert("a".to_owned(), GameInstance::new(WorldState::new("a", 6, 1))).await;
        registry.insert("b".to_owned(), GameInstance::new(WorldState::new("b", 6, 1))).await;
        let mut ids = registry.server_ids().await;
        ids.sort();
        assert_eq!(ids, vec!["a".to_owned(), "b".to_owned()]);
    }
}
