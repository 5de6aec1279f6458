//! In-memory [`crate::store::WorldStore`] implementation, for tests and
//! single-process development without a `PostgreSQL` instance.

use std::collections::BTreeMap;
use std::sync::Mutex;

use polity_types::{PlayerId, WorldState};

use crate::error::DbError;

struct GameRow {
    state: WorldState,
    tokens: BTreeMap<PlayerId, String>,
}

/// A process-local store. Every operation takes the same internal mutex,
/// which is fine here: the server layer already serializes access per game,
/// so this is never a contention point beyond what that layer already
/// imposes.
#[derive(Default)]
pub struct InMemoryStore {
    games: Mutex<BTreeMap<String, GameRow>>,
}

impl InMemoryStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, GameRow>> {
        self.games.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Create a new game row, overwriting any existing one with the same id.
    pub fn create_game(&self, server_id: &str, state: &WorldState) -> Result<(), DbError> {
        self.lock()
            .insert(server_id.to_owned(), GameRow { state: state.clone(), tokens: BTreeMap::new() });
        Ok(())
    }

    /// Load a game's `WorldState`, if it exists.
    pub fn load_state(&self, server_id: &str) -> Result<Option<WorldState>, DbError> {
        Ok(self.lock().get(server_id).map(|row| row.state.clone()))
    }

    /// Overwrite a game's persisted `WorldState`.
    pub fn save_state(&self, server_id: &str, state: &WorldState) -> Result<(), DbError> {
        let mut games = self.lock();
        let row = games.get_mut(server_id).ok_or_else(|| DbError::GameNotFound(server_id.to_owned()))?;
        row.state = state.clone();
        Ok(())
    }

    /// Persist state and bind a new player's token together.
    pub fn join_game(&self, server_id: &str, state: &WorldState, player_id: &PlayerId, token: &str) -> Result<(), DbError> {
        let mut games = self.lock();
        let row = games.get_mut(server_id).ok_or_else(|| DbError::GameNotFound(server_id.to_owned()))?;
        row.state = state.clone();
        row.tokens.insert(player_id.clone(), token.to_owned());
        Ok(())
    }

    /// Fetch a bound player token, if the player has joined this game.
    pub fn player_token(&self, server_id: &str, player_id: &PlayerId) -> Result<Option<String>, DbError> {
        Ok(self.lock().get(server_id).and_then(|row| row.tokens.get(player_id).cloned()))
    }

    /// Number of players bound to this game.
    pub fn player_count(&self, server_id: &str) -> Result<i64, DbError> {
        let games = self.lock();
        let count = games.get(server_id).map_or(0, |row| row.tokens.len());
        i64::try_from(count).map_err(|_| DbError::Config("player count overflowed i64".to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn create_load_and_save_round_trip() {
        let store = InMemoryStore::new();
        let state = WorldState::new("srv-1", 6, 1);
        store.create_game("srv-1", &state).unwrap();

        let loaded = store.load_state("srv-1").unwrap().expect("game exists");
        assert_eq!(loaded.meta.server_id, "srv-1");

        let mut next = loaded;
        next.meta.tick = 5;
        store.save_state("srv-1", &next).unwrap();
        assert_eq!(store.load_state("srv-1").unwrap().expect("still there").meta.tick, 5);
    }

    #[test]
    fn join_game_binds_token_and_updates_state() {
        let store = InMemoryStore::new();
        let state = WorldState::new("srv-1", 6, 1);
        store.create_game("srv-1", &state).unwrap();

        let player_id = PlayerId::new("p-1");
        store.join_game("srv-1", &state, &player_id, "tok-abc").unwrap();

        assert_eq!(store.player_token("srv-1", &player_id).unwrap(), Some("tok-abc".to_owned()));
        assert_eq!(store.player_count("srv-1").unwrap(), 1);
    }

    #[test]
    fn save_state_on_unknown_game_errors() {
        let store = InMemoryStore::new();
        let state = WorldState::new("ghost", 6, 1);
        assert!(store.save_state("ghost", &state).is_err());
    }
}
