//! The HTTP surface for a political simulation game server, per `spec.md`
//! §6.
//!
//! Each game lives behind its own mutex in a [`state::GameRegistry`]; the
//! handlers in this crate only read and queue actions against a game's
//! `WorldState`. Ticks are driven externally by `polity_engine`, which
//! takes the same per-game mutex to run [`state::GameInstance::run_tick`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ServerError;
pub use router::build_router;
pub use state::{AppState, GameInstance, GameRegistry, ServerRuntimeConfig};
