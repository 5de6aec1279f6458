//! Whole-state blob persistence for the political simulation engine.
//!
//! `spec.md` §6 treats storage as an external collaborator with a narrow
//! contract: the entire `WorldState` is one opaque value, plus a sidecar
//! mapping of `playerId -> playerToken`. This crate owns exactly that
//! contract and nothing else -- it never parses `WorldState`'s interior.
//!
//! [`WorldStore`] is an enum over a [`PostgresStore`] (production) and an
//! [`InMemoryStore`] (tests, single-process development), dispatched the
//! same way `polity_advisors::LlmBackend` dispatches over its two backends.

pub mod error;
pub mod in_memory;
pub mod postgres;
pub mod store;

pub use error::DbError;
pub use in_memory::InMemoryStore;
pub use postgres::{PostgresConfig, PostgresStore};
pub use store::WorldStore;
