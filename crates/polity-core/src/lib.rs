//! The deterministic tick engine: action resolution, recalculation, law
//! lifecycle, threshold watching, event processing, advisor-output
//! application, view projection, and tick orchestration.
//!
//! This crate performs no I/O and never reads wall-clock time or host
//! randomness for gameplay-affecting values (see [`noise`]). The Advisor
//! Pipeline's network transport lives one layer up, in `polity_advisors`;
//! this crate only defines the stage input/output shapes and the pure
//! state mutation each stage's (possibly-fallback) output implies.

pub mod action_resolver;
pub mod advisor;
pub mod error;
pub mod events;
pub mod history;
pub mod law;
pub mod noise;
pub mod recalculator;
pub mod threshold;
pub mod tick;
pub mod view;

pub use error::TickError;
pub use tick::{AdvisorInputs, TickSummary};
