//! The Advisor Pipeline's external-collaborator half: LLM transport,
//! response recovery/validation, and per-stage prompt construction.
//!
//! `polity_core::advisor` defines what a stage consumes and produces and
//! the pure mutation each output implies; this crate is the only place in
//! the workspace that makes a network call. [`pipeline::run_pipeline`] is
//! the single entry point `polity_engine` needs: it runs all six stages in
//! order and returns a `polity_core::tick::AdvisorOutputs` ready for
//! `polity_core::tick::finish_tick`.

pub mod error;
pub mod llm;
pub mod parse;
pub mod pipeline;
pub mod prompt;

pub use error::AdvisorError;
pub use llm::{create_backend, BackendType, LlmBackend, LlmConfig};
pub use pipeline::{run_pipeline, DEFAULT_STAGE_TIMEOUT};
