//! The Modifier Kernel: dot-path addressed, constraint-clamped mutation of
//! a `WorldState`, with all-or-nothing batch application.
//!
//! Every other crate that mutates simulation state goes through here
//! rather than touching `polity_types` fields directly, so the Hard
//! Constraints Table and finite-value guarantee are enforced uniformly.

mod apply;
mod constraints;
mod error;
mod path;

pub use apply::apply_batch;
pub use constraints::{bound_for, canonicalize};
pub use error::KernelError;
pub use path::resolve_mut;
