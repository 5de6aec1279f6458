//! Atomic application of modifier batches against a `WorldState`.

use polity_types::{Modifier, Operation, WorldState};
use tracing::warn;

use crate::constraints;
use crate::error::KernelError;
use crate::path::resolve_mut;

/// Compute the new value for one modifier given its current leaf value.
fn compute_new_value(current: f64, modifier: &Modifier) -> Result<f64, KernelError> {
    let raw = match modifier.operation {
        Operation::Set => modifier.value,
        Operation::Add => current + modifier.value,
        Operation::Multiply => current * modifier.value,
        Operation::Clamp => {
            let (lo, hi) = match (modifier.min, modifier.max) {
                (Some(lo), Some(hi)) => (lo, hi),
                _ => return Err(KernelError::MissingClampBounds(modifier.variable.clone())),
            };
            current.clamp(lo.min(hi), lo.max(hi))
        }
    };

    if !raw.is_finite() {
        return Err(KernelError::NonFinite {
            variable: modifier.variable.clone(),
            attempted: raw,
        });
    }

    let canonical = constraints::canonicalize(&modifier.variable);
    let bounded = match constraints::bound_for(&canonical) {
        Some((lo, hi)) => raw.clamp(lo, hi),
        None => raw,
    };

    Ok(bounded)
}

/// Apply every modifier in `batch` to `state`, all-or-nothing.
///
/// On success, every leaf named by `batch` has been mutated in sequence
/// (later modifiers in the same batch observe earlier ones' results). On
/// failure, `state` is left exactly as it was: no partial application.
///
/// # Errors
/// Returns the first [`KernelError`] encountered (unknown variable,
/// missing clamp bounds, or a non-finite result).
pub fn apply_batch(state: &mut WorldState, batch: &[Modifier]) -> Result<(), KernelError> {
    let mut snapshot = Vec::with_capacity(batch.len());

    for modifier in batch {
        let leaf = match resolve_mut(state, &modifier.variable) {
            Ok(leaf) => leaf,
            Err(err) => {
                restore(state, &snapshot);
                return Err(err);
            }
        };
        let before = *leaf;

        match compute_new_value(before, modifier) {
            Ok(after) => {
                snapshot.push((modifier.variable.clone(), before));
                *leaf = after;
            }
            Err(err) => {
                warn!(variable = %modifier.variable, error = %err, "modifier rejected, rolling back batch");
                restore(state, &snapshot);
                return Err(err);
            }
        }
    }

    Ok(())
}

fn restore(state: &mut WorldState, snapshot: &[(String, f64)]) {
    for (variable, original) in snapshot.iter().rev() {
        if let Ok(leaf) = resolve_mut(state, variable) {
            *leaf = *original;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn sample_state() -> WorldState {
        WorldState::new("srv-1", 6, 1)
    }

    #[test]
    fn applies_add_and_clamps_to_hard_constraint() {
        let mut state = sample_state();
        let batch = vec![Modifier::add("economy.unemployment", 1000.0)];
        apply_batch(&mut state, &batch).expect("applies");
        assert!((state.economy.unemployment - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rolls_back_whole_batch_on_unknown_variable() {
        let mut state = sample_state();
        let before_gdp = state.economy.gdp;
        let batch = vec![
            Modifier::add("economy.gdp", 500.0),
            Modifier::add("economy.nonexistent", 1.0),
        ];
        let err = apply_batch(&mut state, &batch).unwrap_err();
        assert!(matches!(err, KernelError::VariableNotFound(_)));
        assert!((state.economy.gdp - before_gdp).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_finite_result() {
        let mut state = sample_state();
        let batch = vec![Modifier::set("economy.gdp", f64::NAN)];
        let err = apply_batch(&mut state, &batch).unwrap_err();
        assert!(matches!(err, KernelError::NonFinite { .. }));
    }

    #[test]
    fn later_modifier_in_batch_observes_earlier_result() {
        let mut state = sample_state();
        let batch = vec![
            Modifier::set("economy.gdp", 100.0),
            Modifier::add("economy.gdp", 50.0),
        ];
        apply_batch(&mut state, &batch).expect("applies");
        assert!((state.economy.gdp - 150.0).abs() < f64::EPSILON);
    }
}
