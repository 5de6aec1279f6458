//! Phase 3 of the tick cycle: advances every law through its lifecycle
//! state machine and applies the modifier batches of laws currently
//! `active`.
//!
//! Transition graph: `proposed -> voting -> {active, rejected}`,
//! `active -> repealed`. `invalidated` is reached only by an external
//! mechanism outside this module and is otherwise treated as terminal,
//! same as `rejected`/`repealed`.
//!
//! A `voting` law with zero `for`/`against` votes stays `voting` for
//! another tick rather than resolving -- abstentions alone never count
//! toward quorum.

use polity_types::{LawStatus, OutcomeCounts, WorldState};
use tracing::warn;

/// Advance law lifecycles and reapply active laws' modifier batches.
pub fn advance_laws(state: &mut WorldState) -> OutcomeCounts {
    let mut counts = OutcomeCounts::default();

    promote_proposed_to_voting(state, &mut counts);
    resolve_voting(state, &mut counts);
    reapply_active(state, &mut counts);

    state.government.active_law_count = state
        .laws
        .iter()
        .filter(|law| law.status == LawStatus::Active)
        .count()
        .try_into()
        .unwrap_or(u32::MAX);

    counts
}

fn promote_proposed_to_voting(state: &mut WorldState, counts: &mut OutcomeCounts) {
    let tick = state.meta.tick;
    for law in &mut state.laws {
        if law.status == LawStatus::Proposed && law.proposed_tick < tick {
            law.status = LawStatus::Voting;
            counts.applied = counts.applied.saturating_add(1);
        }
    }
}

fn resolve_voting(state: &mut WorldState, counts: &mut OutcomeCounts) {
    let tick = state.meta.tick;
    for law in &mut state.laws {
        if law.status != LawStatus::Voting {
            continue;
        }
        // A law stays open for exactly one full tick of voting before it
        // resolves: it was promoted to `voting` on a prior tick.
        if law.proposed_tick >= tick {
            continue;
        }

        let decisive_total = law.tallies.for_votes + law.tallies.against_votes;
        if decisive_total <= 0.0 {
            // No for/against votes cast yet: stays voting one more tick.
            continue;
        }

        if law.tallies.for_votes > law.tallies.against_votes {
            law.status = LawStatus::Active;
            law.activated_tick = Some(tick);
            counts.applied = counts.applied.saturating_add(1);
        } else {
            law.status = LawStatus::Rejected;
            counts.rejected = counts.rejected.saturating_add(1);
        }
    }
}

fn reapply_active(state: &mut WorldState, counts: &mut OutcomeCounts) {
    let active_ids: Vec<_> = state
        .laws
        .iter()
        .filter(|law| law.status == LawStatus::Active)
        .map(|law| law.id.clone())
        .collect();

    for law_id in active_ids {
        let Some(interp) = state.law(&law_id).and_then(|law| law.judiciary_interpretation.as_ref()) else {
            continue;
        };
        if interp.rejected_by_core {
            continue;
        }
        let modifiers = interp.implementation.modifiers.clone();
        if modifiers.is_empty() {
            continue;
        }

        match polity_kernel::apply_batch(state, &modifiers) {
            Ok(()) => counts.applied = counts.applied.saturating_add(1),
            Err(err) => {
                warn!(law = %law_id, error = %err, "law modifier batch rejected by kernel");
                if let Some(law) = state.law_mut(&law_id) {
                    if let Some(interp) = &mut law.judiciary_interpretation {
                        interp.rejected_by_core = true;
                    }
                }
                counts.rejected = counts.rejected.saturating_add(1);
            }
        }
    }
}

/// Repeal an active law, marking its status and repeal tick.
///
/// Used by the Threshold Watchdog when a law's effects trip a hard
/// constraint repeatedly, and available for a future repeal action.
pub fn repeal(state: &mut WorldState, law_id: &polity_types::LawId) -> bool {
    let tick = state.meta.tick;
    let Some(law) = state.law_mut(law_id) else {
        return false;
    };
    if law.status != LawStatus::Active {
        return false;
    }
    law.status = LawStatus::Repealed;
    law.repealed_tick = Some(tick);
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use polity_types::{Law, LawId, PlayerId, Tallies};

    fn sample_law(id: &str, status: LawStatus, proposed_tick: u64) -> Law {
        Law {
            id: LawId::new(id),
            proposer: PlayerId::new("p-1"),
            proposed_tick,
            original_text: "text".to_owned(),
            status,
            tallies: Tallies::default(),
            judiciary_interpretation: None,
            activated_tick: None,
            repealed_tick: None,
        }
    }

    #[test]
    fn proposed_promotes_to_voting() {
        let mut state = WorldState::new("srv", 6, 1);
        state.meta.tick = 1;
        state.laws.push(sample_law("l-1", LawStatus::Proposed, 0));
        advance_laws(&mut state);
        assert_eq!(state.laws[0].status, LawStatus::Voting);
    }

    #[test]
    fn proposed_this_tick_does_not_promote_same_tick() {
        let mut state = WorldState::new("srv", 6, 1);
        state.meta.tick = 3;
        state.laws.push(sample_law("l-1", LawStatus::Proposed, 3));
        advance_laws(&mut state);
        assert_eq!(state.laws[0].status, LawStatus::Proposed);
    }

    #[test]
    fn voting_law_with_majority_activates() {
        let mut state = WorldState::new("srv", 6, 1);
        state.meta.tick = 1;
        let mut law = sample_law("l-1", LawStatus::Voting, 0);
        law.tallies.for_votes = 5.0;
        law.tallies.against_votes = 2.0;
        state.laws.push(law);
        advance_laws(&mut state);
        assert_eq!(state.laws[0].status, LawStatus::Active);
        assert_eq!(state.laws[0].activated_tick, Some(1));
    }

    #[test]
    fn voting_law_with_zero_votes_stays_voting() {
        let mut state = WorldState::new("srv", 6, 1);
        state.meta.tick = 1;
        state.laws.push(sample_law("l-1", LawStatus::Voting, 0));
        advance_laws(&mut state);
        assert_eq!(state.laws[0].status, LawStatus::Voting);
    }

    #[test]
    fn voting_law_with_tied_votes_is_rejected() {
        let mut state = WorldState::new("srv", 6, 1);
        state.meta.tick = 1;
        let mut law = sample_law("l-1", LawStatus::Voting, 0);
        law.tallies.for_votes = 3.0;
        law.tallies.against_votes = 3.0;
        state.laws.push(law);
        advance_laws(&mut state);
        assert_eq!(state.laws[0].status, LawStatus::Rejected);
    }

    #[test]
    fn repeal_transitions_active_law() {
        let mut state = WorldState::new("srv", 6, 1);
        state.laws.push(sample_law("l-1", LawStatus::Active, 0));
        assert!(repeal(&mut state, &LawId::new("l-1")));
        assert_eq!(state.laws[0].status, LawStatus::Repealed);
    }

    #[test]
    fn active_law_with_rejected_interpretation_is_not_retried() {
        use polity_types::{ImplementationPlan, JudiciaryInterpretation, Modifier};

        let mut state = WorldState::new("srv", 6, 1);
        let mut law = sample_law("l-1", LawStatus::Active, 0);
        law.judiciary_interpretation = Some(JudiciaryInterpretation {
            interpretation: "text".to_owned(),
            ambiguities: Vec::new(),
            implementation: ImplementationPlan {
                affected_variables: vec!["economy.gdp".to_owned()],
                modifiers: vec![Modifier::set("economy.gdp", 1.0)],
            },
            rejected_by_core: true,
        });
        state.laws.push(law);

        let counts = advance_laws(&mut state);
        assert_eq!(counts.rejected, 0);
        assert_eq!(counts.applied, 0);
    }
}
