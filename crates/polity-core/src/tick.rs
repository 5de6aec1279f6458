//! The Tick Orchestrator: drives the full phase sequence described in
//! `spec.md` §2, splitting at the one point the deterministic core
//! suspends for external work (the Advisor Pipeline).
//!
//! `begin_tick` runs everything up through Law Lifecycle and marshals the
//! advisor stage inputs. The caller (an async layer one level up, e.g.
//! `polity_engine`) then drives the six advisors via `polity_advisors` and
//! hands the validated-or-fallback outputs to `finish_tick`, which applies
//! them, runs the Watchdog and Event Processor, and finalizes the tick:
//! audit log, content hash, seed/tick advance, phase rotation, deadline.
//!
//! Nothing here performs I/O or reads wall-clock time for gameplay values;
//! `tick_deadline` is the one field stamped with `Utc::now()`, which is a
//! scheduling concern, not a simulation input.

use chrono::Utc;
use polity_types::{GamePhase, LawId, OutcomeCounts, PlayerId, TickLogEntry, WorldState};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::advisor::{
    self, AnalystInput, CrisisInput, CrisisOutput, HistorianInput, HistorianOutput, JudiciaryInput, JudiciaryOutput,
    MediaInput, MediaOutput, ReactionInput, ReactionOutput,
};
use crate::error::TickError;
use crate::history::ScalarHistory;
use crate::noise::DeterministicRng;
use crate::threshold::WatchdogState;

/// Everything the advisor layer needs to run the six stages for one tick.
#[derive(Debug, Clone)]
pub struct AdvisorInputs {
    /// Input for the Analyst stage.
    pub analyst: AnalystInput,
    /// One input per law that entered `active` this tick and still needs
    /// an interpretation bound.
    pub judiciary: Vec<JudiciaryInput>,
    /// Input for the Media stage.
    pub media: MediaInput,
    /// Input for the Reaction stage.
    pub reaction: ReactionInput,
    /// Input for the Crisis stage.
    pub crisis: CrisisInput,
    /// Input for the Historian stage.
    pub historian: HistorianInput,
}

/// The six advisor stages' outputs (or fallbacks), ready to apply.
#[derive(Debug, Clone)]
pub struct AdvisorOutputs {
    /// Analyst output, recorded in the audit log but otherwise inert.
    pub analyst: serde_json::Value,
    /// One output per law in [`AdvisorInputs::judiciary`], same order.
    pub judiciary: Vec<JudiciaryOutput>,
    /// Media output.
    pub media: MediaOutput,
    /// Reaction output.
    pub reaction: ReactionOutput,
    /// Whether the Reaction output is the failure fallback (changes the
    /// protest-pressure update rule).
    pub reaction_is_fallback: bool,
    /// Crisis output; `None` is a legitimate "nothing this tick" result.
    pub crisis: Option<CrisisOutput>,
    /// Historian output.
    pub historian: HistorianOutput,
}

/// Per-tick audit counts and the prepared advisor inputs, returned by
/// [`begin_tick`].
#[derive(Debug, Clone)]
pub struct TickPhase1 {
    /// Outcome counts from the Action Resolver.
    pub actions: OutcomeCounts,
    /// Outcome counts from the Law Lifecycle.
    pub laws: OutcomeCounts,
    /// Inputs for the Advisor Pipeline.
    pub inputs: AdvisorInputs,
}

/// Summary of a fully-finalized tick, for logging/response shaping.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was just finalized.
    pub tick: u64,
    /// Action outcome counts.
    pub actions: OutcomeCounts,
    /// Law outcome counts.
    pub laws: OutcomeCounts,
    /// Event outcome counts.
    pub events: OutcomeCounts,
    /// Number of watchdog triggers fired.
    pub watchdog_fired: u32,
    /// Hex-encoded SHA-256 content hash of the post-finalize state.
    pub content_hash: String,
}

/// Run the Action Resolver, Economy Recalculator, and Law Lifecycle, then
/// marshal the Advisor Pipeline's inputs. Sets `phase = ai_evaluation`.
///
/// # Errors
/// Propagates a [`TickError`] if the Recalculator's modifier batch is
/// rejected by the Kernel (see [`crate::recalculator::recalculate`]).
pub fn begin_tick(state: &mut WorldState) -> Result<TickPhase1, TickError> {
    state.meta.phase = GamePhase::Processing;

    let actions = crate::action_resolver::resolve_actions(state);
    crate::recalculator::recalculate(state)?;
    let laws = crate::law::advance_laws(state);

    state.meta.phase = GamePhase::AiEvaluation;
    let inputs = marshal_advisor_inputs(state);

    Ok(TickPhase1 { actions, laws, inputs })
}

fn marshal_advisor_inputs(state: &WorldState) -> AdvisorInputs {
    let analyst = AnalystInput {
        economy: serde_json::to_value(&state.economy).unwrap_or(serde_json::Value::Null),
        society: serde_json::to_value(&state.society).unwrap_or(serde_json::Value::Null),
        government: serde_json::to_value(&state.government).unwrap_or(serde_json::Value::Null),
    };

    let judiciary = state
        .laws
        .iter()
        .filter(|law| law.status == polity_types::LawStatus::Active && law.judiciary_interpretation.is_none())
        .map(|law| JudiciaryInput { law_id: law.id.clone(), original_text: law.original_text.clone() })
        .collect();

    let media = MediaInput {
        recent_events: state.events.iter().rev().take(5).map(|e| e.description.clone()).collect(),
        mood: serde_json::json!({
            "satisfaction": state.society.satisfaction,
            "stability": state.society.stability,
        }),
    };

    let reaction = ReactionInput {
        approval: serde_json::to_value(&state.government.approval).unwrap_or(serde_json::Value::Null),
        protest_pressure: state.society.protest_pressure,
        movements: state.society.movements.iter().map(|m| m.name.clone()).collect(),
    };

    let crisis = CrisisInput {
        history: Vec::new(), // populated by the caller from its retained `ScalarHistory`
        state_summary: serde_json::json!({
            "gdp": state.economy.gdp,
            "stability": state.society.stability,
        }),
    };

    let historian = HistorianInput {
        current_era: state.history.eras.last().map_or_else(String::new, |e| e.name.clone()),
        players: serde_json::json!(state.players.keys().map(PlayerId::to_string).collect::<Vec<_>>()),
    };

    AdvisorInputs { analyst, judiciary, media, reaction, crisis, historian }
}

/// Populate [`CrisisInput::history`] from the caller's retained
/// [`ScalarHistory`]. Split out from [`begin_tick`] because the history
/// ring buffer is the caller's state, not the `WorldState`'s.
pub fn attach_history(inputs: &mut AdvisorInputs, history: &ScalarHistory) {
    inputs.crisis.history = history.snapshots().copied().collect();
}

/// Apply the Advisor Pipeline's outputs, run the Threshold Watchdog and
/// Event Processor, and finalize the tick.
///
/// # Errors
/// Propagates a [`TickError`] if finalize-time bookkeeping somehow touches
/// an unknown Kernel leaf (unreachable with the fixed field set here).
pub fn finish_tick(
    state: &mut WorldState,
    phase1: TickPhase1,
    outputs: AdvisorOutputs,
    watchdog: &mut WatchdogState,
    history: &mut ScalarHistory,
) -> Result<TickSummary, TickError> {
    let TickPhase1 { actions, laws, .. } = phase1;

    for judiciary_output in outputs.judiciary {
        advisor::apply_judiciary_output(state, judiciary_output);
    }
    advisor::apply_media_output(state, outputs.media);
    advisor::apply_reaction_output(state, outputs.reaction, outputs.reaction_is_fallback);

    let mut rng = DeterministicRng::new(state.meta.seed, state.meta.tick);
    if let Some(crisis) = outputs.crisis {
        advisor::queue_crisis_event(state, crisis, &mut rng);
    }
    advisor::apply_historian_output(state, outputs.historian);

    let watchdog_fired = crate::threshold::scan(state, watchdog, &mut rng);
    let events = crate::events::process_events(state);

    history.push(state.meta.tick, state.economy.gdp, state.society.stability);

    let tick = state.meta.tick;
    let content_hash = compute_content_hash(state);
    state.push_tick_log(TickLogEntry {
        tick,
        actions: actions.clone(),
        events: events.clone(),
        laws: laws.clone(),
        content_hash: content_hash.clone(),
        advisor_outputs: outputs.analyst,
    });

    finalize(state);

    info!(tick, %content_hash, "tick finalized");
    Ok(TickSummary { tick, actions, laws, events, watchdog_fired, content_hash })
}

fn finalize(state: &mut WorldState) {
    state.meta.tick = state.meta.tick.saturating_add(1);
    state.meta.seed = state.meta.seed.wrapping_add(1);
    state.meta.phase = GamePhase::AcceptingActions;
    state.meta.tick_deadline = Utc::now() + chrono::Duration::hours(i64::from(state.meta.tick_interval_hours));
}

fn compute_content_hash(state: &WorldState) -> String {
    let canonical = serde_json::to_vec(state).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let digest: [u8; 32] = hasher.finalize().into();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Bind a no-op fallback interpretation for every law still awaiting
/// Judiciary input, used when the caller's advisor layer fails entirely
/// (not just one stage) and must still produce a consistent
/// [`AdvisorOutputs`] to pass to [`finish_tick`].
pub fn fallback_judiciary_outputs(law_ids: &[LawId]) -> Vec<JudiciaryOutput> {
    law_ids.iter().cloned().map(JudiciaryOutput::fallback).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::advisor::{AnalystOutput, HistorianOutput, MediaOutput, ReactionOutput};

    fn fallback_outputs(phase1: &TickPhase1) -> AdvisorOutputs {
        AdvisorOutputs {
            analyst: serde_json::to_value(AnalystOutput::fallback(&phase1.inputs.analyst)).unwrap(),
            judiciary: fallback_judiciary_outputs(
                &phase1.inputs.judiciary.iter().map(|j| j.law_id.clone()).collect::<Vec<_>>(),
            ),
            media: MediaOutput::fallback(0),
            reaction: ReactionOutput::fallback(),
            reaction_is_fallback: true,
            crisis: None,
            historian: HistorianOutput::default(),
        }
    }

    #[test]
    fn full_tick_with_all_fallbacks_advances_tick_and_seed() {
        let mut state = WorldState::new("srv", 6, 1);
        let mut watchdog = WatchdogState::default();
        let mut history = ScalarHistory::new();

        let phase1 = begin_tick(&mut state).expect("phase 1 runs");
        let outputs = fallback_outputs(&phase1);
        let summary = finish_tick(&mut state, phase1, outputs, &mut watchdog, &mut history).expect("finishes");

        assert_eq!(summary.tick, 0);
        assert_eq!(state.meta.tick, 1);
        assert_eq!(state.meta.seed, 2);
        assert_eq!(state.meta.phase, GamePhase::AcceptingActions);
        assert_eq!(state.tick_log.len(), 1);
        assert!(!summary.content_hash.is_empty());
    }

    #[test]
    fn tick_log_caps_at_fifty_entries() {
        let mut state = WorldState::new("srv", 6, 1);
        let mut watchdog = WatchdogState::default();
        let mut history = ScalarHistory::new();

        for _ in 0..60 {
            let phase1 = begin_tick(&mut state).expect("phase 1 runs");
            let outputs = fallback_outputs(&phase1);
            finish_tick(&mut state, phase1, outputs, &mut watchdog, &mut history).expect("finishes");
        }

        assert_eq!(state.tick_log.len(), polity_types::WorldState::MAX_TICK_LOG);
    }
}
