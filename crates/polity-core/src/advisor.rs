//! Stage input/output records and application semantics for the Advisor
//! Pipeline (`spec.md` §4.7).
//!
//! The six stages themselves -- marshaling a request to an external LLM,
//! transport, response parsing, and per-stage fallback -- are external
//! collaborators (`polity_advisors`). This module only defines the shapes
//! those stages consume/produce and the pure state-mutation semantics once
//! a (possibly-fallback) output is in hand. Keeping the mutation logic here
//! rather than in `polity_advisors` keeps the deterministic core free of an
//! async/network dependency, mirroring how `polity_kernel` stays free of
//! I/O: `polity_advisors` depends on this crate, never the reverse.

use std::collections::BTreeMap;

use polity_types::{
    EventSource, EventStatus, GameEvent, ImplementationPlan, JudiciaryInterpretation, LawId, Modifier,
    MovementType, PlayerId, ReputationRecord, WorldState,
};
use serde::{Deserialize, Serialize};

/// Input marshaled from state for the Analyst stage.
#[derive(Debug, Clone, Serialize)]
pub struct AnalystInput {
    /// A snapshot of economy scalars, keyed by dot-path leaf name.
    pub economy: serde_json::Value,
    /// A snapshot of society scalars.
    pub society: serde_json::Value,
    /// A snapshot of government approval.
    pub government: serde_json::Value,
}

/// Validated Analyst output (or its fallback).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalystOutput {
    /// Identified trends, free text.
    pub trends: Vec<String>,
    /// Identified risks, free text.
    pub risks: Vec<String>,
    /// Forward projections, shape left to the advisor.
    pub projections: serde_json::Value,
    /// Self-reported confidence, `[0, 1]`.
    pub confidence: f64,
}

impl AnalystOutput {
    /// The fallback per `spec.md` §4.7: empty trends/risks, projections
    /// passed through from the input, confidence zero.
    pub fn fallback(input: &AnalystInput) -> Self {
        Self {
            trends: Vec::new(),
            risks: Vec::new(),
            projections: input.economy.clone(),
            confidence: 0.0,
        }
    }
}

/// Input marshaled for one newly-`active` law's Judiciary stage call.
#[derive(Debug, Clone, Serialize)]
pub struct JudiciaryInput {
    /// The law awaiting interpretation.
    pub law_id: LawId,
    /// The law's free-text body.
    pub original_text: String,
}

/// Validated Judiciary output (or its fallback).
#[derive(Debug, Clone, Deserialize)]
pub struct JudiciaryOutput {
    /// Echoes the input law id.
    pub law_id: LawId,
    /// Plain-language interpretation.
    pub interpretation: String,
    /// Ambiguities flagged.
    pub ambiguities: Vec<String>,
    /// Concrete implementation.
    pub implementation: ImplementationPlan,
}

impl JudiciaryOutput {
    /// The fallback per `spec.md` §4.7: a no-op interpretation (no modifiers).
    pub fn fallback(law_id: LawId) -> Self {
        Self {
            law_id,
            interpretation: String::new(),
            ambiguities: Vec::new(),
            implementation: ImplementationPlan {
                affected_variables: Vec::new(),
                modifiers: Vec::new(),
            },
        }
    }
}

/// Bind a Judiciary output onto its law and immediately attempt its
/// modifier batch through the Kernel.
///
/// Returns `true` if the batch applied cleanly (or was empty).
pub fn apply_judiciary_output(state: &mut WorldState, output: JudiciaryOutput) -> bool {
    let JudiciaryOutput { law_id, interpretation, ambiguities, implementation } = output;
    let modifiers = implementation.modifiers.clone();

    let Some(law) = state.law_mut(&law_id) else {
        return false;
    };
    law.judiciary_interpretation = Some(JudiciaryInterpretation {
        interpretation,
        ambiguities,
        implementation,
        rejected_by_core: false,
    });

    if modifiers.is_empty() {
        return true;
    }

    match polity_kernel::apply_batch(state, &modifiers) {
        Ok(()) => true,
        Err(_) => {
            if let Some(law) = state.law_mut(&law_id) {
                if let Some(interp) = &mut law.judiciary_interpretation {
                    interp.rejected_by_core = true;
                }
            }
            false
        }
    }
}

/// Input marshaled for the Media stage.
#[derive(Debug, Clone, Serialize)]
pub struct MediaInput {
    /// Recent events, summarized.
    pub recent_events: Vec<String>,
    /// Current society/economy mood signals.
    pub mood: serde_json::Value,
}

/// Validated Media output (or its fallback).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaOutput {
    /// New headlines, replacing the prior set.
    pub headlines: Vec<polity_types::Headline>,
    /// New articles, replacing the prior set.
    pub articles: Vec<polity_types::Article>,
    /// New rumors, replacing the prior set.
    pub rumors: Vec<polity_types::Rumor>,
}

impl MediaOutput {
    /// The fallback per `spec.md` §4.7: two fixed placeholder headlines, no rumors.
    pub fn fallback(tick: u64) -> Self {
        Self {
            headlines: vec![
                polity_types::Headline {
                    id: format!("fallback-{tick}-1"),
                    tick,
                    text: "State media reports calm conditions.".to_owned(),
                    truth_score: 0.5,
                },
                polity_types::Headline {
                    id: format!("fallback-{tick}-2"),
                    tick,
                    text: "No significant developments to report.".to_owned(),
                    truth_score: 0.5,
                },
            ],
            articles: Vec::new(),
            rumors: Vec::new(),
        }
    }
}

/// Replace `media_state.headlines`/`rumors` (and articles) with a fresh set.
pub fn apply_media_output(state: &mut WorldState, output: MediaOutput) {
    state.media.headlines = output.headlines;
    state.media.articles = output.articles;
    state.media.rumors = output.rumors;
}

/// Input marshaled for the Reaction stage.
#[derive(Debug, Clone, Serialize)]
pub struct ReactionInput {
    /// Current approval sub-scores.
    pub approval: serde_json::Value,
    /// Current protest pressure.
    pub protest_pressure: f64,
    /// Active movement summaries.
    pub movements: Vec<String>,
}

/// A directive to create, strengthen, or dissolve a movement.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MovementDirective {
    /// Create a new movement.
    Create {
        /// Stable id for the new movement.
        id: String,
        /// Display name.
        name: String,
        /// Ideological category.
        movement_type: MovementType,
    },
    /// Strengthen an existing movement by a delta, `[0, 1]` clamp applied.
    Strengthen {
        /// The movement to strengthen.
        id: String,
        /// Strength delta.
        delta: f64,
    },
    /// Dissolve an existing movement.
    Dissolve {
        /// The movement to dissolve.
        id: String,
    },
}

/// Validated Reaction output (or its fallback).
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionOutput {
    /// Per-sub-key delta to apply to approval.
    pub approval_delta: ApprovalDelta,
    /// The reaction's estimate of protest probability, `[0, 1]`.
    pub protest_prob: f64,
    /// Movement directives to apply this tick.
    pub movements: Vec<MovementDirective>,
    /// Warnings the advisor suppressed rather than acted on (audit only).
    pub suppressed_warnings: Vec<String>,
}

/// Delta applied to each approval sub-score.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ApprovalDelta {
    /// Delta to `approval.overall`.
    pub overall: f64,
    /// Delta to `approval.economic`.
    pub economic: f64,
    /// Delta to `approval.social`.
    pub social: f64,
    /// Delta to `approval.security`.
    pub security: f64,
}

impl ReactionOutput {
    /// The fallback per `spec.md` §4.7: uniform -1 to all four approvals,
    /// `protest_pressure += 0.02`, no movement changes.
    pub fn fallback() -> Self {
        Self {
            approval_delta: ApprovalDelta { overall: -1.0, economic: -1.0, social: -1.0, security: -1.0 },
            protest_prob: 0.0,
            movements: Vec::new(),
            suppressed_warnings: Vec::new(),
        }
    }
}

/// Apply a Reaction output: approval deltas, the one-way protest ratchet,
/// and movement directives.
pub fn apply_reaction_output(state: &mut WorldState, output: ReactionOutput, is_fallback: bool) {
    let deltas = [
        ("overall", output.approval_delta.overall),
        ("economic", output.approval_delta.economic),
        ("social", output.approval_delta.social),
        ("security", output.approval_delta.security),
    ];
    for (name, value) in state.government.approval.as_mut_array() {
        let delta = deltas.iter().find(|(n, _)| *n == name).map_or(0.0, |(_, d)| *d);
        *value = (*value + delta).clamp(0.0, 100.0);
    }

    if is_fallback {
        state.society.protest_pressure = (state.society.protest_pressure + 0.02).clamp(0.0, 1.0);
    } else if output.protest_prob > state.society.protest_pressure {
        state.society.protest_pressure =
            (0.5 * state.society.protest_pressure + 0.5 * output.protest_prob).clamp(0.0, 1.0);
    }

    for directive in output.movements {
        apply_movement_directive(state, directive, state.meta.tick);
    }
}

fn apply_movement_directive(state: &mut WorldState, directive: MovementDirective, tick: u64) {
    match directive {
        MovementDirective::Create { id, name, movement_type } => {
            let movement_id = polity_types::MovementId::new(id);
            if state.movement_mut(&movement_id).is_none() {
                state.society.movements.push(crate::action_resolver::empty_movement(
                    movement_id,
                    name,
                    movement_type,
                    tick,
                ));
            }
        }
        MovementDirective::Strengthen { id, delta } => {
            if let Some(movement) = state.movement_mut(&polity_types::MovementId::new(id)) {
                movement.strength = (movement.strength + delta).clamp(0.0, 1.0);
            }
        }
        MovementDirective::Dissolve { id } => {
            let movement_id = polity_types::MovementId::new(id);
            state.society.movements.retain(|m| m.id != movement_id);
        }
    }
}

/// Input marshaled for the Crisis stage.
#[derive(Debug, Clone, Serialize)]
pub struct CrisisInput {
    /// Recent scalar history (GDP/stability), oldest first.
    pub history: Vec<crate::history::ScalarSnapshot>,
    /// Current economy/society snapshot.
    pub state_summary: serde_json::Value,
}

/// Validated Crisis output. `None` (legitimately, not a failure) means no
/// crisis this tick.
#[derive(Debug, Clone, Deserialize)]
pub struct CrisisOutput {
    /// Free-text event category.
    pub event_type: String,
    /// Severity, `[1, 5]`.
    pub severity: u8,
    /// Modifier batch the event applies.
    pub modifiers: Vec<Modifier>,
    /// Narrative hook shown in views/log.
    pub narrative_hook: String,
    /// How many ticks the event's effect persists, if any.
    pub duration_ticks: Option<u64>,
}

/// Push a non-null Crisis output as a pending, crisis-sourced event for the
/// same tick's Event Processor pass.
pub fn queue_crisis_event(state: &mut WorldState, output: CrisisOutput, rng: &mut crate::noise::DeterministicRng) {
    let tick = state.meta.tick;
    state.events.push(GameEvent {
        id: polity_types::EventId::new(rng.next_id("crisis")),
        source: EventSource::Crisis,
        tick,
        event_type: output.event_type,
        severity: output.severity,
        status: EventStatus::Pending,
        description: "Crisis advisor event.".to_owned(),
        modifiers: output.modifiers,
        duration_ticks: output.duration_ticks,
        expires_tick: None,
        narrative_hook: output.narrative_hook,
    });
}

/// Input marshaled for the Historian stage.
#[derive(Debug, Clone, Serialize)]
pub struct HistorianInput {
    /// The current era.
    pub current_era: String,
    /// Per-player legacy/notable-act context.
    pub players: serde_json::Value,
}

/// An era transition the Historian may open.
#[derive(Debug, Clone, Deserialize)]
pub struct EraTransition {
    /// The new era's name.
    pub name: String,
    /// A short summary of why the era changed.
    pub summary: String,
}

/// Validated Historian output (or its fallback).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistorianOutput {
    /// An era transition, if the Historian decided to open one.
    pub era_transition: Option<EraTransition>,
    /// A short tick summary (stored for audit, not gameplay-affecting).
    pub summary: String,
    /// Reputation upserts, keyed by player id.
    pub player_reputations: BTreeMap<PlayerId, ReputationRecord>,
}

/// Apply a Historian output: era transition and reputation upserts. Never
/// mutates gameplay state (economy/society/government/players beyond
/// their reputation records).
pub fn apply_historian_output(state: &mut WorldState, output: HistorianOutput) {
    if let Some(transition) = output.era_transition {
        let tick = state.meta.tick;
        if let Some(current) = state.history.eras.last_mut() {
            current.tick_end = Some(tick);
        }
        state.history.eras.push(polity_types::Era {
            name: transition.name,
            tick_start: tick,
            tick_end: None,
            summary: transition.summary,
        });
    }
    for (player_id, record) in output.player_reputations {
        state.history.reputations.insert(player_id, record);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn reaction_fallback_applies_uniform_penalty_and_ratchets_protest() {
        let mut state = WorldState::new("srv", 6, 1);
        let before = state.government.approval.overall;
        apply_reaction_output(&mut state, ReactionOutput::fallback(), true);
        assert!((state.government.approval.overall - (before - 1.0)).abs() < f64::EPSILON);
        assert!((state.society.protest_pressure - 0.07).abs() < 1e-9);
    }

    #[test]
    fn reaction_protest_ratchet_is_one_way_up_only() {
        let mut state = WorldState::new("srv", 6, 1);
        state.society.protest_pressure = 0.5;
        let output = ReactionOutput {
            approval_delta: ApprovalDelta::default(),
            protest_prob: 0.1,
            movements: Vec::new(),
            suppressed_warnings: Vec::new(),
        };
        apply_reaction_output(&mut state, output, false);
        assert!((state.society.protest_pressure - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn historian_opens_era_and_closes_prior() {
        let mut state = WorldState::new("srv", 6, 1);
        state.meta.tick = 10;
        let output = HistorianOutput {
            era_transition: Some(EraTransition { name: "Reform Era".to_owned(), summary: "Change.".to_owned() }),
            summary: String::new(),
            player_reputations: BTreeMap::new(),
        };
        apply_historian_output(&mut state, output);
        assert_eq!(state.history.eras.len(), 2);
        assert_eq!(state.history.eras[0].tick_end, Some(10));
        assert_eq!(state.history.eras[1].name, "Reform Era");
    }

    #[test]
    fn judiciary_output_with_empty_modifiers_binds_cleanly() {
        let mut state = WorldState::new("srv", 6, 1);
        let law_id = LawId::new("law-1");
        state.laws.push(polity_types::Law {
            id: law_id.clone(),
            proposer: PlayerId::new("p-1"),
            proposed_tick: 0,
            original_text: "text".to_owned(),
            status: polity_types::LawStatus::Active,
            tallies: polity_types::Tallies::default(),
            judiciary_interpretation: None,
            activated_tick: Some(0),
            repealed_tick: None,
        });
        let output = JudiciaryOutput::fallback(law_id.clone());
        assert!(apply_judiciary_output(&mut state, output));
        assert!(state.law(&law_id).unwrap().judiciary_interpretation.is_some());
    }
}
