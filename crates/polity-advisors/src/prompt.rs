//! Per-stage prompt construction.
//!
//! The teacher's `PromptEngine` loads operator-tunable `minijinja` templates
//! from disk, because its prompt shape (identity/perception/memory/actions
//! sections) varies per deployment. The six advisor stages here have a
//! fixed shape per `spec.md` §6: one system prompt establishing the stage's
//! role plus one user message of the form `"TICK INPUT DATA:\n<pretty-JSON>
//! \n\nAnalyze and respond with valid JSON only."`. Nothing here is
//! operator-tunable, so a file-backed template engine is unwarranted
//! complexity; `format!` is the whole renderer.

use serde::Serialize;

/// A rendered prompt ready to send to an [`crate::llm::LlmBackend`].
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message establishing the stage's role.
    pub system: String,
    /// User message carrying the marshaled tick input.
    pub user: String,
}

const ANALYST_SYSTEM: &str = "You are the Analyst advisor for a political simulation. Given the current economy, society, and government state, identify trends and risks and project near-term direction. Respond with a single JSON object with keys: trends (array of strings), risks (array of strings), projections (object), confidence (number 0-1).";

const JUDICIARY_SYSTEM: &str = "You are the Judiciary advisor for a political simulation. Given a newly-passed law's text, interpret it concretely: what it changes, what is ambiguous, and which state variables it should modify. Respond with a single JSON object with keys: law_id (string), interpretation (string), ambiguities (array of strings), implementation (object with affected_variables array and modifiers array of {path, operation, value}).";

const MEDIA_SYSTEM: &str = "You are the Media advisor for a political simulation. Given recent events and mood signals, write this tick's news cycle. Respond with a single JSON object with keys: headlines (array of {id, tick, text, truth_score}), articles (array), rumors (array).";

const REACTION_SYSTEM: &str = "You are the Reaction advisor for a political simulation, modeling the public's response to this tick's events. Respond with a single JSON object with keys: approval_delta (object with overall, economic, social, security numbers), protest_prob (number 0-1), movements (array of movement directives), suppressed_warnings (array of strings).";

const CRISIS_SYSTEM: &str = "You are the Crisis advisor for a political simulation. Given recent scalar history and the current state summary, decide whether a crisis event should occur this tick. If none should occur, respond with the literal text null. Otherwise respond with a single JSON object with keys: event_type (string), severity (integer 1-5), modifiers (array of {path, operation, value}), narrative_hook (string), duration_ticks (integer or null).";

const HISTORIAN_SYSTEM: &str = "You are the Historian advisor for a political simulation. Given the current era and player context, decide whether a new era should open and update player reputations. Respond with a single JSON object with keys: era_transition (object with name and summary, or null), summary (string), player_reputations (object keyed by player id).";

fn render(system: &str, input: &impl Serialize) -> RenderedPrompt {
    let pretty = serde_json::to_string_pretty(input).unwrap_or_else(|_| "{}".to_owned());
    let user = format!("TICK INPUT DATA:\n{pretty}\n\nAnalyze and respond with valid JSON only.");
    RenderedPrompt { system: system.to_owned(), user }
}

/// Render the Analyst stage prompt.
pub fn analyst(input: &polity_core::AdvisorInputs) -> RenderedPrompt {
    render(ANALYST_SYSTEM, &input.analyst)
}

/// Render one law's Judiciary stage prompt.
pub fn judiciary(input: &polity_core::advisor::JudiciaryInput) -> RenderedPrompt {
    render(JUDICIARY_SYSTEM, input)
}

/// Render the Media stage prompt.
pub fn media(input: &polity_core::advisor::MediaInput) -> RenderedPrompt {
    render(MEDIA_SYSTEM, input)
}

/// Render the Reaction stage prompt.
pub fn reaction(input: &polity_core::advisor::ReactionInput) -> RenderedPrompt {
    render(REACTION_SYSTEM, input)
}

/// Render the Crisis stage prompt.
pub fn crisis(input: &polity_core::advisor::CrisisInput) -> RenderedPrompt {
    render(CRISIS_SYSTEM, input)
}

/// Render the Historian stage prompt.
pub fn historian(input: &polity_core::advisor::HistorianInput) -> RenderedPrompt {
    render(HISTORIAN_SYSTEM, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polity_core::advisor::MediaInput;

    #[test]
    fn renders_tick_input_data_wrapper() {
        let input = MediaInput { recent_events: vec!["event".to_owned()], mood: serde_json::json!({}) };
        let prompt = media(&input);
        assert!(prompt.user.starts_with("TICK INPUT DATA:\n"));
        assert!(prompt.user.ends_with("Analyze and respond with valid JSON only."));
        assert!(prompt.user.contains("event"));
    }
}
