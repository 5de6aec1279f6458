//! The Advisor Pipeline orchestrator: runs the six stages strictly in
//! order, each inside its own isolation boundary (`spec.md` §4.7), and
//! assembles a [`polity_core::tick::AdvisorOutputs`] the caller hands to
//! `polity_core::tick::finish_tick`.
//!
//! Every stage's transport/parse/validation failure is caught here and
//! replaced by that stage's documented fallback; nothing escapes this
//! module as an error. A stage's success never blocks a later stage from
//! running -- even a hard transport error only narrows this stage's
//! result, never the pipeline's.

use std::time::Duration;

use polity_core::advisor::{
    AnalystOutput, CrisisOutput, HistorianOutput, JudiciaryOutput, MediaOutput, ReactionOutput,
};
use polity_core::tick::{AdvisorInputs, AdvisorOutputs};
use tracing::warn;

use crate::error::AdvisorError;
use crate::llm::LlmBackend;
use crate::parse::{is_literal_null, parse_stage_output};
use crate::prompt::{self, RenderedPrompt};

/// How long a single advisor HTTP call may run before it is treated as a
/// failure, per `spec.md` §5's "advisor calls should be bounded by a
/// timeout; timeout is treated identically to any other advisor failure".
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(10);

async fn call_stage(
    backend: &LlmBackend,
    prompt: &RenderedPrompt,
    timeout: Duration,
    stage: &str,
) -> Result<String, AdvisorError> {
    match tokio::time::timeout(timeout, backend.complete(&prompt.system, &prompt.user)).await {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(error)) => {
            warn!(stage, backend = backend.name(), %error, "advisor transport failed");
            Err(error)
        }
        Err(_) => {
            warn!(stage, backend = backend.name(), "advisor call timed out");
            Err(AdvisorError::Timeout)
        }
    }
}

/// Run the Analyst stage, falling back to a pass-through summary on failure.
pub async fn run_analyst(backend: &LlmBackend, inputs: &AdvisorInputs, timeout: Duration) -> AnalystOutput {
    let prompt = prompt::analyst(inputs);
    let result = call_stage(backend, &prompt, timeout, "analyst")
        .await
        .and_then(|raw| parse_stage_output(&raw, &["trends", "risks", "projections", "confidence"]));
    match result {
        Ok(output) => output,
        Err(error) => {
            warn!(stage = "analyst", %error, "using fallback output");
            AnalystOutput::fallback(&inputs.analyst)
        }
    }
}

/// Run the Judiciary stage once per law awaiting an interpretation, in the
/// same order `inputs.judiciary` lists them.
pub async fn run_judiciary(
    backend: &LlmBackend,
    inputs: &AdvisorInputs,
    timeout: Duration,
) -> Vec<JudiciaryOutput> {
    let mut outputs = Vec::with_capacity(inputs.judiciary.len());
    for law_input in &inputs.judiciary {
        let prompt = prompt::judiciary(law_input);
        let result = call_stage(backend, &prompt, timeout, "judiciary")
            .await
            .and_then(|raw| parse_stage_output(&raw, &["law_id", "interpretation", "ambiguities", "implementation"]));
        let output = match result {
            Ok(output) => output,
            Err(error) => {
                warn!(stage = "judiciary", law_id = %law_input.law_id, %error, "using fallback output");
                JudiciaryOutput::fallback(law_input.law_id.clone())
            }
        };
        outputs.push(output);
    }
    outputs
}

/// Run the Media stage, falling back to two placeholder headlines on failure.
pub async fn run_media(backend: &LlmBackend, inputs: &AdvisorInputs, timeout: Duration, tick: u64) -> MediaOutput {
    let prompt = prompt::media(&inputs.media);
    let result = call_stage(backend, &prompt, timeout, "media")
        .await
        .and_then(|raw| parse_stage_output(&raw, &["headlines", "articles", "rumors"]));
    match result {
        Ok(output) => output,
        Err(error) => {
            warn!(stage = "media", %error, "using fallback output");
            MediaOutput::fallback(tick)
        }
    }
}

/// Run the Reaction stage. Returns the output and whether it is the
/// failure fallback, since [`polity_core::advisor::apply_reaction_output`]
/// treats the two cases differently for the protest-pressure update.
pub async fn run_reaction(
    backend: &LlmBackend,
    inputs: &AdvisorInputs,
    timeout: Duration,
) -> (ReactionOutput, bool) {
    let prompt = prompt::reaction(&inputs.reaction);
    let result = call_stage(backend, &prompt, timeout, "reaction").await.and_then(|raw| {
        parse_stage_output(&raw, &["approval_delta", "protest_prob", "movements", "suppressed_warnings"])
    });
    match result {
        Ok(output) => (output, false),
        Err(error) => {
            warn!(stage = "reaction", %error, "using fallback output");
            (ReactionOutput::fallback(), true)
        }
    }
}

const CRISIS_SEVERITY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Run the Crisis stage. `Ok(None)` from the advisor (literal `null`) and
/// any transport/validation failure both resolve to "inject nothing" --
/// the fallback for this stage is indistinguishable from a legitimate
/// empty result, per `spec.md` §4.7.
pub async fn run_crisis(backend: &LlmBackend, inputs: &AdvisorInputs, timeout: Duration) -> Option<CrisisOutput> {
    let prompt = prompt::crisis(&inputs.crisis);
    let raw = match call_stage(backend, &prompt, timeout, "crisis").await {
        Ok(raw) => raw,
        Err(error) => {
            warn!(stage = "crisis", %error, "using fallback output");
            return None;
        }
    };

    if is_literal_null(&raw) {
        return None;
    }

    let parsed: Result<CrisisOutput, AdvisorError> =
        parse_stage_output(&raw, &["event_type", "severity", "modifiers", "narrative_hook", "duration_ticks"]);
    match parsed {
        Ok(output) if CRISIS_SEVERITY_RANGE.contains(&output.severity) => Some(output),
        Ok(output) => {
            warn!(stage = "crisis", severity = output.severity, "severity out of range, using fallback output");
            None
        }
        Err(error) => {
            warn!(stage = "crisis", %error, "using fallback output");
            None
        }
    }
}

/// Run the Historian stage, falling back to a no-op (skip history update).
pub async fn run_historian(backend: &LlmBackend, inputs: &AdvisorInputs, timeout: Duration) -> HistorianOutput {
    let prompt = prompt::historian(&inputs.historian);
    let result = call_stage(backend, &prompt, timeout, "historian")
        .await
        .and_then(|raw| parse_stage_output(&raw, &["era_transition", "summary", "player_reputations"]));
    match result {
        Ok(output) => output,
        Err(error) => {
            warn!(stage = "historian", %error, "using fallback output");
            HistorianOutput::default()
        }
    }
}

/// Run all six stages, strictly in order, and assemble the [`AdvisorOutputs`]
/// `polity_core::tick::finish_tick` consumes.
pub async fn run_pipeline(backend: &LlmBackend, inputs: AdvisorInputs, timeout: Duration, tick: u64) -> AdvisorOutputs {
    let analyst_output = run_analyst(backend, &inputs, timeout).await;
    let judiciary_outputs = run_judiciary(backend, &inputs, timeout).await;
    let media_output = run_media(backend, &inputs, timeout, tick).await;
    let (reaction_output, reaction_is_fallback) = run_reaction(backend, &inputs, timeout).await;
    let crisis_output = run_crisis(backend, &inputs, timeout).await;
    let historian_output = run_historian(backend, &inputs, timeout).await;

    AdvisorOutputs {
        analyst: serde_json::to_value(&analyst_output).unwrap_or(serde_json::Value::Null),
        judiciary: judiciary_outputs,
        media: media_output,
        reaction: reaction_output,
        reaction_is_fallback,
        crisis: crisis_output,
        historian: historian_output,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::llm::{create_backend, BackendType, LlmConfig};

    fn empty_inputs() -> AdvisorInputs {
        AdvisorInputs {
            analyst: polity_core::advisor::AnalystInput {
                economy: serde_json::json!({}),
                society: serde_json::json!({}),
                government: serde_json::json!({}),
            },
            judiciary: Vec::new(),
            media: polity_core::advisor::MediaInput { recent_events: Vec::new(), mood: serde_json::json!({}) },
            reaction: polity_core::advisor::ReactionInput {
                approval: serde_json::json!({}),
                protest_pressure: 0.0,
                movements: Vec::new(),
            },
            crisis: polity_core::advisor::CrisisInput { history: Vec::new(), state_summary: serde_json::json!({}) },
            historian: polity_core::advisor::HistorianInput { current_era: String::new(), players: serde_json::json!([]) },
        }
    }

    #[tokio::test]
    async fn unreachable_backend_falls_back_every_stage() {
        let config = LlmConfig {
            backend: BackendType::OpenAi,
            api_url: "http://127.0.0.1:1".to_owned(),
            api_key: "test-key".to_owned(),
            model: String::new(),
        };
        let backend = create_backend(&config).expect("config is valid");
        let outputs = run_pipeline(&backend, empty_inputs(), Duration::from_millis(200), 0).await;

        assert!(outputs.judiciary.is_empty());
        assert!(outputs.reaction_is_fallback);
        assert!(outputs.crisis.is_none());
        assert_eq!(outputs.media.headlines.len(), 2);
    }

    #[test]
    fn crisis_severity_out_of_range_is_rejected() {
        assert!(!CRISIS_SEVERITY_RANGE.contains(&0));
        assert!(!CRISIS_SEVERITY_RANGE.contains(&6));
        assert!(CRISIS_SEVERITY_RANGE.contains(&3));
    }
}
