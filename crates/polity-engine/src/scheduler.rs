//! The per-game scheduled-tick loop: the external "alarm" `spec.md` §5
//! assumes exists but leaves outside the simulation's own boundary.
//!
//! Polls every registered game's `tick_deadline` on a fixed cadence and
//! runs ticks for any game whose deadline has passed. A restart after a
//! long outage can find several ticks overdue at once; those are run
//! sequentially, each fully processed, bounded by `max_catchup_ticks`
//! (Open Question #1) so a stale game can't replay an unbounded backlog.

use std::time::Duration;

use chrono::Utc;
use polity_advisors::LlmBackend;
use polity_server::state::AppState;
use polity_types::GamePhase;

/// Run the scheduler loop forever, polling every `poll_interval`.
pub async fn run(state: AppState, backend: LlmBackend, stage_timeout: Duration, poll_interval: Duration, max_catchup_ticks: u32) {
    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        ticker.tick().await;
        let server_ids = state.registry.server_ids().await;
        for server_id in server_ids {
            if let Some(instance) = state.registry.get(&server_id).await {
                let mut guard = instance.lock().await;
                run_overdue_ticks(&state, &server_id, &mut guard, &backend, stage_timeout, max_catchup_ticks).await;
            }
        }
    }
}

async fn run_overdue_ticks(
    state: &AppState,
    server_id: &str,
    instance: &mut polity_server::state::GameInstance,
    backend: &LlmBackend,
    stage_timeout: Duration,
    max_catchup_ticks: u32,
) {
    let mut ran = 0u32;
    while instance.state.meta.phase == GamePhase::AcceptingActions && Utc::now() >= instance.state.meta.tick_deadline {
        if ran >= max_catchup_ticks {
            tracing::warn!(server_id, dropped = "remaining overdue ticks", max_catchup_ticks, "catch-up bound reached");
            break;
        }

        match instance.run_tick(backend, stage_timeout).await {
            Ok(summary) => {
                ran = ran.saturating_add(1);
                let content_hash = &summary.content_hash;
                tracing::info!(server_id, tick = summary.tick, %content_hash, "tick finalized");
                if let Err(error) = state.store.save_state(server_id, &instance.state).await {
                    tracing::warn!(server_id, %error, "failed to persist tick result");
                    break;
                }
            }
            Err(error) => {
                tracing::warn!(server_id, %error, "tick rejected, leaving game for operator review");
                break;
            }
        }
    }
}
