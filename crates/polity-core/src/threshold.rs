//! Phase 4 of the tick cycle: the Threshold Watchdog.
//!
//! Scans a fixed table of scalar thresholds against the post-recalculation
//! state and emits a `CoreEngine`-sourced [`GameEvent`] the first time each
//! trigger crosses, then enforces a per-trigger cooldown so it cannot fire
//! again until the condition has cleared and re-crossed.

use std::collections::BTreeMap;

use polity_types::{EventSource, EventStatus, GameEvent, WorldState};

/// One row of the static trigger table.
struct Trigger {
    name: &'static str,
    event_type: &'static str,
    severity: u8,
    cooldown_ticks: u64,
    narrative_hook: &'static str,
    condition: fn(&WorldState) -> bool,
}

const TRIGGERS: &[Trigger] = &[
    Trigger {
        name: "gdp_collapse",
        event_type: "economic_crisis",
        severity: 5,
        cooldown_ticks: 10,
        narrative_hook: "The economy grinds to a standstill.",
        condition: |s| s.economy.gdp < 100.0,
    },
    Trigger {
        name: "hyperinflation",
        event_type: "hyperinflation",
        severity: 4,
        cooldown_ticks: 5,
        narrative_hook: "Prices spiral as inflation outruns wages.",
        condition: |s| s.economy.inflation > 50.0,
    },
    Trigger {
        name: "mass_unemployment",
        event_type: "protest",
        severity: 3,
        cooldown_ticks: 3,
        narrative_hook: "Idle hands gather in the city squares.",
        condition: |s| s.economy.unemployment > 25.0,
    },
    Trigger {
        name: "regime_collapse",
        event_type: "revolution",
        severity: 5,
        cooldown_ticks: 20,
        narrative_hook: "The government's grip visibly slips.",
        condition: |s| s.society.stability < 20.0,
    },
    Trigger {
        name: "suspiciously_stable",
        event_type: "scandal",
        severity: 2,
        cooldown_ticks: 5,
        narrative_hook: "Commentators whisper that the numbers look too good.",
        condition: |s| s.society.stability > 90.0,
    },
    Trigger {
        name: "radicalization_surge",
        event_type: "revolution",
        severity: 4,
        cooldown_ticks: 15,
        narrative_hook: "Fringe movements edge toward open revolt.",
        condition: |s| s.society.radicalization > 80.0,
    },
    Trigger {
        name: "radicalization_spike",
        event_type: "movement_formed",
        severity: 2,
        cooldown_ticks: 5,
        narrative_hook: "A new movement coalesces from scattered discontent.",
        condition: |s| s.society.radicalization > 60.0,
    },
    Trigger {
        name: "treasury_insolvency",
        event_type: "budget_crisis",
        severity: 3,
        cooldown_ticks: 5,
        narrative_hook: "The treasury cannot meet its obligations.",
        condition: |s| s.economy.budget.reserves < 0.0,
    },
];

/// Per-trigger cooldown state, carried tick-to-tick by the caller.
#[derive(Debug, Clone, Default)]
pub struct WatchdogState {
    last_fired_tick: BTreeMap<&'static str, u64>,
}

/// Scan the trigger table and emit events for every trigger that is both
/// active and off cooldown. Returns the number of events emitted.
pub fn scan(state: &mut WorldState, watchdog: &mut WatchdogState, rng: &mut crate::noise::DeterministicRng) -> u32 {
    let tick = state.meta.tick;
    let mut fired = 0u32;

    for trigger in TRIGGERS {
        if !(trigger.condition)(state) {
            continue;
        }
        let last = watchdog.last_fired_tick.get(trigger.name).copied();
        if let Some(last_tick) = last {
            if tick.saturating_sub(last_tick) < trigger.cooldown_ticks {
                continue;
            }
        }

        let event = GameEvent {
            id: polity_types::EventId::new(rng.next_id("evt")),
            source: EventSource::CoreEngine,
            tick,
            event_type: trigger.event_type.to_owned(),
            severity: trigger.severity,
            status: EventStatus::Pending,
            description: format!("Watchdog trigger '{}' crossed threshold.", trigger.name),
            modifiers: Vec::new(),
            duration_ticks: None,
            expires_tick: None,
            narrative_hook: trigger.narrative_hook.to_owned(),
        };
        state.events.push(event);
        watchdog.last_fired_tick.insert(trigger.name, tick);
        fired = fired.saturating_add(1);
    }

    fired
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::noise::DeterministicRng;

    #[test]
    fn fires_once_then_respects_cooldown() {
        let mut state = WorldState::new("srv", 6, 1);
        state.economy.inflation = 80.0;
        let mut watchdog = WatchdogState::default();
        let mut rng = DeterministicRng::new(1, 0);

        let first = scan(&mut state, &mut watchdog, &mut rng);
        assert_eq!(first, 1);

        state.meta.tick = 1;
        let second = scan(&mut state, &mut watchdog, &mut rng);
        assert_eq!(second, 0, "cooldown should suppress a second immediate fire");

        state.meta.tick = 5;
        let third = scan(&mut state, &mut watchdog, &mut rng);
        assert_eq!(third, 1, "trigger should fire again after cooldown elapses");
    }

    #[test]
    fn no_triggers_fire_on_healthy_state() {
        let mut state = WorldState::new("srv", 6, 1);
        let mut watchdog = WatchdogState::default();
        let mut rng = DeterministicRng::new(1, 0);
        assert_eq!(scan(&mut state, &mut watchdog, &mut rng), 0);
    }
}
