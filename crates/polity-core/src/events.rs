//! Phase 5 of the tick cycle: the Event Processor.
//!
//! Pending events are sorted by `EventSource::priority` (highest first;
//! ties broken by insertion order, since `sort_by_key` is stable) and
//! applied one at a time. An event whose modifier batch the Kernel rejects
//! rolls back cleanly (the Kernel already guarantees atomicity) and is
//! marked `rejected` rather than `applied`. Applied events past their
//! `expires_tick` are marked `expired` and skipped.

use polity_types::{EventStatus, OutcomeCounts, WorldState};
use tracing::warn;

/// Process every pending event, expire what has lapsed, and return outcome
/// counts for the tick's audit log.
pub fn process_events(state: &mut WorldState) -> OutcomeCounts {
    let mut counts = OutcomeCounts::default();
    let tick = state.meta.tick;

    expire_lapsed(state, tick, &mut counts);

    let mut pending_indices: Vec<usize> = state
        .events
        .iter()
        .enumerate()
        .filter(|(_, event)| event.status == EventStatus::Pending)
        .map(|(index, _)| index)
        .collect();
    pending_indices.sort_by_key(|&index| {
        std::cmp::Reverse(state.events.get(index).map_or(0, |event| event.source.priority()))
    });

    for index in pending_indices {
        let Some(event) = state.events.get(index) else {
            continue;
        };
        let modifiers = event.modifiers.clone();
        let id = event.id.clone();
        let duration = event.duration_ticks;

        if modifiers.is_empty() {
            set_applied(state, &id, tick, duration);
            counts.applied = counts.applied.saturating_add(1);
            continue;
        }

        match polity_kernel::apply_batch(state, &modifiers) {
            Ok(()) => {
                set_applied(state, &id, tick, duration);
                counts.applied = counts.applied.saturating_add(1);
            }
            Err(err) => {
                warn!(event = %id, error = %err, "event modifier batch rejected by kernel");
                set_status(state, &id, EventStatus::Rejected);
                counts.rejected = counts.rejected.saturating_add(1);
            }
        }
    }

    counts
}

fn expire_lapsed(state: &mut WorldState, tick: u64, counts: &mut OutcomeCounts) {
    for event in &mut state.events {
        if event.status == EventStatus::Applied {
            if let Some(expires) = event.expires_tick {
                if tick >= expires {
                    event.status = EventStatus::Expired;
                    counts.expired = counts.expired.saturating_add(1);
                }
            }
        }
    }
}

fn set_status(state: &mut WorldState, id: &polity_types::EventId, status: EventStatus) {
    if let Some(event) = state.events.iter_mut().find(|event| &event.id == id) {
        event.status = status;
    }
}

fn set_applied(state: &mut WorldState, id: &polity_types::EventId, tick: u64, duration: Option<u64>) {
    if let Some(event) = state.events.iter_mut().find(|event| &event.id == id) {
        event.status = EventStatus::Applied;
        if let Some(duration) = duration {
            event.expires_tick = Some(tick.saturating_add(duration));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use polity_types::{EventId, EventSource, GameEvent, Modifier};

    fn pending_event(id: &str, source: EventSource, modifiers: Vec<Modifier>) -> GameEvent {
        GameEvent {
            id: EventId::new(id),
            source,
            tick: 0,
            event_type: "test".to_owned(),
            severity: 1,
            status: EventStatus::Pending,
            description: String::new(),
            modifiers,
            duration_ticks: None,
            expires_tick: None,
            narrative_hook: String::new(),
        }
    }

    #[test]
    fn higher_priority_source_applies_first_when_order_matters() {
        let mut state = WorldState::new("srv", 6, 1);
        state.events.push(pending_event(
            "e-media",
            EventSource::Media,
            vec![Modifier::set("economy.gdp", 1.0)],
        ));
        state.events.push(pending_event(
            "e-core",
            EventSource::CoreEngine,
            vec![Modifier::set("economy.gdp", 2.0)],
        ));
        let counts = process_events(&mut state);
        assert_eq!(counts.applied, 2);
        // CoreEngine (priority 100) applies after Media in processing order
        // reversed by priority descending, so CoreEngine runs first then
        // Media overwrites last; assert final value reflects last-applied.
        assert!((state.economy.gdp - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejected_modifier_marks_event_rejected_without_partial_state() {
        let mut state = WorldState::new("srv", 6, 1);
        let before = state.economy.gdp;
        state.events.push(pending_event(
            "e-bad",
            EventSource::CoreEngine,
            vec![Modifier::set("economy.nonexistent", 1.0)],
        ));
        let counts = process_events(&mut state);
        assert_eq!(counts.rejected, 1);
        assert!((state.economy.gdp - before).abs() < f64::EPSILON);
        assert_eq!(state.events[0].status, EventStatus::Rejected);
    }

    #[test]
    fn expired_event_is_counted_and_not_reprocessed() {
        let mut state = WorldState::new("srv", 6, 1);
        state.meta.tick = 5;
        let mut event = pending_event("e-old", EventSource::CoreEngine, Vec::new());
        event.status = EventStatus::Applied;
        event.expires_tick = Some(5);
        state.events.push(event);
        let counts = process_events(&mut state);
        assert_eq!(counts.expired, 1);
        assert_eq!(state.events[0].status, EventStatus::Expired);
    }
}
