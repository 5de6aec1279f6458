//! Phase 1 of the tick cycle: resolves every player's queued actions against
//! the current `WorldState`.
//!
//! Actions are processed in player-id order (stable, since `players` is a
//! `BTreeMap`) so that resolution is reproducible independent of submission
//! order within a tick. An action whose type is not legal for the
//! submitting player's role -- including `Unknown` -- is a silent no-op:
//! it is counted as rejected but never logged at more than `debug`.

use polity_types::{
    ActionType, BudgetCategory, LawStatus, Movement, OutcomeCounts, Player, QueuedAction, RoleData,
    VoteChoice, WorldState,
};
use tracing::debug;

/// Resolve every player's pending actions for the current tick in place.
pub fn resolve_actions(state: &mut WorldState) -> OutcomeCounts {
    let mut counts = OutcomeCounts::default();
    let player_ids: Vec<_> = state.players.keys().cloned().collect();

    for player_id in player_ids {
        let Some(pending) = state
            .players
            .get(&player_id)
            .map(|p| p.actions_pending.clone())
        else {
            continue;
        };

        for action in &pending {
            if apply_one(state, &player_id, action) {
                counts.applied = counts.applied.saturating_add(1);
            } else {
                counts.rejected = counts.rejected.saturating_add(1);
            }
        }

        if let Some(player) = state.players.get_mut(&player_id) {
            player.actions_history.push_back(pending);
            while player.actions_history.len() > Player::MAX_HISTORY {
                player.actions_history.pop_front();
            }
            player.actions_pending.clear();
        }
    }

    reset_vote_flags(state);
    counts
}

fn reset_vote_flags(state: &mut WorldState) {
    for player in state.players.values_mut() {
        if let RoleData::Citizen(citizen) = &mut player.role_data {
            citizen.voted_this_tick = false;
        }
    }
}

/// Dispatch one queued action. Returns `true` if it had an effect.
fn apply_one(state: &mut WorldState, player_id: &polity_types::PlayerId, action: &QueuedAction) -> bool {
    let Some(player_role) = state.players.get(player_id).map(|p| p.role) else {
        return false;
    };

    if !action.action_type.allowed_roles().contains(&player_role) {
        debug!(player = %player_id, action = ?action.action_type, "action not permitted for role, dropping");
        return false;
    }

    match action.action_type {
        ActionType::Work => work(state, player_id),
        ActionType::Consume => consume(state, player_id),
        ActionType::VoteLaw => vote_law(state, player_id, action, 1.0, 0.5),
        ActionType::JoinMovement => join_movement(state, player_id, action),
        ActionType::LeaveMovement => leave_movement(state, player_id),
        ActionType::Produce => produce(state, player_id),
        ActionType::SetWages => set_wages(state, player_id, action),
        ActionType::Lobby => lobby(state, player_id, action),
        ActionType::EvadeTaxes => evade_taxes(state, player_id),
        ActionType::ComplyTaxes => comply_taxes(state, player_id),
        ActionType::ProposeLaw => propose_law(state, player_id, action),
        ActionType::VoteLawPolitician => vote_law(state, player_id, action, 3.0, 2.0),
        ActionType::AllocateBudget => allocate_budget(state, player_id, action),
        ActionType::PublishStatement => publish_statement(state, player_id, action),
        ActionType::Unknown => false,
    }
}

fn work(state: &mut WorldState, player_id: &polity_types::PlayerId) -> bool {
    let wage_index = state.economy.wage_index;
    let Some(player) = state.players.get_mut(player_id) else {
        return false;
    };
    let RoleData::Citizen(citizen) = &mut player.role_data else {
        return false;
    };

    if citizen.employed {
        let earned = citizen.employer_wage_level * wage_index;
        player.visible_stats.wealth += earned;
        state.economy.gdp += 0.01 * earned;
        state.society.satisfaction = (state.society.satisfaction + 1.0).clamp(0.0, 100.0);
    } else {
        citizen.economic_pressure = (citizen.economic_pressure + 5.0).min(100.0);
    }
    true
}

fn consume(state: &mut WorldState, player_id: &polity_types::PlayerId) -> bool {
    let supply = state.economy.market.supply;
    let Some(player) = state.players.get_mut(player_id) else {
        return false;
    };
    let RoleData::Citizen(citizen) = &mut player.role_data else {
        return false;
    };

    let amount = (0.3 * player.visible_stats.wealth).min(0.01 * supply);
    if amount <= 0.0 {
        citizen.economic_pressure = (citizen.economic_pressure + 8.0).min(100.0);
        return true;
    }

    player.visible_stats.wealth -= amount;
    state.economy.market.demand += 0.1 * amount;
    state.economy.market.supply -= 0.05 * amount;
    state.society.satisfaction = (state.society.satisfaction + 3.0).clamp(0.0, 100.0);
    true
}

fn vote_law(
    state: &mut WorldState,
    player_id: &polity_types::PlayerId,
    action: &QueuedAction,
    weight: f64,
    influence_gain: f64,
) -> bool {
    let Some(law_id) = action.params.law_id.clone() else {
        return false;
    };
    let Some(choice) = action.params.choice else {
        return false;
    };

    let already_voted = matches!(
        state.players.get(player_id).map(|p| &p.role_data),
        Some(RoleData::Citizen(c)) if c.voted_this_tick
    );
    if already_voted {
        return false;
    }

    let Some(law) = state.law_mut(&law_id) else {
        return false;
    };
    if law.status != LawStatus::Voting {
        return false;
    }

    match choice {
        VoteChoice::For => law.tallies.for_votes += weight,
        VoteChoice::Against => law.tallies.against_votes += weight,
        VoteChoice::Abstain => law.tallies.abstain_votes += weight,
    }

    if let Some(player) = state.players.get_mut(player_id) {
        if let RoleData::Citizen(c) = &mut player.role_data {
            c.voted_this_tick = true;
        }
        player.hidden_stats.influence = (player.hidden_stats.influence + influence_gain).min(100.0);
    }
    true
}

fn join_movement(
    state: &mut WorldState,
    player_id: &polity_types::PlayerId,
    action: &QueuedAction,
) -> bool {
    let Some(movement_id) = action.params.movement_id.clone() else {
        return false;
    };

    let current = state
        .players
        .get(player_id)
        .and_then(|p| p.visible_stats.movement_id.clone());
    if let Some(current_id) = current {
        remove_from_movement(state, player_id, &current_id);
    }

    let is_radical = state
        .movement_mut(&movement_id)
        .map(|movement| movement.movement_type == polity_types::MovementType::Radical);
    let Some(is_radical) = is_radical else {
        return false;
    };

    if let Some(movement) = state.movement_mut(&movement_id) {
        if !movement.member_player_ids.contains(player_id) {
            movement.member_player_ids.push(player_id.clone());
        }
    }

    if let Some(player) = state.players.get_mut(player_id) {
        player.visible_stats.movement_id = Some(movement_id);
        player.hidden_stats.influence = (player.hidden_stats.influence + 2.0).min(100.0);
    }
    if is_radical {
        state.society.radicalization = (state.society.radicalization + 10.0).min(100.0);
    }
    true
}

fn leave_movement(state: &mut WorldState, player_id: &polity_types::PlayerId) -> bool {
    let Some(current_id) = state
        .players
        .get(player_id)
        .and_then(|p| p.visible_stats.movement_id.clone())
    else {
        return false;
    };
    remove_from_movement(state, player_id, &current_id);
    if let Some(player) = state.players.get_mut(player_id) {
        player.visible_stats.movement_id = None;
    }
    true
}

fn remove_from_movement(state: &mut WorldState, player_id: &polity_types::PlayerId, movement_id: &polity_types::MovementId) {
    if let Some(movement) = state.movement_mut(movement_id) {
        movement.member_player_ids.retain(|id| id != player_id);
    }
}

fn produce(state: &mut WorldState, player_id: &polity_types::PlayerId) -> bool {
    let price_index = state.economy.market.price_index;
    let wage_index = state.economy.wage_index;
    let Some(player) = state.players.get_mut(player_id) else {
        return false;
    };
    let RoleData::BusinessOwner(business) = &mut player.role_data else {
        return false;
    };

    if business.strike_risk > 0.8 {
        business.production_capacity *= 0.5;
    }
    let output = business.production_capacity;
    let profit = output * price_index - business.employees * business.wage_level * wage_index;

    state.economy.market.supply += output.max(0.0);
    state.economy.gdp += 0.1 * output;
    player.visible_stats.wealth += profit.max(0.0);
    player.hidden_stats.influence = (player.hidden_stats.influence + 1.0).min(100.0);
    true
}

fn set_wages(state: &mut WorldState, player_id: &polity_types::PlayerId, action: &QueuedAction) -> bool {
    let Some(requested) = action.params.wage_level else {
        return false;
    };
    let wage_index = state.economy.wage_index;
    let new_wage = requested.clamp(0.1, 10.0);

    let Some(player) = state.players.get_mut(player_id) else {
        return false;
    };
    let RoleData::BusinessOwner(business) = &mut player.role_data else {
        return false;
    };

    let old_wage = business.wage_level;
    business.wage_level = new_wage;
    if new_wage < 0.7 * wage_index {
        business.strike_risk = (business.strike_risk + 0.15).clamp(0.0, 1.0);
    } else if new_wage > 1.2 * wage_index {
        business.strike_risk = (business.strike_risk - 0.1).clamp(0.0, 1.0);
    }

    state.economy.wage_index = (wage_index + 0.01 * (new_wage - old_wage)).max(0.01);
    true
}

fn lobby(state: &mut WorldState, player_id: &polity_types::PlayerId, action: &QueuedAction) -> bool {
    let Some(target_id) = action.params.target_politician_id.clone() else {
        return false;
    };
    let Some(requested) = action.params.requested else {
        return false;
    };
    if requested <= 0.0 {
        return false;
    }

    let available = state
        .players
        .get(player_id)
        .map(|p| p.visible_stats.wealth)
        .unwrap_or(0.0);
    let actual = requested.min(0.2 * available);
    if actual <= 0.0 {
        return false;
    }

    let target_is_politician = matches!(
        state.players.get(&target_id).map(|p| &p.role_data),
        Some(RoleData::Politician(_))
    );
    if !target_is_politician {
        return false;
    }

    if let Some(player) = state.players.get_mut(player_id) {
        player.visible_stats.wealth -= actual;
        player.hidden_stats.influence = (player.hidden_stats.influence + 3.0).min(100.0);
        player.hidden_stats.corruption = (player.hidden_stats.corruption + 2.0).min(100.0);
    }
    if let Some(target) = state.players.get_mut(&target_id) {
        if let RoleData::Politician(politician) = &mut target.role_data {
            politician.lobby_money_received += actual;
        }
        target.hidden_stats.corruption = (target.hidden_stats.corruption + 0.5 * actual).min(100.0);
    }
    true
}

fn evade_taxes(state: &mut WorldState, player_id: &polity_types::PlayerId) -> bool {
    let Some(player) = state.players.get_mut(player_id) else {
        return false;
    };
    let RoleData::BusinessOwner(business) = &mut player.role_data else {
        return false;
    };
    business.tax_evasion = (business.tax_evasion + 0.1).clamp(0.0, 1.0);
    player.visible_stats.wealth *= 1.05;
    player.hidden_stats.corruption = (player.hidden_stats.corruption + 1.0).min(100.0);
    state.economy.tax_compliance = (state.economy.tax_compliance - 0.02).clamp(0.0, 1.0);
    true
}

fn comply_taxes(state: &mut WorldState, player_id: &polity_types::PlayerId) -> bool {
    let Some(player) = state.players.get_mut(player_id) else {
        return false;
    };
    let RoleData::BusinessOwner(business) = &mut player.role_data else {
        return false;
    };
    business.tax_evasion = (business.tax_evasion - 0.1).clamp(0.0, 1.0);
    state.economy.tax_compliance = (state.economy.tax_compliance + 0.01).clamp(0.0, 1.0);
    true
}

fn propose_law(state: &mut WorldState, player_id: &polity_types::PlayerId, action: &QueuedAction) -> bool {
    let Some(text) = action.params.text.clone() else {
        return false;
    };
    if text.is_empty() {
        return false;
    }
    let truncated: String = text.chars().take(2000).collect();

    let seed = state.meta.seed;
    let ordinal = state.laws.len();
    let law = polity_types::Law {
        id: polity_types::LawId::new(format!("law-{seed}-{ordinal}")),
        proposer: player_id.clone(),
        proposed_tick: state.meta.tick,
        original_text: truncated,
        status: LawStatus::Proposed,
        tallies: polity_types::Tallies::default(),
        judiciary_interpretation: None,
        activated_tick: None,
        repealed_tick: None,
    };
    state.laws.push(law);

    if let Some(player) = state.players.get_mut(player_id) {
        if let RoleData::Politician(politician) = &mut player.role_data {
            politician.laws_proposed = politician.laws_proposed.saturating_add(1);
        }
        player.hidden_stats.influence = (player.hidden_stats.influence + 3.0).min(100.0);
    }
    true
}

fn allocate_budget(state: &mut WorldState, player_id: &polity_types::PlayerId, action: &QueuedAction) -> bool {
    let Some(allocation) = action.params.allocation.clone() else {
        return false;
    };
    if allocation.values().any(|fraction| !(0.0..=1.0).contains(fraction)) {
        return false;
    }
    let sum: f64 = BudgetCategory::ALL
        .iter()
        .map(|category| allocation.get(category).copied().unwrap_or(0.0))
        .sum();
    if (sum - 1.0).abs() > 0.01 {
        return false;
    }

    state.government.budget_allocation = allocation;
    if let Some(player) = state.players.get_mut(player_id) {
        player.hidden_stats.influence = (player.hidden_stats.influence + 2.0).min(100.0);
    }
    true
}

fn publish_statement(state: &mut WorldState, player_id: &polity_types::PlayerId, action: &QueuedAction) -> bool {
    let Some(text) = action.params.text.clone() else {
        return false;
    };
    if text.is_empty() {
        return false;
    }
    let truncated: String = text.chars().take(500).collect();
    let tick = state.meta.tick;

    let Some(player) = state.players.get_mut(player_id) else {
        return false;
    };
    let RoleData::Politician(politician) = &mut player.role_data else {
        return false;
    };
    politician.statements.push(polity_types::Statement {
        text: truncated,
        tick,
    });
    player.hidden_stats.reputation = (player.hidden_stats.reputation + 0.5).min(100.0);
    true
}

/// Construct an empty movement; used by world-seeding code when setting up
/// a game's starter movements.
pub fn empty_movement(
    id: polity_types::MovementId,
    name: impl Into<String>,
    movement_type: polity_types::MovementType,
    created_tick: u64,
) -> Movement {
    Movement {
        id,
        name: name.into(),
        movement_type,
        strength: 0.0,
        demands: Vec::new(),
        member_player_ids: Vec::new(),
        created_tick,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use polity_types::{ActionParams, PlayerId, Role};

    fn state_with_player(role: Role) -> (WorldState, PlayerId) {
        let mut state = WorldState::new("srv", 6, 1);
        let id = PlayerId::new("p-1");
        state
            .players
            .insert(id.clone(), Player::new(id.clone(), "alice", role, 0));
        (state, id)
    }

    #[test]
    fn work_adds_wealth_gdp_and_satisfaction_when_employed() {
        let (mut state, id) = state_with_player(Role::Citizen);
        if let Some(player) = state.players.get_mut(&id) {
            if let RoleData::Citizen(c) = &mut player.role_data {
                c.employed = true;
                c.employer_wage_level = 2.0;
            }
        }
        let gdp_before = state.economy.gdp;
        let satisfaction_before = state.society.satisfaction;
        let action = QueuedAction {
            player_id: id.clone(),
            submitted_tick: 0,
            action_type: ActionType::Work,
            params: ActionParams::empty(),
        };
        state.players.get_mut(&id).unwrap().actions_pending.push(action);
        let counts = resolve_actions(&mut state);
        assert_eq!(counts.applied, 1);
        assert!(state.players[&id].visible_stats.wealth > 100.0);
        assert!(state.economy.gdp > gdp_before);
        assert!(state.society.satisfaction > satisfaction_before);
    }

    #[test]
    fn unemployed_work_accrues_economic_pressure_by_five() {
        let (mut state, id) = state_with_player(Role::Citizen);
        let action = QueuedAction {
            player_id: id.clone(),
            submitted_tick: 0,
            action_type: ActionType::Work,
            params: ActionParams::empty(),
        };
        state.players.get_mut(&id).unwrap().actions_pending.push(action);
        resolve_actions(&mut state);
        let RoleData::Citizen(c) = &state.players[&id].role_data else {
            return assert!(false, "expected citizen role data");
        };
        assert!((c.economic_pressure - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn action_wrong_for_role_is_rejected() {
        let (mut state, id) = state_with_player(Role::Citizen);
        let action = QueuedAction {
            player_id: id.clone(),
            submitted_tick: 0,
            action_type: ActionType::ProposeLaw,
            params: ActionParams {
                text: Some("text".to_owned()),
                ..ActionParams::empty()
            },
        };
        state.players.get_mut(&id).unwrap().actions_pending.push(action);
        let counts = resolve_actions(&mut state);
        assert_eq!(counts.rejected, 1);
        assert!(state.laws.is_empty());
    }

    #[test]
    fn allocate_budget_rejects_non_unit_sum() {
        let (mut state, id) = state_with_player(Role::Politician);
        let mut allocation = std::collections::BTreeMap::new();
        allocation.insert(BudgetCategory::Welfare, 0.9);
        let action = QueuedAction {
            player_id: id.clone(),
            submitted_tick: 0,
            action_type: ActionType::AllocateBudget,
            params: ActionParams {
                allocation: Some(allocation),
                ..ActionParams::empty()
            },
        };
        state.players.get_mut(&id).unwrap().actions_pending.push(action);
        let counts = resolve_actions(&mut state);
        assert_eq!(counts.rejected, 1);
    }

    #[test]
    fn consume_with_no_wealth_accrues_economic_pressure() {
        let (mut state, id) = state_with_player(Role::Citizen);
        let action = QueuedAction {
            player_id: id.clone(),
            submitted_tick: 0,
            action_type: ActionType::Consume,
            params: ActionParams::empty(),
        };
        state.players.get_mut(&id).unwrap().actions_pending.push(action);
        resolve_actions(&mut state);
        let RoleData::Citizen(c) = &state.players[&id].role_data else {
            return assert!(false, "expected citizen role data");
        };
        assert!((c.economic_pressure - 8.0).abs() < f64::EPSILON);
    }
}
