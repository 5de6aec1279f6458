//! Resolves a dot-path string into a mutable `f64` leaf inside a `WorldState`.

use polity_types::{PlayerId, RoleData, WorldState};

use crate::error::KernelError;

/// Resolve `path` to a mutable reference to its `f64` leaf.
///
/// # Errors
/// Returns [`KernelError::VariableNotFound`] if no known leaf matches.
pub fn resolve_mut<'a>(
    state: &'a mut WorldState,
    path: &str,
) -> Result<&'a mut f64, KernelError> {
    let mut segments = path.split('.');
    let root = segments.next().unwrap_or_default();

    match root {
        "economy" => resolve_economy(state, &mut segments, path),
        "society" => resolve_society(state, &mut segments, path),
        "government" => resolve_government(state, &mut segments, path),
        "players" => resolve_player(state, &mut segments, path),
        _ => Err(KernelError::VariableNotFound(path.to_owned())),
    }
}

fn resolve_economy<'a>(
    state: &'a mut WorldState,
    segments: &mut std::str::Split<'_, char>,
    full_path: &str,
) -> Result<&'a mut f64, KernelError> {
    let economy = &mut state.economy;
    match segments.next() {
        Some("gdp") => Ok(&mut economy.gdp),
        Some("gdp_delta") => Ok(&mut economy.gdp_delta),
        Some("inflation") => Ok(&mut economy.inflation),
        Some("unemployment") => Ok(&mut economy.unemployment),
        Some("tax_rate") => Ok(&mut economy.tax_rate),
        Some("tax_compliance") => Ok(&mut economy.tax_compliance),
        Some("wage_index") => Ok(&mut economy.wage_index),
        Some("budget") => match segments.next() {
            Some("revenue") => Ok(&mut economy.budget.revenue),
            Some("spending") => Ok(&mut economy.budget.spending),
            Some("reserves") => Ok(&mut economy.budget.reserves),
            Some("deficit") => Ok(&mut economy.budget.deficit),
            _ => Err(KernelError::VariableNotFound(full_path.to_owned())),
        },
        Some("market") => match segments.next() {
            Some("supply") => Ok(&mut economy.market.supply),
            Some("demand") => Ok(&mut economy.market.demand),
            Some("price_index") => Ok(&mut economy.market.price_index),
            _ => Err(KernelError::VariableNotFound(full_path.to_owned())),
        },
        _ => Err(KernelError::VariableNotFound(full_path.to_owned())),
    }
}

fn resolve_society<'a>(
    state: &'a mut WorldState,
    segments: &mut std::str::Split<'_, char>,
    full_path: &str,
) -> Result<&'a mut f64, KernelError> {
    let society = &mut state.society;
    match segments.next() {
        Some("stability") => Ok(&mut society.stability),
        Some("public_trust") => Ok(&mut society.public_trust),
        Some("satisfaction") => Ok(&mut society.satisfaction),
        Some("radicalization") => Ok(&mut society.radicalization),
        Some("protest_pressure") => Ok(&mut society.protest_pressure),
        _ => Err(KernelError::VariableNotFound(full_path.to_owned())),
    }
}

fn resolve_government<'a>(
    state: &'a mut WorldState,
    segments: &mut std::str::Split<'_, char>,
    full_path: &str,
) -> Result<&'a mut f64, KernelError> {
    let approval = &mut state.government.approval;
    match segments.next() {
        Some("approval") => match segments.next() {
            Some("overall") => Ok(&mut approval.overall),
            Some("economic") => Ok(&mut approval.economic),
            Some("social") => Ok(&mut approval.social),
            Some("security") => Ok(&mut approval.security),
            _ => Err(KernelError::VariableNotFound(full_path.to_owned())),
        },
        _ => Err(KernelError::VariableNotFound(full_path.to_owned())),
    }
}

fn resolve_player<'a>(
    state: &'a mut WorldState,
    segments: &mut std::str::Split<'_, char>,
    full_path: &str,
) -> Result<&'a mut f64, KernelError> {
    let id = segments.next().unwrap_or_default();
    let player = state
        .players
        .get_mut(&PlayerId::new(id))
        .ok_or_else(|| KernelError::VariableNotFound(full_path.to_owned()))?;

    match segments.next() {
        Some("visible_stats") => match segments.next() {
            Some("wealth") => Ok(&mut player.visible_stats.wealth),
            _ => Err(KernelError::VariableNotFound(full_path.to_owned())),
        },
        Some("hidden_stats") => match segments.next() {
            Some("influence") => Ok(&mut player.hidden_stats.influence),
            Some("reputation") => Ok(&mut player.hidden_stats.reputation),
            Some("fear") => Ok(&mut player.hidden_stats.fear),
            Some("corruption") => Ok(&mut player.hidden_stats.corruption),
            Some("historical_legacy") => Ok(&mut player.hidden_stats.historical_legacy),
            _ => Err(KernelError::VariableNotFound(full_path.to_owned())),
        },
        Some("role_data") => {
            let field = segments.next().unwrap_or_default();
            match (&mut player.role_data, field) {
                (RoleData::Citizen(c), "economic_pressure") => Ok(&mut c.economic_pressure),
                (RoleData::Citizen(c), "employer_wage_level") => Ok(&mut c.employer_wage_level),
                (RoleData::BusinessOwner(b), "production_capacity") => {
                    Ok(&mut b.production_capacity)
                }
                (RoleData::BusinessOwner(b), "strike_risk") => Ok(&mut b.strike_risk),
                (RoleData::BusinessOwner(b), "employees") => Ok(&mut b.employees),
                (RoleData::BusinessOwner(b), "wage_level") => Ok(&mut b.wage_level),
                (RoleData::BusinessOwner(b), "tax_evasion") => Ok(&mut b.tax_evasion),
                (RoleData::Politician(p), "lobby_money_received") => {
                    Ok(&mut p.lobby_money_received)
                }
                _ => Err(KernelError::VariableNotFound(full_path.to_owned())),
            }
        }
        _ => Err(KernelError::VariableNotFound(full_path.to_owned())),
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
    fn resolves_economy_leaf() {
        let mut state = sample_state();
        *resolve_mut(&mut state, "economy.gdp").expect("resolves") = 42.0;
        assert!((state.economy.gdp - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resolves_nested_budget_leaf() {
        let mut state = sample_state();
        *resolve_mut(&mut state, "economy.budget.reserves").expect("resolves") = 7.0;
        assert!((state.economy.budget.reserves - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_path_errors() {
        let mut state = sample_state();
        let err = resolve_mut(&mut state, "economy.nonexistent").unwrap_err();
        assert_eq!(err, KernelError::VariableNotFound("economy.nonexistent".to_owned()));
    }

    #[test]
    fn unknown_player_errors() {
        let mut state = sample_state();
        let err = resolve_mut(&mut state, "players.ghost.visible_stats.wealth").unwrap_err();
        assert!(matches!(err, KernelError::VariableNotFound(_)));
    }
}
