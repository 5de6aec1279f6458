//! The Hard Constraints Table: absolute `[min, max]` bounds applied to
//! every leaf after any modifier touches it, regardless of the modifier's
//! own operation or explicit bounds.
//!
//! Keyed on the *canonical* path: player-scoped paths have their id
//! segment replaced with `*` (see [`canonicalize`]).

/// Look up the hard bound for a canonical path, if one is defined.
///
/// A leaf with no entry here is left unclamped by the Kernel (its value
/// is still required to be finite).
pub fn bound_for(canonical_path: &str) -> Option<(f64, f64)> {
    HARD_CONSTRAINTS
        .iter()
        .find(|(path, _)| *path == canonical_path)
        .map(|(_, bound)| *bound)
}

/// Replace the id segment of a `players.<id>.*` path with `*`.
pub fn canonicalize(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('.').collect();
    if segments.first() == Some(&"players") {
        if let Some(id_segment) = segments.get_mut(1) {
            *id_segment = "*";
        }
    }
    segments.join(".")
}

const HARD_CONSTRAINTS: &[(&str, (f64, f64))] = &[
    ("economy.gdp", (0.0, 100_000.0)),
    ("economy.inflation", (-20.0, 500.0)),
    ("economy.unemployment", (0.0, 100.0)),
    ("economy.tax_rate", (0.0, 100.0)),
    ("economy.tax_compliance", (0.0, 1.0)),
    ("economy.wage_index", (0.01, 100.0)),
    ("economy.budget.reserves", (-10_000.0, 100_000.0)),
    ("economy.market.supply", (0.0, 100_000.0)),
    ("economy.market.demand", (0.0, 100_000.0)),
    ("economy.market.price_index", (0.01, 1_000.0)),
    ("society.stability", (0.0, 100.0)),
    ("society.public_trust", (0.0, 100.0)),
    ("society.satisfaction", (0.0, 100.0)),
    ("society.radicalization", (0.0, 100.0)),
    ("society.protest_pressure", (0.0, 1.0)),
    ("government.approval.overall", (0.0, 100.0)),
    ("government.approval.economic", (0.0, 100.0)),
    ("government.approval.social", (0.0, 100.0)),
    ("government.approval.security", (0.0, 100.0)),
    ("players.*.role_data.economic_pressure", (0.0, 100.0)),
    ("players.*.role_data.tax_evasion", (0.0, 1.0)),
    ("players.*.role_data.wage_level", (0.1, 10.0)),
    ("players.*.role_data.strike_risk", (0.0, 1.0)),
];

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_player_scoped_paths() {
        assert_eq!(
            canonicalize("players.p-123.hidden_stats.influence"),
            "players.*.hidden_stats.influence"
        );
        assert_eq!(canonicalize("economy.gdp"), "economy.gdp");
    }

    #[test]
    fn finds_bound_for_player_scoped_path() {
        let canonical = canonicalize("players.p-9.role_data.wage_level");
        assert_eq!(bound_for(&canonical), Some((0.1, 10.0)));
    }

    #[test]
    fn unbounded_path_returns_none() {
        assert_eq!(bound_for("economy.gdp_delta"), None);
    }
}
