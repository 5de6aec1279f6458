//! Phase 8 (on-demand, not part of the deterministic tick): the View
//! Projector.
//!
//! Produces the player-facing snapshot returned by the `view` HTTP route.
//! Raw economy/society scalars are never exposed directly -- each is
//! bucketed into a small categorical value with seeded noise added first,
//! so the bucket doesn't flicker for noise-sized changes tick to tick, and
//! so two players never derive the exact hidden scalar from repeated
//! queries. Hidden stats and law-level vote tallies never appear here
//! regardless of role.

use polity_types::{Headline, PlayerId, Role, RoleData, Rumor, WorldState};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Draw the deterministic uniform `[0, 1)` value for `(seed, idx)`.
///
/// This is the `PRNG` referenced by `spec.md` §4.8: a fixed noise seed
/// combined with a small per-quantity index, not the sequential draw
/// counter the tick engine uses for ids (see [`crate::noise`]).
fn prng(seed: u64, idx: u64) -> f64 {
    const TWO_POW_53: f64 = 9_007_199_254_740_992.0;

    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(idx.to_le_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    let first_eight: [u8; 8] = digest
        .get(0..8)
        .and_then(|slice| slice.try_into().ok())
        .unwrap_or([0; 8]);
    let as_u64 = u64::from_le_bytes(first_eight);
    let shifted = as_u64 >> 11;
    #[allow(clippy::cast_precision_loss)]
    let value = shifted as f64;
    value / TWO_POW_53
}

/// `noise(base, mag, idx) = base + (PRNG(seed, idx) - 0.5) * 2 * mag`.
fn noise(seed: u64, base: f64, mag: f64, idx: u64) -> f64 {
    base + (prng(seed, idx) - 0.5) * 2.0 * mag
}

/// A coarse three-way trend categorical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Rising beyond the dead band.
    Rising,
    /// Within the dead band of its recent value.
    Stable,
    /// Falling beyond the dead band.
    Falling,
}

fn trend_from(signed_delta: f64, dead_band: f64) -> Trend {
    if signed_delta > dead_band {
        Trend::Rising
    } else if signed_delta < -dead_band {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

/// A coarse four-way availability categorical for the goods market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Ratio `> 1.3`.
    Abundant,
    /// Ratio `> 0.8`.
    Normal,
    /// Ratio `> 0.5`.
    Scarce,
    /// Ratio `<= 0.5`.
    Shortage,
}

impl Availability {
    fn from_ratio(ratio: f64) -> Self {
        if ratio > 1.3 {
            Self::Abundant
        } else if ratio > 0.8 {
            Self::Normal
        } else if ratio > 0.5 {
            Self::Scarce
        } else {
            Self::Shortage
        }
    }
}

/// A coarse four-way vague-approval categorical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalVague {
    /// `> 65`.
    Popular,
    /// `> 40`.
    Mixed,
    /// `> 20`.
    Unpopular,
    /// `<= 20`.
    Crisis,
}

impl ApprovalVague {
    fn from_score(score: f64) -> Self {
        if score > 65.0 {
            Self::Popular
        } else if score > 40.0 {
            Self::Mixed
        } else if score > 20.0 {
            Self::Unpopular
        } else {
            Self::Crisis
        }
    }
}

/// A coarse three-way sentiment categorical, used for personal mood reads
/// that the spec names but does not give explicit noise/thresholds for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// Satisfied / low risk.
    Content,
    /// Middling.
    Neutral,
    /// Dissatisfied / high risk.
    Discontent,
}

impl Mood {
    fn from_satisfaction(satisfaction: f64) -> Self {
        if satisfaction >= 70.0 {
            Self::Content
        } else if satisfaction >= 30.0 {
            Self::Neutral
        } else {
            Self::Discontent
        }
    }

    fn from_strike_risk(strike_risk: f64) -> Self {
        if strike_risk < 0.3 {
            Self::Content
        } else if strike_risk < 0.7 {
            Self::Neutral
        } else {
            Self::Discontent
        }
    }
}

/// Nation-level summary shown to every player regardless of role.
#[derive(Debug, Clone, Serialize)]
pub struct EconomySummary {
    /// Whether prices are rising, falling, or stable.
    pub price_trend: Trend,
    /// Whether goods are abundant, normal, scarce, or a shortage.
    pub availability: Availability,
}

/// Society-level summary shown to every player regardless of role.
#[derive(Debug, Clone, Serialize)]
pub struct SocietySummary {
    /// Names of currently active movements (membership counts withheld).
    pub active_movements: Vec<String>,
}

/// Government-level summary shown to every player regardless of role.
#[derive(Debug, Clone, Serialize)]
pub struct GovernmentSummary {
    /// Vague bucketed overall approval.
    pub approval_vague: ApprovalVague,
    /// The current fractional budget allocation (this is not hidden).
    pub budget_allocation: std::collections::BTreeMap<polity_types::BudgetCategory, f64>,
    /// Number of currently active laws.
    pub active_law_count: u32,
}

/// Media summary, passed through verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct MediaSummary {
    /// Current headlines.
    pub headlines: Vec<Headline>,
    /// Current rumors.
    pub rumors: Vec<Rumor>,
}

/// Role-specific detail, never exposing `hidden_stats`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleView {
    /// A citizen's own employment/mood snapshot.
    Citizen {
        /// Whether this citizen currently holds a job.
        employed: bool,
        /// Mood bucketed from personal satisfaction context.
        mood: Mood,
    },
    /// A business owner's own production/market snapshot.
    BusinessOwner {
        /// Number of employees.
        employees: f64,
        /// Current effective production.
        production: f64,
        /// Current wage level paid to employees.
        wage_level: f64,
        /// Labor mood bucketed from strike risk.
        labor_mood: Mood,
    },
    /// A politician's own legislative record.
    Politician {
        /// Count of laws proposed.
        laws_proposed: u32,
        /// Count of laws that reached `active`.
        laws_passed: u32,
        /// Noise-perturbed read of overall approval, rounded.
        approval_estimate: f64,
        /// Noise-perturbed read of unemployment, rounded to one decimal.
        unemployment_estimate: f64,
    },
}

/// The full player-facing snapshot for one `view` request.
#[derive(Debug, Clone, Serialize)]
pub struct WorldView {
    /// The current tick.
    pub tick: u64,
    /// The current phase.
    pub phase: polity_types::GamePhase,
    /// The requesting player's visible wealth, rounded to 2 decimals.
    pub wealth: f64,
    /// Nation-level economy summary.
    pub economy: EconomySummary,
    /// Nation-level society summary.
    pub society: SocietySummary,
    /// Government summary.
    pub government: GovernmentSummary,
    /// Media summary, passed through verbatim.
    pub media: MediaSummary,
    /// Role-specific detail for the requesting player.
    pub role_view: RoleView,
}

/// Project a `WorldView` for `viewer_id`.
///
/// The noise seed is `meta.seed * 1000 + meta.tick`, per `spec.md` §4.8 --
/// deterministic per tick, independent of how many times a player queries
/// their view within that tick.
///
/// Returns `None` if `viewer_id` does not name a living player.
pub fn project(state: &WorldState, viewer_id: &PlayerId) -> Option<WorldView> {
    let player = state.players.get(viewer_id)?;
    let seed = u64::from(state.meta.seed) * 1000 + state.meta.tick;

    let price_trend = trend_from(
        noise(seed, state.economy.market.price_index - 1.0, 0.1, 1),
        0.05,
    );

    let ratio = state.economy.market.supply / state.economy.market.demand.max(1.0);
    let availability = Availability::from_ratio(noise(seed, ratio, 0.15, 2));

    let approval_vague = ApprovalVague::from_score(noise(seed, state.government.approval.overall, 10.0, 3));

    let role_view = match (&player.role, &player.role_data) {
        (Role::Citizen, RoleData::Citizen(c)) => RoleView::Citizen {
            employed: c.employed,
            mood: Mood::from_satisfaction(state.society.satisfaction),
        },
        (Role::BusinessOwner, RoleData::BusinessOwner(b)) => RoleView::BusinessOwner {
            employees: b.employees,
            production: b.production_capacity,
            wage_level: b.wage_level,
            labor_mood: Mood::from_strike_risk(b.strike_risk),
        },
        (Role::Politician, RoleData::Politician(p)) => {
            let approval_estimate = noise(seed, state.government.approval.overall, 8.0, 4).round();
            let unemployment_estimate =
                (noise(seed, state.economy.unemployment, 3.0, 5) * 10.0).round() / 10.0;
            RoleView::Politician {
                laws_proposed: p.laws_proposed,
                laws_passed: p.laws_passed,
                approval_estimate,
                unemployment_estimate,
            }
        }
        _ => return None,
    };

    Some(WorldView {
        tick: state.meta.tick,
        phase: state.meta.phase,
        wealth: (player.visible_stats.wealth * 100.0).round() / 100.0,
        economy: EconomySummary { price_trend, availability },
        society: SocietySummary {
            active_movements: state.society.movements.iter().map(|m| m.name.clone()).collect(),
        },
        government: GovernmentSummary {
            approval_vague,
            budget_allocation: state.government.budget_allocation.clone(),
            active_law_count: state.government.active_law_count,
        },
        media: MediaSummary {
            headlines: state.media.headlines.clone(),
            rumors: state.media.rumors.clone(),
        },
        role_view,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use polity_types::Player;

    #[test]
    fn projects_citizen_view_without_hidden_stats() {
        let mut state = WorldState::new("srv", 6, 1);
        let id = PlayerId::new("p-1");
        state.players.insert(id.clone(), Player::new(id.clone(), "alice", Role::Citizen, 0));
        let view = project(&state, &id).expect("projects");
        assert!(matches!(view.role_view, RoleView::Citizen { .. }));
    }

    #[test]
    fn unknown_viewer_returns_none() {
        let state = WorldState::new("srv", 6, 1);
        assert!(project(&state, &PlayerId::new("ghost")).is_none());
    }

    #[test]
    fn approval_vague_bucket_boundaries() {
        assert_eq!(ApprovalVague::from_score(10.0), ApprovalVague::Crisis);
        assert_eq!(ApprovalVague::from_score(30.0), ApprovalVague::Unpopular);
        assert_eq!(ApprovalVague::from_score(50.0), ApprovalVague::Mixed);
        assert_eq!(ApprovalVague::from_score(90.0), ApprovalVague::Popular);
    }

    #[test]
    fn same_seed_and_tick_reproduce_identical_view() {
        let mut state = WorldState::new("srv", 6, 1);
        let id = PlayerId::new("p-1");
        state.players.insert(id.clone(), Player::new(id.clone(), "alice", Role::Politician, 0));
        let first = project(&state, &id).expect("projects");
        let second = project(&state, &id).expect("projects");
        assert_eq!(
            format!("{:?}", first.role_view),
            format!("{:?}", second.role_view)
        );
    }

    #[test]
    fn wealth_is_rounded_to_two_decimals() {
        let mut state = WorldState::new("srv", 6, 1);
        let id = PlayerId::new("p-1");
        let mut player = Player::new(id.clone(), "alice", Role::Citizen, 0);
        player.visible_stats.wealth = 12.3456;
        state.players.insert(id.clone(), player);
        let view = project(&state, &id).expect("projects");
        assert!((view.wealth - 12.35).abs() < f64::EPSILON);
    }
}
