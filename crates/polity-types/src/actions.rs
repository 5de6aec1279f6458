//! Structured per-action-type parameters submitted by clients.

use serde::{Deserialize, Serialize};

use crate::enums::{BudgetCategory, VoteChoice};
use crate::ids::{LawId, MovementId, PlayerId};

/// Structured parameters for a queued action.
///
/// Deserialized from whatever JSON body a client posts; an action type the
/// server does not recognize (see `ActionType::Unknown`) carries `None`
/// here and is a no-op in the Action Resolver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionParams {
    /// `vote_law` / `vote_law_politician`: the target law.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law_id: Option<LawId>,
    /// `vote_law` / `vote_law_politician`: the ballot choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice: Option<VoteChoice>,
    /// `join_movement`: the target movement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_id: Option<MovementId>,
    /// `set_wages`: the new wage level, `[0.1, 10]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wage_level: Option<f64>,
    /// `lobby`: the target politician.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_politician_id: Option<PlayerId>,
    /// `lobby`: the wealth offered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested: Option<f64>,
    /// `evade_taxes`: the magnitude of the evasion increase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// `propose_law`: the free-text law body, capped at 2000 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// `allocate_budget`: the replacement fractional allocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation: Option<std::collections::BTreeMap<BudgetCategory, f64>>,
}

impl ActionParams {
    /// An empty parameter set, for action types that take none (`work`,
    /// `consume`, `leave_movement`, `produce`, `comply_taxes`).
    pub fn empty() -> Self {
        Self::default()
    }
}
