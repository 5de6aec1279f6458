//! Enumerations shared across the data model.

use serde::{Deserialize, Serialize};

/// A player's role, fixed at join time.
///
/// Determines which action types are legal for the player (see
/// `polity_core::action_resolver::allowed_actions`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// An ordinary citizen: work, consume, vote, join/leave movements.
    Citizen,
    /// A business owner: production, wages, lobbying, tax posture.
    BusinessOwner,
    /// A politician: law proposal/voting, budget allocation, statements.
    Politician,
}

/// The current phase of a game's tick cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Players may submit actions; the default resting phase.
    AcceptingActions,
    /// The tick's deterministic phases (resolution through events) are running.
    Processing,
    /// The advisor pipeline is being sequenced for this tick.
    AiEvaluation,
    /// The tick has finalized; about to roll back to `AcceptingActions`.
    Resolved,
}

/// A social/political movement's ideological category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Pushes for incremental institutional change.
    Reform,
    /// Anti-establishment, broad-based.
    Populist,
    /// Favors extra-institutional or violent tactics.
    Radical,
    /// Seeks regional independence.
    Separatist,
    /// Organized around worker interests.
    Labor,
    /// Organized around commercial/ownership interests.
    Business,
}

/// A law's position in its lifecycle state machine.
///
/// Transition graph (see `polity_core::law`):
/// `proposed -> voting -> {active, rejected}`, `active -> repealed`.
/// `invalidated` is reachable only via an explicit external action and is
/// otherwise terminal like `rejected`/`repealed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawStatus {
    /// Just proposed; awaiting the next tick to enter voting.
    Proposed,
    /// Open for `vote_law`/`vote_law_politician` submissions.
    Voting,
    /// Passed; in force and awaiting/holding a judiciary interpretation.
    Active,
    /// Was active, then repealed.
    Repealed,
    /// Failed the vote.
    Rejected,
    /// Struck down by an external mechanism outside the Action Resolver.
    Invalidated,
}

/// A ballot choice on a law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    /// In favor.
    For,
    /// Opposed.
    Against,
    /// Present, no position.
    Abstain,
}

/// The five budget allocation categories; fractions must sum to 1 ± 0.01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    /// Welfare spending.
    Welfare,
    /// Infrastructure spending.
    Infrastructure,
    /// Enforcement/policing spending.
    Enforcement,
    /// Education spending.
    Education,
    /// Unallocated/discretionary spending.
    Discretionary,
}

impl BudgetCategory {
    /// All five categories, in a fixed iteration order.
    pub const ALL: [Self; 5] = [
        Self::Welfare,
        Self::Infrastructure,
        Self::Enforcement,
        Self::Education,
        Self::Discretionary,
    ];
}

/// The origin of a `GameEvent`, which also determines its processing priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Emitted directly by deterministic core logic (e.g. the Watchdog).
    CoreEngine,
    /// Bound from a law's judiciary interpretation.
    Judiciary,
    /// Emitted by the Crisis advisor stage.
    Crisis,
    /// Emitted by the Reaction advisor stage.
    PoliticalReaction,
    /// Emitted by the Analyst advisor stage.
    StateAnalyst,
    /// Emitted by the Media advisor stage.
    Media,
}

impl EventSource {
    /// Fixed processing priority, highest first (see `spec.md` §4.6).
    pub const fn priority(self) -> u16 {
        match self {
            Self::CoreEngine => 100,
            Self::Judiciary => 85,
            Self::Crisis => 70,
            Self::PoliticalReaction => 60,
            Self::StateAnalyst => 50,
            Self::Media => 10,
        }
    }
}

/// The lifecycle status of a `GameEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Queued, not yet processed this tick.
    Pending,
    /// Successfully applied (possibly with no modifiers, narrative-only).
    Applied,
    /// Its modifier batch failed and was rolled back.
    Rejected,
    /// Was applied and has now passed its `expires_tick`.
    Expired,
}

/// A modifier's mutation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Replace the leaf value outright.
    Set,
    /// Add (possibly negative) to the leaf value.
    Add,
    /// Scale the leaf value.
    Multiply,
    /// Restrict the existing value between `min` and `max`.
    Clamp,
}

/// The fixed set of action types the Action Resolver understands.
///
/// An unrecognized action type from a client is represented as `Unknown`
/// and is a silent no-op per `spec.md` §4.2/§7.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Citizen: earn wages if employed, else accrue economic pressure.
    Work,
    /// Citizen: spend wealth against market supply.
    Consume,
    /// Citizen: vote on a law in the `voting` status.
    VoteLaw,
    /// Citizen: join a movement.
    JoinMovement,
    /// Citizen: leave the current movement.
    LeaveMovement,
    /// Business owner: convert production capacity into market supply.
    Produce,
    /// Business owner: set the wage level paid to employees.
    SetWages,
    /// Business owner: transfer wealth to a politician for influence.
    Lobby,
    /// Business owner: increase personal tax evasion.
    EvadeTaxes,
    /// Business owner: reduce personal tax evasion.
    ComplyTaxes,
    /// Politician: propose a new law.
    ProposeLaw,
    /// Politician: vote on a law with triple weight.
    VoteLawPolitician,
    /// Politician: replace the budget allocation.
    AllocateBudget,
    /// Politician: publish a public statement.
    PublishStatement,
    /// Any action type the server does not recognize.
    #[serde(other)]
    Unknown,
}

impl ActionType {
    /// The roles permitted to submit this action type (per `spec.md` §6).
    pub const fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Self::Work | Self::Consume | Self::VoteLaw | Self::JoinMovement | Self::LeaveMovement => {
                &[Role::Citizen]
            }
            Self::Produce | Self::SetWages | Self::Lobby | Self::EvadeTaxes | Self::ComplyTaxes => {
                &[Role::BusinessOwner]
            }
            Self::ProposeLaw
            | Self::VoteLawPolitician
            | Self::AllocateBudget
            | Self::PublishStatement => &[Role::Politician],
            Self::Unknown => &[],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn event_priority_orders_correctly() {
        assert!(EventSource::CoreEngine.priority() > EventSource::Judiciary.priority());
        assert!(EventSource::Judiciary.priority() > EventSource::Crisis.priority());
        assert!(EventSource::Crisis.priority() > EventSource::PoliticalReaction.priority());
        assert!(EventSource::PoliticalReaction.priority() > EventSource::StateAnalyst.priority());
        assert!(EventSource::StateAnalyst.priority() > EventSource::Media.priority());
    }

    #[test]
    fn unknown_action_type_has_no_allowed_roles() {
        let raw = "\"some_made_up_action\"";
        let parsed: ActionType = serde_json::from_str(raw).expect("unknown variant falls back");
        assert_eq!(parsed, ActionType::Unknown);
        assert!(parsed.allowed_roles().is_empty());
    }

    #[test]
    fn action_allowed_roles_match_role_table() {
        assert_eq!(ActionType::Work.allowed_roles(), &[Role::Citizen]);
        assert_eq!(ActionType::Produce.allowed_roles(), &[Role::BusinessOwner]);
        assert_eq!(ActionType::ProposeLaw.allowed_roles(), &[Role::Politician]);
    }
}
