//! Shared data types for the political simulation engine.
//!
//! This crate holds only inert data: the `WorldState` tree, its entities,
//! and the enums/ids that address them. No simulation logic lives here —
//! see `polity_kernel` for state mutation and `polity_core` for the tick
//! pipeline.

mod actions;
mod enums;
mod ids;
mod structs;

pub use actions::ActionParams;
pub use enums::{
    ActionType, BudgetCategory, EventSource, EventStatus, GamePhase, LawStatus, MovementType,
    Operation, Role, VoteChoice,
};
pub use ids::{EventId, LawId, MovementId, PlayerId};
pub use structs::{
    ApprovalScores, Article, Budget, BusinessData, CitizenData, Economy, Era, Government,
    GameEvent, Headline, HiddenStats, HistoryState, ImplementationPlan, JudiciaryInterpretation,
    Law, Market, MediaState, Meta, Modifier, Movement, OutcomeCounts, Player, PoliticianData,
    QueuedAction, ReputationRecord, RoleData, Rumor, Society, Statement, Tallies, TickLogEntry,
    VisibleStats, WorldState,
};
