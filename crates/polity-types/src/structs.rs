//! Core entity structs making up `WorldState`.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{
    ActionType, BudgetCategory, EventSource, EventStatus, GamePhase, LawStatus, MovementType, Role,
};
use crate::ids::{EventId, LawId, MovementId, PlayerId};

/// A single modifier instruction: a dot-path leaf, an operation, and the
/// operand(s) needed to compute the new value.
///
/// See `polity_kernel` for resolution and application semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    /// Dot-path to the target leaf, e.g. `"economy.gdp"`.
    pub variable: String,
    /// The mutation to apply.
    pub operation: crate::enums::Operation,
    /// The operand. For `clamp` this is ignored in favor of `min`/`max`.
    pub value: f64,
    /// Optional explicit lower bound (used by `clamp`; otherwise advisory).
    pub min: Option<f64>,
    /// Optional explicit upper bound (used by `clamp`; otherwise advisory).
    pub max: Option<f64>,
}

impl Modifier {
    /// Build a `set` modifier.
    pub fn set(variable: impl Into<String>, value: f64) -> Self {
        Self {
            variable: variable.into(),
            operation: crate::enums::Operation::Set,
            value,
            min: None,
            max: None,
        }
    }

    /// Build an `add` modifier.
    pub fn add(variable: impl Into<String>, value: f64) -> Self {
        Self {
            variable: variable.into(),
            operation: crate::enums::Operation::Add,
            value,
            min: None,
            max: None,
        }
    }

    /// Build a `multiply` modifier.
    pub fn multiply(variable: impl Into<String>, value: f64) -> Self {
        Self {
            variable: variable.into(),
            operation: crate::enums::Operation::Multiply,
            value,
            min: None,
            max: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Meta
// ---------------------------------------------------------------------------

/// Tick-cycle bookkeeping for a single game instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// The addressable game/server id.
    pub server_id: String,
    /// Monotonically increasing tick counter, starting at 0.
    pub tick: u64,
    /// Real-world hours between ticks.
    pub tick_interval_hours: u32,
    /// Absolute instant the next tick is due.
    pub tick_deadline: DateTime<Utc>,
    /// Current phase of the tick cycle.
    pub phase: GamePhase,
    /// 32-bit deterministic seed, advanced by +1 after every tick.
    pub seed: u32,
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// The government budget sub-record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Budget {
    /// Revenue collected this tick.
    pub revenue: f64,
    /// Spending committed this tick (constant between `allocate_budget` calls).
    pub spending: f64,
    /// Accumulated reserves, clamped to `[-10000, 100000]`.
    pub reserves: f64,
    /// `spending - revenue`.
    pub deficit: f64,
}

/// The goods market sub-record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Market {
    /// Total supply, clamped to `[0, 100000]`.
    pub supply: f64,
    /// Total demand, clamped to `[0, 100000]`.
    pub demand: f64,
    /// Price index, clamped to `[0.01, 1000]`.
    pub price_index: f64,
    /// Whether `demand > 1.2 * supply` as of the last recalculation.
    pub shortage: bool,
}

/// Nation-level economic state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    /// Gross domestic product, clamped to `[0, 100000]`.
    pub gdp: f64,
    /// Change in GDP from the last recalculation.
    pub gdp_delta: f64,
    /// Inflation rate, clamped to `[-20, 500]`.
    pub inflation: f64,
    /// Unemployment rate, clamped to `[0, 100]`.
    pub unemployment: f64,
    /// Flat tax rate, clamped to `[0, 100]`.
    pub tax_rate: f64,
    /// Fraction of owed tax actually collected, clamped to `[0, 1]`.
    pub tax_compliance: f64,
    /// Economy-wide wage index, clamped to `[0.01, 100]`.
    pub wage_index: f64,
    /// Government budget.
    pub budget: Budget,
    /// Goods market.
    pub market: Market,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            gdp: 10_000.0,
            gdp_delta: 0.0,
            inflation: 2.0,
            unemployment: 8.0,
            tax_rate: 20.0,
            tax_compliance: 0.8,
            wage_index: 1.0,
            budget: Budget {
                revenue: 0.0,
                spending: 1_000.0,
                reserves: 5_000.0,
                deficit: 0.0,
            },
            market: Market {
                supply: 10_000.0,
                demand: 10_000.0,
                price_index: 1.0,
                shortage: false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Society
// ---------------------------------------------------------------------------

/// A social/political movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Stable id.
    pub id: MovementId,
    /// Display name.
    pub name: String,
    /// Ideological category.
    pub movement_type: MovementType,
    /// Organizational strength, `[0, 1]`.
    pub strength: f64,
    /// Free-text list of demands.
    pub demands: Vec<String>,
    /// Member player ids; deduplicated on every join.
    pub member_player_ids: Vec<PlayerId>,
    /// The tick this movement was created.
    pub created_tick: u64,
}

/// Nation-level social state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Society {
    /// Regime stability, `[0, 100]`.
    pub stability: f64,
    /// Public trust in government, `[0, 100]`.
    pub public_trust: f64,
    /// General satisfaction, `[0, 100]`.
    pub satisfaction: f64,
    /// Radicalization level, `[0, 100]`.
    pub radicalization: f64,
    /// Protest pressure, `[0, 1]`.
    pub protest_pressure: f64,
    /// Ordered sequence of active movements.
    pub movements: Vec<Movement>,
}

impl Default for Society {
    fn default() -> Self {
        Self {
            stability: 70.0,
            public_trust: 55.0,
            satisfaction: 55.0,
            radicalization: 10.0,
            protest_pressure: 0.05,
            movements: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Government
// ---------------------------------------------------------------------------

/// The four approval sub-scores tracked on the government.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApprovalScores {
    /// Aggregate headline approval.
    pub overall: f64,
    /// Approval of economic stewardship.
    pub economic: f64,
    /// Approval of social policy.
    pub social: f64,
    /// Approval of security/enforcement posture.
    pub security: f64,
}

impl Default for ApprovalScores {
    fn default() -> Self {
        Self {
            overall: 50.0,
            economic: 50.0,
            social: 50.0,
            security: 50.0,
        }
    }
}

impl ApprovalScores {
    /// Visit each sub-score with its name, for uniform clamp/update passes.
    pub fn as_mut_array(&mut self) -> [(&'static str, &mut f64); 4] {
        [
            ("overall", &mut self.overall),
            ("economic", &mut self.economic),
            ("social", &mut self.social),
            ("security", &mut self.security),
        ]
    }
}

/// Government-level aggregate state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Government {
    /// Approval sub-scores.
    pub approval: ApprovalScores,
    /// Fractional allocation across the five budget categories; sums to 1 ± 0.01.
    pub budget_allocation: BTreeMap<BudgetCategory, f64>,
    /// Number of currently-active laws.
    pub active_law_count: u32,
    /// The tick of the next scheduled election, if any.
    pub election_tick: Option<u64>,
}

impl Default for Government {
    fn default() -> Self {
        let mut budget_allocation = BTreeMap::new();
        budget_allocation.insert(BudgetCategory::Welfare, 0.25);
        budget_allocation.insert(BudgetCategory::Infrastructure, 0.2);
        budget_allocation.insert(BudgetCategory::Enforcement, 0.2);
        budget_allocation.insert(BudgetCategory::Education, 0.2);
        budget_allocation.insert(BudgetCategory::Discretionary, 0.15);
        Self {
            approval: ApprovalScores::default(),
            budget_allocation,
            active_law_count: 0,
            election_tick: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// Hidden per-player stats, never exposed through the View Projector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HiddenStats {
    /// Political influence accrued through actions.
    pub influence: f64,
    /// Standing with other players/history.
    pub reputation: f64,
    /// How afraid this player is of enforcement (grows with corruption crackdowns).
    pub fear: f64,
    /// Accumulated corruption.
    pub corruption: f64,
    /// Legacy score carried into `HistoryState` on death/game end.
    pub historical_legacy: f64,
}

/// Visible per-player stats, safe to include (possibly rounded) in a view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisibleStats {
    /// Personal wealth.
    pub wealth: f64,
    /// The movement this player currently belongs to, if any.
    pub movement_id: Option<MovementId>,
}

/// Citizen-specific mutable sub-record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CitizenData {
    /// Whether this citizen currently holds a job.
    ///
    /// Set only by mechanisms outside the Action Resolver (world seeding /
    /// an external labor-market process) -- no action handler assigns it.
    pub employed: bool,
    /// The employer this citizen is attached to, if any.
    ///
    /// Like `employed`, never written by an action handler (see
    /// `spec.md` §9 open questions).
    pub employer_id: Option<PlayerId>,
    /// The effective wage level this citizen's employer pays, if employed.
    pub employer_wage_level: f64,
    /// Accumulated economic distress, `[0, 100]`.
    pub economic_pressure: f64,
    /// Whether this citizen has already voted in the current tick.
    pub voted_this_tick: bool,
}

/// Business-owner-specific mutable sub-record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessData {
    /// Raw production capacity before strike-risk derating.
    pub production_capacity: f64,
    /// Probability-like risk of a labor strike, `[0, 1]`.
    pub strike_risk: f64,
    /// Number of employees.
    pub employees: f64,
    /// Wage level paid to employees, `[0.1, 10]`.
    pub wage_level: f64,
    /// Personal tax evasion level, `[0, 1]`.
    pub tax_evasion: f64,
}

impl Default for BusinessData {
    fn default() -> Self {
        Self {
            production_capacity: 10.0,
            strike_risk: 0.1,
            employees: 5.0,
            wage_level: 1.0,
            tax_evasion: 0.0,
        }
    }
}

/// A dated public statement published by a politician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// The statement body, capped at 500 characters.
    pub text: String,
    /// The tick it was published.
    pub tick: u64,
}

/// Politician-specific mutable sub-record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoliticianData {
    /// Count of laws this politician has proposed.
    pub laws_proposed: u32,
    /// Count of this politician's proposed laws that reached `active`.
    pub laws_passed: u32,
    /// Published statements, most recent last.
    pub statements: Vec<Statement>,
    /// Hidden: wealth received via lobbying, never shown in a view.
    pub lobby_money_received: f64,
}

/// Role-specific mutable data, tagged by `Role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleData {
    /// See `CitizenData`.
    Citizen(CitizenData),
    /// See `BusinessData`.
    BusinessOwner(BusinessData),
    /// See `PoliticianData`.
    Politician(PoliticianData),
}

impl RoleData {
    /// The `Role` this data corresponds to.
    pub const fn role(&self) -> Role {
        match self {
            Self::Citizen(_) => Role::Citizen,
            Self::BusinessOwner(_) => Role::BusinessOwner,
            Self::Politician(_) => Role::Politician,
        }
    }
}

/// A queued action submission, pending resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedAction {
    /// The submitting player.
    pub player_id: PlayerId,
    /// The tick it was submitted in.
    pub submitted_tick: u64,
    /// The requested action type (untyped variants become `Unknown`).
    pub action_type: ActionType,
    /// Structured, per-type parameters.
    pub params: crate::actions::ActionParams,
}

/// A player record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Fixed role, set at join time.
    pub role: Role,
    /// The tick this player joined.
    pub joined_tick: u64,
    /// Whether the player is still alive/participating.
    pub alive: bool,
    /// Hidden stats, never exposed via a view.
    pub hidden_stats: HiddenStats,
    /// Visible stats (subject to view projection, not raw exposure).
    pub visible_stats: VisibleStats,
    /// Role-specific sub-record.
    pub role_data: RoleData,
    /// Actions queued for the current tick, bounded to 5.
    pub actions_pending: Vec<QueuedAction>,
    /// Resolved action groups from the last 10 ticks, newest last.
    pub actions_history: VecDeque<Vec<QueuedAction>>,
}

impl Player {
    /// Maximum pending actions per tick.
    pub const MAX_PENDING: usize = 5;
    /// Maximum retained tick-groups of resolved actions.
    pub const MAX_HISTORY: usize = 10;

    /// Construct a new player of the given role with default role data.
    pub fn new(id: PlayerId, name: impl Into<String>, role: Role, joined_tick: u64) -> Self {
        let role_data = match role {
            Role::Citizen => RoleData::Citizen(CitizenData::default()),
            Role::BusinessOwner => RoleData::BusinessOwner(BusinessData::default()),
            Role::Politician => RoleData::Politician(PoliticianData::default()),
        };
        Self {
            id,
            name: name.into(),
            role,
            joined_tick,
            alive: true,
            hidden_stats: HiddenStats::default(),
            visible_stats: VisibleStats {
                wealth: 100.0,
                movement_id: None,
            },
            role_data,
            actions_pending: Vec::new(),
            actions_history: VecDeque::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Laws
// ---------------------------------------------------------------------------

/// Vote tallies on a law.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tallies {
    /// Votes in favor.
    pub for_votes: f64,
    /// Votes against.
    pub against_votes: f64,
    /// Abstentions.
    pub abstain_votes: f64,
}

/// The judiciary's binding of a law's free text to concrete modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudiciaryInterpretation {
    /// The judiciary's plain-language interpretation.
    pub interpretation: String,
    /// Ambiguities the judiciary flagged.
    pub ambiguities: Vec<String>,
    /// The concrete implementation: affected variables and modifiers.
    pub implementation: ImplementationPlan,
    /// Set true if the Kernel rejected the modifier batch.
    pub rejected_by_core: bool,
}

/// The concrete effect a law's interpretation has on state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImplementationPlan {
    /// Dot-paths this interpretation touches.
    pub affected_variables: Vec<String>,
    /// The modifier batch to apply each tick while the law is active.
    pub modifiers: Vec<Modifier>,
}

/// A proposed, voted-on, or enacted law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Law {
    /// Stable id.
    pub id: LawId,
    /// The proposing politician.
    pub proposer: PlayerId,
    /// The tick this law was proposed.
    pub proposed_tick: u64,
    /// Free text, capped at 2000 characters.
    pub original_text: String,
    /// Current lifecycle status.
    pub status: LawStatus,
    /// Vote tallies.
    pub tallies: Tallies,
    /// The bound judiciary interpretation, once available.
    pub judiciary_interpretation: Option<JudiciaryInterpretation>,
    /// The tick this law entered `active`.
    pub activated_tick: Option<u64>,
    /// The tick this law was repealed, if it was.
    pub repealed_tick: Option<u64>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A synthetic or advisor-originated game event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Stable id.
    pub id: EventId,
    /// The origin of this event, which also fixes its processing priority.
    pub source: EventSource,
    /// The tick this event was created.
    pub tick: u64,
    /// A free-text category, e.g. `"economic_crisis"`.
    pub event_type: String,
    /// Severity, `[1, 5]`.
    pub severity: u8,
    /// Current lifecycle status.
    pub status: EventStatus,
    /// Human-readable description.
    pub description: String,
    /// The modifier batch this event applies, if any.
    pub modifiers: Vec<Modifier>,
    /// How long the event's effects persist once applied.
    pub duration_ticks: Option<u64>,
    /// The tick at or after which the event expires.
    pub expires_tick: Option<u64>,
    /// A narrative hook surfaced to players/advisors.
    pub narrative_hook: String,
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// A media headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    /// Stable id.
    pub id: String,
    /// The tick this headline was published.
    pub tick: u64,
    /// Headline text.
    pub text: String,
    /// Perceived truthfulness, `[0, 1]`.
    pub truth_score: f64,
}

/// A longer-form media article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Stable id.
    pub id: String,
    /// The tick this article was published.
    pub tick: u64,
    /// Article body.
    pub text: String,
    /// Perceived truthfulness, `[0, 1]`.
    pub truth_score: f64,
}

/// An unconfirmed rumor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rumor {
    /// Stable id.
    pub id: String,
    /// The tick this rumor surfaced.
    pub tick: u64,
    /// Rumor text.
    pub text: String,
    /// Perceived credibility, `[0, 1]`.
    pub credibility: f64,
}

/// The media subsystem's current content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaState {
    /// Ordered headlines, oldest first.
    pub headlines: Vec<Headline>,
    /// Ordered articles, oldest first.
    pub articles: Vec<Article>,
    /// Ordered rumors, oldest first.
    pub rumors: Vec<Rumor>,
}

// ---------------------------------------------------------------------------
// Tick log
// ---------------------------------------------------------------------------

/// Outcome counts for one category of tick-processed item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeCounts {
    /// Number that succeeded/applied.
    pub applied: u32,
    /// Number that were rejected.
    pub rejected: u32,
    /// Number that expired (events only).
    pub expired: u32,
}

/// One tick's audit-log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLogEntry {
    /// The tick this entry describes.
    pub tick: u64,
    /// Action outcome counts.
    pub actions: OutcomeCounts,
    /// Event outcome counts.
    pub events: OutcomeCounts,
    /// Law outcome counts (transitions this tick).
    pub laws: OutcomeCounts,
    /// SHA-256 content hash of the post-finalize state, hex-encoded.
    pub content_hash: String,
    /// Raw advisor outputs/fallback markers for this tick, for audit.
    pub advisor_outputs: serde_json::Value,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// A named historical era.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Era {
    /// Era name.
    pub name: String,
    /// The tick this era began.
    pub tick_start: u64,
    /// The tick this era ended, `None` for the open-ended final era.
    pub tick_end: Option<u64>,
    /// A short historian-authored summary.
    pub summary: String,
}

/// A player's historical reputation record, retained after death.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReputationRecord {
    /// The legacy score carried from `hidden_stats.historical_legacy`.
    pub legacy_score: f64,
    /// Notable acts attributed to this player by the Historian stage.
    pub notable_acts: Vec<String>,
}

/// Long-run historical state, independent of any single player's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    /// Ordered eras; the last entry is open-ended (`tick_end: None`) until closed.
    pub eras: Vec<Era>,
    /// Reputation records keyed by player id; ids outlive the player record.
    pub reputations: BTreeMap<PlayerId, ReputationRecord>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            eras: vec![Era {
                name: "Founding".to_owned(),
                tick_start: 0,
                tick_end: None,
                summary: String::new(),
            }],
            reputations: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// WorldState
// ---------------------------------------------------------------------------

/// The single owning container for one game instance's entire state.
///
/// Persisted as one opaque blob (see `polity_db::WorldStore`). All
/// cross-references inside are by stable string id, never by pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Tick-cycle bookkeeping.
    pub meta: Meta,
    /// Economic state.
    pub economy: Economy,
    /// Social state.
    pub society: Society,
    /// Government state.
    pub government: Government,
    /// Players keyed by id.
    pub players: BTreeMap<PlayerId, Player>,
    /// Laws, in proposal order.
    pub laws: Vec<Law>,
    /// Events, in creation order.
    pub events: Vec<GameEvent>,
    /// Media content.
    pub media: MediaState,
    /// Per-tick audit log, capped at 50 entries (oldest trimmed first).
    pub tick_log: VecDeque<TickLogEntry>,
    /// Long-run historical state.
    pub history: HistoryState,
}

impl WorldState {
    /// Maximum retained tick-log entries.
    pub const MAX_TICK_LOG: usize = 50;

    /// Construct a fresh world state at tick 0 for a new server.
    pub fn new(server_id: impl Into<String>, tick_interval_hours: u32, seed: u32) -> Self {
        let now = Utc::now();
        Self {
            meta: Meta {
                server_id: server_id.into(),
                tick: 0,
                tick_interval_hours,
                tick_deadline: now
                    + chrono::Duration::hours(i64::from(tick_interval_hours)),
                phase: GamePhase::AcceptingActions,
                seed,
            },
            economy: Economy::default(),
            society: Society::default(),
            government: Government::default(),
            players: BTreeMap::new(),
            laws: Vec::new(),
            events: Vec::new(),
            media: MediaState::default(),
            tick_log: VecDeque::new(),
            history: HistoryState::default(),
        }
    }

    /// Find a law by id.
    pub fn law(&self, id: &LawId) -> Option<&Law> {
        self.laws.iter().find(|l| &l.id == id)
    }

    /// Find a law by id, mutably.
    pub fn law_mut(&mut self, id: &LawId) -> Option<&mut Law> {
        self.laws.iter_mut().find(|l| &l.id == id)
    }

    /// Find a movement by id, mutably, searching across society.
    pub fn movement_mut(&mut self, id: &MovementId) -> Option<&mut Movement> {
        self.society.movements.iter_mut().find(|m| &m.id == id)
    }

    /// Append a tick-log entry, trimming from the front if over capacity.
    pub fn push_tick_log(&mut self, entry: TickLogEntry) {
        self.tick_log.push_back(entry);
        while self.tick_log.len() > Self::MAX_TICK_LOG {
            self.tick_log.pop_front();
        }
    }
}
