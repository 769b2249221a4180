//! Match records: the bracket arena, slot entries, and advancement pointers.

use crate::models::court::CourtId;
use crate::models::team::TeamId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Category of a match, ordered by scheduling importance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    PoolPlay,
    Consolation,
    Placement,
    Bracket,
    Quarterfinal,
    Semifinal,
    ThirdPlace,
    Final,
    Championship,
}

impl MatchType {
    /// Importance rank used to order matches for scheduling and court
    /// assignment (championship first, pool play last).
    pub fn importance(&self) -> u8 {
        match self {
            MatchType::Championship => 9,
            MatchType::Final => 8,
            MatchType::ThirdPlace => 7,
            MatchType::Semifinal => 6,
            MatchType::Quarterfinal => 5,
            MatchType::Bracket => 4,
            MatchType::Placement => 3,
            MatchType::Consolation => 2,
            MatchType::PoolPlay => 1,
        }
    }
}

/// Which sub-bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketTag {
    Winners,
    Losers,
    GrandFinal,
    Knockout,
    /// Pool letter (A, B, C, ...).
    Pool(char),
}

/// One of the two team slots of a match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Home,
    Away,
}

/// Contents of a team slot: a resolved team, a textual placeholder
/// ("Winner of R1M2"), or nothing yet.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotEntry {
    Team(TeamId),
    Placeholder(String),
    Empty,
}

impl SlotEntry {
    /// The team id if this slot is resolved.
    pub fn team(&self) -> Option<TeamId> {
        match self {
            SlotEntry::Team(id) => Some(*id),
            _ => None,
        }
    }
}

/// Forward pointer: where a result sends a team. `target` is an index into
/// the bracket's match arena; this index+slot pair is the fixed contract the
/// progression collaborator re-walks after each recorded result.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Advancement {
    pub target: usize,
    pub slot: Slot,
}

/// Which result of a source match feeds a slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutcome {
    Winner,
    Loser,
}

/// Backward pointer: the arena index of a match whose outcome feeds this one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSource {
    pub source: usize,
    pub outcome: SourceOutcome,
}

/// Lifecycle of a match inside the engine. Result recording happens outside.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// One or both slots unresolved, or no time/court assigned yet.
    #[default]
    Pending,
    /// A time slot and court have been assigned.
    Scheduled,
}

/// A single match in the bracket arena.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// Round number, 1-based.
    pub round: u32,
    /// Position within the round, 1-based.
    pub position: u32,
    pub match_type: MatchType,
    pub bracket: BracketTag,
    pub home: SlotEntry,
    pub away: SlotEntry,
    /// Where the winner advances, None for terminal matches.
    pub winner_to: Option<Advancement>,
    /// Where the loser drops (losers bracket, third-place), usually None.
    pub loser_to: Option<Advancement>,
    /// Matches whose outcomes feed this one (backward pointers).
    pub feeds: Vec<MatchSource>,
    pub scheduled_time: Option<NaiveDateTime>,
    pub court_id: Option<CourtId>,
    pub status: MatchStatus,
}

impl GameMatch {
    pub fn new(
        round: u32,
        position: u32,
        match_type: MatchType,
        bracket: BracketTag,
        home: SlotEntry,
        away: SlotEntry,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            position,
            match_type,
            bracket,
            home,
            away,
            winner_to: None,
            loser_to: None,
            feeds: Vec::new(),
            scheduled_time: None,
            court_id: None,
            status: MatchStatus::Pending,
        }
    }

    /// Resolved team ids in this match (0, 1, or 2 entries).
    pub fn team_ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.home.team().into_iter().chain(self.away.team())
    }

    /// True when neither slot holds a resolved team.
    pub fn is_unresolved(&self) -> bool {
        self.home.team().is_none() && self.away.team().is_none()
    }
}
