//! Court-assignment criteria and results.

use crate::models::court::CourtId;
use crate::models::game::MatchId;
use crate::models::schedule::ScheduleConflict;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller-supplied knobs for court assignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignmentCriteria {
    /// Explicit importance per match; falls back to match-type importance.
    pub importance: Option<HashMap<MatchId, u8>>,
    /// Courts each team prefers to play on.
    pub team_preferences: HashMap<TeamId, Vec<CourtId>>,
    /// Courts reserved for specific matches; other matches skip them.
    pub reservations: HashMap<CourtId, Vec<MatchId>>,
    /// Run the load-rebalancing pass after the greedy assignment.
    pub rebalance: bool,
    /// Assumed match length when checking timed matches for court overlap.
    pub game_duration_minutes: i64,
}

impl Default for AssignmentCriteria {
    fn default() -> Self {
        Self {
            importance: None,
            team_preferences: HashMap::new(),
            reservations: HashMap::new(),
            rebalance: false,
            game_duration_minutes: 60,
        }
    }
}

/// One match → court decision with the score that won.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourtAssignment {
    pub match_id: MatchId,
    pub court_id: CourtId,
    pub score: i32,
}

/// Aggregate numbers for an assignment run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentMetrics {
    pub assigned_count: u32,
    pub unassigned_count: u32,
    pub average_score: f64,
    /// Max court load minus min court load after assignment.
    pub load_spread: u32,
}

/// Full court-assigner output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub assignments: Vec<CourtAssignment>,
    pub unassigned: Vec<MatchId>,
    pub conflicts: Vec<ScheduleConflict>,
    pub court_load: HashMap<CourtId, u32>,
    pub metrics: AssignmentMetrics,
}
