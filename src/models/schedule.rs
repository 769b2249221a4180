//! Scheduling data structures: slots, constraints, team schedules, conflicts,
//! and optimizer output.

use crate::models::court::{AvailabilityWindow, CourtId, TimeWindow};
use crate::models::game::MatchId;
use crate::models::team::TeamId;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One bookable interval on one court. Generated at game-duration
/// granularity across the daily window for every day in the date range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub court_id: CourtId,
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub available: bool,
}

impl ScheduleSlot {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }
}

/// A blackout period during which no games may be scheduled.
/// Court-scoped when `court_id` is set, global otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blackout {
    pub window: TimeWindow,
    pub court_id: Option<CourtId>,
}

/// Scheduling constraints supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Minimum rest between the end of a team's game and the start of its next.
    pub min_rest_minutes: i64,
    pub max_games_per_day: u32,
    pub daily_start: NaiveTime,
    pub daily_end: NaiveTime,
    pub game_duration_minutes: i64,
    /// Per-court availability overrides; a listed court is only usable
    /// inside its windows.
    pub court_availability: HashMap<CourtId, Vec<AvailabilityWindow>>,
    /// Per-team windows during which the team cannot play.
    pub team_unavailable: HashMap<TeamId, Vec<TimeWindow>>,
    pub blackouts: Vec<Blackout>,
    pub preferred_courts: HashMap<TeamId, Vec<CourtId>>,
    /// Match ids to schedule first, in order.
    pub priority_matches: Vec<MatchId>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_rest_minutes: 60,
            max_games_per_day: 3,
            daily_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            daily_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            game_duration_minutes: 60,
            court_availability: HashMap::new(),
            team_unavailable: HashMap::new(),
            blackouts: Vec::new(),
            preferred_courts: HashMap::new(),
            priority_matches: Vec::new(),
        }
    }
}

/// One game on a team's running schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamGame {
    pub match_id: MatchId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub court_id: CourtId,
    pub opponent: Option<TeamId>,
    /// Minutes between the previous game's end and this game's start.
    /// None for the team's first game.
    pub rest_before: Option<i64>,
}

/// A team's assigned games in start order, built up during optimization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSchedule {
    pub games: Vec<TeamGame>,
}

impl TeamSchedule {
    /// The latest game by start time.
    pub fn last_game(&self) -> Option<&TeamGame> {
        self.games.last()
    }

    /// Number of games on the given calendar date.
    pub fn games_on(&self, date: NaiveDate) -> u32 {
        self.games.iter().filter(|g| g.start.date() == date).count() as u32
    }
}

/// A match with its assigned court and time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMatch {
    pub match_id: MatchId,
    pub court_id: CourtId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// How bad a conflict is.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Why a match could not be placed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// No slot on any court satisfied the constraints.
    CourtConflict,
    /// Neither team slot was resolved, match skipped.
    UnresolvedTeams,
    /// No court qualified during court assignment.
    NoCourtAvailable,
}

/// Soft failure: a match the engine could not place. Returned as data,
/// never aborts the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub match_id: MatchId,
    pub kind: ConflictKind,
    pub severity: Severity,
    pub description: String,
}

/// Aggregate quality numbers for a produced schedule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Minutes between the first and last scheduled start.
    pub total_duration_minutes: i64,
    /// Average realized rest across all team games that had a prior game.
    pub average_rest_minutes: f64,
    /// Booked slots / generated slots.
    pub utilization_rate: f64,
    /// Team games with less than 60 minutes of realized rest.
    pub back_to_back_count: u32,
}

/// Full optimizer output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub scheduled: Vec<ScheduledMatch>,
    pub conflicts: Vec<ScheduleConflict>,
    pub metrics: ScheduleMetrics,
    /// Per-court booked/generated ratio.
    pub court_utilization: HashMap<CourtId, f64>,
    pub team_schedules: HashMap<TeamId, TeamSchedule>,
}
