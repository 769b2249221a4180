//! Bracket formats, builder output, and engine errors.

use crate::models::game::GameMatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors that abort an engine call. Soft failures (unplaceable matches)
/// are returned as conflict data instead, see `ScheduleConflict`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    /// Not enough teams for the requested format.
    InsufficientTeams { required: usize, actual: usize },
    /// pool_count x teams_per_pool does not match the team count.
    InvalidPoolConfig {
        pool_count: usize,
        teams_per_pool: usize,
        team_count: usize,
    },
    /// The court list is empty or has no active court.
    NoCourtsAvailable,
    /// endDate is before startDate.
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InsufficientTeams { required, actual } => {
                write!(f, "Need at least {} teams, got {}", required, actual)
            }
            EngineError::InvalidPoolConfig {
                pool_count,
                teams_per_pool,
                team_count,
            } => write!(
                f,
                "{} pools x {} teams per pool does not fit {} teams",
                pool_count, teams_per_pool, team_count
            ),
            EngineError::NoCourtsAvailable => write!(f, "No active courts available"),
            EngineError::InvalidDateRange { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

/// Tournament format to build a bracket for.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketFormat {
    SingleElimination {
        /// Append a third-place match fed by the semifinal losers.
        third_place: bool,
    },
    DoubleElimination,
    RoundRobin,
    PoolPlay {
        pool_count: usize,
        /// Teams advancing from each pool into the knockout stage.
        advance_from_pool: usize,
        /// When given, validated against pool_count x team count.
        teams_per_pool: Option<usize>,
    },
}

/// Headline numbers describing a built bracket.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StructureSummary {
    pub format_label: String,
    pub team_count: usize,
    pub match_count: usize,
    pub bye_count: usize,
    pub pool_count: usize,
}

/// Builder output: the match arena plus structure information. Advancement
/// pointers inside the matches are indices into `matches`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketStructure {
    pub matches: Vec<GameMatch>,
    pub total_rounds: u32,
    pub summary: StructureSummary,
}
