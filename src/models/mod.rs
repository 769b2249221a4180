//! Data structures for the engine: teams, matches, courts, schedules.

mod assignment;
mod bracket;
mod court;
mod game;
mod schedule;
mod team;

pub use assignment::{AssignmentCriteria, AssignmentMetrics, AssignmentResult, CourtAssignment};
pub use bracket::{BracketFormat, BracketStructure, EngineError, StructureSummary};
pub use court::{AvailabilityWindow, Court, CourtFeatures, CourtId, CourtQuality, TimeWindow};
pub use game::{
    Advancement, BracketTag, GameMatch, MatchId, MatchSource, MatchStatus, MatchType, Slot,
    SlotEntry, SourceOutcome,
};
pub use schedule::{
    Blackout, ConflictKind, Constraints, ScheduleConflict, ScheduleMetrics, ScheduleResult,
    ScheduleSlot, ScheduledMatch, Severity, TeamGame, TeamSchedule,
};
pub use team::{SeedingMethod, Team, TeamId, TeamRecord};
