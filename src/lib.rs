//! Tournament engine: bracket construction and match scheduling.
//!
//! Turns a seeded team list into a complete bracket topology for several
//! formats, then assigns time slots and courts under rest, capacity, and
//! availability constraints. Purely computational: callers own all inputs
//! and outputs, nothing persists between calls.

pub mod logic;
pub mod models;

pub use logic::{assign_courts, build_bracket, optimize_schedule, seed_teams};
pub use models::{
    Advancement, AssignmentCriteria, AssignmentMetrics, AssignmentResult, AvailabilityWindow,
    Blackout, BracketFormat, BracketStructure, BracketTag, ConflictKind, Constraints, Court,
    CourtAssignment, CourtFeatures, CourtId, CourtQuality, EngineError, GameMatch, MatchId,
    MatchSource, MatchStatus, MatchType, ScheduleConflict, ScheduleMetrics, ScheduleResult,
    ScheduleSlot, ScheduledMatch, SeedingMethod, Severity, Slot, SlotEntry, SourceOutcome,
    StructureSummary, Team, TeamGame, TeamId, TeamRecord, TeamSchedule, TimeWindow,
};
