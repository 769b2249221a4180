//! Engine logic: seeding, bracket construction, scheduling, court assignment.

mod bracket;
mod court_assignment;
mod double_elim;
mod pool_play;
mod round_robin;
mod scheduling;
mod seeding;

pub use bracket::build_bracket;
pub use court_assignment::assign_courts;
pub use scheduling::optimize_schedule;
pub use seeding::seed_teams;
