//! Team and seeding data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches, schedules, and lookups).
pub type TeamId = Uuid;

/// How teams are ordered into seed positions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingMethod {
    /// Teams already carry a seed; sort ascending, missing seed sorts last.
    #[default]
    Manual,
    /// Shuffle with a caller-supplied rng, seed = shuffled position.
    Random,
    /// Sort by win percentage, tie-break by point differential.
    Ranked,
    /// Same ordering as ranked; the snaking happens at pool distribution.
    Snake,
}

/// Aggregate win/loss record used for ranked seeding tie-breaks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub points_for: i32,
    pub points_against: i32,
}

impl TeamRecord {
    /// Fraction of games won, 0.0 when no games played.
    pub fn win_percentage(&self) -> f64 {
        let played = self.wins + self.losses;
        if played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(played)
        }
    }

    /// Points scored minus points conceded.
    pub fn point_differential(&self) -> i32 {
        self.points_for - self.points_against
    }
}

/// A team entering the bracket. `seed` and `pool` are written by the
/// seeder / bracket builder; everything else is caller-supplied input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Integer rank, 1 = strongest. None until seeded (or for manual seeding input).
    pub seed: Option<u32>,
    /// Pool letter assigned during pool-play distribution.
    pub pool: Option<char>,
    pub record: TeamRecord,
}

impl Team {
    /// Create a new unseeded team with an empty record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            seed: None,
            pool: None,
            record: TeamRecord::default(),
        }
    }

    /// Create a team with an aggregate record (for ranked seeding input).
    pub fn with_record(name: impl Into<String>, record: TeamRecord) -> Self {
        Self {
            record,
            ..Self::new(name)
        }
    }
}
