//! Seeder: orders teams into seed positions 1..N per seeding method.

use crate::models::{SeedingMethod, Team};
use rand::seq::SliceRandom;
use rand::Rng;

/// Order `teams` and assign seeds 1..N in place.
///
/// The rng is only consulted for `SeedingMethod::Random`; tests inject a
/// seeded generator to make that path deterministic.
pub fn seed_teams(teams: &mut Vec<Team>, method: SeedingMethod, rng: &mut impl Rng) {
    match method {
        SeedingMethod::Manual => {
            // Missing seed sorts last.
            teams.sort_by_key(|t| t.seed.unwrap_or(u32::MAX));
        }
        SeedingMethod::Random => {
            teams.shuffle(rng);
        }
        // Snake ordering is identical to ranked; the snaking itself happens
        // when teams are distributed into pools.
        SeedingMethod::Ranked | SeedingMethod::Snake => {
            teams.sort_by(|a, b| {
                b.record
                    .win_percentage()
                    .partial_cmp(&a.record.win_percentage())
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| {
                        b.record
                            .point_differential()
                            .cmp(&a.record.point_differential())
                    })
            });
        }
    }

    for (i, team) in teams.iter_mut().enumerate() {
        team.seed = Some(i as u32 + 1);
    }
}
