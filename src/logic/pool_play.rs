//! Pool play: snake-draft distribution into pools, round robin inside each
//! pool, and a cross-pool knockout stage.

use crate::logic::bracket::{knockout_stage, ranked_ids, Feed};
use crate::logic::round_robin::circle_rounds;
use crate::models::{
    BracketStructure, BracketTag, EngineError, GameMatch, MatchType, SlotEntry, StructureSummary,
    Team, TeamId,
};
use log::debug;

/// Distribute team ids into `pool_count` pools by snake draft: pools are
/// filled left-to-right, then right-to-left, alternating each pass.
pub(crate) fn snake_draft(ids: &[TeamId], pool_count: usize) -> Vec<Vec<TeamId>> {
    let mut pools: Vec<Vec<TeamId>> = vec![Vec::new(); pool_count];
    for (i, &id) in ids.iter().enumerate() {
        let pass = i / pool_count;
        let col = i % pool_count;
        let pool = if pass % 2 == 0 {
            col
        } else {
            pool_count - 1 - col
        };
        pools[pool].push(id);
    }
    pools
}

/// Pool-play bracket: snake-drafted pools, per-pool round robin, knockout
/// stage sized to advance_from_pool x pool_count.
///
/// First-round knockout pairing crosses adjacent pools: position p of pool k
/// meets position advance_from_pool - p + 1 of pool k+1. Writes each team's
/// `pool` letter.
pub(crate) fn build_pool_play(
    teams: &mut [Team],
    pool_count: usize,
    advance_from_pool: usize,
    teams_per_pool: Option<usize>,
) -> Result<BracketStructure, EngineError> {
    let n = teams.len();
    if pool_count == 0 || advance_from_pool == 0 || pool_count > n {
        return Err(EngineError::InvalidPoolConfig {
            pool_count,
            teams_per_pool: teams_per_pool.unwrap_or(0),
            team_count: n,
        });
    }
    if let Some(per_pool) = teams_per_pool {
        if pool_count * per_pool != n {
            return Err(EngineError::InvalidPoolConfig {
                pool_count,
                teams_per_pool: per_pool,
                team_count: n,
            });
        }
    }

    let ids = ranked_ids(teams);
    let pools = snake_draft(&ids, pool_count);

    // Record each team's pool letter.
    for (k, pool) in pools.iter().enumerate() {
        let letter = pool_letter(k);
        for id in pool {
            if let Some(team) = teams.iter_mut().find(|t| t.id == *id) {
                team.pool = Some(letter);
            }
        }
    }

    // Round robin inside each pool; pools share round numbers 1..R.
    let mut matches: Vec<GameMatch> = Vec::new();
    let mut pool_rounds = 0;
    for (k, pool) in pools.iter().enumerate() {
        let letter = pool_letter(k);
        let rounds = circle_rounds(pool.len());
        pool_rounds = pool_rounds.max(rounds.len() as u32);
        for (r, pairs) in rounds.iter().enumerate() {
            for (p, &(a, b)) in pairs.iter().enumerate() {
                matches.push(GameMatch::new(
                    r as u32 + 1,
                    p as u32 + 1,
                    MatchType::PoolPlay,
                    BracketTag::Pool(letter),
                    SlotEntry::Team(pool[a]),
                    SlotEntry::Team(pool[b]),
                ));
            }
        }
    }
    debug!(
        "pool play: {} pools, {} pool matches over {} rounds",
        pool_count,
        matches.len(),
        pool_rounds
    );

    // Knockout entries: adjacent pool pairs, position p vs advance - p + 1.
    let mut entries: Vec<Feed> = Vec::with_capacity(advance_from_pool * pool_count);
    let mut k = 0;
    while k < pool_count {
        if k + 1 < pool_count {
            for p in 1..=advance_from_pool {
                entries.push(qualifier(pool_letter(k), p));
                entries.push(qualifier(pool_letter(k + 1), advance_from_pool - p + 1));
            }
            k += 2;
        } else {
            // Odd trailing pool: its qualifiers pair among themselves.
            for p in 1..=advance_from_pool / 2 {
                entries.push(qualifier(pool_letter(k), p));
                entries.push(qualifier(pool_letter(k), advance_from_pool - p + 1));
            }
            if advance_from_pool % 2 == 1 {
                entries.push(qualifier(pool_letter(k), advance_from_pool / 2 + 1));
            }
            k += 1;
        }
    }
    knockout_stage(&mut matches, entries, pool_rounds + 1, BracketTag::Knockout);

    let match_count = matches.len();
    let total_rounds = matches.iter().map(|m| m.round).max().unwrap_or(0);
    Ok(BracketStructure {
        matches,
        total_rounds,
        summary: StructureSummary {
            format_label: "pool_play".to_string(),
            team_count: n,
            match_count,
            bye_count: 0,
            pool_count,
        },
    })
}

fn pool_letter(k: usize) -> char {
    (b'A' + (k % 26) as u8) as char
}

fn qualifier(letter: char, position: usize) -> Feed {
    Feed::Fixed(SlotEntry::Placeholder(format!(
        "Pool {} #{}",
        letter, position
    )))
}
