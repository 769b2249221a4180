//! Round robin via the circle method: rotate all participants but one
//! around a fixed anchor, one rotation per round.

use crate::models::{
    BracketStructure, BracketTag, EngineError, GameMatch, MatchType, SlotEntry, StructureSummary,
    Team,
};

/// Pairings of participant indices 0..n-1 for each round.
///
/// When n is odd a phantom slot is added; the participant paired with it
/// sits the round out, so the result runs n rounds instead of n-1.
pub(crate) fn circle_rounds(n: usize) -> Vec<Vec<(usize, usize)>> {
    if n < 2 {
        return Vec::new();
    }
    // Effective count, rounded up to even; index n is the phantom bye slot.
    let m = if n % 2 == 0 { n } else { n + 1 };
    let mut rounds = Vec::with_capacity(m - 1);
    for r in 0..m - 1 {
        let mut pairs = Vec::with_capacity(m / 2);
        // The anchor (index m-1) meets index r, the rest rotate around it.
        let first = (r % (m - 1), m - 1);
        for (a, b) in std::iter::once(first).chain((1..m / 2).map(|i| {
            (
                (r + i) % (m - 1),
                (r + m - 1 - i) % (m - 1),
            )
        })) {
            // Skip pairings against the phantom slot.
            if a < n && b < n {
                pairs.push((a, b));
            }
        }
        rounds.push(pairs);
    }
    rounds
}

/// Round robin bracket: every team plays every other team exactly once,
/// no team twice in the same round. Matches carry no advancement pointers;
/// standings decide the outcome.
pub(crate) fn build_round_robin(teams: &[Team]) -> Result<BracketStructure, EngineError> {
    let ids = super::bracket::ranked_ids(teams);
    let rounds = circle_rounds(ids.len());
    let total_rounds = rounds.len() as u32;

    let mut matches: Vec<GameMatch> = Vec::new();
    for (r, pairs) in rounds.iter().enumerate() {
        for (p, &(a, b)) in pairs.iter().enumerate() {
            matches.push(GameMatch::new(
                r as u32 + 1,
                p as u32 + 1,
                MatchType::PoolPlay,
                BracketTag::Pool('A'),
                SlotEntry::Team(ids[a]),
                SlotEntry::Team(ids[b]),
            ));
        }
    }

    let match_count = matches.len();
    Ok(BracketStructure {
        matches,
        total_rounds,
        summary: StructureSummary {
            format_label: "round_robin".to_string(),
            team_count: teams.len(),
            match_count,
            bye_count: 0,
            pool_count: 1,
        },
    })
}
