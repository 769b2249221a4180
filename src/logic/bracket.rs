//! BracketBuilder: format dispatch, single elimination, and the shared
//! arena/advancement machinery the other formats build on.

use crate::logic::{double_elim, pool_play, round_robin};
use crate::models::{
    Advancement, BracketFormat, BracketStructure, BracketTag, EngineError, GameMatch, MatchSource,
    MatchType, Slot, SlotEntry, SourceOutcome, StructureSummary, Team, TeamId,
};
use log::debug;

/// Build the full match topology for `format`.
///
/// Teams should already be seeded (see `seed_teams`); teams without a seed
/// take their list order. Pool play writes each team's `pool` field.
pub fn build_bracket(
    teams: &mut Vec<Team>,
    format: BracketFormat,
) -> Result<BracketStructure, EngineError> {
    if teams.len() < 2 {
        return Err(EngineError::InsufficientTeams {
            required: 2,
            actual: teams.len(),
        });
    }
    match format {
        BracketFormat::SingleElimination { third_place } => {
            build_single_elimination(teams, third_place)
        }
        BracketFormat::DoubleElimination => double_elim::build_double_elimination(teams),
        BracketFormat::RoundRobin => round_robin::build_round_robin(teams),
        BracketFormat::PoolPlay {
            pool_count,
            advance_from_pool,
            teams_per_pool,
        } => pool_play::build_pool_play(teams, pool_count, advance_from_pool, teams_per_pool),
    }
}

/// Where a match slot gets its occupant from.
pub(crate) enum Feed {
    /// A known entry: a resolved team or a fixed placeholder.
    Fixed(SlotEntry),
    /// The winner of an earlier match (arena index).
    Winner(usize),
    /// The loser of an earlier match (arena index).
    Loser(usize),
}

/// Display label for a slot fed by another match's outcome.
fn source_label(source: &GameMatch, outcome: SourceOutcome) -> String {
    let word = match outcome {
        SourceOutcome::Winner => "Winner",
        SourceOutcome::Loser => "Loser",
    };
    match source.bracket {
        BracketTag::Losers => format!("{} of LR{}M{}", word, source.round, source.position),
        BracketTag::GrandFinal => format!("{} of GF", word),
        _ => format!("{} of R{}M{}", word, source.round, source.position),
    }
}

fn feed_entry(matches: &[GameMatch], feed: &Feed) -> SlotEntry {
    match feed {
        Feed::Fixed(entry) => entry.clone(),
        Feed::Winner(i) => SlotEntry::Placeholder(source_label(&matches[*i], SourceOutcome::Winner)),
        Feed::Loser(i) => SlotEntry::Placeholder(source_label(&matches[*i], SourceOutcome::Loser)),
    }
}

fn wire(matches: &mut [GameMatch], feed: &Feed, target: usize, slot: Slot) {
    match *feed {
        Feed::Fixed(_) => {}
        Feed::Winner(source) => {
            matches[source].winner_to = Some(Advancement { target, slot });
            matches[target].feeds.push(MatchSource {
                source,
                outcome: SourceOutcome::Winner,
            });
        }
        Feed::Loser(source) => {
            matches[source].loser_to = Some(Advancement { target, slot });
            matches[target].feeds.push(MatchSource {
                source,
                outcome: SourceOutcome::Loser,
            });
        }
    }
}

/// Append a match fed by `home`/`away`, wiring forward and backward
/// pointers. Returns the new match's arena index.
pub(crate) fn attach(
    matches: &mut Vec<GameMatch>,
    round: u32,
    position: u32,
    match_type: MatchType,
    bracket: BracketTag,
    home: Feed,
    away: Feed,
) -> usize {
    let home_entry = feed_entry(matches, &home);
    let away_entry = feed_entry(matches, &away);
    let idx = matches.len();
    matches.push(GameMatch::new(
        round, position, match_type, bracket, home_entry, away_entry,
    ));
    wire(matches, &home, idx, Slot::Home);
    wire(matches, &away, idx, Slot::Away);
    idx
}

/// Bracket seed order for a power-of-two slot count: the doubling expansion
/// [1] -> [1,2] -> [1,4,2,3] -> [1,8,4,5,2,7,3,6] -> ...
/// Every round-1 pairing puts seed s against seed total_slots+1-s, and the
/// top seeds meet as late as possible.
pub(crate) fn seed_order(total_slots: usize) -> Vec<usize> {
    let mut order = vec![1usize];
    while order.len() < total_slots {
        let next_len = order.len() * 2;
        let mut next = Vec::with_capacity(next_len);
        for &s in &order {
            next.push(s);
            next.push(next_len + 1 - s);
        }
        order = next;
    }
    order
}

/// Match category by distance from the last round of an elimination chain.
pub(crate) fn stage_type(round: u32, last_round: u32) -> MatchType {
    match last_round - round {
        0 => MatchType::Final,
        1 => MatchType::Semifinal,
        2 => MatchType::Quarterfinal,
        _ => MatchType::Bracket,
    }
}

/// Chain `entries` into a single-elimination ladder starting at
/// `start_round`, pairing sequentially each round. An odd entry carries
/// through to the next round unpaired. Returns the final match's index.
pub(crate) fn knockout_stage(
    matches: &mut Vec<GameMatch>,
    entries: Vec<Feed>,
    start_round: u32,
    tag: BracketTag,
) -> Option<usize> {
    if entries.len() < 2 {
        return None;
    }
    let chain_rounds = (entries.len() as u32 - 1).max(1).ilog2() + 1;
    let last_round = start_round + chain_rounds - 1;

    let mut current = entries;
    let mut round = start_round;
    let mut last_idx = 0;
    while current.len() > 1 {
        let mut next = Vec::with_capacity(current.len() / 2 + 1);
        let mut iter = current.into_iter();
        let mut position = 1;
        loop {
            let home = match iter.next() {
                Some(f) => f,
                None => break,
            };
            match iter.next() {
                Some(away) => {
                    let idx = attach(
                        matches,
                        round,
                        position,
                        stage_type(round, last_round),
                        tag,
                        home,
                        away,
                    );
                    next.push(Feed::Winner(idx));
                    last_idx = idx;
                    position += 1;
                }
                // Odd entry: carries through to the next round.
                None => next.push(home),
            }
        }
        current = next;
        round += 1;
    }
    Some(last_idx)
}

/// Team ids ordered by seed rank (1 = best); missing seeds sort last.
pub(crate) fn ranked_ids(teams: &[Team]) -> Vec<TeamId> {
    let mut ordered: Vec<&Team> = teams.iter().collect();
    ordered.sort_by_key(|t| t.seed.unwrap_or(u32::MAX));
    ordered.iter().map(|t| t.id).collect()
}

/// Single elimination: ceil(log2 N) rounds, byes to the top seeds, optional
/// third-place match fed by the semifinal losers. Bye pairings emit no
/// match — the live team auto-advances into its round-2 slot — so the arena
/// holds exactly N-1 matches (+1 with a third place).
pub(crate) fn build_single_elimination(
    teams: &[Team],
    third_place: bool,
) -> Result<BracketStructure, EngineError> {
    let n = teams.len();
    let ids = ranked_ids(teams);
    let rounds = usize::BITS - (n - 1).leading_zeros();
    let total_slots = 1usize << rounds;
    let byes = total_slots - n;
    debug!(
        "single elimination: {} teams, {} rounds, {} byes",
        n, rounds, byes
    );

    let order = seed_order(total_slots);
    let mut matches: Vec<GameMatch> = Vec::with_capacity(total_slots);
    let mut feeds: Vec<Feed> = Vec::with_capacity(total_slots / 2);

    // Round 1: pair seed order[2p] with order[2p+1]; seeds above N are byes.
    for p in 0..total_slots / 2 {
        let home_seed = order[2 * p];
        let away_seed = order[2 * p + 1];
        let home = (home_seed <= n).then(|| ids[home_seed - 1]);
        let away = (away_seed <= n).then(|| ids[away_seed - 1]);
        match (home, away) {
            (Some(h), Some(a)) => {
                let idx = attach(
                    &mut matches,
                    1,
                    p as u32 + 1,
                    stage_type(1, rounds),
                    BracketTag::Winners,
                    Feed::Fixed(SlotEntry::Team(h)),
                    Feed::Fixed(SlotEntry::Team(a)),
                );
                feeds.push(Feed::Winner(idx));
            }
            // Bye: the present team advances straight into round 2.
            (Some(t), None) | (None, Some(t)) => {
                feeds.push(Feed::Fixed(SlotEntry::Team(t)));
            }
            (None, None) => unreachable!("a pairing cannot have two byes"),
        }
    }

    knockout_stage(&mut matches, feeds, 2, BracketTag::Winners);

    if third_place && rounds >= 2 {
        let semis: Vec<usize> = matches
            .iter()
            .enumerate()
            .filter(|(_, m)| m.round == rounds - 1 && m.match_type == MatchType::Semifinal)
            .map(|(i, _)| i)
            .collect();
        if semis.len() == 2 {
            attach(
                &mut matches,
                rounds,
                2,
                MatchType::ThirdPlace,
                BracketTag::Winners,
                Feed::Loser(semis[0]),
                Feed::Loser(semis[1]),
            );
        }
    }

    let match_count = matches.len();
    Ok(BracketStructure {
        matches,
        total_rounds: rounds,
        summary: StructureSummary {
            format_label: "single_elimination".to_string(),
            team_count: n,
            match_count,
            bye_count: byes,
            pool_count: 0,
        },
    })
}
