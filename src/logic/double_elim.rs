//! Double elimination: winners bracket, losers bracket with drop-down
//! routing, and a grand final with a conditional bracket reset.

use crate::logic::bracket::{attach, build_single_elimination, Feed};
use crate::models::{
    BracketStructure, BracketTag, EngineError, MatchType, StructureSummary, Team,
};
use log::debug;

/// Build a double-elimination bracket.
///
/// The winners bracket is a plain single-elimination bracket. The losers
/// bracket runs 2*(winners_rounds - 1) rounds: losers of winners round 1
/// pair up in losers round 1; losers dropping from winners round w land in
/// losers round 2*(w-1), interleaved with the previous losers round's
/// winners; the remaining odd rounds consolidate. The winners and losers
/// champions meet in a grand final, followed by a conditional second grand
/// final played only if the losers champion takes game one.
pub(crate) fn build_double_elimination(teams: &[Team]) -> Result<BracketStructure, EngineError> {
    let structure = build_single_elimination(teams, false)?;
    let winners_rounds = structure.total_rounds;
    let mut matches = structure.matches;

    // Arena indices of winners-bracket matches, grouped by round.
    let mut winners_by_round: Vec<Vec<usize>> = vec![Vec::new(); winners_rounds as usize];
    for (i, m) in matches.iter().enumerate() {
        winners_by_round[m.round as usize - 1].push(i);
    }
    let winners_final = *winners_by_round[winners_rounds as usize - 1]
        .first()
        .expect("winners bracket has a final");

    let losers_rounds = 2 * (winners_rounds - 1);
    debug!(
        "double elimination: {} winners rounds, {} losers rounds",
        winners_rounds, losers_rounds
    );

    // Losers round 1: losers of the real winners-round-1 matches.
    let mut current: Vec<Feed> = winners_by_round[0].iter().map(|&i| Feed::Loser(i)).collect();
    let mut losers_final = None;
    for round in 1..=losers_rounds {
        // Even rounds take the drop-downs from winners round round/2 + 1.
        if round > 1 && round % 2 == 0 {
            let w = (round / 2 + 1) as usize;
            let drops: Vec<Feed> = winners_by_round[w - 1].iter().map(|&i| Feed::Loser(i)).collect();
            let mut interleaved = Vec::with_capacity(current.len() + drops.len());
            let mut drops = drops.into_iter();
            for feed in current {
                interleaved.push(feed);
                if let Some(d) = drops.next() {
                    interleaved.push(d);
                }
            }
            interleaved.extend(drops);
            current = interleaved;
        }

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
                        &mut matches,
                        round,
                        position,
                        MatchType::Bracket,
                        BracketTag::Losers,
                        home,
                        away,
                    );
                    next.push(Feed::Winner(idx));
                    losers_final = Some(idx);
                    position += 1;
                }
                // Odd participant carries through to the next losers round.
                None => next.push(home),
            }
        }
        current = next;
    }

    // Grand final: winners champion vs losers champion. Numbered past both
    // finals so round-ordered scheduling places it after its feeders.
    let gf_round = winners_rounds.max(losers_rounds) + 1;
    let gf = attach(
        &mut matches,
        gf_round,
        1,
        MatchType::Championship,
        BracketTag::GrandFinal,
        Feed::Winner(winners_final),
        match losers_final {
            Some(idx) => Feed::Winner(idx),
            // Two teams: the losers bracket is empty and the winners-final
            // loser goes straight to the grand final.
            None => Feed::Loser(winners_final),
        },
    );
    // Bracket reset: played only if the losers champion wins game one.
    attach(
        &mut matches,
        gf_round + 1,
        1,
        MatchType::Championship,
        BracketTag::GrandFinal,
        Feed::Winner(gf),
        Feed::Loser(gf),
    );

    let match_count = matches.len();
    let total_rounds = matches.iter().map(|m| m.round).max().unwrap_or(0);
    Ok(BracketStructure {
        matches,
        total_rounds,
        summary: StructureSummary {
            format_label: "double_elimination".to_string(),
            team_count: teams.len(),
            match_count,
            bye_count: structure.summary.bye_count,
            pool_count: 0,
        },
    })
}
