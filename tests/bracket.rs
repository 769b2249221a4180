//! Integration tests for bracket construction: single and double elimination.

use courtside_engine::{
    build_bracket, BracketFormat, BracketTag, EngineError, GameMatch, MatchType, Slot, SlotEntry,
    SourceOutcome, Team, TeamId,
};

fn teams(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| {
            let mut t = Team::new(format!("T{}", i + 1));
            t.seed = Some(i as u32 + 1);
            t
        })
        .collect()
}

fn seed_id(teams: &[Team], seed: u32) -> TeamId {
    teams.iter().find(|t| t.seed == Some(seed)).unwrap().id
}

fn slot_team(entry: &SlotEntry) -> Option<TeamId> {
    match entry {
        SlotEntry::Team(id) => Some(*id),
        _ => None,
    }
}

fn round_matches(matches: &[GameMatch], round: u32) -> Vec<&GameMatch> {
    matches.iter().filter(|m| m.round == round).collect()
}

#[test]
fn single_elimination_requires_two_teams() {
    let mut ts = teams(1);
    let err = build_bracket(&mut ts, BracketFormat::SingleElimination { third_place: false })
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientTeams {
            required: 2,
            actual: 1
        }
    );
}

#[test]
fn single_elimination_four_teams() {
    let mut ts = teams(4);
    let b = build_bracket(&mut ts, BracketFormat::SingleElimination { third_place: false })
        .unwrap();
    assert_eq!(b.total_rounds, 2);
    assert_eq!(b.matches.len(), 3);
    assert_eq!(b.summary.bye_count, 0);

    // Round 1 pairs 1v4 and 2v3.
    let r1 = round_matches(&b.matches, 1);
    assert_eq!(r1.len(), 2);
    assert_eq!(slot_team(&r1[0].home), Some(seed_id(&ts, 1)));
    assert_eq!(slot_team(&r1[0].away), Some(seed_id(&ts, 4)));
    assert_eq!(slot_team(&r1[1].home), Some(seed_id(&ts, 2)));
    assert_eq!(slot_team(&r1[1].away), Some(seed_id(&ts, 3)));
    assert_eq!(r1[0].match_type, MatchType::Semifinal);

    let r2 = round_matches(&b.matches, 2);
    assert_eq!(r2.len(), 1);
    assert_eq!(r2[0].match_type, MatchType::Final);
    assert_eq!(
        r2[0].home,
        SlotEntry::Placeholder("Winner of R1M1".to_string())
    );
    assert_eq!(
        r2[0].away,
        SlotEntry::Placeholder("Winner of R1M2".to_string())
    );
}

#[test]
fn single_elimination_eight_team_pairings() {
    let mut ts = teams(8);
    let b = build_bracket(&mut ts, BracketFormat::SingleElimination { third_place: false })
        .unwrap();
    assert_eq!(b.total_rounds, 3);
    assert_eq!(b.matches.len(), 7);

    let r1 = round_matches(&b.matches, 1);
    let pairs: Vec<(u32, u32)> = r1
        .iter()
        .map(|m| {
            let home = slot_team(&m.home).unwrap();
            let away = slot_team(&m.away).unwrap();
            let seed_of = |id| ts.iter().find(|t| t.id == id).unwrap().seed.unwrap();
            (seed_of(home), seed_of(away))
        })
        .collect();
    assert_eq!(pairs, vec![(1, 8), (4, 5), (2, 7), (3, 6)]);
}

#[test]
fn single_elimination_six_teams_gives_top_seeds_byes() {
    let mut ts = teams(6);
    let b = build_bracket(&mut ts, BracketFormat::SingleElimination { third_place: false })
        .unwrap();
    assert_eq!(b.total_rounds, 3);
    assert_eq!(b.matches.len(), 5);
    assert_eq!(b.summary.bye_count, 2);

    // Round 1 has only the 4v5 and 3v6 matches.
    let r1 = round_matches(&b.matches, 1);
    assert_eq!(r1.len(), 2);
    let seed_of = |id| ts.iter().find(|t| t.id == id).unwrap().seed.unwrap();
    let mut pairs: Vec<(u32, u32)> = r1
        .iter()
        .map(|m| {
            (
                seed_of(slot_team(&m.home).unwrap()),
                seed_of(slot_team(&m.away).unwrap()),
            )
        })
        .collect();
    pairs.sort();
    assert_eq!(pairs, vec![(3, 6), (4, 5)]);

    // Seeds 1 and 2 advance straight into round 2.
    let r2 = round_matches(&b.matches, 2);
    assert_eq!(r2.len(), 2);
    let advanced: Vec<TeamId> = r2
        .iter()
        .flat_map(|m| [slot_team(&m.home), slot_team(&m.away)])
        .flatten()
        .collect();
    assert!(advanced.contains(&seed_id(&ts, 1)));
    assert!(advanced.contains(&seed_id(&ts, 2)));
}

#[test]
fn single_elimination_rounds_and_byes_formula() {
    for n in 2..=33usize {
        let mut ts = teams(n);
        let b = build_bracket(&mut ts, BracketFormat::SingleElimination { third_place: false })
            .unwrap();
        let rounds = (n as f64).log2().ceil() as u32;
        assert_eq!(b.total_rounds, rounds, "rounds for {} teams", n);
        assert_eq!(b.matches.len(), n - 1, "match count for {} teams", n);
        assert_eq!(
            b.summary.bye_count,
            (1usize << rounds) - n,
            "byes for {} teams",
            n
        );
    }
}

#[test]
fn forward_pointers_form_an_acyclic_chain() {
    let mut ts = teams(8);
    let b = build_bracket(&mut ts, BracketFormat::SingleElimination { third_place: false })
        .unwrap();
    for (i, m) in b.matches.iter().enumerate() {
        match m.winner_to {
            Some(adv) => {
                // Targets always sit later in the arena: the graph is acyclic.
                assert!(adv.target > i);
                let target = &b.matches[adv.target];
                assert!(target
                    .feeds
                    .iter()
                    .any(|s| s.source == i && s.outcome == SourceOutcome::Winner));
            }
            None => assert_eq!(m.match_type, MatchType::Final, "only the final is terminal"),
        }
    }
}

#[test]
fn third_place_match_is_fed_by_semifinal_losers() {
    let mut ts = teams(8);
    let b =
        build_bracket(&mut ts, BracketFormat::SingleElimination { third_place: true }).unwrap();
    assert_eq!(b.matches.len(), 8);

    let (third_idx, third) = b
        .matches
        .iter()
        .enumerate()
        .find(|(_, m)| m.match_type == MatchType::ThirdPlace)
        .unwrap();
    assert_eq!(third.round, 3);
    assert_eq!(third.position, 2);
    assert_eq!(third.feeds.len(), 2);
    for source in &third.feeds {
        assert_eq!(source.outcome, SourceOutcome::Loser);
        let semi = &b.matches[source.source];
        assert_eq!(semi.match_type, MatchType::Semifinal);
        assert_eq!(semi.loser_to.unwrap().target, third_idx);
    }
    assert!(matches!(third.home, SlotEntry::Placeholder(ref s) if s.starts_with("Loser of")));
}

#[test]
fn double_elimination_eight_teams() {
    let mut ts = teams(8);
    let b = build_bracket(&mut ts, BracketFormat::DoubleElimination).unwrap();

    let winners = b
        .matches
        .iter()
        .filter(|m| m.bracket == BracketTag::Winners)
        .count();
    let losers = b
        .matches
        .iter()
        .filter(|m| m.bracket == BracketTag::Losers)
        .count();
    let grand = b
        .matches
        .iter()
        .filter(|m| m.bracket == BracketTag::GrandFinal)
        .count();
    assert_eq!(winners, 7);
    assert_eq!(losers, 6);
    assert_eq!(grand, 2);

    // Grand final rounds sit above the deepest bracket round (4 losers
    // rounds), reset one past the grand final.
    let gf_rounds: Vec<u32> = b
        .matches
        .iter()
        .filter(|m| m.bracket == BracketTag::GrandFinal)
        .map(|m| m.round)
        .collect();
    assert_eq!(gf_rounds, vec![5, 6]);

    // Losers bracket runs 2 * (winners_rounds - 1) = 4 rounds.
    let lb_rounds = b
        .matches
        .iter()
        .filter(|m| m.bracket == BracketTag::Losers)
        .map(|m| m.round)
        .max()
        .unwrap();
    assert_eq!(lb_rounds, 4);

    // Every winners-bracket loser drops somewhere except the champion's side.
    for m in b
        .matches
        .iter()
        .filter(|m| m.bracket == BracketTag::Winners)
    {
        assert!(m.loser_to.is_some(), "winners R{}M{} must drop", m.round, m.position);
    }
}

#[test]
fn bracket_structure_round_trips_through_json() {
    let mut ts = teams(6);
    let b = build_bracket(&mut ts, BracketFormat::SingleElimination { third_place: true })
        .unwrap();
    let json = serde_json::to_string(&b).unwrap();
    let back: courtside_engine::BracketStructure = serde_json::from_str(&json).unwrap();
    assert_eq!(b, back);
}

#[test]
fn double_elimination_grand_final_has_a_bracket_reset() {
    let mut ts = teams(4);
    let b = build_bracket(&mut ts, BracketFormat::DoubleElimination).unwrap();
    // 3 winners + 2 losers + 2 grand final matches.
    assert_eq!(b.matches.len(), 7);

    let gf: Vec<(usize, &GameMatch)> = b
        .matches
        .iter()
        .enumerate()
        .filter(|(_, m)| m.bracket == BracketTag::GrandFinal)
        .collect();
    assert_eq!(gf.len(), 2);
    let (first_idx, first) = gf[0];
    let (reset_idx, reset) = gf[1];
    assert_eq!(first.match_type, MatchType::Championship);
    assert_eq!(reset.match_type, MatchType::Championship);

    // The grand final stage is numbered past both bracket finals, so
    // round-ordered scheduling reaches it last.
    assert_eq!(first.round, 3);
    assert_eq!(reset.round, 4);
    assert_eq!(b.total_rounds, 4);

    // Game one feeds both slots of the reset.
    let adv = first.winner_to.unwrap();
    assert_eq!(adv.target, reset_idx);
    assert_eq!(adv.slot, Slot::Home);
    let drop = first.loser_to.unwrap();
    assert_eq!(drop.target, reset_idx);
    assert_eq!(drop.slot, Slot::Away);
    assert!(reset.feeds.iter().any(|s| s.source == first_idx));
    assert_eq!(reset.home, SlotEntry::Placeholder("Winner of GF".to_string()));
    assert_eq!(reset.away, SlotEntry::Placeholder("Loser of GF".to_string()));
}
