//! Integration tests for the court assigner: quality matching, bonuses,
//! reservations, and load rebalancing.

use chrono::{NaiveDate, NaiveDateTime};
use courtside_engine::{
    assign_courts, AssignmentCriteria, BracketTag, ConflictKind, Court, CourtQuality, EngineError,
    GameMatch, MatchType, SlotEntry, Team,
};

fn teams(n: usize) -> Vec<Team> {
    (0..n).map(|i| Team::new(format!("T{}", i + 1))).collect()
}

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn game(round: u32, position: u32, home: &Team, away: &Team, match_type: MatchType) -> GameMatch {
    GameMatch::new(
        round,
        position,
        match_type,
        BracketTag::Winners,
        SlotEntry::Team(home.id),
        SlotEntry::Team(away.id),
    )
}

#[test]
fn fails_when_no_court_is_active() {
    let ts = teams(2);
    let mut ms = vec![game(1, 1, &ts[0], &ts[1], MatchType::Bracket)];
    let mut court = Court::new("Main", CourtQuality::Primary, 1);
    court.active = false;
    let err = assign_courts(&mut ms, &[court], &AssignmentCriteria::default()).unwrap_err();
    assert_eq!(err, EngineError::NoCourtsAvailable);
}

#[test]
fn championship_matches_take_the_championship_court() {
    let ts = teams(2);
    let mut ms = vec![game(1, 1, &ts[0], &ts[1], MatchType::Championship)];
    let courts = vec![
        Court::new("Practice", CourtQuality::Practice, 1),
        Court::new("Center", CourtQuality::Championship, 5),
    ];
    let result = assign_courts(&mut ms, &courts, &AssignmentCriteria::default()).unwrap();
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].court_id, courts[1].id);
    assert_eq!(ms[0].court_id, Some(courts[1].id));
}

#[test]
fn pool_play_prefers_the_practice_end() {
    let ts = teams(2);
    let mut ms = vec![game(1, 1, &ts[0], &ts[1], MatchType::PoolPlay)];
    let courts = vec![
        Court::new("Center", CourtQuality::Championship, 1),
        Court::new("Practice", CourtQuality::Practice, 1),
    ];
    let result = assign_courts(&mut ms, &courts, &AssignmentCriteria::default()).unwrap();
    assert_eq!(result.assignments[0].court_id, courts[1].id);
}

#[test]
fn feature_bonuses_steer_important_matches() {
    let ts = teams(2);
    let mut ms = vec![game(1, 1, &ts[0], &ts[1], MatchType::Final)];
    let plain = Court::new("Plain", CourtQuality::Championship, 1);
    let mut equipped = Court::new("Equipped", CourtQuality::Championship, 1);
    equipped.features.scoreboard = true;
    equipped.features.video_board = true;
    equipped.features.capacity = 1000;
    let courts = vec![plain, equipped];

    let result = assign_courts(&mut ms, &courts, &AssignmentCriteria::default()).unwrap();
    assert_eq!(result.assignments[0].court_id, courts[1].id);
}

#[test]
fn reserved_courts_are_skipped_entirely() {
    let ts = teams(4);
    let mut ms = vec![
        game(1, 1, &ts[0], &ts[1], MatchType::Bracket),
        game(1, 2, &ts[2], &ts[3], MatchType::Bracket),
    ];
    let courts = vec![Court::new("Main", CourtQuality::Primary, 1)];
    let mut criteria = AssignmentCriteria::default();
    // The only court is reserved for the first match.
    criteria.reservations.insert(courts[0].id, vec![ms[0].id]);

    let result = assign_courts(&mut ms, &courts, &criteria).unwrap();
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].match_id, ms[0].id);
    assert_eq!(result.unassigned, vec![ms[1].id]);
    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(result.conflicts[0].kind, ConflictKind::NoCourtAvailable);
    assert_eq!(result.metrics.unassigned_count, 1);
}

#[test]
fn timed_matches_never_share_a_court() {
    let ts = teams(4);
    let mut ms = vec![
        game(1, 1, &ts[0], &ts[1], MatchType::Final),
        game(1, 2, &ts[2], &ts[3], MatchType::Final),
    ];
    // Both finals already hold the same 10:00 slot.
    for m in &mut ms {
        m.scheduled_time = Some(at(10));
    }
    let courts = vec![
        Court::new("Center", CourtQuality::Championship, 1),
        Court::new("Side", CourtQuality::Practice, 1),
    ];

    let result = assign_courts(&mut ms, &courts, &AssignmentCriteria::default()).unwrap();
    assert_eq!(result.assignments.len(), 2);
    // The center court takes one final; the second is pushed off it.
    assert_eq!(ms[0].court_id, Some(courts[0].id));
    assert_eq!(ms[1].court_id, Some(courts[1].id));
    assert_ne!(ms[0].court_id, ms[1].court_id);
}

#[test]
fn non_overlapping_times_may_share_a_court() {
    let ts = teams(4);
    let mut ms = vec![
        game(1, 1, &ts[0], &ts[1], MatchType::Final),
        game(1, 2, &ts[2], &ts[3], MatchType::Final),
    ];
    ms[0].scheduled_time = Some(at(10));
    ms[1].scheduled_time = Some(at(12));
    let courts = vec![
        Court::new("Center", CourtQuality::Championship, 1),
        Court::new("Side", CourtQuality::Practice, 1),
    ];

    let result = assign_courts(&mut ms, &courts, &AssignmentCriteria::default()).unwrap();
    assert_eq!(result.assignments.len(), 2);
    assert_eq!(ms[0].court_id, Some(courts[0].id));
    assert_eq!(ms[1].court_id, Some(courts[0].id));
}

#[test]
fn load_balancing_spreads_equal_matches() {
    let ts = teams(8);
    let mut ms: Vec<GameMatch> = (0..4)
        .map(|i| game(1, i + 1, &ts[2 * i as usize], &ts[2 * i as usize + 1], MatchType::PoolPlay))
        .collect();
    let courts = vec![
        Court::new("Court 1", CourtQuality::Practice, 1),
        Court::new("Court 2", CourtQuality::Practice, 1),
    ];
    let result = assign_courts(&mut ms, &courts, &AssignmentCriteria::default()).unwrap();
    assert_eq!(result.court_load[&courts[0].id], 2);
    assert_eq!(result.court_load[&courts[1].id], 2);
    assert_eq!(result.metrics.load_spread, 0);
}

#[test]
fn rebalancing_drains_an_overloaded_court() {
    let ts = teams(2);
    let mut ms: Vec<GameMatch> = (0..8)
        .map(|i| game(i + 1, 1, &ts[0], &ts[1], MatchType::PoolPlay))
        .collect();
    let courts = vec![
        Court::new("Favorite", CourtQuality::Practice, 1),
        Court::new("Spare", CourtQuality::Practice, 1),
    ];
    let mut criteria = AssignmentCriteria::default();
    // Both teams prefer the first court, so the greedy pass piles onto it.
    criteria
        .team_preferences
        .insert(ts[0].id, vec![courts[0].id]);
    criteria
        .team_preferences
        .insert(ts[1].id, vec![courts[0].id]);
    criteria.rebalance = true;

    let result = assign_courts(&mut ms, &courts, &criteria).unwrap();
    let favorite = result.court_load[&courts[0].id];
    let spare = result.court_load[&courts[1].id];
    assert_eq!(favorite + spare, 8);
    // Target is 4; rebalancing stops once the favorite is within target + 2.
    assert!(favorite <= 6, "favorite still holds {}", favorite);
    assert!(spare >= 2);

    // Moved matches had their court updated in place too.
    for a in &result.assignments {
        let m = ms.iter().find(|m| m.id == a.match_id).unwrap();
        assert_eq!(m.court_id, Some(a.court_id));
    }
}

#[test]
fn importance_map_overrides_match_type_order() {
    let ts = teams(4);
    let mut ms = vec![
        game(1, 1, &ts[0], &ts[1], MatchType::Championship),
        game(1, 2, &ts[2], &ts[3], MatchType::PoolPlay),
    ];
    let courts = vec![
        Court::new("Center", CourtQuality::Championship, 1),
        Court::new("Side", CourtQuality::Practice, 1),
    ];
    let mut criteria = AssignmentCriteria::default();
    let mut importance = std::collections::HashMap::new();
    importance.insert(ms[0].id, 1u8);
    importance.insert(ms[1].id, 9u8);
    criteria.importance = Some(importance);

    let result = assign_courts(&mut ms, &courts, &criteria).unwrap();
    // The pool-play match is handled first under the caller's map.
    assert_eq!(result.assignments[0].match_id, ms[1].id);
    assert_eq!(result.metrics.assigned_count, 2);
    assert!(result.metrics.average_score > 0.0);
}
