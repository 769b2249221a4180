//! CourtAssigner: weighted court scoring per match, with an optional
//! load-rebalancing pass. May run standalone or refine an existing schedule.

use crate::models::{
    AssignmentCriteria, AssignmentMetrics, AssignmentResult, ConflictKind, Court, CourtAssignment,
    CourtId, CourtQuality, EngineError, GameMatch, MatchId, MatchType, ScheduleConflict, Severity,
    TeamId, TimeWindow,
};
use chrono::Duration;
use log::{debug, info, warn};
use std::collections::HashMap;

/// Assign a court to every match by weighted scoring.
///
/// Matches are handled most-important-first (caller importance map, else
/// match type). Each candidate court is scored; the best wins, first-found
/// breaking ties. Matches no court qualifies for are reported in
/// `unassigned`, never dropped. Updates each match's `court_id` in place.
pub fn assign_courts(
    matches: &mut [GameMatch],
    courts: &[Court],
    criteria: &AssignmentCriteria,
) -> Result<AssignmentResult, EngineError> {
    let active: Vec<usize> = (0..courts.len()).filter(|&i| courts[i].active).collect();
    if active.is_empty() {
        return Err(EngineError::NoCourtsAvailable);
    }
    info!(
        "assigning {} matches across {} active courts",
        matches.len(),
        active.len()
    );

    let mut order: Vec<usize> = (0..matches.len()).collect();
    order.sort_by_key(|&i| {
        let m = &matches[i];
        let importance = criteria
            .importance
            .as_ref()
            .and_then(|map| map.get(&m.id).copied())
            .unwrap_or_else(|| m.match_type.importance());
        std::cmp::Reverse(importance)
    });

    let mut load: HashMap<CourtId, u32> = active.iter().map(|&i| (courts[i].id, 0)).collect();
    let mut last_court: HashMap<TeamId, CourtId> = HashMap::new();
    // Time windows claimed on each court during this run.
    let mut booked: HashMap<CourtId, Vec<TimeWindow>> = HashMap::new();
    let mut assignments: Vec<CourtAssignment> = Vec::new();
    let mut unassigned: Vec<MatchId> = Vec::new();
    let mut conflicts: Vec<ScheduleConflict> = Vec::new();

    for i in order {
        let total_assigned: u32 = load.values().sum();
        let average_load = f64::from(total_assigned) / active.len() as f64;
        let window = match_window(&matches[i], criteria);

        let mut best: Option<(usize, i32)> = None;
        for &c in &active {
            let court = &courts[c];
            if !court_qualifies(&matches[i], court, criteria) {
                continue;
            }
            if overlaps_booked(&booked, court.id, window) {
                continue;
            }
            let score = score_court(
                &matches[i],
                court,
                criteria,
                average_load,
                load[&court.id],
                &last_court,
            );
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((c, score));
            }
        }

        match best {
            Some((c, score)) => {
                let court_id = courts[c].id;
                matches[i].court_id = Some(court_id);
                if let Some(w) = window {
                    booked.entry(court_id).or_default().push(w);
                }
                *load.get_mut(&court_id).expect("active court has a load entry") += 1;
                for team_id in matches[i].team_ids() {
                    last_court.insert(team_id, court_id);
                }
                assignments.push(CourtAssignment {
                    match_id: matches[i].id,
                    court_id,
                    score,
                });
            }
            None => {
                warn!(
                    "no qualifying court for match R{}M{}",
                    matches[i].round, matches[i].position
                );
                unassigned.push(matches[i].id);
                conflicts.push(ScheduleConflict {
                    match_id: matches[i].id,
                    kind: ConflictKind::NoCourtAvailable,
                    severity: Severity::Medium,
                    description: format!(
                        "No court qualifies for match R{}M{}",
                        matches[i].round, matches[i].position
                    ),
                });
            }
        }
    }

    if criteria.rebalance {
        rebalance(
            matches,
            courts,
            &active,
            criteria,
            &mut assignments,
            &mut load,
            &mut booked,
        );
    }

    let metrics = compute_metrics(&assignments, &unassigned, &load);
    Ok(AssignmentResult {
        assignments,
        unassigned,
        conflicts,
        court_load: load,
        metrics,
    })
}

/// The time window a timed match occupies, None for untimed matches.
fn match_window(game: &GameMatch, criteria: &AssignmentCriteria) -> Option<TimeWindow> {
    game.scheduled_time
        .map(|t| TimeWindow::new(t, t + Duration::minutes(criteria.game_duration_minutes)))
}

/// True when the window collides with a window already claimed on the court
/// during this run. Untimed matches never collide.
fn overlaps_booked(
    booked: &HashMap<CourtId, Vec<TimeWindow>>,
    court_id: CourtId,
    window: Option<TimeWindow>,
) -> bool {
    let Some(window) = window else {
        return false;
    };
    booked
        .get(&court_id)
        .is_some_and(|ws| ws.iter().any(|w| w.overlaps(&window)))
}

/// Reservation and availability filter: a court reserved for other matches,
/// or unavailable at the match's scheduled time, is skipped entirely.
fn court_qualifies(game: &GameMatch, court: &Court, criteria: &AssignmentCriteria) -> bool {
    if let Some(reserved_for) = criteria.reservations.get(&court.id) {
        if !reserved_for.contains(&game.id) {
            return false;
        }
    }
    if let Some(t) = game.scheduled_time {
        if !court.availability.is_empty() {
            let covered = court
                .availability
                .iter()
                .any(|a| a.date == t.date() && a.start <= t.time() && t.time() < a.end);
            if !covered {
                return false;
            }
        }
        if court.bookings.iter().any(|b| b.contains(t)) {
            return false;
        }
    }
    true
}

/// Base score from the match-type x court-quality lookup: championship
/// matches strongly prefer championship courts, pool play mildly prefers
/// the practice end.
fn base_quality_score(match_type: MatchType, quality: CourtQuality) -> i32 {
    let row: [i32; 4] = match match_type {
        MatchType::Championship => [100, 70, 40, 10],
        MatchType::Final => [95, 80, 50, 15],
        MatchType::ThirdPlace | MatchType::Semifinal => [85, 80, 55, 20],
        MatchType::Quarterfinal => [70, 80, 60, 30],
        MatchType::Bracket => [55, 75, 65, 40],
        MatchType::Placement => [40, 60, 70, 55],
        MatchType::Consolation => [30, 55, 70, 60],
        MatchType::PoolPlay => [20, 50, 70, 80],
    };
    match quality {
        CourtQuality::Championship => row[0],
        CourtQuality::Primary => row[1],
        CourtQuality::Secondary => row[2],
        CourtQuality::Practice => row[3],
    }
}

fn score_court(
    game: &GameMatch,
    court: &Court,
    criteria: &AssignmentCriteria,
    average_load: f64,
    court_load: u32,
    last_court: &HashMap<TeamId, CourtId>,
) -> i32 {
    let mut score = base_quality_score(game.match_type, court.quality);

    let important = matches!(
        game.match_type,
        MatchType::Championship | MatchType::Final | MatchType::Semifinal | MatchType::ThirdPlace
    );
    if important {
        if court.features.scoreboard {
            score += 20;
        }
        if court.features.video_board {
            score += 15;
        }
        if court.features.capacity > 500 {
            score += 25;
        }
    }

    // Under-loaded courts get a bonus, over-loaded ones a penalty.
    score += (2.0 * (average_load - f64::from(court_load))).round() as i32;

    for team_id in game.team_ids() {
        if let Some(preferred) = criteria.team_preferences.get(&team_id) {
            if preferred.contains(&court.id) {
                score += 15;
            }
        }
    }

    if game
        .team_ids()
        .any(|id| last_court.get(&id) == Some(&court.id))
    {
        score += 20;
    }

    score += (10 - court.priority as i32).max(0);
    if court.features.air_conditioning {
        score += 5;
    }
    if court.features.excellent_lighting {
        score += 5;
    }
    score
}

/// Greedy rebalancing: move assignments from courts above target+2 onto
/// courts below target-2 until neither side exists. A timed assignment only
/// moves onto a court with no overlapping booking.
#[allow(clippy::too_many_arguments)]
fn rebalance(
    matches: &mut [GameMatch],
    courts: &[Court],
    active: &[usize],
    criteria: &AssignmentCriteria,
    assignments: &mut [CourtAssignment],
    load: &mut HashMap<CourtId, u32>,
    booked: &mut HashMap<CourtId, Vec<TimeWindow>>,
) {
    let total: u32 = load.values().sum();
    if total == 0 {
        return;
    }
    let target = (total + active.len() as u32 - 1) / active.len() as u32;

    loop {
        let over = active
            .iter()
            .map(|&i| courts[i].id)
            .find(|id| load[id] > target + 2);
        let under = active
            .iter()
            .map(|&i| courts[i].id)
            .filter(|id| load[id] + 2 < target)
            .min_by_key(|id| load[id]);
        let (Some(from), Some(to)) = (over, under) else {
            break;
        };

        // Move the most recently assigned (least important) match that the
        // target court has room for.
        let window_of = |id: MatchId| {
            matches
                .iter()
                .find(|m| m.id == id)
                .and_then(|m| match_window(m, criteria))
        };
        let Some(assignment) = assignments
            .iter_mut()
            .rev()
            .find(|a| a.court_id == from && !overlaps_booked(booked, to, window_of(a.match_id)))
        else {
            break;
        };
        assignment.court_id = to;
        let moved_id = assignment.match_id;
        let moved_window = window_of(moved_id);
        if let Some(m) = matches.iter_mut().find(|m| m.id == moved_id) {
            m.court_id = Some(to);
        }
        if let Some(w) = moved_window {
            if let Some(ws) = booked.get_mut(&from) {
                if let Some(pos) = ws.iter().position(|b| *b == w) {
                    ws.remove(pos);
                }
            }
            booked.entry(to).or_default().push(w);
        }
        *load.get_mut(&from).expect("over-loaded court tracked") -= 1;
        *load.get_mut(&to).expect("under-loaded court tracked") += 1;
        debug!("rebalanced one assignment off an over-loaded court");
    }
}

fn compute_metrics(
    assignments: &[CourtAssignment],
    unassigned: &[MatchId],
    load: &HashMap<CourtId, u32>,
) -> AssignmentMetrics {
    let average_score = if assignments.is_empty() {
        0.0
    } else {
        assignments.iter().map(|a| f64::from(a.score)).sum::<f64>() / assignments.len() as f64
    };
    let load_spread = match (load.values().max(), load.values().min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    };
    AssignmentMetrics {
        assigned_count: assignments.len() as u32,
        unassigned_count: unassigned.len() as u32,
        average_score,
        load_spread,
    }
}
