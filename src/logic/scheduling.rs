//! ScheduleOptimizer: greedy time-and-court assignment under rest, daily
//! cap, availability, and blackout constraints.

use crate::models::{
    ConflictKind, Constraints, Court, CourtId, CourtQuality, EngineError, GameMatch, MatchStatus,
    MatchType, ScheduleConflict, ScheduleMetrics, ScheduleResult, ScheduleSlot, ScheduledMatch,
    Severity, Team, TeamGame, TeamId, TeamSchedule, TimeWindow,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::{info, warn};
use std::collections::{BTreeMap, HashMap};

/// Assign a time slot and court to every schedulable match.
///
/// Matches are processed round by round so a round is never scheduled
/// before the rounds that feed it; within a round the caller's priority
/// list, then match importance, decides order. Matches that cannot be
/// placed come back as conflicts, never silently dropped. Updates each
/// scheduled match's time, court, and status in place.
pub fn optimize_schedule(
    matches: &mut [GameMatch],
    courts: &[Court],
    teams: &[Team],
    constraints: &Constraints,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<ScheduleResult, EngineError> {
    if courts.is_empty() {
        return Err(EngineError::NoCourtsAvailable);
    }
    if end_date < start_date {
        return Err(EngineError::InvalidDateRange {
            start: start_date,
            end: end_date,
        });
    }

    let mut court_slots = generate_slots(courts, constraints, start_date, end_date);
    let total_slots: usize = court_slots.iter().map(|s| s.len()).sum();
    info!(
        "scheduling {} matches over {} slots on {} courts",
        matches.len(),
        total_slots,
        courts.len()
    );

    let mut schedules: HashMap<TeamId, TeamSchedule> = teams
        .iter()
        .map(|t| (t.id, TeamSchedule::default()))
        .collect();
    let mut scheduled: Vec<ScheduledMatch> = Vec::new();
    let mut conflicts: Vec<ScheduleConflict> = Vec::new();

    // Order: priority list, then importance, then later rounds, then
    // position; afterwards grouped by round so feeder rounds go first.
    let mut order: Vec<usize> = (0..matches.len()).collect();
    let priority_rank = |id| {
        constraints
            .priority_matches
            .iter()
            .position(|&p| p == id)
            .unwrap_or(usize::MAX)
    };
    order.sort_by_key(|&i| {
        let m = &matches[i];
        (
            priority_rank(m.id),
            std::cmp::Reverse(m.match_type.importance()),
            std::cmp::Reverse(m.round),
            m.position,
        )
    });
    let mut by_round: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for i in order {
        by_round.entry(matches[i].round).or_default().push(i);
    }

    for (_, round_matches) in by_round {
        for i in round_matches {
            if matches[i].is_unresolved() {
                conflicts.push(ScheduleConflict {
                    match_id: matches[i].id,
                    kind: ConflictKind::UnresolvedTeams,
                    severity: Severity::Low,
                    description: format!(
                        "Match R{}M{} has no resolved teams yet and was skipped",
                        matches[i].round, matches[i].position
                    ),
                });
                continue;
            }

            // A match never starts before the matches that feed it have ended.
            let not_before = matches[i]
                .feeds
                .iter()
                .filter_map(|s| matches.get(s.source).and_then(|m| m.scheduled_time))
                .map(|t| t + Duration::minutes(constraints.game_duration_minutes))
                .max();

            match best_slot(
                &matches[i],
                courts,
                &court_slots,
                constraints,
                &schedules,
                not_before,
            ) {
                Some((court_pos, slot_pos, _score)) => {
                    let slot = &mut court_slots[court_pos][slot_pos];
                    slot.available = false;
                    let (start, end, court_id) = (slot.start, slot.end, slot.court_id);
                    book(&mut matches[i], &mut schedules, court_id, start, end);
                    scheduled.push(ScheduledMatch {
                        match_id: matches[i].id,
                        court_id,
                        start,
                        end,
                    });
                }
                None => {
                    warn!(
                        "no valid slot for match R{}M{}",
                        matches[i].round, matches[i].position
                    );
                    conflicts.push(ScheduleConflict {
                        match_id: matches[i].id,
                        kind: ConflictKind::CourtConflict,
                        severity: Severity::High,
                        description: format!(
                            "No court/time slot satisfies the constraints for match R{}M{}",
                            matches[i].round, matches[i].position
                        ),
                    });
                }
            }
        }
    }

    finalize_rest(&mut schedules);
    let metrics = compute_metrics(&scheduled, &schedules, total_slots);
    let court_utilization = courts
        .iter()
        .zip(&court_slots)
        .map(|(court, slots)| {
            let booked = slots.iter().filter(|s| !s.available).count();
            let rate = if slots.is_empty() {
                0.0
            } else {
                booked as f64 / slots.len() as f64
            };
            (court.id, rate)
        })
        .collect();

    Ok(ScheduleResult {
        scheduled,
        conflicts,
        metrics,
        court_utilization,
        team_schedules: schedules,
    })
}

/// Generate fixed-duration slots for every court and day in range. Slots
/// hit by a blackout or falling outside a court availability override are
/// generated unavailable.
fn generate_slots(
    courts: &[Court],
    constraints: &Constraints,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<Vec<ScheduleSlot>> {
    let duration = Duration::minutes(constraints.game_duration_minutes);
    courts
        .iter()
        .map(|court| {
            let mut slots = Vec::new();
            let mut date = start_date;
            while date <= end_date {
                let mut start = date.and_time(constraints.daily_start);
                let day_end = date.and_time(constraints.daily_end);
                while start + duration <= day_end {
                    let window = TimeWindow::new(start, start + duration);
                    let blacked_out = constraints.blackouts.iter().any(|b| {
                        b.court_id.map_or(true, |c| c == court.id) && b.window.overlaps(&window)
                    });
                    let override_ok = match constraints.court_availability.get(&court.id) {
                        Some(windows) => windows.iter().any(|a| a.covers(&window)),
                        None => true,
                    };
                    slots.push(ScheduleSlot {
                        court_id: court.id,
                        date,
                        start,
                        end: start + duration,
                        available: !blacked_out && override_ok && court.available_for(&window),
                    });
                    start += duration;
                }
                date = date.succ_opt().expect("date within calendar range");
            }
            slots
        })
        .collect()
}

/// Court iteration order for a match: championship-quality courts first for
/// championship/final matches, then ascending priority.
fn court_order(game: &GameMatch, courts: &[Court]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..courts.len()).collect();
    let wants_best = matches!(
        game.match_type,
        MatchType::Championship | MatchType::Final
    );
    order.sort_by_key(|&i| {
        let is_championship = courts[i].quality == CourtQuality::Championship;
        (wants_best && !is_championship, courts[i].priority)
    });
    order
}

/// Scan every court's slots and return the best valid
/// (court position, slot position, score), first-found winning ties.
fn best_slot(
    game: &GameMatch,
    courts: &[Court],
    court_slots: &[Vec<ScheduleSlot>],
    constraints: &Constraints,
    schedules: &HashMap<TeamId, TeamSchedule>,
    not_before: Option<NaiveDateTime>,
) -> Option<(usize, usize, i32)> {
    let mut best: Option<(usize, usize, i32)> = None;
    for court_pos in court_order(game, courts) {
        for (slot_pos, slot) in court_slots[court_pos].iter().enumerate() {
            if !slot.available {
                continue;
            }
            if not_before.is_some_and(|t| slot.start < t) {
                continue;
            }
            if !slot_is_valid(game, slot, constraints, schedules) {
                continue;
            }
            let score = score_slot(game, slot, &courts[court_pos], constraints, schedules);
            if best.map_or(true, |(_, _, b)| score > b) {
                best = Some((court_pos, slot_pos, score));
            }
        }
    }
    best
}

/// Hard checks: rest gap, daily cap, and team unavailability for every
/// resolved team in the match.
fn slot_is_valid(
    game: &GameMatch,
    slot: &ScheduleSlot,
    constraints: &Constraints,
    schedules: &HashMap<TeamId, TeamSchedule>,
) -> bool {
    let rest = Duration::minutes(constraints.min_rest_minutes);
    for team_id in game.team_ids() {
        if let Some(windows) = constraints.team_unavailable.get(&team_id) {
            if windows.iter().any(|w| w.overlaps(&slot.window())) {
                return false;
            }
        }
        let Some(schedule) = schedules.get(&team_id) else {
            continue;
        };
        if schedule.games_on(slot.date) >= constraints.max_games_per_day {
            return false;
        }
        // The slot must sit at least min rest away from every existing game,
        // on either side.
        for g in &schedule.games {
            let clear = slot.start >= g.end + rest || g.start >= slot.end + rest;
            if !clear {
                return false;
            }
        }
    }
    true
}

/// Minutes of rest between the team's closest earlier game and `start`,
/// None when the team has no earlier game.
fn rest_before(
    schedule: &TeamSchedule,
    start: NaiveDateTime,
) -> Option<i64> {
    schedule
        .games
        .iter()
        .filter(|g| g.end <= start)
        .map(|g| (start - g.end).num_minutes())
        .min()
}

/// Soft scoring: rest sweet spot, prime time for late-stage matches,
/// same-court continuity, early/late penalties, and court priority.
fn score_slot(
    game: &GameMatch,
    slot: &ScheduleSlot,
    court: &Court,
    constraints: &Constraints,
    schedules: &HashMap<TeamId, TeamSchedule>,
) -> i32 {
    let mut score = 0i32;

    let gap = game
        .team_ids()
        .filter_map(|id| schedules.get(&id).and_then(|s| rest_before(s, slot.start)))
        .min();
    if let Some(gap) = gap {
        if (90..=120).contains(&gap) {
            score += 50;
        } else if gap >= constraints.min_rest_minutes && gap < 90 {
            score += 30;
        } else if gap > 120 && gap <= 240 {
            score += 20;
        }
    }

    let time = slot.start.time();
    let prime = matches!(game.match_type, MatchType::Final | MatchType::Semifinal);
    if prime
        && time >= NaiveTime::from_hms_opt(14, 0, 0).unwrap()
        && time < NaiveTime::from_hms_opt(20, 0, 0).unwrap()
    {
        score += 30;
    }

    for id in game.team_ids() {
        if let Some(last) = schedules.get(&id).and_then(|s| s.last_game()) {
            if last.court_id == court.id {
                score += 10;
                break;
            }
        }
    }

    if time < NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        || time > NaiveTime::from_hms_opt(21, 0, 0).unwrap()
    {
        score -= 20;
    }

    score += (10 - court.priority as i32).max(0);
    score
}

/// Record the booking on the match and both team schedules.
fn book(
    game: &mut GameMatch,
    schedules: &mut HashMap<TeamId, TeamSchedule>,
    court_id: CourtId,
    start: NaiveDateTime,
    end: NaiveDateTime,
) {
    game.scheduled_time = Some(start);
    game.court_id = Some(court_id);
    game.status = MatchStatus::Scheduled;

    let home = game.home.team();
    let away = game.away.team();
    for (team_id, opponent) in [(home, away), (away, home)] {
        let Some(team_id) = team_id else { continue };
        let schedule = schedules.entry(team_id).or_default();
        let rest = rest_before(schedule, start);
        schedule.games.push(TeamGame {
            match_id: game.id,
            start,
            end,
            court_id,
            opponent,
            rest_before: rest,
        });
    }
}

/// Sort each team's games by start and recompute realized rest intervals.
fn finalize_rest(schedules: &mut HashMap<TeamId, TeamSchedule>) {
    for schedule in schedules.values_mut() {
        schedule.games.sort_by_key(|g| g.start);
        let mut prev_end: Option<NaiveDateTime> = None;
        for game in &mut schedule.games {
            game.rest_before = prev_end.map(|e| (game.start - e).num_minutes());
            prev_end = Some(game.end);
        }
    }
}

fn compute_metrics(
    scheduled: &[ScheduledMatch],
    schedules: &HashMap<TeamId, TeamSchedule>,
    total_slots: usize,
) -> ScheduleMetrics {
    let total_duration_minutes = match (
        scheduled.iter().map(|s| s.start).min(),
        scheduled.iter().map(|s| s.start).max(),
    ) {
        (Some(first), Some(last)) => (last - first).num_minutes(),
        _ => 0,
    };

    let rests: Vec<i64> = schedules
        .values()
        .flat_map(|s| s.games.iter().filter_map(|g| g.rest_before))
        .collect();
    let average_rest_minutes = if rests.is_empty() {
        0.0
    } else {
        rests.iter().sum::<i64>() as f64 / rests.len() as f64
    };
    let back_to_back_count = rests.iter().filter(|&&r| r < 60).count() as u32;

    let utilization_rate = if total_slots == 0 {
        0.0
    } else {
        scheduled.len() as f64 / total_slots as f64
    };

    ScheduleMetrics {
        total_duration_minutes,
        average_rest_minutes,
        utilization_rate,
        back_to_back_count,
    }
}
