//! Shift matching.
//!
//! Assigns a work segment to a shift definition by time proximity, with
//! ambiguity detection, weighted out-time disambiguation, and escalation to
//! manual review when no safe assignment exists.
//!
//! Ambiguity is evaluated first; the "preferred" start-before-punch bias
//! only ranks candidates that have already been judged non-ambiguous, so
//! the bias can never hide a genuinely ambiguous arrival.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::catalog::{CatalogTier, ShiftCatalog};
use crate::config::{EngineSettings, PREFERRED_START_WINDOW_MINUTES};
use crate::models::{MatchMethod, ShiftCandidate, ShiftDefinition, WorkSegment};

use super::late_early::{early_out_minutes, late_in_minutes};
use super::time_math::{MINUTES_PER_DAY, minutes_of_day, nearest_instant, proximity_minutes, shift_window};

/// A successful shift assignment for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The assigned shift's ID.
    pub shift_id: String,
    /// How the assignment was decided.
    pub method: MatchMethod,
    /// Minutes late past the grace window.
    pub late_in_minutes: i64,
    /// Minutes left early past the grace window; `None` without an OUT.
    pub early_out_minutes: Option<i64>,
    /// The assigned shift's expected hours.
    pub expected_hours: Decimal,
    /// Proximity of the IN punch to the assigned shift's start, in minutes.
    pub distance_minutes: i64,
}

/// The outcome of matching one segment.
///
/// Escalation is a defined outcome, not an error: callers must distinguish
/// it from failure.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// A shift was assigned.
    Matched(MatchResult),
    /// No safe assignment exists; the segment escalates to manual review
    /// with the candidate list.
    Escalated {
        /// The candidates the matcher could not separate, with reasons.
        candidates: Vec<ShiftCandidate>,
    },
    /// The catalog is empty (unknown employee or no shifts defined); the
    /// segment stays unassigned and no escalation is raised.
    NoShiftsAvailable,
}

#[derive(Debug, Clone, Copy)]
struct Scored<'a> {
    distance: i64,
    shift: &'a ShiftDefinition,
}

/// Returns the catalog candidate whose start is nearest to the IN punch.
///
/// Used for the segmenter's provisional continuation window and for the
/// nearest-fallback assignment.
pub fn nearest_by_proximity<'a>(
    shifts: &'a [ShiftDefinition],
    in_time: NaiveDateTime,
) -> Option<&'a ShiftDefinition> {
    shifts
        .iter()
        .min_by_key(|s| (proximity_minutes(in_time, s.start_time), s.id.clone()))
}

/// Matches a segment's IN time against the resolved catalog.
///
/// 1. Score every candidate by minute proximity (overnight-aware, folded
///    onto the 24-hour wheel).
/// 2. Keep candidates within the proximity tolerance (default 3h).
/// 3. None within tolerance ⇒ fall back to the globally nearest candidate;
///    a match is always produced unless the catalog itself is empty.
/// 4. Exactly one ⇒ assign it.
/// 5. Multiple ⇒ separate identical-start candidates by the weighted
///    out-time score; test distinct-start candidates for ambiguous
///    arrival, disambiguate by out-time where possible, otherwise rank
///    with the preferred bias. Escalate when nothing separates them.
///
/// A pre-scheduled catalog short-circuits all of the above: its single
/// shift is assigned directly.
pub fn match_segment(
    segment: &WorkSegment,
    catalog: &ShiftCatalog,
    settings: &EngineSettings,
) -> MatchOutcome {
    let Some(in_time) = segment.in_time else {
        return MatchOutcome::NoShiftsAvailable;
    };
    if catalog.is_empty() {
        return MatchOutcome::NoShiftsAvailable;
    }

    if catalog.tier == CatalogTier::PreScheduled {
        let shift = &catalog.shifts[0];
        let distance = proximity_minutes(in_time, shift.start_time);
        return MatchOutcome::Matched(build_result(
            shift,
            MatchMethod::PreScheduled,
            in_time,
            segment.out_time,
            distance,
            settings,
        ));
    }

    let mut scored: Vec<Scored> = catalog
        .shifts
        .iter()
        .map(|shift| Scored {
            distance: proximity_minutes(in_time, shift.start_time),
            shift,
        })
        .collect();
    scored.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| a.shift.id.cmp(&b.shift.id))
    });

    let within: Vec<Scored> = scored
        .iter()
        .copied()
        .filter(|s| s.distance <= settings.proximity_tolerance())
        .collect();

    if within.is_empty() {
        // Nothing inside the window; take the globally nearest candidate.
        let nearest = scored[0];
        return MatchOutcome::Matched(build_result(
            nearest.shift,
            MatchMethod::NearestFallback,
            in_time,
            segment.out_time,
            nearest.distance,
            settings,
        ));
    }

    if within.len() == 1 {
        let only = within[0];
        return MatchOutcome::Matched(build_result(
            only.shift,
            MatchMethod::Single,
            in_time,
            segment.out_time,
            only.distance,
            settings,
        ));
    }

    let identical_starts = within
        .iter()
        .all(|s| s.shift.start_time == within[0].shift.start_time);

    if identical_starts {
        return match segment.out_time {
            Some(out) => match disambiguate_by_out(in_time, out, &within, settings) {
                Some(best) => MatchOutcome::Matched(build_result(
                    best.shift,
                    MatchMethod::OutTimeDisambiguated,
                    in_time,
                    segment.out_time,
                    best.distance,
                    settings,
                )),
                None => escalate(&within, "identical start time; out-time inconclusive"),
            },
            None => escalate(&within, "identical start time; no out-time to disambiguate"),
        };
    }

    if is_ambiguous_arrival(in_time, &within, settings.ambiguity_threshold()) {
        if let Some(out) = segment.out_time {
            if let Some(best) = disambiguate_by_out(in_time, out, &within, settings) {
                return MatchOutcome::Matched(build_result(
                    best.shift,
                    MatchMethod::OutTimeDisambiguated,
                    in_time,
                    segment.out_time,
                    best.distance,
                    settings,
                ));
            }
        }
        return escalate(&within, "arrival roughly equidistant between candidate starts");
    }

    // Non-ambiguous: rank with the preferred bias, then by distance.
    let mut ranked = within.clone();
    ranked.sort_by(|a, b| {
        let a_preferred = is_preferred(in_time, a);
        let b_preferred = is_preferred(in_time, b);
        b_preferred
            .cmp(&a_preferred)
            .then(a.distance.cmp(&b.distance))
            .then_with(|| a.shift.id.cmp(&b.shift.id))
    });
    let top = ranked[0];
    MatchOutcome::Matched(build_result(
        top.shift,
        MatchMethod::ProximityClosest,
        in_time,
        segment.out_time,
        top.distance,
        settings,
    ))
}

/// A candidate is preferred when its start precedes the punch (a late
/// arrival rather than an early one) by no more than 35 minutes.
fn is_preferred(in_time: NaiveDateTime, candidate: &Scored) -> bool {
    nearest_instant(candidate.shift.start_time, in_time) <= in_time
        && candidate.distance <= PREFERRED_START_WINDOW_MINUTES
}

/// Tests whether the arrival cannot safely be attributed to one candidate.
///
/// True when the top two candidates' distances differ by less than the
/// threshold, or when the punch lies roughly equidistant between its
/// neighboring candidate starts (the nearest start at-or-before and the
/// nearest start after, wrapping over midnight).
fn is_ambiguous_arrival(in_time: NaiveDateTime, within: &[Scored], threshold: i64) -> bool {
    if within[1].distance - within[0].distance < threshold {
        return true;
    }

    let in_minutes = minutes_of_day(in_time.time());
    let behind = |start| (in_minutes - minutes_of_day(start)).rem_euclid(MINUTES_PER_DAY);
    let ahead = |start| (minutes_of_day(start) - in_minutes).rem_euclid(MINUTES_PER_DAY);

    let lower = within
        .iter()
        .min_by_key(|s| (behind(s.shift.start_time), s.shift.id.clone()));
    let upper = within
        .iter()
        .min_by_key(|s| (ahead(s.shift.start_time), s.shift.id.clone()));
    if let (Some(lower), Some(upper)) = (lower, upper) {
        if lower.shift.id != upper.shift.id
            && (lower.distance - upper.distance).abs() < threshold
        {
            return true;
        }
    }
    false
}

/// Scores candidates by 0.6×in-distance + 0.4×out-distance and returns the
/// best when it beats the runner-up by more than half the out-time
/// tolerance.
fn disambiguate_by_out<'a>(
    in_time: NaiveDateTime,
    out: NaiveDateTime,
    within: &[Scored<'a>],
    settings: &EngineSettings,
) -> Option<Scored<'a>> {
    let mut weighted: Vec<(f64, Scored)> = within
        .iter()
        .map(|candidate| {
            let (_, end) = shift_window(candidate.shift, in_time);
            let out_distance = (out - end).num_minutes().abs() as f64;
            let score = 0.6 * candidate.distance as f64 + 0.4 * out_distance;
            (score, *candidate)
        })
        .collect();
    weighted.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.shift.id.cmp(&b.1.shift.id))
    });

    let margin = settings.out_time_tolerance() as f64 / 2.0;
    if weighted[1].0 - weighted[0].0 > margin {
        Some(weighted[0].1)
    } else {
        None
    }
}

fn escalate(within: &[Scored], reason: &str) -> MatchOutcome {
    let candidates = within
        .iter()
        .map(|s| ShiftCandidate {
            shift_id: s.shift.id.clone(),
            name: s.shift.name.clone(),
            start_time: s.shift.start_time,
            end_time: s.shift.end_time,
            distance_minutes: s.distance,
            reason: format!("{} min from shift start; {}", s.distance, reason),
        })
        .collect();
    MatchOutcome::Escalated { candidates }
}

fn build_result(
    shift: &ShiftDefinition,
    method: MatchMethod,
    in_time: NaiveDateTime,
    out_time: Option<NaiveDateTime>,
    distance: i64,
    settings: &EngineSettings,
) -> MatchResult {
    MatchResult {
        shift_id: shift.id.clone(),
        method,
        late_in_minutes: late_in_minutes(in_time, shift, settings.late_in_grace_minutes),
        early_out_minutes: early_out_minutes(
            in_time,
            out_time,
            shift,
            settings.early_out_grace_minutes,
        ),
        expected_hours: shift.expected_hours,
        distance_minutes: distance,
    }
}
