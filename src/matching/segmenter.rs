//! Shift segmentation.
//!
//! Turns a day's chronologically sorted punch stream into ordered
//! [`WorkSegment`]s, applying the duplicate-IN / continuation filter to
//! decide boundaries. A segment's calendar date is the date of its IN punch
//! even if its OUT falls on the next date (overnight).

use chrono::NaiveDateTime;

use crate::config::EngineSettings;
use crate::models::{Punch, ShiftDefinition, WorkSegment};

use super::duplicate_filter::{DuplicateInAction, classify_duplicate_in};
use super::matcher::nearest_by_proximity;

#[derive(Debug, Default)]
struct SegmentDraft {
    in_time: Option<NaiveDateTime>,
    out_time: Option<NaiveDateTime>,
}

impl SegmentDraft {
    fn opened_at(ts: NaiveDateTime) -> Self {
        Self {
            in_time: Some(ts),
            out_time: None,
        }
    }

    fn is_open(&self) -> bool {
        self.in_time.is_some() && self.out_time.is_none()
    }
}

/// Segments a day's punches into ordered work segments.
///
/// Punches are sorted by timestamp before processing. Repeated IN punches
/// go through [`classify_duplicate_in`]; the open segment's provisional
/// shift (the catalog candidate nearest to its IN) supplies the
/// continuation window. Segment count is capped by
/// `settings.max_segments_per_day()`; punches that would open a segment
/// beyond the cap are dropped.
///
/// OUT punches close the open segment. A later OUT arriving while the
/// previous segment is already closed replaces its OUT (the final tap
/// wins). An OUT with no prior IN yields a malformed segment that is
/// excluded from matching but still counted in aggregation.
pub fn segment_punches(
    punches: &[Punch],
    catalog: &[ShiftDefinition],
    settings: &EngineSettings,
) -> Vec<WorkSegment> {
    let mut sorted: Vec<&Punch> = punches.iter().collect();
    sorted.sort_by_key(|p| p.timestamp);

    let cap = settings.max_segments_per_day();
    let grace = settings.duplicate_in_grace();
    let mut drafts: Vec<SegmentDraft> = Vec::new();

    for punch in sorted {
        let ts = punch.timestamp;
        if punch.is_in() {
            apply_in(&mut drafts, ts, catalog, grace, cap);
        } else {
            apply_out(&mut drafts, ts, cap);
        }
    }

    drafts
        .into_iter()
        .enumerate()
        .map(|(i, d)| WorkSegment::new(i + 1, d.in_time, d.out_time))
        .collect()
}

fn apply_in(
    drafts: &mut Vec<SegmentDraft>,
    ts: NaiveDateTime,
    catalog: &[ShiftDefinition],
    grace: i64,
    cap: usize,
) {
    let Some(last) = drafts.last_mut() else {
        open_segment(drafts, ts, cap);
        return;
    };

    let Some(previous_in) = last.in_time else {
        // A malformed (OUT-only) segment cannot continue; start fresh.
        open_segment(drafts, ts, cap);
        return;
    };

    let provisional = if last.is_open() {
        nearest_by_proximity(catalog, previous_in)
    } else {
        None
    };

    match classify_duplicate_in(ts, previous_in, last.out_time, provisional, grace) {
        DuplicateInAction::Ignore => {}
        DuplicateInAction::NewShift => {
            // Only the chronologically last segment may stay open: an open
            // segment with no shift to bound it closes at the new IN.
            if last.is_open() {
                last.out_time = Some(ts);
            }
            open_segment(drafts, ts, cap);
        }
        DuplicateInAction::ConvertToOut => last.out_time = Some(ts),
        DuplicateInAction::AutoCloseAndNewShift => {
            last.out_time = Some(ts);
            open_segment(drafts, ts, cap);
        }
    }
}

fn apply_out(drafts: &mut Vec<SegmentDraft>, ts: NaiveDateTime, cap: usize) {
    match drafts.last_mut() {
        Some(last) if last.is_open() => last.out_time = Some(ts),
        Some(last) => {
            // Already closed (or OUT-only): the final tap wins.
            if last.out_time.is_some_and(|out| ts > out) {
                last.out_time = Some(ts);
            }
        }
        None => {
            // OUT with no prior IN: malformed segment.
            if drafts.len() < cap {
                drafts.push(SegmentDraft {
                    in_time: None,
                    out_time: Some(ts),
                });
            }
        }
    }
}

fn open_segment(drafts: &mut Vec<SegmentDraft>, ts: NaiveDateTime, cap: usize) {
    if drafts.len() < cap {
        drafts.push(SegmentDraft::opened_at(ts));
    }
}
