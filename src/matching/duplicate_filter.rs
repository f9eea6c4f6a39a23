//! Duplicate-IN / continuation filter.
//!
//! Punch machines produce repeated IN taps: a nervous double-tap seconds
//! apart, a forgotten OUT followed by the next shift's IN, or an IN that was
//! really meant as the OUT of the still-open segment. This filter decides,
//! for an IN punch arriving while the previous segment is open or just
//! closed, whether it starts a new session, closes the prior one, or is
//! noise.

use chrono::NaiveDateTime;

use crate::config::NEW_SHIFT_GAP_MINUTES;
use crate::models::ShiftDefinition;

use super::time_math::shift_window;

/// What to do with a repeated IN punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateInAction {
    /// Drop the punch as noise.
    Ignore,
    /// Open a new work segment at the punch's timestamp.
    NewShift,
    /// Use the punch as the OUT of the still-open segment.
    ConvertToOut,
    /// Close the open segment at the punch's timestamp AND open a new
    /// segment at the same timestamp.
    AutoCloseAndNewShift,
}

/// Classifies a repeated IN punch against the previous segment.
///
/// * Previous segment closed: a gap of at least 60 minutes from the
///   previous IN starts a new shift; anything closer is noise.
/// * Previous segment open with an assigned shift: the punch is noise while
///   still inside working hours, becomes the OUT when it lands between the
///   shift end and the grace end, and force-closes the segment (opening a
///   new one) past the grace end.
/// * Previous segment open with no assigned shift: the 60-minute gap rule
///   applies.
///
/// # Arguments
///
/// * `new_in` - The repeated IN punch's timestamp
/// * `previous_in` - The previous segment's IN timestamp
/// * `previous_out` - The previous segment's OUT, if closed
/// * `assigned_shift` - The shift provisionally assigned to the open
///   segment, if any
/// * `duplicate_in_grace` - Grace minutes past shift end (settings, default
///   15)
pub fn classify_duplicate_in(
    new_in: NaiveDateTime,
    previous_in: NaiveDateTime,
    previous_out: Option<NaiveDateTime>,
    assigned_shift: Option<&ShiftDefinition>,
    duplicate_in_grace: i64,
) -> DuplicateInAction {
    if previous_out.is_some() {
        return gap_rule(new_in, previous_in);
    }

    let Some(shift) = assigned_shift else {
        return gap_rule(new_in, previous_in);
    };

    let (_, shift_end) = shift_window(shift, previous_in);
    let grace_end = shift_end + chrono::Duration::minutes(duplicate_in_grace);

    if new_in < shift_end {
        DuplicateInAction::Ignore
    } else if new_in <= grace_end {
        DuplicateInAction::ConvertToOut
    } else {
        DuplicateInAction::AutoCloseAndNewShift
    }
}

fn gap_rule(new_in: NaiveDateTime, previous_in: NaiveDateTime) -> DuplicateInAction {
    let gap = (new_in - previous_in).num_minutes();
    if gap >= NEW_SHIFT_GAP_MINUTES {
        DuplicateInAction::NewShift
    } else {
        DuplicateInAction::Ignore
    }
}
