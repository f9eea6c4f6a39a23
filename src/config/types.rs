//! Engine tuning settings.
//!
//! All values are optional in the external settings source; absent values
//! fall through to the documented defaults via the accessor methods. The
//! resolved settings object is passed into each processing run at the top
//! level — pure matching/calculation functions never read configuration
//! implicitly.

use serde::{Deserialize, Serialize};

/// Default grace-period minutes (late-in, early-out, and duplicate-IN).
pub const DEFAULT_GRACE_MINUTES: i64 = 15;

/// Default proximity tolerance for shift matching, in minutes (3 hours).
pub const DEFAULT_PROXIMITY_TOLERANCE_MINUTES: i64 = 180;

/// Default threshold below which two candidate distances are ambiguous.
pub const DEFAULT_AMBIGUITY_THRESHOLD_MINUTES: i64 = 30;

/// Default tolerance for out-time disambiguation scoring, in minutes.
pub const DEFAULT_OUT_TIME_TOLERANCE_MINUTES: i64 = 60;

/// Default maximum number of work segments per day.
pub const DEFAULT_MAX_SEGMENTS_PER_DAY: usize = 3;

/// Minimum gap between a closed segment's IN and a repeated IN before the
/// repeat starts a new shift rather than being treated as noise.
pub const NEW_SHIFT_GAP_MINUTES: i64 = 60;

/// A candidate whose start precedes the punch by no more than this many
/// minutes is preferred over non-preferred candidates when ranking a
/// non-ambiguous match.
pub const PREFERRED_START_WINDOW_MINUTES: i64 = 35;

/// Numeric engine tuning, as read from the external settings source.
///
/// Any field may be absent and falls through to the stated default. The
/// late-in and early-out graces are global overrides: when present they take
/// precedence over a shift's own grace; when absent the shift's grace (or
/// the engine default) applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Global late-in grace override, minutes.
    #[serde(default)]
    pub late_in_grace_minutes: Option<i64>,
    /// Global early-out grace override, minutes.
    #[serde(default)]
    pub early_out_grace_minutes: Option<i64>,
    /// Grace past shift end within which a repeated IN closes the open
    /// segment.
    #[serde(default)]
    pub duplicate_in_grace_minutes: Option<i64>,
    /// Candidates farther than this from the IN punch are filtered out.
    #[serde(default)]
    pub proximity_tolerance_minutes: Option<i64>,
    /// Distances closer together than this make an arrival ambiguous.
    #[serde(default)]
    pub ambiguity_threshold_minutes: Option<i64>,
    /// Tolerance driving the out-time disambiguation margin.
    #[serde(default)]
    pub out_time_tolerance_minutes: Option<i64>,
    /// Hard cap on segments produced per day.
    #[serde(default)]
    pub max_segments_per_day: Option<usize>,
}

impl EngineSettings {
    /// The duplicate-IN grace, defaulting to 15 minutes.
    pub fn duplicate_in_grace(&self) -> i64 {
        self.duplicate_in_grace_minutes
            .unwrap_or(DEFAULT_GRACE_MINUTES)
    }

    /// The proximity tolerance window, defaulting to 180 minutes.
    pub fn proximity_tolerance(&self) -> i64 {
        self.proximity_tolerance_minutes
            .unwrap_or(DEFAULT_PROXIMITY_TOLERANCE_MINUTES)
    }

    /// The ambiguity threshold, defaulting to 30 minutes.
    pub fn ambiguity_threshold(&self) -> i64 {
        self.ambiguity_threshold_minutes
            .unwrap_or(DEFAULT_AMBIGUITY_THRESHOLD_MINUTES)
    }

    /// The out-time tolerance, defaulting to 60 minutes.
    pub fn out_time_tolerance(&self) -> i64 {
        self.out_time_tolerance_minutes
            .unwrap_or(DEFAULT_OUT_TIME_TOLERANCE_MINUTES)
    }

    /// The per-day segment cap, defaulting to 3.
    pub fn max_segments_per_day(&self) -> usize {
        self.max_segments_per_day
            .unwrap_or(DEFAULT_MAX_SEGMENTS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_absent() {
        let settings = EngineSettings::default();
        assert_eq!(settings.duplicate_in_grace(), 15);
        assert_eq!(settings.proximity_tolerance(), 180);
        assert_eq!(settings.ambiguity_threshold(), 30);
        assert_eq!(settings.out_time_tolerance(), 60);
        assert_eq!(settings.max_segments_per_day(), 3);
        assert_eq!(settings.late_in_grace_minutes, None);
        assert_eq!(settings.early_out_grace_minutes, None);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let settings = EngineSettings {
            duplicate_in_grace_minutes: Some(10),
            proximity_tolerance_minutes: Some(120),
            max_segments_per_day: Some(2),
            ..EngineSettings::default()
        };
        assert_eq!(settings.duplicate_in_grace(), 10);
        assert_eq!(settings.proximity_tolerance(), 120);
        assert_eq!(settings.max_segments_per_day(), 2);
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = "proximity_tolerance_minutes: 90\nlate_in_grace_minutes: 20\n";
        let settings: EngineSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.proximity_tolerance(), 90);
        assert_eq!(settings.late_in_grace_minutes, Some(20));
        assert_eq!(settings.ambiguity_threshold(), 30);
    }
}
