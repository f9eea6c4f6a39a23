//! Configuration loading and management for the Attendance Reconciliation
//! Engine.
//!
//! Tuning values load from a YAML settings file; any absent value falls
//! through to the engine default.

mod loader;
mod types;

pub use loader::SettingsLoader;
pub use types::{
    DEFAULT_AMBIGUITY_THRESHOLD_MINUTES, DEFAULT_GRACE_MINUTES, DEFAULT_MAX_SEGMENTS_PER_DAY,
    DEFAULT_OUT_TIME_TOLERANCE_MINUTES, DEFAULT_PROXIMITY_TOLERANCE_MINUTES, EngineSettings,
    NEW_SHIFT_GAP_MINUTES, PREFERRED_START_WINDOW_MINUTES,
};
