//! Settings loading functionality.
//!
//! This module provides the [`SettingsLoader`] type for loading engine
//! tuning values from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineSettings;

/// Loads and provides access to engine settings.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::SettingsLoader;
///
/// let loader = SettingsLoader::load("./config/settings.yaml").unwrap();
/// assert_eq!(loader.settings().proximity_tolerance(), 180);
/// ```
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    settings: EngineSettings,
}

impl SettingsLoader {
    /// Loads settings from the specified YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the settings file (e.g., "./config/settings.yaml")
    ///
    /// # Returns
    ///
    /// Returns a `SettingsLoader` on success, or an error if the file is
    /// missing or contains invalid YAML. Absent values inside the file fall
    /// through to the engine defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let settings =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Ok(Self { settings })
    }

    /// Returns the loaded settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_path() -> &'static str {
        "./config/settings.yaml"
    }

    #[test]
    fn test_load_valid_settings() {
        let result = SettingsLoader::load(settings_path());
        assert!(result.is_ok(), "Failed to load settings: {:?}", result.err());
    }

    #[test]
    fn test_shipped_settings_match_engine_defaults() {
        let loader = SettingsLoader::load(settings_path()).unwrap();
        let settings = loader.settings();

        assert_eq!(settings.duplicate_in_grace(), 15);
        assert_eq!(settings.proximity_tolerance(), 180);
        assert_eq!(settings.ambiguity_threshold(), 30);
        assert_eq!(settings.out_time_tolerance(), 60);
        assert_eq!(settings.max_segments_per_day(), 3);
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = SettingsLoader::load("/nonexistent/settings.yaml");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("settings.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }
}
