//! Player settings
//!
//! Stored as JSON next to the binary; every field is optional in the file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{APPLE_POOL_SIZE, SESSION_LENGTH_MS};
use crate::error::ConfigError;
use crate::profile::{GameplayProfile, InputMode};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Input mode the first session starts in
    pub input_mode: InputMode,
    /// Bigger apples for every input mode
    pub accessible: bool,
    /// Number of pooled apples
    pub apple_pool_size: usize,
    /// RNG seed for spawn positions and flight curves
    pub seed: u64,
    /// Session length in milliseconds
    pub session_length_ms: u64,
    /// Replaces the input mode preset when set
    pub custom_profile: Option<GameplayProfile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Mouse,
            accessible: false,
            apple_pool_size: APPLE_POOL_SIZE,
            seed: 12345,
            session_length_ms: SESSION_LENGTH_MS,
            custom_profile: None,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Profile for the given input mode, honouring the custom override and accessibility
    pub fn profile_for(&self, mode: InputMode) -> GameplayProfile {
        let profile = self
            .custom_profile
            .clone()
            .unwrap_or_else(|| GameplayProfile::for_mode(mode));
        if self.accessible {
            profile.accessible()
        } else {
            profile
        }
    }

    /// Profile for the configured input mode
    pub fn profile(&self) -> GameplayProfile {
        self.profile_for(self.input_mode)
    }

    /// Check everything a session needs before it can start
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.apple_pool_size == 0 {
            return Err(ConfigError::EmptyApplePool);
        }
        if self.session_length_ms == 0 {
            return Err(ConfigError::InvalidProfile("session length must be positive"));
        }
        self.profile().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "input_mode": "Touch", "seed": 7 }"#).unwrap();
        assert_eq!(settings.input_mode, InputMode::Touch);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.apple_pool_size, APPLE_POOL_SIZE);
        assert_eq!(settings.profile().pop_interval_ms, 1500);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_empty_pool_rejected() {
        let settings = Settings {
            apple_pool_size: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::EmptyApplePool)));
    }

    #[test]
    fn test_custom_profile_degenerate_bounds_rejected() {
        let mut profile = GameplayProfile::default();
        profile.spawn_bounds.z_near = -3.0;
        let settings = Settings {
            custom_profile: Some(profile),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::DegenerateSpawnBounds { .. })
        ));
    }

    #[test]
    fn test_accessible_applies_to_profile() {
        let settings = Settings {
            accessible: true,
            ..Default::default()
        };
        assert!((settings.profile().apple_size - 0.5).abs() < 1e-6);
    }
}
