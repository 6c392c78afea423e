//! Gameplay profiles
//!
//! Each input mode plays with its own apple size, spawn volume, reveal cadence
//! and ribbon limits. A profile is picked once per mode switch and stays fixed
//! for the whole session.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Apple size used by the accessible variant of every profile
pub const ACCESSIBLE_APPLE_SIZE: f32 = 0.5;

/// How the player is interacting with the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputMode {
    #[default]
    Mouse,
    Touch,
    Pen,
    /// VR controllers holding light sabers
    VrLaser,
    /// VR controllers holding banana pistols
    VrBanana,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Mouse => "Mouse",
            InputMode::Touch => "Touch",
            InputMode::Pen => "Pen",
            InputMode::VrLaser => "VrLaser",
            InputMode::VrBanana => "VrBanana",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mouse" => Some(InputMode::Mouse),
            "touch" => Some(InputMode::Touch),
            "pen" => Some(InputMode::Pen),
            "vrlaser" | "laser" => Some(InputMode::VrLaser),
            "vrbanana" | "banana" => Some(InputMode::VrBanana),
            _ => None,
        }
    }

    pub fn is_vr(&self) -> bool {
        matches!(self, InputMode::VrLaser | InputMode::VrBanana)
    }
}

/// Pointer type reported with a pointer-down event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl From<PointerKind> for InputMode {
    fn from(kind: PointerKind) -> Self {
        match kind {
            PointerKind::Mouse => InputMode::Mouse,
            PointerKind::Touch => InputMode::Touch,
            PointerKind::Pen => InputMode::Pen,
        }
    }
}

/// Axis-aligned volume apples spawn in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    /// Closest spawn depth, must be strictly positive
    pub z_near: f32,
    pub z_far: f32,
}

impl SpawnBounds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            self.x_min, self.x_max, self.y_min, self.y_max, self.z_near, self.z_far,
        ]
        .iter()
        .all(|v| v.is_finite());

        if !finite
            || self.z_near <= 0.0
            || self.z_far < self.z_near
            || self.x_min > self.x_max
            || self.y_min > self.y_max
        {
            return Err(ConfigError::DegenerateSpawnBounds {
                x_min: self.x_min,
                x_max: self.x_max,
                y_min: self.y_min,
                y_max: self.y_max,
                z_near: self.z_near,
                z_far: self.z_far,
            });
        }
        Ok(())
    }
}

/// Tunable constants for one input mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameplayProfile {
    /// Scale applied to the apple mesh
    pub apple_size: f32,
    pub spawn_bounds: SpawnBounds,
    /// Base delay between two reveals at session start
    pub pop_interval_ms: u64,
    /// Swipe length (normalized screen units) after which a stroke is cut
    pub max_ribbon_distance: f32,
    /// Half-width of the ribbon and of the jittered hit test
    pub ribbon_thickness: f32,
}

impl GameplayProfile {
    const DESKTOP_BOUNDS: SpawnBounds = SpawnBounds {
        x_min: -8.0,
        x_max: 8.0,
        y_min: -0.8,
        y_max: 2.2,
        z_near: 80.0,
        z_far: 120.0,
    };

    const VR_BOUNDS: SpawnBounds = SpawnBounds {
        x_min: -1.7,
        x_max: 1.7,
        y_min: -1.0,
        y_max: 0.0,
        z_near: 100.0,
        z_far: 140.0,
    };

    /// Preset for an input mode
    pub fn for_mode(mode: InputMode) -> Self {
        match mode {
            InputMode::Mouse => Self {
                apple_size: 0.25,
                spawn_bounds: Self::DESKTOP_BOUNDS,
                pop_interval_ms: 2000,
                max_ribbon_distance: 0.12,
                ribbon_thickness: 0.005,
            },
            InputMode::Touch => Self {
                apple_size: 0.3,
                spawn_bounds: Self::DESKTOP_BOUNDS,
                pop_interval_ms: 1500,
                max_ribbon_distance: 0.2,
                ribbon_thickness: 0.01,
            },
            InputMode::Pen => Self {
                apple_size: 0.25,
                spawn_bounds: Self::DESKTOP_BOUNDS,
                pop_interval_ms: 2000,
                max_ribbon_distance: 0.2,
                ribbon_thickness: 0.005,
            },
            InputMode::VrLaser => Self {
                apple_size: 0.078,
                spawn_bounds: Self::VR_BOUNDS,
                pop_interval_ms: 2000,
                max_ribbon_distance: 0.12,
                ribbon_thickness: 0.005,
            },
            InputMode::VrBanana => Self {
                apple_size: 0.16,
                spawn_bounds: Self::VR_BOUNDS,
                pop_interval_ms: 2000,
                max_ribbon_distance: 0.12,
                ribbon_thickness: 0.005,
            },
        }
    }

    /// Same profile with the bigger accessible apples
    pub fn accessible(mut self) -> Self {
        self.apple_size = ACCESSIBLE_APPLE_SIZE;
        self
    }

    /// World-space pick radius of an apple under this profile
    pub fn apple_radius(&self) -> f32 {
        self.apple_size * crate::consts::APPLE_MESH_RADIUS
    }

    /// Reject profiles the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spawn_bounds.validate()?;
        if !(self.apple_size > 0.0) {
            return Err(ConfigError::InvalidProfile("apple size must be positive"));
        }
        if self.pop_interval_ms == 0 {
            return Err(ConfigError::InvalidProfile("pop interval must be positive"));
        }
        if !(self.max_ribbon_distance > 0.0) {
            return Err(ConfigError::InvalidProfile(
                "max ribbon distance must be positive",
            ));
        }
        if !(self.ribbon_thickness > 0.0) {
            return Err(ConfigError::InvalidProfile("ribbon thickness must be positive"));
        }
        Ok(())
    }
}

impl Default for GameplayProfile {
    fn default() -> Self {
        Self::for_mode(InputMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for mode in [
            InputMode::Mouse,
            InputMode::Touch,
            InputMode::Pen,
            InputMode::VrLaser,
            InputMode::VrBanana,
        ] {
            let profile = GameplayProfile::for_mode(mode);
            assert!(profile.validate().is_ok(), "{} preset invalid", mode.as_str());
            assert!(profile.clone().accessible().validate().is_ok());
        }
    }

    #[test]
    fn test_touch_preset_values() {
        let touch = GameplayProfile::for_mode(InputMode::Touch);
        assert_eq!(touch.pop_interval_ms, 1500);
        assert!((touch.apple_size - 0.3).abs() < 1e-6);
        assert!((touch.max_ribbon_distance - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_zero_near_plane_rejected() {
        let mut profile = GameplayProfile::default();
        profile.spawn_bounds.z_near = 0.0;
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::DegenerateSpawnBounds { .. })
        ));
    }

    #[test]
    fn test_inverted_x_rejected() {
        let mut profile = GameplayProfile::default();
        profile.spawn_bounds.x_min = 5.0;
        profile.spawn_bounds.x_max = -5.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_zero_pop_interval_rejected() {
        let mut profile = GameplayProfile::default();
        profile.pop_interval_ms = 0;
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_accessible_enlarges_apples() {
        let profile = GameplayProfile::for_mode(InputMode::VrLaser).accessible();
        assert!((profile.apple_size - ACCESSIBLE_APPLE_SIZE).abs() < 1e-6);
    }

    #[test]
    fn test_input_mode_from_str() {
        assert_eq!(InputMode::from_str("Touch"), Some(InputMode::Touch));
        assert_eq!(InputMode::from_str("banana"), Some(InputMode::VrBanana));
        assert_eq!(InputMode::from_str("joystick"), None);
        assert!(InputMode::VrLaser.is_vr());
        assert!(!InputMode::Pen.is_vr());
    }
}
