//! Apple Crusher - slice or shoot the apples before they fly past you
//!
//! Core modules:
//! - `sim`: Deterministic gameplay (apple flights, swipe trails, hit tests, session pacing)
//! - `platform`: Seams to the host engine (screen projection, picking) plus a reference camera
//! - `profile`: Per-input-mode gameplay tuning
//! - `settings`: Player configuration loaded from JSON
//! - `effects`: Fire-and-forget visual/audio cues emitted by the simulation

pub mod effects;
pub mod error;
pub mod platform;
pub mod profile;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use profile::{GameplayProfile, InputMode, PointerKind, SpawnBounds};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Frame rate the apple speeds were tuned against
    pub const REFERENCE_FPS: f32 = 15.0;

    /// Apple z decrease per tick at `fps_factor == 1`
    pub const APPLE_SPEED: f32 = 2.0;
    /// Apple spin per tick (radians, x and y axes) at `fps_factor == 1`
    pub const APPLE_SPIN: f32 = 1.0 / 5.0;
    /// Apples at or behind this z have flown past the player
    pub const MISS_PLANE_Z: f32 = -1.0;
    /// Pick radius of an unscaled apple mesh (world units)
    pub const APPLE_MESH_RADIUS: f32 = 4.0;
    /// Default number of pooled apples
    pub const APPLE_POOL_SIZE: usize = 10;

    /// Horizontal tangent magnitude range for curved flights
    pub const TANGENT_X_MAX: f32 = 40.0;
    /// Vertical tangent range (symmetric) for curved flights
    pub const TANGENT_Y_MAX: f32 = 20.0;

    /// Swipe segments longer than this (normalized screen units) are sub-sampled
    pub const SWIPE_SAMPLE_THRESHOLD: f32 = 0.005;
    /// Upper bound on sub-samples tested for one swipe segment
    pub const MAX_SWIPE_SAMPLES: u32 = 512;
    /// Pointer moves shorter than this (normalized screen units) are merged into the next one
    pub const MIN_RIBBON_STEP: f32 = 0.001;

    /// Particle emitters rotated through on hits
    pub const PARTICLE_EMITTERS: usize = 3;

    /// Session length
    pub const SESSION_LENGTH_MS: u64 = 60_000;
    /// Countdown tick period
    pub const CLOCK_TICK_MS: u64 = 250;
    /// Delay before the first reveal after Continue
    pub const RESUME_REVEAL_DELAY_MS: u64 = 300;

    /// Projectiles are dropped once they have travelled this far
    pub const PROJECTILE_CUTOFF: f32 = 200.0;
    /// Initial projectile stride per tick
    pub const PROJECTILE_START_STRIDE: f32 = 0.15;
    /// Stride growth per tick
    pub const PROJECTILE_ACCELERATION: f32 = 1.125;
    /// Live projectile cap
    pub const MAX_PROJECTILES: usize = 32;
    /// Length of the forward hit ray cast by projectiles and laser sabers
    pub const FORWARD_RAY_LENGTH: f32 = 2.0;
    /// Trigger value a pull must exceed to fire
    pub const TRIGGER_FIRE_THRESHOLD: f32 = 0.65;
    /// Trigger value a release must drop below before the next shot
    pub const TRIGGER_REARM_THRESHOLD: f32 = 0.35;
}

/// Convert the current render rate into the per-tick motion scale.
///
/// Non-positive rates (first frame, stalled engine) are clamped to 1 fps.
#[inline]
pub fn fps_factor(current_fps: f32) -> f32 {
    consts::REFERENCE_FPS / current_fps.max(1.0)
}

/// Format whole remaining seconds the way the HUD shows them ("0:07", "1:00")
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_factor() {
        assert!((fps_factor(15.0) - 1.0).abs() < 1e-6);
        assert!((fps_factor(60.0) - 0.25).abs() < 1e-6);
        assert!((fps_factor(0.0) - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(60), "1:00");
        assert_eq!(format_remaining(59), "0:59");
        assert_eq!(format_remaining(7), "0:07");
    }
}
