//! Configuration errors
//!
//! Gameplay itself never fails; everything here is caught before a session starts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("apple pool is empty")]
    EmptyApplePool,
    #[error(
        "degenerate spawn bounds: x [{x_min}, {x_max}], y [{y_min}, {y_max}], z [{z_near}, {z_far}] (z_near must be > 0)"
    )]
    DegenerateSpawnBounds {
        x_min: f32,
        x_max: f32,
        y_min: f32,
        y_max: f32,
        z_near: f32,
        z_far: f32,
    },
    #[error("invalid gameplay profile: {0}")]
    InvalidProfile(&'static str),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
