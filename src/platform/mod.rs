//! Host engine seams
//!
//! The simulation owns no camera or scene graph. It asks the host for:
//! - screen to world projection of pointer positions
//! - picking of apples under a screen point
//! - somewhere to send ribbons, particles and sounds
//!
//! Screen points are normalized viewport coordinates: (0, 0) top-left, (1, 1) bottom-right.

pub mod camera;

pub use camera::Camera;

use glam::{Vec2, Vec3};

use crate::effects::EffectsSink;
use crate::sim::AppleId;

/// Converts a screen point to a world point using camera state it alone owns
pub trait ScreenProjector {
    fn project(&self, screen: Vec2) -> Vec3;
}

/// An apple the picker may report, already filtered to active and visible ones
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickTarget {
    pub id: AppleId,
    pub position: Vec3,
    pub radius: f32,
}

/// Result of a successful pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub id: AppleId,
    pub position: Vec3,
}

/// Finds which target, if any, lies under a screen point
pub trait Picker {
    fn pick(&self, screen: Vec2, targets: &[PickTarget]) -> Option<PickHit>;
}

/// Everything a tick borrows from the host
pub struct Services<'a> {
    pub projector: &'a dyn ScreenProjector,
    pub picker: &'a dyn Picker,
    pub effects: &'a mut dyn EffectsSink,
}

impl<'a> Services<'a> {
    /// Services backed by one camera for both projection and picking
    pub fn with_camera(camera: &'a Camera, effects: &'a mut dyn EffectsSink) -> Self {
        Self {
            projector: camera,
            picker: camera,
            effects,
        }
    }
}
