//! Fixed player camera with projection matrices.
//!
//! Reference implementation of [`ScreenProjector`] and [`Picker`] for headless
//! runs and tests. Left-handed: the player looks down +Z, apples fly toward -Z.

use glam::{Mat4, Vec2, Vec3};

use super::{PickHit, PickTarget, Picker, ScreenProjector};

/// Camera at the player's head looking straight at the spawn volume.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position (world space).
    pub eye: Vec3,
    /// Vertical FOV (rad).
    pub fov: f32,
    /// Viewport width / height.
    pub aspect: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 0.0),
            fov: 0.8,
            aspect,
            near: 1.0,
            far: 1000.0,
        }
    }

    /// View matrix (world → camera).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_lh(self.eye, Vec3::Z, Vec3::Y)
    }

    /// Projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    fn focal(&self) -> f32 {
        1.0 / (self.fov * 0.5).tan()
    }

    /// Screen point and view depth of a world point, `None` when behind the near plane.
    pub fn world_to_screen(&self, world: Vec3) -> Option<(Vec2, f32)> {
        let view = self.view_matrix().transform_point3(world);
        if view.z <= self.near {
            return None;
        }
        let ndc = self.projection_matrix().project_point3(view);
        let screen = Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5);
        Some((screen, view.z))
    }

    /// Apparent radius of a sphere in normalized screen-height units.
    pub fn screen_radius(&self, radius: f32, depth: f32) -> f32 {
        radius * self.focal() / (2.0 * depth)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

impl ScreenProjector for Camera {
    /// Unproject onto the near plane.
    fn project(&self, screen: Vec2) -> Vec3 {
        let ndc = Vec3::new(screen.x * 2.0 - 1.0, 1.0 - screen.y * 2.0, 0.0);
        self.view_projection().inverse().project_point3(ndc)
    }
}

impl Picker for Camera {
    /// Nearest target whose projected disc contains the point.
    fn pick(&self, screen: Vec2, targets: &[PickTarget]) -> Option<PickHit> {
        let aspect_scale = Vec2::new(self.aspect, 1.0);
        targets
            .iter()
            .filter_map(|target| {
                let (center, depth) = self.world_to_screen(target.position)?;
                let offset = (screen - center) * aspect_scale;
                (offset.length() <= self.screen_radius(target.radius, depth)).then_some((target, depth))
            })
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(target, _)| PickHit {
                id: target.id,
                position: target.position,
            })
    }
}
