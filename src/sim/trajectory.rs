//! Apple flight paths
//!
//! Apples fly from their spawn point toward the player plane (z = 0) along a
//! cubic Hermite curve. The curve parameter is the remaining depth ratio
//! `t = z / spawn_z`, so t runs from 1 at spawn down to 0 at the player.

use glam::Vec3;
use rand::Rng;

use super::state::{Apple, AppleState, Playfield};
use crate::consts::{APPLE_SPEED, APPLE_SPIN, MISS_PLANE_Z, TANGENT_X_MAX, TANGENT_Y_MAX};
use crate::profile::GameplayProfile;

/// Cubic Hermite interpolation between `p0` (t = 0) and `p1` (t = 1)
#[inline]
pub fn hermite(p0: Vec3, m0: Vec3, p1: Vec3, m1: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11
}

/// Pick a new spawn position and flight curve inside the profile's bounds.
///
/// Curves bend outward on the side the apple spawned on and cross back
/// toward it near the player.
pub fn reset_apple<R: Rng>(apple: &mut Apple, profile: &GameplayProfile, rng: &mut R) {
    let b = &profile.spawn_bounds;
    let x = rng.random_range(b.x_min..=b.x_max);
    let y = rng.random_range(b.y_min..=b.y_max);
    let z = rng.random_range(b.z_near..=b.z_far);
    let sign = if x < 0.0 { -1.0 } else { 1.0 };

    let force_x = rng.random_range(0.0..=TANGENT_X_MAX);
    let force_y = rng.random_range(-TANGENT_Y_MAX..=TANGENT_Y_MAX);

    apple.position = Vec3::new(x, y, z);
    apple.start_point = Vec3::new(x, y, 0.0);
    apple.start_tangent = Vec3::new(sign * force_x, force_y, 0.0);
    apple.end_point = apple.position;
    apple.end_tangent = Vec3::new(-sign * force_x, -force_y, 0.0);
}

/// Move an active apple one tick closer. Returns true if it just flew past the player.
pub fn advance(apple: &mut Apple, fps_factor: f32) -> bool {
    if !apple.is_active() {
        return false;
    }

    apple.rotation += APPLE_SPIN * fps_factor;
    apple.position.z -= APPLE_SPEED * fps_factor;

    let t = apple.position.z / apple.end_point.z;
    let on_curve = hermite(
        apple.start_point,
        apple.start_tangent,
        apple.end_point,
        apple.end_tangent,
        t,
    );
    apple.position.x = on_curve.x;
    apple.position.y = on_curve.y;

    apple.position.z <= MISS_PLANE_Z
}

/// Advance every active apple, retiring and recycling the ones that got past.
///
/// Returns the number of misses recorded this tick.
pub fn advance_all(field: &mut Playfield, fps_factor: f32) -> u32 {
    let mut misses = 0;
    for apple in field.apples.iter_mut() {
        if advance(apple, fps_factor) {
            field.score.record_miss();
            apple.state = AppleState::Hidden;
            reset_apple(apple, &field.profile, &mut field.rng);
            log::debug!("Apple {} missed", apple.id.0);
            misses += 1;
        }
    }
    misses
}
