//! Hit testing against live apples
//!
//! Swipes are tested as points in screen space. A ribbon has width, so each
//! point is also tried one ribbon thickness above and below. Fast swipes move
//! further between two events than an apple is wide, so long segments are
//! sub-sampled to keep them from tunnelling through.
//!
//! VR projectiles and sabers test a short forward ray against apple spheres.

use glam::{Vec2, Vec3};

use super::state::{AppleId, AppleState, Playfield};
use super::trajectory;
use crate::consts::{
    FORWARD_RAY_LENGTH, MAX_SWIPE_SAMPLES, PARTICLE_EMITTERS, SWIPE_SAMPLE_THRESHOLD,
};
use crate::effects::{EffectsSink, SoundCue};
use crate::platform::{PickTarget, Picker};

/// Round-robin over the pooled particle emitters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitterRing {
    next: usize,
}

impl EmitterRing {
    /// Emitter the next burst will use
    pub fn current(&self) -> usize {
        self.next
    }

    /// Take the next emitter and rotate
    pub fn advance(&mut self) -> usize {
        let emitter = self.next;
        self.next = (self.next + 1) % PARTICLE_EMITTERS;
        emitter
    }
}

/// Distance along a ray to the first intersection with a sphere, if within `max_t`
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32, max_t: f32) -> Option<f32> {
    let to_center = origin - center;
    let b = to_center.dot(dir);
    let c = to_center.length_squared() - radius * radius;

    // Origin inside the sphere
    if c <= 0.0 {
        return Some(0.0);
    }
    // Pointing away
    if b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t <= max_t).then_some(t)
}

/// Borrowed view over the playfield and host services used to resolve hits
pub struct CollisionResolver<'a> {
    pub field: &'a mut Playfield,
    pub picker: &'a dyn Picker,
    pub effects: &'a mut dyn EffectsSink,
}

impl<'a> CollisionResolver<'a> {
    pub fn new(
        field: &'a mut Playfield,
        picker: &'a dyn Picker,
        effects: &'a mut dyn EffectsSink,
    ) -> Self {
        Self {
            field,
            picker,
            effects,
        }
    }

    fn targets(&self) -> Vec<PickTarget> {
        let radius = self.field.profile.apple_radius();
        self.field
            .apples
            .active()
            .map(|apple| PickTarget {
                id: apple.id,
                position: apple.position,
                radius,
            })
            .collect()
    }

    /// Pick a single screen point; crushes and returns the apple under it
    pub fn test_point(&mut self, screen: Vec2) -> Option<AppleId> {
        let targets = self.targets();
        if targets.is_empty() {
            return None;
        }
        let hit = self.picker.pick(screen, &targets)?;
        self.strike(hit.id).then_some(hit.id)
    }

    /// Exact point, then one ribbon thickness above and below
    pub fn test_point_with_jitter(&mut self, screen: Vec2, thickness: f32) -> Option<AppleId> {
        self.test_point(screen)
            .or_else(|| self.test_point(screen - Vec2::new(0.0, thickness)))
            .or_else(|| self.test_point(screen + Vec2::new(0.0, thickness)))
    }

    /// Test the newest point of a swipe, sub-sampling back toward the previous one on a miss
    pub fn test_segment(&mut self, prev: Vec2, curr: Vec2) -> Option<AppleId> {
        let thickness = self.field.profile.ribbon_thickness;
        if let Some(id) = self.test_point_with_jitter(curr, thickness) {
            return Some(id);
        }

        let distance = prev.distance(curr);
        if !distance.is_finite() || distance <= SWIPE_SAMPLE_THRESHOLD {
            return None;
        }

        // Samples land every threshold step along the segment, capped for huge jumps
        let samples = ((distance / SWIPE_SAMPLE_THRESHOLD).ceil() as u32).min(MAX_SWIPE_SAMPLES);
        (1..samples).find_map(|i| {
            let amount = i as f32 / samples as f32;
            self.test_point_with_jitter(prev.lerp(curr, amount), thickness)
        })
    }

    /// Cast the short forward ray of a projectile or saber
    pub fn test_forward_ray(&mut self, origin: Vec3, forward: Vec3) -> Option<AppleId> {
        let dir = forward.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        let radius = self.field.profile.apple_radius();
        let id = self
            .field
            .apples
            .active()
            .filter_map(|apple| {
                ray_sphere(origin, dir, apple.position, radius, FORWARD_RAY_LENGTH)
                    .map(|t| (apple.id, t))
            })
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(id, _)| id)?;
        self.strike(id).then_some(id)
    }

    /// Crush an apple: count it, burst particles, and send it back to the pool.
    ///
    /// Only active apples can be struck; anything else is a no-op returning false.
    pub fn strike(&mut self, id: AppleId) -> bool {
        let field = &mut *self.field;
        let Some(apple) = field.apples.get_mut(id) else {
            return false;
        };
        if !apple.is_active() {
            return false;
        }

        let position = apple.position;
        field.score.record_touch();
        let emitter = field.emitters.advance();
        self.effects.particle_burst(emitter, position);
        self.effects.play(SoundCue::AppleCrushed);

        apple.state = AppleState::Hidden;
        trajectory::reset_apple(apple, &field.profile, &mut field.rng);
        log::debug!("Apple {} crushed (touched={})", id.0, field.score.touched());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::RecordingEffects;
    use crate::platform::PickHit;
    use crate::profile::GameplayProfile;
    use crate::sim::score::ScoreTracker;
    use crate::sim::state::ApplePool;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::cell::RefCell;

    /// Flat picker: targets are hit when their (x, y) is within radius of the screen point
    #[derive(Default)]
    struct FlatPicker {
        probes: RefCell<Vec<Vec2>>,
    }

    impl Picker for FlatPicker {
        fn pick(&self, screen: Vec2, targets: &[PickTarget]) -> Option<PickHit> {
            self.probes.borrow_mut().push(screen);
            targets
                .iter()
                .find(|t| t.position.truncate().distance(screen) <= t.radius)
                .map(|t| PickHit {
                    id: t.id,
                    position: t.position,
                })
        }
    }

    fn field_with_apple_at(x: f32, y: f32) -> Playfield {
        let mut profile = GameplayProfile::default();
        profile.apple_size = 0.01 / crate::consts::APPLE_MESH_RADIUS;
        let mut field = Playfield {
            profile,
            apples: ApplePool::new(2),
            score: ScoreTracker::default(),
            emitters: EmitterRing::default(),
            rng: Pcg32::seed_from_u64(11),
        };
        field.reset_apples();
        let id = field.apples.reveal_next().unwrap();
        field.apples.get_mut(id).unwrap().position = Vec3::new(x, y, 50.0);
        field
    }

    #[test]
    fn test_point_hit_crushes_apple() {
        let mut field = field_with_apple_at(0.5, 0.5);
        let picker = FlatPicker::default();
        let mut fx = RecordingEffects::new();
        let mut resolver = CollisionResolver::new(&mut field, &picker, &mut fx);

        assert_eq!(resolver.test_point(Vec2::new(0.5, 0.5)), Some(AppleId(0)));
        assert_eq!(field.score.touched(), 1);
        assert_eq!(field.apples.active_count(), 0);
        assert_eq!(field.emitters.current(), 1);
        assert_eq!(fx.bursts().count(), 1);
        assert_eq!(fx.sounds().next(), Some(SoundCue::AppleCrushed));
    }

    #[test]
    fn test_no_candidates_skips_picker() {
        let mut field = field_with_apple_at(0.5, 0.5);
        field.apples.hide_all();
        let picker = FlatPicker::default();
        let mut fx = RecordingEffects::new();
        let mut resolver = CollisionResolver::new(&mut field, &picker, &mut fx);

        assert_eq!(resolver.test_point(Vec2::new(0.5, 0.5)), None);
        assert!(picker.probes.borrow().is_empty());
    }

    #[test]
    fn test_jitter_catches_just_above() {
        let mut field = field_with_apple_at(0.5, 0.5);
        let thickness = field.profile.ribbon_thickness;
        let picker = FlatPicker::default();
        let mut fx = RecordingEffects::new();
        let mut resolver = CollisionResolver::new(&mut field, &picker, &mut fx);

        // 0.013 below the apple: exact point misses (radius 0.01), y - thickness reaches it
        let probe = Vec2::new(0.5, 0.5 + 0.01 + thickness * 0.6);
        assert!(resolver.test_point(probe).is_none());
        assert_eq!(resolver.test_point_with_jitter(probe, thickness), Some(AppleId(0)));
        assert_eq!(picker.probes.borrow().len(), 3);
    }

    #[test]
    fn test_fast_swipe_does_not_tunnel() {
        let mut field = field_with_apple_at(0.5, 0.5);
        let picker = FlatPicker::default();
        let mut fx = RecordingEffects::new();
        let mut resolver = CollisionResolver::new(&mut field, &picker, &mut fx);

        let hit = resolver.test_segment(Vec2::new(0.3, 0.5), Vec2::new(0.7, 0.5));
        assert_eq!(hit, Some(AppleId(0)));
        assert_eq!(field.score.touched(), 1);
    }

    #[test]
    fn test_short_segment_not_subsampled() {
        let mut field = field_with_apple_at(0.9, 0.9);
        let picker = FlatPicker::default();
        let mut fx = RecordingEffects::new();
        let mut resolver = CollisionResolver::new(&mut field, &picker, &mut fx);

        assert!(resolver
            .test_segment(Vec2::new(0.3, 0.3), Vec2::new(0.303, 0.3))
            .is_none());
        // Only the jittered current point
        assert_eq!(picker.probes.borrow().len(), 3);
    }

    #[test]
    fn test_swipe_far_from_apple_misses() {
        let mut field = field_with_apple_at(0.5, 0.5);
        let picker = FlatPicker::default();
        let mut fx = RecordingEffects::new();
        let mut resolver = CollisionResolver::new(&mut field, &picker, &mut fx);

        assert!(resolver
            .test_segment(Vec2::new(0.1, 0.2), Vec2::new(0.9, 0.2))
            .is_none());
        assert_eq!(field.score.touched(), 0);
    }

    #[test]
    fn test_segment_counts_apple_once() {
        let mut field = field_with_apple_at(0.5, 0.5);
        let picker = FlatPicker::default();
        let mut fx = RecordingEffects::new();
        let mut resolver = CollisionResolver::new(&mut field, &picker, &mut fx);

        resolver.test_segment(Vec2::new(0.4, 0.5), Vec2::new(0.6, 0.5));
        resolver.test_segment(Vec2::new(0.4, 0.5), Vec2::new(0.6, 0.5));
        assert_eq!(field.score.touched(), 1);
    }

    #[test]
    fn test_huge_segment_sample_count_is_bounded() {
        let mut field = field_with_apple_at(0.9, 0.9);
        let picker = FlatPicker::default();
        let mut fx = RecordingEffects::new();
        let mut resolver = CollisionResolver::new(&mut field, &picker, &mut fx);

        assert!(resolver
            .test_segment(Vec2::new(0.5, 0.5), Vec2::new(1.0e6, 0.5))
            .is_none());
        // Jittered current point plus at most MAX_SWIPE_SAMPLES - 1 jittered samples
        assert!(picker.probes.borrow().len() <= 3 * MAX_SWIPE_SAMPLES as usize);

        picker.probes.borrow_mut().clear();
        assert!(resolver
            .test_segment(Vec2::new(0.5, 0.5), Vec2::new(f32::INFINITY, 0.5))
            .is_none());
        assert_eq!(picker.probes.borrow().len(), 3);
    }

    #[test]
    fn test_strike_hidden_is_noop() {
        let mut field = field_with_apple_at(0.5, 0.5);
        let picker = FlatPicker::default();
        let mut fx = RecordingEffects::new();
        let mut resolver = CollisionResolver::new(&mut field, &picker, &mut fx);

        assert!(!resolver.strike(AppleId(1)));
        assert!(!resolver.strike(AppleId(42)));
        assert!(fx.events.is_empty());
    }

    #[test]
    fn test_emitters_rotate() {
        let mut ring = EmitterRing::default();
        let seq: Vec<_> = (0..5).map(|_| ring.advance()).collect();
        assert_eq!(seq, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_ray_sphere() {
        let hit = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 1.5), 0.5, 2.0);
        assert!((hit.unwrap() - 1.0).abs() < 1e-5);
        assert!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 0.5, 2.0).is_none());
        assert!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -1.5), 0.5, 2.0).is_none());
        assert!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(2.0, 0.0, 1.0), 0.5, 2.0).is_none());
    }

    #[test]
    fn test_forward_ray_hits_apple_ahead() {
        let mut field = field_with_apple_at(0.0, 1.0);
        field.apples.get_mut(AppleId(0)).unwrap().position = Vec3::new(0.0, 1.0, 11.0);
        field.profile.apple_size = 0.25;
        let picker = FlatPicker::default();
        let mut fx = RecordingEffects::new();
        let mut resolver = CollisionResolver::new(&mut field, &picker, &mut fx);

        assert!(resolver
            .test_forward_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::Z)
            .is_none());
        assert_eq!(
            resolver.test_forward_ray(Vec3::new(0.0, 1.0, 9.5), Vec3::Z),
            Some(AppleId(0))
        );
        assert_eq!(field.score.touched(), 1);
    }
}
