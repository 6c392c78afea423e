//! Swipe tracking
//!
//! Every pointer that goes down gets its own stroke. Each move draws one more
//! ribbon quad, hit-tests the segment just drawn, and adds its screen length
//! to the stroke. A stroke longer than the profile's maximum is cut short.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

use super::collision::CollisionResolver;
use crate::consts::MIN_RIBBON_STEP;
use crate::effects::{EffectsSink, RibbonQuad};
use crate::platform::ScreenProjector;

/// Host pointer identifier
pub type PointerId = u32;

/// One continuous pointer-down-to-up gesture
#[derive(Debug, Clone)]
pub struct Stroke {
    pub pointer_id: PointerId,
    pub is_down: bool,
    pub last_screen: Vec2,
    pub last_world: Vec3,
    /// Screen distance swiped so far
    pub cumulative_distance: f32,
    /// Quads drawn so far, handed over for fading when the stroke ends
    pub pending: Vec<RibbonQuad>,
}

impl Stroke {
    fn new(pointer_id: PointerId, screen: Vec2, world: Vec3) -> Self {
        Self {
            pointer_id,
            is_down: true,
            last_screen: screen,
            last_world: world,
            cumulative_distance: 0.0,
            pending: Vec::new(),
        }
    }
}

/// Live strokes by pointer id
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    strokes: BTreeMap<PointerId, Stroke>,
}

impl GestureTracker {
    pub fn get(&self, pointer: PointerId) -> Option<&Stroke> {
        self.strokes.get(&pointer)
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Pointer down: open a stroke and tap-test where it landed
    pub fn on_stroke_start(
        &mut self,
        pointer: PointerId,
        screen: Vec2,
        projector: &dyn ScreenProjector,
        resolver: &mut CollisionResolver<'_>,
    ) {
        if !screen.is_finite() {
            log::debug!("Pointer {} down at non-finite {:?} ignored", pointer, screen);
            return;
        }

        // A second down without an up in between replaces the old stroke
        if self.strokes.contains_key(&pointer) {
            self.on_stroke_end(pointer, &mut *resolver.effects);
        }

        let world = projector.project(screen);
        self.strokes.insert(pointer, Stroke::new(pointer, screen, world));

        let thickness = resolver.field.profile.ribbon_thickness;
        resolver.test_point_with_jitter(screen, thickness);
    }

    /// Pointer move: extend the ribbon and test the new segment
    pub fn on_stroke_move(
        &mut self,
        pointer: PointerId,
        screen: Vec2,
        projector: &dyn ScreenProjector,
        resolver: &mut CollisionResolver<'_>,
    ) {
        let Some(stroke) = self.strokes.get_mut(&pointer) else {
            return;
        };
        if !stroke.is_down {
            return;
        }

        if !screen.is_finite() {
            return;
        }
        // Tiny moves leave the stroke where it was and count toward the next one
        let distance = stroke.last_screen.distance(screen);
        if distance < MIN_RIBBON_STEP {
            return;
        }

        let profile = &resolver.field.profile;
        let thickness = profile.ribbon_thickness;
        let max_distance = profile.max_ribbon_distance;

        let world = projector.project(screen);
        let quad = RibbonQuad::between(stroke.last_world, world, thickness);
        resolver.effects.ribbon_segment(pointer, &quad);
        stroke.pending.push(quad);

        resolver.test_segment(stroke.last_screen, screen);

        stroke.cumulative_distance += distance;
        stroke.last_screen = screen;
        stroke.last_world = world;

        if stroke.cumulative_distance > max_distance {
            log::debug!(
                "Stroke {} cut after {:.3} (max {:.3})",
                pointer,
                stroke.cumulative_distance,
                max_distance
            );
            self.on_stroke_end(pointer, &mut *resolver.effects);
        }
    }

    /// Pointer up/cancel: hand the ribbon over for fading and forget the stroke
    pub fn on_stroke_end(&mut self, pointer: PointerId, effects: &mut dyn EffectsSink) {
        let Some(mut stroke) = self.strokes.remove(&pointer) else {
            return;
        };
        stroke.is_down = false;
        if !stroke.pending.is_empty() {
            effects.ribbon_finished(pointer, std::mem::take(&mut stroke.pending));
        }
    }

    /// End every stroke (session stop)
    pub fn end_all(&mut self, effects: &mut dyn EffectsSink) {
        let pointers: Vec<PointerId> = self.strokes.keys().copied().collect();
        for pointer in pointers {
            self.on_stroke_end(pointer, effects);
        }
    }
}
