//! Visual and audio cues
//!
//! The simulation never renders or plays anything itself. It emits cues to an
//! [`EffectsSink`] owned by the host engine and never looks at the result.

use glam::Vec3;

use crate::sim::PointerId;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// An apple was crushed by a swipe, saber or projectile
    AppleCrushed,
    /// A banana pistol fired
    Fire,
    /// Session started
    MusicStart,
    /// Session paused
    MusicPause,
    /// Session continued after a pause
    MusicResume,
    /// Session stopped
    MusicStop,
}

/// One quad of swipe trail: two parallel paths offset by the ribbon thickness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonQuad {
    /// Lower path (y - thickness), from previous to current point
    pub lower: [Vec3; 2],
    /// Upper path (y + thickness), from previous to current point
    pub upper: [Vec3; 2],
}

impl RibbonQuad {
    pub fn between(from: Vec3, to: Vec3, thickness: f32) -> Self {
        let offset = Vec3::new(0.0, thickness, 0.0);
        Self {
            lower: [from - offset, to - offset],
            upper: [from + offset, to + offset],
        }
    }
}

/// Receiver for everything the simulation wants shown or heard
pub trait EffectsSink {
    /// A new trail quad for a live stroke
    fn ribbon_segment(&mut self, pointer: PointerId, quad: &RibbonQuad);
    /// A stroke ended; its quads should be merged and faded out
    fn ribbon_finished(&mut self, pointer: PointerId, quads: Vec<RibbonQuad>);
    /// Start a short particle burst from one of the pooled emitters
    fn particle_burst(&mut self, emitter: usize, position: Vec3);
    fn play(&mut self, cue: SoundCue);
}

/// Sink that drops everything
#[derive(Debug, Default)]
pub struct NullEffects;

impl EffectsSink for NullEffects {
    fn ribbon_segment(&mut self, _pointer: PointerId, _quad: &RibbonQuad) {}
    fn ribbon_finished(&mut self, _pointer: PointerId, _quads: Vec<RibbonQuad>) {}
    fn particle_burst(&mut self, _emitter: usize, _position: Vec3) {}
    fn play(&mut self, _cue: SoundCue) {}
}

/// A cue captured by [`RecordingEffects`]
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RibbonSegment { pointer: PointerId, quad: RibbonQuad },
    RibbonFinished { pointer: PointerId, quads: Vec<RibbonQuad> },
    ParticleBurst { emitter: usize, position: Vec3 },
    Sound(SoundCue),
}

/// Sink that keeps every cue in order (headless runs and tests)
#[derive(Debug, Default)]
pub struct RecordingEffects {
    pub events: Vec<Effect>,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bursts(&self) -> impl Iterator<Item = (usize, Vec3)> + '_ {
        self.events.iter().filter_map(|e| match e {
            Effect::ParticleBurst { emitter, position } => Some((*emitter, *position)),
            _ => None,
        })
    }

    pub fn sounds(&self) -> impl Iterator<Item = SoundCue> + '_ {
        self.events.iter().filter_map(|e| match e {
            Effect::Sound(cue) => Some(*cue),
            _ => None,
        })
    }

    pub fn finished_ribbons(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Effect::RibbonFinished { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EffectsSink for RecordingEffects {
    fn ribbon_segment(&mut self, pointer: PointerId, quad: &RibbonQuad) {
        self.events.push(Effect::RibbonSegment {
            pointer,
            quad: *quad,
        });
    }

    fn ribbon_finished(&mut self, pointer: PointerId, quads: Vec<RibbonQuad>) {
        self.events.push(Effect::RibbonFinished { pointer, quads });
    }

    fn particle_burst(&mut self, emitter: usize, position: Vec3) {
        self.events.push(Effect::ParticleBurst { emitter, position });
    }

    fn play(&mut self, cue: SoundCue) {
        self.events.push(Effect::Sound(cue));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ribbon_quad_offsets() {
        let quad = RibbonQuad::between(Vec3::new(0.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0), 0.01);
        assert!((quad.lower[0].y - 0.99).abs() < 1e-6);
        assert!((quad.upper[1].y - 1.01).abs() < 1e-6);
        assert_eq!(quad.upper[1].x, 1.0);
    }

    #[test]
    fn test_recording_filters() {
        let mut fx = RecordingEffects::new();
        fx.play(SoundCue::AppleCrushed);
        fx.particle_burst(2, Vec3::ONE);
        fx.ribbon_finished(1, Vec::new());
        assert_eq!(fx.sounds().collect::<Vec<_>>(), vec![SoundCue::AppleCrushed]);
        assert_eq!(fx.bursts().next(), Some((2, Vec3::ONE)));
        assert_eq!(fx.finished_ribbons(), 1);
    }
}
