//! Game state and core simulation types
//!
//! Apples and projectiles live in fixed-capacity slots and are recycled in
//! place; nothing is allocated per reveal or per hit.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::PacingController;
use super::collision::EmitterRing;
use super::gesture::GestureTracker;
use super::score::ScoreTracker;
use super::tick::GameCommand;
use super::timers::{TimerHandle, Timers};
use super::trajectory;
use crate::consts::{MAX_PROJECTILES, PROJECTILE_START_STRIDE};
use crate::error::ConfigError;
use crate::profile::{GameplayProfile, InputMode};
use crate::settings::Settings;

/// Slot index of a pooled apple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppleId(pub usize);

/// Apple lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppleState {
    /// Pooled and invisible, waiting for a reveal
    Hidden,
    /// Visible and flying toward the player
    Active,
}

/// A pooled apple
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Apple {
    pub id: AppleId,
    pub position: Vec3,
    /// Spin around x and y (radians)
    pub rotation: Vec2,
    pub state: AppleState,
    /// Curve point at z = 0 (the player plane)
    pub start_point: Vec3,
    pub start_tangent: Vec3,
    /// Curve point at the spawn position
    pub end_point: Vec3,
    pub end_tangent: Vec3,
}

impl Apple {
    pub fn new(id: AppleId) -> Self {
        Self {
            id,
            position: Vec3::ZERO,
            rotation: Vec2::ZERO,
            state: AppleState::Hidden,
            start_point: Vec3::ZERO,
            start_tangent: Vec3::ZERO,
            end_point: Vec3::ZERO,
            end_tangent: Vec3::ZERO,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == AppleState::Active
    }
}

/// Fixed set of apples, indexed by slot
#[derive(Debug, Clone)]
pub struct ApplePool {
    apples: Vec<Apple>,
}

impl ApplePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            apples: (0..capacity).map(|slot| Apple::new(AppleId(slot))).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.apples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apples.is_empty()
    }

    pub fn get(&self, id: AppleId) -> Option<&Apple> {
        self.apples.get(id.0)
    }

    pub fn get_mut(&mut self, id: AppleId) -> Option<&mut Apple> {
        self.apples.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Apple> {
        self.apples.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Apple> {
        self.apples.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &Apple> {
        self.apples.iter().filter(|a| a.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Activate the first hidden apple in slot order
    pub fn reveal_next(&mut self) -> Option<AppleId> {
        let apple = self.apples.iter_mut().find(|a| !a.is_active())?;
        apple.state = AppleState::Active;
        Some(apple.id)
    }

    pub fn hide_all(&mut self) {
        for apple in &mut self.apples {
            apple.state = AppleState::Hidden;
        }
    }
}

/// Which VR controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

/// Last reported controller pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerPose {
    pub position: Vec3,
    /// Unit pointing direction
    pub forward: Vec3,
}

/// A fired banana
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub hand: Hand,
    pub position: Vec3,
    pub forward: Vec3,
    /// Distance covered on the next tick
    pub stride: f32,
    /// Total distance covered so far
    pub distance_traveled: f32,
}

impl Projectile {
    pub fn new(id: u32, hand: Hand, pose: ControllerPose) -> Self {
        Self {
            id,
            hand,
            position: pose.position,
            forward: pose.forward.normalize_or_zero(),
            stride: PROJECTILE_START_STRIDE,
            distance_traveled: 0.0,
        }
    }
}

/// Everything a hit or a miss touches
#[derive(Debug, Clone)]
pub struct Playfield {
    pub profile: GameplayProfile,
    pub apples: ApplePool,
    pub score: ScoreTracker,
    pub emitters: EmitterRing,
    pub rng: Pcg32,
}

impl Playfield {
    /// Hide every apple and give it a fresh spawn
    pub fn reset_apples(&mut self) {
        for apple in self.apples.iter_mut() {
            apple.state = AppleState::Hidden;
            trajectory::reset_apple(apple, &self.profile, &mut self.rng);
        }
    }
}

/// Complete game state, owned by the host's frame loop
pub struct GameState {
    /// Active input mode
    pub mode: InputMode,
    pub field: Playfield,
    pub pacing: PacingController,
    pub strokes: GestureTracker,
    /// Live projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Last pose per hand (left, right)
    pub controllers: [Option<ControllerPose>; 2],
    /// Per hand: trigger released far enough to fire again
    pub(crate) trigger_armed: [bool; 2],
    pub(crate) settings: Settings,
    pub(crate) timers: Timers,
    pub(crate) reveal_timer: Option<TimerHandle>,
    pub(crate) clock_timer: Option<TimerHandle>,
    pub(crate) commands: VecDeque<GameCommand>,
    next_projectile_id: u32,
}

impl GameState {
    /// Build a session from validated settings
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        if let Err(err) = settings.validate() {
            log::warn!("Rejecting settings: {}", err);
            return Err(err);
        }

        let profile = settings.profile();
        let pacing = PacingController::new(settings.session_length_ms, profile.pop_interval_ms);
        let mut field = Playfield {
            profile,
            apples: ApplePool::new(settings.apple_pool_size),
            score: ScoreTracker::default(),
            emitters: EmitterRing::default(),
            rng: Pcg32::seed_from_u64(settings.seed),
        };
        field.reset_apples();

        log::info!(
            "Game ready: mode={}, apples={}, seed={}",
            settings.input_mode.as_str(),
            field.apples.len(),
            settings.seed
        );

        Ok(Self {
            mode: settings.input_mode,
            field,
            pacing,
            strokes: GestureTracker::default(),
            projectiles: Vec::with_capacity(MAX_PROJECTILES),
            controllers: [None, None],
            trigger_armed: [true, true],
            settings,
            timers: Timers::default(),
            reveal_timer: None,
            clock_timer: None,
            commands: VecDeque::new(),
            next_projectile_id: 1,
        })
    }

    /// Queue a command for the next tick
    pub fn push(&mut self, command: GameCommand) {
        self.commands.push_back(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    pub fn profile(&self) -> &GameplayProfile {
        &self.field.profile
    }

    pub fn touched(&self) -> u32 {
        self.field.score.touched()
    }

    pub fn missed(&self) -> u32 {
        self.field.score.missed()
    }

    /// When the next reveal will happen, if one is scheduled
    pub fn next_reveal_ms(&self) -> Option<u64> {
        self.reveal_timer.and_then(|h| self.timers.due_ms(h))
    }

    /// When the next countdown tick will happen, if one is scheduled
    pub fn next_clock_tick_ms(&self) -> Option<u64> {
        self.clock_timer.and_then(|h| self.timers.due_ms(h))
    }

    /// Countdown as the HUD shows it ("1:00" between sessions)
    pub fn remaining_display(&self) -> String {
        crate::format_remaining(self.pacing.remaining_secs())
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Allocate a projectile id
    pub(crate) fn next_projectile_id(&mut self) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        id
    }
}
