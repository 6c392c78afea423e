//! Frame tick
//!
//! Hosts push [`GameCommand`]s as input arrives and call [`tick`] once per
//! rendered frame. A tick handles, in order:
//! 1. queued commands (FIFO)
//! 2. timers that came due (reveal, countdown)
//! 3. projectile and saber hit tests
//! 4. apple flight and misses
//!
//! Hits from steps 1 and 3 hide the struck apple before step 4 runs, so an apple
//! is never both crushed and missed in the same frame.

use glam::{Vec2, Vec3};

use super::collision::CollisionResolver;
use super::clock::{ClockTick, SessionState};
use super::gesture::PointerId;
use super::state::{ControllerPose, GameState, Hand, Projectile};
use super::timers::{Fired, TimerKind};
use super::trajectory;
use crate::consts::{
    CLOCK_TICK_MS, MAX_PROJECTILES, PROJECTILE_ACCELERATION, PROJECTILE_CUTOFF,
    RESUME_REVEAL_DELAY_MS, TRIGGER_FIRE_THRESHOLD, TRIGGER_REARM_THRESHOLD,
};
use crate::effects::SoundCue;
use crate::platform::Services;
use crate::profile::{InputMode, PointerKind};

/// Input and menu actions, applied at the start of the next tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameCommand {
    Start,
    Pause,
    Continue,
    Stop,
    /// Choose the input mode for the next session
    SwitchInputMode(InputMode),
    PointerDown {
        pointer: PointerId,
        kind: PointerKind,
        screen: Vec2,
    },
    PointerMove {
        pointer: PointerId,
        screen: Vec2,
    },
    PointerUp {
        pointer: PointerId,
    },
    PointerCancel {
        pointer: PointerId,
    },
    ControllerPose {
        hand: Hand,
        position: Vec3,
        forward: Vec3,
    },
    /// Analog trigger state change, 0.0 released to 1.0 fully pulled (fires in banana mode)
    Trigger {
        hand: Hand,
        value: f32,
    },
    /// Secondary controller button (pauses)
    MenuButton {
        hand: Hand,
    },
}

/// Timing of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Monotonic host clock
    pub now_ms: u64,
    /// Motion scale, see [`crate::fps_factor`]
    pub fps_factor: f32,
}

impl Frame {
    pub fn new(now_ms: u64, fps_factor: f32) -> Self {
        Self { now_ms, fps_factor }
    }

    pub fn at_fps(now_ms: u64, fps: f32) -> Self {
        Self::new(now_ms, crate::fps_factor(fps))
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, frame: Frame, services: &mut Services<'_>) {
    while let Some(command) = state.commands.pop_front() {
        apply_command(state, command, frame.now_ms, services);
    }

    while let Some(fired) = state.timers.pop_due(frame.now_ms) {
        on_timer(state, fired, services);
    }

    if !state.pacing.is_running() {
        return;
    }

    match state.mode {
        InputMode::VrBanana => advance_projectiles(state, services),
        InputMode::VrLaser => sweep_sabers(state, services),
        _ => {}
    }

    trajectory::advance_all(&mut state.field, frame.fps_factor);
}

fn apply_command(state: &mut GameState, command: GameCommand, now_ms: u64, services: &mut Services<'_>) {
    match command {
        GameCommand::Start => start(state, now_ms, services),
        GameCommand::Pause | GameCommand::MenuButton { .. } => pause(state, now_ms, services),
        GameCommand::Continue => resume(state, now_ms, services),
        GameCommand::Stop => stop(state, services),
        GameCommand::SwitchInputMode(mode) => switch_mode(state, mode),
        GameCommand::PointerDown {
            pointer,
            kind,
            screen,
        } => {
            if !state.pacing.is_running() {
                // Between sessions the pointer type picks the desktop profile
                if !state.mode.is_vr() {
                    switch_mode(state, kind.into());
                }
                return;
            }
            let mut resolver =
                CollisionResolver::new(&mut state.field, services.picker, &mut *services.effects);
            state
                .strokes
                .on_stroke_start(pointer, screen, services.projector, &mut resolver);
        }
        GameCommand::PointerMove { pointer, screen } => {
            if !state.pacing.is_running() {
                return;
            }
            let mut resolver =
                CollisionResolver::new(&mut state.field, services.picker, &mut *services.effects);
            state
                .strokes
                .on_stroke_move(pointer, screen, services.projector, &mut resolver);
        }
        GameCommand::PointerUp { pointer } | GameCommand::PointerCancel { pointer } => {
            state.strokes.on_stroke_end(pointer, &mut *services.effects);
        }
        GameCommand::ControllerPose {
            hand,
            position,
            forward,
        } => {
            state.controllers[hand.index()] = Some(ControllerPose { position, forward });
        }
        GameCommand::Trigger { hand, value } => on_trigger(state, hand, value, services),
    }
}

fn start(state: &mut GameState, now_ms: u64, services: &mut Services<'_>) {
    if !state.pacing.start(now_ms) {
        log::debug!("Start ignored in {:?}", state.pacing.state());
        return;
    }

    state.field.reset_apples();
    state.field.score.reset();
    state.projectiles.clear();
    state.timers.cancel_all();
    let first_reveal = now_ms.saturating_add(state.pacing.pop_interval_ms());
    state.reveal_timer = Some(state.timers.schedule(TimerKind::RevealApple, first_reveal));
    state.clock_timer = Some(state.timers.schedule(TimerKind::ClockTick, now_ms + CLOCK_TICK_MS));
    services.effects.play(SoundCue::MusicStart);

    log::info!(
        "Session started: mode={}, pop every {}ms",
        state.mode.as_str(),
        state.pacing.pop_interval_ms()
    );
}

fn pause(state: &mut GameState, now_ms: u64, services: &mut Services<'_>) {
    if !state.pacing.pause(now_ms) {
        log::debug!("Pause ignored in {:?}", state.pacing.state());
        return;
    }
    cancel_timers(state);
    state.strokes.end_all(&mut *services.effects);
    services.effects.play(SoundCue::MusicPause);
    log::info!("Session paused at {}ms", state.pacing.elapsed_ms(now_ms));
}

fn resume(state: &mut GameState, now_ms: u64, services: &mut Services<'_>) {
    if !state.pacing.resume(now_ms) {
        log::debug!("Continue ignored in {:?}", state.pacing.state());
        return;
    }
    state.reveal_timer = Some(
        state
            .timers
            .schedule(TimerKind::RevealApple, now_ms + RESUME_REVEAL_DELAY_MS),
    );
    state.clock_timer = Some(state.timers.schedule(TimerKind::ClockTick, now_ms + CLOCK_TICK_MS));
    services.effects.play(SoundCue::MusicResume);
    log::info!("Session continued at {}ms", state.pacing.elapsed_ms(now_ms));
}

fn stop(state: &mut GameState, services: &mut Services<'_>) {
    let score = state.field.score.final_score();
    if !state.pacing.stop(score) {
        log::debug!("Stop ignored in {:?}", state.pacing.state());
        return;
    }

    cancel_timers(state);
    state.field.apples.hide_all();
    state.projectiles.clear();
    state.strokes.end_all(&mut *services.effects);
    services.effects.play(SoundCue::MusicStop);

    log::info!(
        "Session stopped: touched={}, missed={}, score={}",
        state.field.score.touched(),
        state.field.score.missed(),
        score
    );
}

fn cancel_timers(state: &mut GameState) {
    if let Some(handle) = state.reveal_timer.take() {
        state.timers.cancel(handle);
    }
    if let Some(handle) = state.clock_timer.take() {
        state.timers.cancel(handle);
    }
}

fn switch_mode(state: &mut GameState, mode: InputMode) {
    if mode == state.mode {
        return;
    }
    if matches!(
        state.pacing.state(),
        SessionState::Running | SessionState::Paused
    ) {
        log::debug!("Input mode switch to {} ignored mid-session", mode.as_str());
        return;
    }

    let profile = state.settings.profile_for(mode);
    if let Err(err) = profile.validate() {
        log::warn!("Keeping {} profile: {}", state.mode.as_str(), err);
        return;
    }

    state.pacing.set_base_pop(profile.pop_interval_ms);
    state.field.profile = profile;
    state.mode = mode;
    log::info!("Input mode switched to {}", mode.as_str());
}

fn on_timer(state: &mut GameState, fired: Fired, services: &mut Services<'_>) {
    if !state.pacing.is_running() {
        return;
    }

    match fired.kind {
        TimerKind::RevealApple => {
            if let Some(id) = state.field.apples.reveal_next() {
                log::debug!("Apple {} revealed", id.0);
            }
            state.reveal_timer = Some(state.timers.schedule(
                TimerKind::RevealApple,
                fired.due_ms.saturating_add(state.pacing.pop_interval_ms()),
            ));
        }
        TimerKind::ClockTick => match state.pacing.tick(fired.due_ms) {
            ClockTick::Expired => {
                state.clock_timer = None;
                stop(state, services);
            }
            ClockTick::Remaining(_) => {
                state.clock_timer = Some(
                    state
                        .timers
                        .schedule(TimerKind::ClockTick, fired.due_ms + CLOCK_TICK_MS),
                );
            }
        },
    }
}

/// One shot per pull: fire above the upper threshold, re-arm below the lower one
fn on_trigger(state: &mut GameState, hand: Hand, value: f32, services: &mut Services<'_>) {
    let armed = &mut state.trigger_armed[hand.index()];
    if value < TRIGGER_REARM_THRESHOLD {
        *armed = true;
        return;
    }
    if !*armed || value <= TRIGGER_FIRE_THRESHOLD {
        return;
    }
    if !state.pacing.is_running() || state.mode != InputMode::VrBanana {
        return;
    }
    *armed = false;
    fire(state, hand, services);
}

fn fire(state: &mut GameState, hand: Hand, services: &mut Services<'_>) {
    let Some(pose) = state.controllers[hand.index()] else {
        return;
    };
    if state.projectiles.len() >= MAX_PROJECTILES {
        log::debug!("Projectile cap reached, {:?} trigger ignored", hand);
        return;
    }

    let id = state.next_projectile_id();
    state.projectiles.push(Projectile::new(id, hand, pose));
    services.effects.play(SoundCue::Fire);
}

fn advance_projectiles(state: &mut GameState, services: &mut Services<'_>) {
    let mut resolver =
        CollisionResolver::new(&mut state.field, services.picker, &mut *services.effects);
    state.projectiles.retain_mut(|projectile| {
        if projectile.distance_traveled > PROJECTILE_CUTOFF {
            return false;
        }
        projectile.stride *= PROJECTILE_ACCELERATION;
        projectile.position += projectile.forward * projectile.stride;
        projectile.distance_traveled += projectile.stride;
        resolver
            .test_forward_ray(projectile.position, projectile.forward)
            .is_none()
    });
}

fn sweep_sabers(state: &mut GameState, services: &mut Services<'_>) {
    let mut resolver =
        CollisionResolver::new(&mut state.field, services.picker, &mut *services.effects);
    for pose in state.controllers.iter().flatten() {
        resolver.test_forward_ray(pose.position, pose.forward);
    }
}
