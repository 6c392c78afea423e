//! Apple Crusher headless runner
//!
//! Plays one full session against the reference camera with a simple
//! autoplayer and logs the result. Usage: `apple-crusher [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use apple_crusher::effects::RecordingEffects;
#[cfg(not(target_arch = "wasm32"))]
use apple_crusher::platform::{Camera, Services};
#[cfg(not(target_arch = "wasm32"))]
use apple_crusher::sim::{Frame, GameCommand, GameState, SessionState, tick};
#[cfg(not(target_arch = "wasm32"))]
use apple_crusher::{InputMode, PointerKind, Settings};

#[cfg(not(target_arch = "wasm32"))]
const FPS: u64 = 60;
/// Frames between two autoplayer swipes
#[cfg(not(target_arch = "wasm32"))]
const SWIPE_EVERY: u64 = 12;
/// Half-length of an autoplayer swipe (normalized screen units)
#[cfg(not(target_arch = "wasm32"))]
const SWIPE_HALF: f32 = 0.03;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Apple Crusher (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let mut state = match GameState::new(settings) {
        Ok(state) => state,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    if state.mode.is_vr() {
        log::warn!(
            "{} needs controllers, autoplaying with the mouse profile",
            state.mode.as_str()
        );
        state.push(GameCommand::SwitchInputMode(InputMode::Mouse));
    }

    let camera = Camera::default();
    let mut effects = RecordingEffects::new();
    state.push(GameCommand::Start);

    let total_frames = session_frames(&state);
    for frame in 0..total_frames {
        let now_ms = frame * 1000 / FPS;
        if frame > 0 && frame % SWIPE_EVERY == 0 {
            autoplay_swipe(&mut state, &camera);
        }

        let mut services = Services::with_camera(&camera, &mut effects);
        tick(&mut state, Frame::at_fps(now_ms, FPS as f32), &mut services);

        if state.pacing.state() == SessionState::Stopped {
            break;
        }
    }

    log::info!(
        "Session over: touched={}, missed={}, score={}",
        state.touched(),
        state.missed(),
        state.pacing.final_score().unwrap_or(0)
    );
}

/// Frames covering the session plus one second of slack for the final tick
#[cfg(not(target_arch = "wasm32"))]
fn session_frames(state: &GameState) -> u64 {
    let remaining_ms = u64::from(state.pacing.remaining_secs()) * 1000;
    (remaining_ms + 1000) * FPS / 1000
}

/// Swipe horizontally across the closest visible apple
#[cfg(not(target_arch = "wasm32"))]
fn autoplay_swipe(state: &mut GameState, camera: &Camera) {
    let target = state
        .field
        .apples
        .active()
        .filter_map(|apple| camera.world_to_screen(apple.position))
        .filter(|(screen, _)| (0.0..=1.0).contains(&screen.x) && (0.0..=1.0).contains(&screen.y))
        .min_by(|(_, a), (_, b)| a.total_cmp(b));

    let Some((screen, _)) = target else {
        return;
    };

    let from = screen - glam::Vec2::new(SWIPE_HALF, 0.0);
    let to = screen + glam::Vec2::new(SWIPE_HALF, 0.0);
    state.push(GameCommand::PointerDown {
        pointer: 1,
        kind: PointerKind::Mouse,
        screen: from,
    });
    state.push(GameCommand::PointerMove {
        pointer: 1,
        screen: to,
    });
    state.push(GameCommand::PointerUp { pointer: 1 });
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}
