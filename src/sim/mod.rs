//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Time comes from the host through [`Frame`], never from the wall clock
//! - Stable iteration order (apples by slot, strokes by pointer id)
//! - No rendering or engine dependencies; the host is reached through [`crate::platform`]

pub mod clock;
pub mod collision;
pub mod gesture;
pub mod score;
pub mod state;
pub mod tick;
pub mod timers;
pub mod trajectory;

pub use clock::{ClockTick, PacingController, SessionState};
pub use collision::{CollisionResolver, EmitterRing};
pub use gesture::{GestureTracker, PointerId, Stroke};
pub use score::ScoreTracker;
pub use state::{
    Apple, AppleId, ApplePool, AppleState, ControllerPose, GameState, Hand, Playfield, Projectile,
};
pub use tick::{Frame, GameCommand, tick};
pub use timers::{TimerKind, Timers};
