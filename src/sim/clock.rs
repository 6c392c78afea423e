//! Session clock and reveal pacing
//!
//! Idle → Running (start) → Paused (pause) → Running (resume) → Stopped (stop).
//! A stopped session goes back through Idle on the next start.
//!
//! Reveals speed up as the session goes on:
//! | elapsed seconds | pop interval   |
//! |-----------------|----------------|
//! | 16..=29         | base × 3/4     |
//! | 31..=39         | base × 1/2     |
//! | 41..=49         | base × 3/8     |
//! | > 50            | base × 1/4     |
//! Whole seconds 15, 30, 40 and 50 keep the previous interval.

use serde::{Deserialize, Serialize};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
}

/// Result of a countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Session still running
    Remaining(u32),
    /// Session length reached
    Expired,
}

/// Pop interval for a given whole number of elapsed seconds, if the pace changes.
///
/// Never below 1 ms, so a rescheduled reveal always lands in the future.
pub fn paced_interval(elapsed_secs: u64, base_ms: u64) -> Option<u64> {
    let (num, den) = match elapsed_secs {
        s if s > 15 && s < 30 => (3, 4),
        s if s > 30 && s < 40 => (1, 2),
        s if s > 40 && s < 50 => (3, 8),
        s if s > 50 => (1, 4),
        _ => return None,
    };
    Some((base_ms / den * num + base_ms % den * num / den).max(1))
}

#[derive(Debug, Clone)]
pub struct PacingController {
    state: SessionState,
    session_length_ms: u64,
    base_pop_ms: u64,
    pop_interval_ms: u64,
    start_ms: u64,
    paused_at_ms: Option<u64>,
    paused_total_ms: u64,
    remaining_secs: u32,
    final_score: Option<u64>,
}

impl PacingController {
    pub fn new(session_length_ms: u64, base_pop_ms: u64) -> Self {
        Self {
            state: SessionState::Idle,
            session_length_ms,
            base_pop_ms,
            pop_interval_ms: base_pop_ms,
            start_ms: 0,
            paused_at_ms: None,
            paused_total_ms: 0,
            remaining_secs: Self::full_seconds(session_length_ms),
            final_score: None,
        }
    }

    fn full_seconds(session_length_ms: u64) -> u32 {
        u32::try_from(session_length_ms / 1000).unwrap_or(u32::MAX)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn pop_interval_ms(&self) -> u64 {
        self.pop_interval_ms
    }

    pub fn base_pop_ms(&self) -> u64 {
        self.base_pop_ms
    }

    /// Whole seconds left, as last shown by the countdown
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Score of the last stopped session
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Change the base cadence; only honoured between sessions
    pub fn set_base_pop(&mut self, base_pop_ms: u64) -> bool {
        if matches!(self.state, SessionState::Running | SessionState::Paused) {
            return false;
        }
        self.base_pop_ms = base_pop_ms;
        self.pop_interval_ms = base_pop_ms;
        true
    }

    /// Play time since start, excluding pauses
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        let now = self.paused_at_ms.unwrap_or(now_ms);
        now.saturating_sub(self.start_ms)
            .saturating_sub(self.paused_total_ms)
    }

    pub fn start(&mut self, now_ms: u64) -> bool {
        match self.state {
            SessionState::Running | SessionState::Paused => return false,
            SessionState::Stopped => self.state = SessionState::Idle,
            SessionState::Idle => {}
        }
        self.state = SessionState::Running;
        self.start_ms = now_ms;
        self.paused_at_ms = None;
        self.paused_total_ms = 0;
        self.pop_interval_ms = self.base_pop_ms;
        self.remaining_secs = Self::full_seconds(self.session_length_ms);
        self.final_score = None;
        true
    }

    pub fn pause(&mut self, now_ms: u64) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.state = SessionState::Paused;
        self.paused_at_ms = Some(now_ms);
        true
    }

    pub fn resume(&mut self, now_ms: u64) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        if let Some(paused_at) = self.paused_at_ms.take() {
            self.paused_total_ms += now_ms.saturating_sub(paused_at);
        }
        self.state = SessionState::Running;
        true
    }

    /// Stop a running or paused session and freeze its score
    pub fn stop(&mut self, final_score: u64) -> bool {
        if !matches!(self.state, SessionState::Running | SessionState::Paused) {
            return false;
        }
        self.state = SessionState::Stopped;
        self.paused_at_ms = None;
        self.remaining_secs = Self::full_seconds(self.session_length_ms);
        self.final_score = Some(final_score);
        true
    }

    /// Countdown tick: update the display and the reveal pace
    pub fn tick(&mut self, now_ms: u64) -> ClockTick {
        let elapsed = self.elapsed_ms(now_ms);
        if elapsed >= self.session_length_ms {
            return ClockTick::Expired;
        }

        let seconds = elapsed / 1000;
        let full = u64::from(Self::full_seconds(self.session_length_ms));
        self.remaining_secs = u32::try_from(full.saturating_sub(1).saturating_sub(seconds))
            .unwrap_or(u32::MAX);

        if let Some(interval) = paced_interval(seconds, self.base_pop_ms) {
            self.pop_interval_ms = interval;
        }
        ClockTick::Remaining(self.remaining_secs)
    }
}
