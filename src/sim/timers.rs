//! Cancellable one-shot timers on the simulation clock
//!
//! Timers never call back. The frame loop drains due timers in order and
//! dispatches them itself, so a cancelled timer simply never comes out.

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Reveal the next hidden apple
    RevealApple,
    /// Countdown tick
    ClockTick,
}

/// Handle returned by [`Timers::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TimerHandle,
    pub kind: TimerKind,
    pub due_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<Fired>,
    next_id: u64,
}

impl Timers {
    pub fn schedule(&mut self, kind: TimerKind, due_ms: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Fired {
            handle,
            kind,
            due_ms,
        });
        handle
    }

    /// Cancel a timer. Cancelling a fired or already cancelled timer is a no-op.
    ///
    /// Returns whether anything was pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    ///
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Fired> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.handle.0))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(index))
    }

    pub fn due_ms(&self, handle: TimerHandle) -> Option<u64> {
        self.pending
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.due_ms)
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_ms(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
