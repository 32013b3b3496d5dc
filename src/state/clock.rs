//! Timed events and the per-turn countdown.
//!
//! The engine never sleeps or reads the wall clock for game logic. Every
//! delayed action is queued in a [`Scheduler`] and fires when the caller
//! advances time, one event at a time, in due order.

use std::time::Duration;

use serde::Serialize;

/// Handle to a scheduled event. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Events the engine schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEvent {
    /// One turn-clock interval elapsed.
    TurnTick,
    /// Pause after a non-improving move before the turn changes hands.
    MoveAbsorbed,
    /// End of the turn-change announcement.
    TurnRotation { next_player: usize },
    /// Hide the floating point-change indicator.
    ClearPointChange,
    /// Hide the swap highlight.
    ClearSwapHighlight,
}

#[derive(Debug, Clone)]
struct Pending {
    handle: TimerHandle,
    due: Duration,
    event: TimedEvent,
}

/// Queue of fire-once events on a logical timeline.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position on the timeline.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `event` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, event: TimedEvent) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push(Pending {
            handle,
            due: self.now + delay,
            event,
        });
        handle
    }

    /// Cancel an event. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    /// Cancel whatever `slot` holds and empty it.
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerHandle>) {
        if let Some(handle) = slot.take() {
            self.cancel(handle);
        }
    }

    /// Drop every queued event.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return the earliest event due at or before `until`,
    /// moving the timeline to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, TimedEvent)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.handle))
            .map(|(idx, _)| idx)?;

        let fired = self.pending.remove(idx);
        self.now = self.now.max(fired.due);
        Some((fired.handle, fired.event))
    }

    /// Move the timeline forward to `until` once all due events are handled.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

/// Result of feeding a tick to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Tick belonged to a cancelled or replaced timer.
    Stale,
    /// Countdown continues with this many seconds left.
    Running(u32),
    /// Countdown hit zero.
    Expired,
}

/// Countdown for the active player's turn.
///
/// Only runs in multiplayer matches; a single player never runs out of time.
#[derive(Debug, Clone)]
pub struct TurnClock {
    duration: u32,
    remaining: u32,
    interval: Duration,
    enabled: bool,
    tick: Option<TimerHandle>,
}

impl TurnClock {
    pub fn new(duration_secs: u32, interval: Duration, enabled: bool) -> Self {
        Self {
            duration: duration_secs,
            remaining: duration_secs,
            interval,
            enabled,
            tick: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    /// Refill to the full duration and restart the interval.
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        self.remaining = self.duration;
        self.stop(scheduler);
        self.start(scheduler);
    }

    /// Resume counting from the current value.
    pub fn start(&mut self, scheduler: &mut Scheduler) {
        if !self.enabled || self.tick.is_some() || self.remaining == 0 {
            return;
        }
        self.tick = Some(scheduler.schedule(self.interval, TimedEvent::TurnTick));
    }

    /// Pause without touching the remaining time.
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        scheduler.cancel_slot(&mut self.tick);
    }

    /// Handle a fired `TurnTick`.
    pub fn on_tick(&mut self, handle: TimerHandle, scheduler: &mut Scheduler) -> ClockTick {
        if self.tick != Some(handle) {
            return ClockTick::Stale;
        }
        self.tick = None;
        self.remaining = self.remaining.saturating_sub(1);

        if self.remaining == 0 {
            ClockTick::Expired
        } else {
            self.start(scheduler);
            ClockTick::Running(self.remaining)
        }
    }
}
