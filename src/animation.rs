//! Fixed-interval frame animations.
//!
//! Two animations run on the shared scheduler: the mascot in the status
//! line and the end-of-timer popup banner. Each one holds its own
//! [`TaskSlot`], so stopping or restarting it never leaves a frame pending.

use std::time::Duration;

use tracing::debug;

use crate::scheduler::{TaskHandle, TaskSlot, TickScheduler};

/// Interval between animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Panda mascot shown before the clock.
pub const MASCOT_FRAMES: &[&str] = &[
    "(o.o)", "(o.o)", "(-.-)", "(o.o)", "(o.o)", "(o.O)", "(O.o)", "(o.o)",
];

/// Banner shown while the end-of-timer popup is open.
pub const POPUP_FRAMES: &[&str] = &[
    "*  TIME'S UP  *",
    " * TIME'S UP * ",
    "  *TIME'S UP*  ",
    " * TIME'S UP * ",
];

/// Which animation a frame event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Status-line mascot
    Mascot,
    /// End-of-timer popup
    Popup,
}

/// Scheduler event that advances one animation by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    pub kind: AnimationKind,
}

// ============================================================================
// FrameAnimation
// ============================================================================

/// Cycles through a frame list at a fixed interval.
#[derive(Debug)]
pub struct FrameAnimation {
    kind: AnimationKind,
    frames: &'static [&'static str],
    interval: Duration,
    index: usize,
    running: bool,
    slot: TaskSlot,
}

impl FrameAnimation {
    pub fn new(kind: AnimationKind, frames: &'static [&'static str], interval: Duration) -> Self {
        Self {
            kind,
            frames,
            interval,
            index: 0,
            running: false,
            slot: TaskSlot::new(),
        }
    }

    /// The status-line mascot.
    pub fn mascot() -> Self {
        Self::new(AnimationKind::Mascot, MASCOT_FRAMES, FRAME_INTERVAL)
    }

    /// The end-of-timer popup banner.
    pub fn popup() -> Self {
        Self::new(AnimationKind::Popup, POPUP_FRAMES, FRAME_INTERVAL)
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frame currently shown, or `None` when stopped or without frames.
    pub fn current(&self) -> Option<&'static str> {
        if !self.running {
            return None;
        }
        self.frames.get(self.index).copied()
    }

    /// Shows the first frame and registers the next one.
    ///
    /// Restarting a running animation rewinds it. An animation without frames
    /// runs but never registers a frame task.
    pub fn start<S>(&mut self, scheduler: &mut S) -> Option<&'static str>
    where
        S: TickScheduler + ?Sized,
        S::Event: From<AnimationFrame>,
    {
        self.index = 0;
        self.running = true;
        if self.frames.is_empty() {
            self.slot.disarm(scheduler);
            debug!(kind = ?self.kind, "animation has no frames");
            return None;
        }

        self.arm(scheduler);
        debug!(kind = ?self.kind, frames = self.frames.len(), "animation started");
        self.current()
    }

    /// Handles a fired frame task and returns the new frame.
    ///
    /// Returns `None` for a stale handle or a stopped animation.
    pub fn advance<S>(&mut self, scheduler: &mut S, fired: TaskHandle) -> Option<&'static str>
    where
        S: TickScheduler + ?Sized,
        S::Event: From<AnimationFrame>,
    {
        if !self.slot.fired(fired) || !self.running || self.frames.is_empty() {
            return None;
        }

        self.index = (self.index + 1) % self.frames.len();
        self.arm(scheduler);
        self.current()
    }

    /// Cancels the pending frame. Returns true if the animation was running.
    pub fn stop<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: TickScheduler + ?Sized,
    {
        self.slot.disarm(scheduler);
        let was_running = self.running;
        self.running = false;
        self.index = 0;
        was_running
    }

    fn arm<S>(&mut self, scheduler: &mut S)
    where
        S: TickScheduler + ?Sized,
        S::Event: From<AnimationFrame>,
    {
        let event = AnimationFrame { kind: self.kind }.into();
        self.slot.arm(scheduler, self.interval, event);
    }
}

// ============================================================================
// Tests
// ============================================================================
