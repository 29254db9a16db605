//! Countdown state machine and its collaborators.
//!
//! - `machine`: `TimerStateMachine`, the manual/Pomodoro phase logic
//! - `error`: `TimerError`
//! - `DisplaySink` / `Notifier`: capabilities the machine drives
//! - `RecordingDisplay` / `MockNotifier`: in-memory collaborators for tests

mod error;
mod machine;

pub use error::TimerError;
pub use machine::{CountdownTick, TimerStateMachine, TICK_INTERVAL};

use crate::types::Phase;

// ============================================================================
// Collaborators
// ============================================================================

/// Receives countdown updates. Called synchronously on every tick and
/// every phase change.
pub trait DisplaySink {
    /// Shows the remaining time.
    fn show_remaining(&mut self, seconds: u32);

    /// Shows the current phase.
    fn show_phase(&mut self, phase: Phase);
}

/// Produces the end-of-countdown alert.
pub trait Notifier {
    /// Called once per completed countdown, before the next phase starts.
    fn on_countdown_complete(&mut self, finished: Phase);

    /// Stops any in-flight audio. Callable at any time, including shutdown.
    fn stop_audio(&mut self);
}

// ============================================================================
// Test doubles
// ============================================================================

/// Display events recorded by [`RecordingDisplay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// `show_remaining` was called
    Remaining(u32),
    /// `show_phase` was called
    Phase(Phase),
}

/// Display sink that records every call.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    events: Vec<DisplayEvent>,
}

impl RecordingDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls, oldest first.
    #[must_use]
    pub fn events(&self) -> &[DisplayEvent] {
        &self.events
    }

    /// The most recent remaining-time value.
    #[must_use]
    pub fn last_remaining(&self) -> Option<u32> {
        self.events.iter().rev().find_map(|e| match e {
            DisplayEvent::Remaining(s) => Some(*s),
            DisplayEvent::Phase(_) => None,
        })
    }

    /// Phases shown so far, oldest first.
    #[must_use]
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Phase(p) => Some(*p),
                DisplayEvent::Remaining(_) => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl DisplaySink for RecordingDisplay {
    fn show_remaining(&mut self, seconds: u32) {
        self.events.push(DisplayEvent::Remaining(seconds));
    }

    fn show_phase(&mut self, phase: Phase) {
        self.events.push(DisplayEvent::Phase(phase));
    }
}

/// Notifier that records completions and audio stops.
#[derive(Debug, Default)]
pub struct MockNotifier {
    completed: Vec<Phase>,
    stop_calls: usize,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `on_countdown_complete` calls.
    #[must_use]
    pub fn complete_count(&self) -> usize {
        self.completed.len()
    }

    /// Finished phases reported so far, oldest first.
    #[must_use]
    pub fn completed(&self) -> &[Phase] {
        &self.completed
    }

    /// Number of `stop_audio` calls.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stop_calls
    }
}

impl Notifier for MockNotifier {
    fn on_countdown_complete(&mut self, finished: Phase) {
        self.completed.push(finished);
    }

    fn stop_audio(&mut self) {
        self.stop_calls += 1;
    }
}
