//! Core data types for the timer.
//!
//! This module defines the data structures used for:
//! - Countdown phases
//! - The mutable timer session
//! - Validated Pomodoro configuration
//! - Serializable status snapshots

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timer::TimerError;

// ============================================================================
// Phase
// ============================================================================

/// Represents the current phase of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Phase {
    /// No countdown active
    #[default]
    Idle,
    /// Single manual countdown
    Manual,
    /// Pomodoro focus segment
    Focus,
    /// Pomodoro short break
    ShortBreak,
    /// Pomodoro long break (every `cycles_before_long` focus segments)
    LongBreak,
}

impl Phase {
    /// Returns the display name of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Manual => "Manual",
            Phase::Focus => "Focus",
            Phase::ShortBreak => "ShortBreak",
            Phase::LongBreak => "LongBreak",
        }
    }

    /// Returns true for the two break phases.
    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }

    /// Returns true for phases that belong to a Pomodoro run.
    pub fn is_pomodoro(&self) -> bool {
        matches!(self, Phase::Focus | Phase::ShortBreak | Phase::LongBreak)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PomodoroConfig
// ============================================================================

/// Largest phase length in minutes whose length in seconds still fits in `u32`.
pub const MAX_PHASE_MINUTES: u32 = u32::MAX / 60;

/// Settings captured when a Pomodoro run starts.
///
/// Construction is the validation boundary: a `PomodoroConfig` value always
/// holds durations and a cycle count of at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroConfig {
    focus_minutes: u32,
    short_break_minutes: u32,
    long_break_minutes: u32,
    cycles_before_long: u32,
    auto_loop: bool,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            cycles_before_long: 4,
            auto_loop: true,
        }
    }
}

impl PomodoroConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidPomodoroConfig` naming the first field that
    /// is zero or too large.
    pub fn new(
        focus_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        cycles_before_long: u32,
        auto_loop: bool,
    ) -> Result<Self, TimerError> {
        check_minutes("focus", focus_minutes)?;
        check_minutes("short", short_break_minutes)?;
        check_minutes("long", long_break_minutes)?;
        if cycles_before_long < 1 {
            return Err(TimerError::InvalidPomodoroConfig {
                field: "cycles",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            focus_minutes,
            short_break_minutes,
            long_break_minutes,
            cycles_before_long,
            auto_loop,
        })
    }

    /// Focus length in minutes.
    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    /// Short break length in minutes.
    pub fn short_break_minutes(&self) -> u32 {
        self.short_break_minutes
    }

    /// Long break length in minutes.
    pub fn long_break_minutes(&self) -> u32 {
        self.long_break_minutes
    }

    /// Number of focus segments between long breaks.
    pub fn cycles_before_long(&self) -> u32 {
        self.cycles_before_long
    }

    /// Whether a finished break starts the next focus segment automatically.
    pub fn auto_loop(&self) -> bool {
        self.auto_loop
    }

    /// Length of `phase` in seconds. Zero for phases outside a Pomodoro run.
    pub fn phase_seconds(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_minutes * 60,
            Phase::ShortBreak => self.short_break_minutes * 60,
            Phase::LongBreak => self.long_break_minutes * 60,
            Phase::Idle | Phase::Manual => 0,
        }
    }

    /// Returns the break that follows the `completed_focus`-th focus segment.
    pub fn break_after(&self, completed_focus: u32) -> Phase {
        if completed_focus % self.cycles_before_long == 0 {
            Phase::LongBreak
        } else {
            Phase::ShortBreak
        }
    }
}

fn check_minutes(field: &'static str, minutes: u32) -> Result<(), TimerError> {
    if minutes < 1 {
        return Err(TimerError::InvalidPomodoroConfig {
            field,
            reason: "must be at least 1".to_string(),
        });
    }
    if minutes > MAX_PHASE_MINUTES {
        return Err(TimerError::InvalidPomodoroConfig {
            field,
            reason: format!("must be at most {}", MAX_PHASE_MINUTES),
        });
    }
    Ok(())
}

// ============================================================================
// TimerSession
// ============================================================================

/// The single mutable countdown state.
///
/// Owned by the state machine; everything else only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimerSession {
    /// Seconds left in the current countdown
    pub remaining_seconds: u32,
    /// Whether a tick is pending
    pub running: bool,
    /// Current phase
    pub phase: Phase,
    /// Whether a Pomodoro run is in progress
    pub is_pomodoro_mode: bool,
    /// Completed focus segments in the current Pomodoro run
    pub current_cycle_count: u32,
}

impl TimerSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the session is idle inside a Pomodoro run.
    pub fn is_parked(&self) -> bool {
        self.is_pomodoro_mode && self.phase == Phase::Idle
    }
}

// ============================================================================
// SessionSnapshot
// ============================================================================

/// Serializable copy of the session, for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Current phase
    pub phase: Phase,
    /// Remaining time formatted as MM:SS
    pub clock: String,
    /// Remaining seconds
    pub remaining_seconds: u32,
    /// Whether the countdown is ticking
    pub running: bool,
    /// Whether a Pomodoro run is in progress
    pub pomodoro_mode: bool,
    /// Completed focus segments in the current run
    pub cycle_count: u32,
}

impl SessionSnapshot {
    /// Creates a snapshot from the session.
    pub fn from_session(session: &TimerSession) -> Self {
        Self {
            phase: session.phase,
            clock: format_clock(session.remaining_seconds),
            remaining_seconds: session.remaining_seconds,
            running: session.running,
            pomodoro_mode: session.is_pomodoro_mode,
            cycle_count: session.current_cycle_count,
        }
    }
}

/// Formats seconds as `MM:SS`. Minutes are not capped.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

// ============================================================================
// Tests
// ============================================================================
