//! Timer error types.
//!
//! Every error is raised before any state mutation, so a rejected
//! operation always leaves the session exactly as it was.

use thiserror::Error;

/// Errors returned by timer operations and input validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Manual duration is non-positive or unparsable.
    #[error("invalid time: {0}")]
    InvalidDuration(String),

    /// A Pomodoro setting is non-positive or unparsable.
    #[error("invalid Pomodoro setting '{field}': {reason}")]
    InvalidPomodoroConfig {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A countdown is already ticking.
    #[error("the timer is already running")]
    AlreadyRunning,

    /// A manual countdown was requested during a Pomodoro run.
    #[error("a Pomodoro run is in progress")]
    PomodoroActive,

    /// A Pomodoro run was requested while a manual countdown exists.
    #[error("a manual countdown is in progress")]
    ManualActive,
}

impl TimerError {
    /// Returns true if the error comes from rejected user input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidDuration(_) | Self::InvalidPomodoroConfig { .. }
        )
    }

    /// Returns true if the operation conflicts with the current mode.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyRunning | Self::PomodoroActive | Self::ManualActive
        )
    }

    /// Returns a user-facing hint for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDuration(_) => {
                "enter whole numbers, seconds 0-59, and a total above zero"
            }
            Self::InvalidPomodoroConfig { .. } => "Pomodoro settings must be whole numbers of at least 1",
            Self::AlreadyRunning => "pause the timer first",
            Self::PomodoroActive => "stop the Pomodoro run first",
            Self::ManualActive => "reset the manual countdown first",
        }
    }
}
