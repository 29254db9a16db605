//! Title management for menu bar display.
//!
//! This module handles:
//! - Generating display text for the menu bar (e.g., "🍅 15:30")
//! - Skipping redundant title updates
//!
//! The text generation logic is platform-independent and fully testable.

use crate::types::{format_clock, Phase, TimerSession};

// ============================================================================
// Constants
// ============================================================================

/// Emoji for focus segments
const FOCUS_EMOJI: &str = "🍅";

/// Emoji for breaks
const BREAK_EMOJI: &str = "☕";

/// Emoji for manual countdowns
const MANUAL_EMOJI: &str = "⏱";

/// Emoji for paused or idle state
const STOPPED_EMOJI: &str = "⏸";

// ============================================================================
// IconManager
// ============================================================================

/// Generates the menu bar title from the session.
#[derive(Debug, Default)]
pub struct IconManager {
    /// Title most recently pushed to the tray
    last_title: Option<String>,
}

impl IconManager {
    pub fn new() -> Self {
        Self { last_title: None }
    }

    /// Generates the title text for display in the menu bar.
    ///
    /// Format:
    /// - Running: "<phase emoji> MM:SS"
    /// - Paused: "⏸ MM:SS"
    /// - Idle: "⏸ Idle"
    pub fn generate_title(&self, session: &TimerSession) -> String {
        if session.phase == Phase::Idle {
            return format!("{} {}", STOPPED_EMOJI, Phase::Idle);
        }

        let emoji = if session.running {
            Self::emoji(session.phase)
        } else {
            STOPPED_EMOJI
        };
        format!("{} {}", emoji, format_clock(session.remaining_seconds))
    }

    /// Returns the emoji for `phase`.
    pub fn emoji(phase: Phase) -> &'static str {
        match phase {
            Phase::Focus => FOCUS_EMOJI,
            Phase::ShortBreak | Phase::LongBreak => BREAK_EMOJI,
            Phase::Manual => MANUAL_EMOJI,
            Phase::Idle => STOPPED_EMOJI,
        }
    }

    /// Records `title` and returns true if it differs from the last one.
    pub fn title_changed(&mut self, title: &str) -> bool {
        if self.last_title.as_deref() == Some(title) {
            return false;
        }
        self.last_title = Some(title.to_string());
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
