//! Menu building and item state management for the menu bar.
//!
//! This module handles:
//! - Menu item configuration and state
//! - Determining which menu items should be enabled based on the session
//!
//! The configuration logic is platform-independent and fully testable.
//! Actual menu creation using tray-icon is done in the platform-specific code.

use super::event::MenuItemId;
use crate::types::{Phase, TimerSession};

// ============================================================================
// MenuItemConfig
// ============================================================================

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Item id, used to map clicks back to actions
    pub id: MenuItemId,
    /// Display text for the menu item
    pub text: String,
    /// Whether the menu item is enabled (clickable)
    pub enabled: bool,
}

impl MenuItemConfig {
    pub fn new(id: MenuItemId, text: impl Into<String>, enabled: bool) -> Self {
        Self {
            id,
            text: text.into(),
            enabled,
        }
    }
}

// ============================================================================
// MenuConfig
// ============================================================================

/// Complete menu configuration for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Title item (always disabled, shows app name)
    pub title: String,
    pub start_pomodoro: MenuItemConfig,
    /// Label flips between "Pause" and "Resume"
    pub pause_resume: MenuItemConfig,
    pub stop_pomodoro: MenuItemConfig,
    /// Quit button (always enabled)
    pub quit: MenuItemConfig,
}

impl MenuConfig {
    /// Action items in menu order.
    pub fn action_items(&self) -> [&MenuItemConfig; 4] {
        [
            &self.start_pomodoro,
            &self.pause_resume,
            &self.stop_pomodoro,
            &self.quit,
        ]
    }
}

// ============================================================================
// MenuBuilder
// ============================================================================

/// Builds menu configuration from the session.
#[derive(Debug, Default)]
pub struct MenuBuilder;

impl MenuBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds a complete menu configuration based on the current session.
    pub fn build(&self, session: &TimerSession) -> MenuConfig {
        MenuConfig {
            title: "Panda Pomodoro".to_string(),
            start_pomodoro: MenuItemConfig::new(
                MenuItemId::StartPomodoro,
                "Start Pomodoro",
                Self::is_start_enabled(session),
            ),
            pause_resume: MenuItemConfig::new(
                MenuItemId::PauseResume,
                if session.running { "Pause" } else { "Resume" },
                Self::is_pause_resume_enabled(session),
            ),
            stop_pomodoro: MenuItemConfig::new(
                MenuItemId::StopPomodoro,
                "Stop Pomodoro",
                Self::is_stop_enabled(session),
            ),
            quit: MenuItemConfig::new(MenuItemId::Quit, "Quit", true),
        }
    }

    /// Enabled unless a countdown is ticking or a manual countdown exists.
    pub fn is_start_enabled(session: &TimerSession) -> bool {
        !session.running && session.phase != Phase::Manual
    }

    /// Enabled when there is something to pause or resume.
    pub fn is_pause_resume_enabled(session: &TimerSession) -> bool {
        session.phase != Phase::Idle || session.is_parked()
    }

    /// Enabled during a Pomodoro run.
    pub fn is_stop_enabled(session: &TimerSession) -> bool {
        session.is_pomodoro_mode
    }
}

// ============================================================================
// Tests
// ============================================================================
