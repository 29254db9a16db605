//! Event handling for menu bar interactions.
//!
//! This module handles:
//! - Mapping menu item ids to actions
//! - Forwarding actions to the main loop over a crossbeam channel
//!
//! Menu clicks arrive on whatever thread the tray library uses. They are
//! only forwarded here; the main loop drains the channel and applies them.

use std::fmt;

use crossbeam_channel::{Receiver, Sender};

// ============================================================================
// TrayAction
// ============================================================================

/// Actions that can be triggered from the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    /// Start a Pomodoro run from the form
    StartPomodoro,
    /// Pause if running, otherwise resume
    PauseResume,
    /// Stop the Pomodoro run
    StopPomodoro,
    /// Quit the application
    Quit,
}

impl fmt::Display for TrayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TrayAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrayAction::StartPomodoro => "start-pomodoro",
            TrayAction::PauseResume => "pause-resume",
            TrayAction::StopPomodoro => "stop-pomodoro",
            TrayAction::Quit => "quit",
        }
    }
}

/// Creates the tray action channel.
pub fn tray_channel() -> (Sender<TrayAction>, Receiver<TrayAction>) {
    crossbeam_channel::unbounded()
}

// ============================================================================
// MenuItemId
// ============================================================================

/// Identifiers for menu items.
///
/// `as_str` is the id given to the native menu item, so a click event can
/// be mapped back without holding on to the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    StartPomodoro,
    PauseResume,
    StopPomodoro,
    Quit,
    /// Unknown or unhandled menu item
    Unknown,
}

impl MenuItemId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItemId::StartPomodoro => "start_pomodoro",
            MenuItemId::PauseResume => "pause_resume",
            MenuItemId::StopPomodoro => "stop_pomodoro",
            MenuItemId::Quit => "quit",
            MenuItemId::Unknown => "unknown",
        }
    }

    /// Maps a native menu id back to an item.
    pub fn from_id(id: &str) -> Self {
        match id {
            "start_pomodoro" => MenuItemId::StartPomodoro,
            "pause_resume" => MenuItemId::PauseResume,
            "stop_pomodoro" => MenuItemId::StopPomodoro,
            "quit" => MenuItemId::Quit,
            _ => MenuItemId::Unknown,
        }
    }

    /// Converts a menu item ID to the corresponding action.
    pub fn to_action(&self) -> Option<TrayAction> {
        match self {
            MenuItemId::StartPomodoro => Some(TrayAction::StartPomodoro),
            MenuItemId::PauseResume => Some(TrayAction::PauseResume),
            MenuItemId::StopPomodoro => Some(TrayAction::StopPomodoro),
            MenuItemId::Quit => Some(TrayAction::Quit),
            MenuItemId::Unknown => None,
        }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// Converts menu clicks to actions and forwards them to the main loop.
///
/// Cheap to clone; every clone sends into the same channel.
#[derive(Debug, Clone)]
pub struct EventHandler {
    action_tx: Sender<TrayAction>,
}

impl EventHandler {
    pub fn new(action_tx: Sender<TrayAction>) -> Self {
        Self { action_tx }
    }

    /// Handles a click on the item with native id `id`.
    ///
    /// Returns the forwarded action, or `None` for unknown items or when the
    /// main loop has gone away.
    pub fn handle_click(&self, id: &str) -> Option<TrayAction> {
        let action = MenuItemId::from_id(id).to_action()?;

        tracing::debug!(action = %action, "menu bar action received");
        match self.action_tx.send(action) {
            Ok(()) => Some(action),
            Err(_) => {
                tracing::warn!(action = %action, "main loop is gone, dropping menu action");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod tray_action_tests {
        use super::*;

        #[test]
        fn test_display() {
            assert_eq!(TrayAction::StartPomodoro.to_string(), "start-pomodoro");
            assert_eq!(TrayAction::PauseResume.to_string(), "pause-resume");
            assert_eq!(TrayAction::StopPomodoro.to_string(), "stop-pomodoro");
            assert_eq!(TrayAction::Quit.to_string(), "quit");
        }
    }

    mod menu_item_id_tests {
        use super::*;

        #[test]
        fn test_id_round_trip() {
            for item in [
                MenuItemId::StartPomodoro,
                MenuItemId::PauseResume,
                MenuItemId::StopPomodoro,
                MenuItemId::Quit,
            ] {
                assert_eq!(MenuItemId::from_id(item.as_str()), item);
            }
        }

        #[test]
        fn test_unknown_id() {
            assert_eq!(MenuItemId::from_id("show_window"), MenuItemId::Unknown);
            assert_eq!(MenuItemId::Unknown.to_action(), None);
        }

        #[test]
        fn test_to_action() {
            assert_eq!(
                MenuItemId::PauseResume.to_action(),
                Some(TrayAction::PauseResume)
            );
            assert_eq!(MenuItemId::Quit.to_action(), Some(TrayAction::Quit));
        }
    }

    mod event_handler_tests {
        use super::*;

        #[test]
        fn test_handle_click_forwards_action() {
            let (tx, rx) = tray_channel();
            let handler = EventHandler::new(tx);

            assert_eq!(
                handler.handle_click("stop_pomodoro"),
                Some(TrayAction::StopPomodoro)
            );
            assert_eq!(rx.try_recv(), Ok(TrayAction::StopPomodoro));
        }

        #[test]
        fn test_handle_click_unknown_sends_nothing() {
            let (tx, rx) = tray_channel();
            let handler = EventHandler::new(tx);

            assert_eq!(handler.handle_click("title"), None);
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_handle_click_after_receiver_dropped() {
            let (tx, rx) = tray_channel();
            let handler = EventHandler::new(tx);
            drop(rx);

            assert_eq!(handler.handle_click("quit"), None);
        }

        #[test]
        fn test_clicks_from_another_thread() {
            let (tx, rx) = tray_channel();
            let handler = EventHandler::new(tx);

            let worker = std::thread::spawn(move || {
                handler.handle_click("start_pomodoro");
                handler.handle_click("quit");
            });
            worker.join().unwrap();

            let received: Vec<_> = rx.try_iter().collect();
            assert_eq!(received, vec![TrayAction::StartPomodoro, TrayAction::Quit]);
        }
    }
}
