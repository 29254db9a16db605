//! Menu bar UI module.
//!
//! This module provides:
//! - Tray icon management for the macOS menu bar
//! - Live timer title (e.g., "🍅 15:30")
//! - Start Pomodoro / Pause-Resume / Stop Pomodoro / Quit menu
//!
//! # Architecture
//!
//! The module is split into platform-independent and platform-specific parts:
//!
//! - `icon.rs`: Title text generation (platform-independent, fully testable)
//! - `menu.rs`: Menu configuration (platform-independent, fully testable)
//! - `event.rs`: Actions and click forwarding (platform-independent, fully testable)
//! - `mod.rs`: TrayIconManager (platform-specific on macOS)
//!
//! Menu clicks are sent as [`TrayAction`]s over a crossbeam channel. The main
//! loop drains that channel, so the session is only ever touched from the
//! loop.

pub mod event;
pub mod icon;
pub mod menu;

pub use event::{tray_channel, EventHandler, MenuItemId, TrayAction};
pub use icon::IconManager;
pub use menu::{MenuBuilder, MenuConfig, MenuItemConfig};

use crossbeam_channel::Sender;

use crate::types::TimerSession;

// ============================================================================
// TrayIconManager
// ============================================================================

/// Native menu items kept so their state can be updated in place.
#[cfg(target_os = "macos")]
struct NativeItems {
    start_pomodoro: tray_icon::menu::MenuItem,
    pause_resume: tray_icon::menu::MenuItem,
    stop_pomodoro: tray_icon::menu::MenuItem,
}

/// Manages the tray icon and menu bar UI.
///
/// On macOS it owns the actual tray-icon instance. On other platforms it
/// operates in a no-op mode.
pub struct TrayIconManager {
    /// Icon manager for title generation
    icon_manager: IconManager,
    /// Menu builder for menu configuration
    menu_builder: MenuBuilder,
    /// Forwards menu clicks to the main loop
    event_handler: EventHandler,
    /// Whether the manager is initialized
    initialized: bool,
    /// Platform-specific tray icon instance (macOS only)
    #[cfg(target_os = "macos")]
    tray_icon: Option<tray_icon::TrayIcon>,
    #[cfg(target_os = "macos")]
    items: Option<NativeItems>,
}

impl TrayIconManager {
    /// Creates a manager whose menu actions are sent to `action_tx`.
    ///
    /// The native tray icon is not created until `initialize()` is called.
    pub fn new(action_tx: Sender<TrayAction>) -> Self {
        Self {
            icon_manager: IconManager::new(),
            menu_builder: MenuBuilder::new(),
            event_handler: EventHandler::new(action_tx),
            initialized: false,
            #[cfg(target_os = "macos")]
            tray_icon: None,
            #[cfg(target_os = "macos")]
            items: None,
        }
    }

    /// Returns whether the manager is initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns a reference to the event handler.
    pub fn event_handler(&self) -> &EventHandler {
        &self.event_handler
    }

    /// Generates the title for `session`.
    pub fn generate_title(&self, session: &TimerSession) -> String {
        self.icon_manager.generate_title(session)
    }

    /// Generates the menu configuration for `session`.
    pub fn generate_menu_config(&self, session: &TimerSession) -> MenuConfig {
        self.menu_builder.build(session)
    }

    /// Pushes the session to the title and menu.
    ///
    /// Returns true if the title changed.
    pub fn refresh(&mut self, session: &TimerSession) -> bool {
        if !self.initialized {
            return false;
        }

        let title = self.icon_manager.generate_title(session);
        if !self.icon_manager.title_changed(&title) {
            return false;
        }

        tracing::trace!(title = %title, "menu bar title updated");
        #[cfg(target_os = "macos")]
        {
            if let Some(ref tray_icon) = self.tray_icon {
                tray_icon.set_title(Some(&title));
            }
            let config = self.menu_builder.build(session);
            if let Some(ref items) = self.items {
                items.start_pomodoro.set_enabled(config.start_pomodoro.enabled);
                items.pause_resume.set_text(&config.pause_resume.text);
                items.pause_resume.set_enabled(config.pause_resume.enabled);
                items.stop_pomodoro.set_enabled(config.stop_pomodoro.enabled);
            }
        }
        true
    }

    /// Shuts down the tray icon.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        self.initialized = false;
        #[cfg(target_os = "macos")]
        {
            tray_icon::menu::MenuEvent::set_event_handler(None::<fn(tray_icon::menu::MenuEvent)>);
            self.items = None;
            self.tray_icon = None;
        }
        tracing::info!("menu bar icon removed");
    }

    /// Initializes the tray icon (macOS only).
    ///
    /// Must be called from the main thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the tray icon cannot be created.
    #[cfg(target_os = "macos")]
    pub fn initialize(&mut self, session: &TimerSession) -> anyhow::Result<()> {
        use anyhow::Context;
        use tray_icon::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem};
        use tray_icon::TrayIconBuilder;

        let title = self.icon_manager.generate_title(session);
        let config = self.menu_builder.build(session);

        let menu = Menu::new();
        menu.append(&MenuItem::new(&config.title, false, None))?;
        menu.append(&PredefinedMenuItem::separator())?;

        let native = |item: &MenuItemConfig| {
            MenuItem::with_id(item.id.as_str(), &item.text, item.enabled, None)
        };
        let items = NativeItems {
            start_pomodoro: native(&config.start_pomodoro),
            pause_resume: native(&config.pause_resume),
            stop_pomodoro: native(&config.stop_pomodoro),
        };
        menu.append(&items.start_pomodoro)?;
        menu.append(&items.pause_resume)?;
        menu.append(&items.stop_pomodoro)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&native(&config.quit))?;

        let handler = self.event_handler.clone();
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            handler.handle_click(event.id.0.as_str());
        }));

        let tray_icon = TrayIconBuilder::new()
            .with_title(&title)
            .with_menu(Box::new(menu))
            .with_tooltip("Panda Pomodoro")
            .build()
            .context("failed to create the menu bar icon")?;

        self.icon_manager.title_changed(&title);
        self.tray_icon = Some(tray_icon);
        self.items = Some(items);
        self.initialized = true;

        tracing::info!("menu bar icon initialized");
        Ok(())
    }

    /// Initializes the tray icon (non-macOS, no-op).
    #[cfg(not(target_os = "macos"))]
    pub fn initialize(&mut self, session: &TimerSession) -> anyhow::Result<()> {
        tracing::warn!("the menu bar icon is only supported on macOS");
        let title = self.icon_manager.generate_title(session);
        self.icon_manager.title_changed(&title);
        self.initialized = true;
        Ok(())
    }
}

impl std::fmt::Debug for TrayIconManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayIconManager")
            .field("initialized", &self.initialized)
            .field("icon_manager", &self.icon_manager)
            .field("menu_builder", &self.menu_builder)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
