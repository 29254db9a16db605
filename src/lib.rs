//! Panda Pomodoro Library
//!
//! This library provides the core functionality for the Panda Pomodoro
//! terminal timer. It includes:
//! - A cooperative scheduler that runs countdown ticks and animation frames
//! - The countdown state machine (manual countdowns and Pomodoro runs)
//! - Alert audio with rodio, external-player and terminal-bell backends
//! - The terminal front end: arguments, form, prompt commands, status line
//! - Menu bar UI with tray icon (macOS only)

pub mod alert;
pub mod animation;
pub mod app;
pub mod cli;
pub mod menubar;
pub mod scheduler;
pub mod sound;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{format_clock, Phase, PomodoroConfig, SessionSnapshot, TimerSession};

pub use scheduler::{CooperativeScheduler, TaskHandle, TaskSlot, TickScheduler};

pub use timer::{
    CountdownTick, DisplaySink, Notifier, TimerError, TimerStateMachine, TICK_INTERVAL,
};

pub use animation::{AnimationFrame, AnimationKind, FrameAnimation, FRAME_INTERVAL};

pub use alert::{popup_channel, AlertNotifier, PopupRequest};

pub use app::{App, AppEvent, AppOptions};

// Re-export menubar types
pub use menubar::{
    tray_channel, EventHandler, IconManager, MenuBuilder, MenuConfig, MenuItemConfig, MenuItemId,
    TrayAction, TrayIconManager,
};

// Re-export sound types
pub use sound::{
    resolve_alert_sound, select_player, AlertPlayer, AudioBackend, BellPlayer, MockAlertPlayer,
    ProcessAlertPlayer, RodioAlertPlayer, SoundError, SoundOptions,
};
