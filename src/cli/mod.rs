//! Terminal front end.
//!
//! This module provides the user-facing surface:
//! - `args`: Command-line options using clap derive
//! - `input`: Form state and validation of typed values
//! - `command`: Prompt commands
//! - `editor`: Raw-mode line editing
//! - `terminal`: Status-line display sink

pub mod args;
pub mod command;
pub mod editor;
pub mod input;
pub mod terminal;

pub use args::{Cli, Commands, RunArgs};
pub use command::{Command, CommandError, HELP_TEXT};
pub use input::{parse_manual_duration, parse_pomodoro_field, FormError, FormField, FormState};
pub use editor::{EditorAction, LineEditor};
pub use terminal::{DisplayMode, TerminalDisplay};
