//! Command-line arguments.
//!
//! Uses clap derive macro for argument parsing. The options seed the
//! interactive form; they are validated again when a countdown starts.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::input::FormState;
use crate::sound::SoundOptions;

// ============================================================================
// CLI Structure
// ============================================================================

/// Panda Pomodoro - a terminal countdown and Pomodoro timer
#[derive(Parser, Debug)]
#[command(
    name = "panda-pomodoro",
    version,
    about = "A terminal countdown and Pomodoro timer",
    long_about = "A countdown and Pomodoro timer driven from the terminal.\n\
                  Type commands at the prompt (start, pause, pomo, skip, ...);\n\
                  type `help` for the full list.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Timer settings
    #[command(flatten)]
    pub run: RunArgs,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Arguments
// ============================================================================

/// Initial form values and front-end switches
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Manual countdown minutes
    #[arg(short, long, default_value = "0")]
    pub minutes: u32,

    /// Manual countdown seconds (0-59)
    #[arg(
        short,
        long,
        default_value = "30",
        value_parser = clap::value_parser!(u32).range(0..=59)
    )]
    pub seconds: u32,

    /// Focus length in minutes
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub focus: u32,

    /// Short break length in minutes
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..))]
    pub short: u32,

    /// Long break length in minutes
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u32).range(1..))]
    pub long: u32,

    /// Focus segments before a long break
    #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u32).range(1..))]
    pub cycles: u32,

    /// Stop after each break instead of starting the next focus segment
    #[arg(long)]
    pub no_auto_loop: bool,

    /// Alert sound file (.mp3/.wav); defaults to alert.mp3 next to the binary
    #[arg(long, value_name = "PATH")]
    pub alert_sound: Option<PathBuf>,

    /// Ring the terminal bell in addition to the alert sound
    #[arg(long)]
    pub extra_beep: bool,

    /// Do not play the alert sound file
    #[arg(long)]
    pub mute: bool,

    /// Hide the animated panda mascot
    #[arg(long)]
    pub no_mascot: bool,

    /// Show a menu bar icon (macOS)
    #[arg(long)]
    pub tray: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            minutes: 0,
            seconds: 30,
            focus: 25,
            short: 5,
            long: 15,
            cycles: 4,
            no_auto_loop: false,
            alert_sound: None,
            extra_beep: false,
            mute: false,
            no_mascot: false,
            tray: false,
        }
    }
}

impl RunArgs {
    /// Returns the form prefilled from these options.
    pub fn form_state(&self) -> FormState {
        FormState {
            minutes: self.minutes.to_string(),
            seconds: self.seconds.to_string(),
            focus: self.focus.to_string(),
            short: self.short.to_string(),
            long: self.long.to_string(),
            cycles: self.cycles.to_string(),
            auto_loop: !self.no_auto_loop,
            extra_beep: self.extra_beep,
        }
    }

    /// Returns the audio settings.
    pub fn sound_options(&self) -> SoundOptions {
        SoundOptions {
            path: self.alert_sound.clone(),
            muted: self.mute,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["panda-pomodoro"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert_eq!(cli.run.minutes, 0);
            assert_eq!(cli.run.seconds, 30);
            assert_eq!(cli.run.focus, 25);
            assert!(!cli.run.tray);
        }

        #[test]
        fn test_parse_short_verbose_flag() {
            let cli = Cli::parse_from(["panda-pomodoro", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_completions() {
            let cli = Cli::parse_from(["panda-pomodoro", "completions", "bash"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Completions {
                    shell: clap_complete::Shell::Bash
                })
            ));
        }

        #[test]
        fn test_parse_timer_options() {
            let cli = Cli::parse_from([
                "panda-pomodoro",
                "--minutes",
                "10",
                "--seconds",
                "15",
                "--focus",
                "50",
                "--short",
                "10",
                "--long",
                "30",
                "--cycles",
                "2",
                "--no-auto-loop",
                "--extra-beep",
            ]);

            assert_eq!(cli.run.minutes, 10);
            assert_eq!(cli.run.seconds, 15);
            assert_eq!(cli.run.focus, 50);
            assert_eq!(cli.run.short, 10);
            assert_eq!(cli.run.long, 30);
            assert_eq!(cli.run.cycles, 2);
            assert!(cli.run.no_auto_loop);
            assert!(cli.run.extra_beep);
        }

        #[test]
        fn test_seconds_out_of_range() {
            let result = Cli::try_parse_from(["panda-pomodoro", "--seconds", "60"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_zero_focus_rejected() {
            let result = Cli::try_parse_from(["panda-pomodoro", "--focus", "0"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_zero_cycles_rejected() {
            let result = Cli::try_parse_from(["panda-pomodoro", "--cycles", "0"]);
            assert!(result.is_err());
        }
    }

    mod run_args_tests {
        use super::*;

        #[test]
        fn test_default_matches_parser_defaults() {
            let parsed = Cli::parse_from(["panda-pomodoro"]).run;
            assert_eq!(parsed.form_state(), RunArgs::default().form_state());
        }

        #[test]
        fn test_form_state() {
            let args = RunArgs {
                minutes: 5,
                no_auto_loop: true,
                extra_beep: true,
                ..RunArgs::default()
            };

            let form = args.form_state();
            assert_eq!(form.minutes, "5");
            assert_eq!(form.seconds, "30");
            assert!(!form.auto_loop);
            assert!(form.extra_beep);
        }

        #[test]
        fn test_sound_options() {
            let args = RunArgs {
                alert_sound: Some(PathBuf::from("/tmp/ding.wav")),
                mute: true,
                ..RunArgs::default()
            };

            let options = args.sound_options();
            assert_eq!(options.path, Some(PathBuf::from("/tmp/ding.wav")));
            assert!(options.muted);
        }
    }
}
