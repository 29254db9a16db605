//! Interactive prompt commands.

use std::str::FromStr;

use thiserror::Error;

use super::input::{FormError, FormField};

/// A command typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a manual countdown from the form (or resume a paused one)
    Start,
    Pause,
    Resume,
    /// Pause if running, otherwise resume or start
    Toggle,
    Reset,
    /// Start a Pomodoro run from the form
    Pomodoro,
    Skip,
    /// Stop the Pomodoro run
    Stop,
    /// Close the end-of-timer popup
    Close,
    Status { json: bool },
    /// Show the form
    Show,
    Set { field: FormField, value: String },
    Help,
    Quit,
}

/// Errors from parsing a prompt line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Form(#[from] FormError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            // Empty line behaves like the space bar
            return Ok(Command::Toggle);
        };
        let rest: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "toggle" | "t" => Command::Toggle,
            "reset" => Command::Reset,
            "pomo" | "pomodoro" => Command::Pomodoro,
            "skip" => Command::Skip,
            "stop" => Command::Stop,
            "close" | "dismiss" => Command::Close,
            "status" => match rest.as_slice() {
                [] => Command::Status { json: false },
                ["--json"] | ["json"] => Command::Status { json: true },
                _ => return Err(CommandError::Usage("status [--json]")),
            },
            "show" | "form" => Command::Show,
            "set" => match rest.as_slice() {
                [field, value @ ..] if !value.is_empty() => Command::Set {
                    field: field.parse()?,
                    value: value.join(" "),
                },
                _ => return Err(CommandError::Usage("set <field> <value>")),
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };
        Ok(command)
    }
}

/// Text printed by `help`.
pub const HELP_TEXT: &str = "\
commands:
  start              start a countdown from minutes/seconds (resumes a paused one)
  pause | resume     pause or resume the countdown
  toggle | <enter>   pause if running, otherwise resume/start
  reset              cancel the countdown and leave Pomodoro mode
  pomo               start a Pomodoro run from focus/short/long/cycles
  skip               end the current phase now
  stop               stop the Pomodoro run
  close              close the time's-up popup and stop the alert
  status [--json]    print the session
  show               print the form
  set <field> <v>    edit the form: minutes seconds focus short long cycles auto-loop extra-beep
  help               this text
  quit               exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("start".parse(), Ok(Command::Start));
        assert_eq!("pause".parse(), Ok(Command::Pause));
        assert_eq!("resume".parse(), Ok(Command::Resume));
        assert_eq!("reset".parse(), Ok(Command::Reset));
        assert_eq!("pomo".parse(), Ok(Command::Pomodoro));
        assert_eq!("skip".parse(), Ok(Command::Skip));
        assert_eq!("stop".parse(), Ok(Command::Stop));
        assert_eq!("close".parse(), Ok(Command::Close));
        assert_eq!("help".parse(), Ok(Command::Help));
        assert_eq!("quit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!("  START  ".parse(), Ok(Command::Start));
    }

    #[test]
    fn test_empty_line_toggles() {
        assert_eq!("".parse(), Ok(Command::Toggle));
        assert_eq!("   ".parse(), Ok(Command::Toggle));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("status".parse(), Ok(Command::Status { json: false }));
        assert_eq!("status --json".parse(), Ok(Command::Status { json: true }));
        assert_eq!(
            "status yaml".parse::<Command>(),
            Err(CommandError::Usage("status [--json]"))
        );
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            "set focus 50".parse(),
            Ok(Command::Set {
                field: FormField::Focus,
                value: "50".to_string()
            })
        );
        assert_eq!(
            "set auto-loop off".parse(),
            Ok(Command::Set {
                field: FormField::AutoLoop,
                value: "off".to_string()
            })
        );
    }

    #[test]
    fn test_parse_set_errors() {
        assert!(matches!(
            "set focus".parse::<Command>(),
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            "set hours 2".parse::<Command>(),
            Err(CommandError::Form(FormError::UnknownField(_)))
        ));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "launch".parse::<Command>().unwrap_err();
        assert_eq!(err, CommandError::Unknown("launch".to_string()));
        assert!(err.to_string().contains("help"));
    }
}
