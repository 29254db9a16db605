//! Form state and raw-text validation.
//!
//! The form keeps the text the user typed, like entry widgets would.
//! Values are parsed only when a countdown starts, so a bad entry is
//! reported at that point and never reaches the state machine.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::timer::TimerError;
use crate::types::PomodoroConfig;

// ============================================================================
// FormField
// ============================================================================

/// A settable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Minutes,
    Seconds,
    Focus,
    Short,
    Long,
    Cycles,
    AutoLoop,
    ExtraBeep,
}

impl FormField {
    /// All fields, in display order.
    pub const ALL: [FormField; 8] = [
        FormField::Minutes,
        FormField::Seconds,
        FormField::Focus,
        FormField::Short,
        FormField::Long,
        FormField::Cycles,
        FormField::AutoLoop,
        FormField::ExtraBeep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Minutes => "minutes",
            FormField::Seconds => "seconds",
            FormField::Focus => "focus",
            FormField::Short => "short",
            FormField::Long => "long",
            FormField::Cycles => "cycles",
            FormField::AutoLoop => "auto-loop",
            FormField::ExtraBeep => "extra-beep",
        }
    }

    /// Returns true for on/off switches.
    pub fn is_switch(&self) -> bool {
        matches!(self, FormField::AutoLoop | FormField::ExtraBeep)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        let field = match lowered.as_str() {
            "minutes" | "min" | "m" => FormField::Minutes,
            "seconds" | "sec" | "s" => FormField::Seconds,
            "focus" => FormField::Focus,
            "short" => FormField::Short,
            "long" => FormField::Long,
            "cycles" => FormField::Cycles,
            "auto-loop" | "autoloop" | "loop" => FormField::AutoLoop,
            "extra-beep" | "beep" => FormField::ExtraBeep,
            _ => return Err(FormError::UnknownField(s.to_string())),
        };
        Ok(field)
    }
}

/// Errors from editing the form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field '{0}' (fields: minutes, seconds, focus, short, long, cycles, auto-loop, extra-beep)")]
    UnknownField(String),

    #[error("'{field}' expects on or off, got '{value}'")]
    InvalidSwitch { field: FormField, value: String },
}

// ============================================================================
// FormState
// ============================================================================

/// Current form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub minutes: String,
    pub seconds: String,
    pub focus: String,
    pub short: String,
    pub long: String,
    pub cycles: String,
    pub auto_loop: bool,
    pub extra_beep: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            minutes: "0".to_string(),
            seconds: "30".to_string(),
            focus: "25".to_string(),
            short: "5".to_string(),
            long: "15".to_string(),
            cycles: "4".to_string(),
            auto_loop: true,
            extra_beep: false,
        }
    }
}

impl FormState {
    /// Stores `value` in `field`.
    ///
    /// Text fields accept anything; switches must be on/off.
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        let value = value.trim();
        match field {
            FormField::Minutes => self.minutes = value.to_string(),
            FormField::Seconds => self.seconds = value.to_string(),
            FormField::Focus => self.focus = value.to_string(),
            FormField::Short => self.short = value.to_string(),
            FormField::Long => self.long = value.to_string(),
            FormField::Cycles => self.cycles = value.to_string(),
            FormField::AutoLoop => self.auto_loop = parse_switch(field, value)?,
            FormField::ExtraBeep => self.extra_beep = parse_switch(field, value)?,
        }
        Ok(())
    }

    /// Returns the text of `field`.
    pub fn get(&self, field: FormField) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" }.to_string();
        match field {
            FormField::Minutes => self.minutes.clone(),
            FormField::Seconds => self.seconds.clone(),
            FormField::Focus => self.focus.clone(),
            FormField::Short => self.short.clone(),
            FormField::Long => self.long.clone(),
            FormField::Cycles => self.cycles.clone(),
            FormField::AutoLoop => on_off(self.auto_loop),
            FormField::ExtraBeep => on_off(self.extra_beep),
        }
    }

    /// Parses the manual countdown length in seconds.
    pub fn manual_duration(&self) -> Result<u32, TimerError> {
        parse_manual_duration(&self.minutes, &self.seconds)
    }

    /// Parses the Pomodoro settings.
    pub fn pomodoro_config(&self) -> Result<PomodoroConfig, TimerError> {
        PomodoroConfig::new(
            parse_pomodoro_field("focus", &self.focus)?,
            parse_pomodoro_field("short", &self.short)?,
            parse_pomodoro_field("long", &self.long)?,
            parse_pomodoro_field("cycles", &self.cycles)?,
            self.auto_loop,
        )
    }

    /// Returns the duration shown while idle, or 0 if the form is invalid.
    pub fn preview_seconds(&self) -> u32 {
        self.manual_duration().unwrap_or(0)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses minute and second entries into a total number of seconds.
///
/// Blank entries count as 0. Seconds must be 0-59 and the total must be
/// greater than zero.
pub fn parse_manual_duration(minutes: &str, seconds: &str) -> Result<u32, TimerError> {
    let minutes = parse_entry(minutes, "minutes")?;
    let seconds = parse_entry(seconds, "seconds")?;

    if seconds >= 60 {
        return Err(TimerError::InvalidDuration(format!(
            "seconds must be 0-59, got {}",
            seconds
        )));
    }

    let total = minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or_else(|| TimerError::InvalidDuration("duration is too long".to_string()))?;

    if total == 0 {
        return Err(TimerError::InvalidDuration(
            "total must be greater than zero".to_string(),
        ));
    }
    Ok(total)
}

fn parse_entry(raw: &str, name: &str) -> Result<u32, TimerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u32>().map_err(|_| {
        TimerError::InvalidDuration(format!("{} must be a whole number, got '{}'", name, raw))
    })
}

/// Parses one Pomodoro entry. The value must be a whole number of at least 1.
pub fn parse_pomodoro_field(field: &'static str, raw: &str) -> Result<u32, TimerError> {
    let raw = raw.trim();
    let value: i64 = raw.parse().map_err(|_| TimerError::InvalidPomodoroConfig {
        field,
        reason: format!("'{}' is not a whole number", raw),
    })?;

    if value < 1 {
        return Err(TimerError::InvalidPomodoroConfig {
            field,
            reason: "must be at least 1".to_string(),
        });
    }
    u32::try_from(value).map_err(|_| TimerError::InvalidPomodoroConfig {
        field,
        reason: "is too large".to_string(),
    })
}

fn parse_switch(field: FormField, value: &str) -> Result<bool, FormError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(FormError::InvalidSwitch {
            field,
            value: value.to_string(),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
