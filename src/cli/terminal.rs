//! Terminal output.
//!
//! On a terminal the status line is redrawn in place on every display
//! update and animation frame, followed by the text being typed:
//!
//! ```text
//! (o.o) Focus 24:59  [*  TIME'S UP  *] > set fo
//! ```
//!
//! Messages are printed on their own line above it. When the output is not
//! a terminal nothing is redrawn; the clock is printed as a plain line each
//! time the remaining time or the phase changes.

use std::io::Write;

use crossterm::cursor::MoveToColumn;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use tracing::debug;

use crate::timer::DisplaySink;
use crate::types::{format_clock, Phase};

/// How the display writes to its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Raw-mode terminal: status line redrawn in place with the input line
    Interactive,
    /// Pipe or file: plain lines, no control sequences
    Plain,
}

/// Display sink that draws a single status line.
#[derive(Debug)]
pub struct TerminalDisplay<W: Write> {
    out: W,
    mode: DisplayMode,
    remaining: u32,
    phase: Phase,
    mascot: Option<&'static str>,
    banner: Option<&'static str>,
    input: String,
    /// Last clock line printed in plain mode
    last_plain: Option<String>,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, mode: DisplayMode) -> Self {
        Self {
            out,
            mode,
            remaining: 0,
            phase: Phase::Idle,
            mascot: None,
            banner: None,
            input: String::new(),
            last_plain: None,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Sets the mascot frame. `None` hides the mascot.
    pub fn set_mascot(&mut self, frame: Option<&'static str>) {
        self.mascot = frame;
        self.redraw();
    }

    /// Sets the popup banner frame. `None` closes it.
    pub fn set_banner(&mut self, frame: Option<&'static str>) {
        self.banner = frame;
        self.redraw();
    }

    pub fn banner(&self) -> Option<&'static str> {
        self.banner
    }

    /// Sets the text shown after the prompt.
    pub fn set_input(&mut self, input: &str) {
        if self.input != input {
            self.input.clear();
            self.input.push_str(input);
            self.redraw();
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Shows the idle duration without changing the phase.
    pub fn preview(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.render();
    }

    /// Prints `message` above the status line.
    pub fn notice(&mut self, message: &str) {
        match self.mode {
            DisplayMode::Interactive => {
                let mut result = queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine));
                // Raw mode does not return the carriage on a line feed
                for line in message.lines() {
                    result = result.and_then(|()| queue!(self.out, Print(line), Print("\r\n")));
                }
                self.report(result);
                self.render();
            }
            DisplayMode::Plain => {
                let result = writeln!(self.out, "{}", message).and_then(|()| self.out.flush());
                self.report(result);
            }
        }
    }

    /// Returns the status line text.
    pub fn status_line(&self) -> String {
        let mut line = String::new();
        if let Some(mascot) = self.mascot {
            line.push_str(mascot);
            line.push(' ');
        }
        line.push_str(&self.clock_line());
        if let Some(banner) = self.banner {
            line.push_str("  [");
            line.push_str(banner);
            line.push(']');
        }
        line
    }

    fn clock_line(&self) -> String {
        format!("{} {}", self.phase, format_clock(self.remaining))
    }

    /// Draws the current state.
    ///
    /// Interactive: redraws the status and input line in place. Plain:
    /// prints the clock line if it changed since the last one.
    pub fn render(&mut self) {
        match self.mode {
            DisplayMode::Interactive => self.redraw(),
            DisplayMode::Plain => {
                let line = self.clock_line();
                if self.last_plain.as_deref() == Some(line.as_str()) {
                    return;
                }
                let result = writeln!(self.out, "{}", line).and_then(|()| self.out.flush());
                self.report(result);
                self.last_plain = Some(line);
            }
        }
    }

    /// Redraws the status line in place. Does nothing in plain mode.
    fn redraw(&mut self) {
        if self.mode != DisplayMode::Interactive {
            return;
        }
        let line = self.status_line();
        let result = queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(line),
            Print(" > "),
            Print(&self.input)
        )
        .and_then(|()| self.out.flush());
        self.report(result);
    }

    /// Moves past the status line before exit.
    pub fn finish(&mut self) {
        let result = match self.mode {
            DisplayMode::Interactive => queue!(self.out, Print("\r\n")),
            DisplayMode::Plain => Ok(()),
        }
        .and_then(|()| self.out.flush());
        self.report(result);
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn report(&self, result: std::io::Result<()>) {
        if let Err(e) = result {
            debug!(error = %e, "terminal write failed");
        }
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn show_remaining(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.render();
    }

    fn show_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.render();
    }
}
