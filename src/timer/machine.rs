//! Timer state machine.
//!
//! This module provides the countdown logic:
//! - Manual single countdowns
//! - Pomodoro runs (Focus → ShortBreak/LongBreak → Focus ...)
//! - Pause/resume through a single-slot tick registration
//! - Skip, which shares the completion path with natural expiry

use std::time::Duration;

use tracing::{debug, info, warn};

use super::{DisplaySink, Notifier, TimerError};
use crate::scheduler::{TaskHandle, TaskSlot, TickScheduler};
use crate::types::{Phase, PomodoroConfig, SessionSnapshot, TimerSession};

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Scheduler event that drives one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick;

// ============================================================================
// TimerStateMachine
// ============================================================================

/// Owns the timer session and decides every phase transition.
///
/// The scheduler is passed into each operation instead of being held, so the
/// event loop can own it and share it with the animations.
pub struct TimerStateMachine<D, N> {
    /// Current countdown state
    session: TimerSession,
    /// Settings of the current Pomodoro run
    config: Option<PomodoroConfig>,
    /// The one pending countdown tick, if any
    tick: TaskSlot,
    /// Receives remaining-time and phase updates
    display: D,
    /// Fired once per completed countdown
    notifier: N,
}

impl<D: DisplaySink, N: Notifier> TimerStateMachine<D, N> {
    /// Creates a state machine with an idle session.
    pub fn new(display: D, notifier: N) -> Self {
        Self {
            session: TimerSession::new(),
            config: None,
            tick: TaskSlot::new(),
            display,
            notifier,
        }
    }

    /// Returns the current session.
    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    /// Returns a serializable copy of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_session(&self.session)
    }

    /// Returns the settings of the current Pomodoro run.
    pub fn config(&self) -> Option<&PomodoroConfig> {
        self.config.as_ref()
    }

    /// Returns true if a countdown tick is registered.
    pub fn has_pending_tick(&self) -> bool {
        self.tick.is_armed()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Starts a manual countdown of `duration_seconds`.
    ///
    /// # Errors
    ///
    /// - `PomodoroActive` during a Pomodoro run
    /// - `AlreadyRunning` while a countdown is ticking
    /// - `InvalidDuration` for a zero duration
    pub fn start_manual<S>(&mut self, scheduler: &mut S, duration_seconds: u32) -> Result<(), TimerError>
    where
        S: TickScheduler + ?Sized,
        S::Event: From<CountdownTick>,
    {
        if self.session.is_pomodoro_mode {
            return Err(TimerError::PomodoroActive);
        }
        if self.session.running {
            return Err(TimerError::AlreadyRunning);
        }
        if duration_seconds == 0 {
            return Err(TimerError::InvalidDuration(
                "total must be greater than zero".to_string(),
            ));
        }

        self.enter_phase(scheduler, Phase::Manual, duration_seconds);
        Ok(())
    }

    /// Pauses the countdown. Returns false if it was not running.
    pub fn pause<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: TickScheduler + ?Sized,
    {
        if !self.session.running {
            return false;
        }

        self.tick.disarm(scheduler);
        self.session.running = false;
        info!(
            phase = %self.session.phase,
            remaining = self.session.remaining_seconds,
            "countdown paused"
        );
        true
    }

    /// Resumes a paused countdown without touching the remaining time.
    ///
    /// When a Pomodoro run is parked at `Idle` after a non-looping break,
    /// resuming starts its next focus segment. Returns false if there was
    /// nothing to resume.
    pub fn resume<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: TickScheduler + ?Sized,
        S::Event: From<CountdownTick>,
    {
        if self.session.running {
            return false;
        }

        if self.session.phase == Phase::Idle {
            return match self.config {
                Some(config) if self.session.is_pomodoro_mode => {
                    info!(cycle = self.session.current_cycle_count, "continuing Pomodoro run");
                    self.enter_phase(scheduler, Phase::Focus, config.phase_seconds(Phase::Focus));
                    true
                }
                _ => false,
            };
        }

        self.session.running = true;
        self.tick.arm(scheduler, TICK_INTERVAL, CountdownTick.into());
        self.display.show_remaining(self.session.remaining_seconds);
        info!(
            phase = %self.session.phase,
            remaining = self.session.remaining_seconds,
            "countdown resumed"
        );
        true
    }

    /// Cancels everything and returns to an idle manual state.
    pub fn reset<S>(&mut self, scheduler: &mut S)
    where
        S: TickScheduler + ?Sized,
    {
        self.clear(scheduler);
        info!("timer reset");
    }

    /// Starts a Pomodoro run with a validated configuration.
    ///
    /// # Errors
    ///
    /// - `ManualActive` while a manual countdown exists (running or paused)
    /// - `AlreadyRunning` while a Pomodoro phase is ticking
    pub fn start_pomodoro<S>(&mut self, scheduler: &mut S, config: PomodoroConfig) -> Result<(), TimerError>
    where
        S: TickScheduler + ?Sized,
        S::Event: From<CountdownTick>,
    {
        if self.session.phase == Phase::Manual {
            return Err(TimerError::ManualActive);
        }
        if self.session.running {
            return Err(TimerError::AlreadyRunning);
        }

        self.tick.disarm(scheduler);
        self.session.is_pomodoro_mode = true;
        self.session.current_cycle_count = 0;
        self.config = Some(config);

        info!(
            focus = config.focus_minutes(),
            short = config.short_break_minutes(),
            long = config.long_break_minutes(),
            cycles = config.cycles_before_long(),
            auto_loop = config.auto_loop(),
            "Pomodoro run started"
        );
        self.enter_phase(scheduler, Phase::Focus, config.phase_seconds(Phase::Focus));
        Ok(())
    }

    /// Ends the Pomodoro run. Allowed at any time.
    pub fn stop_pomodoro<S>(&mut self, scheduler: &mut S)
    where
        S: TickScheduler + ?Sized,
    {
        self.clear(scheduler);
        info!("Pomodoro run stopped");
    }

    /// Ends the current phase now, exactly as if it had expired.
    ///
    /// Returns false at `Idle`.
    pub fn skip_phase<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: TickScheduler + ?Sized,
        S::Event: From<CountdownTick>,
    {
        if self.session.phase == Phase::Idle {
            return false;
        }

        info!(phase = %self.session.phase, "phase skipped");
        self.tick.disarm(scheduler);
        self.session.remaining_seconds = 0;
        self.complete(scheduler);
        true
    }

    /// Handles a fired countdown tick.
    ///
    /// Ticks whose handle is not the one currently registered are ignored.
    pub fn on_tick<S>(&mut self, scheduler: &mut S, fired: TaskHandle)
    where
        S: TickScheduler + ?Sized,
        S::Event: From<CountdownTick>,
    {
        if !self.tick.fired(fired) {
            debug!(task = fired.id(), "ignoring stale countdown tick");
            return;
        }
        if !self.session.running {
            warn!("countdown tick fired while paused");
            return;
        }

        self.session.remaining_seconds = self.session.remaining_seconds.saturating_sub(1);
        if self.session.remaining_seconds > 0 {
            self.tick.arm(scheduler, TICK_INTERVAL, CountdownTick.into());
            self.display.show_remaining(self.session.remaining_seconds);
        } else {
            self.complete(scheduler);
        }
    }

    /// Completion path shared by natural expiry and skip.
    fn complete<S>(&mut self, scheduler: &mut S)
    where
        S: TickScheduler + ?Sized,
        S::Event: From<CountdownTick>,
    {
        self.session.running = false;
        self.tick.disarm(scheduler);
        self.display.show_remaining(0);

        let finished = self.session.phase;
        info!(phase = %finished, "countdown complete");
        self.notifier.on_countdown_complete(finished);

        self.transition(scheduler, finished);
    }

    /// Picks the phase that follows `finished`.
    fn transition<S>(&mut self, scheduler: &mut S, finished: Phase)
    where
        S: TickScheduler + ?Sized,
        S::Event: From<CountdownTick>,
    {
        let config = match self.config {
            Some(config) if self.session.is_pomodoro_mode => config,
            _ => {
                // Manual countdown finished
                self.set_idle();
                return;
            }
        };

        match finished {
            Phase::Focus => {
                self.session.current_cycle_count += 1;
                let next = config.break_after(self.session.current_cycle_count);
                debug!(
                    cycle = self.session.current_cycle_count,
                    next = %next,
                    "focus segment complete"
                );
                self.enter_phase(scheduler, next, config.phase_seconds(next));
            }
            Phase::ShortBreak | Phase::LongBreak => {
                if config.auto_loop() {
                    self.enter_phase(scheduler, Phase::Focus, config.phase_seconds(Phase::Focus));
                } else {
                    // Parked: the run stays active until stopped or resumed
                    self.set_idle();
                }
            }
            Phase::Idle | Phase::Manual => self.set_idle(),
        }
    }

    fn enter_phase<S>(&mut self, scheduler: &mut S, phase: Phase, seconds: u32)
    where
        S: TickScheduler + ?Sized,
        S::Event: From<CountdownTick>,
    {
        self.session.phase = phase;
        self.session.remaining_seconds = seconds;
        self.session.running = true;
        self.tick.arm(scheduler, TICK_INTERVAL, CountdownTick.into());

        self.display.show_phase(phase);
        self.display.show_remaining(seconds);
        info!(phase = %phase, seconds, "phase started");
    }

    fn set_idle(&mut self) {
        self.session.running = false;
        self.session.phase = Phase::Idle;
        self.display.show_phase(Phase::Idle);
    }

    fn clear<S>(&mut self, scheduler: &mut S)
    where
        S: TickScheduler + ?Sized,
    {
        self.tick.disarm(scheduler);
        self.session.is_pomodoro_mode = false;
        self.session.phase = Phase::Idle;
        self.session.remaining_seconds = 0;
        self.session.running = false;
        self.config = None;

        self.display.show_phase(Phase::Idle);
        self.display.show_remaining(0);
    }
}

impl<D, N> std::fmt::Debug for TimerStateMachine<D, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerStateMachine")
            .field("session", &self.session)
            .field("config", &self.config)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
