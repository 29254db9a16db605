//! Application event loop.
//!
//! `App` owns the scheduler and everything registered on it: the state
//! machine, the mascot and popup animations. Commands from the prompt and
//! actions from the tray are thin dispatchers onto the state machine.
//!
//! All state is touched from one thread. The tray and the notifier only
//! send messages; the loop drains them after every dispatch.
//!
//! On a terminal the loop reads keys in raw mode and owns the prompt line;
//! otherwise it reads whole lines from stdin.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use crossterm::event::{Event, EventStream, KeyEvent};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::alert::{popup_channel, AlertNotifier, PopupRequest};
use crate::animation::{AnimationFrame, AnimationKind, FrameAnimation};
use crate::cli::{
    Command, DisplayMode, EditorAction, FormField, FormState, LineEditor, TerminalDisplay,
    HELP_TEXT,
};
use crate::menubar::{tray_channel, TrayAction, TrayIconManager};
use crate::scheduler::{CooperativeScheduler, TaskHandle};
use crate::sound::AlertPlayer;
use crate::timer::{CountdownTick, Notifier, TimerError, TimerStateMachine};
use crate::types::{format_clock, Phase, SessionSnapshot, TimerSession};

/// How often tray actions are polled while no task is due.
pub const TRAY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound on one sleep when nothing is scheduled.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

// ============================================================================
// AppEvent
// ============================================================================

/// Everything the scheduler can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Countdown(CountdownTick),
    Frame(AnimationFrame),
}

impl From<CountdownTick> for AppEvent {
    fn from(tick: CountdownTick) -> Self {
        AppEvent::Countdown(tick)
    }
}

impl From<AnimationFrame> for AppEvent {
    fn from(frame: AnimationFrame) -> Self {
        AppEvent::Frame(frame)
    }
}

// ============================================================================
// AppOptions
// ============================================================================

/// Front-end settings taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOptions {
    /// Initial form contents
    pub form: FormState,
    /// Animate the panda mascot
    pub mascot: bool,
    /// Show the menu bar icon
    pub tray: bool,
    /// stdin and stdout are a terminal: read keys and redraw in place
    pub interactive: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            form: FormState::default(),
            mascot: true,
            tray: false,
            interactive: false,
        }
    }
}

// ============================================================================
// App
// ============================================================================

type Machine<W> = TimerStateMachine<TerminalDisplay<W>, AlertNotifier>;

/// The running application.
pub struct App<W: Write> {
    scheduler: CooperativeScheduler<AppEvent>,
    machine: Machine<W>,
    mascot: FrameAnimation,
    mascot_enabled: bool,
    popup: FrameAnimation,
    form: FormState,
    editor: LineEditor,
    interactive: bool,
    popup_rx: Receiver<PopupRequest>,
    tray: Option<TrayIconManager>,
    tray_tx: Sender<TrayAction>,
    tray_rx: Receiver<TrayAction>,
    quit: bool,
}

impl<W: Write> App<W> {
    /// Creates the application. Nothing is drawn or scheduled until [`App::start`].
    pub fn new(out: W, player: Box<dyn AlertPlayer>, options: AppOptions) -> Self {
        let (popup_tx, popup_rx) = popup_channel();
        let mut notifier = AlertNotifier::new(player, popup_tx);
        notifier.set_extra_beep(options.form.extra_beep);

        let (tray_tx, tray_rx) = tray_channel();
        let tray = options.tray.then(|| TrayIconManager::new(tray_tx.clone()));

        let mode = if options.interactive {
            DisplayMode::Interactive
        } else {
            DisplayMode::Plain
        };

        Self {
            scheduler: CooperativeScheduler::new(),
            machine: TimerStateMachine::new(TerminalDisplay::new(out, mode), notifier),
            mascot: FrameAnimation::mascot(),
            mascot_enabled: options.mascot,
            popup: FrameAnimation::popup(),
            form: options.form,
            editor: LineEditor::new(),
            interactive: options.interactive,
            popup_rx,
            tray,
            tray_tx,
            tray_rx,
            quit: false,
        }
    }

    /// Initializes the tray, starts the mascot and draws the idle screen.
    pub fn start(&mut self) {
        if let Some(tray) = self.tray.as_mut() {
            if let Err(e) = tray.initialize(self.machine.session()) {
                warn!(error = %e, "continuing without the menu bar icon");
                self.tray = None;
            }
        }

        if self.mascot_enabled {
            let frame = self.mascot.start(&mut self.scheduler);
            self.machine.display_mut().set_mascot(frame);
        }

        info!(backend = self.machine.notifier().backend().as_str(), "timer ready");
        self.machine.display_mut().notice("type `help` for commands");
        self.preview_form();
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn session(&self) -> &TimerSession {
        self.machine.session()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn scheduler(&self) -> &CooperativeScheduler<AppEvent> {
        &self.scheduler
    }

    pub fn display(&self) -> &TerminalDisplay<W> {
        self.machine.display()
    }

    pub fn is_popup_open(&self) -> bool {
        self.popup.is_running()
    }

    pub fn is_mascot_running(&self) -> bool {
        self.mascot.is_running()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Sender for tray actions. Sent actions take effect at the next drain.
    pub fn tray_sender(&self) -> Sender<TrayAction> {
        self.tray_tx.clone()
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Applies one key press to the prompt line.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.editor.handle_key(key) {
            EditorAction::Edited => self.machine.display_mut().set_input(self.editor.buffer()),
            EditorAction::Submit(line) => {
                let display = self.machine.display_mut();
                display.set_input("");
                display.notice(&format!("> {}", line));
                self.handle_line(&line);
            }
            EditorAction::Interrupt => {
                info!("interrupted");
                self.quit = true;
            }
            EditorAction::Ignored => {}
        }
    }

    /// Parses and executes one prompt line.
    pub fn handle_line(&mut self, line: &str) {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(e) => self.machine.display_mut().notice(&e.to_string()),
        }
    }

    /// Executes a command.
    pub fn execute(&mut self, command: Command) {
        debug!(?command, "executing command");
        match command {
            Command::Start => self.start_manual(),
            Command::Pause => {
                if !self.machine.pause(&mut self.scheduler) {
                    self.notice("nothing to pause");
                }
            }
            Command::Resume => {
                if !self.machine.resume(&mut self.scheduler) {
                    self.notice("nothing to resume");
                }
            }
            Command::Toggle => self.toggle(),
            Command::Reset => {
                self.machine.reset(&mut self.scheduler);
                self.preview_form();
            }
            Command::Pomodoro => {
                let result = self
                    .form
                    .pomodoro_config()
                    .and_then(|config| self.machine.start_pomodoro(&mut self.scheduler, config));
                self.report(result);
            }
            Command::Skip => {
                if !self.machine.skip_phase(&mut self.scheduler) {
                    self.notice("nothing to skip");
                }
            }
            Command::Stop => self.machine.stop_pomodoro(&mut self.scheduler),
            Command::Close => self.close_popup(),
            Command::Status { json } => self.print_status(json),
            Command::Show => self.print_form(),
            Command::Set { field, value } => self.set_field(field, &value),
            Command::Help => self.notice(HELP_TEXT),
            Command::Quit => self.quit = true,
        }
        self.sync();
    }

    /// Applies one tray action.
    pub fn handle_tray_action(&mut self, action: TrayAction) {
        info!(action = %action, "menu bar action");
        match action {
            TrayAction::StartPomodoro => self.execute(Command::Pomodoro),
            TrayAction::PauseResume => self.execute(Command::Toggle),
            TrayAction::StopPomodoro => self.execute(Command::Stop),
            TrayAction::Quit => self.quit = true,
        }
    }

    /// Applies every queued tray action. Returns how many were applied.
    pub fn drain_tray_actions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.tray_rx.try_recv() {
            self.handle_tray_action(action);
            applied += 1;
        }
        applied
    }

    // ------------------------------------------------------------------------
    // Scheduling
    // ------------------------------------------------------------------------

    /// Fires every task due at or before `elapsed` since start.
    ///
    /// Returns the number of tasks fired.
    pub fn advance_to(&mut self, elapsed: Duration) -> usize {
        let mut fired = 0;
        while let Some((handle, event)) = self.scheduler.step(elapsed) {
            self.dispatch(handle, event);
            fired += 1;
        }
        fired
    }

    /// Time to wait from `elapsed` until the loop should wake up.
    pub fn wait_time(&self, elapsed: Duration) -> Duration {
        let until_due = self
            .scheduler
            .next_deadline()
            .map_or(IDLE_WAIT, |due| due.saturating_sub(elapsed));
        if self.tray.is_some() {
            until_due.min(TRAY_POLL_INTERVAL)
        } else {
            until_due
        }
    }

    fn dispatch(&mut self, handle: TaskHandle, event: AppEvent) {
        match event {
            AppEvent::Countdown(_) => self.machine.on_tick(&mut self.scheduler, handle),
            AppEvent::Frame(AnimationFrame {
                kind: AnimationKind::Mascot,
            }) => {
                if let Some(frame) = self.mascot.advance(&mut self.scheduler, handle) {
                    self.machine.display_mut().set_mascot(Some(frame));
                }
            }
            AppEvent::Frame(AnimationFrame {
                kind: AnimationKind::Popup,
            }) => {
                if let Some(frame) = self.popup.advance(&mut self.scheduler, handle) {
                    self.machine.display_mut().set_banner(Some(frame));
                }
            }
        }
        self.sync();
    }

    /// Opens requested popups and mirrors the session to the tray.
    fn sync(&mut self) {
        while let Ok(request) = self.popup_rx.try_recv() {
            self.open_popup(request);
        }
        if let Some(tray) = self.tray.as_mut() {
            tray.refresh(self.machine.session());
        }
    }

    // ------------------------------------------------------------------------
    // Popup
    // ------------------------------------------------------------------------

    fn open_popup(&mut self, request: PopupRequest) {
        debug!(finished = %request.finished, "opening popup");
        let frame = self.popup.start(&mut self.scheduler);
        let display = self.machine.display_mut();
        display.set_banner(frame);
        display.notice(&format!(
            "{} finished. Type `close` to dismiss.",
            request.finished
        ));
    }

    /// Closes the popup and stops the alert.
    pub fn close_popup(&mut self) {
        self.machine.notifier_mut().stop_audio();
        if self.popup.stop(&mut self.scheduler) {
            self.machine.display_mut().set_banner(None);
            debug!("popup closed");
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    fn start_manual(&mut self) {
        let session = self.machine.session();
        let paused_manual = session.phase == Phase::Manual && !session.running;
        if paused_manual {
            self.machine.resume(&mut self.scheduler);
            return;
        }

        let result = self
            .form
            .manual_duration()
            .and_then(|seconds| self.machine.start_manual(&mut self.scheduler, seconds));
        self.report(result);
    }

    fn toggle(&mut self) {
        let session = self.machine.session();
        let (running, pomodoro) = (session.running, session.is_pomodoro_mode);
        if running {
            self.machine.pause(&mut self.scheduler);
        } else if pomodoro {
            self.machine.resume(&mut self.scheduler);
        } else {
            self.start_manual();
        }
    }

    fn set_field(&mut self, field: FormField, value: &str) {
        if let Err(e) = self.form.set(field, value) {
            self.notice(&e.to_string());
            return;
        }
        if field == FormField::ExtraBeep {
            self.machine.notifier_mut().set_extra_beep(self.form.extra_beep);
        }
        self.notice(&format!("{} = {}", field, self.form.get(field)));

        let session = self.machine.session();
        let idle = session.phase == Phase::Idle && !session.is_pomodoro_mode;
        if idle {
            self.preview_form();
        }
    }

    fn print_status(&mut self, json: bool) {
        let snapshot = self.machine.snapshot();
        if json {
            match serde_json::to_string(&snapshot) {
                Ok(text) => self.notice(&text),
                Err(e) => warn!(error = %e, "failed to serialize status"),
            }
        } else {
            let text = describe(&snapshot);
            self.notice(&text);
        }
    }

    fn print_form(&mut self) {
        let text: Vec<String> = FormField::ALL
            .iter()
            .map(|field| format!("  {:<10} {}", field.as_str(), self.form.get(*field)))
            .collect();
        self.notice(&text.join("\n"));
    }

    fn preview_form(&mut self) {
        let seconds = self.form.preview_seconds();
        self.machine.display_mut().preview(seconds);
    }

    fn report(&mut self, result: Result<(), TimerError>) {
        if let Err(e) = result {
            debug!(error = %e, "command rejected");
            self.notice(&format!("{} ({})", e, e.suggestion()));
        }
    }

    fn notice(&mut self, message: &str) {
        self.machine.display_mut().notice(message);
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Cancels every task, stops audio and removes the tray icon.
    pub fn shutdown(&mut self) {
        self.machine.reset(&mut self.scheduler);
        self.mascot.stop(&mut self.scheduler);
        self.close_popup();
        if let Some(tray) = self.tray.as_mut() {
            tray.shutdown();
        }
        self.machine.display_mut().finish();
        info!("shut down");
    }

    /// Runs the event loop until `quit`, Ctrl-C or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input, raw mode or the Ctrl-C handler
    /// fails. The app is shut down either way.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let clock = Instant::now();

        let _raw_mode = if self.interactive {
            Some(RawModeGuard::enable()?)
        } else {
            None
        };

        self.start();
        let result = if self.interactive {
            self.read_keys(clock).await
        } else {
            self.read_lines(clock).await
        };
        self.shutdown();
        result
    }

    async fn read_keys(&mut self, clock: Instant) -> anyhow::Result<()> {
        let mut events = EventStream::new();

        while !self.quit {
            let wait = self.wait_time(clock.elapsed());
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                event = events.next() => {
                    self.advance_to(clock.elapsed());
                    match event {
                        Some(Ok(Event::Key(key))) => self.handle_key(key),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e).context("failed to read terminal input"),
                        None => {
                            debug!("terminal input closed");
                            self.quit = true;
                        }
                    }
                }
                signal = tokio::signal::ctrl_c() => {
                    signal.context("failed to listen for Ctrl-C")?;
                    info!("interrupted");
                    self.quit = true;
                }
            }
            self.advance_to(clock.elapsed());
            self.drain_tray_actions();
        }
        Ok(())
    }

    async fn read_lines(&mut self, clock: Instant) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while !self.quit {
            let wait = self.wait_time(clock.elapsed());
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                line = lines.next_line() => {
                    self.advance_to(clock.elapsed());
                    match line.context("failed to read from stdin")? {
                        Some(line) => self.handle_line(&line),
                        None => {
                            debug!("stdin closed");
                            self.quit = true;
                        }
                    }
                }
                signal = tokio::signal::ctrl_c() => {
                    signal.context("failed to listen for Ctrl-C")?;
                    info!("interrupted");
                    self.quit = true;
                }
            }
            self.advance_to(clock.elapsed());
            self.drain_tray_actions();
        }
        Ok(())
    }
}

/// Keeps the terminal in raw mode while alive.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> anyhow::Result<Self> {
        crossterm::terminal::enable_raw_mode().context("failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = crossterm::terminal::disable_raw_mode() {
            warn!(error = %e, "failed to restore the terminal");
        }
    }
}

impl<W: Write> std::fmt::Debug for App<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session", self.machine.session())
            .field("pending", &self.scheduler.pending())
            .field("popup_open", &self.popup.is_running())
            .field("tray", &self.tray.is_some())
            .finish_non_exhaustive()
    }
}

/// One-line human readable status.
fn describe(snapshot: &SessionSnapshot) -> String {
    let state = if snapshot.running {
        "running"
    } else if snapshot.phase == Phase::Idle {
        "idle"
    } else {
        "paused"
    };

    let mut text = format!(
        "{} {} ({})",
        snapshot.phase,
        format_clock(snapshot.remaining_seconds),
        state
    );
    if snapshot.pomodoro_mode {
        text.push_str(&format!(", pomodoro cycle {}", snapshot.cycle_count));
    }
    text
}

// ============================================================================
// Tests
// ============================================================================
