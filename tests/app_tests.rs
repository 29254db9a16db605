//! Integration tests for the application loop without a terminal.
//!
//! The app writes to an in-memory buffer and plays alerts through
//! `MockAlertPlayer`; time is advanced explicitly with `advance_to`.

use std::time::Duration;

use panda_pomodoro::app::{App, AppOptions};
use panda_pomodoro::cli::FormState;
use panda_pomodoro::menubar::TrayAction;
use panda_pomodoro::sound::MockAlertPlayer;
use panda_pomodoro::types::Phase;

// ============================================================================
// Test Helpers
// ============================================================================

fn create_app() -> (App<Vec<u8>>, MockAlertPlayer) {
    let mock = MockAlertPlayer::new();
    let options = AppOptions {
        form: FormState::default(),
        mascot: false,
        tray: false,
        interactive: false,
    };
    let mut app = App::new(Vec::new(), Box::new(mock.clone()), options);
    app.start();
    (app, mock)
}

fn output(app: &App<Vec<u8>>) -> String {
    String::from_utf8_lossy(app.display().get_ref()).into_owned()
}

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

// ============================================================================
// Prompt Flows
// ============================================================================

#[test]
fn manual_countdown_from_form() {
    let (mut app, mock) = create_app();
    app.handle_line("set minutes 1");
    app.handle_line("set seconds 0");

    app.handle_line("start");
    app.advance_to(Duration::from_secs(59));
    assert_eq!(app.session().remaining_seconds, 1);
    assert_eq!(mock.play_count(), 0);

    app.advance_to(Duration::from_secs(60));
    assert_eq!(app.session().phase, Phase::Idle);
    assert_eq!(mock.play_count(), 1);
    assert!(app.is_popup_open());
    assert!(output(&app).contains("Manual finished"));

    app.handle_line("close");
    assert!(!app.is_popup_open());
    assert_eq!(mock.stop_count(), 1);
}

#[test]
fn pomodoro_run_without_auto_loop() {
    let (mut app, mock) = create_app();
    for line in ["set focus 1", "set short 1", "set long 2", "set cycles 2", "set loop off"] {
        app.handle_line(line);
    }

    app.handle_line("pomo");
    app.advance_to(minutes(2));

    // Focus and short break done, run parked
    assert_eq!(mock.play_count(), 2);
    assert_eq!(app.session().phase, Phase::Idle);
    assert!(app.session().is_pomodoro_mode);
    assert_eq!(app.session().current_cycle_count, 1);

    app.handle_line("resume");
    assert_eq!(app.session().phase, Phase::Focus);
    app.advance_to(minutes(3));
    assert_eq!(app.session().phase, Phase::LongBreak);
    assert_eq!(app.session().remaining_seconds, 120);

    app.handle_line("stop");
    assert!(!app.session().is_pomodoro_mode);
    assert_eq!(app.scheduler().pending(), 1); // popup animation only
}

#[test]
fn form_errors_never_reach_the_timer() {
    let (mut app, _) = create_app();

    app.handle_line("set minutes abc");
    app.handle_line("start");
    app.handle_line("set focus -3");
    app.handle_line("pomo");

    assert_eq!(app.session().phase, Phase::Idle);
    assert_eq!(app.scheduler().pending(), 0);
    let out = output(&app);
    assert!(out.contains("minutes must be a whole number"));
    assert!(out.contains("invalid Pomodoro setting 'focus'"));
}

#[test]
fn failing_player_still_completes() {
    let (mut app, mock) = create_app();
    mock.set_should_fail(true);

    app.handle_line("start");
    app.advance_to(Duration::from_secs(30));

    assert_eq!(app.session().phase, Phase::Idle);
    assert!(app.is_popup_open());
}

// ============================================================================
// Tray Actions
// ============================================================================

#[test]
fn tray_actions_from_another_thread() {
    let (mut app, _) = create_app();
    let sender = app.tray_sender();

    let worker = std::thread::spawn(move || {
        sender.send(TrayAction::StartPomodoro).unwrap();
        sender.send(TrayAction::PauseResume).unwrap();
    });
    worker.join().unwrap();

    // Nothing happens until the loop drains the channel
    assert_eq!(app.session().phase, Phase::Idle);

    assert_eq!(app.drain_tray_actions(), 2);
    assert_eq!(app.session().phase, Phase::Focus);
    assert!(!app.session().running);
    assert_eq!(app.drain_tray_actions(), 0);
}

#[test]
fn shutdown_leaves_nothing_scheduled() {
    let (mut app, mock) = create_app();
    app.handle_line("pomo");
    app.handle_line("skip");

    app.shutdown();

    assert_eq!(app.scheduler().pending(), 0);
    assert!(!mock.is_playing());
    assert_eq!(app.session().phase, Phase::Idle);
}
