//! Integration tests for the countdown state machine on the cooperative
//! scheduler.
//!
//! These tests drive whole runs through the public API:
//! - Manual countdown to completion
//! - Pause and resume keeping the remaining time
//! - Full Pomodoro cycles with short and long breaks
//! - Non-looping runs parking between breaks and focus

use std::time::Duration;

use panda_pomodoro::scheduler::{CooperativeScheduler, TickScheduler};
use panda_pomodoro::timer::{CountdownTick, MockNotifier, RecordingDisplay, TimerStateMachine};
use panda_pomodoro::types::{Phase, PomodoroConfig};

type Machine = TimerStateMachine<RecordingDisplay, MockNotifier>;
type Scheduler = CooperativeScheduler<CountdownTick>;

// ============================================================================
// Test Helpers
// ============================================================================

fn create_machine() -> (Machine, Scheduler) {
    (
        TimerStateMachine::new(RecordingDisplay::new(), MockNotifier::new()),
        CooperativeScheduler::new(),
    )
}

/// Fires every tick due in the next `seconds` seconds.
fn run_for(machine: &mut Machine, scheduler: &mut Scheduler, seconds: u64) -> usize {
    let limit = scheduler.now() + Duration::from_secs(seconds);
    let mut fired = 0;
    while let Some((handle, CountdownTick)) = scheduler.step(limit) {
        machine.on_tick(scheduler, handle);
        fired += 1;
    }
    fired
}

fn fast_config(auto_loop: bool) -> PomodoroConfig {
    PomodoroConfig::new(1, 1, 2, 2, auto_loop).unwrap()
}

// ============================================================================
// Manual Countdown
// ============================================================================

#[test]
fn manual_countdown_runs_to_idle() {
    let (mut machine, mut scheduler) = create_machine();
    machine.start_manual(&mut scheduler, 5).unwrap();

    let fired = run_for(&mut machine, &mut scheduler, 10);

    assert_eq!(fired, 5);
    assert_eq!(machine.session().phase, Phase::Idle);
    assert!(!machine.session().running);
    assert_eq!(machine.notifier().completed(), &[Phase::Manual]);
    assert_eq!(machine.display().last_remaining(), Some(0));
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn manual_countdown_takes_exactly_n_ticks() {
    for n in 1..=120u32 {
        let (mut machine, mut scheduler) = create_machine();
        machine.start_manual(&mut scheduler, n).unwrap();

        // One second short of the end nothing has completed yet
        let before_end = run_for(&mut machine, &mut scheduler, u64::from(n - 1));
        assert_eq!(before_end, (n - 1) as usize, "n = {}", n);
        assert_eq!(machine.session().remaining_seconds, 1, "n = {}", n);
        assert_eq!(machine.notifier().complete_count(), 0, "n = {}", n);

        let rest = run_for(&mut machine, &mut scheduler, 10);
        assert_eq!(rest, 1, "n = {}", n);

        let session = machine.session();
        assert_eq!(session.remaining_seconds, 0, "n = {}", n);
        assert!(!session.running, "n = {}", n);
        assert_eq!(machine.notifier().complete_count(), 1, "n = {}", n);
        assert_eq!(scheduler.pending(), 0, "n = {}", n);
    }
}

#[test]
fn pause_and_resume_keep_remaining_time() {
    let (mut machine, mut scheduler) = create_machine();
    machine.start_manual(&mut scheduler, 10).unwrap();
    run_for(&mut machine, &mut scheduler, 4);

    assert!(machine.pause(&mut scheduler));
    assert_eq!(run_for(&mut machine, &mut scheduler, 30), 0);
    assert_eq!(machine.session().remaining_seconds, 6);

    assert!(machine.resume(&mut scheduler));
    run_for(&mut machine, &mut scheduler, 6);

    assert_eq!(machine.session().phase, Phase::Idle);
    assert_eq!(machine.notifier().complete_count(), 1);
}

#[test]
fn rejected_start_leaves_session_untouched() {
    let (mut machine, mut scheduler) = create_machine();
    machine.start_manual(&mut scheduler, 10).unwrap();
    let before = machine.session().clone();

    assert!(machine.start_manual(&mut scheduler, 20).is_err());
    assert!(machine.start_pomodoro(&mut scheduler, fast_config(true)).is_err());

    assert_eq!(machine.session(), &before);
    assert_eq!(scheduler.pending(), 1);
}

// ============================================================================
// Pomodoro Runs
// ============================================================================

#[test]
fn pomodoro_cycle_alternates_breaks() {
    let (mut machine, mut scheduler) = create_machine();
    machine.start_pomodoro(&mut scheduler, fast_config(true)).unwrap();

    // focus, short, focus, long, then into the next focus
    run_for(&mut machine, &mut scheduler, 60 + 60 + 60 + 120);

    assert_eq!(
        machine.notifier().completed(),
        &[Phase::Focus, Phase::ShortBreak, Phase::Focus, Phase::LongBreak]
    );
    assert_eq!(machine.session().phase, Phase::Focus);
    assert_eq!(machine.session().remaining_seconds, 60);
    assert_eq!(machine.session().current_cycle_count, 2);
    assert!(machine.session().running);
}

#[test]
fn non_looping_run_parks_after_break() {
    let (mut machine, mut scheduler) = create_machine();
    machine.start_pomodoro(&mut scheduler, fast_config(false)).unwrap();

    run_for(&mut machine, &mut scheduler, 120);

    let session = machine.session();
    assert_eq!(session.phase, Phase::Idle);
    assert!(session.is_pomodoro_mode);
    assert!(session.is_parked());
    assert_eq!(scheduler.pending(), 0);

    assert!(machine.resume(&mut scheduler));
    assert_eq!(machine.session().phase, Phase::Focus);
    assert_eq!(machine.session().remaining_seconds, 60);
}

#[test]
fn skip_completes_current_phase() {
    let (mut machine, mut scheduler) = create_machine();
    machine.start_pomodoro(&mut scheduler, fast_config(true)).unwrap();

    assert!(machine.skip_phase(&mut scheduler));
    assert!(machine.skip_phase(&mut scheduler));
    assert!(machine.skip_phase(&mut scheduler));

    assert_eq!(machine.session().phase, Phase::LongBreak);
    assert_eq!(machine.notifier().complete_count(), 3);
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn stop_pomodoro_clears_everything() {
    let (mut machine, mut scheduler) = create_machine();
    machine.start_pomodoro(&mut scheduler, fast_config(true)).unwrap();
    run_for(&mut machine, &mut scheduler, 90);

    machine.stop_pomodoro(&mut scheduler);

    let session = machine.session();
    assert_eq!(session.phase, Phase::Idle);
    assert!(!session.is_pomodoro_mode);
    assert_eq!(session.current_cycle_count, 0);
    assert!(machine.config().is_none());
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn cancelled_tick_never_fires() {
    let (mut machine, mut scheduler) = create_machine();
    machine.start_manual(&mut scheduler, 3).unwrap();
    machine.reset(&mut scheduler);

    // A foreign task on the same scheduler still fires normally
    let foreign = scheduler.schedule(Duration::from_secs(1), CountdownTick);
    let fired = scheduler.step(Duration::from_secs(10));

    assert_eq!(fired.map(|(handle, _)| handle), Some(foreign));
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(machine.session().remaining_seconds, 0);
}
