//! Cooperative, single-threaded scheduling of delayed tasks.
//!
//! This module provides:
//! - `TickScheduler`: the schedule/cancel capability consumed by the timer
//! - `CooperativeScheduler`: a logical-clock implementation driven by the event loop
//! - `TaskSlot`: an owned single-entry holder for one pending task
//!
//! Tasks carry a plain event value instead of a closure. The event loop pops
//! due tasks one at a time and dispatches them, so a handler may register
//! follow-up tasks (the countdown and the animations re-register themselves)
//! without any shared ownership of the scheduler.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tracing::trace;

// ============================================================================
// TaskHandle
// ============================================================================

/// Opaque handle for one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Returns the registration sequence number of the task.
    pub fn id(&self) -> u64 {
        self.0
    }
}

// ============================================================================
// TickScheduler
// ============================================================================

/// Registers one-shot tasks to fire after a delay, and cancels them.
pub trait TickScheduler {
    /// Value delivered back to the event loop when a task fires.
    type Event;

    /// Registers `event` to fire once, no earlier than `delay` from now.
    fn schedule(&mut self, delay: Duration, event: Self::Event) -> TaskHandle;

    /// Cancels a pending task.
    ///
    /// Cancelling a task that already fired or was already cancelled is a no-op.
    fn cancel(&mut self, handle: TaskHandle);
}

// ============================================================================
// CooperativeScheduler
// ============================================================================

/// Scheduler driven by an explicit logical clock.
///
/// The owner advances the clock with [`CooperativeScheduler::step`]. Tasks fire
/// in deadline order; tasks sharing a deadline fire in registration order.
#[derive(Debug)]
pub struct CooperativeScheduler<E> {
    /// Current logical time, measured from scheduler creation
    now: Duration,
    /// Sequence number for the next registered task
    next_id: u64,
    /// Pending tasks ordered by (deadline, registration order)
    queue: BTreeMap<(Duration, u64), E>,
    /// Deadline of each pending task, for cancellation
    deadlines: HashMap<u64, Duration>,
}

impl<E> Default for CooperativeScheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> CooperativeScheduler<E> {
    /// Creates an empty scheduler with its clock at zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Returns the current logical time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Returns the number of pending tasks.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if the task has neither fired nor been cancelled.
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Returns the deadline of the earliest pending task.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.first_key_value().map(|(&(due, _), _)| due)
    }

    /// Pops the next task that is due at or before `limit`.
    ///
    /// When a task is returned the clock moves to its deadline, so a task that
    /// re-registers itself from its handler keeps an exact cadence. When no
    /// task is due the clock moves to `limit` and `None` is returned. The clock
    /// never moves backwards.
    pub fn step(&mut self, limit: Duration) -> Option<(TaskHandle, E)> {
        match self.next_deadline() {
            Some(due) if due <= limit => {
                let ((due, id), event) = self.queue.pop_first()?;
                self.deadlines.remove(&id);
                self.now = self.now.max(due);
                trace!(task = id, at_ms = due.as_millis() as u64, "task fired");
                Some((TaskHandle(id), event))
            }
            _ => {
                self.now = self.now.max(limit);
                None
            }
        }
    }
}

impl<E> TickScheduler for CooperativeScheduler<E> {
    type Event = E;

    fn schedule(&mut self, delay: Duration, event: E) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;

        let due = self.now + delay;
        self.queue.insert((due, id), event);
        self.deadlines.insert(id, due);

        trace!(task = id, due_ms = due.as_millis() as u64, "task scheduled");
        TaskHandle(id)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if let Some(due) = self.deadlines.remove(&handle.0) {
            self.queue.remove(&(due, handle.0));
            trace!(task = handle.0, "task cancelled");
        }
    }
}

// ============================================================================
// TaskSlot
// ============================================================================

/// Holder for at most one pending task of a single logical activity.
///
/// Arming the slot always cancels whatever it held before, so the owning
/// activity can never have two tasks pending at once.
#[derive(Debug, Default)]
pub struct TaskSlot {
    handle: Option<TaskHandle>,
}

impl TaskSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Cancels the held task (if any) and registers a new one.
    pub fn arm<S>(&mut self, scheduler: &mut S, delay: Duration, event: S::Event) -> TaskHandle
    where
        S: TickScheduler + ?Sized,
    {
        self.disarm(scheduler);
        let handle = scheduler.schedule(delay, event);
        self.handle = Some(handle);
        handle
    }

    /// Cancels the held task. Returns true if a task was held.
    pub fn disarm<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: TickScheduler + ?Sized,
    {
        match self.handle.take() {
            Some(handle) => {
                scheduler.cancel(handle);
                true
            }
            None => false,
        }
    }

    /// Records that `fired` has fired.
    ///
    /// Returns true if it was the task held by this slot, which empties the
    /// slot. A foreign or stale handle leaves the slot untouched.
    pub fn fired(&mut self, fired: TaskHandle) -> bool {
        if self.handle == Some(fired) {
            self.handle = None;
            true
        } else {
            false
        }
    }

    /// Returns the held task handle.
    pub fn handle(&self) -> Option<TaskHandle> {
        self.handle
    }

    /// Returns true if the slot holds a task.
    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
