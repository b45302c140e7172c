//! Deterministic timer queue.
//!
//! The `Scheduler` is the only source of time for the engine. Nothing
//! happens on a wall clock: the host calls `advance` (through
//! `MatchEngine::tick`) once per frame, and tests call it with whatever
//! step they like.
//!
//! Tasks are plain values, not closures, so a pending continuation can be
//! inspected, cancelled individually, or dropped wholesale on reset.
//!
//! ```
//! use std::time::Duration;
//! use rust_pairs::core::Scheduler;
//!
//! let mut clock = Scheduler::new();
//! clock.schedule_after(Duration::from_millis(300), "compare");
//! clock.schedule_after(Duration::from_millis(100), "early");
//!
//! let target = clock.now() + Duration::from_millis(200);
//! assert_eq!(clock.pop_due(target).map(|(_, t)| t), Some("early"));
//! assert_eq!(clock.pop_due(target), None);
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Handle to a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// Timer queue ordered by due time, then by scheduling order.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: Duration,
    /// Keyed by (due, id); ids are monotonic so equal due times stay FIFO.
    tasks: BTreeMap<(Duration, TaskId), T>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            tasks: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Check if nothing is scheduled.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.keys().next().map(|&(due, _)| due)
    }

    /// Schedule `task` to run `delay` after the current time.
    pub fn schedule_after(&mut self, delay: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert((self.now + delay, id), task);
        id
    }

    /// Cancel a single task. Returns it if it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let key = self.tasks.keys().find(|(_, tid)| *tid == id).copied()?;
        self.tasks.remove(&key)
    }

    /// Drop every pending task. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        cancelled
    }

    /// Remove the earliest task due at or before `until`.
    ///
    /// The clock moves forward to that task's due time, so anything the
    /// task schedules is timed relative to when it actually ran.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskId, T)> {
        let (&(due, id), _) = self.tasks.iter().next()?;
        if due > until {
            return None;
        }
        let task = self.tasks.remove(&(due, id))?;
        if due > self.now {
            self.now = due;
        }
        Some((id, task))
    }

    /// Move the clock to `target` without running anything.
    ///
    /// Never moves backwards.
    pub fn advance_to(&mut self, target: Duration) {
        if target > self.now {
            self.now = target;
        }
    }

    /// Run every task due within `dt`, in due order, then settle at `now + dt`.
    ///
    /// `run` may schedule new tasks; those run in the same call if they fall
    /// inside the window.
    pub fn advance<F>(&mut self, dt: Duration, mut run: F)
    where
        F: FnMut(&mut Self, T),
    {
        let target = self.now + dt;
        while let Some((_, task)) = self.pop_due(target) {
            run(self, task);
        }
        self.advance_to(target);
    }
}
