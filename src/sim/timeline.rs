//! Cancellable scheduled tasks
//!
//! Spawn timers and spot animation lifetimes are both entries on one
//! millisecond timeline. Time only moves when the engine advances it, so a
//! session replays identically for the same seed and inputs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::state::SpotId;

/// Handle returned by `Timeline::schedule`, used to cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskHandle(u64);

/// Work the engine performs when a task comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedTask {
    /// Add a new spot to the playfield
    SpawnSpot,
    /// A spot's animation ran to completion
    AnimationEnd { spot: SpotId },
}

/// A task that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TaskHandle,
    pub due_ms: u64,
    pub task: TimedTask,
}

/// Ordered queue of pending tasks
#[derive(Debug, Default)]
pub struct Timeline {
    now_ms: u64,
    next_handle: u64,
    /// Keyed by (due time, handle) so ties fire in scheduling order
    queue: BTreeMap<(u64, TaskHandle), TimedTask>,
    due_by_handle: HashMap<TaskHandle, u64>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current timeline time (ms)
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Run `task` `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, task: TimedTask) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due, handle), task);
        self.due_by_handle.insert(handle, due);
        handle
    }

    /// Drop a pending task. False when it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.due_by_handle.remove(&handle) {
            Some(due) => self.queue.remove(&(due, handle)).is_some(),
            None => false,
        }
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.queue.clear();
        self.due_by_handle.clear();
    }

    /// Number of pending tasks matching `pred`
    pub fn count_where(&self, pred: impl Fn(&TimedTask) -> bool) -> usize {
        self.queue.values().filter(|t| pred(t)).count()
    }

    /// Due times of pending tasks matching `pred`, relative to now
    pub fn delays_where(&self, pred: impl Fn(&TimedTask) -> bool) -> Vec<u64> {
        self.queue
            .iter()
            .filter(|(_, t)| pred(t))
            .map(|((due, _), _)| due - self.now_ms)
            .collect()
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock
    /// to its due time
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let (&(due, handle), _) = self.queue.first_key_value()?;
        if due > until_ms {
            return None;
        }
        let task = self.queue.remove(&(due, handle))?;
        self.due_by_handle.remove(&handle);
        self.now_ms = self.now_ms.max(due);
        Some(Fired {
            handle,
            due_ms: due,
            task,
        })
    }

    /// Move the clock to the end of an advance window
    pub fn finish(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
