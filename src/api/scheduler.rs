use std::time::Duration;

/// Handle to one scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    id: TaskId,
    due: Duration,
    task: T,
}

/// Deferred-execution queue driven by an explicit virtual clock.
///
/// Timers are best-effort ordering hints: tasks run in `(due, schedule order)`
/// order when the owner advances the clock past them.
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due: self.now + delay,
            task,
        });
        id
    }

    /// Removes a pending task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.id != id);
        self.pending.len() != before
    }

    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|scheduled| scheduled.id == id)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pops the earliest task due at or before `deadline`, moving the clock to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, scheduled)| scheduled.due <= deadline)
            .min_by_key(|(_, scheduled)| (scheduled.due, scheduled.id))
            .map(|(index, _)| index)?;
        let scheduled = self.pending.remove(index);
        self.now = self.now.max(scheduled.due);
        Some(scheduled.task)
    }

    /// Moves the clock forward to `time` once every due task has been popped.
    pub fn settle_at(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}
