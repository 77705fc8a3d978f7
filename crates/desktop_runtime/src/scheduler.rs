//! Deferred-task queue driven by a logical millisecond clock.
//!
//! The host advances the clock (from animation-frame or timer callbacks in the browser, explicitly
//! in tests); tasks come back out in deterministic order and the caller runs them.

#[derive(Debug, Clone, PartialEq)]
struct Timer<T> {
    key: &'static str,
    due_ms: u64,
    seq: u64,
    task: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_seq: u64,
    frame: Vec<T>,
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            frame: Vec::new(),
            timers: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Queues `task` for the next [`Scheduler::run_frame`].
    pub fn request_animation_frame(&mut self, task: T) {
        self.frame.push(task);
    }

    /// Runs `task` once `delay_ms` passes with no newer call for the same `key`.
    ///
    /// Each call replaces the pending task for `key` and restarts its delay.
    pub fn debounce(&mut self, key: &'static str, task: T, delay_ms: u64) {
        self.timers.retain(|timer| timer.key != key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            key,
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            task,
        });
    }

    /// Drains the tasks queued for the current frame in request order.
    pub fn run_frame(&mut self) -> Vec<T> {
        std::mem::take(&mut self.frame)
    }

    /// Moves the clock forward and returns every timer that came due, earliest first.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<T> {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);
        let now = self.now_ms;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.timers)
                .into_iter()
                .partition(|timer| timer.due_ms <= now);
        self.timers = pending;
        due.sort_by_key(|timer| (timer.due_ms, timer.seq));
        due.into_iter().map(|timer| timer.task).collect()
    }

    pub fn has_pending_frame(&self) -> bool {
        !self.frame.is_empty()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
