//! Cooperative scheduling primitives for markedit
//!
//! The core is single-threaded and event-driven; the only time-based
//! behavior it needs is (a) coalescing rapid input notifications into one
//! history push and (b) running mention-end work strictly after the
//! current task. Both are expressed without any event-loop API: the host
//! drives them by calling `EditorCore::tick` from its own loop.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Debouncer
// ─────────────────────────────────────────────────────────────────────────────

/// A deadline-based coalescing window.
///
/// Each `touch` arms (or re-arms) a deadline one window into the future.
/// `fire` reports true exactly once after the deadline passes, which
/// makes the coalescing eventually consistent: the last touch always
/// produces a fire.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with the given coalescing window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Note an occurrence, restarting the window.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Whether a touch is waiting for its deadline.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending deadline if it has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consume any pending deadline immediately.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task Queue
// ─────────────────────────────────────────────────────────────────────────────

/// A queue of work deferred to "after the current task".
///
/// Pushing never runs anything; the owner drains the queue at the start
/// of its next cooperative tick. This is what keeps the key event that
/// ends a mention from re-entering freshly re-enabled hotkey dispatch.
#[derive(Debug, Clone, Default)]
pub struct TaskQueue<T> {
    tasks: VecDeque<T>,
}

impl<T> TaskQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Defer a task to the next drain.
    pub fn defer(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    /// Take all deferred tasks in order.
    pub fn drain(&mut self) -> Vec<T> {
        self.tasks.drain(..).collect()
    }

    /// Whether any tasks are waiting.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debouncer_fires_after_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let t0 = Instant::now();
        debouncer.touch(t0);

        assert!(!debouncer.fire(t0 + Duration::from_millis(50)));
        assert!(debouncer.fire(t0 + Duration::from_millis(100)));
        // Consumed; does not fire again
        assert!(!debouncer.fire(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_debouncer_retouch_extends_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let t0 = Instant::now();
        debouncer.touch(t0);
        debouncer.touch(t0 + Duration::from_millis(80));

        // Original deadline has passed, but the re-touch moved it
        assert!(!debouncer.fire(t0 + Duration::from_millis(120)));
        assert!(debouncer.fire(t0 + Duration::from_millis(180)));
    }

    #[test]
    fn test_debouncer_flush() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        assert!(!debouncer.flush());
        debouncer.touch(Instant::now());
        assert!(debouncer.is_pending());
        assert!(debouncer.flush());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_task_queue_preserves_order() {
        let mut queue = TaskQueue::new();
        queue.defer(1);
        queue.defer(2);
        queue.defer(3);
        assert_eq!(queue.drain(), vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_task_queue_defer_does_not_run() {
        let mut queue = TaskQueue::new();
        queue.defer("later");
        assert!(!queue.is_empty());
    }
}
