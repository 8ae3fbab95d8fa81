use std::time::{Duration, Instant};

/// Trailing-edge debouncer: of all values signalled within a rolling quiet
/// window, only the last one fires, once the window elapses with no
/// further signals. The final value of a burst is delayed, never dropped.
///
/// Timer state is local to each instance, so separate signal classes get
/// separate instances and firing one never disturbs the other. There is no
/// background timer; the owner polls with the event loop's clock.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            deadline: None,
        }
    }

    /// Record a value and restart the quiet window. A previously pending
    /// value is superseded and will never be delivered.
    pub fn signal(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.deadline = Some(now + self.window);
    }

    /// Deliver the pending value if its quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Drop the pending value and timer without firing.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.deadline = None;
    }

    /// When the pending value becomes due, if any. Lets the event loop
    /// shorten its wait instead of ticking blindly.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
