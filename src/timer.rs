use std::time::Duration;

/// A single-shot timer: at most one deadline is outstanding at a time.
///
/// Arming replaces (and thereby cancels) whatever was armed before.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Duration>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, deadline: Duration) {
        self.deadline = Some(deadline);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Disarms and returns the deadline if it has passed at `now`.
    pub fn take_due(&mut self, now: Duration) -> Option<Duration> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                Some(deadline)
            }
            _ => None,
        }
    }
}
