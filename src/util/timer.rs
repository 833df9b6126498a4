use web_time::{Duration, Instant};

/// Single-shot deadline for the tap-disambiguation window.
///
/// Nothing here blocks or spawns: the host either polls the owner each
/// frame or arms a platform timeout at [`deadline`](Self::deadline) and
/// polls when it fires. Cancellation is dropping the timer (the owner keeps
/// it in an `Option` and `take()`s it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellableTimer {
    deadline: Instant,
}

impl CancellableTimer {
    /// Arm a timer that expires `delay` after `now`.
    #[must_use]
    pub fn start(now: Instant, delay: Duration) -> Self {
        Self {
            deadline: now + delay,
        }
    }

    /// Instant at which the timer fires.
    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Whether the deadline has been reached at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_at_deadline() {
        let t0 = Instant::now();
        let timer = CancellableTimer::start(t0, Duration::from_millis(300));
        assert!(!timer.is_due(t0));
        assert!(!timer.is_due(t0 + Duration::from_millis(299)));
        assert!(timer.is_due(t0 + Duration::from_millis(300)));
        assert_eq!(timer.deadline(), t0 + Duration::from_millis(300));
    }
}
