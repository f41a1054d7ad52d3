//! Connection state for the live status stream.
//!
//! A failed stream is torn down and retried once after a fixed delay; every
//! new failure re-arms the same delay. There is a single retry slot, so a
//! burst of errors can never stack up several pending reconnects.

use std::time::{Duration, Instant};

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Disconnected,
    Connected,
    ReconnectPending { retry_at: Instant },
}

#[derive(Debug, Clone)]
pub struct ReconnectSchedule {
    state: StreamState,
    delay: Duration,
}

impl Default for ReconnectSchedule {
    fn default() -> Self {
        ReconnectSchedule::new(DEFAULT_RECONNECT_DELAY)
    }
}

impl ReconnectSchedule {
    pub fn new(delay: Duration) -> Self {
        ReconnectSchedule {
            state: StreamState::Disconnected,
            delay,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn on_open(&mut self) {
        self.state = StreamState::Connected;
    }

    /// Record a stream failure. Returns the retry deadline if this call armed
    /// the retry slot, `None` if a retry was already pending.
    pub fn on_error(&mut self, now: Instant) -> Option<Instant> {
        if let StreamState::ReconnectPending { .. } = self.state {
            return None;
        }

        let retry_at = now + self.delay;
        self.state = StreamState::ReconnectPending { retry_at };
        Some(retry_at)
    }

    /// The pending deadline, if any.
    pub fn retry_at(&self) -> Option<Instant> {
        match self.state {
            StreamState::ReconnectPending { retry_at } => Some(retry_at),
            _ => None,
        }
    }

    /// Consume the retry slot once its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.state {
            StreamState::ReconnectPending { retry_at } if now >= retry_at => {
                self.state = StreamState::Disconnected;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let schedule = ReconnectSchedule::default();
        assert_eq!(schedule.state(), StreamState::Disconnected);
        assert_eq!(schedule.delay(), Duration::from_secs(5));
        assert_eq!(schedule.retry_at(), None);
    }

    #[test]
    fn error_arms_exactly_one_retry() {
        let mut schedule = ReconnectSchedule::default();
        let now = Instant::now();
        schedule.on_open();

        let retry_at = schedule.on_error(now).unwrap();
        assert_eq!(retry_at, now + Duration::from_secs(5));

        // More errors while pending do not add a second timer or move the deadline.
        assert_eq!(schedule.on_error(now + Duration::from_secs(1)), None);
        assert_eq!(schedule.retry_at(), Some(retry_at));
    }

    #[test]
    fn retry_never_fires_early() {
        let mut schedule = ReconnectSchedule::default();
        let now = Instant::now();
        schedule.on_error(now);

        assert!(!schedule.take_due(now));
        assert!(!schedule.take_due(now + Duration::from_millis(4999)));
        assert!(schedule.take_due(now + Duration::from_secs(5)));

        // The slot is consumed.
        assert!(!schedule.take_due(now + Duration::from_secs(60)));
        assert_eq!(schedule.state(), StreamState::Disconnected);
    }

    #[test]
    fn each_failure_rearms_the_same_delay() {
        let mut schedule = ReconnectSchedule::new(Duration::from_secs(2));
        let t0 = Instant::now();

        schedule.on_error(t0);
        assert!(schedule.take_due(t0 + Duration::from_secs(2)));

        let t1 = t0 + Duration::from_secs(3);
        assert_eq!(schedule.on_error(t1), Some(t1 + Duration::from_secs(2)));
        assert!(schedule.take_due(t1 + Duration::from_secs(2)));

        schedule.on_open();
        assert_eq!(schedule.state(), StreamState::Connected);
    }

    #[test]
    fn open_clears_pending_retry() {
        let mut schedule = ReconnectSchedule::default();
        let now = Instant::now();
        schedule.on_error(now);
        schedule.on_open();
        assert_eq!(schedule.retry_at(), None);
        assert!(!schedule.take_due(now + Duration::from_secs(10)));
    }
}
