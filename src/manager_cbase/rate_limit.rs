use chrono::{DateTime, DurationRound, TimeDelta, Utc};

/// Outcome of asking the rate limiter for permission to fetch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acquire {
    Granted,
    Denied { wait_until: DateTime<Utc> },
}

/// Hour-aligned fixed window rate limiter for outbound CBase requests.
///
/// The window is the current wall-clock hour, not a sliding window and not
/// a fixed duration since start-up. The counter increments on every call,
/// so a denial also consumes one slot of the hour budget.
pub struct RateLimit {
    max_per_hour: u32,
    count: u32,
    window_start: DateTime<Utc>,
}

impl RateLimit {
    /// Returns a rate limiter with an empty window starting now
    ///
    /// # Arguments
    ///
    /// * 'max_per_hour' - max number of fetch attempts per wall-clock hour
    pub fn new(max_per_hour: u32) -> RateLimit {
        RateLimit { max_per_hour, count: 0, window_start: Utc::now() }
    }

    /// Asks for permission to perform one fetch attempt.
    ///
    /// If the wall-clock hour of 'now' differs from the hour the window was
    /// opened in, the window resets before the limit is evaluated. A denial
    /// carries the start of the next wall-clock hour as the earliest time a
    /// new attempt can succeed.
    ///
    /// # Arguments
    ///
    /// * 'now' - the current time, injected so the window logic is testable
    pub fn try_acquire(&mut self, now: DateTime<Utc>) -> Acquire {
        let hour = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);
        if hour != self.window_start.duration_trunc(TimeDelta::hours(1)).unwrap_or(self.window_start) {
            self.count = 0;
            self.window_start = now;
        }

        let granted = self.count < self.max_per_hour;
        self.count += 1;

        if granted {
            Acquire::Granted
        } else {
            Acquire::Denied { wait_until: hour + TimeDelta::hours(1) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(time: &str) -> DateTime<Utc> {
        time.parse().unwrap()
    }

    #[test]
    fn denies_the_attempt_after_the_limit_within_one_hour() {
        let mut limiter = RateLimit::new(3);
        let now = at("2024-01-01T10:05:00Z");

        for _ in 0..3 {
            assert_eq!(limiter.try_acquire(now), Acquire::Granted);
        }
        assert_eq!(
            limiter.try_acquire(now),
            Acquire::Denied { wait_until: at("2024-01-01T11:00:00Z") }
        );
    }

    #[test]
    fn new_wall_clock_hour_resets_the_window() {
        let mut limiter = RateLimit::new(1);
        assert_eq!(limiter.try_acquire(at("2024-01-01T10:59:00Z")), Acquire::Granted);
        assert!(matches!(limiter.try_acquire(at("2024-01-01T10:59:30Z")), Acquire::Denied { .. }));

        // one second later but a new hour, granted regardless of prior count
        assert_eq!(limiter.try_acquire(at("2024-01-01T11:00:01Z")), Acquire::Granted);
    }

    #[test]
    fn denied_attempts_stay_denied_until_the_window_resets() {
        let mut limiter = RateLimit::new(2);
        let now = at("2024-01-01T10:00:00Z");

        assert_eq!(limiter.try_acquire(now), Acquire::Granted);
        assert_eq!(limiter.try_acquire(now), Acquire::Granted);
        // denied, but the call itself still increments the counter
        assert!(matches!(limiter.try_acquire(now), Acquire::Denied { .. }));
        assert!(matches!(limiter.try_acquire(now), Acquire::Denied { .. }));
    }

    #[test]
    fn same_hour_on_a_different_day_is_a_new_window() {
        let mut limiter = RateLimit::new(1);
        assert_eq!(limiter.try_acquire(at("2024-01-01T10:30:00Z")), Acquire::Granted);
        assert_eq!(limiter.try_acquire(at("2024-01-02T10:30:00Z")), Acquire::Granted);
    }
}
