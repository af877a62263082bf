//! Fixed-interval scheduling for the periodic reminder scan.
//!
//! The schedule never reads the wall clock itself; callers pass `now`, or a
//! [`Clock`], so tests step time by hand.

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;

pub const DEFAULT_INTERVAL_SECS: u32 = 30;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSchedule {
    interval: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl IntervalSchedule {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Zero is bumped to one second.
    #[must_use]
    pub fn every_secs(secs: u32) -> Self {
        Self::new(Duration::seconds(i64::from(secs.max(1))))
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Arm the schedule. The first firing is one interval after `now`.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// True when an interval has elapsed since the last firing (or start).
    ///
    /// Missed intervals collapse into one firing; the next one is due a full
    /// interval after `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    pub fn poll_clock(&mut self, clock: &dyn Clock) -> bool {
        self.poll(clock.now())
    }

    /// Time left until the next firing, or `None` when stopped.
    #[must_use]
    pub fn until_next(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        let due = self.next_due?;
        Some((due - now).to_std().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> ManualClock {
        ManualClock::new(DateTime::<Utc>::from_timestamp(1_750_000_000, 0).unwrap())
    }

    #[test]
    fn stopped_schedule_never_fires() {
        let clock = clock();
        let mut schedule = IntervalSchedule::every_secs(30);
        clock.advance(Duration::hours(1));
        assert!(!schedule.poll_clock(&clock));
        assert_eq!(schedule.until_next(clock.now()), None);
    }

    #[test]
    fn fires_once_per_elapsed_interval() {
        let clock = clock();
        let mut schedule = IntervalSchedule::every_secs(30);
        schedule.start(clock.now());

        clock.advance(Duration::seconds(29));
        assert!(!schedule.poll_clock(&clock));

        clock.advance(Duration::seconds(1));
        assert!(schedule.poll_clock(&clock));
        assert!(!schedule.poll_clock(&clock));

        clock.advance(Duration::seconds(30));
        assert!(schedule.poll_clock(&clock));
    }

    #[test]
    fn missed_intervals_collapse() {
        let clock = clock();
        let mut schedule = IntervalSchedule::every_secs(30);
        schedule.start(clock.now());

        clock.advance(Duration::seconds(300));
        assert!(schedule.poll_clock(&clock));
        assert!(!schedule.poll_clock(&clock));
        assert_eq!(
            schedule.until_next(clock.now()),
            Some(std::time::Duration::from_secs(30))
        );
    }

    #[test]
    fn stop_prevents_further_firing() {
        let clock = clock();
        let mut schedule = IntervalSchedule::every_secs(30);
        schedule.start(clock.now());
        schedule.stop();
        clock.advance(Duration::seconds(60));
        assert!(!schedule.poll_clock(&clock));
        assert!(!schedule.is_running());
    }

    #[test]
    fn zero_interval_is_bumped() {
        assert_eq!(IntervalSchedule::every_secs(0).interval(), Duration::seconds(1));
    }
}
