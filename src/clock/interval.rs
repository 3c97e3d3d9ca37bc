//! Wraparound-safe periodic polling.
//!
//! The usual superloop pattern: remember when something last happened and act
//! again once the period has elapsed. Elapsed time is computed by wrapping
//! subtraction, so the interval keeps working across the 49.7-day wrap of the
//! millisecond counter.

use fugit::MillisDurationU32;

use super::MillisInstant;

/// Fixed-period trigger driven by millisecond timestamps.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Interval {
    period: u32,
    last: u32,
}

impl Interval {
    /// Interval whose first period is measured from time zero.
    pub const fn new(period: MillisDurationU32) -> Self {
        Self {
            period: period.ticks(),
            last: 0,
        }
    }

    /// Interval whose first period is measured from `now`.
    pub const fn starting_at(period: MillisDurationU32, now: MillisInstant) -> Self {
        Self {
            period: period.ticks(),
            last: now.ticks(),
        }
    }

    /// Configured period.
    pub const fn period(&self) -> MillisDurationU32 {
        MillisDurationU32::from_ticks(self.period)
    }

    /// Returns true once per elapsed period.
    ///
    /// The next period is measured from `now`, not from the previous deadline,
    /// so a late poll delays the following trigger rather than bunching them.
    pub fn poll(&mut self, now: MillisInstant) -> bool {
        let now = now.ticks();
        if now.wrapping_sub(self.last) >= self.period {
            self.last = now;
            true
        } else {
            false
        }
    }

    /// Time left until the next trigger, zero if already due.
    pub fn remaining(&self, now: MillisInstant) -> MillisDurationU32 {
        let elapsed = now.ticks().wrapping_sub(self.last);
        MillisDurationU32::from_ticks(self.period.saturating_sub(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u32) -> MillisInstant {
        MillisInstant::from_ticks(ms)
    }

    #[test]
    fn test_triggers_once_per_period() {
        let mut interval = Interval::new(MillisDurationU32::from_ticks(1000));
        assert!(!interval.poll(at(0)));
        assert!(!interval.poll(at(999)));
        assert!(interval.poll(at(1000)));
        assert!(!interval.poll(at(1001)));
        assert!(interval.poll(at(2000)));
    }

    #[test]
    fn test_late_poll_restarts_period() {
        let mut interval = Interval::new(MillisDurationU32::from_ticks(1000));
        assert!(interval.poll(at(1500)));
        assert!(!interval.poll(at(2000)));
        assert!(interval.poll(at(2500)));
    }

    #[test]
    fn test_survives_counter_wrap() {
        let mut interval =
            Interval::starting_at(MillisDurationU32::from_ticks(100), at(u32::MAX - 49));
        assert!(!interval.poll(at(u32::MAX)));
        assert!(!interval.poll(at(49)));
        assert!(interval.poll(at(50)));
    }

    #[test]
    fn test_remaining() {
        let interval = Interval::starting_at(MillisDurationU32::from_ticks(250), at(100));
        assert_eq!(interval.period().ticks(), 250);
        assert_eq!(interval.remaining(at(100)).ticks(), 250);
        assert_eq!(interval.remaining(at(300)).ticks(), 50);
        assert_eq!(interval.remaining(at(400)).ticks(), 0);
    }
}
