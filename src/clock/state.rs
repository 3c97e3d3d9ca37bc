//! Shared counter state and the fixed-point overflow accumulator.
//!
//! The hardware overflow period is rarely a whole number of milliseconds
//! (1024 µs at 16 MHz / 64 / 256). Each overflow adds the whole part
//! (`MILLIS_INC`) to the millisecond count and the remainder, in units of 8 µs
//! (`FRACT_INC`), to a byte-sized fraction. When the fraction reaches one
//! millisecond (`FRACT_MAX`) it is folded back as a leap millisecond, so the
//! long-run count tracks the timer exactly.

use crate::config::ClockConfig;

/// Snapshot of the clock counters.
///
/// `fraction()` is always below `FRACT_MAX` of the configuration that produced
/// the state.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ClockState {
    pub(crate) overflow_count: u32,
    pub(crate) millis: u32,
    pub(crate) fraction: u8,
}

impl ClockState {
    /// All counters at zero.
    pub const fn new() -> Self {
        Self {
            overflow_count: 0,
            millis: 0,
            fraction: 0,
        }
    }

    /// Overflow events since initialization (wraps at 2^32).
    pub const fn overflow_count(&self) -> u32 {
        self.overflow_count
    }

    /// Whole milliseconds since initialization (wraps at 2^32).
    pub const fn millis(&self) -> u32 {
        self.millis
    }

    /// Accumulated sub-millisecond remainder, in units of 8 µs.
    pub const fn fraction(&self) -> u8 {
        self.fraction
    }

    /// State after one more overflow event.
    #[must_use]
    pub fn advance<C: ClockConfig>(self) -> Self {
        let mut millis = self.millis.wrapping_add(C::MILLIS_INC);
        let mut fraction = self.fraction + C::FRACT_INC;

        if fraction >= C::FRACT_MAX {
            fraction -= C::FRACT_MAX;
            millis = millis.wrapping_add(1);
        }

        Self {
            overflow_count: self.overflow_count.wrapping_add(1),
            millis,
            fraction,
        }
    }
}

/// Microseconds represented by `overflows` full periods plus `tick` counts
/// into the current one. Wraps at 2^32.
pub fn interpolate_micros<C: ClockConfig>(overflows: u32, tick: u32) -> u32 {
    (overflows << C::TICK_BITS)
        .wrapping_add(tick)
        .wrapping_mul(C::MICROS_PER_TICK)
}
