//! Timer hardware abstraction.
//!
//! The `TimerHw` trait is the register-level contract the clock depends on: a
//! free-running counter of known width, an overflow flag, and an overflow
//! interrupt enable. Keeping it this narrow lets the accumulator and reader run
//! unchanged against real peripherals and against [`sim::SimTimer`].

use crate::config::Prescaler;

#[cfg(feature = "atmega328p")]
pub mod avr;
pub mod sim;

/// Platform-agnostic timer register interface.
///
/// All methods take `&self`: peripheral registers are interior-mutable, and the
/// clock only ever calls them from inside a critical section.
///
/// Implementations must not block. `read_tick()` and `is_overflow_pending()`
/// are called from `Clock::micros()` with interrupts disabled.
pub trait TimerHw {
    /// Width of the hardware tick counter in bits.
    ///
    /// `Clock::new` refuses to build when this differs from the
    /// configuration's `TICK_BITS`.
    const TICK_BITS: u32;

    /// Put the counter in normal (free-running) mode with the given
    /// clock-divide ratio. The counter starts running.
    fn configure(&self, prescaler: Prescaler);

    /// Clear a pending overflow flag.
    fn clear_pending_overflow(&self);

    /// Enable the overflow interrupt for this timer only.
    ///
    /// Global interrupt enable is left to the application.
    fn enable_overflow_interrupt(&self);

    /// Current value of the tick counter, widened to `u32`.
    fn read_tick(&self) -> u32;

    /// True if the counter wrapped and the overflow interrupt has not run yet.
    fn is_overflow_pending(&self) -> bool;
}

impl<T: TimerHw + ?Sized> TimerHw for &T {
    const TICK_BITS: u32 = T::TICK_BITS;

    fn configure(&self, prescaler: Prescaler) {
        (**self).configure(prescaler)
    }

    fn clear_pending_overflow(&self) {
        (**self).clear_pending_overflow()
    }

    fn enable_overflow_interrupt(&self) {
        (**self).enable_overflow_interrupt()
    }

    fn read_tick(&self) -> u32 {
        (**self).read_tick()
    }

    fn is_overflow_pending(&self) -> bool {
        (**self).is_overflow_pending()
    }
}
