//! Delays measured against the clock.
//!
//! `Delay` busy-waits on [`Clock::micros`] and implements the `embedded-hal`
//! delay trait so drivers can borrow the clock for their timing needs. With the
//! `async` feature, [`Clock::wait_millis`] provides a future that completes
//! after a number of milliseconds.

use embedded_hal::delay::DelayNs;

use super::Clock;
use crate::config::ClockConfig;
use crate::hal::TimerHw;

/// Blocking delay provider borrowing a running clock.
///
/// Requires the overflow interrupt to be serviced while waiting: never use it
/// with interrupts disabled.
#[derive(Debug)]
pub struct Delay<'a, H, C> {
    clock: &'a Clock<H, C>,
}

impl<H: TimerHw, C: ClockConfig> Clock<H, C> {
    /// Borrow the clock as an `embedded_hal::delay::DelayNs` provider.
    pub fn delay(&self) -> Delay<'_, H, C> {
        Delay { clock: self }
    }
}

impl<H: TimerHw, C: ClockConfig> DelayNs for Delay<'_, H, C> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        // micros() only lands on multiples of the tick length, so an elapsed
        // value close to 2^32 may never be observed. Spin only below 1 ms.
        self.delay_ms(us / 1000);

        let rest = us % 1000;
        let start = self.clock.micros();
        while self.clock.micros().wrapping_sub(start) < rest {
            core::hint::spin_loop();
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        // Whole milliseconds one at a time, so long delays never outrun the
        // 32-bit microsecond counter.
        let mut remaining = ms;
        let mut start = self.clock.micros();
        while remaining > 0 {
            if self.clock.micros().wrapping_sub(start) >= 1000 {
                remaining -= 1;
                start = start.wrapping_add(1000);
            } else {
                core::hint::spin_loop();
            }
        }
    }
}

#[cfg(feature = "async")]
pub use self::wait::WaitMillis;

#[cfg(feature = "async")]
mod wait {
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll};

    use crate::clock::Clock;
    use crate::config::ClockConfig;
    use crate::hal::TimerHw;

    /// Future returned by [`Clock::wait_millis`].
    ///
    /// Re-wakes itself on every pending poll, so the executor keeps polling it
    /// until the time has passed.
    #[derive(Debug)]
    #[must_use = "futures do nothing unless awaited"]
    pub struct WaitMillis<'a, H, C> {
        clock: &'a Clock<H, C>,
        start: u32,
        duration: u32,
    }

    impl<H: TimerHw, C: ClockConfig> Clock<H, C> {
        /// Future completing `ms` milliseconds after this call.
        pub fn wait_millis(&self, ms: u32) -> WaitMillis<'_, H, C> {
            WaitMillis {
                clock: self,
                start: self.millis(),
                duration: ms,
            }
        }
    }

    impl<H: TimerHw, C: ClockConfig> Future for WaitMillis<'_, H, C> {
        type Output = ();

        fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.clock.millis().wrapping_sub(self.start) >= self.duration {
                Poll::Ready(())
            } else {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::config::{DefaultConfig, Prescaler};
    use crate::hal::sim::SimTimer;

    /// Polls a delay may make before it counts as stuck.
    const POLL_BUDGET: u32 = 5_000_000;

    static FREE_RUNNING: OnceLock<Clock<FreeRunning>> = OnceLock::new();
    static POLLS: AtomicU32 = AtomicU32::new(0);

    /// Timer on which one full overflow period passes per counter read.
    ///
    /// Makes a delay of any length run in a single thread without a separate
    /// interrupt source.
    #[derive(Debug)]
    struct FreeRunning;

    impl TimerHw for FreeRunning {
        const TICK_BITS: u32 = 8;

        fn configure(&self, _prescaler: Prescaler) {}

        fn clear_pending_overflow(&self) {}

        fn enable_overflow_interrupt(&self) {}

        fn read_tick(&self) -> u32 {
            let polls = POLLS.fetch_add(1, Ordering::Relaxed);
            assert!(polls < POLL_BUDGET, "delay still waiting after {} polls", polls);
            if let Some(clock) = FREE_RUNNING.get() {
                clock.on_overflow();
            }
            0
        }

        fn is_overflow_pending(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_longest_delay_us_returns_across_counter_wrap() {
        let clock = FREE_RUNNING.get_or_init(|| Clock::new(FreeRunning));
        clock.initialize();

        // A few overflows short of the 32-bit microsecond wrap
        critical_section::with(|cs| {
            let cell = clock.state.borrow(cs);
            let mut state = cell.get();
            state.overflow_count = (1 << 22) - 8;
            cell.set(state);
        });
        let start = clock.micros();
        assert!(start > u32::MAX - 10 * 1024);

        let before = clock.state().overflow_count();
        clock.delay().delay_us(u32::MAX);
        let after = clock.state().overflow_count();

        // Past the micros() wrap, and the whole request waited out
        assert!(after > 1 << 22);
        let waited = u64::from(after - before) * u64::from(DefaultConfig::MICROS_PER_OVERFLOW);
        assert!(waited >= u64::from(u32::MAX), "returned after {} us", waited);
    }

    #[test]
    fn test_zero_delays_return_immediately() {
        let sim: SimTimer = SimTimer::new();
        let clock: Clock<&SimTimer> = Clock::new(&sim);
        clock.initialize();

        let mut delay = clock.delay();
        delay.delay_ns(0);
        delay.delay_us(0);
        delay.delay_ms(0);
        assert_eq!(clock.micros(), 0);
    }
}
