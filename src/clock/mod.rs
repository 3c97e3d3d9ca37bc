//! Interrupt-driven millisecond and microsecond clock.
//!
//! A `Clock` owns one timer peripheral and the counters derived from its
//! overflow interrupt. There is exactly one writer, [`Clock::on_overflow`],
//! running at interrupt priority; every reader copies the counters inside a
//! critical section so a multi-byte value is never observed half-updated.
//!
//! Counters wrap silently: `millis()` after about 49.7 days, `micros()` after
//! about 71.6 minutes. Compare snapshots with wrapping subtraction
//! ([`Clock::elapsed_since`], [`Interval`]) rather than by absolute value.

use core::cell::Cell;
use core::fmt;
use core::marker::PhantomData;

use critical_section::{CriticalSection, Mutex};
use fugit::{MicrosDurationU32, MillisDurationU32};

use crate::config::{ClockConfig, DefaultConfig};
use crate::error::ClockError;
use crate::hal::TimerHw;

pub mod binding;
pub mod delay;
pub mod interval;
pub mod state;

pub use binding::ClockBinding;
pub use delay::Delay;
#[cfg(feature = "async")]
pub use delay::WaitMillis;
pub use interval::Interval;
pub use state::ClockState;

use state::interpolate_micros;

/// Millisecond timestamp.
pub type MillisInstant = fugit::TimerInstantU32<1_000>;

/// Microsecond timestamp.
pub type MicrosInstant = fugit::TimerInstantU32<1_000_000>;

/// Timer-backed clock.
///
/// Exactly one instance per physical timer. Construct it with the timer's
/// register handle, call [`initialize`](Self::initialize) once, route the
/// timer's overflow interrupt to [`on_overflow`](Self::on_overflow) (see
/// [`ClockBinding`]), then enable interrupts globally.
///
/// Calling the readers before `initialize()` returns unspecified values.
pub struct Clock<H, C = DefaultConfig> {
    hw: Mutex<H>,
    state: Mutex<Cell<ClockState>>,
    _config: PhantomData<fn() -> C>,
}

impl<H: TimerHw, C: ClockConfig> Clock<H, C> {
    /// Wrap a timer. Does not touch the hardware.
    ///
    /// Configurations the clock cannot represent are rejected at compile time,
    /// as is a timer whose counter width differs from `C::TICK_BITS`:
    ///
    /// ```compile_fail
    /// use millis_clock::config::{ClockConfig, DefaultConfig, Prescaler};
    /// use millis_clock::hal::sim::SimTimer;
    /// use millis_clock::Clock;
    ///
    /// struct Timer1;
    ///
    /// impl ClockConfig for Timer1 {
    ///     const CPU_HZ: u32 = 16_000_000;
    ///     const PRESCALER: Prescaler = Prescaler::Div64;
    ///     const TICK_BITS: u32 = 16;
    /// }
    ///
    /// let sim: SimTimer<DefaultConfig> = SimTimer::new();
    /// let clock: Clock<&SimTimer<DefaultConfig>, Timer1> = Clock::new(&sim);
    /// clock.initialize();
    /// ```
    pub const fn new(hw: H) -> Self {
        const {
            assert!(
                H::TICK_BITS == C::TICK_BITS,
                "timer counter width does not match the clock configuration"
            );
            assert!(C::CPU_HZ >= 1_000_000, "CPU clock must be at least 1 MHz");
            assert!(
                C::TICK_BITS >= 1 && C::TICK_BITS <= 16,
                "tick counter must be 1 to 16 bits wide"
            );
            assert!(
                C::PRESCALER.divisor() % C::CYCLES_PER_MICRO == 0,
                "prescaler must be a whole number of microseconds per tick"
            );
        }

        Self {
            hw: Mutex::new(hw),
            state: Mutex::new(Cell::new(ClockState::new())),
            _config: PhantomData,
        }
    }

    /// Configure the timer and reset the counters.
    ///
    /// Selects normal mode with `C::PRESCALER`, clears a stale overflow flag,
    /// then enables the overflow interrupt. Global interrupts are not enabled.
    /// Call exactly once, at startup.
    pub fn initialize(&self) {
        critical_section::with(|cs| {
            self.state.borrow(cs).set(ClockState::new());

            let hw = self.hw.borrow(cs);
            hw.configure(C::PRESCALER);
            hw.clear_pending_overflow();
            hw.enable_overflow_interrupt();
        });

        log::debug!(
            "clock: {} Hz / {}, {} us per overflow (+{} ms, +{}/{} fract)",
            C::CPU_HZ,
            C::PRESCALER.divisor(),
            C::MICROS_PER_OVERFLOW,
            C::MILLIS_INC,
            C::FRACT_INC,
            C::FRACT_MAX
        );
    }

    /// Interrupt entry point for the timer overflow.
    ///
    /// Call exactly once per overflow event, from the overflow interrupt and
    /// nowhere else. Runs in bounded time, never blocks, and must not be
    /// re-entered.
    pub fn on_overflow(&self) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            cell.set(cell.get().advance::<C>());
        });
    }

    /// Milliseconds since `initialize()`.
    pub fn millis(&self) -> u32 {
        critical_section::with(|cs| self.state.borrow(cs).get().millis())
    }

    /// Microseconds since `initialize()`, interpolated from the live counter.
    ///
    /// Resolution is `C::MICROS_PER_TICK` (4 µs with the default
    /// configuration).
    pub fn micros(&self) -> u32 {
        let (overflows, tick) = critical_section::with(|cs| {
            let mut overflows = self.state.borrow(cs).get().overflow_count();
            let hw = self.hw.borrow(cs);
            let tick = hw.read_tick();

            // Wrapped since the last interrupt ran. A tick at the top of the
            // range was sampled before that wrap, so it must not count it.
            if hw.is_overflow_pending() && tick < C::MAX_TICK {
                overflows = overflows.wrapping_add(1);
            }

            (overflows, tick)
        });

        interpolate_micros::<C>(overflows, tick)
    }

    /// Consistent copy of all counters.
    pub fn state(&self) -> ClockState {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    /// Current time as a millisecond instant.
    pub fn now(&self) -> MillisInstant {
        MillisInstant::from_ticks(self.millis())
    }

    /// Current time as a microsecond instant.
    pub fn now_micros(&self) -> MicrosInstant {
        MicrosInstant::from_ticks(self.micros())
    }

    /// Milliseconds since `earlier`, correct across one counter wrap.
    pub fn elapsed_since(&self, earlier: MillisInstant) -> MillisDurationU32 {
        MillisDurationU32::from_ticks(self.millis().wrapping_sub(earlier.ticks()))
    }

    /// Microseconds since `earlier`, correct across one counter wrap.
    pub fn elapsed_micros_since(&self, earlier: MicrosInstant) -> MicrosDurationU32 {
        MicrosDurationU32::from_ticks(self.micros().wrapping_sub(earlier.ticks()))
    }

    /// Raw millisecond counter.
    ///
    /// The critical-section token is the caller's proof that the overflow
    /// interrupt cannot run concurrently.
    pub fn millis_raw(&self, cs: CriticalSection<'_>) -> u32 {
        self.state.borrow(cs).get().millis()
    }

    /// Raw fraction counter, in units of 8 µs.
    pub fn fraction_raw(&self, cs: CriticalSection<'_>) -> u8 {
        self.state.borrow(cs).get().fraction()
    }

    /// Overwrite the millisecond counter, e.g. to account for time spent in a
    /// sleep mode with the timer stopped.
    pub fn set_millis(&self, cs: CriticalSection<'_>, millis: u32) {
        let cell = self.state.borrow(cs);
        let mut state = cell.get();
        state.millis = millis;
        cell.set(state);
    }

    /// Overwrite the fraction counter.
    ///
    /// Values at or above `C::FRACT_MAX` are rejected and leave the state
    /// unchanged.
    pub fn set_fraction(&self, cs: CriticalSection<'_>, fraction: u8) -> Result<(), ClockError> {
        if fraction >= C::FRACT_MAX {
            return Err(ClockError::FractionOutOfRange {
                value: fraction,
                max: C::FRACT_MAX,
            });
        }

        let cell = self.state.borrow(cs);
        let mut state = cell.get();
        state.fraction = fraction;
        cell.set(state);
        Ok(())
    }
}

impl<H, C> fmt::Debug for Clock<H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = critical_section::with(|cs| self.state.borrow(cs).get());
        f.debug_struct("Clock").field("state", &state).finish()
    }
}
