//! Compile-time clock configuration.
//!
//! The `ClockConfig` trait describes the timer hardware (CPU clock, prescaler,
//! counter width) and derives every constant the overflow accumulator and the
//! microsecond reader need. All values are const (zero runtime cost).

/// Timer clock-divide ratio.
///
/// These are the ratios selectable on the ATmega328P Timer/Counter 0. Other
/// timers may support a subset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Prescaler {
    /// Timer runs at the system clock
    Div1,
    /// System clock / 8
    Div8,
    /// System clock / 64
    Div64,
    /// System clock / 256
    Div256,
    /// System clock / 1024
    Div1024,
}

impl Prescaler {
    /// Integer factor between the system clock and the tick rate.
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }
}

/// Clock configuration trait.
///
/// Implementations only provide `CPU_HZ`, `PRESCALER` and `TICK_BITS`; the
/// remaining constants are derived and should not be overridden.
///
/// The fractional accumulator counts in units of 8 µs so that it fits a byte.
/// Overflow periods whose sub-millisecond remainder is not a multiple of 8 µs
/// lose the truncated part on every overflow.
///
/// # Supported clocks
///
/// `CPU_HZ` is counted in whole MHz and must be at least 1 MHz. One tick
/// (`PRESCALER` cycles) must last a whole number of microseconds. `Clock::new`
/// rejects anything else at compile time rather than drift silently. That
/// rules out some common AVR clocks: 12 MHz and 20 MHz give 5.33 µs and
/// 3.2 µs ticks at divide-by-64.
///
/// ```compile_fail
/// use millis_clock::config::{ClockConfig, Prescaler};
/// use millis_clock::hal::sim::SimTimer;
/// use millis_clock::Clock;
///
/// struct TwentyMhz;
///
/// impl ClockConfig for TwentyMhz {
///     const CPU_HZ: u32 = 20_000_000;
///     const PRESCALER: Prescaler = Prescaler::Div64;
///     const TICK_BITS: u32 = 8;
/// }
///
/// let sim: SimTimer<TwentyMhz> = SimTimer::new();
/// let clock: Clock<&SimTimer<TwentyMhz>, TwentyMhz> = Clock::new(&sim);
/// clock.initialize();
/// ```
pub trait ClockConfig {
    /// System clock frequency in Hz (16 MHz on an Arduino Uno)
    const CPU_HZ: u32;

    /// Clock-divide ratio programmed into the timer
    const PRESCALER: Prescaler;

    /// Width of the free-running tick counter (8 for Timer/Counter 0)
    const TICK_BITS: u32;

    /// System clock cycles per microsecond
    const CYCLES_PER_MICRO: u32 = Self::CPU_HZ / 1_000_000;

    /// Ticks between two overflow events
    const TICKS_PER_OVERFLOW: u32 = 1 << Self::TICK_BITS;

    /// Highest value the tick counter reaches before wrapping
    const MAX_TICK: u32 = Self::TICKS_PER_OVERFLOW - 1;

    /// Length of one overflow period in microseconds
    const MICROS_PER_OVERFLOW: u32 =
        Self::PRESCALER.divisor() * Self::TICKS_PER_OVERFLOW / Self::CYCLES_PER_MICRO;

    /// Microseconds per tick
    const MICROS_PER_TICK: u32 = Self::PRESCALER.divisor() / Self::CYCLES_PER_MICRO;

    /// Whole milliseconds added per overflow
    const MILLIS_INC: u32 = Self::MICROS_PER_OVERFLOW / 1000;

    /// Sub-millisecond remainder added per overflow, in units of 8 µs
    const FRACT_INC: u8 = ((Self::MICROS_PER_OVERFLOW % 1000) >> 3) as u8;

    /// One millisecond in units of 8 µs
    const FRACT_MAX: u8 = (1000 >> 3) as u8;
}

/// Default configuration: 16 MHz system clock, divide by 64, 8-bit counter.
///
/// - Overflow period: 1024 µs
/// - MILLIS_INC: 1
/// - FRACT_INC: 3
/// - Resolution of `micros()`: 4 µs
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DefaultConfig;

impl ClockConfig for DefaultConfig {
    const CPU_HZ: u32 = 16_000_000;
    const PRESCALER: Prescaler = Prescaler::Div64;
    const TICK_BITS: u32 = 8;
}

/// Configuration for 8 MHz boards (3.3 V parts, internal oscillator).
///
/// - Overflow period: 2048 µs
/// - MILLIS_INC: 2
/// - FRACT_INC: 6
/// - Resolution of `micros()`: 8 µs
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SlowClockConfig;

impl ClockConfig for SlowClockConfig {
    const CPU_HZ: u32 = 8_000_000;
    const PRESCALER: Prescaler = Prescaler::Div64;
    const TICK_BITS: u32 = 8;
}
