//! Shared test fixtures: clock configurations beyond the two the library ships.

#![allow(dead_code)]

use millis_clock::config::{ClockConfig, Prescaler};

/// 16 MHz, divide by 64, 16-bit counter (Timer/Counter 1 sized).
///
/// 262144 us per overflow: MILLIS_INC = 262, FRACT_INC = 18.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WideTimerConfig;

impl ClockConfig for WideTimerConfig {
    const CPU_HZ: u32 = 16_000_000;
    const PRESCALER: Prescaler = Prescaler::Div64;
    const TICK_BITS: u32 = 16;
}

/// 16 MHz, divide by 1024, 8-bit counter.
///
/// 16384 us per overflow: MILLIS_INC = 16, FRACT_INC = 48.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CoarseConfig;

impl ClockConfig for CoarseConfig {
    const CPU_HZ: u32 = 16_000_000;
    const PRESCALER: Prescaler = Prescaler::Div1024;
    const TICK_BITS: u32 = 8;
}
