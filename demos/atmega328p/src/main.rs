//! ATmega328P (Arduino Uno) blink example
//!
//! Toggles the built-in LED every second, timed by `millis()` on
//! Timer/Counter 0.
//!
//! # Hardware Setup
//! - Board: Arduino Uno (16 MHz)
//! - LED: D13 / PB5

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use avr_device::atmega328p::{Peripherals, TC0};
use panic_halt as _;

use millis_clock::{Clock, ClockBinding, Interval, MillisDurationU32};

// =============================================================================
// Clock Binding
// =============================================================================

/// The one clock for Timer/Counter 0
static CLOCK: ClockBinding<TC0> = ClockBinding::new();

const FLASH_PERIOD: MillisDurationU32 = MillisDurationU32::from_ticks(1000);

#[avr_device::interrupt(atmega328p)]
fn TIMER0_OVF() {
    CLOCK.on_overflow();
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[avr_device::entry]
fn main() -> ! {
    let dp = Peripherals::take().unwrap();

    CLOCK.install(Clock::new(dp.TC0)).ok();

    // D13/PB5 = OUTPUT
    dp.PORTB.ddrb().modify(|_, w| w.pb5().set_bit());

    // The clock only enables its own interrupt source
    unsafe { avr_device::interrupt::enable() };

    let mut interval = Interval::new(FLASH_PERIOD);

    loop {
        if let Some(now) = CLOCK.now()
            && interval.poll(now)
        {
            // Writing a one to PINB5 toggles the pin
            dp.PORTB.pinb().write(|w| w.pb5().set_bit());
        }
    }
}
