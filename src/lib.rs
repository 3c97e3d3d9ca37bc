//! # millis-clock
//!
//! Interrupt-driven `millis()` / `micros()` timekeeping for bare-metal
//! microcontrollers, with zero heap allocation.
//!
//! **Key features:**
//! - **Exact long-run millis** - Fixed-point fractional accumulator, no drift from truncation
//! - **Torn-free reads** - Every multi-byte read happens inside a critical section
//! - **Portable core** - Timer registers behind the small `TimerHw` trait
//! - **Compile-time configuration** - CPU clock, prescaler and counter width as consts
//! - **Simulated timer** - `SimTimer` for host tests and demos
//!
//! The application owns one [`Clock`] per physical timer, installs it in a
//! [`ClockBinding`] so the overflow interrupt vector can reach it, and then
//! enables interrupts globally.
//!
//! ## Optional Features
//!
//! - `atmega328p` - `TimerHw` implementation for ATmega328P Timer/Counter 0
//! - `async` - `Clock::wait_millis()` future
//!
//! A `critical-section` implementation must be linked in by the application
//! (e.g. `avr-device` with `critical-section-impl`, or `critical-section/std`
//! on a host).
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// ============================================================================
// Module Declarations
// ============================================================================

pub mod clock;
pub mod config;
pub mod error;
pub mod hal;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Clock and its companions
pub use clock::{Clock, ClockBinding, ClockState, Delay, Interval, MicrosInstant, MillisInstant};

#[cfg(feature = "async")]
pub use clock::WaitMillis;

// Configuration
pub use config::{ClockConfig, DefaultConfig, Prescaler, SlowClockConfig};

// Error types
pub use error::ClockError;

// Hardware abstraction
pub use hal::TimerHw;
pub use hal::sim::SimTimer;

// Duration types used across the API
pub use fugit::{MicrosDurationU32, MillisDurationU32};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
