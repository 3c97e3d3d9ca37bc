//! Static binding point between a clock and its interrupt vector.
//!
//! Interrupt vectors are free functions, so the clock they drive has to be
//! reachable from a `static`. `ClockBinding` is that one designated place: it
//! starts empty, accepts a single clock at startup, and forwards the overflow
//! interrupt to it.
//!
//! ```ignore
//! static CLOCK: ClockBinding<TC0> = ClockBinding::new();
//!
//! #[avr_device::interrupt(atmega328p)]
//! fn TIMER0_OVF() {
//!     CLOCK.on_overflow();
//! }
//! ```

use core::cell::OnceCell;
use core::fmt;

use critical_section::Mutex;

use super::{Clock, MillisInstant};
use crate::config::{ClockConfig, DefaultConfig};
use crate::error::ClockError;
use crate::hal::TimerHw;

/// Once-initialized holder for the clock of one physical timer.
pub struct ClockBinding<H, C = DefaultConfig> {
    slot: Mutex<OnceCell<Clock<H, C>>>,
}

impl<H: TimerHw, C: ClockConfig> ClockBinding<H, C> {
    /// Empty binding, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(OnceCell::new()),
        }
    }

    /// Store `clock` and run its [`Clock::initialize`].
    ///
    /// A second install is rejected with `ClockError::AlreadyBound`; the first
    /// clock stays bound and is not re-initialized.
    pub fn install(&self, clock: Clock<H, C>) -> Result<(), ClockError> {
        let stored = critical_section::with(|cs| self.slot.borrow(cs).set(clock).is_ok());
        if !stored {
            log::warn!("clock binding: already installed");
            return Err(ClockError::AlreadyBound);
        }

        self.with(|clock| clock.initialize());
        log::debug!("clock binding: installed");
        Ok(())
    }

    /// True once a clock has been installed.
    pub fn is_bound(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().is_some())
    }

    /// Run `f` against the bound clock, or return `None` if nothing is bound.
    ///
    /// `f` runs inside a critical section: keep it short and never wait on the
    /// clock from inside it.
    pub fn with<R>(&self, f: impl FnOnce(&Clock<H, C>) -> R) -> Option<R> {
        critical_section::with(|cs| self.slot.borrow(cs).get().map(f))
    }

    /// Overflow interrupt trampoline. Does nothing while unbound.
    pub fn on_overflow(&self) {
        self.with(|clock| clock.on_overflow());
    }

    /// [`Clock::millis`] of the bound clock.
    pub fn millis(&self) -> Option<u32> {
        self.with(|clock| clock.millis())
    }

    /// [`Clock::micros`] of the bound clock.
    pub fn micros(&self) -> Option<u32> {
        self.with(|clock| clock.micros())
    }

    /// [`Clock::now`] of the bound clock.
    pub fn now(&self) -> Option<MillisInstant> {
        self.with(|clock| clock.now())
    }
}

impl<H: TimerHw, C: ClockConfig> Default for ClockBinding<H, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, C> fmt::Debug for ClockBinding<H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        critical_section::with(|cs| match self.slot.borrow(cs).get() {
            Some(clock) => f.debug_tuple("ClockBinding").field(clock).finish(),
            None => f.write_str("ClockBinding(<unbound>)"),
        })
    }
}
