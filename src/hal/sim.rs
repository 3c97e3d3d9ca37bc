//! Software model of a timer peripheral.
//!
//! `SimTimer` behaves like the hardware the clock is written against: a counter
//! that wraps at `2^TICK_BITS`, an overflow flag that is set on wrap and cleared
//! when the interrupt is delivered, and an interrupt enable bit. Time only moves
//! when the owner calls [`SimTimer::advance`] or [`SimTimer::step`], which makes
//! race windows reproducible in tests and host demos.

use core::cell::{Cell, RefCell};
use core::fmt;
use core::marker::PhantomData;

use critical_section::Mutex;

use super::TimerHw;
use crate::config::{ClockConfig, DefaultConfig, Prescaler};

/// Capacity of the configuration log
pub const EVENT_LOG_SIZE: usize = 8;

/// Register write recorded by `SimTimer`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HwEvent {
    /// `configure()` selected this clock-divide ratio
    Configured(Prescaler),
    /// Pending overflow flag cleared
    PendingCleared,
    /// Overflow interrupt enabled
    InterruptEnabled,
}

#[derive(Copy, Clone)]
struct Registers {
    tick: u32,
    pending: bool,
    interrupt_enabled: bool,
    prescaler: Option<Prescaler>,
}

impl Registers {
    const fn reset() -> Self {
        Self {
            tick: 0,
            pending: false,
            interrupt_enabled: false,
            prescaler: None,
        }
    }
}

/// Simulated timer/counter.
///
/// The counter is stopped until `configure()` selects a prescaler, as on AVR
/// where a zero clock-select field leaves the timer halted.
///
/// `C` sets the counter width and must match the configuration of the clock
/// driving it; `Clock::new` rejects a mismatched pair at compile time.
pub struct SimTimer<C = DefaultConfig> {
    regs: Mutex<Cell<Registers>>,
    events: Mutex<RefCell<heapless::Vec<HwEvent, EVENT_LOG_SIZE>>>,
    _config: PhantomData<fn() -> C>,
}

impl<C: ClockConfig> SimTimer<C> {
    /// Create a stopped timer with all registers cleared.
    pub const fn new() -> Self {
        Self {
            regs: Mutex::new(Cell::new(Registers::reset())),
            events: Mutex::new(RefCell::new(heapless::Vec::new())),
            _config: PhantomData,
        }
    }

    /// Current counter value.
    pub fn tick(&self) -> u32 {
        self.regs().tick
    }

    /// Prescaler selected by the last `configure()`, if any.
    pub fn prescaler(&self) -> Option<Prescaler> {
        self.regs().prescaler
    }

    /// True once `enable_overflow_interrupt()` has run.
    pub fn is_interrupt_enabled(&self) -> bool {
        self.regs().interrupt_enabled
    }

    /// Register writes in the order they happened (oldest first).
    ///
    /// Writes beyond `EVENT_LOG_SIZE` are not recorded.
    pub fn events(&self) -> heapless::Vec<HwEvent, EVENT_LOG_SIZE> {
        critical_section::with(|cs| self.events.borrow(cs).borrow().clone())
    }

    /// Force the counter to a value (masked to the counter width).
    pub fn set_tick(&self, tick: u32) {
        self.update(|regs| regs.tick = tick & C::MAX_TICK);
    }

    /// Force the overflow flag.
    pub fn set_pending(&self, pending: bool) {
        self.update(|regs| regs.pending = pending);
    }

    /// Run the counter forward by `ticks` without delivering the interrupt.
    ///
    /// Models time passing while interrupts are masked. Returns the number of
    /// wraps; any wrap leaves the overflow flag set. A stopped counter does not
    /// move.
    pub fn advance(&self, ticks: u32) -> u32 {
        let mut wraps = 0;
        self.update(|regs| {
            if regs.prescaler.is_none() {
                return;
            }
            let total = regs.tick as u64 + ticks as u64;
            let period = C::TICKS_PER_OVERFLOW as u64;
            wraps = (total / period) as u32;
            regs.tick = (total % period) as u32;
            if wraps > 0 {
                regs.pending = true;
            }
        });
        wraps
    }

    /// Deliver a pending overflow interrupt.
    ///
    /// If the flag is set and the interrupt is enabled, clears the flag and runs
    /// `isr` inside the same critical section, as the hardware does on vector
    /// entry. Returns true if `isr` ran.
    pub fn service(&self, isr: impl FnOnce()) -> bool {
        critical_section::with(|cs| {
            let cell = self.regs.borrow(cs);
            let mut regs = cell.get();
            if !(regs.pending && regs.interrupt_enabled) {
                return false;
            }
            regs.pending = false;
            cell.set(regs);
            isr();
            true
        })
    }

    /// Run the counter one tick at a time, delivering every overflow interrupt
    /// as it happens. Returns the number of interrupts delivered.
    pub fn step(&self, ticks: u32, mut isr: impl FnMut()) -> u32 {
        let mut fired = 0;
        for _ in 0..ticks {
            self.advance(1);
            if self.service(&mut isr) {
                fired += 1;
            }
        }
        fired
    }

    fn regs(&self) -> Registers {
        critical_section::with(|cs| self.regs.borrow(cs).get())
    }

    fn update(&self, f: impl FnOnce(&mut Registers)) {
        critical_section::with(|cs| {
            let cell = self.regs.borrow(cs);
            let mut regs = cell.get();
            f(&mut regs);
            cell.set(regs);
        });
    }

    fn record(&self, event: HwEvent) {
        critical_section::with(|cs| {
            let _ = self.events.borrow(cs).borrow_mut().push(event);
        });
    }
}

impl<C: ClockConfig> Default for SimTimer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for SimTimer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regs = critical_section::with(|cs| self.regs.borrow(cs).get());
        f.debug_struct("SimTimer")
            .field("tick", &regs.tick)
            .field("pending", &regs.pending)
            .field("interrupt_enabled", &regs.interrupt_enabled)
            .field("prescaler", &regs.prescaler)
            .finish()
    }
}

impl<C: ClockConfig> TimerHw for SimTimer<C> {
    const TICK_BITS: u32 = C::TICK_BITS;

    fn configure(&self, prescaler: Prescaler) {
        self.update(|regs| regs.prescaler = Some(prescaler));
        self.record(HwEvent::Configured(prescaler));
    }

    fn clear_pending_overflow(&self) {
        self.update(|regs| regs.pending = false);
        self.record(HwEvent::PendingCleared);
    }

    fn enable_overflow_interrupt(&self) {
        self.update(|regs| regs.interrupt_enabled = true);
        self.record(HwEvent::InterruptEnabled);
    }

    fn read_tick(&self) -> u32 {
        self.tick()
    }

    fn is_overflow_pending(&self) -> bool {
        self.regs().pending
    }
}
