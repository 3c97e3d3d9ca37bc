//! ATmega328P Timer/Counter 0 binding.
//!
//! Takes over TC0 and its overflow interrupt. Output-compare and PWM functions
//! of the timer are left unconfigured.

use avr_device::atmega328p::TC0;

use super::TimerHw;
use crate::config::Prescaler;

impl TimerHw for TC0 {
    const TICK_BITS: u32 = 8;

    fn configure(&self, prescaler: Prescaler) {
        // Normal mode: WGM0 = 0, no compare outputs
        self.tccr0a().reset();
        self.timsk0().reset();
        self.tccr0b().write(|w| match prescaler {
            Prescaler::Div1 => w.cs0().direct(),
            Prescaler::Div8 => w.cs0().prescale_8(),
            Prescaler::Div64 => w.cs0().prescale_64(),
            Prescaler::Div256 => w.cs0().prescale_256(),
            Prescaler::Div1024 => w.cs0().prescale_1024(),
        });
    }

    fn clear_pending_overflow(&self) {
        // TOV0 is cleared by writing a one
        self.tifr0().write(|w| w.tov0().set_bit());
    }

    fn enable_overflow_interrupt(&self) {
        self.timsk0().modify(|_, w| w.toie0().set_bit());
    }

    fn read_tick(&self) -> u32 {
        self.tcnt0().read().bits().into()
    }

    fn is_overflow_pending(&self) -> bool {
        self.tifr0().read().tov0().bit_is_set()
    }
}
