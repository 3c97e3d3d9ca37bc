//! Host simulation of the blink example.
//!
//! A background thread plays Timer/Counter 0: it runs a `SimTimer` at roughly
//! real time and delivers each overflow interrupt through the clock binding.
//! The main loop is the same superloop the ATmega328P demo runs, printing the
//! LED state instead of toggling a pin.

use std::thread;
use std::time::Duration;

use log::{Level, LevelFilter, Log, Metadata, Record};
use millis_clock::{Clock, ClockBinding, ClockConfig, DefaultConfig, Interval, MillisDurationU32, SimTimer};

// =============================================================================
// Simulated Hardware
// =============================================================================

static TIMER: SimTimer = SimTimer::new();
static CLOCK: ClockBinding<&'static SimTimer> = ClockBinding::new();

const FLASH_PERIOD: MillisDurationU32 = MillisDurationU32::from_ticks(1000);
const TOGGLES: u32 = 6;

/// Run the timer one overflow period at a time, delivering its interrupt.
fn run_timer() {
    let period = Duration::from_micros(DefaultConfig::MICROS_PER_OVERFLOW as u64);
    loop {
        TIMER.step(DefaultConfig::TICKS_PER_OVERFLOW, || CLOCK.on_overflow());
        thread::sleep(period);
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Minimal stdout logger so the clock's debug records are visible.
struct StdoutLogger;

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StdoutLogger = StdoutLogger;

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(LevelFilter::Debug))
        .ok();

    CLOCK
        .install(Clock::new(&TIMER))
        .expect("clock binding installed twice");

    thread::spawn(run_timer);

    let mut interval = Interval::new(FLASH_PERIOD);
    let mut led = false;
    let mut toggles = 0;

    while toggles < TOGGLES {
        if let Some(now) = CLOCK.now()
            && interval.poll(now)
        {
            led = !led;
            toggles += 1;
            println!(
                "{:>6} ms  {:>9} us  LED {}",
                now.ticks(),
                CLOCK.micros().unwrap_or(0),
                if led { "on" } else { "off" }
            );
        }
        thread::sleep(Duration::from_millis(1));
    }
}
