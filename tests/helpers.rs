//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]

use millis_clock::config::ClockConfig;
use millis_clock::hal::sim::SimTimer;
use millis_clock::{Clock, ClockState};

// ============================================================================
// Clock Creation Helpers
// ============================================================================

/// Create a clock on `sim` and run its configurator.
pub fn running_clock<C: ClockConfig>(sim: &SimTimer<C>) -> Clock<&SimTimer<C>, C> {
    let clock = Clock::new(sim);
    clock.initialize();
    clock
}

// ============================================================================
// Simulation Helpers
// ============================================================================

/// Run the simulated timer through `n` full overflow periods, delivering each
/// interrupt to the clock.
pub fn run_overflows<C: ClockConfig>(sim: &SimTimer<C>, clock: &Clock<&SimTimer<C>, C>, n: u32) {
    let fired = sim.step(n * C::TICKS_PER_OVERFLOW, || clock.on_overflow());
    assert_eq!(fired, n, "simulated timer delivered {} of {} overflows", fired, n);
}

/// Apply `n` overflow events to a fresh state without any hardware.
pub fn state_after<C: ClockConfig>(n: u32) -> ClockState {
    let mut state = ClockState::new();
    for _ in 0..n {
        state = state.advance::<C>();
    }
    state
}

/// Exact elapsed milliseconds after `n` overflows: floor(n * period_us / 1000).
pub fn exact_millis<C: ClockConfig>(n: u64) -> u64 {
    n * C::MICROS_PER_OVERFLOW as u64 / 1000
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that a sequence of readings never goes backwards.
pub fn assert_non_decreasing(readings: &[u32]) {
    for pair in readings.windows(2) {
        assert!(
            pair[1] >= pair[0],
            "Reading went backwards: {} then {}",
            pair[0],
            pair[1]
        );
    }
}
