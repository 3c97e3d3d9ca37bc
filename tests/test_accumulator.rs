//! Overflow accumulator tests.
//!
//! Validates the fixed-point millisecond accumulator:
//! - Constants derived from the overflow period
//! - Long-run exactness against floor(N * period / 1000)
//! - Fraction bound after every event
//! - Leap millisecond placement

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
mod fixtures;

#[allow(clippy::duplicate_mod)]
#[path = "helpers.rs"]
mod helpers;

use fixtures::{CoarseConfig, WideTimerConfig};
use millis_clock::config::{ClockConfig, DefaultConfig, SlowClockConfig};
use millis_clock::ClockState;

// ============================================================================
// Constant Derivation Tests
// ============================================================================

#[test]
fn test_constants_for_1024us_period() {
    assert_eq!(DefaultConfig::MICROS_PER_OVERFLOW, 1024);
    assert_eq!(DefaultConfig::MILLIS_INC, 1);
    assert_eq!(DefaultConfig::FRACT_INC, 3);
    assert_eq!(DefaultConfig::FRACT_MAX, 125);
}

#[test]
fn test_constants_for_coarse_prescaler() {
    assert_eq!(CoarseConfig::MICROS_PER_OVERFLOW, 16_384);
    assert_eq!(CoarseConfig::MILLIS_INC, 16);
    assert_eq!(CoarseConfig::FRACT_INC, 48);
    assert_eq!(CoarseConfig::MICROS_PER_TICK, 64);
}

#[test]
fn test_leap_within_42_events() {
    // 125 / 3 rounds up to 42
    let state = helpers::state_after::<DefaultConfig>(42);
    assert!(state.millis() > 42 * DefaultConfig::MILLIS_INC);
    assert_eq!(state.millis(), 43);

    let state = helpers::state_after::<DefaultConfig>(41);
    assert_eq!(state.millis(), 41);
}

// ============================================================================
// Exactness Tests
// ============================================================================

fn assert_tracks_exact<C: ClockConfig>(events: u32) {
    let mut state = ClockState::new();
    for n in 1..=events as u64 {
        state = state.advance::<C>();
        let exact = helpers::exact_millis::<C>(n);
        let got = state.millis() as u64;
        assert!(
            got.abs_diff(exact) <= 1,
            "after {} overflows: millis {} vs exact {}",
            n,
            got,
            exact
        );
    }
}

#[test]
fn test_default_config_never_drifts() {
    assert_tracks_exact::<DefaultConfig>(200_000);
}

#[test]
fn test_slow_clock_never_drifts() {
    assert_tracks_exact::<SlowClockConfig>(100_000);
}

#[test]
fn test_coarse_config_never_drifts() {
    assert_tracks_exact::<CoarseConfig>(100_000);
}

#[test]
fn test_wide_timer_never_drifts() {
    assert_tracks_exact::<WideTimerConfig>(50_000);
}

#[test]
fn test_default_config_is_exact_not_just_close() {
    // 1024 us leaves a remainder divisible by 8, so nothing is truncated
    for n in [1u32, 41, 42, 125, 1000, 123_456] {
        let state = helpers::state_after::<DefaultConfig>(n);
        assert_eq!(
            state.millis() as u64,
            helpers::exact_millis::<DefaultConfig>(n as u64)
        );
    }
}

// ============================================================================
// Invariant Tests
// ============================================================================

#[test]
fn test_fraction_bound_after_every_event() {
    fn check<C: ClockConfig>() {
        let mut state = ClockState::new();
        for _ in 0..5_000 {
            state = state.advance::<C>();
            assert!(state.fraction() < C::FRACT_MAX);
        }
    }

    check::<DefaultConfig>();
    check::<SlowClockConfig>();
    check::<CoarseConfig>();
    check::<WideTimerConfig>();
}

#[test]
fn test_millis_non_decreasing_between_events() {
    let mut state = ClockState::new();
    for _ in 0..5_000 {
        let next = state.advance::<DefaultConfig>();
        let step = next.millis() - state.millis();
        assert!(step == 1 || step == 2, "unexpected step {}", step);
        state = next;
    }
}

#[test]
fn test_overflow_count_matches_events() {
    let state = helpers::state_after::<CoarseConfig>(777);
    assert_eq!(state.overflow_count(), 777);
}
