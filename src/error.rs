//! Error types for clock operations.
//!
//! The timekeeping core itself cannot fail. `ClockError` covers the two
//! fallible operations around it: forcing the raw fraction state and binding a
//! clock to its interrupt dispatch point.

use core::fmt;

/// Clock error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Fraction value would break the `fraction < FRACT_MAX` invariant
    FractionOutOfRange {
        /// Rejected value
        value: u8,
        /// Exclusive upper bound (`FRACT_MAX`)
        max: u8,
    },

    /// A clock is already bound to this dispatch point
    AlreadyBound,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::FractionOutOfRange { value, max } => {
                write!(f, "Fraction {} out of range (must be below {})", value, max)
            }
            ClockError::AlreadyBound => write!(f, "Clock already bound"),
        }
    }
}
