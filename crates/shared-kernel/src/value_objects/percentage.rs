// crates/shared-kernel/src/value_objects/percentage.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// A percentage in `[0, 100]`, rounded to two decimals.
///
/// Constructed from a ratio so that an empty denominator yields `0` instead of NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Percentage {
    pub const ZERO: Self = Self(0.0);
    pub const FULL: Self = Self(100.0);

    /// `part / whole * 100`, rounded to two decimals. Returns zero when `whole` is zero.
    #[must_use]
    pub fn from_ratio(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        #[allow(clippy::cast_precision_loss)]
        let raw = part as f64 / whole as f64 * 100.0;
        Self::new(raw)
    }

    /// Clamps to `[0, 100]` and rounds to two decimals. Non-finite input becomes zero.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self(round2(value.clamp(0.0, 100.0)))
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_below(self, threshold: f64) -> bool {
        self.0 < threshold
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl From<Percentage> for f64 {
    fn from(value: Percentage) -> Self {
        value.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_is_zero() {
        assert_eq!(Percentage::from_ratio(0, 0), Percentage::ZERO);
        assert_eq!(Percentage::from_ratio(5, 0), Percentage::ZERO);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(Percentage::from_ratio(1, 3).value(), 33.33);
        assert_eq!(Percentage::from_ratio(2, 3).value(), 66.67);
    }

    #[test]
    fn non_finite_becomes_zero() {
        assert_eq!(Percentage::new(f64::NAN), Percentage::ZERO);
        assert_eq!(Percentage::new(250.0), Percentage::FULL);
    }
}
