// fixed.rs - Four-decimal fixed-point values for betas and treatment bins
//
// Every value that takes part in a set lookup (candidate betas, reference
// betas, treatment bins) goes through `Fixed`, so two values compare equal
// exactly when they agree after rounding to four decimal places.

use std::fmt;

/// Units per 1.0.
pub const SCALE: f64 = 10_000.0;

/// A value held in ten-thousandths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i64);

impl Fixed {
    pub fn from_f64(x: f64) -> Self {
        Fixed((x * SCALE).round() as i64)
    }

    pub fn units(self) -> i64 {
        self.0
    }

    pub fn value(self) -> f64 {
        self.0 as f64 / SCALE
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl From<f64> for Fixed {
    fn from(x: f64) -> Self {
        Fixed::from_f64(x)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
