//! Alignment cost newtype wrapper.

use std::cmp::Ordering;
use std::fmt;

/// Non-negative cost of a warping path: the sum of accumulated-cost entries
/// over every visited cell.
///
/// The value is in squared-distance units; [`distance`](Self::distance) takes
/// the square root for human-readable reporting.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AlignmentCost(f64);

impl AlignmentCost {
    /// Infinite cost, used as the identity of a running minimum.
    pub const INFINITY: Self = Self(f64::INFINITY);

    /// Create a cost from a raw value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw cost value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return the square root of the cost.
    #[must_use]
    pub fn distance(self) -> f64 {
        self.0.sqrt()
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for AlignmentCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
