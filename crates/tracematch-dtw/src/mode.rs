//! Alignment mode and step penalties.

use std::fmt;

use crate::error::DtwError;

/// Which accumulated-cost variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlignmentMode {
    /// The whole query is aligned against the whole reference.
    Full,
    /// The query is aligned against the best-matching sub-range of the
    /// reference; the path may start and end at any reference column.
    #[default]
    Subsequence,
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Subsequence => f.write_str("subsequence"),
        }
    }
}

/// Additive step penalties applied inside the accumulated-cost recurrence.
///
/// `diagonal` is added to vertical (query-only) predecessors and
/// `off_diagonal` to horizontal (reference-only) predecessors, to the column-0
/// seed, and to the last-row terminal bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penalty {
    diagonal: f64,
    off_diagonal: f64,
}

impl Penalty {
    /// No penalty on either step.
    pub const ZERO: Self = Self {
        diagonal: 0.0,
        off_diagonal: 0.0,
    };

    /// Create a penalty pair.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidPenalty`] | Either value is negative, NaN, or infinite |
    pub fn new(diagonal: f64, off_diagonal: f64) -> Result<Self, DtwError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(diagonal) || !valid(off_diagonal) {
            return Err(DtwError::InvalidPenalty {
                diagonal,
                off_diagonal,
            });
        }
        Ok(Self {
            diagonal,
            off_diagonal,
        })
    }

    /// Return the vertical-step penalty.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.diagonal
    }

    /// Return the horizontal-step penalty.
    #[must_use]
    pub fn off_diagonal(&self) -> f64 {
        self.off_diagonal
    }

    /// Terminal bias added to last-row column `col` of a matrix `width` wide.
    ///
    /// Clamped at zero so small penalties never produce negative entries.
    #[must_use]
    pub(crate) fn terminal_bias(&self, width: usize, col: usize) -> f64 {
        (self.off_diagonal * width as f64 - col as f64).max(0.0)
    }
}

impl Default for Penalty {
    fn default() -> Self {
        Self {
            diagonal: 0.0,
            off_diagonal: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_penalty() {
        let p = Penalty::default();
        assert_eq!(p.diagonal(), 0.0);
        assert_eq!(p.off_diagonal(), 5.0);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(matches!(
            Penalty::new(-1.0, 5.0),
            Err(DtwError::InvalidPenalty { .. })
        ));
        assert!(matches!(
            Penalty::new(0.0, f64::NAN),
            Err(DtwError::InvalidPenalty { .. })
        ));
        assert!(matches!(
            Penalty::new(f64::INFINITY, 0.0),
            Err(DtwError::InvalidPenalty { .. })
        ));
    }

    #[test]
    fn terminal_bias_decreases_with_column() {
        let p = Penalty::default();
        assert_eq!(p.terminal_bias(6, 0), 30.0);
        assert_eq!(p.terminal_bias(6, 5), 25.0);
    }

    #[test]
    fn terminal_bias_is_clamped() {
        assert_eq!(Penalty::ZERO.terminal_bias(4, 3), 0.0);
        let small = Penalty::new(0.0, 0.5).unwrap();
        assert_eq!(small.terminal_bias(4, 0), 2.0);
        assert_eq!(small.terminal_bias(4, 3), 0.0);
    }

    #[test]
    fn mode_display() {
        assert_eq!(AlignmentMode::Full.to_string(), "full");
        assert_eq!(AlignmentMode::Subsequence.to_string(), "subsequence");
    }
}
