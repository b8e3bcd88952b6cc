//! Pairwise local-cost matrix.

use tracing::instrument;

use crate::error::DtwError;
use crate::matrix::Matrix;
use crate::point::Point;

/// `N_query x N_reference` matrix of squared Euclidean distances.
///
/// Entry `(n, m)` is `|q[n] - r[m]|^2`. The width is fixed to the reference
/// length; the matrix grows by one row per appended query point.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix(Matrix);

impl CostMatrix {
    /// Compute the full cost matrix for `query` against `reference`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySequence`] | `query` or `reference` is empty |
    #[instrument(skip(query, reference), fields(n = query.len(), m = reference.len()))]
    pub fn compute<const D: usize>(
        query: &[Point<D>],
        reference: &[Point<D>],
    ) -> Result<Self, DtwError> {
        if query.is_empty() || reference.is_empty() {
            return Err(DtwError::EmptySequence);
        }
        let mut cost = Self(Matrix::with_width(reference.len()));
        cost.append_rows(query, reference);
        Ok(cost)
    }

    /// Append one row per point of `points`.
    ///
    /// `reference` must be the sequence the matrix was computed against.
    pub fn append_rows<const D: usize>(&mut self, points: &[Point<D>], reference: &[Point<D>]) {
        debug_assert_eq!(reference.len(), self.0.width());
        for q in points {
            self.0
                .push_row(reference.iter().map(|r| q.squared_distance(r)));
        }
    }

    pub(crate) fn truncate_rows(&mut self, rows: usize) {
        self.0.truncate_rows(rows);
    }

    /// Return the number of query rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.0.rows()
    }

    /// Return the reference length.
    #[must_use]
    pub fn width(&self) -> usize {
        self.0.width()
    }

    /// Return the underlying grid.
    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.0
    }

    /// Return the local cost at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of range.
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }
}
