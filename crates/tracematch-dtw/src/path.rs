//! Warping path types and backtracking.

use crate::accumulated::AccumulatedCostMatrix;
use crate::distance::AlignmentCost;
use crate::error::DtwError;

/// A single step in a warping path, mapping query index `query` to reference
/// index `reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WarpingStep {
    /// Index in the query sequence (matrix row).
    pub query: usize,
    /// Index in the reference sequence (matrix column).
    pub reference: usize,
}

impl WarpingStep {
    /// Create a step.
    #[must_use]
    pub const fn new(query: usize, reference: usize) -> Self {
        Self { query, reference }
    }
}

impl From<(usize, usize)> for WarpingStep {
    fn from((query, reference): (usize, usize)) -> Self {
        Self { query, reference }
    }
}

/// Ordered warping steps from row 0 to the last query row.
///
/// Consecutive steps advance by `(1, 1)`, `(1, 0)`, or `(0, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    /// Create a warping path from a vector of steps.
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the first step.
    #[must_use]
    pub fn first(&self) -> Option<&WarpingStep> {
        self.0.first()
    }

    /// Return the last step.
    #[must_use]
    pub fn last(&self) -> Option<&WarpingStep> {
        self.0.last()
    }

    /// Return the reference column the path ends at.
    #[must_use]
    pub fn end_column(&self) -> Option<usize> {
        self.0.last().map(|s| s.reference)
    }

    /// Return true if every consecutive pair advances by exactly one of the
    /// three allowed moves.
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.0.windows(2).all(|w| {
            let dq = w[1].query.wrapping_sub(w[0].query);
            let dr = w[1].reference.wrapping_sub(w[0].reference);
            matches!((dq, dr), (1, 1) | (1, 0) | (0, 1))
        })
    }

    /// Count the diagonal `(1, 1)` moves.
    #[must_use]
    pub fn diagonal_moves(&self) -> usize {
        self.0
            .windows(2)
            .filter(|w| w[1].query == w[0].query + 1 && w[1].reference == w[0].reference + 1)
            .count()
    }

    /// Return `(query, reference)` tuples for serialization and tests.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(usize, usize)> {
        self.0.iter().map(|s| (s.query, s.reference)).collect()
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Backtrack an optimal path ending at `(N - 1, end_column)`.
///
/// `end_column` defaults to the last column. At row 0 the walk moves left, at
/// column 0 it moves up; elsewhere it follows the cheapest predecessor, with
/// ties broken diagonal, then up, then left.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::EmptySequence`] | The matrix has no rows or columns |
/// | [`DtwError::ColumnOutOfRange`] | `end_column >= width` |
pub fn backtrack(
    matrix: &AccumulatedCostMatrix,
    end_column: Option<usize>,
) -> Result<(WarpingPath, AlignmentCost), DtwError> {
    let rows = matrix.rows();
    let width = matrix.width();
    if rows == 0 || width == 0 {
        return Err(DtwError::EmptySequence);
    }
    let end = end_column.unwrap_or(width - 1);
    if end >= width {
        return Err(DtwError::ColumnOutOfRange { column: end, width });
    }

    let (mut n, mut m) = (rows - 1, end);
    let mut steps = Vec::with_capacity(rows + end);
    steps.push(WarpingStep::new(n, m));
    while n > 0 || m > 0 {
        if n == 0 {
            m -= 1;
        } else if m == 0 {
            n -= 1;
        } else {
            let diag = matrix.at(n - 1, m - 1);
            let up = matrix.at(n - 1, m);
            let left = matrix.at(n, m - 1);
            if diag <= up && diag <= left {
                n -= 1;
                m -= 1;
            } else if up <= left {
                n -= 1;
            } else {
                m -= 1;
            }
        }
        steps.push(WarpingStep::new(n, m));
    }
    steps.reverse();

    let path = WarpingPath::new(steps);
    let cost = cost_of_path(matrix, &path);
    Ok((path, cost))
}

/// Sum the accumulated-cost entries over every cell of `path`.
///
/// # Panics
///
/// Panics if a step lies outside `matrix`.
#[must_use]
pub fn cost_of_path(matrix: &AccumulatedCostMatrix, path: &WarpingPath) -> AlignmentCost {
    AlignmentCost::new(path.into_iter().map(|s| matrix.at(s.query, s.reference)).sum())
}
