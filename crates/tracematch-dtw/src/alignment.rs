//! Alignment results.

use crate::accumulated::AccumulatedCostMatrix;
use crate::cost::CostMatrix;
use crate::distance::AlignmentCost;
use crate::path::WarpingPath;
use crate::subsequence::ExaminedColumn;

/// Borrowed view of an alignment: the optimal path, its cost, and the
/// accumulated-cost matrix it was extracted from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment<'a> {
    /// Optimal warping path.
    pub path: &'a WarpingPath,
    /// Sum of accumulated-cost entries along `path`.
    pub cost: AlignmentCost,
    /// Matrix the path was extracted from.
    pub matrix: &'a AccumulatedCostMatrix,
}

impl Alignment<'_> {
    /// Return the reference column the path ends at.
    #[must_use]
    pub fn end_column(&self) -> usize {
        self.path.end_column().unwrap_or(0)
    }
}

/// Owned result of one alignment: both matrices plus the extracted path.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub(crate) cost_matrix: CostMatrix,
    pub(crate) accumulated: AccumulatedCostMatrix,
    pub(crate) path: WarpingPath,
    pub(crate) cost: AlignmentCost,
    pub(crate) examined: Vec<ExaminedColumn>,
}

impl Solution {
    /// Borrow as an [`Alignment`].
    #[must_use]
    pub fn alignment(&self) -> Alignment<'_> {
        Alignment {
            path: &self.path,
            cost: self.cost,
            matrix: &self.accumulated,
        }
    }

    /// Return the local-cost matrix.
    #[must_use]
    pub fn cost_matrix(&self) -> &CostMatrix {
        &self.cost_matrix
    }

    /// Return the accumulated-cost matrix.
    #[must_use]
    pub fn accumulated(&self) -> &AccumulatedCostMatrix {
        &self.accumulated
    }

    /// Return the optimal path.
    #[must_use]
    pub fn path(&self) -> &WarpingPath {
        &self.path
    }

    /// Return the path cost.
    #[must_use]
    pub fn cost(&self) -> AlignmentCost {
        self.cost
    }

    /// Return the end columns tried in subsequence mode. Empty in full mode.
    #[must_use]
    pub fn examined(&self) -> &[ExaminedColumn] {
        &self.examined
    }
}
