//! Accumulated-cost recurrence for full and subsequence alignment.

use tracing::{debug, instrument};

use crate::cost::CostMatrix;
use crate::error::DtwError;
use crate::matrix::Matrix;
use crate::mode::{AlignmentMode, Penalty};

/// Accumulated-cost matrix `D` built from a [`CostMatrix`].
///
/// The last row carries a terminal bias of `max(0, off_diagonal * M - m)`.
/// Which row holds that bias is tracked explicitly: once rows are appended it
/// is no longer the last row, so [`extend`](Self::extend) restarts the
/// recurrence from it to strip the bias before filling the new rows.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedCostMatrix {
    mode: AlignmentMode,
    penalty: Penalty,
    grid: Matrix,
    biased_row: usize,
}

impl AccumulatedCostMatrix {
    /// Run the recurrence over every row of `cost`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySequence`] | `cost` has no rows or no columns |
    #[instrument(skip(cost), fields(n = cost.rows(), m = cost.width(), %mode))]
    pub fn compute(
        cost: &CostMatrix,
        mode: AlignmentMode,
        penalty: Penalty,
    ) -> Result<Self, DtwError> {
        if cost.rows() == 0 || cost.width() == 0 {
            return Err(DtwError::EmptySequence);
        }
        let mut grid = Matrix::with_width(cost.width());
        grid.push_zero_rows(cost.rows());
        let mut acc = Self {
            mode,
            penalty,
            grid,
            biased_row: 0,
        };
        acc.fill_from(cost, 0);
        Ok(acc)
    }

    /// Grow to match `cost` after rows were appended to it.
    ///
    /// Recomputes from the previously biased row through the new last row.
    /// Does nothing when `cost` has no new rows.
    pub fn extend(&mut self, cost: &CostMatrix) {
        debug_assert_eq!(cost.width(), self.grid.width());
        let have = self.grid.rows();
        let want = cost.rows();
        if want <= have {
            return;
        }
        self.grid.push_zero_rows(want - have);
        let from = self.biased_row;
        debug!(from, appended = want - have, "recomputing accumulated rows");
        self.fill_from(cost, from);
    }

    /// Shrink back to `cost` after rows were dropped from it.
    ///
    /// The new last row is recomputed so it carries the terminal bias again.
    pub(crate) fn truncate(&mut self, cost: &CostMatrix) {
        let keep = cost.rows();
        if keep == 0 || keep >= self.grid.rows() {
            return;
        }
        self.grid.truncate_rows(keep);
        self.fill_from(cost, keep - 1);
    }

    fn fill_from(&mut self, cost: &CostMatrix, from: usize) {
        let rows = self.grid.rows();
        let width = self.grid.width();
        let penalty = self.penalty;
        let diag = penalty.diagonal();
        let off = penalty.off_diagonal();
        let last = rows - 1;
        // Unbiased column-0 value of row `from - 1`. Row 0 does not feed it.
        let mut seed = if from >= 2 { self.grid[(from - 1, 0)] } else { 0.0 };

        for n in from..rows {
            // The bias is added cell by cell, so later last-row cells see
            // biased left neighbours.
            let bias = |m: usize| {
                if n == last {
                    penalty.terminal_bias(width, m)
                } else {
                    0.0
                }
            };
            if n == 0 {
                self.fill_first_row(cost);
                for (m, cell) in self.grid.row_mut(0).iter_mut().enumerate() {
                    *cell += bias(m);
                }
            } else {
                seed += cost.at(n - 1, 0) + off;
                self.grid[(n, 0)] = seed + bias(0);
                for m in 1..width {
                    let best = self.grid[(n - 1, m - 1)]
                        .min(self.grid[(n - 1, m)] + diag)
                        .min(self.grid[(n, m - 1)] + off);
                    self.grid[(n, m)] = cost.at(n, m) + best + bias(m);
                }
            }
        }
        self.biased_row = last;
    }

    fn fill_first_row(&mut self, cost: &CostMatrix) {
        let costs = cost.matrix().row(0);
        let row = self.grid.row_mut(0);
        match self.mode {
            AlignmentMode::Full => {
                let mut running = 0.0;
                for (cell, &c) in row.iter_mut().zip(costs) {
                    *cell = running;
                    running += c;
                }
            }
            AlignmentMode::Subsequence => row.copy_from_slice(costs),
        }
    }

    /// Return the alignment mode.
    #[must_use]
    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// Return the penalty pair.
    #[must_use]
    pub fn penalty(&self) -> Penalty {
        self.penalty
    }

    /// Return the index of the row currently holding the terminal bias.
    #[must_use]
    pub fn biased_row(&self) -> usize {
        self.biased_row
    }

    /// Return the number of query rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Return the reference length.
    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Return the underlying grid.
    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.grid
    }

    /// Return the last (biased) row.
    #[must_use]
    pub fn last_row(&self) -> &[f64] {
        self.grid.row(self.biased_row)
    }

    /// Return the accumulated cost at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of range.
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.grid[(row, col)]
    }
}
