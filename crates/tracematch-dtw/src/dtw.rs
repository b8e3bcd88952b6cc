//! DTW alignment configuration and one-shot alignment.

use tracing::instrument;

use crate::accumulated::AccumulatedCostMatrix;
use crate::alignment::Solution;
use crate::cost::CostMatrix;
use crate::distance::AlignmentCost;
use crate::error::DtwError;
use crate::incremental::IncrementalDtw;
use crate::mode::{AlignmentMode, Penalty};
use crate::path::{WarpingPath, backtrack};
use crate::sequence::Sequence;
use crate::subsequence::{DEFAULT_MAX_SUBSEQUENCE_COST, ExaminedColumn, select_subsequence};

/// Immutable DTW configuration. Thread-safe and copyable.
///
/// ```
/// use tracematch_dtw::{Dtw, Penalty};
///
/// let dtw = Dtw::subsequence()
///     .with_penalty(Penalty::new(0.0, 2.0).unwrap())
///     .with_max_subsequence_cost(500.0);
/// assert_eq!(dtw.max_subsequence_cost(), 500.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dtw {
    mode: AlignmentMode,
    penalty: Penalty,
    max_subsequence_cost: f64,
}

impl Dtw {
    /// Align the whole query against the whole reference.
    #[must_use]
    pub fn full() -> Self {
        Self::with_mode(AlignmentMode::Full)
    }

    /// Align the query against the best-matching sub-range of the reference.
    #[must_use]
    pub fn subsequence() -> Self {
        Self::with_mode(AlignmentMode::Subsequence)
    }

    /// Create a configuration for `mode` with default penalties.
    #[must_use]
    pub fn with_mode(mode: AlignmentMode) -> Self {
        Self {
            mode,
            penalty: Penalty::default(),
            max_subsequence_cost: DEFAULT_MAX_SUBSEQUENCE_COST,
        }
    }

    /// Set the step penalties.
    #[must_use]
    pub fn with_penalty(mut self, penalty: Penalty) -> Self {
        self.penalty = penalty;
        self
    }

    /// Set the last-row value at which subsequence exploration stops.
    #[must_use]
    pub fn with_max_subsequence_cost(mut self, max_cost: f64) -> Self {
        self.max_subsequence_cost = max_cost;
        self
    }

    /// Return the alignment mode.
    #[must_use]
    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// Return the step penalties.
    #[must_use]
    pub fn penalty(&self) -> Penalty {
        self.penalty
    }

    /// Return the subsequence exploration threshold.
    #[must_use]
    pub fn max_subsequence_cost(&self) -> f64 {
        self.max_subsequence_cost
    }

    /// Create an incremental aligner bound to `reference`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySequence`] | `reference` is empty |
    pub fn aligner<const D: usize>(
        &self,
        reference: Sequence<D>,
    ) -> Result<IncrementalDtw<D>, DtwError> {
        IncrementalDtw::new(*self, reference)
    }

    /// Align `query` against `reference` from scratch.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySequence`] | `query` or `reference` is empty |
    /// | [`DtwError::DegenerateReference`] | Subsequence mode and `query` is longer than `reference` |
    #[instrument(skip(self, query, reference), fields(n = query.len(), m = reference.len(), mode = %self.mode))]
    pub fn align<const D: usize>(
        &self,
        query: &Sequence<D>,
        reference: &Sequence<D>,
    ) -> Result<Solution, DtwError> {
        query.ensure_non_empty()?;
        reference.ensure_non_empty()?;
        self.check_lengths(query.len(), reference.len())?;

        let cost_matrix = CostMatrix::compute(query.as_slice(), reference.as_slice())?;
        let accumulated = AccumulatedCostMatrix::compute(&cost_matrix, self.mode, self.penalty)?;
        let (path, cost, examined) = self.extract(&accumulated)?;
        Ok(Solution {
            cost_matrix,
            accumulated,
            path,
            cost,
            examined,
        })
    }

    pub(crate) fn check_lengths(&self, query_len: usize, reference_len: usize) -> Result<(), DtwError> {
        if self.mode == AlignmentMode::Subsequence && query_len > reference_len {
            return Err(DtwError::DegenerateReference {
                query_len,
                reference_len,
            });
        }
        Ok(())
    }

    pub(crate) fn extract(
        &self,
        accumulated: &AccumulatedCostMatrix,
    ) -> Result<(WarpingPath, AlignmentCost, Vec<ExaminedColumn>), DtwError> {
        match self.mode {
            AlignmentMode::Full => {
                let (path, cost) = backtrack(accumulated, None)?;
                Ok((path, cost, Vec::new()))
            }
            AlignmentMode::Subsequence => {
                let found = select_subsequence(accumulated, self.max_subsequence_cost)?;
                Ok((found.path, found.cost, found.examined))
            }
        }
    }
}

impl Default for Dtw {
    fn default() -> Self {
        Self::subsequence()
    }
}
