//! Append-only incremental aligner.

use tracing::{debug, instrument};

use crate::accumulated::AccumulatedCostMatrix;
use crate::alignment::{Alignment, Solution};
use crate::cost::CostMatrix;
use crate::dtw::Dtw;
use crate::error::DtwError;
use crate::sequence::Sequence;
use crate::subsequence::ExaminedColumn;

/// Lifecycle phase of an [`IncrementalDtw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No query has been aligned since creation or the last clear.
    Uninitialized,
    /// The stored alignment was computed from scratch.
    Computed,
    /// The stored alignment was extended from a previous one.
    Updated,
}

#[derive(Debug, Clone)]
enum State {
    Uninitialized,
    Computed(Solution),
    Updated(Solution),
}

impl State {
    fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Uninitialized => None,
            Self::Computed(s) | Self::Updated(s) => Some(s),
        }
    }
}

/// DTW aligner bound to one reference, reusing its matrices as the query
/// grows.
///
/// Updates must extend the stored query. Appending `k` points costs
/// `O(k * M)` for the new cost rows plus a recompute from the previously
/// biased row, instead of the full `O(N * M)`.
///
/// ```
/// use tracematch_dtw::{Dtw, Phase, Sequence};
///
/// let reference = Sequence::from_scalars(&[0.0, 1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();
/// let mut aligner = Dtw::subsequence().aligner(reference).unwrap();
///
/// let mut query = Sequence::from_scalars(&[1.0]).unwrap();
/// aligner.update(&query).unwrap();
/// query.extend_from_slice(Sequence::from_scalars(&[2.0, 3.0]).unwrap().as_slice());
/// let alignment = aligner.update(&query).unwrap();
/// assert_eq!(alignment.end_column(), 3);
/// assert_eq!(aligner.phase(), Phase::Updated);
/// ```
#[derive(Debug, Clone)]
pub struct IncrementalDtw<const D: usize> {
    config: Dtw,
    reference: Sequence<D>,
    query: Sequence<D>,
    state: State,
}

impl<const D: usize> IncrementalDtw<D> {
    /// Create an aligner for `reference`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySequence`] | `reference` is empty |
    pub fn new(config: Dtw, reference: Sequence<D>) -> Result<Self, DtwError> {
        reference.ensure_non_empty()?;
        Ok(Self {
            config,
            reference,
            query: Sequence::new(),
            state: State::Uninitialized,
        })
    }

    /// Align `query` from scratch, discarding any stored state.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySequence`] | `query` is empty |
    /// | [`DtwError::DegenerateReference`] | Subsequence mode and `query` is longer than the reference |
    ///
    /// On error the aligner is unchanged.
    #[instrument(skip(self, query), fields(n = query.len(), m = self.reference.len()))]
    pub fn align(&mut self, query: &Sequence<D>) -> Result<Alignment<'_>, DtwError> {
        let solution = self.config.align(query, &self.reference)?;
        self.query.clone_from(query);
        self.state = State::Computed(solution);
        self.current()
    }

    /// Extend the stored alignment to `query`.
    ///
    /// `query` must start with the stored query. An identical query returns
    /// the stored alignment untouched. An uninitialized aligner falls back to
    /// [`align`](Self::align).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidAppend`] | `query` is shorter than, or diverges from, the stored query |
    /// | [`DtwError::DegenerateReference`] | Subsequence mode and `query` is longer than the reference |
    /// | [`DtwError::EmptySequence`] | Cold start with an empty `query` |
    ///
    /// On error the aligner is unchanged.
    #[instrument(skip(self, query), fields(n = query.len(), m = self.reference.len()))]
    pub fn update(&mut self, query: &Sequence<D>) -> Result<Alignment<'_>, DtwError> {
        if matches!(self.state, State::Uninitialized) {
            return self.align(query);
        }
        let suffix = query.suffix_after(&self.query)?;
        if suffix.is_empty() {
            return self.current();
        }
        self.config.check_lengths(query.len(), self.reference.len())?;

        let (mut solution, was_updated) =
            match std::mem::replace(&mut self.state, State::Uninitialized) {
                State::Computed(s) => (s, false),
                State::Updated(s) => (s, true),
                State::Uninitialized => return self.align(query),
            };
        let kept = solution.cost_matrix.rows();
        debug!(
            appended = suffix.len(),
            from_row = solution.accumulated.biased_row(),
            "extending alignment"
        );
        solution
            .cost_matrix
            .append_rows(suffix, self.reference.as_slice());
        solution.accumulated.extend(&solution.cost_matrix);
        match self.config.extract(&solution.accumulated) {
            Ok((path, cost, examined)) => {
                solution.path = path;
                solution.cost = cost;
                solution.examined = examined;
                self.query.extend_from_slice(suffix);
                self.state = State::Updated(solution);
                self.current()
            }
            Err(error) => {
                self.restore(solution, kept, was_updated);
                Err(error)
            }
        }
    }

    /// Put back a solution whose matrices were extended past `kept` rows.
    fn restore(&mut self, mut solution: Solution, kept: usize, was_updated: bool) {
        solution.cost_matrix.truncate_rows(kept);
        solution.accumulated.truncate(&solution.cost_matrix);
        self.state = if was_updated {
            State::Updated(solution)
        } else {
            State::Computed(solution)
        };
    }

    /// Drop the stored query and matrices.
    pub fn clear(&mut self) {
        self.query.clear();
        self.state = State::Uninitialized;
    }

    /// Return the lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Uninitialized => Phase::Uninitialized,
            State::Computed(_) => Phase::Computed,
            State::Updated(_) => Phase::Updated,
        }
    }

    /// Return the stored alignment, if any.
    #[must_use]
    pub fn alignment(&self) -> Option<Alignment<'_>> {
        self.state.solution().map(Solution::alignment)
    }

    fn current(&self) -> Result<Alignment<'_>, DtwError> {
        self.alignment().ok_or(DtwError::EmptySequence)
    }

    /// Return the alignment configuration.
    #[must_use]
    pub fn config(&self) -> Dtw {
        self.config
    }

    /// Return the stored query.
    #[must_use]
    pub fn query(&self) -> &Sequence<D> {
        &self.query
    }

    /// Return the reference this aligner is bound to.
    #[must_use]
    pub fn reference(&self) -> &Sequence<D> {
        &self.reference
    }

    /// Return the local-cost matrix, if a query has been aligned.
    #[must_use]
    pub fn cost_matrix(&self) -> Option<&CostMatrix> {
        self.state.solution().map(Solution::cost_matrix)
    }

    /// Return the accumulated-cost matrix, if a query has been aligned.
    #[must_use]
    pub fn accumulated(&self) -> Option<&AccumulatedCostMatrix> {
        self.state.solution().map(Solution::accumulated)
    }

    /// Return the end columns tried by the last subsequence selection.
    #[must_use]
    pub fn examined(&self) -> &[ExaminedColumn] {
        self.state
            .solution()
            .map(Solution::examined)
            .unwrap_or_default()
    }
}
