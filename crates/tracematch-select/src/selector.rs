//! Multi-candidate best-match selection.
//!
//! Every candidate owns an [`IncrementalDtw`] over its reference. Each round
//! feeds the shared query to all of them (on the rayon pool when enabled),
//! then reduces the outcomes in ascending id order to a single winner.

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use tracematch_dtw::{AlignmentCost, IncrementalDtw, Point, Sequence};

use crate::candidate::{CandidateId, Reference};
use crate::config::{FailurePolicy, SelectorConfig};
use crate::error::SelectError;
use crate::result::{BestMatch, CandidateOutcome, ReferenceSpan, Selection, TimeSpan};

#[derive(Debug, Clone)]
struct CandidateState<const D: usize> {
    id: CandidateId,
    aligner: IncrementalDtw<D>,
    timeline: Option<Vec<f64>>,
    outcome: Option<CandidateOutcome>,
}

impl<const D: usize> CandidateState<D> {
    fn advance(&mut self, query: &Sequence<D>) {
        let outcome = match self.aligner.update(query) {
            Ok(alignment) => CandidateOutcome::Aligned {
                cost: alignment.cost,
                span: ReferenceSpan::from_path(alignment.path),
            },
            Err(error) => CandidateOutcome::Excluded { error },
        };
        self.outcome = Some(outcome);
    }

    fn reset(&mut self) {
        self.aligner.clear();
        self.outcome = None;
    }
}

/// Tracks which reference candidate best matches a growing query.
///
/// ```
/// use tracematch_dtw::{Dtw, Point, Sequence};
/// use tracematch_select::{CandidateId, MultiCandidateSelector, Reference, SelectorConfig};
///
/// let up = Sequence::from_scalars(&[0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
/// let down = Sequence::from_scalars(&[4.0, 3.0, 2.0, 1.0, 0.0]).unwrap();
/// let mut selector = MultiCandidateSelector::new(
///     SelectorConfig::new(Dtw::subsequence()),
///     [
///         (CandidateId::from("down"), Reference::new(down)),
///         (CandidateId::from("up"), Reference::new(up)),
///     ],
/// )
/// .unwrap();
///
/// for v in [3.0, 2.0, 1.0] {
///     selector.push(Point::new([v]).unwrap()).unwrap();
/// }
/// assert_eq!(selector.best().unwrap().id.as_str(), "down");
/// ```
#[derive(Debug, Clone)]
pub struct MultiCandidateSelector<const D: usize> {
    config: SelectorConfig,
    candidates: Vec<CandidateState<D>>,
    query: Sequence<D>,
    best: Option<BestMatch>,
    committed: Option<Selection>,
}

impl<const D: usize> MultiCandidateSelector<D> {
    /// Create a selector over `candidates`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SelectError::DuplicateCandidate`] | Two candidates share an id |
    /// | [`SelectError::TimelineLength`] | A timeline does not match its reference length |
    /// | [`SelectError::NonMonotonicTimeline`] | A timeline is not strictly increasing |
    /// | [`SelectError::Candidate`] | A reference is empty |
    pub fn new(
        config: SelectorConfig,
        candidates: impl IntoIterator<Item = (CandidateId, Reference<D>)>,
    ) -> Result<Self, SelectError> {
        let mut selector = Self {
            config,
            candidates: Vec::new(),
            query: Sequence::new(),
            best: None,
            committed: None,
        };
        for (id, reference) in candidates {
            selector.insert_candidate(id, reference)?;
        }
        Ok(selector)
    }

    /// Register a candidate. It is aligned from scratch in the next round.
    ///
    /// # Errors
    ///
    /// Same conditions as [`new`](Self::new).
    pub fn insert_candidate(
        &mut self,
        id: CandidateId,
        reference: Reference<D>,
    ) -> Result<(), SelectError> {
        let slot = match self.candidates.binary_search_by(|c| c.id.cmp(&id)) {
            Ok(_) => return Err(SelectError::DuplicateCandidate { id }),
            Err(slot) => slot,
        };
        reference.validate(&id)?;
        let (points, timeline) = reference.into_parts();
        let aligner = match self.config.dtw().aligner(points) {
            Ok(aligner) => aligner,
            Err(source) => return Err(SelectError::Candidate { id, source }),
        };
        debug!(%id, len = aligner.reference().len(), "candidate registered");
        self.candidates.insert(
            slot,
            CandidateState {
                id,
                aligner,
                timeline,
                outcome: None,
            },
        );
        Ok(())
    }

    /// Drop a candidate and its alignment state.
    ///
    /// A current best match or committed selection naming the candidate is
    /// dropped with it.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SelectError::UnknownCandidate`] | `id` is not registered |
    pub fn remove_candidate(&mut self, id: &CandidateId) -> Result<(), SelectError> {
        let index = self
            .candidates
            .binary_search_by(|c| c.id.cmp(id))
            .map_err(|_| SelectError::UnknownCandidate { id: id.clone() })?;
        self.candidates.remove(index);
        if self.best.as_ref().is_some_and(|b| &b.id == id) {
            self.best = None;
        }
        if self.committed.as_ref().is_some_and(|s| &s.id == id) {
            self.committed = None;
        }
        debug!(%id, "candidate removed");
        Ok(())
    }

    /// Append one query point and run a round.
    ///
    /// # Errors
    ///
    /// See [`update_query`](Self::update_query).
    pub fn push(&mut self, point: Point<D>) -> Result<Option<&BestMatch>, SelectError> {
        self.ensure_candidates()?;
        self.query.push(point);
        self.run_round()
    }

    /// Append several query points and run a single round.
    ///
    /// # Errors
    ///
    /// See [`update_query`](Self::update_query).
    pub fn extend(&mut self, points: &[Point<D>]) -> Result<Option<&BestMatch>, SelectError> {
        self.ensure_candidates()?;
        self.query.extend_from_slice(points);
        self.run_round()
    }

    /// Replace the query with `query`, which must extend the current one, and
    /// run a round.
    ///
    /// Returns the round's best match, or `None` when every candidate was
    /// excluded.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SelectError::Dtw`] | `query` does not extend the current query |
    /// | [`SelectError::NoCandidates`] | No candidates are registered |
    /// | [`SelectError::Candidate`] | A candidate failed under [`FailurePolicy::Abort`] |
    pub fn update_query(&mut self, query: &Sequence<D>) -> Result<Option<&BestMatch>, SelectError> {
        let suffix = query.suffix_after(&self.query)?;
        self.ensure_candidates()?;
        self.query.extend_from_slice(suffix);
        self.run_round()
    }

    /// Forget the query, every candidate's matrices, and the committed selection.
    pub fn clear(&mut self) {
        self.query.clear();
        self.candidates.iter_mut().for_each(CandidateState::reset);
        self.best = None;
        self.committed = None;
        info!("selection session cleared");
    }

    fn ensure_candidates(&self) -> Result<(), SelectError> {
        if self.candidates.is_empty() {
            return Err(SelectError::NoCandidates);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(n = self.query.len(), candidates = self.candidates.len()))]
    fn run_round(&mut self) -> Result<Option<&BestMatch>, SelectError> {
        let query = &self.query;
        let advance = |c: &mut CandidateState<D>| c.advance(query);
        if self.config.parallel() {
            self.candidates.par_iter_mut().for_each(advance);
        } else {
            self.candidates.iter_mut().for_each(advance);
        }

        let mut winner: Option<(usize, AlignmentCost)> = None;
        let mut first_failure: Option<SelectError> = None;
        for (index, candidate) in self.candidates.iter().enumerate() {
            match &candidate.outcome {
                Some(CandidateOutcome::Aligned { cost, .. }) => {
                    if winner.is_none_or(|(_, best)| cost.total_cmp(&best).is_lt()) {
                        winner = Some((index, *cost));
                    }
                }
                Some(CandidateOutcome::Excluded { error }) => {
                    warn!(id = %candidate.id, %error, "candidate excluded from round");
                    if first_failure.is_none() {
                        first_failure = Some(SelectError::Candidate {
                            id: candidate.id.clone(),
                            source: error.clone(),
                        });
                    }
                }
                None => {}
            }
        }

        if self.config.failure_policy() == FailurePolicy::Abort
            && let Some(failure) = first_failure
        {
            self.best = None;
            return Err(failure);
        }

        self.best = winner.and_then(|(index, _)| self.best_match(index));
        if let Some(best) = &self.best {
            debug!(id = %best.id, cost = %best.cost, start = best.span.start, end = best.span.end, "round winner");
            if best.span.is_meaningful() {
                info!(id = %best.id, start = best.span.start, end = best.span.end, "selection committed");
                self.committed = Some(Selection {
                    id: best.id.clone(),
                    cost: best.cost,
                    span: best.span,
                    time_span: best.time_span,
                    query_len: self.query.len(),
                });
            }
        }
        Ok(self.best.as_ref())
    }

    fn best_match(&self, index: usize) -> Option<BestMatch> {
        let candidate = &self.candidates[index];
        let alignment = candidate.aligner.alignment()?;
        let span = ReferenceSpan::from_path(alignment.path);
        Some(BestMatch {
            id: candidate.id.clone(),
            cost: alignment.cost,
            path: alignment.path.clone(),
            span,
            time_span: candidate
                .timeline
                .as_deref()
                .and_then(|t| TimeSpan::lookup(t, span)),
        })
    }

    /// Return the latest round's winner.
    #[must_use]
    pub fn best(&self) -> Option<&BestMatch> {
        self.best.as_ref()
    }

    /// Return the last committed selection.
    #[must_use]
    pub fn committed(&self) -> Option<&Selection> {
        self.committed.as_ref()
    }

    /// Iterate over candidates in id order with their latest outcome.
    pub fn outcomes(&self) -> impl Iterator<Item = (&CandidateId, Option<&CandidateOutcome>)> + '_ {
        self.candidates.iter().map(|c| (&c.id, c.outcome.as_ref()))
    }

    /// Return the registered ids in visiting order.
    pub fn candidate_ids(&self) -> impl Iterator<Item = &CandidateId> + '_ {
        self.candidates.iter().map(|c| &c.id)
    }

    /// Return the aligner of one candidate.
    #[must_use]
    pub fn aligner(&self, id: &CandidateId) -> Option<&IncrementalDtw<D>> {
        self.candidates
            .binary_search_by(|c| c.id.cmp(id))
            .ok()
            .map(|i| &self.candidates[i].aligner)
    }

    /// Return the query accumulated so far.
    #[must_use]
    pub fn query(&self) -> &Sequence<D> {
        &self.query
    }

    /// Return the selector configuration.
    #[must_use]
    pub fn config(&self) -> SelectorConfig {
        self.config
    }

    /// Return the number of registered candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Return true if no candidates are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
