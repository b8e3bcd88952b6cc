//! Replay of a recorded gesture through a selector, one point per round.

use tracing::{debug, info, instrument};

use tracematch_dtw::{AlignmentCost, Point, Sequence};
use tracematch_select::{BestMatch, CandidateId, MultiCandidateSelector, SelectError, Selection};

/// Snapshot of one selector round.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayRound {
    /// Query length after the round.
    pub query_len: usize,
    /// Winner of the round, if any candidate aligned.
    pub best: Option<BestMatch>,
    /// Every candidate's cost in id order; `None` when it was excluded.
    pub costs: Vec<(CandidateId, Option<AlignmentCost>)>,
}

impl ReplayRound {
    /// Record the state left by the selector's latest round.
    #[must_use]
    pub fn capture<const D: usize>(selector: &MultiCandidateSelector<D>) -> Self {
        Self {
            query_len: selector.query().len(),
            best: selector.best().cloned(),
            costs: selector
                .outcomes()
                .map(|(id, outcome)| (id.clone(), outcome.and_then(|o| o.cost())))
                .collect(),
        }
    }
}

/// Result of replaying a whole gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    /// One entry per accepted point.
    pub rounds: Vec<ReplayRound>,
    /// Points dropped by the minimum-step filter.
    pub skipped: usize,
    /// Selection committed when the gesture ended.
    pub committed: Option<Selection>,
}

/// Feed `gesture` into `selector` point by point.
///
/// A point closer than `min_step` to the last accepted point is skipped. The
/// first point is always accepted, and a `min_step` of zero accepts all.
///
/// # Errors
///
/// Propagates the first [`SelectError`] a round returns.
#[instrument(skip_all, fields(n_points = gesture.len(), candidates = selector.len(), min_step = min_step))]
pub fn replay<const D: usize>(
    selector: &mut MultiCandidateSelector<D>,
    gesture: &Sequence<D>,
    min_step: f64,
) -> Result<Replay, SelectError> {
    let mut rounds = Vec::with_capacity(gesture.len());
    let mut skipped = 0;
    let mut last: Option<Point<D>> = None;

    for point in gesture {
        if last.is_some_and(|prev| prev.distance(point) < min_step) {
            skipped += 1;
            continue;
        }
        last = Some(*point);
        selector.push(*point)?;
        rounds.push(ReplayRound::capture(selector));
    }

    if skipped > 0 {
        debug!(skipped, "points below minimum step dropped");
    }
    let committed = selector.committed().cloned();
    info!(
        rounds = rounds.len(),
        committed = committed.as_ref().map(|s| s.id.as_str()),
        "replay finished"
    );
    Ok(Replay {
        rounds,
        skipped,
        committed,
    })
}
