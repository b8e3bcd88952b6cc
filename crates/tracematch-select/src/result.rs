//! Per-round outcomes, the winning match, and committed selections.

use tracematch_dtw::{AlignmentCost, DtwError, WarpingPath};

use crate::candidate::CandidateId;

/// Inclusive range of reference columns implicated by a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceSpan {
    /// Reference column just before the path first leaves row 0.
    pub start: usize,
    /// Reference column of the final step.
    pub end: usize,
}

impl ReferenceSpan {
    /// Derive the span of `path`.
    ///
    /// `start` is the reference column of the step preceding the first step
    /// with a query index above 0, or 0 if the path never leaves row 0.
    #[must_use]
    pub fn from_path(path: &WarpingPath) -> Self {
        let steps = path.steps();
        let start = steps
            .iter()
            .position(|s| s.query > 0)
            .and_then(|i| i.checked_sub(1))
            .map_or(0, |i| steps[i].reference);
        let end = path.end_column().unwrap_or(0);
        Self { start, end }
    }

    /// Number of reference samples between `start` and `end`.
    #[must_use]
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the span covers more than one reference sample step.
    #[must_use]
    pub fn is_meaningful(&self) -> bool {
        self.width() > 1
    }
}

/// A span expressed in reference time units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSpan {
    /// Time key at the span's start column.
    pub start: f64,
    /// Time key at the span's end column.
    pub end: f64,
}

impl TimeSpan {
    pub(crate) fn lookup(timeline: &[f64], span: ReferenceSpan) -> Option<Self> {
        Some(Self {
            start: *timeline.get(span.start)?,
            end: *timeline.get(span.end)?,
        })
    }
}

/// What happened to one candidate in the latest round.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    /// The candidate aligned.
    Aligned {
        /// Path cost.
        cost: AlignmentCost,
        /// Reference span of the path.
        span: ReferenceSpan,
    },
    /// The candidate failed and was left out of the round.
    Excluded {
        /// Why the candidate failed.
        error: DtwError,
    },
}

impl CandidateOutcome {
    /// Return the cost when the candidate aligned.
    #[must_use]
    pub fn cost(&self) -> Option<AlignmentCost> {
        match self {
            Self::Aligned { cost, .. } => Some(*cost),
            Self::Excluded { .. } => None,
        }
    }
}

/// Lowest-cost candidate of the latest round.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    /// Winning candidate.
    pub id: CandidateId,
    /// Its path cost.
    pub cost: AlignmentCost,
    /// Its warping path.
    pub path: WarpingPath,
    /// Reference span of `path`.
    pub span: ReferenceSpan,
    /// `span` in reference time, when the candidate has a timeline.
    pub time_span: Option<TimeSpan>,
}

/// A winning match whose span was meaningful. Kept until replaced or cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Committed candidate.
    pub id: CandidateId,
    /// Path cost when committed.
    pub cost: AlignmentCost,
    /// Reference span of the committed path.
    pub span: ReferenceSpan,
    /// `span` in reference time, when the candidate has a timeline.
    pub time_span: Option<TimeSpan>,
    /// Query length at the time of the commit.
    pub query_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracematch_dtw::{Dtw, Sequence};

    fn path(query: &[f64], reference: &[f64]) -> WarpingPath {
        let q = Sequence::from_scalars(query).unwrap();
        let r = Sequence::from_scalars(reference).unwrap();
        Dtw::subsequence().align(&q, &r).unwrap().path().clone()
    }

    #[test]
    fn span_starts_before_first_row_change() {
        let reference = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0, 0.0, 0.0, 1.0, 2.0, 3.0, 2.0, 1.0];
        let span = ReferenceSpan::from_path(&path(&[4.0, 3.0, 2.0, 1.0], &reference));
        assert_eq!(span, ReferenceSpan { start: 8, end: 11 });
        assert!(span.is_meaningful());
        assert_eq!(span.width(), 3);
    }

    #[test]
    fn single_row_path_starts_at_zero() {
        let span = ReferenceSpan::from_path(&path(&[2.0], &[0.0, 1.0, 2.0, 3.0]));
        assert_eq!(span.start, 0);
    }

    #[test]
    fn narrow_span_is_not_meaningful() {
        assert!(!ReferenceSpan { start: 4, end: 5 }.is_meaningful());
        assert!(!ReferenceSpan { start: 4, end: 4 }.is_meaningful());
        assert!(ReferenceSpan { start: 4, end: 6 }.is_meaningful());
    }

    #[test]
    fn time_span_lookup() {
        let timeline = [0.0, 0.5, 1.0, 1.5];
        let t = TimeSpan::lookup(&timeline, ReferenceSpan { start: 1, end: 3 }).unwrap();
        assert_eq!(t, TimeSpan { start: 0.5, end: 1.5 });
        assert_eq!(TimeSpan::lookup(&timeline, ReferenceSpan { start: 1, end: 4 }), None);
    }

    #[test]
    fn outcome_cost() {
        let excluded = CandidateOutcome::Excluded {
            error: DtwError::EmptySequence,
        };
        assert_eq!(excluded.cost(), None);
    }
}
