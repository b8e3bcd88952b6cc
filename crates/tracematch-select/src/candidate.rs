//! Candidate ids and the reference trajectories they name.

use std::cmp::Ordering;
use std::fmt;

use tracematch_dtw::Sequence;

use crate::error::SelectError;

/// Name of a reference candidate. Candidates are visited in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateId(String);

impl CandidateId {
    /// Create an id from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for CandidateId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A fixed reference trajectory, optionally stamped with one time per point.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference<const D: usize> {
    points: Sequence<D>,
    timeline: Option<Vec<f64>>,
}

impl<const D: usize> Reference<D> {
    /// Create a reference without timestamps.
    #[must_use]
    pub fn new(points: Sequence<D>) -> Self {
        Self {
            points,
            timeline: None,
        }
    }

    /// Attach one time key per point. Checked when the reference is registered.
    #[must_use]
    pub fn with_timeline(mut self, times: Vec<f64>) -> Self {
        self.timeline = Some(times);
        self
    }

    /// Return the reference points.
    #[must_use]
    pub fn points(&self) -> &Sequence<D> {
        &self.points
    }

    /// Return the time keys, if any were attached.
    #[must_use]
    pub fn timeline(&self) -> Option<&[f64]> {
        self.timeline.as_deref()
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return true if the reference has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check the timeline against the points.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SelectError::TimelineLength`] | Timeline length differs from the point count |
    /// | [`SelectError::NonMonotonicTimeline`] | A time does not exceed its predecessor, or is NaN |
    pub(crate) fn validate(&self, id: &CandidateId) -> Result<(), SelectError> {
        let Some(times) = &self.timeline else {
            return Ok(());
        };
        if times.len() != self.points.len() {
            return Err(SelectError::TimelineLength {
                id: id.clone(),
                points: self.points.len(),
                times: times.len(),
            });
        }
        if let Some(i) = times
            .windows(2)
            .position(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Less))
        {
            return Err(SelectError::NonMonotonicTimeline {
                id: id.clone(),
                index: i + 1,
            });
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (Sequence<D>, Option<Vec<f64>>) {
        (self.points, self.timeline)
    }
}
