//! Error type for multi-candidate selection.

use tracematch_dtw::DtwError;

use crate::candidate::CandidateId;

/// Errors from multi-candidate selection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectError {
    /// Returned when a round runs with no candidates registered.
    #[error("no candidates registered")]
    NoCandidates,

    /// Returned when a candidate id is inserted twice.
    #[error("candidate '{id}' is already registered")]
    DuplicateCandidate {
        /// The repeated id.
        id: CandidateId,
    },

    /// Returned when removing an id that is not registered.
    #[error("candidate '{id}' is not registered")]
    UnknownCandidate {
        /// The missing id.
        id: CandidateId,
    },

    /// Returned when a timeline does not have one time per reference point.
    #[error("candidate '{id}' has {points} points but {times} timeline entries")]
    TimelineLength {
        /// Candidate id.
        id: CandidateId,
        /// Reference length.
        points: usize,
        /// Timeline length.
        times: usize,
    },

    /// Returned when a timeline is not strictly increasing.
    #[error("candidate '{id}' timeline is not strictly increasing at entry {index}")]
    NonMonotonicTimeline {
        /// Candidate id.
        id: CandidateId,
        /// First entry that fails to exceed its predecessor.
        index: usize,
    },

    /// A single candidate failed to align.
    #[error("candidate '{id}' failed: {source}")]
    Candidate {
        /// Candidate id.
        id: CandidateId,
        /// Underlying alignment error.
        source: DtwError,
    },

    /// Wraps a DTW error not tied to one candidate, such as an invalid query update.
    #[error("DTW error: {0}")]
    Dtw(#[from] DtwError),
}
