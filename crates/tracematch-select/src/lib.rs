//! Best-match selection across many reference candidates.
//!
//! Feeds one growing query to an incremental DTW aligner per candidate,
//! picks the lowest-cost candidate each round, and keeps the last
//! meaningful reference span as the committed selection.

mod candidate;
mod config;
mod error;
mod result;
mod selector;

pub use candidate::{CandidateId, Reference};
pub use config::{FailurePolicy, SelectorConfig};
pub use error::SelectError;
pub use result::{BestMatch, CandidateOutcome, ReferenceSpan, Selection, TimeSpan};
pub use selector::MultiCandidateSelector;
