//! Selector configuration.

use tracematch_dtw::Dtw;

/// What a round does when one candidate fails to align.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure on the candidate and leave it out of the round.
    #[default]
    Exclude,
    /// Fail the round with the first failure in id order. Every candidate
    /// still runs, so healthy candidates stay in step with the query.
    Abort,
}

/// Configuration for [`MultiCandidateSelector`](crate::MultiCandidateSelector).
///
/// # Defaults
///
/// | Parameter        | Default                   |
/// |------------------|---------------------------|
/// | `dtw`            | `Dtw::subsequence()`      |
/// | `failure_policy` | `FailurePolicy::Exclude`  |
/// | `parallel`       | true                      |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorConfig {
    dtw: Dtw,
    failure_policy: FailurePolicy,
    parallel: bool,
}

impl SelectorConfig {
    /// Create a configuration that aligns every candidate with `dtw`.
    #[must_use]
    pub fn new(dtw: Dtw) -> Self {
        Self {
            dtw,
            failure_policy: FailurePolicy::default(),
            parallel: true,
        }
    }

    /// Set how candidate failures are handled.
    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Run per-candidate updates on the rayon pool (true) or sequentially.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Return the per-candidate DTW configuration.
    #[must_use]
    pub fn dtw(&self) -> Dtw {
        self.dtw
    }

    /// Return the failure policy.
    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Return true if candidate updates run on the rayon pool.
    #[must_use]
    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self::new(Dtw::default())
    }
}
