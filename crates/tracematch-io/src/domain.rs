//! Domain types for tracematch-io.

use tracematch_select::{CandidateId, Reference};

use crate::IoError;

/// A validated session name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionName(String);

impl SessionName {
    /// Parse and validate a session name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidSessionName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidSessionName { name });
        }
        Ok(Self(name))
    }

    /// Return the session name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference candidates loaded from a library file, in file order.
///
/// Produced by [`ReferenceReader`](crate::ReferenceReader). Every candidate
/// carries the timeline read from its time column.
#[derive(Debug, Clone)]
pub struct ReferenceLibrary<const D: usize> {
    candidates: Vec<(CandidateId, Reference<D>)>,
}

impl<const D: usize> ReferenceLibrary<D> {
    pub(crate) fn new(candidates: Vec<(CandidateId, Reference<D>)>) -> Self {
        Self { candidates }
    }

    /// Return the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Return true if the library holds no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterate over candidate ids in file order.
    pub fn ids(&self) -> impl Iterator<Item = &CandidateId> + '_ {
        self.candidates.iter().map(|(id, _)| id)
    }

    /// Look up one candidate's reference.
    #[must_use]
    pub fn get(&self, id: &CandidateId) -> Option<&Reference<D>> {
        self.candidates
            .iter()
            .find(|(candidate, _)| candidate == id)
            .map(|(_, reference)| reference)
    }

    /// Remove and return one candidate's reference.
    pub fn take(&mut self, id: &CandidateId) -> Option<Reference<D>> {
        let index = self.candidates.iter().position(|(candidate, _)| candidate == id)?;
        Some(self.candidates.remove(index).1)
    }
}

impl<const D: usize> IntoIterator for ReferenceLibrary<D> {
    type Item = (CandidateId, Reference<D>);
    type IntoIter = std::vec::IntoIter<(CandidateId, Reference<D>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}
