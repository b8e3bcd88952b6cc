//! Error types for point validation and DTW alignment.

/// Errors from point construction, sequence validation, and DTW alignment.
///
/// Every variant is detected before any matrix is mutated, so an aligner that
/// returns an error is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtwError {
    /// Returned when an empty query or reference is supplied to an alignment.
    #[error("sequence must be non-empty")]
    EmptySequence,

    /// Returned when a point coordinate is NaN, infinity, or negative infinity.
    #[error("non-finite coordinate at point {index}, axis {axis}")]
    NonFiniteCoordinate {
        /// Position of the offending point within its sequence.
        index: usize,
        /// Axis of the first non-finite coordinate.
        axis: usize,
    },

    /// Returned when runtime data does not have the dimension of the point type.
    #[error("expected {expected}-dimensional point, got {found} coordinates")]
    DimensionMismatch {
        /// Dimension of the point type.
        expected: usize,
        /// Number of coordinates supplied.
        found: usize,
    },

    /// Returned when an update is not a prefix-extension of the stored query.
    #[error("query update diverges from the stored query at point {position}")]
    InvalidAppend {
        /// First index at which the new query disagrees with the stored one.
        /// Equal to the new query length when the new query is shorter.
        position: usize,
    },

    /// Returned in subsequence mode when the query outgrows the reference.
    #[error("subsequence alignment needs a reference at least as long as the query ({query_len} > {reference_len})")]
    DegenerateReference {
        /// Length of the query.
        query_len: usize,
        /// Length of the reference.
        reference_len: usize,
    },

    /// Returned when a backtrack is requested from a column outside the matrix.
    #[error("end column {column} out of range for matrix of width {width}")]
    ColumnOutOfRange {
        /// Requested end column.
        column: usize,
        /// Matrix width (reference length).
        width: usize,
    },

    /// Returned when a step penalty is negative or non-finite.
    #[error("penalties must be finite and non-negative, got ({diagonal}, {off_diagonal})")]
    InvalidPenalty {
        /// Requested diagonal-step penalty.
        diagonal: f64,
        /// Requested off-diagonal-step penalty.
        off_diagonal: f64,
    },
}
