//! I/O error types for tracematch-io.

use std::path::PathBuf;

use tracematch_dtw::DtwError;

/// Errors from file I/O, CSV parsing, and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when the header does not have the column count the point dimension requires.
    #[error("header of {path} has {got} columns, expected {expected}")]
    HeaderWidth {
        /// Path to the CSV file.
        path: PathBuf,
        /// Required column count.
        expected: usize,
        /// Columns found in the header.
        got: usize,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cell value is NaN, Inf, or otherwise not a finite float.
    #[error("non-finite value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Zero-based column index.
        col_index: usize,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when a reference row has an empty candidate name.
    #[error("empty candidate name in {path} at row {row_index}")]
    EmptyCandidateName {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
    },

    /// Returned when a candidate's rows are not contiguous.
    #[error("candidate \"{candidate}\" in {path} resumes at row {row_index} after ending at row {last_row}")]
    SplitCandidate {
        /// Path to the CSV file.
        path: PathBuf,
        /// The candidate name.
        candidate: String,
        /// Last row of the earlier block.
        last_row: usize,
        /// Row where the candidate reappears.
        row_index: usize,
    },

    /// Returned when a candidate's time column does not strictly increase.
    #[error("time of candidate \"{candidate}\" in {path} does not increase at row {row_index}")]
    NonMonotonicTime {
        /// Path to the CSV file.
        path: PathBuf,
        /// The candidate name.
        candidate: String,
        /// Zero-based row index (excluding header).
        row_index: usize,
    },

    /// Returned when a row cannot be turned into a point.
    #[error("invalid point in {path} at row {row_index}")]
    InvalidPoint {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Underlying validation error.
        source: DtwError,
    },

    /// Returned when the session name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid session name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidSessionName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when an artifact cannot be encoded as JSON.
    #[error("cannot serialize artifact for {path}")]
    Serialize {
        /// Destination path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
