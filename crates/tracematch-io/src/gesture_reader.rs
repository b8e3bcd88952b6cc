//! CSV reader for recorded gesture queries.

use std::path::{Path, PathBuf};

use tracematch_dtw::{Point, Sequence};
use tracing::{info, instrument};

use crate::IoError;
use crate::reader::{csv_error, open_csv, parse_cell, read_header_width};

/// Reads a recorded gesture from a CSV file.
///
/// Expected CSV format:
/// - Header row required, exactly `D` coordinate columns
/// - One point per row, in capture order
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::HeaderWidth`] | Header does not have `D` columns |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
pub struct GestureReader {
    path: PathBuf,
}

impl GestureReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read the gesture as a `D`-dimensional sequence.
    #[instrument(skip(self), fields(path = %self.path.display(), dim = D))]
    pub fn read<const D: usize>(&self) -> Result<Sequence<D>, IoError> {
        let mut rdr = open_csv(&self.path)?;
        let expected_cols = read_header_width(&mut rdr, &self.path, D)?;

        let mut gesture = Sequence::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| csv_error(&self.path, e))?;
            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }
            let coords = record
                .iter()
                .enumerate()
                .map(|(col, raw)| parse_cell(&self.path, row_index, col, raw))
                .collect::<Result<Vec<f64>, IoError>>()?;
            let point = Point::from_slice(&coords).map_err(|source| IoError::InvalidPoint {
                path: self.path.clone(),
                row_index,
                source,
            })?;
            gesture.push(point);
        }

        if gesture.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_points = gesture.len(), "gesture loaded");
        Ok(gesture)
    }
}
