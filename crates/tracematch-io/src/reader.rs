//! CSV reference library reader with full input validation.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use tracematch_dtw::{Point, Sequence};
use tracematch_select::{CandidateId, Reference};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ReferenceLibrary;

/// Reads a library of reference trajectories from a CSV file.
///
/// Expected CSV format:
/// - Header row required, `D + 2` columns: `candidate,t,x0,...,x{D-1}`
///   (column names are not checked)
/// - One row per sample; a candidate's rows are contiguous and in time order
/// - The time column strictly increases within a candidate
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::HeaderWidth`] | Header does not have `D + 2` columns |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::EmptyCandidateName`] | Candidate cell is blank |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
/// | [`IoError::SplitCandidate`] | A candidate reappears after another one started |
/// | [`IoError::NonMonotonicTime`] | Time does not increase within a candidate |
pub struct ReferenceReader {
    path: PathBuf,
}

/// Rows of the candidate currently being read.
struct Block<const D: usize> {
    name: String,
    points: Vec<Point<D>>,
    times: Vec<f64>,
    last_row: usize,
}

impl<const D: usize> Block<D> {
    fn finish(self) -> (CandidateId, Reference<D>) {
        let reference = Reference::new(Sequence::from_points(self.points)).with_timeline(self.times);
        (CandidateId::new(self.name), reference)
    }
}

impl ReferenceReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`ReferenceLibrary`] of
    /// `D`-dimensional candidates.
    #[instrument(skip(self), fields(path = %self.path.display(), dim = D))]
    pub fn read<const D: usize>(&self) -> Result<ReferenceLibrary<D>, IoError> {
        let mut rdr = open_csv(&self.path)?;
        let expected_cols = read_header_width(&mut rdr, &self.path, D + 2)?;

        let mut candidates = Vec::new();
        let mut finished: HashMap<String, usize> = HashMap::new();
        let mut current: Option<Block<D>> = None;
        let mut n_rows = 0;

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

            let name = record.get(0).unwrap_or("").trim();
            if name.is_empty() {
                return Err(IoError::EmptyCandidateName {
                    path: self.path.clone(),
                    row_index,
                });
            }

            let time = parse_cell(&self.path, row_index, 1, record.get(1).unwrap_or(""))?;
            let coords = (2..expected_cols)
                .map(|col| parse_cell(&self.path, row_index, col, record.get(col).unwrap_or("")))
                .collect::<Result<Vec<f64>, IoError>>()?;
            let point = Point::from_slice(&coords).map_err(|source| IoError::InvalidPoint {
                path: self.path.clone(),
                row_index,
                source,
            })?;

            match current.as_mut() {
                Some(block) if block.name == name => {
                    if block.times.last().is_some_and(|&last| time <= last) {
                        return Err(IoError::NonMonotonicTime {
                            path: self.path.clone(),
                            candidate: name.to_string(),
                            row_index,
                        });
                    }
                    block.points.push(point);
                    block.times.push(time);
                    block.last_row = row_index;
                }
                _ => {
                    if let Some(&last_row) = finished.get(name) {
                        return Err(IoError::SplitCandidate {
                            path: self.path.clone(),
                            candidate: name.to_string(),
                            last_row,
                            row_index,
                        });
                    }
                    if let Some(block) = current.take() {
                        finished.insert(block.name.clone(), block.last_row);
                        candidates.push(block.finish());
                    }
                    current = Some(Block {
                        name: name.to_string(),
                        points: vec![point],
                        times: vec![time],
                        last_row: row_index,
                    });
                }
            }
            n_rows += 1;
        }

        if let Some(block) = current {
            candidates.push(block.finish());
        }
        if candidates.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_candidates = candidates.len(), n_rows, "reference library loaded");
        Ok(ReferenceLibrary::new(candidates))
    }
}

/// Open `path` as a headed CSV.
///
/// `flexible(true)` lets rows of the wrong width reach our own
/// `InconsistentRowLength` check instead of failing as `CsvParse`.
pub(crate) fn open_csv(path: &Path) -> Result<csv::Reader<File>, IoError> {
    let file = File::open(path).map_err(|e| IoError::FileNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}

/// Read the header and check it has exactly `expected` columns.
pub(crate) fn read_header_width(
    rdr: &mut csv::Reader<File>,
    path: &Path,
    expected: usize,
) -> Result<usize, IoError> {
    let header = rdr.headers().map_err(|e| csv_error(path, e))?;
    let got = header.len();
    debug!(got, expected, "read CSV header");
    if got != expected {
        return Err(IoError::HeaderWidth {
            path: path.to_path_buf(),
            expected,
            got,
        });
    }
    Ok(got)
}

pub(crate) fn csv_error(path: &Path, e: csv::Error) -> IoError {
    IoError::CsvParse {
        path: path.to_path_buf(),
        offset: e.position().map_or(0, |p| p.byte()),
        source: e,
    }
}

/// Parse one cell as a finite float.
pub(crate) fn parse_cell(
    path: &Path,
    row_index: usize,
    col_index: usize,
    raw: &str,
) -> Result<f64, IoError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(IoError::NonFiniteValue {
            path: path.to_path_buf(),
            row_index,
            col_index,
            raw: raw.to_string(),
        }),
    }
}
