//! JSON result writer for replay sessions and one-shot alignments.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracematch_dtw::{AlignmentMode, Solution};
use tracematch_select::{BestMatch, CandidateId, Selection, TimeSpan};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::SessionName;
use crate::replay::ReplayRound;

/// Writes replay and alignment results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{session}_replay.json` and
/// `{session}_alignment.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    session: SessionName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and session name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), session = %session))]
    pub fn new(output_dir: &Path, session: SessionName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            session,
        })
    }

    /// Write every replay round and the final committed selection to
    /// `{session}_replay.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] on failure.
    #[instrument(skip_all, fields(rounds = rounds.len()))]
    pub fn write_replay(
        &self,
        mode: AlignmentMode,
        rounds: &[ReplayRound],
        committed: Option<&Selection>,
    ) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_replay.json", self.session.as_str()));

        let artifact = ReplayArtifact {
            session: self.session.as_str(),
            mode: mode.to_string(),
            n_rounds: rounds.len(),
            rounds: rounds.iter().map(RoundArtifact::from_round).collect(),
            committed: committed.map(SelectionArtifact::from_selection),
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "replay results written");
        Ok(path)
    }

    /// Write a one-shot alignment to `{session}_alignment.json`.
    ///
    /// With `include_matrix`, the accumulated-cost rows are dumped as well.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] on failure.
    #[instrument(skip_all, fields(candidate = %candidate, include_matrix = include_matrix))]
    pub fn write_alignment(
        &self,
        candidate: &CandidateId,
        solution: &Solution,
        include_matrix: bool,
    ) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_alignment.json", self.session.as_str()));

        let accumulated = solution.accumulated();
        let artifact = AlignmentArtifact {
            session: self.session.as_str(),
            candidate: candidate.as_str(),
            mode: accumulated.mode().to_string(),
            query_len: accumulated.rows(),
            reference_len: accumulated.width(),
            cost: solution.cost().value(),
            end_column: solution.alignment().end_column(),
            path: solution.path().to_pairs(),
            examined: solution
                .examined()
                .iter()
                .map(|e| ExaminedArtifact {
                    column: e.column,
                    cost: e.cost.value(),
                })
                .collect(),
            accumulated: include_matrix.then(|| accumulated.matrix().to_rows()),
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "alignment written");
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, path: &Path, artifact: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// ---------------------------------------------------------------------------
// Serialization structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReplayArtifact<'a> {
    session: &'a str,
    mode: String,
    n_rounds: usize,
    rounds: Vec<RoundArtifact<'a>>,
    committed: Option<SelectionArtifact<'a>>,
}

#[derive(Serialize)]
struct RoundArtifact<'a> {
    query_len: usize,
    best: Option<MatchArtifact<'a>>,
    /// `null` for excluded candidates.
    costs: BTreeMap<&'a str, Option<f64>>,
}

impl<'a> RoundArtifact<'a> {
    fn from_round(round: &'a ReplayRound) -> Self {
        Self {
            query_len: round.query_len,
            best: round.best.as_ref().map(MatchArtifact::from_best),
            costs: round
                .costs
                .iter()
                .map(|(id, cost)| (id.as_str(), cost.map(|c| c.value())))
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct MatchArtifact<'a> {
    candidate: &'a str,
    cost: f64,
    span: [usize; 2],
    time_span: Option<[f64; 2]>,
    path: Vec<(usize, usize)>,
}

impl<'a> MatchArtifact<'a> {
    fn from_best(best: &'a BestMatch) -> Self {
        Self {
            candidate: best.id.as_str(),
            cost: best.cost.value(),
            span: [best.span.start, best.span.end],
            time_span: best.time_span.map(time_pair),
            path: best.path.to_pairs(),
        }
    }
}

#[derive(Serialize)]
struct SelectionArtifact<'a> {
    candidate: &'a str,
    cost: f64,
    span: [usize; 2],
    time_span: Option<[f64; 2]>,
    query_len: usize,
}

impl<'a> SelectionArtifact<'a> {
    fn from_selection(selection: &'a Selection) -> Self {
        Self {
            candidate: selection.id.as_str(),
            cost: selection.cost.value(),
            span: [selection.span.start, selection.span.end],
            time_span: selection.time_span.map(time_pair),
            query_len: selection.query_len,
        }
    }
}

#[derive(Serialize)]
struct AlignmentArtifact<'a> {
    session: &'a str,
    candidate: &'a str,
    mode: String,
    query_len: usize,
    reference_len: usize,
    cost: f64,
    end_column: usize,
    path: Vec<(usize, usize)>,
    examined: Vec<ExaminedArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accumulated: Option<Vec<Vec<f64>>>,
}

#[derive(Serialize)]
struct ExaminedArtifact {
    column: usize,
    cost: f64,
}

fn time_pair(span: TimeSpan) -> [f64; 2] {
    [span.start, span.end]
}
