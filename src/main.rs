use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use tracematch_dtw::{DEFAULT_MAX_SUBSEQUENCE_COST, Dtw, Penalty};
use tracematch_io::{GestureReader, ReferenceReader, ResultWriter, SessionName, replay};
use tracematch_select::{
    CandidateId, FailurePolicy, MultiCandidateSelector, ReferenceSpan, SelectorConfig,
};

#[derive(Parser)]
#[command(name = "tracematch")]
#[command(about = "Incremental DTW matching of gesture trajectories against a reference library")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel candidate updates (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared alignment parameters.
#[derive(Args, Debug, Clone)]
struct AlignArgs {
    /// Align the whole gesture against the whole reference instead of the best sub-range
    #[arg(long, default_value_t = false)]
    full: bool,

    /// Penalty added to vertical (query-only) steps
    #[arg(long, default_value_t = 0.0)]
    diagonal_penalty: f64,

    /// Penalty added to horizontal (reference-only) steps and the end-column bias
    #[arg(long, default_value_t = 5.0)]
    off_diagonal_penalty: f64,

    /// Last-row value at which subsequence exploration stops once a path exists
    #[arg(long, default_value_t = DEFAULT_MAX_SUBSEQUENCE_COST)]
    max_subsequence_cost: f64,

    /// Point dimension of the input files (1, 2, or 3)
    #[arg(long, default_value_t = 3)]
    dim: usize,
}

impl AlignArgs {
    fn build_dtw(&self) -> Result<Dtw> {
        let penalty = Penalty::new(self.diagonal_penalty, self.off_diagonal_penalty)
            .context("invalid step penalties")?;
        let dtw = if self.full {
            Dtw::full()
        } else {
            Dtw::subsequence()
        };
        Ok(dtw
            .with_penalty(penalty)
            .with_max_subsequence_cost(self.max_subsequence_cost))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Stream a recorded gesture into the selector and report the winning candidate
    Replay {
        /// Path to the reference library CSV
        #[arg(long)]
        references: PathBuf,

        /// Path to the recorded gesture CSV
        #[arg(long)]
        gesture: PathBuf,

        /// Session name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        session: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Skip points closer than this to the last accepted point
        #[arg(long, default_value_t = 0.0)]
        min_step: f64,

        /// Fail the replay when any candidate cannot be aligned
        #[arg(long, default_value_t = false)]
        abort_on_error: bool,

        #[command(flatten)]
        align: AlignArgs,
    },

    /// Align a recorded gesture against a single reference in one shot
    Align {
        /// Path to the reference library CSV
        #[arg(long)]
        references: PathBuf,

        /// Candidate to align against
        #[arg(long)]
        candidate: String,

        /// Path to the recorded gesture CSV
        #[arg(long)]
        gesture: PathBuf,

        /// Session name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        session: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Include the accumulated-cost matrix in the output file
        #[arg(long, default_value_t = false)]
        dump_matrix: bool,

        #[command(flatten)]
        align: AlignArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct ReplayOutput {
    session: String,
    mode: String,
    n_candidates: usize,
    n_points: usize,
    n_rounds: usize,
    skipped: usize,
    committed: Option<CommittedOutput>,
    output_file: PathBuf,
}

#[derive(Serialize)]
struct CommittedOutput {
    candidate: String,
    cost: f64,
    span: [usize; 2],
    time_span: Option<[f64; 2]>,
    query_len: usize,
}

#[derive(Serialize)]
struct AlignOutput {
    session: String,
    candidate: String,
    mode: String,
    cost: f64,
    span: [usize; 2],
    time_span: Option<[f64; 2]>,
    path_len: usize,
    output_file: PathBuf,
}

struct ReplayJob<'a> {
    references: &'a Path,
    gesture: &'a Path,
    session: SessionName,
    output_dir: &'a Path,
    min_step: f64,
    policy: FailurePolicy,
    dtw: Dtw,
}

struct AlignJob<'a> {
    references: &'a Path,
    candidate: CandidateId,
    gesture: &'a Path,
    session: SessionName,
    output_dir: &'a Path,
    dump_matrix: bool,
    dtw: Dtw,
}

fn run_replay<const D: usize>(job: ReplayJob<'_>) -> Result<ReplayOutput> {
    let library = ReferenceReader::new(job.references)
        .read::<D>()
        .context("failed to read reference library")?;
    let gesture = GestureReader::new(job.gesture)
        .read::<D>()
        .context("failed to read gesture")?;
    let n_candidates = library.len();

    let config = SelectorConfig::new(job.dtw).with_failure_policy(job.policy);
    let mut selector =
        MultiCandidateSelector::new(config, library).context("failed to build selector")?;
    let result = replay(&mut selector, &gesture, job.min_step).context("replay failed")?;

    let session = job.session.as_str().to_string();
    let writer = ResultWriter::new(job.output_dir, job.session)?;
    let output_file =
        writer.write_replay(job.dtw.mode(), &result.rounds, result.committed.as_ref())?;

    Ok(ReplayOutput {
        session,
        mode: job.dtw.mode().to_string(),
        n_candidates,
        n_points: gesture.len(),
        n_rounds: result.rounds.len(),
        skipped: result.skipped,
        committed: result.committed.map(|s| CommittedOutput {
            candidate: s.id.to_string(),
            cost: s.cost.value(),
            span: [s.span.start, s.span.end],
            time_span: s.time_span.map(|t| [t.start, t.end]),
            query_len: s.query_len,
        }),
        output_file,
    })
}

fn run_align<const D: usize>(job: AlignJob<'_>) -> Result<AlignOutput> {
    let mut library = ReferenceReader::new(job.references)
        .read::<D>()
        .context("failed to read reference library")?;
    let reference = library.take(&job.candidate).with_context(|| {
        format!(
            "candidate \"{}\" not found in {}",
            job.candidate,
            job.references.display()
        )
    })?;
    let gesture = GestureReader::new(job.gesture)
        .read::<D>()
        .context("failed to read gesture")?;

    let solution = job
        .dtw
        .align(&gesture, reference.points())
        .context("alignment failed")?;
    let span = ReferenceSpan::from_path(solution.path());
    let time_span = reference
        .timeline()
        .and_then(|t| Some([*t.get(span.start)?, *t.get(span.end)?]));
    info!(candidate = %job.candidate, cost = %solution.cost(), "alignment computed");

    let session = job.session.as_str().to_string();
    let writer = ResultWriter::new(job.output_dir, job.session)?;
    let output_file = writer.write_alignment(&job.candidate, &solution, job.dump_matrix)?;

    Ok(AlignOutput {
        session,
        candidate: job.candidate.to_string(),
        mode: job.dtw.mode().to_string(),
        cost: solution.cost().value(),
        span: [span.start, span.end],
        time_span,
        path_len: solution.path().len(),
        output_file,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Replay {
            references,
            gesture,
            session,
            output_dir,
            min_step,
            abort_on_error,
            align,
        } => {
            let policy = if abort_on_error {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Exclude
            };
            let job = ReplayJob {
                references: &references,
                gesture: &gesture,
                session: SessionName::new(session)?,
                output_dir: &output_dir,
                min_step,
                policy,
                dtw: align.build_dtw()?,
            };
            let output = match align.dim {
                1 => run_replay::<1>(job)?,
                2 => run_replay::<2>(job)?,
                3 => run_replay::<3>(job)?,
                other => anyhow::bail!("unsupported dimension: {other} (expected 1, 2, or 3)"),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Align {
            references,
            candidate,
            gesture,
            session,
            output_dir,
            dump_matrix,
            align,
        } => {
            let job = AlignJob {
                references: &references,
                candidate: CandidateId::new(candidate),
                gesture: &gesture,
                session: SessionName::new(session)?,
                output_dir: &output_dir,
                dump_matrix,
                dtw: align.build_dtw()?,
            };
            let output = match align.dim {
                1 => run_align::<1>(job)?,
                2 => run_align::<2>(job)?,
                3 => run_align::<3>(job)?,
                other => anyhow::bail!("unsupported dimension: {other} (expected 1, 2, or 3)"),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
