//! Incremental DTW over fixed-dimension point sequences.
//!
//! Pure math library, zero I/O. Builds squared-distance cost matrices, runs
//! the full or subsequence accumulated-cost recurrence with step penalties,
//! backtracks warping paths, and keeps all of it up to date as a query grows
//! one point at a time.

mod accumulated;
mod alignment;
mod cost;
mod distance;
mod dtw;
mod error;
mod incremental;
mod matrix;
mod mode;
mod path;
mod point;
mod sequence;
mod subsequence;

pub use accumulated::AccumulatedCostMatrix;
pub use alignment::{Alignment, Solution};
pub use cost::CostMatrix;
pub use distance::AlignmentCost;
pub use dtw::Dtw;
pub use error::DtwError;
pub use incremental::{IncrementalDtw, Phase};
pub use matrix::Matrix;
pub use mode::{AlignmentMode, Penalty};
pub use path::{WarpingPath, WarpingStep, backtrack, cost_of_path};
pub use point::Point;
pub use sequence::Sequence;
pub use subsequence::{
    DEFAULT_MAX_SUBSEQUENCE_COST, ExaminedColumn, SubsequenceMatch, select_subsequence,
};
