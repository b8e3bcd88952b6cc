//! End-column exploration for subsequence alignment.

use tracing::{debug, instrument};

use crate::accumulated::AccumulatedCostMatrix;
use crate::distance::AlignmentCost;
use crate::error::DtwError;
use crate::path::{WarpingPath, backtrack};

/// Default last-row value at which exploration stops once a path exists.
pub const DEFAULT_MAX_SUBSEQUENCE_COST: f64 = 99_999.0;

/// One end column examined during exploration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExaminedColumn {
    /// Reference column the candidate path ends at.
    pub column: usize,
    /// Path cost of that candidate.
    pub cost: AlignmentCost,
}

/// Best subsequence path plus every end column that was tried.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsequenceMatch {
    /// Lowest-cost path.
    pub path: WarpingPath,
    /// Cost of `path`.
    pub cost: AlignmentCost,
    /// Examined columns in visiting order.
    pub examined: Vec<ExaminedColumn>,
}

/// Pick the best end column of a subsequence-mode matrix.
///
/// Last-row columns are visited in ascending `(value, column)` order. Each
/// visit backtracks a path; exploration stops at the first column whose
/// last-row value is `>= max_cost` provided at least one path was already
/// produced. The lowest path cost wins and ties keep the earliest visit.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::EmptySequence`] | The matrix has no rows or columns |
#[instrument(skip(matrix), fields(n = matrix.rows(), m = matrix.width()))]
pub fn select_subsequence(
    matrix: &AccumulatedCostMatrix,
    max_cost: f64,
) -> Result<SubsequenceMatch, DtwError> {
    if matrix.rows() == 0 || matrix.width() == 0 {
        return Err(DtwError::EmptySequence);
    }
    let last = matrix.last_row();
    let mut order: Vec<usize> = (0..last.len()).collect();
    order.sort_by(|&a, &b| last[a].total_cmp(&last[b]).then(a.cmp(&b)));

    let mut examined = Vec::new();
    let mut best: Option<(WarpingPath, AlignmentCost)> = None;
    for column in order {
        if last[column] >= max_cost && best.is_some() {
            break;
        }
        let (path, cost) = backtrack(matrix, Some(column))?;
        examined.push(ExaminedColumn { column, cost });
        match &best {
            Some((_, best_cost)) if cost.total_cmp(best_cost).is_ge() => {}
            _ => best = Some((path, cost)),
        }
    }

    let (path, cost) = best.ok_or(DtwError::EmptySequence)?;
    debug!(
        examined = examined.len(),
        end = path.end_column(),
        %cost,
        "subsequence end column selected"
    );
    Ok(SubsequenceMatch {
        path,
        cost,
        examined,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostMatrix;
    use crate::mode::{AlignmentMode, Penalty};
    use crate::sequence::Sequence;

    const REFERENCE: [f64; 19] = [
        0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0, 0.0, 0.0, 1.0, 2.0, 3.0, 2.0,
        1.0,
    ];

    fn matrix() -> AccumulatedCostMatrix {
        let q = Sequence::from_scalars(&[4.0, 3.0, 2.0, 1.0]).unwrap();
        let r = Sequence::from_scalars(&REFERENCE).unwrap();
        let c = CostMatrix::compute(q.as_slice(), r.as_slice()).unwrap();
        AccumulatedCostMatrix::compute(&c, AlignmentMode::Subsequence, Penalty::default()).unwrap()
    }

    #[test]
    fn finds_descending_run() {
        let m = select_subsequence(&matrix(), DEFAULT_MAX_SUBSEQUENCE_COST).unwrap();
        assert_eq!(m.path.end_column(), Some(11));
        assert_eq!(m.cost.value(), 178.0);
        assert_eq!(m.examined.len(), 19);
    }

    #[test]
    fn best_is_no_worse_than_any_examined() {
        let m = select_subsequence(&matrix(), DEFAULT_MAX_SUBSEQUENCE_COST).unwrap();
        assert!(m.examined.iter().all(|e| m.cost.value() <= e.cost.value()));
    }

    #[test]
    fn low_threshold_examines_only_cheapest_column() {
        // Column 18 holds the lowest last-row value (78).
        for threshold in [80.0, 0.0] {
            let m = select_subsequence(&matrix(), threshold).unwrap();
            assert_eq!(m.examined.len(), 1);
            assert_eq!(m.examined[0].column, 18);
            assert_eq!(m.cost.value(), 234.0);
        }
    }

    #[test]
    fn visiting_order_is_by_last_row_value() {
        let d = matrix();
        let m = select_subsequence(&d, DEFAULT_MAX_SUBSEQUENCE_COST).unwrap();
        let values: Vec<f64> = m.examined.iter().map(|e| d.last_row()[e.column]).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }
}
