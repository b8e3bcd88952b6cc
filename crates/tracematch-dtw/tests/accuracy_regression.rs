//! Accuracy regression tests for tracematch-dtw.
//!
//! Golden paths, costs, and matrix rows below were computed by hand-checked
//! runs of the recurrence and are hardcoded to catch regressions.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tracematch_dtw::{AlignmentMode, Dtw, DtwError, Penalty, Point, Sequence, WarpingPath};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn seq(values: &[f64]) -> Sequence<1> {
    Sequence::from_scalars(values).expect("valid test sequence")
}

fn random_walk(rng: &mut ChaCha8Rng, len: usize) -> Sequence<3> {
    let mut pos = [0.0_f64; 3];
    (0..len)
        .map(|_| {
            for c in &mut pos {
                *c += rng.r#gen::<f64>() - 0.5;
            }
            Point::new(pos).expect("finite walk")
        })
        .collect()
}

fn assert_spans_all_rows(path: &WarpingPath, rows: usize) {
    assert!(path.is_monotonic(), "path not monotonic: {:?}", path.to_pairs());
    assert_eq!(path.first().map(|s| s.query), Some(0));
    assert_eq!(path.last().map(|s| s.query), Some(rows - 1));
}

const SCENARIO_B_REFERENCE: [f64; 19] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0, 0.0, 0.0, 1.0, 2.0, 3.0, 2.0, 1.0,
];

// ---------------------------------------------------------------------------
// a) full_mode_scenario_golden
// ---------------------------------------------------------------------------

#[test]
fn full_mode_scenario_golden() {
    let solution = Dtw::full()
        .align(&seq(&[0.0, 1.0, 2.0, 3.0]), &seq(&[0.0, 1.0, 1.0, 2.0, 2.0, 3.0]))
        .expect("alignment should succeed");
    assert_eq!(
        solution.path().to_pairs(),
        vec![(0, 0), (0, 1), (1, 2), (2, 3), (2, 4), (3, 5)]
    );
    assert_eq!(solution.cost().value(), 29.0);
}

// ---------------------------------------------------------------------------
// b) subsequence_scenario_golden
// ---------------------------------------------------------------------------

#[test]
fn subsequence_scenario_golden() {
    let solution = Dtw::subsequence()
        .align(&seq(&[4.0, 3.0, 2.0, 1.0]), &seq(&SCENARIO_B_REFERENCE))
        .expect("alignment should succeed");

    let mut expected: Vec<(usize, usize)> = (0..=8).map(|m| (0, m)).collect();
    expected.extend([(1, 9), (2, 10), (3, 11)]);
    assert_eq!(solution.path().to_pairs(), expected);
    assert_eq!(solution.cost().value(), 178.0);
    assert_eq!(solution.examined().len(), 19);

    let d = solution.accumulated();
    assert_eq!(
        d.matrix().row(0),
        &[
            16.0, 16.0, 16.0, 16.0, 16.0, 9.0, 4.0, 1.0, 0.0, 1.0, 4.0, 9.0, 16.0, 16.0, 9.0, 4.0,
            1.0, 4.0, 9.0
        ]
    );
    assert_eq!(
        d.matrix().row(1),
        &[
            21.0, 25.0, 25.0, 25.0, 25.0, 13.0, 5.0, 1.0, 1.0, 0.0, 2.0, 8.0, 18.0, 25.0, 13.0,
            5.0, 1.0, 2.0, 8.0
        ]
    );
    assert_eq!(
        d.matrix().row(2),
        &[
            35.0, 25.0, 29.0, 29.0, 29.0, 14.0, 5.0, 2.0, 5.0, 1.0, 0.0, 3.0, 12.0, 21.0, 14.0,
            5.0, 2.0, 1.0, 3.0
        ]
    );
    assert_eq!(
        d.last_row(),
        &[
            139.0, 120.0, 119.0, 122.0, 121.0, 104.0, 95.0, 94.0, 98.0, 91.0, 86.0, 84.0, 87.0,
            95.0, 95.0, 86.0, 85.0, 80.0, 78.0
        ]
    );
}

#[test]
fn subsequence_threshold_limits_exploration() {
    for threshold in [80.0, 0.0] {
        let solution = Dtw::subsequence()
            .with_max_subsequence_cost(threshold)
            .align(&seq(&[4.0, 3.0, 2.0, 1.0]), &seq(&SCENARIO_B_REFERENCE))
            .expect("alignment should succeed");
        assert_eq!(solution.examined().len(), 1, "threshold {threshold}");
        assert_eq!(solution.path().end_column(), Some(18));
        assert_eq!(solution.cost().value(), 234.0);
    }
}

// ---------------------------------------------------------------------------
// c) single_point_query
// ---------------------------------------------------------------------------

#[test]
fn single_point_query_walks_row_zero() {
    let solution = Dtw::full()
        .align(&seq(&[2.0]), &seq(&[0.0, 1.0, 2.0, 3.0]))
        .expect("alignment should succeed");
    assert_eq!(solution.path().to_pairs(), vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
    assert_eq!(solution.cost().value(), 88.0);
    assert_eq!(solution.accumulated().matrix().row(0), &[20.0, 23.0, 23.0, 22.0]);
}

// ---------------------------------------------------------------------------
// d) identity_alignment
// ---------------------------------------------------------------------------

#[test]
fn identity_alignment_is_diagonal() {
    let s = seq(&[0.0, 1.0, 2.0, 3.0]);
    for (penalty, cost) in [(Penalty::ZERO, 0.0), (Penalty::default(), 17.0)] {
        let solution = Dtw::full().with_penalty(penalty).align(&s, &s).unwrap();
        assert_eq!(
            solution.path().to_pairs(),
            vec![(0, 0), (1, 1), (2, 2), (3, 3)]
        );
        assert_eq!(solution.cost().value(), cost);
    }
}

// ---------------------------------------------------------------------------
// e) incremental_equivalence_every_split
// ---------------------------------------------------------------------------

/// Growing the query from any split point must reproduce the batch result
/// exactly, in both modes.
#[test]
fn incremental_equivalence_every_split() {
    let x = seq(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
    let y = seq(&[2.0, 7.0, 1.0, 8.0, 2.0, 8.0, 1.0, 8.0, 2.0, 8.0]);

    let cases = [
        (
            AlignmentMode::Full,
            373.0,
            vec![
                (0, 0), (0, 1), (0, 2), (0, 3), (1, 4), (2, 5), (3, 6), (4, 7), (5, 7), (6, 8),
                (7, 9),
            ],
        ),
        (
            AlignmentMode::Subsequence,
            178.0,
            vec![
                (0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (1, 4), (2, 4), (3, 4), (4, 4), (5, 5),
                (6, 6), (7, 7),
            ],
        ),
    ];

    for (mode, cost, pairs) in cases {
        let dtw = Dtw::with_mode(mode);
        let batch = dtw.align(&x, &y).unwrap();
        assert_eq!(batch.cost().value(), cost, "mode {mode}");
        assert_eq!(batch.path().to_pairs(), pairs, "mode {mode}");

        for split in 1..x.len() {
            let mut aligner = dtw.aligner(y.clone()).unwrap();
            let head: Sequence<1> = x.iter().take(split).copied().collect();
            aligner.align(&head).unwrap();
            let alignment = aligner.update(&x).unwrap();
            assert_eq!(alignment, batch.alignment(), "mode {mode}, split {split}");
        }
    }
}

// ---------------------------------------------------------------------------
// f) random_walk_incremental_regression
// ---------------------------------------------------------------------------

/// Point-by-point updates over seeded 3-D random walks must match batch
/// alignment at every length, and every path must be well-formed.
#[test]
fn random_walk_incremental_regression() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for trial in 0..5 {
        let reference = random_walk(&mut rng, 30);
        let query = random_walk(&mut rng, 20);

        for dtw in [Dtw::full(), Dtw::subsequence()] {
            let mut aligner = dtw.aligner(reference.clone()).unwrap();
            let mut grown = Sequence::new();
            for p in query.iter() {
                grown.push(*p);
                let incremental = aligner.update(&grown).unwrap();
                let batch = dtw.align(&grown, &reference).unwrap();
                assert_eq!(
                    incremental,
                    batch.alignment(),
                    "trial {trial}, mode {}, len {}",
                    dtw.mode(),
                    grown.len()
                );
                assert_spans_all_rows(incremental.path, grown.len());
                assert!(
                    incremental.matrix.matrix().as_slice().iter().all(|&v| v >= 0.0),
                    "negative accumulated entry"
                );
            }
            for e in aligner.examined() {
                let best = aligner.alignment().unwrap().cost;
                assert!(best.value() <= e.cost.value());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// g) penalty_raises_diagonal_share
// ---------------------------------------------------------------------------

#[test]
fn penalty_raises_diagonal_share() {
    let q = seq(&[4.0, 1.0, 2.0, 2.0]);
    let r = seq(&[0.0, 1.0, 1.0, 2.0]);
    let share = |penalty: Penalty| {
        let s = Dtw::full().with_penalty(penalty).align(&q, &r).unwrap();
        s.path().diagonal_moves() as f64 / (s.path().len() - 1) as f64
    };
    let loose = share(Penalty::ZERO);
    let strict = share(Penalty::default());
    assert_eq!(loose, 0.5);
    assert_eq!(strict, 1.0);
    assert!(strict > loose);
}

// ---------------------------------------------------------------------------
// h) invalid_updates
// ---------------------------------------------------------------------------

#[test]
fn invalid_updates_leave_aligner_untouched() {
    let mut aligner = Dtw::subsequence().aligner(seq(&SCENARIO_B_REFERENCE)).unwrap();
    aligner.align(&seq(&[4.0, 3.0])).unwrap();
    let path_before = aligner.alignment().unwrap().path.clone();
    let matrix_before = aligner.accumulated().unwrap().clone();

    let err = aligner.update(&seq(&[4.0, 2.5, 1.0])).map(|_| ()).unwrap_err();
    assert_eq!(err, DtwError::InvalidAppend { position: 1 });

    let too_long: Vec<f64> = (0..20).map(f64::from).collect();
    let mut aligner_short = Dtw::subsequence().aligner(seq(&[1.0, 2.0])).unwrap();
    aligner_short.align(&seq(&[0.0])).unwrap();
    let err = aligner_short.update(&seq(&too_long[..3])).map(|_| ()).unwrap_err();
    assert!(matches!(err, DtwError::DegenerateReference { .. }));

    assert_eq!(aligner.alignment().unwrap().path, &path_before);
    assert_eq!(aligner.accumulated().unwrap(), &matrix_before);
}
