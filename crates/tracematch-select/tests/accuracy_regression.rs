//! Accuracy regression tests for tracematch-select.
//!
//! Three planar candidates (rising, falling, flat) are matched against a short
//! falling stroke. Per-round costs and spans are hardcoded to catch
//! regressions in the recurrence, the reduction order, or the commit rule.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tracematch_dtw::{Dtw, Point, Sequence};
use tracematch_select::{
    CandidateId, FailurePolicy, MultiCandidateSelector, Reference, ReferenceSpan, SelectorConfig,
    TimeSpan,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn p(x: f64, y: f64) -> Point<3> {
    Point::new([x, y, 0.0]).expect("finite point")
}

fn library() -> Vec<(CandidateId, Reference<3>)> {
    let make = |f: fn(f64) -> f64| -> Sequence<3> { (0..10).map(|t| p(t as f64, f(t as f64))).collect() };
    vec![
        ("rise".into(), Reference::new(make(|t| t))),
        (
            "fall".into(),
            Reference::new(make(|t| 9.0 - t))
                .with_timeline((0..10).map(|t| t as f64 * 0.5).collect()),
        ),
        ("flat".into(), Reference::new(make(|_| 5.0))),
    ]
}

fn stroke() -> [Point<3>; 4] {
    [p(2.0, 7.0), p(3.0, 6.0), p(4.0, 5.0), p(5.0, 4.0)]
}

fn costs(selector: &MultiCandidateSelector<3>) -> Vec<(String, f64)> {
    selector
        .outcomes()
        .map(|(id, o)| {
            let cost = o.and_then(|o| o.cost()).map_or(f64::NAN, |c| c.value());
            (id.to_string(), cost)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// a) subsequence_rounds_golden
// ---------------------------------------------------------------------------

#[test]
fn subsequence_rounds_golden() {
    let mut selector =
        MultiCandidateSelector::new(SelectorConfig::new(Dtw::subsequence()), library()).unwrap();

    // (fall, flat, rise) costs, winning span, committed span after the round.
    let expected: [([f64; 3], (usize, usize), Option<(usize, usize)>); 4] = [
        ([58.0, 58.0, 103.0], (0, 0), None),
        ([57.0, 69.0, 161.0], (2, 3), None),
        ([56.0, 73.0, 227.0], (2, 4), Some((2, 4))),
        ([55.0, 78.0, 247.0], (2, 5), Some((2, 5))),
    ];

    for (round, (point, (round_costs, span, committed))) in
        stroke().into_iter().zip(expected).enumerate()
    {
        let best = selector.push(point).unwrap().expect("a winner each round").clone();
        let got = costs(&selector);
        assert_eq!(
            got,
            vec![
                ("fall".to_owned(), round_costs[0]),
                ("flat".to_owned(), round_costs[1]),
                ("rise".to_owned(), round_costs[2]),
            ],
            "round {round}"
        );
        // Round 0 is a fall/flat tie; the lower id wins.
        assert_eq!(best.id.as_str(), "fall", "round {round}");
        assert_eq!(best.span, ReferenceSpan { start: span.0, end: span.1 }, "round {round}");
        assert_eq!(
            selector.committed().map(|s| (s.span.start, s.span.end)),
            committed,
            "round {round}"
        );
    }

    let committed = selector.committed().unwrap();
    assert_eq!(committed.id.as_str(), "fall");
    assert_eq!(committed.query_len, 4);
    assert_eq!(committed.time_span, Some(TimeSpan { start: 1.0, end: 2.5 }));
}

// ---------------------------------------------------------------------------
// b) full_mode_retains_last_commit
// ---------------------------------------------------------------------------

/// In full mode flat wins every round. Round 1 narrows to a one-sample span,
/// so the round 0 commit must survive it.
#[test]
fn full_mode_retains_last_commit() {
    let mut selector =
        MultiCandidateSelector::new(SelectorConfig::new(Dtw::full()), library()).unwrap();
    let stroke = stroke();

    let best = selector.push(stroke[0]).unwrap().unwrap();
    assert_eq!(best.id.as_str(), "flat");
    assert_eq!(best.cost.value(), 875.0);
    assert_eq!(selector.committed().unwrap().span, ReferenceSpan { start: 0, end: 9 });

    let best = selector.push(stroke[1]).unwrap().unwrap();
    assert_eq!(best.span, ReferenceSpan { start: 8, end: 9 });
    let committed = selector.committed().unwrap();
    assert_eq!(committed.span, ReferenceSpan { start: 0, end: 9 });
    assert_eq!(committed.query_len, 1);

    selector.extend(&stroke[2..]).unwrap();
    assert_eq!(
        costs(&selector),
        vec![
            ("fall".to_owned(), 376.0),
            ("flat".to_owned(), 317.0),
            ("rise".to_owned(), 737.0),
        ]
    );
    assert_eq!(selector.committed().unwrap().query_len, 4);
}

// ---------------------------------------------------------------------------
// c) batch_extend_matches_point_by_point
// ---------------------------------------------------------------------------

#[test]
fn batch_extend_matches_point_by_point() {
    let config = SelectorConfig::new(Dtw::subsequence());
    let mut stepwise = MultiCandidateSelector::new(config, library()).unwrap();
    for point in stroke() {
        stepwise.push(point).unwrap();
    }
    let mut batch = MultiCandidateSelector::new(config, library()).unwrap();
    batch.extend(&stroke()).unwrap();

    assert_eq!(stepwise.best(), batch.best());
    assert_eq!(costs(&stepwise), costs(&batch));
}

// ---------------------------------------------------------------------------
// d) random_library_parallel_matches_sequential
// ---------------------------------------------------------------------------

#[test]
fn random_library_parallel_matches_sequential() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut walk = |len: usize| -> Sequence<3> {
        let mut pos = [0.0_f64; 3];
        (0..len)
            .map(|_| {
                for c in &mut pos {
                    *c += rng.r#gen::<f64>() - 0.5;
                }
                Point::new(pos).unwrap()
            })
            .collect()
    };
    let candidates: Vec<(CandidateId, Reference<3>)> = (0..12)
        .map(|i| (CandidateId::new(format!("c{i:02}")), Reference::new(walk(40))))
        .collect();
    let query = walk(25);

    let config = SelectorConfig::new(Dtw::subsequence()).with_failure_policy(FailurePolicy::Abort);
    let mut par = MultiCandidateSelector::new(config, candidates.clone()).unwrap();
    let mut seq = MultiCandidateSelector::new(config.with_parallel(false), candidates).unwrap();

    for point in query.iter() {
        let a = par.push(*point).unwrap().cloned();
        let b = seq.push(*point).unwrap().cloned();
        assert_eq!(a, b);
        let best = a.expect("every candidate aligns");
        assert!(best.path.is_monotonic());
        for (_, outcome) in par.outcomes() {
            let cost = outcome.and_then(|o| o.cost()).expect("aligned");
            assert!(best.cost.value() <= cost.value());
        }
    }
}
