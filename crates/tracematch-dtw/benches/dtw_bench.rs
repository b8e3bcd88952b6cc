//! Criterion benchmarks for tracematch-dtw: batch alignment and point-by-point updates.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tracematch_dtw::{Dtw, Point, Sequence};

fn make_walk(len: usize, seed: u64) -> Sequence<3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pos = [0.0_f64; 3];
    (0..len)
        .map(|_| {
            for c in &mut pos {
                *c += rng.r#gen::<f64>() - 0.5;
            }
            Point::new(pos).unwrap()
        })
        .collect()
}

fn bench_batch_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_align");
    for &(n, m) in &[(32usize, 128usize), (64, 256), (128, 512)] {
        let query = make_walk(n, 1);
        let reference = make_walk(m, 2);
        for (label, dtw) in [("full", Dtw::full()), ("subsequence", Dtw::subsequence())] {
            let id = BenchmarkId::new(label, format!("{n}x{m}"));
            group.bench_with_input(id, &(&query, &reference), |b, (q, r)| {
                b.iter(|| dtw.align(q, r).unwrap());
            });
        }
    }
    group.finish();
}

fn bench_incremental_session(c: &mut Criterion) {
    let query = make_walk(64, 3);
    let reference = make_walk(256, 4);
    let dtw = Dtw::subsequence();

    c.bench_function("incremental_session_64x256", |b| {
        b.iter(|| {
            let mut aligner = dtw.aligner(reference.clone()).unwrap();
            let mut grown = Sequence::new();
            for p in query.iter() {
                grown.push(*p);
                aligner.update(&grown).unwrap();
            }
        });
    });
}

criterion_group!(benches, bench_batch_align, bench_incremental_session);
criterion_main!(benches);
