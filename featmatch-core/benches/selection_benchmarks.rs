use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use featmatch_core::{best_matches, ratio_test, Match, Neighbors};

/// Deterministic pseudo-random distances, roughly what a Hamming matcher returns
fn create_benchmark_matches(count: usize) -> Vec<Match> {
    let mut state = 0x2545_f491_u32;
    (0..count)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            Match::new(i, (state as usize) % count.max(1), (state % 256) as f32)
        })
        .collect()
}

fn create_benchmark_neighbors(count: usize) -> Vec<Neighbors> {
    create_benchmark_matches(count * 2)
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let (a, b) = (pair[0].distance, pair[1].distance);
            vec![
                Match::new(i, pair[0].train_idx, a.min(b)),
                Match::new(i, pair[1].train_idx, a.max(b)),
            ]
        })
        .collect()
}

fn bench_best_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_matches");
    for &count in &[500usize, 5_000, 50_000] {
        let matches = create_benchmark_matches(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &matches, |b, m| {
            b.iter(|| best_matches(black_box(m.clone()), 20))
        });
    }
    group.finish();
}

fn bench_ratio_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("ratio_test");
    for &count in &[500usize, 5_000, 50_000] {
        let neighbors = create_benchmark_neighbors(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &neighbors, |b, n| {
            b.iter(|| ratio_test(black_box(n), 0.75))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_best_matches, bench_ratio_test);
criterion_main!(benches);
