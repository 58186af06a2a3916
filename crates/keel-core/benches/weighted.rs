use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keel_core::random::{sample_indices, sample_indices_unique};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_weighted_sampling(c: &mut Criterion) {
    // A loot-table-like distribution: mostly light weights, a few heavy ones
    let weights: Vec<u64> = (0..1_000u64)
        .map(|i| if i % 97 == 0 { 500 } else { (i % 7) + 1 })
        .collect();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    let mut group = c.benchmark_group("Weighted Sampling");

    group.bench_function("32 draws with replacement (1k table)", |b| {
        b.iter(|| {
            let picks = sample_indices(&mut rng, black_box(&weights), 32).unwrap();
            black_box(picks);
        });
    });

    group.bench_function("32 unique draws (1k table)", |b| {
        b.iter(|| {
            let picks = sample_indices_unique(&mut rng, black_box(&weights), 32).unwrap();
            black_box(picks);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_weighted_sampling);
criterion_main!(benches);
