use criterion::{criterion_group, criterion_main, Criterion};
use tinyrand::StdRand;

use puckcast::metrics::calculate_roi_metrics;
use puckcast::simulate::{simulate_kelly_betting, simulate_threshold_betting, sweep_kelly_fractions};
use puckcast::synthetic::Generator;

fn criterion_benchmark(c: &mut Criterion) {
    // one regular season
    let games = Generator::new(StdRand::default()).games(1_312);

    // sanity check
    assert!(!simulate_threshold_betting(&games, 0.05, 100.0).bets.is_empty());
    c.bench_function("cri_simulate_threshold", |b| {
        b.iter(|| simulate_threshold_betting(&games, 0.05, 100.0));
    });

    c.bench_function("cri_simulate_kelly", |b| {
        b.iter(|| simulate_kelly_betting(&games, 0.25, 10_000.0));
    });

    let ledger = simulate_kelly_betting(&games, 0.25, 10_000.0);
    c.bench_function("cri_simulate_roi_metrics", |b| {
        b.iter(|| calculate_roi_metrics(&ledger.bets, None));
    });

    let fractions = [0.05, 0.1, 0.25, 0.5, 0.75, 1.0];
    c.bench_function("cri_simulate_sweep_6", |b| {
        b.iter(|| sweep_kelly_fractions(&games, &fractions, 10_000.0));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
