//! Benchmarks for signal generation.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trader_core::traits::SignalStrategy;
use trader_core::types::Bar;
use trader_signals::EmaBollingerStrategy;

fn generate_test_bars(size: usize) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
    (0..size)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - (i as f64 * 0.7).cos();
            Bar::new(
                start + Duration::minutes(5 * i as i64),
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                1_000.0,
            )
        })
        .collect()
}

fn benchmark_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("EMA Bollinger");
    let strategy = EmaBollingerStrategy::default();

    // One trading day of 5-minute bars is 78
    for size in [78, 156, 10_000].iter() {
        let bars = generate_test_bars(*size);

        group.bench_with_input(BenchmarkId::new("generate", size), &bars, |b, bars| {
            b.iter(|| strategy.generate(black_box(bars)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_generate);
criterion_main!(benches);
