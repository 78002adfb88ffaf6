//! Benchmarks for wave analysis and backtesting.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use elwave::prelude::*;

/// Generate a realistic deterministic price walk
fn generate_prices(n: usize) -> Vec<f64> {
  let mut prices = Vec::with_capacity(n);
  let mut price = 100.0f64;

  for i in 0..n {
    let swing = ((i * 7 + 13) % 100) as f64 / 50.0 - 1.0; // Deterministic "random"
    price = (price + swing * 2.5).max(10.0);
    prices.push(price);
  }

  prices
}

fn bench_zigzag(c: &mut Criterion) {
  let prices = generate_prices(10_000);

  c.bench_function("zigzag_10000_bars", |b| {
    b.iter(|| {
      let _ = black_box(zigzag(black_box(&prices), 0.03));
    })
  });
}

fn bench_analyze(c: &mut Criterion) {
  let analyzer = WaveAnalyzer::new();
  let prices = generate_prices(1000);

  c.bench_function("analyze_1000_bars", |b| {
    b.iter(|| {
      let _ = black_box(analyzer.analyze(black_box(&prices)));
    })
  });
}

fn bench_analyze_scaling(c: &mut Criterion) {
  let analyzer = WaveAnalyzer::new();

  let mut group = c.benchmark_group("scaling");

  for size in [100, 500, 1000, 5000].iter() {
    let prices = generate_prices(*size);

    group.bench_with_input(BenchmarkId::new("analyze", size), size, |b, _| {
      b.iter(|| {
        let _ = black_box(analyzer.analyze(black_box(&prices)));
      })
    });
  }

  group.finish();
}

fn bench_find_current_wave(c: &mut Criterion) {
  let analyzer = WaveAnalyzer::new();
  let prices = generate_prices(1000);

  c.bench_function("find_current_wave_1000_bars", |b| {
    b.iter(|| {
      let _ = black_box(analyzer.find_current_wave(black_box(&prices)));
    })
  });
}

fn bench_backtest(c: &mut Criterion) {
  let analyzer = WaveAnalyzer::new();
  let backtester = Backtester::new(&analyzer);
  let prices = generate_prices(250);

  c.bench_function("backtest_250_bars", |b| {
    b.iter(|| {
      let _ = black_box(backtester.run(black_box(&prices), 0, prices.len() - 1));
    })
  });
}

fn bench_parallel_analyze(c: &mut Criterion) {
  let analyzer = WaveAnalyzer::new();
  let prices1 = generate_prices(1000);
  let prices2 = generate_prices(1000);
  let prices3 = generate_prices(1000);
  let prices4 = generate_prices(1000);

  let instruments: Vec<(&str, &[f64])> =
    vec![("SYM1", &prices1), ("SYM2", &prices2), ("SYM3", &prices3), ("SYM4", &prices4)];

  c.bench_function("parallel_analyze_4_instruments", |b| {
    b.iter(|| {
      let _ = black_box(analyze_parallel(black_box(&analyzer), black_box(instruments.clone())));
    })
  });
}

criterion_group!(
  benches,
  bench_zigzag,
  bench_analyze,
  bench_analyze_scaling,
  bench_find_current_wave,
  bench_backtest,
  bench_parallel_analyze,
);

criterion_main!(benches);
