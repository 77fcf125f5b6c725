//! Criterion benchmarks for SwingScan hot paths.
//!
//! Benchmarks:
//! 1. Feature table build (all indicators + calendar) over series lengths
//! 2. Label construction
//! 3. Classifier fit on one ticker's history and single-row scoring

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use swingscan_core::domain::DailyBar;
use swingscan_core::features::{build_labels, FeatureEngine, LabelConfig};
use swingscan_core::model::{Classifier, GbmParams, GradientBoostedClassifier};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<DailyBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.02;
            DailyBar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0 + (i % 5_000) as f64 * 100.0,
            }
        })
        .collect()
}

fn training_set(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let bars = make_bars(n);
    let rows = FeatureEngine::default().build(&bars);
    let labeled = build_labels(&bars, rows, &LabelConfig::default());
    let x = labeled.iter().map(|r| r.features.model_inputs()).collect();
    let y = labeled
        .iter()
        .map(|r| if r.swing_target { 1.0 } else { 0.0 })
        .collect();
    (x, y)
}

// ── 1. Feature build ─────────────────────────────────────────────────

fn bench_feature_build(c: &mut Criterion) {
    let engine = FeatureEngine::default();
    let mut group = c.benchmark_group("feature_build");
    for n in [250, 1_000, 5_000] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| engine.build(black_box(bars)))
        });
    }
    group.finish();
}

// ── 2. Labels ────────────────────────────────────────────────────────

fn bench_labels(c: &mut Criterion) {
    let bars = make_bars(1_000);
    let rows = FeatureEngine::default().build(&bars);
    let config = LabelConfig::default();
    c.bench_function("build_labels_1000", |b| {
        b.iter(|| build_labels(black_box(&bars), rows.clone(), &config))
    });
}

// ── 3. Classifier ────────────────────────────────────────────────────

fn bench_fit_and_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("gbm_fit");
    group.sample_size(20);
    for n in [250, 1_000] {
        let (x, y) = training_set(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut model = GradientBoostedClassifier::new(GbmParams::default());
                model.fit(black_box(x), black_box(y)).unwrap();
                model.predict_proba(&x[x.len() - 1]).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_feature_build, bench_labels, bench_fit_and_score);
criterion_main!(benches);
