//! Benchmarks for batch phenology detection

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use phenoscope_algorithms::phenology::{phenology_events, season_metrics, PhenologyParams};
use phenoscope_core::{NdviMatrix, DAYS_PER_YEAR};

fn create_batch(samples: usize) -> NdviMatrix {
    let names = (0..samples).map(|i| format!("plot_{i}")).collect();
    let columns = (0..samples)
        .map(|i| {
            // Shift each season by a few days so samples differ
            let center = 190.0 + (i % 40) as f64;
            (0..DAYS_PER_YEAR)
                .map(|d| {
                    let x = (d as f64 - center) / 35.0;
                    let dip = ((d as f64 - center + 75.0) / 20.0).powi(2);
                    0.25 + 0.5 * (-x * x).exp() - 0.1 * (-dip).exp()
                })
                .collect()
        })
        .collect();
    NdviMatrix::from_columns(names, columns).unwrap()
}

fn bench_season_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("season_metrics");
    let params = PhenologyParams::default();

    for samples in [10, 100, 1000].iter() {
        let batch = create_batch(*samples);

        group.bench_with_input(BenchmarkId::from_parameter(samples), samples, |b, _| {
            b.iter(|| season_metrics(black_box(&batch), &params).unwrap())
        });
    }

    group.finish();
}

fn bench_phenology_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("phenology_events");
    let params = PhenologyParams::default();

    for samples in [10, 100, 1000].iter() {
        let batch = create_batch(*samples);

        group.bench_with_input(BenchmarkId::from_parameter(samples), samples, |b, _| {
            b.iter(|| phenology_events(black_box(&batch), &params).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_season_metrics, bench_phenology_events);
criterion_main!(benches);
