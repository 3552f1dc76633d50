//! Benchmarks for the load and margin pipeline

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use wingbox_core::analysis::Analysis;
use wingbox_core::case::{AnalysisScope, AnalysisSettings, CaseFile};
use wingbox_core::numerics::{integrate, QuadratureSettings};

fn sample_with(workers: usize, analyses: AnalysisScope) -> CaseFile {
    let case = CaseFile::sample().unwrap();
    let settings = AnalysisSettings {
        workers: Some(workers),
        analyses,
        ..case.settings.clone()
    };
    case.with_settings(settings)
}

fn benchmark_quadrature(c: &mut Criterion) {
    let settings = QuadratureSettings::default();
    c.bench_function("integrate_smooth", |b| {
        b.iter(|| integrate(|x| Ok((x * 0.3).sin() * x), black_box(0.0), black_box(15.0), &settings).unwrap())
    });
}

fn benchmark_shear(c: &mut Criterion) {
    // The inertia cache lives on the wing box, so every iteration gets a fresh case
    c.bench_function("shear_curve", |b| {
        b.iter_batched(
            || sample_with(4, AnalysisScope::All),
            |case| {
                let analysis = Analysis::from_case(&case).unwrap();
                black_box(analysis.shear().unwrap());
            },
            BatchSize::SmallInput,
        )
    });
}

fn benchmark_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.sample_size(10);

    for workers in [1, 4] {
        group.bench_function(format!("workers_{}", workers), |b| {
            b.iter_batched(
                || sample_with(workers, AnalysisScope::All),
                |case| black_box(Analysis::from_case(&case).unwrap().run().unwrap()),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_quadrature, benchmark_shear, benchmark_full_run);
criterion_main!(benches);
