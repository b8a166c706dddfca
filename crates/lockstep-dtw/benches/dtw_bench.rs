//! Criterion benchmarks for lockstep-dtw: full alignment, rolling cost, and multi-dimensional frames.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use lockstep_dtw::{AlignmentEngine, Band, Manhattan, Sequence};

fn make_sine_sequence(n: usize, dim: usize, offset: f64) -> Sequence {
    let values: Vec<f64> = (0..n * dim)
        .map(|i| ((i / dim) as f64 * 0.1 + (i % dim) as f64).sin() + offset)
        .collect();
    Sequence::new(values, dim).unwrap()
}

fn bench_align(c: &mut Criterion) {
    let lengths = [64usize, 256, 1024];
    let bands: &[(Band, &str)] = &[
        (Band::Unbanded, "unbanded"),
        (Band::new(8), "band_w8"),
        (Band::new(32), "band_w32"),
    ];

    let mut group = c.benchmark_group("align");

    for &len in &lengths {
        for &(band, band_label) in bands {
            let id = BenchmarkId::new(format!("len{len}"), band_label);
            let a = make_sine_sequence(len, 1, 0.0);
            let b = make_sine_sequence(len, 1, 1.0);
            let engine = AlignmentEngine::unbanded().with_band(band);

            group.bench_with_input(id, &(a, b, engine), |bencher, (a, b, engine)| {
                bencher.iter(|| engine.align(a.as_view(), b.as_view()));
            });
        }
    }

    group.finish();
}

fn bench_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("cost");

    for &len in &[256usize, 1024] {
        let a = make_sine_sequence(len, 1, 0.0);
        let b = make_sine_sequence(len, 1, 1.0);
        let engine = AlignmentEngine::unbanded();

        group.bench_with_input(BenchmarkId::new("rolling", len), &(a, b), |bencher, (a, b)| {
            bencher.iter(|| engine.cost(a.as_view(), b.as_view()));
        });
    }

    group.finish();
}

fn bench_frames(c: &mut Criterion) {
    let a = make_sine_sequence(256, 39, 0.0);
    let b = make_sine_sequence(300, 39, 0.5);
    let engine = AlignmentEngine::new(2.0, Band::new(16)).unwrap();

    c.bench_function("align_256x300_dim39_w16", |bencher| {
        bencher.iter(|| engine.align(a.as_view(), b.as_view()));
    });
    c.bench_function("align_256x300_dim39_w16_manhattan", |bencher| {
        bencher.iter(|| engine.align_with(a.as_view(), b.as_view(), &Manhattan));
    });
}

criterion_group!(benches, bench_align, bench_cost, bench_frames);
criterion_main!(benches);
