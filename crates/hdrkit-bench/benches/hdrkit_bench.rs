//! Benchmarks for chroma subsampling and transfer functions.
//!
//! Run with: `cargo bench`

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use hdrkit_bench::frame_pair;
use hdrkit_core::SampleFormat;
use hdrkit_ops::{ChromaSubsampler, OvershootPolicy, SubsamplerConfig};
use hdrkit_transfer::TransferKind;

/// Benchmark 1080p 4:4:4 to 4:2:2 conversion per overshoot policy.
fn bench_subsample(c: &mut Criterion) {
    let mut group = c.benchmark_group("subsample_422");
    let (w, h) = (1920, 1080);
    group.throughput(Throughput::Elements((w * h) as u64));

    for policy in [
        OvershootPolicy::None,
        OvershootPolicy::RecomputeIfOutside,
        OvershootPolicy::BlendIfOutside,
        OvershootPolicy::ClampToLocalRange,
    ] {
        let s = ChromaSubsampler::new(&SubsamplerConfig::default().with_policy(policy))
            .expect("subsampler");
        let (inp, mut out) = frame_pair(w, h, SampleFormat::Float);
        group.bench_with_input(BenchmarkId::new("float", format!("{policy:?}")), &inp, |b, inp| {
            b.iter(|| s.process(black_box(&mut out), black_box(inp)))
        });
    }

    let s = ChromaSubsampler::new(&SubsamplerConfig::default()).expect("subsampler");
    for depth in [8u8, 10] {
        let format = SampleFormat::fixed(depth).expect("format");
        let (inp, mut out) = frame_pair(w, h, format);
        group.bench_with_input(BenchmarkId::new("fixed", depth), &inp, |b, inp| {
            b.iter(|| s.process(black_box(&mut out), black_box(inp)))
        });
    }

    group.finish();
}

/// Benchmark transfer functions over a row of samples.
fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");
    let size = 100_000;
    let values: Vec<f32> = (0..size).map(|i| i as f32 / size as f32).collect();
    group.throughput(Throughput::Elements(size as u64));

    for kind in TransferKind::ALL {
        let tf = kind.build();
        group.bench_with_input(BenchmarkId::new("forward", kind.name()), &values, |b, v| {
            b.iter(|| {
                let mut buf = v.clone();
                tf.forward_in_place(black_box(&mut buf));
                buf
            })
        });
        group.bench_with_input(BenchmarkId::new("inverse", kind.name()), &values, |b, v| {
            b.iter(|| {
                let mut buf = v.clone();
                tf.inverse_in_place(black_box(&mut buf));
                buf
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_subsample, bench_transfer);
criterion_main!(benches);
