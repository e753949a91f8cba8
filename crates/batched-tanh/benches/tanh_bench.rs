//! tanh kernel throughput: per-lane scalar, std `f32::tanh`, and the
//! validated entry point on every backend the host supports.
//!
//! Vector sizes: 1K, 4K, 16K, 64K, 256K elements.

use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use batched_tanh::kernels::tanh::tanh_scalar;
use batched_tanh::{BackendChoice, KernelConfig, TanhKernel};

const ELEM_SIZES: &[usize] = &[1024, 4096, 16384, 65536, 262144];

fn size_label(n: usize) -> String {
    match n {
        1024 => "1K".into(),
        4096 => "4K".into(),
        16384 => "16K".into(),
        65536 => "64K".into(),
        262144 => "256K".into(),
        _ => format!("{n}"),
    }
}

/// Deterministic inputs spread over [-10, 10], saturated tails included.
fn bench_input(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| ((i * 7919) % 20001) as f32 * 1e-3 - 10.0)
        .collect()
}

/// Bytes read plus bytes written.
fn rw_bytes(n: usize) -> u64 {
    (n * 2 * std::mem::size_of::<f32>()) as u64
}

fn bench_tanh_scalar(c: &mut Criterion) {
    let mut group = c.benchmark_group("tanh/scalar");
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(3));

    for &n in ELEM_SIZES {
        group.throughput(Throughput::Bytes(rw_bytes(n)));
        let input = bench_input(n);
        let mut output = vec![0.0f32; n];

        group.bench_with_input(BenchmarkId::new("lane", size_label(n)), &n, |bench, _| {
            bench.iter(|| {
                tanh_scalar(black_box(&input), black_box(&mut output));
                black_box(&output);
            });
        });
        group.bench_with_input(BenchmarkId::new("std", size_label(n)), &n, |bench, _| {
            bench.iter(|| {
                for (x, y) in black_box(&input).iter().zip(output.iter_mut()) {
                    *y = x.tanh();
                }
                black_box(&output);
            });
        });
    }
    group.finish();
}

fn bench_tanh_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("tanh/transform");
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(3));

    for choice in [BackendChoice::Scalar, BackendChoice::Avx2] {
        let Ok(kernel) = TanhKernel::new(KernelConfig::default().with_backend(choice)) else {
            continue;
        };
        for &n in ELEM_SIZES {
            group.throughput(Throughput::Bytes(rw_bytes(n)));
            let input = bench_input(n);
            let mut output = vec![0.0f32; n];
            let id = BenchmarkId::new(format!("{:?}", kernel.backend()), size_label(n));

            group.bench_with_input(id, &n, |bench, _| {
                bench.iter(|| {
                    kernel
                        .transform(black_box(&input), black_box(&mut output))
                        .unwrap();
                    black_box(&output);
                });
            });
        }
    }
    group.finish();
}

criterion_group!(
    name = tanh_benches;
    config = Criterion::default();
    targets =
        bench_tanh_scalar,
        bench_tanh_backends,
);
criterion_main!(tanh_benches);
