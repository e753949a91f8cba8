//! Shared helpers for the tanh falsification tests.

use batched_tanh::{BackendChoice, KernelConfig, TanhKernel};

/// Asserts every element in a slice is finite (not NaN or infinite).
pub fn assert_all_finite(slice: &[f32]) {
    for (i, &val) in slice.iter().enumerate() {
        assert!(val.is_finite(), "Element [{i}] is not finite: {val}");
    }
}

/// Pad `values` with zeros up to the next multiple of `lane_width`.
pub fn pad_to_lanes(values: &[f32], lane_width: usize) -> Vec<f32> {
    let groups = values.len().div_ceil(lane_width).max(1);
    let mut padded = vec![0.0f32; groups * lane_width];
    padded[..values.len()].copy_from_slice(values);
    padded
}

/// Evenly spaced f32 samples over `[lo, hi]`, `n >= 2`.
pub fn linspace(lo: f32, hi: f32, n: usize) -> Vec<f32> {
    let step = (f64::from(hi) - f64::from(lo)) / (n - 1) as f64;
    (0..n)
        .map(|i| (f64::from(lo) + step * i as f64) as f32)
        .collect()
}

/// Every kernel the host can run at `lane_width`: scalar, plus AVX2 when present.
pub fn host_kernels(lane_width: usize) -> Vec<TanhKernel> {
    [BackendChoice::Scalar, BackendChoice::Avx2]
        .into_iter()
        .filter_map(|choice| {
            TanhKernel::new(
                KernelConfig::default()
                    .with_lane_width(lane_width)
                    .with_backend(choice),
            )
            .ok()
        })
        .collect()
}

/// Run `kernel` over `input`, returning a fresh output buffer.
pub fn run(kernel: &TanhKernel, input: &[f32]) -> Vec<f32> {
    let mut output = vec![0.0f32; input.len()];
    kernel
        .transform(input, &mut output)
        .unwrap_or_else(|e| panic!("transform failed: {e}"));
    output
}
