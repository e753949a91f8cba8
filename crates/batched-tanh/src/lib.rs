//! # batched-tanh
//!
//! Single-precision `tanh` over batches of f32, processed in fixed-width
//! lane-groups with no dependency between lanes.
//!
//! The numeric core range-reduces `-|x|` against `ln2`, rebuilds `2^(2n)`
//! from a 4-entry table and the float exponent field, approximates
//! `expm1` with a degree-4 polynomial and divides through a Newton-refined
//! reciprocal estimate. Results stay within a few ULP of the exact value
//! and saturate to exactly `±1` for `|x| >= 9`.
//!
//! ## Modules
//!
//! - [`kernels`] — Raw slice kernels (scalar, AVX2+FMA) and ULP utilities
//! - [`kernel`] — [`TanhKernel`], the validated `transform` entry point
//! - [`config`] — Lane width and backend selection, loadable from YAML
//! - [`error`] — [`KernelError`]
//!
//! ```
//! use batched_tanh::tanh_transform;
//!
//! let input = [0.0f32, -20.0, 1.0, -1.0, 0.5, -0.5, 9.5, 2.0];
//! let mut output = [0.0f32; 8];
//! tanh_transform(&input, &mut output).unwrap();
//! assert_eq!(output[1], -1.0);
//! assert_eq!(output[2], -output[3]);
//! ```

pub mod config;
pub mod error;
pub mod kernel;
pub mod kernels;

pub use config::{BackendChoice, KernelConfig};
pub use error::KernelError;
pub use kernel::{tanh_transform, TanhKernel};
pub use kernels::Backend;
