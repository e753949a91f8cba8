//! Validated entry point over the raw kernels.

use crate::config::KernelConfig;
use crate::error::KernelError;
use crate::kernels::tanh::tanh_scalar;
use crate::kernels::Backend;

/// A tanh kernel with its lane width and backend fixed at construction.
///
/// Pure and re-entrant: `transform` takes `&self` and touches nothing but the
/// output slice, so one kernel can serve any number of threads, each on its
/// own lane-groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TanhKernel {
    lane_width: usize,
    backend: Backend,
}

impl TanhKernel {
    /// # Errors
    ///
    /// Returns `KernelError::InvalidLaneWidth` for a rejected lane width and
    /// `KernelError::BackendUnavailable` for a forced backend the host lacks.
    pub fn new(config: KernelConfig) -> Result<Self, KernelError> {
        config.validate()?;
        let backend = config.resolve_backend()?;
        log::debug!(
            "tanh kernel: backend {backend:?}, lane width {}",
            config.lane_width
        );
        Ok(Self {
            lane_width: config.lane_width,
            backend,
        })
    }

    #[must_use]
    pub fn lane_width(&self) -> usize {
        self.lane_width
    }

    #[must_use]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Check `transform`'s preconditions without touching any data.
    ///
    /// # Errors
    ///
    /// See [`TanhKernel::transform`].
    pub fn check(&self, input_len: usize, output_len: usize) -> Result<(), KernelError> {
        if input_len != output_len {
            return Err(KernelError::LengthMismatch {
                input: input_len,
                output: output_len,
            });
        }
        if input_len == 0 || input_len % self.lane_width != 0 {
            return Err(KernelError::PreconditionViolation {
                count: input_len,
                lane_width: self.lane_width,
            });
        }
        Ok(())
    }

    /// Write `tanh(input[i])` to `output[i]` for every element.
    ///
    /// All-or-nothing: preconditions are checked before the first write, so on
    /// error `output` is untouched. `input` and `output` cannot alias.
    ///
    /// # Errors
    ///
    /// `KernelError::LengthMismatch` if the slices differ in length, and
    /// `KernelError::PreconditionViolation` if the count is zero or not a
    /// multiple of the lane width.
    pub fn transform(&self, input: &[f32], output: &mut [f32]) -> Result<(), KernelError> {
        self.check(input.len(), output.len())?;
        log::trace!(
            "tanh transform: {} elements in {} lane-groups",
            input.len(),
            input.len() / self.lane_width
        );
        match self.backend {
            Backend::Scalar => tanh_scalar(input, output),
            Backend::Avx2 => run_avx2(input, output),
        }
        Ok(())
    }
}

impl Default for TanhKernel {
    /// Default lane width on the best backend the host offers.
    fn default() -> Self {
        Self {
            lane_width: KernelConfig::default().lane_width,
            backend: Backend::detect(),
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn run_avx2(input: &[f32], output: &mut [f32]) {
    // SAFETY: a kernel only holds `Backend::Avx2` after run-time detection of AVX2+FMA.
    unsafe { crate::kernels::tanh::tanh_avx2(input, output) }
}

#[cfg(not(target_arch = "x86_64"))]
fn run_avx2(input: &[f32], output: &mut [f32]) {
    tanh_scalar(input, output);
}

/// tanh over a batch with the default kernel.
///
/// # Errors
///
/// Same as [`TanhKernel::transform`] with lane width 8.
pub fn tanh_transform(input: &[f32], output: &mut [f32]) -> Result<(), KernelError> {
    TanhKernel::default().transform(input, output)
}
