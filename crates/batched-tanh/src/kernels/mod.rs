//! Kernel implementations: scalar reference and AVX2+FMA SIMD.
//!
//! The tanh kernel provides:
//! - `fn tanh_lane(x)` — one lane, branch-free, the ground truth
//! - `fn tanh_group::<W>(...)` — one fixed-width lane-group
//! - `fn tanh_scalar(...)` — whole slice, lane by lane
//! - `unsafe fn tanh_avx2(...)` — whole slice, 8 lanes per step

// Kernel code naturally uses single-character math variable names (n, s, t, p, r),
// hex bit patterns for constants, and unsafe intrinsics inside unsafe fns.
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::unreadable_literal,
    clippy::float_cmp,
    clippy::doc_markdown,
    clippy::needless_range_loop,
    unsafe_op_in_unsafe_fn
)]

pub mod tanh;
pub mod ulp;

/// Backend selector for kernel dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Portable per-lane implementation.
    Scalar,
    /// x86-64 AVX2 + FMA implementation, 8 lanes per register.
    Avx2,
}

impl Backend {
    /// Best backend the running host supports.
    #[must_use]
    pub fn detect() -> Self {
        if Self::Avx2.is_available() {
            Self::Avx2
        } else {
            Self::Scalar
        }
    }

    /// Whether this backend can run on the current host.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            Self::Scalar => true,
            Self::Avx2 => avx2_fma_detected(),
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn avx2_fma_detected() -> bool {
    is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
}

#[cfg(not(target_arch = "x86_64"))]
fn avx2_fma_detected() -> bool {
    false
}
