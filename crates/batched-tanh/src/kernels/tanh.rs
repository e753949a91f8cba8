//! Single-precision tanh via expm1 with a 4-entry exp2 table.
//!
//! For `z = -|x|` the kernel evaluates
//!
//! ```text
//! tanh(z) = expm1(2z) / (2 + expm1(2z))
//! ```
//!
//! and restores the sign at the end, since `tanh(x) = -tanh(-|x|)` for `x >= 0`.
//! `expm1(2z)` is reconstructed as `(s - 1) + (t * s) * p(t)` where
//! `z = n * ln2 + t`, `n` is rounded to a multiple of 1/8, `s = 2^(2n)` and
//! `p` is a degree-4 polynomial on `[-ln2/16, ln2/16]`. The division is a
//! reciprocal estimate refined by one Newton-Raphson step.
//!
//! Every `mul_add` (and `_mm256_fmadd_ps`) below must stay a single-rounding
//! fused multiply-add; splitting one into a multiply and an add loosens the
//! error bound.
//!
//! # Float layout
//!
//! The kernel reinterprets IEEE-754 binary32 values as `u32` bit patterns:
//! bit 31 sign, bits 23..=30 biased exponent, bits 0..=22 mantissa. Adding an
//! integer `k << 23` to a normal value's pattern multiplies it by `2^k` as long
//! as the result stays normal, which the saturation cutoff guarantees.
//!
//! # Accuracy
//!
//! Within [`MAX_ULP_ERROR`] of the exact value. Monotone up to backsteps of at
//! most [`MAX_BACKSTEP_ULP`] between neighbouring floats, mostly at
//! `|x| in [2^-8, 2^-5)`; any two inputs further apart than a few ULPs of
//! output keep their order.
//!
//! # Non-finite inputs
//!
//! `±Inf` saturates to `±1`. `NaN` propagates to a NaN output.

/// Sign bit of an f32 pattern.
pub const SIGN_MASK: u32 = 0x8000_0000;

/// Largest `z = -|x|` for which `tanh(z)` rounds to exactly `-1.0`.
pub const SAT_CUTOFF: f32 = f32::from_bits(0xC110_0000); // -0x1.2p3

/// Adding this rounds to a multiple of 1/8: ulp(0x1.8p20) == 2^-3.
pub const MAGIC_BIAS: f32 = f32::from_bits(0x49C0_0000); // 0x1.8p20

const LOG2E: f32 = f32::from_bits(0x3FB8_AA3B); // 0x1.715476p+0
const MINUS_LN2: f32 = f32::from_bits(0xBF31_7218); // -0x1.62E430p-1

/// `2^(k/4)` for `k = 0..4`, decremented as integers by `k << 21`.
///
/// The two low bits of the biased `n` both index this table and are shifted
/// into bits 21..=22 by the exponent adjustment; the decrement cancels them.
pub const EXP2_K_OVER_4: [u32; 4] = [0x3F80_0000, 0x3F78_37F0, 0x3F75_04F3, 0x3F77_44FD];

// exp(2t) - 1 ~ t * (2 + t * (c2 + t * (c3 + t * c4))) on [-ln2/16, ln2/16]
const C2: f32 = f32::from_bits(0x4000_0001); // 0x1.000002p+1
const C3: f32 = f32::from_bits(0x3FAA_B841); // 0x1.557082p+0
const C4: f32 = f32::from_bits(0x3F2A_A7CD); // 0x1.554F9Ap-1

/// Documented error bound against an exact tanh, in f32 ULPs.
///
/// An exhaustive walk over `[0, 9.02]` peaks at 6.17 ULP at `x = 0.06233855`.
pub const MAX_ULP_ERROR: u32 = 8;

/// Largest backstep between the outputs of two consecutive f32 inputs, in ULPs.
///
/// The kernel is not strictly monotone. An exhaustive walk over `[0, 9.02]`
/// finds 269 backsteps, none larger than this. 262 of them lie in
/// `[2^-8, 2^-5)`, the rest are scattered over `[1, 8)`.
pub const MAX_BACKSTEP_ULP: u32 = 3;

/// Portable reciprocal estimate keeps the top 12 significant bits.
#[cfg(not(target_arch = "x86_64"))]
const RCP_ESTIMATE_MASK: u32 = 0xFFFF_F800;

/// Approximate `1/d` to roughly 12 bits.
///
/// On x86-64 this is `rcpss`, the scalar form of the estimate `vrcpps` gives the
/// AVX2 path, so both backends refine the same starting point.
#[cfg(target_arch = "x86_64")]
#[inline]
#[allow(unused_unsafe)]
fn reciprocal_estimate(d: f32) -> f32 {
    use std::arch::x86_64::{_mm_cvtss_f32, _mm_rcp_ss, _mm_set_ss};
    // SAFETY: SSE is part of the x86-64 baseline.
    unsafe { _mm_cvtss_f32(_mm_rcp_ss(_mm_set_ss(d))) }
}

#[cfg(not(target_arch = "x86_64"))]
#[inline]
fn reciprocal_estimate(d: f32) -> f32 {
    f32::from_bits((1.0 / d).to_bits() & RCP_ESTIMATE_MASK)
}

/// All-ones when `cond` holds, zero otherwise.
#[inline]
fn lane_mask(cond: bool) -> u32 {
    0u32.wrapping_sub(u32::from(cond))
}

/// Bitwise select: lanes of `mask` pick `a`, the rest pick `b`.
#[inline]
fn blend(mask: u32, a: f32, b: f32) -> f32 {
    f32::from_bits((a.to_bits() & mask) | (b.to_bits() & !mask))
}

// ────────────────────────────────────────────────────────────────────────────
// Scalar implementations
// ────────────────────────────────────────────────────────────────────────────

/// tanh of one lane. Branch-free; the reference every backend matches bit for bit.
#[inline]
#[must_use]
pub fn tanh_lane(x: f32) -> f32 {
    let z = f32::from_bits(x.to_bits() | SIGN_MASK);
    // 0 for negative x, the sign bit for non-negative x.
    let invsignx = x.to_bits() ^ z.to_bits();
    let saturate = lane_mask(z <= SAT_CUTOFF);

    let n_biased = z.mul_add(LOG2E, MAGIC_BIAS);
    let n_bits = n_biased.to_bits();

    // Bits 2..=10 of n (as integer) land in the exponent field.
    let e = n_bits << 21;
    let l = EXP2_K_OVER_4[(n_bits & 0x3) as usize];
    let s = f32::from_bits(l.wrapping_add(e));

    let n = n_biased - MAGIC_BIAS;
    let t = n.mul_add(MINUS_LN2, z);

    let mut p = C4.mul_add(t, C3);
    p = p.mul_add(t, C2);
    p = p.mul_add(t, 2.0);

    let ts = t * s;
    let sm1 = s - 1.0;
    let em1 = p.mul_add(ts, sm1);

    // 2 < ep1 <= 3 off the saturated range, so the reciprocal never overflows.
    let ep1 = em1 + 2.0;
    let mut r = reciprocal_estimate(ep1);
    r = (-r).mul_add(ep1, 1.0).mul_add(r, r);

    // tanh(z) <= 0: pin the sign so that z = -0 gives -0, not +0.
    let abs_y = f32::from_bits((em1 * r).to_bits() | SIGN_MASK);
    let abs_y = blend(saturate, -1.0, abs_y);

    f32::from_bits(abs_y.to_bits() ^ invsignx)
}

/// tanh over one lane-group of `W` elements.
pub fn tanh_group<const W: usize>(input: &[f32; W], output: &mut [f32; W]) {
    for (x, y) in input.iter().zip(output.iter_mut()) {
        *y = tanh_lane(*x);
    }
}

/// tanh over a slice, one lane at a time.
///
/// # Panics
/// Panics if `input.len() != output.len()`.
pub fn tanh_scalar(input: &[f32], output: &mut [f32]) {
    assert_eq!(input.len(), output.len());
    for (x, y) in input.iter().zip(output.iter_mut()) {
        *y = tanh_lane(*x);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AVX2 implementations
// ────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{
    _mm256_add_epi32, _mm256_add_ps, _mm256_blendv_ps, _mm256_castps_si256,
    _mm256_castsi256_ps, _mm256_cmp_ps, _mm256_fmadd_ps, _mm256_fnmsub_ps, _mm256_loadu_ps,
    _mm256_mul_ps, _mm256_or_ps, _mm256_permutevar_ps, _mm256_rcp_ps, _mm256_set1_ps,
    _mm256_setr_ps, _mm256_slli_epi32, _mm256_storeu_ps, _mm256_sub_ps, _mm256_xor_ps,
    _CMP_LE_OS,
};

/// AVX2+FMA tanh, 8 lanes per step with a per-lane tail.
///
/// Bit-identical to [`tanh_scalar`] on the same host.
///
/// # Safety
/// Requires AVX2 and FMA. Caller must verify with `is_x86_feature_detected!`.
///
/// # Panics
/// Panics if `input.len() != output.len()`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2,fma")]
pub unsafe fn tanh_avx2(input: &[f32], output: &mut [f32]) {
    assert_eq!(input.len(), output.len());
    let len = input.len();
    // SAFETY: caller guarantees AVX2+FMA; loads and stores stay within `i + 8 <= len`.
    unsafe {
        let vsign_mask = _mm256_set1_ps(-0.0);
        let vsat_cutoff = _mm256_set1_ps(SAT_CUTOFF);
        let vmagic_bias = _mm256_set1_ps(MAGIC_BIAS);
        let vlog2e = _mm256_set1_ps(LOG2E);
        // permutevar selects within each 128-bit half, so repeat the table.
        let vtable = _mm256_setr_ps(
            f32::from_bits(EXP2_K_OVER_4[0]),
            f32::from_bits(EXP2_K_OVER_4[1]),
            f32::from_bits(EXP2_K_OVER_4[2]),
            f32::from_bits(EXP2_K_OVER_4[3]),
            f32::from_bits(EXP2_K_OVER_4[0]),
            f32::from_bits(EXP2_K_OVER_4[1]),
            f32::from_bits(EXP2_K_OVER_4[2]),
            f32::from_bits(EXP2_K_OVER_4[3]),
        );
        let vminus_ln2 = _mm256_set1_ps(MINUS_LN2);
        let vc4 = _mm256_set1_ps(C4);
        let vc3 = _mm256_set1_ps(C3);
        let vc2 = _mm256_set1_ps(C2);
        let vtwo = _mm256_set1_ps(2.0);
        let vminus_one = _mm256_set1_ps(-1.0);

        let mut i = 0;
        while i + 8 <= len {
            let vx = _mm256_loadu_ps(input.as_ptr().add(i));

            let vz = _mm256_or_ps(vx, vsign_mask);
            let vinvsignx = _mm256_xor_ps(vx, vz);
            let vm = _mm256_cmp_ps::<_CMP_LE_OS>(vz, vsat_cutoff);

            let mut vn = _mm256_fmadd_ps(vz, vlog2e, vmagic_bias);
            let ven = _mm256_slli_epi32::<21>(_mm256_castps_si256(vn));
            let vl = _mm256_castps_si256(_mm256_permutevar_ps(vtable, _mm256_castps_si256(vn)));
            let vs = _mm256_castsi256_ps(_mm256_add_epi32(vl, ven));
            vn = _mm256_sub_ps(vn, vmagic_bias);

            let vt = _mm256_fmadd_ps(vn, vminus_ln2, vz);

            let mut vp = _mm256_fmadd_ps(vc4, vt, vc3);
            vp = _mm256_fmadd_ps(vp, vt, vc2);
            vp = _mm256_fmadd_ps(vp, vt, vtwo);

            let vts = _mm256_mul_ps(vt, vs);
            let vsm1 = _mm256_add_ps(vs, vminus_one);
            let vem1 = _mm256_fmadd_ps(vp, vts, vsm1);

            let vep1 = _mm256_add_ps(vem1, vtwo);
            let mut vrep1 = _mm256_rcp_ps(vep1);
            // fnmsub(r, d, -1) = 1 - r * d
            vrep1 = _mm256_fmadd_ps(_mm256_fnmsub_ps(vrep1, vep1, vminus_one), vrep1, vrep1);

            let mut vabsy = _mm256_or_ps(_mm256_mul_ps(vem1, vrep1), vsign_mask);
            vabsy = _mm256_blendv_ps(vabsy, vminus_one, vm);

            let vy = _mm256_xor_ps(vabsy, vinvsignx);
            _mm256_storeu_ps(output.as_mut_ptr().add(i), vy);
            i += 8;
        }
        // Scalar tail for remaining elements
        for j in i..len {
            output[j] = tanh_lane(input[j]);
        }
    }
}
