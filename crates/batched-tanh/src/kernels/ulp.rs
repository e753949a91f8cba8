//! ULP (Unit in the Last Place) measurement for the tanh kernel.
//!
//! Two views are offered. The integer distance between two f32 bit patterns
//! compares backends against each other: they run the same operation sequence,
//! so anything but distance 0 is a bug, and a count of representable steps
//! says how far apart they are without needing a reference. The fractional
//! error of an f32 result against an f64 reference bounds the approximation
//! itself, where the exact value lies between floats.

/// ULP distance between two f32 values.
///
/// Returns the number of representable floats between `a` and `b`.
/// `u32::MAX` if either value is NaN or the signs differ (±0 compare equal).
#[must_use]
pub fn ulp_distance(a: f32, b: f32) -> u32 {
    if a.is_nan() || b.is_nan() {
        return u32::MAX;
    }
    if a == b {
        return 0;
    }
    let a_bits = a.to_bits() as i32;
    let b_bits = b.to_bits() as i32;
    if (a_bits < 0) != (b_bits < 0) {
        return u32::MAX;
    }
    a_bits.abs_diff(b_bits)
}

/// Size of one f32 ULP at the magnitude of `reference`.
///
/// Subnormal magnitudes share the fixed spacing 2^-149.
#[must_use]
pub fn f32_ulp_at(reference: f64) -> f64 {
    let mag = reference.abs();
    if mag < f64::from(f32::MIN_POSITIVE) {
        return 2f64.powi(-149);
    }
    // Exponent of the f32 binade containing `mag`.
    let exp = mag.log2().floor() as i32;
    let exp = if 2f64.powi(exp) > mag {
        exp - 1
    } else if 2f64.powi(exp + 1) <= mag {
        exp + 1
    } else {
        exp
    };
    2f64.powi(exp - 23)
}

/// Error of `actual` against a high-precision `reference`, in f32 ULPs.
///
/// NaN in, infinity out: a NaN on either side never passes a tolerance check.
#[must_use]
pub fn ulp_error(actual: f32, reference: f64) -> f64 {
    if actual.is_nan() || reference.is_nan() {
        return f64::INFINITY;
    }
    (f64::from(actual) - reference).abs() / f32_ulp_at(reference)
}

/// High-precision tanh of an f32 input, evaluated in f64.
#[must_use]
pub fn reference_tanh(x: f32) -> f64 {
    f64::from(x).tanh()
}

/// Assert that two f32 slices agree within the given ULP distance.
///
/// # Panics
///
/// Panics if slices have different lengths or any element pair exceeds
/// the ULP tolerance.
pub fn assert_ulp_eq(a: &[f32], b: &[f32], max_ulp: u32) {
    assert_eq!(
        a.len(),
        b.len(),
        "slice length mismatch: {} vs {}",
        a.len(),
        b.len()
    );
    for (i, (&va, &vb)) in a.iter().zip(b.iter()).enumerate() {
        let dist = ulp_distance(va, vb);
        assert!(
            dist <= max_ulp,
            "ULP violation at index {i}: {va} vs {vb} (ULP distance {dist}, max {max_ulp})"
        );
    }
}

/// Assert every `outputs[i]` is within `max_ulp` of `reference(inputs[i])`.
///
/// # Panics
///
/// Panics on length mismatch or on the first element outside the bound.
pub fn assert_within_reference(
    inputs: &[f32],
    outputs: &[f32],
    reference: impl Fn(f32) -> f64,
    max_ulp: f64,
) {
    assert_eq!(inputs.len(), outputs.len(), "slice length mismatch");
    for (i, (&x, &y)) in inputs.iter().zip(outputs).enumerate() {
        let expected = reference(x);
        let err = ulp_error(y, expected);
        assert!(
            err <= max_ulp,
            "ULP violation at index {i}: f({x}) = {y}, reference {expected} ({err:.2} ULP, max {max_ulp})"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ulp_distance_identical() {
        assert_eq!(ulp_distance(1.0, 1.0), 0);
        assert_eq!(ulp_distance(-1.0, -1.0), 0);
        assert_eq!(ulp_distance(0.0, -0.0), 0);
    }

    #[test]
    fn test_ulp_distance_adjacent() {
        let a: f32 = 0.75;
        let b = f32::from_bits(a.to_bits() + 3);
        assert_eq!(ulp_distance(a, b), 3);
        assert_eq!(ulp_distance(b, a), 3);
    }

    #[test]
    fn test_ulp_distance_nan_and_sign() {
        assert_eq!(ulp_distance(f32::NAN, 1.0), u32::MAX);
        assert_eq!(ulp_distance(0.5, -0.5), u32::MAX);
    }

    #[test]
    fn test_f32_ulp_at_powers_of_two() {
        assert_eq!(f32_ulp_at(1.0), 2f64.powi(-23));
        assert_eq!(f32_ulp_at(-1.0), 2f64.powi(-23));
        // Just below 1.0 the spacing halves.
        assert_eq!(f32_ulp_at(0.999_999), 2f64.powi(-24));
        assert_eq!(f32_ulp_at(0.5), 2f64.powi(-24));
        assert_eq!(f32_ulp_at(1e-45), 2f64.powi(-149));
    }

    #[test]
    fn test_ulp_error_exact_and_one_step() {
        assert_eq!(ulp_error(0.5, 0.5), 0.0);
        let next = f32::from_bits(0.5f32.to_bits() + 1);
        assert!((ulp_error(next, 0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ulp_error_nan_is_infinite() {
        assert!(ulp_error(f32::NAN, 0.0).is_infinite());
        assert!(ulp_error(0.0, f64::NAN).is_infinite());
    }

    #[test]
    fn test_reference_tanh_known_values() {
        assert_eq!(reference_tanh(0.0), 0.0);
        assert!((reference_tanh(1.0) - 0.761_594_155_955_764_9).abs() < 1e-15);
        assert_eq!(reference_tanh(f32::INFINITY), 1.0);
    }

    #[test]
    fn test_assert_ulp_eq_passes() {
        assert_ulp_eq(&[1.0, -2.0, 0.0], &[1.0, -2.0, -0.0], 0);
    }

    #[test]
    #[should_panic(expected = "ULP violation")]
    fn test_assert_ulp_eq_fails() {
        assert_ulp_eq(&[1.0], &[1.5], 4);
    }

    #[test]
    #[should_panic(expected = "slice length mismatch")]
    fn test_assert_ulp_eq_length_mismatch() {
        assert_ulp_eq(&[1.0], &[1.0, 2.0], 0);
    }

    #[test]
    #[should_panic(expected = "ULP violation at index 1")]
    fn test_assert_within_reference_reports_index() {
        assert_within_reference(&[1.0, 2.0], &[1.0, 2.5], f64::from, 1.0);
    }
}
