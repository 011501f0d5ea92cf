//! Convenience wrappers around methods from the approx crate for comparing compartment
//! values that went through floating point arithmetic.

use approx::AbsDiffEq;

/// Default absolute tolerance for comparing population counts.
pub const ACC: f64 = 1e-9;

/// Compares if two floats are close via `approx::abs_diff_eq` using a maximum absolute difference
/// (epsilon) of `acc`.
#[must_use]
pub fn almost_eq(a: f64, b: f64, acc: f64) -> bool {
    if a.is_infinite() && b.is_infinite() {
        return a == b;
    }
    a.abs_diff_eq(&b, acc)
}

/// Compares two equally sized slices element by element with `almost_eq`.
#[must_use]
pub fn all_almost_eq(a: &[f64], b: &[f64], acc: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| almost_eq(*x, *y, acc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;

    #[test]
    fn almost_eq_within_tolerance() {
        let a = 985.05;
        let b = 990.0 - 4.95;
        assert!(almost_eq(a, b, ACC));
    }

    #[test]
    fn almost_eq_outside_tolerance() {
        let a = 1.0;
        let b = 1.0 + 2e-8;
        assert!(!almost_eq(a, b, ACC));
    }

    #[test]
    fn almost_eq_infinities() {
        assert!(almost_eq(f64::INFINITY, f64::INFINITY, ACC));
        assert!(!almost_eq(f64::INFINITY, f64::NEG_INFINITY, ACC));
        assert!(!almost_eq(f64::NAN, f64::NAN, ACC));
    }

    #[test]
    fn slices() {
        assert!(all_almost_eq(&[1.0, 2.0], &[1.0, 2.0 + 1e-12], ACC));
        assert!(!all_almost_eq(&[1.0, 2.0], &[1.0], ACC));
        assert!(!all_almost_eq(&[1.0, 2.0], &[1.0, 2.1], ACC));
    }

    #[test]
    fn assert_almost_eq_macro_passes() {
        assert_almost_eq!(8.0, 10.0 - (0.1 + 0.1) * 10.0, 1e-9);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn assert_almost_eq_macro_panics() {
        assert_almost_eq!(1.0, 1.001, 1e-4);
    }
}
