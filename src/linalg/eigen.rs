//! Closed-form eigenvalues of 3×3 matrices.
//!
//! The eigenvalues are the roots of the characteristic polynomial
//!
//! ```text
//! λ³ - tr(A) λ² + c₁ λ - det(A) = 0
//! ```
//!
//! where `c₁` is the sum of the principal 2×2 minors. The cubic is solved
//! with the trigonometric form when all three roots are real and Cardano's
//! form otherwise (Numerical Recipes, 3rd ed., §5.6).

use std::f64::consts::PI;

use num_complex::Complex64;

use super::kernels::{det2, det3};
use super::matrix3::SquareMatrix3;

/// Eigenvalues of a general 3×3 matrix.
///
/// Real spectra are returned in ascending order. A complex spectrum is
/// returned as the real root followed by the conjugate pair, negative
/// imaginary part first.
///
/// # Example
///
/// ```
/// use bounded_weno::linalg::{SquareMatrix3, eigenvalues3};
///
/// let a = SquareMatrix3::from_rows([[2.0, 0.0, 0.0], [0.0, 3.0, 4.0], [0.0, 4.0, 9.0]]);
/// let ev = eigenvalues3(&a);
/// assert!((ev[0].re - 1.0).abs() < 1e-12);
/// assert!((ev[1].re - 2.0).abs() < 1e-12);
/// assert!((ev[2].re - 11.0).abs() < 1e-12);
/// ```
pub fn eigenvalues3(a: &SquareMatrix3) -> [Complex64; 3] {
    let trace = a.trace();
    let minors = det2(a[(0, 0)], a[(1, 1)], a[(1, 0)], a[(0, 1)])
        + det2(a[(0, 0)], a[(2, 2)], a[(2, 0)], a[(0, 2)])
        + det2(a[(1, 1)], a[(2, 2)], a[(2, 1)], a[(1, 2)]);
    solve_cubic(-trace, minors, -det3(a))
}

/// Roots of the monic cubic `x³ + a x² + b x + c`.
///
/// Same ordering convention as [`eigenvalues3`].
pub fn solve_cubic(a: f64, b: f64, c: f64) -> [Complex64; 3] {
    let q = (a * a - 3.0 * b) / 9.0;
    let r = (2.0 * a * a * a - 9.0 * a * b + 27.0 * c) / 54.0;
    let shift = a / 3.0;
    let q3 = q * q * q;

    if r * r < q3 {
        // Three distinct real roots
        let theta = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        let s = -2.0 * q.sqrt();
        let mut roots = [
            s * (theta / 3.0).cos() - shift,
            s * ((theta + 2.0 * PI) / 3.0).cos() - shift,
            s * ((theta - 2.0 * PI) / 3.0).cos() - shift,
        ];
        roots.sort_by(f64::total_cmp);
        return roots.map(|x| Complex64::new(x, 0.0));
    }

    let big_a = -r.signum() * (r.abs() + (r * r - q3).sqrt()).cbrt();
    let big_b = if big_a != 0.0 { q / big_a } else { 0.0 };

    let real = (big_a + big_b) - shift;
    let re = -0.5 * (big_a + big_b) - shift;
    let im = 0.5 * 3.0_f64.sqrt() * (big_a - big_b);

    if im == 0.0 {
        // Repeated real roots
        let mut roots = [real, re, re];
        roots.sort_by(f64::total_cmp);
        return roots.map(|x| Complex64::new(x, 0.0));
    }

    [
        Complex64::new(real, 0.0),
        Complex64::new(re, -im.abs()),
        Complex64::new(re, im.abs()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn assert_real(ev: &[Complex64; 3], expected: [f64; 3]) {
        for (z, e) in ev.iter().zip(expected) {
            assert!(z.im.abs() < TOL, "expected real eigenvalue, got {}", z);
            assert!((z.re - e).abs() < TOL, "expected {}, got {}", e, z.re);
        }
    }

    #[test]
    fn test_diagonal() {
        let a = SquareMatrix3::from_rows([[3.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]]);
        assert_real(&eigenvalues3(&a), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_identity_repeated_root() {
        assert_real(&eigenvalues3(&SquareMatrix3::IDENTITY), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_symmetric() {
        // Eigenvalues 2 - sqrt(2), 2, 2 + sqrt(2)
        let a = SquareMatrix3::from_rows([[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]]);
        let s = 2.0_f64.sqrt();
        assert_real(&eigenvalues3(&a), [2.0 - s, 2.0, 2.0 + s]);
    }

    #[test]
    fn test_rotation_has_complex_pair() {
        // Quarter turn about z: eigenvalues 1, -i, i
        let a = SquareMatrix3::from_rows([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let ev = eigenvalues3(&a);
        assert!((ev[0] - Complex64::new(1.0, 0.0)).norm() < TOL);
        assert!((ev[1] - Complex64::new(0.0, -1.0)).norm() < TOL);
        assert!((ev[2] - Complex64::new(0.0, 1.0)).norm() < TOL);
    }

    #[test]
    fn test_trace_and_determinant_invariants() {
        let a = SquareMatrix3::from_rows([[4.0, 1.0, -2.0], [0.5, 3.0, 1.0], [2.0, -1.0, 5.0]]);
        let ev = eigenvalues3(&a);
        let sum: Complex64 = ev.iter().sum();
        let product: Complex64 = ev.iter().product();
        assert!((sum.re - a.trace()).abs() < 1e-9);
        assert!(sum.im.abs() < 1e-9);
        assert!((product.re - det3(&a)).abs() < 1e-8);
    }

    #[test]
    fn test_cubic_roots() {
        // (x - 1)(x - 2)(x + 3) = x³ - 7x + 6
        let roots = solve_cubic(0.0, -7.0, 6.0);
        assert_real(&roots, [-3.0, 1.0, 2.0]);
    }
}
