//! Determinant, pivoting and inversion kernels for 3×3 matrices.
//!
//! All determinants are assembled from [`det2`], which evaluates
//! `a*d - c*b` with a fused multiply-add error term. For nearly cancelling
//! products this keeps the result within about one ULP, where the naive
//! difference can lose every significant digit.
//!
//! # References
//! - Kahan, "Further remarks on reducing truncation errors" (1965)
//! - Jeannerod, Louvet & Muller (2013), "Further analysis of Kahan's
//!   algorithm for the accurate computation of 2×2 determinants"

use super::error::LinalgError;
use super::matrix3::{RowPermutation, SquareMatrix3};

/// Compensated 2×2 determinant `a*d - c*b`.
///
/// Solves the determinant of
///
/// ```text
/// | a  b |
/// | c  d |
/// ```
///
/// `c*b` is rounded once, its rounding error is recovered exactly with a
/// fused multiply-add and added back to the fused `a*d - c*b`.
/// [`f64::mul_add`] is always fused (in software where the target has no
/// FMA instruction), so the compensated path is available everywhere.
///
/// # Example
///
/// ```
/// use bounded_weno::linalg::{det2, det2_naive};
///
/// let p = 134217729.0; // 2^27 + 1
/// let q = 134217728.0; // 2^27
/// let r = 134217730.0; // 2^27 + 2
/// // p*p - q*r == 1 exactly
/// assert_eq!(det2(p, p, q, r), 1.0);
/// assert_eq!(det2_naive(p, p, q, r), 0.0);
/// ```
#[inline]
pub fn det2(a: f64, d: f64, c: f64, b: f64) -> f64 {
    let cb = c * b;
    let err = (-c).mul_add(b, cb);
    let dop = a.mul_add(d, -cb);
    dop + err
}

/// Uncompensated 2×2 determinant `a*d - c*b`.
///
/// Reduced-precision path, kept for comparison and for callers that
/// reproduce legacy results computed without fused multiply-add.
#[inline]
pub fn det2_naive(a: f64, d: f64, c: f64, b: f64) -> f64 {
    a * d - c * b
}

/// Determinant of a 3×3 matrix, expanded along the first row.
///
/// ```text
/// det = A00 * |A11 A12|  -  A01 * |A10 A12|  +  A02 * |A10 A11|
///             |A21 A22|           |A20 A22|           |A20 A21|
/// ```
///
/// The first two terms are combined through [`det2`] as well.
pub fn det3(a: &SquareMatrix3) -> f64 {
    let m0 = det2(a[(1, 1)], a[(2, 2)], a[(1, 2)], a[(2, 1)]);
    let m1 = det2(a[(1, 0)], a[(2, 2)], a[(1, 2)], a[(2, 0)]);
    let m2 = det2(a[(1, 0)], a[(2, 1)], a[(1, 1)], a[(2, 0)]);
    det2(a[(0, 0)], m0, a[(0, 1)], m1) + a[(0, 2)] * m2
}

/// Row order of a partially pivoted 3×3 elimination.
///
/// 1. Move the row with the largest `|A(i,0)|` to the top.
/// 2. Eliminate column 0 from rows 1 and 2.
/// 3. Move the row with the larger `|A(i,1)|` among rows 1 and 2 of the
///    eliminated matrix to row 1.
///
/// Ties keep the lower row index. The elimination only decides the order;
/// it is never returned.
pub fn pivot_permutation(a: &SquareMatrix3) -> RowPermutation {
    let mut perm = RowPermutation::IDENTITY;

    let mut max_row = 0;
    let mut a_max = f64::NEG_INFINITY;
    for i in 0..3 {
        if a[(i, 0)].abs() > a_max {
            max_row = i;
            a_max = a[(i, 0)].abs();
        }
    }
    perm.swap(0, max_row);

    let mut pa = a.row_permuted(&perm);
    let p00 = pa[(0, 0)];
    if p00 != 0.0 {
        for r in 1..3 {
            let factor = pa[(r, 0)] / p00;
            for c in 0..3 {
                pa[(r, c)] -= factor * pa[(0, c)];
            }
        }
    }

    let mut max_row = 1;
    let mut a_max = f64::NEG_INFINITY;
    for i in 1..3 {
        if pa[(i, 1)].abs() > a_max {
            max_row = i;
            a_max = pa[(i, 1)].abs();
        }
    }
    if max_row != 1 {
        perm.swap(1, 2);
    }

    perm
}

/// Replace `a` with `P · a` for the partial-pivot order of `a`.
///
/// The result is the original matrix with its rows reordered, not the
/// triangularized form.
pub fn pivot(a: &mut SquareMatrix3) {
    let perm = pivot_permutation(a);
    *a = a.row_permuted(&perm);
}

/// Adjugate (transposed cofactor matrix) of a 3×3 matrix.
pub fn adjugate3(a: &SquareMatrix3) -> SquareMatrix3 {
    let mut adj = SquareMatrix3::ZERO;
    adj[(0, 0)] = det2(a[(1, 1)], a[(2, 2)], a[(2, 1)], a[(1, 2)]);
    adj[(1, 0)] = det2(a[(1, 2)], a[(2, 0)], a[(1, 0)], a[(2, 2)]);
    adj[(2, 0)] = det2(a[(1, 0)], a[(2, 1)], a[(2, 0)], a[(1, 1)]);
    adj[(0, 1)] = det2(a[(0, 2)], a[(2, 1)], a[(0, 1)], a[(2, 2)]);
    adj[(0, 2)] = det2(a[(0, 1)], a[(1, 2)], a[(0, 2)], a[(1, 1)]);
    adj[(1, 1)] = det2(a[(0, 0)], a[(2, 2)], a[(0, 2)], a[(2, 0)]);
    adj[(1, 2)] = det2(a[(1, 0)], a[(0, 2)], a[(0, 0)], a[(1, 2)]);
    adj[(2, 1)] = det2(a[(2, 0)], a[(0, 1)], a[(0, 0)], a[(2, 1)]);
    adj[(2, 2)] = det2(a[(0, 0)], a[(1, 1)], a[(1, 0)], a[(0, 1)]);
    adj
}

/// Inverse of a 3×3 matrix via its adjugate.
///
/// The determinant is the first row of `a` dotted with the first column of
/// the adjugate. A zero or non-finite determinant is reported as
/// [`LinalgError::Singular`] in every build profile.
pub fn inverse3(a: &SquareMatrix3) -> Result<SquareMatrix3, LinalgError> {
    let (adj, det) = adjugate_and_det(a);
    if det == 0.0 || !det.is_finite() {
        return Err(LinalgError::Singular { det });
    }
    Ok(adj / det)
}

/// Inverse of a 3×3 matrix that also rejects near-singular input.
///
/// By Hadamard's inequality `|det A|` is bounded by the product of the row
/// norms. Matrices whose determinant falls below `rel_tol` times that bound
/// are reported as [`LinalgError::NearSingular`].
pub fn inverse3_checked(a: &SquareMatrix3, rel_tol: f64) -> Result<SquareMatrix3, LinalgError> {
    let (adj, det) = adjugate_and_det(a);
    if det == 0.0 || !det.is_finite() {
        return Err(LinalgError::Singular { det });
    }
    let threshold = rel_tol * a.row_norms().iter().product::<f64>();
    if det.abs() <= threshold {
        return Err(LinalgError::NearSingular { det, threshold });
    }
    Ok(adj / det)
}

fn adjugate_and_det(a: &SquareMatrix3) -> (SquareMatrix3, f64) {
    let adj = adjugate3(a);
    let det = a[(0, 0)] * adj[(0, 0)] + a[(0, 1)] * adj[(1, 0)] + a[(0, 2)] * adj[(2, 0)];
    (adj, det)
}
