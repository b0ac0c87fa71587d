//! Affine reference frame of a tetrahedral stencil cell.
//!
//! The map from the reference tetrahedron (vertices at the origin and the
//! three unit vectors) to a physical cell is
//!
//! ```text
//! x = x₀ + J ξ,    J = [v₁ - v₀ | v₂ - v₀ | v₃ - v₀]
//! ```
//!
//! Basis integrals are tabulated in reference coordinates, so every stencil
//! point has to be pulled back with `J⁻¹`. Thin or flat cells make `J`
//! badly conditioned; the inverse is computed after row pivoting and
//! rejected when the determinant is negligible against the edge lengths.

use log::warn;

use crate::linalg::{
    LinalgError, SquareMatrix3, det3, eigenvalues3, inverse3_checked, pivot_permutation,
};

/// Condition estimate above which a frame is reported as ill-conditioned.
const ILL_CONDITIONED: f64 = 1e8;

/// Affine frame of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellFrame {
    origin: [f64; 3],
    jacobian: SquareMatrix3,
    inverse: SquareMatrix3,
    det: f64,
}

impl CellFrame {
    /// Default relative tolerance for rejecting near-singular frames.
    pub const DEFAULT_TOLERANCE: f64 = 1e-12;

    /// Frame of the tetrahedron with the given vertices.
    pub fn from_vertices(vertices: [[f64; 3]; 4], rel_tol: f64) -> Result<Self, LinalgError> {
        let [v0, v1, v2, v3] = vertices;
        Self::from_edges(v0, [sub(v1, v0), sub(v2, v0), sub(v3, v0)], rel_tol)
    }

    /// Frame spanned by three edge vectors from `origin`.
    pub fn from_edges(
        origin: [f64; 3],
        edges: [[f64; 3]; 3],
        rel_tol: f64,
    ) -> Result<Self, LinalgError> {
        let jacobian = SquareMatrix3::from_columns(edges);

        let perm = pivot_permutation(&jacobian);
        let pivoted = jacobian.row_permuted(&perm);
        // (P J)⁻¹ P = J⁻¹
        let inverse = inverse3_checked(&pivoted, rel_tol)? * perm.to_matrix();
        let det = det3(&jacobian);

        let frame = Self {
            origin,
            jacobian,
            inverse,
            det,
        };
        let cond = frame.condition_estimate();
        if cond > ILL_CONDITIONED {
            warn!("ill-conditioned cell frame at {:?}: condition estimate {:.3e}", origin, cond);
        }
        Ok(frame)
    }

    /// Physical position of the reference origin.
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    /// Jacobian `J`, columns are the edge vectors.
    pub fn jacobian(&self) -> &SquareMatrix3 {
        &self.jacobian
    }

    /// Inverse Jacobian `J⁻¹`.
    pub fn inverse(&self) -> &SquareMatrix3 {
        &self.inverse
    }

    /// Determinant of `J`; negative for left-handed vertex orderings.
    pub fn det(&self) -> f64 {
        self.det
    }

    /// Volume of the tetrahedron.
    pub fn volume(&self) -> f64 {
        self.det.abs() / 6.0
    }

    /// Reference coordinates of a physical point.
    pub fn to_reference(&self, point: [f64; 3]) -> [f64; 3] {
        self.inverse.mul_vec(sub(point, self.origin))
    }

    /// Physical coordinates of a reference point.
    pub fn to_physical(&self, xi: [f64; 3]) -> [f64; 3] {
        let d = self.jacobian.mul_vec(xi);
        [
            self.origin[0] + d[0],
            self.origin[1] + d[1],
            self.origin[2] + d[2],
        ]
    }

    /// 2-norm condition estimate `sqrt(λ_max / λ_min)` of `JᵀJ`.
    ///
    /// Returns infinity for a degenerate spectrum.
    pub fn condition_estimate(&self) -> f64 {
        let gram = self.jacobian.transpose() * self.jacobian;
        let ev = eigenvalues3(&gram);
        let mut lo = f64::INFINITY;
        let mut hi = 0.0_f64;
        for z in ev {
            // JᵀJ is symmetric, any imaginary part is rounding noise
            let lambda = z.re;
            lo = lo.min(lambda);
            hi = hi.max(lambda);
        }
        if lo <= 0.0 || !lo.is_finite() {
            f64::INFINITY
        } else {
            (hi / lo).sqrt()
        }
    }
}

#[inline]
fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < TOL)
    }

    #[test]
    fn test_reference_tetrahedron() {
        let frame = CellFrame::from_vertices(
            [
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            CellFrame::DEFAULT_TOLERANCE,
        )
        .unwrap();
        assert_eq!(*frame.jacobian(), SquareMatrix3::IDENTITY);
        assert!((frame.volume() - 1.0 / 6.0).abs() < TOL);
        assert!((frame.condition_estimate() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_round_trip_sheared_cell() {
        let vertices = [
            [1.0, 2.0, -1.0],
            [3.0, 2.5, -1.0],
            [1.5, 4.0, 0.5],
            [0.0, 2.0, 2.0],
        ];
        let frame = CellFrame::from_vertices(vertices, CellFrame::DEFAULT_TOLERANCE).unwrap();

        assert!(close(frame.to_reference(vertices[0]), [0.0, 0.0, 0.0]));
        assert!(close(frame.to_reference(vertices[1]), [1.0, 0.0, 0.0]));
        assert!(close(frame.to_reference(vertices[2]), [0.0, 1.0, 0.0]));
        assert!(close(frame.to_reference(vertices[3]), [0.0, 0.0, 1.0]));

        let xi = [0.2, 0.3, 0.1];
        assert!(close(frame.to_reference(frame.to_physical(xi)), xi));
        let product = *frame.inverse() * *frame.jacobian();
        assert!(product.max_abs_diff(&SquareMatrix3::IDENTITY) < TOL);
    }

    #[test]
    fn test_pivoting_needed() {
        // First edge has no x component: elimination without pivoting fails
        let frame = CellFrame::from_edges(
            [0.0; 3],
            [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 2.0]],
            CellFrame::DEFAULT_TOLERANCE,
        )
        .unwrap();
        assert!((frame.det() + 2.0).abs() < TOL);
        assert!(close(frame.to_reference([1.0, 1.0, 1.0]), [1.0, 1.0, 0.5]));
    }

    #[test]
    fn test_condition_estimate_of_stretched_cell() {
        let frame = CellFrame::from_edges(
            [0.0; 3],
            [[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 4.0]],
            CellFrame::DEFAULT_TOLERANCE,
        )
        .unwrap();
        assert!((frame.condition_estimate() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_flat_cell_rejected() {
        let err = CellFrame::from_vertices(
            [
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
            ],
            CellFrame::DEFAULT_TOLERANCE,
        )
        .unwrap_err();
        assert!(matches!(err, LinalgError::Singular { .. }));
    }

    #[test]
    fn test_sliver_rejected_by_tolerance() {
        // Second and third edges nearly parallel
        let result = CellFrame::from_edges(
            [0.0; 3],
            [[1.0, 0.0, 0.0], [0.0, 1.0, 1.0], [0.0, 1.0, 1.0 + 1e-13]],
            1e-10,
        );
        assert!(matches!(result, Err(LinalgError::NearSingular { .. })));
    }
}
