//! Small dense linear algebra for 3×3 reconstruction stencils.
//!
//! Stencil geometry is frequently close to degenerate (thin cells, nearly
//! coplanar neighbours), so every kernel here is built around the
//! compensated 2×2 determinant [`det2`]:
//!
//! - [`det2`], [`det3`]: determinants with FMA-compensated minors
//! - [`pivot`], [`pivot_permutation`]: partial-pivot row ordering
//! - [`inverse3`], [`inverse3_checked`]: adjugate-based inverse that reports
//!   singular input instead of returning NaN
//! - [`eigenvalues3`]: closed-form eigenvalues of a general 3×3 matrix
//!
//! # Example
//!
//! ```
//! use bounded_weno::linalg::{SquareMatrix3, det3, inverse3};
//!
//! let a = SquareMatrix3::from_rows([[2.0, 0.0, 1.0], [1.0, 3.0, 0.0], [0.0, 1.0, 4.0]]);
//! assert!((det3(&a) - 25.0).abs() < 1e-12);
//!
//! let a_inv = inverse3(&a).unwrap();
//! assert!((a_inv * a).max_abs_diff(&SquareMatrix3::IDENTITY) < 1e-14);
//! ```

mod eigen;
mod error;
mod kernels;
mod matrix3;

pub use eigen::{eigenvalues3, solve_cubic};
pub use error::LinalgError;
pub use kernels::{
    adjugate3, det2, det2_naive, det3, inverse3, inverse3_checked, pivot, pivot_permutation,
};
pub use matrix3::{RowPermutation, SquareMatrix3};
