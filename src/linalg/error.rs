//! Error types for the 3×3 kernels.

use thiserror::Error;

/// Errors raised by the small-matrix kernels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Determinant is exactly zero or not finite.
    #[error("Singular matrix: determinant is {det}")]
    Singular { det: f64 },

    /// Determinant is below the relative tolerance of the row-norm bound.
    #[error("Near-singular matrix: |det| = {det:e} below threshold {threshold:e}")]
    NearSingular { det: f64, threshold: f64 },

    /// Conversion from a matrix that is not 3×3.
    #[error("Dimension mismatch: expected 3x3, got {rows}x{cols}")]
    Shape { rows: usize, cols: usize },
}
