//! Dense 3×3 matrix value type.

use std::fmt;
use std::ops::{Div, Index, IndexMut, Mul};

use faer::Mat;

use super::error::LinalgError;

/// Dense 3×3 matrix of `f64`, stored row-major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquareMatrix3 {
    m: [[f64; 3]; 3],
}

impl SquareMatrix3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// The zero matrix.
    pub const ZERO: Self = Self { m: [[0.0; 3]; 3] };

    /// Create a matrix from its rows.
    #[inline]
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Create a matrix from its columns.
    #[inline]
    pub fn from_columns(cols: [[f64; 3]; 3]) -> Self {
        Self::from_rows(cols).transpose()
    }

    /// Create a matrix by evaluating `f(row, col)` for every entry.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = f(i, j);
            }
        }
        Self { m }
    }

    /// Rows of the matrix.
    #[inline]
    pub fn rows(&self) -> [[f64; 3]; 3] {
        self.m
    }

    /// Row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> [f64; 3] {
        self.m[i]
    }

    /// Column `j`.
    #[inline]
    pub fn column(&self, j: usize) -> [f64; 3] {
        [self.m[0][j], self.m[1][j], self.m[2][j]]
    }

    /// Transposed matrix.
    pub fn transpose(&self) -> Self {
        Self::from_fn(|i, j| self.m[j][i])
    }

    /// Trace (sum of the diagonal).
    #[inline]
    pub fn trace(&self) -> f64 {
        self.m[0][0] + self.m[1][1] + self.m[2][2]
    }

    /// Matrix-vector product `A x`.
    pub fn mul_vec(&self, x: [f64; 3]) -> [f64; 3] {
        let mut y = [0.0; 3];
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = self.m[i][0] * x[0] + self.m[i][1] * x[1] + self.m[i][2] * x[2];
        }
        y
    }

    /// Euclidean norm of each row.
    pub fn row_norms(&self) -> [f64; 3] {
        self.m.map(|r| (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt())
    }

    /// Largest absolute entry-wise difference to `other`.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        let mut max = 0.0_f64;
        for i in 0..3 {
            for j in 0..3 {
                max = max.max((self.m[i][j] - other.m[i][j]).abs());
            }
        }
        max
    }

    /// Matrix with its rows reordered by `perm`, i.e. `P · A`.
    pub fn row_permuted(&self, perm: &RowPermutation) -> Self {
        let order = perm.order();
        Self {
            m: [self.m[order[0]], self.m[order[1]], self.m[order[2]]],
        }
    }

    /// Returns true if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for SquareMatrix3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Index<(usize, usize)> for SquareMatrix3 {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.m[i][j]
    }
}

impl IndexMut<(usize, usize)> for SquareMatrix3 {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.m[i][j]
    }
}

impl Mul for SquareMatrix3 {
    type Output = SquareMatrix3;

    fn mul(self, rhs: SquareMatrix3) -> SquareMatrix3 {
        SquareMatrix3::from_fn(|i, j| {
            self.m[i][0] * rhs.m[0][j] + self.m[i][1] * rhs.m[1][j] + self.m[i][2] * rhs.m[2][j]
        })
    }
}

impl Mul<f64> for SquareMatrix3 {
    type Output = SquareMatrix3;

    fn mul(self, rhs: f64) -> SquareMatrix3 {
        SquareMatrix3 {
            m: self.m.map(|r| r.map(|v| v * rhs)),
        }
    }
}

impl Div<f64> for SquareMatrix3 {
    type Output = SquareMatrix3;

    fn div(self, rhs: f64) -> SquareMatrix3 {
        SquareMatrix3 {
            m: self.m.map(|r| r.map(|v| v / rhs)),
        }
    }
}

impl fmt::Display for SquareMatrix3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.m {
            writeln!(f, "[{:>12.6e} {:>12.6e} {:>12.6e}]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

impl From<SquareMatrix3> for Mat<f64> {
    fn from(a: SquareMatrix3) -> Self {
        Mat::from_fn(3, 3, |i, j| a.m[i][j])
    }
}

impl TryFrom<&Mat<f64>> for SquareMatrix3 {
    type Error = LinalgError;

    fn try_from(mat: &Mat<f64>) -> Result<Self, Self::Error> {
        if mat.nrows() != 3 || mat.ncols() != 3 {
            return Err(LinalgError::Shape {
                rows: mat.nrows(),
                cols: mat.ncols(),
            });
        }
        Ok(Self::from_fn(|i, j| mat[(i, j)]))
    }
}

/// Row permutation of a 3×3 matrix.
///
/// Row `i` of `P · A` is row `order()[i]` of `A`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowPermutation {
    order: [usize; 3],
}

impl RowPermutation {
    /// The identity permutation.
    pub const IDENTITY: Self = Self { order: [0, 1, 2] };

    /// Create a permutation from a row order.
    ///
    /// Returns `None` if `order` is not a permutation of `0, 1, 2`.
    pub fn new(order: [usize; 3]) -> Option<Self> {
        let mut seen = [false; 3];
        for &r in &order {
            if r > 2 || seen[r] {
                return None;
            }
            seen[r] = true;
        }
        Some(Self { order })
    }

    /// Source row for each destination row.
    #[inline]
    pub fn order(&self) -> [usize; 3] {
        self.order
    }

    /// Exchange destination rows `a` and `b`.
    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.order.swap(a, b);
    }

    /// Returns true if no rows are moved.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// The permutation matrix `P`.
    pub fn to_matrix(&self) -> SquareMatrix3 {
        SquareMatrix3::IDENTITY.row_permuted(self)
    }
}

impl Default for RowPermutation {
    fn default() -> Self {
        Self::IDENTITY
    }
}
