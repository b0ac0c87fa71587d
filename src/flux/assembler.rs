//! Assembly of the raw high-order face correction.
//!
//! Each cell carries a set of reconstruction coefficients, one per basis
//! function. The correction at a face is the coefficient-weighted sum of the
//! precomputed basis integrals over that face:
//!
//! ```text
//! correction = Σ_b coefficient[b] * table(dim, cell, b)
//! ```
//!
//! The table axes are (integration dimension, cell, basis function).

use thiserror::Error;

use crate::storage::Dense3DArray;
use crate::types::CellIndex;

/// Errors raised when coefficients and integral tables disagree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    /// Cell is not covered by the integral table.
    #[error("cell {cell} outside integral table with {n_cells} cells")]
    CellOutOfRange { cell: CellIndex, n_cells: usize },

    /// Integration dimension is not covered by the integral table.
    #[error("integration dimension {dim} outside table with {n_dims} dimensions")]
    DimensionOutOfRange { dim: usize, n_dims: usize },

    /// More coefficients than basis integrals.
    #[error("cell {cell}: {n_coefficients} coefficients but only {n_basis} basis integrals")]
    TooManyCoefficients {
        cell: CellIndex,
        n_coefficients: usize,
        n_basis: usize,
    },
}

/// Reconstruction coefficients of one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientSet {
    /// Cell the coefficients belong to.
    pub cell: CellIndex,
    /// Polynomial order of the reconstruction.
    pub order: usize,
    /// One coefficient per basis function.
    pub coefficients: Vec<f64>,
}

impl CoefficientSet {
    /// Create a coefficient set.
    pub fn new(cell: CellIndex, order: usize, coefficients: Vec<f64>) -> Self {
        Self {
            cell,
            order,
            coefficients,
        }
    }

    /// An order-zero set: no correction, pure upwind.
    pub fn first_order(cell: CellIndex) -> Self {
        Self::new(cell, 0, Vec::new())
    }

    /// Number of basis functions.
    #[inline]
    pub fn n_basis(&self) -> usize {
        self.coefficients.len()
    }

    /// True if this set adds no correction.
    #[inline]
    pub fn is_first_order(&self) -> bool {
        self.order == 0 || self.coefficients.is_empty()
    }
}

/// Stateless assembler of raw face corrections.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaceFluxAssembler;

impl FaceFluxAssembler {
    /// Raw correction for the face whose integrals live at row `dim` of the
    /// donor cell.
    ///
    /// Coefficients beyond the table's basis axis are a structural error.
    /// Fewer coefficients than basis integrals is allowed; the remaining
    /// integrals do not contribute.
    pub fn assemble(
        coeffs: &CoefficientSet,
        table: &Dense3DArray<f64>,
        dim: usize,
    ) -> Result<f64, AssemblyError> {
        let integrals = integral_row(table, dim, coeffs.cell, coeffs.n_basis())?;
        Ok(coeffs
            .coefficients
            .iter()
            .zip(integrals)
            .map(|(c, i)| c * i)
            .sum())
    }

    /// Raw correction for a vector-valued field, one coefficient array per
    /// basis function.
    pub fn assemble_components<const N: usize>(
        cell: CellIndex,
        coefficients: &[[f64; N]],
        table: &Dense3DArray<f64>,
        dim: usize,
    ) -> Result<[f64; N], AssemblyError> {
        let integrals = integral_row(table, dim, cell, coefficients.len())?;
        let mut out = [0.0; N];
        for (c, &i) in coefficients.iter().zip(integrals) {
            for (o, &cn) in out.iter_mut().zip(c) {
                *o += cn * i;
            }
        }
        Ok(out)
    }
}

fn integral_row(
    table: &Dense3DArray<f64>,
    dim: usize,
    cell: CellIndex,
    n_coefficients: usize,
) -> Result<&[f64], AssemblyError> {
    if dim >= table.size_x() {
        return Err(AssemblyError::DimensionOutOfRange {
            dim,
            n_dims: table.size_x(),
        });
    }
    if cell.get() >= table.size_y() {
        return Err(AssemblyError::CellOutOfRange {
            cell,
            n_cells: table.size_y(),
        });
    }
    if n_coefficients > table.size_z() {
        return Err(AssemblyError::TooManyCoefficients {
            cell,
            n_coefficients,
            n_basis: table.size_z(),
        });
    }
    Ok(&table.row(dim, cell.get())[..n_coefficients])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(i: usize) -> CellIndex {
        CellIndex::new(i)
    }

    fn table() -> Dense3DArray<f64> {
        // 2 integration dims, 2 cells, 3 basis functions
        let mut t = Dense3DArray::new(2, 2, 3);
        t.set(0, 1, 0, 0.5);
        t.set(0, 1, 1, -0.25);
        t.set(0, 1, 2, 0.125);
        t.set(1, 1, 0, 2.0);
        t
    }

    #[test]
    fn test_weighted_sum() {
        let coeffs = CoefficientSet::new(c(1), 2, vec![0.2, 0.4, 0.8]);
        let r = FaceFluxAssembler::assemble(&coeffs, &table(), 0).unwrap();
        assert!((r - (0.1 - 0.1 + 0.1)).abs() < 1e-15);

        let r = FaceFluxAssembler::assemble(&coeffs, &table(), 1).unwrap();
        assert!((r - 0.4).abs() < 1e-15);
    }

    #[test]
    fn test_zero_coefficients_give_zero() {
        let coeffs = CoefficientSet::new(c(1), 2, vec![0.0; 3]);
        assert_eq!(FaceFluxAssembler::assemble(&coeffs, &table(), 0).unwrap(), 0.0);

        let first = CoefficientSet::first_order(c(0));
        assert!(first.is_first_order());
        assert_eq!(FaceFluxAssembler::assemble(&first, &table(), 1).unwrap(), 0.0);
    }

    #[test]
    fn test_partial_coefficients() {
        let coeffs = CoefficientSet::new(c(1), 1, vec![1.0, 1.0]);
        let r = FaceFluxAssembler::assemble(&coeffs, &table(), 0).unwrap();
        assert!((r - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_structural_mismatch() {
        let t = table();
        let too_many = CoefficientSet::new(c(0), 3, vec![1.0; 4]);
        assert_eq!(
            FaceFluxAssembler::assemble(&too_many, &t, 0),
            Err(AssemblyError::TooManyCoefficients {
                cell: c(0),
                n_coefficients: 4,
                n_basis: 3
            })
        );

        let bad_cell = CoefficientSet::new(c(5), 1, vec![1.0]);
        assert!(matches!(
            FaceFluxAssembler::assemble(&bad_cell, &t, 0),
            Err(AssemblyError::CellOutOfRange { n_cells: 2, .. })
        ));

        let ok = CoefficientSet::new(c(0), 1, vec![1.0]);
        assert!(matches!(
            FaceFluxAssembler::assemble(&ok, &t, 2),
            Err(AssemblyError::DimensionOutOfRange { dim: 2, n_dims: 2 })
        ));
    }

    #[test]
    fn test_components() {
        let coeffs = [[1.0, -1.0], [2.0, 0.0], [0.0, 8.0]];
        let r = FaceFluxAssembler::assemble_components(c(1), &coeffs, &table(), 0).unwrap();
        assert!((r[0] - 0.0).abs() < 1e-15);
        assert!((r[1] - 0.5).abs() < 1e-15);
    }
}
