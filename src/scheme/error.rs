//! Errors of a reconstruction pass.

use thiserror::Error;

use crate::flux::AssemblyError;
use crate::partition::ExchangeError;
use crate::types::{CellIndex, FaceIndex, PartitionId};

/// Any failure aborts the whole pass; no partial results are returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemeError {
    /// Cell field does not match the mesh.
    #[error("field has {actual} values but the mesh has {expected} cells")]
    FieldLength { expected: usize, actual: usize },

    /// Face flux array does not match the mesh.
    #[error("face flux has {actual} values but the mesh has {expected} faces")]
    FluxLength { expected: usize, actual: usize },

    /// Coefficient sets do not cover the mesh cells.
    #[error("{actual} coefficient sets for {expected} cells")]
    CoefficientCount { expected: usize, actual: usize },

    /// Coefficient sets are not stored in cell order.
    #[error("coefficient set at {index} belongs to cell {cell}")]
    CoefficientCell { index: CellIndex, cell: CellIndex },

    /// Face flux is NaN or infinite.
    #[error("non-finite flux {flux} at face {face}")]
    NonFiniteFlux { face: FaceIndex, flux: f64 },

    /// Coefficients and integral table disagree.
    #[error("face {face}, donor cell {cell}: {source}")]
    Assembly {
        face: FaceIndex,
        cell: CellIndex,
        source: AssemblyError,
    },

    /// A face finished the pass without a correction.
    #[error("face {face} has no correction after the exchange")]
    Unresolved { face: FaceIndex },

    /// Transport endpoint and mesh belong to different partitions.
    #[error("transport of partition {transport} used with mesh of partition {mesh}")]
    PartitionMismatch {
        mesh: PartitionId,
        transport: PartitionId,
    },

    /// Partition exchange failed.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}
