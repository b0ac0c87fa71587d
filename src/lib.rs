//! # bounded-weno
//!
//! Bounded upwind-fit face reconstruction for a transported scalar on
//! unstructured, partitioned meshes.
//!
//! Each face takes its value from the upwind (donor) cell, plus a high-order
//! correction assembled from precomputed polynomial coefficients and basis
//! integrals. The correction is limited so the face value stays inside the
//! physical range and creates no new extrema against the donor's neighbours.
//! Faces shared by two partitions are reconciled through a message exchange so
//! both sides agree bit-for-bit.
//!
//! This crate provides:
//! - A dense 3-D container with text and binary persistence ([`storage`], [`io`])
//! - Stability-hardened 3×3 kernels ([`linalg`]) and cell frames ([`geometry`])
//! - Correction assembly and upwind weights ([`flux`])
//! - Face limiters ([`limiter`])
//! - A face-based mesh interface ([`mesh`])
//! - Partition-boundary reconciliation ([`partition`])
//! - The reconstruction pass driver ([`scheme`])
//!
//! # Example
//!
//! ```
//! use bounded_weno::{
//!     BoundedUpwindScheme, CellIndex, CoefficientSet, Dense3DArray, ExchangeHub, FaceMesh,
//!     SchemeConfig, UnstructuredMesh,
//! };
//!
//! let mesh = UnstructuredMesh::line(4);
//! let coefficients: Vec<_> = CellIndex::iter(4).map(CoefficientSet::first_order).collect();
//! let integrals = Dense3DArray::<f64>::new(2, 4, 1);
//! let scheme =
//!     BoundedUpwindScheme::new(&mesh, &coefficients, &integrals, SchemeConfig::default())
//!         .unwrap();
//!
//! let field = [0.5; 4];
//! let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);
//! let transport = ExchangeHub::new(1).into_endpoints().remove(0);
//! let result = scheme.correction(&field, &flux, &transport).unwrap();
//! assert!(result.face_values.iter().all(|&v| v == 0.5));
//! ```

pub mod diagnostics;
pub mod flux;
pub mod geometry;
pub mod io;
pub mod limiter;
pub mod linalg;
pub mod mesh;
pub mod partition;
pub mod scheme;
pub mod storage;
pub mod types;

// Re-export main types for convenience
pub use diagnostics::LimiterStatistics;
pub use flux::{AssemblyError, CoefficientSet, FaceFluxAssembler, upwind_weight};
pub use geometry::CellFrame;
pub use io::{Encoding, StorageError};
pub use limiter::{
    BoundedLimiter, FaceCorrection, FaceLimiter, LimiterConfig, NeighborhoodBounds, NoLimiter,
    StandardLimiter,
};
pub use linalg::{LinalgError, SquareMatrix3, det3, eigenvalues3, inverse3, pivot};
pub use mesh::{FaceConnection, FaceMesh, MeshError, UnstructuredMesh, UnstructuredMeshBuilder};
pub use partition::{
    BoundaryExchangeRecord, ChannelTransport, ExchangeError, ExchangeHub, ExchangeTransport,
    PartitionReconciler,
};
pub use scheme::{BoundedUpwindScheme, Reconstruction, SchemeConfig, SchemeError};
pub use storage::Dense3DArray;
pub use types::{CellIndex, FaceIndex, PartitionId, Side};
