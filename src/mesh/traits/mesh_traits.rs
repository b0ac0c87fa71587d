//! Abstract mesh traits consumed by the reconstruction scheme.
//!
//! This module provides a layered trait hierarchy for meshes:
//!
//! - [`MeshTopology`]: Cells, faces and connectivity
//! - [`MeshGeometry`]: Face areas, normals and integration dimensions
//! - [`FaceMesh`]: Face iteration helpers (blanket impl)
//!
//! The scheme never looks at vertices or cell shapes; everything it needs
//! from a mesh goes through these traits.
//!
//! # Example
//! ```
//! use bounded_weno::mesh::{FaceConnection, FaceMesh, MeshTopology, UnstructuredMesh};
//!
//! let mesh = UnstructuredMesh::line(3);
//! for face in mesh.faces() {
//!     match mesh.face_connection(face) {
//!         FaceConnection::Interior(n) => println!("{face}: {} -> {n}", mesh.owner(face)),
//!         FaceConnection::Coupled(c) => println!("{face}: shared with {}", c.partition),
//!         FaceConnection::Boundary(patch) => println!("{face}: patch {patch}"),
//!     }
//! }
//! assert_eq!(mesh.n_interior_faces(), 2);
//! ```

use std::fmt::Debug;

use crate::types::{CellIndex, FaceIndex, PartitionId, Side};

// =============================================================================
// Supporting Types
// =============================================================================

/// A face shared with another partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoupledFace {
    /// Partition holding the cell on the other side.
    pub partition: PartitionId,
    /// Identifier of the face, identical on both partitions.
    pub shared_id: usize,
}

/// Result of querying face connectivity.
///
/// A face is interior (both cells local), coupled (the other cell lives on
/// another partition) or on the physical boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceConnection<Tag> {
    /// Interior face; the payload is the neighbor cell.
    Interior(CellIndex),
    /// Face on a partition boundary.
    Coupled(CoupledFace),
    /// Physical boundary face with an associated tag.
    Boundary(Tag),
}

impl<Tag> FaceConnection<Tag> {
    /// Returns `true` if this is an interior face.
    #[inline]
    pub fn is_interior(&self) -> bool {
        matches!(self, FaceConnection::Interior(_))
    }

    /// Returns `true` if this face lies on a partition boundary.
    #[inline]
    pub fn is_coupled(&self) -> bool {
        matches!(self, FaceConnection::Coupled(_))
    }

    /// Returns `true` if this is a physical boundary face.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        matches!(self, FaceConnection::Boundary(_))
    }

    /// Returns the neighbor cell if this is an interior face.
    #[inline]
    pub fn neighbor(&self) -> Option<CellIndex> {
        match self {
            FaceConnection::Interior(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the coupling if this is a partition boundary face.
    #[inline]
    pub fn coupled(&self) -> Option<&CoupledFace> {
        match self {
            FaceConnection::Coupled(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the boundary tag if this is a physical boundary face.
    #[inline]
    pub fn boundary_tag(&self) -> Option<&Tag> {
        match self {
            FaceConnection::Boundary(t) => Some(t),
            _ => None,
        }
    }
}

// =============================================================================
// MeshTopology Trait
// =============================================================================

/// Base trait providing mesh topology (cells, faces, connectivity).
///
/// Every face has an owner cell on this partition. The face normal points
/// out of the owner.
pub trait MeshTopology: Send + Sync {
    /// Boundary tag type for labeling physical boundary faces.
    type BoundaryTag: Copy + Clone + Debug + Send + Sync;

    /// Partition this mesh piece belongs to.
    fn partition(&self) -> PartitionId;

    /// Number of cells on this partition.
    fn n_cells(&self) -> usize;

    /// Number of faces on this partition.
    fn n_faces(&self) -> usize;

    /// Owner cell of a face.
    fn owner(&self, face: FaceIndex) -> CellIndex;

    /// Query connectivity across a face.
    fn face_connection(&self, face: FaceIndex) -> FaceConnection<Self::BoundaryTag>;

    /// Cells whose values bound the reconstruction of `cell`, excluding
    /// `cell` itself.
    fn cell_neighbors(&self, cell: CellIndex) -> &[CellIndex];
}

// =============================================================================
// MeshGeometry Trait
// =============================================================================

/// Trait for meshes with face geometry.
pub trait MeshGeometry: MeshTopology {
    /// Area of a face.
    fn face_area(&self, face: FaceIndex) -> f64;

    /// Unit normal of a face, pointing from the owner to the neighbor.
    fn face_normal(&self, face: FaceIndex) -> [f64; 3];

    /// Row of the basis-integral table holding the integrals of `face` as
    /// seen from the cell on `side`.
    fn integration_dim(&self, face: FaceIndex, side: Side) -> usize;

    /// Volumetric flux through a face for a uniform velocity.
    #[inline]
    fn face_flux(&self, face: FaceIndex, velocity: [f64; 3]) -> f64 {
        let n = self.face_normal(face);
        self.face_area(face) * (velocity[0] * n[0] + velocity[1] * n[1] + velocity[2] * n[2])
    }
}

// =============================================================================
// FaceMesh Trait
// =============================================================================

/// Complete mesh interface used by the reconstruction scheme.
pub trait FaceMesh: MeshGeometry {
    /// Iterator over all face indices.
    fn faces(&self) -> impl ExactSizeIterator<Item = FaceIndex> {
        FaceIndex::iter(self.n_faces())
    }

    /// Iterator over all cell indices.
    fn cells(&self) -> impl ExactSizeIterator<Item = CellIndex> {
        CellIndex::iter(self.n_cells())
    }

    /// Faces lying on a partition boundary.
    fn coupled_faces(&self) -> impl Iterator<Item = (FaceIndex, CoupledFace)> {
        self.faces()
            .filter_map(move |f| self.face_connection(f).coupled().map(|c| (f, *c)))
    }

    /// Number of interior faces.
    fn n_interior_faces(&self) -> usize {
        self.faces()
            .filter(|&f| self.face_connection(f).is_interior())
            .count()
    }

    /// Volumetric fluxes of a uniform velocity through every face.
    fn uniform_face_fluxes(&self, velocity: [f64; 3]) -> Vec<f64> {
        self.faces().map(|f| self.face_flux(f, velocity)).collect()
    }
}

// Blanket implementation: any mesh with geometry is a face mesh
impl<M: MeshGeometry> FaceMesh for M {}
