//! In-memory unstructured mesh.
//!
//! Faces are stored as a flat list; each face knows its owner cell, what is
//! on the other side, its area and unit normal, and which rows of the
//! basis-integral table belong to it.
//!
//! # Example
//!
//! ```
//! use bounded_weno::mesh::{FaceMesh, MeshTopology, UnstructuredMeshBuilder};
//! use bounded_weno::types::{CellIndex, PartitionId};
//!
//! let c = CellIndex::new;
//! let mesh = UnstructuredMeshBuilder::new(2)
//!     .with_partition(PartitionId::new(0))
//!     .interior_face(c(0), c(1))
//!     .boundary_face(c(0), 0)
//!     .with_geometry(1.0, [-1.0, 0.0, 0.0])
//!     .coupled_face(c(1), PartitionId::new(1), 17)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(mesh.n_faces(), 3);
//! assert_eq!(mesh.coupled_faces().count(), 1);
//! assert_eq!(mesh.cell_neighbors(c(0)), &[c(1)]);
//! ```

use std::collections::HashSet;

use thiserror::Error;

use super::traits::{CoupledFace, FaceConnection, MeshGeometry, MeshTopology};
use crate::types::{CellIndex, FaceIndex, PartitionId, Side};

/// Boundary tag of [`UnstructuredMesh`]: a patch number.
pub type PatchId = usize;

/// Errors raised while assembling a mesh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A face references a cell that does not exist.
    #[error("face {face} references cell {cell} but the mesh has {n_cells} cells")]
    CellOutOfRange {
        face: FaceIndex,
        cell: CellIndex,
        n_cells: usize,
    },

    /// An interior face connects a cell to itself.
    #[error("face {face} connects cell {cell} to itself")]
    SelfConnected { face: FaceIndex, cell: CellIndex },

    /// Area or normal is not usable.
    #[error("face {face} has invalid geometry: {reason}")]
    InvalidGeometry { face: FaceIndex, reason: String },

    /// A coupled face points back to this partition.
    #[error("face {face} is coupled to its own partition {partition}")]
    CoupledToSelf {
        face: FaceIndex,
        partition: PartitionId,
    },

    /// Two coupled faces share the same identifier.
    #[error("coupled face id {shared_id} used twice (second at face {face})")]
    DuplicateSharedId { face: FaceIndex, shared_id: usize },

    /// A stencil override references a cell that does not exist.
    #[error("stencil of cell {cell} references cell {neighbor} outside {n_cells} cells")]
    StencilOutOfRange {
        cell: CellIndex,
        neighbor: CellIndex,
        n_cells: usize,
    },

    /// A face modifier was used before any face was added.
    #[error("{0} called before any face was added")]
    NoFace(&'static str),
}

#[derive(Clone, Debug)]
struct MeshFace {
    owner: CellIndex,
    connection: FaceConnection<PatchId>,
    area: f64,
    normal: [f64; 3],
    /// Integration rows as seen from the owner and the neighbor.
    dims: Option<[usize; 2]>,
}

/// Unstructured mesh piece owned by one partition.
#[derive(Clone, Debug)]
pub struct UnstructuredMesh {
    partition: PartitionId,
    n_cells: usize,
    faces: Vec<MeshFace>,
    dims: Vec<[usize; 2]>,
    neighbors: Vec<Vec<CellIndex>>,
}

impl UnstructuredMesh {
    /// Uniform 1D chain of `n_cells` cells along x with unit face areas.
    ///
    /// Interior faces come first (face `i` joins cells `i` and `i + 1`),
    /// followed by the left (patch 0) and right (patch 1) boundary faces.
    /// Integration row 0 is a cell's left face, row 1 its right face.
    pub fn line(n_cells: usize) -> Self {
        Self::line_segment(n_cells, PartitionId::ZERO, None, None)
    }

    /// Split a 1D chain of `n_total` cells into `n_parts` contiguous pieces.
    ///
    /// The cut between global cells `k` and `k + 1` becomes a coupled face
    /// with shared id `k` on both neighboring pieces. Pieces are returned in
    /// partition order.
    pub fn split_line(n_total: usize, n_parts: usize) -> Vec<Self> {
        let n_parts = n_parts.clamp(1, n_total.max(1));
        let base = n_total / n_parts;
        let extra = n_total % n_parts;

        let mut pieces = Vec::with_capacity(n_parts);
        let mut start = 0;
        for p in 0..n_parts {
            let len = base + usize::from(p < extra);
            let left = (p > 0).then(|| (PartitionId::new(p - 1), start - 1));
            let right =
                (p + 1 < n_parts).then(|| (PartitionId::new(p + 1), start + len - 1));
            pieces.push(Self::line_segment(len, PartitionId::new(p), left, right));
            start += len;
        }
        pieces
    }

    /// Global index of local cell 0 for each piece produced by
    /// [`split_line`](Self::split_line).
    pub fn split_line_offsets(n_total: usize, n_parts: usize) -> Vec<usize> {
        let n_parts = n_parts.clamp(1, n_total.max(1));
        let base = n_total / n_parts;
        let extra = n_total % n_parts;
        let mut offsets = Vec::with_capacity(n_parts);
        let mut start = 0;
        for p in 0..n_parts {
            offsets.push(start);
            start += base + usize::from(p < extra);
        }
        offsets
    }

    fn line_segment(
        n_cells: usize,
        partition: PartitionId,
        left: Option<(PartitionId, usize)>,
        right: Option<(PartitionId, usize)>,
    ) -> Self {
        let c = CellIndex::new;
        let mut builder = UnstructuredMeshBuilder::new(n_cells).with_partition(partition);
        for i in 1..n_cells {
            builder = builder
                .interior_face(c(i - 1), c(i))
                .with_integration_dims(1, 0);
        }
        if n_cells > 0 {
            builder = match left {
                Some((peer, id)) => builder.coupled_face(c(0), peer, id),
                None => builder.boundary_face(c(0), 0),
            }
            .with_geometry(1.0, [-1.0, 0.0, 0.0])
            .with_integration_dims(0, 1);

            builder = match right {
                Some((peer, id)) => builder.coupled_face(c(n_cells - 1), peer, id),
                None => builder.boundary_face(c(n_cells - 1), 1),
            }
            .with_integration_dims(1, 0);
        }
        // Every face is constructed from in-range cells with unit geometry
        builder.build_unchecked()
    }

    /// Number of integration rows needed by the basis-integral table.
    pub fn n_integration_dims(&self) -> usize {
        self.dims
            .iter()
            .flat_map(|d| d.iter())
            .map(|&d| d + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of physical boundary faces.
    pub fn n_boundary_faces(&self) -> usize {
        self.faces
            .iter()
            .filter(|f| f.connection.is_boundary())
            .count()
    }
}

impl MeshTopology for UnstructuredMesh {
    type BoundaryTag = PatchId;

    fn partition(&self) -> PartitionId {
        self.partition
    }

    fn n_cells(&self) -> usize {
        self.n_cells
    }

    fn n_faces(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    fn owner(&self, face: FaceIndex) -> CellIndex {
        self.faces[face].owner
    }

    #[inline]
    fn face_connection(&self, face: FaceIndex) -> FaceConnection<PatchId> {
        self.faces[face].connection
    }

    #[inline]
    fn cell_neighbors(&self, cell: CellIndex) -> &[CellIndex] {
        &self.neighbors[cell]
    }
}

impl MeshGeometry for UnstructuredMesh {
    #[inline]
    fn face_area(&self, face: FaceIndex) -> f64 {
        self.faces[face].area
    }

    #[inline]
    fn face_normal(&self, face: FaceIndex) -> [f64; 3] {
        self.faces[face].normal
    }

    #[inline]
    fn integration_dim(&self, face: FaceIndex, side: Side) -> usize {
        match side {
            Side::Owner => self.dims[face][0],
            Side::Neighbor => self.dims[face][1],
        }
    }
}

/// Builder for [`UnstructuredMesh`].
///
/// Faces are numbered in insertion order. `with_geometry` and
/// `with_integration_dims` modify the most recently added face. Faces
/// default to unit area with normal `+x`; integration rows default to the
/// position of the face in each adjacent cell's face list.
#[derive(Clone, Debug)]
pub struct UnstructuredMeshBuilder {
    partition: PartitionId,
    n_cells: usize,
    faces: Vec<MeshFace>,
    stencils: Vec<(CellIndex, Vec<CellIndex>)>,
    pending_error: Option<MeshError>,
}

impl UnstructuredMeshBuilder {
    /// Start a mesh with `n_cells` cells on partition 0.
    pub fn new(n_cells: usize) -> Self {
        Self {
            partition: PartitionId::ZERO,
            n_cells,
            faces: Vec::new(),
            stencils: Vec::new(),
            pending_error: None,
        }
    }

    /// Set the partition this mesh piece belongs to.
    pub fn with_partition(mut self, partition: PartitionId) -> Self {
        self.partition = partition;
        self
    }

    fn push(mut self, owner: CellIndex, connection: FaceConnection<PatchId>) -> Self {
        self.faces.push(MeshFace {
            owner,
            connection,
            area: 1.0,
            normal: [1.0, 0.0, 0.0],
            dims: None,
        });
        self
    }

    /// Add a face between two local cells.
    pub fn interior_face(self, owner: CellIndex, neighbor: CellIndex) -> Self {
        self.push(owner, FaceConnection::Interior(neighbor))
    }

    /// Add a physical boundary face.
    pub fn boundary_face(self, owner: CellIndex, patch: PatchId) -> Self {
        self.push(owner, FaceConnection::Boundary(patch))
    }

    /// Add a face shared with another partition.
    pub fn coupled_face(self, owner: CellIndex, partition: PartitionId, shared_id: usize) -> Self {
        self.push(
            owner,
            FaceConnection::Coupled(CoupledFace {
                partition,
                shared_id,
            }),
        )
    }

    /// Set area and normal of the last face. The normal is normalized.
    pub fn with_geometry(mut self, area: f64, normal: [f64; 3]) -> Self {
        match self.faces.last_mut() {
            Some(face) => {
                face.area = area;
                face.normal = normal;
            }
            None => {
                self.pending_error
                    .get_or_insert(MeshError::NoFace("with_geometry"));
            }
        }
        self
    }

    /// Set the integration rows of the last face.
    pub fn with_integration_dims(mut self, owner_dim: usize, neighbor_dim: usize) -> Self {
        match self.faces.last_mut() {
            Some(face) => face.dims = Some([owner_dim, neighbor_dim]),
            None => {
                self.pending_error
                    .get_or_insert(MeshError::NoFace("with_integration_dims"));
            }
        }
        self
    }

    /// Override the limiter neighborhood of a cell.
    ///
    /// Cells without an override use the cells across their interior faces.
    pub fn with_stencil(mut self, cell: CellIndex, neighbors: Vec<CellIndex>) -> Self {
        self.stencils.push((cell, neighbors));
        self
    }

    /// Validate and assemble the mesh.
    pub fn build(mut self) -> Result<UnstructuredMesh, MeshError> {
        if let Some(err) = self.pending_error.take() {
            return Err(err);
        }

        let n_cells = self.n_cells;
        let mut shared_ids = HashSet::new();
        for (f, face) in self.faces.iter_mut().enumerate() {
            let fi = FaceIndex::new(f);
            let check = |cell: CellIndex| {
                if cell.get() < n_cells {
                    Ok(())
                } else {
                    Err(MeshError::CellOutOfRange {
                        face: fi,
                        cell,
                        n_cells,
                    })
                }
            };
            check(face.owner)?;
            match face.connection {
                FaceConnection::Interior(n) => {
                    check(n)?;
                    if n == face.owner {
                        return Err(MeshError::SelfConnected {
                            face: fi,
                            cell: n,
                        });
                    }
                }
                FaceConnection::Coupled(c) => {
                    if c.partition == self.partition {
                        return Err(MeshError::CoupledToSelf {
                            face: fi,
                            partition: c.partition,
                        });
                    }
                    if !shared_ids.insert(c.shared_id) {
                        return Err(MeshError::DuplicateSharedId {
                            face: fi,
                            shared_id: c.shared_id,
                        });
                    }
                }
                FaceConnection::Boundary(_) => {}
            }

            if !face.area.is_finite() || face.area < 0.0 {
                return Err(MeshError::InvalidGeometry {
                    face: fi,
                    reason: format!("area {}", face.area),
                });
            }
            let norm = face.normal.iter().map(|x| x * x).sum::<f64>().sqrt();
            if !norm.is_finite() || norm == 0.0 {
                return Err(MeshError::InvalidGeometry {
                    face: fi,
                    reason: format!("normal {:?}", face.normal),
                });
            }
            face.normal = face.normal.map(|x| x / norm);
        }

        for (cell, stencil) in &self.stencils {
            for &n in std::iter::once(cell).chain(stencil) {
                if n.get() >= n_cells {
                    return Err(MeshError::StencilOutOfRange {
                        cell: *cell,
                        neighbor: n,
                        n_cells,
                    });
                }
            }
        }

        Ok(self.build_unchecked())
    }

    /// Assemble without validation. Callers guarantee in-range cells.
    fn build_unchecked(self) -> UnstructuredMesh {
        let mut neighbors: Vec<Vec<CellIndex>> = vec![Vec::new(); self.n_cells];
        let mut n_slots = vec![0usize; self.n_cells];
        let mut dims = Vec::with_capacity(self.faces.len());

        for face in &self.faces {
            let owner_slot = n_slots[face.owner];
            n_slots[face.owner] += 1;
            let neighbor_slot = match face.connection {
                FaceConnection::Interior(n) => {
                    let slot = n_slots[n];
                    n_slots[n] += 1;
                    if !neighbors[face.owner].contains(&n) {
                        neighbors[face.owner].push(n);
                    }
                    if !neighbors[n].contains(&face.owner) {
                        neighbors[n].push(face.owner);
                    }
                    slot
                }
                _ => 0,
            };
            dims.push(face.dims.unwrap_or([owner_slot, neighbor_slot]));
        }

        for (cell, stencil) in self.stencils {
            neighbors[cell] = stencil.into_iter().filter(|&n| n != cell).collect();
        }

        UnstructuredMesh {
            partition: self.partition,
            n_cells: self.n_cells,
            faces: self.faces,
            dims,
            neighbors,
        }
    }
}
