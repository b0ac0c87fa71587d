//! Mesh representation.
//!
//! Provides the face-based mesh interface used by the reconstruction scheme:
//! - Layered traits for topology and face geometry
//! - Interior, coupled (partition boundary) and physical boundary faces
//! - An in-memory unstructured mesh with a builder

pub mod traits;
mod unstructured;

pub use traits::{CoupledFace, FaceConnection, FaceMesh, MeshGeometry, MeshTopology};
pub use unstructured::{MeshError, PatchId, UnstructuredMesh, UnstructuredMeshBuilder};
