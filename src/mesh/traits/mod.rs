//! Abstract mesh traits.
//!
//! This module provides:
//! - [`MeshTopology`]: Cell and face connectivity
//! - [`MeshGeometry`]: Face areas, normals and integration dimensions
//! - [`FaceMesh`]: Face iteration helpers

pub mod mesh_traits;

pub use mesh_traits::{CoupledFace, FaceConnection, FaceMesh, MeshGeometry, MeshTopology};
