//! Dense numeric storage for precomputed reconstruction tables.
//!
//! - [`Dense3DArray`]: flat row-major 3-D container for basis-function integrals
//!
//! Serialization of the container lives in [`crate::io`].

pub(crate) mod dense_3d;

pub use dense_3d::Dense3DArray;
