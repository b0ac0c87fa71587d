//! Reconstruction pass driver.
//!
//! [`BoundedUpwindScheme`] runs the per-face pipeline (donor selection,
//! correction assembly, limiting) over a [`FaceMesh`](crate::mesh::FaceMesh)
//! and finishes coupled faces through the partition exchange.

mod bounded_upwind;
mod config;
mod error;

pub use bounded_upwind::{BoundedUpwindScheme, LocalPass, Reconstruction};
pub use config::SchemeConfig;
pub use error::SchemeError;
