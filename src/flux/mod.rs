//! Face flux assembly.
//!
//! - [`upwind_weight`] and friends pick the donor side of a face from the
//!   sign of the face flux
//! - [`FaceFluxAssembler`] turns per-cell reconstruction coefficients and
//!   precomputed basis integrals into the raw high-order correction

mod assembler;
mod upwind;

pub use assembler::{AssemblyError, CoefficientSet, FaceFluxAssembler};
pub use upwind::{upwind_side, upwind_value, upwind_weight, uses_explicit_correction};
