//! Upwind selection for face interpolation.
//!
//! The flux through a face is measured along the face normal, which points
//! from the owner cell into the neighbor cell:
//!
//! - flux ≥ 0: the owner is upstream (donor)
//! - flux < 0: the neighbor is upstream
//!
//! A zero flux selects the owner so that both sides of a face always agree
//! on the donor.

use crate::types::Side;

/// Implicit interpolation weight of the owner cell.
///
/// Returns `1.0` when the owner is upwind and `0.0` otherwise. The face value
/// is `w * owner + (1 - w) * neighbor` before any explicit correction.
#[inline]
pub fn upwind_weight(flux: f64) -> f64 {
    if flux >= 0.0 { 1.0 } else { 0.0 }
}

/// Side of the face holding the donor cell.
#[inline]
pub fn upwind_side(flux: f64) -> Side {
    if flux >= 0.0 {
        Side::Owner
    } else {
        Side::Neighbor
    }
}

/// Upwind face value from the two cell values.
#[inline]
pub fn upwind_value(owner: f64, neighbor: f64, flux: f64) -> f64 {
    match upwind_side(flux) {
        Side::Owner => owner,
        Side::Neighbor => neighbor,
    }
}

/// The upwind-fit scheme always adds an explicit high-order correction on
/// top of the implicit upwind weights.
#[inline]
pub const fn uses_explicit_correction() -> bool {
    true
}
