//! Trait definitions for face limiters.

use super::bounds::NeighborhoodBounds;

/// Result of limiting one face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceCorrection {
    /// Raw high-order correction before limiting.
    pub raw: f64,
    /// Limiter scalar in [0, 1].
    pub theta: f64,
    /// Correction actually applied, `theta * raw`.
    pub limited_correction: f64,
    /// Donor value plus the limited correction, inside the effective bounds.
    pub face_value: f64,
}

impl FaceCorrection {
    /// Unlimited correction.
    pub fn unlimited(donor: f64, raw: f64) -> Self {
        Self {
            raw,
            theta: 1.0,
            limited_correction: raw,
            face_value: donor + raw,
        }
    }

    /// Fully limited correction: the face takes the donor value.
    pub fn first_order(donor: f64, raw: f64) -> Self {
        Self {
            raw,
            theta: 0.0,
            limited_correction: 0.0,
            face_value: donor,
        }
    }

    /// True if the limiter reduced the correction.
    #[inline]
    pub fn is_limited(&self) -> bool {
        self.theta < 1.0
    }
}

/// Trait for limiters acting on a single face correction.
///
/// A limiter sees the donor value, the raw correction from the assembler and
/// the value range of the donor's neighborhood, and decides how much of the
/// correction survives.
///
/// # Implementation Notes
///
/// - `limit` must be a pure function of its inputs so that both sides of a
///   partition boundary reproduce the same result
/// - `limit` should not allocate
pub trait FaceLimiter: Send + Sync {
    /// Limit the raw correction at one face.
    fn limit(&self, donor: f64, raw: f64, bounds: &NeighborhoodBounds) -> FaceCorrection;

    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Whether face values are guaranteed to stay inside the effective bounds.
    fn preserves_bounds(&self) -> bool {
        false
    }
}

/// Type alias for boxed limiter (runtime polymorphism).
pub type BoxedFaceLimiter = Box<dyn FaceLimiter>;
