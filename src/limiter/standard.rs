//! Standard limiter implementations.

use super::bounded::BoundedLimiter;
use super::bounds::{LimiterConfig, NeighborhoodBounds};
use super::traits::{BoxedFaceLimiter, FaceCorrection, FaceLimiter};

/// No-op limiter: the raw correction is always applied.
///
/// Useful for measuring the unlimited scheme and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLimiter;

impl FaceLimiter for NoLimiter {
    fn limit(&self, donor: f64, raw: f64, _bounds: &NeighborhoodBounds) -> FaceCorrection {
        FaceCorrection::unlimited(donor, raw)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Enum wrapper for built-in limiter types.
///
/// Provides zero-cost dispatch when the limiter type is known at compile time.
#[derive(Clone, Copy, Debug)]
pub enum StandardLimiter {
    /// No limiting
    None,
    /// Neighborhood and physical bound limiter
    Bounded(LimiterConfig),
}

impl Default for StandardLimiter {
    fn default() -> Self {
        StandardLimiter::Bounded(LimiterConfig::default())
    }
}

impl FaceLimiter for StandardLimiter {
    fn limit(&self, donor: f64, raw: f64, bounds: &NeighborhoodBounds) -> FaceCorrection {
        match self {
            StandardLimiter::None => NoLimiter.limit(donor, raw, bounds),
            StandardLimiter::Bounded(config) => {
                BoundedLimiter::new(*config).limit(donor, raw, bounds)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            StandardLimiter::None => "none",
            StandardLimiter::Bounded(_) => "bounded",
        }
    }

    fn preserves_bounds(&self) -> bool {
        matches!(self, StandardLimiter::Bounded(_))
    }
}

/// Create a boxed limiter from a standard limiter type.
pub fn create_limiter(limiter: StandardLimiter) -> BoxedFaceLimiter {
    match limiter {
        StandardLimiter::None => Box::new(NoLimiter),
        StandardLimiter::Bounded(config) => Box::new(BoundedLimiter::new(config)),
    }
}
