//! Scheme configuration.

use crate::limiter::{LimiterConfig, StandardLimiter};

/// Configuration for [`BoundedUpwindScheme`](super::BoundedUpwindScheme).
#[derive(Clone, Copy, Debug)]
pub struct SchemeConfig {
    /// Limiter applied to every corrected face.
    pub limiter: StandardLimiter,
    /// Flux magnitude below which the two sides of a coupled face are not
    /// checked for opposing orientation.
    pub flux_tolerance: f64,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            limiter: StandardLimiter::default(),
            flux_tolerance: 1e-12,
        }
    }
}

impl SchemeConfig {
    /// Bounded limiter on `[0, 1]`, default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limiter.
    pub fn with_limiter(mut self, limiter: StandardLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Use the bounded limiter with the given configuration.
    pub fn with_limiter_config(mut self, config: LimiterConfig) -> Self {
        self.limiter = StandardLimiter::Bounded(config);
        self
    }

    /// Set the coupled-face flux tolerance.
    pub fn with_flux_tolerance(mut self, tolerance: f64) -> Self {
        self.flux_tolerance = tolerance;
        self
    }
}
