//! Neighborhood value range and limiter configuration.

/// Value range of a donor cell and its stencil neighbors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborhoodBounds {
    /// Smallest value in the neighborhood.
    pub min: f64,
    /// Largest value in the neighborhood.
    pub max: f64,
}

impl NeighborhoodBounds {
    /// Create bounds from an explicit range.
    pub fn new(min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "inverted neighborhood bounds [{min}, {max}]");
        Self { min, max }
    }

    /// Range spanned by the donor value and its neighbors.
    ///
    /// Non-finite neighbor values are ignored.
    pub fn from_values(donor: f64, neighbors: impl IntoIterator<Item = f64>) -> Self {
        let mut min = donor;
        let mut max = donor;
        for v in neighbors.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        Self { min, max }
    }

    /// Width of the range.
    #[inline]
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }

    /// True if the neighborhood is flat to within `tolerance`.
    #[inline]
    pub fn is_uniform(&self, tolerance: f64) -> bool {
        self.spread() <= tolerance
    }

    /// True if `value` lies inside the range.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Intersection with the physical range `[lower, upper]`.
    pub fn intersect(&self, lower: f64, upper: f64) -> Self {
        Self {
            min: self.min.max(lower),
            max: self.max.min(upper),
        }
    }
}

/// Configuration for the bounded limiter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimiterConfig {
    /// Physical lower bound of the transported scalar.
    pub lower: f64,
    /// Physical upper bound of the transported scalar.
    pub upper: f64,
    /// Neighborhood spread below which the field counts as uniform.
    pub uniform_tolerance: f64,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
            uniform_tolerance: 1e-12,
        }
    }
}

impl LimiterConfig {
    /// Create a configuration with the default unit bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the physical bounds.
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    /// Set the uniform-neighborhood tolerance.
    pub fn with_uniform_tolerance(mut self, tolerance: f64) -> Self {
        self.uniform_tolerance = tolerance;
        self
    }

    /// True if `value` lies in the physical range.
    #[inline]
    pub fn in_physical_range(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_includes_donor() {
        let b = NeighborhoodBounds::from_values(0.4, [0.6, 0.5]);
        assert_eq!(b, NeighborhoodBounds::new(0.4, 0.6));

        let alone = NeighborhoodBounds::from_values(0.3, []);
        assert_eq!(alone.spread(), 0.0);
        assert!(alone.is_uniform(0.0));
    }

    #[test]
    fn test_from_values_skips_nan() {
        let b = NeighborhoodBounds::from_values(0.5, [f64::NAN, 0.7]);
        assert_eq!(b, NeighborhoodBounds::new(0.5, 0.7));
    }

    #[test]
    fn test_intersect_with_physical_range() {
        let b = NeighborhoodBounds::new(-0.1, 1.3).intersect(0.0, 1.0);
        assert_eq!(b, NeighborhoodBounds::new(0.0, 1.0));
        assert!(b.contains(0.0));
        assert!(!b.contains(1.0 + 1e-15));
    }

    #[test]
    fn test_config_builder() {
        let cfg = LimiterConfig::new()
            .with_bounds(-1.0, 2.0)
            .with_uniform_tolerance(1e-8);
        assert_eq!(cfg.lower, -1.0);
        assert_eq!(cfg.upper, 2.0);
        assert_eq!(cfg.uniform_tolerance, 1e-8);
        assert!(cfg.in_physical_range(1.5));
        assert!(!LimiterConfig::default().in_physical_range(1.5));
    }
}
