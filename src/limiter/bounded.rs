//! Bound-preserving limiter for face corrections.
//!
//! The face value is written as
//!
//! ```text
//! face = donor + θ · correction
//! ```
//!
//! with θ ∈ [0, 1] the largest value that keeps `face` inside the effective
//! bounds: the neighborhood range intersected with the physical range.

use log::debug;

use super::bounds::{LimiterConfig, NeighborhoodBounds};
use super::traits::{FaceCorrection, FaceLimiter};

/// Largest θ ∈ [0, 1] such that `donor + θ (value - donor)` lies in
/// `[bound_min, bound_max]`.
///
/// `donor` is assumed to lie inside the bounds.
fn compute_theta(donor: f64, value: f64, bound_min: f64, bound_max: f64) -> f64 {
    let mut theta: f64 = 1.0;

    // Upper bound violation: need donor + θ(value - donor) <= bound_max
    if value > bound_max {
        theta = theta.min((bound_max - donor) / (value - donor));
    }

    // Lower bound violation: need donor + θ(value - donor) >= bound_min
    if value < bound_min {
        theta = theta.min((bound_min - donor) / (value - donor));
    }

    theta.clamp(0.0, 1.0)
}

/// Shrink `correction` toward zero until `donor + correction` lies inside
/// `bounds`.
///
/// Each step removes at least one ulp, and `donor` itself is inside the
/// bounds, so the loop ends after a few steps.
fn fit_correction(donor: f64, mut correction: f64, bounds: &NeighborhoodBounds) -> f64 {
    while !bounds.contains(donor + correction) {
        let step = correction * f64::EPSILON;
        if step == 0.0 {
            return 0.0;
        }
        correction -= step;
    }
    correction
}

/// Limiter keeping face values inside the donor neighborhood and the
/// physical range.
///
/// # Behavior
///
/// - A raw face value inside the effective bounds passes unchanged (θ = 1)
/// - A raw value outside is pulled exactly onto the nearer bound
/// - A uniform neighborhood skips the monotonicity clip; only the physical
///   range is enforced
/// - A donor outside the physical range, or a non-finite input, falls back
///   to the donor value (θ = 0)
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundedLimiter {
    config: LimiterConfig,
}

impl BoundedLimiter {
    /// Create a limiter with the given configuration.
    pub fn new(config: LimiterConfig) -> Self {
        Self { config }
    }

    /// Limiter for the unit range `[0, 1]`.
    pub fn unit() -> Self {
        Self::default()
    }

    /// The active configuration.
    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// Effective bounds for a donor with the given neighborhood.
    pub fn effective_bounds(&self, donor: f64, bounds: &NeighborhoodBounds) -> NeighborhoodBounds {
        let cfg = &self.config;
        if bounds.is_uniform(cfg.uniform_tolerance) {
            return NeighborhoodBounds::new(cfg.lower, cfg.upper);
        }
        let mut effective = bounds.intersect(cfg.lower, cfg.upper);
        // Keep the donor admissible even if the caller's range omitted it
        effective.min = effective.min.min(donor);
        effective.max = effective.max.max(donor);
        effective
    }
}

impl FaceLimiter for BoundedLimiter {
    fn limit(&self, donor: f64, raw: f64, bounds: &NeighborhoodBounds) -> FaceCorrection {
        if !donor.is_finite() || !raw.is_finite() {
            debug!("non-finite limiter input (donor={donor}, correction={raw}), using donor value");
            return FaceCorrection::first_order(donor, raw);
        }
        if !self.config.in_physical_range(donor) {
            debug!(
                "donor {donor} outside physical range [{}, {}], using donor value",
                self.config.lower, self.config.upper
            );
            return FaceCorrection::first_order(donor, raw);
        }

        let effective = self.effective_bounds(donor, bounds);
        let value = donor + raw;
        if effective.contains(value) {
            return FaceCorrection::unlimited(donor, raw);
        }

        let theta = compute_theta(donor, value, effective.min, effective.max);
        let limited_correction = fit_correction(donor, theta * raw, &effective);
        let face_value = if value > effective.max {
            effective.max
        } else {
            effective.min
        };
        FaceCorrection {
            raw,
            theta: (limited_correction / raw).clamp(0.0, 1.0),
            limited_correction,
            face_value,
        }
    }

    fn name(&self) -> &'static str {
        "bounded"
    }

    fn preserves_bounds(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-14;

    fn limiter() -> BoundedLimiter {
        BoundedLimiter::unit()
    }

    #[test]
    fn test_inside_bounds_passes() {
        let bounds = NeighborhoodBounds::from_values(0.5, [0.3, 0.8]);
        let r = limiter().limit(0.5, 0.1, &bounds);
        assert_eq!(r.theta, 1.0);
        assert_eq!(r.limited_correction, 0.1);
        assert!(!r.is_limited());
        assert!((r.face_value - 0.6).abs() < TOL);
    }

    #[test]
    fn test_overshoot_pulled_onto_neighbor_max() {
        let bounds = NeighborhoodBounds::from_values(0.5, [0.3, 0.8]);
        let r = limiter().limit(0.5, 0.6, &bounds);
        assert!((r.theta - 0.5).abs() < TOL);
        assert_eq!(r.face_value, 0.8);
        assert!(r.is_limited());
    }

    #[test]
    fn test_undershoot_pulled_onto_neighbor_min() {
        let bounds = NeighborhoodBounds::from_values(0.5, [0.3, 0.8]);
        let r = limiter().limit(0.5, -0.4, &bounds);
        assert!((r.theta - 0.5).abs() < TOL);
        assert_eq!(r.face_value, 0.3);
    }

    #[test]
    fn test_physical_bound_tighter_than_neighborhood() {
        // Neighbor data already out of range; the physical bound wins
        let bounds = NeighborhoodBounds::from_values(0.9, [1.2, 0.7]);
        let r = limiter().limit(0.9, 0.5, &bounds);
        assert_eq!(r.face_value, 1.0);
        assert!((r.theta - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_neighborhood_skips_monotonicity() {
        let bounds = NeighborhoodBounds::from_values(0.5, [0.5, 0.5]);
        let r = limiter().limit(0.5, 0.2, &bounds);
        assert_eq!(r.theta, 1.0);
        assert!((r.face_value - 0.7).abs() < TOL);

        // The physical range still applies
        let r = limiter().limit(0.5, 0.8, &bounds);
        assert_eq!(r.face_value, 1.0);
        assert!((r.theta - 0.625).abs() < TOL);
    }

    #[test]
    fn test_uniform_zero_correction() {
        let bounds = NeighborhoodBounds::from_values(0.5, [0.5; 4]);
        let r = limiter().limit(0.5, 0.0, &bounds);
        assert_eq!(r.theta, 1.0);
        assert_eq!(r.face_value, 0.5);
    }

    #[test]
    fn test_donor_outside_physical_range() {
        let bounds = NeighborhoodBounds::from_values(1.2, [0.9]);
        let r = limiter().limit(1.2, -0.1, &bounds);
        assert_eq!(r.theta, 0.0);
        assert_eq!(r.limited_correction, 0.0);
        assert_eq!(r.face_value, 1.2);
    }

    #[test]
    fn test_non_finite_input() {
        let bounds = NeighborhoodBounds::new(0.0, 1.0);
        let r = limiter().limit(0.5, f64::NAN, &bounds);
        assert_eq!(r.theta, 0.0);
        assert_eq!(r.face_value, 0.5);
    }

    #[test]
    fn test_donor_at_bound_with_outward_correction() {
        let bounds = NeighborhoodBounds::from_values(1.0, [0.6]);
        let r = limiter().limit(1.0, 0.3, &bounds);
        assert_eq!(r.theta, 0.0);
        assert_eq!(r.face_value, 1.0);
    }

    #[test]
    fn test_custom_physical_range() {
        let lim = BoundedLimiter::new(LimiterConfig::new().with_bounds(-1.0, 1.0));
        let bounds = NeighborhoodBounds::from_values(-0.5, [-0.8, 0.2]);
        let r = lim.limit(-0.5, -0.2, &bounds);
        assert_eq!(r.theta, 1.0);
        assert!((r.face_value + 0.7).abs() < TOL);
    }

    #[test]
    fn test_rounding_cannot_push_correction_past_bound() {
        let bounds = NeighborhoodBounds::new(0.0, 1.0);
        let donor = 0.48576608394524223;
        let r = limiter().limit(donor, -0.8591851912150643, &bounds);
        assert_eq!(r.face_value, 0.0);
        assert!(donor + r.limited_correction >= 0.0);
        assert!((r.theta - donor / 0.8591851912150643).abs() < TOL);
    }

    #[test]
    fn test_limited_correction_stays_in_bounds() {
        let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64
        };

        let lim = limiter();
        for _ in 0..200_000 {
            let donor = next();
            let raw = 3.0 * next() - 1.5;
            let neighbors = [next(), next()];
            for bounds in [
                NeighborhoodBounds::new(0.0, 1.0),
                NeighborhoodBounds::from_values(donor, neighbors),
            ] {
                let effective = lim.effective_bounds(donor, &bounds);
                let r = lim.limit(donor, raw, &bounds);
                let applied = donor + r.limited_correction;
                assert!(
                    effective.contains(applied),
                    "donor={donor} raw={raw}: {applied} outside [{}, {}]",
                    effective.min,
                    effective.max
                );
                assert!(effective.contains(r.face_value));
                assert!((0.0..=1.0).contains(&r.theta));
            }
        }
    }

    #[test]
    fn test_theta_never_exceeds_unit_interval() {
        for &(donor, value) in &[(0.5, 2.0), (0.5, -3.0), (0.2, 0.2), (0.0, -1.0)] {
            let t = compute_theta(donor, value, 0.0, 1.0);
            assert!((0.0..=1.0).contains(&t), "theta {t} for {donor} -> {value}");
        }
    }
}
