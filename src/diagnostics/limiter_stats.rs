//! Limiter activity counters.

use log::info;

use crate::limiter::FaceCorrection;

/// Limiter activity over one reconstruction pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LimiterStatistics {
    /// Faces that received a correction.
    pub faces: usize,
    /// Faces with θ < 1.
    pub limited_faces: usize,
    /// Faces with θ = 0.
    pub first_order_faces: usize,
    /// Faces resolved through the partition exchange.
    pub coupled_faces: usize,
    /// Smallest θ seen (1 if no face was limited).
    pub min_theta: f64,
}

impl Default for LimiterStatistics {
    fn default() -> Self {
        Self {
            faces: 0,
            limited_faces: 0,
            first_order_faces: 0,
            coupled_faces: 0,
            min_theta: 1.0,
        }
    }
}

impl LimiterStatistics {
    /// Empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one face.
    pub fn record(&mut self, correction: &FaceCorrection) {
        self.faces += 1;
        if correction.is_limited() {
            self.limited_faces += 1;
        }
        if correction.theta == 0.0 && correction.raw != 0.0 {
            self.first_order_faces += 1;
        }
        self.min_theta = self.min_theta.min(correction.theta);
    }

    /// Account for one face resolved through the exchange.
    pub fn record_coupled(&mut self, correction: &FaceCorrection) {
        self.record(correction);
        self.coupled_faces += 1;
    }

    /// Combine counters from another pass or thread.
    pub fn merge(&mut self, other: &Self) {
        self.faces += other.faces;
        self.limited_faces += other.limited_faces;
        self.first_order_faces += other.first_order_faces;
        self.coupled_faces += other.coupled_faces;
        self.min_theta = self.min_theta.min(other.min_theta);
    }

    /// Fraction of faces that were limited.
    pub fn limited_fraction(&self) -> f64 {
        if self.faces == 0 {
            0.0
        } else {
            self.limited_faces as f64 / self.faces as f64
        }
    }

    /// Format as a single-line summary.
    pub fn summary_line(&self) -> String {
        format!(
            "faces={} limited={} ({:.1}%) first_order={} coupled={} theta_min={:.3}",
            self.faces,
            self.limited_faces,
            100.0 * self.limited_fraction(),
            self.first_order_faces,
            self.coupled_faces,
            self.min_theta
        )
    }

    /// Emit the summary at `info` level.
    pub fn log_summary(&self, label: &str) {
        info!("{}: {}", label, self.summary_line());
    }
}
