//! Runtime diagnostics for reconstruction passes.
//!
//! Provides counters describing how hard the limiter worked during a pass:
//! - faces visited, limited and reduced to first order
//! - smallest limiter scalar seen
//! - coupled faces resolved through the partition exchange
//!
//! # Example
//!
//! ```
//! use bounded_weno::diagnostics::LimiterStatistics;
//! use bounded_weno::limiter::FaceCorrection;
//!
//! let mut stats = LimiterStatistics::new();
//! stats.record(&FaceCorrection::unlimited(0.5, 0.1));
//! stats.record(&FaceCorrection::first_order(0.5, 0.7));
//! assert_eq!(stats.faces, 2);
//! assert_eq!(stats.first_order_faces, 1);
//! println!("{}", stats.summary_line());
//! ```

mod limiter_stats;

pub use limiter_stats::LimiterStatistics;
