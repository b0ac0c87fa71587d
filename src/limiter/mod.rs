//! Face limiters.
//!
//! A limiter scales the raw high-order correction at a face so that the
//! resulting face value stays bounded.
//!
//! # Limiter Trait
//!
//! The [`FaceLimiter`] trait provides a generic interface. Built-in types:
//! - [`BoundedLimiter`]: neighborhood extrema and physical range
//! - [`NoLimiter`]: pass-through
//! - [`StandardLimiter`]: enum for zero-cost dispatch
//!
//! # Example
//!
//! ```
//! use bounded_weno::limiter::{BoundedLimiter, FaceLimiter, NeighborhoodBounds};
//!
//! let bounds = NeighborhoodBounds::from_values(0.5, [0.3, 0.8]);
//! let r = BoundedLimiter::unit().limit(0.5, 0.6, &bounds);
//! assert_eq!(r.face_value, 0.8);
//! assert!(r.theta < 1.0);
//! ```

mod bounded;
mod bounds;
mod standard;
mod traits;

pub use bounded::BoundedLimiter;
pub use bounds::{LimiterConfig, NeighborhoodBounds};
pub use standard::{NoLimiter, StandardLimiter, create_limiter};
pub use traits::{BoxedFaceLimiter, FaceCorrection, FaceLimiter};
