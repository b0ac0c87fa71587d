//! Cell geometry for stencil reconstruction.
//!
//! [`CellFrame`] maps physical points of a tetrahedral cell to the reference
//! coordinates in which basis integrals are tabulated.
//!
//! # Example
//!
//! ```
//! use bounded_weno::geometry::CellFrame;
//!
//! let frame = CellFrame::from_vertices(
//!     [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]],
//!     CellFrame::DEFAULT_TOLERANCE,
//! )
//! .unwrap();
//! let xi = frame.to_reference([1.0, 0.5, 0.0]);
//! assert!((xi[0] - 0.5).abs() < 1e-14 && (xi[1] - 0.25).abs() < 1e-14);
//! ```

mod cell_frame;

pub use cell_frame::CellFrame;
