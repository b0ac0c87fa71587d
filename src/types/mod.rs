//! Strongly-typed domain types for safer APIs.
//!
//! Cells, faces and partitions are all addressed by plain
//! integers in the mesh data. The newtypes here keep them apart so a face
//! index can never be passed where a cell index is expected.
//!
//! # Example
//!
//! ```
//! use bounded_weno::types::{CellIndex, FaceIndex, PartitionId, Side};
//!
//! let cell = CellIndex::new(3);
//! let face = FaceIndex::new(7);
//! assert_eq!(format!("{cell} {face}"), "C3 F7");
//!
//! let rank = PartitionId::new(1);
//! assert_eq!(rank.get(), 1);
//! assert_eq!(Side::Owner.opposite(), Side::Neighbor);
//! ```

mod indices;
mod side;

pub use indices::{CellIndex, FaceIndex, PartitionId};
pub use side::Side;
