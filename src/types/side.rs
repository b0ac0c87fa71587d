//! Face sides.

use std::fmt;

/// One of the two sides of a face.
///
/// The owner side is the cell the face normal points away from. On a
/// coupled face the owner side lives on the lower-numbered partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Cell the face normal points away from.
    Owner,
    /// Cell the face normal points into.
    Neighbor,
}

impl Side {
    /// The other side of the face.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Owner => Side::Neighbor,
            Side::Neighbor => Side::Owner,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Owner => write!(f, "owner"),
            Side::Neighbor => write!(f, "neighbor"),
        }
    }
}
