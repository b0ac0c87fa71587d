//! Data sent across a partition boundary for one coupled face.

use crate::flux::CoefficientSet;
use crate::limiter::NeighborhoodBounds;
use crate::types::{PartitionId, Side};

/// Everything one side of a coupled face knows about its own cell.
///
/// Each record is enough to compute the limited face value as if the sending
/// side were the donor, so the receiving side can reproduce the result
/// without access to remote integral tables.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryExchangeRecord {
    /// Face identifier shared by both partitions.
    pub shared_id: usize,
    /// Partition that built the record.
    pub sender: PartitionId,
    /// Partition on the other side of the face.
    pub receiver: PartitionId,
    /// Face flux along the sender's outward normal.
    pub flux: f64,
    /// Value of the sender's cell.
    pub donor: f64,
    /// Reconstruction coefficients of the sender's cell.
    pub coefficients: CoefficientSet,
    /// Raw correction evaluated with the sender's integrals.
    pub raw_correction: f64,
    /// Value range of the sender's neighborhood.
    pub bounds: NeighborhoodBounds,
}

impl BoundaryExchangeRecord {
    /// Side of the face the sender sits on. The lower partition owns the face.
    #[inline]
    pub fn side(&self) -> Side {
        if self.sender < self.receiver {
            Side::Owner
        } else {
            Side::Neighbor
        }
    }

    /// Flux measured along the owner-to-neighbor normal.
    #[inline]
    pub fn owner_flux(&self) -> f64 {
        match self.side() {
            Side::Owner => self.flux,
            Side::Neighbor => -self.flux,
        }
    }

    /// True if `other` describes the opposite side of the same face.
    pub fn pairs_with(&self, other: &Self) -> bool {
        self.shared_id == other.shared_id
            && self.sender == other.receiver
            && self.receiver == other.sender
    }
}
