//! Partition exchange errors.

use thiserror::Error;

use crate::types::PartitionId;

/// Failures of the boundary exchange. All are fatal for the pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExchangeError {
    /// No record arrived for a coupled face.
    #[error("no record from partition {peer} for coupled face {shared_id}")]
    Missing { shared_id: usize, peer: PartitionId },

    /// Two records for the same face from the same side.
    #[error("duplicate record for coupled face {shared_id} from partition {sender}")]
    Duplicate {
        shared_id: usize,
        sender: PartitionId,
    },

    /// A record for a face this partition does not share with the sender.
    #[error("partition {sender} sent a record for unknown coupled face {shared_id}")]
    Unexpected {
        shared_id: usize,
        sender: PartitionId,
    },

    /// Both sides disagree on the face.
    #[error("inconsistent records for coupled face {shared_id}: {reason}")]
    Inconsistent { shared_id: usize, reason: String },

    /// The peer endpoint is gone.
    #[error("exchange channel to partition {peer} disconnected")]
    Disconnected { peer: PartitionId },

    /// The peer is not reachable through this transport.
    #[error("partition {peer} is not connected to this transport")]
    UnknownPeer { peer: PartitionId },
}
