//! Reconciliation of faces on partition boundaries.
//!
//! A mesh split across partitions has faces whose two cells live on
//! different partitions. Each side builds a [`BoundaryExchangeRecord`] for
//! its own cell, the records are swapped over an [`ExchangeTransport`], and
//! the [`PartitionReconciler`] picks the upwind record so that both sides
//! finish with the same face value.
//!
//! The exchange is the only synchronization point of a reconstruction pass.
//! Peer sets must be symmetric: if partition A shares a face with B, B
//! shares that face with A.

mod error;
mod reconciler;
mod record;
mod transport;

pub use error::ExchangeError;
pub use reconciler::{CoupledFaceState, PartitionReconciler, ResolvedFace};
pub use record::BoundaryExchangeRecord;
pub use transport::{ChannelTransport, ExchangeHub, ExchangeTransport};
