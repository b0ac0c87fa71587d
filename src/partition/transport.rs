//! Message passing between partitions.
//!
//! A round of the exchange sends one batch of records to every peer and then
//! receives one batch from every peer. Sends never block, so the round
//! cannot deadlock as long as every partition takes part.

use crossbeam_channel::{Receiver, Sender, unbounded};

use super::error::ExchangeError;
use super::record::BoundaryExchangeRecord;
use crate::types::PartitionId;

/// Point-to-point transport for boundary exchange records.
pub trait ExchangeTransport {
    /// Partition this endpoint belongs to.
    fn partition(&self) -> PartitionId;

    /// Send a batch of records to `to`.
    fn send(&self, to: PartitionId, records: Vec<BoundaryExchangeRecord>)
    -> Result<(), ExchangeError>;

    /// Block until the next batch from `from` arrives.
    fn receive(&self, from: PartitionId) -> Result<Vec<BoundaryExchangeRecord>, ExchangeError>;
}

/// In-process transport endpoint backed by `crossbeam_channel`.
///
/// Each ordered pair of partitions has its own unbounded channel, so batches
/// from different peers never interleave.
#[derive(Debug)]
pub struct ChannelTransport {
    partition: PartitionId,
    outboxes: Vec<Option<Sender<Vec<BoundaryExchangeRecord>>>>,
    inboxes: Vec<Option<Receiver<Vec<BoundaryExchangeRecord>>>>,
}

impl ChannelTransport {
    /// Number of partitions reachable through the hub, including this one.
    pub fn n_partitions(&self) -> usize {
        self.outboxes.len()
    }
}

impl ExchangeTransport for ChannelTransport {
    fn partition(&self) -> PartitionId {
        self.partition
    }

    fn send(
        &self,
        to: PartitionId,
        records: Vec<BoundaryExchangeRecord>,
    ) -> Result<(), ExchangeError> {
        let outbox = self
            .outboxes
            .get(to.get())
            .and_then(Option::as_ref)
            .ok_or(ExchangeError::UnknownPeer { peer: to })?;
        outbox
            .send(records)
            .map_err(|_| ExchangeError::Disconnected { peer: to })
    }

    fn receive(&self, from: PartitionId) -> Result<Vec<BoundaryExchangeRecord>, ExchangeError> {
        let inbox = self
            .inboxes
            .get(from.get())
            .and_then(Option::as_ref)
            .ok_or(ExchangeError::UnknownPeer { peer: from })?;
        inbox
            .recv()
            .map_err(|_| ExchangeError::Disconnected { peer: from })
    }
}

/// Wiring for a fully connected set of [`ChannelTransport`] endpoints.
///
/// # Example
///
/// ```
/// use bounded_weno::partition::{ExchangeHub, ExchangeTransport};
/// use bounded_weno::types::PartitionId;
///
/// let mut endpoints = ExchangeHub::new(2).into_endpoints();
/// let b = endpoints.pop().unwrap();
/// let a = endpoints.pop().unwrap();
///
/// a.send(PartitionId::new(1), Vec::new()).unwrap();
/// assert!(b.receive(PartitionId::new(0)).unwrap().is_empty());
/// ```
#[derive(Debug)]
pub struct ExchangeHub {
    endpoints: Vec<ChannelTransport>,
}

impl ExchangeHub {
    /// Connect `n_partitions` endpoints pairwise.
    pub fn new(n_partitions: usize) -> Self {
        let mut outboxes: Vec<Vec<Option<Sender<_>>>> =
            (0..n_partitions).map(|_| vec![None; n_partitions]).collect();
        let mut inboxes: Vec<Vec<Option<Receiver<_>>>> =
            (0..n_partitions).map(|_| vec![None; n_partitions]).collect();

        for from in 0..n_partitions {
            for to in 0..n_partitions {
                if from == to {
                    continue;
                }
                let (tx, rx) = unbounded();
                outboxes[from][to] = Some(tx);
                inboxes[to][from] = Some(rx);
            }
        }

        let endpoints = outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(p, (outboxes, inboxes))| ChannelTransport {
                partition: PartitionId::new(p),
                outboxes,
                inboxes,
            })
            .collect();

        Self { endpoints }
    }

    /// Number of endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns true if the hub has no endpoints.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Endpoints in partition order.
    pub fn into_endpoints(self) -> Vec<ChannelTransport> {
        self.endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flux::CoefficientSet;
    use crate::limiter::NeighborhoodBounds;
    use crate::types::CellIndex;

    fn p(i: usize) -> PartitionId {
        PartitionId::new(i)
    }

    fn record(sender: usize, receiver: usize) -> BoundaryExchangeRecord {
        BoundaryExchangeRecord {
            shared_id: 0,
            sender: p(sender),
            receiver: p(receiver),
            flux: 1.0,
            donor: 0.25,
            coefficients: CoefficientSet::first_order(CellIndex::ZERO),
            raw_correction: 0.0,
            bounds: NeighborhoodBounds::new(0.25, 0.25),
        }
    }

    #[test]
    fn test_pairwise_delivery() {
        let endpoints = ExchangeHub::new(3).into_endpoints();
        assert_eq!(endpoints[1].partition(), p(1));
        assert_eq!(endpoints[1].n_partitions(), 3);

        endpoints[0].send(p(2), vec![record(0, 2)]).unwrap();
        endpoints[1].send(p(2), vec![record(1, 2), record(1, 2)]).unwrap();

        // Receiving from a specific peer ignores batches from others
        assert_eq!(endpoints[2].receive(p(1)).unwrap().len(), 2);
        assert_eq!(endpoints[2].receive(p(0)).unwrap()[0].sender, p(0));
    }

    #[test]
    fn test_self_and_unknown_peers() {
        let endpoints = ExchangeHub::new(2).into_endpoints();
        assert_eq!(
            endpoints[0].send(p(0), Vec::new()),
            Err(ExchangeError::UnknownPeer { peer: p(0) })
        );
        assert_eq!(
            endpoints[0].receive(p(5)),
            Err(ExchangeError::UnknownPeer { peer: p(5) })
        );
    }

    #[test]
    fn test_disconnected_peer() {
        let mut endpoints = ExchangeHub::new(2).into_endpoints();
        let b = endpoints.pop().unwrap();
        drop(endpoints);
        assert_eq!(
            b.receive(p(0)),
            Err(ExchangeError::Disconnected { peer: p(0) })
        );
        assert_eq!(
            b.send(p(0), Vec::new()),
            Err(ExchangeError::Disconnected { peer: p(0) })
        );
    }

    #[test]
    fn test_hub_len() {
        let hub = ExchangeHub::new(4);
        assert_eq!(hub.len(), 4);
        assert!(!hub.is_empty());
        assert!(ExchangeHub::new(0).is_empty());
    }
}
