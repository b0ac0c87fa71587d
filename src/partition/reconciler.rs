//! Resolution of faces shared between partitions.
//!
//! Both partitions adjacent to a coupled face compute a full record for
//! their own side. After the exchange each side holds both records and picks
//! the upwind one with the same rule:
//!
//! - the owner side is the lower partition id
//! - the decision uses the owner's flux, measured along the
//!   owner-to-neighbor normal
//! - flux > 0 → owner record, flux < 0 → neighbor record, flux == 0 → owner
//!
//! The chosen record is limited with the same limiter on both sides, so the
//! face value is bit-identical regardless of which record arrived first.

use std::collections::BTreeMap;

use log::{debug, info};

use super::error::ExchangeError;
use super::record::BoundaryExchangeRecord;
use super::transport::ExchangeTransport;
use crate::limiter::{FaceCorrection, FaceLimiter};
use crate::types::{FaceIndex, PartitionId, Side};

/// State of one coupled face.
#[derive(Clone, Debug, PartialEq)]
pub enum CoupledFaceState {
    /// Local record built, remote record not yet seen.
    Unresolved {
        /// Record describing the local side.
        local: BoundaryExchangeRecord,
    },
    /// Both records seen and the face value fixed.
    Resolved(ResolvedFace),
}

/// Outcome for a coupled face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedFace {
    /// Local face index.
    pub face: FaceIndex,
    /// Face identifier shared by both partitions.
    pub shared_id: usize,
    /// Side whose record was used.
    pub authoritative: Side,
    /// True if the authoritative record is the local one.
    pub local_donor: bool,
    /// Limited correction from the authoritative record.
    pub correction: FaceCorrection,
}

/// Tracks the coupled faces of one partition through an exchange round.
#[derive(Clone, Debug)]
pub struct PartitionReconciler {
    partition: PartitionId,
    flux_tolerance: f64,
    faces: BTreeMap<usize, CoupledEntry>,
}

#[derive(Clone, Debug)]
struct CoupledEntry {
    face: FaceIndex,
    peer: PartitionId,
    state: CoupledFaceState,
}

impl PartitionReconciler {
    /// Create an empty reconciler for `partition`.
    ///
    /// `flux_tolerance` is the magnitude below which a flux is not used to
    /// flag the two records as disagreeing on direction.
    pub fn new(partition: PartitionId, flux_tolerance: f64) -> Self {
        Self {
            partition,
            flux_tolerance,
            faces: BTreeMap::new(),
        }
    }

    /// Partition this reconciler works for.
    pub fn partition(&self) -> PartitionId {
        self.partition
    }

    /// Number of registered coupled faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if no coupled faces are registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Register the local record of a coupled face.
    pub fn register(
        &mut self,
        face: FaceIndex,
        record: BoundaryExchangeRecord,
    ) -> Result<(), ExchangeError> {
        if record.sender != self.partition || record.receiver == self.partition {
            return Err(ExchangeError::Inconsistent {
                shared_id: record.shared_id,
                reason: format!(
                    "local record {} -> {} on partition {}",
                    record.sender, record.receiver, self.partition
                ),
            });
        }
        if self.faces.contains_key(&record.shared_id) {
            return Err(ExchangeError::Duplicate {
                shared_id: record.shared_id,
                sender: record.sender,
            });
        }
        self.faces.insert(
            record.shared_id,
            CoupledEntry {
                face,
                peer: record.receiver,
                state: CoupledFaceState::Unresolved { local: record },
            },
        );
        Ok(())
    }

    /// Local records grouped by the partition they must be sent to.
    pub fn outgoing(&self) -> BTreeMap<PartitionId, Vec<BoundaryExchangeRecord>> {
        let mut batches: BTreeMap<PartitionId, Vec<BoundaryExchangeRecord>> = BTreeMap::new();
        for entry in self.faces.values() {
            if let CoupledFaceState::Unresolved { local } = &entry.state {
                batches.entry(local.receiver).or_default().push(local.clone());
            }
        }
        batches
    }

    /// Partitions this one shares faces with.
    pub fn peers(&self) -> Vec<PartitionId> {
        let mut peers: Vec<PartitionId> = self.faces.values().map(|e| e.peer).collect();
        peers.sort_unstable();
        peers.dedup();
        peers
    }

    /// Resolve faces from a batch of remote records.
    ///
    /// A record for an already resolved face is a duplicate.
    pub fn accept<L: FaceLimiter + ?Sized>(
        &mut self,
        remote: Vec<BoundaryExchangeRecord>,
        limiter: &L,
    ) -> Result<(), ExchangeError> {
        for record in remote {
            let shared_id = record.shared_id;
            let sender = record.sender;
            let entry = self
                .faces
                .get_mut(&shared_id)
                .ok_or(ExchangeError::Unexpected { shared_id, sender })?;

            let local = match &entry.state {
                CoupledFaceState::Unresolved { local } => local,
                CoupledFaceState::Resolved(_) => {
                    return Err(ExchangeError::Duplicate { shared_id, sender });
                }
            };

            let resolved = resolve(entry.face, local, &record, self.flux_tolerance, limiter)?;
            entry.state = CoupledFaceState::Resolved(resolved);
        }
        Ok(())
    }

    /// True once every registered face is resolved.
    pub fn is_complete(&self) -> bool {
        self.faces
            .values()
            .all(|e| matches!(e.state, CoupledFaceState::Resolved(_)))
    }

    /// State of a coupled face.
    pub fn state(&self, shared_id: usize) -> Option<&CoupledFaceState> {
        self.faces.get(&shared_id).map(|e| &e.state)
    }

    /// Resolved faces in shared-id order.
    ///
    /// Fails with [`ExchangeError::Missing`] if any face is still unresolved.
    pub fn into_resolved(self) -> Result<Vec<ResolvedFace>, ExchangeError> {
        self.faces
            .into_values()
            .map(|entry| match entry.state {
                CoupledFaceState::Resolved(r) => Ok(r),
                CoupledFaceState::Unresolved { local } => Err(ExchangeError::Missing {
                    shared_id: local.shared_id,
                    peer: local.receiver,
                }),
            })
            .collect()
    }

    /// Run one complete exchange round over `transport`.
    ///
    /// Sends every local record, then receives one batch from every peer and
    /// resolves. Returns once all coupled faces are resolved or on the first
    /// error.
    pub fn exchange<T, L>(
        mut self,
        transport: &T,
        limiter: &L,
    ) -> Result<Vec<ResolvedFace>, ExchangeError>
    where
        T: ExchangeTransport + ?Sized,
        L: FaceLimiter + ?Sized,
    {
        let peers = self.peers();
        let outgoing = self.outgoing();
        let n_sent: usize = outgoing.values().map(Vec::len).sum();

        for (peer, batch) in outgoing {
            debug!(
                "partition {}: sending {} records to {}",
                self.partition,
                batch.len(),
                peer
            );
            transport.send(peer, batch)?;
        }

        let mut n_received = 0;
        for &peer in &peers {
            let batch = transport.receive(peer)?;
            n_received += batch.len();
            self.accept(batch, limiter)?;
        }

        let partition = self.partition;
        let resolved = self.into_resolved()?;
        let n_owner = resolved
            .iter()
            .filter(|r| r.authoritative == Side::Owner)
            .count();
        info!(
            "partition {}: exchange with {} peers, {} sent, {} received, {} faces resolved ({} owner, {} neighbor)",
            partition,
            peers.len(),
            n_sent,
            n_received,
            resolved.len(),
            n_owner,
            resolved.len() - n_owner
        );
        Ok(resolved)
    }
}

fn resolve<L: FaceLimiter + ?Sized>(
    face: FaceIndex,
    local: &BoundaryExchangeRecord,
    remote: &BoundaryExchangeRecord,
    flux_tolerance: f64,
    limiter: &L,
) -> Result<ResolvedFace, ExchangeError> {
    let shared_id = local.shared_id;
    let inconsistent = |reason: String| ExchangeError::Inconsistent { shared_id, reason };

    if !local.pairs_with(remote) {
        return Err(inconsistent(format!(
            "record {} -> {} does not pair with local {} -> {}",
            remote.sender, remote.receiver, local.sender, local.receiver
        )));
    }
    if local.coefficients.order != remote.coefficients.order {
        return Err(inconsistent(format!(
            "coefficient order {} on {} but {} on {}",
            local.coefficients.order, local.sender, remote.coefficients.order, remote.sender
        )));
    }
    // Outward fluxes of the two sides must not point the same way
    if (local.flux > flux_tolerance && remote.flux > flux_tolerance)
        || (local.flux < -flux_tolerance && remote.flux < -flux_tolerance)
    {
        return Err(inconsistent(format!(
            "both sides report outward flux of the same sign ({} and {})",
            local.flux, remote.flux
        )));
    }

    let (owner, neighbor) = match local.side() {
        Side::Owner => (local, remote),
        Side::Neighbor => (remote, local),
    };
    let authoritative = if owner.owner_flux() >= 0.0 {
        Side::Owner
    } else {
        Side::Neighbor
    };
    let donor = match authoritative {
        Side::Owner => owner,
        Side::Neighbor => neighbor,
    };

    let correction = limiter.limit(donor.donor, donor.raw_correction, &donor.bounds);
    if correction.is_limited() {
        debug!(
            "coupled face {}: theta {:.3} from {} record",
            shared_id, correction.theta, authoritative
        );
    }

    Ok(ResolvedFace {
        face,
        shared_id,
        authoritative,
        local_donor: donor.sender == local.sender,
        correction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flux::CoefficientSet;
    use crate::limiter::{BoundedLimiter, NeighborhoodBounds};
    use crate::types::CellIndex;

    fn p(i: usize) -> PartitionId {
        PartitionId::new(i)
    }

    fn record(sender: usize, receiver: usize, flux: f64, donor: f64) -> BoundaryExchangeRecord {
        BoundaryExchangeRecord {
            shared_id: 7,
            sender: p(sender),
            receiver: p(receiver),
            flux,
            donor,
            coefficients: CoefficientSet::new(CellIndex::ZERO, 1, vec![0.1]),
            raw_correction: 0.05,
            bounds: NeighborhoodBounds::new(donor.min(0.5), donor.max(0.5)),
        }
    }

    fn resolve_on(
        local: BoundaryExchangeRecord,
        remote: BoundaryExchangeRecord,
    ) -> Result<ResolvedFace, ExchangeError> {
        let mut r = PartitionReconciler::new(local.sender, 1e-12);
        r.register(FaceIndex::new(3), local)?;
        assert!(!r.is_complete());
        r.accept(vec![remote], &BoundedLimiter::unit())?;
        assert!(r.is_complete());
        Ok(r.into_resolved()?.remove(0))
    }

    #[test]
    fn test_owner_upwind() {
        // Flux leaves partition 0 into partition 1
        let a = record(0, 1, 2.0, 0.9);
        let b = record(1, 0, -2.0, 0.1);
        let on_0 = resolve_on(a.clone(), b.clone()).unwrap();
        let on_1 = resolve_on(b, a).unwrap();

        assert_eq!(on_0.authoritative, Side::Owner);
        assert!(on_0.local_donor);
        assert!(!on_1.local_donor);
        assert_eq!(on_0.correction, on_1.correction);
        assert_eq!(on_0.correction.face_value.to_bits(), on_1.correction.face_value.to_bits());
        assert!((on_0.correction.face_value - 0.9).abs() < 1e-15);
    }

    #[test]
    fn test_neighbor_upwind() {
        let a = record(0, 1, -1.0, 0.9);
        let b = record(1, 0, 1.0, 0.1);
        let on_0 = resolve_on(a.clone(), b.clone()).unwrap();
        let on_1 = resolve_on(b, a).unwrap();
        assert_eq!(on_0.authoritative, Side::Neighbor);
        assert_eq!(on_1.authoritative, Side::Neighbor);
        assert!(on_1.local_donor);
        assert!((on_0.correction.face_value - 0.15).abs() < 1e-15);
        assert_eq!(on_0.correction, on_1.correction);
    }

    #[test]
    fn test_zero_flux_ties_to_owner() {
        let a = record(0, 1, 0.0, 0.4);
        let b = record(1, 0, 0.0, 0.6);
        assert_eq!(resolve_on(b, a).unwrap().authoritative, Side::Owner);
    }

    #[test]
    fn test_same_orientation_is_inconsistent() {
        let a = record(0, 1, 1.0, 0.4);
        let b = record(1, 0, 1.0, 0.6);
        assert!(matches!(
            resolve_on(a, b),
            Err(ExchangeError::Inconsistent { shared_id: 7, .. })
        ));
    }

    #[test]
    fn test_order_mismatch_is_inconsistent() {
        let a = record(0, 1, 1.0, 0.4);
        let mut b = record(1, 0, -1.0, 0.6);
        b.coefficients.order = 2;
        assert!(matches!(
            resolve_on(a, b),
            Err(ExchangeError::Inconsistent { .. })
        ));
    }

    #[test]
    fn test_duplicate_and_unexpected() {
        let mut r = PartitionReconciler::new(p(0), 1e-12);
        r.register(FaceIndex::new(0), record(0, 1, 1.0, 0.4)).unwrap();
        assert!(matches!(
            r.register(FaceIndex::new(1), record(0, 1, 1.0, 0.4)),
            Err(ExchangeError::Duplicate { shared_id: 7, .. })
        ));

        let limiter = BoundedLimiter::unit();
        r.accept(vec![record(1, 0, -1.0, 0.6)], &limiter).unwrap();
        assert!(matches!(
            r.accept(vec![record(1, 0, -1.0, 0.6)], &limiter),
            Err(ExchangeError::Duplicate { .. })
        ));

        let mut stranger = record(1, 0, -1.0, 0.6);
        stranger.shared_id = 99;
        assert!(matches!(
            r.accept(vec![stranger], &limiter),
            Err(ExchangeError::Unexpected { shared_id: 99, .. })
        ));
    }

    #[test]
    fn test_missing_record() {
        let mut r = PartitionReconciler::new(p(1), 1e-12);
        r.register(FaceIndex::new(0), record(1, 0, 1.0, 0.4)).unwrap();
        assert_eq!(
            r.into_resolved(),
            Err(ExchangeError::Missing {
                shared_id: 7,
                peer: p(0)
            })
        );
    }

    #[test]
    fn test_register_rejects_foreign_record() {
        let mut r = PartitionReconciler::new(p(2), 1e-12);
        assert!(matches!(
            r.register(FaceIndex::new(0), record(0, 1, 1.0, 0.4)),
            Err(ExchangeError::Inconsistent { .. })
        ));
    }

    #[test]
    fn test_outgoing_and_peers() {
        let mut r = PartitionReconciler::new(p(1), 1e-12);
        let mut a = record(1, 0, 1.0, 0.4);
        a.shared_id = 1;
        let mut b = record(1, 2, 1.0, 0.4);
        b.shared_id = 2;
        r.register(FaceIndex::new(0), a).unwrap();
        r.register(FaceIndex::new(1), b).unwrap();
        assert_eq!(r.peers(), vec![p(0), p(2)]);
        let out = r.outgoing();
        assert_eq!(out[&p(0)].len(), 1);
        assert_eq!(out[&p(2)][0].shared_id, 2);
    }
}
