//! Bounded upwind-fit reconstruction over a face mesh.
//!
//! For every face the scheme:
//!
//! 1. picks the donor cell from the sign of the face flux
//! 2. assembles the raw correction from the donor's coefficients and the
//!    basis integrals of that face
//! 3. limits the correction against the donor neighborhood
//!
//! Faces on a partition boundary are deferred: the local side is packed into
//! a [`BoundaryExchangeRecord`] and the face is finalized only after the
//! exchange with the neighboring partition.

use log::{debug, info};

use super::config::SchemeConfig;
use super::error::SchemeError;
use crate::diagnostics::LimiterStatistics;
use crate::flux::{
    CoefficientSet, FaceFluxAssembler, upwind_side, upwind_value, upwind_weight,
    uses_explicit_correction,
};
use crate::limiter::{FaceCorrection, FaceLimiter, NeighborhoodBounds, StandardLimiter};
use crate::mesh::{FaceConnection, FaceMesh};
use crate::partition::{
    BoundaryExchangeRecord, ExchangeTransport, PartitionReconciler, ResolvedFace,
};
use crate::storage::Dense3DArray;
use crate::types::{CellIndex, FaceIndex, Side};

/// Outcome of the local part of a pass for one face.
#[derive(Clone, Debug)]
enum FaceOutcome {
    Corrected(FaceCorrection),
    Boundary(FaceCorrection),
    Coupled(BoundaryExchangeRecord),
}

/// Result of the local part of a pass, before the partition exchange.
#[derive(Clone, Debug)]
pub struct LocalPass {
    /// Correction per face; `None` for faces awaiting the exchange.
    pub faces: Vec<Option<FaceCorrection>>,
    /// Local records of coupled faces.
    pub records: Vec<(FaceIndex, BoundaryExchangeRecord)>,
    /// Limiter activity on local faces.
    pub statistics: LimiterStatistics,
}

impl LocalPass {
    fn from_outcomes(outcomes: Vec<FaceOutcome>) -> Self {
        let mut faces = Vec::with_capacity(outcomes.len());
        let mut records = Vec::new();
        let mut statistics = LimiterStatistics::new();

        for (f, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                FaceOutcome::Corrected(c) => {
                    statistics.record(&c);
                    faces.push(Some(c));
                }
                FaceOutcome::Boundary(c) => faces.push(Some(c)),
                FaceOutcome::Coupled(record) => {
                    records.push((FaceIndex::new(f), record));
                    faces.push(None);
                }
            }
        }

        Self {
            faces,
            records,
            statistics,
        }
    }

    /// True if no face waits for the exchange.
    pub fn is_complete(&self) -> bool {
        self.records.is_empty()
    }

    /// Fill in coupled faces and produce the final reconstruction.
    pub fn finish(mut self, resolved: Vec<ResolvedFace>) -> Result<Reconstruction, SchemeError> {
        for r in resolved {
            let slot = self
                .faces
                .get_mut(r.face.get())
                .ok_or(SchemeError::Unresolved { face: r.face })?;
            *slot = Some(r.correction);
            self.statistics.record_coupled(&r.correction);
        }

        let mut corrections = Vec::with_capacity(self.faces.len());
        let mut face_values = Vec::with_capacity(self.faces.len());
        for (f, c) in self.faces.iter().enumerate() {
            let c = c.ok_or(SchemeError::Unresolved {
                face: FaceIndex::new(f),
            })?;
            corrections.push(c.limited_correction);
            face_values.push(c.face_value);
        }

        Ok(Reconstruction {
            corrections,
            face_values,
            statistics: self.statistics,
        })
    }
}

/// Final result of a reconstruction pass.
#[derive(Clone, Debug)]
pub struct Reconstruction {
    /// Explicit correction per face, added to the upwind value.
    pub corrections: Vec<f64>,
    /// Bounded face value per face.
    pub face_values: Vec<f64>,
    /// Limiter activity, coupled faces included.
    pub statistics: LimiterStatistics,
}

/// Bounded upwind-fit interpolation scheme.
///
/// Borrows the mesh, one [`CoefficientSet`] per cell (in cell order) and the
/// basis-integral table with axes (integration dimension, cell, basis).
///
/// # Example
///
/// ```
/// use bounded_weno::flux::CoefficientSet;
/// use bounded_weno::mesh::{FaceMesh, UnstructuredMesh};
/// use bounded_weno::scheme::{BoundedUpwindScheme, SchemeConfig};
/// use bounded_weno::storage::Dense3DArray;
/// use bounded_weno::types::CellIndex;
///
/// let mesh = UnstructuredMesh::line(3);
/// let coeffs: Vec<_> = CellIndex::iter(3)
///     .map(|c| CoefficientSet::new(c, 1, vec![0.5]))
///     .collect();
/// let mut table = Dense3DArray::new(2, 3, 1);
/// table.fill(0.2);
///
/// let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()).unwrap();
/// let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);
/// let pass = scheme.evaluate_local(&[0.2, 0.5, 0.8], &flux).unwrap();
/// let result = pass.finish(Vec::new()).unwrap();
/// assert!(result.face_values.iter().all(|v| (0.0..=1.0).contains(v)));
/// ```
#[derive(Debug)]
pub struct BoundedUpwindScheme<'a, M: FaceMesh> {
    mesh: &'a M,
    coefficients: &'a [CoefficientSet],
    integrals: &'a Dense3DArray<f64>,
    config: SchemeConfig,
}

impl<'a, M: FaceMesh> BoundedUpwindScheme<'a, M> {
    /// Create a scheme, checking that coefficients cover the mesh cells.
    pub fn new(
        mesh: &'a M,
        coefficients: &'a [CoefficientSet],
        integrals: &'a Dense3DArray<f64>,
        config: SchemeConfig,
    ) -> Result<Self, SchemeError> {
        if coefficients.len() != mesh.n_cells() {
            return Err(SchemeError::CoefficientCount {
                expected: mesh.n_cells(),
                actual: coefficients.len(),
            });
        }
        for (index, set) in CellIndex::iter(coefficients.len()).zip(coefficients) {
            if set.cell != index {
                return Err(SchemeError::CoefficientCell {
                    index,
                    cell: set.cell,
                });
            }
        }
        Ok(Self {
            mesh,
            coefficients,
            integrals,
            config,
        })
    }

    /// The mesh this scheme works on.
    pub fn mesh(&self) -> &M {
        self.mesh
    }

    /// The active limiter.
    pub fn limiter(&self) -> &StandardLimiter {
        &self.config.limiter
    }

    /// Implicit owner weights per face: 1 where the owner is upwind.
    pub fn weights(&self, face_flux: &[f64]) -> Vec<f64> {
        face_flux.iter().map(|&phi| upwind_weight(phi)).collect()
    }

    /// The scheme adds an explicit correction to the upwind weights.
    pub fn corrected(&self) -> bool {
        uses_explicit_correction()
    }

    fn check_inputs(&self, field: &[f64], face_flux: &[f64]) -> Result<(), SchemeError> {
        if field.len() != self.mesh.n_cells() {
            return Err(SchemeError::FieldLength {
                expected: self.mesh.n_cells(),
                actual: field.len(),
            });
        }
        if face_flux.len() != self.mesh.n_faces() {
            return Err(SchemeError::FluxLength {
                expected: self.mesh.n_faces(),
                actual: face_flux.len(),
            });
        }
        Ok(())
    }

    /// Raw correction and neighborhood of `donor` at `face`.
    fn donor_data(
        &self,
        field: &[f64],
        face: FaceIndex,
        donor: CellIndex,
        side: Side,
    ) -> Result<(f64, NeighborhoodBounds), SchemeError> {
        let dim = self.mesh.integration_dim(face, side);
        let raw = FaceFluxAssembler::assemble(&self.coefficients[donor], self.integrals, dim)
            .map_err(|source| SchemeError::Assembly {
                face,
                cell: donor,
                source,
            })?;
        let bounds = NeighborhoodBounds::from_values(
            field[donor],
            self.mesh.cell_neighbors(donor).iter().map(|&c| field[c]),
        );
        Ok((raw, bounds))
    }

    fn face_outcome(
        &self,
        field: &[f64],
        face_flux: &[f64],
        face: FaceIndex,
    ) -> Result<FaceOutcome, SchemeError> {
        let phi = face_flux[face];
        if !phi.is_finite() {
            return Err(SchemeError::NonFiniteFlux { face, flux: phi });
        }
        let owner = self.mesh.owner(face);

        match self.mesh.face_connection(face) {
            FaceConnection::Interior(neighbor) => {
                let side = upwind_side(phi);
                let donor = match side {
                    Side::Owner => owner,
                    Side::Neighbor => neighbor,
                };
                let donor_value = upwind_value(field[owner], field[neighbor], phi);
                let (raw, bounds) = self.donor_data(field, face, donor, side)?;
                let correction = self.config.limiter.limit(donor_value, raw, &bounds);
                if correction.theta == 0.0 && raw != 0.0 {
                    debug!("face {face}: correction fully limited at donor {donor}");
                }
                Ok(FaceOutcome::Corrected(correction))
            }
            FaceConnection::Coupled(coupled) => {
                let (raw, bounds) = self.donor_data(field, face, owner, Side::Owner)?;
                Ok(FaceOutcome::Coupled(BoundaryExchangeRecord {
                    shared_id: coupled.shared_id,
                    sender: self.mesh.partition(),
                    receiver: coupled.partition,
                    flux: phi,
                    donor: field[owner],
                    coefficients: self.coefficients[owner].clone(),
                    raw_correction: raw,
                    bounds,
                }))
            }
            // Physical boundaries carry no explicit correction
            FaceConnection::Boundary(_) => Ok(FaceOutcome::Boundary(FaceCorrection::unlimited(
                field[owner],
                0.0,
            ))),
        }
    }

    /// Local part of a pass: every interior and boundary face is finalized,
    /// coupled faces are packed into exchange records.
    pub fn evaluate_local(&self, field: &[f64], face_flux: &[f64]) -> Result<LocalPass, SchemeError> {
        self.check_inputs(field, face_flux)?;
        let outcomes = self
            .mesh
            .faces()
            .map(|f| self.face_outcome(field, face_flux, f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LocalPass::from_outcomes(outcomes))
    }

    /// Parallel version of [`evaluate_local`](Self::evaluate_local).
    ///
    /// Produces the same result; faces are independent.
    #[cfg(feature = "parallel")]
    pub fn evaluate_local_parallel(
        &self,
        field: &[f64],
        face_flux: &[f64],
    ) -> Result<LocalPass, SchemeError> {
        use rayon::prelude::*;

        self.check_inputs(field, face_flux)?;
        let outcomes = (0..self.mesh.n_faces())
            .into_par_iter()
            .map(|f| self.face_outcome(field, face_flux, FaceIndex::new(f)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LocalPass::from_outcomes(outcomes))
    }

    /// Complete pass including the partition exchange.
    ///
    /// Blocks until the neighboring partitions have sent their records.
    pub fn correction<T: ExchangeTransport + ?Sized>(
        &self,
        field: &[f64],
        face_flux: &[f64],
        transport: &T,
    ) -> Result<Reconstruction, SchemeError> {
        if transport.partition() != self.mesh.partition() {
            return Err(SchemeError::PartitionMismatch {
                mesh: self.mesh.partition(),
                transport: transport.partition(),
            });
        }

        let mut pass = self.evaluate_local(field, face_flux)?;
        let mut reconciler =
            PartitionReconciler::new(self.mesh.partition(), self.config.flux_tolerance);
        for (face, record) in pass.records.drain(..) {
            reconciler.register(face, record)?;
        }
        let resolved = reconciler.exchange(transport, &self.config.limiter)?;
        let result = pass.finish(resolved)?;

        info!(
            "partition {}: reconstruction with {} limiter",
            self.mesh.partition(),
            self.config.limiter.name()
        );
        result.statistics.log_summary("limiter");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limiter::LimiterConfig;
    use crate::mesh::UnstructuredMesh;
    use crate::partition::ExchangeHub;

    const TOL: f64 = 1e-14;

    fn setup(n: usize, coeff: f64, integral: f64) -> (UnstructuredMesh, Vec<CoefficientSet>, Dense3DArray<f64>) {
        let mesh = UnstructuredMesh::line(n);
        let coeffs = CellIndex::iter(n)
            .map(|c| CoefficientSet::new(c, 1, vec![coeff]))
            .collect();
        let mut table = Dense3DArray::new(2, n, 1);
        table.fill(integral);
        (mesh, coeffs, table)
    }

    #[test]
    fn test_weights_and_corrected() {
        let (mesh, coeffs, table) = setup(2, 0.0, 0.0);
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()).unwrap();
        assert_eq!(scheme.weights(&[1.0, -1.0, 0.0]), vec![1.0, 0.0, 1.0]);
        assert!(scheme.corrected());
        assert_eq!(scheme.limiter().name(), "bounded");
    }

    #[test]
    fn test_uniform_field_keeps_full_correction() {
        // Uniform 0.5 with a small positive correction: theta stays 1
        let (mesh, coeffs, table) = setup(4, 0.1, 0.5);
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()).unwrap();
        let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);
        let result = scheme.evaluate_local(&[0.5; 4], &flux).unwrap().finish(Vec::new()).unwrap();

        for f in 0..3 {
            assert!((result.corrections[f] - 0.05).abs() < TOL);
            assert!((result.face_values[f] - 0.55).abs() < TOL);
        }
        assert_eq!(result.statistics.limited_faces, 0);
        assert_eq!(result.statistics.min_theta, 1.0);
    }

    #[test]
    fn test_donor_follows_flux_sign() {
        // Linear profile, correction pushes the face value toward the neighbor
        let (mesh, coeffs, table) = setup(3, 1.0, 0.1);
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()).unwrap();
        let field = [0.2, 0.5, 0.8];

        let right = scheme
            .evaluate_local(&field, &mesh.uniform_face_fluxes([1.0, 0.0, 0.0]))
            .unwrap()
            .finish(Vec::new())
            .unwrap();
        assert!((right.face_values[0] - 0.3).abs() < TOL);
        assert!((right.face_values[1] - 0.6).abs() < TOL);

        let left = scheme
            .evaluate_local(&field, &mesh.uniform_face_fluxes([-1.0, 0.0, 0.0]))
            .unwrap()
            .finish(Vec::new())
            .unwrap();
        assert!((left.face_values[0] - 0.6).abs() < TOL);
        // Donor 0.8 sits at its neighborhood maximum
        assert_eq!(left.face_values[1], 0.8);
    }

    #[test]
    fn test_overshoot_is_limited() {
        let (mesh, coeffs, table) = setup(3, 1.0, 0.5);
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()).unwrap();
        let field = [0.2, 0.5, 0.8];
        let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);
        let result = scheme.evaluate_local(&field, &flux).unwrap().finish(Vec::new()).unwrap();

        // Face 0: donor 0.2, raw 0.5 -> 0.7 exceeds neighborhood max 0.5
        assert_eq!(result.face_values[0], 0.5);
        // Face 1: donor 0.5, raw 0.5 -> 1.0 exceeds neighborhood max 0.8
        assert_eq!(result.face_values[1], 0.8);
        assert_eq!(result.statistics.limited_faces, 2);
        for v in &result.face_values {
            assert!((0.0..=1.0).contains(v));
        }
    }

    #[test]
    fn test_no_limiter_passes_raw() {
        let (mesh, coeffs, table) = setup(3, 1.0, 0.5);
        let config = SchemeConfig::new().with_limiter(StandardLimiter::None);
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, config).unwrap();
        let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);
        let result = scheme.evaluate_local(&[0.2, 0.5, 0.8], &flux).unwrap().finish(Vec::new()).unwrap();
        assert!((result.face_values[1] - 1.0).abs() < TOL);
    }

    #[test]
    fn test_boundary_faces_uncorrected() {
        let (mesh, coeffs, table) = setup(2, 1.0, 0.1);
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()).unwrap();
        let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);
        let result = scheme.evaluate_local(&[0.3, 0.6], &flux).unwrap().finish(Vec::new()).unwrap();
        // Faces 1 and 2 are the left and right boundaries
        assert_eq!(result.corrections[1], 0.0);
        assert_eq!(result.face_values[1], 0.3);
        assert_eq!(result.face_values[2], 0.6);
        assert_eq!(result.statistics.faces, 1);
    }

    #[test]
    fn test_custom_physical_range() {
        let (mesh, coeffs, table) = setup(3, 1.0, 5.0);
        let config = SchemeConfig::new()
            .with_limiter_config(LimiterConfig::new().with_bounds(0.0, 10.0));
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, config).unwrap();
        let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);
        let result = scheme.evaluate_local(&[2.0, 5.0, 8.0], &flux).unwrap().finish(Vec::new()).unwrap();
        assert_eq!(result.face_values[0], 5.0);
        assert_eq!(result.face_values[1], 8.0);
    }

    #[test]
    fn test_input_validation() {
        let (mesh, coeffs, table) = setup(3, 1.0, 0.1);
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()).unwrap();
        let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);

        assert!(matches!(
            scheme.evaluate_local(&[0.5; 2], &flux),
            Err(SchemeError::FieldLength { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            scheme.evaluate_local(&[0.5; 3], &flux[..2]),
            Err(SchemeError::FluxLength { .. })
        ));

        let mut bad_flux = flux.clone();
        bad_flux[1] = f64::NAN;
        assert!(matches!(
            scheme.evaluate_local(&[0.5; 3], &bad_flux),
            Err(SchemeError::NonFiniteFlux { face, .. }) if face == FaceIndex::new(1)
        ));
    }

    #[test]
    fn test_coefficient_validation() {
        let (mesh, mut coeffs, table) = setup(3, 1.0, 0.1);
        assert!(matches!(
            BoundedUpwindScheme::new(&mesh, &coeffs[..2], &table, SchemeConfig::default()),
            Err(SchemeError::CoefficientCount { expected: 3, actual: 2 })
        ));

        coeffs.swap(0, 1);
        assert!(matches!(
            BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()),
            Err(SchemeError::CoefficientCell { .. })
        ));
    }

    #[test]
    fn test_assembly_error_carries_face_context() {
        let (mesh, _, table) = setup(2, 1.0, 0.1);
        let coeffs: Vec<_> = CellIndex::iter(2)
            .map(|c| CoefficientSet::new(c, 2, vec![1.0, 1.0]))
            .collect();
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()).unwrap();
        let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);
        let err = scheme.evaluate_local(&[0.5; 2], &flux).unwrap_err();
        assert!(matches!(err, SchemeError::Assembly { cell, .. } if cell == CellIndex::new(0)));
        assert!(err.to_string().contains("F0"));
    }

    #[test]
    fn test_single_partition_correction() {
        let (mesh, coeffs, table) = setup(3, 1.0, 0.1);
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()).unwrap();
        let endpoints = ExchangeHub::new(1).into_endpoints();
        let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);
        let result = scheme.correction(&[0.2, 0.5, 0.8], &flux, &endpoints[0]).unwrap();
        assert_eq!(result.face_values.len(), 4);
        assert_eq!(result.statistics.coupled_faces, 0);
    }

    #[test]
    fn test_unfinished_pass_is_an_error() {
        let pieces = UnstructuredMesh::split_line(2, 2);
        let coeffs = vec![CoefficientSet::new(CellIndex::ZERO, 1, vec![0.0])];
        let table = Dense3DArray::new(2, 1, 1);
        let scheme =
            BoundedUpwindScheme::new(&pieces[0], &coeffs, &table, SchemeConfig::default()).unwrap();
        let flux = pieces[0].uniform_face_fluxes([1.0, 0.0, 0.0]);
        let pass = scheme.evaluate_local(&[0.5], &flux).unwrap();
        assert!(!pass.is_complete());
        assert!(matches!(pass.finish(Vec::new()), Err(SchemeError::Unresolved { .. })));
    }

    #[test]
    fn test_transport_partition_mismatch() {
        let pieces = UnstructuredMesh::split_line(2, 2);
        let coeffs = vec![CoefficientSet::new(CellIndex::ZERO, 1, vec![0.0])];
        let table = Dense3DArray::new(2, 1, 1);
        let scheme =
            BoundedUpwindScheme::new(&pieces[0], &coeffs, &table, SchemeConfig::default()).unwrap();
        let endpoints = ExchangeHub::new(2).into_endpoints();
        let flux = pieces[0].uniform_face_fluxes([1.0, 0.0, 0.0]);
        assert!(matches!(
            scheme.correction(&[0.5], &flux, &endpoints[1]),
            Err(SchemeError::PartitionMismatch { .. })
        ));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let (mesh, coeffs, table) = setup(16, 0.7, 0.3);
        let scheme = BoundedUpwindScheme::new(&mesh, &coeffs, &table, SchemeConfig::default()).unwrap();
        let field: Vec<f64> = (0..16).map(|i| ((i as f64) * 0.7).sin().abs()).collect();
        let flux = mesh.uniform_face_fluxes([1.0, 0.0, 0.0]);

        let serial = scheme.evaluate_local(&field, &flux).unwrap().finish(Vec::new()).unwrap();
        let parallel = scheme
            .evaluate_local_parallel(&field, &flux)
            .unwrap()
            .finish(Vec::new())
            .unwrap();
        assert_eq!(serial.face_values, parallel.face_values);
        assert_eq!(serial.statistics, parallel.statistics);
    }
}
