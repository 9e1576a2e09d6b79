use tracing::{debug, error, info, warn};

use crate::catalog::{TankCatalog, TankDefinition, TankId, UnitCache, UnitDescriptor};
use crate::curve::FillCurve;
use crate::error::{MeshError, RasterizeError, Result, TankfillError};
use crate::grid::VoxelGrid;
use crate::mesh::{CheckEdges, MeshVolume, PrepareMesh, TriangleMesh};
use crate::operations::{
    ComposeCurves, ProfileHeight, Rasterizer, ScaleToVolume, SolveInterior, VoxelSize,
    VoxelSizePolicy,
};
use crate::output::FillTable;

/// Supplies the surface mesh of a unit.
pub trait MeshSource {
    /// Loads the mesh for `unit`.
    ///
    /// # Errors
    ///
    /// Returns an error if no mesh can be produced for the unit.
    fn load(&self, unit: &UnitDescriptor) -> Result<TriangleMesh>;
}

impl<F> MeshSource for F
where
    F: Fn(&UnitDescriptor) -> Result<TriangleMesh>,
{
    fn load(&self, unit: &UnitDescriptor) -> Result<TriangleMesh> {
        self(unit)
    }
}

/// How often, and how much coarser, rasterization is retried.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: usize,
    /// Factor applied to the voxel edge after a retryable failure.
    pub coarsen: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            coarsen: 2.0,
        }
    }
}

/// Settings of a batch run.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchConfig {
    pub voxel_policy: VoxelSizePolicy,
    pub retry: RetryPolicy,
    /// Allowed relative gap between a composite tank's declared volume and
    /// the sum of its parts' declared volumes.
    pub reconcile_tolerance: f64,
    /// Count wall voxels as interior.
    pub include_shell: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            voxel_policy: VoxelSizePolicy::default(),
            retry: RetryPolicy::default(),
            reconcile_tolerance: 0.001,
            include_shell: false,
        }
    }
}

/// A tank whose curve could not be produced.
#[derive(Debug)]
pub struct TankFailure {
    pub tank: TankId,
    pub name: String,
    pub error: TankfillError,
}

/// Result of a batch run: the curves that succeeded and the tanks that
/// failed.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub table: FillTable,
    pub failures: Vec<TankFailure>,
}

impl BatchReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Computes a fill curve for every tank of a catalog, one at a time.
///
/// Units shared between tanks are measured once through the [`UnitCache`]
/// passed to [`FillBatch::run`]. A tank that fails is reported and skipped;
/// the rest of the batch continues.
pub struct FillBatch<'a, S, R> {
    source: &'a S,
    rasterizer: &'a R,
    config: BatchConfig,
}

impl<'a, S: MeshSource, R: Rasterizer> FillBatch<'a, S, R> {
    /// Creates a new batch with default settings.
    #[must_use]
    pub fn new(source: &'a S, rasterizer: &'a R) -> Self {
        Self {
            source,
            rasterizer,
            config: BatchConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the batch over every tank in catalog order.
    pub fn run(&self, catalog: &TankCatalog, cache: &mut UnitCache) -> BatchReport {
        let pending = catalog
            .measured_units()
            .into_iter()
            .filter(|unit| !cache.contains(&unit.key()))
            .count();
        info!(tanks = catalog.len(), units_to_measure = pending, "batch started");

        let mut report = BatchReport::default();
        for (id, tank) in catalog.iter() {
            let name = tank.unit.label();
            match self.tank_curve(tank, cache) {
                Ok(curve) => {
                    info!(tank = %name, samples = curve.len(), volume = ?curve.last(), "tank done");
                    report.table.push(name, curve);
                }
                Err(err) => {
                    error!(tank = %name, error = %err, "tank failed");
                    report.failures.push(TankFailure {
                        tank: id,
                        name,
                        error: err,
                    });
                }
            }
        }
        info!(
            tanks = report.table.len(),
            failed = report.failures.len(),
            units = cache.len(),
            "batch finished"
        );
        report
    }

    /// Computes the curve of one tank, measuring its units as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is invalid or any unit fails.
    pub fn tank_curve(&self, tank: &TankDefinition, cache: &mut UnitCache) -> Result<FillCurve> {
        tank.validate(self.config.reconcile_tolerance)?;
        info!(tank = %tank.unit.label(), parts = tank.parts.len(), "computing fill curve");

        let curve = if tank.is_composite() {
            let mut part_curves = Vec::with_capacity(tank.parts.len());
            for part in &tank.parts {
                let curve = cache
                    .get_or_compute(part.unit.key(), || self.unit_curve(&part.unit))?
                    .clone();
                part_curves.push((curve, part.count));
            }
            part_curves
                .iter()
                .fold(ComposeCurves::new(), |compose, (curve, count)| {
                    compose.with_part(curve, *count)
                })
                .execute()?
        } else {
            cache
                .get_or_compute(tank.unit.key(), || self.unit_curve(&tank.unit))?
                .clone()
        };

        if tank.unit.scale_to_volume {
            ScaleToVolume::new(&curve, tank.unit.volume_l).execute()
        } else {
            Ok(curve)
        }
    }

    /// Measures one unit: mesh → shell grid → interior → curve.
    fn unit_curve(&self, unit: &UnitDescriptor) -> Result<FillCurve> {
        let label = unit.label();
        let raw = self.source.load(unit)?;
        let (mesh, prepared) = PrepareMesh::new(raw).execute()?;
        if prepared.removed_faces() > 0 || prepared.unreferenced_vertices > 0 {
            warn!(unit = %label, ?prepared, "mesh needed clean-up");
        }

        let bounds = mesh.bounds().ok_or(MeshError::NoUsableFaces)?;
        let edges = CheckEdges::new(&mesh).execute();
        info!(
            unit = %label,
            watertight = edges.is_watertight(),
            boundary_edges = edges.boundary_edges,
            non_manifold_edges = edges.non_manifold_edges,
            mesh_volume = MeshVolume::new(&mesh).execute(),
            extents = ?bounds.extents(),
            "loaded mesh"
        );

        let size = self.config.voxel_policy.select(&bounds);
        let shell = self.rasterize_with_retry(&mesh, size)?;
        drop(mesh);

        let filled = SolveInterior::new(shell)
            .include_shell(self.config.include_shell)
            .execute()?;
        let curve = ProfileHeight::new(&filled).execute();
        drop(filled);

        info!(unit = %label, layers = curve.len(), volume = ?curve.last(), "measured unit");
        if unit.scale_to_volume {
            ScaleToVolume::new(&curve, unit.volume_l).execute()
        } else {
            Ok(curve)
        }
    }

    fn rasterize_with_retry(&self, mesh: &TriangleMesh, size: VoxelSize) -> Result<VoxelGrid> {
        let RetryPolicy {
            max_attempts,
            coarsen,
        } = self.config.retry;
        let max_attempts = max_attempts.max(1);

        let mut size = size;
        let mut last_edge = size.edge;
        for attempt in 1..=max_attempts {
            last_edge = size.edge;
            debug!(attempt, edge = size.edge, unit = ?size.unit, "rasterizing");
            match self.rasterizer.rasterize(mesh, size) {
                Ok(grid) => return Ok(grid),
                Err(TankfillError::Rasterize(err)) if err.is_retryable() => {
                    warn!(attempt, edge = size.edge, error = %err, "rasterization failed, coarsening");
                    size = size.coarsened(coarsen);
                }
                Err(err) => return Err(err),
            }
        }
        Err(RasterizeError::RetriesExhausted {
            attempts: max_attempts,
            edge: last_edge,
        }
        .into())
    }
}
