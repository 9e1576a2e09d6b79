use tracing::debug;

use crate::error::{RasterizeError, Result};
use crate::grid::VoxelGrid;
use crate::math::intersect_3d::triangle_box_overlap;
use crate::math::{LengthUnit, Point3, Vector3};
use crate::mesh::{Aabb, TriangleMesh};

/// Edge length of a voxel together with the unit the mesh is modelled in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelSize {
    /// Cell edge in mesh units.
    pub edge: f64,
    /// Unit of the mesh coordinates.
    pub unit: LengthUnit,
}

impl VoxelSize {
    #[must_use]
    pub fn new(edge: f64, unit: LengthUnit) -> Self {
        Self { edge, unit }
    }

    /// The same unit with the edge multiplied by `factor`.
    #[must_use]
    pub fn coarsened(self, factor: f64) -> Self {
        Self {
            edge: self.edge * factor,
            unit: self.unit,
        }
    }
}

/// Picks a voxel size from the extents of a mesh.
///
/// Tank exports come in meters, decimeters or millimeters and the unit is
/// not recorded in the file, so it is guessed from the extents. Every default
/// choice yields one-centimeter voxels.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelSizePolicy {
    /// Any extent below this means the mesh is in [`VoxelSizePolicy::fine`] units.
    pub fine_below: f64,
    /// Any extent above this means the mesh is in [`VoxelSizePolicy::coarse`] units.
    pub coarse_above: f64,
    pub fine: VoxelSize,
    pub default: VoxelSize,
    pub coarse: VoxelSize,
}

impl Default for VoxelSizePolicy {
    fn default() -> Self {
        Self {
            fine_below: 10.0,
            coarse_above: 1000.0,
            fine: VoxelSize::new(0.01, LengthUnit::Meter),
            default: VoxelSize::new(0.1, LengthUnit::Decimeter),
            coarse: VoxelSize::new(10.0, LengthUnit::Millimeter),
        }
    }
}

impl VoxelSizePolicy {
    /// Chooses the voxel size for a mesh with the given bounds.
    ///
    /// A small extent wins over a large one.
    #[must_use]
    pub fn select(&self, bounds: &Aabb) -> VoxelSize {
        let extents = bounds.extents();
        if extents.iter().any(|&e| e < self.fine_below) {
            self.fine
        } else if extents.iter().any(|&e| e > self.coarse_above) {
            self.coarse
        } else {
            self.default
        }
    }
}

/// Turns a triangle mesh into a shell grid.
///
/// Implementations must mark a 6-connected-complete shell: no single-voxel
/// gap may let a flood fill pass through a wall. Cell `(0, 0, 0)` must be
/// outside the shape and the topmost layer must be the mesh's top.
pub trait Rasterizer {
    /// Rasterizes `mesh` with cells of the given size.
    ///
    /// # Errors
    ///
    /// Returns a [`RasterizeError`]; retryable ones may succeed at a coarser
    /// size.
    fn rasterize(&self, mesh: &TriangleMesh, size: VoxelSize) -> Result<VoxelGrid>;
}

/// Marks every voxel a triangle touches, using an exact triangle/box test.
///
/// The grid is padded with `margin` empty cells on both sides along x and y
/// and below the mesh, but not above it: the top layer is the layer holding
/// the mesh's highest point, so closing it seals an open tank.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceRasterizer {
    margin: usize,
    max_cells: usize,
}

impl Default for SurfaceRasterizer {
    fn default() -> Self {
        Self {
            margin: 2,
            max_cells: 256 * 1024 * 1024,
        }
    }
}

impl SurfaceRasterizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of empty cells around the mesh.
    #[must_use]
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the largest grid, in cells, the rasterizer may allocate.
    #[must_use]
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    fn check_mesh(mesh: &TriangleMesh) -> Result<Aabb> {
        if mesh.indices.is_empty() {
            return Err(RasterizeError::EmptyMesh.into());
        }
        for (triangle, tri) in mesh.indices.iter().enumerate() {
            if let Some(&vertex) = tri.iter().find(|&&v| v as usize >= mesh.vertices.len()) {
                return Err(RasterizeError::IndexOutOfRange { triangle, vertex }.into());
            }
        }
        if mesh
            .vertices
            .iter()
            .any(|v| !v.coords.iter().all(|c| c.is_finite()))
        {
            return Err(RasterizeError::NonFinite.into());
        }
        mesh.bounds().ok_or_else(|| RasterizeError::EmptyMesh.into())
    }
}

impl Rasterizer for SurfaceRasterizer {
    fn rasterize(&self, mesh: &TriangleMesh, size: VoxelSize) -> Result<VoxelGrid> {
        let bounds = Self::check_mesh(mesh)?;
        let h = size.edge;
        let m = self.margin;

        let extents = bounds.extents();
        // saturating: an absurd extent/edge ratio must end up over budget
        let span = |axis: usize| cell_of(extents[axis], h).saturating_add(1);
        let pad = m.saturating_mul(2);
        let dims = [
            span(0).saturating_add(pad),
            span(1).saturating_add(pad),
            span(2).saturating_add(m),
        ];

        let cells = dims.iter().map(|&d| d as u128).product::<u128>();
        if cells > self.max_cells as u128 {
            return Err(RasterizeError::CellBudgetExceeded {
                cells,
                budget: self.max_cells,
            }
            .into());
        }

        #[allow(clippy::cast_precision_loss)]
        let origin = bounds.min - Vector3::repeat(m as f64 * h);
        let mut grid = VoxelGrid::new(dims, h, size.unit)?.with_origin(origin);
        let half = Vector3::repeat(h / 2.0);

        for i in 0..mesh.triangle_count() {
            let Some(tri) = mesh.triangle(i) else {
                continue;
            };
            let lo = tri[0].inf(&tri[1]).inf(&tri[2]) - origin;
            let hi = tri[0].sup(&tri[1]).sup(&tri[2]) - origin;
            let range = |axis: usize| {
                let first = cell_of(lo[axis], h).saturating_sub(1);
                let last = cell_of(hi[axis], h).saturating_add(1).min(dims[axis] - 1);
                first..=last
            };

            for z in range(2) {
                for y in range(1) {
                    for x in range(0) {
                        #[allow(clippy::cast_precision_loss)]
                        let center = Point3::new(
                            origin.x + (x as f64 + 0.5) * h,
                            origin.y + (y as f64 + 0.5) * h,
                            origin.z + (z as f64 + 0.5) * h,
                        );
                        if triangle_box_overlap(&center, &half, &tri) {
                            let cell = grid.linear([x, y, z]);
                            grid.cells_mut()[cell] = true;
                        }
                    }
                }
            }
        }

        debug!(
            dims = ?dims,
            edge = h,
            shell = grid.count(),
            "rasterized mesh"
        );
        Ok(grid)
    }
}

/// Index of the cell holding offset `v` from the grid origin.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_of(v: f64, h: f64) -> usize {
    (v / h).floor().max(0.0) as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TankfillError;
    use crate::mesh::MakeBoxMesh;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn dm() -> VoxelSize {
        VoxelSize::new(1.0, LengthUnit::Decimeter)
    }

    fn cube(side: f64, open_top: bool) -> TriangleMesh {
        MakeBoxMesh::new(p(0.0, 0.0, 0.0), p(side, side, side))
            .with_open_top(open_top)
            .execute()
            .unwrap()
    }

    #[test]
    fn policy_picks_unit_from_extents() {
        let policy = VoxelSizePolicy::default();
        let aabb = |x: f64, y: f64, z: f64| Aabb {
            min: Point3::origin(),
            max: p(x, y, z),
        };
        assert_eq!(policy.select(&aabb(1.2, 2.0, 1.5)).unit, LengthUnit::Meter);
        assert_eq!(policy.select(&aabb(12.0, 20.0, 15.0)).unit, LengthUnit::Decimeter);
        assert_eq!(policy.select(&aabb(1200.0, 2000.0, 1500.0)).unit, LengthUnit::Millimeter);
        // a thin dimension wins over a long one
        assert_eq!(policy.select(&aabb(5.0, 2000.0, 15.0)).unit, LengthUnit::Meter);
    }

    #[test]
    fn grid_has_margin_below_and_around() {
        let grid = SurfaceRasterizer::new()
            .with_margin(2)
            .rasterize(&cube(10.0, false), dm())
            .unwrap();
        // 10 dm spans cells 0..=10 of the mesh, plus margins
        assert_eq!(grid.dims(), [15, 15, 13]);
        assert!(!grid.get([0, 0, 0]).unwrap());
        // the cell diagonal to the mesh corner touches it
        assert!(grid.get([1, 1, 1]).unwrap());
        assert!(grid.layer_count(grid.top_layer()).unwrap() > 0);
        assert_eq!(grid.origin(), p(-2.0, -2.0, -2.0));
    }

    #[test]
    fn walls_are_marked_on_both_sides_of_a_cell_boundary() {
        let grid = SurfaceRasterizer::new()
            .with_margin(2)
            .rasterize(&cube(10.0, false), dm())
            .unwrap();
        // the x = 0 wall lies on the boundary between cells 1 and 2
        assert!(grid.get([1, 6, 6]).unwrap());
        assert!(grid.get([2, 6, 6]).unwrap());
        assert!(!grid.get([3, 6, 6]).unwrap());
        assert!(!grid.get([0, 6, 6]).unwrap());
    }

    #[test]
    fn budget_exceeded_is_retryable() {
        let err = SurfaceRasterizer::new()
            .with_max_cells(100)
            .rasterize(&cube(10.0, false), dm())
            .unwrap_err();
        match err {
            TankfillError::Rasterize(e) => assert!(e.is_retryable()),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let err = SurfaceRasterizer::new()
            .rasterize(&TriangleMesh::default(), dm())
            .unwrap_err();
        assert!(matches!(err, TankfillError::Rasterize(RasterizeError::EmptyMesh)));
    }

    #[test]
    fn dangling_index_is_rejected() {
        let mesh = TriangleMesh::new(vec![p(0.0, 0.0, 0.0)], vec![[0, 0, 3]]);
        let err = SurfaceRasterizer::new().rasterize(&mesh, dm()).unwrap_err();
        assert!(matches!(
            err,
            TankfillError::Rasterize(RasterizeError::IndexOutOfRange { triangle: 0, vertex: 3 })
        ));
    }
}
