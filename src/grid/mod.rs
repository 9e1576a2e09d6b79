use crate::error::GridError;
use crate::math::{LengthUnit, Point3, TOLERANCE};

/// Integer voxel coordinates `[x, y, z]`; axis 2 is vertical.
pub type GridIndex = [usize; 3];

/// Dense, axis-aligned boolean voxel grid with a uniform cell edge.
///
/// Cells are stored layer by layer (`z` slowest), so one horizontal layer is
/// a contiguous slice. The dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    dims: [usize; 3],
    cell_size: f64,
    unit: LengthUnit,
    origin: Point3,
    data: Vec<bool>,
}

impl VoxelGrid {
    /// Creates a grid with every voxel set to `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero or the cell size is not a
    /// finite positive number.
    pub fn new(dims: [usize; 3], cell_size: f64, unit: LengthUnit) -> Result<Self, GridError> {
        Self::with_value(dims, cell_size, unit, false)
    }

    /// Creates a grid with every voxel set to `true`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`VoxelGrid::new`].
    pub fn filled(dims: [usize; 3], cell_size: f64, unit: LengthUnit) -> Result<Self, GridError> {
        Self::with_value(dims, cell_size, unit, true)
    }

    fn with_value(
        dims: [usize; 3],
        cell_size: f64,
        unit: LengthUnit,
        value: bool,
    ) -> Result<Self, GridError> {
        let [nx, ny, nz] = dims;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(GridError::EmptyDimensions { nx, ny, nz });
        }
        if !cell_size.is_finite() || cell_size < TOLERANCE {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        let len = nx
            .checked_mul(ny)
            .and_then(|area| area.checked_mul(nz))
            .ok_or(GridError::TooLarge { nx, ny, nz })?;
        Ok(Self {
            dims,
            cell_size,
            unit,
            origin: Point3::origin(),
            data: vec![value; len],
        })
    }

    /// Places the minimum corner of voxel `(0, 0, 0)` in mesh space.
    #[must_use]
    pub fn with_origin(mut self, origin: Point3) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Edge length of one cell, in [`VoxelGrid::unit`] units.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[must_use]
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    #[must_use]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Volume of one cell in liters.
    #[must_use]
    pub fn cell_volume_liters(&self) -> f64 {
        self.unit.cube_liters(self.cell_size)
    }

    /// Height of one layer in meters.
    #[must_use]
    pub fn layer_height_m(&self) -> f64 {
        self.cell_size * self.unit.meters()
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a grid has at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of `true` cells.
    #[must_use]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Index of the topmost horizontal layer.
    #[must_use]
    pub fn top_layer(&self) -> usize {
        self.dims[2] - 1
    }

    #[must_use]
    pub fn contains(&self, index: GridIndex) -> bool {
        index[0] < self.dims[0] && index[1] < self.dims[1] && index[2] < self.dims[2]
    }

    /// Returns the value of a voxel.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is outside the grid.
    pub fn get(&self, index: GridIndex) -> Result<bool, GridError> {
        let i = self.checked_linear(index)?;
        Ok(self.data[i])
    }

    /// Sets the value of a voxel.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is outside the grid.
    pub fn set(&mut self, index: GridIndex, value: bool) -> Result<(), GridError> {
        let i = self.checked_linear(index)?;
        self.data[i] = value;
        Ok(())
    }

    /// Returns the cells of horizontal layer `z`.
    ///
    /// # Errors
    ///
    /// Returns an error if `z` is not a layer of this grid.
    pub fn layer(&self, z: usize) -> Result<&[bool], GridError> {
        let range = self.layer_range(z)?;
        Ok(&self.data[range])
    }

    /// Number of `true` cells in horizontal layer `z`.
    ///
    /// # Errors
    ///
    /// Returns an error if `z` is not a layer of this grid.
    pub fn layer_count(&self, z: usize) -> Result<usize, GridError> {
        Ok(self.layer(z)?.iter().filter(|&&v| v).count())
    }

    /// Sets every cell of horizontal layer `z`.
    ///
    /// # Errors
    ///
    /// Returns an error if `z` is not a layer of this grid.
    pub fn set_layer(&mut self, z: usize, value: bool) -> Result<(), GridError> {
        let range = self.layer_range(z)?;
        self.data[range].fill(value);
        Ok(())
    }

    /// Returns `true` if both grids share dims, cell size and unit.
    #[must_use]
    pub fn is_comparable(&self, other: &Self) -> bool {
        self.dims == other.dims
            && self.unit == other.unit
            && (self.cell_size - other.cell_size).abs() < TOLERANCE
    }

    fn layer_range(&self, z: usize) -> Result<std::ops::Range<usize>, GridError> {
        if z >= self.dims[2] {
            return Err(GridError::OutOfBounds { x: 0, y: 0, z });
        }
        let area = self.dims[0] * self.dims[1];
        Ok(z * area..(z + 1) * area)
    }

    fn checked_linear(&self, index: GridIndex) -> Result<usize, GridError> {
        if !self.contains(index) {
            let [x, y, z] = index;
            return Err(GridError::OutOfBounds { x, y, z });
        }
        Ok(self.linear(index))
    }

    // --- Index arithmetic for the solver and rasterizer ---

    pub(crate) fn linear(&self, [x, y, z]: GridIndex) -> usize {
        (z * self.dims[1] + y) * self.dims[0] + x
    }

    pub(crate) fn coords(&self, linear: usize) -> GridIndex {
        let [nx, ny, _] = self.dims;
        [linear % nx, (linear / nx) % ny, linear / (nx * ny)]
    }

    /// Linear indices of the in-bounds 6-connected neighbours of a cell.
    ///
    /// The iterator does not borrow the grid, so cells can be updated while
    /// walking it.
    pub(crate) fn neighbors(&self, linear: usize) -> impl Iterator<Item = usize> {
        let [x, y, z] = self.coords(linear);
        let [nx, ny, nz] = self.dims;
        let stride_y = nx;
        let stride_z = nx * ny;
        [
            (z > 0).then(|| linear - stride_z),
            (z + 1 < nz).then(|| linear + stride_z),
            (y > 0).then(|| linear - stride_y),
            (y + 1 < ny).then(|| linear + stride_y),
            (x > 0).then(|| linear - 1),
            (x + 1 < nx).then(|| linear + 1),
        ]
        .into_iter()
        .flatten()
    }

    pub(crate) fn cells(&self) -> &[bool] {
        &self.data
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.data
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grid(dims: [usize; 3]) -> VoxelGrid {
        VoxelGrid::new(dims, 1.0, LengthUnit::Decimeter).unwrap()
    }

    #[test]
    fn rejects_zero_dimension() {
        let err = VoxelGrid::new([4, 0, 4], 1.0, LengthUnit::Decimeter).unwrap_err();
        assert!(matches!(err, GridError::EmptyDimensions { ny: 0, .. }));
    }

    #[test]
    fn rejects_bad_cell_size() {
        assert!(VoxelGrid::new([2, 2, 2], 0.0, LengthUnit::Meter).is_err());
        assert!(VoxelGrid::new([2, 2, 2], f64::NAN, LengthUnit::Meter).is_err());
    }

    #[test]
    fn rejects_overflowing_cell_count() {
        let err = VoxelGrid::new([usize::MAX / 2, 3, 1], 1.0, LengthUnit::Decimeter).unwrap_err();
        assert!(matches!(err, GridError::TooLarge { ny: 3, nz: 1, .. }));
        assert!(VoxelGrid::filled([usize::MAX, usize::MAX, 2], 1.0, LengthUnit::Meter).is_err());
    }

    #[test]
    fn get_and_set() {
        let mut g = grid([3, 4, 5]);
        g.set([2, 3, 4], true).unwrap();
        assert!(g.get([2, 3, 4]).unwrap());
        assert!(!g.get([0, 0, 0]).unwrap());
        assert_eq!(g.count(), 1);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut g = grid([3, 4, 5]);
        assert!(g.get([3, 0, 0]).is_err());
        assert!(g.set([0, 4, 0], true).is_err());
        assert!(g.layer(5).is_err());
    }

    #[test]
    fn layers_are_horizontal() {
        let mut g = grid([3, 4, 5]);
        g.set_layer(2, true).unwrap();
        assert_eq!(g.layer_count(2).unwrap(), 12);
        assert_eq!(g.layer_count(1).unwrap(), 0);
        assert!(g.get([1, 1, 2]).unwrap());
        assert_eq!(g.top_layer(), 4);
    }

    #[test]
    fn linear_and_coords_agree() {
        let g = grid([3, 4, 5]);
        for i in 0..g.len() {
            assert_eq!(g.linear(g.coords(i)), i);
        }
    }

    #[test]
    fn corner_has_three_neighbors() {
        let g = grid([3, 4, 5]);
        assert_eq!(g.neighbors(0).count(), 3);
        let center = g.linear([1, 1, 1]);
        assert_eq!(g.neighbors(center).count(), 6);
    }

    #[test]
    fn comparable_grids() {
        let a = grid([2, 2, 2]);
        let b = VoxelGrid::filled([2, 2, 2], 1.0, LengthUnit::Decimeter).unwrap();
        let c = VoxelGrid::new([2, 2, 2], 1.0, LengthUnit::Meter).unwrap();
        assert!(a.is_comparable(&b));
        assert!(!a.is_comparable(&c));
        assert_eq!(b.count(), 8);
    }
}
