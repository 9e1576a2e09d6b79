use crate::curve::FillCurve;
use crate::grid::VoxelGrid;

/// Absorbs representation error of decimal cell sizes before truncating.
const LITER_EPSILON: f64 = 1e-9;

/// Integrates a filled grid layer by layer into a fill curve.
///
/// Sample `z` is the cumulative interior volume of layers `0..=z` in whole
/// liters (truncated). The curve has one sample per layer and its step is
/// the layer height.
pub struct ProfileHeight<'a> {
    grid: &'a VoxelGrid,
}

impl<'a> ProfileHeight<'a> {
    /// Creates a new `ProfileHeight` operation.
    #[must_use]
    pub fn new(grid: &'a VoxelGrid) -> Self {
        Self { grid }
    }

    /// Executes the integration.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn execute(&self) -> FillCurve {
        let [nx, ny, _] = self.grid.dims();
        let cell_liters = self.grid.cell_volume_liters();

        let mut cumulative = 0u64;
        let samples = self
            .grid
            .cells()
            .chunks_exact(nx * ny)
            .map(|layer| {
                cumulative += layer.iter().filter(|&&v| v).count() as u64;
                (cumulative as f64 * cell_liters + LITER_EPSILON).floor() as u64
            })
            .collect();

        FillCurve::with_step(samples, self.grid.layer_height_m())
    }
}
