mod compose;
mod interior;
mod profile;
mod rasterize;

pub use compose::{ComposeCurves, ScaleToVolume};
pub use interior::SolveInterior;
pub use profile::ProfileHeight;
pub use rasterize::{Rasterizer, SurfaceRasterizer, VoxelSize, VoxelSizePolicy};
