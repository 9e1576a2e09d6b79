//! Fill-level curves for liquid storage tanks.
//!
//! A tank shell mesh is rasterized into a shell voxel grid, its interior is
//! found by flood-filling the exterior from a corner, and the interior is
//! integrated layer by layer into a volume-vs-height [`FillCurve`]. Curves of
//! measured units are combined into curves of composite tanks by
//! [`operations::ComposeCurves`], and [`batch::FillBatch`] runs the whole
//! pipeline over a [`catalog::TankCatalog`].

pub mod batch;
pub mod catalog;
pub mod curve;
pub mod error;
pub mod grid;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod output;

pub use curve::FillCurve;
pub use error::{Result, TankfillError};
pub use grid::VoxelGrid;
