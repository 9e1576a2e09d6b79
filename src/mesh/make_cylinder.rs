use std::f64::consts::TAU;

use crate::error::{MeshError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::TriangleMesh;

/// Creates an upright cylindrical tank mesh.
///
/// The axis is vertical; `base` is the center of the bottom disc.
pub struct MakeCylinderMesh {
    base: Point3,
    radius: f64,
    height: f64,
    segments: u32,
    open_top: bool,
}

impl MakeCylinderMesh {
    /// Creates a new `MakeCylinderMesh` operation with 64 segments.
    #[must_use]
    pub fn new(base: Point3, radius: f64, height: f64) -> Self {
        Self {
            base,
            radius,
            height,
            segments: 64,
            open_top: false,
        }
    }

    #[must_use]
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }

    /// Leaves the top disc out.
    #[must_use]
    pub fn with_open_top(mut self, open_top: bool) -> Self {
        self.open_top = open_top;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or height is near zero, or fewer than
    /// three segments are requested.
    pub fn execute(&self) -> Result<TriangleMesh> {
        if self.radius < TOLERANCE {
            return Err(
                MeshError::InvalidInput("cylinder radius must be positive".into()).into(),
            );
        }
        if self.height < TOLERANCE {
            return Err(
                MeshError::InvalidInput("cylinder height must be positive".into()).into(),
            );
        }
        if self.segments < 3 {
            return Err(
                MeshError::InvalidInput("cylinder needs at least 3 segments".into()).into(),
            );
        }

        let n = self.segments;
        let ring = |z: f64| {
            (0..n).map(move |i| {
                let angle = TAU * f64::from(i) / f64::from(n);
                Point3::new(
                    self.base.x + self.radius * angle.cos(),
                    self.base.y + self.radius * angle.sin(),
                    self.base.z + z,
                )
            })
        };

        // Bottom ring 0..n, top ring n..2n, then the cap centers.
        let mut vertices: Vec<Point3> = ring(0.0).chain(ring(self.height)).collect();
        let bottom_center = 2 * n;
        vertices.push(self.base);
        let top_center = 2 * n + 1;
        if !self.open_top {
            vertices.push(self.base + Vector3::z() * self.height);
        }

        let mut indices = Vec::new();
        for i in 0..n {
            let next = (i + 1) % n;
            let (b0, b1, t0, t1) = (i, next, n + i, n + next);
            indices.push([b0, b1, t1]);
            indices.push([b0, t1, t0]);
            indices.push([bottom_center, b1, b0]);
            if !self.open_top {
                indices.push([top_center, t0, t1]);
            }
        }

        Ok(TriangleMesh::new(vertices, indices))
    }
}
