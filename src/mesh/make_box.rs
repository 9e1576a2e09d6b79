use crate::error::{MeshError, Result};
use crate::math::{Point3, TOLERANCE};

use super::TriangleMesh;

/// Corner-bit triangulation of a unit cube, wound outward.
/// Vertex `i` sits at `(i & 1, (i >> 1) & 1, (i >> 2) & 1)`.
const BOTTOM: [[u32; 3]; 2] = [[0, 2, 3], [0, 3, 1]];
const TOP: [[u32; 3]; 2] = [[4, 5, 7], [4, 7, 6]];
const SIDES: [[u32; 3]; 8] = [
    [0, 1, 5],
    [0, 5, 4],
    [2, 6, 7],
    [2, 7, 3],
    [0, 4, 6],
    [0, 6, 2],
    [1, 3, 7],
    [1, 7, 5],
];

/// Creates an axis-aligned box tank mesh from two corner points.
pub struct MakeBoxMesh {
    min_corner: Point3,
    max_corner: Point3,
    open_top: bool,
}

impl MakeBoxMesh {
    /// Creates a new `MakeBoxMesh` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
            open_top: false,
        }
    }

    /// Leaves the top face out, like a tank shell exported without its lid.
    #[must_use]
    pub fn with_open_top(mut self, open_top: bool) -> Self {
        self.open_top = open_top;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the box is degenerate along any axis.
    pub fn execute(&self) -> Result<TriangleMesh> {
        let size = self.max_corner - self.min_corner;
        if size.iter().any(|&d| d < TOLERANCE) {
            return Err(
                MeshError::InvalidInput("box max corner must exceed min corner".into()).into(),
            );
        }

        let vertices = (0..8u32)
            .map(|i| {
                Point3::new(
                    self.min_corner.x + f64::from(i & 1) * size.x,
                    self.min_corner.y + f64::from((i >> 1) & 1) * size.y,
                    self.min_corner.z + f64::from((i >> 2) & 1) * size.z,
                )
            })
            .collect();

        let mut indices: Vec<[u32; 3]> = BOTTOM.iter().chain(SIDES.iter()).copied().collect();
        if !self.open_top {
            indices.extend_from_slice(&TOP);
        }

        Ok(TriangleMesh::new(vertices, indices))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn closed_box_has_12_triangles() {
        let mesh = MakeBoxMesh::new(Point3::origin(), Point3::new(1.0, 2.0, 3.0))
            .execute()
            .unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.bounds().unwrap().max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn open_top_drops_lid() {
        let mesh = MakeBoxMesh::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .with_open_top(true)
            .execute()
            .unwrap();
        assert_eq!(mesh.triangle_count(), 10);
    }

    #[test]
    fn flat_box_is_rejected() {
        let result = MakeBoxMesh::new(Point3::origin(), Point3::new(1.0, 1.0, 0.0)).execute();
        assert!(result.is_err());
    }
}
