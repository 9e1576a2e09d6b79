mod diagnostics;
mod make_box;
mod make_cylinder;
mod prepare;

pub use diagnostics::{CheckEdges, EdgeReport, MeshVolume};
pub use make_box::MakeBoxMesh;
pub use make_cylinder::MakeCylinderMesh;
pub use prepare::{PrepareMesh, PrepareReport};

use crate::math::{Point3, Vector3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Size of the box along each axis.
    #[must_use]
    pub fn extents(&self) -> Vector3 {
        self.max - self.min
    }
}

/// A triangle mesh describing a tank shell.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    #[must_use]
    pub fn new(vertices: Vec<Point3>, indices: Vec<[u32; 3]>) -> Self {
        Self { vertices, indices }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the corner points of triangle `i`, or `None` if it references
    /// a missing vertex.
    #[must_use]
    pub fn triangle(&self, i: usize) -> Option<[Point3; 3]> {
        let [a, b, c] = *self.indices.get(i)?;
        Some([
            *self.vertices.get(a as usize)?,
            *self.vertices.get(b as usize)?,
            *self.vertices.get(c as usize)?,
        ])
    }

    /// Bounding box over all vertices, or `None` for a mesh without vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.vertices.first()?;
        let (min, max) = self
            .vertices
            .iter()
            .fold((first, first), |(min, max), v| (min.inf(v), max.sup(v)));
        Some(Aabb { min, max })
    }

    /// Moves every vertex by `delta`.
    pub fn translate(&mut self, delta: &Vector3) {
        for v in &mut self.vertices {
            *v += delta;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mesh = TriangleMesh::new(
            vec![p(1.0, -2.0, 0.5), p(-1.0, 3.0, 0.0), p(0.0, 0.0, 4.0)],
            vec![[0, 1, 2]],
        );
        let b = mesh.bounds().unwrap();
        assert_eq!(b.min, p(-1.0, -2.0, 0.0));
        assert_eq!(b.max, p(1.0, 3.0, 4.0));
        assert_eq!(b.extents(), Vector3::new(2.0, 5.0, 4.0));
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(TriangleMesh::default().bounds().is_none());
    }

    #[test]
    fn triangle_with_missing_vertex() {
        let mesh = TriangleMesh::new(vec![p(0.0, 0.0, 0.0)], vec![[0, 0, 7]]);
        assert!(mesh.triangle(0).is_none());
        assert!(mesh.triangle(1).is_none());
    }
}
