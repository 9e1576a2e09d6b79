use std::collections::HashSet;

use crate::error::{MeshError, Result};

use super::TriangleMesh;

/// What [`PrepareMesh`] removed from a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareReport {
    /// Faces pointing at vertices that do not exist.
    pub invalid_faces: usize,
    /// Faces using the same vertex twice.
    pub degenerate_faces: usize,
    /// Faces touching a NaN or infinite vertex.
    pub non_finite_faces: usize,
    /// Faces repeating an earlier face, in any winding.
    pub duplicate_faces: usize,
    /// Vertices no remaining face refers to.
    pub unreferenced_vertices: usize,
}

impl PrepareReport {
    #[must_use]
    pub fn removed_faces(&self) -> usize {
        self.invalid_faces + self.degenerate_faces + self.non_finite_faces + self.duplicate_faces
    }
}

/// Cleans a raw mesh before rasterization.
///
/// Drops invalid, degenerate, non-finite and duplicate faces, compacts the
/// vertex buffer and, unless disabled, moves the mesh so its minimum bound
/// sits at the origin. Hole filling and winding repair are not done here.
pub struct PrepareMesh {
    mesh: TriangleMesh,
    rezero: bool,
}

impl PrepareMesh {
    /// Creates a new `PrepareMesh` operation.
    #[must_use]
    pub fn new(mesh: TriangleMesh) -> Self {
        Self { mesh, rezero: true }
    }

    /// Keeps the mesh where it is instead of moving it to the origin.
    #[must_use]
    pub fn with_rezero(mut self, rezero: bool) -> Self {
        self.rezero = rezero;
        self
    }

    /// Executes the clean-up.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NoUsableFaces`] if no usable face remains.
    pub fn execute(self) -> Result<(TriangleMesh, PrepareReport)> {
        let TriangleMesh { vertices, indices } = self.mesh;
        let mut report = PrepareReport::default();

        let mut seen: HashSet<[u32; 3]> = HashSet::new();
        let mut kept: Vec<[u32; 3]> = Vec::with_capacity(indices.len());
        for tri in indices {
            let Some(points) = tri
                .iter()
                .map(|&i| vertices.get(i as usize))
                .collect::<Option<Vec<_>>>()
            else {
                report.invalid_faces += 1;
                continue;
            };
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                report.degenerate_faces += 1;
                continue;
            }
            if points.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
                report.non_finite_faces += 1;
                continue;
            }
            let mut key = tri;
            key.sort_unstable();
            if !seen.insert(key) {
                report.duplicate_faces += 1;
                continue;
            }
            kept.push(tri);
        }

        if kept.is_empty() {
            return Err(MeshError::NoUsableFaces.into());
        }

        // Compact the vertex buffer to the vertices still in use.
        let mut remap: Vec<Option<u32>> = vec![None; vertices.len()];
        let mut compacted = Vec::new();
        for tri in &mut kept {
            for index in tri.iter_mut() {
                let slot = &mut remap[*index as usize];
                let new_index = match *slot {
                    Some(n) => n,
                    None => {
                        #[allow(clippy::cast_possible_truncation)]
                        let n = compacted.len() as u32;
                        compacted.push(vertices[*index as usize]);
                        *slot = Some(n);
                        n
                    }
                };
                *index = new_index;
            }
        }
        report.unreferenced_vertices = vertices.len() - compacted.len();

        let mut mesh = TriangleMesh::new(compacted, kept);
        if self.rezero {
            if let Some(bounds) = mesh.bounds() {
                mesh.translate(&(-bounds.min.coords));
            }
        }

        Ok((mesh, report))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn quad() -> Vec<Point3> {
        vec![
            p(1.0, 1.0, 1.0),
            p(2.0, 1.0, 1.0),
            p(2.0, 2.0, 1.0),
            p(1.0, 2.0, 1.0),
        ]
    }

    #[test]
    fn clean_mesh_is_only_rezeroed() {
        let mesh = TriangleMesh::new(quad(), vec![[0, 1, 2], [0, 2, 3]]);
        let (out, report) = PrepareMesh::new(mesh).execute().unwrap();
        assert_eq!(report, PrepareReport::default());
        assert_eq!(out.triangle_count(), 2);
        assert_eq!(out.bounds().unwrap().min, Point3::origin());
    }

    #[test]
    fn removes_duplicates_in_any_winding() {
        let mesh = TriangleMesh::new(quad(), vec![[0, 1, 2], [2, 1, 0], [1, 2, 0], [0, 2, 3]]);
        let (out, report) = PrepareMesh::new(mesh).execute().unwrap();
        assert_eq!(report.duplicate_faces, 2);
        assert_eq!(out.triangle_count(), 2);
    }

    #[test]
    fn removes_bad_faces_and_orphans() {
        let mut vertices = quad();
        vertices.push(p(f64::NAN, 0.0, 0.0));
        vertices.push(p(9.0, 9.0, 9.0));
        let mesh = TriangleMesh::new(
            vertices,
            vec![[0, 1, 2], [0, 0, 3], [0, 1, 4], [0, 1, 42]],
        );
        let (out, report) = PrepareMesh::new(mesh).with_rezero(false).execute().unwrap();
        assert_eq!(report.degenerate_faces, 1);
        assert_eq!(report.non_finite_faces, 1);
        assert_eq!(report.invalid_faces, 1);
        assert_eq!(report.removed_faces(), 3);
        // vertex 3, the NaN vertex and the far vertex are gone
        assert_eq!(report.unreferenced_vertices, 3);
        assert_eq!(out.vertices.len(), 3);
        assert_eq!(out.indices, vec![[0, 1, 2]]);
        assert_eq!(out.vertices[0], p(1.0, 1.0, 1.0));
    }

    #[test]
    fn nothing_left_is_an_error() {
        let mesh = TriangleMesh::new(quad(), vec![[0, 0, 0]]);
        assert!(PrepareMesh::new(mesh).execute().is_err());
    }
}
