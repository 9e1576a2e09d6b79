use std::collections::HashMap;

use super::TriangleMesh;

/// Computes the enclosed volume of a mesh, in cubic mesh units.
///
/// Uses the signed tetrahedron method: for each triangle, `v0 . (v1 x v2)`
/// summed and divided by six. Only meaningful for closed, consistently wound
/// meshes; tank meshes rarely are, so this is a diagnostic and never feeds
/// the fill curve.
pub struct MeshVolume<'a> {
    mesh: &'a TriangleMesh,
}

impl<'a> MeshVolume<'a> {
    /// Creates a new `MeshVolume` query.
    #[must_use]
    pub fn new(mesh: &'a TriangleMesh) -> Self {
        Self { mesh }
    }

    /// Executes the query, returning the absolute volume.
    #[must_use]
    pub fn execute(&self) -> f64 {
        let signed: f64 = (0..self.mesh.triangle_count())
            .filter_map(|i| self.mesh.triangle(i))
            .map(|[v0, v1, v2]| v0.coords.dot(&v1.coords.cross(&v2.coords)))
            .sum();
        signed.abs() / 6.0
    }
}

/// Edge statistics of a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeReport {
    /// Distinct undirected edges.
    pub edges: usize,
    /// Edges used by exactly one face (holes, open rims).
    pub boundary_edges: usize,
    /// Edges shared by more than two faces.
    pub non_manifold_edges: usize,
}

impl EdgeReport {
    /// Every edge is shared by exactly two faces.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edges > 0 && self.boundary_edges == 0 && self.non_manifold_edges == 0
    }
}

/// Counts boundary and non-manifold edges of a mesh.
pub struct CheckEdges<'a> {
    mesh: &'a TriangleMesh,
}

impl<'a> CheckEdges<'a> {
    /// Creates a new `CheckEdges` query.
    #[must_use]
    pub fn new(mesh: &'a TriangleMesh) -> Self {
        Self { mesh }
    }

    /// Executes the query.
    #[must_use]
    pub fn execute(&self) -> EdgeReport {
        let mut edge_count: HashMap<(u32, u32), usize> = HashMap::new();
        for tri in &self.mesh.indices {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                *edge_count.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }

        EdgeReport {
            edges: edge_count.len(),
            boundary_edges: edge_count.values().filter(|&&n| n == 1).count(),
            non_manifold_edges: edge_count.values().filter(|&&n| n > 2).count(),
        }
    }
}
