use super::{Point3, Vector3};

/// Tests whether a triangle overlaps an axis-aligned box.
///
/// Separating axis test over the 13 candidate axes: the three box normals,
/// the triangle normal and the nine cross products of box axes with triangle
/// edges. Touching counts as overlap, so a surface lying exactly on a cell
/// boundary marks the cells on both sides.
#[must_use]
pub fn triangle_box_overlap(center: &Point3, half: &Vector3, tri: &[Point3; 3]) -> bool {
    let v0 = tri[0] - center;
    let v1 = tri[1] - center;
    let v2 = tri[2] - center;

    // Box normals
    for axis in 0..3 {
        let min = v0[axis].min(v1[axis]).min(v2[axis]);
        let max = v0[axis].max(v1[axis]).max(v2[axis]);
        if min > half[axis] || max < -half[axis] {
            return false;
        }
    }

    let e0 = v1 - v0;
    let e1 = v2 - v1;
    let e2 = v0 - v2;

    // Box axes crossed with triangle edges
    let units = [Vector3::x(), Vector3::y(), Vector3::z()];
    for unit in &units {
        for edge in [&e0, &e1, &e2] {
            let axis = unit.cross(edge);
            if separated_on(&axis, &[v0, v1, v2], half) {
                return false;
            }
        }
    }

    // Triangle plane
    let normal = e0.cross(&e1);
    let distance = normal.dot(&v0);
    let radius = half.x * normal.x.abs() + half.y * normal.y.abs() + half.z * normal.z.abs();
    distance.abs() <= radius
}

fn separated_on(axis: &Vector3, verts: &[Vector3; 3], half: &Vector3) -> bool {
    let p0 = axis.dot(&verts[0]);
    let p1 = axis.dot(&verts[1]);
    let p2 = axis.dot(&verts[2]);
    let radius = half.x * axis.x.abs() + half.y * axis.y.abs() + half.z * axis.z.abs();
    p0.min(p1).min(p2) > radius || p0.max(p1).max(p2) < -radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn unit_half() -> Vector3 {
        Vector3::repeat(0.5)
    }

    #[test]
    fn triangle_through_box() {
        let tri = [p(-2.0, -2.0, 0.1), p(2.0, -2.0, 0.1), p(0.0, 2.0, 0.1)];
        assert!(triangle_box_overlap(&p(0.0, 0.0, 0.0), &unit_half(), &tri));
    }

    #[test]
    fn triangle_above_box() {
        let tri = [p(-2.0, -2.0, 0.6), p(2.0, -2.0, 0.6), p(0.0, 2.0, 0.6)];
        assert!(!triangle_box_overlap(&p(0.0, 0.0, 0.0), &unit_half(), &tri));
    }

    #[test]
    fn triangle_on_box_face_touches() {
        let tri = [p(-2.0, -2.0, 0.5), p(2.0, -2.0, 0.5), p(0.0, 2.0, 0.5)];
        assert!(triangle_box_overlap(&p(0.0, 0.0, 0.0), &unit_half(), &tri));
    }

    #[test]
    fn slanted_triangle_misses_corner() {
        // Plane x + y + z = 2 passes outside the corner at (0.5, 0.5, 0.5).
        let tri = [p(2.0, 0.0, 0.0), p(0.0, 2.0, 0.0), p(0.0, 0.0, 2.0)];
        assert!(!triangle_box_overlap(&p(0.0, 0.0, 0.0), &unit_half(), &tri));
    }

    #[test]
    fn edge_axis_separates() {
        // Overlaps on every box normal; only the z x edge axis separates.
        let tri = [p(1.4, 0.0, -1.0), p(0.0, 1.4, -1.0), p(1.4, 1.4, 1.0)];
        assert!(!triangle_box_overlap(&p(0.0, 0.0, 0.0), &unit_half(), &tri));
    }
}
