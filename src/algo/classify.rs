//! Inside/outside classification of the cell corner.
//!
//! When no contour crosses a periodic boundary, the cap is either empty or
//! covers the whole face of the cell, depending on whether the cell corner
//! (the origin in reduced coordinates) lies inside the solid region.
//!
//! Both tests find the surface feature closest to the corner and compare the
//! direction to it with the feature's angle-weighted pseudo-normal:
//!
//! > J. Andreas Baerentzen and Henrik Aanaes, *Signed Distance Computation
//! > Using the Angle Weighted Pseudonormal*, IEEE Transactions on
//! > Visualization and Computer Graphics 11 (2005), p. 243.
//!
//! Degenerate features (zero-length edges, zero-area faces) never count as
//! closest, so the tests are total over all inputs.

use nalgebra::{Point3, Vector2, Vector3};

use crate::cell::minimum_image;
use crate::mesh::{HalfEdgeId, HalfEdgeMesh, VertexId};

use super::contour::Contour;

const EPSILON: f64 = 1e-12;

/// Whether the 2D corner `(0,0)` is enclosed by a set of closed contours.
///
/// Contours enclose the solid region counter-clockwise. With no contour
/// points at all the corner is reported inside.
pub fn is_corner_inside_2d_region(contours: &[Contour]) -> bool {
    let mut inside = true;
    let mut closest_dist_sq = f64::MAX;

    for contour in contours {
        let n = contour.len();
        for i in 0..n {
            let v0 = contour[(i + 2 * n - 2) % n];
            let v1 = contour[(i + n - 1) % n];
            let v2 = contour[i];

            let r = v1.coords;
            let dist_sq = r.norm_squared();
            if dist_sq < closest_dist_sq {
                closest_dist_sq = dist_sq;
                let dir = v2 - v0;
                inside = Vector2::new(dir.y, -dir.x).dot(&r) > 0.0;
            }

            let dir = v2 - v1;
            let length = dir.norm();
            if length <= EPSILON {
                continue;
            }
            let dir = dir / length;
            let d = -dir.dot(&r);
            if d <= 0.0 || d >= length {
                continue;
            }
            let c = r + dir * d;
            let dist_sq = c.norm_squared();
            if dist_sq < closest_dist_sq {
                closest_dist_sq = dist_sq;
                inside = Vector2::new(dir.y, -dir.x).dot(&c) > 0.0;
            }
        }
    }

    inside
}

/// Whether the 3D corner `(0,0,0)` lies inside the solid bounded by `mesh`.
///
/// `reduced_pos` holds the vertex positions in reduced coordinates. All
/// vectors are reduced to their minimum image along periodic axes. A mesh
/// without vertices resolves to `is_completely_solid`.
pub fn is_corner_inside_3d_region(
    mesh: &HalfEdgeMesh,
    reduced_pos: &[Point3<f64>],
    pbc: [bool; 3],
    is_completely_solid: bool,
) -> bool {
    if mesh.num_vertices() == 0 {
        return is_completely_solid;
    }

    let wrap = |mut v: Vector3<f64>| {
        for k in 0..3 {
            if pbc[k] {
                v[k] = minimum_image(v[k]);
            }
        }
        v
    };
    let pos = |v: VertexId| reduced_pos[v.index()];

    let mut closest_dist_sq = f64::MAX;
    let mut closest_vertex: Option<VertexId> = None;
    let mut closest_vector = Vector3::zeros();
    let mut closest_normal = Vector3::zeros();

    // Vertices.
    for v in mesh.vertex_ids() {
        let r = wrap(pos(v).coords);
        let dist_sq = r.norm_squared();
        if dist_sq < closest_dist_sq {
            closest_dist_sq = dist_sq;
            closest_vertex = Some(v);
            closest_vector = r;
        }
    }

    // Edge interiors.
    for e in mesh.halfedge_ids() {
        let p1 = pos(mesh.vertex1(e));
        let r = wrap(p1.coords);
        let dir = wrap(pos(mesh.vertex2(e)) - p1);
        let length = dir.norm();
        if length <= EPSILON {
            continue;
        }
        let dir = dir / length;
        let d = -dir.dot(&r);
        if d <= 0.0 || d >= length {
            continue;
        }
        let c = r + dir * d;
        let dist_sq = c.norm_squared();
        if dist_sq < closest_dist_sq {
            closest_dist_sq = dist_sq;
            closest_vertex = None;
            closest_vector = c;
            closest_normal = edge_pseudo_normal(mesh, e, &dir, &p1, reduced_pos, &wrap);
        }
    }

    // Face interiors, using the first triangle of each face.
    for f in mesh.face_ids() {
        let e1 = mesh.first_face_edge(f);
        let e2 = mesh.next_face_edge(e1);
        let p1 = pos(mesh.vertex1(e1));
        let p2 = pos(mesh.vertex2(e1));
        let p3 = pos(mesh.vertex2(e2));

        let r = wrap(p1.coords);
        let a = wrap(p2 - p1);
        let b = wrap(p3 - p2);
        let edges = [a, b, -a - b];
        let normal = a.cross(&b);

        let mut corner = r;
        let mut inside_triangle = true;
        for edge in &edges {
            if corner.dot(&normal.cross(edge)) >= 0.0 {
                inside_triangle = false;
                break;
            }
            corner += edge;
        }
        if !inside_triangle {
            continue;
        }

        let length_sq = normal.norm_squared();
        if length_sq <= EPSILON * EPSILON {
            continue;
        }
        let normal = normal / length_sq.sqrt();
        let plane_dist = normal.dot(&r);
        if plane_dist * plane_dist < closest_dist_sq {
            closest_dist_sq = plane_dist * plane_dist;
            closest_vertex = None;
            closest_vector = normal * plane_dist;
            closest_normal = normal;
        }
    }

    if let Some(v) = closest_vertex {
        closest_normal = vertex_pseudo_normal(mesh, v, reduced_pos, &wrap);
    }

    closest_normal.dot(&closest_vector) > 0.0
}

/// Sum of the unit normals of the two faces adjacent to edge `e`.
///
/// On an open boundary only the face of `e` contributes.
fn edge_pseudo_normal(
    mesh: &HalfEdgeMesh,
    e: HalfEdgeId,
    dir: &Vector3<f64>,
    p1: &Point3<f64>,
    reduced_pos: &[Point3<f64>],
    wrap: &impl Fn(Vector3<f64>) -> Vector3<f64>,
) -> Vector3<f64> {
    let unit = |v: Vector3<f64>| v.try_normalize(EPSILON).unwrap_or_else(Vector3::zeros);

    let e1 = wrap(reduced_pos[mesh.vertex2(mesh.next_face_edge(e)).index()] - p1);
    let mut normal = unit(dir.cross(&e1));

    let opposite = mesh.opposite(e);
    if opposite.is_valid() {
        let e2 = wrap(reduced_pos[mesh.vertex2(mesh.next_face_edge(opposite)).index()] - p1);
        normal += unit(e2.cross(dir));
    }
    normal
}

/// Angle-weighted sum of the face normals around vertex `v`.
fn vertex_pseudo_normal(
    mesh: &HalfEdgeMesh,
    v: VertexId,
    reduced_pos: &[Point3<f64>],
    wrap: &impl Fn(Vector3<f64>) -> Vector3<f64>,
) -> Vector3<f64> {
    let first = mesh.first_vertex_edge(v);
    if !first.is_valid() {
        return Vector3::zeros();
    }

    let center = reduced_pos[v.index()];
    let spoke = |e: HalfEdgeId| {
        wrap(reduced_pos[mesh.vertex2(e).index()] - center)
            .try_normalize(EPSILON)
            .unwrap_or_else(Vector3::zeros)
    };

    let mut normal = Vector3::zeros();
    let mut edge = first;
    let mut edge1v = spoke(edge);
    for _ in 0..mesh.vertex_edge_count(v) {
        let opposite = mesh.opposite(edge);
        if !opposite.is_valid() {
            break;
        }
        let next = mesh.next_face_edge(opposite);
        debug_assert_eq!(mesh.vertex1(next), v);

        let edge2v = spoke(next);
        let angle = edge1v.dot(&edge2v).clamp(-1.0, 1.0).acos();
        if let Some(n) = edge2v.cross(&edge1v).try_normalize(EPSILON) {
            normal += n * angle;
        }

        edge = next;
        edge1v = edge2v;
        if edge == first {
            break;
        }
    }
    normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::cube;
    use crate::cell::wrap_floor;
    use nalgebra::Point2;

    fn reduced(mesh: &HalfEdgeMesh) -> Vec<Point3<f64>> {
        mesh.vertex_ids()
            .map(|v| mesh.position(v).map(wrap_floor))
            .collect()
    }

    fn square(lo: f64, hi: f64, ccw: bool) -> Contour {
        let mut c = vec![
            Point2::new(lo, lo),
            Point2::new(hi, lo),
            Point2::new(hi, hi),
            Point2::new(lo, hi),
        ];
        if !ccw {
            c.reverse();
        }
        c
    }

    #[test]
    fn test_2d_solid_island() {
        assert!(!is_corner_inside_2d_region(&[square(0.2, 0.8, true)]));
    }

    #[test]
    fn test_2d_hole() {
        assert!(is_corner_inside_2d_region(&[square(0.2, 0.8, false)]));
    }

    #[test]
    fn test_2d_edge_is_closest() {
        // Solid band 0.1 < y < 0.3 across most of the square; the closest
        // feature to the corner is its lower edge.
        let band = vec![
            Point2::new(-0.5, 0.1),
            Point2::new(0.5, 0.1),
            Point2::new(0.5, 0.3),
            Point2::new(-0.5, 0.3),
        ];
        assert!(!is_corner_inside_2d_region(&[band.clone()]));

        let around = vec![
            Point2::new(-0.5, -0.1),
            Point2::new(0.5, -0.1),
            Point2::new(0.5, 0.3),
            Point2::new(-0.5, 0.3),
        ];
        assert!(is_corner_inside_2d_region(&[around]));
    }

    #[test]
    fn test_3d_empty_mesh() {
        let mesh = HalfEdgeMesh::new();
        assert!(is_corner_inside_3d_region(&mesh, &[], [true; 3], true));
        assert!(!is_corner_inside_3d_region(&mesh, &[], [true; 3], false));
    }

    #[test]
    fn test_3d_corner_enclosed() {
        // Box around the corner; the closest feature is the -x face.
        let mesh = cube(Point3::new(-0.03, -0.04, -0.05), 0.1, false);
        let pos = reduced(&mesh);
        assert!(is_corner_inside_3d_region(&mesh, &pos, [true; 3], false));

        let cavity = cube(Point3::new(-0.03, -0.04, -0.05), 0.1, true);
        assert!(!is_corner_inside_3d_region(&cavity, &reduced(&cavity), [true; 3], true));
    }

    #[test]
    fn test_3d_corner_outside() {
        // Box in the middle of the cell; closest features are its corners.
        let mesh = cube(Point3::new(0.4, 0.4, 0.4), 0.2, false);
        let pos = reduced(&mesh);
        assert!(!is_corner_inside_3d_region(&mesh, &pos, [true; 3], true));

        let cavity = cube(Point3::new(0.4, 0.4, 0.4), 0.2, true);
        assert!(is_corner_inside_3d_region(&cavity, &reduced(&cavity), [true; 3], false));
    }

    #[test]
    fn test_3d_edge_is_closest() {
        let mesh = cube(Point3::new(0.02, 0.03, -0.1), 0.2, false);
        let pos = reduced(&mesh);
        assert!(!is_corner_inside_3d_region(&mesh, &pos, [true; 3], true));

        let cavity = cube(Point3::new(0.02, 0.03, -0.1), 0.2, true);
        assert!(is_corner_inside_3d_region(&cavity, &reduced(&cavity), [true; 3], false));
    }

    #[test]
    fn test_3d_vertex_pseudo_normal() {
        let mesh = cube(Point3::new(0.1, 0.1, 0.1), 0.2, false);
        let pos: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
        let n = vertex_pseudo_normal(&mesh, VertexId::new(0), &pos, &|v| v);
        // Points away from the box at its lower corner.
        assert!(n.x < 0.0 && n.y < 0.0 && n.z < 0.0);
        assert!(!is_corner_inside_3d_region(&mesh, &pos, [false; 3], true));
    }
}
