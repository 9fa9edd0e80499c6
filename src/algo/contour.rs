//! Contours of a surface on a periodic boundary plane.
//!
//! Where a closed surface crosses the periodic boundary of dimension `dim`,
//! its intersection with the plane `reduced[dim] = 0` is a set of closed
//! polygons. [`trace_contour`] walks the mesh to produce one such polygon in
//! the 2D coordinates `(dim + 1, dim + 2)` (mod 3).
//!
//! The two planar axes may themselves be periodic, in which case a traced
//! polygon can wrap around the unit square. [`clip_contour`] cuts it at the
//! square's border into fragments that each lie in the primary image.
//!
//! The traversal direction of a traced contour encloses the solid region
//! counter-clockwise; the cap tessellation relies on it.

use log::trace;
use nalgebra::{Point2, Point3, Vector2};

use crate::cell::{minimum_image, wrap_floor};
use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeId, HalfEdgeMesh};

/// An ordered 2D polygon in unit-square coordinates.
pub type Contour = Vec<Point2<f64>>;

/// Result of clipping contours against the unit square.
#[derive(Debug, Clone, Default)]
pub struct ClippedContours {
    /// Polygons that never touch the square's border.
    pub closed: Vec<Contour>,
    /// Fragments that start and end on the square's border.
    pub open: Vec<Contour>,
}

/// Trace the contour starting at `first_edge`, a half-edge that crosses the
/// boundary of dimension `dim` upwards (`v2[dim] - v1[dim] >= 1/2`).
///
/// `reduced_pos` holds the vertex positions in reduced coordinates, wrapped
/// along `dim`. Faces are marked in `visited` as the trace passes through
/// them; each face contributes at most one contour point.
///
/// Returns [`MeshError::UnpairedSeamCrossing`] if a face is entered across the
/// boundary but never left again.
///
/// # Panics
/// Panics if the trace reaches a half-edge without an opposite, or re-enters
/// a visited face before closing. Both indicate a mesh that is not watertight.
pub fn trace_contour(
    mesh: &HalfEdgeMesh,
    first_edge: HalfEdgeId,
    reduced_pos: &[Point3<f64>],
    pbc: [bool; 3],
    dim: usize,
    visited: &mut [bool],
) -> Result<Contour> {
    let dim1 = (dim + 1) % 3;
    let dim2 = (dim + 2) % 3;
    let pos = |e: HalfEdgeId| {
        (
            reduced_pos[mesh.vertex1(e).index()],
            reduced_pos[mesh.vertex2(e).index()],
        )
    };

    let mut contour = Contour::new();
    let mut edge = first_edge;
    loop {
        let face = mesh.edge_face(edge);
        assert!(
            !visited[face.index()],
            "contour re-entered {:?} before closing; the mesh is not watertight",
            face
        );
        visited[face.index()] = true;

        let (v1, v2) = pos(edge);
        let mut delta = v2 - v1;
        delta[dim] -= 1.0;
        if pbc[dim1] {
            delta[dim1] = minimum_image(delta[dim1]);
        }
        if pbc[dim2] {
            delta[dim2] = minimum_image(delta[dim2]);
        }
        let t = if delta[dim].abs() > 1e-9 { v1[dim] / delta[dim] } else { 0.5 };
        contour.push(Point2::new(v1[dim1] - delta[dim1] * t, v1[dim2] - delta[dim2] * t));

        // Find the edge of this face that crosses back down.
        let limit = mesh.face_edge_count(face);
        let mut exit = None;
        let mut e = edge;
        for _ in 0..limit {
            e = mesh.next_face_edge(e);
            let (v1, v2) = pos(e);
            if v2[dim] - v1[dim] <= -0.5 {
                exit = Some(e);
                break;
            }
        }
        let exit = exit.ok_or(MeshError::UnpairedSeamCrossing { face: face.index(), dim })?;

        edge = mesh.opposite(exit);
        assert!(edge.is_valid(), "half-edge {:?} has no opposite; the mesh is not watertight", exit);
        if edge == first_edge {
            break;
        }
    }

    trace!("traced contour with {} points across dimension {}", contour.len(), dim);
    Ok(contour)
}

/// Clip a traced contour against the unit square.
///
/// `pbc` are the periodic flags of the contour's two planar axes. Without
/// any periodic axis the contour is closed as is. Otherwise coordinates are
/// wrapped into the primary image and the polygon is cut wherever a segment
/// jumps by half the cell or more. A contour that is never cut is added to
/// `output.closed`; the fragments of a cut contour are added to `output.open`.
pub fn clip_contour(mut input: Contour, pbc: [bool; 2], output: &mut ClippedContours) {
    if !pbc[0] && !pbc[1] {
        output.closed.push(input);
        return;
    }
    if input.is_empty() {
        return;
    }

    for v in input.iter_mut() {
        for axis in 0..2 {
            if pbc[axis] {
                v[axis] = wrap_floor(v[axis]);
            }
        }
    }

    let mut fragments: Vec<Contour> = vec![Contour::new()];
    let mut v1 = input[input.len() - 1];
    for &v2 in &input {
        if let Some(current) = fragments.last_mut() {
            current.push(v1);
        }

        let mut delta = v2 - v1;
        if delta.x.abs() < 0.5 && delta.y.abs() < 0.5 {
            v1 = v2;
            continue;
        }

        // (parameter, axis, direction) of each border crossing of this segment.
        let mut crossings: Vec<(f64, usize, i32)> = Vec::with_capacity(2);
        for axis in 0..2 {
            if !pbc[axis] {
                continue;
            }
            if delta[axis] >= 0.5 {
                delta[axis] -= 1.0;
                let t = if delta[axis].abs() > f64::EPSILON { v1[axis] / -delta[axis] } else { 0.5 };
                crossings.push((t, axis, -1));
            } else if delta[axis] <= -0.5 {
                delta[axis] += 1.0;
                let t = if delta[axis].abs() > f64::EPSILON { (1.0 - v1[axis]) / delta[axis] } else { 0.5 };
                crossings.push((t, axis, 1));
            }
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut base = v1;
        let mut consumed = 0.0;
        for (t, axis, cross_dir) in crossings {
            // Later crossings are re-parameterized on the shortened segment.
            let s = if consumed > 0.0 && consumed < 1.0 {
                ((t - consumed) / (1.0 - consumed)).clamp(0.0, 1.0)
            } else {
                t
            };
            compute_contour_intersection(axis, s, &mut base, &mut delta, cross_dir, &mut fragments);
            consumed = t;
        }

        v1 = v2;
    }

    if fragments.len() == 1 {
        output.closed.extend(fragments);
        return;
    }

    if let Some(mut last) = fragments.pop() {
        last.append(&mut fragments[0]);
        fragments[0] = last;
    }
    trace!("contour clipped into {} open fragments", fragments.len());
    fragments.append(&mut output.open);
    output.open = fragments;
}

/// Split the current fragment where the segment `base + s * delta` crosses
/// the border along `axis`.
///
/// The crossing point is pinned to the border the segment leaves through
/// (0 for `cross_dir == -1`, 1 for `+1`) and appended to the current
/// fragment. Its periodic image on the opposite border starts a new
/// fragment. `base` and `delta` are advanced to the remaining part of the
/// segment.
pub fn compute_contour_intersection(
    axis: usize,
    t: f64,
    base: &mut Point2<f64>,
    delta: &mut Vector2<f64>,
    cross_dir: i32,
    fragments: &mut Vec<Contour>,
) {
    debug_assert!(t.is_finite());
    let mut intersection = *base + *delta * t;
    intersection[axis] = if cross_dir == -1 { 0.0 } else { 1.0 };
    if let Some(current) = fragments.last_mut() {
        current.push(intersection);
    }
    intersection[axis] = if cross_dir == 1 { 0.0 } else { 1.0 };
    fragments.push(vec![intersection]);
    *base = intersection;
    *delta *= 1.0 - t;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::{cube, slab};

    fn close(a: &Point2<f64>, x: f64, y: f64) -> bool {
        (a.x - x).abs() < 1e-9 && (a.y - y).abs() < 1e-9
    }

    fn reduced(mesh: &HalfEdgeMesh, dim: usize) -> Vec<Point3<f64>> {
        mesh.vertex_ids()
            .map(|v| {
                let mut p = *mesh.position(v);
                p[dim] = wrap_floor(p[dim]);
                p
            })
            .collect()
    }

    fn trace_all(mesh: &HalfEdgeMesh, pbc: [bool; 3], dim: usize) -> Vec<Contour> {
        let pos = reduced(mesh, dim);
        let mut visited = vec![false; mesh.num_faces()];
        let mut contours = Vec::new();
        for v in mesh.vertex_ids() {
            for e in mesh.vertex_edges(v) {
                if visited[mesh.edge_face(e).index()] {
                    continue;
                }
                let (p1, p2) = (pos[mesh.vertex1(e).index()], pos[mesh.vertex2(e).index()]);
                if p2[dim] - p1[dim] >= 0.5 {
                    contours.push(trace_contour(mesh, e, &pos, pbc, dim, &mut visited).unwrap());
                }
            }
        }
        contours
    }

    fn signed_area(c: &Contour) -> f64 {
        let n = c.len();
        (0..n)
            .map(|i| {
                let (a, b) = (c[i], c[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            * 0.5
    }

    fn upward_edge(mesh: &HalfEdgeMesh, pos: &[Point3<f64>], dim: usize) -> HalfEdgeId {
        mesh.halfedge_ids()
            .find(|&e| pos[mesh.vertex2(e).index()][dim] - pos[mesh.vertex1(e).index()][dim] >= 0.5)
            .unwrap()
    }

    #[test]
    fn test_trace_face_without_return_edge() {
        // x-differences 0.8, -0.4, -0.4: enters the seam but never leaves.
        let vertices = vec![
            Point3::new(0.1, 0.2, 0.5),
            Point3::new(0.9, 0.3, 0.5),
            Point3::new(0.5, 0.6, 0.5),
        ];
        let mesh = crate::mesh::build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let pos = reduced(&mesh, 0);
        let first = upward_edge(&mesh, &pos, 0);
        let mut visited = vec![false; mesh.num_faces()];

        let result = trace_contour(&mesh, first, &pos, [true; 3], 0, &mut visited);
        assert_eq!(result.unwrap_err(), MeshError::UnpairedSeamCrossing { face: 0, dim: 0 });
    }

    #[test]
    #[should_panic(expected = "no opposite")]
    fn test_trace_open_sheet_panics() {
        // Triangle crossing x = 0 whose exit edge is on the mesh border.
        let vertices = vec![
            Point3::new(0.9, 0.4, 0.5),
            Point3::new(0.1, 0.4, 0.5),
            Point3::new(0.1, 0.6, 0.5),
        ];
        let mesh = crate::mesh::build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let pos = reduced(&mesh, 0);
        let first = upward_edge(&mesh, &pos, 0);
        let mut visited = vec![false; mesh.num_faces()];

        let _ = trace_contour(&mesh, first, &pos, [true; 3], 0, &mut visited);
    }

    #[test]
    fn test_trace_cube_across_seam() {
        // Box straddling the x = 0 plane.
        let mesh = cube(Point3::new(-0.1, 0.3, 0.4), 0.2, false);
        let contours = trace_all(&mesh, [true, true, true], 0);
        assert_eq!(contours.len(), 1);

        let c = &contours[0];
        assert!(c.len() >= 4);
        // All points lie on the square's cross-section [0.3,0.5]x[0.4,0.6] boundary.
        for p in c {
            assert!(p.x > 0.3 - 1e-9 && p.x < 0.5 + 1e-9);
            assert!(p.y > 0.4 - 1e-9 && p.y < 0.6 + 1e-9);
        }
        // Counter-clockwise around the solid.
        assert!(signed_area(c) > 0.0);
        assert!((signed_area(c) - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_trace_cavity_is_clockwise() {
        let mesh = cube(Point3::new(-0.1, 0.3, 0.4), 0.2, true);
        let contours = trace_all(&mesh, [true, true, true], 0);
        assert_eq!(contours.len(), 1);
        assert!((signed_area(&contours[0]) + 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_trace_marks_faces() {
        let mesh = cube(Point3::new(-0.1, 0.3, 0.4), 0.2, false);
        let pos = reduced(&mesh, 0);
        let mut visited = vec![false; mesh.num_faces()];
        let start = mesh
            .halfedge_ids()
            .find(|&e| pos[mesh.vertex2(e).index()].x - pos[mesh.vertex1(e).index()].x >= 0.5)
            .unwrap();
        let c = trace_contour(&mesh, start, &pos, [true; 3], 0, &mut visited).unwrap();
        assert_eq!(visited.iter().filter(|&&v| v).count(), c.len());
    }

    #[test]
    fn test_trace_slab_direction() {
        let mesh = slab(0.3, 0.7);
        let contours = trace_all(&mesh, [true, true, false], 0);
        assert_eq!(contours.len(), 2);
        for c in &contours {
            assert_eq!(c.len(), 6);
            let z = c[0].y;
            assert!(c.iter().all(|p| (p.y - z).abs() < 1e-12));
        }
    }

    #[test]
    fn test_clip_non_periodic_is_closed() {
        let square = vec![
            Point2::new(-0.2, 0.1),
            Point2::new(0.2, 0.1),
            Point2::new(0.2, 0.3),
            Point2::new(-0.2, 0.3),
        ];
        let mut out = ClippedContours::default();
        clip_contour(square.clone(), [false, false], &mut out);
        assert_eq!(out.closed, vec![square]);
        assert!(out.open.is_empty());
    }

    #[test]
    fn test_clip_interior_contour() {
        let square = vec![
            Point2::new(1.2, 0.1),
            Point2::new(1.4, 0.1),
            Point2::new(1.4, 0.3),
            Point2::new(1.2, 0.3),
        ];
        let mut out = ClippedContours::default();
        clip_contour(square, [true, true], &mut out);
        assert_eq!(out.closed.len(), 1);
        assert_eq!(out.closed[0].len(), 4);
        assert!(out.closed[0].iter().any(|p| close(p, 0.2, 0.1)));
        assert!(out.closed[0].iter().all(|p| p.x < 0.5));
        assert!(out.open.is_empty());
    }

    #[test]
    fn test_clip_across_one_border() {
        // Square straddling x = 0, counter-clockwise.
        let square = vec![
            Point2::new(-0.1, 0.4),
            Point2::new(0.1, 0.4),
            Point2::new(0.1, 0.6),
            Point2::new(-0.1, 0.6),
        ];
        let mut out = ClippedContours::default();
        clip_contour(square, [true, false], &mut out);

        assert!(out.closed.is_empty());
        assert_eq!(out.open.len(), 2);
        for fragment in &out.open {
            let (first, last) = (fragment[0], fragment[fragment.len() - 1]);
            assert!(first.x == 0.0 || first.x == 1.0);
            assert!(last.x == 0.0 || last.x == 1.0);
        }

        // The piece right of x = 0 enters at the bottom and leaves at the top.
        let right = out.open.iter().find(|f| f.iter().any(|p| close(p, 0.1, 0.4))).unwrap();
        assert!(close(&right[0], 0.0, 0.4));
        assert!(close(right.last().unwrap(), 0.0, 0.6));

        let left = out.open.iter().find(|f| f.iter().any(|p| close(p, 0.9, 0.6))).unwrap();
        assert!(close(&left[0], 1.0, 0.6));
        assert!(close(left.last().unwrap(), 1.0, 0.4));
    }

    #[test]
    fn test_clip_band_wrapping_around() {
        // A horizontal line wrapping once around the periodic x axis.
        let band = vec![
            Point2::new(0.5, 0.7),
            Point2::new(1.0 / 3.0, 0.7),
            Point2::new(1.0 / 6.0, 0.7),
            Point2::new(0.0, 0.7),
            Point2::new(5.0 / 6.0, 0.7),
            Point2::new(2.0 / 3.0, 0.7),
        ];
        let mut out = ClippedContours::default();
        clip_contour(band, [true, false], &mut out);

        assert_eq!(out.open.len(), 1);
        let f = &out.open[0];
        assert!(close(&f[0], 1.0, 0.7));
        assert!(close(f.last().unwrap(), 0.0, 0.7));
        assert!(f.windows(2).all(|w| w[1].x <= w[0].x));
    }

    #[test]
    fn test_clip_through_corner() {
        // Diamond around the cell corner, crossing both borders.
        let diamond = vec![
            Point2::new(0.1, 0.0),
            Point2::new(0.0, 0.1),
            Point2::new(-0.1, 0.0),
            Point2::new(0.0, -0.1),
        ];
        let mut out = ClippedContours::default();
        clip_contour(diamond, [true, true], &mut out);

        assert!(out.closed.is_empty());
        assert!(!out.open.is_empty());
        for f in &out.open {
            for p in [f[0], f[f.len() - 1]] {
                assert!(p.x == 0.0 || p.x == 1.0 || p.y == 0.0 || p.y == 1.0);
            }
            for p in f {
                assert!((-1e-12..=1.0 + 1e-12).contains(&p.x));
                assert!((-1e-12..=1.0 + 1e-12).contains(&p.y));
            }
        }
    }

    #[test]
    fn test_compute_contour_intersection() {
        let mut fragments = vec![vec![Point2::new(0.9, 0.5)]];
        let mut base = Point2::new(0.9, 0.5);
        let mut delta = Vector2::new(0.2, 0.1);
        compute_contour_intersection(0, 0.5, &mut base, &mut delta, 1, &mut fragments);

        assert_eq!(fragments.len(), 2);
        assert!(close(&fragments[0][1], 1.0, 0.55));
        assert!(close(&fragments[1][0], 0.0, 0.55));
        assert!(close(&base, 0.0, 0.55));
        assert!((delta - Vector2::new(0.1, 0.05)).norm() < 1e-12);
    }
}
