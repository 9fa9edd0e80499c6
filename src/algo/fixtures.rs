//! Meshes shared by the algorithm tests.

use nalgebra::{Point3, Vector3};

use crate::mesh::{build_from_triangles, HalfEdgeMesh};

/// Sheet of 2x3x3 triangles covering the periodic xy plane at height `z`.
/// The normal points along +z when `up` is set.
pub(crate) fn periodic_sheet(z: f64, up: bool, vertices: &mut Vec<Point3<f64>>, faces: &mut Vec<[usize; 3]>) {
    let base = vertices.len();
    let coords = [1.0 / 6.0, 0.5, 5.0 / 6.0];
    for &y in &coords {
        for &x in &coords {
            vertices.push(Point3::new(x, y, z));
        }
    }
    let id = |i: usize, j: usize| base + (i % 3) + 3 * (j % 3);
    for j in 0..3 {
        for i in 0..3 {
            let (v00, v10, v11, v01) = (id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1));
            if up {
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            } else {
                faces.push([v00, v11, v10]);
                faces.push([v00, v01, v11]);
            }
        }
    }
}

/// Solid slab `z_lo < z < z_hi` spanning the periodic xy plane.
pub(crate) fn slab(z_lo: f64, z_hi: f64) -> HalfEdgeMesh {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    periodic_sheet(z_hi, true, &mut vertices, &mut faces);
    periodic_sheet(z_lo, false, &mut vertices, &mut faces);
    build_from_triangles(&vertices, &faces).unwrap()
}

/// Axis-aligned box with corner `lo` and edge length `size`.
///
/// Normals point outward unless `inverted` is set, in which case the box
/// bounds a cavity.
pub(crate) fn cube(lo: Point3<f64>, size: f64, inverted: bool) -> HalfEdgeMesh {
    let vertices: Vec<Point3<f64>> = (0..8)
        .map(|c| lo + Vector3::new((c & 1) as f64, ((c >> 1) & 1) as f64, ((c >> 2) & 1) as f64) * size)
        .collect();
    let quads = [[0, 2, 3, 1], [4, 5, 7, 6], [0, 1, 5, 4], [2, 6, 7, 3], [0, 4, 6, 2], [1, 3, 7, 5]];
    let mut faces = Vec::new();
    for [a, b, c, d] in quads {
        if inverted {
            faces.push([a, c, b]);
            faces.push([a, d, c]);
        } else {
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }
    build_from_triangles(&vertices, &faces).unwrap()
}
