//! Caps that close a surface at the periodic boundaries of the cell.
//!
//! Cutting a closed surface at a periodic boundary leaves it open there. For
//! every periodic dimension, [`build_cap_mesh`] traces the intersection of
//! the surface with the boundary plane, clips the resulting contours to the
//! unit square and fills the solid part of the plane with triangles on both
//! periodic copies of the boundary.
//!
//! Contour fragments that end on the border of the square are joined by
//! walking counter-clockwise along the border from each fragment's exit
//! point to the closest fragment entry, inserting the square's corners
//! passed on the way.
//! When no contour reaches the border, the solid region either covers the
//! whole boundary or none of it, as decided by classifying the cell corner.

use log::{debug, trace};
use nalgebra::Point2;

use crate::cell::{wrap_floor, SimulationCell};
use crate::error::Result;
use crate::mesh::{HalfEdgeMesh, TriMesh};

use super::classify::{is_corner_inside_2d_region, is_corner_inside_3d_region};
use super::contour::{clip_contour, trace_contour, ClippedContours, Contour};
use super::tessellate::{CapPolygonTessellator, PolygonTessellator};

/// Build the cap triangles of a closed surface for all periodic boundaries.
///
/// `is_completely_solid` classifies the cell when `input` has no vertices.
/// The returned mesh is in absolute coordinates; each triangle is a separate
/// set of three vertices.
///
/// # Example
///
/// ```
/// use seam::algo::cap::build_cap_mesh;
/// use seam::cell::SimulationCell;
/// use seam::mesh::HalfEdgeMesh;
///
/// let cell = SimulationCell::unit([true, true, true]);
/// let cap = build_cap_mesh(&HalfEdgeMesh::new(), &cell, true).unwrap();
///
/// // Two triangles on each of the two copies of the three boundaries.
/// assert_eq!(cap.face_count(), 12);
/// ```
pub fn build_cap_mesh(input: &HalfEdgeMesh, cell: &SimulationCell, is_completely_solid: bool) -> Result<TriMesh> {
    let pbc = cell.pbc_flags();
    let mut reduced: Vec<_> = input
        .vertex_ids()
        .map(|v| cell.absolute_to_reduced(input.position(v)))
        .collect();

    let mut output = TriMesh::new();
    let mut visited = vec![false; input.num_faces()];
    let mut corner_inside: Option<bool> = None;

    for dim in (0..3).filter(|&d| pbc[d]) {
        for p in &mut reduced {
            p[dim] = wrap_floor(p[dim]);
        }
        visited.fill(false);

        let planar_pbc = [pbc[(dim + 1) % 3], pbc[(dim + 2) % 3]];
        let mut contours = ClippedContours::default();
        let mut traced = 0;
        for v in input.vertex_ids() {
            for e in input.vertex_edges(v) {
                if visited[input.edge_face(e).index()] {
                    continue;
                }
                let v1 = reduced[input.vertex1(e).index()];
                let v2 = reduced[input.vertex2(e).index()];
                if v2[dim] - v1[dim] >= 0.5 {
                    let contour = trace_contour(input, e, &reduced, pbc, dim, &mut visited)?;
                    clip_contour(contour, planar_pbc, &mut contours);
                    traced += 1;
                }
            }
        }
        debug!(
            "dimension {}: traced {} contours, {} closed, {} open fragments",
            dim,
            traced,
            contours.closed.len(),
            contours.open.len()
        );

        let mut tessellator = CapPolygonTessellator::new(&mut output, dim);
        tessellator.begin_polygon();
        for contour in &contours.closed {
            feed_contour(&mut tessellator, contour);
        }

        if !contours.open.is_empty() {
            stitch_open_contours(&mut tessellator, &contours.open);
        } else {
            let inside = *corner_inside.get_or_insert_with(|| {
                if contours.closed.is_empty() {
                    is_corner_inside_3d_region(input, &reduced, pbc, is_completely_solid)
                } else {
                    is_corner_inside_2d_region(&contours.closed)
                }
            });
            trace!("dimension {}: cell corner inside solid: {}", dim, inside);
            if inside {
                tessellator.begin_contour();
                for corner in [0, 3, 2, 1] {
                    tessellator.vertex(square_corner(corner));
                }
                tessellator.end_contour();
            }
        }

        let triangles = tessellator.end_polygon();
        debug!("dimension {}: {} cap triangles per boundary copy", dim, triangles.len());
    }

    for p in output.vertices_mut() {
        *p = cell.reduced_to_absolute(p);
    }
    Ok(output)
}

fn feed_contour<T: PolygonTessellator>(tessellator: &mut T, contour: &[Point2<f64>]) {
    tessellator.begin_contour();
    for p in contour {
        tessellator.vertex(*p);
    }
    tessellator.end_contour();
}

/// Joins open fragments into closed rings along the border of the unit square.
fn stitch_open_contours<T: PolygonTessellator>(tessellator: &mut T, open: &[Contour]) {
    let mut visited = vec![false; open.len()];
    for start in 0..open.len() {
        if visited[start] {
            continue;
        }
        tessellator.begin_contour();
        let mut current = start;
        loop {
            for p in &open[current] {
                tessellator.vertex(*p);
            }
            visited[current] = true;

            let exit = open[current].last().map_or(0.0, border_parameter);
            let mut entry = 0.0;
            let mut closest = f64::MAX;
            for (i, fragment) in open.iter().enumerate() {
                let pos = fragment.first().map_or(0.0, border_parameter);
                let mut dist = exit - pos;
                if dist < 0.0 {
                    dist += 4.0;
                }
                if dist < closest {
                    closest = dist;
                    current = i;
                    entry = pos;
                }
            }

            let exit_corner = exit.floor() as usize % 4;
            let entry_corner = entry.floor() as usize % 4;
            if exit_corner != entry_corner || exit < entry {
                let mut corner = exit_corner;
                loop {
                    tessellator.vertex(square_corner(corner));
                    corner = (corner + 3) % 4;
                    if corner == entry_corner {
                        break;
                    }
                }
            }

            if visited[current] {
                break;
            }
        }
        tessellator.end_contour();
    }
}

/// Position of a border point along the unit square's perimeter, in `[0,4)`.
///
/// The perimeter is parameterised clockwise starting at the origin; corner
/// `k` of [`square_corner`] sits at parameter `k`. Points off the border map
/// to 0.
fn border_parameter(p: &Point2<f64>) -> f64 {
    if p.x == 0.0 {
        p.y
    } else if p.y == 1.0 {
        p.x + 1.0
    } else if p.x == 1.0 {
        3.0 - p.y
    } else if p.y == 0.0 {
        4.0 - p.x
    } else {
        0.0
    }
}

fn square_corner(k: usize) -> Point2<f64> {
    match k {
        0 => Point2::new(0.0, 0.0),
        1 => Point2::new(0.0, 1.0),
        2 => Point2::new(1.0, 1.0),
        _ => Point2::new(1.0, 0.0),
    }
}
