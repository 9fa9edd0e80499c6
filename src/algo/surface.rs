//! Surface mesh construction at periodic boundaries.
//!
//! A surface that wraps around a periodic cell has triangles whose corners
//! lie on different periodic images. [`build_surface_mesh`] produces a
//! renderable [`TriMesh`] in which every triangle lies entirely inside the
//! primary cell image:
//!
//! 1. The half-edge mesh is triangulated and transformed to reduced
//!    coordinates.
//! 2. For each periodic dimension, vertex coordinates are wrapped into
//!    `[0,1)` and every triangle spanning the seam is split in three
//!    ([`FaceSplitter::split_face`]).
//! 3. The result is transformed back to absolute coordinates.
//!
//! Seam vertices are shared between the two triangles adjacent to a split
//! edge, so the output stays connected along the cut.
//!
//! # Example
//!
//! ```
//! use seam::algo::surface::build_surface_mesh;
//! use seam::cell::SimulationCell;
//! use seam::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.9, 0.5, 0.5),
//!     Point3::new(1.1, 0.4, 0.5),
//!     Point3::new(1.1, 0.6, 0.5),
//! ];
//! let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//! let cell = SimulationCell::unit([true, true, true]);
//!
//! let surface = build_surface_mesh(&mesh, &cell).unwrap();
//! assert_eq!(surface.face_count(), 3);
//! ```

use std::collections::HashMap;

use log::debug;
use nalgebra::Point3;

use crate::cell::{wrap_unit, SimulationCell};
use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, TriMesh};

/// Build the renderable triangle mesh of a surface embedded in a periodic cell.
///
/// Returns [`MeshError::FaceSpansCell`] if a triangle cannot be split because
/// it spans the cell along the processed dimension. Callers typically fall
/// back to rendering an empty mesh in that case.
pub fn build_surface_mesh(input: &HalfEdgeMesh, cell: &SimulationCell) -> Result<TriMesh> {
    let mut output = TriMesh::new();
    input.convert_to_tri_mesh(&mut output);

    for p in output.vertices_mut() {
        *p = cell.absolute_to_reduced(p);
    }

    let pbc = cell.pbc_flags();
    for dim in (0..3).filter(|&d| pbc[d]) {
        for p in output.vertices_mut() {
            p[dim] = wrap_unit(p[dim]);
        }

        let old_face_count = output.face_count();
        let mut splitter = FaceSplitter::new(output.vertex_count(), pbc, dim);
        for face in 0..old_face_count {
            splitter.split_face(&mut output, face)?;
        }

        let split = (output.face_count() - old_face_count) / 2;
        let seam_vertices = splitter.into_new_vertices();
        debug!(
            "dimension {}: split {} of {} faces, {} seam vertices",
            dim,
            split,
            old_face_count,
            seam_vertices.len()
        );

        for p in seam_vertices {
            output.add_vertex(p);
        }
    }

    for p in output.vertices_mut() {
        *p = cell.reduced_to_absolute(p);
    }

    Ok(output)
}

/// Splits triangles crossing the periodic seam of one dimension.
///
/// New seam vertices are collected in a side list and receive indices
/// starting at the vertex count the splitter was created with. They are
/// appended to the mesh only after all faces have been processed.
#[derive(Debug)]
pub struct FaceSplitter {
    old_vertex_count: usize,
    new_vertices: Vec<Point3<f64>>,
    /// Directed edge `(lower, upper)` -> (index on the lower side, index on the upper side).
    lookup: HashMap<(usize, usize), (usize, usize)>,
    pbc: [bool; 3],
    dim: usize,
}

impl FaceSplitter {
    /// Create a splitter for the seam of dimension `dim`.
    pub fn new(old_vertex_count: usize, pbc: [bool; 3], dim: usize) -> Self {
        Self {
            old_vertex_count,
            new_vertices: Vec::new(),
            lookup: HashMap::new(),
            pbc,
            dim,
        }
    }

    /// Seam vertices created so far.
    pub fn new_vertices(&self) -> &[Point3<f64>] {
        &self.new_vertices
    }

    /// Consume the splitter, returning the seam vertices in index order.
    pub fn into_new_vertices(self) -> Vec<Point3<f64>> {
        self.new_vertices
    }

    /// Split triangle `face` of `output` if it crosses the seam.
    ///
    /// Vertex coordinates along the seam dimension must already be wrapped
    /// into `[0,1)`. A crossing triangle has exactly one edge whose endpoints
    /// differ by less than one half along the seam dimension. The triangle is
    /// rewritten in place and two more triangles are appended to `output`.
    pub fn split_face(&mut self, output: &mut TriMesh, face: usize) -> Result<()> {
        let dim = self.dim;
        let orig = output.face(face).vertices();
        debug_assert!(orig[0] != orig[1] && orig[1] != orig[2] && orig[2] != orig[0]);

        let z = orig.map(|v| self.position(output, v)[dim]);
        let zd = [z[1] - z[0], z[2] - z[1], z[0] - z[2]];

        if zd.iter().all(|d| d.abs() < 0.5) {
            return Ok(());
        }

        let mut proper_edge = None;
        let mut new_indices = [[0usize; 2]; 3];
        for i in 0..3 {
            if zd[i].abs() < 0.5 {
                if proper_edge.is_some() {
                    return Err(MeshError::FaceSpansCell { face, dim });
                }
                proper_edge = Some(i);
                continue;
            }

            let (mut vi1, mut vi2) = (orig[i], orig[(i + 1) % 3]);
            let (oi1, oi2) = if zd[i] <= -0.5 {
                std::mem::swap(&mut vi1, &mut vi2);
                (1, 0)
            } else {
                (0, 1)
            };

            let pair = match self.lookup.get(&(vi1, vi2)) {
                Some(&pair) => pair,
                None => {
                    let pair = self.create_seam_vertices(output, vi1, vi2);
                    self.lookup.insert((vi1, vi2), pair);
                    pair
                }
            };
            new_indices[i][oi1] = pair.0;
            new_indices[i][oi2] = pair.1;
        }

        let pe = proper_edge.ok_or(MeshError::FaceSpansCell { face, dim })?;
        let (e1, e2) = ((pe + 1) % 3, (pe + 2) % 3);

        output.face_mut(face).set_vertices(orig[pe], orig[e1], new_indices[e2][1]);
        output.add_triangle(orig[e1], new_indices[e1][0], new_indices[e2][1]);
        output.add_triangle(new_indices[e1][1], orig[e2], new_indices[e2][0]);

        Ok(())
    }

    /// Intersect the edge `vi1 -> vi2` (crossing the seam upwards) with the
    /// boundary plane and create the point on both sides of the seam.
    fn create_seam_vertices(&mut self, output: &TriMesh, vi1: usize, vi2: usize) -> (usize, usize) {
        let dim = self.dim;
        let p1 = self.position(output, vi1);
        let mut delta = self.position(output, vi2) - p1;
        delta[dim] -= 1.0;
        for d in (dim + 1)..3 {
            if self.pbc[d] && delta[d].is_finite() {
                while delta[d] < 0.5 {
                    delta[d] += 1.0;
                }
                while delta[d] > 0.5 {
                    delta[d] -= 1.0;
                }
            }
        }

        let t = p1[dim] / -delta[dim];
        let mut p = p1 + delta * t;

        let index = self.old_vertex_count + self.new_vertices.len();
        self.new_vertices.push(p);
        p[dim] += 1.0;
        self.new_vertices.push(p);
        (index, index + 1)
    }

    fn position(&self, output: &TriMesh, v: usize) -> Point3<f64> {
        if v < self.old_vertex_count {
            *output.vertex(v)
        } else {
            self.new_vertices[v - self.old_vertex_count]
        }
    }
}
