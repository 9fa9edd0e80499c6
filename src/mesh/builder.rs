//! Mesh construction utilities.
//!
//! Functions for building a closed (or open) half-edge mesh from face-vertex
//! lists as produced by upstream surface construction stages.

use nalgebra::Point3;

use super::halfedge::HalfEdgeMesh;
use super::index::VertexId;
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Example
/// ```
/// use seam::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<HalfEdgeMesh> {
    build(vertices, faces.iter().map(|f| &f[..]), faces.len())
}

/// Build a half-edge mesh from vertices and polygonal faces of arbitrary size.
///
/// Each face must have at least three corners, and consecutive corners
/// (including last to first) must differ.
pub fn build_from_polygons<F: AsRef<[usize]>>(vertices: &[Point3<f64>], faces: &[F]) -> Result<HalfEdgeMesh> {
    build(vertices, faces.iter().map(|f| f.as_ref()), faces.len())
}

fn build<'a>(
    vertices: &[Point3<f64>],
    faces: impl Iterator<Item = &'a [usize]> + Clone,
    num_faces: usize,
) -> Result<HalfEdgeMesh> {
    if num_faces == 0 {
        return Err(MeshError::EmptyMesh);
    }

    // Validate everything before touching the mesh.
    for (fi, face) in faces.clone().enumerate() {
        if face.len() < 3 {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        let n = face.len();
        if (0..n).any(|i| face[i] == face[(i + 1) % n]) {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = HalfEdgeMesh::new();
    mesh.reserve_vertices(vertices.len());
    mesh.reserve_faces(num_faces);

    let ids: Vec<VertexId> = vertices.iter().map(|&p| mesh.create_vertex(p)).collect();

    let mut corners = Vec::new();
    for face in faces {
        corners.clear();
        corners.extend(face.iter().map(|&vi| ids[vi]));
        mesh.create_face(&corners);
    }

    mesh.connect_opposite_halfedges();
    Ok(mesh)
}
