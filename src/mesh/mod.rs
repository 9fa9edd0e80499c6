//! Core mesh data structures.
//!
//! # Overview
//!
//! [`HalfEdgeMesh`] is the input of the surface pipeline: a polygon mesh with
//! half-edge adjacency, built incrementally with
//! [`HalfEdgeMesh::create_vertex`] / [`HalfEdgeMesh::create_face`] and
//! finalized with [`HalfEdgeMesh::connect_opposite_halfedges`].
//!
//! [`TriMesh`] is the output: flat vertex and triangle arrays ready for a
//! renderer.
//!
//! [`SurfaceMesh`] pairs a half-edge mesh with the flag that classifies the
//! empty mesh.
//!
//! # Construction
//!
//! ```
//! use seam::mesh::{build_from_triangles, TriMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//!
//! let mut tri = TriMesh::new();
//! mesh.convert_to_tri_mesh(&mut tri);
//! assert_eq!(tri.face_count(), 1);
//! ```

mod builder;
mod halfedge;
mod index;
mod surface;
mod trimesh;

pub use builder::{build_from_polygons, build_from_triangles};
pub use halfedge::{Face, FaceEdgeIter, HalfEdge, HalfEdgeMesh, Vertex, VertexEdgeIter};
pub use index::{FaceId, HalfEdgeId, VertexId};
pub use surface::SurfaceMesh;
pub use trimesh::{RayHit, TriMesh, TriMeshFace};
