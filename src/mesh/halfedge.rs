//! Half-edge mesh data structure.
//!
//! This module provides a polygon mesh with half-edge adjacency. Every face
//! is bounded by a cyclic list of half-edges, and every vertex keeps a singly
//! linked list of the half-edges leaving it.
//!
//! # Structure
//!
//! - A half-edge points *to* its destination vertex (`vertex2`). Its origin
//!   (`vertex1`) is the destination of the previous half-edge of the face.
//! - Each half-edge knows its face, the next/previous half-edge around that
//!   face, the next half-edge leaving the same origin vertex, and its
//!   **opposite** half-edge.
//! - Opposite links are not created by [`HalfEdgeMesh::create_face`]. They are
//!   established afterwards in one pass by
//!   [`HalfEdgeMesh::connect_opposite_halfedges`]. Half-edges on an open
//!   boundary keep an invalid opposite.
//!
//! All elements live in `Vec` arenas and refer to each other through
//! [`VertexId`], [`HalfEdgeId`] and [`FaceId`] handles, so cloning a mesh
//! preserves all indices and links.

use nalgebra::Point3;

use super::index::{FaceId, HalfEdgeId, VertexId};
use super::trimesh::TriMesh;

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Head of the list of outgoing half-edges.
    pub(crate) edges: HalfEdgeId,

    /// Length of the outgoing half-edge list.
    pub(crate) num_edges: usize,
}

impl Vertex {
    fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            edges: HalfEdgeId::invalid(),
            num_edges: 0,
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The vertex this half-edge points to.
    pub(crate) vertex2: VertexId,

    /// The face this half-edge bounds.
    pub(crate) face: FaceId,

    /// The reverse half-edge of the adjacent face, if linked.
    pub(crate) opposite: HalfEdgeId,

    /// The next half-edge leaving the same origin vertex.
    pub(crate) next_vertex_edge: HalfEdgeId,

    /// The next half-edge around the face.
    pub(crate) next_face_edge: HalfEdgeId,

    /// The previous half-edge around the face.
    pub(crate) prev_face_edge: HalfEdgeId,
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    /// The half-edge leaving the face's first vertex.
    pub(crate) edges: HalfEdgeId,
}

/// A polygon mesh with half-edge connectivity.
///
/// # Example
///
/// ```
/// use seam::mesh::HalfEdgeMesh;
/// use nalgebra::Point3;
///
/// let mut mesh = HalfEdgeMesh::new();
/// let a = mesh.create_vertex(Point3::new(0.0, 0.0, 0.0));
/// let b = mesh.create_vertex(Point3::new(1.0, 0.0, 0.0));
/// let c = mesh.create_vertex(Point3::new(0.0, 1.0, 0.0));
/// let d = mesh.create_vertex(Point3::new(0.0, 0.0, 1.0));
/// mesh.create_face(&[a, c, b]);
/// mesh.create_face(&[a, b, d]);
/// mesh.create_face(&[b, c, d]);
/// mesh.create_face(&[c, a, d]);
/// mesh.connect_opposite_halfedges();
///
/// assert!(mesh.is_closed());
/// assert!(mesh.is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) halfedges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
}

impl HalfEdgeMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all vertices, half-edges and faces.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.halfedges.clear();
        self.faces.clear();
    }

    /// Reserve room for `n` additional vertices.
    pub fn reserve_vertices(&mut self, n: usize) {
        self.vertices.reserve(n);
    }

    /// Reserve room for `n` additional faces (and their half-edges, assuming triangles).
    pub fn reserve_faces(&mut self, n: usize) {
        self.faces.reserve(n);
        self.halfedges.reserve(n * 3);
    }

    // ==================== Accessors ====================

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v.index()]
    }

    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertices[v.index()].position
    }

    #[inline]
    pub fn set_position(&mut self, v: VertexId, pos: Point3<f64>) {
        self.vertices[v.index()].position = pos;
    }

    /// Number of half-edges leaving a vertex.
    #[inline]
    pub fn vertex_edge_count(&self, v: VertexId) -> usize {
        self.vertices[v.index()].num_edges
    }

    /// Head of a vertex's outgoing half-edge list (invalid for isolated vertices).
    #[inline]
    pub fn first_vertex_edge(&self, v: VertexId) -> HalfEdgeId {
        self.vertices[v.index()].edges
    }

    /// The half-edge leaving the first vertex of a face.
    #[inline]
    pub fn first_face_edge(&self, f: FaceId) -> HalfEdgeId {
        self.faces[f.index()].edges
    }

    // ==================== Topology Queries ====================

    /// Origin vertex of a half-edge.
    #[inline]
    pub fn vertex1(&self, e: HalfEdgeId) -> VertexId {
        self.vertex2(self.prev_face_edge(e))
    }

    /// Destination vertex of a half-edge.
    #[inline]
    pub fn vertex2(&self, e: HalfEdgeId) -> VertexId {
        self.halfedges[e.index()].vertex2
    }

    /// Opposite half-edge, or an invalid handle on an open boundary.
    #[inline]
    pub fn opposite(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.halfedges[e.index()].opposite
    }

    #[inline]
    pub fn next_face_edge(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.halfedges[e.index()].next_face_edge
    }

    #[inline]
    pub fn prev_face_edge(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.halfedges[e.index()].prev_face_edge
    }

    #[inline]
    pub fn next_vertex_edge(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.halfedges[e.index()].next_vertex_edge
    }

    /// Face bounded by a half-edge.
    #[inline]
    pub fn edge_face(&self, e: HalfEdgeId) -> FaceId {
        self.halfedges[e.index()].face
    }

    // ==================== Iteration ====================

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over the half-edges leaving a vertex.
    pub fn vertex_edges(&self, v: VertexId) -> VertexEdgeIter<'_> {
        VertexEdgeIter {
            mesh: self,
            current: self.first_vertex_edge(v),
        }
    }

    /// Iterate over the half-edges around a face, starting at its first edge.
    pub fn face_edges(&self, f: FaceId) -> FaceEdgeIter<'_> {
        let start = self.first_face_edge(f);
        FaceEdgeIter {
            mesh: self,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }

    /// Iterate over the corners of a face in boundary order.
    pub fn face_vertices(&self, f: FaceId) -> impl Iterator<Item = VertexId> + '_ {
        self.face_edges(f).map(|e| self.vertex1(e))
    }

    /// Number of half-edges bounding a face.
    pub fn face_edge_count(&self, f: FaceId) -> usize {
        self.face_edges(f).count()
    }

    // ==================== Construction ====================

    /// Append a vertex and return its handle.
    pub fn create_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Create a face bounded by the given vertices in order.
    ///
    /// One half-edge is created per consecutive pair `(v[i], v[i+1])`,
    /// closing back to `v[0]`. Opposite links are left unset.
    ///
    /// # Panics
    /// Panics if fewer than two vertices are given.
    pub fn create_face(&mut self, vertices: &[VertexId]) -> FaceId {
        assert!(vertices.len() >= 2, "a face needs at least two vertices");

        let face = FaceId::new(self.faces.len());
        let first = self.halfedges.len();
        let n = vertices.len();

        for i in 0..n {
            let e = HalfEdgeId::new(first + i);
            let origin = vertices[i];
            let vertex = &mut self.vertices[origin.index()];
            self.halfedges.push(HalfEdge {
                vertex2: vertices[(i + 1) % n],
                face,
                opposite: HalfEdgeId::invalid(),
                next_vertex_edge: vertex.edges,
                next_face_edge: HalfEdgeId::new(first + (i + 1) % n),
                prev_face_edge: HalfEdgeId::new(first + (i + n - 1) % n),
            });
            vertex.edges = e;
            vertex.num_edges += 1;
        }

        self.faces.push(Face {
            edges: HalfEdgeId::new(first),
        });
        face
    }

    /// Link every unpaired half-edge with the reverse half-edge of its neighbor face.
    ///
    /// Half-edges without a partner keep an invalid opposite; this is the
    /// normal state for open meshes.
    pub fn connect_opposite_halfedges(&mut self) {
        for v1 in 0..self.vertices.len() {
            let v1 = VertexId::new(v1);
            let mut e = self.first_vertex_edge(v1);
            while e.is_valid() {
                if !self.opposite(e).is_valid() {
                    let v2 = self.vertex2(e);
                    let mut candidate = self.first_vertex_edge(v2);
                    while candidate.is_valid() {
                        if !self.opposite(candidate).is_valid() && self.vertex2(candidate) == v1 {
                            self.halfedges[e.index()].opposite = candidate;
                            self.halfedges[candidate.index()].opposite = e;
                            break;
                        }
                        candidate = self.next_vertex_edge(candidate);
                    }
                }
                e = self.next_vertex_edge(e);
            }
        }
    }

    /// Triangulate every face into `output`.
    ///
    /// Vertices are copied one to one. A face with `k` corners yields `k - 2`
    /// fan triangles sharing the face's second vertex, with the face winding
    /// preserved.
    pub fn convert_to_tri_mesh(&self, output: &mut TriMesh) {
        output.clear();

        output.set_vertex_count(self.vertices.len());
        for (dst, v) in output.vertices_mut().iter_mut().zip(&self.vertices) {
            *dst = v.position;
        }

        for f in self.face_ids() {
            let start = self.first_face_edge(f);
            let base = self.vertex2(start).index();
            let mut e = self.next_face_edge(self.next_face_edge(start));
            while e != start {
                output.add_triangle(base, self.vertex1(e).index(), self.vertex2(e).index());
                e = self.next_face_edge(e);
            }
        }
    }

    // ==================== Validation ====================

    /// Whether every half-edge has an opposite.
    pub fn is_closed(&self) -> bool {
        self.halfedges.iter().all(|e| e.opposite.is_valid())
    }

    /// Check all connectivity invariants.
    ///
    /// Face cycles must close (`next ∘ prev = id`), linked opposites must be
    /// mutual with reversed endpoints, and each vertex's outgoing list must
    /// hold exactly its recorded number of half-edges, all leaving it.
    pub fn is_valid(&self) -> bool {
        let ne = self.halfedges.len();

        let in_range = |e: HalfEdgeId| e.index() < ne;
        let nv = self.vertices.len();
        if !self.halfedges.iter().all(|he| {
            in_range(he.next_face_edge)
                && in_range(he.prev_face_edge)
                && he.vertex2.index() < nv
                && (!he.opposite.is_valid() || in_range(he.opposite))
                && (!he.next_vertex_edge.is_valid() || in_range(he.next_vertex_edge))
        }) {
            return false;
        }

        for (i, he) in self.halfedges.iter().enumerate() {
            let e = HalfEdgeId::new(i);
            if self.prev_face_edge(he.next_face_edge) != e || self.next_face_edge(he.prev_face_edge) != e {
                return false;
            }
            if self.edge_face(he.next_face_edge) != he.face {
                return false;
            }
            if he.opposite.is_valid() {
                if self.opposite(he.opposite) != e {
                    return false;
                }
                if self.vertex1(he.opposite) != he.vertex2 || self.vertex2(he.opposite) != self.vertex1(e) {
                    return false;
                }
            }
        }

        for f in self.face_ids() {
            let start = self.first_face_edge(f);
            if !start.is_valid() || self.edge_face(start) != f {
                return false;
            }
            // The cycle must return to its start within the half-edge count.
            let mut e = start;
            let mut steps = 0;
            loop {
                e = self.next_face_edge(e);
                steps += 1;
                if e == start {
                    break;
                }
                if steps > ne {
                    return false;
                }
            }
        }

        let mut listed = 0;
        for v in self.vertex_ids() {
            let mut count = 0;
            for e in self.vertex_edges(v) {
                if self.vertex1(e) != v || count > ne {
                    return false;
                }
                count += 1;
            }
            if count != self.vertex_edge_count(v) {
                return false;
            }
            listed += count;
        }

        listed == ne
    }
}

/// Iterator over the half-edges leaving a vertex.
pub struct VertexEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    current: HalfEdgeId,
}

impl Iterator for VertexEdgeIter<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.current.is_valid() {
            return None;
        }
        let result = self.current;
        self.current = self.mesh.next_vertex_edge(result);
        Some(result)
    }
}

/// Iterator over the half-edges around a face.
pub struct FaceEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl Iterator for FaceEdgeIter<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next_face_edge(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
