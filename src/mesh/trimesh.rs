//! Flat triangle mesh.
//!
//! [`TriMesh`] is the renderable output of the surface pipeline: a vertex
//! array plus a list of triangles indexing into it. Each triangle carries
//! edge-visibility flags, a smoothing-group bitmask for normal interpolation
//! and a material index. Optional per-vertex and per-face colors are resized
//! together with the arrays they annotate.

use std::sync::OnceLock;

use nalgebra::{Point3, Vector3};

use crate::color::ColorA;

/// A triangle of a [`TriMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriMeshFace {
    vertices: [usize; 3],
    flags: u8,
    smoothing_groups: u32,
    material_index: i32,
}

impl TriMeshFace {
    /// Visibility bit of the edge from corner 0 to corner 1.
    pub const EDGE1: u8 = 1 << 0;
    /// Visibility bit of the edge from corner 1 to corner 2.
    pub const EDGE2: u8 = 1 << 1;
    /// Visibility bit of the edge from corner 2 to corner 0.
    pub const EDGE3: u8 = 1 << 2;
    /// All three edges visible.
    pub const EDGES_ALL: u8 = Self::EDGE1 | Self::EDGE2 | Self::EDGE3;

    /// A triangle with the given corners, all edges visible and no smoothing group.
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            vertices: [a, b, c],
            flags: Self::EDGES_ALL,
            smoothing_groups: 0,
            material_index: 0,
        }
    }

    /// Corner vertex `k` (0, 1 or 2).
    #[inline]
    pub fn vertex(&self, k: usize) -> usize {
        self.vertices[k]
    }

    #[inline]
    pub fn vertices(&self) -> [usize; 3] {
        self.vertices
    }

    /// Replace all three corners.
    #[inline]
    pub fn set_vertices(&mut self, a: usize, b: usize, c: usize) {
        self.vertices = [a, b, c];
    }

    /// Replace corner `k`.
    #[inline]
    pub fn set_vertex(&mut self, k: usize, v: usize) {
        self.vertices[k] = v;
    }

    /// Edge visibility bits.
    #[inline]
    pub fn edge_flags(&self) -> u8 {
        self.flags
    }

    /// Whether edge `k` (from corner `k` to corner `k+1`) is visible.
    #[inline]
    pub fn edge_visible(&self, k: usize) -> bool {
        self.flags & (1 << k) != 0
    }

    /// Set the visibility of all three edges.
    pub fn set_edge_visibility(&mut self, e1: bool, e2: bool, e3: bool) {
        self.flags = (e1 as u8) * Self::EDGE1 | (e2 as u8) * Self::EDGE2 | (e3 as u8) * Self::EDGE3;
    }

    #[inline]
    pub fn smoothing_groups(&self) -> u32 {
        self.smoothing_groups
    }

    #[inline]
    pub fn set_smoothing_groups(&mut self, groups: u32) {
        self.smoothing_groups = groups;
    }

    #[inline]
    pub fn material_index(&self) -> i32 {
        self.material_index
    }

    #[inline]
    pub fn set_material_index(&mut self, index: i32) {
        self.material_index = index;
    }
}

impl Default for TriMeshFace {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Result of [`TriMesh::intersect_ray`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray parameter of the hit point (`origin + t * dir`).
    pub t: f64,
    /// Index of the hit triangle.
    pub face: usize,
    /// Unnormalized geometric normal of the hit triangle.
    pub normal: Vector3<f64>,
}

/// A triangle mesh stored as flat arrays.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<TriMeshFace>,
    vertex_colors: Vec<ColorA>,
    face_colors: Vec<ColorA>,
    has_vertex_colors: bool,
    has_face_colors: bool,
    bounding_box: OnceLock<Option<(Point3<f64>, Point3<f64>)>>,
}

impl TriMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all vertices, faces and colors.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.vertex_colors.clear();
        self.face_colors.clear();
        self.has_vertex_colors = false;
        self.has_face_colors = false;
        self.invalidate_vertices();
    }

    /// Whether the mesh has neither vertices nor faces.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    // ==================== Vertices ====================

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Resize the vertex array. New vertices are placed at the origin.
    pub fn set_vertex_count(&mut self, n: usize) {
        self.vertices.resize(n, Point3::origin());
        if self.has_vertex_colors {
            self.vertex_colors.resize(n, ColorA::default());
        }
        self.invalidate_vertices();
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, p: Point3<f64>) -> usize {
        self.vertices.push(p);
        if self.has_vertex_colors {
            self.vertex_colors.push(ColorA::default());
        }
        self.invalidate_vertices();
        self.vertices.len() - 1
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> &Point3<f64> {
        &self.vertices[i]
    }

    pub fn set_vertex(&mut self, i: usize, p: Point3<f64>) {
        self.vertices[i] = p;
        self.invalidate_vertices();
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Mutable access to the vertex array. Drops the cached bounding box.
    pub fn vertices_mut(&mut self) -> &mut [Point3<f64>] {
        self.invalidate_vertices();
        &mut self.vertices
    }

    /// Drop cached data derived from vertex positions.
    pub fn invalidate_vertices(&mut self) {
        self.bounding_box.take();
    }

    // ==================== Faces ====================

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Resize the face array. New faces are default-initialized.
    pub fn set_face_count(&mut self, n: usize) {
        self.faces.resize(n, TriMeshFace::default());
        if self.has_face_colors {
            self.face_colors.resize(n, ColorA::default());
        }
    }

    /// Append a default face and return it for initialization.
    pub fn add_face(&mut self) -> &mut TriMeshFace {
        let n = self.faces.len() + 1;
        self.set_face_count(n);
        &mut self.faces[n - 1]
    }

    /// Append a triangle with the given corners and return its index.
    pub fn add_triangle(&mut self, a: usize, b: usize, c: usize) -> usize {
        self.add_face().set_vertices(a, b, c);
        self.faces.len() - 1
    }

    #[inline]
    pub fn face(&self, i: usize) -> &TriMeshFace {
        &self.faces[i]
    }

    #[inline]
    pub fn face_mut(&mut self, i: usize) -> &mut TriMeshFace {
        &mut self.faces[i]
    }

    #[inline]
    pub fn faces(&self) -> &[TriMeshFace] {
        &self.faces
    }

    #[inline]
    pub fn faces_mut(&mut self) -> &mut [TriMeshFace] {
        &mut self.faces
    }

    // ==================== Colors ====================

    #[inline]
    pub fn has_vertex_colors(&self) -> bool {
        self.has_vertex_colors
    }

    /// Enable or disable per-vertex colors.
    pub fn set_has_vertex_colors(&mut self, enabled: bool) {
        self.has_vertex_colors = enabled;
        if enabled {
            self.vertex_colors.resize(self.vertices.len(), ColorA::default());
        } else {
            self.vertex_colors.clear();
        }
    }

    #[inline]
    pub fn vertex_colors(&self) -> &[ColorA] {
        &self.vertex_colors
    }

    #[inline]
    pub fn vertex_colors_mut(&mut self) -> &mut [ColorA] {
        &mut self.vertex_colors
    }

    #[inline]
    pub fn has_face_colors(&self) -> bool {
        self.has_face_colors
    }

    /// Enable or disable per-face colors.
    pub fn set_has_face_colors(&mut self, enabled: bool) {
        self.has_face_colors = enabled;
        if enabled {
            self.face_colors.resize(self.faces.len(), ColorA::default());
        } else {
            self.face_colors.clear();
        }
    }

    #[inline]
    pub fn face_colors(&self) -> &[ColorA] {
        &self.face_colors
    }

    #[inline]
    pub fn face_colors_mut(&mut self) -> &mut [ColorA] {
        &mut self.face_colors
    }

    // ==================== Geometry ====================

    /// Axis-aligned bounding box of all vertices, `None` for a mesh without vertices.
    ///
    /// The result is cached until the vertices change.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        *self.bounding_box.get_or_init(|| {
            let first = *self.vertices.first()?;
            let (mut min, mut max) = (first, first);
            for p in &self.vertices[1..] {
                for i in 0..3 {
                    min[i] = min[i].min(p[i]);
                    max[i] = max[i].max(p[i]);
                }
            }
            Some((min, max))
        })
    }

    /// Total area of all triangles.
    pub fn surface_area(&self) -> f64 {
        self.faces
            .iter()
            .map(|f| {
                let p0 = self.vertices[f.vertex(0)];
                let e1 = self.vertices[f.vertex(1)] - p0;
                let e2 = self.vertices[f.vertex(2)] - p0;
                0.5 * e1.cross(&e2).norm()
            })
            .sum()
    }

    /// Whether every face references existing vertices and the color arrays
    /// match the element counts.
    pub fn is_valid(&self) -> bool {
        let n = self.vertices.len();
        self.faces.iter().all(|f| f.vertices.iter().all(|&v| v < n))
            && (!self.has_vertex_colors || self.vertex_colors.len() == n)
            && (!self.has_face_colors || self.face_colors.len() == self.faces.len())
    }

    /// Find the closest triangle hit by a ray (Möller–Trumbore).
    ///
    /// Triangles with a degenerate normal are ignored. With `backface_cull`,
    /// triangles whose normal points along `dir` are ignored too.
    pub fn intersect_ray(
        &self,
        origin: &Point3<f64>,
        dir: &Vector3<f64>,
        backface_cull: bool,
    ) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for (index, face) in self.faces.iter().enumerate() {
            let v0 = self.vertices[face.vertex(0)];
            let e1 = self.vertices[face.vertex(1)] - v0;
            let e2 = self.vertices[face.vertex(2)] - v0;

            let h = dir.cross(&e2);
            let a = e1.dot(&h);
            if a.abs() < f64::EPSILON {
                continue;
            }
            let f = 1.0 / a;
            let s = origin - v0;
            let u = f * s.dot(&h);
            if !(0.0..=1.0).contains(&u) {
                continue;
            }
            let q = s.cross(&e1);
            let v = f * dir.dot(&q);
            if v < 0.0 || u + v > 1.0 {
                continue;
            }
            let t = f * e2.dot(&q);
            if t < f64::EPSILON {
                continue;
            }
            if best.is_some_and(|b| t >= b.t) {
                continue;
            }

            let normal = e1.cross(&e2);
            if normal.norm_squared() <= f64::EPSILON * f64::EPSILON {
                continue;
            }
            if backface_cull && normal.dot(dir) >= 0.0 {
                continue;
            }

            best = Some(RayHit { t, face: index, normal });
        }

        best
    }
}
