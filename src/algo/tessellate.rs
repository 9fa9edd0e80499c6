//! Triangulation of cap polygons.
//!
//! A cap polygon is a set of contours in unit-square coordinates that is
//! filled with the odd winding rule: a point is covered if it lies inside an
//! odd number of contours. Contours are fed through [`PolygonTessellator`]
//! one vertex at a time and the triangles come back from `end_polygon`.
//!
//! [`EarcutTessellator`] triangulates with `earcutr`. [`CapPolygonTessellator`]
//! wraps any tessellator and writes every triangle to both periodic copies of
//! a boundary plane in a [`TriMesh`].

use log::{trace, warn};
use nalgebra::{Point2, Point3};

use crate::mesh::TriMesh;

use super::contour::Contour;

/// A 2D triangle, counter-clockwise.
pub type Triangle2 = [Point2<f64>; 3];

const AREA_EPSILON: f64 = 1e-14;

/// Streaming interface of a polygon triangulator.
pub trait PolygonTessellator {
    /// Starts a new polygon, discarding any unfinished one.
    fn begin_polygon(&mut self);
    /// Starts a new contour of the current polygon.
    fn begin_contour(&mut self);
    /// Appends a vertex to the current contour.
    fn vertex(&mut self, p: Point2<f64>);
    /// Finishes the current contour.
    fn end_contour(&mut self);
    /// Finishes the polygon and returns its triangulation.
    fn end_polygon(&mut self) -> Vec<Triangle2>;
}

/// Ear-clipping tessellator with odd-winding hole nesting.
#[derive(Debug, Clone, Default)]
pub struct EarcutTessellator {
    contours: Vec<Contour>,
    current: Contour,
}

impl EarcutTessellator {
    /// Create a tessellator with no pending contours.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PolygonTessellator for EarcutTessellator {
    fn begin_polygon(&mut self) {
        self.contours.clear();
        self.current.clear();
    }

    fn begin_contour(&mut self) {
        self.current.clear();
    }

    fn vertex(&mut self, p: Point2<f64>) {
        if self.current.last() != Some(&p) {
            self.current.push(p);
        }
    }

    fn end_contour(&mut self) {
        let mut ring = std::mem::take(&mut self.current);
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() >= 3 && signed_area(&ring).abs() > AREA_EPSILON {
            self.contours.push(ring);
        } else {
            trace!("dropped degenerate contour with {} points", ring.len());
        }
    }

    fn end_polygon(&mut self) -> Vec<Triangle2> {
        let rings = std::mem::take(&mut self.contours);
        triangulate_odd_winding(&rings)
    }
}

/// Triangulates `rings` as one polygon under the odd winding rule.
///
/// Rings must not intersect each other. A ring nested at even depth is an
/// outer boundary; one at odd depth is a hole of its innermost container.
fn triangulate_odd_winding(rings: &[Contour]) -> Vec<Triangle2> {
    let n = rings.len();
    let containers: Vec<Vec<usize>> = (0..n)
        .map(|i| (0..n).filter(|&j| j != i && ring_inside(&rings[i], &rings[j])).collect())
        .collect();

    let mut triangles = Vec::new();
    for outer in (0..n).filter(|&i| containers[i].len() % 2 == 0) {
        let depth = containers[outer].len();
        let holes: Vec<usize> = (0..n)
            .filter(|&h| containers[h].len() == depth + 1 && containers[h].contains(&outer))
            .collect();

        let mut points: Vec<Point2<f64>> = rings[outer].clone();
        let mut hole_indices = Vec::with_capacity(holes.len());
        for &h in &holes {
            hole_indices.push(points.len());
            points.extend_from_slice(&rings[h]);
        }
        let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();

        let indices = match earcutr::earcut(&flat, &hole_indices, 2) {
            Ok(indices) => indices,
            Err(err) => {
                warn!("cap triangulation failed for a ring with {} holes: {:?}", holes.len(), err);
                continue;
            }
        };

        for tri in indices.chunks_exact(3) {
            let (a, b, c) = (points[tri[0]], points[tri[1]], points[tri[2]]);
            let area = (b - a).perp(&(c - a));
            if area > AREA_EPSILON {
                triangles.push([a, b, c]);
            } else if area < -AREA_EPSILON {
                triangles.push([a, c, b]);
            }
        }
    }
    triangles
}

/// Twice the signed area of a polygon, positive when counter-clockwise.
fn signed_area(ring: &[Point2<f64>]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (p, q) = (ring[i], ring[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum()
}

/// Whether ring `inner` lies inside ring `outer`, judged by its first
/// vertex not on `outer`'s boundary.
fn ring_inside(inner: &[Point2<f64>], outer: &[Point2<f64>]) -> bool {
    inner
        .iter()
        .find(|p| !on_boundary(p, outer))
        .is_some_and(|p| point_in_ring(p, outer))
}

fn point_in_ring(p: &Point2<f64>, ring: &[Point2<f64>]) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn on_boundary(p: &Point2<f64>, ring: &[Point2<f64>]) -> bool {
    let n = ring.len();
    (0..n).any(|i| {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let ab = b - a;
        let len_sq = ab.norm_squared();
        let t = if len_sq > 0.0 { ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0) } else { 0.0 };
        (a + ab * t - p).norm_squared() < 1e-20
    })
}

/// Writes the triangles of a cap polygon into a [`TriMesh`].
///
/// Each triangle is emitted on both periodic copies of the boundary plane of
/// dimension `dim`, in reduced coordinates: once at `reduced[dim] = 1` facing
/// `+dim`, and once at `reduced[dim] = 0` with reversed winding. The 2D
/// coordinates map to dimensions `(dim + 1, dim + 2)` (mod 3).
#[derive(Debug)]
pub struct CapPolygonTessellator<'a, T: PolygonTessellator = EarcutTessellator> {
    output: &'a mut TriMesh,
    dim: usize,
    inner: T,
}

impl<'a> CapPolygonTessellator<'a, EarcutTessellator> {
    /// Cap boundary `dim` into `output` using ear clipping.
    pub fn new(output: &'a mut TriMesh, dim: usize) -> Self {
        Self::with_tessellator(output, dim, EarcutTessellator::new())
    }
}

impl<'a, T: PolygonTessellator> CapPolygonTessellator<'a, T> {
    /// Cap boundary `dim` into `output` using a custom 2D tessellator.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= 3`.
    pub fn with_tessellator(output: &'a mut TriMesh, dim: usize, inner: T) -> Self {
        assert!(dim < 3, "dimension {} out of range", dim);
        Self { output, dim, inner }
    }

    /// Boundary dimension this tessellator caps.
    pub fn dim(&self) -> usize {
        self.dim
    }

    fn lift(&self, p: &Point2<f64>, layer: f64) -> Point3<f64> {
        let mut q = Point3::origin();
        q[self.dim] = layer;
        q[(self.dim + 1) % 3] = p.x;
        q[(self.dim + 2) % 3] = p.y;
        q
    }

    fn emit(&mut self, tri: &Triangle2, layer: f64, flip: bool) {
        let order = if flip { [0, 2, 1] } else { [0, 1, 2] };
        let mut ids = [0; 3];
        for (id, k) in ids.iter_mut().zip(order) {
            let p = self.lift(&tri[k], layer);
            *id = self.output.add_vertex(p);
        }
        self.output.add_triangle(ids[0], ids[1], ids[2]);
    }
}

impl<T: PolygonTessellator> PolygonTessellator for CapPolygonTessellator<'_, T> {
    fn begin_polygon(&mut self) {
        self.inner.begin_polygon();
    }

    fn begin_contour(&mut self) {
        self.inner.begin_contour();
    }

    fn vertex(&mut self, p: Point2<f64>) {
        self.inner.vertex(p);
    }

    fn end_contour(&mut self) {
        self.inner.end_contour();
    }

    fn end_polygon(&mut self) -> Vec<Triangle2> {
        let triangles = self.inner.end_polygon();
        for tri in &triangles {
            self.emit(tri, 1.0, false);
            self.emit(tri, 0.0, true);
        }
        triangles
    }
}
