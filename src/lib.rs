//! # Seam
//!
//! Surfaces in periodic simulation cells, made renderable.
//!
//! A closed surface computed for an atomistic system with periodic boundary
//! conditions wraps around the simulation cell: its triangles may straddle a
//! periodic boundary, and the solid it encloses is cut open wherever it meets
//! one. Seam turns such a surface into triangle meshes that can be drawn
//! inside the cell:
//!
//! - **Half-edge mesh**: arena-based polygon mesh with O(1) adjacency queries
//! - **Surface clipping**: triangles crossing a periodic boundary are split
//!   so that every piece lies in the primary cell image
//! - **Caps**: the intersections of the surface with each periodic boundary
//!   are traced, clipped to the cell face and triangulated, closing the solid
//! - **Inside/outside test**: angle-weighted pseudo-normal classification of
//!   the cell corner when no contour crosses a boundary
//! - **Smoothing**: Taubin λ|μ smoothing that respects periodic boundaries
//!
//! ## Quick Start
//!
//! ```
//! use seam::prelude::*;
//! use nalgebra::Point3;
//!
//! // A triangle sticking out of the unit cell along x.
//! let vertices = vec![
//!     Point3::new(0.9, 0.5, 0.5),
//!     Point3::new(1.1, 0.4, 0.5),
//!     Point3::new(1.1, 0.6, 0.5),
//! ];
//! let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//! let cell = SimulationCell::unit([true, true, true]);
//!
//! let clipped = build_surface_mesh(&mesh, &cell).unwrap();
//! assert_eq!(clipped.face_count(), 3);
//! for p in clipped.vertices() {
//!     assert!(p.x >= 0.0 && p.x <= 1.0);
//! }
//! ```
//!
//! ## Display Geometry
//!
//! ```
//! use seam::prelude::*;
//!
//! // An empty surface that encloses everything caps every periodic face.
//! let surface = SurfaceMesh::new(HalfEdgeMesh::new()).with_completely_solid(true);
//! let cell = SimulationCell::unit([true, true, false]);
//!
//! let geometry = prepare_surface_geometry(&surface, &cell, &SurfaceDisplayOptions::default());
//! let cap = geometry.cap.unwrap();
//! assert!((cap.surface_area() - 4.0).abs() < 1e-12);
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod cell;
pub mod color;
pub mod display;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use seam::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{build_cap_mesh, build_surface_mesh, smooth_surface, SmoothOptions};
    pub use crate::cell::SimulationCell;
    pub use crate::color::{Color, ColorA};
    pub use crate::display::{prepare_surface_geometry, SurfaceDisplayOptions, SurfaceGeometry};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, FaceId, HalfEdgeId, HalfEdgeMesh, SurfaceMesh, TriMesh,
        TriMeshFace, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::{Matrix3, Point3, Vector3};

    /// Box straddling the x boundary of a sheared cell.
    #[test]
    fn test_pipeline_in_triclinic_cell() {
        let matrix = Matrix3::new(
            2.0, 0.5, 0.0, //
            0.0, 2.0, 0.0, //
            0.0, 0.0, 2.0,
        );
        let cell = SimulationCell::new(matrix, Point3::origin(), [true; 3]).unwrap();

        // Corners at reduced x in [-0.1, 0.1], y and z in [0.3, 0.5].
        let reduced: Vec<Point3<f64>> = (0..8)
            .map(|c| {
                Point3::new(
                    -0.1 + 0.2 * (c & 1) as f64,
                    0.3 + 0.2 * ((c >> 1) & 1) as f64,
                    0.3 + 0.2 * ((c >> 2) & 1) as f64,
                )
            })
            .collect();
        let vertices: Vec<Point3<f64>> = reduced.iter().map(|p| cell.reduced_to_absolute(p)).collect();
        let faces = [
            [0, 2, 3, 1],
            [4, 5, 7, 6],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 4, 6, 2],
            [1, 3, 7, 5],
        ];
        let mesh = build_from_polygons(&vertices, &faces).unwrap();
        let surface = SurfaceMesh::new(mesh);

        let geometry = prepare_surface_geometry(&surface, &cell, &SurfaceDisplayOptions::default());

        // Box surface area is unchanged by clipping.
        let face_area = |a: Vector3<f64>, b: Vector3<f64>| a.cross(&b).norm();
        let e = [
            cell.reduced_to_absolute_vector(&Vector3::new(0.2, 0.0, 0.0)),
            cell.reduced_to_absolute_vector(&Vector3::new(0.0, 0.2, 0.0)),
            cell.reduced_to_absolute_vector(&Vector3::new(0.0, 0.0, 0.2)),
        ];
        let expected = 2.0 * (face_area(e[0], e[1]) + face_area(e[1], e[2]) + face_area(e[2], e[0]));
        assert!((geometry.surface.surface_area() - expected).abs() < 1e-9);

        let bounds = cell.bounding_box();
        for p in geometry.surface.vertices() {
            let r = cell.absolute_to_reduced(p);
            assert!(r.x >= -1e-12 && r.x <= 1.0 + 1e-12, "vertex {:?} outside cell", p);
            assert!(p.x >= bounds.0.x - 1e-9 && p.x <= bounds.1.x + 1e-9);
        }

        // One cap square on each copy of the x boundary.
        let cap = geometry.cap.unwrap();
        assert!((cap.surface_area() - 2.0 * face_area(e[1], e[2])).abs() < 1e-9);
    }
}
