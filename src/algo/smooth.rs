//! Smoothing of surfaces embedded in a periodic cell.
//!
//! [`smooth_surface`] applies Taubin's λ|μ smoothing, which alternates a
//! shrinking Laplacian step (λ > 0) with an inflating one (μ < 0) so that
//! low-frequency shape is kept while noise is removed:
//!
//! > G. Taubin, *A Signal Processing Approach to Fair Surface Design*,
//! > SIGGRAPH 95 Conference Proceedings, pp. 351-358.
//!
//! Edge vectors are reduced to their minimum image along periodic cell
//! directions, so vertices on opposite sides of a boundary are treated as
//! neighbors across it. Positions are not wrapped afterwards.
//!
//! # Example
//!
//! ```
//! use seam::algo::smooth::{smooth_surface, SmoothOptions};
//! use seam::cell::SimulationCell;
//! use seam::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.2, 0.2, 0.2),
//!     Point3::new(0.4, 0.2, 0.2),
//!     Point3::new(0.3, 0.4, 0.2),
//!     Point3::new(0.3, 0.3, 0.5),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
//! let cell = SimulationCell::unit([true, true, true]);
//!
//! let options = SmoothOptions::default().with_iterations(4);
//! smooth_surface(&mut mesh, &cell, &options).unwrap();
//! ```

use log::debug;
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::cell::SimulationCell;
use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, VertexId};

/// Options for [`smooth_surface`].
#[derive(Debug, Clone)]
pub struct SmoothOptions {
    /// Number of λ|μ iteration pairs.
    pub iterations: usize,

    /// Prefactor of the shrinking step, in `(0, 1]`.
    pub lambda: f64,

    /// Pass-band frequency; determines `μ = 1 / (k_pb - 1/λ)`.
    pub k_pb: f64,

    /// Whether to compute displacements in parallel (default: true).
    pub parallel: bool,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            iterations: 8,
            lambda: 0.5,
            k_pb: 0.1,
            parallel: true,
        }
    }
}

impl SmoothOptions {
    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the prefactor of the shrinking step.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Set the pass-band frequency.
    pub fn with_k_pb(mut self, k_pb: f64) -> Self {
        self.k_pb = k_pb;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Prefactor of the inflating step.
    pub fn mu(&self) -> f64 {
        1.0 / (self.k_pb - 1.0 / self.lambda)
    }

    fn validate(&self) -> Result<()> {
        if !(self.lambda > 0.0 && self.lambda <= 1.0) {
            return Err(MeshError::invalid_param("lambda", self.lambda, "must be in (0, 1]"));
        }
        if !(self.k_pb >= 0.0 && self.k_pb < 1.0) {
            return Err(MeshError::invalid_param("k_pb", self.k_pb, "must be in [0, 1)"));
        }
        Ok(())
    }
}

/// Smooth a surface mesh with Taubin's λ|μ scheme.
///
/// Returns [`MeshError::InvalidParameter`] for out-of-range options; the mesh
/// is left untouched in that case.
pub fn smooth_surface(mesh: &mut HalfEdgeMesh, cell: &SimulationCell, options: &SmoothOptions) -> Result<()> {
    options.validate()?;
    if options.iterations == 0 {
        return Ok(());
    }

    let mu = options.mu();
    debug!(
        "smoothing {} vertices: {} iterations, lambda {}, mu {:.4}",
        mesh.num_vertices(),
        options.iterations,
        options.lambda,
        mu
    );
    for _ in 0..options.iterations {
        smooth_mesh_iteration(mesh, cell, options.lambda, options.parallel);
        smooth_mesh_iteration(mesh, cell, mu, options.parallel);
    }
    Ok(())
}

/// Move every vertex by `prefactor` times the mean of its edge vectors.
///
/// Displacements are computed for all vertices first and applied afterwards.
/// Vertices without edges stay in place.
pub fn smooth_mesh_iteration(mesh: &mut HalfEdgeMesh, cell: &SimulationCell, prefactor: f64, parallel: bool) {
    let n = mesh.num_vertices();
    let displacements: Vec<Vector3<f64>> = {
        let mesh = &*mesh;
        let compute = |i: usize| vertex_displacement(mesh, cell, VertexId::new(i), prefactor);
        if parallel {
            (0..n).into_par_iter().map(compute).collect()
        } else {
            (0..n).map(compute).collect()
        }
    };

    for (i, d) in displacements.into_iter().enumerate() {
        let v = VertexId::new(i);
        let p = *mesh.position(v) + d;
        mesh.set_position(v, p);
    }
}

fn vertex_displacement(mesh: &HalfEdgeMesh, cell: &SimulationCell, v: VertexId, prefactor: f64) -> Vector3<f64> {
    let count = mesh.vertex_edge_count(v);
    if count == 0 {
        return Vector3::zeros();
    }
    let p = mesh.position(v);
    let sum: Vector3<f64> = mesh
        .vertex_edges(v)
        .map(|e| cell.wrap_vector(&(mesh.position(mesh.vertex2(e)) - p)))
        .sum();
    sum * (prefactor / count as f64)
}
