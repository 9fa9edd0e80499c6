//! Periodic simulation cell.
//!
//! A [`SimulationCell`] is a parallelepiped spanned by three cell vectors and
//! anchored at an origin. Each of the three cell directions can independently
//! carry periodic boundary conditions (PBC).
//!
//! Positions inside the cell are frequently handled in *reduced* (fractional)
//! coordinates, where the cell maps onto the unit cube `[0,1)³`:
//!
//! ```text
//! reduced = M⁻¹ · (absolute − origin)
//! ```
//!
//! # Example
//!
//! ```
//! use seam::cell::SimulationCell;
//! use nalgebra::{Point3, Vector3};
//!
//! let cell = SimulationCell::orthorhombic(Vector3::new(10.0, 20.0, 5.0), [true, true, false]).unwrap();
//! let r = cell.absolute_to_reduced(&Point3::new(5.0, 5.0, 5.0));
//! assert!((r.x - 0.5).abs() < 1e-12);
//! assert!((r.y - 0.25).abs() < 1e-12);
//! assert!((r.z - 1.0).abs() < 1e-12);
//! ```

use nalgebra::{Matrix3, Point3, Vector3};

use crate::error::{MeshError, Result};

/// A periodic simulation cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationCell {
    /// Cell vectors stored as matrix columns.
    matrix: Matrix3<f64>,
    /// Inverse of `matrix`.
    inverse: Matrix3<f64>,
    /// Position of the cell corner with reduced coordinates (0,0,0).
    origin: Point3<f64>,
    /// Periodic boundary flags per cell direction.
    pbc: [bool; 3],
}

impl SimulationCell {
    /// Create a cell from three cell vectors (the columns of `cell_vectors`).
    ///
    /// Returns [`MeshError::SingularCell`] if the vectors are linearly dependent.
    pub fn new(cell_vectors: Matrix3<f64>, origin: Point3<f64>, pbc: [bool; 3]) -> Result<Self> {
        let inverse = cell_vectors
            .try_inverse()
            .filter(|m| m.iter().all(|c| c.is_finite()))
            .ok_or(MeshError::SingularCell {
                determinant: cell_vectors.determinant(),
            })?;

        Ok(Self {
            matrix: cell_vectors,
            inverse,
            origin,
            pbc,
        })
    }

    /// The unit cube at the origin. Reduced and absolute coordinates coincide.
    pub fn unit(pbc: [bool; 3]) -> Self {
        Self {
            matrix: Matrix3::identity(),
            inverse: Matrix3::identity(),
            origin: Point3::origin(),
            pbc,
        }
    }

    /// An axis-aligned box with the given edge lengths at the origin.
    pub fn orthorhombic(lengths: Vector3<f64>, pbc: [bool; 3]) -> Result<Self> {
        Self::new(Matrix3::from_diagonal(&lengths), Point3::origin(), pbc)
    }

    /// The cell vectors as matrix columns.
    #[inline]
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// The inverse cell matrix.
    #[inline]
    pub fn inverse_matrix(&self) -> &Matrix3<f64> {
        &self.inverse
    }

    /// The cell origin.
    #[inline]
    pub fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    /// The periodic boundary flags.
    #[inline]
    pub fn pbc_flags(&self) -> [bool; 3] {
        self.pbc
    }

    /// Whether the cell is periodic along the given dimension.
    #[inline]
    pub fn is_periodic(&self, dim: usize) -> bool {
        self.pbc[dim]
    }

    /// Set the periodic boundary flags.
    pub fn set_pbc_flags(&mut self, pbc: [bool; 3]) {
        self.pbc = pbc;
    }

    /// The (positive) cell volume.
    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    /// Convert a point from absolute to reduced coordinates.
    #[inline]
    pub fn absolute_to_reduced(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.inverse * (p - self.origin))
    }

    /// Convert a point from reduced to absolute coordinates.
    #[inline]
    pub fn reduced_to_absolute(&self, p: &Point3<f64>) -> Point3<f64> {
        self.origin + self.matrix * p.coords
    }

    /// Convert a vector from absolute to reduced coordinates.
    #[inline]
    pub fn absolute_to_reduced_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.inverse * v
    }

    /// Convert a vector from reduced to absolute coordinates.
    #[inline]
    pub fn reduced_to_absolute_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.matrix * v
    }

    /// Map a point into the primary cell image along all periodic directions.
    pub fn wrap_point(&self, p: &Point3<f64>) -> Point3<f64> {
        let reduced = self.absolute_to_reduced(p);
        let mut out = *p;
        for dim in 0..3 {
            if self.pbc[dim] {
                let s = reduced[dim].floor();
                if s != 0.0 {
                    out -= self.matrix.column(dim) * s;
                }
            }
        }
        out
    }

    /// Apply the minimum image convention to a vector.
    pub fn wrap_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let reduced = self.absolute_to_reduced_vector(v);
        let mut out = *v;
        for dim in 0..3 {
            if self.pbc[dim] {
                let s = (reduced[dim] + 0.5).floor();
                if s != 0.0 {
                    out -= self.matrix.column(dim) * s;
                }
            }
        }
        out
    }

    /// Whether a vector is longer than half the cell along a periodic direction.
    pub fn is_wrapped_vector(&self, v: &Vector3<f64>) -> bool {
        let reduced = self.absolute_to_reduced_vector(v);
        (0..3).any(|dim| self.pbc[dim] && reduced[dim].abs() >= 0.5)
    }

    /// Axis-aligned bounding box of the cell parallelepiped.
    pub fn bounding_box(&self) -> (Point3<f64>, Point3<f64>) {
        let mut min = self.origin;
        let mut max = self.origin;
        for corner in 1..8 {
            let r = Point3::new(
                (corner & 1) as f64,
                ((corner >> 1) & 1) as f64,
                ((corner >> 2) & 1) as f64,
            );
            let p = self.reduced_to_absolute(&r);
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        (min, max)
    }
}

const WRAP_SHIFT_LIMIT: f64 = 4.0;

/// Shift a reduced coordinate into `[0,1)` by whole cell images.
///
/// Coordinates already in range are returned bit-identical. Non-finite
/// values are returned unchanged. Offsets of more than a few images are
/// reduced with `floor` instead of repeated shifts.
#[inline]
pub fn wrap_unit(mut c: f64) -> f64 {
    if !c.is_finite() {
        return c;
    }
    if c.abs() > WRAP_SHIFT_LIMIT {
        c -= c.floor();
        return if c >= 1.0 { 0.0 } else { c };
    }
    while c < 0.0 {
        c += 1.0;
    }
    while c >= 1.0 {
        c -= 1.0;
    }
    c
}

/// Subtract the integer part of a reduced coordinate (`c - floor(c)`).
///
/// Unlike [`wrap_unit`], tiny negative values may round up to exactly 1.
#[inline]
pub fn wrap_floor(c: f64) -> f64 {
    let s = c.floor();
    if s != 0.0 {
        c - s
    } else {
        c
    }
}

/// Reduce a coordinate difference to its minimum image, `c - floor(c + 1/2)`.
#[inline]
pub fn minimum_image(c: f64) -> f64 {
    let s = (c + 0.5).floor();
    if s != 0.0 {
        c - s
    } else {
        c
    }
}
