//! Geometry algorithms for surfaces in periodic cells.
//!
//! - **Surface**: split triangles at periodic boundaries ([`surface`])
//! - **Contours**: trace and clip surface/boundary intersections ([`contour`])
//! - **Classification**: inside/outside test for the cell corner ([`classify`])
//! - **Tessellation**: triangulate cap polygons ([`tessellate`])
//! - **Caps**: close the surface at periodic boundaries ([`cap`])
//! - **Smoothing**: periodic Taubin smoothing ([`smooth`])

pub mod cap;
pub mod classify;
pub mod contour;
pub mod smooth;
pub mod surface;
pub mod tessellate;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cap::build_cap_mesh;
pub use smooth::{smooth_surface, SmoothOptions};
pub use surface::build_surface_mesh;
