//! Render-ready geometry of a surface in a periodic cell.
//!
//! [`prepare_surface_geometry`] turns a [`SurfaceMesh`] into the triangle
//! meshes and colors a renderer consumes: the surface clipped at periodic
//! boundaries and, optionally, the caps closing it there.

use log::warn;

use crate::algo::{build_cap_mesh, build_surface_mesh};
use crate::cell::SimulationCell;
use crate::color::{Color, ColorA};
use crate::mesh::{SurfaceMesh, TriMesh};

/// How a surface is displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDisplayOptions {
    /// Color of the surface.
    pub surface_color: Color,

    /// Color of the caps at periodic boundaries.
    pub cap_color: Color,

    /// Whether caps are generated.
    pub show_cap: bool,

    /// Whether surface normals are interpolated across faces.
    pub smooth_shading: bool,

    /// Transparency of the surface, `0` is opaque.
    pub surface_transparency: f64,

    /// Transparency of the caps, `0` is opaque.
    pub cap_transparency: f64,
}

impl Default for SurfaceDisplayOptions {
    fn default() -> Self {
        Self {
            surface_color: Color::WHITE,
            cap_color: Color::new(0.8, 0.8, 1.0),
            show_cap: true,
            smooth_shading: true,
            surface_transparency: 0.0,
            cap_transparency: 0.0,
        }
    }
}

impl SurfaceDisplayOptions {
    pub fn with_surface_color(mut self, color: Color) -> Self {
        self.surface_color = color;
        self
    }

    pub fn with_cap_color(mut self, color: Color) -> Self {
        self.cap_color = color;
        self
    }

    pub fn with_show_cap(mut self, show: bool) -> Self {
        self.show_cap = show;
        self
    }

    pub fn with_smooth_shading(mut self, smooth: bool) -> Self {
        self.smooth_shading = smooth;
        self
    }

    /// Set the surface transparency, clamped to `[0, 1]`.
    pub fn with_surface_transparency(mut self, transparency: f64) -> Self {
        self.surface_transparency = clamp_unit(transparency);
        self
    }

    /// Set the cap transparency, clamped to `[0, 1]`.
    pub fn with_cap_transparency(mut self, transparency: f64) -> Self {
        self.cap_transparency = clamp_unit(transparency);
        self
    }

    /// Surface color with alpha `1 - surface_transparency`.
    pub fn surface_color_rgba(&self) -> ColorA {
        self.surface_color.with_alpha(1.0 - clamp_unit(self.surface_transparency))
    }

    /// Cap color with alpha `1 - cap_transparency`.
    pub fn cap_color_rgba(&self) -> ColorA {
        self.cap_color.with_alpha(1.0 - clamp_unit(self.cap_transparency))
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Triangle meshes and colors for rendering a surface.
#[derive(Debug, Clone, Default)]
pub struct SurfaceGeometry {
    /// The surface, clipped to the primary cell image.
    pub surface: TriMesh,
    pub surface_color: ColorA,
    /// The caps, if enabled.
    pub cap: Option<TriMesh>,
    pub cap_color: ColorA,
}

/// Build the render geometry of `surface` inside `cell`.
///
/// If the surface cannot be clipped at the periodic boundaries (the cell is
/// too small for it), a warning is logged and both meshes are empty. A cap
/// that fails to build is likewise replaced by an empty mesh.
///
/// # Example
///
/// ```
/// use seam::cell::SimulationCell;
/// use seam::display::{prepare_surface_geometry, SurfaceDisplayOptions};
/// use seam::mesh::{HalfEdgeMesh, SurfaceMesh};
///
/// let surface = SurfaceMesh::new(HalfEdgeMesh::new()).with_completely_solid(true);
/// let cell = SimulationCell::unit([true, true, true]);
///
/// let geometry = prepare_surface_geometry(&surface, &cell, &SurfaceDisplayOptions::default());
/// assert!(geometry.surface.is_empty());
/// assert_eq!(geometry.cap.map(|c| c.face_count()), Some(12));
/// ```
pub fn prepare_surface_geometry(
    surface: &SurfaceMesh,
    cell: &SimulationCell,
    options: &SurfaceDisplayOptions,
) -> SurfaceGeometry {
    let surface_color = options.surface_color_rgba();
    let cap_color = options.cap_color_rgba();

    let mut mesh = match build_surface_mesh(surface.mesh(), cell) {
        Ok(mesh) => mesh,
        Err(err) => {
            warn!("cannot build surface geometry, rendering empty mesh: {}", err);
            return SurfaceGeometry {
                surface: TriMesh::new(),
                surface_color,
                cap: options.show_cap.then(TriMesh::new),
                cap_color,
            };
        }
    };

    if options.smooth_shading {
        for face in mesh.faces_mut() {
            face.set_smoothing_groups(1);
        }
    }

    let cap = options.show_cap.then(|| {
        build_cap_mesh(surface.mesh(), cell, surface.is_completely_solid()).unwrap_or_else(|err| {
            warn!("cannot build cap geometry, rendering empty cap: {}", err);
            TriMesh::new()
        })
    });

    SurfaceGeometry {
        surface: mesh,
        surface_color,
        cap,
        cap_color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::slab;
    use crate::mesh::build_from_triangles;
    use nalgebra::Point3;

    #[test]
    fn test_default_options() {
        let options = SurfaceDisplayOptions::default();
        assert_eq!(options.surface_color, Color::new(1.0, 1.0, 1.0));
        assert_eq!(options.cap_color, Color::new(0.8, 0.8, 1.0));
        assert!(options.show_cap);
        assert!(options.smooth_shading);
        assert_eq!(options.surface_color_rgba(), ColorA::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(options.cap_color_rgba().a, 1.0);
    }

    #[test]
    fn test_transparency() {
        let options = SurfaceDisplayOptions::default()
            .with_surface_transparency(0.25)
            .with_cap_transparency(3.0);
        assert!((options.surface_color_rgba().a - 0.75).abs() < 1e-12);
        assert_eq!(options.cap_color_rgba().a, 0.0);

        let raw = SurfaceDisplayOptions {
            surface_transparency: -1.0,
            cap_transparency: f64::NAN,
            ..Default::default()
        };
        assert_eq!(raw.surface_color_rgba().a, 1.0);
        assert_eq!(raw.cap_color_rgba().a, 1.0);
    }

    #[test]
    fn test_slab_geometry() {
        let surface = SurfaceMesh::new(slab(0.3, 0.7));
        let cell = SimulationCell::unit([true, true, false]);
        let geometry = prepare_surface_geometry(&surface, &cell, &SurfaceDisplayOptions::default());

        assert!((geometry.surface.surface_area() - 2.0).abs() < 1e-9);
        assert!(geometry.surface.faces().iter().all(|f| f.smoothing_groups() == 1));
        let cap = geometry.cap.unwrap();
        assert!((cap.surface_area() - 1.6).abs() < 1e-9);
        assert_eq!(geometry.cap_color, ColorA::new(0.8, 0.8, 1.0, 1.0));
    }

    #[test]
    fn test_flat_shading_without_cap() {
        let surface = SurfaceMesh::new(slab(0.3, 0.7));
        let cell = SimulationCell::unit([true, true, false]);
        let options = SurfaceDisplayOptions::default()
            .with_smooth_shading(false)
            .with_show_cap(false);
        let geometry = prepare_surface_geometry(&surface, &cell, &options);

        assert!(!geometry.surface.is_empty());
        assert!(geometry.surface.faces().iter().all(|f| f.smoothing_groups() == 0));
        assert!(geometry.cap.is_none());
    }

    #[test]
    fn test_failure_renders_empty_meshes() {
        let vertices = vec![
            Point3::new(0.1, 0.1, 0.5),
            Point3::new(0.7, 0.5, 0.5),
            Point3::new(0.4, 0.9, 0.5),
        ];
        let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let surface = SurfaceMesh::new(mesh).with_completely_solid(true);
        let cell = SimulationCell::unit([true, false, false]);
        let options = SurfaceDisplayOptions::default().with_surface_color(Color::new(1.0, 0.0, 0.0));

        let geometry = prepare_surface_geometry(&surface, &cell, &options);
        assert!(geometry.surface.is_empty());
        assert!(geometry.cap.as_ref().is_some_and(|c| c.is_empty()));
        assert_eq!(geometry.surface_color, ColorA::new(1.0, 0.0, 0.0, 1.0));
    }
}
