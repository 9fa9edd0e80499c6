//! Surface data object.

use super::halfedge::HalfEdgeMesh;

/// A closed surface embedded in a periodic cell.
///
/// An empty mesh is ambiguous: the region it would enclose is either the
/// whole cell or nothing. `is_completely_solid` resolves that case.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMesh {
    mesh: HalfEdgeMesh,
    is_completely_solid: bool,
}

impl SurfaceMesh {
    pub fn new(mesh: HalfEdgeMesh) -> Self {
        Self {
            mesh,
            is_completely_solid: false,
        }
    }

    /// Set the classification used when the mesh has no faces.
    pub fn with_completely_solid(mut self, solid: bool) -> Self {
        self.is_completely_solid = solid;
        self
    }

    #[inline]
    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }

    #[inline]
    pub fn mesh_mut(&mut self) -> &mut HalfEdgeMesh {
        &mut self.mesh
    }

    #[inline]
    pub fn is_completely_solid(&self) -> bool {
        self.is_completely_solid
    }

    pub fn set_completely_solid(&mut self, solid: bool) {
        self.is_completely_solid = solid;
    }
}

impl From<HalfEdgeMesh> for SurfaceMesh {
    fn from(mesh: HalfEdgeMesh) -> Self {
        Self::new(mesh)
    }
}
