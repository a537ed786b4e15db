//! Traits for mesh types.

use crate::{Aabb, Triangle};
use nalgebra::Point3;

/// Read access to mesh connectivity.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangular faces.
    fn face_count(&self) -> usize;

    /// `true` when the mesh has no vertices or no faces.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Triangle for a face index, `None` when out of range.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Iterate over all faces as resolved triangles.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Types that can compute a bounding box.
pub trait MeshBounds {
    /// Axis-aligned bounding box; empty when there are no vertices.
    fn bounds(&self) -> Aabb;

    /// Bounding box, or `None` when empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }

    /// Center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
