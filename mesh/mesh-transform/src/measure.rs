//! Bounding-box measurement.

use mesh_types::{IndexedMesh, MeshBounds};

/// Extents of a mesh's axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub length: f64,
    /// Extent along Z.
    pub height: f64,
}

/// Measure the bounding-box extents of `mesh`.
///
/// An empty mesh measures zero on every axis.
///
/// # Example
///
/// ```
/// use mesh_transform::measure;
/// use mesh_types::{cuboid, Point3};
///
/// let block = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 14.0, 2.0));
/// let dims = measure(&block);
/// assert!((dims.length - 14.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn measure(mesh: &IndexedMesh) -> Dimensions {
    let bounds = mesh.bounds();
    if bounds.is_empty() {
        return Dimensions::default();
    }
    let size = bounds.size();
    Dimensions {
        width: size.x,
        length: size.y,
        height: size.z,
    }
}
