//! Affine transforms as 4x4 matrices.

use mesh_types::{IndexedMesh, Point3};
use nalgebra::{Matrix4, Vector3};

/// A 3D affine transformation represented as a 4x4 matrix.
///
/// # Example
///
/// ```
/// use mesh_transform::Transform3D;
///
/// let scale = Transform3D::scale(0.18, 0.18, 0.30);
/// let place = Transform3D::translation(-6.5, -7.5, 3.0);
/// let combined = scale.then(&place);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    matrix: Matrix4<f64>,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create a new transformation from a 4x4 matrix.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// The identity transformation.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// A translation by `(tx, ty, tz)`.
    #[must_use]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self::from_translation(Vector3::new(tx, ty, tz))
    }

    /// A translation by a vector.
    #[must_use]
    pub fn from_translation(v: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&v),
        }
    }

    /// A per-axis scale about the origin.
    #[must_use]
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)),
        }
    }

    /// The underlying 4x4 matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Compose with another transformation: `self` is applied first.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// The inverse transformation, if the matrix is invertible.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// Transform a point (translation applies).
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    /// Transform every vertex of `mesh` in place.
    ///
    /// Faces are untouched, so a transform with negative determinant flips
    /// the orientation of the solid.
    pub fn apply_in_place(&self, mesh: &mut IndexedMesh) {
        for vertex in &mut mesh.vertices {
            vertex.position = self.transform_point(&vertex.position);
        }
    }

    /// Return a transformed copy of `mesh`.
    #[must_use]
    pub fn apply_to_mesh(&self, mesh: &IndexedMesh) -> IndexedMesh {
        let mut result = mesh.clone();
        self.apply_in_place(&mut result);
        result
    }
}
