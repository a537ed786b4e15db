//! Mesh vertices.

use nalgebra::Point3;

/// A mesh vertex.
///
/// Glyph and fixture meshes carry no per-vertex attributes, so a vertex is
/// just its position. Normals are derived from face winding when needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space.
    pub position: Point3<f64>,
}

impl Vertex {
    /// Create a vertex at the given position.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Create a vertex from raw coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Vertex;
    ///
    /// let v = Vertex::from_coords(1.0, 2.0, 3.0);
    /// assert!((v.position.y - 2.0).abs() < f64::EPSILON);
    /// ```
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<[f64; 3]> for Vertex {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::from_coords(x, y, z)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn conversions_agree() {
        let a = Vertex::from(Point3::new(1.0, 2.0, 3.0));
        let b = Vertex::from([1.0, 2.0, 3.0]);
        assert_eq!(a, b);
        assert_eq!(a.position.z, 3.0);
    }
}
