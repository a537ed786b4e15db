//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshTopology, Triangle, Vertex};
use nalgebra::Point3;

/// An indexed triangle mesh.
///
/// Faces reference `vertices` by index and wind counter-clockwise when seen
/// from outside. Glyph tags are built by [`IndexedMesh::merge`]-ing many small
/// meshes into one, so indices are plain `u32` offsets with no sharing across
/// merged parts.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, MeshTopology, Vertex};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Vertex::from_coords(0.0, 0.0, 0.0),
///         Vertex::from_coords(1.0, 0.0, 0.0),
///         Vertex::from_coords(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
/// assert_eq!(mesh.vertex_count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle faces as indices into `vertices`.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create an empty mesh with reserved capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Position of a vertex.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn position(&self, index: u32) -> Point3<f64> {
        self.vertices[index as usize].position
    }

    /// Iterate over vertex positions.
    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.vertices.iter().map(|v| &v.position)
    }

    /// Signed volume via the divergence theorem.
    ///
    /// Positive for a closed mesh with outward winding, negative when
    /// inside-out, meaningless for open meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|t| t.v0.coords.dot(&t.v1.coords.cross(&t.v2.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Absolute volume.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|t| t.area()).sum()
    }

    /// Reverse the winding of every face.
    pub fn flip_normals(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
    }

    /// Append another mesh, offsetting its face indices.
    ///
    /// Vertices are not deduplicated: the vertex count of the result is the
    /// sum of both vertex counts.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: indices are u32, meshes beyond 4B vertices are unsupported
    pub fn merge(&mut self, other: &Self) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|&[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let &[a, b, c] = self.faces.get(face_index)?;
        Some(Triangle::new(
            self.vertices.get(a as usize)?.position,
            self.vertices.get(b as usize)?.position,
            self.vertices.get(c as usize)?.position,
        ))
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        self.faces.iter().map(|&[a, b, c]| {
            Triangle::new(self.position(a), self.position(b), self.position(c))
        })
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions())
    }
}

/// Axis-aligned box mesh spanning `min..max`, 8 vertices and 12 faces with
/// outward winding.
#[must_use]
pub fn cuboid(min: Point3<f64>, max: Point3<f64>) -> IndexedMesh {
    let corner = |x: bool, y: bool, z: bool| {
        Vertex::from_coords(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };
    let vertices = vec![
        corner(false, false, false),
        corner(true, false, false),
        corner(true, true, false),
        corner(false, true, false),
        corner(false, false, true),
        corner(true, false, true),
        corner(true, true, true),
        corner(false, true, true),
    ];
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [3, 7, 6],
        [3, 6, 2],
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
    ];
    IndexedMesh::from_parts(vertices, faces)
}

/// Unit cube from the origin to `(1, 1, 1)`.
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
}
