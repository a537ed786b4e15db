//! Core mesh types shared by the fixture workspace.
//!
//! - [`Vertex`] - a position in 3D space
//! - [`IndexedMesh`] - a triangle mesh with indexed vertices
//! - [`Triangle`] - a triangle with resolved vertex positions
//! - [`Aabb`] - axis-aligned bounding box
//!
//! # Units
//!
//! Coordinates are `f64` and unit-agnostic. The fixture crates treat them
//! as millimeters.
//!
//! # Coordinate System
//!
//! Right-handed: X is width, Y is length (depth), Z is height. Faces wind
//! counter-clockwise when viewed from outside, so normals point outward by
//! the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshTopology, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use mesh::{IndexedMesh, cuboid, unit_cube};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::Vertex;

pub use nalgebra::{Point3, Vector3};
