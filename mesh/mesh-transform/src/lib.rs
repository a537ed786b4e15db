//! Measurement and placement of meshes.
//!
//! This crate provides:
//! - Bounding-box measurement ([`measure`])
//! - Height-banded anisotropic scaling ([`scale_banded`])
//! - Rigid translation ([`translate`])
//! - Affine transforms as 4x4 matrices ([`Transform3D`])
//!
//! Scaling is about the origin, so the order of scaling and translation
//! matters: scale first to keep the translation offset exact.
//!
//! # Example
//!
//! ```
//! use mesh_transform::{BandedScale, measure, scale_banded, translate};
//! use mesh_types::{cuboid, Point3, Vector3};
//!
//! let mut glyph = cuboid(Point3::origin(), Point3::new(10.0, 14.0, 10.0));
//! scale_banded(&mut glyph, &BandedScale::uniform_xy(0.18, 0.30));
//! translate(&mut glyph, Vector3::new(-6.5, -7.5, 3.0));
//!
//! let dims = measure(&glyph);
//! assert!((dims.width - 1.8).abs() < 1e-9);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod measure;
mod placement;
mod transform;

pub use measure::{Dimensions, measure};
pub use placement::{BandedScale, scale_banded, translate};
pub use transform::Transform3D;
