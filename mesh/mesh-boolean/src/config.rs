//! Tolerances, cleanup and validation settings for the boolean engine.
//!
//! Side-of-plane decisions are exact (`orient3d`); the tolerances here only
//! widen the "on the plane" and "on the surface" bands so that faces which
//! are meant to touch are treated as touching.
//!
//! | Preset | Weld | Plane band | Surface band | Typical input |
//! |--------|------|------------|--------------|---------------|
//! | [`BooleanConfig::default()`] | 1e-6 | 1e-9 | 1e-7 | millimetre parts, STL round trips |
//! | [`BooleanConfig::for_cad()`] | 1e-8 | 1e-11 | 1e-9 | exact CAD exports |
//! | [`BooleanConfig::strict()`] | 1e-10 | 1e-13 | 1e-11 | synthetic geometry |
//!
//! ```
//! use mesh_boolean::{BooleanConfig, CleanupLevel};
//!
//! let config = BooleanConfig::default()
//!     .with_cleanup(CleanupLevel::Fast)
//!     .with_parallel(false);
//! assert_eq!(config.cleanup, CleanupLevel::Fast);
//! ```

use std::fmt;

/// How much the split pieces are stitched back together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupLevel {
    /// Raw pieces, fan-triangulated. Every piece keeps its own corners.
    None,

    /// Weld coincident corners and drop zero-area triangles.
    Fast,

    /// `Fast`, then insert welded vertices that lie on piece edges so both
    /// sides of a cut seam share them. Needed for watertight output.
    #[default]
    Full,
}

/// Boolean engine settings.
#[derive(Debug, Clone)]
pub struct BooleanConfig {
    /// Corners closer than this are welded during cleanup.
    pub vertex_weld_tolerance: f64,

    /// Half-width of the band around a support plane inside which a point
    /// counts as lying on the plane.
    pub plane_tolerance: f64,

    /// Distance at which a piece centroid is on the other mesh's surface.
    /// Also the ray-casting epsilon.
    pub classification_tolerance: f64,

    /// Result cleanup.
    pub cleanup: CleanupLevel,

    /// Reject empty, degenerate and open inputs before running.
    pub validate_inputs: bool,

    /// Split and classify faces on the rayon pool.
    pub parallel: bool,

    /// Triangles per BVH leaf.
    pub bvh_leaf_size: usize,
}

impl Default for BooleanConfig {
    fn default() -> Self {
        Self {
            vertex_weld_tolerance: 1e-6,
            plane_tolerance: 1e-9,
            classification_tolerance: 1e-7,
            cleanup: CleanupLevel::default(),
            validate_inputs: true,
            parallel: true,
            bvh_leaf_size: 8,
        }
    }
}

impl BooleanConfig {
    /// Tighter bands for geometry that was never rounded through f32.
    ///
    /// ```
    /// use mesh_boolean::BooleanConfig;
    ///
    /// let cad = BooleanConfig::for_cad();
    /// assert!(cad.plane_tolerance < BooleanConfig::default().plane_tolerance);
    /// ```
    #[must_use]
    pub fn for_cad() -> Self {
        Self {
            vertex_weld_tolerance: 1e-8,
            plane_tolerance: 1e-11,
            classification_tolerance: 1e-9,
            ..Self::default()
        }
    }

    /// The narrowest bands. Noisy input may come back with slivers.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            vertex_weld_tolerance: 1e-10,
            plane_tolerance: 1e-13,
            classification_tolerance: 1e-11,
            bvh_leaf_size: 4,
            ..Self::default()
        }
    }

    /// Use `level` for result cleanup.
    #[must_use]
    pub fn with_cleanup(mut self, level: CleanupLevel) -> Self {
        self.cleanup = level;
        self
    }

    /// Turn the rayon path on or off. Output does not depend on it.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Turn input validation on or off.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_inputs = validate;
        self
    }

    /// Weld distance; the sign is ignored.
    #[must_use]
    pub fn with_vertex_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.vertex_weld_tolerance = tolerance.abs();
        self
    }

    /// On-plane band half-width; the sign is ignored.
    #[must_use]
    pub fn with_plane_tolerance(mut self, tolerance: f64) -> Self {
        self.plane_tolerance = tolerance.abs();
        self
    }

    /// Triangles per BVH leaf, at least one.
    ///
    /// ```
    /// use mesh_boolean::BooleanConfig;
    ///
    /// assert_eq!(BooleanConfig::default().with_bvh_leaf_size(0).bvh_leaf_size, 1);
    /// ```
    #[must_use]
    pub fn with_bvh_leaf_size(mut self, size: usize) -> Self {
        self.bvh_leaf_size = size.max(1);
        self
    }
}

/// Which pieces survive, by origin and relation to the other mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// A outside B, B outside A, and shared faces facing the same way.
    Union,

    /// A outside B, B inside A turned inside out, and A faces lying on B
    /// with opposite orientation.
    Difference,

    /// A inside B, B inside A, and shared faces facing the same way.
    Intersection,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Union => "union",
            Self::Difference => "difference",
            Self::Intersection => "intersection",
        })
    }
}
