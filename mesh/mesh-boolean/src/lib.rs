//! Boolean operations (CSG) for triangle meshes.
//!
//! This crate provides constructive solid geometry operations for combining
//! closed triangle meshes: union (A ∪ B), intersection (A ∩ B), and
//! difference (A - B).
//!
//! # Pipeline
//!
//! 1. **Split**: every face of each mesh is cut into convex pieces along the
//!    other mesh's surface, using exact orientation predicates with a small
//!    tolerance band around each plane.
//! 2. **Classify**: each piece is inside, outside, or lying on the other
//!    surface (facing the same or the opposite way).
//! 3. **Select**: the operation keeps the pieces it needs; pieces of B are
//!    reversed for a difference.
//! 4. **Reconstruct**: pieces are welded, T-junctions along the cut curve
//!    are repaired, and polygons are triangulated.
//!
//! With the default configuration the result of two closed inputs is
//! closed; [`BooleanStats::open_edges`] reports otherwise.
//!
//! # Quick Start
//!
//! ```ignore
//! use mesh_boolean::{union, difference, intersection};
//!
//! let combined = union(&mesh_a, &mesh_b)?;
//! let subtracted = difference(&mesh_a, &mesh_b)?;
//! let overlap = intersection(&mesh_a, &mesh_b)?;
//! ```
//!
//! # Configuration
//!
//! For more control, use the `*_with_config` variants:
//!
//! ```ignore
//! use mesh_boolean::{difference_with_config, BooleanConfig, CleanupLevel};
//!
//! let config = BooleanConfig::for_cad().with_cleanup(CleanupLevel::Fast);
//! let result = difference_with_config(&plate, &lettering, &config)?;
//! println!("{} faces, {} cuts", result.mesh.faces.len(), result.stats.pieces_cut);
//! ```
//!
//! # Presets
//!
//! | Preset | Use Case | Tolerances |
//! |--------|----------|------------|
//! | `default()` | General purpose, millimetre-scale parts | Balanced |
//! | `for_cad()` | CAD geometry | Tight |
//! | `strict()` | Perfect input | Tightest |

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that conflict with API design choices
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
// Allow single-char names in math-heavy code (standard in graphics/geometry algorithms)
#![allow(clippy::many_single_char_names)]
// Allow cast truncation - mesh indices are validated at runtime
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
// Allow some nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_panics_doc)]

pub mod bvh;
pub mod classify;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod intersect;
pub mod operation;
pub mod predicates;
pub mod split;
pub mod validate;

// Re-export main types and functions for convenient access
pub use config::{BooleanConfig, BooleanOp, CleanupLevel};
pub use error::{BooleanError, BooleanResult};
pub use operation::{
    BooleanOperationResult, BooleanStats, boolean_operation, difference, difference_with_config,
    intersection, intersection_with_config, union, union_with_config,
};
pub use validate::count_open_edges;

// Re-export mesh types for convenience
pub use mesh_types::{IndexedMesh, Point3, Vector3, Vertex};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```ignore
/// use mesh_boolean::prelude::*;
///
/// let result = difference(&mesh_a, &mesh_b)?;
/// ```
pub mod prelude {
    pub use crate::config::{BooleanConfig, BooleanOp, CleanupLevel};
    pub use crate::error::{BooleanError, BooleanResult};
    pub use crate::operation::{
        BooleanOperationResult, BooleanStats, boolean_operation, difference, difference_with_config,
        intersection, intersection_with_config, union, union_with_config,
    };
}
