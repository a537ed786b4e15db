//! In-place scaling and translation used to place glyphs.

use mesh_types::IndexedMesh;
use nalgebra::Vector3;

use crate::Transform3D;

/// Anisotropic scale with two XY bands split by height.
///
/// Vertices whose Z exceeds `z_threshold` take `xy_high` on X and Y, the
/// rest take `xy_low`. Z is always scaled by `z`. Equal bands reduce to a
/// plain per-axis scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandedScale {
    /// XY factor for vertices at or below the threshold.
    pub xy_low: f64,
    /// XY factor for vertices above the threshold.
    pub xy_high: f64,
    /// Z factor for every vertex.
    pub z: f64,
    /// Height (pre-scale Z) separating the bands.
    pub z_threshold: f64,
}

impl BandedScale {
    /// A banded scale with the same XY factor in both bands.
    #[must_use]
    pub const fn uniform_xy(xy: f64, z: f64) -> Self {
        Self {
            xy_low: xy,
            xy_high: xy,
            z,
            z_threshold: 0.0,
        }
    }

    /// Factors applied to a vertex at height `z`.
    fn factors_at(&self, z: f64) -> (f64, f64) {
        if z > self.z_threshold {
            (self.xy_high, self.z)
        } else {
            (self.xy_low, self.z)
        }
    }
}

/// Scale every vertex of `mesh` by the band its original Z falls in.
pub fn scale_banded(mesh: &mut IndexedMesh, scale: &BandedScale) {
    if scale.xy_low == scale.xy_high {
        Transform3D::scale(scale.xy_low, scale.xy_low, scale.z).apply_in_place(mesh);
        return;
    }
    for vertex in &mut mesh.vertices {
        let p = &mut vertex.position;
        let (xy, z) = scale.factors_at(p.z);
        p.x *= xy;
        p.y *= xy;
        p.z *= z;
    }
}

/// Shift every vertex of `mesh` by `offset`.
pub fn translate(mesh: &mut IndexedMesh, offset: Vector3<f64>) {
    Transform3D::from_translation(offset).apply_in_place(mesh);
}
