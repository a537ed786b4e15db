//! Placement constants for engraved tags.
//!
//! All lengths are in fixture units (millimetres). Glyphs are scaled down
//! from their 10-unit master size, set in a row starting at
//! ([`TagLayout::origin_x`], [`TagLayout::origin_y`]), and lowered so their
//! tops sit [`TagLayout::z_depth`] relative to [`TagLayout::origin_z`].

use mesh_transform::BandedScale;

/// Tag layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagLayout {
    /// X of the first glyph on the first row.
    pub origin_x: f64,
    /// Y of the first row.
    pub origin_y: f64,
    /// Z reference, the top face of the fixture.
    pub origin_z: f64,
    /// Added to `origin_z` when placing glyphs; negative sinks them.
    pub z_depth: f64,
    /// X of the first glyph after a row break.
    pub row_start_x: f64,
    /// XY scale for glyph vertices at or below `z_threshold`.
    pub xy_low: f64,
    /// XY scale for glyph vertices above `z_threshold`.
    pub xy_high: f64,
    /// Z scale for all glyph vertices.
    pub z_scale: f64,
    /// Unscaled Z separating the two XY bands.
    pub z_threshold: f64,
    /// Gap between consecutive glyphs on a row.
    pub glyph_spacing: f64,
    /// Gap between rows.
    pub row_spacing: f64,
}

impl Default for TagLayout {
    /// Glyph tops 1.0 below the fixture's top face level.
    fn default() -> Self {
        Self {
            origin_x: -6.5,
            origin_y: -7.5,
            origin_z: 4.0,
            z_depth: -1.0,
            row_start_x: -6.35,
            xy_low: 0.18,
            xy_high: 0.18,
            z_scale: 0.30,
            z_threshold: 0.1,
            glyph_spacing: 0.8,
            row_spacing: 2.9,
        }
    }
}

impl TagLayout {
    /// Shallower placement for thin fixtures.
    #[must_use]
    pub fn shallow() -> Self {
        Self::default().with_z_depth(-0.7)
    }

    /// Set the vertical offset applied on top of `origin_z`.
    #[must_use]
    pub fn with_z_depth(mut self, z_depth: f64) -> Self {
        self.z_depth = z_depth;
        self
    }

    /// Set the two XY scale bands.
    #[must_use]
    pub fn with_xy_scales(mut self, low: f64, high: f64) -> Self {
        self.xy_low = low;
        self.xy_high = high;
        self
    }

    /// Z at which glyph bases are placed.
    #[must_use]
    pub fn glyph_base_z(&self) -> f64 {
        self.origin_z + self.z_depth
    }

    /// Scale applied to each glyph before placement.
    #[must_use]
    pub fn glyph_scale(&self) -> BandedScale {
        BandedScale {
            xy_low: self.xy_low,
            xy_high: self.xy_high,
            z: self.z_scale,
            z_threshold: self.z_threshold,
        }
    }
}
