//! Laying out an identifier as one composite glyph mesh.
//!
//! Characters are set left to right. A letter that follows a digit starts a
//! new row below the first, so `451287UN01` engraves the case number on the
//! top row and the model label with its index underneath.

use mesh_transform::{Dimensions, measure, scale_banded, translate};
use mesh_types::{IndexedMesh, Vector3};
use tracing::debug;

use crate::layout::TagLayout;
use crate::library::MeshLibrary;

/// Where one glyph ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPlacement {
    /// The character engraved.
    pub ch: char,
    /// Row number, starting at zero.
    pub row: usize,
    /// Translation applied after scaling; the glyph's minimum corner.
    pub offset: Vector3<f64>,
    /// Unscaled glyph extents.
    pub dimensions: Dimensions,
}

/// A laid-out tag.
#[derive(Debug, Clone, Default)]
pub struct ComposedTag {
    /// All placed glyphs, concatenated.
    pub mesh: IndexedMesh,
    /// One entry per placed glyph, in text order.
    pub placements: Vec<GlyphPlacement>,
    /// Characters without a usable glyph.
    pub skipped: Vec<char>,
}

impl ComposedTag {
    /// Whether no glyph was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mesh.faces.is_empty()
    }
}

struct Cursor {
    x: f64,
    y: f64,
    row: usize,
    last_was_digit: bool,
}

/// Lay out `text` with glyphs from `library`.
///
/// The text is uppercased first. Characters the library cannot provide are
/// skipped without moving the cursor. Each glyph is scaled by the layout's
/// banded scale before it is translated into place.
///
/// # Example
///
/// ```
/// use fixture_tag::{compose, EmbeddedLibrary, TagLayout};
///
/// let tag = compose("12ab", &EmbeddedLibrary, &TagLayout::default());
/// assert_eq!(tag.placements.len(), 4);
/// assert_eq!(tag.placements[2].row, 1);
/// ```
#[must_use]
pub fn compose<L>(text: &str, library: &L, layout: &TagLayout) -> ComposedTag
where
    L: MeshLibrary + ?Sized,
{
    let scale = layout.glyph_scale();
    let base_z = layout.glyph_base_z();
    let mut cursor = Cursor {
        x: layout.origin_x,
        y: layout.origin_y,
        row: 0,
        last_was_digit: false,
    };
    let mut tag = ComposedTag::default();

    for ch in text.to_uppercase().chars() {
        let mut glyph = match library.glyph(ch) {
            Ok(mesh) => mesh,
            Err(err) => {
                debug!(%ch, error = %err, "no glyph, skipping");
                tag.skipped.push(ch);
                continue;
            }
        };

        let dimensions = measure(&glyph);
        if ch.is_ascii_digit() {
            cursor.last_was_digit = true;
        } else if cursor.last_was_digit {
            cursor.y -= dimensions.length * layout.xy_low + layout.row_spacing;
            cursor.x = layout.row_start_x;
            cursor.row += 1;
            cursor.last_was_digit = false;
        }

        let offset = Vector3::new(cursor.x, cursor.y, base_z);
        scale_banded(&mut glyph, &scale);
        translate(&mut glyph, offset);
        cursor.x += dimensions.width * layout.xy_low + layout.glyph_spacing;

        debug!(%ch, row = cursor.row, x = offset.x, y = offset.y, "placed glyph");
        tag.mesh.merge(&glyph);
        tag.placements.push(GlyphPlacement {
            ch,
            row: cursor.row,
            offset,
            dimensions,
        });
    }

    tag
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::library::EmbeddedLibrary;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn digits_then_letters_break_rows() {
        let tag = compose("123AB", &EmbeddedLibrary, &TagLayout::default());
        assert_eq!(tag.placements.len(), 5);

        let first = &tag.placements[0];
        assert!(close(first.offset.x, -6.5));
        assert!(close(first.offset.y, -7.5));
        assert!(close(first.offset.z, 3.0));

        // '1' is 6 wide: 6 * 0.18 + 0.8; '2' is 10 wide.
        assert!(close(tag.placements[1].offset.x, -6.5 + 1.88));
        assert!(close(tag.placements[2].offset.x, -6.5 + 1.88 + 2.6));

        let a = &tag.placements[3];
        assert_eq!(a.row, 1);
        assert!(close(a.offset.x, -6.35));
        assert!(close(a.offset.y, -12.92));
        assert!(close(tag.placements[4].offset.x, -6.35 + 2.6));
        assert!(close(tag.placements[4].offset.y, -12.92));
    }

    #[test]
    fn digits_after_letters_stay_on_row() {
        let tag = compose("7un01", &EmbeddedLibrary, &TagLayout::default());
        let rows: Vec<_> = tag.placements.iter().map(|p| p.row).collect();
        assert_eq!(rows, [0, 1, 1, 1, 1]);
        assert_eq!(tag.placements[1].ch, 'U');
    }

    #[test]
    fn vertex_count_is_sum_of_glyphs() {
        let text = "451287UN01";
        let expected: usize = text
            .chars()
            .map(|c| EmbeddedLibrary.glyph(c).unwrap().vertices.len())
            .sum();
        let tag = compose(text, &EmbeddedLibrary, &TagLayout::default());
        assert!(!tag.is_empty());
        assert_eq!(tag.mesh.vertices.len(), expected);
        assert!(tag.skipped.is_empty());
    }

    #[test]
    fn unknown_characters_do_not_advance() {
        let plain = compose("12", &EmbeddedLibrary, &TagLayout::default());
        let noisy = compose("1 -2", &EmbeddedLibrary, &TagLayout::default());
        assert_eq!(noisy.skipped, [' ', '-']);
        assert_eq!(plain.placements, noisy.placements);
        assert_eq!(plain.mesh, noisy.mesh);
    }

    #[test]
    fn nothing_recognized_gives_empty_tag() {
        let tag = compose("-- ?", &EmbeddedLibrary, &TagLayout::default());
        assert!(tag.is_empty());
        assert!(tag.placements.is_empty());
        assert!(compose("", &EmbeddedLibrary, &TagLayout::default()).is_empty());
    }

    #[test]
    fn scaled_glyphs_sink_into_top_face() {
        let tag = compose("8", &EmbeddedLibrary, &TagLayout::default());
        let dims = measure(&tag.mesh);
        assert!(close(dims.width, 1.8));
        assert!(close(dims.length, 14.0 * 0.18));
        assert!(close(dims.height, 3.0));

        let shallow = compose("8", &EmbeddedLibrary, &TagLayout::shallow());
        assert!(close(shallow.placements[0].offset.z, 3.3));
    }
}
