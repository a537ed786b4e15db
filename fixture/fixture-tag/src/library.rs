//! Embedded glyph and fixture meshes.
//!
//! Every mesh the tool needs is compiled into the binary as a binary STL
//! blob. [`MeshLibrary`] is the lookup seam; [`EmbeddedLibrary`] serves the
//! built-in table and tests substitute their own.

use mesh_io::load_stl_bytes;
use mesh_types::IndexedMesh;
use tracing::debug;

use crate::error::{FixtureError, FixtureResult};

/// Key of the base fixture body in the table.
pub const FIXTURE_KEY: &str = "fixture";

/// One entry of the embedded table.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    /// Single character, or [`FIXTURE_KEY`].
    pub key: &'static str,
    /// Serialized STL.
    pub bytes: &'static [u8],
}

impl Glyph {
    /// Size of the serialized blob in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the blob is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

macro_rules! glyph {
    ($key:literal) => {
        Glyph {
            key: $key,
            bytes: include_bytes!(concat!("../assets/glyphs/", $key, ".stl")),
        }
    };
}

/// The embedded table: digits, capital letters and the fixture body.
///
/// Glyphs use a 5×7 block font with 2.0-unit cells, extruded 10.0 units,
/// bounding box minimum at the origin.
pub static GLYPHS: &[Glyph] = &[
    glyph!("0"),
    glyph!("1"),
    glyph!("2"),
    glyph!("3"),
    glyph!("4"),
    glyph!("5"),
    glyph!("6"),
    glyph!("7"),
    glyph!("8"),
    glyph!("9"),
    glyph!("A"),
    glyph!("B"),
    glyph!("C"),
    glyph!("D"),
    glyph!("E"),
    glyph!("F"),
    glyph!("G"),
    glyph!("H"),
    glyph!("I"),
    glyph!("J"),
    glyph!("K"),
    glyph!("L"),
    glyph!("M"),
    glyph!("N"),
    glyph!("O"),
    glyph!("P"),
    glyph!("Q"),
    glyph!("R"),
    glyph!("S"),
    glyph!("T"),
    glyph!("U"),
    glyph!("V"),
    glyph!("W"),
    glyph!("X"),
    glyph!("Y"),
    glyph!("Z"),
    Glyph {
        key: FIXTURE_KEY,
        bytes: include_bytes!("../assets/fixture.stl"),
    },
];

/// Find a table entry by key.
#[must_use]
pub fn lookup(key: &str) -> Option<&'static Glyph> {
    GLYPHS.iter().find(|g| g.key == key)
}

/// Source of glyph and fixture meshes.
///
/// Implementors provide raw blobs; decoding is shared.
pub trait MeshLibrary {
    /// Raw STL bytes stored under `key`.
    fn blob(&self, key: &str) -> Option<&[u8]>;

    /// Decode the mesh stored under `key`.
    ///
    /// # Errors
    ///
    /// [`FixtureError::NotFound`] when no blob exists,
    /// [`FixtureError::Decode`] when it is not a valid STL.
    fn load(&self, key: &str) -> FixtureResult<IndexedMesh> {
        let bytes = self.blob(key).ok_or_else(|| FixtureError::NotFound { key: key.to_string() })?;
        let mesh = load_stl_bytes(bytes).map_err(|source| FixtureError::Decode {
            key: key.to_string(),
            source,
        })?;
        debug!(key, vertices = mesh.vertices.len(), faces = mesh.faces.len(), "decoded embedded mesh");
        Ok(mesh)
    }

    /// Mesh of a single character.
    ///
    /// # Errors
    ///
    /// As for [`MeshLibrary::load`].
    fn glyph(&self, ch: char) -> FixtureResult<IndexedMesh> {
        let mut buf = [0u8; 4];
        self.load(ch.encode_utf8(&mut buf))
    }

    /// The base fixture body.
    ///
    /// # Errors
    ///
    /// As for [`MeshLibrary::load`].
    fn fixture(&self) -> FixtureResult<IndexedMesh> {
        self.load(FIXTURE_KEY)
    }
}

/// The table compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLibrary;

impl MeshLibrary for EmbeddedLibrary {
    fn blob(&self, key: &str) -> Option<&[u8]> {
        lookup(key).map(|g| g.bytes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use mesh_transform::measure;

    #[test]
    fn table_covers_digits_and_letters() {
        for ch in ('0'..='9').chain('A'..='Z') {
            let mesh = EmbeddedLibrary.glyph(ch).unwrap();
            assert!(!mesh.faces.is_empty(), "glyph {ch}");
            let dims = measure(&mesh);
            assert!((dims.length - 14.0).abs() < 1e-9, "glyph {ch}");
            assert!((dims.height - 10.0).abs() < 1e-9, "glyph {ch}");
            assert!(mesh.signed_volume() > 0.0, "glyph {ch}");
        }
        assert_eq!(GLYPHS.len(), 37);
    }

    #[test]
    fn narrow_one() {
        let one = EmbeddedLibrary.glyph('1').unwrap();
        assert!((measure(&one).width - 6.0).abs() < 1e-9);
    }

    #[test]
    fn fixture_body() {
        let fixture = EmbeddedLibrary.fixture().unwrap();
        assert_eq!(fixture.faces.len(), 28);
        assert!((fixture.volume() - 1022.0).abs() < 1e-6);
        let dims = measure(&fixture);
        assert!((dims.width - 20.0).abs() < 1e-9);
        assert!((dims.height - 4.0).abs() < 1e-9);
    }

    #[test]
    fn missing_keys() {
        assert!(lookup("a").is_none());
        assert!(!lookup("Q").unwrap().is_empty());
        let err = EmbeddedLibrary.glyph('-').unwrap_err();
        assert!(matches!(err, FixtureError::NotFound { ref key } if key == "-"));
    }

    struct Corrupt;

    impl MeshLibrary for Corrupt {
        fn blob(&self, _key: &str) -> Option<&[u8]> {
            Some(b"solid broken\nfacet normal 0 0 1\nouter loop\nvertex 0 0\n")
        }
    }

    #[test]
    fn undecodable_blob() {
        let err = Corrupt.fixture().unwrap_err();
        assert!(matches!(err, FixtureError::Decode { .. }));
    }
}
