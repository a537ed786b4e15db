//! STL (Stereolithography) reading and writing.
//!
//! # Binary Layout
//!
//! ```text
//! UINT8[80]    – Header (never starts with "solid" when written here)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```
//!
//! # Vertex Sharing
//!
//! STL stores every triangle corner separately. On load, corners with
//! bit-identical coordinates are merged into one vertex, so a closed mesh
//! comes back closed and a save/load round trip keeps the vertex count.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, Point3, Vertex};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL.
const TRIANGLE_SIZE: usize = 50;

/// Header text written into binary files.
const BINARY_HEADER: &[u8] = b"binary STL written by mesh-io";

/// Significant digits after the leading one in ASCII output (10 total).
const ASCII_PRECISION: usize = 9;

/// On-disk STL variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlEncoding {
    /// Binary STL with `f32` coordinates.
    #[default]
    Binary,
    /// ASCII STL with 10 significant digits per coordinate.
    Ascii,
}

/// Load a mesh from an STL file, detecting binary or ASCII content.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] when the file does not exist, or a
/// parse error when the content is not valid STL.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_stl;
///
/// let mesh = load_stl("fixture.stl").unwrap();
/// println!("Loaded {} faces", mesh.faces.len());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    read_stl(file)
}

/// Read a whole STL stream into a mesh.
///
/// # Errors
///
/// Returns an error if reading fails or the data is not valid STL.
pub fn read_stl<R: Read>(mut reader: R) -> IoResult<IndexedMesh> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    load_stl_bytes(&bytes)
}

/// Decode an STL mesh held in memory.
///
/// This is how embedded assets (`include_bytes!`) become meshes.
///
/// # Errors
///
/// Returns an error if the bytes are neither valid binary nor ASCII STL.
///
/// # Example
///
/// ```
/// use mesh_io::load_stl_bytes;
///
/// let ascii = b"solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid t\n";
/// let mesh = load_stl_bytes(ascii).unwrap();
/// assert_eq!(mesh.faces.len(), 1);
/// ```
pub fn load_stl_bytes(bytes: &[u8]) -> IoResult<IndexedMesh> {
    if is_binary(bytes) {
        decode_binary(bytes)
    } else {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| IoError::invalid_content(format!("not binary STL and not UTF-8 text: {e}")))?;
        decode_ascii(text)
    }
}

/// Binary when the size matches the declared triangle count, or when the
/// data does not start with `solid`.
fn is_binary(bytes: &[u8]) -> bool {
    if let Some(count) = declared_face_count(bytes) {
        if HEADER_SIZE + 4 + count as usize * TRIANGLE_SIZE == bytes.len() {
            return true;
        }
    }
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    !String::from_utf8_lossy(head).trim_start().starts_with("solid")
}

fn declared_face_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn decode_binary(bytes: &[u8]) -> IoResult<IndexedMesh> {
    let face_count = declared_face_count(bytes).ok_or(IoError::InvalidHeader {
        expected: HEADER_SIZE + 4,
        got: bytes.len(),
    })?;

    let body = &bytes[HEADER_SIZE + 4..];
    let available = body.len() / TRIANGLE_SIZE;
    if available < face_count as usize {
        return Err(IoError::InvalidFaceCount {
            expected: face_count,
            got: u32::try_from(available).unwrap_or(u32::MAX),
        });
    }

    let mut welder = CornerWelder::with_capacity(face_count as usize);
    for record in body.chunks_exact(TRIANGLE_SIZE).take(face_count as usize) {
        // Skip the stored normal; it is recomputed from winding on write.
        let corners = [
            read_point(&record[12..24]),
            read_point(&record[24..36]),
            read_point(&record[36..48]),
        ];
        welder.push_triangle(corners);
    }

    debug!(faces = face_count, "decoded binary STL");
    Ok(welder.finish())
}

fn read_point(buf: &[u8]) -> Point3<f64> {
    let coord = |i: usize| f64::from(f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]));
    Point3::new(coord(0), coord(4), coord(8))
}

fn decode_ascii(text: &str) -> IoResult<IndexedMesh> {
    let mut welder = CornerWelder::with_capacity(0);
    let mut corners: Vec<Point3<f64>> = Vec::with_capacity(3);
    let mut in_loop = false;

    for (line_no, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" if in_loop => {
                let mut coord = || -> IoResult<f64> {
                    let token = parts.next().ok_or_else(|| {
                        IoError::invalid_content(format!("line {}: vertex needs three coordinates", line_no + 1))
                    })?;
                    Ok(token.parse::<f64>()?)
                };
                let (x, y, z) = (coord()?, coord()?, coord()?);
                corners.push(Point3::new(x, y, z));
            }
            "endloop" => {
                in_loop = false;
            }
            "endfacet" => {
                let &[a, b, c] = corners.as_slice() else {
                    return Err(IoError::invalid_content(format!(
                        "line {}: facet has {} vertices, expected 3",
                        line_no + 1,
                        corners.len()
                    )));
                };
                welder.push_triangle([a, b, c]);
                corners.clear();
            }
            "endsolid" => break,
            _ => {}
        }
    }

    let mesh = welder.finish();
    debug!(faces = mesh.faces.len(), "decoded ASCII STL");
    Ok(mesh)
}

/// Merges triangle corners with bit-identical coordinates.
struct CornerWelder {
    mesh: IndexedMesh,
    lookup: HashMap<[u64; 3], u32>,
}

impl CornerWelder {
    fn with_capacity(faces: usize) -> Self {
        Self {
            mesh: IndexedMesh::with_capacity(faces / 2 + 3, faces),
            lookup: HashMap::with_capacity(faces / 2 + 3),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: indices are u32, meshes beyond 4B vertices are unsupported
    fn index_of(&mut self, p: Point3<f64>) -> u32 {
        // `+ 0.0` folds -0.0 into 0.0 so both signs share a key.
        let key = [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()];
        *self.lookup.entry(key).or_insert_with(|| {
            self.mesh.vertices.push(Vertex::new(p));
            (self.mesh.vertices.len() - 1) as u32
        })
    }

    fn push_triangle(&mut self, [a, b, c]: [Point3<f64>; 3]) {
        let face = [self.index_of(a), self.index_of(b), self.index_of(c)];
        self.mesh.faces.push(face);
    }

    fn finish(self) -> IndexedMesh {
        self.mesh
    }
}

/// Save a mesh to an STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written, or if the mesh
/// has out-of-range indices or non-finite coordinates.
///
/// # Example
///
/// ```no_run
/// use mesh_io::{save_stl, StlEncoding};
/// use mesh_types::unit_cube;
///
/// save_stl(&unit_cube(), "cube.stl", StlEncoding::Binary).unwrap();
/// ```
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, encoding: StlEncoding) -> IoResult<()> {
    validate_for_write(mesh)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_stl(mesh, &mut writer, encoding)?;
    writer.flush()?;
    Ok(())
}

/// Encode a mesh as STL into any writer.
///
/// # Errors
///
/// Returns an error if the mesh cannot be represented or the writer fails.
pub fn write_stl<W: Write>(mesh: &IndexedMesh, writer: W, encoding: StlEncoding) -> IoResult<()> {
    validate_for_write(mesh)?;
    match encoding {
        StlEncoding::Binary => write_binary(mesh, writer),
        StlEncoding::Ascii => write_ascii(mesh, writer),
    }
}

fn validate_for_write(mesh: &IndexedMesh) -> IoResult<()> {
    if u32::try_from(mesh.faces.len()).is_err() {
        return Err(IoError::InvalidMesh {
            details: format!("{} faces exceed the STL triangle count field", mesh.faces.len()),
        });
    }
    let vertex_count = mesh.vertices.len();
    if let Some(face) = mesh.faces.iter().find(|f| f.iter().any(|&i| i as usize >= vertex_count)) {
        return Err(IoError::InvalidMesh {
            details: format!("face {face:?} references a vertex beyond {vertex_count}"),
        });
    }
    if mesh.positions().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(IoError::InvalidMesh {
            details: "non-finite vertex coordinate".to_string(),
        });
    }
    Ok(())
}

fn unit_normal(mesh: &IndexedMesh, [a, b, c]: [u32; 3]) -> [f64; 3] {
    let (v0, v1, v2) = (mesh.position(a), mesh.position(b), mesh.position(c));
    let n = (v1 - v0).cross(&(v2 - v0));
    let len = n.norm();
    if len > f64::EPSILON {
        [n.x / len, n.y / len, n.z / len]
    } else {
        [0.0; 3]
    }
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: binary STL stores f32 by definition; face count checked above
fn write_binary<W: Write>(mesh: &IndexedMesh, mut writer: W) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    header[..BINARY_HEADER.len()].copy_from_slice(BINARY_HEADER);
    writer.write_all(&header)?;
    writer.write_all(&(mesh.faces.len() as u32).to_le_bytes())?;

    let mut record = [0u8; TRIANGLE_SIZE];
    for &face in &mesh.faces {
        let mut values = [0f32; 12];
        for (slot, n) in values[..3].iter_mut().zip(unit_normal(mesh, face)) {
            *slot = n as f32;
        }
        for (k, &index) in face.iter().enumerate() {
            let p = mesh.position(index);
            values[3 + k * 3] = p.x as f32;
            values[4 + k * 3] = p.y as f32;
            values[5 + k * 3] = p.z as f32;
        }
        for (chunk, value) in record.chunks_exact_mut(4).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        record[48..].copy_from_slice(&0u16.to_le_bytes());
        writer.write_all(&record)?;
    }
    Ok(())
}

fn write_ascii<W: Write>(mesh: &IndexedMesh, mut writer: W) -> IoResult<()> {
    const P: usize = ASCII_PRECISION;
    writeln!(writer, "solid mesh")?;
    for &face in &mesh.faces {
        let [nx, ny, nz] = unit_normal(mesh, face);
        writeln!(writer, "  facet normal {nx:.P$e} {ny:.P$e} {nz:.P$e}")?;
        writeln!(writer, "    outer loop")?;
        for index in face {
            let p = mesh.position(index);
            writeln!(writer, "      vertex {:.P$e} {:.P$e} {:.P$e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid mesh")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use mesh_types::{MeshTopology, unit_cube};

    fn encode(mesh: &IndexedMesh, encoding: StlEncoding) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_stl(mesh, &mut bytes, encoding).unwrap();
        bytes
    }

    #[test]
    fn binary_size_and_header() {
        let bytes = encode(&unit_cube(), StlEncoding::Binary);
        assert_eq!(bytes.len(), HEADER_SIZE + 4 + 12 * TRIANGLE_SIZE);
        assert!(!bytes.starts_with(b"solid"));
        assert_eq!(declared_face_count(&bytes), Some(12));
    }

    #[test]
    fn binary_load_welds_corners() {
        let bytes = encode(&unit_cube(), StlEncoding::Binary);
        let mesh = load_stl_bytes(&bytes).unwrap();
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.vertex_count(), 8);
        assert!((mesh.signed_volume() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ascii_keeps_ten_significant_digits() {
        let mut mesh = unit_cube();
        for v in &mut mesh.vertices {
            v.position.x += 0.123_456_789_01;
        }
        let bytes = encode(&mesh, StlEncoding::Ascii);
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("solid"));
        assert!(text.contains("1.234567890e-1"));

        let loaded = load_stl_bytes(&bytes).unwrap();
        assert_eq!(loaded.vertex_count(), 8);
        let max_x = loaded.positions().map(|p| p.x).fold(f64::MIN, f64::max);
        assert!((max_x - 1.123_456_789_01).abs() < 1e-9);
    }

    #[test]
    fn negative_zero_shares_vertex() {
        let text = b"solid z\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\n\
facet normal 0 0 1\nouter loop\nvertex -0 0 0\nvertex 0 1 0\nvertex -1 0 0\nendloop\nendfacet\nendsolid z\n";
        let mesh = load_stl_bytes(text).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn truncated_binary_is_rejected() {
        let mut bytes = encode(&unit_cube(), StlEncoding::Binary);
        bytes.truncate(bytes.len() - 10);
        match load_stl_bytes(&bytes) {
            Err(IoError::InvalidFaceCount { expected, got }) => {
                assert_eq!(expected, 12);
                assert_eq!(got, 11);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn short_input_is_rejected() {
        assert!(matches!(
            load_stl_bytes(b"abc"),
            Err(IoError::InvalidHeader { got: 3, .. })
        ));
    }

    #[test]
    fn malformed_facet_is_rejected() {
        let text = b"solid bad\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\nendsolid bad\n";
        assert!(matches!(
            load_stl_bytes(text),
            Err(IoError::InvalidContent { .. })
        ));
        let text = b"solid bad\nfacet normal 0 0 1\nouter loop\nvertex 0 zero 0\n";
        assert!(matches!(load_stl_bytes(text), Err(IoError::ParseFloat(_))));
    }

    #[test]
    fn invalid_mesh_is_not_written() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 99]);
        let mut sink = Vec::new();
        assert!(matches!(
            write_stl(&mesh, &mut sink, StlEncoding::Binary),
            Err(IoError::InvalidMesh { .. })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn file_roundtrip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.stl");
        save_stl(&unit_cube(), &path, StlEncoding::Binary).unwrap();
        assert_eq!(load_stl(&path).unwrap().face_count(), 12);

        match load_stl(dir.path().join("missing.stl")) {
            Err(IoError::FileNotFound { path }) => {
                assert!(path.ends_with("missing.stl"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
