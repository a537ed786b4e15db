//! STL file I/O for indexed triangle meshes.
//!
//! Binary and ASCII STL are both read; the encoding is detected from the
//! content rather than the file extension. Coincident triangle corners are
//! merged on load so closed solids stay closed in memory.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{load_stl, save_stl, StlEncoding};
//!
//! let mesh = load_stl("fixture.stl").unwrap();
//! save_stl(&mesh, "copy.stl", StlEncoding::Ascii).unwrap();
//! ```
//!
//! # Precision
//!
//! Binary STL stores `f32`, which keeps about seven significant digits.
//! ASCII output writes ten significant digits per coordinate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod stl;

pub use error::{IoError, IoResult};
pub use stl::{StlEncoding, load_stl, load_stl_bytes, read_stl, save_stl, write_stl};
