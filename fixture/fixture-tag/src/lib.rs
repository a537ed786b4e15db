//! Engraving case identifiers into dental fixture meshes.
//!
//! For every requested appliance the base fixture body is loaded from the
//! embedded library, the identifier (`451287UN01`) is laid out as block
//! glyphs, the glyphs are subtracted from the fixture's top face, and the
//! result is written as `451287UN01_F.stl`.
//!
//! # Quick Start
//!
//! ```no_run
//! use fixture_tag::{
//!     FixturePipeline, ModelKind, ModelRequest, OutputLayout, PipelineOptions, TracingReporter,
//!     run_batch,
//! };
//! use std::path::Path;
//!
//! let pipeline = FixturePipeline::new(PipelineOptions::default());
//! let requests = [ModelRequest::count_of(ModelKind::Upper, 2)];
//! let report = run_batch(
//!     &pipeline,
//!     451_287,
//!     &requests,
//!     Path::new("output"),
//!     OutputLayout::Shared,
//!     &mut TracingReporter,
//! )?;
//! println!("{}/{} written", report.succeeded(), report.attempted);
//! # Ok::<(), fixture_tag::FixtureError>(())
//! ```
//!
//! # Failures
//!
//! Only an unusable output directory stops a batch. Lookup, boolean and
//! write failures are recorded per item in the [`BatchReport`].

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod batch;
pub mod compose;
pub mod engrave;
pub mod error;
pub mod identifier;
pub mod layout;
pub mod library;
pub mod pipeline;

pub use batch::{
    BatchReport, ItemFailure, Level, OutputLayout, Reporter, TracingReporter, describe, prepare_output_dir,
    run_batch,
};
pub use compose::{ComposedTag, GlyphPlacement, compose};
pub use engrave::{engrave_config, subtract};
pub use error::{FailureKind, FixtureError, FixtureResult};
pub use identifier::{FILE_SUFFIX, Identifier, ModelKind, ModelRequest};
pub use layout::TagLayout;
pub use library::{EmbeddedLibrary, FIXTURE_KEY, GLYPHS, Glyph, MeshLibrary, lookup};
pub use pipeline::{FixturePipeline, PipelineOptions, Produced, Verbosity};

// Re-exported for callers choosing an output format.
pub use mesh_io::StlEncoding;
