//! One engraved fixture: load, compose, subtract, write.

use std::path::{Path, PathBuf};

use mesh_boolean::BooleanConfig;
use mesh_io::{StlEncoding, save_stl};
use mesh_types::IndexedMesh;
use tracing::{error, info};

use crate::compose::compose;
use crate::engrave::{engrave_config, subtract};
use crate::error::{FixtureError, FixtureResult};
use crate::identifier::Identifier;
use crate::layout::TagLayout;
use crate::library::{EmbeddedLibrary, MeshLibrary};

/// How much a batch reports about each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Failures and the final summary only.
    Quiet,
    /// One line per item.
    #[default]
    Normal,
    /// Per-item detail such as face counts and skipped characters.
    Verbose,
}

/// Settings shared by every item of a batch.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Glyph placement.
    pub layout: TagLayout,
    /// Boolean engine settings.
    pub boolean: BooleanConfig,
    /// Output file encoding.
    pub encoding: StlEncoding,
    /// Reporting detail.
    pub verbosity: Verbosity,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            layout: TagLayout::default(),
            boolean: engrave_config(),
            encoding: StlEncoding::Binary,
            verbosity: Verbosity::Normal,
        }
    }
}

impl PipelineOptions {
    /// Set the tag layout.
    #[must_use]
    pub fn with_layout(mut self, layout: TagLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the output encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: StlEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the reporting detail.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the boolean engine settings.
    #[must_use]
    pub fn with_boolean(mut self, boolean: BooleanConfig) -> Self {
        self.boolean = boolean;
        self
    }
}

/// A written fixture.
#[derive(Debug, Clone)]
pub struct Produced {
    /// The file written.
    pub path: PathBuf,
    /// Faces in the engraved mesh.
    pub faces: usize,
    /// Identifier characters that had no glyph.
    pub skipped: Vec<char>,
}

/// Engraves identifiers into fixtures drawn from a mesh library.
#[derive(Debug, Clone)]
pub struct FixturePipeline<L = EmbeddedLibrary> {
    library: L,
    options: PipelineOptions,
}

impl FixturePipeline<EmbeddedLibrary> {
    /// Pipeline over the embedded glyph table.
    #[must_use]
    pub fn new(options: PipelineOptions) -> Self {
        Self::with_library(EmbeddedLibrary, options)
    }
}

impl<L: MeshLibrary> FixturePipeline<L> {
    /// Pipeline over a custom library.
    #[must_use]
    pub fn with_library(library: L, options: PipelineOptions) -> Self {
        Self { library, options }
    }

    /// The pipeline's settings.
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// The engraved fixture for `identifier`, with the characters that were
    /// skipped.
    ///
    /// The fixture is decoded afresh for every call.
    ///
    /// # Errors
    ///
    /// Lookup failures for the fixture body, or [`FixtureError::Boolean`].
    pub fn engrave(&self, identifier: &Identifier) -> FixtureResult<(IndexedMesh, Vec<char>)> {
        let fixture = self.library.fixture()?;
        let text = identifier.to_string();
        let tag = compose(&text, &self.library, &self.options.layout);
        let mesh = subtract(&fixture, &tag.mesh, &self.options.boolean).map_err(|source| {
            FixtureError::Boolean {
                identifier: text,
                source,
            }
        })?;
        Ok((mesh, tag.skipped))
    }

    /// Engrave `identifier` and write it into `dir`.
    ///
    /// # Errors
    ///
    /// As for [`FixturePipeline::engrave`], plus [`FixtureError::Write`].
    pub fn produce(&self, identifier: &Identifier, dir: &Path) -> FixtureResult<Produced> {
        let (mesh, skipped) = self.engrave(identifier)?;
        let path = dir.join(identifier.file_name());
        if let Err(source) = save_stl(&mesh, &path, self.options.encoding) {
            error!(path = %path.display(), error = %source, "failed to write fixture");
            return Err(FixtureError::Write { path, source });
        }
        info!(%identifier, faces = mesh.faces.len(), path = %path.display(), "engraved fixture");
        Ok(Produced {
            path,
            faces: mesh.faces.len(),
            skipped,
        })
    }
}
