//! Running every requested model of a case, isolating per-item failures.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::{FailureKind, FixtureError, FixtureResult};
use crate::identifier::ModelRequest;
use crate::library::MeshLibrary;
use crate::pipeline::{FixturePipeline, Verbosity};

/// Severity of a progress message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Progress.
    Info,
    /// Something was off but the item went through.
    Warn,
    /// An item failed.
    Error,
    /// An item was written.
    Success,
}

/// Receives progress messages from a batch.
///
/// Library code never formats for a terminal; the CLI decides how levels
/// look.
pub trait Reporter {
    /// Handle one message.
    fn report(&mut self, level: Level, message: &str);
}

/// Forwards messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, level: Level, message: &str) {
        match level {
            Level::Info | Level::Success => info!("{message}"),
            Level::Warn => warn!("{message}"),
            Level::Error => error!("{message}"),
        }
    }
}

/// Where output files go relative to the chosen root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// Straight into the root directory.
    #[default]
    Shared,
    /// Into a subdirectory named after the case number.
    PerCase,
}

impl OutputLayout {
    /// Directory that receives the files of `case_id`.
    #[must_use]
    pub fn directory(self, root: &Path, case_id: u64) -> PathBuf {
        match self {
            Self::Shared => root.to_path_buf(),
            Self::PerCase => root.join(case_id.to_string()),
        }
    }
}

/// Create `dir`, or empty it when it already exists.
///
/// # Errors
///
/// [`FixtureError::Directory`] when the directory cannot be created, read
/// or cleared.
pub fn prepare_output_dir(dir: &Path) -> FixtureResult<()> {
    let wrap = |source| FixtureError::Directory {
        path: dir.to_path_buf(),
        source,
    };
    if !dir.exists() {
        debug!(dir = %dir.display(), "creating output directory");
        return fs::create_dir_all(dir).map_err(wrap);
    }
    let mut removed = 0usize;
    for entry in fs::read_dir(dir).map_err(wrap)? {
        let path = entry.map_err(wrap)?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path).map_err(wrap)?;
        } else {
            fs::remove_file(&path).map_err(wrap)?;
        }
        removed += 1;
    }
    debug!(dir = %dir.display(), removed, "cleared output directory");
    Ok(())
}

/// One item that did not produce a file.
#[derive(Debug, Clone)]
pub struct ItemFailure {
    /// Identifier of the item.
    pub identifier: String,
    /// Failure category.
    pub kind: FailureKind,
    /// Error message including its causes.
    pub message: String,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Directory the files were written to.
    pub output_dir: PathBuf,
    /// Items attempted.
    pub attempted: usize,
    /// Files written, in order.
    pub produced: Vec<PathBuf>,
    /// Items that failed, in order.
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    /// Number of files written.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.produced.len()
    }

    /// Whether every attempted item was written.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The error and its chain of causes, joined with `": "`.
#[must_use]
pub fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Engrave every model in `requests` for `case_id`.
///
/// The output directory is prepared first; failing that aborts the batch.
/// After that each item runs on its own and a failure only marks that item.
///
/// # Errors
///
/// [`FixtureError::Directory`] only.
pub fn run_batch<L: MeshLibrary>(
    pipeline: &FixturePipeline<L>,
    case_id: u64,
    requests: &[ModelRequest],
    output_root: &Path,
    layout: OutputLayout,
    reporter: &mut dyn Reporter,
) -> FixtureResult<BatchReport> {
    let output_dir = layout.directory(output_root, case_id);
    prepare_output_dir(&output_dir)?;

    let verbosity = pipeline.options().verbosity;
    let total: usize = requests.iter().map(ModelRequest::len).sum();
    info!(case_id, total, dir = %output_dir.display(), "starting batch");

    let mut report = BatchReport {
        output_dir: output_dir.clone(),
        ..BatchReport::default()
    };

    for request in requests {
        if request.is_empty() {
            continue;
        }
        if verbosity >= Verbosity::Normal {
            reporter.report(Level::Info, &format!("{}: {} model(s)", request.name, request.len()));
        }
        for index in request.indices() {
            let identifier = request.identifier(case_id, index);
            report.attempted += 1;

            match pipeline.produce(&identifier, &output_dir) {
                Ok(produced) => {
                    if verbosity >= Verbosity::Verbose && !produced.skipped.is_empty() {
                        let skipped: String = produced.skipped.iter().collect();
                        reporter.report(
                            Level::Warn,
                            &format!("{identifier}: no glyph for {skipped:?}, left blank"),
                        );
                    }
                    if verbosity >= Verbosity::Normal {
                        let name = identifier.file_name();
                        let message = if verbosity >= Verbosity::Verbose {
                            format!("Created {name} ({} faces)", produced.faces)
                        } else {
                            format!("Created {name}")
                        };
                        reporter.report(Level::Success, &message);
                    }
                    report.produced.push(produced.path);
                }
                Err(err) => {
                    let message = describe(&err);
                    warn!(%identifier, kind = %err.kind(), error = %message, "item failed");
                    reporter.report(Level::Error, &format!("{identifier}: {message}"));
                    report.failures.push(ItemFailure {
                        identifier: identifier.to_string(),
                        kind: err.kind(),
                        message,
                    });
                }
            }
        }
    }

    info!(
        case_id,
        succeeded = report.succeeded(),
        attempted = report.attempted,
        "batch complete"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::identifier::ModelKind;

    #[derive(Default)]
    struct Collect(Vec<(Level, String)>);

    impl Reporter for Collect {
        fn report(&mut self, level: Level, message: &str) {
            self.0.push((level, message.to_string()));
        }
    }

    #[test]
    fn prepare_creates_and_clears() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("out");
        prepare_output_dir(&dir).unwrap();
        assert!(dir.is_dir());

        fs::write(dir.join("stale_F.stl"), b"old").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("x"), b"x").unwrap();
        prepare_output_dir(&dir).unwrap();
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn prepare_rejects_a_file() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("output");
        fs::write(&file, b"not a directory").unwrap();
        let err = prepare_output_dir(&file).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Directory);
    }

    #[test]
    fn per_case_layout() {
        let root = Path::new("output");
        assert_eq!(OutputLayout::Shared.directory(root, 12), PathBuf::from("output"));
        assert_eq!(OutputLayout::PerCase.directory(root, 12), Path::new("output").join("12"));
    }

    #[test]
    fn describe_includes_causes() {
        let err = FixtureError::Directory {
            path: PathBuf::from("out"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(describe(&err), "cannot prepare output directory out: disk full");
    }

    /// Embedded glyphs without '0'.
    struct NoZero;

    impl MeshLibrary for NoZero {
        fn blob(&self, key: &str) -> Option<&[u8]> {
            crate::library::EmbeddedLibrary.blob(key).filter(|_| key != "0")
        }
    }

    fn warnings_at(verbosity: Verbosity) -> Vec<String> {
        let root = tempfile::tempdir().unwrap();
        let options = crate::pipeline::PipelineOptions::default().with_verbosity(verbosity);
        let pipeline = FixturePipeline::with_library(NoZero, options);
        let requests = [ModelRequest::count_of(ModelKind::Upper, 1)];
        let mut reporter = Collect::default();
        let report = run_batch(&pipeline, 7, &requests, root.path(), OutputLayout::Shared, &mut reporter).unwrap();
        assert!(report.all_succeeded());
        reporter
            .0
            .into_iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message)
            .collect()
    }

    #[test]
    fn skipped_glyphs_reported_only_when_verbose() {
        assert!(warnings_at(Verbosity::Quiet).is_empty());
        assert!(warnings_at(Verbosity::Normal).is_empty());
        let verbose = warnings_at(Verbosity::Verbose);
        assert_eq!(verbose.len(), 1);
        assert!(verbose[0].starts_with("7UN01"));
    }

    #[test]
    fn empty_request_list() {
        let root = tempfile::tempdir().unwrap();
        let pipeline = FixturePipeline::new(crate::pipeline::PipelineOptions::default());
        let mut reporter = Collect::default();
        let report = run_batch(&pipeline, 5, &[], root.path(), OutputLayout::PerCase, &mut reporter).unwrap();
        assert_eq!(report.attempted, 0);
        assert!(report.all_succeeded());
        assert!(root.path().join("5").is_dir());
        assert!(reporter.0.is_empty());
    }
}
