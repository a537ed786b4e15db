//! Fixture Creator
//!
//! Generates engraved fixture STL files for one case. Counts not given as
//! flags are asked for interactively.
//!
//! ```text
//! fixture-creator --case-id 451287 --upper 2 --lower-retainer 3-4
//! ```
//!
//! Every requested model is attempted; failures are listed in the summary
//! and do not change the exit code. Only an output directory that cannot be
//! prepared (or invalid flags) exits non-zero.

mod prompt;
mod report;

use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use fixture_tag::{
    FixturePipeline, ModelKind, ModelRequest, OutputLayout, PipelineOptions, StlEncoding, TagLayout, Verbosity,
    run_batch,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::prompt::{parse_range, prompt_number};
use crate::report::{ConsoleReporter, print_banner, print_summary};

/// Engrave case identifiers into fixture models
#[derive(Parser)]
#[command(name = "fixture-creator")]
#[command(about = "Batch-generate engraved fixture STL files", long_about = None)]
#[command(version)]
struct Cli {
    /// Case number engraved on every fixture
    #[arg(long)]
    case_id: Option<u64>,

    /// Upper models: a count N (1..=N) or a range A-B
    #[arg(long, value_name = "N|A-B", value_parser = parse_range)]
    upper: Option<RangeInclusive<u32>>,

    /// Upper passive models
    #[arg(long, value_name = "N|A-B", value_parser = parse_range)]
    upper_passive: Option<RangeInclusive<u32>>,

    /// Upper retainers
    #[arg(long, value_name = "N|A-B", value_parser = parse_range)]
    upper_retainer: Option<RangeInclusive<u32>>,

    /// Upper templates
    #[arg(long, value_name = "N|A-B", value_parser = parse_range)]
    upper_template: Option<RangeInclusive<u32>>,

    /// Lower models
    #[arg(long, value_name = "N|A-B", value_parser = parse_range)]
    lower: Option<RangeInclusive<u32>>,

    /// Lower passive models
    #[arg(long, value_name = "N|A-B", value_parser = parse_range)]
    lower_passive: Option<RangeInclusive<u32>>,

    /// Lower retainers
    #[arg(long, value_name = "N|A-B", value_parser = parse_range)]
    lower_retainer: Option<RangeInclusive<u32>>,

    /// Lower templates
    #[arg(long, value_name = "N|A-B", value_parser = parse_range)]
    lower_template: Option<RangeInclusive<u32>>,

    /// Output directory (emptied before writing)
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Write into a subdirectory named after the case number
    #[arg(long)]
    per_case: bool,

    /// Glyph depth relative to the fixture top (negative sinks deeper)
    #[arg(long, allow_negative_numbers = true, conflicts_with = "shallow")]
    z_depth: Option<f64>,

    /// Use the shallow engraving preset
    #[arg(long)]
    shallow: bool,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,

    /// Never prompt; missing counts are zero
    #[arg(long)]
    no_prompt: bool,

    /// Per-item detail and debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn flag_for(&self, kind: ModelKind) -> Option<RangeInclusive<u32>> {
        match kind {
            ModelKind::Upper => self.upper.clone(),
            ModelKind::UpperPassive => self.upper_passive.clone(),
            ModelKind::UpperRetainer => self.upper_retainer.clone(),
            ModelKind::UpperTemplate => self.upper_template.clone(),
            ModelKind::Lower => self.lower.clone(),
            ModelKind::LowerPassive => self.lower_passive.clone(),
            ModelKind::LowerRetainer => self.lower_retainer.clone(),
            ModelKind::LowerTemplate => self.lower_template.clone(),
        }
    }

    fn layout(&self) -> TagLayout {
        let layout = if self.shallow {
            TagLayout::shallow()
        } else {
            TagLayout::default()
        };
        match self.z_depth {
            Some(depth) => layout.with_z_depth(depth),
            None => layout,
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "warn,fixture_tag=debug,mesh_boolean=info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn gather_requests<R: BufRead, W: Write>(cli: &Cli, input: &mut R, output: &mut W) -> Result<Vec<ModelRequest>> {
    let mut requests = Vec::with_capacity(ModelKind::ALL.len());
    for kind in ModelKind::ALL {
        let range = match cli.flag_for(kind) {
            Some(range) => range,
            None if cli.no_prompt => continue,
            None => {
                let question = format!("How many {} models? ", kind.full_name());
                let count: u32 = prompt_number(input, output, &question).context("reading model count")?;
                1..=count
            }
        };
        requests.push(ModelRequest::for_kind(kind, *range.start(), *range.end()));
    }
    Ok(requests)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    print_banner();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let case_id = match cli.case_id {
        Some(id) => id,
        None if cli.no_prompt => bail!("--case-id is required with --no-prompt"),
        None => prompt_number(&mut input, &mut output, "Enter case ID: ").context("reading case ID")?,
    };
    let requests = gather_requests(&cli, &mut input, &mut output)?;
    debug!(case_id, ?requests, "collected requests");

    let options = PipelineOptions::default()
        .with_layout(cli.layout())
        .with_encoding(if cli.ascii {
            StlEncoding::Ascii
        } else {
            StlEncoding::Binary
        })
        .with_verbosity(if cli.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        });
    let layout = if cli.per_case {
        OutputLayout::PerCase
    } else {
        OutputLayout::Shared
    };

    println!();
    let started = Instant::now();
    let pipeline = FixturePipeline::new(options);
    let report = run_batch(&pipeline, case_id, &requests, &cli.output, layout, &mut ConsoleReporter)
        .context("cannot start batch")?;
    print_summary(&report, started.elapsed());
    Ok(())
}
