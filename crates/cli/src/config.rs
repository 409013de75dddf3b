// crates/cli/src/config.rs
use crate::args::Args;
use crate::error::{AppError, Result};
use crate::options::{OutputFormat, Verbosity};
use echidna_coverage_engine::{CoverageMode, ScanOptions, ScanOptionsBuilder};
use std::path::PathBuf;

/// Where the trace comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceSource {
    File(PathBuf),
    /// Newest `.txt` trace under this folder.
    Folder(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: TraceSource,
    pub scan: ScanOptions,
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    pub threshold: f64,
    pub fail_under: bool,
    pub contract: Option<String>,
    pub scope_file: Option<PathBuf>,
}

impl TryFrom<Args> for Config {
    type Error = AppError;

    fn try_from(args: Args) -> Result<Self> {
        let source = match (args.input.file, args.input.echidna_folder) {
            (Some(file), _) => TraceSource::File(file),
            (None, Some(folder)) => TraceSource::Folder(folder),
            (None, None) => return Err(AppError::NoInput),
        };

        if !(0.0..=100.0).contains(&args.threshold) {
            return Err(AppError::InvalidThreshold(args.threshold));
        }

        let mode = if args.logical {
            CoverageMode::Logical
        } else {
            CoverageMode::Standard
        };

        let scan = ScanOptionsBuilder::default()
            .all_functions(args.all_functions)
            .mode(mode)
            .source_only(args.source_only)
            .exclude(args.exclude)
            .build()
            .map_err(echidna_coverage_engine::EngineError::from)?;

        Ok(Self {
            source,
            scan,
            format: args.format,
            verbosity: Verbosity::from(args.verbose),
            threshold: args.threshold,
            fail_under: args.fail_under,
            contract: args.contract.filter(|c| !c.trim().is_empty()),
            scope_file: args.scope_file,
        })
    }
}
