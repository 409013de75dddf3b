// crates/engine/src/lib.rs
//! Coverage analysis of fuzzer source traces.
//!
//! The pipeline is `segment_trace` → `scan_file` per file → `FileReport`.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::path::Path;

pub mod aggregate;
pub mod block;
pub mod classifier;
pub mod comment;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod report;
pub mod scanner;
pub mod segmenter;
pub mod trace;

pub use crate::aggregate::CoverageStats;
pub use crate::config::{CoverageMode, ScanOptions, ScanOptionsBuilder};
pub use crate::error::{EngineError, Result};
pub use crate::filesystem::{latest_trace_in, read_trace};
pub use crate::report::{FileReport, FunctionReport, ScopeSummary, filter_by_contract};

use crate::segmenter::{FileSegment, segment_trace};

/// Analyzes a whole trace and returns one report per surviving source file,
/// in the order files first appear in the trace.
pub fn analyze_trace(trace: &str, options: &ScanOptions) -> Vec<FileReport> {
    let segments = segment_trace(trace, options);
    log::debug!("{} source files to scan", segments.len());

    #[cfg(feature = "parallel")]
    let reports = segments
        .into_par_iter()
        .map(|segment| report_for(segment, options))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let reports = segments
        .into_iter()
        .map(|segment| report_for(segment, options))
        .collect();

    reports
}

fn report_for(segment: FileSegment<'_>, options: &ScanOptions) -> FileReport {
    let blocks = scanner::scan_file(&segment.rows, options.all_functions);
    FileReport::new(segment.path, blocks, options.mode)
}

/// Reads `path` and analyzes it.
///
/// # Errors
/// Returns [`EngineError::FileRead`] when the trace cannot be read.
pub fn analyze_file(path: &Path, options: &ScanOptions) -> Result<Vec<FileReport>> {
    let text = read_trace(path)?;
    Ok(analyze_trace(&text, options))
}
