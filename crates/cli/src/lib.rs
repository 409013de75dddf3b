// crates/cli/src/lib.rs
pub mod args;
pub mod config;
pub mod error;
pub mod options;
pub mod presentation;
pub mod scope;

use crate::config::{Config, TraceSource};
use crate::error::Result;
use echidna_coverage_engine::{
    FileReport, ScopeSummary, analyze_file, filter_by_contract, latest_trace_in,
};
use log::info;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of one analysis run.
#[derive(Debug)]
pub struct RunResult {
    pub reports: Vec<FileReport>,
    pub scope: Option<ScopeSummary>,
}

impl RunResult {
    /// True when `--fail-under` is set and some file missed the threshold.
    pub fn fails_threshold(&self, config: &Config) -> bool {
        config.fail_under
            && !presentation::files_below_threshold(&self.reports, config.threshold).is_empty()
    }
}

/// Resolves the trace, analyzes it and applies the contract and scope options.
///
/// # Errors
/// Fails when the trace or the scope file cannot be read.
pub fn run(config: &Config) -> Result<RunResult> {
    let trace = match &config.source {
        TraceSource::File(path) => path.clone(),
        TraceSource::Folder(dir) => latest_trace_in(dir)?,
    };
    info!("analyzing {}", trace.display());

    let mut reports = analyze_file(&trace, &config.scan)?;
    if let Some(contract) = &config.contract {
        reports = filter_by_contract(reports, contract);
    }

    let scope = match &config.scope_file {
        Some(path) => {
            let entries = scope::read_scope_file(path)?;
            let names: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
            Some(ScopeSummary::from_reports(&reports, &names))
        }
        None => None,
    };

    Ok(RunResult { reports, scope })
}
