// crates/cli/src/args.rs
use crate::options::OutputFormat;
use clap::{ArgAction, Args as ClapArgs, Parser};
use std::path::PathBuf;

/// Top-level CLI arguments parsed via clap.
#[derive(Parser, Debug)]
#[command(
    name = "echidna-coverage",
    version = crate::VERSION,
    about = "Function-level coverage report for echidna source traces"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Warn when a file's line coverage is below this percentage
    #[arg(short, long, default_value_t = 70.0)]
    pub threshold: f64,

    /// Exit with a failure status when a file is below the threshold
    #[arg(long)]
    pub fail_under: bool,

    /// Only report files whose path contains this name (case-insensitive)
    #[arg(short, long)]
    pub contract: Option<String>,

    /// -v lists functions that are not fully covered, -vv also prints their lines
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Include view and pure functions
    #[arg(long)]
    pub all_functions: bool,

    /// Only count logical lines, in logical/Logical* files
    #[arg(long)]
    pub logical: bool,

    /// Skip files under test and fuzzing directories
    #[arg(long)]
    pub source_only: bool,

    /// File names to leave out (the `.sol` extension is optional)
    #[arg(long, num_args = 1..)]
    pub exclude: Vec<String>,

    /// CSV scope file (`path,source,total,comment`)
    #[arg(long)]
    pub scope_file: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long)]
    pub debug: bool,
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Trace file produced by echidna
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Project or corpus folder; the newest `.txt` trace is used
    #[arg(short, long)]
    pub echidna_folder: Option<PathBuf>,
}
