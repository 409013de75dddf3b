// crates/cli/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] echidna_coverage_engine::EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scope file '{path}' at line {line}: {reason}")]
    Scope {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(f64),

    #[error("No trace file or echidna folder provided")]
    NoInput,
}

pub type Result<T> = std::result::Result<T, AppError>;
