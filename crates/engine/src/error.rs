// crates/engine/src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read trace '{path}': {source}")]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list trace folder '{path}': {source}")]
    FolderRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No .txt trace files found in '{0}'")]
    NoTraceFiles(std::path::PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<crate::config::ScanOptionsBuilderError> for EngineError {
    fn from(err: crate::config::ScanOptionsBuilderError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
