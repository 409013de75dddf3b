// crates/engine/src/filesystem.rs
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{EngineError, Result};

const TRACE_EXTENSION: &str = "txt";
const ECHIDNA_SUBDIR: &str = "echidna";

/// Reads a whole trace file.
///
/// # Errors
/// Returns [`EngineError::FileRead`] when the file cannot be read as UTF-8.
pub fn read_trace(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| EngineError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Picks the most recently modified `.txt` trace of a fuzzing corpus.
///
/// Looks in `<dir>/echidna` when that folder exists, otherwise in `dir` itself.
///
/// # Errors
/// Returns [`EngineError::FolderRead`] when the folder cannot be listed and
/// [`EngineError::NoTraceFiles`] when it holds no trace.
pub fn latest_trace_in(dir: &Path) -> Result<PathBuf> {
    let nested = dir.join(ECHIDNA_SUBDIR);
    let folder = if nested.is_dir() { nested } else { dir.to_path_buf() };

    let entries = fs::read_dir(&folder).map_err(|source| EngineError::FolderRead {
        path: folder.clone(),
        source,
    })?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != TRACE_EXTENSION) {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let is_newer = newest.as_ref().is_none_or(|(best, _)| modified > *best);
        if is_newer {
            newest = Some((modified, path));
        }
    }

    match newest {
        Some((_, path)) => {
            debug!("latest trace in {}: {}", folder.display(), path.display());
            Ok(path)
        }
        None => Err(EngineError::NoTraceFiles(folder)),
    }
}
