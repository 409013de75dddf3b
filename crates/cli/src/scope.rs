// crates/cli/src/scope.rs
//! Audit scope files: `path,source,total,comment` with a header row.

use crate::error::{AppError, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    pub path: String,
    pub source: usize,
    pub total: usize,
    pub comment: usize,
}

pub fn read_scope_file(path: &Path) -> Result<Vec<ScopeEntry>> {
    let text = fs::read_to_string(path)?;
    parse_scope(&text, path)
}

pub fn parse_scope(text: &str, origin: &Path) -> Result<Vec<ScopeEntry>> {
    let invalid = |line: usize, reason: String| AppError::Scope {
        path: origin.to_path_buf(),
        line,
        reason,
    };

    text.lines()
        .enumerate()
        .skip(1)
        .filter(|(_, row)| !row.trim().is_empty())
        .map(|(idx, row)| {
            let line = idx + 1;
            let columns: Vec<&str> = row.split(',').map(str::trim).collect();
            let [path, source, total, comment, ..] = columns.as_slice() else {
                return Err(invalid(line, format!("expected 4 columns in {row:?}")));
            };
            let number = |name: &str, value: &str| {
                value
                    .parse::<usize>()
                    .map_err(|e| invalid(line, format!("{name} {value:?}: {e}")))
            };
            Ok(ScopeEntry {
                path: (*path).to_string(),
                source: number("source", source)?,
                total: number("total", total)?,
                comment: number("comment", comment)?,
            })
        })
        .collect()
}
