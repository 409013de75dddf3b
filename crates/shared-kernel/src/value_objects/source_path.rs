// crates/shared-kernel/src/value_objects/source_path.rs
use std::fmt;

use serde::Serialize;

/// Source file identity taken from a trace path-marker line.
///
/// The `key` is the last two path segments joined with `/` (e.g. `src/Token.sol`),
/// which is what reports display. The full path is retained for exclusion rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct SourcePath {
    full: String,
    key: String,
}

impl SourcePath {
    /// Parses a path-marker line: root-absolute with at least two segments.
    ///
    /// Returns `None` for anything else, including ordinary trace rows.
    #[must_use]
    pub fn from_marker(line: &str) -> Option<Self> {
        let full = line.trim_end();
        if !full.starts_with('/') || !full[1..].contains('/') {
            return None;
        }
        let segments: Vec<&str> = full.split('/').collect();
        let len = segments.len();
        let key = format!("{}/{}", segments[len - 2], segments[len - 1]);
        Some(Self {
            full: full.to_string(),
            key,
        })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn full(&self) -> &str {
        &self.full
    }

    /// Last path segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.full.rsplit('/').next().unwrap_or_default()
    }

    /// Path segments, leading empty segment excluded.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.full.split('/').filter(|s| !s.is_empty())
    }

    /// Directory segments only (the file name is excluded).
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        let count = self.segments().count();
        self.segments().take(count.saturating_sub(1))
    }
}

impl From<SourcePath> for String {
    fn from(value: SourcePath) -> Self {
        value.key
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
