// crates/engine/src/trace.rs
//! Trace row parsing.
//!
//! Two row layouts are accepted:
//!
//! ```text
//!   12 | 4 | *  |     balance += amount;     (lineNo | hits | marker | source)
//!   12 | *  |     balance += amount;         (legacy: lineNo | marker | source)
//! ```
//!
//! The source column may itself contain `|` (`a || b`), so rows are split with
//! `splitn` and the layout is decided from the shape of the leading columns.

/// Execution outcome recorded by the fuzzer for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `*`: executed without reverting.
    Covered,
    /// `r` (and the `e`/`o` error flavours): executed and reverted.
    Reverted,
    /// Blank column.
    Unmarked,
}

impl Marker {
    /// Parses a marker column. Returns `None` when the column is not a marker at all.
    pub fn parse(column: &str) -> Option<Self> {
        if column.is_empty() {
            return Some(Self::Unmarked);
        }
        if !column.chars().all(|c| matches!(c, '*' | 'r' | 'e' | 'o')) {
            return None;
        }
        // A line that reverted in any run is reported as reverted.
        if column.contains(['r', 'e', 'o']) {
            Some(Self::Reverted)
        } else {
            Some(Self::Covered)
        }
    }
}

/// Whether the compiler emitted instrumentation for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrumentation {
    /// Hit-count column present (possibly `0`).
    Hits(u64),
    /// Hit-count column present but empty: structural line.
    Structural,
    /// Legacy layout without a hit-count column.
    Unknown,
}

impl Instrumentation {
    /// Absence of a hit count means the line is never executable. Legacy rows
    /// carry no such information and are assumed active.
    pub fn is_compiler_active(self) -> bool {
        !matches!(self, Self::Structural)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine<'a> {
    pub line_number: Option<u32>,
    pub instrumentation: Instrumentation,
    pub marker: Marker,
    /// Source text with surrounding whitespace removed.
    pub source: &'a str,
}

impl<'a> TraceLine<'a> {
    /// Parses one row. Rows with fewer than three columns yield `None`.
    pub fn parse(row: &'a str) -> Option<Self> {
        let mut columns = row.splitn(4, '|');
        let number = columns.next()?.trim();
        let second = columns.next()?.trim();
        let third = columns.next()?;
        let rest = columns.next();

        let line_number = number.parse().ok();

        if let Some(source) = rest
            && let Some(hits) = parse_hits(second)
            && let Some(marker) = Marker::parse(third.trim())
        {
            return Some(Self {
                line_number,
                instrumentation: hits,
                marker,
                source: source.trim(),
            });
        }

        // Legacy layout: the marker sits in column two and everything after it is source.
        let marker = Marker::parse(second)?;
        let source_start = row.len() - third.len() - rest.map_or(0, |r| r.len() + 1);
        Some(Self {
            line_number,
            instrumentation: Instrumentation::Unknown,
            marker,
            source: row[source_start..].trim(),
        })
    }

    pub fn is_compiler_active(&self) -> bool {
        self.instrumentation.is_compiler_active()
    }

    /// Copies the coverage state of `other`, keeping this line's source.
    pub fn inherit_coverage(&mut self, other: &TraceLine<'_>) {
        self.instrumentation = other.instrumentation;
        self.marker = other.marker;
    }
}

fn parse_hits(column: &str) -> Option<Instrumentation> {
    if column.is_empty() {
        return Some(Instrumentation::Structural);
    }
    column.parse().ok().map(Instrumentation::Hits)
}
