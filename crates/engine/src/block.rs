// crates/engine/src/block.rs
use echidna_coverage_shared_kernel::LineCount;
use serde::Serialize;

use crate::config::CoverageMode;

/// Kind of function-like unit a block was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Function,
    Constructor,
    Modifier,
    Receive,
    Fallback,
    /// Synthetic block for instrumented lines outside every function.
    ContractLevel,
}

impl BlockKind {
    /// Name used for kinds that carry no identifier of their own.
    pub fn sentinel_name(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Constructor => "constructor",
            Self::Modifier => "modifier",
            Self::Receive => "receive",
            Self::Fallback => "fallback",
            Self::ContractLevel => "<contract-level>",
        }
    }
}

/// Counters for one block. Logical variants only grow for logical lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tallies {
    pub covered: LineCount,
    pub reverted: LineCount,
    pub untouched: LineCount,
    pub logical_covered: LineCount,
    pub logical_untouched: LineCount,
}

impl Tallies {
    pub fn covered_in(&self, mode: CoverageMode) -> LineCount {
        match mode {
            CoverageMode::Standard => self.covered,
            CoverageMode::Logical => self.logical_covered,
        }
    }

    pub fn untouched_in(&self, mode: CoverageMode) -> LineCount {
        match mode {
            CoverageMode::Standard => self.untouched,
            CoverageMode::Logical => self.logical_untouched,
        }
    }

    /// Lines that received any of the three standard outcomes.
    pub fn counted(&self) -> LineCount {
        self.covered + self.reverted + self.untouched
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBlock {
    pub kind: BlockKind,
    pub name: String,
    pub tallies: Tallies,
    pub reverted_snippets: Vec<String>,
    pub untouched_snippets: Vec<String>,
    pub is_view_pure: bool,
    /// Trace rows attributed to this block, including braces and blank rows.
    pub scanned_lines: usize,
    pub is_totally_covered: bool,
}

impl FunctionBlock {
    pub fn new(kind: BlockKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            tallies: Tallies::default(),
            reverted_snippets: Vec::new(),
            untouched_snippets: Vec::new(),
            is_view_pure: false,
            scanned_lines: 0,
            is_totally_covered: false,
        }
    }

    pub fn contract_level() -> Self {
        Self::new(
            BlockKind::ContractLevel,
            BlockKind::ContractLevel.sentinel_name(),
        )
    }

    pub fn is_touched(&self) -> bool {
        !self.tallies.covered.is_zero() || !self.tallies.reverted.is_zero()
    }

    pub fn is_reverted(&self) -> bool {
        !self.tallies.reverted.is_zero()
    }

    /// `covered > 0 ∧ untouched = 0 ∧ reverted = 0`, evaluated on the mode's tallies.
    pub fn is_totally_covered_in(&self, mode: CoverageMode) -> bool {
        !self.tallies.covered_in(mode).is_zero()
            && self.tallies.untouched_in(mode).is_zero()
            && self.tallies.reverted.is_zero()
    }

    /// Freezes the standard-mode flag once the closing brace has been seen.
    pub fn finalize(&mut self) {
        self.is_totally_covered = self.is_totally_covered_in(CoverageMode::Standard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totally_covered_requires_coverage() {
        let mut block = FunctionBlock::new(BlockKind::Function, "noop");
        block.finalize();
        assert!(!block.is_totally_covered);

        block.tallies.covered = LineCount::new(2);
        block.finalize();
        assert!(block.is_totally_covered);

        block.tallies.reverted = LineCount::new(1);
        block.finalize();
        assert!(!block.is_totally_covered);
        assert!(block.is_reverted());
        assert!(block.is_touched());
    }

    #[test]
    fn logical_mode_reads_logical_tallies() {
        let mut block = FunctionBlock::new(BlockKind::Function, "f");
        block.tallies.covered = LineCount::new(3);
        block.tallies.untouched = LineCount::new(1);
        block.tallies.logical_covered = LineCount::new(2);
        assert!(!block.is_totally_covered_in(CoverageMode::Standard));
        assert!(block.is_totally_covered_in(CoverageMode::Logical));
    }
}
