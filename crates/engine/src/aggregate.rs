// crates/engine/src/aggregate.rs
use echidna_coverage_shared_kernel::{FunctionCount, LineCount, Percentage};
use serde::Serialize;

use crate::block::FunctionBlock;
use crate::config::CoverageMode;

/// Per-file coverage figures.
///
/// `reverted_lines` counts reverted *functions*; the name is kept for report
/// compatibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageStats {
    pub total_functions: FunctionCount,
    pub fully_covered_functions: FunctionCount,
    pub covered_lines: LineCount,
    pub reverted_lines: FunctionCount,
    pub untouched_lines: LineCount,
    pub function_coverage_percentage: Percentage,
    pub line_coverage_percentage: Percentage,
}

impl CoverageStats {
    /// Reduces one file's blocks. The contract-level block counts as a block.
    pub fn from_blocks(blocks: &[FunctionBlock], mode: CoverageMode) -> Self {
        let total_functions = FunctionCount::new(blocks.len());
        let fully_covered_functions =
            FunctionCount::new(blocks.iter().filter(|b| b.is_totally_covered_in(mode)).count());
        let reverted_lines = FunctionCount::new(blocks.iter().filter(|b| b.is_reverted()).count());
        let covered_lines: LineCount = blocks.iter().map(|b| b.tallies.covered_in(mode)).sum();
        let untouched_lines: LineCount = blocks.iter().map(|b| b.tallies.untouched_in(mode)).sum();

        Self {
            total_functions,
            fully_covered_functions,
            covered_lines,
            reverted_lines,
            untouched_lines,
            function_coverage_percentage: Percentage::from_ratio(
                fully_covered_functions.value(),
                total_functions.value(),
            ),
            line_coverage_percentage: Percentage::from_ratio(
                covered_lines.value(),
                covered_lines.value() + untouched_lines.value(),
            ),
        }
    }

    pub fn is_totally_uncovered(&self) -> bool {
        self.covered_lines.is_zero() && self.line_coverage_percentage == Percentage::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    fn block(covered: usize, untouched: usize, reverted: usize) -> FunctionBlock {
        let mut b = FunctionBlock::new(BlockKind::Function, "f");
        b.tallies.covered = LineCount::new(covered);
        b.tallies.untouched = LineCount::new(untouched);
        b.tallies.reverted = LineCount::new(reverted);
        b.finalize();
        b
    }

    #[test]
    fn empty_file_is_all_zero() {
        let stats = CoverageStats::from_blocks(&[], CoverageMode::Standard);
        assert_eq!(stats, CoverageStats::default());
        assert!(stats.is_totally_uncovered());
    }

    #[test]
    fn mixed_blocks() {
        let blocks = [block(4, 0, 0), block(1, 2, 1), block(0, 3, 0)];
        let stats = CoverageStats::from_blocks(&blocks, CoverageMode::Standard);
        assert_eq!(stats.total_functions, FunctionCount::new(3));
        assert_eq!(stats.fully_covered_functions, FunctionCount::new(1));
        assert_eq!(stats.reverted_lines, FunctionCount::new(1));
        assert_eq!(stats.covered_lines, LineCount::new(5));
        assert_eq!(stats.untouched_lines, LineCount::new(5));
        assert_eq!(stats.function_coverage_percentage.value(), 33.33);
        assert_eq!(stats.line_coverage_percentage.value(), 50.0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let stats = CoverageStats::from_blocks(&[block(1, 0, 0)], CoverageMode::Standard);
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["totalFunctions"], 1);
        assert_eq!(json["lineCoveragePercentage"], 100.0);
        assert_eq!(json["revertedLines"], 0);
    }
}
