// crates/engine/src/report.rs
use echidna_coverage_shared_kernel::{LineCount, Percentage, SourcePath};
use serde::Serialize;

use crate::aggregate::CoverageStats;
use crate::block::FunctionBlock;
use crate::config::CoverageMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionReport {
    pub name: String,
    pub touched: bool,
    pub reverted: bool,
    pub is_fully_covered: bool,
    pub untouched_line_count: LineCount,
    pub reverted_snippets: Vec<String>,
    pub untouched_snippets: Vec<String>,
}

impl FunctionReport {
    pub fn from_block(block: FunctionBlock, mode: CoverageMode) -> Self {
        Self {
            touched: block.is_touched(),
            reverted: block.is_reverted(),
            is_fully_covered: block.is_totally_covered_in(mode),
            untouched_line_count: block.tallies.untouched_in(mode),
            name: block.name,
            reverted_snippets: block.reverted_snippets,
            untouched_snippets: block.untouched_snippets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file_path: SourcePath,
    pub functions: Vec<FunctionReport>,
    pub coverage: CoverageStats,
}

impl FileReport {
    pub fn new(file_path: SourcePath, blocks: Vec<FunctionBlock>, mode: CoverageMode) -> Self {
        let coverage = CoverageStats::from_blocks(&blocks, mode);
        let functions = blocks
            .into_iter()
            .map(|b| FunctionReport::from_block(b, mode))
            .collect();
        Self {
            file_path,
            functions,
            coverage,
        }
    }

    /// Functions that still have untouched or reverted lines.
    pub fn uncovered_functions(&self) -> impl Iterator<Item = &FunctionReport> {
        self.functions.iter().filter(|f| !f.is_fully_covered)
    }

    /// Case-insensitive substring match on the file key.
    pub fn matches_contract(&self, contract: &str) -> bool {
        self.file_path
            .key()
            .to_lowercase()
            .contains(&contract.to_lowercase())
    }
}

/// Keeps only reports whose path contains `contract` (case-insensitive).
pub fn filter_by_contract(reports: Vec<FileReport>, contract: &str) -> Vec<FileReport> {
    reports
        .into_iter()
        .filter(|r| r.matches_contract(contract))
        .collect()
}

/// Overall line coverage of the files named in a scope list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeSummary {
    pub files_in_scope: usize,
    pub files_matched: usize,
    pub covered_lines: LineCount,
    pub untouched_lines: LineCount,
    pub line_coverage_percentage: Percentage,
    /// Scope entries for which the trace had no (surviving) file.
    pub missing: Vec<String>,
}

impl ScopeSummary {
    /// Sums `coveredLines` and `untouchedLines` of reports whose file name equals
    /// the file name of a scope entry (`src/pool/Pool.sol` matches `Pool.sol`).
    pub fn from_reports<S: AsRef<str>>(reports: &[FileReport], scope: &[S]) -> Self {
        let mut summary = Self {
            files_in_scope: scope.len(),
            ..Self::default()
        };

        for entry in scope {
            let wanted = file_name_of(entry.as_ref());
            let matched: Vec<&FileReport> = reports
                .iter()
                .filter(|r| r.file_path.file_name() == wanted)
                .collect();
            if matched.is_empty() {
                summary.missing.push(entry.as_ref().to_string());
                continue;
            }
            summary.files_matched += 1;
            for report in matched {
                summary.covered_lines += report.coverage.covered_lines;
                summary.untouched_lines += report.coverage.untouched_lines;
            }
        }

        summary.line_coverage_percentage = Percentage::from_ratio(
            summary.covered_lines.value(),
            summary.covered_lines.value() + summary.untouched_lines.value(),
        );
        summary
    }
}

fn file_name_of(path: &str) -> &str {
    path.trim().rsplit(['/', '\\']).next().unwrap_or_default()
}
