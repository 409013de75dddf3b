// crates/engine/src/scanner.rs
//! Function block scanner.
//!
//! Walks the rows of one source file and partitions them into function-like
//! blocks plus a contract-level residue. The scan is a small state machine:
//!
//! ```text
//!              start match                 first `{`
//! OutsideBlock ───────────▶ InDeclaration ───────────▶ InBody
//!      ▲                        │  `;` before any `{`     │ depth back to 0
//!      └────────────────────────┴─────────────────────────┘
//! ```
//!
//! Block comments are tracked orthogonally by [`CommentTracker`]: while a
//! `/* ... */` span is open every row is skipped, whatever the state above.

use log::{debug, trace};
use regex::Regex;
use std::sync::OnceLock;

use crate::block::{BlockKind, FunctionBlock};
use crate::classifier::{is_closing_brace, is_logical_line, is_untouched_eligible};
use crate::comment::{CommentTracker, count_braces};
use crate::trace::{Instrumentation, Marker, TraceLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    OutsideBlock,
    /// Signature seen, body brace not yet. Multi-line signatures live here.
    InDeclaration,
    InBody,
}

/// All mutable scan state for one file. Nothing is shared between files.
#[derive(Debug)]
pub struct ScannerContext {
    state: ScanState,
    current: Option<FunctionBlock>,
    depth: isize,
    comments: CommentTracker,
    contract_level: FunctionBlock,
    blocks: Vec<FunctionBlock>,
}

impl Default for ScannerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerContext {
    pub fn new() -> Self {
        Self {
            state: ScanState::OutsideBlock,
            current: None,
            depth: 0,
            comments: CommentTracker::new(),
            contract_level: FunctionBlock::contract_level(),
            blocks: Vec::new(),
        }
    }

    /// Feeds one parsed row.
    pub fn step(&mut self, line: &TraceLine<'_>) {
        let Some(code) = self.comments.code_portion(line.source) else {
            // Comment-only row or inside a `/* */` span: never classified.
            if let Some(block) = self.current.as_mut() {
                block.scanned_lines += 1;
            }
            return;
        };

        if self.state != ScanState::InBody
            && let Some((kind, name)) = detect_block_start(&code)
        {
            if let Some(pending) = self.current.take() {
                debug!("dropping declaration `{}` without a body", pending.name);
            }
            self.current = Some(FunctionBlock::new(kind, name));
            self.state = ScanState::InDeclaration;
            self.depth = 0;
        }

        match self.state {
            ScanState::OutsideBlock => {
                // Legacy rows have no hit column: an unmarked one outside every
                // function (pragma, header, event, state declaration) is not
                // evidence of an executable line.
                if line.instrumentation == Instrumentation::Unknown
                    && line.marker == Marker::Unmarked
                {
                    return;
                }
                classify(&mut self.contract_level, line, &code);
            }
            ScanState::InDeclaration => self.step_declaration(line, &code),
            ScanState::InBody => self.step_body(line, &code),
        }
    }

    fn step_declaration(&mut self, line: &TraceLine<'_>, code: &str) {
        static VIEW_PURE: OnceLock<Regex> = OnceLock::new();

        let Some(block) = self.current.as_mut() else {
            self.state = ScanState::OutsideBlock;
            return;
        };

        // Mutability may sit on any continuation row up to and including the brace row.
        let view_pure = VIEW_PURE.get_or_init(|| Regex::new(r"\b(view|pure)\b").expect("valid regex"));
        block.is_view_pure |= view_pure.is_match(code);

        classify(block, line, code);

        let (opens, closes) = count_braces(code);
        if opens > 0 {
            self.state = ScanState::InBody;
            self.depth = opens.cast_signed() - closes.cast_signed();
            if self.depth <= 0 {
                // One-line body: `function f() public { x = 1; }`
                self.close_block();
            }
        } else if code.ends_with(';') {
            // Interface or abstract declaration: `function f() external;`
            if let Some(dropped) = self.current.take() {
                debug!("dropping bodiless declaration `{}`", dropped.name);
            }
            self.state = ScanState::OutsideBlock;
        }
    }

    fn step_body(&mut self, line: &TraceLine<'_>, code: &str) {
        if let Some(block) = self.current.as_mut() {
            classify(block, line, code);
        }
        let (opens, closes) = count_braces(code);
        self.depth += opens.cast_signed() - closes.cast_signed();
        if self.depth <= 0 {
            self.close_block();
        }
    }

    fn close_block(&mut self) {
        if let Some(mut block) = self.current.take() {
            block.finalize();
            debug!(
                "closed {:?} `{}`: covered={} reverted={} untouched={}",
                block.kind,
                block.name,
                block.tallies.covered,
                block.tallies.reverted,
                block.tallies.untouched
            );
            self.blocks.push(block);
        }
        self.state = ScanState::OutsideBlock;
        self.depth = 0;
    }

    /// Ends the scan. Returns function blocks in source order and the
    /// contract-level block when it counted anything.
    pub fn finish(mut self) -> (Vec<FunctionBlock>, Option<FunctionBlock>) {
        match self.state {
            ScanState::InBody => {
                debug!("trace ended inside a block body; keeping partial block");
                self.close_block();
            }
            ScanState::InDeclaration => {
                if let Some(dropped) = self.current.take() {
                    debug!("trace ended inside declaration `{}`", dropped.name);
                }
            }
            ScanState::OutsideBlock => {}
        }

        let contract_level = if self.contract_level.tallies.counted().is_zero() {
            None
        } else {
            let mut block = self.contract_level;
            block.finalize();
            Some(block)
        };
        (self.blocks, contract_level)
    }
}

/// Applies the per-row outcome rules to `block`.
fn classify(block: &mut FunctionBlock, line: &TraceLine<'_>, code: &str) {
    block.scanned_lines += 1;

    // An empty hit-count column marks a structural row, whatever it looks like.
    if !line.is_compiler_active() || is_closing_brace(code) {
        return;
    }

    let tallies = &mut block.tallies;
    match line.marker {
        Marker::Covered => {
            tallies.covered.increment();
            if is_logical_line(code) {
                tallies.logical_covered.increment();
            }
        }
        Marker::Reverted => {
            // The line executed before reverting, so it also counts as logically covered.
            tallies.reverted.increment();
            tallies.logical_covered.increment();
            block.reverted_snippets.push(line.source.to_string());
        }
        Marker::Unmarked => {
            if is_untouched_eligible(code) {
                tallies.untouched.increment();
                if is_logical_line(code) {
                    tallies.logical_untouched.increment();
                }
                block.untouched_snippets.push(line.source.to_string());
            }
        }
    }
}

/// Matches the opening row of a function-like block.
pub fn detect_block_start(code: &str) -> Option<(BlockKind, String)> {
    static FUNCTION: OnceLock<Regex> = OnceLock::new();
    static CONSTRUCTOR: OnceLock<Regex> = OnceLock::new();
    static MODIFIER: OnceLock<Regex> = OnceLock::new();
    static SPECIAL: OnceLock<Regex> = OnceLock::new();

    let function = FUNCTION
        .get_or_init(|| Regex::new(r"\bfunction\s+([A-Za-z_$][\w$]*)\s*\(").expect("valid regex"));
    if let Some(caps) = function.captures(code) {
        return Some((BlockKind::Function, caps[1].to_string()));
    }

    let constructor =
        CONSTRUCTOR.get_or_init(|| Regex::new(r"^constructor\s*\(").expect("valid regex"));
    if constructor.is_match(code) {
        return Some((
            BlockKind::Constructor,
            BlockKind::Constructor.sentinel_name().to_string(),
        ));
    }

    let modifier = MODIFIER.get_or_init(|| {
        Regex::new(r"^modifier\s+([A-Za-z_$][\w$]*)\s*(\(|\{|$)").expect("valid regex")
    });
    if let Some(caps) = modifier.captures(code) {
        return Some((
            BlockKind::Modifier,
            format!("{}:{}", BlockKind::Modifier.sentinel_name(), &caps[1]),
        ));
    }

    let special =
        SPECIAL.get_or_init(|| Regex::new(r"^(receive|fallback)\s*\(").expect("valid regex"));
    if let Some(caps) = special.captures(code) {
        let kind = if &caps[1] == "receive" {
            BlockKind::Receive
        } else {
            BlockKind::Fallback
        };
        return Some((kind, kind.sentinel_name().to_string()));
    }

    None
}

/// `assembly {` rows carry no hits of their own; the fuzzer attributes them to
/// the first row of the assembly body.
fn inherit_assembly_coverage(lines: &mut [TraceLine<'_>]) {
    for i in 0..lines.len().saturating_sub(1) {
        let header = &lines[i];
        if header.is_compiler_active()
            || !header.source.starts_with("assembly")
            || !header.source.contains('{')
        {
            continue;
        }
        let next = lines[i + 1].clone();
        lines[i].inherit_coverage(&next);
    }
}

/// Scans the rows of one source file.
///
/// View/pure blocks are dropped unless `all_functions` is set; if that would leave
/// no function blocks at all, the unfiltered list is kept. The contract-level
/// block, when present, is appended last.
pub fn scan_file(rows: &[&str], all_functions: bool) -> Vec<FunctionBlock> {
    let mut lines: Vec<TraceLine<'_>> = rows
        .iter()
        .filter_map(|row| {
            let parsed = TraceLine::parse(row);
            if parsed.is_none() && !row.trim().is_empty() {
                trace!("skipping malformed trace row: {row:?}");
            }
            parsed
        })
        .collect();

    inherit_assembly_coverage(&mut lines);

    let mut ctx = ScannerContext::new();
    for line in &lines {
        ctx.step(line);
    }
    let (blocks, contract_level) = ctx.finish();

    let mut blocks = filter_view_pure(blocks, all_functions);
    blocks.extend(contract_level);
    blocks
}

/// Drops view/pure blocks, falling back to the input when nothing would remain.
pub fn filter_view_pure(blocks: Vec<FunctionBlock>, all_functions: bool) -> Vec<FunctionBlock> {
    if all_functions || blocks.is_empty() {
        return blocks;
    }
    let has_mutating = blocks.iter().any(|b| !b.is_view_pure);
    if !has_mutating {
        debug!("every block is view/pure; keeping them all");
        return blocks;
    }
    blocks.into_iter().filter(|b| !b.is_view_pure).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use echidna_coverage_shared_kernel::LineCount;

    fn scan(rows: &str) -> Vec<FunctionBlock> {
        let rows: Vec<&str> = rows.lines().collect();
        scan_file(&rows, false)
    }

    #[test]
    fn detects_block_kinds() {
        assert_eq!(
            detect_block_start("function deposit(uint256 amount) external {"),
            Some((BlockKind::Function, "deposit".to_string()))
        );
        assert_eq!(
            detect_block_start("constructor(address owner) {").map(|s| s.0),
            Some(BlockKind::Constructor)
        );
        assert_eq!(
            detect_block_start("modifier onlyOwner {"),
            Some((BlockKind::Modifier, "modifier:onlyOwner".to_string()))
        );
        assert_eq!(
            detect_block_start("receive() external payable {").map(|s| s.0),
            Some(BlockKind::Receive)
        );
        assert_eq!(
            detect_block_start("fallback(bytes calldata data) external returns (bytes memory) {")
                .map(|s| s.0),
            Some(BlockKind::Fallback)
        );
        assert_eq!(detect_block_start("x = fallback(1);"), None);
        assert_eq!(detect_block_start("function(uint256) external f;"), None);
    }

    #[test]
    fn fully_covered_function() {
        let blocks = scan(
            "\
 1 |   |   | contract Vault {
 2 | 4 | * |     function deposit(uint256 amount) public {
 3 | 4 | * |         require(amount > 0);
 4 | 4 | * |         balance += amount;
 5 | 4 | * |         emit Deposit(amount);
 6 |   |   |     }
 7 |   |   | }",
        );
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.name, "deposit");
        assert_eq!(block.tallies.covered, LineCount::new(4));
        assert!(block.tallies.untouched.is_zero());
        assert!(block.is_totally_covered);
    }

    #[test]
    fn reverted_line_is_captured() {
        let blocks = scan(
            "\
 2 | 4 | * | function withdraw(uint256 amount) public {
 3 | 4 | r |     require(amount <= balance);
 4 | 0 |   |     balance -= amount;
 5 |   |   | }",
        );
        let block = &blocks[0];
        assert!(block.is_reverted());
        assert!(!block.is_totally_covered);
        assert_eq!(block.reverted_snippets, ["require(amount <= balance);"]);
        assert_eq!(block.untouched_snippets, ["balance -= amount;"]);
        assert_eq!(block.tallies.logical_covered, LineCount::new(1));
    }

    #[test]
    fn structural_rows_are_never_counted() {
        let blocks = scan(
            "\
 2 | 1 | * | function f() public {
 3 |   |   |     uint256 x;
 4 |   | * |     x = 1;
 5 | 0 |   |     x = 2;
 6 |   |   | }",
        );
        let block = &blocks[0];
        assert_eq!(block.tallies.covered, LineCount::new(1));
        assert_eq!(block.tallies.untouched, LineCount::new(1));
        assert_eq!(block.untouched_snippets, ["x = 2;"]);
    }

    #[test]
    fn multi_line_signature_and_nested_braces() {
        let blocks = scan(
            "\
 1 |   |   | function swap(
 2 |   |   |     uint256 a,
 3 |   |   |     uint256 b
 4 | 2 | * | ) external returns (uint256) {
 5 | 2 | * |     if (a > b) {
 6 | 1 | * |         return a;
 7 |   |   |     } else {
 8 | 0 |   |         return b;
 9 |   |   |     }
10 |   |   | }
11 | 3 | * | function other() public { counter++; }",
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, "swap");
        assert_eq!(blocks[0].tallies.covered, LineCount::new(3));
        assert_eq!(blocks[0].tallies.untouched, LineCount::new(1));
        assert_eq!(blocks[1].name, "other");
        assert!(blocks[1].is_totally_covered);
    }

    #[test]
    fn comment_spans_are_skipped() {
        let blocks = scan(
            "\
 1 | 1 | * | function f() public {
 2 |   |   |     /*
 3 | 0 |   |     x = 1;
 4 |   | * |     function g() public {
 5 |   |   |     */
 6 | 1 | * |     y = 2;
 7 |   |   | }",
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].tallies.covered, LineCount::new(2));
        assert!(blocks[0].tallies.untouched.is_zero());
    }

    #[test]
    fn assembly_header_inherits_next_row() {
        let blocks = scan(
            "\
 1 | 1 | * | function f() public {
 2 |   |   |     assembly {
 3 | 0 |   |         sstore(0, 1)
 4 |   |   |     }
 5 |   |   | }",
        );
        let block = &blocks[0];
        // Header and body row are both untouched.
        assert_eq!(block.tallies.untouched, LineCount::new(2));
    }

    #[test]
    fn view_functions_are_filtered_with_fallback() {
        let rows = "\
 1 | 1 | * | function get() external view returns (uint256) {
 2 | 1 | * |     return x;
 3 |   |   | }
 4 | 1 | * | function set(uint256 v) external {
 5 | 1 | * |     x = v;
 6 |   |   | }";
        let blocks = scan(rows);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "set");

        let only_view = scan(
            "\
 1 | 1 | * | function get() external view returns (uint256) {
 2 | 1 | * |     return x;
 3 |   |   | }",
        );
        assert_eq!(only_view.len(), 1);
        assert!(only_view[0].is_view_pure);
    }

    #[test]
    fn interface_declarations_are_dropped() {
        let blocks = scan(
            "\
 1 |   |   | function a() external;
 2 |   |   | function b(
 3 |   |   |     uint256 x
 4 |   |   | ) external returns (bool);
 5 | 1 | * | function c() public {
 6 | 1 | * |     z = 1;
 7 |   |   | }",
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "c");
    }

    #[test]
    fn contract_level_block_collects_state_initializers() {
        let blocks = scan(
            "\
 1 |   |   | contract C {
 2 | 1 | * |     uint256 public cap = 100;
 3 | 0 |   |     address owner = msg.sender;
 4 | 1 | * |     function f() public {
 5 | 1 | * |         z = 1;
 6 |   |   |     }
 7 |   |   | }",
        );
        assert_eq!(blocks.len(), 2);
        let residue = blocks.last().unwrap();
        assert_eq!(residue.kind, BlockKind::ContractLevel);
        assert_eq!(residue.tallies.covered, LineCount::new(1));
        assert_eq!(residue.tallies.untouched, LineCount::new(1));
    }

    #[test]
    fn legacy_rows_are_scanned() {
        let blocks = scan(
            "\
 1 | *  | function f() public {
 2 | *  |     a = 1;
 3 |    |     b = 2;
 4 |    | }",
        );
        assert_eq!(blocks[0].tallies.covered, LineCount::new(2));
        assert_eq!(blocks[0].tallies.untouched, LineCount::new(1));
    }

    #[test]
    fn legacy_rows_outside_functions_are_not_counted() {
        let blocks = scan(
            "\
 1 |    | pragma solidity ^0.8.0;
 2 |    | import \"./Base.sol\";
 3 |    | contract Vault is Base {
 4 |    |     event Deposited(uint256 amount);
 5 |    |     mapping(address => uint256) balances;
 6 | *  |     function deposit(uint256 amount) public {
 7 | *  |         balances[msg.sender] += amount;
 8 | *  |         emit Deposited(amount);
 9 |    |     }
10 |    | }",
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "deposit");
        assert_eq!(blocks[0].tallies.covered, LineCount::new(3));
        assert!(blocks[0].tallies.untouched.is_zero());
        assert!(blocks[0].is_totally_covered);
    }

    #[test]
    fn marked_legacy_rows_outside_functions_still_count() {
        let blocks = scan(
            "\
 1 | *  | uint256 public cap = 100;
 2 |    | uint256 public floor = 1;
 3 | *  | function f() public {
 4 | *  |     z = 1;
 5 |    | }",
        );
        assert_eq!(blocks.len(), 2);
        let residue = &blocks[1];
        assert_eq!(residue.kind, BlockKind::ContractLevel);
        assert_eq!(residue.tallies.covered, LineCount::new(1));
        assert!(residue.tallies.untouched.is_zero());
    }
}
