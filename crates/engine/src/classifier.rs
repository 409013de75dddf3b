// crates/engine/src/classifier.rs
//! Line classification predicates.
//!
//! All predicates take the comment-free code of one trace row (see
//! [`crate::comment::CommentTracker`]) and are pure.

use regex::Regex;
use std::sync::OnceLock;

use crate::trace::TraceLine;

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("classifier patterns are valid"))
}

/// True iff the hit-count column is non-empty (or the row is in the legacy layout).
pub fn is_compiler_active(line: &TraceLine<'_>) -> bool {
    line.is_compiler_active()
}

/// A row made only of a closing brace is never counted.
pub fn is_closing_brace(code: &str) -> bool {
    code.trim() == "}"
}

/// Whether an unmarked line may be reported as untouched.
///
/// Rejects declaration and visibility scaffolding. Failing this check only
/// prevents "untouched" status; a marked line is still covered/reverted.
pub fn is_untouched_eligible(code: &str) -> bool {
    static VISIBILITY: OnceLock<Regex> = OnceLock::new();
    static DEBUG_PRINT: OnceLock<Regex> = OnceLock::new();

    let trimmed = code.trim();
    if trimmed.is_empty() {
        return false;
    }

    if trimmed.starts_with("function")
        || matches!(trimmed, "{" | "}" | "(" | ")" | ");" | "});" | "} else {")
    {
        return false;
    }

    // Tail of a multi-line signature: `) external returns (uint256) {`
    if trimmed.starts_with(')') && trimmed.ends_with('{') {
        return false;
    }

    if regex(&VISIBILITY, r"\b(public|private|external|internal|view)\b").is_match(trimmed) {
        return false;
    }

    if trimmed.starts_with("/*") || trimmed.starts_with('*') || trimmed.starts_with("//") {
        return false;
    }

    if regex(&DEBUG_PRINT, r"^console2?\.log\w*\s*\(").is_match(trimmed) {
        return false;
    }

    true
}

/// Strict variant used by logical coverage: only statements that do something.
pub fn is_logical_line(code: &str) -> bool {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    static KEYWORDS_ONLY: OnceLock<Regex> = OnceLock::new();

    if !is_untouched_eligible(code) {
        return false;
    }
    let trimmed = code.trim();

    if trimmed.starts_with("import") || trimmed.starts_with("pragma") {
        return false;
    }

    if regex(
        &HEADER,
        r"^(abstract\s+contract|contract|library|interface|struct|enum|event|error|type|using)\b",
    )
    .is_match(trimmed)
    {
        return false;
    }

    if regex(
        &KEYWORDS_ONLY,
        r"^((public|private|internal|external|view|pure|payable|virtual|override(\s*\([^)]*\))?|returns\s*\([^)]*\))\s*)+[{;]?$",
    )
    .is_match(trimmed)
    {
        return false;
    }

    !is_uninitialized_declaration(trimmed)
}

/// `uint256 x;`, `address payable owner;`, `mapping(address => uint) balances;`
fn is_uninitialized_declaration(code: &str) -> bool {
    static DECLARATION: OnceLock<Regex> = OnceLock::new();
    const STATEMENTS: &[&str] = &[
        "return", "delete", "emit", "revert", "break", "continue", "throw", "else", "new",
    ];

    let first_word = code
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .next()
        .unwrap_or_default();
    if STATEMENTS.contains(&first_word) {
        return false;
    }

    regex(
        &DECLARATION,
        r"^(mapping\s*\(.+\)|[A-Za-z_][\w.]*(\s*\[[^\]]*\])*)(\s+(public|private|internal|constant|immutable|memory|storage|calldata|payable|transient))*\s+[A-Za-z_]\w*\s*;$",
    )
    .is_match(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaffolding_is_not_untouched_eligible() {
        for line in [
            "",
            "function foo(uint256 a)",
            "{",
            "}",
            "} else {",
            "(",
            ")",
            ");",
            "});",
            ") external returns (uint256) {",
            "public",
            "uint256 public total;",
            "// comment",
            "/* block",
            "* natspec",
            "console.log(\"x\", x);",
            "console2.logUint(x);",
        ] {
            assert!(!is_untouched_eligible(line), "{line:?} should be ineligible");
        }
    }

    #[test]
    fn statements_are_untouched_eligible() {
        for line in [
            "balance += amount;",
            "require(msg.sender == owner);",
            "if (x > 0) {",
            "return total;",
            "publicKey = key;",
            "internalCall();",
        ] {
            assert!(is_untouched_eligible(line), "{line:?} should be eligible");
        }
    }

    #[test]
    fn logical_excludes_headers_and_declarations() {
        for line in [
            "pragma solidity ^0.8.20;",
            "import {A} from \"./A.sol\";",
            "contract Vault is Base {",
            "struct Position {",
            "event Deposit(address who, uint256 amount);",
            "error Unauthorized();",
            "enum State { Open, Closed }",
            "uint256 x;",
            "address payable owner;",
            "mapping(address => uint256) balances;",
            "bytes32[] memory hashes;",
            "pure",
            "returns (uint256)",
            "override(A, B) returns (bool) {",
        ] {
            assert!(!is_logical_line(line), "{line:?} should not be logical");
        }
    }

    #[test]
    fn logical_keeps_statements() {
        for line in [
            "uint256 x = a + b;",
            "return x;",
            "delete pending[id];",
            "emit Deposit(msg.sender, amount);",
            "counter++;",
            "for (uint256 i; i < n; ++i) {",
            "token.transfer(to, amount);",
        ] {
            assert!(is_logical_line(line), "{line:?} should be logical");
        }
    }

    #[test]
    fn closing_brace_detection() {
        assert!(is_closing_brace("  }  "));
        assert!(!is_closing_brace("} else {"));
        assert!(!is_closing_brace("});"));
    }
}
