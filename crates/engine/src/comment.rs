// crates/engine/src/comment.rs
//! Comment stripping for Solidity source text.
//!
//! Handles `//` line comments and non-nesting `/* */` block comments that may span
//! several trace rows. String literals are respected so that `"http://"` or
//! `"/*"` inside quotes do not open a comment.

/// Tracks whether the scan is inside a multi-line block comment.
#[derive(Debug, Default, Clone)]
pub struct CommentTracker {
    in_block_comment: bool,
}

impl CommentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code on this line with comments removed, or `None` when
    /// nothing but comment (or whitespace) remains.
    ///
    /// Lines strictly inside a block comment always return `None`.
    pub fn code_portion(&mut self, line: &str) -> Option<String> {
        let mut code = String::with_capacity(line.len());
        let mut chars = line.chars().peekable();
        let mut quote: Option<char> = None;

        while let Some(c) = chars.next() {
            if self.in_block_comment {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_block_comment = false;
                    code.push(' ');
                }
                continue;
            }

            if let Some(q) = quote {
                code.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        code.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
                continue;
            }

            match (c, chars.peek()) {
                ('"' | '\'', _) => {
                    quote = Some(c);
                    code.push(c);
                }
                ('/', Some('/')) => break,
                ('/', Some('*')) => {
                    chars.next();
                    self.in_block_comment = true;
                }
                _ => code.push(c),
            }
        }

        let trimmed = code.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn is_in_block_comment(&self) -> bool {
        self.in_block_comment
    }
}

/// Counts `{` and `}` outside string literals. Expects comment-free code.
pub fn count_braces(code: &str) -> (usize, usize) {
    let mut opens = 0;
    let mut closes = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in code.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => opens += 1,
            '}' => closes += 1,
            _ => {}
        }
    }

    (opens, closes)
}
