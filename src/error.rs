// error.rs - Error type for pattern compilation.
//
// Matching never fails with an error: a match that does not succeed is
// reported as `None`, so compilation is the only fallible operation.

use std::fmt;

/// Error type for regex compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// The pattern is not well-formed. `position` is the byte offset of the
    /// character the parser was looking at when it gave up, or the pattern
    /// length when it ran out of input.
    Syntax { position: usize },
}

impl RegexError {
    /// Byte offset into the pattern where compilation stopped.
    pub fn position(&self) -> usize {
        match self {
            RegexError::Syntax { position } => *position,
        }
    }
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexError::Syntax { position } => write!(f, "syntax error at position {}", position),
        }
    }
}

impl std::error::Error for RegexError {}
