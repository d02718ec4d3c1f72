//! Source positions carried by every AST node

use std::fmt;

/// A position in the original SQL text, 1-based.
///
/// The parser stamps every node it builds; the core only threads positions
/// through to error messages. A zero span means "no position available",
/// which happens for synthesized nodes such as DEFAULT argument fillers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub line: u32,
    pub col: u32,
}

impl Span {
    pub const ZERO: Span = Span { line: 0, col: 0 };

    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Whether this span points at real source text.
    pub fn is_known(&self) -> bool {
        *self != Self::ZERO
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "line {}, column {}", self.line, self.col)
        } else {
            write!(f, "<unknown position>")
        }
    }
}
