//! The closed classification of every node and operator

use serde::{Deserialize, Serialize};

/// The syntactic/semantic role of a node or operator.
///
/// This is a single closed enumeration: new node shapes become new variants
/// here, keeping every `match` over kinds exhaustive at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    // Leaf nodes
    Literal,
    Identifier,
    DynamicParam,
    DataType,
    NodeList,

    // Logical connectives
    And,
    Or,
    Not,

    // Comparisons
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,

    // IS family
    IsNull,
    IsNotNull,
    IsTrue,
    IsFalse,
    IsUnknown,
    IsDistinctFrom,

    // Arithmetic
    Plus,
    Minus,
    Times,
    Divide,
    Mod,
    PlusPrefix,
    MinusPrefix,

    // Strings and patterns
    Concat,
    Like,
    Similar,

    // Membership and ranges
    Between,
    In,
    NotIn,
    Exists,

    // Keyword-syntax constructs
    Cast,
    Case,
    Row,
    Trim,
    Extract,
    Position,
    Overlay,
    Substring,
    Coalesce,
    NullIf,
    Item,
    Collate,
    IntervalQualifier,

    // Call plumbing
    Function,
    UnresolvedFunction,
    ArgumentAssignment,
    Default,

    // Aggregates
    Count,
    Sum,
    Min,
    Max,
    Avg,

    // Window support
    Over,
    Window,

    // Statement-level kinds; the core never builds these, but the unparser
    // must classify them as non-expressions for forced parenthesization.
    Select,
    Insert,
    Update,
    Delete,
    Merge,
    Values,
    OrderBy,
    With,
    Join,
    Other,
}

impl Kind {
    /// Whether a node of this kind is an expression, as opposed to a query
    /// or a piece of clause-level syntax. Forced-parenthesization mode only
    /// wraps expressions.
    pub fn is_expression(&self) -> bool {
        !matches!(
            self,
            Kind::Select
                | Kind::Insert
                | Kind::Update
                | Kind::Delete
                | Kind::Merge
                | Kind::Values
                | Kind::OrderBy
                | Kind::With
                | Kind::Join
                | Kind::Window
                | Kind::NodeList
                | Kind::DataType
                | Kind::IntervalQualifier
        )
    }

    /// Whether this kind is one of the boolean connectives.
    pub fn is_boolean_connective(&self) -> bool {
        matches!(self, Kind::And | Kind::Or | Kind::Not)
    }

    /// Whether this kind is a comparison operator.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Kind::Equals
                | Kind::NotEquals
                | Kind::LessThan
                | Kind::GreaterThan
                | Kind::LessThanOrEqual
                | Kind::GreaterThanOrEqual
                | Kind::IsDistinctFrom
        )
    }

    /// Whether this kind is an aggregate operator.
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            Kind::Count | Kind::Sum | Kind::Min | Kind::Max | Kind::Avg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expressions_vs_queries() {
        assert!(Kind::Plus.is_expression());
        assert!(Kind::Case.is_expression());
        assert!(Kind::Literal.is_expression());
        assert!(!Kind::Select.is_expression());
        assert!(!Kind::OrderBy.is_expression());
        assert!(!Kind::NodeList.is_expression());
    }

    #[test]
    fn category_predicates() {
        assert!(Kind::And.is_boolean_connective());
        assert!(!Kind::Equals.is_boolean_connective());
        assert!(Kind::LessThanOrEqual.is_comparison());
        assert!(Kind::Sum.is_aggregate());
        assert!(!Kind::Substring.is_aggregate());
    }
}
