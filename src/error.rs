//! Error types for the expression core

use crate::ast::Span;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while binding, validating or typing an expression tree.
///
/// Structural errors (operand counts, malformed argument lists) are detected
/// before any type work. Resolution errors carry the attempted signature so
/// callers can display it. Type errors carry a position plus an
/// expected-vs-found description. Broken core invariants (a literal holding a
/// payload its tag does not allow) panic instead of producing an `Error`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Structural errors
    #[error("{span}: invalid operand count for {operator}: expected {expected}, found {found}")]
    InvalidOperandCount {
        span: Span,
        operator: String,
        expected: String,
        found: usize,
    },

    #[error("{span}: cannot mix named and positional arguments in call to {operator}")]
    MixedArguments { span: Span, operator: String },

    #[error("{span}: no parameter named {name} in call to {operator}")]
    UnknownArgumentName {
        span: Span,
        operator: String,
        name: String,
    },

    // Resolution errors
    #[error("{span}: no matching routine for {signature}")]
    NoMatchingRoutine { span: Span, signature: String },

    #[error("{span}: unknown identifier: {name}")]
    UnknownIdentifier { span: Span, name: String },

    #[error("{span}: unknown type name: {name}")]
    UnknownTypeName { span: Span, name: String },

    // Type errors
    #[error("{span}: cannot apply {operator} to ({found}); allowed: {allowed}")]
    OperandTypeMismatch {
        span: Span,
        operator: String,
        found: String,
        allowed: String,
    },

    #[error("{span}: type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        span: Span,
        expected: String,
        found: String,
    },

    #[error("{span}: invalid collation combination: different collations {left} and {right}")]
    DifferentCollations {
        span: Span,
        left: String,
        right: String,
    },

    #[error("{span}: interval literal '{literal}' does not match {qualifier}")]
    InvalidIntervalLiteral {
        span: Span,
        literal: String,
        qualifier: String,
    },

    #[error("{span}: interval {unit} field value {value} out of range in '{literal}'")]
    IntervalFieldOverflow {
        span: Span,
        unit: String,
        value: String,
        literal: String,
    },

    // System errors
    #[error("Internal error: {0}")]
    Internal(String),
}
