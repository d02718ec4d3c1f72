//! The expression and operator core of a SQL front end.
//!
//! Trees of [`ast::Node`]s represent SQL expressions. An [`operator::Operator`]
//! defines precedence, syntax shape, and pluggable type strategies for a
//! family of calls; the [`operator::OperatorRegistry`] resolves overloads. A
//! [`typing::Validator`] session derives types bottom-up, and a
//! [`dialect::Dialect`] renders trees back to SQL text top-down with
//! precedence-aware parenthesization.
//!
//! ```
//! use sqltree::ast::{Identifier, Span};
//! use sqltree::dialect::Dialect;
//! use sqltree::operator::table as ops;
//!
//! let a = Identifier::simple("a", Span::ZERO).into();
//! let b = Identifier::simple("b", Span::ZERO).into();
//! let c = Identifier::simple("c", Span::ZERO).into();
//! let sum = ops::PLUS.create_call(vec![a, b], Span::ZERO);
//! let tree = ops::TIMES.create_call(vec![sum, c], Span::ZERO);
//!
//! assert_eq!(Dialect::ansi().render(&tree), "(a + b) * c");
//! ```

pub mod ast;
pub mod dialect;
pub mod error;
pub mod interval;
pub mod operator;
pub mod typing;

pub use error::{Error, Result};
