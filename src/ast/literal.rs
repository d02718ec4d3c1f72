//! The literal value model
//!
//! A literal is an immutable (tag, payload) pair with a closed
//! correspondence between the tag and the legal runtime shape of its
//! payload. Constructing a mismatched pair is a broken core invariant and
//! panics; it is never a user-visible error.

use super::node::NodeId;
use super::span::Span;
use crate::interval::IntervalValue;
use crate::typing::{Collation, DataType};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type tag of a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralTag {
    Null,
    Boolean,
    Decimal,
    Double,
    Char,
    Binary,
    Date,
    Time,
    Timestamp,
    Interval,
    Symbol,
}

impl LiteralTag {
    /// The legal payload shapes for this tag.
    pub fn allows(&self, value: &Value) -> bool {
        match self {
            LiteralTag::Null => matches!(value, Value::Null),
            // Boolean admits NULL for the three-valued UNKNOWN.
            LiteralTag::Boolean => matches!(value, Value::Boolean(_) | Value::Null),
            LiteralTag::Decimal | LiteralTag::Double => matches!(value, Value::Number(_)),
            LiteralTag::Char => matches!(value, Value::Str { .. }),
            LiteralTag::Binary => matches!(value, Value::Bytes(_)),
            LiteralTag::Date => matches!(value, Value::Date(_)),
            LiteralTag::Time => matches!(value, Value::Time(_)),
            LiteralTag::Timestamp => matches!(value, Value::Timestamp(_)),
            LiteralTag::Interval => matches!(value, Value::Interval(_)),
            LiteralTag::Symbol => matches!(value, Value::Symbol(_)),
        }
    }
}

/// Literal payloads.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    /// Exact and approximate numerics both carry a decimal payload; the tag
    /// distinguishes DECIMAL from DOUBLE.
    Number(Decimal),
    Str {
        value: String,
        charset: Option<String>,
    },
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Interval(IntervalValue),
    /// A keyword-valued operand, e.g. the flag of TRIM or a time unit.
    Symbol(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str { value, .. } => write!(f, "'{}'", value.replace('\'', "''")),
            Value::Bytes(b) => {
                write!(f, "X'")?;
                for byte in b {
                    write!(f, "{:02X}", byte)?;
                }
                write!(f, "'")
            }
            Value::Date(d) => write!(f, "DATE '{}'", d),
            Value::Time(t) => write!(f, "TIME '{}'", t),
            Value::Timestamp(ts) => write!(f, "TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S")),
            Value::Interval(i) => write!(f, "INTERVAL {}", i),
            Value::Symbol(s) => write!(f, "{}", s),
        }
    }
}

/// A literal AST node: an immutable (tag, payload) pair.
#[derive(Clone, Debug)]
pub struct Literal {
    pub(super) id: NodeId,
    pub span: Span,
    tag: LiteralTag,
    value: Value,
}

impl Literal {
    /// Builds a literal, checking the tag/payload shape invariant.
    ///
    /// # Panics
    ///
    /// Panics when `value`'s shape is not legal for `tag`; that is a bug in
    /// the caller, not a user error.
    pub fn new(tag: LiteralTag, value: Value, span: Span) -> Self {
        assert!(
            tag.allows(&value),
            "literal shape mismatch: {:?} cannot hold {:?}",
            tag,
            value
        );
        Self {
            id: NodeId::next(),
            span,
            tag,
            value,
        }
    }

    pub fn null(span: Span) -> Self {
        Self::new(LiteralTag::Null, Value::Null, span)
    }

    pub fn boolean(value: bool, span: Span) -> Self {
        Self::new(LiteralTag::Boolean, Value::Boolean(value), span)
    }

    /// The three-valued UNKNOWN boolean literal.
    pub fn unknown_boolean(span: Span) -> Self {
        Self::new(LiteralTag::Boolean, Value::Null, span)
    }

    pub fn exact_number(value: Decimal, span: Span) -> Self {
        Self::new(LiteralTag::Decimal, Value::Number(value), span)
    }

    pub fn approx_number(value: Decimal, span: Span) -> Self {
        Self::new(LiteralTag::Double, Value::Number(value), span)
    }

    pub fn string(value: impl Into<String>, span: Span) -> Self {
        Self::new(
            LiteralTag::Char,
            Value::Str {
                value: value.into(),
                charset: None,
            },
            span,
        )
    }

    pub fn string_with_charset(
        value: impl Into<String>,
        charset: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::new(
            LiteralTag::Char,
            Value::Str {
                value: value.into(),
                charset: Some(charset.into()),
            },
            span,
        )
    }

    pub fn binary(value: Vec<u8>, span: Span) -> Self {
        Self::new(LiteralTag::Binary, Value::Bytes(value), span)
    }

    pub fn date(value: NaiveDate, span: Span) -> Self {
        Self::new(LiteralTag::Date, Value::Date(value), span)
    }

    pub fn time(value: NaiveTime, span: Span) -> Self {
        Self::new(LiteralTag::Time, Value::Time(value), span)
    }

    pub fn timestamp(value: NaiveDateTime, span: Span) -> Self {
        Self::new(LiteralTag::Timestamp, Value::Timestamp(value), span)
    }

    pub fn interval(value: IntervalValue, span: Span) -> Self {
        Self::new(LiteralTag::Interval, Value::Interval(value), span)
    }

    pub fn symbol(name: impl Into<String>, span: Span) -> Self {
        Self::new(LiteralTag::Symbol, Value::Symbol(name.into()), span)
    }

    pub fn tag(&self) -> LiteralTag {
        self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    /// The type this literal contributes during validation.
    pub fn derive_type(&self) -> DataType {
        match (&self.tag, &self.value) {
            (LiteralTag::Null, _) => DataType::Null,
            (LiteralTag::Boolean, Value::Null) => DataType::Boolean.into_nullable(),
            (LiteralTag::Boolean, _) => DataType::Boolean,
            (LiteralTag::Decimal, Value::Number(n)) => {
                if n.scale() == 0 {
                    if *n >= Decimal::from(i32::MIN) && *n <= Decimal::from(i32::MAX) {
                        DataType::Integer
                    } else {
                        DataType::BigInt
                    }
                } else {
                    DataType::Decimal {
                        precision: decimal_digits(n),
                        scale: n.scale(),
                    }
                }
            }
            (LiteralTag::Double, _) => DataType::Double,
            (LiteralTag::Char, Value::Str { value, charset }) => DataType::Char {
                len: value.chars().count() as u32,
                charset: charset.clone(),
                collation: Some(Collation::coercible_default()),
            },
            (LiteralTag::Binary, Value::Bytes(b)) => DataType::Binary(b.len() as u32),
            (LiteralTag::Date, _) => DataType::Date,
            (LiteralTag::Time, _) => DataType::Time,
            (LiteralTag::Timestamp, _) => DataType::Timestamp,
            (LiteralTag::Interval, Value::Interval(i)) => {
                DataType::Interval(i.qualifier().clone())
            }
            (LiteralTag::Symbol, _) => DataType::Symbol,
            // `new` enforces the tag/payload correspondence.
            (tag, value) => unreachable!("literal {:?} holding {:?}", tag, value),
        }
    }
}

/// Value equality for literals ignores node identity and position.
impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.value == other.value
    }
}

impl Eq for Literal {}

fn decimal_digits(n: &Decimal) -> u32 {
    let digits = n.mantissa().unsigned_abs().to_string().len() as u32;
    digits.max(n.scale())
}
