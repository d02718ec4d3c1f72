//! The validation-time SQL type model
//!
//! Types carry their parameters (precision, scale, length, charset,
//! collation, interval qualifier) and answer three questions the binder
//! needs: which family a type belongs to, whether one type is castable from
//! another, and how formal types rank against an actual type's own
//! precedence list during overload narrowing. Nullability is a wrapper, as
//! in storage-facing models, so family checks always look through it.

use crate::interval::IntervalQualifier;
use crate::typing::Collation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved SQL type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    // Exact numerics
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal {
        precision: u32,
        scale: u32,
    },
    // Approximate numerics
    Real,
    Double,
    // Character types
    Char {
        len: u32,
        charset: Option<String>,
        collation: Option<Collation>,
    },
    Varchar {
        len: u32,
        charset: Option<String>,
        collation: Option<Collation>,
    },
    // Binary types
    Binary(u32),
    Varbinary(u32),
    // Temporal types
    Date,
    Time,
    Timestamp,
    Interval(IntervalQualifier),
    // Structured types
    Row(Vec<(String, DataType)>),
    Array(Box<DataType>),
    Multiset(Box<DataType>),
    // Internal types
    Symbol,
    /// The provisional type given to a ROW argument while it is being
    /// offered to column-list routine parameters.
    ColumnList,
    Any,
    /// The type of a NULL literal.
    Null,
    /// Not yet known, e.g. a dynamic parameter before inference.
    Unknown,
    // Nullability wrapper
    Nullable(Box<DataType>),
}

/// Parameter-free type discriminant, used by precedence lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeName {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Real,
    Double,
    Char,
    Varchar,
    Binary,
    Varbinary,
    Date,
    Time,
    Timestamp,
    Interval,
    Row,
    Array,
    Multiset,
    Symbol,
    ColumnList,
    Any,
    Null,
    Unknown,
}

/// Broad type families for operand checking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Boolean,
    Numeric,
    Character,
    Binary,
    Date,
    Time,
    Timestamp,
    IntervalYearMonth,
    IntervalDayTime,
    Row,
    Array,
    Multiset,
    Symbol,
    ColumnList,
    Any,
    Null,
    Unknown,
}

impl TypeFamily {
    /// Whether an actual of family `other` satisfies an operand slot that
    /// declares this family.
    pub fn accepts(&self, other: TypeFamily) -> bool {
        if matches!(
            other,
            TypeFamily::Null | TypeFamily::Unknown | TypeFamily::Any
        ) {
            return true;
        }
        match self {
            TypeFamily::Any => true,
            TypeFamily::Date | TypeFamily::Time | TypeFamily::Timestamp => matches!(
                other,
                TypeFamily::Date | TypeFamily::Time | TypeFamily::Timestamp
            ) && *self == other
                || other == TypeFamily::Timestamp && *self == TypeFamily::Date,
            family => *family == other,
        }
    }
}

impl DataType {
    /// Strips the nullability wrapper.
    pub fn base_type(&self) -> &DataType {
        match self {
            DataType::Nullable(inner) => inner.base_type(),
            other => other,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, DataType::Nullable(_)) || matches!(self, DataType::Null)
    }

    /// Wraps in `Nullable` unless already nullable (or the NULL type).
    pub fn into_nullable(self) -> DataType {
        if self.is_nullable() {
            self
        } else {
            DataType::Nullable(Box::new(self))
        }
    }

    /// Rebuilds this type with the given nullability.
    pub fn with_nullability(self, nullable: bool) -> DataType {
        let base = match self {
            DataType::Nullable(inner) => *inner,
            other => other,
        };
        if nullable {
            DataType::Nullable(Box::new(base))
        } else {
            base
        }
    }

    pub fn type_name(&self) -> TypeName {
        match self.base_type() {
            DataType::Boolean => TypeName::Boolean,
            DataType::TinyInt => TypeName::TinyInt,
            DataType::SmallInt => TypeName::SmallInt,
            DataType::Integer => TypeName::Integer,
            DataType::BigInt => TypeName::BigInt,
            DataType::Decimal { .. } => TypeName::Decimal,
            DataType::Real => TypeName::Real,
            DataType::Double => TypeName::Double,
            DataType::Char { .. } => TypeName::Char,
            DataType::Varchar { .. } => TypeName::Varchar,
            DataType::Binary(_) => TypeName::Binary,
            DataType::Varbinary(_) => TypeName::Varbinary,
            DataType::Date => TypeName::Date,
            DataType::Time => TypeName::Time,
            DataType::Timestamp => TypeName::Timestamp,
            DataType::Interval(_) => TypeName::Interval,
            DataType::Row(_) => TypeName::Row,
            DataType::Array(_) => TypeName::Array,
            DataType::Multiset(_) => TypeName::Multiset,
            DataType::Symbol => TypeName::Symbol,
            DataType::ColumnList => TypeName::ColumnList,
            DataType::Any => TypeName::Any,
            DataType::Null => TypeName::Null,
            DataType::Unknown => TypeName::Unknown,
            DataType::Nullable(_) => unreachable!("base_type strips Nullable"),
        }
    }

    pub fn family(&self) -> TypeFamily {
        match self.base_type() {
            DataType::Boolean => TypeFamily::Boolean,
            DataType::TinyInt
            | DataType::SmallInt
            | DataType::Integer
            | DataType::BigInt
            | DataType::Decimal { .. }
            | DataType::Real
            | DataType::Double => TypeFamily::Numeric,
            DataType::Char { .. } | DataType::Varchar { .. } => TypeFamily::Character,
            DataType::Binary(_) | DataType::Varbinary(_) => TypeFamily::Binary,
            DataType::Date => TypeFamily::Date,
            DataType::Time => TypeFamily::Time,
            DataType::Timestamp => TypeFamily::Timestamp,
            DataType::Interval(q) => {
                if q.is_year_month() {
                    TypeFamily::IntervalYearMonth
                } else {
                    TypeFamily::IntervalDayTime
                }
            }
            DataType::Row(_) => TypeFamily::Row,
            DataType::Array(_) => TypeFamily::Array,
            DataType::Multiset(_) => TypeFamily::Multiset,
            DataType::Symbol => TypeFamily::Symbol,
            DataType::ColumnList => TypeFamily::ColumnList,
            DataType::Any => TypeFamily::Any,
            DataType::Null => TypeFamily::Null,
            DataType::Unknown => TypeFamily::Unknown,
            DataType::Nullable(_) => unreachable!("base_type strips Nullable"),
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.family() == TypeFamily::Numeric
    }

    pub fn is_exact_numeric(&self) -> bool {
        matches!(
            self.base_type(),
            DataType::TinyInt
                | DataType::SmallInt
                | DataType::Integer
                | DataType::BigInt
                | DataType::Decimal { .. }
        )
    }

    pub fn is_character(&self) -> bool {
        self.family() == TypeFamily::Character
    }

    /// The collation carried by a character type, looking through
    /// nullability.
    pub fn char_collation(&self) -> Option<&Collation> {
        match self.base_type() {
            DataType::Char { collation, .. } | DataType::Varchar { collation, .. } => {
                collation.as_ref()
            }
            _ => None,
        }
    }

    /// Rebuilds a character type with the given collation, preserving the
    /// nullability wrapper. Non-character types are returned unchanged.
    pub fn with_char_collation(self, new_collation: Option<Collation>) -> DataType {
        let nullable = self.is_nullable() && !matches!(self, DataType::Null);
        let base = match self {
            DataType::Nullable(inner) => *inner,
            other => other,
        };
        let rebuilt = match base {
            DataType::Char { len, charset, .. } => DataType::Char {
                len,
                charset,
                collation: new_collation,
            },
            DataType::Varchar { len, charset, .. } => DataType::Varchar {
                len,
                charset,
                collation: new_collation,
            },
            other => other,
        };
        if nullable {
            DataType::Nullable(Box::new(rebuilt))
        } else {
            rebuilt
        }
    }

    /// This type's own castability precedence list, most precise first.
    /// Overload narrowing consults the *actual* type's list; different
    /// types define different partial orders.
    pub fn precedence_list(&self) -> &'static [TypeName] {
        use TypeName::*;
        match self.type_name() {
            TinyInt => &[TinyInt, SmallInt, Integer, BigInt, Decimal, Real, Double],
            SmallInt => &[SmallInt, Integer, BigInt, Decimal, Real, Double],
            Integer => &[Integer, BigInt, Decimal, Real, Double],
            BigInt => &[BigInt, Decimal, Real, Double],
            Decimal => &[Decimal, Real, Double],
            Real => &[Real, Double],
            Double => &[Double],
            Char => &[Char, Varchar],
            Varchar => &[Varchar, Char],
            Binary => &[Binary, Varbinary],
            Varbinary => &[Varbinary, Binary],
            Boolean => &[Boolean],
            Date => &[Date, Timestamp],
            Time => &[Time],
            Timestamp => &[Timestamp],
            Interval => &[Interval],
            Row => &[Row],
            Array => &[Array],
            Multiset => &[Multiset],
            Symbol => &[Symbol],
            ColumnList => &[ColumnList],
            Any | Null | Unknown => &[],
        }
    }

    /// The rank of `formal` in this (actual) type's precedence list; lower
    /// is more precise. `None` when the formal does not appear at all.
    pub fn precedence_of(&self, formal: &DataType) -> Option<usize> {
        let name = formal.type_name();
        self.precedence_list().iter().position(|n| *n == name)
    }

    /// Whether a value of type `from` can be cast to this type.
    pub fn is_castable_from(&self, from: &DataType) -> bool {
        let to = self.base_type();
        let from = from.base_type();

        if matches!(
            from,
            DataType::Null | DataType::Unknown | DataType::Any
        ) || matches!(to, DataType::Any)
        {
            return true;
        }

        match to.family() {
            TypeFamily::Numeric => matches!(
                from.family(),
                TypeFamily::Numeric | TypeFamily::Character
            ),
            TypeFamily::Character => !matches!(
                from.family(),
                TypeFamily::Row
                    | TypeFamily::Array
                    | TypeFamily::Multiset
                    | TypeFamily::ColumnList
                    | TypeFamily::Symbol
            ),
            TypeFamily::Boolean => matches!(
                from.family(),
                TypeFamily::Boolean | TypeFamily::Character
            ),
            TypeFamily::Binary => {
                matches!(from.family(), TypeFamily::Binary | TypeFamily::Character)
            }
            TypeFamily::Date => matches!(
                from.family(),
                TypeFamily::Date | TypeFamily::Timestamp | TypeFamily::Character
            ),
            TypeFamily::Time => matches!(
                from.family(),
                TypeFamily::Time | TypeFamily::Timestamp | TypeFamily::Character
            ),
            TypeFamily::Timestamp => matches!(
                from.family(),
                TypeFamily::Date
                    | TypeFamily::Time
                    | TypeFamily::Timestamp
                    | TypeFamily::Character
            ),
            TypeFamily::IntervalYearMonth | TypeFamily::IntervalDayTime => {
                from.family() == to.family()
                    || matches!(from.family(), TypeFamily::Character)
                    || from.is_exact_numeric()
            }
            TypeFamily::Row => match (to, from) {
                (DataType::Row(to_fields), DataType::Row(from_fields)) => {
                    to_fields.len() == from_fields.len()
                        && to_fields
                            .iter()
                            .zip(from_fields)
                            .all(|((_, t), (_, f))| t.is_castable_from(f))
                }
                _ => false,
            },
            TypeFamily::Array => match (to, from) {
                (DataType::Array(t), DataType::Array(f)) => t.is_castable_from(f),
                _ => false,
            },
            TypeFamily::Multiset => match (to, from) {
                (DataType::Multiset(t), DataType::Multiset(f)) => t.is_castable_from(f),
                _ => false,
            },
            TypeFamily::ColumnList => {
                matches!(from.family(), TypeFamily::ColumnList | TypeFamily::Row)
            }
            TypeFamily::Symbol => from.family() == TypeFamily::Symbol,
            TypeFamily::Any => true,
            TypeFamily::Null | TypeFamily::Unknown => false,
        }
    }

    /// The least restrictive type covering all of `types`, or `None` when
    /// the inputs are not combinable. Drives CASE/COALESCE return types.
    pub fn least_restrictive(types: &[DataType]) -> Option<DataType> {
        let nullable = types.iter().any(|t| t.is_nullable());
        let concrete: Vec<&DataType> = types
            .iter()
            .map(|t| t.base_type())
            .filter(|t| !matches!(t, DataType::Null | DataType::Unknown))
            .collect();

        let Some(first) = concrete.first() else {
            return Some(DataType::Null);
        };

        let combined = if concrete.iter().all(|t| t.is_numeric()) {
            // Widest numeric wins, per the numeric precedence ordering.
            let mut best: &DataType = first;
            for t in &concrete[1..] {
                if numeric_rank(t) > numeric_rank(best) {
                    best = t;
                }
            }
            (*best).clone()
        } else if concrete.iter().all(|t| t.is_character()) {
            let len = concrete
                .iter()
                .map(|t| match t {
                    DataType::Char { len, .. } | DataType::Varchar { len, .. } => *len,
                    _ => 0,
                })
                .max()
                .unwrap_or(0);
            let charset = concrete.iter().find_map(|t| match t {
                DataType::Char { charset, .. } | DataType::Varchar { charset, .. } => {
                    charset.clone()
                }
                _ => None,
            });
            DataType::Varchar {
                len,
                charset,
                collation: None,
            }
        } else if concrete.iter().all(|t| {
            matches!(t.family(), TypeFamily::Date | TypeFamily::Timestamp)
        }) {
            if concrete.iter().all(|t| t.family() == TypeFamily::Date) {
                DataType::Date
            } else {
                DataType::Timestamp
            }
        } else if concrete
            .iter()
            .all(|t| t.type_name() == first.type_name())
        {
            (*first).clone()
        } else {
            return None;
        };

        Some(if nullable {
            combined.into_nullable()
        } else {
            combined
        })
    }
}

fn numeric_rank(t: &DataType) -> u8 {
    match t.base_type() {
        DataType::TinyInt => 0,
        DataType::SmallInt => 1,
        DataType::Integer => 2,
        DataType::BigInt => 3,
        DataType::Decimal { .. } => 4,
        DataType::Real => 5,
        DataType::Double => 6,
        _ => 0,
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::TinyInt => write!(f, "TINYINT"),
            DataType::SmallInt => write!(f, "SMALLINT"),
            DataType::Integer => write!(f, "INTEGER"),
            DataType::BigInt => write!(f, "BIGINT"),
            DataType::Decimal { precision, scale } => {
                write!(f, "DECIMAL({}, {})", precision, scale)
            }
            DataType::Real => write!(f, "REAL"),
            DataType::Double => write!(f, "DOUBLE"),
            DataType::Char { len, .. } => write!(f, "CHAR({})", len),
            DataType::Varchar { len, .. } => write!(f, "VARCHAR({})", len),
            DataType::Binary(len) => write!(f, "BINARY({})", len),
            DataType::Varbinary(len) => write!(f, "VARBINARY({})", len),
            DataType::Date => write!(f, "DATE"),
            DataType::Time => write!(f, "TIME"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::Interval(q) => write!(f, "INTERVAL {}", q),
            DataType::Row(fields) => {
                write!(f, "ROW(")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", name, ty)?;
                }
                write!(f, ")")
            }
            DataType::Array(inner) => write!(f, "{} ARRAY", inner),
            DataType::Multiset(inner) => write!(f, "{} MULTISET", inner),
            DataType::Symbol => write!(f, "SYMBOL"),
            DataType::ColumnList => write!(f, "COLUMN_LIST"),
            DataType::Any => write!(f, "ANY"),
            DataType::Null => write!(f, "NULL"),
            DataType::Unknown => write!(f, "UNKNOWN"),
            DataType::Nullable(inner) => write!(f, "{}", inner),
        }
    }
}

/// Shorthand constructors used throughout the operator table and tests.
impl DataType {
    pub fn varchar(len: u32) -> DataType {
        DataType::Varchar {
            len,
            charset: None,
            collation: None,
        }
    }

    pub fn char(len: u32) -> DataType {
        DataType::Char {
            len,
            charset: None,
            collation: None,
        }
    }

    pub fn decimal(precision: u32, scale: u32) -> DataType {
        DataType::Decimal { precision, scale }
    }
}
