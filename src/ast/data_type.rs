//! Type-specification AST nodes
//!
//! A `DataTypeSpec` is the unresolved, syntactic form of a type as written
//! in CAST or DDL; `derive_type` maps it to the validation-time model.
//! Nullability is tri-state: "not specified" must propagate differently
//! than an explicit NOT NULL.

use super::node::NodeId;
use super::span::Span;
use crate::error::{Error, Result};
use crate::typing::DataType;
use serde::{Deserialize, Serialize};

/// A collection wrapper applied around the element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionWrapper {
    Array,
    Multiset,
}

/// A type as written in the source, before resolution.
#[derive(Clone, Debug)]
pub struct DataTypeSpec {
    pub(super) id: NodeId,
    pub span: Span,
    pub type_name: String,
    pub collection: Option<CollectionWrapper>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub charset: Option<String>,
    pub with_timezone: bool,
    /// `None` = not specified, `Some(true)` = NULL, `Some(false)` = NOT NULL.
    pub nullable: Option<bool>,
}

impl DataTypeSpec {
    pub fn new(type_name: impl Into<String>, span: Span) -> Self {
        Self {
            id: NodeId::next(),
            span,
            type_name: type_name.into(),
            collection: None,
            precision: None,
            scale: None,
            charset: None,
            with_timezone: false,
            nullable: None,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_collection(mut self, wrapper: CollectionWrapper) -> Self {
        self.collection = Some(wrapper);
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Resolves the spec against the built-in type names.
    pub fn derive_type(&self) -> Result<DataType> {
        let name = self.type_name.trim().to_uppercase();
        let element = match name.as_str() {
            "BOOLEAN" => DataType::Boolean,
            "TINYINT" => DataType::TinyInt,
            "SMALLINT" => DataType::SmallInt,
            "INTEGER" | "INT" => DataType::Integer,
            "BIGINT" => DataType::BigInt,
            "DECIMAL" | "NUMERIC" | "DEC" => DataType::Decimal {
                precision: self.precision.unwrap_or(19),
                scale: self.scale.unwrap_or(0),
            },
            "REAL" => DataType::Real,
            "DOUBLE" | "DOUBLE PRECISION" | "FLOAT" => DataType::Double,
            "CHAR" | "CHARACTER" => DataType::Char {
                len: self.precision.unwrap_or(1),
                charset: self.charset.clone(),
                collation: None,
            },
            "VARCHAR" | "CHARACTER VARYING" => DataType::Varchar {
                len: self.precision.unwrap_or(1),
                charset: self.charset.clone(),
                collation: None,
            },
            "BINARY" => DataType::Binary(self.precision.unwrap_or(1)),
            "VARBINARY" => DataType::Varbinary(self.precision.unwrap_or(1)),
            "DATE" => DataType::Date,
            "TIME" => DataType::Time,
            "TIMESTAMP" => DataType::Timestamp,
            "ANY" => DataType::Any,
            _ => {
                return Err(Error::UnknownTypeName {
                    span: self.span,
                    name: self.type_name.clone(),
                });
            }
        };

        let wrapped = match self.collection {
            Some(CollectionWrapper::Array) => DataType::Array(Box::new(element)),
            Some(CollectionWrapper::Multiset) => DataType::Multiset(Box::new(element)),
            None => element,
        };

        // Unspecified nullability stays unspecified here; only an explicit
        // NULL marks the resolved type nullable.
        Ok(match self.nullable {
            Some(true) => wrapped.into_nullable(),
            _ => wrapped,
        })
    }

    /// Value equality for deep tree comparison; ignores node identity.
    pub fn eq_spec(&self, other: &DataTypeSpec) -> bool {
        self.type_name.eq_ignore_ascii_case(&other.type_name)
            && self.collection == other.collection
            && self.precision == other.precision
            && self.scale == other.scale
            && self.charset == other.charset
            && self.with_timezone == other.with_timezone
            && self.nullable == other.nullable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_builtin_names() {
        let spec = DataTypeSpec::new("varchar", Span::ZERO).with_precision(20);
        assert_eq!(spec.derive_type().unwrap(), DataType::varchar(20));

        let spec = DataTypeSpec::new("DECIMAL", Span::ZERO)
            .with_precision(10)
            .with_scale(2);
        assert_eq!(spec.derive_type().unwrap(), DataType::decimal(10, 2));
    }

    #[test]
    fn tri_state_nullability() {
        let unspecified = DataTypeSpec::new("INT", Span::ZERO);
        assert_eq!(unspecified.derive_type().unwrap(), DataType::Integer);
        assert_eq!(unspecified.nullable, None);

        let not_null = DataTypeSpec::new("INT", Span::ZERO).with_nullable(false);
        assert_eq!(not_null.derive_type().unwrap(), DataType::Integer);
        assert_eq!(not_null.nullable, Some(false));

        let nullable = DataTypeSpec::new("INT", Span::ZERO).with_nullable(true);
        assert!(nullable.derive_type().unwrap().is_nullable());
    }

    #[test]
    fn collection_wrapper() {
        let spec = DataTypeSpec::new("INT", Span::ZERO).with_collection(CollectionWrapper::Array);
        assert_eq!(
            spec.derive_type().unwrap(),
            DataType::Array(Box::new(DataType::Integer))
        );
    }

    #[test]
    fn unknown_name_is_a_user_error() {
        let spec = DataTypeSpec::new("FANCYTYPE", Span::ZERO);
        assert!(matches!(
            spec.derive_type(),
            Err(Error::UnknownTypeName { .. })
        ));
    }
}
