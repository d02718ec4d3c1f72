//! The standard operator table
//!
//! Process-wide singletons for the SQL operators the core knows natively.
//! Precedence levels: OR 22, AND 24, NOT 26, IS-family 28, comparisons and
//! LIKE/BETWEEN/IN 30, additive 40, multiplicative and concatenation 60,
//! unary prefix 80, postfix/atoms 100.

use crate::ast::{Call, Kind, Node};
use crate::dialect::SqlWriter;
use crate::error::{Error, Result};
use crate::operator::{
    CallBinding, FunctionCategory, Operator, OperatorRegistry, OperandCountRange, Precedence,
    ReturnTypeInference,
};
use crate::typing::{DataType, TypeFamily, checker, inference};
use std::sync::{Arc, LazyLock};

macro_rules! op {
    ($(#[$attr:meta])* $name:ident, $builder:expr) => {
        $(#[$attr])*
        pub static $name: LazyLock<Arc<Operator>> = LazyLock::new(|| Arc::new($builder));
    };
}

fn boolean_connective(name: &str, kind: Kind, level: Precedence) -> Operator {
    Operator::infix(name, kind, level)
        .with_checker(checker::family(&[TypeFamily::Boolean, TypeFamily::Boolean]))
        .with_return_inference(inference::to_nullable(inference::explicit(
            DataType::Boolean,
        )))
        .with_operand_inference(inference::explicit_operands(DataType::Boolean))
}

fn comparison(name: &str, kind: Kind) -> Operator {
    Operator::infix(name, kind, 30)
        .with_checker(checker::comparable(2))
        .with_return_inference(inference::to_nullable(inference::explicit(
            DataType::Boolean,
        )))
        .with_operand_inference(inference::first_known_operand())
}

fn is_postfix(name: &str, kind: Kind, boolean_operand: bool) -> Operator {
    let check = if boolean_operand {
        checker::family(&[TypeFamily::Boolean])
    } else {
        checker::any(OperandCountRange::of(1))
    };
    // IS predicates never yield NULL.
    Operator::postfix(name, kind, 28)
        .with_checker(check)
        .with_return_inference(inference::explicit(DataType::Boolean))
}

fn additive(name: &str, kind: Kind) -> Operator {
    Operator::infix(name, kind, 40)
        .with_checker(checker::or(vec![
            checker::family(&[TypeFamily::Numeric, TypeFamily::Numeric]),
            checker::family(&[
                TypeFamily::IntervalYearMonth,
                TypeFamily::IntervalYearMonth,
            ]),
            checker::family(&[TypeFamily::IntervalDayTime, TypeFamily::IntervalDayTime]),
        ]))
        .with_return_inference(inference::to_nullable(inference::least_restrictive()))
        .with_operand_inference(inference::first_known_operand())
}

fn multiplicative(name: &str, kind: Kind) -> Operator {
    Operator::infix(name, kind, 60)
        .with_checker(checker::family(&[TypeFamily::Numeric, TypeFamily::Numeric]))
        .with_return_inference(inference::to_nullable(inference::least_restrictive()))
        .with_operand_inference(inference::first_known_operand())
}

fn unary_sign(name: &str, kind: Kind) -> Operator {
    Operator::prefix(name, kind, 80)
        .with_checker(checker::or(vec![
            checker::family(&[TypeFamily::Numeric]),
            checker::family(&[TypeFamily::IntervalYearMonth]),
            checker::family(&[TypeFamily::IntervalDayTime]),
        ]))
        .with_return_inference(inference::to_nullable(inference::operand_at(0)))
}

fn pattern_match(name: &str, kind: Kind) -> Operator {
    Operator::special_with_precedence(name, kind, 30)
        .with_operand_range(OperandCountRange::between(2, 3))
        .with_checker(checker::or(vec![
            checker::family(&[TypeFamily::Character, TypeFamily::Character]),
            checker::family(&[
                TypeFamily::Character,
                TypeFamily::Character,
                TypeFamily::Character,
            ]),
        ]))
        .with_return_inference(inference::to_nullable(inference::explicit(
            DataType::Boolean,
        )))
        .with_unparser(Arc::new(unparse_pattern_match))
}

fn between(name: &str) -> Operator {
    Operator::special_with_precedence(name, Kind::Between, 30)
        .with_operand_range(OperandCountRange::of(3))
        .with_checker(checker::comparable(3))
        .with_return_inference(inference::to_nullable(inference::explicit(
            DataType::Boolean,
        )))
        .with_unparser(Arc::new(unparse_between))
}

fn in_operator(name: &str, kind: Kind) -> Operator {
    Operator::infix(name, kind, 30)
        .with_return_inference(inference::to_nullable(inference::explicit(
            DataType::Boolean,
        )))
        .with_unparser(Arc::new(unparse_in))
}

// Boolean connectives and negation.
op!(OR, boolean_connective("OR", Kind::Or, 22));
op!(AND, boolean_connective("AND", Kind::And, 24));
op!(
    NOT,
    Operator::prefix("NOT", Kind::Not, 26)
        .with_checker(checker::family(&[TypeFamily::Boolean]))
        .with_return_inference(inference::to_nullable(inference::explicit(
            DataType::Boolean
        )))
        .with_operand_inference(inference::explicit_operands(DataType::Boolean))
);

// IS family. The negated forms share the base kind; deep equality works
// over names, so the distinction survives.
op!(IS_NULL, is_postfix("IS NULL", Kind::IsNull, false));
op!(IS_NOT_NULL, is_postfix("IS NOT NULL", Kind::IsNotNull, false));
op!(IS_TRUE, is_postfix("IS TRUE", Kind::IsTrue, true));
op!(IS_NOT_TRUE, is_postfix("IS NOT TRUE", Kind::IsTrue, true));
op!(IS_FALSE, is_postfix("IS FALSE", Kind::IsFalse, true));
op!(IS_NOT_FALSE, is_postfix("IS NOT FALSE", Kind::IsFalse, true));
op!(IS_UNKNOWN, is_postfix("IS UNKNOWN", Kind::IsUnknown, true));
op!(
    IS_NOT_UNKNOWN,
    is_postfix("IS NOT UNKNOWN", Kind::IsUnknown, true)
);
op!(
    IS_DISTINCT_FROM,
    Operator::infix("IS DISTINCT FROM", Kind::IsDistinctFrom, 28)
        .with_checker(checker::comparable(2))
        .with_return_inference(inference::explicit(DataType::Boolean))
);
op!(
    IS_NOT_DISTINCT_FROM,
    Operator::infix("IS NOT DISTINCT FROM", Kind::IsDistinctFrom, 28)
        .with_checker(checker::comparable(2))
        .with_return_inference(inference::explicit(DataType::Boolean))
);

// Comparisons.
op!(EQUALS, comparison("=", Kind::Equals));
op!(NOT_EQUALS, comparison("<>", Kind::NotEquals));
op!(LESS_THAN, comparison("<", Kind::LessThan));
op!(LESS_THAN_OR_EQUAL, comparison("<=", Kind::LessThanOrEqual));
op!(GREATER_THAN, comparison(">", Kind::GreaterThan));
op!(
    GREATER_THAN_OR_EQUAL,
    comparison(">=", Kind::GreaterThanOrEqual)
);

// Arithmetic.
op!(PLUS, additive("+", Kind::Plus));
op!(MINUS, additive("-", Kind::Minus));
op!(TIMES, multiplicative("*", Kind::Times));
op!(DIVIDE, multiplicative("/", Kind::Divide));
op!(UNARY_PLUS, unary_sign("+", Kind::PlusPrefix));
op!(UNARY_MINUS, unary_sign("-", Kind::MinusPrefix));

op!(
    CONCAT,
    Operator::infix("||", Kind::Concat, 60)
        .with_checker(checker::or(vec![
            checker::family(&[TypeFamily::Character, TypeFamily::Character]),
            checker::family(&[TypeFamily::Binary, TypeFamily::Binary]),
        ]))
        .with_return_inference(Arc::new(ConcatReturn))
);

// Pattern matching and range/membership predicates.
op!(LIKE, pattern_match("LIKE", Kind::Like));
op!(NOT_LIKE, pattern_match("NOT LIKE", Kind::Like));
op!(SIMILAR_TO, pattern_match("SIMILAR TO", Kind::Similar));
op!(BETWEEN, between("BETWEEN"));
op!(NOT_BETWEEN, between("NOT BETWEEN"));
op!(IN, in_operator("IN", Kind::In));
op!(NOT_IN, in_operator("NOT IN", Kind::NotIn));

// Keyword-syntax constructs.
op!(
    CAST,
    Operator::special("CAST", Kind::Cast)
        .with_operand_range(OperandCountRange::of(2))
        .with_return_inference(inference::cast_return())
        .with_unparser(Arc::new(unparse_cast))
);
op!(
    CASE,
    Operator::special("CASE", Kind::Case)
        .with_operand_range(OperandCountRange::of(3))
        .with_return_inference(inference::case_return())
        .with_unparser(Arc::new(unparse_case))
);
op!(
    ROW,
    Operator::special("ROW", Kind::Row)
        .with_operand_range(OperandCountRange::at_least(1))
        .with_return_inference(Arc::new(RowReturn))
);
op!(
    DEFAULT,
    Operator::function_id("DEFAULT", Kind::Default, FunctionCategory::System)
        .with_return_inference(inference::explicit(DataType::Unknown))
);
op!(
    ARGUMENT_ASSIGNMENT,
    Operator::special("=>", Kind::ArgumentAssignment)
        .with_operand_range(OperandCountRange::of(2))
        .with_return_inference(inference::operand_at(0))
        .with_unparser(Arc::new(unparse_argument_assignment))
);
op!(
    ITEM,
    Operator::special_with_precedence("ITEM", Kind::Item, 100)
        .with_operand_range(OperandCountRange::of(2))
        .with_checker(checker::or(vec![
            checker::family(&[TypeFamily::Array, TypeFamily::Numeric]),
            checker::family(&[TypeFamily::Multiset, TypeFamily::Numeric]),
            checker::family(&[TypeFamily::Any, TypeFamily::Numeric]),
        ]))
        .with_return_inference(Arc::new(ItemReturn))
        .with_unparser(Arc::new(unparse_item))
);

// String and numeric functions.
op!(
    UPPER,
    char_function("UPPER", inference::to_nullable(inference::operand_at(0)))
);
op!(
    LOWER,
    char_function("LOWER", inference::to_nullable(inference::operand_at(0)))
);
op!(
    CHAR_LENGTH,
    char_function(
        "CHAR_LENGTH",
        inference::to_nullable(inference::explicit(DataType::Integer))
    )
);
op!(
    CHARACTER_LENGTH,
    char_function(
        "CHARACTER_LENGTH",
        inference::to_nullable(inference::explicit(DataType::Integer))
    )
);
op!(
    SUBSTRING,
    Operator::function("SUBSTRING", Kind::Substring, FunctionCategory::String)
        .with_checker(checker::or(vec![
            checker::family(&[TypeFamily::Character, TypeFamily::Numeric]),
            checker::family(&[
                TypeFamily::Character,
                TypeFamily::Numeric,
                TypeFamily::Numeric,
            ]),
        ]))
        .with_return_inference(inference::to_nullable(inference::operand_at(0)))
        .with_unparser(Arc::new(unparse_substring))
);
op!(
    TRIM,
    Operator::special("TRIM", Kind::Trim)
        .with_operand_range(OperandCountRange::of(3))
        .with_checker(checker::family(&[
            TypeFamily::Symbol,
            TypeFamily::Character,
            TypeFamily::Character,
        ]))
        .with_return_inference(inference::to_nullable(inference::operand_at(2)))
        .with_unparser(Arc::new(unparse_trim))
);
op!(
    COALESCE,
    Operator::function("COALESCE", Kind::Coalesce, FunctionCategory::System)
        .with_checker(checker::any(OperandCountRange::at_least(1)))
        .with_return_inference(Arc::new(CoalesceReturn))
);
op!(
    NULLIF,
    Operator::function("NULLIF", Kind::NullIf, FunctionCategory::System)
        .with_checker(checker::comparable(2))
        .with_operand_range(OperandCountRange::of(2))
        .with_return_inference(Arc::new(NullIfReturn))
);
op!(
    ABS,
    Operator::function("ABS", Kind::Function, FunctionCategory::Numeric)
        .with_checker(checker::or(vec![
            checker::family(&[TypeFamily::Numeric]),
            checker::family(&[TypeFamily::IntervalYearMonth]),
            checker::family(&[TypeFamily::IntervalDayTime]),
        ]))
        .with_return_inference(inference::to_nullable(inference::operand_at(0)))
);
op!(
    MOD,
    Operator::function("MOD", Kind::Mod, FunctionCategory::Numeric)
        .with_checker(checker::family(&[TypeFamily::Numeric, TypeFamily::Numeric]))
        .with_return_inference(inference::to_nullable(inference::least_restrictive()))
);
op!(
    POWER,
    Operator::function("POWER", Kind::Function, FunctionCategory::Numeric)
        .with_checker(checker::family(&[TypeFamily::Numeric, TypeFamily::Numeric]))
        .with_return_inference(inference::to_nullable(inference::explicit(
            DataType::Double
        )))
);
op!(
    EXTRACT,
    Operator::special("EXTRACT", Kind::Extract)
        .with_operand_range(OperandCountRange::of(2))
        .with_checker(checker::family(&[TypeFamily::Symbol, TypeFamily::Any]))
        .with_return_inference(inference::to_nullable(inference::explicit(
            DataType::BigInt
        )))
        .with_unparser(Arc::new(unparse_extract))
);
op!(
    POSITION,
    Operator::special("POSITION", Kind::Position)
        .with_operand_range(OperandCountRange::of(2))
        .with_checker(checker::family(&[
            TypeFamily::Character,
            TypeFamily::Character
        ]))
        .with_return_inference(inference::to_nullable(inference::explicit(
            DataType::Integer
        )))
        .with_unparser(Arc::new(unparse_position))
);
op!(
    OVERLAY,
    Operator::special("OVERLAY", Kind::Overlay)
        .with_operand_range(OperandCountRange::between(3, 4))
        .with_checker(checker::or(vec![
            checker::family(&[
                TypeFamily::Character,
                TypeFamily::Character,
                TypeFamily::Numeric,
            ]),
            checker::family(&[
                TypeFamily::Character,
                TypeFamily::Character,
                TypeFamily::Numeric,
                TypeFamily::Numeric,
            ]),
        ]))
        .with_return_inference(inference::to_nullable(inference::operand_at(0)))
        .with_unparser(Arc::new(unparse_overlay))
);

// Aggregates.
op!(
    COUNT,
    Operator::function("COUNT", Kind::Count, FunctionCategory::System)
        .with_checker(checker::any(OperandCountRange::between(0, 1)))
        .with_return_inference(inference::explicit(DataType::BigInt))
);
op!(
    SUM,
    Operator::function("SUM", Kind::Sum, FunctionCategory::Numeric)
        .with_checker(checker::family(&[TypeFamily::Numeric]))
        .with_return_inference(inference::to_nullable(inference::operand_at(0)))
);
op!(
    MIN,
    Operator::function("MIN", Kind::Min, FunctionCategory::System)
        .with_checker(checker::any(OperandCountRange::of(1)))
        .with_return_inference(inference::to_nullable(inference::operand_at(0)))
);
op!(
    MAX,
    Operator::function("MAX", Kind::Max, FunctionCategory::System)
        .with_checker(checker::any(OperandCountRange::of(1)))
        .with_return_inference(inference::to_nullable(inference::operand_at(0)))
);
op!(
    AVG,
    Operator::function("AVG", Kind::Avg, FunctionCategory::Numeric)
        .with_checker(checker::family(&[TypeFamily::Numeric]))
        .with_return_inference(inference::to_nullable(inference::operand_at(0)))
);

// Niladic datetime functions.
op!(
    CURRENT_DATE,
    Operator::function_id("CURRENT_DATE", Kind::Function, FunctionCategory::TimeDate)
        .with_return_inference(inference::explicit(DataType::Date))
);
op!(
    CURRENT_TIME,
    Operator::function_id("CURRENT_TIME", Kind::Function, FunctionCategory::TimeDate)
        .with_return_inference(inference::explicit(DataType::Time))
);
op!(
    CURRENT_TIMESTAMP,
    Operator::function_id(
        "CURRENT_TIMESTAMP",
        Kind::Function,
        FunctionCategory::TimeDate
    )
    .with_return_inference(inference::explicit(DataType::Timestamp))
);

fn char_function(name: &str, ret: Arc<dyn ReturnTypeInference>) -> Operator {
    Operator::function(name, Kind::Function, FunctionCategory::String)
        .with_checker(checker::family(&[TypeFamily::Character]))
        .with_return_inference(ret)
}

/// A placeholder operator for a function call whose target has not been
/// resolved yet. Validation swaps it for a registry entry.
pub fn unresolved_function(name: impl Into<String>) -> Arc<Operator> {
    Arc::new(Operator::function(
        name,
        Kind::UnresolvedFunction,
        FunctionCategory::UserDefined,
    ))
}

/// Registers the whole standard table.
pub fn register_standard(registry: &mut OperatorRegistry) {
    let all: &[&LazyLock<Arc<Operator>>] = &[
        &OR,
        &AND,
        &NOT,
        &IS_NULL,
        &IS_NOT_NULL,
        &IS_TRUE,
        &IS_NOT_TRUE,
        &IS_FALSE,
        &IS_NOT_FALSE,
        &IS_UNKNOWN,
        &IS_NOT_UNKNOWN,
        &IS_DISTINCT_FROM,
        &IS_NOT_DISTINCT_FROM,
        &EQUALS,
        &NOT_EQUALS,
        &LESS_THAN,
        &LESS_THAN_OR_EQUAL,
        &GREATER_THAN,
        &GREATER_THAN_OR_EQUAL,
        &PLUS,
        &MINUS,
        &TIMES,
        &DIVIDE,
        &UNARY_PLUS,
        &UNARY_MINUS,
        &CONCAT,
        &LIKE,
        &NOT_LIKE,
        &SIMILAR_TO,
        &BETWEEN,
        &NOT_BETWEEN,
        &IN,
        &NOT_IN,
        &CAST,
        &CASE,
        &ROW,
        &DEFAULT,
        &ARGUMENT_ASSIGNMENT,
        &ITEM,
        &UPPER,
        &LOWER,
        &CHAR_LENGTH,
        &CHARACTER_LENGTH,
        &SUBSTRING,
        &TRIM,
        &COALESCE,
        &NULLIF,
        &ABS,
        &MOD,
        &POWER,
        &EXTRACT,
        &POSITION,
        &OVERLAY,
        &COUNT,
        &SUM,
        &MIN,
        &MAX,
        &AVG,
        &CURRENT_DATE,
        &CURRENT_TIME,
        &CURRENT_TIMESTAMP,
    ];
    for op in all {
        registry.register(Arc::clone(op));
    }
}

// Return-type strategies specific to single operators.

/// `||`: lengths add; the variable-width flavor wins.
struct ConcatReturn;

impl ReturnTypeInference for ConcatReturn {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        let types = binding.operand_types()?;
        let nullable = types.iter().any(|t| t.is_nullable());
        let combined = match (types[0].base_type(), types[1].base_type()) {
            (
                DataType::Char { len: a, charset, .. } | DataType::Varchar { len: a, charset, .. },
                DataType::Char { len: b, .. } | DataType::Varchar { len: b, .. },
            ) => DataType::Varchar {
                len: a + b,
                charset: charset.clone(),
                collation: None,
            },
            (
                DataType::Binary(a) | DataType::Varbinary(a),
                DataType::Binary(b) | DataType::Varbinary(b),
            ) => DataType::Varbinary(a + b),
            _ => DataType::least_restrictive(&types).ok_or_else(|| Error::TypeMismatch {
                span: binding.span(),
                expected: "two character or two binary operands".to_string(),
                found: format!("{}, {}", types[0], types[1]),
            })?,
        };
        Ok(if nullable {
            combined.into_nullable()
        } else {
            combined
        })
    }
}

/// ROW(...): a row of the operand types with positional field names.
struct RowReturn;

impl ReturnTypeInference for RowReturn {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        let types = binding.operand_types()?;
        Ok(DataType::Row(
            types
                .into_iter()
                .enumerate()
                .map(|(i, ty)| (format!("EXPR${}", i), ty))
                .collect(),
        ))
    }
}

/// COALESCE: least restrictive over the operands, nullable only when
/// every operand is.
struct CoalesceReturn;

impl ReturnTypeInference for CoalesceReturn {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        let types = binding.operand_types()?;
        let combined =
            DataType::least_restrictive(&types).ok_or_else(|| Error::TypeMismatch {
                span: binding.span(),
                expected: "mutually comparable operand types".to_string(),
                found: types
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        let all_nullable = types.iter().all(|t| t.is_nullable());
        Ok(combined.with_nullability(all_nullable))
    }
}

/// NULLIF: always nullable, regardless of the operands.
struct NullIfReturn;

impl ReturnTypeInference for NullIfReturn {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        Ok(binding.operand_type(0)?.into_nullable())
    }
}

/// `a[i]`: the collection's element type, nullable because the subscript
/// may be out of range.
struct ItemReturn;

impl ReturnTypeInference for ItemReturn {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        let collection = binding.operand_type(0)?;
        match collection.base_type() {
            DataType::Array(element) | DataType::Multiset(element) => {
                Ok(element.as_ref().clone().into_nullable())
            }
            DataType::Any => Ok(DataType::Any),
            other => Err(Error::TypeMismatch {
                span: binding.span(),
                expected: "an array or multiset".to_string(),
                found: other.to_string(),
            }),
        }
    }
}

// Keyword-syntax renderers.

fn unparse_pattern_match(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    left_prec: Precedence,
    right_prec: Precedence,
) {
    let operator = call.operator();
    writer.unparse(call.operand(0), left_prec, operator.left_prec());
    writer.token(operator.name());
    let escaped = call.operand_count() > 2;
    writer.unparse(
        call.operand(1),
        operator.right_prec(),
        if escaped { 0 } else { right_prec },
    );
    if escaped {
        writer.keyword("ESCAPE");
        writer.unparse(call.operand(2), 0, right_prec);
    }
}

fn unparse_between(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    left_prec: Precedence,
    _right_prec: Precedence,
) {
    let operator = call.operator();
    writer.unparse(call.operand(0), left_prec, operator.left_prec());
    writer.token(operator.name());
    // Both bounds render under the operator's own right precedence so an
    // AND inside a bound keeps its parentheses.
    writer.unparse(call.operand(1), operator.right_prec(), operator.right_prec());
    writer.keyword("AND");
    writer.unparse(call.operand(2), operator.right_prec(), operator.right_prec());
}

fn unparse_in(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    left_prec: Precedence,
    right_prec: Precedence,
) {
    let operator = call.operator();
    writer.unparse(call.operand(0), left_prec, operator.left_prec());
    writer.token(operator.name());
    match call.operand(1) {
        Node::List(list) => {
            writer.open_paren();
            writer.unparse_list(list);
            writer.close_paren();
        }
        other => writer.unparse(other, operator.right_prec(), right_prec),
    }
}

fn unparse_cast(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    _left_prec: Precedence,
    _right_prec: Precedence,
) {
    writer.token("CAST");
    writer.open_call();
    writer.unparse(call.operand(0), 0, 0);
    writer.keyword("AS");
    writer.unparse(call.operand(1), 0, 0);
    writer.close_paren();
}

fn unparse_case(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    _left_prec: Precedence,
    _right_prec: Precedence,
) {
    writer.keyword("CASE");
    if let (Some(whens), Some(thens)) = (call.operand(0).as_list(), call.operand(1).as_list()) {
        for (when, then) in whens.iter().zip(thens.iter()) {
            writer.keyword("WHEN");
            writer.unparse(when, 0, 0);
            writer.keyword("THEN");
            writer.unparse(then, 0, 0);
        }
    }
    writer.keyword("ELSE");
    writer.unparse(call.operand(2), 0, 0);
    writer.keyword("END");
}

fn unparse_argument_assignment(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    _left_prec: Precedence,
    _right_prec: Precedence,
) {
    writer.unparse(call.operand(1), 0, 0);
    writer.token("=>");
    writer.unparse(call.operand(0), 0, 0);
}

fn unparse_item(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    left_prec: Precedence,
    _right_prec: Precedence,
) {
    let operator = call.operator();
    writer.unparse(call.operand(0), left_prec, operator.left_prec());
    writer.open_bracket();
    writer.unparse(call.operand(1), 0, 0);
    writer.close_bracket();
}

fn unparse_substring(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    _left_prec: Precedence,
    _right_prec: Precedence,
) {
    writer.token("SUBSTRING");
    writer.open_call();
    writer.unparse(call.operand(0), 0, 0);
    writer.keyword("FROM");
    writer.unparse(call.operand(1), 0, 0);
    if call.operand_count() > 2 {
        writer.keyword("FOR");
        writer.unparse(call.operand(2), 0, 0);
    }
    writer.close_paren();
}

fn unparse_trim(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    _left_prec: Precedence,
    _right_prec: Precedence,
) {
    writer.token("TRIM");
    writer.open_call();
    writer.unparse(call.operand(0), 0, 0);
    writer.unparse(call.operand(1), 0, 0);
    writer.keyword("FROM");
    writer.unparse(call.operand(2), 0, 0);
    writer.close_paren();
}

fn unparse_extract(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    _left_prec: Precedence,
    _right_prec: Precedence,
) {
    writer.token("EXTRACT");
    writer.open_call();
    writer.unparse(call.operand(0), 0, 0);
    writer.keyword("FROM");
    writer.unparse(call.operand(1), 0, 0);
    writer.close_paren();
}

fn unparse_position(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    _left_prec: Precedence,
    _right_prec: Precedence,
) {
    writer.token("POSITION");
    writer.open_call();
    writer.unparse(call.operand(0), 0, 0);
    writer.keyword("IN");
    writer.unparse(call.operand(1), 0, 0);
    writer.close_paren();
}

fn unparse_overlay(
    writer: &mut SqlWriter<'_>,
    call: &Call,
    _left_prec: Precedence,
    _right_prec: Precedence,
) {
    writer.token("OVERLAY");
    writer.open_call();
    writer.unparse(call.operand(0), 0, 0);
    writer.keyword("PLACING");
    writer.unparse(call.operand(1), 0, 0);
    writer.keyword("FROM");
    writer.unparse(call.operand(2), 0, 0);
    if call.operand_count() > 3 {
        writer.keyword("FOR");
        writer.unparse(call.operand(3), 0, 0);
    }
    writer.close_paren();
}
