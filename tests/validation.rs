//! End-to-end validation: overload resolution, named arguments, typing

use rust_decimal::Decimal;
use sqltree::Error;
use sqltree::ast::{DataTypeSpec, Identifier, Kind, Literal, Node, NodeList, Span};
use sqltree::operator::table as ops;
use sqltree::operator::{FunctionCategory, FunctionMeta, Operator, OperatorRegistry};
use sqltree::typing::{DataType, MapScope, Validator};
use std::sync::Arc;

fn ident(name: &str) -> Node {
    Identifier::simple(name, Span::ZERO).into()
}

fn number(n: i64) -> Node {
    Literal::exact_number(Decimal::from(n), Span::ZERO).into()
}

fn routine(name: &str, params: &[(&str, DataType)], ret: DataType) -> Arc<Operator> {
    Arc::new(
        Operator::function(name, Kind::Function, FunctionCategory::UserDefined)
            .with_function_meta(FunctionMeta {
                category: FunctionCategory::UserDefined,
                param_names: params.iter().map(|(n, _)| n.to_string()).collect(),
                param_types: params.iter().map(|(_, t)| t.clone()).collect(),
                return_type: Some(ret),
            }),
    )
}

#[test]
fn unresolved_call_resolves_through_the_registry() {
    let mut registry = OperatorRegistry::new();
    registry.register(routine(
        "AREA",
        &[("width", DataType::Integer), ("height", DataType::Integer)],
        DataType::BigInt,
    ));

    let call = ops::unresolved_function("area").create_call(vec![number(3), number(4)], Span::ZERO);
    let mut validator = Validator::new(&registry);
    let ty = validator.validate(&MapScope::new(), &call).unwrap();
    assert_eq!(ty, DataType::BigInt);
}

#[test]
fn named_arguments_bind_by_parameter_name() {
    let mut registry = OperatorRegistry::new();
    registry.register(routine(
        "PAD",
        &[
            ("text", DataType::varchar(20)),
            ("fill", DataType::char(1)),
            ("width", DataType::Integer),
        ],
        DataType::varchar(40),
    ));

    // Two named arguments covering the first and third parameters; the
    // second position is filled by the DEFAULT sentinel.
    let named = |name: &str, value: Node| {
        ops::ARGUMENT_ASSIGNMENT.create_call(
            vec![value, Identifier::simple(name, Span::ZERO).into()],
            Span::ZERO,
        )
    };
    let text = Literal::string("abc", Span::ZERO).into();
    let call = ops::unresolved_function("pad")
        .create_call(vec![named("width", number(10)), named("text", text)], Span::ZERO);

    let mut validator = Validator::new(&registry);
    let ty = validator.validate(&MapScope::new(), &call).unwrap();
    assert_eq!(ty, DataType::varchar(40));
}

#[test]
fn mixing_named_and_positional_arguments_fails() {
    let mut registry = OperatorRegistry::new();
    registry.register(routine(
        "F",
        &[("a", DataType::Integer), ("b", DataType::Integer)],
        DataType::Integer,
    ));

    let named = ops::ARGUMENT_ASSIGNMENT.create_call(
        vec![number(2), Identifier::simple("b", Span::ZERO).into()],
        Span::ZERO,
    );
    let call = ops::unresolved_function("F").create_call(vec![number(1), named], Span::ZERO);

    let mut validator = Validator::new(&registry);
    assert!(matches!(
        validator.validate(&MapScope::new(), &call).unwrap_err(),
        Error::MixedArguments { .. }
    ));
}

#[test]
fn unresolvable_call_names_the_attempted_signature() {
    let registry = OperatorRegistry::new();
    let call = ops::unresolved_function("nope").create_call(vec![number(1)], Span::ZERO);

    let mut validator = Validator::new(&registry);
    match validator.validate(&MapScope::new(), &call).unwrap_err() {
        Error::NoMatchingRoutine { signature, .. } => {
            assert_eq!(signature, "NOPE(INTEGER)");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn row_arguments_are_offered_as_column_lists_first() {
    let mut registry = OperatorRegistry::new();
    registry.register(routine(
        "PICK",
        &[("columns", DataType::ColumnList)],
        DataType::Integer,
    ));

    let scope = MapScope::new()
        .with_column("a", DataType::Integer)
        .with_column("b", DataType::Integer);
    let row = ops::ROW.create_call(vec![ident("a"), ident("b")], Span::ZERO);
    let call = ops::unresolved_function("PICK").create_call(vec![row], Span::ZERO);

    let mut validator = Validator::new(&registry);
    let ty = validator.validate(&scope, &call).unwrap();
    assert_eq!(ty, DataType::Integer);
}

#[test]
fn wrong_operand_count_is_structural() {
    let call = ops::PLUS.create_call(vec![number(1)], Span::ZERO);
    let mut validator = Validator::standard();
    match validator.validate(&MapScope::new(), &call).unwrap_err() {
        Error::InvalidOperandCount {
            operator,
            expected,
            found,
            ..
        } => {
            assert_eq!(operator, "+");
            assert_eq!(expected, "2");
            assert_eq!(found, 1);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn is_null_returns_a_non_nullable_boolean() {
    let scope = MapScope::new().with_column("a", DataType::varchar(5).into_nullable());
    let call = ops::IS_NULL.create_call(vec![ident("a")], Span::ZERO);
    let mut validator = Validator::standard();
    let ty = validator.validate(&scope, &call).unwrap();
    assert_eq!(ty, DataType::Boolean);
}

#[test]
fn case_type_is_least_restrictive_over_branches() {
    let whens = NodeList::new(vec![ident("p")], Span::ZERO);
    let thens = NodeList::new(vec![number(1)], Span::ZERO);
    let else_branch = Literal::exact_number(Decimal::new(25, 1), Span::ZERO).into();
    let call = ops::CASE.create_call(
        vec![Node::List(whens), Node::List(thens), else_branch],
        Span::ZERO,
    );

    let scope = MapScope::new().with_column("p", DataType::Boolean);
    let mut validator = Validator::standard();
    let ty = validator.validate(&scope, &call).unwrap();
    assert_eq!(ty, DataType::decimal(2, 1));
}

#[test]
fn coalesce_is_nullable_only_when_every_operand_is() {
    let scope = MapScope::new()
        .with_column("a", DataType::Integer.into_nullable())
        .with_column("b", DataType::Integer);

    let call = ops::COALESCE.create_call(vec![ident("a"), ident("b")], Span::ZERO);
    let mut validator = Validator::standard();
    let ty = validator.validate(&scope, &call).unwrap();
    assert_eq!(ty, DataType::Integer);

    let call = ops::COALESCE.create_call(vec![ident("a"), ident("a")], Span::ZERO);
    let mut validator = Validator::standard();
    let ty = validator.validate(&scope, &call).unwrap();
    assert!(ty.is_nullable());
}

#[test]
fn cast_takes_nullability_from_the_source_unless_pinned() {
    let scope = MapScope::new().with_column("a", DataType::Integer.into_nullable());

    let spec = DataTypeSpec::new("VARCHAR", Span::ZERO).with_precision(10);
    let call = ops::CAST.create_call(vec![ident("a"), spec.into()], Span::ZERO);
    let mut validator = Validator::standard();
    let ty = validator.validate(&scope, &call).unwrap();
    assert!(ty.is_nullable());

    let pinned = DataTypeSpec::new("VARCHAR", Span::ZERO)
        .with_precision(10)
        .with_nullable(false);
    let call = ops::CAST.create_call(vec![ident("a"), pinned.into()], Span::ZERO);
    let mut validator = Validator::standard();
    let ty = validator.validate(&scope, &call).unwrap();
    assert!(!ty.is_nullable());
}

#[test]
fn nullif_is_always_nullable() {
    let call = ops::NULLIF.create_call(vec![number(1), number(2)], Span::ZERO);
    let mut validator = Validator::standard();
    let ty = validator.validate(&MapScope::new(), &call).unwrap();
    assert!(ty.is_nullable());
    assert_eq!(*ty.base_type(), DataType::Integer);
}

#[test]
fn deep_equality_tolerates_unresolved_operators() {
    let unresolved = ops::unresolved_function("UPPER").create_call(vec![ident("a")], Span::ZERO);
    let resolved = ops::UPPER.create_call(vec![ident("a")], Span::ZERO);
    assert!(unresolved.deep_eq(&resolved));
}
