//! Call binding: one call, one scope, one validation session
//!
//! A `CallBinding` is the working context handed to strategy objects. It
//! owns nothing; it borrows the session (mutably, for the type cache), the
//! scope, and the call under examination.

use crate::ast::{Call, Kind, Node, Span};
use crate::error::{Error, Result};
use crate::operator::{Operator, table};
use crate::typing::{DataType, Scope, Validator};
use std::sync::Arc;

pub struct CallBinding<'a, 'r> {
    validator: &'a mut Validator<'r>,
    scope: &'a dyn Scope,
    call: &'a Call,
}

impl<'a, 'r> CallBinding<'a, 'r> {
    pub fn new(validator: &'a mut Validator<'r>, scope: &'a dyn Scope, call: &'a Call) -> Self {
        Self {
            validator,
            scope,
            call,
        }
    }

    pub fn call(&self) -> &Call {
        self.call
    }

    pub fn operator(&self) -> &Arc<Operator> {
        self.call.operator()
    }

    pub fn operator_name(&self) -> &str {
        self.call.operator().name()
    }

    pub fn span(&self) -> Span {
        self.call.span
    }

    pub fn operand_count(&self) -> usize {
        self.call.operand_count()
    }

    pub fn operand(&self, i: usize) -> &Node {
        self.call.operand(i)
    }

    /// Derives (and caches) the type of the i-th operand.
    pub fn operand_type(&mut self, i: usize) -> Result<DataType> {
        self.validator.derive_type(self.scope, self.call.operand(i))
    }

    pub fn operand_types(&mut self) -> Result<Vec<DataType>> {
        let mut types = Vec::with_capacity(self.call.operand_count());
        for operand in self.call.operands() {
            types.push(self.validator.derive_type(self.scope, operand)?);
        }
        Ok(types)
    }

    /// Derives the type of an arbitrary node under this binding's scope.
    pub fn node_type(&mut self, node: &Node) -> Result<DataType> {
        self.validator.derive_type(self.scope, node)
    }

    pub fn validator(&mut self) -> &mut Validator<'r> {
        self.validator
    }

    pub fn scope(&self) -> &dyn Scope {
        self.scope
    }

    pub fn is_operand_null(&self, i: usize) -> bool {
        self.call
            .operand(i)
            .as_literal()
            .is_some_and(|lit| lit.is_null())
    }

    pub fn is_operand_literal(&self, i: usize) -> bool {
        self.call.operand(i).as_literal().is_some()
    }
}

/// Reorders a call's operands to the callee's formal parameter order.
///
/// Positional calls pass through untouched. Named calls (every operand a
/// `name => value` assignment) are permuted to formal order, with missing
/// positions filled by the DEFAULT sentinel; mixing positional and named
/// operands is rejected outright.
pub fn permuted_operands(operator: &Arc<Operator>, call: &Call) -> Result<Vec<Node>> {
    let named = call
        .operands()
        .iter()
        .filter(|o| o.kind() == Kind::ArgumentAssignment)
        .count();
    if named == 0 {
        return Ok(call.operands().to_vec());
    }
    if named != call.operand_count() {
        return Err(Error::MixedArguments {
            span: call.span,
            operator: operator.name().to_string(),
        });
    }

    let param_names: Vec<String> = operator
        .function_meta()
        .map(|meta| meta.param_names.clone())
        .unwrap_or_default();

    // (name, value) pairs out of the assignment calls.
    let mut supplied: Vec<(String, Node)> = Vec::with_capacity(named);
    for operand in call.operands() {
        let assignment = operand
            .as_call()
            .ok_or_else(|| Error::Internal("argument assignment is not a call".to_string()))?;
        let name = assignment
            .operand(1)
            .as_identifier()
            .ok_or_else(|| {
                Error::Internal("argument assignment name is not an identifier".to_string())
            })?
            .full_name();
        supplied.push((name, assignment.operand(0).clone()));
    }

    for (name, _) in &supplied {
        if !param_names
            .iter()
            .any(|p| p.eq_ignore_ascii_case(name))
        {
            return Err(Error::UnknownArgumentName {
                span: call.span,
                operator: operator.name().to_string(),
                name: name.clone(),
            });
        }
    }

    Ok(param_names
        .iter()
        .map(|param| {
            supplied
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(param))
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| table::DEFAULT.create_call(Vec::new(), call.span))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Identifier, Literal};
    use crate::operator::{FunctionCategory, FunctionMeta};
    use rust_decimal::Decimal;

    fn routine_with_params(names: &[&str]) -> Arc<Operator> {
        Arc::new(
            Operator::function("F", Kind::Function, FunctionCategory::UserDefined)
                .with_function_meta(FunctionMeta {
                    category: FunctionCategory::UserDefined,
                    param_names: names.iter().map(|n| n.to_string()).collect(),
                    param_types: names.iter().map(|_| DataType::Any).collect(),
                    return_type: Some(DataType::Integer),
                }),
        )
    }

    fn named_arg(name: &str, value: Node) -> Node {
        table::ARGUMENT_ASSIGNMENT.create_call(
            vec![value, Identifier::simple(name, Span::ZERO).into()],
            Span::ZERO,
        )
    }

    fn number(n: i64) -> Node {
        Literal::exact_number(Decimal::from(n), Span::ZERO).into()
    }

    #[test]
    fn positional_operands_pass_through() {
        let op = routine_with_params(&["a", "b"]);
        let call = Call::new(Arc::clone(&op), vec![number(1), number(2)], Span::ZERO);
        let permuted = permuted_operands(&op, &call).unwrap();
        assert_eq!(permuted.len(), 2);
        assert!(permuted[0].deep_eq(&number(1)));
    }

    #[test]
    fn named_arguments_permute_and_fill_defaults() {
        let op = routine_with_params(&["a", "b", "c"]);
        let call = Call::new(
            Arc::clone(&op),
            vec![named_arg("c", number(3)), named_arg("a", number(1))],
            Span::ZERO,
        );
        let permuted = permuted_operands(&op, &call).unwrap();
        assert_eq!(permuted.len(), 3);
        assert!(permuted[0].deep_eq(&number(1)));
        assert!(permuted[1].is_default_sentinel());
        assert!(permuted[2].deep_eq(&number(3)));
    }

    #[test]
    fn mixed_arguments_are_rejected() {
        let op = routine_with_params(&["a", "b"]);
        let call = Call::new(
            Arc::clone(&op),
            vec![number(1), named_arg("b", number(2))],
            Span::ZERO,
        );
        assert!(matches!(
            permuted_operands(&op, &call),
            Err(Error::MixedArguments { .. })
        ));
    }

    #[test]
    fn unknown_argument_name_is_rejected() {
        let op = routine_with_params(&["a", "b"]);
        let call = Call::new(
            Arc::clone(&op),
            vec![named_arg("nope", number(1)), named_arg("a", number(2))],
            Span::ZERO,
        );
        assert!(matches!(
            permuted_operands(&op, &call),
            Err(Error::UnknownArgumentName { .. })
        ));
    }
}
