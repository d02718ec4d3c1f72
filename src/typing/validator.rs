//! The validation session
//!
//! One `Validator` per statement: it owns the node-to-type cache and the
//! call-nesting depth counter, and must not be shared across concurrent
//! validations. Type derivation runs bottom-up; each call resolves its
//! operator (when still unresolved), checks operand counts and types,
//! infers its return type, and records the result in the cache.

use crate::ast::{Call, Kind, Node, NodeId};
use crate::error::{Error, Result};
use crate::operator::binding::{CallBinding, permuted_operands};
use crate::operator::{Operator, OperatorRegistry};
use crate::typing::{Collation, DataType, Scope};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

pub struct Validator<'r> {
    registry: &'r OperatorRegistry,
    type_cache: HashMap<NodeId, DataType>,
    call_depth: usize,
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r OperatorRegistry) -> Self {
        Self {
            registry,
            type_cache: HashMap::new(),
            call_depth: 0,
        }
    }

    /// A session over the process-wide standard operator table.
    pub fn standard() -> Validator<'static> {
        Validator::new(OperatorRegistry::global())
    }

    pub fn registry(&self) -> &'r OperatorRegistry {
        self.registry
    }

    /// Nesting depth of the call currently being validated. Nonzero while
    /// inside routine resolution; strategy objects use it to detect
    /// default-parameter context.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    pub fn cached_type(&self, id: NodeId) -> Option<&DataType> {
        self.type_cache.get(&id)
    }

    pub fn set_node_type(&mut self, id: NodeId, ty: DataType) {
        self.type_cache.insert(id, ty);
    }

    /// Validates a tree and returns its type. Alias for `derive_type`,
    /// matching how statement-level callers read.
    pub fn validate(&mut self, scope: &dyn Scope, node: &Node) -> Result<DataType> {
        self.derive_type(scope, node)
    }

    /// Derives (and caches) a node's type.
    pub fn derive_type(&mut self, scope: &dyn Scope, node: &Node) -> Result<DataType> {
        if let Some(ty) = self.type_cache.get(&node.id()) {
            return Ok(ty.clone());
        }
        let ty = match node {
            Node::Literal(lit) => lit.derive_type(),
            Node::Identifier(ident) => {
                let resolved = scope.resolve_identifier(&ident.names).ok_or_else(|| {
                    Error::UnknownIdentifier {
                        span: ident.span,
                        name: ident.full_name(),
                    }
                })?;
                // An attached COLLATE clause overrides at the EXPLICIT
                // level.
                match (&ident.collation, resolved.is_character()) {
                    (Some(collation), true) => {
                        resolved.with_char_collation(Some(collation.clone()))
                    }
                    _ => resolved,
                }
            }
            Node::DynamicParam(_) => DataType::Unknown,
            Node::DataType(spec) => spec.derive_type()?,
            Node::List(list) => {
                let mut fields = Vec::with_capacity(list.len());
                for (i, item) in list.iter().enumerate() {
                    fields.push((format!("EXPR${}", i), self.derive_type(scope, item)?));
                }
                DataType::Row(fields)
            }
            Node::Call(call) => self.validate_call(scope, call)?,
        };
        self.type_cache.insert(node.id(), ty.clone());
        Ok(ty)
    }

    fn validate_call(&mut self, scope: &dyn Scope, call: &Call) -> Result<DataType> {
        self.call_depth += 1;
        let result = self.validate_call_inner(scope, call);
        self.call_depth -= 1;
        result
    }

    fn validate_call_inner(&mut self, scope: &dyn Scope, call: &Call) -> Result<DataType> {
        let mut operator = Arc::clone(call.operator());
        if operator.kind() == Kind::UnresolvedFunction {
            operator = self.resolve_routine(scope, call)?;
            trace!(name = operator.name(), "routine resolved");
        }

        // Named arguments and freshly resolved operators both require a
        // rebuilt operand list in formal order.
        let named = call
            .operands()
            .iter()
            .any(|o| o.kind() == Kind::ArgumentAssignment);
        let owned: Option<Call> = if named || !Arc::ptr_eq(&operator, call.operator()) {
            let operands = permuted_operands(&operator, call)?;
            Some(Call::new(Arc::clone(&operator), operands, call.span))
        } else {
            None
        };
        let effective: &Call = owned.as_ref().unwrap_or(call);

        // Structural before semantic.
        operator.validate_operand_count(effective)?;

        if let Some(checker) = operator.operand_checker().cloned() {
            let mut binding = CallBinding::new(self, scope, effective);
            checker.check_operand_types(&mut binding, true)?;
        }

        let return_type = {
            let mut binding = CallBinding::new(self, scope, effective);
            operator.infer_return_type(&mut binding)?
        };

        // Back-fill dynamic parameter types now the operator is known.
        if let Some(inference) = operator.operand_inference().cloned() {
            let mut operand_types = {
                let mut binding = CallBinding::new(self, scope, effective);
                binding.operand_types()?
            };
            {
                let mut binding = CallBinding::new(self, scope, effective);
                inference.infer_operand_types(&mut binding, &return_type, &mut operand_types)?;
            }
            for (operand, ty) in effective.operands().iter().zip(operand_types) {
                if matches!(operand, Node::DynamicParam(_)) {
                    self.type_cache.insert(operand.id(), ty);
                }
            }
        }

        self.adjust_collation(scope, effective, return_type)
    }

    /// Resolves an unresolved function call against the registry, offering
    /// ROW-kind arguments as column lists first and retrying with their
    /// real row types when no routine accepts that shape.
    fn resolve_routine(&mut self, scope: &dyn Scope, call: &Call) -> Result<Arc<Operator>> {
        let name = call.operator().name().to_string();

        let assignments = call
            .operands()
            .iter()
            .filter(|o| o.kind() == Kind::ArgumentAssignment)
            .count();
        if assignments > 0 && assignments != call.operand_count() {
            return Err(Error::MixedArguments {
                span: call.span,
                operator: name,
            });
        }
        let named = assignments > 0 && assignments == call.operand_count();

        let mut arg_names: Vec<String> = Vec::new();
        let mut values: Vec<&Node> = Vec::with_capacity(call.operand_count());
        for operand in call.operands() {
            if named {
                let assignment = operand.as_call().ok_or_else(|| {
                    Error::Internal("argument assignment is not a call".to_string())
                })?;
                let ident = assignment.operand(1).as_identifier().ok_or_else(|| {
                    Error::Internal("argument assignment name is not an identifier".to_string())
                })?;
                arg_names.push(ident.full_name());
                values.push(assignment.operand(0));
            } else {
                values.push(operand);
            }
        }

        let mut arg_types = Vec::with_capacity(values.len());
        for value in &values {
            arg_types.push(self.derive_type(scope, value)?);
        }
        let names_opt = named.then_some(arg_names.as_slice());

        let row_positions: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.kind() == Kind::Row)
            .map(|(i, _)| i)
            .collect();
        if !row_positions.is_empty() {
            let mut as_column_lists = arg_types.clone();
            for &i in &row_positions {
                as_column_lists[i] = DataType::ColumnList;
            }
            if let Ok(op) = self.registry.lookup_routine(
                &name,
                &as_column_lists,
                names_opt,
                None,
                None,
                call.span,
            ) {
                return Ok(op);
            }
        }

        self.registry
            .lookup_routine(&name, &arg_types, names_opt, None, None, call.span)
    }

    /// Post-inference adjustment for unary/binary operators over character
    /// operands: the result collation is recomputed through the
    /// coercibility lattice.
    fn adjust_collation(
        &mut self,
        scope: &dyn Scope,
        call: &Call,
        return_type: DataType,
    ) -> Result<DataType> {
        if !return_type.is_character()
            || call.operand_count() == 0
            || call.operand_count() > 2
        {
            return Ok(return_type);
        }
        let mut operand_types = Vec::with_capacity(call.operand_count());
        for operand in call.operands() {
            operand_types.push(self.derive_type(scope, operand)?);
        }
        if !operand_types.iter().all(|t| t.is_character()) {
            return Ok(return_type);
        }

        let mut combined: Option<Collation> = operand_types[0].char_collation().cloned();
        for ty in &operand_types[1..] {
            combined =
                Collation::combine_dyadic(combined.as_ref(), ty.char_collation(), call.span)?;
        }
        Ok(return_type.with_char_collation(combined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Identifier, Literal, Span};
    use crate::operator::table as ops;
    use crate::typing::{Coercibility, MapScope};
    use rust_decimal::Decimal;

    fn number(n: i64) -> Node {
        Literal::exact_number(Decimal::from(n), Span::ZERO).into()
    }

    fn ident(name: &str) -> Node {
        Identifier::simple(name, Span::ZERO).into()
    }

    #[test]
    fn arithmetic_over_literals() {
        let tree = ops::PLUS.create_call(vec![number(1), number(2)], Span::ZERO);
        let mut validator = Validator::standard();
        let ty = validator.validate(&MapScope::new(), &tree).unwrap();
        assert_eq!(ty, DataType::Integer);
    }

    #[test]
    fn nullable_operand_makes_result_nullable() {
        let scope = MapScope::new().with_column("a", DataType::Integer.into_nullable());
        let tree = ops::PLUS.create_call(vec![ident("a"), number(2)], Span::ZERO);
        let mut validator = Validator::standard();
        let ty = validator.validate(&scope, &tree).unwrap();
        assert!(ty.is_nullable());
        assert_eq!(*ty.base_type(), DataType::Integer);
    }

    #[test]
    fn unknown_identifier_is_positioned() {
        let tree = ops::PLUS.create_call(
            vec![Identifier::simple("missing", Span::new(3, 7)).into(), number(1)],
            Span::ZERO,
        );
        let mut validator = Validator::standard();
        let err = validator.validate(&MapScope::new(), &tree).unwrap_err();
        match err {
            Error::UnknownIdentifier { span, name } => {
                assert_eq!(span, Span::new(3, 7));
                assert_eq!(name, "missing");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn operand_type_mismatch_reports_signatures() {
        let scope = MapScope::new().with_column("b", DataType::Boolean);
        let tree = ops::PLUS.create_call(vec![ident("b"), number(1)], Span::ZERO);
        let mut validator = Validator::standard();
        let err = validator.validate(&scope, &tree).unwrap_err();
        match err {
            Error::OperandTypeMismatch { allowed, .. } => {
                assert!(allowed.contains("<NUMERIC>"), "allowed = {}", allowed);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn dynamic_param_type_is_back_filled() {
        let param = Node::DynamicParam(crate::ast::DynamicParam::new(0, Span::ZERO));
        let param_id = param.id();
        let tree = ops::PLUS.create_call(vec![number(1), param], Span::ZERO);
        let mut validator = Validator::standard();
        validator.validate(&MapScope::new(), &tree).unwrap();
        assert_eq!(
            validator.cached_type(param_id),
            Some(&DataType::Integer)
        );
    }

    #[test]
    fn concat_combines_implicit_collations() {
        let col = DataType::varchar(10)
            .with_char_collation(Some(Collation::implicit("ISO-8859-1$en_US")));
        let scope = MapScope::new()
            .with_column("a", col.clone())
            .with_column("b", col);
        let tree = ops::CONCAT.create_call(vec![ident("a"), ident("b")], Span::ZERO);
        let mut validator = Validator::standard();
        let ty = validator.validate(&scope, &tree).unwrap();
        let collation = ty.char_collation().unwrap();
        assert_eq!(collation.coercibility, Coercibility::Implicit);
    }

    #[test]
    fn clashing_explicit_collations_are_a_hard_error() {
        let left = DataType::varchar(10).with_char_collation(Some(Collation::explicit("latin1")));
        let right = DataType::varchar(10).with_char_collation(Some(Collation::explicit("utf8")));
        let scope = MapScope::new()
            .with_column("a", left)
            .with_column("b", right);
        let tree = ops::CONCAT.create_call(vec![ident("a"), ident("b")], Span::ZERO);
        let mut validator = Validator::standard();
        assert!(matches!(
            validator.validate(&scope, &tree).unwrap_err(),
            Error::DifferentCollations { .. }
        ));
    }

    #[test]
    fn cache_is_per_session() {
        let tree = ops::PLUS.create_call(vec![number(1), number(2)], Span::ZERO);
        let mut validator = Validator::standard();
        validator.validate(&MapScope::new(), &tree).unwrap();
        assert!(validator.cached_type(tree.id()).is_some());

        let fresh = Validator::standard();
        assert!(fresh.cached_type(tree.id()).is_none());
    }
}
