//! The operator registry and overload resolution
//!
//! Resolution is a pure pipeline of successive candidate-narrowing
//! filters over a `Vec`: name/category, arity, named-parameter coverage,
//! castability, per-position type-precedence narrowing, kind. Given the
//! same registry and argument types it always returns the same operator.

use crate::ast::{Kind, Span};
use crate::error::{Error, Result};
use crate::operator::{FunctionCategory, Operator, Syntax, table};
use crate::typing::DataType;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::trace;

#[derive(Default)]
pub struct OperatorRegistry {
    operators: Vec<Arc<Operator>>,
    by_name: HashMap<String, Vec<usize>>,
}

static GLOBAL: LazyLock<OperatorRegistry> = LazyLock::new(|| {
    let mut registry = OperatorRegistry::new();
    table::register_standard(&mut registry);
    registry
});

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry holding the standard operator table.
    pub fn global() -> &'static OperatorRegistry {
        &GLOBAL
    }

    pub fn register(&mut self, operator: Arc<Operator>) {
        let index = self.operators.len();
        self.by_name
            .entry(operator.name().to_uppercase())
            .or_default()
            .push(index);
        self.operators.push(operator);
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// All operators registered under a name, in registration order.
    pub fn lookup_all(&self, name: &str) -> Vec<Arc<Operator>> {
        self.by_name
            .get(&name.to_uppercase())
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| Arc::clone(&self.operators[i]))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The first operator with the given name and syntax category.
    pub fn lookup(&self, name: &str, syntax: Syntax) -> Option<Arc<Operator>> {
        self.lookup_all(name)
            .into_iter()
            .find(|op| op.syntax() == syntax)
    }

    /// Resolves a routine call to a single operator.
    ///
    /// `arg_names` is `Some` iff the call used named arguments; `category`
    /// and `kind` narrow further when the caller knows them.
    pub fn lookup_routine(
        &self,
        name: &str,
        arg_types: &[DataType],
        arg_names: Option<&[String]>,
        category: Option<FunctionCategory>,
        kind: Option<Kind>,
        span: Span,
    ) -> Result<Arc<Operator>> {
        // 1. Name, syntax and category.
        let mut candidates: Vec<Arc<Operator>> = self
            .lookup_all(name)
            .into_iter()
            .filter(|op| {
                matches!(
                    op.syntax(),
                    Syntax::Function | Syntax::FunctionId | Syntax::Special
                )
            })
            .filter(|op| match category {
                Some(cat) => op.function_meta().is_some_and(|meta| meta.category == cat),
                None => true,
            })
            .collect();
        trace!(name, candidates = candidates.len(), "routine lookup");

        // 2. Arity.
        candidates.retain(|op| op.operand_count_range().contains(arg_types.len()));

        // 3. Named-parameter coverage; positional calls instead pad missing
        //    trailing parameters with the unknown type.
        if let Some(names) = arg_names {
            candidates.retain(|op| {
                op.function_meta().is_some_and(|meta| {
                    names.iter().all(|n| {
                        meta.param_names.iter().any(|p| p.eq_ignore_ascii_case(n))
                    })
                })
            });
        }

        // 4. Castability of each actual to the corresponding formal.
        //    Built-ins without formal metadata pass unconditionally.
        candidates.retain(|op| match formal_types(op) {
            Some(formals) => {
                let actuals = aligned_actuals(op, arg_types, arg_names);
                formals.len() >= actuals.len()
                    && actuals
                        .iter()
                        .zip(formals)
                        .all(|(actual, formal)| {
                            matches!(actual.base_type(), DataType::Unknown)
                                || formal.is_castable_from(actual)
                        })
            }
            None => true,
        });

        // 5. Per-position type-precedence narrowing, left to right, using
        //    each actual type's own precedence list. Positions are formal
        //    positions: named actuals are realigned to declaration order,
        //    exactly as in the castability step.
        if candidates.len() > 1 {
            let position_count = candidates
                .iter()
                .filter_map(|op| formal_types(op).map(<[DataType]>::len))
                .max()
                .unwrap_or(arg_types.len());
            for position in 0..position_count {
                let ranks: Vec<Option<usize>> = candidates
                    .iter()
                    .map(|op| {
                        let formal = formal_types(op)?.get(position)?.clone();
                        let actual =
                            aligned_actuals(op, arg_types, arg_names).into_iter().nth(position)?;
                        actual.precedence_of(&formal)
                    })
                    .collect();
                if let Some(best) = ranks.iter().flatten().min().copied() {
                    let mut keep = ranks.iter().map(|rank| match rank {
                        // Built-ins and unranked formals are never discarded
                        // by precedence narrowing.
                        None => true,
                        Some(rank) => *rank <= best,
                    });
                    candidates.retain(|_| keep.next().unwrap_or(true));
                }
                if candidates.len() <= 1 {
                    break;
                }
            }
        }

        // 6. Kind guard against name collisions across operator families.
        if let Some(kind) = kind {
            candidates.retain(|op| op.kind() == kind);
        }

        trace!(name, survivors = candidates.len(), "routine lookup narrowed");
        candidates.into_iter().next().ok_or_else(|| {
            let rendered: Vec<String> = arg_types.iter().map(|t| t.to_string()).collect();
            Error::NoMatchingRoutine {
                span,
                signature: format!("{}({})", name.to_uppercase(), rendered.join(", ")),
            }
        })
    }
}

fn formal_types(op: &Operator) -> Option<&[DataType]> {
    op.function_meta()
        .filter(|meta| !meta.param_types.is_empty())
        .map(|meta| meta.param_types.as_slice())
}

/// Aligns actual types to the candidate's formal positions: named
/// arguments by parameter name, positional ones padded with unknowns.
fn aligned_actuals(
    op: &Operator,
    arg_types: &[DataType],
    arg_names: Option<&[String]>,
) -> Vec<DataType> {
    let Some(meta) = op.function_meta() else {
        return arg_types.to_vec();
    };
    match arg_names {
        Some(names) => meta
            .param_names
            .iter()
            .map(|param| {
                names
                    .iter()
                    .position(|n| n.eq_ignore_ascii_case(param))
                    .and_then(|i| arg_types.get(i).cloned())
                    .unwrap_or(DataType::Unknown)
            })
            .collect(),
        None => {
            let mut actuals = arg_types.to_vec();
            actuals.resize(meta.param_types.len().max(actuals.len()), DataType::Unknown);
            actuals
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::FunctionMeta;

    fn routine(name: &str, params: Vec<DataType>) -> Arc<Operator> {
        let param_names: Vec<String> = (0..params.len()).map(|i| format!("p{}", i)).collect();
        Arc::new(
            Operator::function(name, Kind::Function, FunctionCategory::UserDefined)
                .with_function_meta(FunctionMeta {
                    category: FunctionCategory::UserDefined,
                    param_names,
                    param_types: params,
                    return_type: Some(DataType::Integer),
                }),
        )
    }

    #[test]
    fn resolves_by_arity() {
        let mut reg = OperatorRegistry::new();
        reg.register(routine("F", vec![DataType::Integer]));
        reg.register(routine("F", vec![DataType::Integer, DataType::Integer]));

        let resolved = reg
            .lookup_routine(
                "f",
                &[DataType::Integer, DataType::Integer],
                None,
                None,
                None,
                Span::ZERO,
            )
            .unwrap();
        assert_eq!(resolved.function_meta().unwrap().param_types.len(), 2);
    }

    #[test]
    fn exact_type_beats_widening() {
        let mut reg = OperatorRegistry::new();
        reg.register(routine("G", vec![DataType::Double]));
        reg.register(routine("G", vec![DataType::Integer]));

        // INTEGER ranks INTEGER above DOUBLE in its own precedence list,
        // so the INTEGER overload wins even though it registered second.
        let resolved = reg
            .lookup_routine("G", &[DataType::Integer], None, None, None, Span::ZERO)
            .unwrap();
        assert_eq!(
            resolved.function_meta().unwrap().param_types,
            vec![DataType::Integer]
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let mut reg = OperatorRegistry::new();
        reg.register(routine("H", vec![DataType::BigInt]));
        reg.register(routine("H", vec![DataType::Double]));

        let first = reg
            .lookup_routine("H", &[DataType::Integer], None, None, None, Span::ZERO)
            .unwrap();
        for _ in 0..5 {
            let again = reg
                .lookup_routine("H", &[DataType::Integer], None, None, None, Span::ZERO)
                .unwrap();
            assert!(Arc::ptr_eq(&first, &again));
        }
        // INTEGER's precedence list ranks BIGINT above DOUBLE.
        assert_eq!(
            first.function_meta().unwrap().param_types,
            vec![DataType::BigInt]
        );
    }

    #[test]
    fn uncastable_arguments_find_no_routine() {
        let mut reg = OperatorRegistry::new();
        reg.register(routine("K", vec![DataType::Boolean]));

        let err = reg
            .lookup_routine("K", &[DataType::Date], None, None, None, Span::ZERO)
            .unwrap_err();
        assert!(matches!(err, Error::NoMatchingRoutine { .. }));
    }

    #[test]
    fn named_arguments_narrow_by_formal_position() {
        fn overload(params: &[(&str, DataType)]) -> Arc<Operator> {
            Arc::new(
                Operator::function("F", Kind::Function, FunctionCategory::UserDefined)
                    .with_function_meta(FunctionMeta {
                        category: FunctionCategory::UserDefined,
                        param_names: params.iter().map(|(n, _)| n.to_string()).collect(),
                        param_types: params.iter().map(|(_, t)| t.clone()).collect(),
                        return_type: Some(DataType::Integer),
                    }),
            )
        }

        let mut reg = OperatorRegistry::new();
        reg.register(overload(&[
            ("a", DataType::varchar(10)),
            ("b", DataType::Double),
        ]));
        reg.register(overload(&[
            ("a", DataType::varchar(10)),
            ("b", DataType::Integer),
        ]));

        // Supplied order is b, a; narrowing must compare the INTEGER actual
        // against formal position 1, not position 0.
        let names = vec!["b".to_string(), "a".to_string()];
        let resolved = reg
            .lookup_routine(
                "F",
                &[DataType::Integer, DataType::char(1)],
                Some(&names),
                None,
                None,
                Span::ZERO,
            )
            .unwrap();
        assert_eq!(
            resolved.function_meta().unwrap().param_types[1],
            DataType::Integer
        );
    }

    #[test]
    fn named_lookup_requires_parameter_coverage() {
        let mut reg = OperatorRegistry::new();
        reg.register(routine("M", vec![DataType::Integer, DataType::Integer]));

        let names = vec!["p1".to_string()];
        assert!(
            reg.lookup_routine(
                "M",
                &[DataType::Integer],
                Some(&names),
                None,
                None,
                Span::ZERO
            )
            .is_ok()
        );

        let bad = vec!["zz".to_string()];
        assert!(
            reg.lookup_routine(
                "M",
                &[DataType::Integer],
                Some(&bad),
                None,
                None,
                Span::ZERO
            )
            .is_err()
        );
    }
}
