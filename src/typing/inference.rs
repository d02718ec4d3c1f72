//! Return-type and operand-type inference strategies
//!
//! Mirrors the checker layer: small shared strategy objects composed per
//! operator. `ToNullable` is the cascade wrapper that makes a result
//! nullable whenever any operand is.

use crate::ast::Kind;
use crate::error::{Error, Result};
use crate::operator::{CallBinding, OperandTypeInference, ReturnTypeInference};
use crate::typing::DataType;
use std::sync::Arc;

/// Always the given type.
pub struct Explicit(pub DataType);

impl ReturnTypeInference for Explicit {
    fn infer_return_type(&self, _binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        Ok(self.0.clone())
    }
}

/// The type of the i-th operand.
pub struct OperandAt(pub usize);

impl ReturnTypeInference for OperandAt {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        binding.operand_type(self.0)
    }
}

/// The least restrictive type over all operands. Backs arithmetic,
/// COALESCE and NULLIF.
pub struct LeastRestrictive;

impl ReturnTypeInference for LeastRestrictive {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        let types = binding.operand_types()?;
        DataType::least_restrictive(&types).ok_or_else(|| Error::TypeMismatch {
            span: binding.span(),
            expected: "mutually comparable operand types".to_string(),
            found: types
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Wraps another inference, making the result nullable when any operand
/// is.
pub struct ToNullable(pub Arc<dyn ReturnTypeInference>);

impl ReturnTypeInference for ToNullable {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        let inner = self.0.infer_return_type(binding)?;
        let any_nullable = binding
            .operand_types()?
            .iter()
            .any(|t| t.is_nullable() || matches!(t.base_type(), DataType::Null));
        Ok(if any_nullable {
            inner.into_nullable()
        } else {
            inner
        })
    }
}

/// CAST: the target spec's type, with nullability taken from the source
/// operand unless the spec pins it.
pub struct CastReturn;

impl ReturnTypeInference for CastReturn {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        let spec = binding
            .operand(1)
            .as_data_type()
            .ok_or_else(|| {
                Error::Internal("CAST target operand is not a type specification".to_string())
            })?
            .clone();
        let target = spec.derive_type()?;
        match spec.nullable {
            Some(explicit) => Ok(target.with_nullability(explicit)),
            None => {
                let source = binding.operand_type(0)?;
                Ok(target.with_nullability(source.is_nullable()))
            }
        }
    }
}

/// CASE: the least restrictive type over every THEN branch and the ELSE
/// operand. Call shape is `[when-list, then-list, else]`.
pub struct CaseReturn;

impl ReturnTypeInference for CaseReturn {
    fn infer_return_type(&self, binding: &mut CallBinding<'_, '_>) -> Result<DataType> {
        let then_items: Vec<_> = binding
            .operand(1)
            .as_list()
            .map(|list| list.items().to_vec())
            .unwrap_or_default();
        let mut branch_types = Vec::with_capacity(then_items.len() + 1);
        for item in &then_items {
            branch_types.push(binding.node_type(item)?);
        }
        let else_operand = binding.operand(2).clone();
        branch_types.push(binding.node_type(&else_operand)?);

        DataType::least_restrictive(&branch_types).ok_or_else(|| Error::TypeMismatch {
            span: binding.span(),
            expected: "comparable CASE branch types".to_string(),
            found: branch_types
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Fills unknown operand slots (dynamic parameters, DEFAULT sentinels)
/// with the first known operand type, falling back to the return type.
pub struct FirstKnownOperand;

impl OperandTypeInference for FirstKnownOperand {
    fn infer_operand_types(
        &self,
        _binding: &mut CallBinding<'_, '_>,
        return_type: &DataType,
        operand_types: &mut [DataType],
    ) -> Result<()> {
        let known = operand_types
            .iter()
            .find(|t| !matches!(t.base_type(), DataType::Unknown | DataType::Null))
            .cloned()
            .unwrap_or_else(|| return_type.clone());
        for slot in operand_types.iter_mut() {
            if matches!(slot.base_type(), DataType::Unknown) {
                *slot = known.clone();
            }
        }
        Ok(())
    }
}

/// Every unknown operand becomes the given type. Used where the operator
/// dictates its operand types outright, e.g. boolean connectives.
pub struct ExplicitOperands(pub DataType);

impl OperandTypeInference for ExplicitOperands {
    fn infer_operand_types(
        &self,
        _binding: &mut CallBinding<'_, '_>,
        _return_type: &DataType,
        operand_types: &mut [DataType],
    ) -> Result<()> {
        for slot in operand_types.iter_mut() {
            if matches!(slot.base_type(), DataType::Unknown) {
                *slot = self.0.clone();
            }
        }
        Ok(())
    }
}

pub fn explicit(ty: DataType) -> Arc<dyn ReturnTypeInference> {
    Arc::new(Explicit(ty))
}

pub fn operand_at(i: usize) -> Arc<dyn ReturnTypeInference> {
    Arc::new(OperandAt(i))
}

pub fn least_restrictive() -> Arc<dyn ReturnTypeInference> {
    Arc::new(LeastRestrictive)
}

pub fn to_nullable(inner: Arc<dyn ReturnTypeInference>) -> Arc<dyn ReturnTypeInference> {
    Arc::new(ToNullable(inner))
}

pub fn cast_return() -> Arc<dyn ReturnTypeInference> {
    Arc::new(CastReturn)
}

pub fn case_return() -> Arc<dyn ReturnTypeInference> {
    Arc::new(CaseReturn)
}

pub fn first_known_operand() -> Arc<dyn OperandTypeInference> {
    Arc::new(FirstKnownOperand)
}

pub fn explicit_operands(ty: DataType) -> Arc<dyn OperandTypeInference> {
    Arc::new(ExplicitOperands(ty))
}

/// Whether a node is the DEFAULT sentinel produced by named-argument
/// permutation. Inference treats it as "use the declared default", never
/// as SQL NULL.
pub fn is_default_sentinel_kind(kind: Kind) -> bool {
    kind == Kind::Default
}
