//! Operand-type checking strategies
//!
//! Checkers are shared, stateless strategy objects attached to operators.
//! Each answers two questions: how many operands it accepts, and whether a
//! concrete call's operand types satisfy it. Run in quiet mode during
//! overload narrowing, and in throwing mode once an operator is committed.

use crate::error::{Error, Result};
use crate::operator::{CallBinding, OperandCountRange, OperandTypeChecker};
use crate::typing::{DataType, TypeFamily};
use std::sync::Arc;

fn family_token(family: TypeFamily) -> &'static str {
    match family {
        TypeFamily::Boolean => "<BOOLEAN>",
        TypeFamily::Numeric => "<NUMERIC>",
        TypeFamily::Character => "<CHARACTER>",
        TypeFamily::Binary => "<BINARY>",
        TypeFamily::Date => "<DATE>",
        TypeFamily::Time => "<TIME>",
        TypeFamily::Timestamp => "<TIMESTAMP>",
        TypeFamily::IntervalYearMonth => "<INTERVAL_YEAR_MONTH>",
        TypeFamily::IntervalDayTime => "<INTERVAL_DAY_TIME>",
        TypeFamily::Row => "<ROW>",
        TypeFamily::Array => "<ARRAY>",
        TypeFamily::Multiset => "<MULTISET>",
        TypeFamily::Symbol => "<SYMBOL>",
        TypeFamily::ColumnList => "<COLUMN_LIST>",
        TypeFamily::Any => "<ANY>",
        TypeFamily::Null => "<NULL>",
        TypeFamily::Unknown => "<UNKNOWN>",
    }
}

fn signature(op_name: &str, slots: &[&str]) -> String {
    format!("'{}({})'", op_name, slots.join(", "))
}

fn mismatch_error(binding: &CallBinding<'_, '_>, types: &[DataType], allowed: String) -> Error {
    Error::OperandTypeMismatch {
        span: binding.span(),
        operator: binding.operator_name().to_string(),
        found: types
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        allowed,
    }
}

/// One declared family per operand position.
pub struct FamilyChecker {
    families: Vec<TypeFamily>,
}

impl OperandTypeChecker for FamilyChecker {
    fn operand_count_range(&self) -> OperandCountRange {
        OperandCountRange::of(self.families.len())
    }

    fn check_operand_types(
        &self,
        binding: &mut CallBinding<'_, '_>,
        throw_on_failure: bool,
    ) -> Result<bool> {
        let types = binding.operand_types()?;
        let ok = types.len() == self.families.len()
            && self
                .families
                .iter()
                .zip(&types)
                .all(|(family, ty)| family.accepts(ty.family()));
        if ok {
            Ok(true)
        } else if throw_on_failure {
            Err(mismatch_error(
                binding,
                &types,
                self.allowed_signatures(binding.operator_name()),
            ))
        } else {
            Ok(false)
        }
    }

    fn allowed_signatures(&self, op_name: &str) -> String {
        let slots: Vec<&str> = self.families.iter().map(|f| family_token(*f)).collect();
        signature(op_name, &slots)
    }
}

/// All operands mutually comparable: a least restrictive type must exist,
/// or each side must be castable to the other. Backs the comparison
/// operators and NULLIF.
pub struct ComparableChecker {
    count: usize,
}

impl OperandTypeChecker for ComparableChecker {
    fn operand_count_range(&self) -> OperandCountRange {
        OperandCountRange::of(self.count)
    }

    fn check_operand_types(
        &self,
        binding: &mut CallBinding<'_, '_>,
        throw_on_failure: bool,
    ) -> Result<bool> {
        let types = binding.operand_types()?;
        let ok = DataType::least_restrictive(&types).is_some()
            || types.windows(2).all(|pair| {
                pair[0].is_castable_from(&pair[1]) || pair[1].is_castable_from(&pair[0])
            });
        if ok {
            Ok(true)
        } else if throw_on_failure {
            Err(mismatch_error(
                binding,
                &types,
                self.allowed_signatures(binding.operator_name()),
            ))
        } else {
            Ok(false)
        }
    }

    fn allowed_signatures(&self, op_name: &str) -> String {
        let slots = vec!["<COMPARABLE>"; self.count];
        signature(op_name, &slots)
    }
}

/// A variable number of operands, each drawn from one family. Backs
/// COALESCE and friends.
pub struct VariadicFamilyChecker {
    family: TypeFamily,
    range: OperandCountRange,
}

impl OperandTypeChecker for VariadicFamilyChecker {
    fn operand_count_range(&self) -> OperandCountRange {
        self.range
    }

    fn check_operand_types(
        &self,
        binding: &mut CallBinding<'_, '_>,
        throw_on_failure: bool,
    ) -> Result<bool> {
        let types = binding.operand_types()?;
        let ok = types.iter().all(|ty| self.family.accepts(ty.family()));
        if ok {
            Ok(true)
        } else if throw_on_failure {
            Err(mismatch_error(
                binding,
                &types,
                self.allowed_signatures(binding.operator_name()),
            ))
        } else {
            Ok(false)
        }
    }

    fn allowed_signatures(&self, op_name: &str) -> String {
        signature(op_name, &[family_token(self.family), "..."])
    }
}

/// Accepts anything within an operand-count range.
pub struct AnyChecker {
    range: OperandCountRange,
}

impl OperandTypeChecker for AnyChecker {
    fn operand_count_range(&self) -> OperandCountRange {
        self.range
    }

    fn check_operand_types(
        &self,
        _binding: &mut CallBinding<'_, '_>,
        _throw_on_failure: bool,
    ) -> Result<bool> {
        Ok(true)
    }

    fn allowed_signatures(&self, op_name: &str) -> String {
        signature(op_name, &["<ANY>", "..."])
    }
}

/// Succeeds when any alternative succeeds. Error messages list every
/// alternative's signature.
pub struct OrChecker {
    alternatives: Vec<Arc<dyn OperandTypeChecker>>,
}

impl OperandTypeChecker for OrChecker {
    fn operand_count_range(&self) -> OperandCountRange {
        let min = self
            .alternatives
            .iter()
            .map(|alt| alt.operand_count_range().min)
            .min()
            .unwrap_or(0);
        let max = self
            .alternatives
            .iter()
            .map(|alt| alt.operand_count_range().max)
            .try_fold(0usize, |acc, m| m.map(|m| acc.max(m)));
        OperandCountRange { min, max }
    }

    fn check_operand_types(
        &self,
        binding: &mut CallBinding<'_, '_>,
        throw_on_failure: bool,
    ) -> Result<bool> {
        let count = binding.operand_count();
        for alt in &self.alternatives {
            if alt.operand_count_range().contains(count)
                && alt.check_operand_types(binding, false)?
            {
                return Ok(true);
            }
        }
        if throw_on_failure {
            let types = binding.operand_types()?;
            Err(mismatch_error(
                binding,
                &types,
                self.allowed_signatures(binding.operator_name()),
            ))
        } else {
            Ok(false)
        }
    }

    fn allowed_signatures(&self, op_name: &str) -> String {
        self.alternatives
            .iter()
            .map(|alt| alt.allowed_signatures(op_name))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

pub fn family(families: &[TypeFamily]) -> Arc<dyn OperandTypeChecker> {
    Arc::new(FamilyChecker {
        families: families.to_vec(),
    })
}

pub fn comparable(count: usize) -> Arc<dyn OperandTypeChecker> {
    Arc::new(ComparableChecker { count })
}

pub fn variadic(family: TypeFamily, min: usize) -> Arc<dyn OperandTypeChecker> {
    Arc::new(VariadicFamilyChecker {
        family,
        range: OperandCountRange::at_least(min),
    })
}

pub fn any(range: OperandCountRange) -> Arc<dyn OperandTypeChecker> {
    Arc::new(AnyChecker { range })
}

pub fn or(alternatives: Vec<Arc<dyn OperandTypeChecker>>) -> Arc<dyn OperandTypeChecker> {
    Arc::new(OrChecker { alternatives })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_checker_merges_count_ranges() {
        let checker = or(vec![
            family(&[TypeFamily::Numeric, TypeFamily::Numeric]),
            family(&[
                TypeFamily::Character,
                TypeFamily::Character,
                TypeFamily::Character,
            ]),
        ]);
        let range = checker.operand_count_range();
        assert_eq!(range.min, 2);
        assert_eq!(range.max, Some(3));
    }

    #[test]
    fn signatures_name_the_operator() {
        let checker = family(&[TypeFamily::Numeric, TypeFamily::Numeric]);
        assert_eq!(checker.allowed_signatures("+"), "'+(<NUMERIC>, <NUMERIC>)'");

        let combined = or(vec![
            family(&[TypeFamily::Numeric, TypeFamily::Numeric]),
            family(&[
                TypeFamily::IntervalDayTime,
                TypeFamily::IntervalDayTime,
            ]),
        ]);
        assert_eq!(
            combined.allowed_signatures("+"),
            "'+(<NUMERIC>, <NUMERIC>)' | '+(<INTERVAL_DAY_TIME>, <INTERVAL_DAY_TIME>)'"
        );
    }
}
