//! Name-resolution scopes
//!
//! The core does not own a catalog; callers supply a `Scope` that answers
//! identifier lookups. `MapScope` backs most tests and embedders with a
//! flat column map.

use crate::typing::DataType;
use std::collections::HashMap;

/// Resolves identifiers to types during validation.
pub trait Scope {
    /// Resolves a (possibly qualified) name to its type, or `None` when the
    /// name is unknown in this scope.
    fn resolve_identifier(&self, names: &[String]) -> Option<DataType>;
}

/// A scope that knows no names. Useful for validating trees built purely
/// from literals and calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyScope;

impl Scope for EmptyScope {
    fn resolve_identifier(&self, _names: &[String]) -> Option<DataType> {
        None
    }
}

/// A flat, case-insensitive column map.
#[derive(Clone, Debug, Default)]
pub struct MapScope {
    columns: HashMap<String, DataType>,
}

impl MapScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, ty: DataType) -> Self {
        self.columns.insert(name.into().to_uppercase(), ty);
        self
    }
}

impl Scope for MapScope {
    fn resolve_identifier(&self, names: &[String]) -> Option<DataType> {
        // Qualified names fall back to their last component, which is how a
        // single-table scope sees `t.c`.
        let full = names.join(".").to_uppercase();
        if let Some(ty) = self.columns.get(&full) {
            return Some(ty.clone());
        }
        names
            .last()
            .and_then(|last| self.columns.get(&last.to_uppercase()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_scope_is_case_insensitive() {
        let scope = MapScope::new().with_column("name", DataType::varchar(20));
        let names = vec!["NAME".to_string()];
        assert_eq!(scope.resolve_identifier(&names), Some(DataType::varchar(20)));
    }

    #[test]
    fn qualified_lookup_falls_back_to_last_component() {
        let scope = MapScope::new().with_column("c", DataType::Integer);
        let names = vec!["t".to_string(), "c".to_string()];
        assert_eq!(scope.resolve_identifier(&names), Some(DataType::Integer));
    }

    #[test]
    fn empty_scope_knows_nothing() {
        let names = vec!["x".to_string()];
        assert_eq!(EmptyScope.resolve_identifier(&names), None);
    }
}
