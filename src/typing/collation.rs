//! Collations and the SQL:1999 coercibility lattice
//!
//! When a dyadic operation combines two character operands, the result's
//! collation is decided by the operands' coercibility levels. The pairing
//! table is asymmetric in places (COERCIBLE + EXPLICIT picks the second
//! collation while EXPLICIT + COERCIBLE picks the first); the asymmetry
//! follows SQL:1999 part 2 table 2 and is preserved as written.

use crate::ast::Span;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The default collation assigned to character literals and to character
/// types that do not spell one.
pub const DEFAULT_COLLATION_NAME: &str = "ISO-8859-1$en_US";

/// How strongly a collation is attached to a value.
///
/// `Coercible` marks literals, `Implicit` marks column references,
/// `Explicit` marks a COLLATE clause. `None` is the orthogonal "no
/// collation" level that survives only against an explicit collation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coercibility {
    Explicit,
    Implicit,
    Coercible,
    None,
}

/// A named collation plus its coercibility level.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collation {
    pub name: String,
    pub coercibility: Coercibility,
}

impl Collation {
    pub fn new(name: impl Into<String>, coercibility: Coercibility) -> Self {
        Self {
            name: name.into(),
            coercibility,
        }
    }

    /// The coercible default collation, as carried by character literals.
    pub fn coercible_default() -> Self {
        Self::new(DEFAULT_COLLATION_NAME, Coercibility::Coercible)
    }

    pub fn implicit(name: impl Into<String>) -> Self {
        Self::new(name, Coercibility::Implicit)
    }

    pub fn explicit(name: impl Into<String>) -> Self {
        Self::new(name, Coercibility::Explicit)
    }

    /// Combines the collations of the two operands of a dyadic operation.
    ///
    /// Returns `Ok(None)` when the result carries no collation at all, and
    /// an error only for the EXPLICIT/EXPLICIT conflict, which SQL defines
    /// as a hard "different collations" failure rather than a fallback.
    pub fn combine_dyadic(
        left: Option<&Collation>,
        right: Option<&Collation>,
        span: Span,
    ) -> Result<Option<Collation>> {
        let (c1, c2) = match (left, right) {
            (Some(l), Some(r)) => (l, r),
            // A collation on one side only wins outright.
            (Some(l), Option::None) => return Ok(Some(l.clone())),
            (Option::None, Some(r)) => return Ok(Some(r.clone())),
            (Option::None, Option::None) => return Ok(Option::None),
        };

        use Coercibility::*;
        let picked = match (c1.coercibility, c2.coercibility) {
            (Coercible, Coercible) => Some(c2),
            (Coercible, Implicit) => Some(c2),
            (Coercible, None) => Option::None,
            (Coercible, Explicit) => Some(c2),

            (Implicit, Coercible) => Some(c1),
            (Implicit, Implicit) => {
                if c1.name == c2.name {
                    Some(c2)
                } else {
                    Option::None
                }
            }
            (Implicit, None) => Option::None,
            (Implicit, Explicit) => Some(c2),

            (None, Coercible) => Option::None,
            (None, Implicit) => Option::None,
            (None, None) => Option::None,
            (None, Explicit) => Some(c2),

            (Explicit, Coercible) => Some(c1),
            (Explicit, Implicit) => Some(c1),
            (Explicit, None) => Some(c1),
            (Explicit, Explicit) => {
                if c1.name == c2.name {
                    Some(c1)
                } else {
                    return Err(Error::DifferentCollations {
                        span,
                        left: c1.name.clone(),
                        right: c2.name.clone(),
                    });
                }
            }
        };
        Ok(picked.cloned())
    }
}

impl fmt::Display for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combine(a: Option<&Collation>, b: Option<&Collation>) -> Result<Option<Collation>> {
        Collation::combine_dyadic(a, b, Span::ZERO)
    }

    #[test]
    fn one_sided_collation_wins_outright() {
        let col = Collation::implicit("X");
        assert_eq!(combine(Some(&col), None).unwrap().unwrap().name, "X");
        assert_eq!(combine(None, Some(&col)).unwrap().unwrap().name, "X");
        assert_eq!(combine(None, None).unwrap(), None);
    }

    #[test]
    fn coercible_yields_to_implicit() {
        let lit = Collation::coercible_default();
        let col = Collation::implicit("X");
        let out = combine(Some(&lit), Some(&col)).unwrap().unwrap();
        assert_eq!(out.name, "X");
        assert_eq!(out.coercibility, Coercibility::Implicit);
    }

    #[test]
    fn explicit_conflict_is_an_error() {
        let a = Collation::explicit("A");
        let b = Collation::explicit("B");
        let err = combine(Some(&a), Some(&b)).unwrap_err();
        assert!(matches!(err, Error::DifferentCollations { .. }));
    }

    #[test]
    fn matching_explicit_combines() {
        let a = Collation::explicit("A");
        let b = Collation::explicit("A");
        assert_eq!(combine(Some(&a), Some(&b)).unwrap().unwrap().name, "A");
    }

    #[test]
    fn none_none_yields_no_collation() {
        let a = Collation::new("A", Coercibility::None);
        let b = Collation::new("B", Coercibility::None);
        assert_eq!(combine(Some(&a), Some(&b)).unwrap(), None);
    }

    #[test]
    fn asymmetry_preserved() {
        // COERCIBLE + EXPLICIT picks the second collation...
        let lit = Collation::new("L", Coercibility::Coercible);
        let exp = Collation::explicit("E");
        assert_eq!(combine(Some(&lit), Some(&exp)).unwrap().unwrap().name, "E");
        // ...while EXPLICIT + COERCIBLE picks the first.
        assert_eq!(combine(Some(&exp), Some(&lit)).unwrap().unwrap().name, "E");

        // The same pair of implicit collations picks by position too.
        let x1 = Collation::implicit("X");
        let x2 = Collation::implicit("X");
        let out = combine(Some(&x1), Some(&x2)).unwrap().unwrap();
        assert_eq!(out.coercibility, Coercibility::Implicit);
    }

    #[test]
    fn mismatched_implicit_collations_drop_out() {
        let a = Collation::implicit("A");
        let b = Collation::implicit("B");
        assert_eq!(combine(Some(&a), Some(&b)).unwrap(), None);
    }
}
