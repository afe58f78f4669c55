#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use core::ops::{Neg, Not};
use std::fmt::{Display, Formatter};

/// Variable identifiers are 1-based, matching DIMACS numbering.
pub type Variable = u32;

/// A literal stored as a signed DIMACS integer: `v` for the variable, `-v` for its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(i32);

impl Lit {
    /// Builds a literal of `var` with the given polarity (`true` is the positive literal).
    ///
    /// # Panics
    ///
    /// If `var` is zero or does not fit in an `i32`.
    #[must_use]
    pub fn new(var: Variable, polarity: bool) -> Self {
        assert!(var != 0, "variable ids start at 1");
        let var = i32::try_from(var).expect("literal variable overflowed");

        if polarity { Self(var) } else { Self(-var) }
    }

    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0.unsigned_abs()
    }

    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0.is_positive()
    }

    #[must_use]
    pub const fn negated(self) -> Self {
        Self(-self.0)
    }

    /// Returns this literal as `self` when `value` holds, otherwise its negation.
    #[must_use]
    pub const fn with_value(self, value: bool) -> Self {
        if value { self } else { self.negated() }
    }

    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0
    }

    /// Converts a signed DIMACS literal, returning `None` for `0`.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }
}

impl Neg for Lit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_neg() {
        assert_eq!(Lit::new(1, false).negated(), Lit::new(1, true));
        assert_eq!(-Lit::new(1, true), Lit::new(1, false));
        assert_eq!(!Lit::new(7, true), Lit::new(7, false));
    }

    #[test]
    fn test_literal_parts() {
        let lit = Lit::new(12, false);
        assert_eq!(lit.variable(), 12);
        assert!(!lit.polarity());
        assert_eq!(lit.to_i32(), -12);
    }

    #[test]
    fn test_with_value() {
        let lit = Lit::new(3, true);
        assert_eq!(lit.with_value(true), lit);
        assert_eq!(lit.with_value(false), -lit);
    }

    #[test]
    fn test_from_i32() {
        assert_eq!(Lit::from_i32(0), None);
        assert_eq!(Lit::from_i32(-4), Some(Lit::new(4, false)));
    }
}
