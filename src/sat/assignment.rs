#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Satisfying assignments returned by a SAT backend.

use crate::sat::literal::{Lit, Variable};
use bit_vec::BitVec;
use std::fmt::{Display, Formatter};

/// A complete model: the truth value of every variable `1..=num_vars`.
///
/// Index `0` is unused so that variable ids index the bit vector directly.
/// Variables the backend never saw are reported as `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solutions {
    values: BitVec,
}

impl Solutions {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            values: BitVec::from_elem(num_vars + 1, false),
        }
    }

    /// Builds a model from the literals that are true; negative entries are ignored.
    #[must_use]
    pub fn from_true_literals(num_vars: usize, literals: &[i32]) -> Self {
        let mut solutions = Self::new(num_vars);
        for &lit in literals.iter().filter(|l| l.is_positive()) {
            solutions.set(lit.unsigned_abs(), true);
        }
        solutions
    }

    /// Sets the value of `var`, growing the model if the variable is beyond its size.
    pub fn set(&mut self, var: Variable, value: bool) {
        let index = var as usize;
        if index >= self.values.len() {
            self.values.grow(index + 1 - self.values.len(), false);
        }
        self.values.set(index, value);
    }

    #[must_use]
    pub fn var_value(&self, var: Variable) -> bool {
        self.values.get(var as usize).unwrap_or(false)
    }

    /// The value the model gives to `lit` (true for a satisfied literal).
    #[must_use]
    pub fn value(&self, lit: Lit) -> bool {
        self.var_value(lit.variable()) == lit.polarity()
    }

    /// Checks a signed DIMACS literal against the model.
    #[must_use]
    pub fn check(&self, lit: i32) -> bool {
        Lit::from_i32(lit).is_some_and(|l| self.value(l))
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = Lit> + '_ {
        self.values
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(var, value)| {
                u32::try_from(var).ok().map(|var| Lit::new(var, value))
            })
    }
}

impl Display for Solutions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let literals = itertools::join(self.iter(), " ");
        write!(f, "{literals}")
    }
}
