#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Bounded integer variables over a boolean formula.
//!
//! The backend only understands booleans, so an integer `c` with domain
//! `[0, ub]` is represented with the order encoding: one boolean per
//! threshold, `p[v] <=> c >= v` for `v` in `1..=ub`, linked by the axioms
//! `p[v + 1] -> p[v]`. Every assignment of the threshold booleans that
//! satisfies the axioms corresponds to exactly one value, so a comparison
//! such as `c = v` costs two literals (`p[v] & !p[v + 1]`) and no auxiliary
//! variables.

use crate::sat::assignment::Solutions;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Lit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderVar {
    /// `thresholds[v - 1]` is the literal for `c >= v`.
    thresholds: Vec<Lit>,
    top: Lit,
}

impl OrderVar {
    /// Declares an integer with domain `[0, ub]` and adds its ordering axioms.
    pub fn new(cnf: &mut Cnf, ub: usize) -> Self {
        let top = cnf.top();
        let thresholds = cnf.new_vars(ub);
        for pair in thresholds.windows(2) {
            cnf.add_clause([-pair[1], pair[0]]);
        }
        Self { thresholds, top }
    }

    #[must_use]
    pub fn upper_bound(&self) -> usize {
        self.thresholds.len()
    }

    /// The literal for `c >= value`; constant outside `1..=ub`.
    #[must_use]
    pub fn ge(&self, value: usize) -> Lit {
        match value {
            0 => self.top,
            v if v > self.upper_bound() => -self.top,
            v => self.thresholds[v - 1],
        }
    }

    /// Literals whose conjunction states `c = value`.
    #[must_use]
    pub fn eq_lits(&self, value: usize) -> [Lit; 2] {
        [self.ge(value), -self.ge(value + 1)]
    }

    /// Literals whose disjunction states `c != value`, ready to extend a clause.
    #[must_use]
    pub fn ne_lits(&self, value: usize) -> [Lit; 2] {
        [-self.ge(value), self.ge(value + 1)]
    }

    /// Reads the value of this integer back out of a model.
    #[must_use]
    pub fn decode(&self, solutions: &Solutions) -> usize {
        self.thresholds
            .iter()
            .take_while(|&&lit| solutions.value(lit))
            .count()
    }
}
