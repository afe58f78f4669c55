#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Conjunctive normal form formulas built by the encoders.
//!
//! A `Cnf` is a growable clause list plus a variable allocator. Encoders ask
//! it for fresh variables and push clauses; the finished formula is handed to
//! a [`SatBackend`](crate::sat::backend::SatBackend) as a whole, or written out
//! in DIMACS through its `Display` implementation.

use crate::sat::assignment::Solutions;
use crate::sat::literal::{Lit, Variable};
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

/// Most clauses produced by the nonogram encodings have at most four literals.
pub type Clause = SmallVec<[Lit; 8]>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    /// Number of allocated variables; ids run `1..=num_vars`.
    pub num_vars: usize,
    pub clauses: Vec<Clause>,
    top: Option<Lit>,
}

impl Cnf {
    /// Builds a formula from raw DIMACS clauses. Zeros are skipped.
    #[must_use]
    pub fn new(clauses: Vec<Vec<i32>>) -> Self {
        let mut cnf = Self::default();
        for clause in clauses {
            let clause: Clause = clause.into_iter().filter_map(Lit::from_i32).collect();
            for lit in &clause {
                cnf.num_vars = cnf.num_vars.max(lit.variable() as usize);
            }
            cnf.clauses.push(clause);
        }
        cnf
    }

    /// Allocates a fresh variable and returns its positive literal.
    ///
    /// # Panics
    ///
    /// If the variable count no longer fits a DIMACS literal.
    pub fn new_var(&mut self) -> Lit {
        self.num_vars += 1;
        let var = Variable::try_from(self.num_vars).expect("variable count overflowed");
        Lit::new(var, true)
    }

    pub fn new_vars(&mut self, count: usize) -> Vec<Lit> {
        (0..count).map(|_| self.new_var()).collect()
    }

    /// A literal that is true in every model, allocated on first use.
    pub fn top(&mut self) -> Lit {
        if let Some(top) = self.top {
            return top;
        }
        let top = self.new_var();
        self.top = Some(top);
        self.clauses.push(SmallVec::from_slice(&[top]));
        top
    }

    /// A literal that is false in every model.
    pub fn bottom(&mut self) -> Lit {
        -self.top()
    }

    /// Adds a clause, dropping it when it contains the constant-true literal and
    /// removing constant-false literals from it.
    pub fn add_clause<I: IntoIterator<Item = Lit>>(&mut self, literals: I) {
        let mut clause = Clause::new();
        for lit in literals {
            match self.top {
                Some(top) if lit == top => return,
                Some(top) if lit == -top => {}
                _ => clause.push(lit),
            }
        }
        self.clauses.push(clause);
    }

    pub fn add_unit(&mut self, lit: Lit) {
        self.add_clause([lit]);
    }

    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(SmallVec::len).sum()
    }

    /// Checks that `solutions` satisfies every clause.
    #[must_use]
    pub fn verify(&self, solutions: &Solutions) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.iter().any(|&lit| solutions.value(lit)))
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(f, "{lit} ")?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}
