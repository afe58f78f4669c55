#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The satisfiability capability the encoders target.
//!
//! The crate does not search for models itself. A `SatBackend` receives a
//! finished [`Cnf`] in one synchronous call and answers with either a model or
//! `None` for unsatisfiable. Swapping the backend does not touch the encoders.

use crate::nonogram::error::NonogramError;
use crate::sat::assignment::Solutions;
use crate::sat::cnf::Cnf;
use varisat::ExtendFormula;

pub trait SatBackend {
    /// Short name for statistics output.
    fn name(&self) -> &'static str;

    /// Decides `cnf`.
    ///
    /// # Errors
    ///
    /// `NonogramError::Backend` if the underlying library fails. An
    /// unsatisfiable formula is `Ok(None)`, not an error.
    fn solve(&mut self, cnf: &Cnf) -> Result<Option<Solutions>, NonogramError>;
}

/// Backend built on the `varisat` CDCL solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Varisat;

impl SatBackend for Varisat {
    fn name(&self) -> &'static str {
        "varisat"
    }

    fn solve(&mut self, cnf: &Cnf) -> Result<Option<Solutions>, NonogramError> {
        let mut solver = varisat::Solver::new();
        let mut lits = Vec::new();
        for clause in &cnf.clauses {
            lits.clear();
            lits.extend(
                clause
                    .iter()
                    .map(|lit| varisat::Lit::from_dimacs(lit.to_i32() as isize)),
            );
            solver.add_clause(&lits);
        }

        let satisfiable = solver
            .solve()
            .map_err(|e| NonogramError::Backend(e.to_string()))?;
        if !satisfiable {
            return Ok(None);
        }

        let model = solver
            .model()
            .ok_or_else(|| NonogramError::Backend("satisfiable without a model".into()))?;
        let mut solutions = Solutions::new(cnf.num_vars);
        for lit in model {
            let var = u32::try_from(lit.var().to_dimacs())
                .map_err(|e| NonogramError::Backend(e.to_string()))?;
            solutions.set(var, lit.is_positive());
        }
        Ok(Some(solutions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varisat_basic_sat() {
        // (x1 ∨ x2) ∧ (¬x1 ∨ x3)
        let cnf = Cnf::new(vec![vec![1, 2], vec![-1, 3]]);
        let model = Varisat.solve(&cnf).unwrap().expect("satisfiable");
        assert!(cnf.verify(&model));
    }

    #[test]
    fn test_varisat_basic_unsat() {
        let cnf = Cnf::new(vec![vec![1], vec![-1]]);
        assert_eq!(Varisat.solve(&cnf).unwrap(), None);
    }

    #[test]
    fn test_varisat_values() {
        let cnf = Cnf::new(vec![vec![1], vec![-2]]);
        let model = Varisat.solve(&cnf).unwrap().unwrap();
        assert!(model.check(1));
        assert!(model.check(-2));
    }

    #[test]
    fn test_varisat_empty_clause_is_unsat() {
        let cnf = Cnf::new(vec![vec![]]);
        assert_eq!(Varisat.solve(&cnf).unwrap(), None);
    }

    #[test]
    fn test_varisat_empty_formula() {
        let cnf = Cnf::default();
        assert!(Varisat.solve(&cnf).unwrap().is_some());
    }
}
