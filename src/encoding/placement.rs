#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Placement encoding: a line is valid iff it equals one of its placements.
//!
//! The disjunction over placements is introduced with one selector variable
//! per placement. The clause `s_1 | ... | s_n` picks at least one, and each
//! selector implies its placement cell by cell (`!s_p | x_j` for filled
//! cells, `!s_p | !x_j` for empty ones). Distinct placements disagree on at
//! least one cell, so a model selects exactly the placement the cells spell
//! out. A line with a single placement skips the selector and fixes its
//! cells with unit clauses.

use crate::encoding::LineEncoder;
use crate::nonogram::error::NonogramError;
use crate::nonogram::feasibility::FeasibilityCache;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Lit;

/// Line encoder backed by a session's [`FeasibilityCache`].
#[derive(Debug)]
pub struct PlacementEncoder<'c> {
    cache: &'c mut FeasibilityCache,
}

impl<'c> PlacementEncoder<'c> {
    pub const fn new(cache: &'c mut FeasibilityCache) -> Self {
        Self { cache }
    }
}

impl LineEncoder for PlacementEncoder<'_> {
    fn name(&self) -> &'static str {
        "placement"
    }

    fn encode_line(&mut self, cnf: &mut Cnf, cells: &[Lit], hints: &[usize]) -> Result<(), NonogramError> {
        let placements = self.cache.get(hints, cells.len())?;

        if let [only] = &*placements {
            for (&cell, filled) in cells.iter().zip(only.iter()) {
                cnf.add_unit(cell.with_value(filled));
            }
            return Ok(());
        }

        let selectors = cnf.new_vars(placements.len());
        cnf.add_clause(selectors.iter().copied());
        for (&selector, placement) in selectors.iter().zip(placements.iter()) {
            for (&cell, filled) in cells.iter().zip(placement.iter()) {
                cnf.add_clause([-selector, cell.with_value(filled)]);
            }
        }
        Ok(())
    }
}
