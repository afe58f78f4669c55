#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The solving session: encode, submit, decode.
//!
//! A [`Session`] owns the feasibility cache and the backend handle for the
//! lifetime of one run of the tool. [`Session::solve`] makes exactly one
//! submission and reports one of two outcomes. A satisfiable formula yields
//! the decoded grid. An unsatisfiable one yields
//! [`SolveOutcome::Unsolvable`], which is a normal result and not an error.

use crate::encoding::{self, EncodedPuzzle, Encoding};
use crate::nonogram::error::NonogramError;
use crate::nonogram::feasibility::FeasibilityCache;
use crate::nonogram::overlap;
use crate::nonogram::puzzle::{Grid, Puzzle};
use crate::sat::assignment::Solutions;
use crate::sat::backend::{SatBackend, Varisat};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    pub encoding: Encoding,
    /// Run the overlap pass on the puzzle's grid before encoding.
    pub prefill: bool,
    /// Add the cells forced by the overlap pass as unit clauses. Implies `prefill`.
    pub seed_overlap: bool,
    /// Check every decoded grid against the hints.
    pub verify: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Auto,
            prefill: false,
            seed_overlap: false,
            verify: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(Grid),
    Unsolvable,
}

impl SolveOutcome {
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }

    #[must_use]
    pub const fn grid(&self) -> Option<&Grid> {
        match self {
            Self::Solved(grid) => Some(grid),
            Self::Unsolvable => None,
        }
    }
}

/// Figures from the most recent call, for the statistics table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub encoding: Encoding,
    pub variables: usize,
    pub clauses: usize,
    pub literals: usize,
    /// Cells newly marked by the overlap pass.
    pub prefilled: usize,
    /// Backend submissions; more than one only when enumerating solutions.
    pub submissions: usize,
    pub encode_time: Duration,
    pub solve_time: Duration,
}

#[derive(Debug)]
pub struct Session<B: SatBackend = Varisat> {
    backend: B,
    cache: FeasibilityCache,
    options: SolverOptions,
    stats: SolveStats,
    model: Option<Solutions>,
}

impl Session<Varisat> {
    #[must_use]
    pub fn new(options: SolverOptions) -> Self {
        Self::with_backend(Varisat, options)
    }
}

impl Default for Session<Varisat> {
    fn default() -> Self {
        Self::new(SolverOptions::default())
    }
}

impl<B: SatBackend> Session<B> {
    pub fn with_backend(backend: B, options: SolverOptions) -> Self {
        Self {
            backend,
            cache: FeasibilityCache::new(),
            options,
            stats: SolveStats::default(),
            model: None,
        }
    }

    pub const fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub const fn stats(&self) -> &SolveStats {
        &self.stats
    }

    pub const fn cache(&self) -> &FeasibilityCache {
        &self.cache
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The raw model from the most recent submission, if it was satisfiable.
    pub const fn model(&self) -> Option<&Solutions> {
        self.model.as_ref()
    }

    /// Compiles `puzzle` to CNF under the session's options.
    ///
    /// With `prefill` or `seed_overlap` set, the overlap pass marks the
    /// puzzle's grid first, so callers can render the partial answer.
    ///
    /// # Errors
    ///
    /// `NonogramError::LineOverfull` if a line's hints do not fit.
    pub fn encode(&mut self, puzzle: &mut Puzzle) -> Result<EncodedPuzzle, NonogramError> {
        let start = Instant::now();
        puzzle.check_spans()?;

        let prefilled = if self.options.prefill || self.options.seed_overlap {
            overlap::apply(puzzle)?
        } else {
            0
        };

        let mut encoded = encoding::encode(puzzle, self.options.encoding, &mut self.cache)?;
        if self.options.seed_overlap {
            let seeded = encoded.assume_grid(puzzle.grid());
            log::debug!("seeded {seeded} known cells");
        }
        log::debug!(
            "feasibility cache: {} sets, {} hits, {} misses",
            self.cache.len(),
            self.cache.hits(),
            self.cache.misses()
        );

        self.stats = SolveStats {
            encoding: encoded.encoding,
            variables: encoded.cnf.num_vars,
            clauses: encoded.cnf.num_clauses(),
            literals: encoded.cnf.num_literals(),
            prefilled,
            submissions: 0,
            encode_time: start.elapsed(),
            solve_time: Duration::ZERO,
        };
        Ok(encoded)
    }

    /// Encodes `puzzle`, submits it once, and decodes the answer.
    ///
    /// # Errors
    ///
    /// Format errors for hints that do not fit, `NonogramError::Backend` when
    /// the backend fails, and `NonogramError::InvalidModel` when verification
    /// is on and the decoded grid breaks a hint.
    pub fn solve(&mut self, puzzle: &mut Puzzle) -> Result<SolveOutcome, NonogramError> {
        let encoded = self.encode(puzzle)?;
        self.solve_encoded(puzzle, &encoded)
    }

    /// Submits a formula produced by [`Session::encode`] for the same puzzle.
    ///
    /// # Errors
    ///
    /// As for [`Session::solve`], minus the format errors.
    pub fn solve_encoded(
        &mut self,
        puzzle: &Puzzle,
        encoded: &EncodedPuzzle,
    ) -> Result<SolveOutcome, NonogramError> {
        match self.submit(encoded)? {
            Some(model) => Ok(SolveOutcome::Solved(self.decode(puzzle, encoded, &model)?)),
            None => Ok(SolveOutcome::Unsolvable),
        }
    }

    /// Up to `limit` distinct solutions, each found by resubmitting the
    /// formula with clauses that exclude the grids already found.
    ///
    /// # Errors
    ///
    /// As for [`Session::solve`].
    pub fn solutions(&mut self, puzzle: &mut Puzzle, limit: usize) -> Result<Vec<Grid>, NonogramError> {
        let mut encoded = self.encode(puzzle)?;
        let mut grids = Vec::new();
        while grids.len() < limit {
            let Some(model) = self.submit(&encoded)? else {
                break;
            };
            let grid = self.decode(puzzle, &encoded, &model)?;
            encoded.cnf.add_clause(encoded.cells.blocking_clause(&grid));
            grids.push(grid);
        }
        log::debug!("found {} solutions (limit {limit})", grids.len());
        Ok(grids)
    }

    fn submit(&mut self, encoded: &EncodedPuzzle) -> Result<Option<Solutions>, NonogramError> {
        let start = Instant::now();
        let model = self.backend.solve(&encoded.cnf)?;
        self.stats.solve_time += start.elapsed();
        self.stats.submissions += 1;
        self.model.clone_from(&model);
        log::debug!(
            "{} answered {} after {:?}",
            self.backend.name(),
            if model.is_some() { "SAT" } else { "UNSAT" },
            self.stats.solve_time
        );
        Ok(model)
    }

    fn decode(
        &self,
        puzzle: &Puzzle,
        encoded: &EncodedPuzzle,
        model: &Solutions,
    ) -> Result<Grid, NonogramError> {
        let grid = encoded.decode(model);
        if self.options.verify {
            if let Some((axis, index)) = grid.first_violation(puzzle) {
                return Err(NonogramError::InvalidModel { axis, index });
            }
            if !encoded.cnf.verify(model) {
                return Err(NonogramError::Backend("model does not satisfy the formula".into()));
            }
        }
        Ok(grid)
    }
}
