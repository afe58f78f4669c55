#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Compilation of nonogram hints into CNF.
//!
//! Every cell gets one boolean variable, allocated up front in a dense
//! row-major table ([`CellVars`]). Each row and each column is then handed
//! to a [`LineEncoder`] together with the slice of cell variables it covers,
//! so a cell's row and column constraints talk about the same variable.
//!
//! Two line encoders are provided:
//!
//! - [`PlacementEncoder`]: a disjunction over every placement of the line.
//!   Exact and simple, but the clause count is proportional to the number of
//!   placements, `C(slack + k, k)`, which explodes with slack. Use it for
//!   small or tightly constrained puzzles.
//! - [`RunPositionEncoder`]: a progress counter per cell that may only step
//!   through the values the hint sequence allows. Its size depends on the
//!   line length and the packed span, never on slack, at the price of
//!   auxiliary integer variables. In CNF that is `O(length * span)` clauses
//!   per line: linear in the number of counters, quadratic in the length
//!   once each counter is expanded into threshold booleans.
//!
//! Both accept exactly the same grids.

pub mod placement;
pub mod run_position;

pub use placement::PlacementEncoder;
pub use run_position::RunPositionEncoder;

use crate::nonogram::error::NonogramError;
use crate::nonogram::feasibility::{FeasibilityCache, LineFeasibility};
use crate::nonogram::puzzle::{Axis, Cell, Grid, Puzzle};
use crate::sat::assignment::Solutions;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Lit;
use clap::ValueEnum;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// `Encoding::Auto` uses placements while the whole puzzle has at most this many.
pub const AUTO_PLACEMENT_LIMIT: u128 = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, ValueEnum)]
pub enum Encoding {
    /// Placement encoding for small puzzles, run-position otherwise.
    #[default]
    Auto,
    /// Disjunction over enumerated placements.
    Placement,
    /// Progress counters constrained by run breakpoints.
    RunPosition,
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Placement => write!(f, "placement"),
            Self::RunPosition => write!(f, "run-position"),
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

impl Encoding {
    /// Replaces `Auto` with the concrete encoding it picks for `puzzle`.
    ///
    /// # Errors
    ///
    /// `NonogramError::LineOverfull` if some line's hints do not fit.
    pub fn resolve(self, puzzle: &Puzzle) -> Result<Self, NonogramError> {
        if self != Self::Auto {
            return Ok(self);
        }
        let mut total: u128 = 0;
        for line in puzzle.lines() {
            line.slack()?;
            total = total.saturating_add(LineFeasibility::new(line.hints, line.length)?.count());
        }
        let chosen = if total <= AUTO_PLACEMENT_LIMIT {
            Self::Placement
        } else {
            Self::RunPosition
        };
        log::debug!("auto encoding: {total} placements in total, using {chosen}");
        Ok(chosen)
    }
}

/// Dense `(x, y) -> variable` table for the grid cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellVars {
    width: usize,
    height: usize,
    lits: Vec<Lit>,
}

impl CellVars {
    pub fn new(cnf: &mut Cnf, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            lits: cnf.new_vars(width * height),
        }
    }

    /// The literal that is true when cell `(x, y)` is filled.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Lit {
        self.lits[y * self.width + x]
    }

    #[must_use]
    pub fn at(&self, axis: Axis, line: usize, position: usize) -> Lit {
        match axis {
            Axis::Row => self.get(position, line),
            Axis::Column => self.get(line, position),
        }
    }

    /// Cell variables of one row or column, in order.
    #[must_use]
    pub fn line(&self, axis: Axis, index: usize) -> Vec<Lit> {
        let length = match axis {
            Axis::Row => self.width,
            Axis::Column => self.height,
        };
        (0..length).map(|position| self.at(axis, index, position)).collect()
    }

    /// Reads the grid out of a model.
    #[must_use]
    pub fn decode(&self, solutions: &Solutions) -> Grid {
        let mut grid = Grid::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                grid.set(x, y, Cell::from_bool(solutions.value(self.get(x, y))));
            }
        }
        grid
    }

    /// Unit literals fixing every known cell of `grid`.
    pub fn known_cells<'a>(&'a self, grid: &'a Grid) -> impl Iterator<Item = Lit> + 'a {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter_map(move |(x, y)| match grid.get(x, y) {
                Cell::Filled => Some(self.get(x, y)),
                Cell::Empty => Some(-self.get(x, y)),
                Cell::Unknown => None,
            })
    }

    /// A clause ruling out exactly the complete grid `grid`.
    #[must_use]
    pub fn blocking_clause(&self, grid: &Grid) -> Vec<Lit> {
        self.known_cells(grid).map(|lit| -lit).collect()
    }
}

/// Turns one line's hints into clauses over that line's cell variables.
pub trait LineEncoder {
    fn name(&self) -> &'static str;

    /// Adds clauses satisfied by exactly those assignments of `cells` whose
    /// filled runs equal `hints`.
    ///
    /// # Errors
    ///
    /// `NonogramError::Overfull` if the hints do not fit in `cells.len()` cells.
    fn encode_line(&mut self, cnf: &mut Cnf, cells: &[Lit], hints: &[usize]) -> Result<(), NonogramError>;
}

/// A puzzle compiled to CNF, with the table needed to read a grid back.
#[derive(Debug, Clone)]
pub struct EncodedPuzzle {
    pub cnf: Cnf,
    pub cells: CellVars,
    /// The concrete encoding used; never `Auto`.
    pub encoding: Encoding,
}

impl EncodedPuzzle {
    #[must_use]
    pub fn decode(&self, solutions: &Solutions) -> Grid {
        self.cells.decode(solutions)
    }

    /// Fixes the known cells of `grid` with unit clauses.
    pub fn assume_grid(&mut self, grid: &Grid) -> usize {
        let units: Vec<Lit> = self.cells.known_cells(grid).collect();
        let count = units.len();
        for lit in units {
            self.cnf.add_unit(lit);
        }
        count
    }
}

/// Encodes every row and then every column of `puzzle` with `encoder`.
///
/// # Errors
///
/// `NonogramError::LineOverfull` if a line's hints do not fit.
pub fn encode_with<E: LineEncoder + ?Sized>(
    puzzle: &Puzzle,
    encoder: &mut E,
) -> Result<(Cnf, CellVars), NonogramError> {
    puzzle.check_spans()?;

    let mut cnf = Cnf::default();
    let cells = CellVars::new(&mut cnf, puzzle.width(), puzzle.height());
    for line in puzzle.lines() {
        let lits = cells.line(line.axis, line.index);
        encoder.encode_line(&mut cnf, &lits, line.hints)?;
    }
    log::debug!(
        "{} encoding: {} variables, {} clauses, {} literals",
        encoder.name(),
        cnf.num_vars,
        cnf.num_clauses(),
        cnf.num_literals()
    );
    Ok((cnf, cells))
}

/// Encodes `puzzle` with the chosen strategy, resolving `Auto` first.
///
/// # Errors
///
/// `NonogramError::LineOverfull` if a line's hints do not fit.
pub fn encode(
    puzzle: &Puzzle,
    encoding: Encoding,
    cache: &mut FeasibilityCache,
) -> Result<EncodedPuzzle, NonogramError> {
    let encoding = encoding.resolve(puzzle)?;
    let (cnf, cells) = match encoding {
        Encoding::Placement => encode_with(puzzle, &mut PlacementEncoder::new(cache))?,
        Encoding::RunPosition | Encoding::Auto => encode_with(puzzle, &mut RunPositionEncoder)?,
    };
    Ok(EncodedPuzzle {
        cnf,
        cells,
        encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonogram::generator::{random_hints, random_puzzle};
    use crate::sat::backend::{SatBackend, Varisat};
    use std::collections::HashSet;

    /// Every grid an encoding accepts, by repeated solving with blocking clauses.
    fn accepted(puzzle: &Puzzle, encoding: Encoding) -> HashSet<Grid> {
        let mut cache = FeasibilityCache::new();
        let mut encoded = encode(puzzle, encoding, &mut cache).unwrap();
        let mut grids = HashSet::new();
        while let Some(model) = Varisat.solve(&encoded.cnf).unwrap() {
            assert!(encoded.cnf.verify(&model));
            let grid = encoded.decode(&model);
            let blocking = encoded.cells.blocking_clause(&grid);
            assert!(grids.insert(grid), "blocking clause did not exclude a grid");
            encoded.cnf.add_clause(blocking);
        }
        grids
    }

    /// Every grid satisfying the hints, by exhaustive search.
    fn brute_force(puzzle: &Puzzle) -> HashSet<Grid> {
        let (width, height) = (puzzle.width(), puzzle.height());
        let cells = width * height;
        (0u32..1 << cells)
            .map(|bits| {
                let mut grid = Grid::new(width, height);
                for i in 0..cells {
                    grid.set(i % width, i / width, Cell::from_bool((bits >> i) & 1 == 1));
                }
                grid
            })
            .filter(|grid| grid.satisfies(puzzle))
            .collect()
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!(Encoding::RunPosition.to_string(), "run-position");
        assert_eq!("placement".parse::<Encoding>(), Ok(Encoding::Placement));
        assert_eq!("Run-Position".parse::<Encoding>(), Ok(Encoding::RunPosition));
        assert!("magic".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_cell_vars_share_rows_and_columns() {
        let mut cnf = Cnf::default();
        let cells = CellVars::new(&mut cnf, 3, 2);
        assert_eq!(cnf.num_vars, 6);
        assert_eq!(cells.at(Axis::Row, 1, 2), cells.at(Axis::Column, 2, 1));
        assert_eq!(cells.get(2, 1), cells.line(Axis::Row, 1)[2]);
        assert_eq!(cells.line(Axis::Column, 0), vec![cells.get(0, 0), cells.get(0, 1)]);
    }

    #[test]
    fn test_auto_prefers_placements_for_small_puzzles() {
        let puzzle = Puzzle::new(5, 1, vec![vec![5]], vec![vec![1]; 5]).unwrap();
        assert_eq!(Encoding::Auto.resolve(&puzzle).unwrap(), Encoding::Placement);
        assert_eq!(Encoding::RunPosition.resolve(&puzzle).unwrap(), Encoding::RunPosition);
    }

    #[test]
    fn test_auto_switches_for_loose_puzzles() {
        let rows = vec![vec![1, 1, 1, 1]; 30];
        let cols = vec![vec![1]; 30];
        let puzzle = Puzzle::new(30, 30, rows, cols).unwrap();
        assert_eq!(Encoding::Auto.resolve(&puzzle).unwrap(), Encoding::RunPosition);
    }

    #[test]
    fn test_overfull_line_reported_with_context() {
        let puzzle = Puzzle::new(2, 1, vec![vec![1, 1]], vec![vec![1], vec![1]]).unwrap();
        let mut cache = FeasibilityCache::new();
        for encoding in [Encoding::Placement, Encoding::RunPosition, Encoding::Auto] {
            assert!(matches!(
                encode(&puzzle, encoding, &mut cache),
                Err(NonogramError::LineOverfull { axis: Axis::Row, index: 0, .. })
            ));
        }
    }

    #[test]
    fn test_encodings_agree_on_random_solvable_puzzles() {
        let mut rng = fastrand::Rng::with_seed(2024);
        for _ in 0..40 {
            let width = rng.usize(1..=4);
            let height = rng.usize(1..=3);
            let (puzzle, grid) = random_puzzle(width, height, 0.5, &mut rng);

            let placement = accepted(&puzzle, Encoding::Placement);
            let run_position = accepted(&puzzle, Encoding::RunPosition);
            assert!(placement.contains(&grid));
            assert_eq!(placement, run_position, "puzzle:\n{puzzle}");
            assert_eq!(placement, brute_force(&puzzle), "puzzle:\n{puzzle}");
        }
    }

    #[test]
    fn test_encodings_agree_on_random_hints() {
        let mut rng = fastrand::Rng::with_seed(99);
        for _ in 0..60 {
            let width = rng.usize(1..=4);
            let height = rng.usize(1..=4);
            let puzzle = random_hints(width, height, &mut rng);

            let placement = accepted(&puzzle, Encoding::Placement);
            let run_position = accepted(&puzzle, Encoding::RunPosition);
            assert_eq!(placement, run_position, "puzzle:\n{puzzle}");
            assert_eq!(placement, brute_force(&puzzle), "puzzle:\n{puzzle}");
        }
    }

    #[test]
    fn test_assume_grid_adds_units() {
        let puzzle = Puzzle::new(2, 1, vec![vec![1]], vec![vec![1], vec![]]).unwrap();
        let mut cache = FeasibilityCache::new();
        let mut encoded = encode(&puzzle, Encoding::RunPosition, &mut cache).unwrap();
        let before = encoded.cnf.num_clauses();
        let grid = Grid::from_rows(&["#X"]).unwrap();
        assert_eq!(encoded.assume_grid(&grid), 1);
        assert_eq!(encoded.cnf.num_clauses(), before + 1);
    }
}
