#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Random puzzles for tests, benchmarks and the `generate` command.
//!
//! A puzzle built from a random grid is always solvable (the grid itself is a
//! solution) but not necessarily unique.

use crate::nonogram::puzzle::{Cell, Grid, Puzzle};

/// A complete grid where each cell is filled with probability `density`.
#[must_use]
pub fn random_grid(width: usize, height: usize, density: f64, rng: &mut fastrand::Rng) -> Grid {
    let mut grid = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            grid.set(x, y, Cell::from_bool(rng.f64() < density));
        }
    }
    grid
}

/// A solvable puzzle together with one of its solutions.
#[must_use]
pub fn random_puzzle(
    width: usize,
    height: usize,
    density: f64,
    rng: &mut fastrand::Rng,
) -> (Puzzle, Grid) {
    let grid = random_grid(width, height, density, rng);
    (Puzzle::from_grid(&grid), grid)
}

/// Random hints that fit their lines but need not agree with each other,
/// so the resulting puzzle may well be unsolvable.
#[must_use]
pub fn random_hints(width: usize, height: usize, rng: &mut fastrand::Rng) -> Puzzle {
    let mut line = |length: usize| -> Vec<usize> {
        let mut hints = Vec::new();
        let mut used = 0;
        while used < length && rng.bool() {
            let hint = rng.usize(1..=length - used);
            hints.push(hint);
            used += hint + 1;
        }
        hints
    };
    let rows = (0..height).map(|_| line(width)).collect();
    let cols = (0..width).map(|_| line(height)).collect();
    Puzzle::from_lines(rows, cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonogram::puzzle::Axis;

    #[test]
    fn test_random_puzzle_is_satisfied_by_its_grid() {
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..20 {
            let (puzzle, grid) = random_puzzle(6, 4, 0.5, &mut rng);
            assert_eq!(puzzle.width(), 6);
            assert_eq!(puzzle.height(), 4);
            assert!(grid.satisfies(&puzzle));
            assert!(puzzle.check_spans().is_ok());
        }
    }

    #[test]
    fn test_density_extremes() {
        let mut rng = fastrand::Rng::with_seed(1);
        assert_eq!(random_grid(3, 3, 0.0, &mut rng).count(Cell::Filled), 0);
        assert_eq!(random_grid(3, 3, 1.0, &mut rng).count(Cell::Filled), 9);
    }

    #[test]
    fn test_random_hints_fit() {
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..100 {
            let puzzle = random_hints(5, 3, &mut rng);
            assert_eq!((puzzle.width(), puzzle.height()), (5, 3));
            assert_eq!(puzzle.line_count(Axis::Row), 3);
            assert_eq!(puzzle.line_count(Axis::Column), 5);
            assert!(puzzle.check_spans().is_ok());
        }
    }
}
