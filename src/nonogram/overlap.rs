#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The overlap technique: cells covered by a run at both its leftmost and
//! rightmost legal positions are filled in every solution.
//!
//! With slack `s`, run `i` can shift right by at most `s` cells, so when
//! `h_i > s` its last `h_i - s` cells of the packed-left position overlap the
//! first cells of the packed-right position. The pass is a single sweep over
//! rows and then columns. It never unmarks a cell and never iterates to a
//! fixed point, so running it again adds nothing.

use crate::nonogram::error::NonogramError;
use crate::nonogram::puzzle::{Axis, Cell, Puzzle, line_slack};
use std::ops::Range;

/// Positions filled in every placement of `hints` in a line of `length` cells.
///
/// # Errors
///
/// `NonogramError::Overfull` if the hints do not fit.
pub fn forced_ranges(hints: &[usize], length: usize) -> Result<Vec<Range<usize>>, NonogramError> {
    let slack = line_slack(hints, length)?;
    let Some(&longest) = hints.iter().max() else {
        return Ok(Vec::new());
    };
    if slack >= longest {
        return Ok(Vec::new());
    }

    let mut ranges = Vec::new();
    let mut start = 0;
    for &hint in hints {
        if hint > slack {
            ranges.push(start + slack..start + hint);
        }
        start += hint + 1;
    }
    Ok(ranges)
}

/// Marks the forced cells of one line, returning how many were newly filled.
///
/// # Errors
///
/// `NonogramError::LineOverfull` if the line's hints do not fit.
pub fn prefill_line(puzzle: &mut Puzzle, axis: Axis, index: usize) -> Result<usize, NonogramError> {
    let line = puzzle.line(axis, index);
    line.slack()?;
    let ranges = forced_ranges(line.hints, line.length)?;

    let mut marked = 0;
    for position in ranges.into_iter().flatten() {
        if puzzle.cell(axis, index, position) != Cell::Filled {
            puzzle.set_cell(axis, index, position, Cell::Filled);
            marked += 1;
        }
    }
    Ok(marked)
}

/// Runs the overlap pass over every row and column of `puzzle`'s grid.
///
/// Returns the number of cells newly marked filled.
///
/// # Errors
///
/// `NonogramError::LineOverfull` for the first line whose hints do not fit.
pub fn apply(puzzle: &mut Puzzle) -> Result<usize, NonogramError> {
    let mut marked = 0;
    for axis in Axis::ALL {
        for index in 0..puzzle.line_count(axis) {
            marked += prefill_line(puzzle, axis, index)?;
        }
    }
    log::debug!(
        "overlap pass marked {marked} of {} cells",
        puzzle.width() * puzzle.height()
    );
    Ok(marked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonogram::feasibility::LineFeasibility;
    use crate::nonogram::puzzle::min_span;

    #[test]
    fn test_full_line() {
        assert_eq!(forced_ranges(&[5], 5).unwrap(), vec![0..5]);
    }

    #[test]
    fn test_partial_overlap() {
        // slack 2: the run of 4 covers cells 2 and 3 wherever it goes
        assert_eq!(forced_ranges(&[4], 6).unwrap(), vec![2..4]);
        // slack 1: both runs overlap, the gap never does
        assert_eq!(forced_ranges(&[3, 2], 7).unwrap(), vec![1..3, 5..6]);
    }

    #[test]
    fn test_no_overlap_when_slack_covers_longest() {
        assert!(forced_ranges(&[2, 1], 6).unwrap().is_empty());
        assert!(forced_ranges(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn test_only_long_runs_contribute() {
        assert_eq!(forced_ranges(&[1, 3], 6).unwrap(), vec![3..5]);
    }

    #[test]
    fn test_overfull_line() {
        let mut puzzle = Puzzle::new(2, 1, vec![vec![3]], vec![vec![1], vec![1]]).unwrap();
        assert!(matches!(
            apply(&mut puzzle),
            Err(NonogramError::LineOverfull { axis: Axis::Row, index: 0, .. })
        ));
    }

    #[test]
    fn test_huge_hint_is_overfull() {
        assert!(matches!(
            forced_ranges(&[usize::MAX, 1], 2),
            Err(NonogramError::Overfull { required: usize::MAX, length: 2, .. })
        ));
        let mut puzzle =
            Puzzle::new(2, 1, vec![vec![usize::MAX, 1]], vec![vec![1], vec![1]]).unwrap();
        let err = apply(&mut puzzle).unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(puzzle.grid().count(Cell::Filled), 0);
    }

    #[test]
    fn test_soundness_against_enumeration() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..300 {
            let k = rng.usize(0..4);
            let hints: Vec<usize> = (0..k).map(|_| rng.usize(1..6)).collect();
            let length = min_span(&hints) + rng.usize(0..4);

            let forced: Vec<usize> = forced_ranges(&hints, length)
                .unwrap()
                .into_iter()
                .flatten()
                .collect();
            for placement in LineFeasibility::new(&hints, length).unwrap().iter() {
                for &position in &forced {
                    assert!(
                        placement[position],
                        "cell {position} of {hints:?}/{length} is not always filled"
                    );
                }
            }
        }
    }

    #[test]
    fn test_single_row_fully_forced() {
        let mut puzzle = Puzzle::new(5, 1, vec![vec![5]], vec![vec![1]; 5]).unwrap();
        assert_eq!(apply(&mut puzzle).unwrap(), 5);
        assert_eq!(puzzle.grid().to_string(), "#####\n");
    }

    #[test]
    fn test_unknown_cells_render_as_x() {
        let mut puzzle = Puzzle::new(
            4,
            2,
            vec![vec![3], vec![1]],
            vec![vec![1], vec![2], vec![1], vec![]],
        )
        .unwrap();
        apply(&mut puzzle).unwrap();
        // row 0 forces cells 1 and 2, column 1 forces both of its cells
        assert_eq!(puzzle.grid().to_string(), "X##X\nX#XX\n");
    }

    #[test]
    fn test_idempotent() {
        let mut puzzle = Puzzle::parse("5 4\n2 2\n5\n3\n1\n2\n3\n3\n3\n2\n").unwrap();
        let first = apply(&mut puzzle).unwrap();
        assert!(first > 0);
        let snapshot = puzzle.grid().clone();
        assert_eq!(apply(&mut puzzle).unwrap(), 0);
        assert_eq!(puzzle.grid(), &snapshot);
    }
}
