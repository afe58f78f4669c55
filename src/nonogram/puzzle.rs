#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Puzzle dimensions, hints, and the tri-state grid the overlap pass writes into.
//!
//! Row- and column-oriented code address cells uniformly through
//! `(axis, line, position)`: for [`Axis::Row`] the line is `y` and the
//! position is `x`; for [`Axis::Column`] it is the other way round.

use crate::nonogram::error::NonogramError;
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};
use std::path::Path;
use std::str::FromStr;

/// Run lengths of one line, in order. Empty means the line has no filled cells.
pub type Hints = SmallVec<[usize; 8]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub const ALL: [Self; 2] = [Self::Row, Self::Column];

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row => write!(f, "row"),
            Self::Column => write!(f, "column"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Cell {
    #[default]
    Unknown,
    Empty,
    Filled,
}

impl Cell {
    #[must_use]
    pub const fn from_bool(filled: bool) -> Self {
        if filled { Self::Filled } else { Self::Empty }
    }

    #[must_use]
    pub const fn is_filled(self) -> bool {
        matches!(self, Self::Filled)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "."),
            Self::Filled => write!(f, "#"),
            Self::Unknown => write!(f, "X"),
        }
    }
}

/// Cells needed by `hints` when packed as tightly as possible.
///
/// Saturates at `usize::MAX`, which no line can hold, so hints too large to
/// add up are reported as overfull rather than wrapping.
#[must_use]
pub fn min_span(hints: &[usize]) -> usize {
    hints
        .iter()
        .try_fold(hints.len().saturating_sub(1), |span, &hint| span.checked_add(hint))
        .unwrap_or(usize::MAX)
}

/// Spare cells left once `hints` are packed into a line of `length` cells.
///
/// # Errors
///
/// `NonogramError::Overfull` if the hints do not fit.
pub fn line_slack(hints: &[usize], length: usize) -> Result<usize, NonogramError> {
    let required = min_span(hints);
    length
        .checked_sub(required)
        .ok_or_else(|| NonogramError::Overfull {
            hints: hints.to_vec(),
            required,
            length,
        })
}

/// Lengths of the maximal filled runs in `cells`. Unknown cells break runs.
pub fn runs_of<I: IntoIterator<Item = Cell>>(cells: I) -> Hints {
    let mut runs = Hints::new();
    let mut current = 0;
    for cell in cells {
        if cell.is_filled() {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    if current > 0 {
        runs.push(current);
    }
    runs
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid with every cell `Unknown`.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Unknown; width * height],
        }
    }

    /// Reads a grid drawn with `#` (filled), `.` (empty) and `X` (unknown).
    /// Returns `None` for ragged rows or other characters.
    #[must_use]
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            let before = cells.len();
            for ch in row.as_ref().chars() {
                cells.push(match ch {
                    '#' => Cell::Filled,
                    '.' => Cell::Empty,
                    'X' => Cell::Unknown,
                    _ => return None,
                });
            }
            if cells.len() - before != width {
                return None;
            }
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self[(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self[(x, y)] = cell;
    }

    const fn coords(axis: Axis, line: usize, position: usize) -> (usize, usize) {
        match axis {
            Axis::Row => (position, line),
            Axis::Column => (line, position),
        }
    }

    #[must_use]
    pub fn at(&self, axis: Axis, line: usize, position: usize) -> Cell {
        self[Self::coords(axis, line, position)]
    }

    pub fn set_at(&mut self, axis: Axis, line: usize, position: usize, cell: Cell) {
        self[Self::coords(axis, line, position)] = cell;
    }

    #[must_use]
    pub const fn line_length(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.width,
            Axis::Column => self.height,
        }
    }

    pub fn line_cells(&self, axis: Axis, line: usize) -> impl Iterator<Item = Cell> + '_ {
        (0..self.line_length(axis)).map(move |position| self.at(axis, line, position))
    }

    #[must_use]
    pub fn runs(&self, axis: Axis, line: usize) -> Hints {
        runs_of(self.line_cells(axis, line))
    }

    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.count(Cell::Unknown) == 0
    }

    /// The first line whose runs differ from the puzzle's hints, if any.
    #[must_use]
    pub fn first_violation(&self, puzzle: &Puzzle) -> Option<(Axis, usize)> {
        if self.width != puzzle.width() || self.height != puzzle.height() {
            return Some((Axis::Row, 0));
        }
        Axis::ALL
            .into_iter()
            .flat_map(|axis| (0..puzzle.line_count(axis)).map(move |index| (axis, index)))
            .find(|&(axis, index)| self.runs(axis, index).as_slice() != puzzle.hints(axis, index))
    }

    /// True when the grid is complete and every line matches its hints.
    #[must_use]
    pub fn satisfies(&self, puzzle: &Puzzle) -> bool {
        self.is_complete() && self.first_violation(puzzle).is_none()
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.cells[y * self.width + x]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.cells[y * self.width + x]
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.width.max(1)).take(self.height) {
            for cell in row {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One row or column, borrowed from a [`Puzzle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    pub axis: Axis,
    pub index: usize,
    pub hints: &'a [usize],
    pub length: usize,
}

impl Line<'_> {
    /// # Errors
    ///
    /// `NonogramError::LineOverfull` when the hints need more cells than the line has.
    pub fn slack(&self) -> Result<usize, NonogramError> {
        line_slack(self.hints, self.length).map_err(|_| NonogramError::LineOverfull {
            axis: self.axis,
            index: self.index,
            hints: self.hints.to_vec(),
            required: min_span(self.hints),
            length: self.length,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    rows: Vec<Hints>,
    cols: Vec<Hints>,
    grid: Grid,
}

impl Puzzle {
    /// Builds a puzzle from `height` row hint lists and `width` column hint lists.
    ///
    /// Zero entries are dropped, so `[0]` is the same as `[]`. Only the line
    /// counts are validated here; whether each line's hints fit is checked by
    /// [`Puzzle::check_spans`].
    ///
    /// # Errors
    ///
    /// `NonogramError::HintCountMismatch` when the counts disagree with the dimensions.
    pub fn new(
        width: usize,
        height: usize,
        rows: Vec<Vec<usize>>,
        cols: Vec<Vec<usize>>,
    ) -> Result<Self, NonogramError> {
        if rows.len() != height {
            return Err(NonogramError::HintCountMismatch {
                axis: Axis::Row,
                expected: height,
                found: rows.len(),
            });
        }
        if cols.len() != width {
            return Err(NonogramError::HintCountMismatch {
                axis: Axis::Column,
                expected: width,
                found: cols.len(),
            });
        }
        Ok(Self::from_lines(rows, cols))
    }

    /// A puzzle sized by its hint lists: one row per entry of `rows`, one
    /// column per entry of `cols`. Zero hints are dropped.
    pub(crate) fn from_lines(rows: Vec<Vec<usize>>, cols: Vec<Vec<usize>>) -> Self {
        let normalise = |lines: Vec<Vec<usize>>| -> Vec<Hints> {
            lines
                .into_iter()
                .map(|line| line.into_iter().filter(|&h| h > 0).collect())
                .collect()
        };
        let (width, height) = (cols.len(), rows.len());
        Self {
            rows: normalise(rows),
            cols: normalise(cols),
            grid: Grid::new(width, height),
        }
    }

    /// The puzzle whose hints are the runs of `grid` (unknown cells count as empty).
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let lines = |axis: Axis| -> Vec<Hints> {
            (0..grid.line_length(axis.other()))
                .map(|index| grid.runs(axis, index))
                .collect()
        };
        Self {
            rows: lines(Axis::Row),
            cols: lines(Axis::Column),
            grid: Grid::new(grid.width(), grid.height()),
        }
    }

    /// Parses the textual puzzle description.
    ///
    /// Blank lines and lines starting with `#` are skipped. The first
    /// significant line is `WIDTH HEIGHT`, followed by `HEIGHT` row hint lines
    /// and `WIDTH` column hint lines; anything after that is ignored.
    ///
    /// # Errors
    ///
    /// A format error for a bad dimensions line, a non-integer hint token, or
    /// too few hint lines.
    pub fn parse(text: &str) -> Result<Self, NonogramError> {
        let mut significant = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (line_no, dims) = significant.next().ok_or(NonogramError::MissingDimensions)?;
        let (width, height) = parse_dimensions(line_no, dims)?;

        let mut rows = Vec::new();
        let mut cols = Vec::new();
        for (line_no, line) in significant.take(height.saturating_add(width)) {
            let hints = parse_hints(line_no, line)?;
            if rows.len() < height {
                rows.push(hints);
            } else {
                cols.push(hints);
            }
        }

        Self::new(width, height, rows, cols)
    }

    /// Reads and parses a puzzle file.
    ///
    /// # Errors
    ///
    /// `NonogramError::Io` if the file cannot be read, otherwise as [`Puzzle::parse`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, NonogramError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.grid.width()
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.grid.height()
    }

    /// Number of cells in a line of `axis`: the width for rows, the height for columns.
    #[must_use]
    pub const fn line_length(&self, axis: Axis) -> usize {
        self.grid.line_length(axis)
    }

    /// Number of lines along `axis`.
    #[must_use]
    pub const fn line_count(&self, axis: Axis) -> usize {
        self.grid.line_length(axis.other())
    }

    #[must_use]
    pub fn hints(&self, axis: Axis, index: usize) -> &[usize] {
        match axis {
            Axis::Row => &self.rows[index],
            Axis::Column => &self.cols[index],
        }
    }

    #[must_use]
    pub fn line(&self, axis: Axis, index: usize) -> Line<'_> {
        Line {
            axis,
            index,
            hints: self.hints(axis, index),
            length: self.line_length(axis),
        }
    }

    /// Every row, then every column.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> + '_ {
        Axis::ALL
            .into_iter()
            .flat_map(move |axis| (0..self.line_count(axis)).map(move |index| self.line(axis, index)))
    }

    /// Checks that every line's hints fit in the line.
    ///
    /// # Errors
    ///
    /// `NonogramError::LineOverfull` for the first line that does not.
    pub fn check_spans(&self) -> Result<(), NonogramError> {
        self.lines().try_for_each(|line| line.slack().map(|_| ()))
    }

    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    pub const fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[must_use]
    pub fn cell(&self, axis: Axis, line: usize, position: usize) -> Cell {
        self.grid.at(axis, line, position)
    }

    pub fn set_cell(&mut self, axis: Axis, line: usize, position: usize, cell: Cell) {
        self.grid.set_at(axis, line, position, cell);
    }
}

impl FromStr for Puzzle {
    type Err = NonogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Writes the puzzle in the format [`Puzzle::parse`] reads. Empty hint lists are written as `0`.
impl Display for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", self.width(), self.height())?;
        for hints in self.rows.iter().chain(&self.cols) {
            if hints.is_empty() {
                writeln!(f, "0")?;
            } else {
                writeln!(f, "{}", itertools::join(hints, " "))?;
            }
        }
        Ok(())
    }
}

fn parse_dimensions(line_no: usize, text: &str) -> Result<(usize, usize), NonogramError> {
    let invalid = || NonogramError::InvalidDimensions {
        line: line_no,
        text: text.to_string(),
    };
    let values: Vec<usize> = text
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| invalid())?;
    match values.as_slice() {
        &[width, height] if width > 0 && height > 0 => Ok((width, height)),
        _ => Err(invalid()),
    }
}

fn parse_hints(line_no: usize, text: &str) -> Result<Vec<usize>, NonogramError> {
    text.split_whitespace()
        .map(|token| {
            token.parse().map_err(|_| NonogramError::InvalidHint {
                line: line_no,
                token: token.to_string(),
            })
        })
        .collect()
}
