#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::nonogram::puzzle::Axis;
use thiserror::Error;

/// Everything that can go wrong between reading a puzzle and decoding a model.
///
/// An unsolvable puzzle is not represented here; see
/// [`SolveOutcome::Unsolvable`](crate::nonogram::solver::SolveOutcome::Unsolvable).
#[derive(Error, Debug)]
pub enum NonogramError {
    #[error("puzzle description has no dimensions line")]
    MissingDimensions,
    #[error("line {line}: invalid dimensions \"{text}\", expected two positive integers")]
    InvalidDimensions { line: usize, text: String },
    #[error("line {line}: invalid hint \"{token}\"")]
    InvalidHint { line: usize, token: String },
    #[error("expected {expected} {axis} hint lines, found {found}")]
    HintCountMismatch {
        axis: Axis,
        expected: usize,
        found: usize,
    },
    #[error("{axis} {index}: hints {hints:?} need {required} cells but the line has {length}")]
    LineOverfull {
        axis: Axis,
        index: usize,
        hints: Vec<usize>,
        required: usize,
        length: usize,
    },
    #[error("hints {hints:?} need {required} cells but the line has {length}")]
    Overfull {
        hints: Vec<usize>,
        required: usize,
        length: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("satisfiability backend failed: {0}")]
    Backend(String),
    #[error("decoded grid violates {axis} {index}")]
    InvalidModel { axis: Axis, index: usize },
}

impl NonogramError {
    /// True for malformed puzzles, as opposed to I/O or solver failures.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::MissingDimensions
                | Self::InvalidDimensions { .. }
                | Self::InvalidHint { .. }
                | Self::HintCountMismatch { .. }
                | Self::LineOverfull { .. }
                | Self::Overfull { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_classification() {
        assert!(NonogramError::MissingDimensions.is_format_error());
        assert!(
            NonogramError::Overfull {
                hints: vec![3],
                required: 3,
                length: 2
            }
            .is_format_error()
        );
        assert!(!NonogramError::Backend("boom".into()).is_format_error());
    }

    #[test]
    fn test_messages() {
        let err = NonogramError::HintCountMismatch {
            axis: Axis::Row,
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "expected 3 row hint lines, found 2");

        let err = NonogramError::LineOverfull {
            axis: Axis::Column,
            index: 4,
            hints: vec![2, 2],
            required: 5,
            length: 4,
        };
        assert_eq!(
            err.to_string(),
            "column 4: hints [2, 2] need 5 cells but the line has 4"
        );
    }
}
