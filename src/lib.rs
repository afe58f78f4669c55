//! This crate solves nonogram (paint-by-numbers) puzzles by compiling their
//! hints into a Boolean satisfiability problem.

/// The `encoding` module turns row and column hints into CNF, either by
/// enumerating line placements or with per-cell progress counters.
pub mod encoding;

/// The `nonogram` module holds the puzzle model, the overlap heuristic, line
/// enumeration and the solving session.
pub mod nonogram;

/// The `sat` module provides literals, CNF formulas, order-encoded integers and
/// the backend that decides them.
pub mod sat;
