#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Nonogram puzzles: the model, the overlap heuristic, line enumeration and
//! the solving session that ties them to the CNF encoders.

pub mod error;
pub mod feasibility;
pub mod generator;
pub mod overlap;
pub mod puzzle;
pub mod solver;
