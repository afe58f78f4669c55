//! Argument parsing and reporting for the `nonogram` binary.

pub(crate) mod cli;
