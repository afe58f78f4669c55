#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod assignment;
pub mod backend;
pub mod cnf;
pub mod int_var;
pub mod literal;
