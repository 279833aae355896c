#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod cover;
pub mod error;
pub mod solver;

pub use crate::error::SolveError;
pub use crate::solver::{Resolution, SolveStats, Solver};
pub use sudoku_core::Board;
