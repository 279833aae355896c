#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod difficulty;
pub mod generator;
pub mod isomorph;
pub mod seed;

pub use difficulty::{
    CounterSummary, DifficultyReport, DifficultyTier, classify_difficulty, estimate_difficulty,
};
pub use generator::{GenerateConfig, GeneratedPuzzle, generate};
pub use isomorph::Isomorphism;

#[derive(thiserror::Error, Debug)]
pub enum GenError {
    #[error(transparent)]
    Board(#[from] sudoku_core::BoardError),
    #[error(transparent)]
    Solve(#[from] sudoku_solver::SolveError),
    #[error("no box fill produced a solvable seed board after {attempts} attempts")]
    SeedAttemptsExhausted { attempts: u32 },
    #[error("difficulty estimation needs at least one sample")]
    NoSamples,
    #[error("board has conflicting givens")]
    PuzzleInvalid,
    #[error("board does not have a unique solution")]
    PuzzleNotUnique,
}
