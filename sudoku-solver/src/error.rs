use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("solver built for box size n={solver} was handed a board of box size n={board}")]
    BoxSizeMismatch { solver: u8, board: u8 },

    #[error(transparent)]
    Board(#[from] sudoku_core::BoardError),
}
