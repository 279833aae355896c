use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("box size n={0} outside the supported range 2..=15")]
    UnsupportedBoxSize(u8),

    #[error("board has {got} cells, expected {expected} for box size n={n}")]
    WrongCellCount { n: u8, expected: usize, got: usize },

    #[error("cell {cell} holds symbol {symbol}, above the board side {side}")]
    SymbolOutOfRange { cell: usize, symbol: u8, side: u8 },
}
