#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Smallest supported box size (4x4 boards).
pub const MIN_BOX_SIZE: u8 = 2;
/// Largest box size whose symbols still fit a byte (side 225).
pub const MAX_BOX_SIZE: u8 = 15;

/// A partially or fully filled grid of box size `n`.
///
/// The board side is `n²` and the cell count `n⁴`. Cells are row-major,
/// `0` = empty, `1..=n²` = symbol. Construction validates shape and symbol
/// range; the no-duplicates invariant is queryable via [`Board::first_conflict`]
/// rather than enforced on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Board {
    n: u8,
    cells: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Row,
    Column,
    Box,
}

/// A duplicated symbol within one row, column, or box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub unit: UnitKind,
    pub index: usize,
    pub symbol: u8,
}

impl Board {
    pub fn empty(n: u8) -> Result<Self, BoardError> {
        check_box_size(n)?;
        let cells = cell_count(n);
        Ok(Self {
            n,
            cells: vec![0; cells],
        })
    }

    pub fn from_cells(n: u8, cells: Vec<u8>) -> Result<Self, BoardError> {
        check_box_size(n)?;
        let expected = cell_count(n);
        if cells.len() != expected {
            return Err(BoardError::WrongCellCount {
                n,
                expected,
                got: cells.len(),
            });
        }
        let side = (n as usize * n as usize) as u8;
        for (cell, &symbol) in cells.iter().enumerate() {
            if symbol > side {
                return Err(BoardError::SymbolOutOfRange { cell, symbol, side });
            }
        }
        Ok(Self { n, cells })
    }

    pub fn box_size(&self) -> u8 {
        self.n
    }

    /// Board side `n²`: symbols per row, rows per board.
    pub fn side(&self) -> usize {
        self.n as usize * self.n as usize
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn get(&self, cell: usize) -> u8 {
        self.cells[cell]
    }

    pub fn set(&mut self, cell: usize, symbol: u8) {
        debug_assert!(symbol as usize <= self.side());
        self.cells[cell] = symbol;
    }

    pub fn clear(&mut self, cell: usize) {
        self.cells[cell] = 0;
    }

    pub fn index_of(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.side() && col < self.side());
        row * self.side() + col
    }

    pub fn position_of(&self, cell: usize) -> (usize, usize) {
        (cell / self.side(), cell % self.side())
    }

    /// Number of filled cells.
    pub fn hint_count(&self) -> usize {
        self.cells.iter().filter(|&&s| s != 0).count()
    }

    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|&s| s != 0)
    }

    /// Overwrite every cell from `other`, which must share the box size.
    pub fn copy_from(&mut self, other: &Board) {
        debug_assert_eq!(self.n, other.n);
        self.cells.copy_from_slice(&other.cells);
    }

    /// Scan rows, columns, and boxes for a duplicated nonzero symbol.
    ///
    /// Returns the first offending unit, or `None` for a structurally
    /// consistent board.
    pub fn first_conflict(&self) -> Option<Conflict> {
        let side = self.side();
        let n = self.n as usize;
        let mut seen = vec![false; side];
        for index in 0..side {
            for unit in [UnitKind::Row, UnitKind::Column, UnitKind::Box] {
                seen.fill(false);
                for k in 0..side {
                    let cell = match unit {
                        UnitKind::Row => index * side + k,
                        UnitKind::Column => k * side + index,
                        UnitKind::Box => (index / n * n + k / n) * side + (index % n) * n + k % n,
                    };
                    let symbol = self.cells[cell];
                    if symbol == 0 {
                        continue;
                    }
                    let slot = &mut seen[symbol as usize - 1];
                    if *slot {
                        return Some(Conflict {
                            unit,
                            index,
                            symbol,
                        });
                    }
                    *slot = true;
                }
            }
        }
        None
    }
}

fn check_box_size(n: u8) -> Result<(), BoardError> {
    if !(MIN_BOX_SIZE..=MAX_BOX_SIZE).contains(&n) {
        return Err(BoardError::UnsupportedBoxSize(n));
    }
    Ok(())
}

fn cell_count(n: u8) -> usize {
    let n = n as usize;
    n * n * n * n
}
