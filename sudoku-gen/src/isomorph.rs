//! Board-preserving transformations.
//!
//! A board maps to an equivalent board under any composition of: a
//! permutation of the bands, a permutation of the stacks, independent row
//! permutations within each destination band, independent column
//! permutations within each destination stack, and a relabeling of the
//! nonzero symbols. The composition is stored as flat row/column/symbol
//! maps so applying and inverting are single table lookups per cell.

use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;
use sudoku_core::Board;

/// One sampled board-preserving transformation.
///
/// Bijective over valid boards; preserves solution count and hint count
/// (symbol 0, the empty cell, always maps to itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isomorphism {
    n: u8,
    /// Source row -> destination row.
    row_map: Vec<u8>,
    /// Source column -> destination column.
    col_map: Vec<u8>,
    /// Symbol relabeling over `0..=side`, fixing 0.
    symbol_map: Vec<u8>,
}

impl Isomorphism {
    pub fn identity(n: u8) -> Self {
        let side = n as usize * n as usize;
        Self {
            n,
            row_map: (0..side as u8).collect(),
            col_map: (0..side as u8).collect(),
            symbol_map: (0..=side as u8).collect(),
        }
    }

    /// Draw a uniform transformation: band order, stack order, row order
    /// within each destination band, column order within each destination
    /// stack, and a symbol permutation.
    pub fn sample<R: Rng + ?Sized>(n: u8, rng: &mut R) -> Self {
        let side = n as usize * n as usize;

        let mut symbol_map = vec![0u8; side + 1];
        let mut symbols: Vec<u8> = (1..=side as u8).collect();
        symbols.shuffle(rng);
        symbol_map[1..].copy_from_slice(&symbols);

        Self {
            n,
            row_map: line_map(n, rng),
            col_map: line_map(n, rng),
            symbol_map,
        }
    }

    pub fn box_size(&self) -> u8 {
        self.n
    }

    pub fn apply(&self, board: &Board) -> Board {
        debug_assert_eq!(board.box_size(), self.n);
        let side = board.side();
        let mut out = board.clone();
        for row in 0..side {
            for col in 0..side {
                let symbol = board.get(board.index_of(row, col));
                let dst = out.index_of(self.row_map[row] as usize, self.col_map[col] as usize);
                out.set(dst, self.symbol_map[symbol as usize]);
            }
        }
        out
    }

    /// The transformation mapping every output of [`Isomorphism::apply`]
    /// back to its input.
    pub fn inverse(&self) -> Self {
        Self {
            n: self.n,
            row_map: invert(&self.row_map),
            col_map: invert(&self.col_map),
            symbol_map: invert(&self.symbol_map),
        }
    }
}

/// Compose a band permutation with per-destination-band inner orders into a
/// full line map (used for both rows and columns).
fn line_map<R: Rng + ?Sized>(n: u8, rng: &mut R) -> Vec<u8> {
    let n_usize = n as usize;
    let side = n_usize * n_usize;

    let mut groups: SmallVec<[u8; 4]> = (0..n).collect();
    groups.shuffle(rng);

    let mut inner = vec![0u8; side];
    for group in 0..n_usize {
        let lines = &mut inner[group * n_usize..(group + 1) * n_usize];
        for (i, line) in lines.iter_mut().enumerate() {
            *line = i as u8;
        }
        lines.shuffle(rng);
    }

    let mut map = vec![0u8; side];
    for (src, slot) in map.iter_mut().enumerate() {
        let dst_group = groups[src / n_usize] as usize;
        let dst_line = inner[dst_group * n_usize + src % n_usize] as usize;
        *slot = (dst_group * n_usize + dst_line) as u8;
    }
    map
}

fn invert(map: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; map.len()];
    for (src, &dst) in map.iter().enumerate() {
        out[dst as usize] = src as u8;
    }
    out
}
