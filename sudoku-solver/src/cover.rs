//! Static exact-cover scaffold for one box size.
//!
//! Sudoku on a side-`N` board (`N = n²`) maps to exact cover with four
//! constraint families of `n⁴` columns each: every cell filled once, every
//! box/row/column containing every symbol once. A choice is one candidate
//! assignment "symbol `v` at `(r, c)`" and covers exactly one column per
//! family. The matrix is dense and regular, so it is stored as two flat
//! index arrays instead of linked nodes.

/// Constraint families, in column-block order.
pub const FAMILIES: usize = 4;

const ROWCOL: usize = 0;
const BOXNUM: usize = 1;
const ROWNUM: usize = 2;
const COLNUM: usize = 3;

pub struct CoverMatrix {
    n: usize,
    side: usize,
    cells: usize,
    width: usize,
    height: usize,
    /// `choice * FAMILIES + family -> column`
    col_of_choice: Vec<u32>,
    /// `column * side + k -> choice`, exactly `side` choices per column
    choices_of_col: Vec<u32>,
}

impl CoverMatrix {
    pub fn new(n: usize) -> Self {
        let side = n * n;
        let cells = side * side;
        let width = FAMILIES * cells;
        let height = side * cells;

        let mut col_of_choice = vec![0u32; height * FAMILIES];
        for r in 0..side {
            for c in 0..side {
                for v in 0..side {
                    let choice = (r * side + c) * side + v;
                    let entry = &mut col_of_choice[choice * FAMILIES..(choice + 1) * FAMILIES];
                    entry[ROWCOL] = (ROWCOL * cells + side * r + c) as u32;
                    entry[BOXNUM] = (BOXNUM * cells + (r / n * n + c / n) * side + v) as u32;
                    entry[ROWNUM] = (ROWNUM * cells + side * r + v) as u32;
                    entry[COLNUM] = (COLNUM * cells + side * c + v) as u32;
                }
            }
        }

        let mut fill = vec![0usize; width];
        let mut choices_of_col = vec![0u32; width * side];
        for choice in 0..height {
            for family in 0..FAMILIES {
                let col = col_of_choice[choice * FAMILIES + family] as usize;
                choices_of_col[col * side + fill[col]] = choice as u32;
                fill[col] += 1;
            }
        }
        debug_assert!(fill.iter().all(|&f| f == side));

        Self {
            n,
            side,
            cells,
            width,
            height,
            col_of_choice,
            choices_of_col,
        }
    }

    pub fn box_size(&self) -> usize {
        self.n
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Total constraint columns, `4·n⁴`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total choices, `n²·n⁴`.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The four columns covered by `choice`.
    pub fn columns_of(&self, choice: usize) -> [usize; FAMILIES] {
        let base = choice * FAMILIES;
        [
            self.col_of_choice[base] as usize,
            self.col_of_choice[base + 1] as usize,
            self.col_of_choice[base + 2] as usize,
            self.col_of_choice[base + 3] as usize,
        ]
    }

    /// The `side` choices that cover `col`.
    pub fn choices_of(&self, col: usize) -> &[u32] {
        &self.choices_of_col[col * self.side..(col + 1) * self.side]
    }

    /// The `k`-th choice covering `col`.
    pub fn choice_in(&self, col: usize, k: usize) -> usize {
        self.choices_of_col[col * self.side + k] as usize
    }

    /// Choice id for placing zero-based symbol `value` into `cell`.
    pub fn choice_id(&self, cell: usize, value: usize) -> usize {
        cell * self.side + value
    }

    /// Inverse of [`CoverMatrix::choice_id`], with the symbol one-based.
    pub fn decode(&self, choice: usize) -> (usize, u8) {
        (choice / self.side, (choice % self.side + 1) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_ids_follow_family_formulas() {
        let m = CoverMatrix::new(2);
        // n=2: side=4, cells=16. Choice "symbol 3 (v=2) at (1,2)".
        let choice = m.choice_id(1 * 4 + 2, 2);
        let [rowcol, boxnum, rownum, colnum] = m.columns_of(choice);
        assert_eq!(rowcol, 4 * 1 + 2);
        assert_eq!(boxnum, 16 + (1 / 2 * 2 + 2 / 2) * 4 + 2);
        assert_eq!(rownum, 32 + 4 * 1 + 2);
        assert_eq!(colnum, 48 + 4 * 2 + 2);
    }

    #[test]
    fn every_column_lists_its_coverers() {
        let m = CoverMatrix::new(2);
        for col in 0..m.width() {
            let choices = m.choices_of(col);
            assert_eq!(choices.len(), m.side());
            for &choice in choices {
                assert!(
                    m.columns_of(choice as usize).contains(&col),
                    "column {col} lists choice {choice} that does not cover it"
                );
            }
        }
    }

    #[test]
    fn choice_decode_roundtrip() {
        let m = CoverMatrix::new(3);
        for cell in [0, 17, 80] {
            for value in [0, 4, 8] {
                let (back_cell, symbol) = m.decode(m.choice_id(cell, value));
                assert_eq!((back_cell, symbol), (cell, value as u8 + 1));
            }
        }
    }

    #[test]
    fn dimensions_scale_with_box_size() {
        let m = CoverMatrix::new(3);
        assert_eq!(m.side(), 9);
        assert_eq!(m.cells(), 81);
        assert_eq!(m.width(), 4 * 81);
        assert_eq!(m.height(), 9 * 81);
    }
}
