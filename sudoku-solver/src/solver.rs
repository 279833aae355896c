//! Iterative exact-cover search with adaptive column weights.
//!
//! Cover state is a set of parallel counter arrays rather than dancing-links
//! node splicing: `row_count[choice]` counts covered columns blocking a
//! choice (0 = live), `col_count[column]` counts live choices remaining.
//! Columns owned by a committed choice carry a high tag bit in `col_count`,
//! which keeps them out of min-column selection and lets backtracking
//! restore them with a single bit flip.
//!
//! Column selection picks the smallest live count; ties prefer the column
//! with the larger `col_fail` weight. `col_choice` grows on forward entry
//! (more for narrow columns deep in the tree) and `col_fail` snapshots
//! `col_choice + depth` when a column exhausts, so dead ends near the
//! leaves weigh heaviest.

use sudoku_core::board::{MAX_BOX_SIZE, MIN_BOX_SIZE};
use sudoku_core::{Board, BoardError};

use crate::cover::CoverMatrix;
use crate::error::SolveError;

#[cfg(feature = "tracing")]
use tracing::trace;

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

/// Outcome of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Duplicate givens or no completion; the board is left untouched.
    Invalid,
    /// Exactly one completion; the board now holds it.
    Complete,
    /// More than one completion; the board holds the first one found.
    Multiple,
}

/// Search-effort counters, the difficulty signal exported by the solver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SolveStats {
    /// Choices committed, givens included.
    pub forward_steps: u64,
    /// Choices undone while unwinding dead ends.
    pub backtrack_steps: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Forward,
    Backtrack,
}

const UNDEF: u32 = u32::MAX;

/// Tag bit marking a column owned by a committed choice.
const OWNED: u16 = 1 << 15;

/// Running minimum over live column counts, refreshed by each commit.
#[derive(Debug, Clone, Copy)]
struct MinColumn {
    count: u16,
    col: u32,
    fail: u32,
}

impl MinColumn {
    fn undefined(side: usize) -> Self {
        Self {
            count: side as u16 + 1,
            col: 0,
            fail: 0,
        }
    }

    fn observe(&mut self, col: u32, count: u16, fail: u32) {
        if count < self.count || (count == self.count && fail > self.fail) {
            *self = Self { count, col, fail };
        }
    }
}

struct CoverState {
    row_count: Vec<u8>,
    col_count: Vec<u16>,
    col_fail: Vec<u32>,
    col_choice: Vec<u32>,
    forward_steps: u64,
    backtrack_steps: u64,
}

impl CoverState {
    fn new(matrix: &CoverMatrix) -> Self {
        Self {
            row_count: vec![0; matrix.height()],
            col_count: vec![0; matrix.width()],
            col_fail: vec![0; matrix.width()],
            col_choice: vec![0; matrix.width()],
            forward_steps: 0,
            backtrack_steps: 0,
        }
    }

    fn reset(&mut self, matrix: &CoverMatrix) {
        self.row_count.fill(0);
        self.col_count.fill(matrix.side() as u16);
        self.col_fail.fill(0);
        self.col_choice.fill(0);
        self.forward_steps = 0;
        self.backtrack_steps = 0;
    }

    /// Commit `choice`: tag its four columns owned, then block every choice
    /// competing for them. `observe` sees each `col_count` decrement, which
    /// is how forward commits maintain the running minimum without a second
    /// pass.
    fn commit_with<F: FnMut(u32, u16, u32)>(
        &mut self,
        matrix: &CoverMatrix,
        choice: usize,
        mut observe: F,
    ) {
        self.forward_steps += 1;
        let owned = matrix.columns_of(choice);
        for &col in &owned {
            self.col_count[col] ^= OWNED;
        }
        for &col in &owned {
            for &other in matrix.choices_of(col) {
                let other = other as usize;
                self.row_count[other] += 1;
                if self.row_count[other] != 1 {
                    continue;
                }
                for &blocked in &matrix.columns_of(other) {
                    self.col_count[blocked] -= 1;
                    observe(blocked as u32, self.col_count[blocked], self.col_fail[blocked]);
                }
            }
        }
    }

    fn commit(&mut self, matrix: &CoverMatrix, choice: usize) {
        self.commit_with(matrix, choice, |_, _, _| {});
    }

    /// Exact inverse of [`CoverState::commit_with`].
    fn uncommit(&mut self, matrix: &CoverMatrix, choice: usize) {
        self.backtrack_steps += 1;
        let owned = matrix.columns_of(choice);
        for &col in &owned {
            self.col_count[col] ^= OWNED;
        }
        for &col in &owned {
            for &other in matrix.choices_of(col) {
                let other = other as usize;
                debug_assert!(self.row_count[other] > 0);
                self.row_count[other] -= 1;
                if self.row_count[other] != 0 {
                    continue;
                }
                for &freed in &matrix.columns_of(other) {
                    self.col_count[freed] += 1;
                }
            }
        }
    }
}

/// Reusable solver for boards of one box size.
///
/// The cover matrix is built once in [`Solver::new`]; all per-solve state is
/// reset at the start of each [`Solver::solve`] call, so one solver can
/// serve any number of boards without reallocating.
pub struct Solver {
    n: u8,
    matrix: CoverMatrix,
    state: CoverState,
    sol_col: Vec<u32>,
    sol_row: Vec<u32>,
    scratch: Vec<u8>,
    hints: usize,
    vars: usize,
}

impl Solver {
    pub fn new(n: u8) -> Result<Self, SolveError> {
        if !(MIN_BOX_SIZE..=MAX_BOX_SIZE).contains(&n) {
            return Err(BoardError::UnsupportedBoxSize(n).into());
        }
        let matrix = CoverMatrix::new(n as usize);
        let state = CoverState::new(&matrix);
        let cells = matrix.cells();
        Ok(Self {
            n,
            matrix,
            state,
            sol_col: vec![UNDEF; cells],
            sol_row: vec![UNDEF; cells],
            scratch: vec![0; cells],
            hints: 0,
            vars: 0,
        })
    }

    pub fn box_size(&self) -> u8 {
        self.n
    }

    /// Counters from the most recent solve.
    pub fn stats(&self) -> SolveStats {
        SolveStats {
            forward_steps: self.state.forward_steps,
            backtrack_steps: self.state.backtrack_steps,
        }
    }

    /// Solve `board` in place.
    ///
    /// On [`Resolution::Complete`] the board is rewritten with its unique
    /// completion; on [`Resolution::Multiple`] with the first completion
    /// found (non-canonical); on [`Resolution::Invalid`] it is untouched.
    pub fn solve(&mut self, board: &mut Board) -> Result<Resolution, SolveError> {
        if board.box_size() != self.n {
            return Err(SolveError::BoxSizeMismatch {
                solver: self.n,
                board: board.box_size(),
            });
        }
        if board.first_conflict().is_some() {
            trace!(n = self.n, "solve.rejected_conflicting_givens");
            return Ok(Resolution::Invalid);
        }

        self.seed_givens(board);
        let outcome = self.search();
        if outcome != Resolution::Invalid {
            for cell in 0..self.matrix.cells() {
                board.set(cell, self.scratch[cell]);
            }
        }
        trace!(
            n = self.n,
            outcome = ?outcome,
            forward = self.state.forward_steps,
            backtrack = self.state.backtrack_steps,
            "solve.done"
        );
        Ok(outcome)
    }

    /// Reset cover state and commit one choice per given.
    fn seed_givens(&mut self, board: &Board) {
        self.state.reset(&self.matrix);
        self.hints = 0;
        for cell in 0..self.matrix.cells() {
            let symbol = board.get(cell);
            if symbol != 0 {
                let choice = self.matrix.choice_id(cell, symbol as usize - 1);
                self.state.commit(&self.matrix, choice);
                self.hints += 1;
            }
            self.sol_col[cell] = UNDEF;
            self.sol_row[cell] = UNDEF;
            self.scratch[cell] = symbol;
        }
        self.vars = self.matrix.cells() - self.hints;
    }

    /// Enumerate completions of the seeded state, stopping at the second.
    ///
    /// The first completion is decoded into `scratch`; the return value
    /// distinguishes none / exactly one / more than one.
    fn search(&mut self) -> Resolution {
        let side = self.matrix.side();
        let vars = self.vars as i64;
        let mut outcome = Resolution::Invalid;
        let mut action = Action::Forward;
        let mut min = MinColumn::undefined(side);
        let mut depth: i64 = 0;

        loop {
            while depth >= 0 && depth < vars {
                let d = depth as usize;

                if action == Action::Forward {
                    // Reuse the minimum observed during the previous commit
                    // when it is already forced (1) or dead (0); otherwise
                    // rescan, tie-breaking on the larger failure weight.
                    self.sol_col[d] = min.col;
                    if min.count > 1 {
                        for col in 0..self.matrix.width() {
                            let count = self.state.col_count[col];
                            let fail = self.state.col_fail[col];
                            if count < min.count || (count == min.count && fail > min.fail) {
                                min = MinColumn {
                                    count,
                                    col: col as u32,
                                    fail,
                                };
                                self.sol_col[d] = col as u32;
                                if count < 2 {
                                    break;
                                }
                            }
                        }
                    }
                }

                let col = self.sol_col[d] as usize;
                let tried = self.sol_row[d];

                if action == Action::Backtrack && tried != UNDEF {
                    self.state.col_fail[col] = self.state.col_choice[col];
                    let choice = self.matrix.choice_in(col, tried as usize);
                    self.state.uncommit(&self.matrix, choice);
                }

                // Advance to the next live choice within the column.
                let mut k = match tried {
                    UNDEF => 0,
                    t => t as usize + 1,
                };
                while k < side && self.state.row_count[self.matrix.choice_in(col, k)] != 0 {
                    k += 1;
                }

                if k < side {
                    action = Action::Forward;
                    // Forward weight: grows with column narrowness and with
                    // remaining depth, so late forced progress is remembered.
                    let quot = side / self.state.col_count[col] as usize;
                    let delta = quot * quot * (vars - depth) as usize / self.matrix.width() + 1;
                    self.state.col_choice[col] += delta as u32;

                    let choice = self.matrix.choice_in(col, k);
                    let mut next_min = MinColumn::undefined(side);
                    self.state.commit_with(&self.matrix, choice, |col, count, fail| {
                        next_min.observe(col, count, fail);
                    });
                    min = next_min;
                    self.sol_row[d] = k as u32;
                    depth += 1;
                } else {
                    // Column exhausted: record a failure weight that is
                    // larger for dead ends closer to the leaves.
                    action = Action::Backtrack;
                    self.state.col_fail[col] = self.state.col_choice[col] + depth as u32;
                    self.sol_row[d] = UNDEF;
                    depth -= 1;
                }
            }

            if depth < 0 {
                break;
            }

            // depth == vars: a full assignment.
            match outcome {
                Resolution::Invalid => {
                    outcome = Resolution::Complete;
                    for d in 0..self.vars {
                        let choice = self
                            .matrix
                            .choice_in(self.sol_col[d] as usize, self.sol_row[d] as usize);
                        let (cell, symbol) = self.matrix.decode(choice);
                        self.scratch[cell] = symbol;
                    }
                }
                Resolution::Complete => {
                    outcome = Resolution::Multiple;
                    break;
                }
                Resolution::Multiple => unreachable!("search stops at the second completion"),
            }
            depth -= 1;
            action = Action::Backtrack;
        }

        outcome
    }
}
