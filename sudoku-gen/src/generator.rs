//! Puzzle generation: seed a full solution, carve hints away while the
//! board stays uniquely solvable, then relabel.

use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;
use sudoku_core::Board;
use sudoku_solver::{Resolution, Solver};

use crate::GenError;
use crate::seed::rng_from_u64;

#[cfg(feature = "telemetry-tracing")]
use tracing::trace;

#[cfg(not(feature = "telemetry-tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

/// Fraction of cells kept by the hardest difficulty.
const MIN_HINT_FRACTION: f64 = 0.2;

/// Configuration for puzzle generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerateConfig {
    /// Box size (2 for 4x4 boards, 3 for 9x9, ...).
    pub n: u8,
    /// RNG seed for deterministic generation.
    pub seed: u64,
    /// Difficulty in `[0, 1]`: 0 keeps the full grid, 1 carves down to the
    /// minimum hint target.
    pub difficulty: f64,
    /// Wall-clock budget for the removal loop; `None` = unbounded.
    pub timeout: Option<Duration>,
    /// Retries for the random seed fill before giving up.
    pub max_seed_attempts: u32,
}

impl GenerateConfig {
    pub fn new(n: u8, seed: u64) -> Self {
        Self {
            n,
            seed,
            difficulty: 0.5,
            timeout: None,
            max_seed_attempts: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    /// The carved puzzle board.
    pub board: Board,
    /// Its unique solution (up to the point removal stopped).
    pub solution: Board,
    /// Filled cells remaining in `board`.
    pub hint_count: usize,
}

/// Generate a puzzle.
///
/// Returns early with a denser board when the timeout elapses or a full
/// removal pass stalls; the result is uniquely solvable in every case.
pub fn generate(config: &GenerateConfig) -> Result<GeneratedPuzzle, GenError> {
    let mut rng = rng_from_u64(config.seed);
    let mut solver = Solver::new(config.n)?;

    trace!(
        n = config.n,
        seed = config.seed,
        difficulty = config.difficulty,
        "gen.start"
    );

    // Seed: fill one box per stack, in shuffled distinct bands. Such a box
    // transversal shares no row, column, or box constraints, so the random
    // fills cannot collide; the solver extends them to a full grid. Tiny
    // boards can still produce fills with no completion, hence the retries.
    let mut attempts = 0;
    let mut solution = loop {
        if attempts >= config.max_seed_attempts {
            return Err(GenError::SeedAttemptsExhausted { attempts });
        }
        attempts += 1;

        let mut board = Board::empty(config.n)?;
        fill_box_transversal(&mut board, &mut rng);
        match solver.solve(&mut board)? {
            Resolution::Invalid => {
                trace!(attempts, "gen.seed_retry");
            }
            // The first completion is in the board either way.
            Resolution::Complete | Resolution::Multiple => break board,
        }
    };

    let cells = solution.cell_count();
    let target = target_hints(cells, config.difficulty);
    let deadline = config.timeout.map(|t| Instant::now() + t);

    let mut board = solution.clone();
    let mut hints = cells;
    let mut candidates: Vec<usize> = (0..cells).collect();

    'carve: while hints > target {
        candidates.shuffle(&mut rng);
        let hints_before = hints;

        let mut i = 0;
        while i < candidates.len() && hints > target {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                trace!(hints, "gen.timeout");
                break 'carve;
            }
            if try_clear(&mut solver, &mut board, candidates[i])? {
                hints -= 1;
                candidates.swap_remove(i);
            } else {
                i += 1;
            }
        }

        if hints == hints_before {
            trace!(hints, "gen.pass_stalled");
            break;
        }
        trace!(hints, target, "gen.pass");
    }

    relabel_symbols(&mut board, &mut solution, &mut rng);

    debug_assert_eq!(board.hint_count(), hints);
    trace!(hints, "gen.done");
    Ok(GeneratedPuzzle {
        board,
        solution,
        hint_count: hints,
    })
}

/// Fill one box per stack, each in a distinct band, with independent random
/// permutations of `1..=side`.
fn fill_box_transversal<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) {
    let n = board.box_size() as usize;
    let side = board.side();

    let mut bands: SmallVec<[u8; 4]> = (0..board.box_size()).collect();
    bands.shuffle(rng);

    let mut symbols: Vec<u8> = (1..=side as u8).collect();
    for (stack, &band) in bands.iter().enumerate() {
        symbols.shuffle(rng);
        for (j, &symbol) in symbols.iter().enumerate() {
            let row = band as usize * n + j / n;
            let col = stack * n + j % n;
            board.set(board.index_of(row, col), symbol);
        }
    }
}

/// Log-interpolated hint target between `0.2·cells` and `cells`.
fn target_hints(cells: usize, difficulty: f64) -> usize {
    let difficulty = difficulty.clamp(0.0, 1.0);
    if difficulty <= 0.01 {
        return cells;
    }
    let min_hints = (cells as f64 * MIN_HINT_FRACTION) as usize;
    let ratio = cells as f64 / min_hints as f64;
    (min_hints as f64 * ratio.powf(1.0 - difficulty)) as usize
}

/// Clear `cell` iff the board stays uniquely solvable without it.
fn try_clear(solver: &mut Solver, board: &mut Board, cell: usize) -> Result<bool, GenError> {
    if board.get(cell) == 0 {
        return Ok(false);
    }
    let mut probe = board.clone();
    probe.clear(cell);
    match solver.solve(&mut probe)? {
        Resolution::Complete => {
            board.clear(cell);
            Ok(true)
        }
        Resolution::Multiple => Ok(false),
        Resolution::Invalid => {
            debug_assert!(false, "removing a hint cannot make the board invalid");
            Ok(false)
        }
    }
}

/// Relabel both boards with one shared random symbol permutation, keeping
/// the solution aligned with the puzzle.
fn relabel_symbols<R: Rng + ?Sized>(puzzle: &mut Board, solution: &mut Board, rng: &mut R) {
    let side = puzzle.side();
    let mut map = vec![0u8; side + 1];
    let mut symbols: Vec<u8> = (1..=side as u8).collect();
    symbols.shuffle(rng);
    map[1..].copy_from_slice(&symbols);

    for board in [puzzle, solution] {
        for cell in 0..board.cell_count() {
            let symbol = board.get(cell);
            if symbol != 0 {
                board.set(cell, map[symbol as usize]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_puzzles_are_uniquely_solvable() {
        let config = GenerateConfig::new(3, 1);
        let g = generate(&config).unwrap();

        let cells = g.board.cell_count();
        assert_eq!(g.hint_count, g.board.hint_count());
        assert!(g.hint_count >= cells / 5);
        assert!(g.hint_count <= cells);

        let mut solved = g.board.clone();
        let mut solver = Solver::new(3).unwrap();
        assert_eq!(solver.solve(&mut solved).unwrap(), Resolution::Complete);
        assert_eq!(solved, g.solution);
    }

    #[test]
    fn puzzle_hints_agree_with_solution() {
        let g = generate(&GenerateConfig::new(2, 9)).unwrap();
        assert_eq!(g.solution.first_conflict(), None);
        assert!(g.solution.is_filled());
        for cell in 0..g.board.cell_count() {
            if g.board.get(cell) != 0 {
                assert_eq!(g.board.get(cell), g.solution.get(cell));
            }
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let config = GenerateConfig::new(3, 31337);
        assert_eq!(generate(&config).unwrap(), generate(&config).unwrap());
    }

    #[test]
    fn different_seeds_give_different_puzzles() {
        let a = generate(&GenerateConfig::new(3, 1)).unwrap();
        let b = generate(&GenerateConfig::new(3, 2)).unwrap();
        assert_ne!(a.board, b.board);
    }

    #[test]
    fn zero_difficulty_keeps_the_full_grid() {
        let config = GenerateConfig {
            difficulty: 0.0,
            ..GenerateConfig::new(3, 5)
        };
        let g = generate(&config).unwrap();
        assert_eq!(g.hint_count, g.board.cell_count());
        assert_eq!(g.board, g.solution);
        assert_eq!(g.board.first_conflict(), None);
    }

    #[test]
    fn full_difficulty_carves_towards_the_minimum() {
        let config = GenerateConfig {
            difficulty: 1.0,
            ..GenerateConfig::new(2, 12)
        };
        let g = generate(&config).unwrap();
        // 4x4 boards bottom out well above the 20% floor; the target only
        // bounds the carving loop from below.
        assert!(g.hint_count < g.board.cell_count());
    }

    #[test]
    fn elapsed_timeout_returns_the_uncarved_grid() {
        let config = GenerateConfig {
            timeout: Some(Duration::ZERO),
            ..GenerateConfig::new(3, 8)
        };
        let g = generate(&config).unwrap();
        assert_eq!(g.hint_count, g.board.cell_count());
        assert_eq!(g.board, g.solution);
    }

    #[test]
    fn target_hint_interpolation_is_monotone() {
        let cells = 81;
        assert_eq!(target_hints(cells, 0.0), cells);
        assert_eq!(target_hints(cells, -3.0), cells);
        let mid = target_hints(cells, 0.5);
        let hard = target_hints(cells, 1.0);
        assert!(hard <= mid && mid <= cells);
        assert_eq!(hard, cells / 5);
        assert_eq!(target_hints(cells, 2.0), cells / 5);
    }
}
