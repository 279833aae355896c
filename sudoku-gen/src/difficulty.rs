//! Difficulty estimation by sampling isomorphic shuffles.
//!
//! A puzzle's search effort depends on incidental cell ordering, so a
//! single solve is a noisy signal. Solving several isomorphs instead and
//! aggregating the solver counters gives a rating that is stable under
//! relabeling and band/stack shuffles of the same underlying puzzle.

use sudoku_core::Board;
use sudoku_solver::{Resolution, Solver};

use crate::GenError;
use crate::isomorph::Isomorphism;
use crate::seed::rng_from_u64;

#[cfg(feature = "telemetry-tracing")]
use tracing::trace;

#[cfg(not(feature = "telemetry-tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

/// Per-sample RNG streams are derived from the base seed by multiplying the
/// sample index with this constant; any odd constant works.
const SAMPLE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSummary {
    pub min: u64,
    pub max: u64,
    /// Floor of the mean over all samples.
    pub mean: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyReport {
    /// Number of isomorphs solved.
    pub samples: u32,
    pub forward: CounterSummary,
    pub backtrack: CounterSummary,
}

/// Coarse difficulty buckets over the mean backtrack count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DifficultyTier {
    Easy,
    Normal,
    Hard,
    Extreme,
    Unreasonable,
}

/// Solve `samples` isomorphic shuffles of `board` and aggregate the solver
/// counters.
///
/// Fails on the first shuffle that is not uniquely solvable: the property
/// is isomorphism-invariant, so one bad sample condemns the puzzle itself.
pub fn estimate_difficulty(
    board: &Board,
    samples: u32,
    seed: u64,
) -> Result<DifficultyReport, GenError> {
    if samples == 0 {
        return Err(GenError::NoSamples);
    }

    let mut solver = Solver::new(board.box_size())?;
    let mut forward = Accumulator::default();
    let mut backtrack = Accumulator::default();

    for sample in 0..samples {
        let stream = seed ^ u64::from(sample).wrapping_mul(SAMPLE_STREAM);
        let mut rng = rng_from_u64(stream);
        let mut shuffled = Isomorphism::sample(board.box_size(), &mut rng).apply(board);

        match solver.solve(&mut shuffled)? {
            Resolution::Complete => {
                let stats = solver.stats();
                trace!(
                    sample,
                    forward = stats.forward_steps,
                    backtrack = stats.backtrack_steps,
                    "difficulty.sample"
                );
                forward.record(stats.forward_steps);
                backtrack.record(stats.backtrack_steps);
            }
            Resolution::Invalid => return Err(GenError::PuzzleInvalid),
            Resolution::Multiple => return Err(GenError::PuzzleNotUnique),
        }
    }

    Ok(DifficultyReport {
        samples,
        forward: forward.summarize(samples),
        backtrack: backtrack.summarize(samples),
    })
}

/// Bucket a report by its mean backtrack count.
pub fn classify_difficulty(report: &DifficultyReport) -> DifficultyTier {
    match report.backtrack.mean {
        0..=10 => DifficultyTier::Easy,
        11..=100 => DifficultyTier::Normal,
        101..=1_000 => DifficultyTier::Hard,
        1_001..=10_000 => DifficultyTier::Extreme,
        _ => DifficultyTier::Unreasonable,
    }
}

#[derive(Debug)]
struct Accumulator {
    min: u64,
    max: u64,
    sum: u64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            min: u64::MAX,
            max: 0,
            sum: 0,
        }
    }
}

impl Accumulator {
    fn record(&mut self, value: u64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
    }

    fn summarize(&self, samples: u32) -> CounterSummary {
        CounterSummary {
            min: self.min,
            max: self.max,
            mean: self.sum / u64::from(samples),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_2x2() -> Board {
        Board::from_cells(2, vec![1, 2, 3, 4, 3, 4, 1, 2, 2, 1, 4, 3, 4, 3, 2, 1]).unwrap()
    }

    #[test]
    fn full_board_rates_with_zero_backtracks() {
        let report = estimate_difficulty(&full_2x2(), 5, 77).unwrap();
        assert_eq!(report.samples, 5);
        assert_eq!(
            report.backtrack,
            CounterSummary {
                min: 0,
                max: 0,
                mean: 0,
            }
        );
        // Seeding commits all sixteen givens in every sample.
        assert_eq!(report.forward.min, 16);
        assert_eq!(report.forward.max, 16);
        assert_eq!(classify_difficulty(&report), DifficultyTier::Easy);
    }

    #[test]
    fn ambiguous_board_is_rejected() {
        let mut board = full_2x2();
        for cell in [0, 2, 4, 6] {
            board.clear(cell);
        }
        assert!(matches!(
            estimate_difficulty(&board, 3, 1),
            Err(GenError::PuzzleNotUnique)
        ));
    }

    #[test]
    fn conflicting_board_is_rejected() {
        let mut board = Board::empty(2).unwrap();
        board.set(0, 1);
        board.set(1, 1);
        assert!(matches!(
            estimate_difficulty(&board, 3, 1),
            Err(GenError::PuzzleInvalid)
        ));
    }

    #[test]
    fn zero_samples_is_an_error() {
        assert!(matches!(
            estimate_difficulty(&full_2x2(), 0, 1),
            Err(GenError::NoSamples)
        ));
    }

    #[test]
    fn reports_are_deterministic_per_seed() {
        let board = full_2x2();
        let a = estimate_difficulty(&board, 4, 5).unwrap();
        let b = estimate_difficulty(&board, 4, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tiers_order_by_effort() {
        let report = |mean| DifficultyReport {
            samples: 1,
            forward: CounterSummary { min: 0, max: 0, mean: 0 },
            backtrack: CounterSummary { min: 0, max: 0, mean },
        };
        assert_eq!(classify_difficulty(&report(0)), DifficultyTier::Easy);
        assert_eq!(classify_difficulty(&report(50)), DifficultyTier::Normal);
        assert_eq!(classify_difficulty(&report(500)), DifficultyTier::Hard);
        assert_eq!(classify_difficulty(&report(5_000)), DifficultyTier::Extreme);
        assert_eq!(
            classify_difficulty(&report(50_000)),
            DifficultyTier::Unreasonable
        );
    }
}
