//! Cross-crate properties: isomorphisms must commute with solving.

use proptest::prelude::*;
use sudoku_core::Board;
use sudoku_gen::seed::rng_from_u64;
use sudoku_gen::{GenerateConfig, Isomorphism, generate};
use sudoku_solver::{Resolution, Solver};

fn cyclic_board(n: u8) -> Board {
    let n_usize = n as usize;
    let side = n_usize * n_usize;
    let mut cells = vec![0u8; side * side];
    for r in 0..side {
        for c in 0..side {
            cells[r * side + c] = ((r * n_usize + r / n_usize + c) % side + 1) as u8;
        }
    }
    Board::from_cells(n, cells).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn isomorphs_of_unique_puzzles_stay_unique(seed in any::<u64>(), row in 0usize..9) {
        // Clearing one row of a full grid leaves a uniquely solvable puzzle.
        let solution = cyclic_board(3);
        let mut puzzle = solution.clone();
        for col in 0..puzzle.side() {
            puzzle.clear(puzzle.index_of(row, col));
        }

        let mut rng = rng_from_u64(seed);
        let iso = Isomorphism::sample(3, &mut rng);
        let mut shuffled = iso.apply(&puzzle);
        prop_assert_eq!(shuffled.hint_count(), puzzle.hint_count());

        let mut solver = Solver::new(3).unwrap();
        prop_assert_eq!(solver.solve(&mut shuffled).unwrap(), Resolution::Complete);

        // The shuffled board's solution, mapped back through the inverse,
        // is the original board's solution.
        prop_assert_eq!(iso.inverse().apply(&shuffled), solution);
    }

    #[test]
    fn generated_puzzles_survive_shuffling(gen_seed in any::<u64>(), iso_seed in any::<u64>()) {
        let g = generate(&GenerateConfig::new(2, gen_seed)).unwrap();

        let iso = Isomorphism::sample(2, &mut rng_from_u64(iso_seed));
        let mut shuffled = iso.apply(&g.board);

        let mut solver = Solver::new(2).unwrap();
        prop_assert_eq!(solver.solve(&mut shuffled).unwrap(), Resolution::Complete);
        prop_assert_eq!(iso.inverse().apply(&shuffled), g.solution);
    }
}
