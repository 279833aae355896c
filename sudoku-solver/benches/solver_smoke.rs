//! Benchmark suite for sudoku-solver.
//!
//! Covers full-board verification (pure seeding cost) and re-solves of
//! boards with increasing numbers of cleared rows, for box sizes 2-4.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sudoku_core::Board;
use sudoku_solver::Solver;

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

fn bench_full_boards(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_full");
    for n in [2u8, 3, 4] {
        let board = cyclic_board(n);
        let mut solver = Solver::new(n).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &board, |b, board| {
            b.iter(|| {
                let mut work = board.clone();
                solver.solve(black_box(&mut work)).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_cleared_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_cleared_rows");
    let solution = cyclic_board(3);
    for rows in [1usize, 3, 6] {
        let mut board = solution.clone();
        for r in 0..rows {
            for col in 0..board.side() {
                board.clear(board.index_of(r, col));
            }
        }
        let mut solver = Solver::new(3).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &board, |b, board| {
            b.iter(|| {
                let mut work = board.clone();
                solver.solve(black_box(&mut work)).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_boards, bench_cleared_rows);
criterion_main!(benches);
