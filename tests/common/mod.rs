//! Board generators shared by the simulation suites.

#![allow(dead_code)]

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

use tictactoe_cpu::{winner, Board, Mark};

/// Mark due to move under alternating play with X opening.
pub fn side_to_move(board: &Board) -> Mark {
    if board.count(Mark::Human) > board.count(Mark::Cpu) {
        Mark::Cpu
    } else {
        Mark::Human
    }
}

/// Plays up to `plies` random alternating moves from an empty board, stopping early on a win.
pub fn random_reachable_board(rng: &mut SmallRng, plies: usize) -> Board {
    let mut board = Board::new();
    for _ in 0..plies {
        if winner(&board).is_some() {
            break;
        }
        let Some(&cell) = board.empty_cells().choose(rng) else {
            break;
        };
        let mark = side_to_move(&board);
        board
            .place(cell, mark)
            .expect("chosen cell should be empty");
    }
    board
}

/// Reachable, still-open board with the CPU to move.
pub fn random_cpu_turn(rng: &mut SmallRng) -> Option<Board> {
    let plies = 2 * rng.gen_range(0..4) + 1;
    let board = random_reachable_board(rng, plies);
    let open = winner(&board).is_none() && !board.is_full();
    (open && side_to_move(&board) == Mark::Cpu).then_some(board)
}

/// Arbitrary cell assignment, including positions unreachable under legal play.
pub fn random_arbitrary_board(rng: &mut SmallRng) -> Board {
    let mut cells = [None; 9];
    for cell in cells.iter_mut() {
        *cell = match rng.gen_range(0..3) {
            0 => None,
            1 => Some(Mark::Human),
            _ => Some(Mark::Cpu),
        };
    }
    Board::from_cells(cells)
}

pub fn swap_marks(board: &Board) -> Board {
    let mut cells = *board.cells();
    for cell in cells.iter_mut() {
        *cell = cell.map(Mark::opponent);
    }
    Board::from_cells(cells)
}
