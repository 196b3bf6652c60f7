//! 棋盘模型与终局判定。

pub mod rules;
pub mod state;

pub use rules::{evaluate_terminal, is_draw, winner, TerminalState, WinResult, WINNING_LINES};
pub use state::{Board, BoardError, Cell, Mark, CELL_COUNT, CENTER, CORNERS};
