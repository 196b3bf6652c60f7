use crate::game::{winner, Board, Mark};

/// 升序扫描空位，返回第一个能让 `mark` 立即连成三子的格子。
pub fn immediate_win(board: &Board, mark: Mark) -> Option<usize> {
    board.empty_cells().into_iter().find(|&index| {
        winner(&board.with_mark(index, mark)).map(|result| result.mark) == Some(mark)
    })
}

/// 一步战术：先找自己的必胜点，再找需要封堵的对手必胜点。
pub fn find_immediate_tactic(board: &Board, mover: Mark) -> Option<usize> {
    immediate_win(board, mover).or_else(|| immediate_win(board, mover.opponent()))
}

/// 落子后对手下一手无法立即获胜。
pub fn is_safe_move(board: &Board, index: usize, mover: Mark) -> bool {
    immediate_win(&board.with_mark(index, mover), mover.opponent()).is_none()
}

pub fn safe_moves(board: &Board, mover: Mark) -> Vec<usize> {
    board
        .empty_cells()
        .into_iter()
        .filter(|&index| is_safe_move(board, index, mover))
        .collect()
}
