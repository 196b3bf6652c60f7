use serde::{Deserialize, Serialize};

use crate::game::{winner, Board, Mark, CENTER, CORNERS};

use super::tactics::find_immediate_tactic;

const WIN_SCORE: f64 = 100.0;
const POSITIONAL_TIE_BREAK: f64 = 0.01;

/// 位置权重：中心 3，角 2，边 1。
pub fn positional_weight(index: usize) -> u8 {
    if index == CENTER {
        3
    } else if CORNERS.contains(&index) {
        2
    } else {
        1
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub depth_reached: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub best_move: Option<usize>,
    /// 根节点的最佳评分；走了战术捷径或无空位时为 `None`。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub stats: SearchStats,
}

/// CPU (`O`) 为极大方，人类 (`X`) 为极小方。
///
/// 终局评分：CPU 在深度 d 获胜得 `100 - d`，人类获胜得 `d - 100`，
/// 平局或到达深度上限得 0。极大方的每个分支额外加上 `位置权重 × 0.01`，
/// 极小方不加。
pub fn minimax(
    board: &Board,
    depth: u8,
    maximizing: bool,
    alpha: f64,
    beta: f64,
    depth_limit: u8,
) -> f64 {
    let mut stats = SearchStats::default();
    minimax_rec(board, depth, maximizing, alpha, beta, depth_limit, &mut stats)
}

fn minimax_rec(
    board: &Board,
    depth: u8,
    maximizing: bool,
    mut alpha: f64,
    mut beta: f64,
    depth_limit: u8,
    stats: &mut SearchStats,
) -> f64 {
    stats.nodes += 1;
    if depth > stats.depth_reached {
        stats.depth_reached = depth;
    }

    if let Some(result) = winner(board) {
        return match result.mark {
            Mark::Cpu => WIN_SCORE - f64::from(depth),
            Mark::Human => f64::from(depth) - WIN_SCORE,
        };
    }
    if board.is_full() || depth >= depth_limit {
        return 0.0;
    }

    if maximizing {
        let mut value = f64::NEG_INFINITY;
        for index in board.empty_cells() {
            let child = board.with_mark(index, Mark::Cpu);
            let score = minimax_rec(&child, depth + 1, false, alpha, beta, depth_limit, stats);
            let tie_break = f64::from(positional_weight(index)) * POSITIONAL_TIE_BREAK;
            value = value.max(score + tie_break);
            alpha = alpha.max(value);
            if beta <= alpha {
                break;
            }
        }
        value
    } else {
        let mut value = f64::INFINITY;
        for index in board.empty_cells() {
            let child = board.with_mark(index, Mark::Human);
            let score = minimax_rec(&child, depth + 1, true, alpha, beta, depth_limit, stats);
            value = value.min(score);
            beta = beta.min(value);
            if beta <= alpha {
                break;
            }
        }
        value
    }
}

/// 为 CPU 选择最佳落子。先走一步战术捷径，否则对每个空位做完整搜索。
///
/// 根节点本身是极大方节点，同样计入位置加分；同分时取位置权重更高者，
/// 权重相同保留先出现的。
pub fn search_best_move(board: &Board, depth_limit: u8) -> SearchOutcome {
    let mut stats = SearchStats::default();
    let empty = board.empty_cells();
    let Some(&first) = empty.first() else {
        return SearchOutcome {
            best_move: None,
            score: None,
            stats,
        };
    };

    if let Some(tactic) = find_immediate_tactic(board, Mark::Cpu) {
        return SearchOutcome {
            best_move: Some(tactic),
            score: None,
            stats,
        };
    }

    let mut best_score = f64::NEG_INFINITY;
    let mut best_move = first;

    for index in empty {
        let child = board.with_mark(index, Mark::Cpu);
        let score = minimax_rec(
            &child,
            0,
            false,
            f64::NEG_INFINITY,
            f64::INFINITY,
            depth_limit,
            &mut stats,
        ) + f64::from(positional_weight(index)) * POSITIONAL_TIE_BREAK;

        if score > best_score {
            best_score = score;
            best_move = index;
        } else if score == best_score && positional_weight(index) > positional_weight(best_move) {
            best_move = index;
        }
    }

    SearchOutcome {
        best_move: Some(best_move),
        score: Some(best_score),
        stats,
    }
}

pub fn find_best_move(board: &Board, depth_limit: u8) -> Option<usize> {
    search_best_move(board, depth_limit).best_move
}
