use serde::{Deserialize, Serialize};

use super::state::{Board, Mark};

/// 八条获胜线，按 行0..2、列0..2、主对角线、副对角线 的固定顺序排列。
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinResult {
    #[serde(rename = "player")]
    pub mark: Mark,
    pub line: [usize; 3],
}

/// 终局判定结果，`winner` 与 `is_draw` 不会同时成立。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TerminalState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<WinResult>,
    pub is_draw: bool,
}

impl TerminalState {
    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }
}

/// 返回第一条三子相同且非空的线；多线同时成立时以枚举顺序为准。
pub fn winner(board: &Board) -> Option<WinResult> {
    WINNING_LINES.iter().find_map(|&line| {
        let [a, b, c] = line;
        match board[a] {
            Some(mark) if board[b] == Some(mark) && board[c] == Some(mark) => {
                Some(WinResult { mark, line })
            }
            _ => None,
        }
    })
}

pub fn is_draw(board: &Board) -> bool {
    board.is_full() && winner(board).is_none()
}

pub fn evaluate_terminal(board: &Board) -> TerminalState {
    let winner = winner(board);
    TerminalState {
        winner,
        is_draw: winner.is_none() && board.is_full(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> Board {
        text.parse().expect("board should parse")
    }

    #[test]
    fn detects_row_column_and_diagonal_wins() {
        let row = winner(&board("OOO/XX./X..")).expect("row win");
        assert_eq!(row.mark, Mark::Cpu);
        assert_eq!(row.line, [0, 1, 2]);

        let column = winner(&board("XO./XO./.O.")).expect("column win");
        assert_eq!(column.mark, Mark::Cpu);
        assert_eq!(column.line, [1, 4, 7]);

        let anti = winner(&board("O.X/OX./X..")).expect("diagonal win");
        assert_eq!(anti.mark, Mark::Human);
        assert_eq!(anti.line, [2, 4, 6]);
    }

    #[test]
    fn multiple_lines_report_first_in_enumeration_order() {
        // Impossible under legal play; only the tie-break is under test.
        let result = winner(&board("XXX/OOO/...")).expect("some line wins");
        assert_eq!(result.mark, Mark::Human);
        assert_eq!(result.line, [0, 1, 2]);
    }

    #[test]
    fn full_board_without_line_is_draw() {
        let drawn = board("XOX/XOO/OXX");
        assert!(is_draw(&drawn));
        let state = evaluate_terminal(&drawn);
        assert!(state.is_draw);
        assert!(state.winner.is_none());
        assert!(state.is_over());
    }

    #[test]
    fn full_board_with_line_is_not_draw() {
        let won = board("XXX/OOX/XOO");
        assert!(!is_draw(&won));
        let state = evaluate_terminal(&won);
        assert!(!state.is_draw);
        assert_eq!(state.winner.map(|w| w.mark), Some(Mark::Human));
    }

    #[test]
    fn open_board_is_not_terminal() {
        let state = evaluate_terminal(&board("X../.O./..."));
        assert!(!state.is_over());
    }

    #[test]
    fn evaluate_terminal_is_idempotent() {
        let b = board("XOX/.O./.X.");
        assert_eq!(evaluate_terminal(&b), evaluate_terminal(&b));
    }

    #[test]
    fn terminal_state_serializes_like_front_end_expects() {
        let state = evaluate_terminal(&board("OOO/XX./X.."));
        let json = serde_json::to_value(state).expect("state should serialize");
        assert_eq!(json["winner"]["player"], "O");
        assert_eq!(json["winner"]["line"], serde_json::json!([0, 1, 2]));
        assert_eq!(json["isDraw"], false);
    }
}
