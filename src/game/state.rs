use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 棋盘格子数量（3×3，按行优先编号 0..8）。
pub const CELL_COUNT: usize = 9;
pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// 棋子标记：`X` 为人类玩家，`O` 为 CPU。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mark {
    #[serde(rename = "X")]
    Human,
    #[serde(rename = "O")]
    Cpu,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::Human => Mark::Cpu,
            Mark::Cpu => Mark::Human,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Mark::Human => 'X',
            Mark::Cpu => 'O',
        }
    }
}

/// 单个格子：`None` 表示空位。
pub type Cell = Option<Mark>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum BoardError {
    InvalidLength { length: usize },
    InvalidCell { index: usize, symbol: char },
    CellOutOfRange { index: usize },
    CellOccupied { index: usize },
    MarkImbalance { human: usize, cpu: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::InvalidLength { length } => {
                write!(f, "board must have {CELL_COUNT} cells, got {length}")
            }
            BoardError::InvalidCell { index, symbol } => {
                write!(f, "unrecognised cell symbol {symbol:?} at index {index}")
            }
            BoardError::CellOutOfRange { index } => write!(f, "cell index {index} is out of range"),
            BoardError::CellOccupied { index } => write!(f, "cell {index} is already occupied"),
            BoardError::MarkImbalance { human, cpu } => {
                write!(f, "mark counts differ by more than one (X={human}, O={cpu})")
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// 3×3 棋盘快照。值类型，引擎只借用，不会修改调用方持有的棋盘。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    /// 所有空位的下标，升序。
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT)
            .filter(|&index| self.cells[index].is_none())
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|cell| **cell == Some(mark)).count()
    }

    /// 返回在 `index` 处落子后的新棋盘，原棋盘保持不变。
    pub fn with_mark(&self, index: usize, mark: Mark) -> Board {
        let mut next = *self;
        next.cells[index] = Some(mark);
        next
    }

    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), BoardError> {
        match self.cells.get(index) {
            None => Err(BoardError::CellOutOfRange { index }),
            Some(Some(_)) => Err(BoardError::CellOccupied { index }),
            Some(None) => {
                self.cells[index] = Some(mark);
                Ok(())
            }
        }
    }

    /// 轮流落子时双方棋子数之差不超过一。
    pub fn integrity_check(&self) -> Result<(), BoardError> {
        let human = self.count(Mark::Human);
        let cpu = self.count(Mark::Cpu);
        if human.abs_diff(cpu) > 1 {
            return Err(BoardError::MarkImbalance { human, cpu });
        }
        Ok(())
    }
}

impl Index<usize> for Board {
    type Output = Cell;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cells[index]
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s.chars().filter(|c| *c != '/' && *c != '\n').collect();
        if symbols.len() != CELL_COUNT {
            return Err(BoardError::InvalidLength {
                length: symbols.len(),
            });
        }

        let mut cells = [None; CELL_COUNT];
        for (index, symbol) in symbols.into_iter().enumerate() {
            cells[index] = match symbol.to_ascii_uppercase() {
                'X' => Some(Mark::Human),
                'O' => Some(Mark::Cpu),
                '.' | '_' | '-' | ' ' => None,
                _ => return Err(BoardError::InvalidCell { index, symbol }),
            };
        }
        Ok(Board { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                f.write_str("/")?;
            }
            for cell in chunk {
                let symbol = cell.map(Mark::symbol).unwrap_or('.');
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}
