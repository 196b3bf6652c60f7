//! CPU 对手：一步战术扫描、带 alpha-beta 剪枝的极小极大搜索与难度档位。

pub mod agent;
pub mod difficulty;
pub mod minimax;
pub mod tactics;

pub use agent::{choose_move, decide_move, AiAgent, DecisionMode, MoveDecision};
pub use difficulty::{tiers, AiDifficulty, DifficultyTier, TierError};
pub use minimax::{find_best_move, minimax, positional_weight, search_best_move, SearchOutcome, SearchStats};
pub use tactics::{find_immediate_tactic, immediate_win, safe_moves};
