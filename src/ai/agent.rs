use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{Board, Mark, CENTER, CORNERS};

use super::difficulty::DifficultyTier;
use super::minimax::search_best_move;
use super::tactics::{find_immediate_tactic, immediate_win, safe_moves};

/// 本次落子走的是哪条决策分支。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecisionMode {
    /// 棋盘已满。
    None,
    Win,
    Mistake,
    Quick,
    Search,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveDecision {
    pub cell: Option<usize>,
    pub mode: DecisionMode,
    pub nodes: u64,
    pub tier: String,
}

impl MoveDecision {
    fn new(cell: Option<usize>, mode: DecisionMode, tier: &DifficultyTier) -> Self {
        Self {
            cell,
            mode,
            nodes: 0,
            tier: tier.name().to_string(),
        }
    }
}

/// 快速启发式：战术 → 中心 → 随机角 → 随机空位。
pub fn quick_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    if let Some(tactic) = find_immediate_tactic(board, Mark::Cpu) {
        return Some(tactic);
    }
    if board.is_empty_at(CENTER) {
        return Some(CENTER);
    }

    let corners: Vec<usize> = CORNERS
        .iter()
        .copied()
        .filter(|&index| board.is_empty_at(index))
        .collect();
    if let Some(&corner) = corners.choose(rng) {
        return Some(corner);
    }

    board.empty_cells().choose(rng).copied()
}

/// 失误模式：在不会让对手下一手立即获胜的空位中随机挑一个，没有则在全部空位中挑。
pub fn mistake_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    let safe = safe_moves(board, Mark::Cpu);
    let pool = if safe.is_empty() {
        board.empty_cells()
    } else {
        safe
    };
    pool.choose(rng).copied()
}

/// 按难度档位为 CPU 选择一步棋。随机源由调用方注入，相同种子得到相同结果。
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    tier: &DifficultyTier,
    rng: &mut R,
) -> MoveDecision {
    if board.is_full() {
        return MoveDecision::new(None, DecisionMode::None, tier);
    }

    if let Some(win) = immediate_win(board, Mark::Cpu) {
        return MoveDecision::new(Some(win), DecisionMode::Win, tier);
    }

    if rng.gen::<f64>() < tier.error_probability() {
        return MoveDecision::new(mistake_move(board, rng), DecisionMode::Mistake, tier);
    }

    if rng.gen::<f64>() >= tier.skill_probability() {
        return MoveDecision::new(quick_move(board, rng), DecisionMode::Quick, tier);
    }

    let outcome = search_best_move(board, tier.search_depth_limit());
    MoveDecision {
        nodes: outcome.stats.nodes,
        ..MoveDecision::new(outcome.best_move, DecisionMode::Search, tier)
    }
}

pub fn decide_move<R: Rng + ?Sized>(
    board: &Board,
    tier: &DifficultyTier,
    rng: &mut R,
) -> Option<usize> {
    choose_move(board, tier, rng).cell
}

/// 绑定一个难度档位与独立随机源的 CPU 对手。
pub struct AiAgent {
    tier: DifficultyTier,
    rng: SmallRng,
}

impl AiAgent {
    pub fn new(tier: DifficultyTier) -> Self {
        Self {
            tier,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(tier: DifficultyTier, seed: u64) -> Self {
        Self {
            tier,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn tier(&self) -> &DifficultyTier {
        &self.tier
    }

    pub fn decide(&mut self, board: &Board) -> MoveDecision {
        choose_move(board, &self.tier, &mut self.rng)
    }

    pub fn decide_move(&mut self, board: &Board) -> Option<usize> {
        self.decide(board).cell
    }

    pub fn think_delay_ms(&mut self) -> u32 {
        self.tier.think_delay_ms(&mut self.rng)
    }
}
