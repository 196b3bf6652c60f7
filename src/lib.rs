pub mod ai;
pub mod game;
pub mod utils;

use std::fmt::Display;
use std::str::FromStr;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{
    choose_move, decide_move, find_best_move, find_immediate_tactic, tiers, AiAgent, AiDifficulty,
    DecisionMode, DifficultyTier, MoveDecision, TierError,
};
pub use game::{evaluate_terminal, is_draw, winner, Board, BoardError, Cell, Mark, TerminalState, WinResult};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

fn to_js_error<E: Serialize + Display>(error: E) -> JsValue {
    to_value(&error).unwrap_or_else(|_| JsValue::from_str(&error.to_string()))
}

fn serde_to_js_error<E: Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn board_from_js(board: JsValue) -> Result<Board, JsValue> {
    from_value(board).map_err(JsValue::from)
}

/// 未知或缺省的难度名回落到最低档。
fn resolve_tier(difficulty: Option<&str>) -> &'static DifficultyTier {
    difficulty
        .and_then(|value| AiDifficulty::from_str(value).ok())
        .unwrap_or_default()
        .tier()
}

fn make_agent(tier: DifficultyTier, seed: Option<u32>) -> AiAgent {
    match seed {
        Some(seed) => AiAgent::with_seed(tier, u64::from(seed)),
        None => AiAgent::new(tier),
    }
}

fn log_decision(decision: &MoveDecision) {
    crate::console_log!(
        "cpu [{}] {:?} -> {:?} ({} nodes)",
        decision.tier,
        decision.mode,
        decision.cell,
        decision.nodes
    );
}

/// 有状态的 CPU 对手，持有难度档位与随机源，供前端整局复用。
#[wasm_bindgen]
pub struct CpuOpponent {
    agent: AiAgent,
}

#[wasm_bindgen]
impl CpuOpponent {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: Option<String>, seed: Option<u32>) -> CpuOpponent {
        let tier = resolve_tier(difficulty.as_deref()).clone();
        CpuOpponent {
            agent: make_agent(tier, seed),
        }
    }

    pub fn with_tier_json(tier_json: &str, seed: Option<u32>) -> Result<CpuOpponent, JsValue> {
        let tier: DifficultyTier = serde_json::from_str(tier_json).map_err(serde_to_js_error)?;
        Ok(CpuOpponent {
            agent: make_agent(tier, seed),
        })
    }

    pub fn tier_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.agent.tier()).map_err(serde_to_js_error)
    }

    pub fn decide_json(&mut self, board_json: &str) -> Result<String, JsValue> {
        let board: Board = serde_json::from_str(board_json).map_err(serde_to_js_error)?;
        let decision = self.agent.decide(&board);
        log_decision(&decision);
        serde_json::to_string(&decision).map_err(serde_to_js_error)
    }

    pub fn decide(&mut self, board: JsValue) -> Result<JsValue, JsValue> {
        let board = board_from_js(board)?;
        let decision = self.agent.decide(&board);
        log_decision(&decision);
        to_value(&decision).map_err(JsValue::from)
    }

    pub fn think_delay_ms(&mut self) -> u32 {
        self.agent.think_delay_ms()
    }
}

/// 为 CPU 选一步棋，棋盘已满时返回 `undefined`。
#[wasm_bindgen(js_name = "decideMove")]
pub fn decide_move_js(
    board: JsValue,
    difficulty: Option<String>,
    seed: Option<u32>,
) -> Result<Option<u32>, JsValue> {
    let board = board_from_js(board)?;
    let mut agent = make_agent(resolve_tier(difficulty.as_deref()).clone(), seed);
    let decision = agent.decide(&board);
    log_decision(&decision);
    Ok(decision.cell.map(|cell| cell as u32))
}

/// 与 `decideMove` 相同，但返回完整的决策记录。
#[wasm_bindgen(js_name = "chooseMove")]
pub fn choose_move_js(
    board: JsValue,
    difficulty: Option<String>,
    seed: Option<u32>,
) -> Result<JsValue, JsValue> {
    let board = board_from_js(board)?;
    let mut agent = make_agent(resolve_tier(difficulty.as_deref()).clone(), seed);
    let decision = agent.decide(&board);
    log_decision(&decision);
    to_value(&decision).map_err(JsValue::from)
}

/// 使用调用方提供的自定义档位，档位在反序列化时校验。
#[wasm_bindgen(js_name = "chooseMoveWithTier")]
pub fn choose_move_with_tier(
    board: JsValue,
    tier: JsValue,
    seed: Option<u32>,
) -> Result<JsValue, JsValue> {
    let board = board_from_js(board)?;
    let tier: DifficultyTier = from_value(tier).map_err(JsValue::from)?;
    let mut agent = make_agent(tier, seed);
    let decision = agent.decide(&board);
    log_decision(&decision);
    to_value(&decision).map_err(JsValue::from)
}

/// 按档位的思考时长延迟后再给出决策，Promise 解析为决策 JSON。
#[wasm_bindgen(js_name = "thinkMove")]
pub fn think_move(board: JsValue, difficulty: Option<String>, seed: Option<u32>) -> Promise {
    let board = board_from_js(board);
    let tier = resolve_tier(difficulty.as_deref()).clone();

    future_to_promise(async move {
        let board = board?;
        let mut agent = make_agent(tier, seed);
        let delay = agent.think_delay_ms();
        if delay > 0 {
            TimeoutFuture::new(delay).await;
        }
        let decision = agent.decide(&board);
        log_decision(&decision);
        let json = serde_json::to_string(&decision).map_err(serde_to_js_error)?;
        Ok(JsValue::from_str(&json))
    })
}

#[wasm_bindgen(js_name = "evaluateTerminal")]
pub fn evaluate_terminal_js(board: JsValue) -> Result<JsValue, JsValue> {
    let board = board_from_js(board)?;
    to_value(&evaluate_terminal(&board)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "validateBoard")]
pub fn validate_board(board: JsValue) -> Result<(), JsValue> {
    let board = board_from_js(board)?;
    board.integrity_check().map_err(to_js_error)
}

#[wasm_bindgen(js_name = "validateTier")]
pub fn validate_tier(tier_json: &str) -> Result<(), JsValue> {
    let _: DifficultyTier = serde_json::from_str(tier_json).map_err(serde_to_js_error)?;
    Ok(())
}

#[wasm_bindgen(js_name = "listTiers")]
pub fn list_tiers() -> Result<JsValue, JsValue> {
    to_value(tiers()).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "parseDifficulty")]
pub fn parse_difficulty(name: &str) -> Result<JsValue, JsValue> {
    let difficulty = AiDifficulty::from_str(name).map_err(to_js_error)?;
    to_value(difficulty.tier()).map_err(JsValue::from)
}
