//! Browser bindings. Values cross the boundary as plain JS objects.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::ai::{Difficulty, MoveSelector};
use crate::error::EngineError;
use crate::game::GameSession;
use crate::puzzle::Puzzle;
use crate::types::Move;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn js_error(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// A solo game against one of the built-in AI difficulties.
#[wasm_bindgen]
pub struct WasmGame {
    session: GameSession,
    selector: Box<dyn MoveSelector>,
}

#[wasm_bindgen]
impl WasmGame {
    /// `difficulty` is one of the UI ids (`"greedy"`, `"minimax-3"`, ...).
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: &str) -> Result<WasmGame, JsValue> {
        let difficulty: Difficulty = difficulty.parse().map_err(js_error)?;
        Ok(Self {
            session: GameSession::new(),
            selector: difficulty.selector(None),
        })
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.to_game_state())
    }

    pub fn result(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.to_game_result())
    }

    pub fn valid_moves(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.valid_moves())
    }

    pub fn play(&mut self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        self.session.submit_at(row, col).map_err(js_error)?;
        self.state()
    }

    pub fn ai_move(&mut self) -> Result<JsValue, JsValue> {
        self.session
            .play_with(self.selector.as_mut())
            .map_err(js_error)?;
        self.state()
    }

    pub fn undo(&mut self) -> Result<JsValue, JsValue> {
        self.session.undo().map_err(js_error)?;
        self.state()
    }
}

/// A training puzzle for the given level.
#[wasm_bindgen]
pub struct WasmPuzzle {
    puzzle: Puzzle,
}

#[wasm_bindgen]
impl WasmPuzzle {
    #[wasm_bindgen(constructor)]
    pub fn new(level: u8) -> Result<WasmPuzzle, JsValue> {
        let puzzle = Puzzle::generate(level, &mut rand::thread_rng()).map_err(js_error)?;
        Ok(Self { puzzle })
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.puzzle)
    }

    /// Returns `"correct"`, `"incorrect"` or `"illegal"`.
    pub fn check(&self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        let mv = Move::new(row, col).map_err(js_error)?;
        to_js(&self.puzzle.check(mv))
    }
}
