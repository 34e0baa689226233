use wasm_bindgen::prelude::*;
use web_time::Instant;

pub mod ai;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rules;
pub mod scheduler;
pub mod types;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::game::GameEngine;
use crate::types::{Player, Position};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// JavaScript handle on a game. The page renders whatever state comes back
/// and calls `tick` once `pendingDelayMs` has elapsed.
#[wasm_bindgen]
pub struct CheckersGame {
    engine: GameEngine,
}

#[wasm_bindgen]
impl CheckersGame {
    /// `computer_player` is 0 (red) or 1 (white); omit it for two humans.
    #[wasm_bindgen(constructor)]
    pub fn new(computer_player: Option<u8>) -> Result<CheckersGame, JsError> {
        let computer = parse_player(computer_player)?;
        Ok(Self {
            engine: GameEngine::new_game(computer),
        })
    }

    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        computer_player: Option<u8>,
        config: JsValue,
    ) -> Result<CheckersGame, JsError> {
        let computer = parse_player(computer_player)?;
        let config = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| EngineError::InvalidConfig(e.to_string()))?
        };
        Ok(Self {
            engine: GameEngine::with_config(computer, config)?,
        })
    }

    /// Forwards a click on square `(row, col)`; returns the resulting update.
    pub fn select(&mut self, row: u8, col: u8) -> Result<JsValue, JsError> {
        let update = self.engine.handle_selection(Position::new(row, col)?);
        Ok(serde_wasm_bindgen::to_value(&update)?)
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.engine.state())?)
    }

    /// Milliseconds until the computer's next step is due, if one is pending.
    #[wasm_bindgen(js_name = pendingDelayMs)]
    pub fn pending_delay_ms(&self) -> Option<f64> {
        self.engine
            .pending_delay(Instant::now())
            .map(|delay| delay.as_secs_f64() * 1000.0)
    }

    /// Plays the pending computer step if it is due. Returns the update, or
    /// `null` when nothing happened.
    pub fn tick(&mut self) -> Result<JsValue, JsError> {
        match self.engine.poll(Instant::now()) {
            Some(update) => Ok(serde_wasm_bindgen::to_value(&update)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Cell code at `(row, col)`: 0=empty, 1=red, 2=white, 3=red king, 4=white king.
    #[wasm_bindgen(js_name = cellAt)]
    pub fn cell_at(&self, row: u8, col: u8) -> Result<u8, JsError> {
        let pos = Position::new(row, col)?;
        Ok(self.engine.board().to_array()[pos.index()])
    }
}

fn parse_player(index: Option<u8>) -> Result<Option<Player>, EngineError> {
    index.map(Player::try_from).transpose()
}
