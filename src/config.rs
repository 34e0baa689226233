use std::time::Duration;

use serde::Deserialize;

use crate::error::EngineError;

const DEFAULT_COMPUTER_DELAY_MS: u64 = 1000;
const DEFAULT_CHAIN_DELAY_MS: u64 = 500;
const MAX_DELAY_MS: u64 = 60 * 60 * 1000;

/// Engine tuning supplied by the host. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pause before the computer plays its turn.
    pub computer_delay_ms: u64,
    /// Pause between the steps of a computer multi-jump.
    pub chain_delay_ms: u64,
    /// Fixed RNG seed for reproducible computer play.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            computer_delay_ms: DEFAULT_COMPUTER_DELAY_MS,
            chain_delay_ms: DEFAULT_CHAIN_DELAY_MS,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [
            ("computer_delay_ms", self.computer_delay_ms),
            ("chain_delay_ms", self.chain_delay_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be at most {MAX_DELAY_MS}, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    pub fn chain_delay(&self) -> Duration {
        Duration::from_millis(self.chain_delay_ms)
    }
}
