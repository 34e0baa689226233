use thiserror::Error;

/// Errors raised at the API boundary.
///
/// Gameplay itself never fails: illegal gestures are no-ops and policy
/// rejections are reported through the status message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("row/col out of range: ({row}, {col})")]
    InvalidCoordinate { row: u8, col: u8 },

    #[error("invalid player index: {0}")]
    InvalidPlayer(u8),

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}
