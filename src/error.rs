//! Error types for motioncheck

use thiserror::Error;

/// Errors raised at the caller boundary.
///
/// Every variant here is a caller error, fatal to the invoking instruction
/// step. Missing or not-yet-initialized telemetry is deliberately *not* an
/// error anywhere in this crate: predicates fail closed and return false.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Invalid side option: {0}")]
    InvalidSide(String),

    #[error("Invalid finger option: {0}")]
    InvalidFinger(String),

    #[error("Invalid case option: {0}")]
    InvalidCase(String),

    #[error("Fingers '{0}' and '{1}' are not adjacent")]
    NonAdjacentFingers(String, String),

    #[error("No condition named '{0}'")]
    UnknownCondition(String),

    #[error("Condition '{0}' requires argument '{1}'")]
    MissingArgument(String, &'static str),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
