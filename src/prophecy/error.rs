//! Errors returned by engine commands.
//!
//! Running out of energy is not an error: purchases report it as `Ok(false)`.

/// Errors that can occur while driving the progression engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("upgrade not found: {0:?}")]
    UnknownUpgrade(String),

    #[error("milestone path not found: {0:?}")]
    UnknownPath(String),

    #[error("no milestone is waiting for a path choice")]
    NoMilestonePending,

    #[error("invalid tuning: {0}")]
    Tuning(#[from] serde_json::Error),
}
