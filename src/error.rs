//! Errors for the collaborator-facing API
//!
//! Ticking never fails. These only come back from configuration loading and
//! the level-select entry points.

/// Errors produced outside the per-tick simulation path.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A tuning value is out of its valid range.
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// Tuning JSON could not be parsed.
    #[error("failed to parse tuning: {0}")]
    TuningParse(#[from] serde_json::Error),

    /// Requested level does not exist.
    #[error("level {requested} is out of range (1..={total})")]
    LevelOutOfRange {
        /// The level that was asked for.
        requested: u32,
        /// Total number of levels in the run.
        total: u32,
    },

    /// Requested level has not been reached yet.
    #[error("level {requested} is locked (highest unlocked: {unlocked})")]
    LevelLocked {
        /// The level that was asked for.
        requested: u32,
        /// Current watermark.
        unlocked: u32,
    },
}
