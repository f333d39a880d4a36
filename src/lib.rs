//! Flag Dash - A procedurally generated platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, level progression)
//! - `tuning`: Data-driven game balance
//! - `error`: Errors for the collaborator-facing API
//!
//! Rendering, input polling and audio live outside this crate. They read
//! [`sim::GameState`] after each tick and feed [`sim::InputIntent`] into it.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::Tuning;

/// Game configuration constants
///
/// Geometry and clock values that are not balance knobs. Balance lives in
/// [`Tuning`].
pub mod consts {
    /// Simulation rate (one tick per display refresh)
    pub const TICKS_PER_SECOND: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND;

    /// Canvas height; the bottom edge is a safety floor below the ground
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// Ground platform (index 0 in every level)
    pub const GROUND_Y: f32 = 350.0;
    pub const GROUND_HEIGHT: f32 = 50.0;

    /// Protagonist
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;
    pub const PLAYER_SPAWN_X: f32 = 50.0;
    pub const PLAYER_SPAWN_Y: f32 = 300.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 28.0;
    pub const ENEMY_HEIGHT: f32 = 32.0;
    /// Enemies avoid spawning left of this X (player start area)
    pub const ENEMY_SPAWN_SAFE_X: f32 = 200.0;

    /// Bricks and coins
    pub const BRICK_WIDTH: f32 = 40.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const COIN_SIZE: f32 = 16.0;

    /// Goal flag, anchored `FLAG_OFFSET_X` from the right edge
    pub const FLAG_WIDTH: f32 = 20.0;
    pub const FLAG_HEIGHT: f32 = 240.0;
    pub const FLAG_OFFSET_X: f32 = 40.0;

    /// Vertical band (measured from the top) used for generated geometry
    pub const GEN_MIN_Y: f32 = 50.0;
    pub const GEN_BAND: f32 = 200.0;
    /// Generated geometry keeps this far from the left edge
    pub const GEN_MARGIN_X: f32 = 50.0;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    (secs.max(0.0) * consts::TICKS_PER_SECOND).round() as u32
}
