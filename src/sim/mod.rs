//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only
//! - Stable iteration order (collection order, compacted once per tick)
//! - No rendering, audio or platform dependencies

pub mod combat;
pub mod level;
pub mod physics;
pub mod progression;
pub mod rect;
pub mod schedule;
pub mod state;
pub mod tick;

pub use level::generate_level;
pub use rect::{Rect, collides};
pub use schedule::{DeferredAction, Scheduler};
pub use state::{
    BRICK_REMOVAL_TICKS, Brick, BrickState, Coin, CoinMotion, ComboEffect, Enemy, Flag, FlagPhase,
    GameEvent, GamePhase, GameState, MAX_PARTICLES, Particle, ParticleColor, Platform, Player,
    Progression, World,
};
pub use tick::{InputIntent, tick};
