//! Game state and core simulation types
//!
//! Everything the presentation layer needs to draw a frame lives in
//! [`GameState`]. Entities are plain data; behaviour lives in the sibling
//! modules.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::generate_level;
use super::rect::Rect;
use super::schedule::Scheduler;
use crate::consts::*;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (including the flag slide)
    Playing,
    /// Level finished; world frozen until the deferred next-level fires
    Transitioning,
    /// Paused on the level-select menu
    LevelSelect,
    /// Protagonist died
    GameOver,
    /// Every level cleared
    Victory,
}

/// Goal flag sequence. Only ever moves forward within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlagPhase {
    Idle,
    /// Protagonist is sliding down the pole, token rising
    Raising,
    /// Protagonist touched down at the foot of the pole
    Arrived,
}

/// Combined progression view for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progression {
    Playing,
    Raising,
    Transitioning,
    LevelSelect,
    GameOver,
    Victory,
}

/// Discrete events for the audio collaborator, refilled every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    Coin,
    /// Batch of enemies stomped in one tick
    Kill { count: u32 },
    BrickBreak,
    /// Protagonist grabbed the flagpole
    Flag,
    LevelComplete,
    LevelStart { level: u32 },
    GameOver,
    Victory,
}

/// A static platform. Index 0 of every level is the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
}

/// Brick lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickState {
    Intact,
    /// Broken but still solid until the removal delay runs out
    Breaking { ticks_left: u32 },
    /// Logically deleted; compacted out at the end of the tick
    Gone,
}

/// Ticks a broken brick stays solid before it disappears (100 ms)
pub const BRICK_REMOVAL_TICKS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub breakable: bool,
    pub state: BrickState,
}

impl Brick {
    pub fn new(rect: Rect, breakable: bool) -> Self {
        Self {
            rect,
            breakable,
            state: BrickState::Intact,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.state != BrickState::Intact
    }

    /// Still participates in collision
    pub fn is_solid(&self) -> bool {
        self.state != BrickState::Gone
    }
}

/// Coin motion sub-state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CoinMotion {
    /// Placed by the generator, never moves
    Static,
    /// Ejected from a brick, bouncing under its own gravity
    Airborne {
        vel: Vec2,
        gravity: f32,
        bounce: f32,
        /// Float animation length once the coin settles
        float_ticks: u32,
    },
    /// Settled; drifting upward one pixel per tick
    Floating { ticks_left: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub rect: Rect,
    pub collected: bool,
    pub motion: CoinMotion,
}

impl Coin {
    pub fn fixed(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, COIN_SIZE, COIN_SIZE),
            collected: false,
            motion: CoinMotion::Static,
        }
    }
}

/// A patrolling enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    /// Patrol speed magnitude
    pub speed: f32,
    /// Patrol direction, +1 right / -1 left
    pub dir: f32,
    /// Vertical speed while falling
    pub vel_y: f32,
    pub grounded: bool,
}

impl Enemy {
    pub fn new(x: f32, y: f32, speed: f32, dir: f32) -> Self {
        Self {
            rect: Rect::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
            speed,
            dir,
            vel_y: 0.0,
            grounded: true,
        }
    }
}

/// The protagonist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub vel: Vec2,
    pub grounded: bool,
    /// Jumps used since last touching ground
    pub jump_count: u32,
    /// Remaining ticks of stomp invincibility
    pub invincible_frames: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y, PLAYER_WIDTH, PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            grounded: false,
            jump_count: 0,
            invincible_frames: 0,
        }
    }
}

impl Player {
    /// Feet position (bottom edge)
    #[inline]
    pub fn feet(&self) -> f32 {
        self.rect.bottom()
    }
}

/// Goal flag and its raise animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub rect: Rect,
    /// Current Y of the flag cloth on the pole
    pub token_y: f32,
    pub phase: FlagPhase,
}

impl Flag {
    /// Flag at the right edge of the world, standing on the ground
    pub fn at_world_edge(world_width: f32) -> Self {
        let rect = Rect::new(
            world_width - FLAG_OFFSET_X,
            GROUND_Y - FLAG_HEIGHT,
            FLAG_WIDTH,
            FLAG_HEIGHT,
        );
        Self {
            rect,
            token_y: rect.y + rect.height * 0.75,
            phase: FlagPhase::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    White,
    Yellow,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks
    pub life: f32,
    pub color: ParticleColor,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 512;

impl Particle {
    pub fn step(&mut self) {
        self.pos += self.vel;
        self.vel.y += 0.1;
        self.life -= 1.0;
    }

    pub fn alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Floating score text shown for big combos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboEffect {
    pub pos: Vec2,
    pub vel_y: f32,
    pub alpha: f32,
    pub life: u32,
    pub label: String,
}

impl ComboEffect {
    pub fn new(pos: Vec2, kills: u32, points: u64) -> Self {
        Self {
            pos,
            vel_y: -2.0,
            alpha: 1.0,
            life: 60,
            label: format!("{kills}x combo! +{points}"),
        }
    }

    pub fn step(&mut self) {
        self.pos.y += self.vel_y;
        self.alpha = (self.alpha - 0.02).max(0.0);
        self.life = self.life.saturating_sub(1);
    }

    pub fn alive(&self) -> bool {
        self.life > 0
    }
}

/// Level geometry and population. Rebuilt wholesale on level entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    /// Level this world was generated for (1-based)
    pub level: u32,
    pub total_levels: u32,
    pub platforms: Vec<Platform>,
    pub bricks: Vec<Brick>,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub flag: Flag,
}

impl World {
    /// Ground-only world with the flag and nothing else
    pub fn flat(width: f32, level: u32, total_levels: u32) -> Self {
        Self {
            width,
            level,
            total_levels,
            platforms: vec![Platform {
                rect: Rect::new(0.0, GROUND_Y, width, GROUND_HEIGHT),
            }],
            bricks: Vec::new(),
            coins: Vec::new(),
            enemies: Vec::new(),
            flag: Flag::at_world_edge(width),
        }
    }

    /// Ground platform rectangle
    pub fn ground(&self) -> Rect {
        self.platforms
            .first()
            .map(|p| p.rect)
            .unwrap_or(Rect::new(0.0, GROUND_Y, self.width, GROUND_HEIGHT))
    }

    /// All rectangles that block movement (platforms, then solid bricks)
    pub fn obstacles(&self) -> impl Iterator<Item = Rect> + '_ {
        self.platforms.iter().map(|p| p.rect).chain(
            self.bricks
                .iter()
                .filter(|b| b.is_solid())
                .map(|b| b.rect),
        )
    }

    /// Coins still available for pickup
    pub fn remaining_coins(&self) -> usize {
        self.coins.iter().filter(|c| !c.collected).count()
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance values for this run, validated on construction
    pub(crate) tuning: Tuning,
    /// Single random source for generation and gameplay
    pub(crate) rng: Pcg32,
    /// Current level (1-based)
    pub level: u32,
    /// Highest level ever reached (level-select watermark)
    max_unlocked_level: u32,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Set once the level's goal is reached; guards against re-triggering
    pub level_passed: bool,
    /// Ticks of post-load input lock remaining
    pub input_lock_ticks: u32,
    /// Jump was held last tick (jumps fire on press, not hold)
    pub jump_held: bool,
    pub player: Player,
    pub world: World,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub combo_effects: Vec<ComboEffect>,
    /// Events emitted during the last tick
    pub events: Vec<GameEvent>,
    /// Pending deferred actions
    pub scheduler: Scheduler,
}

impl GameState {
    /// Create a new game at level 1 with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a new game with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, SimError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = generate_level(1, &tuning, &mut rng);
        let input_lock_ticks = tuning.input_lock_ticks();
        Self {
            seed,
            rng,
            level: 1,
            max_unlocked_level: 1,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            level_passed: false,
            input_lock_ticks,
            jump_held: false,
            player: Player::default(),
            world,
            particles: Vec::new(),
            combo_effects: Vec::new(),
            events: vec![GameEvent::LevelStart { level: 1 }],
            scheduler: Scheduler::default(),
            tuning,
        }
    }

    /// Balance values this run was built with
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Highest level reached so far
    pub fn max_unlocked_level(&self) -> u32 {
        self.max_unlocked_level
    }

    /// Seed the watermark from an external store. Never lowers it.
    pub fn restore_unlocked_level(&mut self, level: u32) {
        let level = level.clamp(1, self.tuning.total_levels);
        self.max_unlocked_level = self.max_unlocked_level.max(level);
    }

    pub(crate) fn raise_watermark(&mut self) {
        if self.level > self.max_unlocked_level {
            self.max_unlocked_level = self.level;
        }
    }

    /// True in either terminal phase
    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::Victory)
    }

    /// Whether the world is currently simulated (not paused, locked or over)
    pub fn is_live(&self) -> bool {
        self.phase == GamePhase::Playing && self.input_lock_ticks == 0
    }

    pub fn progression(&self) -> Progression {
        match self.phase {
            GamePhase::Playing if self.world.flag.phase == FlagPhase::Raising => {
                Progression::Raising
            }
            GamePhase::Playing => Progression::Playing,
            GamePhase::Transitioning => Progression::Transitioning,
            GamePhase::LevelSelect => Progression::LevelSelect,
            GamePhase::GameOver => Progression::GameOver,
            GamePhase::Victory => Progression::Victory,
        }
    }

    /// Spawn a particle unless the cap is reached
    pub fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() < MAX_PARTICLES {
            self.particles.push(particle);
        }
    }
}
