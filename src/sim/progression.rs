//! Level progression
//!
//! Flag raise, deferred level transition, victory and the collaborator-facing
//! level controls (restart, level select).

use glam::Vec2;
use rand::Rng;

use super::level::generate_level;
use super::physics::SURFACE_EPSILON;
use super::schedule::DeferredAction;
use super::state::{FlagPhase, GameEvent, GamePhase, GameState, Particle, ParticleColor, Player};
use crate::error::SimError;

/// Particles spawned when the protagonist grabs the pole
pub const FLAG_BURST_PARTICLES: usize = 20;
/// Protagonist within this distance of the right edge completes the level
pub const WORLD_EDGE_SLACK: f32 = 10.0;

/// Raise the flag token and spray particles while it climbs.
/// Runs every tick regardless of phase.
pub fn update_flag_animation(state: &mut GameState) {
    let flag = &mut state.world.flag;
    if flag.phase == FlagPhase::Idle || flag.token_y <= flag.rect.y {
        return;
    }

    flag.token_y = (flag.token_y - state.tuning.flag_raise_speed).max(flag.rect.y);
    let origin = Vec2::new(flag.rect.center_x(), flag.token_y);

    if state.rng.random_bool(0.5) {
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 2.0,
            -state.rng.random::<f32>() * 2.0,
        );
        let life = 30.0 + state.rng.random::<f32>() * 20.0;
        let color = random_color(&mut state.rng);
        state.push_particle(Particle {
            pos: origin,
            vel,
            life,
            color,
        });
    }
}

/// Grab the pole on first overlap, then slide to the ground and complete the
/// level on arrival.
pub fn check_flag_contact(state: &mut GameState) {
    let flag_rect = state.world.flag.rect;
    match state.world.flag.phase {
        FlagPhase::Idle => {
            if state.level_passed || !state.player.rect.collides(&flag_rect) {
                return;
            }
            state.world.flag.phase = FlagPhase::Raising;
            pin_to_pole(state);
            state.player.vel = Vec2::new(0.0, state.tuning.flag_slide_speed);
            state.events.push(GameEvent::Flag);
            spawn_flag_burst(state);
            log::debug!("Flag grabbed on level {}", state.level);
        }
        FlagPhase::Raising => {
            pin_to_pole(state);
            let ground_top = state.world.ground().top();
            if state.player.rect.bottom() >= ground_top - SURFACE_EPSILON {
                state.player.rect.y = ground_top - state.player.rect.height;
                state.player.vel = Vec2::ZERO;
                state.world.flag.phase = FlagPhase::Arrived;
                trigger_level_complete(state);
            }
        }
        FlagPhase::Arrived => {}
    }
}

fn pin_to_pole(state: &mut GameState) {
    let flag_rect = state.world.flag.rect;
    state.player.rect.x = flag_rect.x - state.player.rect.width / 2.0;
    state.player.vel.x = 0.0;
}

fn spawn_flag_burst(state: &mut GameState) {
    let flag = state.world.flag;
    let origin = Vec2::new(flag.rect.center_x(), flag.token_y);
    for _ in 0..FLAG_BURST_PARTICLES {
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 4.0,
            -state.rng.random::<f32>() * 3.0 - 2.0,
        );
        let life = 60.0 + state.rng.random::<f32>() * 30.0;
        let color = random_color(&mut state.rng);
        state.push_particle(Particle {
            pos: origin,
            vel,
            life,
            color,
        });
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> ParticleColor {
    if rng.random_bool(0.5) {
        ParticleColor::White
    } else {
        ParticleColor::Yellow
    }
}

/// Reaching the right edge of the world also completes the level
pub fn check_world_edge(state: &mut GameState) {
    if state.world.flag.phase != FlagPhase::Idle {
        return;
    }
    if state.player.rect.right() >= state.world.width - WORLD_EDGE_SLACK {
        trigger_level_complete(state);
    }
}

/// Freeze the world and schedule the next level. Guarded so a level can only
/// complete once. Returns true if the transition was armed.
pub fn trigger_level_complete(state: &mut GameState) -> bool {
    if state.level_passed || state.is_over() {
        return false;
    }
    state.level_passed = true;
    state.phase = GamePhase::Transitioning;

    let delay = state.tuning.transition_delay_ticks();
    if let Some(stale) = state.scheduler.arm(DeferredAction::NextLevel, delay) {
        log::warn!("Replaced pending {stale:?} while completing level {}", state.level);
    }
    state.events.push(GameEvent::LevelComplete);
    log::debug!("Level {} complete, next level in {delay} ticks", state.level);
    true
}

/// Run a deferred action that just fired
pub fn run_deferred(state: &mut GameState, action: DeferredAction) {
    match action {
        DeferredAction::NextLevel => next_level(state),
    }
}

/// Advance to the next level, or finish the run after the last one
pub fn next_level(state: &mut GameState) {
    if state.level >= state.tuning.total_levels {
        state.scheduler.cancel();
        state.phase = GamePhase::Victory;
        state.events.push(GameEvent::Victory);
        log::info!(
            "Victory after {} levels with score {}",
            state.level,
            state.score
        );
        return;
    }

    state.level += 1;
    state.raise_watermark();
    enter_level(state);
}

/// Load `state.level` fresh: new world, reset protagonist, input lock armed.
/// Score is kept.
pub fn enter_level(state: &mut GameState) {
    state.scheduler.cancel();
    state.player = Player::default();
    state.particles.clear();
    state.combo_effects.clear();
    state.level_passed = false;
    state.phase = GamePhase::Playing;
    state.input_lock_ticks = state.tuning.input_lock_ticks();
    state.world = generate_level(state.level, &state.tuning, &mut state.rng);
    state.events.push(GameEvent::LevelStart { level: state.level });
}

impl GameState {
    /// Start over from level 1 with zero score. The unlocked watermark stays.
    pub fn restart(&mut self) {
        log::info!("Restarting run (best level {})", self.max_unlocked_level());
        self.score = 0;
        self.level = 1;
        enter_level(self);
    }

    /// Start `level` directly. Must be unlocked and within the level count;
    /// on error nothing changes.
    pub fn select_level(&mut self, level: u32) -> Result<(), SimError> {
        let total = self.tuning.total_levels;
        if level == 0 || level > total {
            return Err(SimError::LevelOutOfRange {
                requested: level,
                total,
            });
        }
        let unlocked = self.max_unlocked_level();
        if level > unlocked {
            return Err(SimError::LevelLocked {
                requested: level,
                unlocked,
            });
        }

        log::info!("Level {level} selected");
        self.level = level;
        enter_level(self);
        Ok(())
    }

    /// Pause into the level-select menu. Only possible during normal play.
    pub fn open_level_select(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.level_passed {
            return false;
        }
        self.phase = GamePhase::LevelSelect;
        true
    }

    /// Leave the level-select menu without changing level
    pub fn resume(&mut self) {
        if self.phase == GamePhase::LevelSelect {
            self.phase = GamePhase::Playing;
        }
    }
}
