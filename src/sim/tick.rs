//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is
//! one display frame; every speed is in pixels per tick.

use super::combat::{break_bricks, check_lethal_contact, collect_coins, resolve_stomps};
use super::physics::{expire_bricks, move_player, update_coins, update_enemies};
use super::progression::{
    check_flag_contact, check_world_edge, run_deferred, update_flag_animation,
};
use super::state::{FlagPhase, GameEvent, GamePhase, GameState};

/// Normalized input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump button is down. Jumps fire on the press edge only.
    pub jump: bool,
    /// Open the level-select menu
    pub menu: bool,
    /// Confirm on the game-over / victory screen
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &InputIntent) {
    state.events.clear();

    if state.is_over() {
        if input.restart {
            state.restart();
        }
        return;
    }

    if input.menu {
        state.open_level_select();
    }

    state.time_ticks += 1;

    // Effects animate through pauses and transitions
    update_flag_animation(state);
    update_effects(state);

    if let Some(action) = state.scheduler.advance() {
        run_deferred(state, action);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    if state.input_lock_ticks > 0 {
        state.input_lock_ticks -= 1;
        state.jump_held = input.jump;
        return;
    }

    let sliding = state.world.flag.phase != FlagPhase::Idle;
    if !sliding {
        apply_input(state, input);
    }
    state.jump_held = input.jump;

    expire_bricks(&mut state.world.bricks);
    let head_hits = move_player(&mut state.player, &state.world, &state.tuning, sliding);
    break_bricks(state, &head_hits);

    state.player.invincible_frames = state.player.invincible_frames.saturating_sub(1);

    if !sliding {
        resolve_stomps(state);

        let world = &mut state.world;
        update_enemies(
            &mut world.enemies,
            &world.platforms,
            &world.bricks,
            world.width,
            &state.tuning,
            &mut state.rng,
        );

        if check_lethal_contact(state) {
            return;
        }
    }

    collect_coins(state);
    let ground_top = state.world.ground().top();
    update_coins(&mut state.world.coins, ground_top, state.world.width);

    check_flag_contact(state);
    check_world_edge(state);
}

fn apply_input(state: &mut GameState, input: &InputIntent) {
    let speed = state.tuning.move_speed;
    let player = &mut state.player;

    player.vel.x = match (input.move_left, input.move_right) {
        (true, false) => -speed,
        (false, true) => speed,
        _ => 0.0,
    };

    let pressed = input.jump && !state.jump_held;
    if pressed && player.jump_count < state.tuning.max_jumps {
        player.vel.y = -state.tuning.jump_power;
        player.jump_count += 1;
        player.grounded = false;
        state.events.push(GameEvent::Jump);
    }
}

/// Step particles and combo text, dropping the expired ones
fn update_effects(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.step();
    }
    state.particles.retain(|p| p.alive());

    for effect in state.combo_effects.iter_mut() {
        effect.step();
    }
    state.combo_effects.retain(|e| e.alive());
}
