//! Flag Dash headless runner
//!
//! Drives the simulation with a simple demo player and logs what happens.
//! Usage: `flag-dash [seed] [tuning.json]`

use std::process::ExitCode;

use flag_dash::Tuning;
use flag_dash::consts::TICKS_PER_SECOND;
use flag_dash::sim::{GameEvent, GameState, InputIntent, Progression, tick};

/// Give up after this many simulated minutes
const MAX_MINUTES: u64 = 30;

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => seed,
            Err(e) => {
                log::error!("Invalid seed {raw:?}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => 42,
    };

    let tuning = match args.next() {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Could not load tuning from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let mut state = match GameState::with_tuning(seed, tuning) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Flag Dash (headless) starting with seed {seed}");

    let max_ticks = MAX_MINUTES * 60 * TICKS_PER_SECOND as u64;
    while !state.is_over() && state.time_ticks < max_ticks {
        let input = demo_input(&state);
        tick(&mut state, &input);
        for event in &state.events {
            match event {
                GameEvent::LevelStart { level } => log::info!("Level {level} started"),
                GameEvent::Kill { count } => log::debug!("Kill x{count}"),
                other => log::trace!("{other:?}"),
            }
        }
    }

    let outcome = match state.progression() {
        Progression::Victory => "victory",
        Progression::GameOver => "game over",
        _ => "time limit",
    };
    println!(
        "{outcome}: level {}/{}, score {}, {:.1}s simulated",
        state.level,
        state.tuning().total_levels,
        state.score,
        state.time_ticks as f32 / TICKS_PER_SECOND
    );
    ExitCode::SUCCESS
}

fn load_tuning(path: &str) -> Result<Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(Tuning::from_json(&json)?)
}

/// Run right; hop over enemies and walls, tapping jump so each press counts
fn demo_input(state: &GameState) -> InputIntent {
    let player = state.player.rect;
    let look_ahead = player.right() + 48.0;

    let enemy_ahead = state.world.enemies.iter().any(|e| {
        e.rect.x >= player.x && e.rect.x <= look_ahead && (e.rect.y - player.y).abs() < 48.0
    });
    let wall_ahead = state.world.obstacles().skip(1).any(|r| {
        r.x >= player.right() && r.x <= look_ahead && r.bottom() > player.y && r.y < player.bottom()
    });

    let want_jump = enemy_ahead || wall_ahead || state.time_ticks % 90 == 0;
    InputIntent {
        move_right: true,
        jump: want_jump && !state.jump_held,
        ..Default::default()
    }
}
