//! Stomps, deaths, coin pickup and brick payouts
//!
//! Every enemy stomped in the same tick is removed as one batch; the batch
//! size picks the bounce height and score.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::state::{
    BRICK_REMOVAL_TICKS, BrickState, Coin, CoinMotion, ComboEffect, Enemy, GameEvent, GamePhase,
    GameState, Player,
};
use crate::consts::COIN_SIZE;

/// Coins ejected by a lucky brick
pub const BRICK_PAYOUT_COINS: usize = 3;
/// Batch size from which a combo label is shown
pub const COMBO_TEXT_KILLS: u32 = 4;

/// Bounce and score awarded for a stomp batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboTier {
    /// Bounce speed as a multiple of jump power
    pub bounce: f32,
    pub points: u64,
    pub show_text: bool,
}

pub fn combo_tier(kills: u32) -> ComboTier {
    match kills {
        0 => ComboTier {
            bounce: 0.0,
            points: 0,
            show_text: false,
        },
        1 => ComboTier {
            bounce: 1.0 / 1.5,
            points: 5,
            show_text: false,
        },
        2 => ComboTier {
            bounce: 1.0,
            points: 15,
            show_text: false,
        },
        3 => ComboTier {
            bounce: 1.1,
            points: 30,
            show_text: false,
        },
        n => ComboTier {
            bounce: 1.2,
            points: 10 * n as u64,
            show_text: n >= COMBO_TEXT_KILLS,
        },
    }
}

/// Downward, shallow contact: the enemy dies instead of the player
#[inline]
pub fn is_stomp(player: &Player, enemy: &Enemy, margin: f32) -> bool {
    player.rect.collides(&enemy.rect)
        && player.vel.y > 0.0
        && player.feet() - enemy.rect.top() < margin
}

/// Remove every stompable enemy as one batch and apply the combo reward.
/// Returns the batch size.
pub fn resolve_stomps(state: &mut GameState) -> u32 {
    let margin = state.tuning.stomp_margin;
    let stomped: Vec<bool> = state
        .world
        .enemies
        .iter()
        .map(|e| is_stomp(&state.player, e, margin))
        .collect();

    let kills = stomped.iter().filter(|&&s| s).count() as u32;
    if kills == 0 {
        return 0;
    }

    let mut marks = stomped.into_iter();
    state
        .world
        .enemies
        .retain(|_| !marks.next().unwrap_or(false));

    let tier = combo_tier(kills);
    state.player.vel.y = -state.tuning.jump_power * tier.bounce;
    state.player.invincible_frames = state.tuning.invincible_frames;
    state.score += tier.points;
    state.events.push(GameEvent::Kill { count: kills });

    if tier.show_text {
        let pos = Vec2::new(state.player.rect.x, state.player.rect.y - 40.0);
        state
            .combo_effects
            .push(ComboEffect::new(pos, kills, tier.points));
    }

    log::debug!("Stomped {kills} enemies (+{})", tier.points);
    kills
}

/// Any non-stomp enemy contact kills the player unless invincible.
/// Returns true if the player died this call.
pub fn check_lethal_contact(state: &mut GameState) -> bool {
    if state.player.invincible_frames > 0 || state.is_over() {
        return false;
    }

    let margin = state.tuning.stomp_margin;
    let player = &state.player;
    let lethal = state
        .world
        .enemies
        .iter()
        .any(|e| player.rect.collides(&e.rect) && !is_stomp(player, e, margin));

    if lethal {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!("Game over on level {} with score {}", state.level, state.score);
    }
    lethal
}

/// Pick up every touched coin. Returns coins collected.
pub fn collect_coins(state: &mut GameState) -> u32 {
    let mut collected = 0;
    for coin in state.world.coins.iter_mut() {
        if !coin.collected && state.player.rect.collides(&coin.rect) {
            coin.collected = true;
            collected += 1;
        }
    }

    state.score += collected as u64;
    for _ in 0..collected {
        state.events.push(GameEvent::Coin);
    }
    collected
}

/// Break bricks bumped from below. Already-broken and unbreakable bricks are
/// skipped, so repeated hits never pay out twice.
pub fn break_bricks(state: &mut GameState, hits: &[usize]) {
    for &idx in hits {
        let Some(brick) = state.world.bricks.get_mut(idx) else {
            continue;
        };
        if !brick.breakable || brick.is_broken() {
            continue;
        }

        brick.state = BrickState::Breaking {
            ticks_left: BRICK_REMOVAL_TICKS,
        };
        let rect = brick.rect;
        state.events.push(GameEvent::BrickBreak);

        if state.rng.random_bool(state.tuning.brick_coin_chance) {
            for i in 0..BRICK_PAYOUT_COINS {
                let coin = ejected_coin(rect, i, &mut state.rng);
                state.world.coins.push(coin);
            }
            log::debug!("Brick at ({}, {}) paid out coins", rect.x, rect.y);
        }
    }
}

fn ejected_coin<R: Rng + ?Sized>(brick: Rect, index: usize, rng: &mut R) -> Coin {
    let vel = Vec2::new(
        (rng.random::<f32>() - 0.5) * 3.0,
        -7.0 - rng.random::<f32>() * 2.0,
    );
    Coin {
        rect: Rect::new(
            brick.x + 12.0 * index as f32,
            brick.y - 18.0,
            COIN_SIZE,
            COIN_SIZE,
        ),
        collected: false,
        motion: CoinMotion::Airborne {
            vel,
            gravity: 0.4,
            bounce: 0.6,
            float_ticks: 40,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Brick, World};

    fn arena() -> GameState {
        let mut state = GameState::new(7);
        state.world = World::flat(2000.0, 1, 15);
        state.input_lock_ticks = 0;
        state.events.clear();
        state
    }

    fn enemy_on_ground(x: f32) -> Enemy {
        Enemy::new(x, GROUND_Y - ENEMY_HEIGHT, 0.0, 1.0)
    }

    /// Player falling with feet `depth` pixels into enemies standing on the ground
    fn falling_player(state: &mut GameState, x: f32, depth: f32) {
        state.player.rect = Rect::new(
            x,
            GROUND_Y - ENEMY_HEIGHT - PLAYER_HEIGHT + depth,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        );
        state.player.vel = Vec2::new(0.0, 4.0);
    }

    #[test]
    fn test_combo_tiers() {
        assert_eq!(combo_tier(1).points, 5);
        assert_eq!(combo_tier(2).points, 15);
        assert_eq!(combo_tier(3).points, 30);
        assert_eq!(combo_tier(4).points, 40);
        assert_eq!(combo_tier(7).points, 70);
        assert!(!combo_tier(3).show_text);
        assert!(combo_tier(4).show_text);
        assert!((combo_tier(4).bounce - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_single_stomp() {
        let mut state = arena();
        state.world.enemies.push(enemy_on_ground(500.0));
        state.world.enemies.push(enemy_on_ground(900.0));
        falling_player(&mut state, 500.0, 5.0);

        assert_eq!(resolve_stomps(&mut state), 1);
        assert_eq!(state.world.enemies.len(), 1);
        assert_eq!(state.world.enemies[0].rect.x, 900.0);
        assert_eq!(state.score, 5);
        assert!((state.player.vel.y - (-8.0)).abs() < 1e-4);
        assert_eq!(state.player.invincible_frames, 45);
        assert_eq!(state.events, vec![GameEvent::Kill { count: 1 }]);
        assert!(state.combo_effects.is_empty());
    }

    #[test]
    fn test_quad_stomp_shows_combo() {
        let mut state = arena();
        for x in [500.0, 505.0, 510.0, 515.0] {
            state.world.enemies.push(enemy_on_ground(x));
        }
        falling_player(&mut state, 500.0, 5.0);

        assert_eq!(resolve_stomps(&mut state), 4);
        assert!(state.world.enemies.is_empty());
        assert_eq!(state.score, 40);
        assert_eq!(state.combo_effects.len(), 1);
        assert_eq!(state.combo_effects[0].label, "4x combo! +40");
    }

    #[test]
    fn test_deep_or_rising_contact_is_not_a_stomp() {
        let mut state = arena();
        state.world.enemies.push(enemy_on_ground(500.0));

        falling_player(&mut state, 500.0, 30.0);
        assert_eq!(resolve_stomps(&mut state), 0);

        falling_player(&mut state, 500.0, 5.0);
        state.player.vel.y = -3.0;
        assert_eq!(resolve_stomps(&mut state), 0);
        assert_eq!(state.world.enemies.len(), 1);
    }

    #[test]
    fn test_lethal_contact_respects_invincibility() {
        let mut state = arena();
        state.world.enemies.push(enemy_on_ground(510.0));
        state.player.rect = Rect::new(500.0, GROUND_Y - PLAYER_HEIGHT, PLAYER_WIDTH, PLAYER_HEIGHT);

        state.player.invincible_frames = 1;
        assert!(!check_lethal_contact(&mut state));
        assert_eq!(state.phase, GamePhase::Playing);

        state.player.invincible_frames = 0;
        assert!(check_lethal_contact(&mut state));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver]);
    }

    #[test]
    fn test_coin_pickup_once() {
        let mut state = arena();
        state.world.coins.push(Coin::fixed(60.0, 310.0));
        state.player.rect = Rect::new(50.0, 300.0, PLAYER_WIDTH, PLAYER_HEIGHT);

        assert_eq!(collect_coins(&mut state), 1);
        assert_eq!(collect_coins(&mut state), 0);
        assert_eq!(state.score, 1);
        assert_eq!(state.world.remaining_coins(), 0);
    }

    #[test]
    fn test_brick_payout_and_idempotence() {
        let mut state = arena();
        state.tuning.brick_coin_chance = 1.0;
        state.world.bricks.push(Brick::new(Rect::new(500.0, 200.0, 40.0, 20.0), true));
        state.world.bricks.push(Brick::new(Rect::new(600.0, 200.0, 40.0, 20.0), false));

        break_bricks(&mut state, &[0]);
        assert_eq!(state.world.coins.len(), BRICK_PAYOUT_COINS);
        assert!(state.world.bricks[0].is_broken());
        assert!(state.world.bricks[0].is_solid());
        assert_eq!(state.events, vec![GameEvent::BrickBreak]);
        for coin in &state.world.coins {
            assert!(matches!(coin.motion, CoinMotion::Airborne { vel, .. } if vel.y <= -7.0));
        }

        state.events.clear();
        break_bricks(&mut state, &[0, 1, 99]);
        assert_eq!(state.world.coins.len(), BRICK_PAYOUT_COINS);
        assert!(state.events.is_empty());
        assert!(!state.world.bricks[1].is_broken());
    }
}
