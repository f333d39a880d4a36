//! Movement and collision response
//!
//! The protagonist resolves horizontally then vertically against every solid
//! rectangle. Enemies patrol the surface they stand on and only fall when
//! they step off an edge. Units are pixels and pixels per tick.

use rand::Rng;

use super::rect::Rect;
use super::state::{Brick, BrickState, Coin, CoinMotion, Enemy, Platform, Player, World};
use crate::consts::CANVAS_HEIGHT;
use crate::tuning::Tuning;

/// Feet-to-surface distance still treated as standing on it
pub const SURFACE_EPSILON: f32 = 0.5;

/// Ground-contact speed at or below which a coin stops bouncing. Small
/// rebounds under per-tick integration land at 1.2..1.8, so the cutoff sits
/// above that band.
const COIN_SETTLE_SPEED: f32 = 2.0;

/// Move the protagonist one tick and resolve collisions.
///
/// While `sliding` the protagonist descends the flagpole at a fixed speed
/// instead of accelerating under gravity, and only the ground can stop it.
///
/// Returns indices of intact breakable bricks bumped from below this tick.
pub fn move_player(player: &mut Player, world: &World, tuning: &Tuning, sliding: bool) -> Vec<usize> {
    if sliding {
        player.vel.x = 0.0;
        player.vel.y = tuning.flag_slide_speed;
    } else {
        player.vel.y += tuning.gravity;
    }

    // Horizontal pass
    player.rect.x += player.vel.x;
    for obstacle in world.obstacles() {
        if player.rect.collides(&obstacle) {
            if player.vel.x > 0.0 {
                player.rect.x = obstacle.x - player.rect.width;
            } else if player.vel.x < 0.0 {
                player.rect.x = obstacle.right();
            }
        }
    }

    // Vertical pass
    player.rect.y += player.vel.y;
    player.grounded = false;
    let mut head_hits = Vec::new();

    if sliding {
        // Only the ground stops a pole slide
        resolve_vertical(player, &world.ground());
        return finish_move(player, world, head_hits);
    }

    for platform in &world.platforms {
        resolve_vertical(player, &platform.rect);
    }

    for (idx, brick) in world.bricks.iter().enumerate() {
        if !brick.is_solid() {
            continue;
        }
        let rising = player.vel.y < 0.0;
        if resolve_vertical(player, &brick.rect) && rising && brick.breakable && !brick.is_broken() {
            head_hits.push(idx);
        }
    }

    finish_move(player, world, head_hits)
}

fn finish_move(player: &mut Player, world: &World, head_hits: Vec<usize>) -> Vec<usize> {
    if player.grounded {
        player.jump_count = 0;
    }

    // World bounds
    player.rect.clamp_x(world.width);
    if player.rect.bottom() > CANVAS_HEIGHT {
        player.rect.y = CANVAS_HEIGHT - player.rect.height;
        player.vel.y = 0.0;
        player.grounded = true;
        player.jump_count = 0;
    }

    head_hits
}

/// Snap out of `solid` along Y. Returns true if the collision was resolved.
fn resolve_vertical(player: &mut Player, solid: &Rect) -> bool {
    if !player.rect.collides(solid) {
        return false;
    }
    if player.vel.y > 0.0 {
        player.rect.y = solid.y - player.rect.height;
        player.vel.y = 0.0;
        player.grounded = true;
        true
    } else if player.vel.y < 0.0 {
        player.rect.y = solid.bottom();
        player.vel.y = 0.0;
        true
    } else {
        false
    }
}

/// Surface an enemy is currently standing on
struct Surface {
    rect: Rect,
    is_ground: bool,
}

fn find_surface(enemy: &Enemy, platforms: &[Platform], bricks: &[Brick]) -> Option<Surface> {
    let feet = enemy.rect.bottom();
    let standing_on = |r: &Rect| enemy.rect.overlaps_x(r) && (feet - r.y).abs() <= SURFACE_EPSILON;

    platforms
        .iter()
        .enumerate()
        .find(|(_, p)| standing_on(&p.rect))
        .map(|(i, p)| Surface {
            rect: p.rect,
            is_ground: i == 0,
        })
        .or_else(|| {
            bricks
                .iter()
                .filter(|b| b.is_solid())
                .find(|b| standing_on(&b.rect))
                .map(|b| Surface {
                    rect: b.rect,
                    is_ground: false,
                })
        })
}

/// Advance every enemy one tick
pub fn update_enemies<R: Rng + ?Sized>(
    enemies: &mut [Enemy],
    platforms: &[Platform],
    bricks: &[Brick],
    world_width: f32,
    tuning: &Tuning,
    rng: &mut R,
) {
    let ground_top = platforms.first().map_or(crate::consts::GROUND_Y, |p| p.rect.y);

    for enemy in enemies.iter_mut() {
        if !enemy.grounded {
            enemy.vel_y += tuning.gravity;
            enemy.rect.y += enemy.vel_y;
            if enemy.rect.bottom() >= ground_top {
                enemy.rect.y = ground_top - enemy.rect.height;
                enemy.vel_y = 0.0;
                enemy.grounded = true;
            }
            enemy.rect.clamp_x(world_width);
            continue;
        }

        enemy.rect.x += enemy.speed * enemy.dir;

        match find_surface(enemy, platforms, bricks) {
            Some(surface) => {
                let at_edge = (enemy.dir > 0.0 && enemy.rect.right() >= surface.rect.right())
                    || (enemy.dir < 0.0 && enemy.rect.x <= surface.rect.x);
                if at_edge {
                    if !surface.is_ground && rng.random_bool(tuning.enemy_drop_chance) {
                        enemy.grounded = false;
                        enemy.vel_y = 0.0;
                    } else {
                        enemy.dir = -enemy.dir;
                        enemy.rect.x = if enemy.dir > 0.0 {
                            surface.rect.x
                        } else {
                            surface.rect.right() - enemy.rect.width
                        };
                    }
                }
            }
            None => enemy.dir = -enemy.dir,
        }

        enemy.rect.clamp_x(world_width);
    }
}

/// Advance ejected coins: bounce on the ground, then settle and float up
pub fn update_coins(coins: &mut [Coin], ground_top: f32, world_width: f32) {
    for coin in coins.iter_mut() {
        match coin.motion {
            CoinMotion::Static => {}
            CoinMotion::Airborne {
                mut vel,
                gravity,
                bounce,
                float_ticks,
            } => {
                coin.rect.x += vel.x;
                coin.rect.y += vel.y;
                vel.y += gravity;
                coin.rect.clamp_x(world_width);

                if coin.rect.bottom() > ground_top {
                    coin.rect.y = ground_top - coin.rect.height;
                    if vel.y.abs() > COIN_SETTLE_SPEED {
                        vel.y = -vel.y * bounce;
                    } else {
                        coin.motion = CoinMotion::Floating {
                            ticks_left: float_ticks,
                        };
                        continue;
                    }
                }
                coin.motion = CoinMotion::Airborne {
                    vel,
                    gravity,
                    bounce,
                    float_ticks,
                };
            }
            CoinMotion::Floating { ticks_left } => {
                if ticks_left == 0 {
                    coin.motion = CoinMotion::Static;
                } else {
                    coin.rect.y -= 1.0;
                    coin.motion = CoinMotion::Floating {
                        ticks_left: ticks_left - 1,
                    };
                }
            }
        }
    }
}

/// Count down broken bricks and compact the ones that expired
pub fn expire_bricks(bricks: &mut Vec<Brick>) {
    for brick in bricks.iter_mut() {
        if let BrickState::Breaking { ticks_left } = brick.state {
            brick.state = if ticks_left <= 1 {
                BrickState::Gone
            } else {
                BrickState::Breaking {
                    ticks_left: ticks_left - 1,
                }
            };
        }
    }
    bricks.retain(|b| b.is_solid());
}
