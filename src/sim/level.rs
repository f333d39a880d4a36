//! Procedural level generation
//!
//! Later levels get fewer platforms and more bricks, coins and enemies. All
//! placement is rejection-sampled with a fixed attempt budget; when the
//! budget runs out the level simply has fewer entities.

use rand::Rng;

use super::rect::Rect;
use super::state::{Brick, Coin, Enemy, Flag, Platform, World};
use crate::consts::*;
use crate::tuning::Tuning;

/// Floating platforms available to a level, in order. Y is re-rolled per level.
const BASE_PLATFORMS: [(f32, f32); 7] = [
    (200.0, 100.0),
    (400.0, 100.0),
    (600.0, 80.0),
    (900.0, 120.0),
    (1200.0, 100.0),
    (1500.0, 120.0),
    (1800.0, 100.0),
];
const PLATFORM_HEIGHT: f32 = 15.0;
/// Platforms per level never drops below this (ground included)
const MIN_PLATFORMS: u32 = 5;

/// Relative weights for brick run lengths 1..=5
const BRICK_RUN_WEIGHTS: [u32; 5] = [30, 30, 30, 9, 1];
const MAX_BRICK_RUN: u32 = BRICK_RUN_WEIGHTS.len() as u32;

/// Placement attempt budgets
const BRICK_ATTEMPTS: u32 = 1000;
const COIN_ATTEMPTS: u32 = 1000;
const ENEMY_SPAWN_ATTEMPTS: u32 = 20;

/// Build the complete world for `level` (1-based)
pub fn generate_level<R: Rng + ?Sized>(level: u32, tuning: &Tuning, rng: &mut R) -> World {
    let level = level.max(1);
    let width = tuning.world_width;

    let platforms = generate_platforms(level, width, rng);
    let bricks = generate_bricks(level, width, &platforms, rng);

    let mut avoid: Vec<Rect> = platforms.iter().map(|p| p.rect).collect();
    avoid.extend(bricks.iter().map(|b| b.rect));
    let coins = generate_coins(level, width, &avoid, rng);

    let enemy_target = tuning.enemy_count(level);
    let enemies = generate_enemies(enemy_target, &platforms[0], &bricks, tuning, rng);

    log::info!(
        "Level {}: platforms={}, bricks={}, coins={}, enemies={}",
        level,
        platforms.len(),
        bricks.len(),
        coins.len(),
        enemies.len()
    );

    World {
        width,
        level,
        total_levels: tuning.total_levels,
        platforms,
        bricks,
        coins,
        enemies,
        flag: Flag::at_world_edge(width),
    }
}

/// Number of platforms (ground included) for a level
pub fn platform_count(level: u32) -> u32 {
    (BASE_PLATFORMS.len() as u32 + 1)
        .saturating_sub(level / 2)
        .max(MIN_PLATFORMS)
}

/// Bricks requested for a level
pub fn brick_count(level: u32) -> u32 {
    6 + level.min(6)
}

/// Coins requested for a level
pub fn coin_count(level: u32) -> u32 {
    8 + (level * 2).min(12)
}

/// Random whole number in `[min, min + span)`
fn roll_floor<R: Rng + ?Sized>(rng: &mut R, min: f32, span: f32) -> f32 {
    min + (rng.random::<f32>() * span.max(0.0)).floor()
}

fn generate_platforms<R: Rng + ?Sized>(level: u32, width: f32, rng: &mut R) -> Vec<Platform> {
    let count = platform_count(level) as usize;
    let mut platforms = Vec::with_capacity(count);
    platforms.push(Platform {
        rect: Rect::new(0.0, GROUND_Y, width, GROUND_HEIGHT),
    });

    for &(x, w) in BASE_PLATFORMS.iter().take(count - 1) {
        if x + w > width {
            continue;
        }
        let y = roll_floor(rng, GEN_MIN_Y, GEN_BAND);
        platforms.push(Platform {
            rect: Rect::new(x, y, w, PLATFORM_HEIGHT),
        });
    }
    platforms
}

/// Weighted brick run length
fn brick_run_len<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let total: u32 = BRICK_RUN_WEIGHTS.iter().sum();
    let mut roll = rng.random_range(0..total);
    for (i, &w) in BRICK_RUN_WEIGHTS.iter().enumerate() {
        if roll < w {
            return i as u32 + 1;
        }
        roll -= w;
    }
    1
}

fn generate_bricks<R: Rng + ?Sized>(
    level: u32,
    width: f32,
    platforms: &[Platform],
    rng: &mut R,
) -> Vec<Brick> {
    let target = brick_count(level);
    let unbreakable = target / 2;
    let mut avoid: Vec<Rect> = platforms.iter().map(|p| p.rect).collect();
    let mut bricks: Vec<Brick> = Vec::with_capacity(target as usize);

    let mut attempts = 0;
    while (bricks.len() as u32) < target && attempts < BRICK_ATTEMPTS {
        attempts += 1;

        let remaining = target - bricks.len() as u32;
        let run = brick_run_len(rng).min(remaining).min(MAX_BRICK_RUN);
        let run_width = BRICK_WIDTH * run as f32;
        let x = roll_floor(rng, GEN_MARGIN_X, width - run_width - GEN_MARGIN_X);
        let y = roll_floor(rng, GEN_MIN_Y, GEN_BAND);

        let run_rect = Rect::new(x, y, run_width, BRICK_HEIGHT);
        if avoid.iter().any(|area| run_rect.collides(area)) {
            continue;
        }

        for i in 0..run {
            let rect = Rect::new(x + i as f32 * BRICK_WIDTH, y, BRICK_WIDTH, BRICK_HEIGHT);
            let breakable = bricks.len() as u32 >= unbreakable;
            bricks.push(Brick::new(rect, breakable));
            avoid.push(rect);
        }
    }

    if (bricks.len() as u32) < target {
        log::warn!(
            "Level {level}: placed {} of {target} bricks before running out of attempts",
            bricks.len()
        );
    }
    bricks
}

fn generate_coins<R: Rng + ?Sized>(
    level: u32,
    width: f32,
    avoid: &[Rect],
    rng: &mut R,
) -> Vec<Coin> {
    let target = coin_count(level) as usize;
    let mut coins: Vec<Coin> = Vec::with_capacity(target);

    let mut attempts = 0;
    while coins.len() < target && attempts < COIN_ATTEMPTS {
        attempts += 1;
        let x = roll_floor(rng, GEN_MARGIN_X, width - COIN_SIZE - GEN_MARGIN_X);
        let y = roll_floor(rng, GEN_MIN_Y, GEN_BAND - GEN_MIN_Y);
        let coin = Coin::fixed(x, y);

        let blocked = avoid.iter().any(|a| coin.rect.collides(a))
            || coins.iter().any(|c| coin.rect.collides(&c.rect));
        if !blocked {
            coins.push(coin);
        }
    }

    if coins.len() < target {
        log::warn!(
            "Level {level}: placed {} of {target} coins before running out of attempts",
            coins.len()
        );
    }
    coins
}

fn generate_enemies<R: Rng + ?Sized>(
    count: u32,
    ground: &Platform,
    bricks: &[Brick],
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Enemy> {
    // Enemies stand on the ground or on bricks that can never disappear
    let surfaces: Vec<Rect> = std::iter::once(ground.rect)
        .chain(bricks.iter().filter(|b| !b.breakable).map(|b| b.rect))
        .collect();

    let mut enemies = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut surface = surfaces[0];
        let mut x = surface.x;
        for _ in 0..ENEMY_SPAWN_ATTEMPTS {
            surface = surfaces[rng.random_range(0..surfaces.len())];
            let min_x = surface.x;
            let max_x = (surface.right() - ENEMY_WIDTH).max(min_x);
            x = rng.random_range(min_x as i32..=max_x as i32) as f32;
            if x >= ENEMY_SPAWN_SAFE_X {
                break;
            }
        }

        let y = surface.y - ENEMY_HEIGHT;
        let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let speed = rng.random_range(tuning.enemy_speed_min..tuning.enemy_speed_max);
        enemies.push(Enemy::new(x, y, speed, dir));
    }
    enemies
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn level(level: u32, seed: u64) -> World {
        let mut rng = Pcg32::seed_from_u64(seed);
        generate_level(level, &Tuning::default(), &mut rng)
    }

    #[test]
    fn test_platform_count_shrinks_with_floor() {
        assert_eq!(platform_count(1), 8);
        assert_eq!(platform_count(2), 7);
        assert_eq!(platform_count(6), 5);
        assert_eq!(platform_count(15), 5);
    }

    #[test]
    fn test_ground_is_first_platform() {
        let world = level(3, 7);
        let ground = world.platforms[0].rect;
        assert_eq!(ground, Rect::new(0.0, GROUND_Y, 2000.0, GROUND_HEIGHT));
        for p in &world.platforms[1..] {
            assert!(p.rect.y >= GEN_MIN_Y && p.rect.y < GEN_MIN_Y + GEN_BAND);
        }
    }

    #[test]
    fn test_bricks_do_not_overlap() {
        for seed in 0..20 {
            let world = level(5, seed);
            for (i, a) in world.bricks.iter().enumerate() {
                for p in &world.platforms {
                    assert!(!a.rect.collides(&p.rect), "brick overlaps platform");
                }
                for b in &world.bricks[i + 1..] {
                    assert!(!a.rect.collides(&b.rect), "bricks overlap");
                }
            }
        }
    }

    #[test]
    fn test_earliest_bricks_are_unbreakable() {
        let world = level(6, 99);
        let unbreakable = world.bricks.iter().filter(|b| !b.breakable).count();
        assert_eq!(unbreakable, (brick_count(6) / 2).min(world.bricks.len() as u32) as usize);
        let first_breakable = world.bricks.iter().position(|b| b.breakable);
        if let Some(idx) = first_breakable {
            assert!(world.bricks[idx..].iter().all(|b| b.breakable));
        }
    }

    #[test]
    fn test_coins_clear_of_geometry() {
        let world = level(4, 3);
        assert!(world.coins.len() as u32 <= coin_count(4));
        for (i, c) in world.coins.iter().enumerate() {
            assert!(world.obstacles().all(|o| !c.rect.collides(&o)));
            for other in &world.coins[i + 1..] {
                assert!(!c.rect.collides(&other.rect));
            }
        }
    }

    #[test]
    fn test_enemy_population() {
        assert_eq!(level(1, 1).enemies.len(), 2);
        assert_eq!(level(4, 1).enemies.len(), 16);
    }

    #[test]
    fn test_enemies_stand_on_surfaces() {
        let world = level(5, 11);
        let ground = world.platforms[0].rect;
        for e in &world.enemies {
            let on_ground = e.rect.bottom() == ground.y;
            let on_brick = world
                .bricks
                .iter()
                .any(|b| !b.breakable && e.rect.bottom() == b.rect.y && e.rect.overlaps_x(&b.rect));
            assert!(on_ground || on_brick);
            assert!(e.speed >= 1.2 && e.speed < 2.0);
            assert!(e.dir == 1.0 || e.dir == -1.0);
        }
    }

    #[test]
    fn test_flag_at_right_edge() {
        let world = level(1, 5);
        assert_eq!(world.flag.rect.x, 1960.0);
        assert_eq!(world.flag.rect.bottom(), GROUND_Y);
    }

    #[test]
    fn test_same_seed_same_level() {
        let a = level(3, 42);
        let b = level(3, 42);
        assert_eq!(a.bricks, b.bricks);
        assert_eq!(a.coins, b.coins);
        assert_eq!(a.enemies, b.enemies);
    }

    #[test]
    fn test_run_length_distribution_bounds() {
        let mut rng = Pcg32::seed_from_u64(0);
        for _ in 0..1000 {
            let len = brick_run_len(&mut rng);
            assert!((1..=5).contains(&len));
        }
    }
}
