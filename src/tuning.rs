//! Game balance tuning
//!
//! Every gameplay number that a designer might want to tweak. Velocities are
//! in pixels per tick, durations in seconds.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::secs_to_ticks;

/// Data-driven balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Downward acceleration applied every tick
    pub gravity: f32,
    /// Horizontal walking speed
    pub move_speed: f32,
    /// Initial upward speed of a jump
    pub jump_power: f32,
    /// Jumps available before touching ground again (2 = double jump)
    pub max_jumps: u32,

    // === World ===
    pub world_width: f32,
    /// Levels in a full run
    pub total_levels: u32,

    // === Combat ===
    /// How deep the protagonist's feet may sink into an enemy and still stomp
    pub stomp_margin: f32,
    /// Invincibility window after a stomp, in ticks
    pub invincible_frames: u32,
    /// Hard ceiling on enemy population
    pub max_enemies: u32,
    /// Chance that breaking a brick ejects coins
    pub brick_coin_chance: f64,

    // === Enemies ===
    /// Chance to walk off a non-ground edge instead of turning around
    pub enemy_drop_chance: f64,
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,

    // === Progression ===
    /// Flag token rise per tick
    pub flag_raise_speed: f32,
    /// Protagonist slide speed down the pole
    pub flag_slide_speed: f32,
    /// Delay between touching down at the pole and loading the next level
    pub transition_delay_secs: f32,
    /// Post-load window during which input is ignored
    pub input_lock_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            move_speed: 3.0,
            jump_power: 12.0,
            max_jumps: 2,

            world_width: 2000.0,
            total_levels: 15,

            stomp_margin: 30.0,
            invincible_frames: 45,
            max_enemies: 1 << 15,
            brick_coin_chance: 0.33,

            enemy_drop_chance: 0.5,
            enemy_speed_min: 1.2,
            enemy_speed_max: 2.0,

            flag_raise_speed: 8.0,
            flag_slide_speed: 2.0,
            transition_delay_secs: 1.2,
            input_lock_secs: 3.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the active config)
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: String| Err(SimError::InvalidTuning(msg));

        if !(self.gravity > 0.0) {
            return invalid(format!("gravity must be positive, got {}", self.gravity));
        }
        if !(self.move_speed >= 0.0) || !(self.jump_power >= 0.0) {
            return invalid("move_speed and jump_power must be non-negative".into());
        }
        if self.max_jumps == 0 {
            return invalid("max_jumps must be at least 1".into());
        }
        if self.total_levels == 0 {
            return invalid("total_levels must be at least 1".into());
        }
        if self.max_enemies == 0 {
            return invalid("max_enemies must be at least 1".into());
        }
        let min_width = ENEMY_SPAWN_SAFE_X + FLAG_OFFSET_X + BRICK_WIDTH * 5.0 + GEN_MARGIN_X;
        if !(self.world_width >= min_width) {
            return invalid(format!(
                "world_width must be at least {min_width}, got {}",
                self.world_width
            ));
        }
        for (name, p) in [
            ("brick_coin_chance", self.brick_coin_chance),
            ("enemy_drop_chance", self.enemy_drop_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} must be within [0, 1], got {p}"));
            }
        }
        if !(self.enemy_speed_min > 0.0) || !(self.enemy_speed_max > self.enemy_speed_min) {
            return invalid(format!(
                "enemy speed band [{}, {}) is empty",
                self.enemy_speed_min, self.enemy_speed_max
            ));
        }
        if !(self.flag_raise_speed > 0.0) || !(self.flag_slide_speed > 0.0) {
            return invalid("flag speeds must be positive".into());
        }
        Ok(())
    }

    /// Deferred level-transition delay in ticks
    pub fn transition_delay_ticks(&self) -> u32 {
        secs_to_ticks(self.transition_delay_secs).max(1)
    }

    /// Input lock duration in ticks
    pub fn input_lock_ticks(&self) -> u32 {
        secs_to_ticks(self.input_lock_secs)
    }

    /// Enemy population for a level: doubles every level, capped
    pub fn enemy_count(&self, level: u32) -> u32 {
        let doublings = level.saturating_sub(1);
        let count = 1u64
            .checked_shl(doublings)
            .filter(|_| doublings < 63)
            .map_or(u64::MAX, |pow| pow.saturating_mul(2));
        count.min(self.max_enemies as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_enemy_count_doubles_and_caps() {
        let tuning = Tuning::default();
        assert_eq!(tuning.enemy_count(1), 2);
        assert_eq!(tuning.enemy_count(2), 4);
        assert_eq!(tuning.enemy_count(4), 16);
        assert_eq!(tuning.enemy_count(15), 32768);
        assert_eq!(tuning.enemy_count(20), 32768);
        assert_eq!(tuning.enemy_count(200), 32768);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "total_levels": 3, "gravity": 0.8 }"#).unwrap();
        assert_eq!(tuning.total_levels, 3);
        assert!((tuning.gravity - 0.8).abs() < f32::EPSILON);
        assert_eq!(tuning.max_jumps, 2);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(SimError::TuningParse(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "total_levels": 0 }"#),
            Err(SimError::InvalidTuning(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "enemy_drop_chance": 1.5 }"#),
            Err(SimError::InvalidTuning(_))
        ));
    }

    #[test]
    fn test_time_conversion() {
        let tuning = Tuning::default();
        assert_eq!(tuning.transition_delay_ticks(), 72);
        assert_eq!(tuning.input_lock_ticks(), 180);
    }
}
