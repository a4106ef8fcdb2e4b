//! Engine Configuration
//!
//! All tuning lives here and is passed by reference into every operation
//! that needs it. The engine never mutates configuration.
//!
//! Configuration can be loaded from a JSON document. Every section is
//! `#[serde(default)]`, so a partial document only overrides what it names:
//!
//! ```
//! use rune_match::config::RuneMatchConfig;
//!
//! let config = RuneMatchConfig::from_json_str(r#"{ "combat": { "cascade_bonus": 4 } }"#).unwrap();
//! assert_eq!(config.combat.cascade_bonus, 4);
//! assert_eq!(config.combat.match3_damage, 6);
//! ```

use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::EngineError;
use crate::game::state::MonsterType;

/// Grid dimensions and generation budgets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
    /// Candidate draws per cell during initial generation
    pub generation_attempts: u32,
    /// Candidate draws per cell during gravity refill
    pub refill_attempts: u32,
    /// Runaway guard for the cascade loop
    pub max_cascades: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            columns: 6,
            generation_attempts: 100,
            refill_attempts: 20,
            max_cascades: 100,
        }
    }
}

/// Damage tiers and monster pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Base damage for a 2-tile group
    pub match2_damage: u32,
    /// Base damage for a 3-tile group
    pub match3_damage: u32,
    /// Base damage for a 4-tile group
    pub match4_damage: u32,
    /// Base damage for groups of 5 or more
    pub match5_damage: u32,
    /// Multiplier applied when the group matches the power word
    pub power_multiplier: u32,
    /// Flat bonus for an intersecting (L/T/cross) group
    pub l_shape_bonus: u32,
    /// Flat bonus per cascade level beyond the first
    pub cascade_bonus: u32,
    /// Milliseconds between monster attacks
    pub attack_interval_ms: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            match2_damage: 3,
            match3_damage: 6,
            match4_damage: 10,
            match5_damage: 15,
            power_multiplier: 2,
            l_shape_bonus: 5,
            cascade_bonus: 2,
            attack_interval_ms: 5000,
        }
    }
}

/// Power-up spawning and effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Probability in [0, 1] that a freshly sampled rune is a power-up
    pub spawn_rate: f64,
    /// HP restored per matched heal tile
    pub heal_per_tile: u32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            spawn_rate: 0.1,
            heal_per_tile: 5,
        }
    }
}

/// Player vitals and session allowances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting and maximum HP
    pub max_hp: u32,
    /// Grid shuffles available per session
    pub shuffles: u32,
    /// Move hints available per session
    pub hints: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_hp: 100,
            shuffles: 3,
            hints: 3,
        }
    }
}

/// Stats for one monster type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterStats {
    /// Starting and maximum HP
    pub hp: u32,
    /// Upper bound of the attack roll
    pub attack: u32,
    /// XP granted on victory
    pub xp_reward: u32,
}

/// Stats for every selectable monster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterRoster {
    /// Weak but fast
    pub goblin: MonsterStats,
    /// Restless undead
    pub skeleton: MonsterStats,
    /// A fierce warrior
    pub orc: MonsterStats,
    /// The ultimate challenge
    pub dragon: MonsterStats,
}

impl MonsterRoster {
    /// Look up stats for a monster type.
    pub fn stats(&self, monster_type: MonsterType) -> MonsterStats {
        match monster_type {
            MonsterType::Goblin => self.goblin,
            MonsterType::Skeleton => self.skeleton,
            MonsterType::Orc => self.orc,
            MonsterType::Dragon => self.dragon,
        }
    }
}

impl Default for MonsterRoster {
    fn default() -> Self {
        Self {
            goblin: MonsterStats { hp: 50, attack: 10, xp_reward: 3 },
            skeleton: MonsterStats { hp: 80, attack: 12, xp_reward: 5 },
            orc: MonsterStats { hp: 120, attack: 15, xp_reward: 8 },
            dragon: MonsterStats { hp: 200, attack: 20, xp_reward: 15 },
        }
    }
}

/// Feedback timings and floating text motion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Monster attack pose duration (ms)
    pub attack_anim_ms: u32,
    /// Monster hurt pose duration (ms)
    pub hurt_anim_ms: u32,
    /// Monster death pose duration (ms)
    pub death_anim_ms: u32,
    /// Lifetime of combat floating texts (ms)
    pub floating_text_ms: u32,
    /// Lifetime of the "No Match!" text (ms)
    pub no_match_text_ms: u32,
    /// Time for a full shake pulse to decay to zero (ms)
    pub shake_decay_ms: u32,
    /// Horizontal text drift per second (px)
    pub text_drift_x: f32,
    /// Vertical text drift per second (px, negative is up)
    pub text_drift_y: f32,
    /// Scale added by the end of a text's life
    pub text_scale_growth: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            attack_anim_ms: 500,
            hurt_anim_ms: 500,
            death_anim_ms: 2000,
            floating_text_ms: 3000,
            no_match_text_ms: 1500,
            shake_decay_ms: 500,
            text_drift_x: 40.0,
            text_drift_y: -80.0,
            text_scale_growth: 0.8,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuneMatchConfig {
    /// Grid dimensions and budgets
    pub grid: GridConfig,
    /// Damage and pacing
    pub combat: CombatConfig,
    /// Power-up spawning and effects
    pub power_ups: PowerUpConfig,
    /// Player vitals
    pub player: PlayerConfig,
    /// Monster roster
    pub monsters: MonsterRoster,
    /// Feedback timings
    pub timing: TimingConfig,
}

impl RuneMatchConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |msg: &str| Err(EngineError::InvalidConfig(msg.to_string()));

        if self.grid.rows == 0 || self.grid.columns == 0 {
            return invalid("grid dimensions must be non-zero");
        }
        if !(0.0..=1.0).contains(&self.power_ups.spawn_rate) {
            return invalid("power_ups.spawn_rate must be within [0, 1]");
        }
        if self.combat.attack_interval_ms == 0 {
            return invalid("combat.attack_interval_ms must be > 0");
        }
        if self.player.max_hp == 0 {
            return invalid("player.max_hp must be > 0");
        }
        if self.timing.floating_text_ms == 0 || self.timing.no_match_text_ms == 0 {
            return invalid("floating text durations must be > 0");
        }
        if self.timing.shake_decay_ms == 0 {
            return invalid("timing.shake_decay_ms must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RuneMatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RuneMatchConfig::from_json_str(
            r#"{ "grid": { "rows": 8 }, "power_ups": { "spawn_rate": 0.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.grid.rows, 8);
        assert_eq!(config.grid.columns, 6);
        assert_eq!(config.power_ups.spawn_rate, 0.0);
        assert_eq!(config.power_ups.heal_per_tile, 5);
        assert_eq!(config.monsters.goblin.hp, 50);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = RuneMatchConfig::from_json_str(r#"{ "grid": { "columns": 0 } }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));

        let err = RuneMatchConfig::from_json_str(r#"{ "power_ups": { "spawn_rate": 1.5 } }"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));

        let err = RuneMatchConfig::from_json_str(r#"{ "combat": { "attack_interval_ms": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = RuneMatchConfig::from_json_str("{ grid: ").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RuneMatchConfig::from_path("/definitely/not/here/rune-match.json").unwrap_err();
        assert!(matches!(err, EngineError::ConfigIo(_)));
    }

    #[test]
    fn test_roster_lookup() {
        let roster = MonsterRoster::default();
        assert_eq!(roster.stats(MonsterType::Goblin).attack, 10);
        assert_eq!(roster.stats(MonsterType::Dragon).hp, 200);
    }
}
