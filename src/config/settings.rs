//! Schema for `game_settings.json`.
//!
//! The file is parsed as a whole. A missing key is a parse error for the
//! whole section, never a silent per-field default.

use super::ConfigError;
use crate::character::MAX_LEVEL;
use crate::core::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub player: PlayerSettings,
    pub combat: CombatSettings,
    pub waves: WaveSettings,
    pub inventory_capacity: usize,
    pub autosave_interval_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub starting_gold: u64,
    pub starting_level: u32,
    pub base_max_hp: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub base_crit_rate: f64,
    /// Extra damage fraction on a crit: `damage * (1 + base_crit_bonus)`.
    pub base_crit_bonus: f64,
    pub move_speed: f64,
    pub attack_range: f64,
    pub attack_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSettings {
    pub min_damage: u32,
    pub monster_crit_rate: f64,
    pub monster_crit_bonus: f64,
    /// Share of stage rewards paid out on defeat.
    pub partial_reward_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSettings {
    pub monsters_per_wave: u32,
    pub default_wave_count: u32,
    pub spawn_interval_secs: f64,
    pub inter_wave_delay_secs: f64,
    /// Spawning pauses while this many monsters are alive. `None` is unbounded.
    pub max_active_monsters: Option<u32>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            player: PlayerSettings::default(),
            combat: CombatSettings::default(),
            waves: WaveSettings::default(),
            inventory_capacity: DEFAULT_INVENTORY_CAPACITY,
            autosave_interval_secs: AUTOSAVE_INTERVAL_SECONDS,
        }
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            starting_gold: DEFAULT_STARTING_GOLD,
            starting_level: DEFAULT_STARTING_LEVEL,
            base_max_hp: DEFAULT_BASE_MAX_HP,
            base_attack: DEFAULT_BASE_ATTACK,
            base_defense: DEFAULT_BASE_DEFENSE,
            base_crit_rate: DEFAULT_BASE_CRIT_RATE,
            base_crit_bonus: DEFAULT_BASE_CRIT_BONUS,
            move_speed: DEFAULT_MOVE_SPEED,
            attack_range: DEFAULT_ATTACK_RANGE,
            attack_speed: DEFAULT_ATTACK_SPEED,
        }
    }
}

impl Default for CombatSettings {
    fn default() -> Self {
        Self {
            min_damage: DEFAULT_MIN_DAMAGE,
            monster_crit_rate: DEFAULT_MONSTER_CRIT_RATE,
            monster_crit_bonus: DEFAULT_MONSTER_CRIT_BONUS,
            partial_reward_ratio: DEFAULT_PARTIAL_REWARD_RATIO,
        }
    }
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            monsters_per_wave: DEFAULT_MONSTERS_PER_WAVE,
            default_wave_count: DEFAULT_WAVE_COUNT,
            spawn_interval_secs: DEFAULT_SPAWN_INTERVAL_SECONDS,
            inter_wave_delay_secs: DEFAULT_INTER_WAVE_DELAY_SECONDS,
            max_active_monsters: None,
        }
    }
}

impl GameSettings {
    /// Rejects values that would break an invariant downstream.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("player.base_crit_rate", self.player.base_crit_rate),
            ("combat.monster_crit_rate", self.combat.monster_crit_rate),
            ("combat.partial_reward_ratio", self.combat.partial_reward_ratio),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid("game_settings", format!("{field} must be in [0, 1], got {value}")));
            }
        }
        if !(1..=MAX_LEVEL).contains(&self.player.starting_level) {
            return Err(ConfigError::invalid(
                "game_settings",
                format!("player.starting_level must be in 1..={MAX_LEVEL}, got {}", self.player.starting_level),
            ));
        }
        if self.player.base_max_hp == 0 {
            return Err(ConfigError::invalid("game_settings", "player.base_max_hp must be positive"));
        }
        if self.waves.monsters_per_wave == 0 || self.waves.default_wave_count == 0 {
            return Err(ConfigError::invalid(
                "game_settings",
                "waves.monsters_per_wave and waves.default_wave_count must be positive",
            ));
        }
        if self.waves.spawn_interval_secs < 0.0 || self.waves.inter_wave_delay_secs < 0.0 {
            return Err(ConfigError::invalid("game_settings", "wave timings cannot be negative"));
        }
        if self.waves.max_active_monsters == Some(0) {
            return Err(ConfigError::invalid("game_settings", "waves.max_active_monsters cannot be 0"));
        }
        if self.inventory_capacity == 0 {
            return Err(ConfigError::invalid("game_settings", "inventory_capacity must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn test_crit_rate_out_of_range_rejected() {
        let mut settings = GameSettings::default();
        settings.player.base_crit_rate = 1.5;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_starting_level_outside_table_rejected() {
        let mut settings = GameSettings::default();
        settings.player.starting_level = 0;
        assert!(settings.validate().is_err());
        settings.player.starting_level = MAX_LEVEL;
        assert!(settings.validate().is_ok());
        settings.player.starting_level = 500_000_000;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_zero_active_cap_rejected() {
        let mut settings = GameSettings::default();
        settings.waves.max_active_monsters = Some(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_key_is_a_parse_error() {
        let json = r#"{ "player": {}, "combat": {}, "waves": {} }"#;
        assert!(serde_json::from_str::<GameSettings>(json).is_err());
    }
}
