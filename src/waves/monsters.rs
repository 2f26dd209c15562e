//! Monster catalog and live monster instances.

use super::types::MonsterHandle;
use crate::combat::{Combatant, Vec3};
use crate::core::constants::{BOSS_DROP_TABLE_ID, DEFAULT_DROP_TABLE_ID, ELITE_DROP_TABLE_ID};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MonsterTier {
    #[default]
    Normal,
    Elite,
    Boss,
}

impl MonsterTier {
    /// Drop table used when a monster does not name one.
    pub fn default_drop_table(self) -> &'static str {
        match self {
            MonsterTier::Normal => DEFAULT_DROP_TABLE_ID,
            MonsterTier::Elite => ELITE_DROP_TABLE_ID,
            MonsterTier::Boss => BOSS_DROP_TABLE_ID,
        }
    }
}

/// One entry of `monsters.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterConfig {
    pub id: String,
    pub name: String,
    pub tier: MonsterTier,
    pub base_hp: f64,
    pub base_attack: f64,
    pub base_defense: f64,
    pub move_speed: f64,
    pub gold_drop: u32,
    pub exp_drop: u32,
    #[serde(default)]
    pub drop_table: Option<String>,
}

impl MonsterConfig {
    pub fn drop_table_id(&self) -> &str {
        self.drop_table
            .as_deref()
            .unwrap_or_else(|| self.tier.default_drop_table())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MonsterCatalog {
    monsters: HashMap<String, MonsterConfig>,
}

impl MonsterCatalog {
    pub fn new(monsters: Vec<MonsterConfig>) -> Self {
        Self {
            monsters: monsters.into_iter().map(|m| (m.id.clone(), m)).collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_monsters())
    }

    pub fn get(&self, id: &str) -> Option<&MonsterConfig> {
        self.monsters.get(id)
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn monster(
    id: &str,
    name: &str,
    tier: MonsterTier,
    base_hp: f64,
    base_attack: f64,
    base_defense: f64,
    move_speed: f64,
    gold_drop: u32,
    exp_drop: u32,
) -> MonsterConfig {
    MonsterConfig {
        id: id.to_string(),
        name: name.to_string(),
        tier,
        base_hp,
        base_attack,
        base_defense,
        move_speed,
        gold_drop,
        exp_drop,
        drop_table: None,
    }
}

/// Built-in monsters covering the fallback rotation plus an elite and a boss.
pub fn default_monsters() -> Vec<MonsterConfig> {
    use MonsterTier::*;
    vec![
        monster("MON_SLIME_001", "Slime", Normal, 30.0, 5.0, 2.0, 2.0, 5, 10),
        monster("MON_GOBLIN_001", "Goblin", Normal, 50.0, 8.0, 4.0, 1.5, 8, 15),
        monster("MON_WOLF_001", "Grey Wolf", Normal, 70.0, 12.0, 5.0, 3.0, 12, 20),
        monster("MON_ELITE_001", "Goblin Captain", Elite, 180.0, 18.0, 8.0, 2.0, 40, 60),
        monster("MON_BOSS_001", "Wolf King", Boss, 500.0, 25.0, 12.0, 2.5, 120, 200),
    ]
}

// Stats an unconfigured monster spawns with.
const PLACEHOLDER_HP: u32 = 30;
const PLACEHOLDER_ATTACK: f64 = 5.0;
const PLACEHOLDER_DEFENSE: f64 = 2.0;
const PLACEHOLDER_MOVE_SPEED: f64 = 2.0;

/// A monster alive in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterInstance {
    pub handle: MonsterHandle,
    pub monster_id: String,
    pub name: String,
    pub tier: MonsterTier,
    pub max_hp: u32,
    pub current_hp: u32,
    pub attack: f64,
    pub defense: f64,
    pub move_speed: f64,
    pub gold_drop: u32,
    pub exp_drop: u32,
    pub drop_table_id: String,
    pub crit_rate: f64,
    pub crit_bonus: f64,
    pub position: Vec3,
    /// False when no stat entry existed for `monster_id`.
    pub configured: bool,
}

impl MonsterInstance {
    /// Builds a monster from its config, scaling hp/attack/defense by `multiplier`.
    pub fn from_config(handle: MonsterHandle, config: &MonsterConfig, multiplier: f64) -> Self {
        let max_hp = (config.base_hp * multiplier).round().max(1.0) as u32;
        Self {
            handle,
            monster_id: config.id.clone(),
            name: config.name.clone(),
            tier: config.tier,
            max_hp,
            current_hp: max_hp,
            attack: config.base_attack * multiplier,
            defense: config.base_defense * multiplier,
            move_speed: config.move_speed,
            gold_drop: config.gold_drop,
            exp_drop: config.exp_drop,
            drop_table_id: config.drop_table_id().to_string(),
            crit_rate: 0.0,
            crit_bonus: 0.0,
            position: Vec3::ZERO,
            configured: true,
        }
    }

    /// A monster whose id has no stat entry. It keeps placeholder stats.
    pub fn unconfigured(handle: MonsterHandle, monster_id: &str) -> Self {
        Self {
            handle,
            monster_id: monster_id.to_string(),
            name: monster_id.to_string(),
            tier: MonsterTier::Normal,
            max_hp: PLACEHOLDER_HP,
            current_hp: PLACEHOLDER_HP,
            attack: PLACEHOLDER_ATTACK,
            defense: PLACEHOLDER_DEFENSE,
            move_speed: PLACEHOLDER_MOVE_SPEED,
            gold_drop: 0,
            exp_drop: 0,
            drop_table_id: DEFAULT_DROP_TABLE_ID.to_string(),
            crit_rate: 0.0,
            crit_bonus: 0.0,
            position: Vec3::ZERO,
            configured: false,
        }
    }

    pub fn with_crit(mut self, crit_rate: f64, crit_bonus: f64) -> Self {
        self.crit_rate = crit_rate;
        self.crit_bonus = crit_bonus;
        self
    }

    /// Applies already-mitigated damage. Returns true if this blow killed it.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.current_hp = self.current_hp.saturating_sub(amount);
        self.is_dead()
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_boss(&self) -> bool {
        self.tier == MonsterTier::Boss
    }
}

impl Combatant for MonsterInstance {
    fn attack_power(&self) -> f64 {
        self.attack
    }

    fn defense(&self) -> f64 {
        self.defense
    }

    fn crit_rate(&self) -> f64 {
        self.crit_rate
    }

    fn crit_bonus(&self) -> f64 {
        self.crit_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{FALLBACK_BOSS_ID, FALLBACK_ELITE_ID, FALLBACK_ROTATION};

    #[test]
    fn test_defaults_cover_fallback_ids() {
        let catalog = MonsterCatalog::with_defaults();
        for id in FALLBACK_ROTATION.iter().chain([&FALLBACK_ELITE_ID, &FALLBACK_BOSS_ID]) {
            assert!(catalog.get(id).is_some(), "missing default monster {id}");
        }
    }

    #[test]
    fn test_tier_picks_drop_table() {
        let catalog = MonsterCatalog::with_defaults();
        assert_eq!(catalog.get("MON_SLIME_001").unwrap().drop_table_id(), "DROP_NORMAL");
        assert_eq!(catalog.get("MON_ELITE_001").unwrap().drop_table_id(), "DROP_ELITE");
        assert_eq!(catalog.get("MON_BOSS_001").unwrap().drop_table_id(), "DROP_BOSS");
    }

    #[test]
    fn test_explicit_drop_table_wins() {
        let mut config = default_monsters().remove(0);
        config.drop_table = Some("DROP_SLIME".to_string());
        assert_eq!(config.drop_table_id(), "DROP_SLIME");
    }

    #[test]
    fn test_multiplier_scales_combat_stats_only() {
        let config = MonsterCatalog::with_defaults().get("MON_GOBLIN_001").cloned().unwrap();
        let monster = MonsterInstance::from_config(MonsterHandle(1), &config, 1.3);
        assert_eq!(monster.max_hp, 65);
        assert!((monster.attack - 10.4).abs() < 1e-9);
        assert!((monster.defense - 5.2).abs() < 1e-9);
        assert_eq!(monster.gold_drop, config.gold_drop);
        assert_eq!(monster.exp_drop, config.exp_drop);
    }

    #[test]
    fn test_killing_blow_reported_once() {
        let mut monster = MonsterInstance::unconfigured(MonsterHandle(9), "MON_UNKNOWN");
        assert!(!monster.configured);
        assert!(!monster.take_damage(10));
        assert!(monster.take_damage(100));
        assert!(!monster.take_damage(100), "a dead monster cannot die again");
    }
}
