//! Drop table schema and the built-in tables.

use crate::core::constants::{BOSS_DROP_TABLE_ID, DEFAULT_DROP_TABLE_ID, ELITE_DROP_TABLE_ID};
use serde::{Deserialize, Serialize};

/// One independently rolled item entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    pub item_id: String,
    /// Probability in [0, 1]. The entry fires when a uniform draw is `<=` this.
    pub drop_rate: f64,
    pub min_count: u32,
    pub max_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTable {
    pub id: String,
    pub gold_min: u32,
    pub gold_max: u32,
    pub exp_min: u32,
    pub exp_max: u32,
    #[serde(default)]
    pub drops: Vec<DropEntry>,
    /// Chance of one extra piece of equipment from `equipment_pool`.
    #[serde(default)]
    pub equipment_chance: f64,
    #[serde(default)]
    pub equipment_pool: Vec<String>,
}

impl DropTable {
    /// Checks ranges and probabilities; returns a description of the first problem.
    pub fn check(&self) -> Result<(), String> {
        if self.gold_min > self.gold_max {
            return Err(format!("{}: gold_min {} > gold_max {}", self.id, self.gold_min, self.gold_max));
        }
        if self.exp_min > self.exp_max {
            return Err(format!("{}: exp_min {} > exp_max {}", self.id, self.exp_min, self.exp_max));
        }
        if !(0.0..=1.0).contains(&self.equipment_chance) {
            return Err(format!("{}: equipment_chance {} outside [0, 1]", self.id, self.equipment_chance));
        }
        for entry in &self.drops {
            if !(0.0..=1.0).contains(&entry.drop_rate) {
                return Err(format!("{}: {} drop_rate {} outside [0, 1]", self.id, entry.item_id, entry.drop_rate));
            }
            if entry.min_count > entry.max_count {
                return Err(format!("{}: {} min_count > max_count", self.id, entry.item_id));
            }
        }
        Ok(())
    }
}

fn entry(item_id: &str, drop_rate: f64, min_count: u32, max_count: u32) -> DropEntry {
    DropEntry {
        item_id: item_id.to_string(),
        drop_rate,
        min_count,
        max_count,
    }
}

fn pool(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

pub fn default_drop_tables() -> Vec<DropTable> {
    vec![
        DropTable {
            id: DEFAULT_DROP_TABLE_ID.to_string(),
            gold_min: 5,
            gold_max: 15,
            exp_min: 10,
            exp_max: 20,
            drops: vec![entry("POTION_HP_SMALL", 0.10, 1, 1)],
            equipment_chance: 0.08,
            equipment_pool: pool(&["WPN_001", "ARM_001"]),
        },
        DropTable {
            id: ELITE_DROP_TABLE_ID.to_string(),
            gold_min: 30,
            gold_max: 50,
            exp_min: 50,
            exp_max: 80,
            drops: vec![entry("POTION_HP_MEDIUM", 0.15, 1, 1)],
            equipment_chance: 0.20,
            equipment_pool: pool(&["WPN_001", "WPN_002", "ARM_001", "ARM_002", "HLM_002"]),
        },
        DropTable {
            id: BOSS_DROP_TABLE_ID.to_string(),
            gold_min: 100,
            gold_max: 200,
            exp_min: 200,
            exp_max: 300,
            drops: vec![entry("POTION_HP_LARGE", 0.50, 1, 2)],
            equipment_chance: 0.60,
            equipment_pool: pool(&["WPN_002", "WPN_003", "WPN_004", "ARM_002", "ARM_003"]),
        },
    ]
}
