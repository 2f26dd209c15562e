use super::tables::{default_drop_tables, DropEntry, DropTable};
use crate::core::constants::DEFAULT_DROP_TABLE_ID;
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Everything one kill produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LootRoll {
    pub table_id: String,
    pub gold: u32,
    pub exp: u32,
    /// (item id, count) for each entry that fired.
    pub items: Vec<(String, u32)>,
    pub equipment: Option<String>,
}

/// Uniform integer in `[gold_min, gold_max]`.
pub fn roll_gold(table: &DropTable, rng: &mut impl Rng) -> u32 {
    roll_range(table.gold_min, table.gold_max, rng)
}

/// Uniform integer in `[exp_min, exp_max]`.
pub fn roll_exp(table: &DropTable, rng: &mut impl Rng) -> u32 {
    roll_range(table.exp_min, table.exp_max, rng)
}

fn roll_range(min: u32, max: u32, rng: &mut impl Rng) -> u32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Rolls a single entry: `Some(count)` if it fired.
pub fn roll_entry(entry: &DropEntry, rng: &mut impl Rng) -> Option<u32> {
    if rng.gen::<f64>() > entry.drop_rate {
        return None;
    }
    Some(roll_range(entry.min_count, entry.max_count, rng))
}

/// Every entry is rolled independently; any number may fire.
pub fn roll_drops(table: &DropTable, rng: &mut impl Rng) -> Vec<(String, u32)> {
    table
        .drops
        .iter()
        .filter_map(|entry| {
            roll_entry(entry, rng)
                .filter(|&count| count > 0)
                .map(|count| (entry.item_id.clone(), count))
        })
        .collect()
}

/// One roll against the equipment pool, picking an entry uniformly.
pub fn roll_equipment(table: &DropTable, rng: &mut impl Rng) -> Option<String> {
    if table.equipment_pool.is_empty() || table.equipment_chance <= 0.0 {
        return None;
    }
    if rng.gen::<f64>() > table.equipment_chance {
        return None;
    }
    let index = rng.gen_range(0..table.equipment_pool.len());
    table.equipment_pool.get(index).cloned()
}

pub fn roll_table(table: &DropTable, rng: &mut impl Rng) -> LootRoll {
    LootRoll {
        table_id: table.id.clone(),
        gold: roll_gold(table, rng),
        exp: roll_exp(table, rng),
        items: roll_drops(table, rng),
        equipment: roll_equipment(table, rng),
    }
}

/// Drop tables by id, with fallback to the normal table.
#[derive(Debug, Clone)]
pub struct LootEngine {
    tables: HashMap<String, DropTable>,
}

impl Default for LootEngine {
    fn default() -> Self {
        Self::new(default_drop_tables())
    }
}

impl LootEngine {
    pub fn new(tables: Vec<DropTable>) -> Self {
        Self {
            tables: tables.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    pub fn table(&self, id: &str) -> Option<&DropTable> {
        self.tables.get(id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Looks `id` up, falling back to `DROP_NORMAL`.
    pub fn resolve(&self, id: &str) -> Option<&DropTable> {
        if let Some(table) = self.tables.get(id) {
            return Some(table);
        }
        warn!(table = id, fallback = DEFAULT_DROP_TABLE_ID, "unknown drop table");
        self.tables.get(DEFAULT_DROP_TABLE_ID)
    }

    /// Rolls the named table. Returns an empty roll if even the fallback is missing.
    pub fn roll(&self, table_id: &str, rng: &mut impl Rng) -> LootRoll {
        match self.resolve(table_id) {
            Some(table) => {
                let roll = roll_table(table, rng);
                debug!(
                    table = %roll.table_id,
                    gold = roll.gold,
                    exp = roll.exp,
                    items = roll.items.len(),
                    equipment = ?roll.equipment,
                    "loot rolled"
                );
                roll
            }
            None => {
                warn!(table = table_id, "no drop table and no fallback, nothing dropped");
                LootRoll::default()
            }
        }
    }
}
