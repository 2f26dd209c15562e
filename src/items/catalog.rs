//! Item and equipment catalogs, plus the built-in defaults used when no
//! catalog file is present.

use super::types::{Equipment, EquipmentSlot, ItemDef, ItemKind, Quality};
use crate::core::constants::DEFAULT_MAX_STACK;
use std::collections::HashMap;

/// Every item id the simulation knows about.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    equipment: HashMap<String, Equipment>,
    items: HashMap<String, ItemDef>,
}

impl ItemCatalog {
    pub fn new(equipment: Vec<Equipment>, items: Vec<ItemDef>) -> Self {
        Self {
            equipment: equipment.into_iter().map(|e| (e.id.clone(), e)).collect(),
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_equipment(), default_items())
    }

    pub fn equipment(&self, id: &str) -> Option<&Equipment> {
        self.equipment.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn is_equipment(&self, id: &str) -> bool {
        self.equipment.contains_key(id)
    }

    /// Stack cap for an id. Equipment never stacks; unknown ids use the default cap.
    pub fn max_stack(&self, id: &str) -> u32 {
        if self.is_equipment(id) {
            return 1;
        }
        self.items
            .get(id)
            .map(|def| def.max_stack.max(1))
            .unwrap_or(DEFAULT_MAX_STACK)
    }

    /// Display name, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        if let Some(equipment) = self.equipment.get(id) {
            return &equipment.name;
        }
        if let Some(def) = self.items.get(id) {
            return &def.name;
        }
        id
    }

    /// Gold paid per unit when selling. Zero for unknown or unsellable ids.
    pub fn sell_price(&self, id: &str) -> u32 {
        if let Some(equipment) = self.equipment.get(id) {
            return equipment.sell_price;
        }
        self.items.get(id).map(|def| def.sell_price).unwrap_or(0)
    }

    pub fn equipment_count(&self) -> usize {
        self.equipment.len()
    }
}

#[allow(clippy::too_many_arguments)]
fn gear(
    id: &str,
    name: &str,
    slot: EquipmentSlot,
    quality: Quality,
    level_requirement: u32,
    attack_bonus: u32,
    defense_bonus: u32,
    hp_bonus: u32,
    crit_rate_bonus: f64,
    description: &str,
) -> Equipment {
    Equipment {
        id: id.to_string(),
        name: name.to_string(),
        slot,
        quality,
        level_requirement,
        attack_bonus,
        defense_bonus,
        hp_bonus,
        crit_rate_bonus,
        description: description.to_string(),
        sell_price: quality.base_sell_price(),
    }
}

/// Built-in equipment catalog.
pub fn default_equipment() -> Vec<Equipment> {
    use EquipmentSlot::*;
    use Quality::*;

    vec![
        // Weapons
        gear("WPN_001", "Training Sword", Weapon, White, 1, 5, 0, 0, 0.01, "A crude wooden sword"),
        gear("WPN_002", "Iron Sword", Weapon, Green, 5, 15, 0, 0, 0.03, "A plain iron blade"),
        gear("WPN_003", "Steel Sword", Weapon, Blue, 10, 30, 0, 0, 0.05, "A keen steel blade"),
        gear("WPN_004", "Hunter Bow", Weapon, Green, 8, 20, 0, 0, 0.04, "A ranged hunting bow"),
        gear("WPN_005", "Shadow Edge", Weapon, Purple, 15, 50, 0, 0, 0.08, "A blade forged in shadow"),
        gear("WPN_006", "Dragonfang Greatsword", Weapon, Orange, 20, 80, 5, 50, 0.12, "Carved from a dragon's fang"),
        gear("WPN_007", "Thunder Warbow", Weapon, Purple, 15, 45, 0, 20, 0.10, "Crackles with lightning"),
        // Armor
        gear("ARM_001", "Cloth Armor", Armor, White, 1, 0, 3, 10, 0.0, "Plain cloth armor"),
        gear("ARM_002", "Leather Armor", Armor, Green, 5, 0, 8, 25, 0.0, "Light leather armor"),
        gear("ARM_003", "Chainmail", Armor, Blue, 10, 0, 15, 50, 0.0, "Medium chain armor"),
        gear("ARM_004", "Plate Armor", Armor, Purple, 15, 0, 25, 80, 0.0, "Heavy plate armor"),
        gear("ARM_005", "Mithril Mail", Armor, Purple, 15, 0, 35, 120, 0.0, "Light yet sturdy"),
        gear("ARM_006", "Dragonscale Armor", Armor, Orange, 20, 10, 50, 200, 0.03, "Woven from dragon scales"),
        // Helmets
        gear("HLM_001", "Leather Cap", Helmet, White, 1, 0, 2, 5, 0.0, "A simple leather cap"),
        gear("HLM_002", "Iron Helm", Helmet, Green, 5, 0, 5, 15, 0.02, "A solid iron helm"),
        gear("HLM_003", "Griffin Helm", Helmet, Blue, 10, 5, 10, 30, 0.02, "Worn by griffin knights"),
        gear("HLM_004", "Darkgold Crown", Helmet, Purple, 15, 10, 15, 60, 0.05, "A crown of dark gold"),
        // Pants
        gear("PNT_001", "Cloth Pants", Pants, White, 1, 0, 2, 5, 0.0, "Ordinary cloth pants"),
        gear("PNT_002", "Leather Pants", Pants, Green, 5, 0, 5, 12, 0.0, "Sturdy leather pants"),
        gear("PNT_003", "Iron Greaves", Pants, Blue, 10, 0, 10, 25, 0.0, "Iron leg guards"),
        gear("PNT_004", "Shadowwalker Greaves", Pants, Purple, 15, 8, 18, 50, 0.04, "Quiet as a shadow"),
        // Rings
        gear("RNG_001", "Copper Ring", Ring, White, 1, 2, 0, 0, 0.01, "A plain copper ring"),
        gear("RNG_002", "Silver Ring", Ring, Green, 5, 5, 0, 0, 0.03, "A fine silver ring"),
        gear("RNG_003", "Flame Ring", Ring, Blue, 10, 12, 0, 10, 0.05, "Warm to the touch"),
        gear("RNG_004", "Frostwyrm Ring", Ring, Purple, 15, 20, 5, 30, 0.08, "Seals a frost wyrm's power"),
        // Necklaces
        gear("NCK_001", "Charm", Necklace, White, 1, 0, 1, 10, 0.0, "Brings a little luck"),
        gear("NCK_002", "Life Pendant", Necklace, Green, 5, 0, 2, 30, 0.0, "Bolsters vitality"),
        gear("NCK_003", "Guardian Relic", Necklace, Blue, 10, 3, 8, 60, 0.02, "Relic of the guardians"),
        gear("NCK_004", "Undying Heart", Necklace, Purple, 15, 8, 12, 120, 0.05, "A heart that will not stop"),
    ]
}

fn potion(id: &str, name: &str, max_stack: u32, sell_price: u32, heal_amount: u32, description: &str) -> ItemDef {
    ItemDef {
        id: id.to_string(),
        name: name.to_string(),
        kind: ItemKind::Consumable,
        max_stack,
        sell_price,
        description: description.to_string(),
        heal_amount,
    }
}

/// Built-in non-equipment items.
pub fn default_items() -> Vec<ItemDef> {
    vec![
        potion("POTION_HP_SMALL", "Small Health Potion", 99, 5, 30, "Restores a little health"),
        potion("POTION_HP_MEDIUM", "Health Potion", 99, 15, 80, "Restores some health"),
        potion("POTION_HP_LARGE", "Large Health Potion", 20, 40, 200, "Restores a lot of health"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_equipment_ids_unique() {
        let gear = default_equipment();
        let ids: HashSet<_> = gear.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), gear.len());
    }

    #[test]
    fn test_default_equipment_covers_every_slot() {
        let gear = default_equipment();
        for slot in EquipmentSlot::ALL {
            assert!(gear.iter().any(|e| e.slot == slot), "no default item for {slot}");
        }
    }

    #[test]
    fn test_max_stack_rules() {
        let catalog = ItemCatalog::with_defaults();
        assert_eq!(catalog.max_stack("WPN_001"), 1);
        assert_eq!(catalog.max_stack("POTION_HP_LARGE"), 20);
        assert_eq!(catalog.max_stack("SOMETHING_UNKNOWN"), DEFAULT_MAX_STACK);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let catalog = ItemCatalog::with_defaults();
        assert_eq!(catalog.display_name("ARM_001"), "Cloth Armor");
        assert_eq!(catalog.display_name("MYSTERY"), "MYSTERY");
    }

    #[test]
    fn test_sell_prices() {
        let catalog = ItemCatalog::with_defaults();
        assert_eq!(catalog.sell_price("WPN_001"), 10, "white gear");
        assert_eq!(catalog.sell_price("WPN_006"), 800, "orange gear");
        assert_eq!(catalog.sell_price("POTION_HP_SMALL"), 5);
        assert_eq!(catalog.sell_price("MYSTERY"), 0);
    }
}
