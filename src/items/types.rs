use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Helmet,
    Armor,
    Pants,
    Ring,
    Necklace,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 6] = [
        EquipmentSlot::Weapon,
        EquipmentSlot::Helmet,
        EquipmentSlot::Armor,
        EquipmentSlot::Pants,
        EquipmentSlot::Ring,
        EquipmentSlot::Necklace,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "Weapon",
            EquipmentSlot::Helmet => "Helmet",
            EquipmentSlot::Armor => "Armor",
            EquipmentSlot::Pants => "Pants",
            EquipmentSlot::Ring => "Ring",
            EquipmentSlot::Necklace => "Necklace",
        }
    }

    /// Parses the name written by [`EquipmentSlot::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quality rank, White lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quality {
    White = 0,
    Green = 1,
    Blue = 2,
    Purple = 3,
    Orange = 4,
}

impl Quality {
    pub fn name(&self) -> &'static str {
        match self {
            Quality::White => "White",
            Quality::Green => "Green",
            Quality::Blue => "Blue",
            Quality::Purple => "Purple",
            Quality::Orange => "Orange",
        }
    }

    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Gold paid for selling a built-in piece of this quality.
    pub fn base_sell_price(&self) -> u32 {
        match self {
            Quality::White => 10,
            Quality::Green => 40,
            Quality::Blue => 120,
            Quality::Purple => 300,
            Quality::Orange => 800,
        }
    }
}

/// Immutable catalog entry for an equippable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub slot: EquipmentSlot,
    pub quality: Quality,
    pub level_requirement: u32,
    pub attack_bonus: u32,
    pub defense_bonus: u32,
    pub hp_bonus: u32,
    pub crit_rate_bonus: f64,
    pub description: String,
    /// Zero means the piece cannot be sold.
    #[serde(default)]
    pub sell_price: u32,
}

impl Equipment {
    pub fn bonuses(&self) -> EquipmentBonuses {
        EquipmentBonuses {
            attack: self.attack_bonus,
            defense: self.defense_bonus,
            hp: self.hp_bonus,
            crit_rate: self.crit_rate_bonus,
        }
    }
}

/// Sum of stat bonuses across equipped items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentBonuses {
    pub attack: u32,
    pub defense: u32,
    pub hp: u32,
    pub crit_rate: f64,
}

impl EquipmentBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, other: &EquipmentBonuses) {
        self.attack += other.attack;
        self.defense += other.defense;
        self.hp += other.hp;
        self.crit_rate += other.crit_rate;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Equipment,
    Consumable,
    Material,
    Currency,
}

/// Catalog entry for a non-equipment item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub max_stack: u32,
    pub sell_price: u32,
    pub description: String,
    /// HP restored when used. Zero for anything that is not a potion.
    #[serde(default)]
    pub heal_amount: u32,
}

/// One occupied inventory slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: String,
    pub count: u32,
    pub slot_index: usize,
}

impl InventoryItem {
    pub fn new(item_id: impl Into<String>, count: u32, slot_index: usize) -> Self {
        Self {
            item_id: item_id.into(),
            count,
            slot_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_ordering() {
        assert!(Quality::White < Quality::Green);
        assert!(Quality::Green < Quality::Blue);
        assert!(Quality::Blue < Quality::Purple);
        assert!(Quality::Purple < Quality::Orange);
        assert_eq!(Quality::Orange.rank(), 4);
    }

    #[test]
    fn test_slot_name_roundtrip() {
        for slot in EquipmentSlot::ALL {
            assert_eq!(EquipmentSlot::from_name(slot.name()), Some(slot));
        }
        assert_eq!(EquipmentSlot::from_name("Gloves"), None);
    }

    #[test]
    fn test_slot_indices_are_dense() {
        for (i, slot) in EquipmentSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn test_bonuses_add() {
        let mut total = EquipmentBonuses::new();
        total.add(&EquipmentBonuses {
            attack: 5,
            defense: 1,
            hp: 10,
            crit_rate: 0.01,
        });
        total.add(&EquipmentBonuses {
            attack: 2,
            defense: 0,
            hp: 0,
            crit_rate: 0.02,
        });
        assert_eq!(total.attack, 7);
        assert_eq!(total.defense, 1);
        assert_eq!(total.hp, 10);
        assert!((total.crit_rate - 0.03).abs() < 1e-12);
    }
}
