use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One item for sale at a fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopListing {
    pub item_id: String,
    pub price: u64,
}

/// Everything the shop sells, keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct ShopCatalog {
    listings: Vec<ShopListing>,
    index: HashMap<String, usize>,
}

impl ShopCatalog {
    pub fn new(listings: Vec<ShopListing>) -> Self {
        let index = listings
            .iter()
            .enumerate()
            .map(|(i, listing)| (listing.item_id.clone(), i))
            .collect();
        Self { listings, index }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_shop_listings())
    }

    pub fn price(&self, item_id: &str) -> Option<u64> {
        self.index.get(item_id).map(|&i| self.listings[i].price)
    }

    /// Listings in display order.
    pub fn listings(&self) -> &[ShopListing] {
        &self.listings
    }
}

/// An upgradable skill. Upgrading from level `n` costs
/// `round(base_gold_cost * cost_multiplier^n)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: String,
    pub name: String,
    pub max_level: u32,
    /// Player level needed before the first upgrade.
    pub unlock_level: u32,
    pub base_gold_cost: u64,
    pub cost_multiplier: f64,
}

impl SkillDef {
    /// Gold needed to go from `current_level` to the next one, or `None` at the cap.
    pub fn upgrade_cost(&self, current_level: u32) -> Option<u64> {
        if current_level >= self.max_level {
            return None;
        }
        let exponent = i32::try_from(current_level).unwrap_or(i32::MAX);
        let cost = (self.base_gold_cost as f64 * self.cost_multiplier.powi(exponent)).round();
        Some(if cost >= u64::MAX as f64 { u64::MAX } else { cost as u64 })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    skills: HashMap<String, SkillDef>,
}

impl SkillCatalog {
    pub fn new(skills: Vec<SkillDef>) -> Self {
        Self {
            skills: skills.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_skills())
    }

    pub fn get(&self, id: &str) -> Option<&SkillDef> {
        self.skills.get(id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// Result of trying to buy one unit from the shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased { price: u64 },
    NotForSale,
    NotEnoughGold { price: u64, gold: u64 },
    /// Paid for, found no room, refunded.
    InventoryFull,
}

/// Result of selling from an inventory slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleOutcome {
    Sold { item_id: String, count: u32, gold: u64 },
    EmptySlot,
    NotSellable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillUpgradeOutcome {
    Upgraded { new_level: u32, cost: u64 },
    UnknownSkill,
    Locked { unlock_level: u32 },
    MaxLevel,
    NotEnoughGold { cost: u64, gold: u64 },
}

fn listing(item_id: &str, price: u64) -> ShopListing {
    ShopListing {
        item_id: item_id.to_string(),
        price,
    }
}

/// Built-in shop stock.
pub fn default_shop_listings() -> Vec<ShopListing> {
    vec![
        // Weapons
        listing("WPN_001", 100),
        listing("WPN_002", 300),
        listing("WPN_003", 800),
        listing("WPN_004", 500),
        // Armor
        listing("ARM_001", 80),
        listing("ARM_002", 250),
        listing("ARM_003", 600),
        listing("ARM_004", 1200),
        // Consumables
        listing("POTION_HP_SMALL", 30),
        listing("POTION_HP_MEDIUM", 80),
        listing("POTION_HP_LARGE", 150),
    ]
}

fn skill(id: &str, name: &str, max_level: u32, unlock_level: u32, base_gold_cost: u64, cost_multiplier: f64) -> SkillDef {
    SkillDef {
        id: id.to_string(),
        name: name.to_string(),
        max_level,
        unlock_level,
        base_gold_cost,
        cost_multiplier,
    }
}

/// Built-in skill tree.
pub fn default_skills() -> Vec<SkillDef> {
    vec![
        // Active
        skill("SK001", "Multishot", 10, 1, 100, 1.5),
        skill("SK002", "Piercing Arrow", 10, 3, 150, 1.6),
        skill("SK003", "War Cry", 5, 5, 200, 2.0),
        // Passive
        skill("PS001", "Keen Aim", 10, 2, 80, 1.4),
        skill("PS002", "Iron Body", 10, 1, 60, 1.3),
        skill("PS003", "Swift Step", 5, 4, 120, 1.5),
        skill("PS004", "Bloodthirst", 5, 8, 300, 2.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_cost_curve() {
        let multishot = skill("SK001", "Multishot", 10, 1, 100, 1.5);
        assert_eq!(multishot.upgrade_cost(0), Some(100));
        assert_eq!(multishot.upgrade_cost(1), Some(150));
        assert_eq!(multishot.upgrade_cost(2), Some(225));
        assert_eq!(multishot.upgrade_cost(3), Some(338), "337.5 rounds half away from zero");
        assert_eq!(multishot.upgrade_cost(10), None);
    }

    #[test]
    fn test_costs_increase_until_cap() {
        for def in default_skills() {
            let costs: Vec<u64> = (0..def.max_level).filter_map(|lvl| def.upgrade_cost(lvl)).collect();
            assert_eq!(costs.len(), def.max_level as usize, "{} has a cost for every level", def.id);
            for pair in costs.windows(2) {
                assert!(pair[0] < pair[1], "{} costs must increase: {:?}", def.id, pair);
            }
        }
    }

    #[test]
    fn test_shop_price_lookup() {
        let shop = ShopCatalog::with_defaults();
        assert_eq!(shop.price("WPN_001"), Some(100));
        assert_eq!(shop.price("POTION_HP_SMALL"), Some(30));
        assert_eq!(shop.price("WPN_006"), None);
        assert_eq!(shop.listings().first().map(|l| l.item_id.as_str()), Some("WPN_001"));
    }
}
