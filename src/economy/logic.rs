//! Gold sinks: buying, selling and skill upgrades.
//!
//! Each function either completes entirely or leaves the player and the
//! inventory exactly as they were.

use super::types::{PurchaseOutcome, SaleOutcome, ShopCatalog, SkillCatalog, SkillUpgradeOutcome};
use crate::character::PlayerStats;
use crate::items::{Inventory, ItemCatalog};
use std::collections::BTreeMap;

/// Buys one unit of `item_id`. Gold is refunded if the bag has no room.
pub fn try_buy(
    item_id: &str,
    shop: &ShopCatalog,
    catalog: &ItemCatalog,
    player: &mut PlayerStats,
    inventory: &mut Inventory,
) -> PurchaseOutcome {
    let Some(price) = shop.price(item_id) else {
        return PurchaseOutcome::NotForSale;
    };
    if !player.spend_gold(price) {
        return PurchaseOutcome::NotEnoughGold {
            price,
            gold: player.gold,
        };
    }
    if inventory.add_item(item_id, 1, catalog) == 0 {
        player.add_gold(price);
        return PurchaseOutcome::InventoryFull;
    }
    PurchaseOutcome::Purchased { price }
}

/// Sells `amount` units (or the whole stack) from `slot_index`.
pub fn try_sell(
    slot_index: usize,
    amount: Option<u32>,
    catalog: &ItemCatalog,
    player: &mut PlayerStats,
    inventory: &mut Inventory,
) -> SaleOutcome {
    let Some(item_id) = inventory.slot(slot_index).map(|item| item.item_id.clone()) else {
        return SaleOutcome::EmptySlot;
    };
    let unit_price = catalog.sell_price(&item_id);
    if unit_price == 0 {
        return SaleOutcome::NotSellable;
    }
    let count = inventory.remove_from_slot(slot_index, amount);
    if count == 0 {
        return SaleOutcome::EmptySlot;
    }
    let gold = unit_price as u64 * count as u64;
    player.add_gold(gold);
    SaleOutcome::Sold { item_id, count, gold }
}

/// Raises `skill_id` by one level, paying its upgrade cost.
pub fn try_upgrade_skill(
    skill_id: &str,
    skills: &SkillCatalog,
    skill_levels: &mut BTreeMap<String, u32>,
    player: &mut PlayerStats,
) -> SkillUpgradeOutcome {
    let Some(def) = skills.get(skill_id) else {
        return SkillUpgradeOutcome::UnknownSkill;
    };
    if player.level < def.unlock_level {
        return SkillUpgradeOutcome::Locked {
            unlock_level: def.unlock_level,
        };
    }
    let current = skill_levels.get(skill_id).copied().unwrap_or(0);
    let Some(cost) = def.upgrade_cost(current) else {
        return SkillUpgradeOutcome::MaxLevel;
    };
    if !player.spend_gold(cost) {
        return SkillUpgradeOutcome::NotEnoughGold {
            cost,
            gold: player.gold,
        };
    }
    let new_level = current + 1;
    skill_levels.insert(skill_id.to_string(), new_level);
    SkillUpgradeOutcome::Upgraded { new_level, cost }
}
