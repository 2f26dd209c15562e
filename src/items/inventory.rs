//! Fixed-capacity slotted item storage.
//!
//! Slots are a `Vec<Option<InventoryItem>>` whose length never changes after
//! construction. A present slot always has `count > 0`; emptied slots become
//! `None`. Each item records its own index, kept in sync on swap and sort.

use super::catalog::ItemCatalog;
use super::equipment::EquipmentRegistry;
use super::types::{InventoryItem, ItemKind};
use crate::core::constants::DEFAULT_INVENTORY_CAPACITY;
use crate::core::events::GameEvent;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What happened when a slot was used.
#[derive(Debug, Clone, PartialEq)]
pub enum UseOutcome {
    /// Equipment moved into its slot; `evicted` went back into the bag.
    Equipped {
        item_id: String,
        evicted: Option<String>,
    },
    /// One unit of a consumable was spent. The caller applies its effect.
    Consumed { item_id: String, heal_amount: u32 },
    /// Equipment left in place because the player is under its level requirement.
    LevelTooLow { item_id: String, required: u32 },
    /// Materials and currency have no use action.
    NotUsable { item_id: String },
    Empty,
}

#[derive(Debug)]
pub struct Inventory {
    slots: Vec<Option<InventoryItem>>,
    outbox: Vec<GameEvent>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_INVENTORY_CAPACITY)
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            outbox: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<&InventoryItem> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn slots(&self) -> &[Option<InventoryItem>] {
        &self.slots
    }

    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.find_empty_slot().is_none()
    }

    /// Lowest empty slot index.
    pub fn find_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    pub fn item_count(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|item| item.item_id == item_id)
            .map(|item| item.count)
            .sum()
    }

    /// Adds up to `amount` units and returns how many fit.
    ///
    /// Existing stacks are topped up in slot order before new slots are
    /// allocated. Equipment takes one slot per unit.
    pub fn add_item(&mut self, item_id: &str, amount: u32, catalog: &ItemCatalog) -> u32 {
        if amount == 0 {
            return 0;
        }
        let max_stack = catalog.max_stack(item_id);
        let mut remaining = amount;

        if max_stack > 1 {
            for index in 0..self.slots.len() {
                if remaining == 0 {
                    break;
                }
                if let Some(item) = self.slots[index].as_mut() {
                    if item.item_id == item_id && item.count < max_stack {
                        let moved = (max_stack - item.count).min(remaining);
                        item.count += moved;
                        remaining -= moved;
                        self.outbox.push(GameEvent::InventorySlotChanged { slot_index: index });
                    }
                }
            }
        }

        while remaining > 0 {
            let Some(index) = self.find_empty_slot() else {
                break;
            };
            let placed = max_stack.min(remaining);
            self.slots[index] = Some(InventoryItem::new(item_id, placed, index));
            remaining -= placed;
            self.outbox.push(GameEvent::InventorySlotChanged { slot_index: index });
        }

        let added = amount - remaining;
        if remaining > 0 {
            warn!(item = item_id, requested = amount, added, "inventory full, remainder dropped");
        }
        if added > 0 {
            debug!(item = item_id, added, "added to inventory");
            self.outbox.push(GameEvent::InventoryChanged);
        }
        added
    }

    /// Removes up to `amount` units, depleting from the highest slot index down.
    pub fn remove_item(&mut self, item_id: &str, amount: u32) -> u32 {
        let mut remaining = amount;
        for index in (0..self.slots.len()).rev() {
            if remaining == 0 {
                break;
            }
            let matches = self.slots[index]
                .as_ref()
                .is_some_and(|item| item.item_id == item_id);
            if matches {
                remaining -= self.take_from_slot(index, remaining);
            }
        }

        let removed = amount - remaining;
        if removed > 0 {
            self.outbox.push(GameEvent::InventoryChanged);
        }
        removed
    }

    /// Removes `amount` units (or the whole stack when `None`) from one slot.
    pub fn remove_from_slot(&mut self, index: usize, amount: Option<u32>) -> u32 {
        let Some(count) = self.slot(index).map(|item| item.count) else {
            return 0;
        };
        let removed = self.take_from_slot(index, amount.unwrap_or(count));
        if removed > 0 {
            self.outbox.push(GameEvent::InventoryChanged);
        }
        removed
    }

    /// Exchanges two slots. Out-of-range indices are ignored.
    pub fn swap_slots(&mut self, a: usize, b: usize) {
        if a == b || a >= self.slots.len() || b >= self.slots.len() {
            return;
        }
        self.slots.swap(a, b);
        for index in [a, b] {
            if let Some(item) = self.slots[index].as_mut() {
                item.slot_index = index;
            }
            self.outbox.push(GameEvent::InventorySlotChanged { slot_index: index });
        }
        self.outbox.push(GameEvent::InventoryChanged);
    }

    /// Uses the item in `index`.
    ///
    /// Equipment goes through the registry; whatever it evicts comes back
    /// into the bag. The unit is taken out first so the freed slot can hold
    /// the evicted item.
    pub fn use_item(
        &mut self,
        index: usize,
        registry: &mut EquipmentRegistry,
        player_level: u32,
        catalog: &ItemCatalog,
    ) -> UseOutcome {
        let Some(item_id) = self.slot(index).map(|item| item.item_id.clone()) else {
            return UseOutcome::Empty;
        };

        if let Some(equipment) = catalog.equipment(&item_id) {
            if equipment.level_requirement > player_level {
                debug!(item = %item_id, required = equipment.level_requirement, player_level, "level too low to equip");
                return UseOutcome::LevelTooLow {
                    item_id,
                    required: equipment.level_requirement,
                };
            }
            let equipment = equipment.clone();
            self.remove_from_slot(index, Some(1));
            let evicted = registry.equip(equipment).map(|old| old.id);
            if let Some(old_id) = &evicted {
                if self.add_item(old_id, 1, catalog) == 0 {
                    warn!(item = %old_id, "no room for evicted equipment");
                }
            }
            return UseOutcome::Equipped { item_id, evicted };
        }

        match catalog.item(&item_id) {
            Some(def) if def.kind == ItemKind::Consumable => {
                let heal_amount = def.heal_amount;
                self.remove_from_slot(index, Some(1));
                UseOutcome::Consumed { item_id, heal_amount }
            }
            Some(_) => UseOutcome::NotUsable { item_id },
            None => {
                warn!(item = %item_id, "use requested for item missing from catalog");
                UseOutcome::NotUsable { item_id }
            }
        }
    }

    /// Orders occupied slots by item id and compacts them to the front.
    pub fn sort_inventory(&mut self) {
        let mut items: Vec<InventoryItem> = self.slots.iter_mut().filter_map(Option::take).collect();
        items.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        for (index, mut item) in items.into_iter().enumerate() {
            item.slot_index = index;
            self.slots[index] = Some(item);
        }
        self.outbox.push(GameEvent::InventoryChanged);
    }

    /// Item id to total count, the persisted shape of the bag.
    pub fn snapshot(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for item in self.slots.iter().flatten() {
            *counts.entry(item.item_id.clone()).or_insert(0) += item.count;
        }
        counts
    }

    /// Empties the bag and refills it from a snapshot.
    pub fn restore(&mut self, snapshot: &BTreeMap<String, u32>, catalog: &ItemCatalog) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        for (item_id, &count) in snapshot {
            let added = self.add_item(item_id, count, catalog);
            if added < count {
                warn!(item = %item_id, lost = count - added, "saved inventory did not fit");
            }
        }
        self.outbox.push(GameEvent::InventoryChanged);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn take_from_slot(&mut self, index: usize, amount: u32) -> u32 {
        let Some(item) = self.slots.get_mut(index).and_then(|slot| slot.as_mut()) else {
            return 0;
        };
        let taken = item.count.min(amount);
        item.count -= taken;
        if item.count == 0 {
            self.slots[index] = None;
        }
        if taken > 0 {
            self.outbox.push(GameEvent::InventorySlotChanged { slot_index: index });
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::types::EquipmentSlot;

    fn catalog() -> ItemCatalog {
        ItemCatalog::with_defaults()
    }

    #[test]
    fn test_new_inventory_is_empty() {
        let inv = Inventory::new();
        assert_eq!(inv.capacity(), DEFAULT_INVENTORY_CAPACITY);
        assert_eq!(inv.used_slots(), 0);
        assert_eq!(inv.find_empty_slot(), Some(0));
    }

    #[test]
    fn test_add_tops_up_existing_stack_first() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        inv.add_item("POTION_HP_LARGE", 15, &catalog);
        let added = inv.add_item("POTION_HP_LARGE", 10, &catalog);
        assert_eq!(added, 10);
        assert_eq!(inv.slot(0).map(|i| i.count), Some(20));
        assert_eq!(inv.slot(1).map(|i| i.count), Some(5));
        assert_eq!(inv.used_slots(), 2);
    }

    #[test]
    fn test_equipment_takes_one_slot_per_unit() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        assert_eq!(inv.add_item("WPN_001", 3, &catalog), 3);
        assert_eq!(inv.used_slots(), 3);
        assert!(inv.slots().iter().flatten().all(|i| i.count == 1));
    }

    #[test]
    fn test_add_into_full_inventory_returns_short_count() {
        let catalog = catalog();
        let mut inv = Inventory::with_capacity(2);
        let added = inv.add_item("WPN_001", 5, &catalog);
        assert_eq!(added, 2);
        assert!(inv.is_full());
        assert_eq!(inv.add_item("ARM_001", 1, &catalog), 0);
    }

    #[test]
    fn test_add_then_remove_leaves_no_empty_stack() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        inv.add_item("POTION_HP_SMALL", 5, &catalog);
        assert_eq!(inv.remove_item("POTION_HP_SMALL", 5), 5);
        assert_eq!(inv.item_count("POTION_HP_SMALL"), 0);
        assert_eq!(inv.used_slots(), 0);
        assert!(inv.slots().iter().all(Option::is_none));
    }

    #[test]
    fn test_remove_depletes_from_highest_slot() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        inv.add_item("POTION_HP_LARGE", 30, &catalog); // 20 in slot 0, 10 in slot 1
        assert_eq!(inv.remove_item("POTION_HP_LARGE", 12), 12);
        assert!(inv.slot(1).is_none(), "slot 1 should be emptied first");
        assert_eq!(inv.slot(0).map(|i| i.count), Some(18));
    }

    #[test]
    fn test_remove_more_than_held() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        inv.add_item("POTION_HP_SMALL", 3, &catalog);
        assert_eq!(inv.remove_item("POTION_HP_SMALL", 10), 3);
        assert_eq!(inv.remove_item("NOT_THERE", 1), 0);
    }

    #[test]
    fn test_remove_from_slot_whole_stack() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        inv.add_item("POTION_HP_MEDIUM", 7, &catalog);
        assert_eq!(inv.remove_from_slot(0, None), 7);
        assert!(inv.slot(0).is_none());
        assert_eq!(inv.remove_from_slot(0, None), 0);
    }

    #[test]
    fn test_swap_updates_slot_indices() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        inv.add_item("WPN_001", 1, &catalog);
        inv.add_item("ARM_001", 1, &catalog);
        inv.swap_slots(0, 5);
        assert!(inv.slot(0).is_none());
        let moved = inv.slot(5).unwrap();
        assert_eq!(moved.item_id, "WPN_001");
        assert_eq!(moved.slot_index, 5);

        inv.swap_slots(1, 5);
        assert_eq!(inv.slot(1).map(|i| (i.item_id.as_str(), i.slot_index)), Some(("WPN_001", 1)));
        assert_eq!(inv.slot(5).map(|i| (i.item_id.as_str(), i.slot_index)), Some(("ARM_001", 5)));
    }

    #[test]
    fn test_use_equipment_returns_evicted_item_to_bag() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        let mut registry = EquipmentRegistry::new();
        inv.add_item("WPN_001", 1, &catalog);
        inv.add_item("WPN_002", 1, &catalog);

        let first = inv.use_item(0, &mut registry, 10, &catalog);
        assert_eq!(
            first,
            UseOutcome::Equipped {
                item_id: "WPN_001".to_string(),
                evicted: None
            }
        );
        let second = inv.use_item(1, &mut registry, 10, &catalog);
        assert_eq!(
            second,
            UseOutcome::Equipped {
                item_id: "WPN_002".to_string(),
                evicted: Some("WPN_001".to_string())
            }
        );
        assert_eq!(inv.item_count("WPN_001"), 1);
        assert_eq!(inv.item_count("WPN_002"), 0);
        assert_eq!(registry.get(EquipmentSlot::Weapon).map(|e| e.id.as_str()), Some("WPN_002"));
    }

    #[test]
    fn test_use_equipment_in_full_bag_is_lossless() {
        let catalog = catalog();
        let mut inv = Inventory::with_capacity(1);
        let mut registry = EquipmentRegistry::new();
        registry.equip_by_id("ARM_001", &catalog);
        inv.add_item("ARM_002", 1, &catalog);

        inv.use_item(0, &mut registry, 10, &catalog);
        assert_eq!(inv.item_count("ARM_001"), 1, "evicted armor should occupy the freed slot");
    }

    #[test]
    fn test_use_equipment_above_level_is_refused() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        let mut registry = EquipmentRegistry::new();
        inv.add_item("WPN_006", 1, &catalog);
        let outcome = inv.use_item(0, &mut registry, 3, &catalog);
        assert_eq!(
            outcome,
            UseOutcome::LevelTooLow {
                item_id: "WPN_006".to_string(),
                required: 20
            }
        );
        assert_eq!(inv.item_count("WPN_006"), 1);
        assert!(registry.get(EquipmentSlot::Weapon).is_none());
    }

    #[test]
    fn test_use_potion_consumes_one() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        let mut registry = EquipmentRegistry::new();
        inv.add_item("POTION_HP_SMALL", 2, &catalog);
        let outcome = inv.use_item(0, &mut registry, 1, &catalog);
        assert_eq!(
            outcome,
            UseOutcome::Consumed {
                item_id: "POTION_HP_SMALL".to_string(),
                heal_amount: 30
            }
        );
        assert_eq!(inv.item_count("POTION_HP_SMALL"), 1);
        assert_eq!(inv.use_item(9, &mut registry, 1, &catalog), UseOutcome::Empty);
    }

    #[test]
    fn test_sort_orders_by_id_and_compacts() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        inv.add_item("WPN_001", 1, &catalog);
        inv.add_item("ARM_001", 1, &catalog);
        inv.add_item("POTION_HP_SMALL", 4, &catalog);
        inv.swap_slots(0, 20);
        inv.swap_slots(2, 11);

        inv.sort_inventory();
        let ids: Vec<_> = inv.slots().iter().flatten().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, vec!["ARM_001", "POTION_HP_SMALL", "WPN_001"]);
        for index in 0..3 {
            assert_eq!(inv.slot(index).map(|i| i.slot_index), Some(index));
        }
        assert!(inv.slots()[3..].iter().all(Option::is_none));
    }

    #[test]
    fn test_snapshot_restore() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        inv.add_item("POTION_HP_LARGE", 25, &catalog);
        inv.add_item("RNG_001", 2, &catalog);
        let snapshot = inv.snapshot();
        assert_eq!(snapshot.get("POTION_HP_LARGE"), Some(&25));
        assert_eq!(snapshot.get("RNG_001"), Some(&2));

        let mut restored = Inventory::new();
        restored.restore(&snapshot, &catalog);
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.used_slots(), 4);
    }

    #[test]
    fn test_add_emits_events() {
        let catalog = catalog();
        let mut inv = Inventory::new();
        inv.add_item("POTION_HP_SMALL", 1, &catalog);
        let events = inv.drain_events();
        assert!(events.contains(&GameEvent::InventorySlotChanged { slot_index: 0 }));
        assert_eq!(events.last(), Some(&GameEvent::InventoryChanged));
    }
}
