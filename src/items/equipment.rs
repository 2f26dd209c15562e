use super::catalog::ItemCatalog;
use super::types::{Equipment, EquipmentBonuses, EquipmentSlot};
use crate::core::events::GameEvent;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Six equipment slots, each holding zero or one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loadout {
    pub weapon: Option<Equipment>,
    pub helmet: Option<Equipment>,
    pub armor: Option<Equipment>,
    pub pants: Option<Equipment>,
    pub ring: Option<Equipment>,
    pub necklace: Option<Equipment>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> &Option<Equipment> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Helmet => &self.helmet,
            EquipmentSlot::Armor => &self.armor,
            EquipmentSlot::Pants => &self.pants,
            EquipmentSlot::Ring => &self.ring,
            EquipmentSlot::Necklace => &self.necklace,
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Equipment> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Helmet => &mut self.helmet,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Pants => &mut self.pants,
            EquipmentSlot::Ring => &mut self.ring,
            EquipmentSlot::Necklace => &mut self.necklace,
        }
    }

    /// Puts `item` into `slot` and hands back whatever was there.
    pub fn replace(&mut self, slot: EquipmentSlot, item: Option<Equipment>) -> Option<Equipment> {
        std::mem::replace(self.slot_mut(slot), item)
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Equipment> {
        [
            &self.weapon,
            &self.helmet,
            &self.armor,
            &self.pants,
            &self.ring,
            &self.necklace,
        ]
        .into_iter()
        .filter_map(|item| item.as_ref())
    }

    /// Sum over all six slots; empty slots contribute nothing.
    pub fn total_bonuses(&self) -> EquipmentBonuses {
        let mut total = EquipmentBonuses::new();
        for item in self.iter_equipped() {
            total.add(&item.bonuses());
        }
        total
    }
}

/// Equip/unequip state machine over a [`Loadout`].
///
/// Every mutation recomputes the aggregate bonuses and queues an
/// `EquipmentChanged` plus a `StatsChanged` event.
#[derive(Debug, Default)]
pub struct EquipmentRegistry {
    loadout: Loadout,
    bonuses: EquipmentBonuses,
    outbox: Vec<GameEvent>,
}

impl EquipmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Equipment> {
        self.loadout.get(slot).as_ref()
    }

    /// Current aggregate bonuses.
    pub fn bonuses(&self) -> EquipmentBonuses {
        self.bonuses
    }

    /// Equips `item` into its own slot. Never fails.
    ///
    /// Returns the evicted item; the caller must put it somewhere.
    pub fn equip(&mut self, item: Equipment) -> Option<Equipment> {
        let slot = item.slot;
        let new_id = item.id.clone();
        let previous = self.loadout.replace(slot, Some(item));
        debug!(slot = %slot, item = %new_id, "equipped");
        self.after_change(slot, Some(new_id));
        previous
    }

    /// Looks `id` up in the catalog and equips a copy.
    ///
    /// Unknown ids are a no-op returning `None`.
    pub fn equip_by_id(&mut self, id: &str, catalog: &ItemCatalog) -> Option<Equipment> {
        match catalog.equipment(id) {
            Some(item) => self.equip(item.clone()),
            None => {
                warn!(item = id, "equip requested for unknown equipment id");
                None
            }
        }
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Equipment> {
        let removed = self.loadout.replace(slot, None)?;
        debug!(slot = %slot, item = %removed.id, "unequipped");
        self.after_change(slot, None);
        Some(removed)
    }

    /// Slot name to item id, the persisted shape of the loadout.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        EquipmentSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                self.get(slot)
                    .map(|item| (slot.name().to_string(), item.id.clone()))
            })
            .collect()
    }

    /// Clears every slot and re-equips from a snapshot.
    ///
    /// Entries with an unknown slot name or item id are skipped. An item whose
    /// catalog slot disagrees with the recorded slot goes to its catalog slot.
    pub fn restore(&mut self, snapshot: &BTreeMap<String, String>, catalog: &ItemCatalog) {
        self.loadout = Loadout::new();
        self.bonuses = self.loadout.total_bonuses();

        for (slot_name, id) in snapshot {
            if EquipmentSlot::from_name(slot_name).is_none() {
                warn!(slot = %slot_name, item = %id, "skipping saved equipment with unknown slot");
                continue;
            }
            self.equip_by_id(id, catalog);
        }
    }

    /// Takes queued notifications.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn after_change(&mut self, slot: EquipmentSlot, item_id: Option<String>) {
        self.bonuses = self.loadout.total_bonuses();
        self.outbox.push(GameEvent::EquipmentChanged { slot, item_id });
        self.outbox.push(GameEvent::StatsChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ItemCatalog {
        ItemCatalog::with_defaults()
    }

    fn item(id: &str) -> Equipment {
        catalog().equipment(id).cloned().unwrap()
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = EquipmentRegistry::new();
        assert_eq!(registry.loadout().iter_equipped().count(), 0);
        assert_eq!(registry.bonuses(), EquipmentBonuses::default());
    }

    #[test]
    fn test_equip_into_empty_slot_returns_none() {
        let mut registry = EquipmentRegistry::new();
        assert!(registry.equip(item("WPN_001")).is_none());
        assert_eq!(registry.get(EquipmentSlot::Weapon).map(|e| e.id.as_str()), Some("WPN_001"));
        assert_eq!(registry.bonuses().attack, 5);
    }

    #[test]
    fn test_equip_same_slot_evicts_previous() {
        let mut registry = EquipmentRegistry::new();
        registry.equip(item("WPN_001"));
        let evicted = registry.equip(item("WPN_002"));
        assert_eq!(evicted.map(|e| e.id), Some("WPN_001".to_string()));
        assert_eq!(registry.bonuses().attack, 15);
    }

    #[test]
    fn test_bonuses_sum_across_slots() {
        let mut registry = EquipmentRegistry::new();
        registry.equip(item("WPN_001")); // atk 5, crit .01
        registry.equip(item("ARM_001")); // def 3, hp 10
        registry.equip(item("RNG_001")); // atk 2, crit .01
        let bonuses = registry.bonuses();
        assert_eq!(bonuses.attack, 7);
        assert_eq!(bonuses.defense, 3);
        assert_eq!(bonuses.hp, 10);
        assert!((bonuses.crit_rate - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_unequip_recomputes_bonuses() {
        let mut registry = EquipmentRegistry::new();
        registry.equip(item("ARM_002"));
        let removed = registry.unequip(EquipmentSlot::Armor);
        assert_eq!(removed.map(|e| e.id), Some("ARM_002".to_string()));
        assert_eq!(registry.bonuses(), EquipmentBonuses::default());
        assert!(registry.unequip(EquipmentSlot::Armor).is_none());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut registry = EquipmentRegistry::new();
        registry.equip(item("WPN_001"));
        registry.drain_events();

        assert!(registry.equip_by_id("WPN_999", &catalog()).is_none());
        assert_eq!(registry.get(EquipmentSlot::Weapon).map(|e| e.id.as_str()), Some("WPN_001"));
        assert!(registry.drain_events().is_empty());
    }

    #[test]
    fn test_equip_emits_slot_and_stats_events() {
        let mut registry = EquipmentRegistry::new();
        registry.equip(item("HLM_001"));
        let events = registry.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::EquipmentChanged {
                    slot: EquipmentSlot::Helmet,
                    item_id: Some("HLM_001".to_string()),
                },
                GameEvent::StatsChanged,
            ]
        );
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let catalog = catalog();
        let mut registry = EquipmentRegistry::new();
        registry.equip(item("WPN_003"));
        registry.equip(item("NCK_002"));
        let snapshot = registry.snapshot();

        let mut restored = EquipmentRegistry::new();
        restored.restore(&snapshot, &catalog);
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.bonuses(), registry.bonuses());
    }

    #[test]
    fn test_restore_skips_unknown_entries() {
        let catalog = catalog();
        let mut snapshot = BTreeMap::new();
        snapshot.insert("Weapon".to_string(), "WPN_404".to_string());
        snapshot.insert("Gloves".to_string(), "WPN_001".to_string());
        snapshot.insert("Ring".to_string(), "RNG_002".to_string());

        let mut registry = EquipmentRegistry::new();
        registry.restore(&snapshot, &catalog);
        assert!(registry.get(EquipmentSlot::Weapon).is_none());
        assert_eq!(registry.get(EquipmentSlot::Ring).map(|e| e.id.as_str()), Some("RNG_002"));
        assert_eq!(registry.loadout().iter_equipped().count(), 1);
    }
}
