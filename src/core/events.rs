//! Notifications produced by the simulation for rendering, UI and audio.
//!
//! Components append to an outbox while they mutate state; the simulation
//! drains every outbox once per tick in a fixed order so consumers always see
//! events in the order they happened. Nothing in the core waits on a reply.

use crate::items::types::EquipmentSlot;
use crate::waves::types::{MonsterHandle, WavePhase};

/// Who received a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageTarget {
    Player,
    Monster(MonsterHandle),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    // ── Combat ──────────────────────────────────────────────────
    /// A hit landed. `amount` includes any part absorbed by a shield.
    DamageDealt {
        target: DamageTarget,
        amount: u32,
        is_crit: bool,
    },

    /// The player's HP reached zero.
    PlayerDied,

    // ── Progression ─────────────────────────────────────────────
    LeveledUp { new_level: u32 },
    GoldGained { amount: u64 },
    ExpGained { amount: u64 },

    // ── Equipment ───────────────────────────────────────────────
    /// A slot changed; `item_id` is the new occupant.
    EquipmentChanged {
        slot: EquipmentSlot,
        item_id: Option<String>,
    },

    /// Aggregate bonuses were recomputed.
    StatsChanged,

    // ── Inventory ───────────────────────────────────────────────
    InventorySlotChanged { slot_index: usize },
    InventoryChanged,
    ItemPickup { item_id: String, count: u32 },
    /// Part of a drop did not fit and was discarded.
    InventoryFull { item_id: String, lost: u32 },

    // ── Economy ─────────────────────────────────────────────────
    ItemPurchased { item_id: String, price: u64 },
    ItemSold { item_id: String, count: u32, gold: u64 },
    SkillUpgraded { skill_id: String, new_level: u32, cost: u64 },

    // ── Waves ───────────────────────────────────────────────────
    WaveStateChanged {
        wave: u32,
        kills: u32,
        spawning: bool,
        phase: WavePhase,
    },
    MonsterSpawned {
        handle: MonsterHandle,
        monster_id: String,
        configured: bool,
    },
    MonsterKilled {
        handle: MonsterHandle,
        monster_id: String,
    },
    StageCleared { stage_id: u32, stars: u8 },
    StageFailed { stage_id: u32 },

    // ── Persistence ─────────────────────────────────────────────
    GameSaved,
    SaveFailed { reason: String },
}

/// Append-only event buffer.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        self.events.extend(events);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Takes every buffered event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
