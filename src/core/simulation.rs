//! The simulation context.
//!
//! One [`Simulation`] owns every manager, the RNG, the clock and the event
//! queue. All mutation goes through it, so there is exactly one writer for
//! the player, inventory and loadout at any time.
//!
//! Component outboxes are flushed into the shared queue after every
//! operation in a fixed order (equipment, inventory, waves), and before any
//! event the simulation pushes itself, so consumers see events in the order
//! they happened.

use super::battle_stats::BattleStats;
use super::clock::GameClock;
use super::constants::SAVE_VERSION;
use super::events::{DamageTarget, EventQueue, GameEvent};
use crate::character::PlayerStats;
use crate::combat::{hits, resolve_attack, AreaShape, AttackResult, Transform, Vec3};
use crate::config::GameConfig;
use crate::economy::{try_buy, try_sell, try_upgrade_skill, PurchaseOutcome, SaleOutcome, SkillUpgradeOutcome};
use crate::items::{EquipmentRegistry, EquipmentSlot, Inventory, UseOutcome};
use crate::persistence::{LoadSource, SaveData, SaveError, SaveManager, SaveStore};
use crate::waves::{
    MonsterHandle, MonsterInstance, StageConfig, StageProgress, WavePhase, WaveScheduler, WaveState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// How the current stage ended, if it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Cleared { stage_id: u32, stars: u8 },
    Failed { stage_id: u32 },
}

pub struct Simulation<S: SaveStore> {
    config: GameConfig,
    player: PlayerStats,
    equipment: EquipmentRegistry,
    inventory: Inventory,
    scheduler: WaveScheduler,
    monsters: BTreeMap<MonsterHandle, MonsterInstance>,
    progress: StageProgress,
    battle: BattleStats,
    clock: GameClock,
    rng: StdRng,
    events: EventQueue,
    saves: SaveManager<S>,
    load_source: LoadSource,
    skill_levels: BTreeMap<String, u32>,
    /// Format version of the loaded save. A newer writer's version is kept
    /// so checkpoints never downgrade it.
    save_version: u32,
    /// Play time already folded into the persisted total.
    banked_play_time: u64,
    /// Simulated seconds since the last fold.
    session_play_time: f64,
    autosave_timer: f64,
    outcome: Option<StageOutcome>,
}

impl<S: SaveStore> Simulation<S> {
    /// Loads (or creates) the save in `store` and builds every manager around it.
    pub fn new(config: GameConfig, store: S, seed: u64) -> Self {
        let mut saves = SaveManager::new(store);
        let player_settings = config.settings.player.clone();
        let loaded = saves.load(|| SaveData::new(PlayerStats::from_settings(&player_settings)));

        let settings = &config.settings;
        let scheduler = WaveScheduler::new(
            settings.waves.clone(),
            settings.combat.monster_crit_rate,
            settings.combat.monster_crit_bonus,
        );
        let inventory = Inventory::with_capacity(settings.inventory_capacity);

        let mut sim = Self {
            player: loaded.data.player.clone(),
            equipment: EquipmentRegistry::new(),
            inventory,
            scheduler,
            monsters: BTreeMap::new(),
            progress: StageProgress::new(),
            battle: BattleStats::new(),
            clock: GameClock::new(),
            rng: StdRng::seed_from_u64(seed),
            events: EventQueue::new(),
            saves,
            load_source: loaded.source,
            skill_levels: BTreeMap::new(),
            save_version: SAVE_VERSION,
            banked_play_time: 0,
            session_play_time: 0.0,
            autosave_timer: 0.0,
            outcome: None,
            config,
        };
        sim.apply_save(loaded.data);
        sim
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerStats {
        &self.player
    }

    pub fn equipment(&self) -> &EquipmentRegistry {
        &self.equipment
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn progress(&self) -> &StageProgress {
        &self.progress
    }

    pub fn battle_stats(&self) -> &BattleStats {
        &self.battle
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn wave_state(&self) -> WaveState {
        self.scheduler.state()
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    pub fn outcome(&self) -> Option<StageOutcome> {
        self.outcome
    }

    pub fn monster(&self, handle: MonsterHandle) -> Option<&MonsterInstance> {
        self.monsters.get(&handle)
    }

    pub fn monsters(&self) -> impl Iterator<Item = &MonsterInstance> {
        self.monsters.values()
    }

    pub fn monster_handles(&self) -> Vec<MonsterHandle> {
        self.monsters.keys().copied().collect()
    }

    pub fn skill_levels(&self) -> &BTreeMap<String, u32> {
        &self.skill_levels
    }

    pub fn set_skill_level(&mut self, skill_id: &str, level: u32) {
        self.skill_levels.insert(skill_id.to_string(), level);
    }

    /// Persisted total plus the unsaved session time, in whole seconds.
    pub fn play_time_secs(&self) -> u64 {
        self.banked_play_time + self.session_play_time as u64
    }

    pub fn store(&self) -> &S {
        self.saves.store()
    }

    pub fn into_store(self) -> S {
        self.saves.into_store()
    }

    /// True while a stage is running and has not ended.
    pub fn in_stage(&self) -> bool {
        self.outcome.is_none() && self.scheduler.phase().is_active()
    }

    // ── Stage flow ──────────────────────────────────────────────

    /// Starts a stage. Locked stages are refused. A stage id with no config
    /// runs the fallback rotation.
    pub fn enter_stage(&mut self, stage_id: u32) -> bool {
        if !self.progress.is_unlocked(stage_id) {
            warn!(stage = stage_id, unlocked = self.progress.highest_unlocked_stage, "stage is locked");
            return false;
        }

        let stage = match self.config.stages.get(stage_id) {
            Some(stage) => stage.clone(),
            None => {
                warn!(stage = stage_id, "no config for stage, using fallback waves");
                StageConfig::fallback(stage_id, self.config.settings.waves.default_wave_count)
            }
        };

        info!(stage = stage_id, name = %stage.name, waves = stage.wave_count, "entering stage");
        self.monsters.clear();
        self.battle.reset();
        self.outcome = None;
        self.player.clear_shield();
        self.player.full_restore();
        self.scheduler.start_stage(stage);
        self.collect();
        true
    }

    /// Leaves the current stage without rewards. Live monsters are discarded.
    pub fn exit_stage(&mut self) {
        if self.scheduler.stage().is_some() {
            info!(stage = self.scheduler.state().stage_id, "leaving stage");
        }
        self.scheduler.stop();
        self.monsters.clear();
        self.player.clear_shield();
        self.collect();
    }

    /// Advances the simulation by `real_dt` seconds of wall time and returns
    /// every event produced since the previous tick, in order.
    pub fn tick(&mut self, real_dt: f64) -> Vec<GameEvent> {
        let dt = self.clock.advance(real_dt);
        if dt > 0.0 {
            self.session_play_time += dt;
            if self.in_stage() {
                self.battle.add_survival_time(dt);
                let spawned = self.scheduler.update(dt, &self.config.monsters);
                for monster in spawned {
                    self.monsters.insert(monster.handle, monster);
                }
            }
            self.collect();
            self.tick_autosave(dt);
        }
        self.collect();
        self.events.drain()
    }

    pub fn pause(&mut self) {
        self.clock.pause();
        debug!("simulation paused");
    }

    pub fn resume(&mut self) {
        self.clock.resume();
        debug!("simulation resumed");
    }

    pub fn set_monster_position(&mut self, handle: MonsterHandle, position: Vec3) -> bool {
        match self.monsters.get_mut(&handle) {
            Some(monster) => {
                monster.position = position;
                true
            }
            None => false,
        }
    }

    // ── Combat ──────────────────────────────────────────────────

    /// Single-target attack from the player.
    pub fn player_attack(&mut self, handle: MonsterHandle) -> Option<AttackResult> {
        if !self.in_stage() || self.player.is_dead() {
            return None;
        }
        let result = self.strike(handle);
        self.collect();
        result
    }

    /// Hits every live monster inside `shape` around `origin`. Each target
    /// gets its own crit roll.
    pub fn player_area_attack(&mut self, origin: &Transform, shape: AreaShape) -> Vec<(MonsterHandle, AttackResult)> {
        if !self.in_stage() || self.player.is_dead() {
            return Vec::new();
        }
        let targets: Vec<MonsterHandle> = self
            .monsters
            .values()
            .filter(|m| !m.is_dead() && hits(origin, m.position, shape))
            .map(|m| m.handle)
            .collect();

        let mut results = Vec::with_capacity(targets.len());
        for handle in targets {
            if self.outcome.is_some() {
                break;
            }
            if let Some(result) = self.strike(handle) {
                results.push((handle, result));
            }
        }
        self.collect();
        results
    }

    /// A monster hits the player. Shield absorbs first.
    pub fn monster_attack(&mut self, handle: MonsterHandle) -> Option<AttackResult> {
        if !self.in_stage() || self.player.is_dead() {
            return None;
        }
        let monster = self.monsters.get(&handle).filter(|m| !m.is_dead())?;
        let result = resolve_attack(
            monster,
            &self.player,
            self.config.settings.combat.min_damage,
            &mut self.rng,
        );

        let taken = self.player.take_damage(result.damage);
        self.battle.record_damage_taken(taken.total());
        self.emit(GameEvent::DamageDealt {
            target: DamageTarget::Player,
            amount: result.damage,
            is_crit: result.is_crit,
        });

        if self.player.is_dead() {
            self.on_player_died();
        }
        self.collect();
        Some(result)
    }

    pub fn grant_shield(&mut self, amount: u32) {
        self.player.add_shield(amount);
    }

    // ── Items ───────────────────────────────────────────────────

    /// Uses an inventory slot, applying heals and equipment bonuses.
    pub fn use_item(&mut self, slot_index: usize) -> UseOutcome {
        let outcome = self.inventory.use_item(
            slot_index,
            &mut self.equipment,
            self.player.level,
            &self.config.items,
        );
        match &outcome {
            UseOutcome::Equipped { .. } => self.player.apply_equipment_bonus(self.equipment.bonuses()),
            UseOutcome::Consumed { item_id, heal_amount } => {
                let healed = self.player.heal(*heal_amount);
                debug!(item = %item_id, healed, "consumed");
            }
            _ => {}
        }
        self.collect();
        outcome
    }

    /// Moves the item in `slot` back into the inventory. Refused when the bag
    /// has no free slot.
    pub fn unequip(&mut self, slot: EquipmentSlot) -> bool {
        let Some(item_id) = self.equipment.get(slot).map(|e| e.id.clone()) else {
            return false;
        };
        if self.inventory.find_empty_slot().is_none() {
            warn!(slot = %slot, item = %item_id, "inventory full, cannot unequip");
            return false;
        }
        self.equipment.unequip(slot);
        self.inventory.add_item(&item_id, 1, &self.config.items);
        self.player.apply_equipment_bonus(self.equipment.bonuses());
        self.collect();
        true
    }

    /// Puts items into the bag and returns how many fit. The rest is
    /// discarded with an [`GameEvent::InventoryFull`].
    pub fn add_item(&mut self, item_id: &str, count: u32) -> u32 {
        let added = self.inventory.add_item(item_id, count, &self.config.items);
        if added > 0 {
            self.emit(GameEvent::ItemPickup {
                item_id: item_id.to_string(),
                count: added,
            });
        }
        if added < count {
            let lost = count - added;
            warn!(item = %item_id, lost, "inventory full, items discarded");
            self.emit(GameEvent::InventoryFull {
                item_id: item_id.to_string(),
                lost,
            });
        }
        self.collect();
        added
    }

    // ── Economy ─────────────────────────────────────────────────

    /// Buys one unit from the shop. A purchase that does not fit in the bag
    /// is refunded.
    pub fn buy_item(&mut self, item_id: &str) -> PurchaseOutcome {
        let outcome = try_buy(
            item_id,
            &self.config.shop,
            &self.config.items,
            &mut self.player,
            &mut self.inventory,
        );
        match &outcome {
            PurchaseOutcome::Purchased { price } => {
                info!(item = %item_id, price, gold = self.player.gold, "item purchased");
                self.emit(GameEvent::ItemPurchased {
                    item_id: item_id.to_string(),
                    price: *price,
                });
            }
            PurchaseOutcome::InventoryFull => warn!(item = %item_id, "inventory full, purchase refunded"),
            other => debug!(item = %item_id, outcome = ?other, "purchase refused"),
        }
        self.collect();
        outcome
    }

    /// Sells `amount` units from a bag slot, or the whole stack when `None`.
    pub fn sell_slot(&mut self, slot_index: usize, amount: Option<u32>) -> SaleOutcome {
        let outcome = try_sell(
            slot_index,
            amount,
            &self.config.items,
            &mut self.player,
            &mut self.inventory,
        );
        if let SaleOutcome::Sold { item_id, count, gold } = &outcome {
            info!(item = %item_id, count, gold, "item sold");
            self.emit(GameEvent::ItemSold {
                item_id: item_id.clone(),
                count: *count,
                gold: *gold,
            });
        }
        self.collect();
        outcome
    }

    pub fn upgrade_skill(&mut self, skill_id: &str) -> SkillUpgradeOutcome {
        let outcome = try_upgrade_skill(skill_id, &self.config.skills, &mut self.skill_levels, &mut self.player);
        match &outcome {
            SkillUpgradeOutcome::Upgraded { new_level, cost } => {
                info!(skill = %skill_id, new_level, cost, "skill upgraded");
                self.emit(GameEvent::SkillUpgraded {
                    skill_id: skill_id.to_string(),
                    new_level: *new_level,
                    cost: *cost,
                });
            }
            other => debug!(skill = %skill_id, outcome = ?other, "skill upgrade refused"),
        }
        outcome
    }

    // ── Persistence ─────────────────────────────────────────────

    /// Writes a checkpoint. Failure leaves the previous backup intact and is
    /// also reported as a [`GameEvent::SaveFailed`].
    pub fn save(&mut self) -> Result<(), SaveError> {
        self.collect();
        let whole_secs = self.session_play_time.trunc();
        let data = SaveData {
            version: self.save_version,
            player: self.player.clone(),
            equipped_items: self.equipment.snapshot(),
            inventory: self.inventory.snapshot(),
            progress: self.progress.clone(),
            skill_levels: self.skill_levels.clone(),
            total_play_time_secs: self.banked_play_time + whole_secs as u64,
            ..SaveData::new(self.player.clone())
        };

        match self.saves.save(&data) {
            Ok(()) => {
                self.banked_play_time = data.total_play_time_secs;
                self.session_play_time -= whole_secs;
                self.autosave_timer = 0.0;
                self.events.push(GameEvent::GameSaved);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "save failed");
                self.events.push(GameEvent::SaveFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// The host is being backgrounded: pause and checkpoint.
    pub fn on_suspend(&mut self) {
        self.pause();
        if self.save().is_err() {
            warn!("checkpoint on suspend failed");
        }
    }

    /// The host is exiting. The save completes before this returns.
    pub fn on_quit(&mut self) -> Result<(), SaveError> {
        self.exit_stage();
        self.save()
    }

    /// Wipes both save slots and resets every manager to a fresh character.
    pub fn delete_save(&mut self) -> Result<(), SaveError> {
        self.exit_stage();
        let player_settings = self.config.settings.player.clone();
        let data = self
            .saves
            .delete_save(|| SaveData::new(PlayerStats::from_settings(&player_settings)))?;
        self.apply_save(data);
        self.battle.reset();
        self.outcome = None;
        self.session_play_time = 0.0;
        self.autosave_timer = 0.0;
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    fn apply_save(&mut self, data: SaveData) {
        self.player = data.player;
        self.equipment.restore(&data.equipped_items, &self.config.items);
        self.inventory = Inventory::with_capacity(self.config.settings.inventory_capacity);
        self.inventory.restore(&data.inventory, &self.config.items);
        self.player.apply_equipment_bonus(self.equipment.bonuses());
        self.progress = data.progress;
        self.skill_levels = data.skill_levels;
        self.save_version = data.version.max(SAVE_VERSION);
        self.banked_play_time = data.total_play_time_secs;

        // Restoring replays equip/add notifications that describe nothing new.
        self.equipment.drain_events();
        self.inventory.drain_events();
    }

    fn tick_autosave(&mut self, dt: f64) {
        let interval = self.config.settings.autosave_interval_secs;
        if interval <= 0.0 {
            return;
        }
        self.autosave_timer += dt;
        if self.autosave_timer >= interval {
            debug!(interval, "autosave");
            if self.save().is_err() {
                // Retry on the next interval.
                self.autosave_timer = 0.0;
            }
        }
    }

    fn strike(&mut self, handle: MonsterHandle) -> Option<AttackResult> {
        let monster = self.monsters.get_mut(&handle).filter(|m| !m.is_dead())?;
        let result = resolve_attack(
            &self.player,
            &*monster,
            self.config.settings.combat.min_damage,
            &mut self.rng,
        );
        let killed = monster.take_damage(result.damage);

        self.battle
            .record_damage_dealt(result.damage, result.is_crit, self.clock.elapsed());
        self.emit(GameEvent::DamageDealt {
            target: DamageTarget::Monster(handle),
            amount: result.damage,
            is_crit: result.is_crit,
        });

        if killed {
            self.on_monster_killed(handle);
        }
        Some(result)
    }

    fn on_monster_killed(&mut self, handle: MonsterHandle) {
        let Some(monster) = self.monsters.remove(&handle) else {
            return;
        };
        debug!(monster = %monster.monster_id, handle = %handle, "monster killed");
        self.emit(GameEvent::MonsterKilled {
            handle,
            monster_id: monster.monster_id.clone(),
        });
        self.battle.record_kill(monster.is_boss());

        let roll = self.config.loot.roll(&monster.drop_table_id, &mut self.rng);
        self.grant_gold(u64::from(monster.gold_drop) + u64::from(roll.gold));
        self.grant_exp(u64::from(monster.exp_drop) + u64::from(roll.exp));
        for (item_id, count) in roll.items {
            self.pick_up(&item_id, count);
        }
        if let Some(item_id) = roll.equipment {
            self.pick_up(&item_id, 1);
        }

        let before = self.scheduler.phase();
        self.scheduler.on_monster_killed(handle);
        let after = self.scheduler.phase();
        if before == WavePhase::WaitingForClear && after != before {
            self.battle.record_wave_completed();
        }
        if after == WavePhase::StageCleared {
            self.on_stage_cleared();
        }
    }

    fn on_stage_cleared(&mut self) {
        let Some(stage) = self.scheduler.stage().cloned() else {
            return;
        };
        let stars = self.battle.grade().stars();
        info!(stage = stage.id, stars, stats = %self.battle, "stage cleared");

        self.grant_gold(stage.gold_reward);
        self.grant_exp(stage.exp_reward);
        self.progress.mark_cleared(stage.id);
        self.progress.record_stars(stage.id, stars);
        self.outcome = Some(StageOutcome::Cleared {
            stage_id: stage.id,
            stars,
        });
        self.emit(GameEvent::StageCleared {
            stage_id: stage.id,
            stars,
        });

        if self.save().is_err() {
            warn!(stage = stage.id, "checkpoint after stage clear failed");
        }
    }

    fn on_player_died(&mut self) {
        let stage = self.scheduler.stage().cloned();
        self.emit(GameEvent::PlayerDied);

        let Some(stage) = stage else {
            return;
        };
        info!(stage = stage.id, stats = %self.battle, "player defeated");
        let ratio = self.config.settings.combat.partial_reward_ratio.clamp(0.0, 1.0);
        self.grant_gold((stage.gold_reward as f64 * ratio).floor() as u64);
        self.grant_exp((stage.exp_reward as f64 * ratio).floor() as u64);

        self.outcome = Some(StageOutcome::Failed { stage_id: stage.id });
        self.emit(GameEvent::StageFailed { stage_id: stage.id });
        self.scheduler.stop();
        self.monsters.clear();
    }

    fn grant_gold(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.player.add_gold(amount);
        self.battle.record_gold(amount);
        self.emit(GameEvent::GoldGained { amount });
    }

    fn grant_exp(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        let leveled = self.player.add_experience(amount);
        self.battle.record_exp(amount);
        self.emit(GameEvent::ExpGained { amount });
        if leveled {
            info!(level = self.player.level, "level up");
            self.emit(GameEvent::LeveledUp {
                new_level: self.player.level,
            });
            self.emit(GameEvent::StatsChanged);
        }
    }

    /// A loot drop: counts toward battle stats when anything fits.
    fn pick_up(&mut self, item_id: &str, count: u32) {
        if self.add_item(item_id, count) > 0 {
            self.battle.record_item_dropped();
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.collect();
        self.events.push(event);
    }

    fn collect(&mut self) {
        self.events.extend(self.equipment.drain_events());
        self.events.extend(self.inventory.drain_events());
        self.events.extend(self.scheduler.drain_events());
    }
}
