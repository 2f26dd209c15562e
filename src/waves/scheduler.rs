//! Tick-driven wave state machine.
//!
//! `Idle -> Spawning -> WaitingForClear -> (NextWave -> Spawning | StageCleared)`
//!
//! All timing is simulation time passed into [`WaveScheduler::update`], so a
//! paused clock (dt = 0) freezes spawning and the inter-wave countdown.
//! Leaving `WaitingForClear` only happens through
//! [`WaveScheduler::on_monster_killed`].

use super::monsters::{MonsterCatalog, MonsterInstance};
use super::stages::StageConfig;
use super::types::{MonsterHandle, WavePhase, WaveState};
use crate::config::WaveSettings;
use crate::core::constants::{
    ELITE_WAVE_INTERVAL, FALLBACK_BOSS_ID, FALLBACK_ELITE_ID, FALLBACK_ROTATION, WAVE_DIFFICULTY_STEP,
};
use crate::core::events::GameEvent;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Stat multiplier for a 1-based wave number.
pub fn wave_multiplier(wave: u32) -> f64 {
    1.0 + wave.saturating_sub(1) as f64 * WAVE_DIFFICULTY_STEP
}

/// Spawn requests issued in a wave.
pub fn monsters_for_wave(monsters_per_wave: u32, wave: u32) -> u32 {
    monsters_per_wave + wave.saturating_sub(1)
}

/// Monster id for the fallback rotation.
///
/// The last request of the final wave is the boss; the last request of
/// every fifth wave is an elite. Everything else rotates on `wave % 3`.
pub fn fallback_monster_id(wave: u32, wave_count: u32, spawn_index: u32, to_spawn: u32) -> &'static str {
    let is_last = spawn_index + 1 == to_spawn;
    if is_last && wave == wave_count {
        FALLBACK_BOSS_ID
    } else if is_last && wave % ELITE_WAVE_INTERVAL == 0 {
        FALLBACK_ELITE_ID
    } else {
        FALLBACK_ROTATION[(wave % 3) as usize]
    }
}

#[derive(Debug)]
pub struct WaveScheduler {
    settings: WaveSettings,
    monster_crit_rate: f64,
    monster_crit_bonus: f64,
    stage: Option<StageConfig>,
    phase: WavePhase,
    current_wave: u32,
    kills_this_wave: u32,
    spawned_this_wave: u32,
    to_spawn_this_wave: u32,
    active: BTreeSet<MonsterHandle>,
    /// Seconds until the next spawn (Spawning) or the next wave (NextWave).
    timer: f64,
    next_handle: u64,
    outbox: Vec<GameEvent>,
}

impl WaveScheduler {
    pub fn new(settings: WaveSettings, monster_crit_rate: f64, monster_crit_bonus: f64) -> Self {
        Self {
            settings,
            monster_crit_rate,
            monster_crit_bonus,
            stage: None,
            phase: WavePhase::Idle,
            current_wave: 0,
            kills_this_wave: 0,
            spawned_this_wave: 0,
            to_spawn_this_wave: 0,
            active: BTreeSet::new(),
            timer: 0.0,
            next_handle: 1,
            outbox: Vec::new(),
        }
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn stage(&self) -> Option<&StageConfig> {
        self.stage.as_ref()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, handle: MonsterHandle) -> bool {
        self.active.contains(&handle)
    }

    pub fn is_stage_cleared(&self) -> bool {
        self.phase == WavePhase::StageCleared
    }

    pub fn state(&self) -> WaveState {
        WaveState {
            stage_id: self.stage.as_ref().map(|s| s.id).unwrap_or(0),
            wave_count: self.wave_count(),
            current_wave: self.current_wave,
            kills_this_wave: self.kills_this_wave,
            spawned_this_wave: self.spawned_this_wave,
            to_spawn_this_wave: self.to_spawn_this_wave,
            active_monsters: self.active.iter().copied().collect(),
            phase: self.phase,
        }
    }

    /// Enters a stage at wave 1. The first spawn happens on the next update.
    pub fn start_stage(&mut self, stage: StageConfig) {
        info!(stage = stage.id, waves = stage.wave_count, "stage started");
        self.stage = Some(stage);
        self.active.clear();
        self.current_wave = 1;
        self.begin_wave();
    }

    /// Drops the stage and every tracked monster.
    pub fn stop(&mut self) {
        if self.stage.take().is_some() {
            debug!("stage stopped");
        }
        self.active.clear();
        self.phase = WavePhase::Idle;
        self.current_wave = 0;
        self.kills_this_wave = 0;
        self.spawned_this_wave = 0;
        self.to_spawn_this_wave = 0;
        self.timer = 0.0;
    }

    /// Advances timers by `dt` seconds of simulation time and returns the
    /// monsters spawned during this step.
    pub fn update(&mut self, dt: f64, catalog: &MonsterCatalog) -> Vec<MonsterInstance> {
        let mut spawned = Vec::new();
        let mut budget = dt.max(0.0);

        if self.phase == WavePhase::NextWave {
            self.timer -= budget;
            if self.timer > 0.0 {
                return spawned;
            }
            budget = -self.timer;
            self.current_wave += 1;
            self.begin_wave();
        }

        if self.phase == WavePhase::Spawning {
            self.timer -= budget;
            while self.timer <= 0.0 && self.spawned_this_wave < self.to_spawn_this_wave {
                if self.at_capacity() {
                    // Hold the request until a kill frees a slot.
                    self.timer = 0.0;
                    break;
                }
                spawned.push(self.spawn_one(catalog));
                self.timer += self.spawn_interval();
            }
            if self.spawned_this_wave >= self.to_spawn_this_wave {
                self.set_phase(WavePhase::WaitingForClear);
            }
        }

        spawned
    }

    /// Records a kill. Unknown or already-removed handles are ignored and
    /// return false.
    pub fn on_monster_killed(&mut self, handle: MonsterHandle) -> bool {
        if !self.active.remove(&handle) {
            debug!(monster = %handle, "ignoring kill for untracked monster");
            return false;
        }
        self.kills_this_wave += 1;
        self.emit_state();

        if self.phase == WavePhase::WaitingForClear && self.active.is_empty() {
            self.finish_wave();
        }
        true
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn wave_count(&self) -> u32 {
        self.stage.as_ref().map(|s| s.wave_count).unwrap_or(0)
    }

    fn at_capacity(&self) -> bool {
        self.settings
            .max_active_monsters
            .is_some_and(|cap| self.active.len() >= cap as usize)
    }

    fn spawn_interval(&self) -> f64 {
        self.stage
            .as_ref()
            .and_then(|s| s.spawn_delay_for_wave(self.current_wave))
            .unwrap_or(self.settings.spawn_interval_secs)
            .max(0.0)
    }

    fn begin_wave(&mut self) {
        self.kills_this_wave = 0;
        self.spawned_this_wave = 0;
        self.to_spawn_this_wave = monsters_for_wave(self.settings.monsters_per_wave, self.current_wave);
        self.timer = 0.0;
        debug!(wave = self.current_wave, to_spawn = self.to_spawn_this_wave, "wave started");
        self.set_phase(WavePhase::Spawning);
    }

    fn finish_wave(&mut self) {
        if self.current_wave >= self.wave_count() {
            info!(wave = self.current_wave, "final wave cleared");
            self.set_phase(WavePhase::StageCleared);
        } else {
            debug!(wave = self.current_wave, "wave cleared");
            self.timer = self.settings.inter_wave_delay_secs.max(0.0);
            self.set_phase(WavePhase::NextWave);
        }
    }

    fn select_monster_id(&self) -> String {
        let wave = self.current_wave;
        let index = self.spawned_this_wave;
        if let Some(pool) = self.stage.as_ref().and_then(|s| s.pool_for_wave(wave)) {
            return pool[index as usize % pool.len()].clone();
        }
        fallback_monster_id(wave, self.wave_count(), index, self.to_spawn_this_wave).to_string()
    }

    fn spawn_one(&mut self, catalog: &MonsterCatalog) -> MonsterInstance {
        let handle = MonsterHandle(self.next_handle);
        self.next_handle += 1;
        let monster_id = self.select_monster_id();

        let monster = match catalog.get(&monster_id) {
            Some(config) => MonsterInstance::from_config(handle, config, wave_multiplier(self.current_wave)),
            None => {
                warn!(monster = %monster_id, wave = self.current_wave, "no stats for monster id, spawning unconfigured");
                MonsterInstance::unconfigured(handle, &monster_id)
            }
        }
        .with_crit(self.monster_crit_rate, self.monster_crit_bonus);

        self.active.insert(handle);
        self.spawned_this_wave += 1;
        debug!(monster = %monster_id, handle = %handle, wave = self.current_wave, hp = monster.max_hp, "spawned");
        self.outbox.push(GameEvent::MonsterSpawned {
            handle,
            monster_id,
            configured: monster.configured,
        });
        monster
    }

    fn set_phase(&mut self, phase: WavePhase) {
        self.phase = phase;
        self.emit_state();
    }

    fn emit_state(&mut self) {
        self.outbox.push(GameEvent::WaveStateChanged {
            wave: self.current_wave,
            kills: self.kills_this_wave,
            spawning: self.phase == WavePhase::Spawning,
            phase: self.phase,
        });
    }
}
