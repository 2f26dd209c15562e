use super::progression::{apply_level_ups, exp_to_next_level, MAX_LEVEL};
use crate::combat::{Combatant, DamageTaken};
use crate::config::PlayerSettings;
use crate::items::EquipmentBonuses;
use serde::{Deserialize, Serialize};

use crate::core::constants::{ATTACK_PER_LEVEL, DEFENSE_PER_LEVEL, HP_PER_LEVEL};

/// Player attribute record.
///
/// Only base values are stored. Derived totals are computed on demand from
/// base + level scaling + the current equipment bonus, which the equipment
/// registry pushes in through [`PlayerStats::apply_equipment_bonus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub experience: u64,
    pub gold: u64,
    #[serde(default)]
    pub gems: u64,
    pub base_max_hp: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub base_crit_rate: f64,
    pub base_crit_bonus: f64,
    pub move_speed: f64,
    pub current_hp: u32,
    #[serde(skip)]
    shield: u32,
    #[serde(skip)]
    equipment: EquipmentBonuses,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::from_settings(&PlayerSettings::default())
    }
}

impl PlayerStats {
    /// Fresh character at full HP.
    pub fn from_settings(settings: &PlayerSettings) -> Self {
        let mut stats = Self {
            level: settings.starting_level.clamp(1, MAX_LEVEL),
            experience: 0,
            gold: settings.starting_gold,
            gems: 0,
            base_max_hp: settings.base_max_hp,
            base_attack: settings.base_attack,
            base_defense: settings.base_defense,
            base_crit_rate: settings.base_crit_rate,
            base_crit_bonus: settings.base_crit_bonus,
            move_speed: settings.move_speed,
            current_hp: 0,
            shield: 0,
            equipment: EquipmentBonuses::default(),
        };
        stats.current_hp = stats.max_hp();
        stats
    }

    // ── Derived totals ──────────────────────────────────────────

    fn levels_gained(&self) -> u32 {
        self.level.saturating_sub(1)
    }

    fn scaled(&self, base: u32, bonus: u32, per_level: u32) -> u32 {
        base.saturating_add(bonus)
            .saturating_add(self.levels_gained().saturating_mul(per_level))
    }

    pub fn max_hp(&self) -> u32 {
        self.scaled(self.base_max_hp, self.equipment.hp, HP_PER_LEVEL)
    }

    pub fn total_attack(&self) -> u32 {
        self.scaled(self.base_attack, self.equipment.attack, ATTACK_PER_LEVEL)
    }

    pub fn total_defense(&self) -> u32 {
        self.scaled(self.base_defense, self.equipment.defense, DEFENSE_PER_LEVEL)
    }

    pub fn total_crit_rate(&self) -> f64 {
        (self.base_crit_rate + self.equipment.crit_rate).clamp(0.0, 1.0)
    }

    pub fn shield(&self) -> u32 {
        self.shield
    }

    /// Replaces the equipment contribution and re-clamps HP to the new max.
    pub fn apply_equipment_bonus(&mut self, bonuses: EquipmentBonuses) {
        self.equipment = bonuses;
        self.current_hp = self.current_hp.min(self.max_hp());
    }

    // ── Progression ─────────────────────────────────────────────

    /// Banks experience and levels up as many times as it covers.
    ///
    /// Returns whether at least one level was gained.
    pub fn add_experience(&mut self, amount: u64) -> bool {
        self.experience = self.experience.saturating_add(amount);
        apply_level_ups(&mut self.level, &mut self.experience) > 0
    }

    /// Experience still needed for the next level; `None` at the cap.
    pub fn exp_to_next_level(&self) -> Option<u64> {
        exp_to_next_level(self.level)
    }

    pub fn add_gold(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Spends gold if there is enough. Gold never goes negative.
    pub fn spend_gold(&mut self, amount: u64) -> bool {
        if self.gold < amount {
            return false;
        }
        self.gold -= amount;
        true
    }

    // ── Health ──────────────────────────────────────────────────

    /// Shield soaks damage first; overflow reaches HP in the same call.
    pub fn take_damage(&mut self, amount: u32) -> DamageTaken {
        let absorbed_by_shield = self.shield.min(amount);
        self.shield -= absorbed_by_shield;
        let hp_lost = (amount - absorbed_by_shield).min(self.current_hp);
        self.current_hp -= hp_lost;
        DamageTaken {
            absorbed_by_shield,
            hp_lost,
        }
    }

    /// Heals up to max HP and returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp());
        self.current_hp - before
    }

    pub fn full_restore(&mut self) {
        self.current_hp = self.max_hp();
    }

    pub fn add_shield(&mut self, amount: u32) {
        self.shield = self.shield.saturating_add(amount);
    }

    pub fn clear_shield(&mut self) {
        self.shield = 0;
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp == 0
    }

    /// Repairs fields a hand-edited save could break. HP is re-clamped when
    /// equipment bonuses are applied, since the stored value may include them.
    pub fn normalize(&mut self) {
        self.level = self.level.clamp(1, MAX_LEVEL);
        if self.current_hp == 0 {
            self.current_hp = self.max_hp();
        }
    }
}

impl Combatant for PlayerStats {
    fn attack_power(&self) -> f64 {
        self.total_attack() as f64
    }

    fn defense(&self) -> f64 {
        self.total_defense() as f64
    }

    fn crit_rate(&self) -> f64 {
        self.total_crit_rate()
    }

    fn crit_bonus(&self) -> f64 {
        self.base_crit_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bonuses(attack: u32, defense: u32, hp: u32, crit_rate: f64) -> EquipmentBonuses {
        EquipmentBonuses {
            attack,
            defense,
            hp,
            crit_rate,
        }
    }

    // =========================================================================
    // Derived totals
    // =========================================================================

    #[test]
    fn test_default_player_is_at_full_hp() {
        let stats = PlayerStats::default();
        assert_eq!(stats.level, 1);
        assert_eq!(stats.gold, 100);
        assert_eq!(stats.max_hp(), 100);
        assert_eq!(stats.current_hp, 100);
        assert_eq!(stats.total_attack(), 10);
        assert_eq!(stats.total_defense(), 5);
    }

    #[test]
    fn test_level_scaling_and_equipment_add_up() {
        let mut stats = PlayerStats::default();
        stats.level = 4;
        stats.apply_equipment_bonus(bonuses(5, 3, 10, 0.01));
        assert_eq!(stats.max_hp(), 100 + 10 + 30);
        assert_eq!(stats.total_attack(), 10 + 5 + 6);
        assert_eq!(stats.total_defense(), 5 + 3 + 3);
        assert!((stats.total_crit_rate() - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_crit_rate_clamped_to_one() {
        let mut stats = PlayerStats::default();
        stats.apply_equipment_bonus(bonuses(0, 0, 0, 2.0));
        assert_eq!(stats.total_crit_rate(), 1.0);
    }

    #[test]
    fn test_removing_hp_gear_clamps_current_hp() {
        let mut stats = PlayerStats::default();
        stats.apply_equipment_bonus(bonuses(0, 0, 50, 0.0));
        stats.full_restore();
        assert_eq!(stats.current_hp, 150);
        stats.apply_equipment_bonus(EquipmentBonuses::default());
        assert_eq!(stats.current_hp, 100);
    }

    // =========================================================================
    // Experience
    // =========================================================================

    #[test]
    fn test_add_experience_reports_level_up() {
        let mut stats = PlayerStats::default();
        assert!(!stats.add_experience(99));
        assert!(stats.add_experience(1));
        assert_eq!(stats.level, 2);
        assert_eq!(stats.experience, 0);
    }

    #[test]
    fn test_one_big_grant_matches_many_small_ones() {
        let mut once = PlayerStats::default();
        once.add_experience(5000);

        let mut split = PlayerStats::default();
        for _ in 0..5 {
            split.add_experience(1000);
        }
        assert_eq!(once.level, split.level);
        assert_eq!(once.experience, split.experience);
    }

    // =========================================================================
    // Health and shield
    // =========================================================================

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut stats = PlayerStats::default();
        let taken = stats.take_damage(500);
        assert_eq!(taken.hp_lost, 100);
        assert_eq!(stats.current_hp, 0);
        assert!(stats.is_dead());
    }

    #[test]
    fn test_shield_absorbs_then_overflows() {
        let mut stats = PlayerStats::default();
        stats.add_shield(30);
        let taken = stats.take_damage(50);
        assert_eq!(taken.absorbed_by_shield, 30);
        assert_eq!(taken.hp_lost, 20);
        assert_eq!(stats.shield(), 0);
        assert_eq!(stats.current_hp, 80);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut stats = PlayerStats::default();
        stats.take_damage(40);
        assert_eq!(stats.heal(100), 40);
        assert_eq!(stats.current_hp, stats.max_hp());
    }

    // =========================================================================
    // Economy
    // =========================================================================

    #[test]
    fn test_spend_gold_never_goes_negative() {
        let mut stats = PlayerStats::default();
        assert!(!stats.spend_gold(101));
        assert_eq!(stats.gold, 100);
        assert!(stats.spend_gold(100));
        assert_eq!(stats.gold, 0);
    }

    // =========================================================================
    // Save repair
    // =========================================================================

    #[test]
    fn test_normalize_clamps_level_into_table() {
        let mut stats = PlayerStats::default();
        stats.level = 500_000_000;
        stats.current_hp = 0;
        stats.normalize();
        assert_eq!(stats.level, MAX_LEVEL);
        assert_eq!(stats.current_hp, stats.max_hp());
        assert_eq!(stats.max_hp(), 100 + (MAX_LEVEL - 1) * HP_PER_LEVEL);

        stats.level = 0;
        stats.normalize();
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn test_derived_totals_saturate() {
        let mut stats = PlayerStats::default();
        stats.base_max_hp = u32::MAX - 5;
        stats.level = u32::MAX;
        assert_eq!(stats.max_hp(), u32::MAX);
        assert_eq!(stats.total_attack(), u32::MAX);
    }

    #[test]
    fn test_starting_level_above_cap_is_clamped() {
        let settings = PlayerSettings {
            starting_level: 500_000_000,
            ..PlayerSettings::default()
        };
        assert_eq!(PlayerStats::from_settings(&settings).level, MAX_LEVEL);
    }

    #[test]
    fn test_serialized_form_skips_transient_state() {
        let mut stats = PlayerStats::default();
        stats.add_shield(25);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(!json.contains("shield"));
        let back: PlayerStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.shield(), 0);
        assert_eq!(back.level, stats.level);
    }
}
