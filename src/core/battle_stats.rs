//! Per-stage battle statistics, score and grade.

use super::constants::{
    COMBO_TIMEOUT_SECONDS, SCORE_BOSS_POINTS, SCORE_COMBO_CAP, SCORE_DPS_CAP, SCORE_KILL_CAP,
    SCORE_KILL_POINTS, SCORE_SURVIVAL_CAP,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    D,
    C,
    B,
    A,
    S,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::S,
            75..=89 => Grade::A,
            55..=74 => Grade::B,
            35..=54 => Grade::C,
            _ => Grade::D,
        }
    }

    /// Star rating awarded for clearing a stage with this grade.
    pub fn stars(self) -> u8 {
        match self {
            Grade::S => 3,
            Grade::A | Grade::B => 2,
            Grade::C | Grade::D => 1,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleStats {
    pub kills: u32,
    pub bosses_killed: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub critical_hits: u32,
    pub waves_completed: u32,
    pub gold_collected: u64,
    pub exp_collected: u64,
    pub items_dropped: u32,
    pub survival_time: f64,
    pub current_combo: u32,
    pub max_combo: u32,
    last_hit_at: Option<f64>,
}

impl BattleStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_kill(&mut self, is_boss: bool) {
        self.kills += 1;
        if is_boss {
            self.bosses_killed += 1;
        }
    }

    /// A hit landed at simulation time `now`. Hits closer together than the
    /// combo window extend the combo.
    pub fn record_damage_dealt(&mut self, damage: u32, is_crit: bool, now: f64) {
        self.damage_dealt += damage as u64;
        if is_crit {
            self.critical_hits += 1;
        }
        self.current_combo = match self.last_hit_at {
            Some(last) if now - last < COMBO_TIMEOUT_SECONDS => self.current_combo + 1,
            _ => 1,
        };
        self.last_hit_at = Some(now);
        self.max_combo = self.max_combo.max(self.current_combo);
    }

    /// Taking damage breaks the combo.
    pub fn record_damage_taken(&mut self, damage: u32) {
        self.damage_taken += damage as u64;
        self.current_combo = 0;
    }

    pub fn record_gold(&mut self, amount: u64) {
        self.gold_collected += amount;
    }

    pub fn record_exp(&mut self, amount: u64) {
        self.exp_collected += amount;
    }

    pub fn record_item_dropped(&mut self) {
        self.items_dropped += 1;
    }

    pub fn record_wave_completed(&mut self) {
        self.waves_completed += 1;
    }

    pub fn add_survival_time(&mut self, dt: f64) {
        self.survival_time += dt.max(0.0);
    }

    pub fn dps(&self) -> f64 {
        if self.survival_time <= 0.0 {
            return 0.0;
        }
        self.damage_dealt as f64 / self.survival_time
    }

    /// 0..=100 from kills, DPS, combo, survival time and bosses.
    pub fn score(&self) -> u32 {
        let kills = (self.kills * SCORE_KILL_POINTS).min(SCORE_KILL_CAP);
        let dps = ((self.dps() / 100.0).floor() as u32 * 5).min(SCORE_DPS_CAP);
        let combo = (self.max_combo / 10 * 5).min(SCORE_COMBO_CAP);
        let survival = ((self.survival_time / 60.0).floor() as u32 * 5).min(SCORE_SURVIVAL_CAP);
        let bosses = self.bosses_killed * SCORE_BOSS_POINTS;
        (kills + dps + combo + survival + bosses).min(100)
    }

    pub fn grade(&self) -> Grade {
        Grade::from_score(self.score())
    }

    /// `mm:ss`
    pub fn formatted_survival_time(&self) -> String {
        let total = self.survival_time.max(0.0) as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

impl fmt::Display for BattleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kills={} bosses={} dealt={} taken={} crits={} time={} waves={} max_combo={} score={} ({})",
            self.kills,
            self.bosses_killed,
            self.damage_dealt,
            self.damage_taken,
            self.critical_hits,
            self.formatted_survival_time(),
            self.waves_completed,
            self.max_combo,
            self.score(),
            self.grade()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_builds_inside_window() {
        let mut stats = BattleStats::new();
        stats.record_damage_dealt(10, false, 0.0);
        stats.record_damage_dealt(10, false, 1.0);
        stats.record_damage_dealt(10, true, 2.5);
        assert_eq!(stats.current_combo, 3);
        stats.record_damage_dealt(10, false, 5.0);
        assert_eq!(stats.current_combo, 1, "gap of 2.5s resets the combo");
        assert_eq!(stats.max_combo, 3);
        assert_eq!(stats.critical_hits, 1);
        assert_eq!(stats.damage_dealt, 40);
    }

    #[test]
    fn test_damage_taken_breaks_combo() {
        let mut stats = BattleStats::new();
        stats.record_damage_dealt(5, false, 0.0);
        stats.record_damage_dealt(5, false, 0.5);
        stats.record_damage_taken(7);
        assert_eq!(stats.current_combo, 0);
        assert_eq!(stats.max_combo, 2);
        assert_eq!(stats.damage_taken, 7);
    }

    #[test]
    fn test_dps_zero_without_time() {
        let mut stats = BattleStats::new();
        stats.record_damage_dealt(500, false, 0.0);
        assert_eq!(stats.dps(), 0.0);
        stats.add_survival_time(10.0);
        assert_eq!(stats.dps(), 50.0);
    }

    #[test]
    fn test_score_components_and_caps() {
        let mut stats = BattleStats::new();
        for _ in 0..30 {
            stats.record_kill(false);
        }
        // 60 kill points capped at 40.
        assert_eq!(stats.score(), 40);

        stats.add_survival_time(125.0); // 2 minutes -> 10
        stats.record_kill(true); // +10 boss
        assert_eq!(stats.score(), 60);
        assert_eq!(stats.grade(), Grade::B);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let mut stats = BattleStats::new();
        for _ in 0..10 {
            stats.record_kill(true);
        }
        assert_eq!(stats.score(), 100);
        assert_eq!(stats.grade(), Grade::S);
    }

    #[test]
    fn test_grade_thresholds_and_stars() {
        assert_eq!(Grade::from_score(90), Grade::S);
        assert_eq!(Grade::from_score(89), Grade::A);
        assert_eq!(Grade::from_score(55), Grade::B);
        assert_eq!(Grade::from_score(35), Grade::C);
        assert_eq!(Grade::from_score(34), Grade::D);
        assert_eq!(Grade::S.stars(), 3);
        assert_eq!(Grade::B.stars(), 2);
        assert_eq!(Grade::D.stars(), 1);
    }

    #[test]
    fn test_formatted_survival_time() {
        let mut stats = BattleStats::new();
        stats.add_survival_time(125.7);
        assert_eq!(stats.formatted_survival_time(), "02:05");
    }
}
