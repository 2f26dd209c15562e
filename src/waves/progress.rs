//! Which stages the player has cleared, unlocked, and how well.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    /// Highest stage id cleared, 0 when none.
    pub highest_stage_cleared: u32,
    pub highest_unlocked_stage: u32,
    pub cleared_stages: Vec<u32>,
    /// Best star rating per stage, 1..=3.
    pub stage_stars: BTreeMap<u32, u8>,
}

impl Default for StageProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl StageProgress {
    pub fn new() -> Self {
        Self {
            highest_stage_cleared: 0,
            highest_unlocked_stage: 1,
            cleared_stages: Vec::new(),
            stage_stars: BTreeMap::new(),
        }
    }

    pub fn is_cleared(&self, stage_id: u32) -> bool {
        self.cleared_stages.contains(&stage_id)
    }

    pub fn is_unlocked(&self, stage_id: u32) -> bool {
        stage_id <= self.highest_unlocked_stage
    }

    /// Marks a clear and unlocks the next stage.
    pub fn mark_cleared(&mut self, stage_id: u32) {
        if !self.cleared_stages.contains(&stage_id) {
            self.cleared_stages.push(stage_id);
            self.cleared_stages.sort_unstable();
        }
        self.highest_stage_cleared = self.highest_stage_cleared.max(stage_id);
        self.highest_unlocked_stage = self.highest_unlocked_stage.max(stage_id + 1);
    }

    pub fn stars(&self, stage_id: u32) -> u8 {
        self.stage_stars.get(&stage_id).copied().unwrap_or(0)
    }

    /// Records a rating if it beats the previous best. Out-of-range values are ignored.
    pub fn record_stars(&mut self, stage_id: u32, stars: u8) -> bool {
        if !(1..=3).contains(&stars) || stars <= self.stars(stage_id) {
            return false;
        }
        self.stage_stars.insert(stage_id, stars);
        true
    }

    pub fn total_stars(&self) -> u32 {
        self.stage_stars.values().map(|&s| s as u32).sum()
    }
}
