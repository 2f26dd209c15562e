use crate::character::PlayerStats;
use crate::core::constants::SAVE_VERSION;
use crate::waves::StageProgress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Versioned root of everything persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// RFC 3339 timestamp of the write.
    pub saved_at: String,
    pub player: PlayerStats,
    /// Slot name to equipment id.
    #[serde(default)]
    pub equipped_items: BTreeMap<String, String>,
    /// Item id to total count.
    #[serde(default)]
    pub inventory: BTreeMap<String, u32>,
    #[serde(default)]
    pub progress: StageProgress,
    #[serde(default)]
    pub skill_levels: BTreeMap<String, u32>,
    #[serde(default)]
    pub total_play_time_secs: u64,
}

/// Top-level keys a payload must carry to be usable.
pub const REQUIRED_ROOT_FIELDS: [&str; 2] = ["version", "player"];

impl SaveData {
    /// A fresh save around the given starting player.
    pub fn new(player: PlayerStats) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: Utc::now().to_rfc3339(),
            player,
            equipped_items: BTreeMap::new(),
            inventory: BTreeMap::new(),
            progress: StageProgress::new(),
            skill_levels: BTreeMap::new(),
            total_play_time_secs: 0,
        }
    }

    pub fn saved_at_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.saved_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

impl Default for SaveData {
    fn default() -> Self {
        Self::new(PlayerStats::default())
    }
}
