//! Stage definitions: how many waves, which enemies each wave draws from,
//! and the rewards for finishing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One wave's enemy pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageWave {
    pub enemy_ids: Vec<String>,
    /// Overrides the spawn interval for this wave, in seconds.
    #[serde(default)]
    pub spawn_delay: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub id: u32,
    pub name: String,
    pub wave_count: u32,
    /// Indexed by wave number minus one. Missing or empty entries use the fallback rotation.
    #[serde(default)]
    pub waves: Vec<StageWave>,
    pub gold_reward: u64,
    pub exp_reward: u64,
    #[serde(default)]
    pub recommended_level: u32,
}

impl StageConfig {
    /// A stage with no enemy pools, driven entirely by the fallback rotation.
    pub fn fallback(id: u32, wave_count: u32) -> Self {
        Self {
            id,
            name: format!("Stage {id}"),
            wave_count: wave_count.max(1),
            waves: Vec::new(),
            gold_reward: 100,
            exp_reward: 50,
            recommended_level: 1,
        }
    }

    /// Enemy pool for a 1-based wave number, if the stage defines one.
    pub fn pool_for_wave(&self, wave: u32) -> Option<&[String]> {
        let index = wave.checked_sub(1)? as usize;
        self.waves
            .get(index)
            .map(|w| w.enemy_ids.as_slice())
            .filter(|pool| !pool.is_empty())
    }

    pub fn spawn_delay_for_wave(&self, wave: u32) -> Option<f64> {
        let index = wave.checked_sub(1)? as usize;
        self.waves.get(index).and_then(|w| w.spawn_delay)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StageCatalog {
    stages: BTreeMap<u32, StageConfig>,
}

impl StageCatalog {
    pub fn new(stages: Vec<StageConfig>) -> Self {
        Self {
            stages: stages.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_stages())
    }

    pub fn get(&self, id: u32) -> Option<&StageConfig> {
        self.stages.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.stages.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

fn wave(ids: &[&str]) -> StageWave {
    StageWave {
        enemy_ids: ids.iter().map(|id| id.to_string()).collect(),
        spawn_delay: None,
    }
}

pub fn default_stages() -> Vec<StageConfig> {
    vec![
        StageConfig {
            id: 1,
            name: "Forest Edge".to_string(),
            wave_count: 3,
            waves: vec![
                wave(&["MON_SLIME_001"]),
                wave(&["MON_SLIME_001", "MON_GOBLIN_001"]),
                wave(&["MON_GOBLIN_001", "MON_WOLF_001"]),
            ],
            gold_reward: 100,
            exp_reward: 50,
            recommended_level: 1,
        },
        StageConfig {
            id: 2,
            name: "Goblin Camp".to_string(),
            wave_count: 4,
            waves: vec![
                wave(&["MON_GOBLIN_001"]),
                wave(&["MON_GOBLIN_001", "MON_WOLF_001"]),
                wave(&["MON_WOLF_001", "MON_GOBLIN_001"]),
                wave(&["MON_GOBLIN_001", "MON_GOBLIN_001", "MON_ELITE_001"]),
            ],
            gold_reward: 200,
            exp_reward: 120,
            recommended_level: 3,
        },
        StageConfig {
            id: 3,
            name: "Wolf Den".to_string(),
            wave_count: 5,
            waves: vec![
                wave(&["MON_WOLF_001"]),
                wave(&["MON_WOLF_001", "MON_GOBLIN_001"]),
                wave(&["MON_WOLF_001"]),
                wave(&["MON_WOLF_001", "MON_ELITE_001"]),
                StageWave {
                    enemy_ids: vec![
                        "MON_WOLF_001".to_string(),
                        "MON_WOLF_001".to_string(),
                        "MON_BOSS_001".to_string(),
                    ],
                    spawn_delay: Some(2.0),
                },
            ],
            gold_reward: 400,
            exp_reward: 300,
            recommended_level: 6,
        },
    ]
}
