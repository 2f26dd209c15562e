use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque id for one spawned monster, unique within a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterHandle(pub u64);

impl fmt::Display for MonsterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the wave state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WavePhase {
    /// No stage is running.
    #[default]
    Idle,
    /// Issuing spawn requests on the spawn timer.
    Spawning,
    /// Every request for this wave is out; waiting for the kills.
    WaitingForClear,
    /// Wave cleared, counting down the inter-wave delay.
    NextWave,
    StageCleared,
}

impl WavePhase {
    pub fn is_active(self) -> bool {
        matches!(
            self,
            WavePhase::Spawning | WavePhase::WaitingForClear | WavePhase::NextWave
        )
    }
}

/// Read-only view of the scheduler for UI and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveState {
    pub stage_id: u32,
    pub wave_count: u32,
    pub current_wave: u32,
    pub kills_this_wave: u32,
    pub spawned_this_wave: u32,
    pub to_spawn_this_wave: u32,
    pub active_monsters: Vec<MonsterHandle>,
    pub phase: WavePhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_phases() {
        assert!(!WavePhase::Idle.is_active());
        assert!(WavePhase::Spawning.is_active());
        assert!(WavePhase::WaitingForClear.is_active());
        assert!(WavePhase::NextWave.is_active());
        assert!(!WavePhase::StageCleared.is_active());
    }
}
