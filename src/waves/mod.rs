//! Wave scheduler, monster catalog and stage definitions.

pub mod monsters;
pub mod progress;
pub mod scheduler;
pub mod stages;
pub mod types;

pub use monsters::{MonsterCatalog, MonsterConfig, MonsterInstance, MonsterTier};
pub use progress::StageProgress;
pub use scheduler::WaveScheduler;
pub use stages::{StageCatalog, StageConfig, StageWave};
pub use types::{MonsterHandle, WavePhase, WaveState};
