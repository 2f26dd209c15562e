//! Shared constants, the event model and the simulation context.

pub mod battle_stats;
pub mod clock;
pub mod constants;
pub mod events;
pub mod simulation;

pub use battle_stats::{BattleStats, Grade};
pub use clock::GameClock;
pub use events::{DamageTarget, EventQueue, GameEvent};
pub use simulation::{Simulation, StageOutcome};
