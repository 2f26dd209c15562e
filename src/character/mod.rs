//! Player stat model and level curve.

pub mod progression;
pub mod stats;

pub use progression::{exp_to_next_level, MAX_LEVEL};
pub use stats::PlayerStats;
