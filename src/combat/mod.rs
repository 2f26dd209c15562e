//! Combat resolver: damage curve, crit rolls and area hit tests.

pub mod geometry;
pub mod logic;
pub mod types;

pub use geometry::{hits, AreaShape, Transform, Vec3};
pub use logic::{resolve_attack, resolve_damage, roll_critical};
pub use types::{AttackResult, Combatant, DamageTaken};
