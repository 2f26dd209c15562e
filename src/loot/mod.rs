//! Loot engine: drop table evaluation.

pub mod logic;
pub mod tables;

pub use logic::{roll_drops, roll_exp, roll_gold, roll_table, LootEngine, LootRoll};
pub use tables::{default_drop_tables, DropEntry, DropTable};
