//! Item system: catalog, equipment loadout and inventory.

pub mod catalog;
pub mod equipment;
pub mod inventory;
pub mod types;

pub use catalog::ItemCatalog;
pub use equipment::{EquipmentRegistry, Loadout};
pub use inventory::{Inventory, UseOutcome};
pub use types::*;
