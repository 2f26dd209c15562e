//! Shop, selling and skill upgrades.

pub mod logic;
pub mod types;

pub use logic::{try_buy, try_sell, try_upgrade_skill};
pub use types::{
    default_shop_listings, default_skills, PurchaseOutcome, SaleOutcome, ShopCatalog, ShopListing, SkillCatalog,
    SkillDef, SkillUpgradeOutcome,
};
