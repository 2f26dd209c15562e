//! Config directory loader.
//!
//! Each file is one section. A section is parsed into its schema struct as a
//! whole and validated; if anything goes wrong that section alone falls back
//! to the built-in defaults and the failure is logged.

use super::{ConfigError, GameSettings};
use crate::economy::{default_shop_listings, default_skills, ShopCatalog, ShopListing, SkillCatalog, SkillDef};
use crate::items::catalog::{default_equipment, default_items};
use crate::items::{Equipment, ItemCatalog, ItemDef};
use crate::loot::{default_drop_tables, DropTable, LootEngine};
use crate::waves::monsters::default_monsters;
use crate::waves::stages::default_stages;
use crate::waves::{MonsterCatalog, MonsterConfig, StageCatalog, StageConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const SETTINGS_FILE: &str = "game_settings.json";
pub const MONSTERS_FILE: &str = "monsters.json";
pub const STAGES_FILE: &str = "stages.json";
pub const EQUIPMENT_FILE: &str = "equipment.json";
pub const ITEMS_FILE: &str = "items.json";
pub const DROP_TABLES_FILE: &str = "drop_tables.json";
pub const SHOP_FILE: &str = "shop.json";
pub const SKILLS_FILE: &str = "skills.json";

#[derive(Debug, Serialize, Deserialize)]
struct MonsterFile {
    monsters: Vec<MonsterConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StageFile {
    stages: Vec<StageConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EquipmentFile {
    equipment: Vec<Equipment>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemFile {
    items: Vec<ItemDef>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DropTableFile {
    drop_tables: Vec<DropTable>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ShopFile {
    listings: Vec<ShopListing>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SkillFile {
    skills: Vec<SkillDef>,
}

/// Where a section's data came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    File(PathBuf),
    #[default]
    Default,
}

impl ConfigSource {
    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigReport {
    pub settings: ConfigSource,
    pub monsters: ConfigSource,
    pub stages: ConfigSource,
    pub equipment: ConfigSource,
    pub items: ConfigSource,
    pub drop_tables: ConfigSource,
    pub shop: ConfigSource,
    pub skills: ConfigSource,
}

/// Every tunable table the simulation reads.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub settings: GameSettings,
    pub items: ItemCatalog,
    pub monsters: MonsterCatalog,
    pub stages: StageCatalog,
    pub loot: LootEngine,
    pub shop: ShopCatalog,
    pub skills: SkillCatalog,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            settings: GameSettings::default(),
            items: ItemCatalog::with_defaults(),
            monsters: MonsterCatalog::with_defaults(),
            stages: StageCatalog::with_defaults(),
            loot: LootEngine::default(),
            shop: ShopCatalog::with_defaults(),
            skills: SkillCatalog::with_defaults(),
        }
    }
}

/// Reads and parses one JSON file.
pub fn load_section<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads, validates, and falls back to `default` on any error.
fn section<T, F, V>(dir: &Path, file: &str, validate: V, default: F) -> (T, ConfigSource)
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
    V: FnOnce(&T) -> Result<(), ConfigError>,
{
    let path = dir.join(file);
    let loaded = load_section::<T>(&path).and_then(|value| validate(&value).map(|_| value));
    match loaded {
        Ok(value) => {
            info!(file = %path.display(), "config section loaded");
            (value, ConfigSource::File(path))
        }
        Err(err) => {
            if err.is_missing() {
                warn!(file = %path.display(), "config file missing, using defaults");
            } else {
                warn!(file = %path.display(), error = %err, "config file rejected, using defaults");
            }
            (default(), ConfigSource::Default)
        }
    }
}

fn require_non_empty<T>(section: &str, items: &[T]) -> Result<(), ConfigError> {
    if items.is_empty() {
        return Err(ConfigError::invalid(section, "no entries"));
    }
    Ok(())
}

fn require_unique<'a>(section: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::invalid(section, format!("duplicate id {id}")));
        }
    }
    Ok(())
}

fn validate_monsters(file: &MonsterFile) -> Result<(), ConfigError> {
    require_non_empty("monsters", &file.monsters)?;
    require_unique("monsters", file.monsters.iter().map(|m| m.id.as_str()))?;
    if let Some(bad) = file.monsters.iter().find(|m| m.base_hp <= 0.0) {
        return Err(ConfigError::invalid("monsters", format!("{} has non-positive base_hp", bad.id)));
    }
    Ok(())
}

fn validate_stages(file: &StageFile) -> Result<(), ConfigError> {
    require_non_empty("stages", &file.stages)?;
    if let Some(bad) = file.stages.iter().find(|s| s.wave_count == 0) {
        return Err(ConfigError::invalid("stages", format!("stage {} has no waves", bad.id)));
    }
    Ok(())
}

fn validate_equipment(file: &EquipmentFile) -> Result<(), ConfigError> {
    require_non_empty("equipment", &file.equipment)?;
    require_unique("equipment", file.equipment.iter().map(|e| e.id.as_str()))
}

fn validate_items(file: &ItemFile) -> Result<(), ConfigError> {
    require_unique("items", file.items.iter().map(|i| i.id.as_str()))
}

fn validate_drop_tables(file: &DropTableFile) -> Result<(), ConfigError> {
    require_non_empty("drop_tables", &file.drop_tables)?;
    for table in &file.drop_tables {
        table
            .check()
            .map_err(|reason| ConfigError::invalid("drop_tables", reason))?;
    }
    Ok(())
}

fn validate_shop(file: &ShopFile) -> Result<(), ConfigError> {
    require_unique("shop", file.listings.iter().map(|l| l.item_id.as_str()))?;
    if let Some(bad) = file.listings.iter().find(|l| l.price == 0) {
        return Err(ConfigError::invalid("shop", format!("{} has no price", bad.item_id)));
    }
    Ok(())
}

fn validate_skills(file: &SkillFile) -> Result<(), ConfigError> {
    require_unique("skills", file.skills.iter().map(|s| s.id.as_str()))?;
    for skill in &file.skills {
        if skill.max_level == 0 {
            return Err(ConfigError::invalid("skills", format!("{} has max_level 0", skill.id)));
        }
        if !skill.cost_multiplier.is_finite() || skill.cost_multiplier < 1.0 {
            return Err(ConfigError::invalid(
                "skills",
                format!("{} cost_multiplier must be at least 1, got {}", skill.id, skill.cost_multiplier),
            ));
        }
    }
    Ok(())
}

impl GameConfig {
    /// Loads every section under `dir`. Never fails; see the report for
    /// which sections came from disk.
    pub fn load_from_dir(dir: &Path) -> (Self, ConfigReport) {
        let (settings, settings_src) = section(dir, SETTINGS_FILE, GameSettings::validate, GameSettings::default);
        let (monsters, monsters_src) = section(dir, MONSTERS_FILE, validate_monsters, || MonsterFile {
            monsters: default_monsters(),
        });
        let (stages, stages_src) = section(dir, STAGES_FILE, validate_stages, || StageFile {
            stages: default_stages(),
        });
        let (equipment, equipment_src) = section(dir, EQUIPMENT_FILE, validate_equipment, || EquipmentFile {
            equipment: default_equipment(),
        });
        let (items, items_src) = section(dir, ITEMS_FILE, validate_items, || ItemFile {
            items: default_items(),
        });
        let (drop_tables, drop_tables_src) = section(dir, DROP_TABLES_FILE, validate_drop_tables, || DropTableFile {
            drop_tables: default_drop_tables(),
        });
        let (shop, shop_src) = section(dir, SHOP_FILE, validate_shop, || ShopFile {
            listings: default_shop_listings(),
        });
        let (skills, skills_src) = section(dir, SKILLS_FILE, validate_skills, || SkillFile {
            skills: default_skills(),
        });

        let config = Self {
            settings,
            items: ItemCatalog::new(equipment.equipment, items.items),
            monsters: MonsterCatalog::new(monsters.monsters),
            stages: StageCatalog::new(stages.stages),
            loot: LootEngine::new(drop_tables.drop_tables),
            shop: ShopCatalog::new(shop.listings),
            skills: SkillCatalog::new(skills.skills),
        };
        let report = ConfigReport {
            settings: settings_src,
            monsters: monsters_src,
            stages: stages_src,
            equipment: equipment_src,
            items: items_src,
            drop_tables: drop_tables_src,
            shop: shop_src,
            skills: skills_src,
        };
        (config, report)
    }

    /// Writes the built-in defaults as a config directory.
    pub fn write_defaults(dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        write_json(&dir.join(SETTINGS_FILE), &GameSettings::default())?;
        write_json(
            &dir.join(MONSTERS_FILE),
            &MonsterFile {
                monsters: default_monsters(),
            },
        )?;
        write_json(
            &dir.join(STAGES_FILE),
            &StageFile {
                stages: default_stages(),
            },
        )?;
        write_json(
            &dir.join(EQUIPMENT_FILE),
            &EquipmentFile {
                equipment: default_equipment(),
            },
        )?;
        write_json(&dir.join(ITEMS_FILE), &ItemFile { items: default_items() })?;
        write_json(
            &dir.join(DROP_TABLES_FILE),
            &DropTableFile {
                drop_tables: default_drop_tables(),
            },
        )?;
        write_json(
            &dir.join(SHOP_FILE),
            &ShopFile {
                listings: default_shop_listings(),
            },
        )?;
        write_json(&dir.join(SKILLS_FILE), &SkillFile { skills: default_skills() })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_dir_uses_every_default() {
        let dir = TempDir::new().unwrap();
        let (config, report) = GameConfig::load_from_dir(dir.path());
        assert_eq!(report, ConfigReport::default());
        assert_eq!(config.settings, GameSettings::default());
        assert_eq!(config.monsters.len(), default_monsters().len());
        assert!(config.loot.table("DROP_NORMAL").is_some());
    }

    #[test]
    fn test_written_defaults_load_from_files() {
        let dir = TempDir::new().unwrap();
        GameConfig::write_defaults(dir.path()).unwrap();
        let (config, report) = GameConfig::load_from_dir(dir.path());
        for source in [
            &report.settings,
            &report.monsters,
            &report.stages,
            &report.equipment,
            &report.items,
            &report.drop_tables,
            &report.shop,
            &report.skills,
        ] {
            assert!(!source.is_default(), "every section should come from disk");
        }
        assert_eq!(config.items.equipment_count(), default_equipment().len());
        assert_eq!(config.skills.len(), default_skills().len());
        assert_eq!(config.shop.price("ARM_004"), Some(1200));
    }

    #[test]
    fn test_broken_section_falls_back_alone() {
        let dir = TempDir::new().unwrap();
        GameConfig::write_defaults(dir.path()).unwrap();
        fs::write(dir.path().join(MONSTERS_FILE), "{ not json").unwrap();
        let custom = r#"{"stages":[{"id":9,"name":"Solo","wave_count":1,"gold_reward":1,"exp_reward":1}]}"#;
        fs::write(dir.path().join(STAGES_FILE), custom).unwrap();

        let (config, report) = GameConfig::load_from_dir(dir.path());
        assert!(report.monsters.is_default());
        assert!(!report.stages.is_default());
        assert!(config.monsters.get("MON_SLIME_001").is_some());
        assert!(config.stages.get(9).is_some());
        assert!(config.stages.get(1).is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let mut settings = GameSettings::default();
        settings.combat.partial_reward_ratio = 3.0;
        write_json(&dir.path().join(SETTINGS_FILE), &settings).unwrap();
        let (config, report) = GameConfig::load_from_dir(dir.path());
        assert!(report.settings.is_default());
        assert_eq!(config.settings.combat.partial_reward_ratio, 0.5);
    }

    #[test]
    fn test_load_section_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_section::<GameSettings>(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_bad_skill_curve_falls_back() {
        let dir = TempDir::new().unwrap();
        let skills = r#"{"skills":[{"id":"SK001","name":"Multishot","max_level":10,
            "unlock_level":1,"base_gold_cost":100,"cost_multiplier":0.5}]}"#;
        fs::write(dir.path().join(SKILLS_FILE), skills).unwrap();
        fs::write(dir.path().join(SHOP_FILE), r#"{"listings":[{"item_id":"WPN_001","price":7}]}"#).unwrap();

        let (config, report) = GameConfig::load_from_dir(dir.path());
        assert!(report.skills.is_default());
        assert!(!report.shop.is_default());
        assert_eq!(config.skills.len(), default_skills().len());
        assert_eq!(config.shop.price("WPN_001"), Some(7));
        assert_eq!(config.shop.price("ARM_001"), None);
    }
}
