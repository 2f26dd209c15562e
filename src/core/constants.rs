// Timing
pub const TICK_INTERVAL_MS: u64 = 100;
pub const AUTOSAVE_INTERVAL_SECONDS: f64 = 30.0;
pub const COMBO_TIMEOUT_SECONDS: f64 = 2.0;

// Player defaults
pub const DEFAULT_STARTING_GOLD: u64 = 100;
pub const DEFAULT_STARTING_LEVEL: u32 = 1;
pub const DEFAULT_BASE_MAX_HP: u32 = 100;
pub const DEFAULT_BASE_ATTACK: u32 = 10;
pub const DEFAULT_BASE_DEFENSE: u32 = 5;
pub const DEFAULT_BASE_CRIT_RATE: f64 = 0.05;
pub const DEFAULT_BASE_CRIT_BONUS: f64 = 0.5;
pub const DEFAULT_MOVE_SPEED: f64 = 5.0;
pub const DEFAULT_ATTACK_RANGE: f64 = 1.5;
pub const DEFAULT_ATTACK_SPEED: f64 = 1.0;

// Level scaling: derived = base + (level - 1) * per_level
pub const HP_PER_LEVEL: u32 = 10;
pub const ATTACK_PER_LEVEL: u32 = 2;
pub const DEFENSE_PER_LEVEL: u32 = 1;

// Experience required to leave level N is EXP_TABLE[N]
pub const EXP_TABLE: [u32; 11] = [0, 100, 250, 500, 850, 1300, 1900, 2600, 3500, 4600, 6000];

// Combat
pub const DEFENSE_MITIGATION_CONSTANT: f64 = 100.0;
pub const DEFAULT_MIN_DAMAGE: u32 = 1;
pub const DEFAULT_MONSTER_CRIT_RATE: f64 = 0.10;
pub const DEFAULT_MONSTER_CRIT_BONUS: f64 = 0.5;
pub const DEFAULT_PARTIAL_REWARD_RATIO: f64 = 0.5;

// Inventory
pub const DEFAULT_INVENTORY_CAPACITY: usize = 30;
pub const DEFAULT_MAX_STACK: u32 = 99;

// Waves
pub const DEFAULT_MONSTERS_PER_WAVE: u32 = 3;
pub const DEFAULT_WAVE_COUNT: u32 = 3;
pub const DEFAULT_SPAWN_INTERVAL_SECONDS: f64 = 3.0;
pub const DEFAULT_INTER_WAVE_DELAY_SECONDS: f64 = 2.0;
pub const WAVE_DIFFICULTY_STEP: f64 = 0.15;
pub const ELITE_WAVE_INTERVAL: u32 = 5;

// Fallback rotation, keyed by wave % 3
pub const FALLBACK_ROTATION: [&str; 3] = ["MON_WOLF_001", "MON_SLIME_001", "MON_GOBLIN_001"];
pub const FALLBACK_ELITE_ID: &str = "MON_ELITE_001";
pub const FALLBACK_BOSS_ID: &str = "MON_BOSS_001";

// Loot
pub const DEFAULT_DROP_TABLE_ID: &str = "DROP_NORMAL";
pub const ELITE_DROP_TABLE_ID: &str = "DROP_ELITE";
pub const BOSS_DROP_TABLE_ID: &str = "DROP_BOSS";

// Persistence
pub const SAVE_VERSION: u32 = 1;
pub const SAVE_VERSION_MAGIC: u64 = 0x4152_454E_4153_5631; // "ARENASV1"
pub const PRIMARY_SAVE_KEY: &str = "save_primary";
pub const BACKUP_SAVE_KEY: &str = "save_backup";

// Battle score caps
pub const SCORE_KILL_POINTS: u32 = 2;
pub const SCORE_KILL_CAP: u32 = 40;
pub const SCORE_DPS_CAP: u32 = 20;
pub const SCORE_COMBO_CAP: u32 = 15;
pub const SCORE_SURVIVAL_CAP: u32 = 15;
pub const SCORE_BOSS_POINTS: u32 = 10;
