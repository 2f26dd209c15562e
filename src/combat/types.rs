use serde::{Deserialize, Serialize};

/// Anything that can deal and receive damage through the resolver.
///
/// Implemented by the player's stat record and by spawned monsters so both
/// attack paths share one damage and crit formula.
pub trait Combatant {
    /// Attack power before mitigation.
    fn attack_power(&self) -> f64;

    /// Defense used by the mitigation curve.
    fn defense(&self) -> f64;

    /// Chance to crit in [0, 1].
    fn crit_rate(&self) -> f64;

    /// Bonus applied on crit: final = damage * (1 + bonus).
    fn crit_bonus(&self) -> f64;
}

/// Result of one resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackResult {
    /// Damage after mitigation, crit and the minimum-damage floor.
    pub damage: u32,
    /// Whether the crit roll succeeded.
    pub is_crit: bool,
}

/// How much of a hit landed on shield versus HP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageTaken {
    pub absorbed_by_shield: u32,
    pub hp_lost: u32,
}

impl DamageTaken {
    pub fn total(&self) -> u32 {
        self.absorbed_by_shield + self.hp_lost
    }
}
