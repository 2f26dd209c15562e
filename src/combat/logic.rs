//! Pure combat math shared by the player and monster attack paths.
//!
//! Nothing here touches simulation state. The only source of randomness is
//! the single crit draw taken from the caller's RNG.

use super::types::{AttackResult, Combatant};
use crate::core::constants::DEFENSE_MITIGATION_CONSTANT;
use rand::Rng;

/// Damage after the diminishing-returns defense curve.
///
/// `damage = attack * (1 - defense / (defense + 100))`. Defense D removes
/// D/(D+100) of the hit, so mitigation approaches but never reaches 100%.
/// Negative defense is treated as zero.
pub fn resolve_damage(attack_power: f64, defense: f64) -> f64 {
    let defense = defense.max(0.0);
    let reduction = defense / (defense + DEFENSE_MITIGATION_CONSTANT);
    attack_power * (1.0 - reduction)
}

/// Fraction of incoming damage removed by `defense`.
pub fn mitigation_fraction(defense: f64) -> f64 {
    let defense = defense.max(0.0);
    defense / (defense + DEFENSE_MITIGATION_CONSTANT)
}

/// Roll for a critical hit: one uniform [0, 1) draw compared against the rate.
pub fn roll_critical(crit_rate: f64, rng: &mut impl Rng) -> bool {
    let roll: f64 = rng.gen();
    roll < crit_rate
}

/// Damage multiplier on a successful crit.
pub fn crit_multiplier(crit_bonus: f64) -> f64 {
    1.0 + crit_bonus.max(0.0)
}

/// Full attack resolution: crit roll, crit bonus, mitigation, then the floor.
///
/// The floor keeps every landed hit at `min_damage` or above once rounded.
pub fn resolve_attack(
    attacker: &impl Combatant,
    defender: &impl Combatant,
    min_damage: u32,
    rng: &mut impl Rng,
) -> AttackResult {
    let is_crit = roll_critical(attacker.crit_rate(), rng);

    let mut raw = attacker.attack_power();
    if is_crit {
        raw *= crit_multiplier(attacker.crit_bonus());
    }

    let mitigated = resolve_damage(raw, defender.defense());
    let damage = (mitigated.round().max(0.0) as u32).max(min_damage);

    AttackResult { damage, is_crit }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Dummy {
        attack: f64,
        defense: f64,
        crit_rate: f64,
        crit_bonus: f64,
    }

    impl Combatant for Dummy {
        fn attack_power(&self) -> f64 {
            self.attack
        }
        fn defense(&self) -> f64 {
            self.defense
        }
        fn crit_rate(&self) -> f64 {
            self.crit_rate
        }
        fn crit_bonus(&self) -> f64 {
            self.crit_bonus
        }
    }

    fn dummy(attack: f64, defense: f64, crit_rate: f64) -> Dummy {
        Dummy {
            attack,
            defense,
            crit_rate,
            crit_bonus: 0.5,
        }
    }

    #[test]
    fn test_zero_defense_takes_full_damage() {
        assert_eq!(resolve_damage(50.0, 0.0), 50.0);
    }

    #[test]
    fn test_hundred_defense_halves_damage() {
        assert!((resolve_damage(80.0, 100.0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_damage_bounded_and_strictly_decreasing() {
        for attack in [1.0, 10.0, 250.0, 9999.0] {
            let mut previous = f64::INFINITY;
            for defense in (0..2000).step_by(7) {
                let damage = resolve_damage(attack, defense as f64);
                assert!(damage > 0.0, "A={attack} D={defense} gave {damage}");
                assert!(damage <= attack);
                assert!(damage < previous, "not strictly decreasing at D={defense}");
                previous = damage;
            }
        }
    }

    #[test]
    fn test_negative_defense_is_clamped() {
        assert_eq!(resolve_damage(40.0, -30.0), 40.0);
        assert_eq!(mitigation_fraction(-5.0), 0.0);
    }

    #[test]
    fn test_roll_critical_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(!roll_critical(0.0, &mut rng));
            assert!(roll_critical(1.0, &mut rng));
        }
    }

    #[test]
    fn test_roll_critical_converges() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let trials = 20_000;
        for p in [0.05, 0.25, 0.5, 0.9] {
            let hits = (0..trials).filter(|_| roll_critical(p, &mut rng)).count();
            let rate = hits as f64 / trials as f64;
            // ~5 standard deviations of a binomial proportion
            let tolerance = 5.0 * (p * (1.0 - p) / trials as f64).sqrt();
            assert!(
                (rate - p).abs() <= tolerance,
                "p={p}: observed {rate}, tolerance {tolerance}"
            );
        }
    }

    #[test]
    fn test_crit_multiplier_is_one_plus_bonus() {
        assert_eq!(crit_multiplier(0.5), 1.5);
        assert_eq!(crit_multiplier(0.0), 1.0);
        assert_eq!(crit_multiplier(-1.0), 1.0);
    }

    #[test]
    fn test_resolve_attack_always_crits_at_full_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let attacker = dummy(100.0, 0.0, 1.0);
        let defender = dummy(0.0, 0.0, 0.0);
        let result = resolve_attack(&attacker, &defender, 1, &mut rng);
        assert!(result.is_crit);
        assert_eq!(result.damage, 150);
    }

    #[test]
    fn test_resolve_attack_applies_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let attacker = dummy(0.2, 0.0, 0.0);
        let defender = dummy(0.0, 500.0, 0.0);
        let result = resolve_attack(&attacker, &defender, 1, &mut rng);
        assert!(!result.is_crit);
        assert_eq!(result.damage, 1);
    }
}
