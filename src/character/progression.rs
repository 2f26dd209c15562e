//! Level curve.
//!
//! Leaving level `N` costs `EXP_TABLE[N]` experience. Past the end of the
//! table there is no next level, so experience keeps accumulating.

use crate::core::constants::EXP_TABLE;

/// Highest reachable level.
pub const MAX_LEVEL: u32 = EXP_TABLE.len() as u32;

/// Experience needed to leave `level`, or `None` at the cap.
pub fn exp_to_next_level(level: u32) -> Option<u64> {
    if level >= MAX_LEVEL {
        return None;
    }
    EXP_TABLE.get(level as usize).map(|&exp| exp as u64)
}

/// Spends banked experience on level-ups. Returns the number of levels gained.
pub fn apply_level_ups(level: &mut u32, experience: &mut u64) -> u32 {
    let mut gained = 0;
    while let Some(threshold) = exp_to_next_level(*level) {
        if *experience < threshold {
            break;
        }
        *experience -= threshold;
        *level += 1;
        gained += 1;
    }
    gained
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_table_is_monotonic() {
        for pair in EXP_TABLE[1..].windows(2) {
            assert!(pair[0] < pair[1], "thresholds must increase: {:?}", pair);
        }
    }

    #[test]
    fn test_exp_to_next_level() {
        assert_eq!(exp_to_next_level(1), Some(100));
        assert_eq!(exp_to_next_level(2), Some(250));
        assert_eq!(exp_to_next_level(10), Some(6000));
        assert_eq!(exp_to_next_level(MAX_LEVEL), None);
    }

    #[test]
    fn test_single_level_up_keeps_leftover() {
        let (mut level, mut exp) = (1, 130);
        assert_eq!(apply_level_ups(&mut level, &mut exp), 1);
        assert_eq!((level, exp), (2, 30));
    }

    #[test]
    fn test_large_grant_crosses_several_levels() {
        let (mut level, mut exp) = (1, 1000);
        // 100 + 250 + 500 = 850, then 850 needed for level 5
        assert_eq!(apply_level_ups(&mut level, &mut exp), 3);
        assert_eq!((level, exp), (4, 150));
    }

    #[test]
    fn test_cap_stops_levelling() {
        let (mut level, mut exp) = (1, 1_000_000);
        apply_level_ups(&mut level, &mut exp);
        assert_eq!(level, MAX_LEVEL);
        let total: u64 = EXP_TABLE[1..].iter().map(|&e| e as u64).sum();
        assert_eq!(exp, 1_000_000 - total);
    }
}
