//! Win-probability model.
//!
//! Converts raw engine scores into a bounded display height for an
//! evaluation bar and a 0-100 win chance. The win-chance curve drives the
//! label thresholds in [`crate::classify`], so its constant must not change.

use crate::eval::EngineScore;

/// Centipawn advantage at which the evaluation bar saturates.
pub const SATURATION_LIMIT_CP: f64 = 1000.0;

/// Minimum centipawn swing for a position flip to count as crucial.
pub const GREAT_SWING_CP: i64 = 150;

/// Slope of the logistic win-chance curve. Empirically calibrated; the
/// classification thresholds assume exactly this value.
const WIN_CHANCE_K: f64 = 0.00368208;

fn height_for_cp(value: f64) -> f64 {
    // Power-law compression keeps small advantages visible while large ones
    // saturate toward the limit.
    let root_value = value.signum() * value.abs().powf(0.6);
    let root_limit = SATURATION_LIMIT_CP.powf(0.6);
    ((root_value + root_limit) / (2.0 * root_limit)).clamp(0.05, 0.95)
}

/// Display height in `[0.05, 0.95]` for centipawn scores; mate is a hard
/// `1.0` / `0.0` by mating side, with no gradation by distance.
pub fn evaluation_height(score: EngineScore) -> f64 {
    match score {
        EngineScore::Cp(cp) => height_for_cp(cp as f64),
        EngineScore::Mate(n) => {
            if n > 0 {
                1.0
            } else {
                0.0
            }
        }
    }
}

fn win_chance_for_cp(centipawns: f64) -> f64 {
    50.0 + 50.0 * (2.0 / (1.0 + (-WIN_CHANCE_K * centipawns).exp()) - 1.0)
}

/// Win chance in `[0, 100]` for the side favored by positive scores.
/// Mate maps to 100 or 0 by sign.
pub fn win_chance(score: EngineScore) -> f64 {
    match score {
        EngineScore::Cp(cp) => win_chance_for_cp(cp as f64).clamp(0.0, 100.0),
        EngineScore::Mate(n) => {
            if n > 0 {
                100.0
            } else {
                0.0
            }
        }
    }
}

/// Unsigned win-chance delta between two evaluations of consecutive
/// positions. The classifier applies the side-to-move sign separately.
pub fn win_chance_lost(previous: EngineScore, current: EngineScore) -> f64 {
    win_chance(previous) - win_chance(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn win_chance_is_exactly_50_at_zero() {
        assert_eq!(win_chance(EngineScore::Cp(0)), 50.0);
    }

    #[test]
    fn win_chance_mate_is_a_hard_cutoff() {
        assert_eq!(win_chance(EngineScore::Mate(1)), 100.0);
        assert_eq!(win_chance(EngineScore::Mate(12)), 100.0);
        assert_eq!(win_chance(EngineScore::Mate(-1)), 0.0);
        assert_eq!(win_chance(EngineScore::Mate(0)), 0.0);
        assert_eq!(win_chance(EngineScore::CHECKMATE_WHITE), 100.0);
        assert_eq!(win_chance(EngineScore::CHECKMATE_BLACK), 0.0);
    }

    #[test]
    fn height_mate_is_a_hard_cutoff() {
        assert_eq!(evaluation_height(EngineScore::Mate(5)), 1.0);
        assert_eq!(evaluation_height(EngineScore::Mate(-5)), 0.0);
    }

    #[test]
    fn height_is_centered_at_zero() {
        assert_eq!(evaluation_height(EngineScore::Cp(0)), 0.5);
    }

    #[test]
    fn height_saturates_past_the_limit() {
        assert_eq!(evaluation_height(EngineScore::Cp(5000)), 0.95);
        assert_eq!(evaluation_height(EngineScore::Cp(-5000)), 0.05);
    }

    proptest! {
        #[test]
        fn height_stays_in_bounds(cp in -1_000_000i32..=1_000_000) {
            let h = evaluation_height(EngineScore::Cp(cp));
            prop_assert!((0.05..=0.95).contains(&h));
        }

        #[test]
        fn height_is_monotonic(a in -1_000_000i32..=1_000_000, b in -1_000_000i32..=1_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                evaluation_height(EngineScore::Cp(lo)) <= evaluation_height(EngineScore::Cp(hi))
            );
        }

        #[test]
        fn win_chance_stays_in_bounds(cp in i32::MIN..=i32::MAX) {
            let wc = win_chance(EngineScore::Cp(cp));
            prop_assert!((0.0..=100.0).contains(&wc));
        }

        // Strict monotonicity holds over the range where f64 can still
        // resolve the logistic curve; the tails saturate to 0/100.
        #[test]
        fn win_chance_is_strictly_increasing(a in -2000i32..2000, b in -2000i32..2000) {
            prop_assume!(a < b);
            prop_assert!(win_chance(EngineScore::Cp(a)) < win_chance(EngineScore::Cp(b)));
        }

        #[test]
        fn win_chance_lost_is_antisymmetric(a in -5000i32..=5000, b in -5000i32..=5000) {
            let a = EngineScore::Cp(a);
            let b = EngineScore::Cp(b);
            prop_assert_eq!(win_chance_lost(a, b), -win_chance_lost(b, a));
        }
    }
}
