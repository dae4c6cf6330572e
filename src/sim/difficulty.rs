//! Difficulty ramp
//!
//! A step function of elapsed playing time: +0.5 every 10 seconds.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Seconds of play per difficulty step
pub const DIFFICULTY_STEP_SECS: f32 = 10.0;
/// Difficulty gained per step
pub const DIFFICULTY_STEP: f32 = 0.5;

/// Difficulty level for the given elapsed playing time
#[inline]
pub fn difficulty_level(elapsed_secs: f32) -> f32 {
    1.0 + (elapsed_secs.max(0.0) / DIFFICULTY_STEP_SECS).floor() * DIFFICULTY_STEP
}

/// Everything the spawner needs from the ramp for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    pub level: f32,
    /// Standard batch cadence (seconds)
    pub spawn_interval: f32,
    /// Bomb cadence (seconds)
    pub bomb_interval: f32,
    /// Multiplier on the vertical launch speed
    pub launch_scale: f32,
    /// Probability that a due bomb is actually thrown
    pub bomb_chance: f32,
}

impl DifficultyParams {
    /// Derive cadence and launch parameters.
    ///
    /// `level` is passed separately so the caller can hold it monotonic.
    pub fn derive(level: f32, elapsed_secs: f32, tuning: &Tuning) -> Self {
        let elapsed = elapsed_secs.max(0.0);
        let steps = level - 1.0;
        Self {
            level,
            spawn_interval: (tuning.spawn_interval_base - elapsed * tuning.spawn_interval_shrink)
                .max(tuning.spawn_interval_min),
            bomb_interval: (tuning.bomb_interval_base - elapsed * tuning.bomb_interval_shrink)
                .max(tuning.bomb_interval_min),
            launch_scale: 1.0 + steps * tuning.launch_scale_step,
            bomb_chance: (tuning.bomb_chance_base + steps * tuning.bomb_chance_step)
                .min(tuning.bomb_chance_max),
        }
    }

    /// Parameters at the very start of a session
    pub fn initial(tuning: &Tuning) -> Self {
        Self::derive(1.0, 0.0, tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_steps() {
        assert_eq!(difficulty_level(0.0), 1.0);
        assert_eq!(difficulty_level(9.99), 1.0);
        assert_eq!(difficulty_level(10.0), 1.5);
        assert_eq!(difficulty_level(25.0), 2.0);
        assert_eq!(difficulty_level(60.0), 4.0);
    }

    #[test]
    fn test_params_clamp_to_floors() {
        let tuning = Tuning::default();
        let late = DifficultyParams::derive(difficulty_level(3600.0), 3600.0, &tuning);
        assert_eq!(late.spawn_interval, tuning.spawn_interval_min);
        assert_eq!(late.bomb_interval, tuning.bomb_interval_min);
        assert_eq!(late.bomb_chance, tuning.bomb_chance_max);
    }

    #[test]
    fn test_initial_params() {
        let tuning = Tuning::default();
        let p = DifficultyParams::initial(&tuning);
        assert_eq!(p.level, 1.0);
        assert_eq!(p.spawn_interval, tuning.spawn_interval_base);
        assert_eq!(p.launch_scale, 1.0);
        assert_eq!(p.bomb_chance, tuning.bomb_chance_base);
    }

    proptest! {
        #[test]
        fn prop_level_is_non_decreasing(a in 0.0f32..10_000.0, b in 0.0f32..10_000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(difficulty_level(lo) <= difficulty_level(hi));
        }

        #[test]
        fn prop_spawn_interval_non_increasing(a in 0.0f32..1_000.0, b in 0.0f32..1_000.0) {
            let tuning = Tuning::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let early = DifficultyParams::derive(difficulty_level(lo), lo, &tuning);
            let late = DifficultyParams::derive(difficulty_level(hi), hi, &tuning);
            prop_assert!(late.spawn_interval <= early.spawn_interval);
            prop_assert!(late.bomb_interval <= early.bomb_interval);
            prop_assert!(late.launch_scale >= early.launch_scale);
        }
    }
}
