//! Data-driven game balance
//!
//! Every gameplay constant lives here so a balance pass never touches the
//! simulation code. Velocities and accelerations are per simulation tick,
//! cadences are in seconds, the trail duration is in milliseconds.

use serde::{Deserialize, Serialize};

use crate::consts::{ITEM_SIZE, STARTING_LIVES};
use crate::error::TuningError;

/// Balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Downward acceleration applied to entities each tick
    pub gravity: f32,
    /// Vertical launch speed at difficulty 1 (pixels per tick)
    pub launch_speed: f32,
    /// Launch speed gained per difficulty step above 1 (fraction)
    pub launch_scale_step: f32,
    /// Horizontal velocity per pixel of origin-to-target delta
    pub horizontal_factor: f32,
    /// Max horizontal jitter added at launch (pixels per tick, +/-)
    pub horizontal_jitter: f32,
    /// Max rotation speed magnitude (radians per tick)
    pub max_rotation_speed: f32,
    /// Fraction of velocity kept (and inverted) on wall contact
    pub wall_damping: f32,
    /// Entity sprite extent (pixels)
    pub item_size: f32,

    // === Spawning ===
    /// Standard spawn interval at t=0 (seconds)
    pub spawn_interval_base: f32,
    /// Standard spawn interval floor (seconds)
    pub spawn_interval_min: f32,
    /// Standard interval shrink per elapsed second
    pub spawn_interval_shrink: f32,
    /// Bomb interval at t=0 (seconds)
    pub bomb_interval_base: f32,
    /// Bomb interval floor (seconds)
    pub bomb_interval_min: f32,
    /// Bomb interval shrink per elapsed second
    pub bomb_interval_shrink: f32,
    /// Bomb spawn probability at difficulty 1
    pub bomb_chance_base: f32,
    /// Bomb probability gained per difficulty step
    pub bomb_chance_step: f32,
    /// Bomb probability ceiling
    pub bomb_chance_max: f32,
    /// Live bomb cap before `bomb_cap_score`
    pub bomb_cap_low: usize,
    /// Live bomb cap from `bomb_cap_score` onwards
    pub bomb_cap_high: usize,
    /// Score at which the bomb cap rises
    pub bomb_cap_score: u64,
    /// Non-bomb slices before batches grow past one
    pub batch_warmup: u32,
    /// Difficulty that unlocks triple batches
    pub triple_batch_level: f32,
    /// Triple batch probability once unlocked
    pub triple_batch_chance: f32,
    /// Difficulty that unlocks quad batches
    pub quad_batch_level: f32,
    /// Quad batch probability once unlocked
    pub quad_batch_chance: f32,
    /// Minimum horizontal gap between a bomb origin and a live target
    pub bomb_min_separation: f32,
    /// Bomb displacement, in multiples of the item size
    pub bomb_repulsion: f32,

    // === Slicing & scoring ===
    /// Hit radius as a fraction of item size
    pub slice_radius_factor: f32,
    /// Combo length that earns the bonus
    pub combo_threshold: u32,
    /// Flat bonus for a qualifying combo
    pub combo_bonus: u64,
    /// Combo display duration base (seconds)
    pub combo_display_base: f32,
    /// Combo display duration per combo hit (seconds)
    pub combo_display_per_hit: f32,
    /// Heart shake duration after a life is lost (seconds)
    pub life_lost_shake: f32,
    /// Lives at session start
    pub starting_lives: u8,

    // === Particles & trail ===
    /// Debris particles for a product slice
    pub slice_particles: usize,
    /// Debris particles for a bomb blast
    pub bomb_particles: usize,
    /// Particle life lost per second
    pub particle_decay: f32,
    /// Particle downward acceleration per tick
    pub particle_gravity: f32,
    /// Gesture trail lifetime (milliseconds)
    pub trail_duration_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.22,
            launch_speed: 15.0,
            launch_scale_step: 0.08,
            horizontal_factor: 0.012,
            horizontal_jitter: 0.5,
            max_rotation_speed: 0.05,
            wall_damping: 0.5,
            item_size: ITEM_SIZE,

            spawn_interval_base: 1.5,
            spawn_interval_min: 0.5,
            spawn_interval_shrink: 0.012,
            bomb_interval_base: 4.0,
            bomb_interval_min: 2.0,
            bomb_interval_shrink: 0.005,
            bomb_chance_base: 0.3,
            bomb_chance_step: 0.1,
            bomb_chance_max: 0.7,
            bomb_cap_low: 1,
            bomb_cap_high: 2,
            bomb_cap_score: 20,
            batch_warmup: 5,
            triple_batch_level: 1.5,
            triple_batch_chance: 0.35,
            quad_batch_level: 2.5,
            quad_batch_chance: 0.2,
            bomb_min_separation: ITEM_SIZE * 1.2,
            bomb_repulsion: 1.5,

            slice_radius_factor: 0.6,
            combo_threshold: 3,
            combo_bonus: 5,
            combo_display_base: 0.6,
            combo_display_per_hit: 0.15,
            life_lost_shake: 0.4,
            starting_lives: STARTING_LIVES,

            slice_particles: 12,
            bomb_particles: 24,
            particle_decay: 1.5,
            particle_gravity: 0.15,
            trail_duration_ms: 150.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("item_size", self.item_size),
            ("spawn_interval_min", self.spawn_interval_min),
            ("bomb_interval_min", self.bomb_interval_min),
            ("launch_speed", self.launch_speed),
            ("particle_decay", self.particle_decay),
            ("slice_radius_factor", self.slice_radius_factor),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }
        if self.spawn_interval_base < self.spawn_interval_min {
            return Err(TuningError::Invalid {
                field: "spawn_interval_base",
                reason: "must not be below spawn_interval_min",
            });
        }
        if self.bomb_interval_base < self.bomb_interval_min {
            return Err(TuningError::Invalid {
                field: "bomb_interval_base",
                reason: "must not be below bomb_interval_min",
            });
        }
        if !(0.0..=1.0).contains(&self.bomb_chance_max) {
            return Err(TuningError::Invalid {
                field: "bomb_chance_max",
                reason: "must be a probability",
            });
        }
        if self.starting_lives == 0 {
            return Err(TuningError::Invalid {
                field: "starting_lives",
                reason: "must be at least one",
            });
        }
        Ok(())
    }
}
