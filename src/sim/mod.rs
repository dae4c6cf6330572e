//! Simulation module
//!
//! All gameplay logic lives here. This module has no rendering, audio or
//! platform dependencies:
//! - Randomness only through [`UniformSource`]
//! - Stable iteration order (by entity ID)
//! - Entities are removed only by the tick's prune pass

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod physics;
pub mod rng;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use autopilot::Autopilot;
pub use collision::{SliceOutcome, gesture_begin, gesture_end, gesture_move};
pub use difficulty::{DifficultyParams, difficulty_level};
pub use rng::{ScriptedRng, SimRng, UniformSource};
pub use session::{ControlRegion, Screen, SessionTrigger, control_region};
pub use state::{
    Entity, EntityKind, Field, GameEvent, GameState, MAX_PARTICLES, Particle, ProductKind,
    TrailPoint,
};
pub use tick::tick;
pub use timers::{Cadence, Countdown, Timers};
