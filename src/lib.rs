//! Slice Rush - A ballistic slicing arcade game
//!
//! Core modules:
//! - `sim`: Simulation (spawning, physics, slicing, scoring, session state)
//! - `scheduler`: Wall-clock frames to clamped simulation deltas
//! - `engine`: Facade that owns the simulation and its collaborators
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `highscores`: High score record and storage seam
//! - `audio`: Fire-and-forget sound cues

pub mod audio;
pub mod engine;
pub mod error;
pub mod highscores;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioCue, AudioSink, NullAudio};
pub use engine::{Engine, FrameSnapshot, SessionSummary};
pub use error::{StorageError, TransitionError, TuningError};
pub use highscores::{HighScore, MemoryStore, ScoreStore};
pub use scheduler::FrameClock;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Largest simulation step a single frame may apply (milliseconds)
    pub const MAX_FRAME_DELTA_MS: f64 = 33.0;

    /// Lives at the start of every session
    pub const STARTING_LIVES: u8 = 3;

    /// Upper bound on stored gesture trail points
    pub const TRAIL_CAPACITY: usize = 64;

    /// Default sprite extent for launched entities (pixels)
    pub const ITEM_SIZE: f32 = 88.0;
}
