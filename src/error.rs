//! Error types for the collaborator seams
//!
//! The simulation itself is total; these only cover storage, tuning input
//! and rejected session triggers.

use thiserror::Error;

use crate::sim::session::{Screen, SessionTrigger};

/// High score storage failures (never fatal)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("failed to read from storage: {0}")]
    Read(String),
    #[error("failed to write to storage: {0}")]
    Write(String),
    #[error("stored value is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Invalid tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// A session trigger that is not accepted in the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("trigger {trigger:?} is not accepted while in {from:?}")]
    Rejected {
        from: Screen,
        trigger: SessionTrigger,
    },
}
