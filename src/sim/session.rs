//! Session state machine
//!
//! Start --Begin--> Playing --LivesExhausted--> GameOver --Restart--> Playing
//!
//! Any other trigger is rejected and leaves the state untouched.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Field, GameEvent, GameState};
use crate::error::TransitionError;

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Idle, waiting for the start control
    Start,
    /// Simulation running
    Playing,
    /// Simulation frozen, waiting for restart
    GameOver,
}

/// Inputs that can move the session between screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionTrigger {
    Begin,
    Restart,
    LivesExhausted,
}

/// Target screen for a trigger, if the transition is legal
pub fn next_screen(from: Screen, trigger: SessionTrigger) -> Result<Screen, TransitionError> {
    match (from, trigger) {
        (Screen::Start, SessionTrigger::Begin) => Ok(Screen::Playing),
        (Screen::GameOver, SessionTrigger::Restart) => Ok(Screen::Playing),
        (Screen::Playing, SessionTrigger::LivesExhausted) => Ok(Screen::GameOver),
        _ => Err(TransitionError::Rejected { from, trigger }),
    }
}

/// Apply a trigger to the state, running the entry actions of the new screen
pub fn apply(state: &mut GameState, trigger: SessionTrigger) -> Result<Screen, TransitionError> {
    let next = next_screen(state.screen, trigger)?;
    match next {
        Screen::Playing => {
            state.reset_session();
            log::info!("Session started ({:?})", trigger);
        }
        Screen::GameOver => {
            let new_high_score = state.score > state.high_score;
            if new_high_score {
                state.high_score = state.score;
            }
            state.gesture_active = false;
            state.combo = 0;
            state.trail.clear();
            state.events.push(GameEvent::GameOver {
                score: state.score,
                new_high_score,
            });
            log::info!(
                "Game over: score {} (best {}{})",
                state.score,
                state.high_score,
                if new_high_score { ", new record" } else { "" }
            );
        }
        Screen::Start => {}
    }
    state.screen = next;
    Ok(next)
}

/// End the session if no lives remain
pub fn check_game_over(state: &mut GameState) -> bool {
    if state.screen == Screen::Playing && state.lives == 0 {
        apply(state, SessionTrigger::LivesExhausted).is_ok()
    } else {
        false
    }
}

/// Axis-aligned hit region for the start/restart controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRegion {
    pub min: Vec2,
    pub max: Vec2,
}

impl ControlRegion {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Control width as a fraction of the field (capped in pixels)
const CONTROL_WIDTH_FRACTION: f32 = 0.6;
const CONTROL_MAX_WIDTH: f32 = 320.0;
const CONTROL_HEIGHT: f32 = 72.0;

/// The start/restart button: centered horizontally, just below the middle
pub fn control_region(field: &Field) -> ControlRegion {
    let w = (field.width * CONTROL_WIDTH_FRACTION).min(CONTROL_MAX_WIDTH);
    let center = Vec2::new(field.width / 2.0, field.height * 0.6);
    let half = Vec2::new(w / 2.0, CONTROL_HEIGHT / 2.0);
    ControlRegion {
        min: center - half,
        max: center + half,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Entity, EntityKind, ProductKind};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(Field::new(800.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_legal_transitions() {
        assert_eq!(next_screen(Screen::Start, SessionTrigger::Begin), Ok(Screen::Playing));
        assert_eq!(
            next_screen(Screen::Playing, SessionTrigger::LivesExhausted),
            Ok(Screen::GameOver)
        );
        assert_eq!(
            next_screen(Screen::GameOver, SessionTrigger::Restart),
            Ok(Screen::Playing)
        );
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let cases = [
            (Screen::Start, SessionTrigger::Restart),
            (Screen::Start, SessionTrigger::LivesExhausted),
            (Screen::Playing, SessionTrigger::Begin),
            (Screen::Playing, SessionTrigger::Restart),
            (Screen::GameOver, SessionTrigger::Begin),
            (Screen::GameOver, SessionTrigger::LivesExhausted),
        ];
        for (from, trigger) in cases {
            assert_eq!(
                next_screen(from, trigger),
                Err(TransitionError::Rejected { from, trigger })
            );
        }
    }

    #[test]
    fn test_rejected_trigger_leaves_state() {
        let mut s = state();
        s.score = 7;
        assert!(apply(&mut s, SessionTrigger::Restart).is_err());
        assert_eq!(s.screen, Screen::Start);
        assert_eq!(s.score, 7);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut s = state();
        apply(&mut s, SessionTrigger::Begin).unwrap();
        s.score = 12;
        s.lives = 0;
        s.elapsed = 45.0;
        s.total_sliced = 9;
        let id = s.next_entity_id();
        s.entities.push(Entity::new(
            id,
            EntityKind::Standard(ProductKind::Tablet),
            Vec2::new(10.0, 10.0),
            Vec2::ZERO,
            88.0,
        ));
        s.timers.spawn.advance(0.3, 1.0);
        assert!(check_game_over(&mut s));
        assert_eq!(s.screen, Screen::GameOver);

        apply(&mut s, SessionTrigger::Restart).unwrap();
        assert_eq!(s.screen, Screen::Playing);
        assert_eq!(s.score, 0);
        assert_eq!(s.lives, 3);
        assert_eq!(s.difficulty.level, 1.0);
        assert_eq!(s.elapsed, 0.0);
        assert_eq!(s.total_sliced, 0);
        assert!(s.entities.is_empty());
        assert!(s.particles.is_empty());
        assert!(s.trail.is_empty());
        assert_eq!(s.timers.spawn.elapsed(), 0.0);
        assert_eq!(s.high_score, 12);
    }

    #[test]
    fn test_game_over_updates_high_score_only_when_beaten() {
        let mut s = state();
        s.high_score = 50;
        apply(&mut s, SessionTrigger::Begin).unwrap();
        s.score = 20;
        s.lives = 0;
        check_game_over(&mut s);
        assert_eq!(s.high_score, 50);
        assert_eq!(
            s.take_events().last(),
            Some(&GameEvent::GameOver {
                score: 20,
                new_high_score: false
            })
        );
    }

    #[test]
    fn test_check_game_over_needs_zero_lives() {
        let mut s = state();
        apply(&mut s, SessionTrigger::Begin).unwrap();
        assert!(!check_game_over(&mut s));
        s.lives = 0;
        assert!(check_game_over(&mut s));
        // Already over: no second transition
        assert!(!check_game_over(&mut s));
    }

    #[test]
    fn test_control_region() {
        let field = Field::new(800.0, 600.0);
        let region = control_region(&field);
        assert!(region.contains(Vec2::new(400.0, 360.0)));
        assert!(!region.contains(Vec2::new(10.0, 10.0)));
        assert!(!region.contains(Vec2::new(400.0, 100.0)));
    }
}
