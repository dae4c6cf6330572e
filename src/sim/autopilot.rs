//! Idle/demo mode - a bot that plays the game
//!
//! Sweeps the blade toward the nearest visible product and lifts it whenever
//! the next sample would land on a bomb.

use glam::Vec2;

use super::collision::is_hit;
use super::session::Screen;
use super::state::GameState;

/// Pixels the bot blade may travel per sample
const DEFAULT_SWEEP_SPEED: f32 = 60.0;
/// Extra margin around bombs, as a multiple of the slice radius
const BOMB_CAUTION: f32 = 1.5;

/// What the bot wants to do with the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutopilotAction {
    Begin(Vec2),
    Move(Vec2),
    End,
    Idle,
}

/// Demo player
#[derive(Debug, Clone)]
pub struct Autopilot {
    pub pos: Vec2,
    pub sweep_speed: f32,
    engaged: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            sweep_speed: DEFAULT_SWEEP_SPEED,
            engaged: false,
        }
    }
}

impl Autopilot {
    pub fn new(start: Vec2) -> Self {
        Self {
            pos: start,
            ..Default::default()
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Decide the next pointer action for the current state
    pub fn plan(&mut self, state: &GameState) -> AutopilotAction {
        if state.screen != Screen::Playing {
            return self.release();
        }

        let target = state
            .entities
            .iter()
            .filter(|e| e.is_live() && !e.is_bomb() && e.pos.y < state.field.height)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(self.pos)
                    .partial_cmp(&b.pos.distance_squared(self.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let Some(target) = target else {
            return self.release();
        };

        let to_target = target.pos - self.pos;
        let step = to_target.clamp_length_max(self.sweep_speed);
        let next = self.pos + step;

        let caution = state.tuning.slice_radius_factor * BOMB_CAUTION;
        let near_bomb = state
            .entities
            .iter()
            .any(|e| e.is_live() && e.is_bomb() && is_hit(e, next, caution));
        if near_bomb {
            return self.release();
        }

        self.pos = next;
        if self.engaged {
            AutopilotAction::Move(next)
        } else {
            self.engaged = true;
            AutopilotAction::Begin(next)
        }
    }

    fn release(&mut self) -> AutopilotAction {
        if self.engaged {
            self.engaged = false;
            AutopilotAction::End
        } else {
            AutopilotAction::Idle
        }
    }
}
