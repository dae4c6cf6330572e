//! Per-frame simulation step
//!
//! Order: difficulty → timers → spawner → physics → prune. Gesture samples
//! are handled separately in `collision` as they arrive.

use super::difficulty::{DifficultyParams, difficulty_level};
use super::physics;
use super::rng::UniformSource;
use super::session::Screen;
use super::spawner;
use super::state::{GameEvent, GameState};

/// Advance the game state by one frame.
///
/// `dt` is the clamped frame delta in seconds, `now_ms` the host clock used
/// to age the gesture trail.
pub fn tick<R: UniformSource + ?Sized>(state: &mut GameState, dt: f32, now_ms: f64, rng: &mut R) {
    state.clock_ms = now_ms;

    if state.screen != Screen::Playing {
        return;
    }

    state.elapsed += dt;
    update_difficulty(state);

    let fires = state.timers.advance(
        dt,
        state.difficulty.spawn_interval,
        state.difficulty.bomb_interval,
    );
    spawner::run(state, fires, rng);

    physics::step(state, dt);

    prune_entities(state);
    prune_trail(state, now_ms);
    state.normalize_order();
}

/// Recompute the ramp from elapsed time, never stepping down
pub fn update_difficulty(state: &mut GameState) {
    let level = difficulty_level(state.elapsed).max(state.difficulty.level);
    if level > state.difficulty.level {
        log::info!("Difficulty raised to {:.1} at {:.0}s", level, state.elapsed);
        state.events.push(GameEvent::DifficultyRaised { level });
    }
    state.difficulty = DifficultyParams::derive(level, state.elapsed, &state.tuning);
}

/// Drop entities that fell out, or were sliced and have dropped past the field
pub fn prune_entities(state: &mut GameState) {
    let depart = state.field.height;
    state
        .entities
        .retain(|e| !(e.off_screen || (e.sliced && e.pos.y > depart + e.size)));
}

/// Drop trail points older than the trail duration, oldest first
pub fn prune_trail(state: &mut GameState, now_ms: f64) {
    let duration = state.tuning.trail_duration_ms;
    let keep_from = state
        .trail
        .iter()
        .position(|p| now_ms - p.time < duration)
        .unwrap_or(state.trail.len());
    state.trail.drain(..keep_from);
}
