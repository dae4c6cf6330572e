//! Entity and particle integration
//!
//! Entities move in raw ticks: velocity is pixels per tick and gravity is
//! pixels per tick squared. The frame delta is already clamped by the
//! scheduler, so only particle decay is scaled by `dt`.

use super::session::check_game_over;
use super::state::{Entity, Field, GameState, Particle};
use crate::tuning::Tuning;

/// Which walls an entity touched this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
}

/// Advance one entity by a tick
pub fn integrate_entity(entity: &mut Entity, gravity: f32) {
    entity.pos += entity.vel;
    entity.vel.y += gravity;
    entity.rotation += entity.rotation_speed;
}

/// Soft bounce off the side and top walls. The bottom is open.
pub fn bounce_walls(entity: &mut Entity, field: &Field, damping: f32) -> WallContact {
    let half = entity.size / 2.0;
    let mut contact = WallContact::default();

    if entity.pos.x < half {
        entity.pos.x = half;
        entity.vel.x = -entity.vel.x * damping;
        contact.left = true;
    } else if entity.pos.x > field.width - half {
        entity.pos.x = field.width - half;
        entity.vel.x = -entity.vel.x * damping;
        contact.right = true;
    }

    if entity.pos.y < half {
        entity.pos.y = half;
        entity.vel.y = -entity.vel.y * damping;
        contact.top = true;
    }

    contact
}

/// True once an entity has dropped out of reach below the field
pub fn fell_out(entity: &Entity, field: &Field) -> bool {
    entity.pos.y > field.height + entity.size * 2.0
}

/// Advance one particle; returns false when it has expired
pub fn integrate_particle(particle: &mut Particle, dt: f32, tuning: &Tuning) -> bool {
    particle.pos += particle.vel;
    particle.vel.y += tuning.particle_gravity;
    particle.life = (particle.life - dt * tuning.particle_decay).min(particle.life);
    particle.life > 0.0
}

/// Advance every entity and particle, accounting for misses
pub fn step(state: &mut GameState, dt: f32) {
    let field = state.field;
    let gravity = state.tuning.gravity;
    let damping = state.tuning.wall_damping;
    let mut misses = 0u32;

    for entity in &mut state.entities {
        integrate_entity(entity, gravity);
        bounce_walls(entity, &field, damping);

        if !entity.sliced && fell_out(entity, &field) && entity.mark_counted() {
            entity.off_screen = true;
            if !entity.is_bomb() {
                misses += 1;
            }
        }
    }

    for _ in 0..misses {
        if state.lives == 0 {
            break;
        }
        state.lose_life();
        if check_game_over(state) {
            break;
        }
    }

    let tuning = &state.tuning;
    state
        .particles
        .retain_mut(|p| integrate_particle(p, dt, tuning));
}
