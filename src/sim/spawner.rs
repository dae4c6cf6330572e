//! Entity spawning
//!
//! Standard batches and bombs run on two independent cadences. Launch speed is
//! fixed in pixels per tick so the arc height does not depend on the field size.

use glam::Vec2;

use super::difficulty::DifficultyParams;
use super::rng::UniformSource;
use super::state::{Entity, EntityKind, Field, GameEvent, GameState, ProductKind};
use super::timers::TimerFires;
use crate::tuning::Tuning;

/// Horizontal band launches start from (fractions of field width)
const ORIGIN_BAND: (f32, f32) = (0.2, 0.6);
/// Horizontal band launches aim for
const TARGET_BAND: (f32, f32) = (0.3, 0.4);

/// Initial kinematics for one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
}

/// Sample launch kinematics.
///
/// Draw order: origin, target, jitter, rotation, rotation speed.
pub fn sample_launch<R: UniformSource + ?Sized>(
    field: &Field,
    params: &DifficultyParams,
    tuning: &Tuning,
    rng: &mut R,
) -> Launch {
    let origin_x = field.width * ORIGIN_BAND.0 + rng.next_f32() * field.width * ORIGIN_BAND.1;
    let target_x = field.width * TARGET_BAND.0 + rng.next_f32() * field.width * TARGET_BAND.1;
    let jitter = rng.range(-tuning.horizontal_jitter, tuning.horizontal_jitter);

    let vx = (target_x - origin_x) * tuning.horizontal_factor + jitter;
    let vy = -tuning.launch_speed * params.launch_scale;

    Launch {
        pos: Vec2::new(origin_x, field.height + tuning.item_size),
        vel: Vec2::new(vx, vy),
        rotation: rng.next_f32() * std::f32::consts::TAU,
        rotation_speed: rng.range(-tuning.max_rotation_speed, tuning.max_rotation_speed),
    }
}

/// How many products the next batch launches
pub fn batch_size<R: UniformSource + ?Sized>(
    total_sliced: u32,
    level: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> usize {
    if total_sliced < tuning.batch_warmup {
        return 1;
    }
    let roll = rng.next_f32();
    if level >= tuning.quad_batch_level && roll < tuning.quad_batch_chance {
        4
    } else if level >= tuning.triple_batch_level && roll < tuning.triple_batch_chance {
        3
    } else {
        2
    }
}

/// Maximum simultaneous live bombs for the current score
pub fn bomb_cap(score: u64, tuning: &Tuning) -> usize {
    if score >= tuning.bomb_cap_score {
        tuning.bomb_cap_high
    } else {
        tuning.bomb_cap_low
    }
}

/// Push a bomb origin away from live products, then clamp to the field
pub fn repel_from_targets(x: f32, entities: &[Entity], field: &Field, tuning: &Tuning) -> f32 {
    let mut x = x;
    for target in entities.iter().filter(|e| !e.is_bomb() && e.is_live()) {
        let dx = x - target.pos.x;
        if dx.abs() < tuning.bomb_min_separation {
            let away = if dx > 0.0 {
                1.0
            } else if dx < 0.0 {
                -1.0
            } else if target.pos.x < field.width / 2.0 {
                1.0
            } else {
                -1.0
            };
            x += away * tuning.bomb_repulsion * tuning.item_size;
        }
    }
    let half = tuning.item_size / 2.0;
    x.clamp(half, (field.width - half).max(half))
}

/// Launch one product
pub fn spawn_product<R: UniformSource + ?Sized>(state: &mut GameState, rng: &mut R) -> u32 {
    let kind = ProductKind::ALL[rng.index(ProductKind::ALL.len())];
    let launch = sample_launch(&state.field, &state.difficulty, &state.tuning, rng);
    push_entity(state, EntityKind::Standard(kind), launch)
}

/// Launch a batch of products sized by progress and difficulty
pub fn spawn_batch<R: UniformSource + ?Sized>(state: &mut GameState, rng: &mut R) -> usize {
    let count = batch_size(
        state.total_sliced,
        state.difficulty.level,
        &state.tuning,
        rng,
    );
    for _ in 0..count {
        spawn_product(state, rng);
    }
    count
}

/// Throw a bomb if under the cap and the difficulty-scaled draw succeeds
pub fn try_spawn_bomb<R: UniformSource + ?Sized>(state: &mut GameState, rng: &mut R) -> bool {
    if state.live_bombs() >= bomb_cap(state.score, &state.tuning) {
        return false;
    }
    if !rng.chance(state.difficulty.bomb_chance) {
        return false;
    }
    let mut launch = sample_launch(&state.field, &state.difficulty, &state.tuning, rng);
    launch.pos.x = repel_from_targets(launch.pos.x, &state.entities, &state.field, &state.tuning);
    push_entity(state, EntityKind::Bomb, launch);
    state.events.push(GameEvent::BombThrown);
    true
}

/// Act on the cadences that fired this tick
pub fn run<R: UniformSource + ?Sized>(state: &mut GameState, fires: TimerFires, rng: &mut R) {
    if fires.spawn {
        spawn_batch(state, rng);
    }
    if fires.bomb {
        try_spawn_bomb(state, rng);
    }
}

fn push_entity(state: &mut GameState, kind: EntityKind, launch: Launch) -> u32 {
    let id = state.next_entity_id();
    let mut entity = Entity::new(id, kind, launch.pos, launch.vel, state.tuning.item_size);
    entity.rotation = launch.rotation;
    entity.rotation_speed = launch.rotation_speed;
    state.entities.push(entity);
    id
}
