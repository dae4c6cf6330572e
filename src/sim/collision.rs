//! Gesture slicing and scoring
//!
//! Hit tests run on every gesture sample, not once per frame. Only the latest
//! sample is tested; the trail is feedback for the renderer. Entities are
//! flagged here and removed later by the tick's prune pass.

use glam::Vec2;

use super::rng::UniformSource;
use super::session::{Screen, check_game_over};
use super::state::{BOMB_PALETTE, Entity, EntityKind, GameEvent, GameState, Particle, TrailPoint};
use crate::consts::TRAIL_CAPACITY;

/// Debris speed range (pixels per tick)
const DEBRIS_SPEED: (f32, f32) = (2.0, 8.0);
/// Debris size range (pixels)
const DEBRIS_SIZE: (f32, f32) = (3.0, 9.0);
/// Bomb debris is faster and larger
const BLAST_SPEED: (f32, f32) = (4.0, 12.0);
const BLAST_SIZE: (f32, f32) = (4.0, 12.0);

/// Whether a gesture point is inside an entity's slice radius
#[inline]
pub fn is_hit(entity: &Entity, point: Vec2, radius_factor: f32) -> bool {
    entity.pos.distance(point) < entity.size * radius_factor
}

/// Outcome of one gesture sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceOutcome {
    pub products: u32,
    pub bombs: u32,
}

impl SliceOutcome {
    pub fn any(&self) -> bool {
        self.products + self.bombs > 0
    }
}

/// Spawn a radial burst of debris
pub fn burst<R: UniformSource + ?Sized>(
    state: &mut GameState,
    at: Vec2,
    count: usize,
    palette: &[u32],
    speed: (f32, f32),
    size: (f32, f32),
    rng: &mut R,
) {
    for _ in 0..count {
        let angle = rng.next_f32() * std::f32::consts::TAU;
        let v = rng.range(speed.0, speed.1);
        let particle = Particle {
            pos: at,
            vel: Vec2::new(angle.cos(), angle.sin()) * v,
            size: rng.range(size.0, size.1),
            color: palette[rng.index(palette.len())],
            life: 1.0,
            max_life: 1.0,
        };
        state.push_particle(particle);
    }
}

/// Start a new gesture: fresh trail, combo counting from zero
pub fn gesture_begin(state: &mut GameState, point: Vec2, time: f64) {
    if state.screen != Screen::Playing {
        return;
    }
    state.gesture_active = true;
    state.combo = 0;
    state.trail.clear();
    state.trail.push(TrailPoint { pos: point, time });
}

/// Record a gesture sample and slice whatever it touches
pub fn gesture_move<R: UniformSource + ?Sized>(
    state: &mut GameState,
    point: Vec2,
    time: f64,
    rng: &mut R,
) -> SliceOutcome {
    if state.screen != Screen::Playing || !state.gesture_active {
        return SliceOutcome::default();
    }
    if state.trail.len() >= TRAIL_CAPACITY {
        state.trail.remove(0);
    }
    state.trail.push(TrailPoint { pos: point, time });
    slice_at(state, point, rng)
}

/// Hit-test one point against every live entity
pub fn slice_at<R: UniformSource + ?Sized>(
    state: &mut GameState,
    point: Vec2,
    rng: &mut R,
) -> SliceOutcome {
    let radius_factor = state.tuning.slice_radius_factor;
    let mut outcome = SliceOutcome::default();

    // Resolve hits one at a time so a game-ending bomb leaves the rest untouched
    for index in 0..state.entities.len() {
        if state.screen != Screen::Playing {
            break;
        }
        let entity = &mut state.entities[index];
        if !entity.is_live() || !is_hit(entity, point, radius_factor) {
            continue;
        }
        entity.sliced = true;
        let (pos, kind) = (entity.pos, entity.kind);
        if kind == EntityKind::Bomb {
            // Accounted for by the blast, not by falling out later
            entity.mark_counted();
        }

        match kind {
            EntityKind::Standard(product) => {
                state.score += 1;
                state.combo += 1;
                state.total_sliced += 1;
                outcome.products += 1;
                let count = state.tuning.slice_particles;
                burst(state, pos, count, product.palette(), DEBRIS_SPEED, DEBRIS_SIZE, rng);
                state.events.push(GameEvent::Sliced { kind: product });
            }
            EntityKind::Bomb => {
                outcome.bombs += 1;
                state.combo = 0;
                let count = state.tuning.bomb_particles;
                burst(state, pos, count, BOMB_PALETTE, BLAST_SPEED, BLAST_SIZE, rng);
                state.events.push(GameEvent::BombExploded);
                state.lose_life();
                check_game_over(state);
            }
        }
    }

    outcome
}

/// Finish the gesture: pay out the combo bonus, always reset the combo.
///
/// Returns the bonus awarded.
pub fn gesture_end(state: &mut GameState) -> u64 {
    let combo = state.combo;
    state.combo = 0;
    state.gesture_active = false;

    if state.screen != Screen::Playing || combo < state.tuning.combo_threshold {
        return 0;
    }

    let bonus = state.tuning.combo_bonus;
    state.score += bonus;
    state.combo_shown = combo;
    let duration =
        state.tuning.combo_display_base + state.tuning.combo_display_per_hit * combo as f32;
    state.timers.combo_display.arm(duration);
    state.events.push(GameEvent::ComboAwarded { combo, bonus });
    bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRng;
    use crate::sim::state::{Field, ProductKind};
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut s = GameState::new(Field::new(800.0, 600.0), Tuning::default());
        s.screen = Screen::Playing;
        s
    }

    fn add(s: &mut GameState, kind: EntityKind, x: f32, y: f32) -> u32 {
        let id = s.next_entity_id();
        s.entities
            .push(Entity::new(id, kind, Vec2::new(x, y), Vec2::ZERO, 88.0));
        id
    }

    const WATCH: EntityKind = EntityKind::Standard(ProductKind::Watch);

    #[test]
    fn test_hit_radius_is_strict() {
        // 100 * 0.5 is exact in f32, so the boundary is exactly 50 px
        let e = Entity::new(1, WATCH, Vec2::new(100.0, 100.0), Vec2::ZERO, 100.0);
        assert!(is_hit(&e, Vec2::new(149.9, 100.0), 0.5));
        assert!(!is_hit(&e, Vec2::new(150.0, 100.0), 0.5));
        assert!(!is_hit(&e, Vec2::new(100.0, 150.0), 0.5));
    }

    #[test]
    fn test_slice_is_idempotent() {
        let mut s = playing();
        let mut rng = ScriptedRng::constant(0.5);
        add(&mut s, WATCH, 200.0, 200.0);
        gesture_begin(&mut s, Vec2::new(0.0, 0.0), 0.0);
        let first = gesture_move(&mut s, Vec2::new(200.0, 200.0), 1.0, &mut rng);
        let second = gesture_move(&mut s, Vec2::new(201.0, 200.0), 2.0, &mut rng);
        assert_eq!(first.products, 1);
        assert!(!second.any());
        assert_eq!(s.score, 1);
        assert_eq!(s.total_sliced, 1);
        assert!(s.entities[0].sliced);
        assert_eq!(s.particles.len(), s.tuning.slice_particles);
        assert_eq!(
            s.take_events(),
            vec![GameEvent::Sliced {
                kind: ProductKind::Watch
            }]
        );
    }

    #[test]
    fn test_debris_uses_product_palette() {
        let mut s = playing();
        let mut rng = ScriptedRng::constant(0.1);
        add(&mut s, EntityKind::Standard(ProductKind::Tablet), 200.0, 200.0);
        gesture_begin(&mut s, Vec2::ZERO, 0.0);
        gesture_move(&mut s, Vec2::new(200.0, 200.0), 1.0, &mut rng);
        let palette = ProductKind::Tablet.palette();
        assert!(s.particles.iter().all(|p| palette.contains(&p.color)));
        assert!(s.particles.iter().all(|p| p.life == 1.0));
    }

    #[test]
    fn test_move_without_gesture_does_nothing() {
        let mut s = playing();
        let mut rng = ScriptedRng::constant(0.5);
        add(&mut s, WATCH, 200.0, 200.0);
        let outcome = gesture_move(&mut s, Vec2::new(200.0, 200.0), 1.0, &mut rng);
        assert!(!outcome.any());
        assert!(!s.entities[0].sliced);
    }

    #[test]
    fn test_three_hit_combo_scores_eight() {
        let mut s = playing();
        let mut rng = ScriptedRng::constant(0.5);
        add(&mut s, WATCH, 100.0, 100.0);
        add(&mut s, WATCH, 300.0, 100.0);
        add(&mut s, WATCH, 500.0, 100.0);
        let before = s.score;

        gesture_begin(&mut s, Vec2::new(0.0, 100.0), 0.0);
        for (i, x) in [100.0, 300.0, 500.0].into_iter().enumerate() {
            gesture_move(&mut s, Vec2::new(x, 100.0), i as f64, &mut rng);
        }
        assert_eq!(s.combo, 3);
        assert_eq!(gesture_end(&mut s), 5);
        assert_eq!(s.score - before, 8);
        assert_eq!(s.combo, 0);
        assert!(s.timers.combo_display.is_active());
        assert_eq!(s.combo_shown, 3);
    }

    #[test]
    fn test_short_combo_has_no_bonus() {
        let mut s = playing();
        let mut rng = ScriptedRng::constant(0.5);
        add(&mut s, WATCH, 100.0, 100.0);
        add(&mut s, WATCH, 300.0, 100.0);
        gesture_begin(&mut s, Vec2::ZERO, 0.0);
        gesture_move(&mut s, Vec2::new(100.0, 100.0), 1.0, &mut rng);
        gesture_move(&mut s, Vec2::new(300.0, 100.0), 2.0, &mut rng);
        assert_eq!(gesture_end(&mut s), 0);
        assert_eq!(s.score, 2);
        assert_eq!(s.combo, 0);
        assert!(!s.timers.combo_display.is_active());
    }

    #[test]
    fn test_combo_does_not_span_gestures() {
        let mut s = playing();
        let mut rng = ScriptedRng::constant(0.5);
        for x in [100.0, 250.0, 400.0] {
            add(&mut s, WATCH, x, 100.0);
        }
        gesture_begin(&mut s, Vec2::ZERO, 0.0);
        gesture_move(&mut s, Vec2::new(100.0, 100.0), 1.0, &mut rng);
        gesture_move(&mut s, Vec2::new(250.0, 100.0), 2.0, &mut rng);
        gesture_end(&mut s);
        gesture_begin(&mut s, Vec2::ZERO, 3.0);
        gesture_move(&mut s, Vec2::new(400.0, 100.0), 4.0, &mut rng);
        assert_eq!(gesture_end(&mut s), 0);
        assert_eq!(s.score, 3);
    }

    #[test]
    fn test_one_sample_can_slice_overlapping_entities() {
        let mut s = playing();
        let mut rng = ScriptedRng::constant(0.5);
        add(&mut s, WATCH, 100.0, 100.0);
        add(&mut s, WATCH, 110.0, 100.0);
        add(&mut s, WATCH, 120.0, 100.0);
        gesture_begin(&mut s, Vec2::ZERO, 0.0);
        let outcome = gesture_move(&mut s, Vec2::new(110.0, 100.0), 1.0, &mut rng);
        assert_eq!(outcome.products, 3);
        assert_eq!(s.entities.len(), 3);
        assert_eq!(gesture_end(&mut s), 5);
        assert_eq!(s.score, 8);
    }

    #[test]
    fn test_bomb_hit_costs_life_and_breaks_combo() {
        let mut s = playing();
        let mut rng = ScriptedRng::constant(0.5);
        add(&mut s, WATCH, 100.0, 100.0);
        add(&mut s, EntityKind::Bomb, 300.0, 100.0);
        gesture_begin(&mut s, Vec2::ZERO, 0.0);
        gesture_move(&mut s, Vec2::new(100.0, 100.0), 1.0, &mut rng);
        let outcome = gesture_move(&mut s, Vec2::new(300.0, 100.0), 2.0, &mut rng);
        assert_eq!(outcome.bombs, 1);
        assert_eq!(s.lives, 2);
        assert_eq!(s.combo, 0);
        assert_eq!(s.score, 1);
        assert!(s.entities[1].counted);
        assert!(s.timers.life_lost.is_active());
        assert!(
            s.particles
                .iter()
                .rev()
                .take(s.tuning.bomb_particles)
                .all(|p| BOMB_PALETTE.contains(&p.color))
        );
        let events = s.take_events();
        assert!(events.contains(&GameEvent::BombExploded));
        assert!(events.contains(&GameEvent::LifeLost { remaining: 2 }));
    }

    #[test]
    fn test_three_bombs_end_the_game_once() {
        let mut s = playing();
        s.high_score = 0;
        s.score = 4;
        let mut rng = ScriptedRng::constant(0.5);
        for x in [100.0, 300.0, 500.0] {
            add(&mut s, EntityKind::Bomb, x, 100.0);
        }
        gesture_begin(&mut s, Vec2::ZERO, 0.0);
        gesture_move(&mut s, Vec2::new(100.0, 100.0), 1.0, &mut rng);
        gesture_move(&mut s, Vec2::new(300.0, 100.0), 2.0, &mut rng);
        assert_eq!(s.screen, Screen::Playing);
        gesture_move(&mut s, Vec2::new(500.0, 100.0), 3.0, &mut rng);
        assert_eq!(s.lives, 0);
        assert_eq!(s.screen, Screen::GameOver);
        assert_eq!(s.high_score, 4);

        let game_overs = s
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);

        // Frozen: further samples are ignored
        assert!(!gesture_move(&mut s, Vec2::new(500.0, 100.0), 4.0, &mut rng).any());
    }

    #[test]
    fn test_game_ending_bomb_leaves_later_hits_untouched() {
        let mut s = playing();
        s.lives = 1;
        let mut rng = ScriptedRng::constant(0.5);
        add(&mut s, EntityKind::Bomb, 200.0, 200.0);
        add(&mut s, WATCH, 205.0, 200.0);
        gesture_begin(&mut s, Vec2::ZERO, 0.0);
        let outcome = gesture_move(&mut s, Vec2::new(202.0, 200.0), 1.0, &mut rng);
        assert_eq!(outcome, SliceOutcome { products: 0, bombs: 1 });
        assert_eq!(s.screen, Screen::GameOver);
        assert_eq!(s.score, 0);
        assert!(s.entities[0].sliced && s.entities[0].counted);
        assert!(!s.entities[1].sliced);
        assert!(s.entities[1].is_live());
    }

    #[test]
    fn test_trail_bounded_and_reset_on_begin() {
        let mut s = playing();
        let mut rng = ScriptedRng::constant(0.5);
        gesture_begin(&mut s, Vec2::ZERO, 0.0);
        for i in 0..(TRAIL_CAPACITY + 10) {
            gesture_move(&mut s, Vec2::new(i as f32, 0.0), i as f64, &mut rng);
        }
        assert_eq!(s.trail.len(), TRAIL_CAPACITY);
        assert!(s.trail.windows(2).all(|w| w[0].time <= w[1].time));
        gesture_begin(&mut s, Vec2::new(5.0, 5.0), 100.0);
        assert_eq!(s.trail.len(), 1);
    }
}
