//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]. Entities,
//! particles and the gesture trail are only changed through the `sim`
//! operations; renderers read them through the engine snapshot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyParams;
use super::session::Screen;
use super::timers::Timers;
use crate::consts::TRAIL_CAPACITY;
use crate::tuning::Tuning;

/// The four product sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductKind {
    Watch,
    Earbuds,
    Phone,
    Tablet,
}

impl ProductKind {
    pub const ALL: [ProductKind; 4] = [
        ProductKind::Watch,
        ProductKind::Earbuds,
        ProductKind::Phone,
        ProductKind::Tablet,
    ];

    /// Debris colors (0xRRGGBB) matching the sprite
    pub fn palette(self) -> &'static [u32] {
        match self {
            ProductKind::Watch => &[0x1a1a2e, 0x4a4e69, 0xc9ada7],
            ProductKind::Earbuds => &[0xf2f2f2, 0xd9d9d9, 0x9fa4a9],
            ProductKind::Phone => &[0x6c5ce7, 0xa29bfe, 0x2d3436],
            ProductKind::Tablet => &[0x0984e3, 0x74b9ff, 0xdfe6e9],
        }
    }
}

/// Bomb blast colors
pub const BOMB_PALETTE: &[u32] = &[0xff3b1f, 0xff8c00, 0xffd000, 0xfff4c2];

/// What a launched entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Standard(ProductKind),
    Bomb,
}

impl EntityKind {
    pub fn is_bomb(self) -> bool {
        matches!(self, EntityKind::Bomb)
    }
}

/// A launched, sliceable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub rotation: f32,
    /// Radians per tick
    pub rotation_speed: f32,
    /// Sprite extent
    pub size: f32,
    pub kind: EntityKind,
    pub sliced: bool,
    pub off_screen: bool,
    /// Set once the entity has been accounted for (missed or blown up)
    pub counted: bool,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, vel: Vec2, size: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            rotation: 0.0,
            rotation_speed: 0.0,
            size,
            kind,
            sliced: false,
            off_screen: false,
            counted: false,
        }
    }

    pub fn is_bomb(&self) -> bool {
        self.kind.is_bomb()
    }

    /// Still in play and sliceable
    pub fn is_live(&self) -> bool {
        !self.sliced && !self.off_screen
    }

    /// Mark as accounted for; returns false if it already was
    pub fn mark_counted(&mut self) -> bool {
        if self.counted {
            return false;
        }
        self.counted = true;
        true
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
    /// Remaining life, 1 → 0
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Normalized remaining life in [0, 1]
    pub fn life_fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 512;

/// One sample of the active gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Host clock (milliseconds)
    pub time: f64,
}

/// Play field dimensions (CSS pixels, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Things that happened during a tick or gesture sample.
///
/// Drained by the engine to drive audio and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A product was sliced
    Sliced { kind: ProductKind },
    /// A bomb was launched
    BombThrown,
    /// The player sliced a bomb
    BombExploded,
    /// A life was lost (miss or bomb)
    LifeLost { remaining: u8 },
    /// Gesture ended with a qualifying combo
    ComboAwarded { combo: u32, bonus: u64 },
    /// Difficulty stepped up
    DifficultyRaised { level: f32 },
    /// Session ended
    GameOver { score: u64, new_high_score: bool },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub screen: Screen,
    pub field: Field,
    pub tuning: Tuning,
    pub score: u64,
    /// Best score seen, loaded from storage at startup
    pub high_score: u64,
    pub lives: u8,
    /// Consecutive product hits in the current gesture
    pub combo: u32,
    /// Combo shown by the banner while `timers.combo_display` runs
    pub combo_shown: u32,
    /// Seconds of active play
    pub elapsed: f32,
    pub difficulty: DifficultyParams,
    /// Products sliced this session (bombs excluded)
    pub total_sliced: u32,
    pub timers: Timers,
    /// A gesture is in progress
    pub gesture_active: bool,
    /// Host clock of the latest frame (milliseconds)
    pub clock_ms: f64,
    /// Live entities (sorted by id)
    pub entities: Vec<Entity>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Recent gesture samples, oldest first
    pub trail: Vec<TrailPoint>,
    /// Particle cap (settings may lower it)
    pub max_particles: usize,
    /// Pending events for the engine
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh state on the start screen
    pub fn new(field: Field, tuning: Tuning) -> Self {
        let difficulty = DifficultyParams::initial(&tuning);
        let lives = tuning.starting_lives;
        Self {
            screen: Screen::Start,
            field,
            tuning,
            score: 0,
            high_score: 0,
            lives,
            combo: 0,
            combo_shown: 0,
            elapsed: 0.0,
            difficulty,
            total_sliced: 0,
            timers: Timers::default(),
            gesture_active: false,
            clock_ms: 0.0,
            entities: Vec::new(),
            particles: Vec::new(),
            trail: Vec::with_capacity(TRAIL_CAPACITY),
            max_particles: MAX_PARTICLES,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset everything a new session starts from.
    ///
    /// Field, tuning, high score, clock and particle cap survive.
    pub fn reset_session(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.combo = 0;
        self.combo_shown = 0;
        self.elapsed = 0.0;
        self.difficulty = DifficultyParams::initial(&self.tuning);
        self.total_sliced = 0;
        self.timers.reset();
        self.gesture_active = false;
        self.entities.clear();
        self.particles.clear();
        self.trail.clear();
        self.events.clear();
        self.next_id = 1;
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add a particle, evicting the oldest past the cap
    pub fn push_particle(&mut self, particle: Particle) {
        if self.max_particles == 0 {
            return;
        }
        if self.particles.len() >= self.max_particles {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    /// Live, unsliced, on-screen bombs
    pub fn live_bombs(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.is_bomb() && e.is_live())
            .count()
    }

    /// Take one life; returns the remaining count
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.timers.life_lost.arm(self.tuning.life_lost_shake);
        self.events.push(GameEvent::LifeLost {
            remaining: self.lives,
        });
        self.lives
    }

    /// Ensure entities are sorted by ID for stable iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}
