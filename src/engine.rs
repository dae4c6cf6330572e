//! Engine facade
//!
//! Owns the simulation state and every collaborator. Hosts drive it with
//! frame timestamps and pointer events and read it back through
//! [`Engine::snapshot`]; nothing else can mutate entities or score.

use glam::Vec2;

use crate::audio::{AudioCue, AudioSink, NullAudio};
use crate::highscores::{self, HighScore, MemoryStore, ScoreStore};
use crate::scheduler::FrameClock;
use crate::settings::Settings;
use crate::sim::collision::{self, SliceOutcome};
use crate::sim::session::{self, Screen, SessionTrigger};
use crate::sim::{
    Entity, Field, GameEvent, GameState, Particle, SimRng, TrailPoint, UniformSource, tick,
};
use crate::tuning::Tuning;

/// Combo banner state for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboDisplay {
    pub combo: u32,
    /// Seconds left on screen
    pub remaining: f32,
}

/// HUD summary for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub screen: Screen,
    pub score: u64,
    pub high_score: u64,
    pub lives: u8,
    pub combo_display: Option<ComboDisplay>,
    /// Hearts should shake
    pub life_lost_shake: bool,
    pub difficulty: f32,
    pub elapsed: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub field: Field,
    pub entities: &'a [Entity],
    pub particles: &'a [Particle],
    /// Oldest first; empty when trail drawing is off
    pub trail: &'a [TrailPoint],
    pub summary: SessionSummary,
}

/// The game engine
pub struct Engine {
    state: GameState,
    clock: FrameClock,
    rng: Box<dyn UniformSource>,
    store: Box<dyn ScoreStore>,
    audio: Box<dyn AudioSink>,
    settings: Settings,
    high_score: HighScore,
    destroyed: bool,
}

impl Engine {
    /// Create an engine on the start screen.
    ///
    /// Defaults: random seed, default tuning and settings, in-memory high
    /// score, silent audio. Swap collaborators with the `with_*` methods.
    pub fn new(field: Field, now_ms: f64) -> Self {
        let mut engine = Self {
            state: GameState::new(field, Tuning::default()),
            clock: FrameClock::new(now_ms),
            rng: Box::new(SimRng::new(rand::random())),
            store: Box::new(MemoryStore::default()),
            audio: Box::new(NullAudio),
            settings: Settings::default(),
            high_score: HighScore::default(),
            destroyed: false,
        };
        engine.state.clock_ms = now_ms;
        engine.apply_settings();
        engine
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.state.tuning = tuning;
        self.state.reset_session();
        self
    }

    pub fn with_rng(mut self, rng: impl UniformSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Attach high score storage and read the stored record
    pub fn with_store(mut self, store: impl ScoreStore + 'static) -> Self {
        self.store = Box::new(store);
        self.high_score = highscores::load_or_default(self.store.as_ref());
        self.state.high_score = self.high_score.score;
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self.apply_settings();
        self
    }

    fn apply_settings(&mut self) {
        self.state.max_particles = self.settings.effective_max_particles();
        self.state.particles.truncate(self.state.max_particles);
    }

    /// Run one frame at host time `now_ms`; false once destroyed
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(dt) = self.clock.advance(now_ms) else {
            return false;
        };
        tick(&mut self.state, dt, now_ms, self.rng.as_mut());
        self.dispatch_events();
        true
    }

    /// Pointer press: start/restart controls, or a new gesture while playing
    pub fn pointer_down(&mut self, point: Vec2) {
        let time = self.clock.last_time();
        self.pointer_down_at(point, time);
    }

    /// Pointer press with the host's event timestamp
    pub fn pointer_down_at(&mut self, point: Vec2, time_ms: f64) {
        if self.destroyed {
            return;
        }
        match self.state.screen {
            Screen::Playing => self.gesture_begin_at(point, time_ms),
            Screen::Start | Screen::GameOver => {
                if session::control_region(&self.state.field).contains(point) {
                    match self.state.screen {
                        Screen::Start => self.begin(),
                        _ => self.restart(),
                    }
                }
            }
        }
    }

    /// Start -> Playing
    pub fn begin(&mut self) {
        self.trigger(SessionTrigger::Begin);
    }

    /// GameOver -> Playing with a full reset
    pub fn restart(&mut self) {
        self.trigger(SessionTrigger::Restart);
    }

    fn trigger(&mut self, trigger: SessionTrigger) {
        if self.destroyed {
            return;
        }
        if let Err(e) = session::apply(&mut self.state, trigger) {
            log::debug!("Ignored: {e}");
        }
        self.dispatch_events();
    }

    pub fn gesture_begin(&mut self, point: Vec2) {
        let time = self.clock.last_time();
        self.gesture_begin_at(point, time);
    }

    /// Begin a gesture with the host's event timestamp
    pub fn gesture_begin_at(&mut self, point: Vec2, time_ms: f64) {
        if self.destroyed {
            return;
        }
        collision::gesture_begin(&mut self.state, point, time_ms);
    }

    pub fn gesture_move(&mut self, point: Vec2) -> SliceOutcome {
        let time = self.clock.last_time();
        self.gesture_move_at(point, time)
    }

    /// Gesture sample with the host's event timestamp
    pub fn gesture_move_at(&mut self, point: Vec2, time_ms: f64) -> SliceOutcome {
        if self.destroyed {
            return SliceOutcome::default();
        }
        let outcome = collision::gesture_move(&mut self.state, point, time_ms, self.rng.as_mut());
        self.dispatch_events();
        outcome
    }

    /// Pointer release; returns the combo bonus awarded
    pub fn gesture_end(&mut self) -> u64 {
        if self.destroyed {
            return 0;
        }
        let bonus = collision::gesture_end(&mut self.state);
        self.dispatch_events();
        bonus
    }

    /// New field dimensions from the host; non-positive sizes are ignored
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Ignoring resize to {width}x{height}");
            return;
        }
        self.state.field = Field::new(width, height);
    }

    /// Stop the scheduler, drop gesture state and release audio
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.clock.stop();
        self.state.gesture_active = false;
        self.state.combo = 0;
        self.state.trail.clear();
        self.audio.close();
        log::info!("Engine destroyed after {} frames", self.clock.frames());
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Forward cues to audio and persist a beaten high score
    fn dispatch_events(&mut self) {
        for event in self.state.take_events() {
            if let Some(cue) = AudioCue::for_event(&event) {
                self.audio.play(cue);
            }
            if let GameEvent::GameOver {
                score,
                new_high_score: true,
            } = event
            {
                if self.high_score.submit(score) {
                    highscores::save_or_skip(self.store.as_mut(), self.high_score);
                }
            }
        }
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        let state = &self.state;
        let combo_display = state
            .timers
            .combo_display
            .is_active()
            .then(|| ComboDisplay {
                combo: state.combo_shown,
                remaining: state.timers.combo_display.remaining(),
            });
        FrameSnapshot {
            field: state.field,
            entities: &state.entities,
            particles: &state.particles,
            trail: if self.settings.trail {
                state.trail.as_slice()
            } else {
                &[]
            },
            summary: SessionSummary {
                screen: state.screen,
                score: state.score,
                high_score: self.high_score.score,
                lives: state.lives,
                combo_display,
                life_lost_shake: self.settings.effective_life_lost_shake()
                    && state.timers.life_lost.is_active(),
                difficulty: state.difficulty.level,
                elapsed: state.elapsed,
            },
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ScriptedRng;

    fn engine() -> Engine {
        Engine::new(Field::new(800.0, 600.0), 0.0).with_rng(ScriptedRng::constant(0.99))
    }

    #[test]
    fn test_pointer_down_outside_start_control_is_ignored() {
        let mut e = engine();
        e.pointer_down(Vec2::new(5.0, 5.0));
        assert_eq!(e.state().screen, Screen::Start);
        e.pointer_down(Vec2::new(400.0, 360.0));
        assert_eq!(e.state().screen, Screen::Playing);
    }

    #[test]
    fn test_restart_is_noop_on_start_screen() {
        let mut e = engine();
        e.restart();
        assert_eq!(e.state().screen, Screen::Start);
    }

    #[test]
    fn test_resize_ignores_bad_dimensions() {
        let mut e = engine();
        e.resize(0.0, 100.0);
        assert_eq!(e.state().field, Field::new(800.0, 600.0));
        e.resize(1024.0, 768.0);
        assert_eq!(e.state().field, Field::new(1024.0, 768.0));
    }

    #[test]
    fn test_destroy_stops_frames() {
        let mut e = engine();
        e.begin();
        assert!(e.frame(16.0));
        e.destroy();
        assert!(e.is_destroyed());
        assert!(!e.frame(32.0));
        let elapsed = e.state().elapsed;
        assert!(!e.frame(48.0));
        assert_eq!(e.state().elapsed, elapsed);
    }

    #[test]
    fn test_trail_hidden_by_settings() {
        let settings = Settings {
            trail: false,
            ..Settings::default()
        };
        let mut e = engine().with_settings(settings);
        e.begin();
        e.gesture_begin(Vec2::new(10.0, 10.0));
        e.gesture_move(Vec2::new(20.0, 10.0));
        assert_eq!(e.state().trail.len(), 2);
        assert!(e.snapshot().trail.is_empty());
    }

    #[test]
    fn test_press_and_samples_share_host_timestamps() {
        let mut e = engine();
        e.begin();
        assert!(e.frame(16.0));
        e.pointer_down_at(Vec2::new(10.0, 10.0), 20.5);
        e.gesture_move_at(Vec2::new(30.0, 10.0), 24.0);
        let times: Vec<f64> = e.snapshot().trail.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![20.5, 24.0]);
    }

    #[test]
    fn test_particles_disabled_by_settings() {
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        let e = engine().with_settings(settings);
        assert_eq!(e.state().max_particles, 0);
    }
}
