//! Audio cues
//!
//! The simulation emits three cues. Playback is fire-and-forget: a sink that
//! cannot play (no context, blocked autoplay) simply drops the cue.

use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// A product was sliced
    Slice,
    /// A bomb was launched
    BombThrown,
    /// A bomb was sliced
    BombExploded,
}

impl AudioCue {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Sliced { .. } => Some(AudioCue::Slice),
            GameEvent::BombThrown => Some(AudioCue::BombThrown),
            GameEvent::BombExploded => Some(AudioCue::BombExploded),
            _ => None,
        }
    }
}

/// Something that can play cues
pub trait AudioSink {
    /// Play a cue; must not block and must not fail
    fn play(&mut self, cue: AudioCue);

    /// Release any held audio resources
    fn close(&mut self) {}
}

/// Sink that plays nothing (headless runs, audio unavailable)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Sink that remembers every cue (demo stats, tests)
#[derive(Debug, Default, Clone)]
pub struct CueLog {
    pub cues: Vec<AudioCue>,
    pub closed: bool,
}

impl CueLog {
    pub fn count(&self, cue: AudioCue) -> usize {
        self.cues.iter().filter(|c| **c == cue).count()
    }
}

impl AudioSink for CueLog {
    fn play(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

impl<T: AudioSink + ?Sized> AudioSink for std::rc::Rc<std::cell::RefCell<T>> {
    fn play(&mut self, cue: AudioCue) {
        self.borrow_mut().play(cue);
    }

    fn close(&mut self) {
        self.borrow_mut().close();
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Procedurally generated cues on the Web Audio API - no sample files needed
#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::{AudioCue, AudioSink};

    /// Web Audio sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudio {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        /// Resume the context (required after a user gesture)
        pub fn unlock(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn tone(
            &self,
            ctx: &AudioContext,
            kind: OscillatorType,
            from_hz: f32,
            to_hz: f32,
            duration: f64,
            gain: f32,
        ) -> Option<()> {
            let now = ctx.current_time();
            let osc = ctx.create_oscillator().ok()?;
            let amp = ctx.create_gain().ok()?;
            osc.set_type(kind);
            osc.frequency().set_value_at_time(from_hz, now).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(to_hz.max(1.0), now + duration)
                .ok()?;
            amp.gain().set_value_at_time(gain * self.volume, now).ok()?;
            amp.gain()
                .exponential_ramp_to_value_at_time(0.001, now + duration)
                .ok()?;
            osc.connect_with_audio_node(&amp).ok()?;
            amp.connect_with_audio_node(&ctx.destination()).ok()?;
            osc.start().ok()?;
            osc.stop_with_when(now + duration).ok()?;
            Some(())
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: AudioCue) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            // Failures are swallowed: audio never affects the game
            let _ = match cue {
                AudioCue::Slice => self.tone(ctx, OscillatorType::Sawtooth, 1800.0, 300.0, 0.12, 0.25),
                AudioCue::BombThrown => self.tone(ctx, OscillatorType::Triangle, 220.0, 440.0, 0.35, 0.2),
                AudioCue::BombExploded => self.tone(ctx, OscillatorType::Square, 120.0, 30.0, 0.6, 0.5),
            };
        }

        fn close(&mut self) {
            if let Some(ctx) = self.ctx.take() {
                let _ = ctx.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ProductKind;

    #[test]
    fn test_cue_mapping() {
        assert_eq!(
            AudioCue::for_event(&GameEvent::Sliced {
                kind: ProductKind::Watch
            }),
            Some(AudioCue::Slice)
        );
        assert_eq!(
            AudioCue::for_event(&GameEvent::BombThrown),
            Some(AudioCue::BombThrown)
        );
        assert_eq!(
            AudioCue::for_event(&GameEvent::BombExploded),
            Some(AudioCue::BombExploded)
        );
        assert_eq!(
            AudioCue::for_event(&GameEvent::LifeLost { remaining: 1 }),
            None
        );
    }

    #[test]
    fn test_cue_log() {
        let mut log = CueLog::default();
        log.play(AudioCue::Slice);
        log.play(AudioCue::Slice);
        log.play(AudioCue::BombThrown);
        log.close();
        assert_eq!(log.count(AudioCue::Slice), 2);
        assert!(log.closed);
    }
}
