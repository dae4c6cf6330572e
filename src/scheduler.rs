//! Frame scheduler
//!
//! Turns host frame timestamps into bounded simulation deltas. A stalled or
//! backgrounded tab produces one 33 ms step, never a huge jump.

use crate::consts::MAX_FRAME_DELTA_MS;

/// Wall-clock to simulation-delta converter
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_time: f64,
    running: bool,
    frames: u64,
}

impl FrameClock {
    /// Start the clock at the host timestamp `now_ms`
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_time: now_ms,
            running: true,
            frames: 0,
        }
    }

    /// Clamped delta in seconds since the previous frame, `None` once stopped
    pub fn advance(&mut self, now_ms: f64) -> Option<f32> {
        if !self.running {
            return None;
        }
        let delta_ms = (now_ms - self.last_time).clamp(0.0, MAX_FRAME_DELTA_MS);
        self.last_time = now_ms.max(self.last_time);
        self.frames += 1;
        Some((delta_ms / 1000.0) as f32)
    }

    /// Stop producing frames; there is no restart
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normal_frame() {
        let mut clock = FrameClock::new(1000.0);
        let dt = clock.advance(1016.0).unwrap();
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new(0.0);
        let dt = clock.advance(5000.0).unwrap();
        assert!((dt - 0.033).abs() < 1e-6);
        // Next frame measures from the stalled timestamp, not the clamp
        let dt = clock.advance(5010.0).unwrap();
        assert!((dt - 0.010).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_clock_gives_zero() {
        let mut clock = FrameClock::new(1000.0);
        assert_eq!(clock.advance(900.0), Some(0.0));
        assert_eq!(clock.last_time(), 1000.0);
    }

    #[test]
    fn test_stopped_clock() {
        let mut clock = FrameClock::new(0.0);
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.advance(16.0), None);
    }

    proptest! {
        #[test]
        fn prop_delta_always_bounded(steps in proptest::collection::vec(-100.0f64..10_000.0, 1..100)) {
            let mut clock = FrameClock::new(0.0);
            let mut now = 0.0;
            for step in steps {
                now += step;
                let dt = clock.advance(now).unwrap();
                prop_assert!((0.0..=0.033 + 1e-6).contains(&dt));
            }
        }
    }
}
