//! Named gameplay timers
//!
//! Spawn and bomb cadences plus the two feedback countdowns all advance
//! together once per tick through [`Timers::advance`].

use serde::{Deserialize, Serialize};

/// Repeating timer whose period may change between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cadence {
    elapsed: f32,
}

impl Cadence {
    /// Advance by `dt`; returns true when the period elapsed this tick.
    ///
    /// Fires at most once per call. The overshoot carries into the next period
    /// but never exceeds one full period, so a shrinking interval cannot queue
    /// a burst of spawns.
    pub fn advance(&mut self, dt: f32, period: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= period {
            self.elapsed = (self.elapsed - period).min(period);
            if self.elapsed >= period {
                self.elapsed = 0.0;
            }
            true
        } else {
            false
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// One-shot countdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// Start (or restart) the countdown
    pub fn arm(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Advance by `dt`; returns true on the tick the countdown expires
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining == 0.0
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}

/// Cadences that fired during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerFires {
    pub spawn: bool,
    pub bomb: bool,
}

/// All session timers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    /// Standard batch cadence
    pub spawn: Cadence,
    /// Bomb cadence, independent of `spawn`
    pub bomb: Cadence,
    /// Combo banner countdown
    pub combo_display: Countdown,
    /// Heart shake after a life is lost
    pub life_lost: Countdown,
}

impl Timers {
    /// Advance every timer by the same `dt`
    pub fn advance(&mut self, dt: f32, spawn_interval: f32, bomb_interval: f32) -> TimerFires {
        self.combo_display.advance(dt);
        self.life_lost.advance(dt);
        TimerFires {
            spawn: self.spawn.advance(dt, spawn_interval),
            bomb: self.bomb.advance(dt, bomb_interval),
        }
    }

    pub fn reset(&mut self) {
        self.spawn.reset();
        self.bomb.reset();
        self.combo_display.reset();
        self.life_lost.reset();
    }
}
