//! Uniform random source for spawn and debris decisions
//!
//! Gameplay code only ever asks for uniform floats in [0, 1). Production uses a
//! seeded PCG stream; tests inject exact sequences with [`ScriptedRng`].

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A uniform [0, 1) generator
pub trait UniformSource {
    /// Next value in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Uniform value in [lo, hi)
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform index in [0, n)
    fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_f32() * n as f32) as usize).min(n - 1)
    }
}

/// Seeded PCG generator
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl UniformSource for SimRng {
    fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed sequence, then repeats `fallback` forever
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// Value returned once the script runs out
    pub fn with_fallback(mut self, fallback: f32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Constant generator
    pub fn constant(value: f32) -> Self {
        Self::new([]).with_fallback(value)
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl UniformSource for ScriptedRng {
    fn next_f32(&mut self) -> f32 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}
