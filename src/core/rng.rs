use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Uniform integer source injected into a battle.
pub trait RandomSource {
    /// A uniform integer in `[0, inclusive_max]`.
    fn next_int(&mut self, inclusive_max: u32) -> u32;
}

#[derive(Clone, Debug)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRng {
    fn next_int(&mut self, inclusive_max: u32) -> u32 {
        self.inner.gen_range(0..=inclusive_max)
    }
}

/// Plays back a fixed sequence of draws. Values above the requested maximum
/// are clamped; once exhausted every draw is 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    draws: VecDeque<u32>,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRng {
    fn next_int(&mut self, inclusive_max: u32) -> u32 {
        self.draws.pop_front().unwrap_or(0).min(inclusive_max)
    }
}
