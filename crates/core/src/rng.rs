//! Deterministic random source for strategies
//!
//! Picking among a handful of groups and neighbours needs nothing stronger than an LCG, and a
//! fixed seed makes a strategy's choices replayable in tests.

/// 32-bit linear congruential generator (Numerical Recipes multiplier and increment)
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    const MULTIPLIER: u32 = 1_664_525;
    const INCREMENT: u32 = 1_013_904_223;

    /// Seed 0 is bumped to 1
    pub fn new(seed: u32) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    /// Seeded from the sub-second part of the wall clock, for runs that need no replay
    pub fn from_clock() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(1);
        Self::new(nanos)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    /// Value in `[0, bound)`; always 0 when `bound` is 0
    pub fn next_range(&mut self, bound: u32) -> u32 {
        match bound {
            0 => 0,
            _ => self.next_u32() % bound,
        }
    }

    /// Uniform pick from `items`
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_range(items.len() as u32) as usize;
        items.get(idx)
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
