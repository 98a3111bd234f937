//! Dice for the production engine.
//!
//! Every random decision the grammar makes goes through [`RandomSource`], so a
//! whole run is reproducible from its seed and a recorded roll sequence can be
//! replayed to force a particular derivation.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Uniform dice rolls and picks.
pub trait RandomSource {
    /// Roll a die with `sides` faces: a uniform integer in `[1, sides]`.
    fn roll(&mut self, sides: usize) -> usize;

    /// Pick one element uniformly. Consumes one roll of `items.len()` sides.
    ///
    /// Returns `None` for an empty slice without consuming randomness.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        pick_from(self, items)
    }
}

/// [`RandomSource::pick`] for trait objects.
pub fn pick_from<'a, T>(rng: &mut (impl RandomSource + ?Sized), items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.roll(items.len()) - 1)
}

/// ChaCha8-backed dice; identical seeds give identical rolls on every platform.
pub struct SeededRandom {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn roll(&mut self, sides: usize) -> usize {
        debug_assert!(sides > 0, "a die needs at least one face");
        self.rng.gen_range(1..=sides.max(1))
    }
}

/// Replays a fixed sequence of rolls.
///
/// Each scripted value is clamped into `[1, sides]` of the roll it answers.
/// Rolls past the end of the script come back as 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    rolls: VecDeque<usize>,
    consumed: usize,
}

impl ScriptedRandom {
    pub fn new(rolls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Number of rolls answered so far, scripted or not.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Scripted rolls not yet used.
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn roll(&mut self, sides: usize) -> usize {
        self.consumed += 1;
        self.rolls.pop_front().unwrap_or(1).clamp(1, sides.max(1))
    }
}

/// Generate deterministic per-worker seeds from a root seed.
pub fn derive_seeds(root_seed: u64, workers: usize) -> Vec<u64> {
    // Offset so worker streams never replay the root stream
    let mut rng = ChaCha8Rng::seed_from_u64(root_seed.wrapping_add(1000));
    (0..workers).map(|_| rng.next_u64()).collect()
}
