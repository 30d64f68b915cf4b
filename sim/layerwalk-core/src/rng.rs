//! Sources of randomness for the simulation.
//!
//! Everything random in an exchange, from the server's initial sequence
//! number to the loss and collision draws, comes through a [`RandomSource`]
//! handed in by the caller. [`SimRng`] is backed by a real generator;
//! [`ScriptedRng`] replays fixed values so runs can be reproduced exactly.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::collections::VecDeque;

/// A supply of random values.
pub trait RandomSource {
    /// A value in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// A value over the full `u32` range.
    fn next_u32(&mut self) -> u32;

    /// A value over the full `u16` range.
    fn next_u16(&mut self) -> u16;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn unit(&mut self) -> f64 {
        (**self).unit()
    }

    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_u16(&mut self) -> u16 {
        (**self).next_u16()
    }
}

/// A random source backed by a small, fast generator.
#[derive(Debug, Clone)]
pub struct SimRng(SmallRng);

impl SimRng {
    /// A generator that produces the same values for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_entropy())
    }
}

impl RandomSource for SimRng {
    fn unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn next_u32(&mut self) -> u32 {
        self.0.gen()
    }

    fn next_u16(&mut self) -> u16 {
        self.0.gen()
    }
}

/// Replays caller-supplied values.
///
/// Units (for the probability gates) and words (for identifiers and sequence
/// numbers) are queued separately. Once a queue runs dry its last value keeps
/// being returned; a queue that was never filled returns zero.
///
/// ```
/// # use layerwalk_core::rng::{RandomSource, ScriptedRng};
/// let mut rng = ScriptedRng::new().with_units([0.25]).with_words([5_000_000]);
/// assert_eq!(rng.unit(), 0.25);
/// assert_eq!(rng.unit(), 0.25);
/// assert_eq!(rng.next_u32(), 5_000_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    units: VecDeque<f64>,
    last_unit: f64,
    words: VecDeque<u32>,
    last_word: u32,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue values returned by [`unit`](RandomSource::unit). Each is clamped
    /// into `[0, 1)`.
    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units
            .extend(units.into_iter().map(|unit| unit.clamp(0.0, MAX_UNIT)));
        self
    }

    /// Queue values returned by [`next_u32`](RandomSource::next_u32) and,
    /// truncated, by [`next_u16`](RandomSource::next_u16).
    pub fn with_words(mut self, words: impl IntoIterator<Item = u32>) -> Self {
        self.words.extend(words);
        self
    }
}

/// The largest `f64` below one.
const MAX_UNIT: f64 = 1.0 - f64::EPSILON / 2.0;

impl RandomSource for ScriptedRng {
    fn unit(&mut self) -> f64 {
        if let Some(unit) = self.units.pop_front() {
            self.last_unit = unit;
        }
        self.last_unit
    }

    fn next_u32(&mut self) -> u32 {
        if let Some(word) = self.words.pop_front() {
            self.last_word = word;
        }
        self.last_word
    }

    fn next_u16(&mut self) -> u16 {
        self.next_u32() as u16
    }
}
