#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Target color sampling for new rounds.

use color_match_core::Color;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of target colors for the session.
///
/// Implementations must be callable indefinitely; every call yields an
/// independent color.
pub trait ColorSampler {
    /// Produces the next target color.
    fn sample(&mut self) -> Color;
}

/// Sampler drawing every channel independently and uniformly from 0..=255.
#[derive(Clone, Debug)]
pub struct UniformSampler {
    rng: ChaCha8Rng,
}

impl UniformSampler {
    /// Creates a reproducible sampler from the provided seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a sampler seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl ColorSampler for UniformSampler {
    fn sample(&mut self) -> Color {
        Color::from_rgb(self.rng.gen(), self.rng.gen(), self.rng.gen())
    }
}

/// Sampler replaying a fixed list of colors in order, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct ScriptedSampler {
    colors: Vec<Color>,
    cursor: usize,
}

impl ScriptedSampler {
    /// Creates a scripted sampler. An empty script yields black forever.
    #[must_use]
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors, cursor: 0 }
    }
}

impl ColorSampler for ScriptedSampler {
    fn sample(&mut self) -> Color {
        if self.colors.is_empty() {
            return Color::BLACK;
        }

        let color = self.colors[self.cursor % self.colors.len()];
        self.cursor = (self.cursor + 1) % self.colors.len();
        color
    }
}
