#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoring system that measures how closely a guess matches a target.
//!
//! Colors are treated as points inside the 255-unit RGB cube. The similarity
//! of two colors is their Euclidean distance normalized by the cube diagonal,
//! inverted so that identical colors score 100 and opposite corners score 0.

use color_match_core::{Color, Score};

/// Squared length of the RGB cube diagonal, `3 * 255^2`.
const MAX_SQUARED_DISTANCE: u32 = 3 * 255 * 255;

/// Length of the RGB cube diagonal, the largest distance two colors can have.
#[must_use]
pub fn max_distance() -> f64 {
    f64::from(MAX_SQUARED_DISTANCE).sqrt()
}

/// Euclidean distance between two colors in channel space.
#[must_use]
pub fn distance(target: Color, guess: Color) -> f64 {
    f64::from(target.squared_distance(guess)).sqrt()
}

/// Scores `guess` against `target`.
///
/// The unrounded similarity is `max(0, (1 - distance / max_distance) * 100)`,
/// rounded half-up to the nearest integer. The result is symmetric in its
/// arguments and always lies within 0..=100.
#[must_use]
pub fn score(target: Color, guess: Color) -> Score {
    let similarity = ((1.0 - distance(target, guess) / max_distance()) * 100.0).max(0.0);
    let rounded = (similarity + 0.5).floor().min(f64::from(Score::MAX.get()));
    Score::saturating(rounded as u8)
}
