#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Difficulty policy mapping tiers to score breakpoints and feedback levels.

use color_match_core::{DifficultyTier, FeedbackLevel, Score, Thresholds};

const EASY: Thresholds = Thresholds::new(90, 100, 80, 60);
const MEDIUM: Thresholds = Thresholds::new(95, 100, 85, 70);
const HARD: Thresholds = Thresholds::new(98, 100, 90, 80);

/// Returns the static breakpoints associated with `tier`.
#[must_use]
pub const fn thresholds_for(tier: DifficultyTier) -> Thresholds {
    match tier {
        DifficultyTier::Easy => EASY,
        DifficultyTier::Medium => MEDIUM,
        DifficultyTier::Hard => HARD,
    }
}

/// Reports whether `score` reaches the bonus breakpoint of `thresholds`.
#[must_use]
pub const fn earns_bonus(score: Score, thresholds: &Thresholds) -> bool {
    score.get() >= thresholds.bonus
}

/// Classifies `score` into exactly one feedback level.
///
/// Levels are checked in priority order: perfect, bonus, close, good, far.
#[must_use]
pub const fn classify(score: Score, thresholds: &Thresholds) -> FeedbackLevel {
    let value = score.get();
    if value == thresholds.perfect {
        FeedbackLevel::Perfect
    } else if value >= thresholds.bonus {
        FeedbackLevel::BonusLevel
    } else if value >= thresholds.close {
        FeedbackLevel::Close
    } else if value >= thresholds.good {
        FeedbackLevel::Good
    } else {
        FeedbackLevel::Far
    }
}
