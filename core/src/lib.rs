#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Color Match engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the session executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! changed. Presentation layers never read session internals directly; they
//! consume the read-only [`SessionSnapshot`] captured after each mutation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of reveals granted to a fresh or reset session.
pub const INITIAL_REVEALS: u32 = 5;

/// Maximum number of scores retained in the session history.
pub const MAX_SCORE_HISTORY: usize = 5;

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Scores the provided guess against the active round's target.
    SubmitGuess {
        /// Color assembled by the player from the three channel controls.
        guess: Color,
    },
    /// Spends one reveal to expose the active round's target.
    Reveal,
    /// Discards the active round and starts the next one.
    AdvanceRound,
    /// Switches the difficulty tier used for classification and bonus grants.
    ChangeDifficulty {
        /// Tier that should become active.
        tier: DifficultyTier,
    },
    /// Updates the display-only preferences.
    ChangePreferences {
        /// Preferences that should become active.
        preferences: Preferences,
    },
    /// Restores progress counters to their defaults while keeping preferences.
    Reset,
}

/// Events reported by the session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a round with a fresh target became active.
    RoundStarted {
        /// Number of the round that started.
        round: RoundNumber,
    },
    /// Reports the outcome of a submitted guess.
    GuessScored {
        /// Guess that was scored.
        guess: Color,
        /// Result computed for the guess.
        result: SubmitResult,
        /// Reveal balance after any bonus grant.
        reveal_count: u32,
    },
    /// Confirms that a reveal was spent and the target is now visible.
    TargetRevealed {
        /// Target color of the active round.
        target: Color,
        /// Reveal balance remaining after the spend.
        reveals_left: u32,
    },
    /// Reports that a reveal request was refused without changing state.
    RevealRejected {
        /// Specific reason the reveal failed.
        reason: RevealError,
    },
    /// Announces that a different difficulty tier became active.
    DifficultyChanged {
        /// Tier that became active.
        tier: DifficultyTier,
    },
    /// Announces that display preferences changed.
    PreferencesChanged {
        /// Preferences that became active.
        preferences: Preferences,
    },
    /// Announces that progress counters were restored to their defaults.
    SessionReset,
}

impl Event {
    /// Reports whether the event altered state that belongs in persisted progress.
    #[must_use]
    pub const fn changes_progress(&self) -> bool {
        !matches!(self, Self::RevealRejected { .. })
    }
}

/// Immutable RGB triple with byte channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Black, the origin of the channel cube.
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    /// White, the corner opposite black.
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);

    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Channels in red, green, blue order.
    #[must_use]
    pub const fn channels(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Squared Euclidean distance between two colors in channel space.
    #[must_use]
    pub fn squared_distance(self, other: Color) -> u32 {
        self.channels()
            .iter()
            .zip(other.channels().iter())
            .map(|(a, b)| {
                let delta = u32::from(a.abs_diff(*b));
                delta * delta
            })
            .sum()
    }
}

/// Similarity score between 0 and 100 inclusive.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    /// Lowest possible score.
    pub const MIN: Self = Self(0);

    /// Highest possible score, awarded for an exact match.
    pub const MAX: Self = Self(100);

    /// Creates a score when the value lies within 0..=100.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Creates a score, clamping values above 100.
    #[must_use]
    pub const fn saturating(value: u8) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric value of the score.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = ScoreOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ScoreOutOfRange(value))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a numeric value cannot be represented as a [`Score`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("score {0} exceeds the maximum of 100")]
pub struct ScoreOutOfRange(pub u8);

/// One-based index of a round within the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundNumber(u32);

impl RoundNumber {
    /// Number assigned to the first round of a fresh or reset session.
    pub const FIRST: Self = Self(1);

    /// Creates a round number when the value is at least one.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Retrieves the numeric representation of the round number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Number of the round that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for RoundNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for RoundNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Difficulty tiers that select the active [`Thresholds`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    /// Generous thresholds.
    Easy,
    /// Default thresholds.
    #[default]
    Medium,
    /// Strict thresholds.
    Hard,
}

impl DifficultyTier {
    /// Every tier in ascending strictness.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Lowercase name used by storage and command surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Score breakpoints that drive feedback classification and bonus grants.
///
/// Well-formed thresholds satisfy `good < close < bonus <= perfect == 100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Thresholds {
    /// Scores at or above this value earn a bonus reveal.
    pub bonus: u8,
    /// Scores equal to this value count as a perfect match.
    pub perfect: u8,
    /// Lower bound of the "close" feedback band.
    pub close: u8,
    /// Lower bound of the "good" feedback band.
    pub good: u8,
}

impl Thresholds {
    /// Creates a thresholds record from explicit breakpoints.
    #[must_use]
    pub const fn new(bonus: u8, perfect: u8, close: u8, good: u8) -> Self {
        Self {
            bonus,
            perfect,
            close,
            good,
        }
    }

    /// Reports whether the breakpoints respect the ordering invariant.
    #[must_use]
    pub const fn is_well_ordered(&self) -> bool {
        self.good < self.close
            && self.close < self.bonus
            && self.bonus <= self.perfect
            && self.perfect == Score::MAX.get()
    }
}

/// Discrete classification of a score used to select user-facing messaging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    /// The score equals the perfect threshold.
    Perfect,
    /// The score reached the bonus threshold without being perfect.
    BonusLevel,
    /// The score reached the close threshold.
    Close,
    /// The score reached the good threshold.
    Good,
    /// The score fell below every threshold.
    Far,
}

/// Outcome of scoring a single guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubmitResult {
    /// Similarity between the guess and the target.
    pub score: Score,
    /// Classification of the score under the active tier.
    pub level: FeedbackLevel,
    /// Indicates whether the submission granted a bonus reveal.
    pub bonus_earned: bool,
}

/// Policy deciding which submissions within a round may earn a bonus reveal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BonusGate {
    /// Only the first submission of a round is eligible, so a round grants at
    /// most one bonus.
    #[default]
    FirstSubmission,
    /// Every submission is eligible until the target is revealed.
    EverySubmission,
}

/// Color theme preference applied by presentation layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// Every supported theme.
    pub const ALL: [Self; 2] = [Self::Light, Self::Dark];

    /// Lowercase name used by storage and command surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Notation used when presenting color values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    /// Decimal channel triple only.
    Rgb,
    /// Hexadecimal notation only.
    Hex,
    /// Both notations.
    #[default]
    Both,
}

impl ColorFormat {
    /// Every supported format.
    pub const ALL: [Self; 3] = [Self::Rgb, Self::Hex, Self::Both];

    /// Lowercase name used by storage and command surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => "rgb",
            Self::Hex => "hex",
            Self::Both => "both",
        }
    }

    /// Reports whether the decimal triple should be shown.
    #[must_use]
    pub const fn shows_rgb(self) -> bool {
        !matches!(self, Self::Hex)
    }

    /// Reports whether the hexadecimal notation should be shown.
    #[must_use]
    pub const fn shows_hex(self) -> bool {
        !matches!(self, Self::Rgb)
    }
}

/// Display-only preferences that never influence scoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Preferences {
    /// Active color theme.
    pub theme: Theme,
    /// Active color notation.
    pub color_format: ColorFormat,
}

/// Raised when a lowercase name does not match any known variant.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownName {
    /// Kind of value that failed to parse.
    pub kind: &'static str,
    /// Text that was rejected.
    pub value: String,
}

macro_rules! impl_named {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownName;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let normalized = value.trim().to_ascii_lowercase();
                Self::ALL
                    .into_iter()
                    .find(|candidate| candidate.as_str() == normalized)
                    .ok_or_else(|| UnknownName {
                        kind: $kind,
                        value: value.to_owned(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_named!(DifficultyTier, "difficulty");
impl_named!(Theme, "theme");
impl_named!(ColorFormat, "color format");

/// Reasons a reveal request may be refused by the reveal economy.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevealError {
    /// The reveal balance is exhausted.
    #[error("no reveals left")]
    NoRevealsLeft,
    /// The active round's target is already visible.
    #[error("target already revealed for this round")]
    AlreadyRevealed,
}

/// Lifecycle phase of the active round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// No guess has been scored against the active target yet.
    #[default]
    AwaitingGuess,
    /// At least one guess has been scored against the active target.
    Scored,
}

/// Progress that survives between processes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedProgress {
    /// Reveal balance.
    pub reveal_count: u32,
    /// Number of the active round.
    pub round: RoundNumber,
    /// Most recent score, if any.
    pub last_score: Option<Score>,
    /// Active difficulty tier.
    pub difficulty: DifficultyTier,
    /// Display preferences.
    pub preferences: Preferences,
    /// Recent scores, most recent first.
    pub score_history: Vec<Score>,
}

impl Default for SavedProgress {
    fn default() -> Self {
        Self {
            reveal_count: INITIAL_REVEALS,
            round: RoundNumber::FIRST,
            last_score: None,
            difficulty: DifficultyTier::default(),
            preferences: Preferences::default(),
            score_history: Vec::new(),
        }
    }
}

/// Read-only view of the session handed to presentation layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Target color, present only once revealed for the active round.
    pub target: Option<Color>,
    /// Most recent guess submitted in the active round.
    pub guess: Option<Color>,
    /// Number of the active round.
    pub round: RoundNumber,
    /// Lifecycle phase of the active round.
    pub phase: RoundPhase,
    /// Most recent score, if any.
    pub last_score: Option<Score>,
    /// Reveal balance.
    pub reveal_count: u32,
    /// Recent scores, most recent first.
    pub score_history: Vec<Score>,
    /// Indicates whether a reveal would currently succeed.
    pub can_reveal: bool,
    /// Active difficulty tier.
    pub difficulty: DifficultyTier,
    /// Bonus threshold of the active tier, surfaced in reveal hints.
    pub bonus_threshold: u8,
    /// Display preferences.
    pub preferences: Preferences,
}
