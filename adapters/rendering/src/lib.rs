#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared text presentation for Color Match adapters.
//!
//! Everything here is a pure function of core values: adapters hand over a
//! [`SessionSnapshot`] or an [`Event`] and receive the strings to show.

use std::fmt;

use color_match_core::{
    Color, ColorFormat, Event, FeedbackLevel, Preferences, RevealError, RoundNumber, Score,
    SessionSnapshot, SubmitResult,
};

/// Decimal triple shown while the target is hidden.
pub const MASKED_RGB: &str = "(???, ???, ???)";

/// Hexadecimal notation shown while the target is hidden.
pub const MASKED_HEX: &str = "#??????";

/// Confirmation shown after a successful reveal.
pub const TARGET_REVEALED: &str = "Target revealed!";

/// Line appended to feedback when a submission granted a reveal.
pub const BONUS_EARNED: &str = "+1 Reveal Earned!";

/// Placeholder for absent scores and empty histories.
pub const NO_VALUE: &str = "-";

/// Formats a color as a decimal triple such as `(200, 100, 50)`.
#[must_use]
pub fn format_rgb(color: Color) -> String {
    format!("({}, {}, {})", color.red(), color.green(), color.blue())
}

/// Formats a color as uppercase hexadecimal such as `#C86432`.
#[must_use]
pub fn format_hex(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red(), color.green(), color.blue())
}

/// Color notations selected by a [`ColorFormat`], masked when the color is hidden.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorLabel {
    /// Decimal triple, present when the format shows it.
    pub rgb: Option<String>,
    /// Hexadecimal notation, present when the format shows it.
    pub hex: Option<String>,
}

impl ColorLabel {
    /// Builds the label for `color`, using masked text when it is `None`.
    #[must_use]
    pub fn new(color: Option<Color>, format: ColorFormat) -> Self {
        let rgb = format.shows_rgb().then(|| match color {
            Some(color) => format_rgb(color),
            None => MASKED_RGB.to_owned(),
        });
        let hex = format.shows_hex().then(|| match color {
            Some(color) => format_hex(color),
            None => MASKED_HEX.to_owned(),
        });
        Self { rgb, hex }
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.rgb, &self.hex) {
            (Some(rgb), Some(hex)) => write!(f, "{rgb}  {hex}"),
            (Some(only), None) | (None, Some(only)) => f.write_str(only),
            (None, None) => Ok(()),
        }
    }
}

/// Formats a score as a percentage, or the placeholder when unset.
#[must_use]
pub fn score_text(score: Option<Score>) -> String {
    score.map_or_else(|| NO_VALUE.to_owned(), |score| format!("{score}%"))
}

/// Joins the score history as `96%, 80%`, or the placeholder when empty.
#[must_use]
pub fn score_history_line(history: &[Score]) -> String {
    if history.is_empty() {
        return NO_VALUE.to_owned();
    }
    history
        .iter()
        .map(|score| format!("{score}%"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Hint explaining how reveals are earned under the active tier.
#[must_use]
pub fn reveal_hint(bonus_threshold: u8) -> String {
    format!("Earn reveals by scoring {bonus_threshold}% or higher!")
}

/// Prompt announcing a new round.
#[must_use]
pub fn round_prompt(round: RoundNumber) -> String {
    format!("Round {round}! Match the color.")
}

/// Message shown when a reveal is refused.
#[must_use]
pub const fn reveal_rejection(reason: RevealError) -> &'static str {
    match reason {
        RevealError::NoRevealsLeft => "No reveals left!",
        RevealError::AlreadyRevealed => "Already revealed for this round.",
    }
}

/// Title and message describing a scored guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackPresentation {
    /// Headline selected by the feedback level.
    pub title: &'static str,
    /// Score sentence followed by the level's encouragement.
    pub message: String,
    /// Bonus line, present when the submission granted a reveal.
    pub bonus: Option<&'static str>,
}

impl FeedbackPresentation {
    /// Builds the presentation for a submission outcome.
    #[must_use]
    pub fn from_result(result: &SubmitResult) -> Self {
        let (title, remark) = match result.level {
            FeedbackLevel::Perfect => ("Perfect Match!", "Absolutely flawless!"),
            FeedbackLevel::BonusLevel => ("Excellent!", "Great job!"),
            FeedbackLevel::Close => ("Very Close!", "You're almost there."),
            FeedbackLevel::Good => ("Getting Warmer", "Keep adjusting!"),
            FeedbackLevel::Far => ("Keep Trying", "Adjust the sliders more."),
        };
        Self {
            title,
            message: format!("Your score: {}% - {remark}", result.score),
            bonus: result.bonus_earned.then_some(BONUS_EARNED),
        }
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.to_owned(), self.message.clone()];
        lines.extend(self.bonus.map(str::to_owned));
        lines
    }
}

/// Status block describing the whole session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusPanel {
    /// Rendered lines in display order.
    pub lines: Vec<String>,
}

impl StatusPanel {
    /// Renders a snapshot using its own display preferences.
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let format = snapshot.preferences.color_format;
        let guess = snapshot.guess.map_or_else(
            || NO_VALUE.to_owned(),
            |guess| ColorLabel::new(Some(guess), format).to_string(),
        );
        let availability = if snapshot.can_reveal {
            "available"
        } else {
            "unavailable"
        };

        let lines = vec![
            format!(
                "Round {} | Difficulty: {} | Theme: {}",
                snapshot.round, snapshot.difficulty, snapshot.preferences.theme
            ),
            format!("Target: {}", ColorLabel::new(snapshot.target, format)),
            format!("Guess: {guess}"),
            format!("Last score: {}", score_text(snapshot.last_score)),
            format!("History: {}", score_history_line(&snapshot.score_history)),
            format!("Reveals: {} ({availability})", snapshot.reveal_count),
            reveal_hint(snapshot.bonus_threshold),
        ];
        Self { lines }
    }
}

impl fmt::Display for StatusPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Describes an event as user-facing lines.
///
/// `preferences` selects the notation used when an event carries a color.
#[must_use]
pub fn describe_event(event: &Event, preferences: Preferences) -> Vec<String> {
    match *event {
        Event::RoundStarted { round } => vec![round_prompt(round)],
        Event::GuessScored {
            result,
            reveal_count,
            ..
        } => {
            let mut lines = FeedbackPresentation::from_result(&result).lines();
            if result.bonus_earned {
                lines.push(format!("Reveals: {reveal_count}"));
            }
            lines
        }
        Event::TargetRevealed {
            target,
            reveals_left,
        } => vec![
            TARGET_REVEALED.to_owned(),
            format!(
                "Target: {}",
                ColorLabel::new(Some(target), preferences.color_format)
            ),
            format!("Reveals left: {reveals_left}"),
        ],
        Event::RevealRejected { reason } => vec![reveal_rejection(reason).to_owned()],
        Event::DifficultyChanged { tier } => vec![format!("Difficulty changed to {tier}.")],
        Event::PreferencesChanged { preferences } => vec![format!(
            "Theme: {}, format: {}",
            preferences.theme, preferences.color_format
        )],
        Event::SessionReset => vec!["Game stats reset!".to_owned()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_match_core::{DifficultyTier, RoundPhase, Theme};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            target: None,
            guess: Some(Color::from_rgb(217, 100, 50)),
            round: RoundNumber::new(3).expect("valid round"),
            phase: RoundPhase::Scored,
            last_score: Score::new(96),
            reveal_count: 6,
            score_history: vec![Score::saturating(96), Score::saturating(80)],
            can_reveal: true,
            difficulty: DifficultyTier::Medium,
            bonus_threshold: 95,
            preferences: Preferences::default(),
        }
    }

    #[test]
    fn formats_rgb_and_uppercase_hex() {
        let color = Color::from_rgb(200, 100, 5);
        assert_eq!(format_rgb(color), "(200, 100, 5)");
        assert_eq!(format_hex(color), "#C86405");
    }

    #[test]
    fn label_honours_color_format() {
        let color = Some(Color::from_rgb(0, 255, 16));
        assert_eq!(
            ColorLabel::new(color, ColorFormat::Both).to_string(),
            "(0, 255, 16)  #00FF10"
        );
        assert_eq!(ColorLabel::new(color, ColorFormat::Rgb).to_string(), "(0, 255, 16)");
        assert_eq!(ColorLabel::new(color, ColorFormat::Hex).to_string(), "#00FF10");
    }

    #[test]
    fn hidden_colors_are_masked() {
        let label = ColorLabel::new(None, ColorFormat::Both);
        assert_eq!(label.rgb.as_deref(), Some(MASKED_RGB));
        assert_eq!(label.hex.as_deref(), Some(MASKED_HEX));
    }

    #[test]
    fn history_line_joins_percentages() {
        assert_eq!(score_history_line(&[]), "-");
        assert_eq!(
            score_history_line(&[Score::saturating(96), Score::saturating(80)]),
            "96%, 80%"
        );
    }

    #[test]
    fn feedback_matches_level() {
        let perfect = FeedbackPresentation::from_result(&SubmitResult {
            score: Score::MAX,
            level: FeedbackLevel::Perfect,
            bonus_earned: true,
        });
        assert_eq!(perfect.title, "Perfect Match!");
        assert_eq!(perfect.message, "Your score: 100% - Absolutely flawless!");
        let lines = perfect.lines();
        assert_eq!(lines.last().map(String::as_str), Some(BONUS_EARNED));

        let far = FeedbackPresentation::from_result(&SubmitResult {
            score: Score::MIN,
            level: FeedbackLevel::Far,
            bonus_earned: false,
        });
        assert_eq!(far.title, "Keep Trying");
        assert_eq!(far.message, "Your score: 0% - Adjust the sliders more.");
        assert_eq!(far.lines().len(), 2);
    }

    #[test]
    fn status_panel_masks_target_and_shows_hint() {
        let panel = StatusPanel::from_snapshot(&snapshot());
        let text = panel.to_string();
        assert!(text.contains("Round 3 | Difficulty: medium | Theme: light"));
        assert!(text.contains("Target: (???, ???, ???)  #??????"));
        assert!(text.contains("Guess: (217, 100, 50)  #D96432"));
        assert!(text.contains("Last score: 96%"));
        assert!(text.contains("History: 96%, 80%"));
        assert!(text.contains("Reveals: 6 (available)"));
        assert!(text.contains("Earn reveals by scoring 95% or higher!"));
    }

    #[test]
    fn status_panel_uses_snapshot_preferences() {
        let mut snapshot = snapshot();
        snapshot.target = Some(Color::from_rgb(200, 100, 50));
        snapshot.preferences = Preferences {
            theme: Theme::Dark,
            color_format: ColorFormat::Hex,
        };
        let text = StatusPanel::from_snapshot(&snapshot).to_string();
        assert!(text.contains("Theme: dark"));
        assert!(text.contains("Target: #C86432"));
        assert!(!text.contains("(200, 100, 50)"));
    }

    #[test]
    fn reveal_events_render_messages() {
        let preferences = Preferences::default();
        assert_eq!(
            describe_event(
                &Event::RevealRejected {
                    reason: RevealError::NoRevealsLeft
                },
                preferences
            ),
            vec!["No reveals left!".to_owned()]
        );
        assert_eq!(
            describe_event(
                &Event::RevealRejected {
                    reason: RevealError::AlreadyRevealed
                },
                preferences
            ),
            vec!["Already revealed for this round.".to_owned()]
        );
        let revealed = describe_event(
            &Event::TargetRevealed {
                target: Color::from_rgb(10, 20, 30),
                reveals_left: 4,
            },
            preferences,
        );
        assert_eq!(revealed[0], TARGET_REVEALED);
        assert_eq!(revealed[1], "Target: (10, 20, 30)  #0A141E");
    }

    #[test]
    fn round_prompt_names_the_round() {
        assert_eq!(round_prompt(RoundNumber::FIRST), "Round 1! Match the color.");
        assert_eq!(reveal_hint(90), "Earn reveals by scoring 90% or higher!");
    }
}
