#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Color Match.
//!
//! A [`Session`] owns the active round, the reveal economy and the progress
//! counters. It is mutated exclusively through its operations or the
//! [`apply`] entry point and is read through the [`query`] module. The session
//! assumes a single owner; callers that share it across threads must serialize
//! every mutation behind one writer.

use color_match_core::{
    BonusGate, Color, Command, DifficultyTier, Event, Preferences, RevealError, RoundNumber,
    RoundPhase, SavedProgress, Score, SubmitResult, MAX_SCORE_HISTORY,
};
use color_match_system_difficulty as difficulty;
use color_match_system_reveal_economy::RevealEconomy;
use color_match_system_sampler::ColorSampler;
use color_match_system_scoring as scoring;
use tracing::debug;

/// Behaviour switches that differ between presentation variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Clears the last score and redraws the active round's target whenever
    /// the difficulty tier changes.
    pub advance_on_difficulty_change: bool,
    /// Decides which submissions within a round may earn a bonus reveal.
    pub bonus_gate: BonusGate,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            advance_on_difficulty_change: true,
            bonus_gate: BonusGate::FirstSubmission,
        }
    }
}

/// Outcome of a difficulty change request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DifficultyChange {
    /// The requested tier was already active.
    Unchanged,
    /// The tier changed.
    Changed {
        /// Indicates whether the active round was redrawn with a fresh target.
        round_redrawn: bool,
    },
}

/// Represents the authoritative Color Match session.
#[derive(Debug)]
pub struct Session<S> {
    sampler: S,
    policy: SessionPolicy,
    round: Round,
    economy: RevealEconomy,
    last_score: Option<Score>,
    score_history: ScoreHistory,
    difficulty: DifficultyTier,
    preferences: Preferences,
}

impl<S: ColorSampler> Session<S> {
    /// Creates a session with default progress.
    #[must_use]
    pub fn new(sampler: S, policy: SessionPolicy) -> Self {
        Self::restore(sampler, policy, SavedProgress::default())
    }

    /// Creates a session that resumes previously saved progress.
    ///
    /// Targets are never persisted, so the resumed round draws a fresh one.
    #[must_use]
    pub fn restore(mut sampler: S, policy: SessionPolicy, progress: SavedProgress) -> Self {
        let round = Round::new(progress.round, sampler.sample());
        debug!(
            round = %progress.round,
            reveal_count = progress.reveal_count,
            difficulty = %progress.difficulty,
            "session restored"
        );
        Self {
            sampler,
            policy,
            round,
            economy: RevealEconomy::new(progress.reveal_count, policy.bonus_gate),
            last_score: progress.last_score,
            score_history: ScoreHistory::from_recent(progress.score_history),
            difficulty: progress.difficulty,
            preferences: progress.preferences,
        }
    }

    /// Scores `guess` against the active target and records the outcome.
    ///
    /// Calling this again before [`Session::advance_round`] scores against the
    /// same target; preventing repeat submissions is the caller's concern.
    pub fn submit_guess(&mut self, guess: Color) -> SubmitResult {
        let thresholds = difficulty::thresholds_for(self.difficulty);
        let score = scoring::score(self.round.target, guess);
        self.score_history.push(score);

        let bonus_earned = self
            .economy
            .grant_on_bonus(difficulty::earns_bonus(score, &thresholds));
        let level = difficulty::classify(score, &thresholds);

        self.last_score = Some(score);
        self.round.last_guess = Some(guess);
        self.round.phase = RoundPhase::Scored;

        debug!(
            round = %self.round.number,
            %score,
            ?level,
            bonus_earned,
            "guess scored"
        );
        SubmitResult {
            score,
            level,
            bonus_earned,
        }
    }

    /// Spends a reveal and returns the active target.
    ///
    /// A refused reveal leaves the session untouched.
    pub fn reveal(&mut self) -> Result<Color, RevealError> {
        self.economy.spend()?;
        debug!(
            round = %self.round.number,
            reveals_left = self.economy.reveal_count(),
            "target revealed"
        );
        Ok(self.round.target)
    }

    /// Replaces the active round with the next one and returns its number.
    pub fn advance_round(&mut self) -> RoundNumber {
        let next = self.round.number.next();
        self.start_round(next);
        next
    }

    /// Switches the difficulty tier without rescoring earlier guesses.
    pub fn change_difficulty(&mut self, tier: DifficultyTier) -> DifficultyChange {
        if tier == self.difficulty {
            return DifficultyChange::Unchanged;
        }

        self.difficulty = tier;
        debug!(%tier, "difficulty changed");

        let round_redrawn = self.policy.advance_on_difficulty_change;
        if round_redrawn {
            self.last_score = None;
            self.start_round(self.round.number);
        }
        DifficultyChange::Changed { round_redrawn }
    }

    /// Replaces the display preferences, reporting whether anything changed.
    pub fn change_preferences(&mut self, preferences: Preferences) -> bool {
        if preferences == self.preferences {
            return false;
        }
        self.preferences = preferences;
        true
    }

    /// Restores reveal balance, round number, last score and history to their
    /// defaults. Difficulty and preferences are kept, as is the active target.
    pub fn reset(&mut self) {
        self.economy.reset_balance();
        self.round.number = RoundNumber::FIRST;
        self.last_score = None;
        self.score_history.clear();
        debug!("session progress reset");
    }

    fn start_round(&mut self, number: RoundNumber) {
        self.round = Round::new(number, self.sampler.sample());
        self.economy.start_round();
        debug!(round = %number, "round started");
    }
}

/// Applies the provided command to the session, reporting what changed.
pub fn apply<S: ColorSampler>(
    session: &mut Session<S>,
    command: Command,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::SubmitGuess { guess } => {
            let result = session.submit_guess(guess);
            out_events.push(Event::GuessScored {
                guess,
                result,
                reveal_count: session.economy.reveal_count(),
            });
        }
        Command::Reveal => match session.reveal() {
            Ok(target) => out_events.push(Event::TargetRevealed {
                target,
                reveals_left: session.economy.reveal_count(),
            }),
            Err(reason) => out_events.push(Event::RevealRejected { reason }),
        },
        Command::AdvanceRound => {
            let round = session.advance_round();
            out_events.push(Event::RoundStarted { round });
        }
        Command::ChangeDifficulty { tier } => match session.change_difficulty(tier) {
            DifficultyChange::Unchanged => {}
            DifficultyChange::Changed { round_redrawn } => {
                out_events.push(Event::DifficultyChanged { tier });
                if round_redrawn {
                    out_events.push(Event::RoundStarted {
                        round: session.round.number,
                    });
                }
            }
        },
        Command::ChangePreferences { preferences } => {
            if session.change_preferences(preferences) {
                out_events.push(Event::PreferencesChanged { preferences });
            }
        }
        Command::Reset => {
            session.reset();
            out_events.push(Event::SessionReset);
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use color_match_core::{
        DifficultyTier, Preferences, RoundNumber, RoundPhase, SavedProgress, Score,
        SessionSnapshot, Thresholds,
    };
    use color_match_system_difficulty as difficulty;

    use super::{Session, SessionPolicy};

    /// Captures the read-only view handed to presentation layers.
    ///
    /// The target is masked until it has been revealed for the active round.
    #[must_use]
    pub fn snapshot<S>(session: &Session<S>) -> SessionSnapshot {
        let revealed = session.economy.revealed_this_round();
        SessionSnapshot {
            target: revealed.then_some(session.round.target),
            guess: session.round.last_guess,
            round: session.round.number,
            phase: session.round.phase,
            last_score: session.last_score,
            reveal_count: session.economy.reveal_count(),
            score_history: session.score_history.as_slice().to_vec(),
            can_reveal: session.economy.can_reveal(),
            difficulty: session.difficulty,
            bonus_threshold: thresholds(session).bonus,
            preferences: session.preferences,
        }
    }

    /// Extracts the progress that should be persisted between processes.
    #[must_use]
    pub fn saved_progress<S>(session: &Session<S>) -> SavedProgress {
        SavedProgress {
            reveal_count: session.economy.reveal_count(),
            round: session.round.number,
            last_score: session.last_score,
            difficulty: session.difficulty,
            preferences: session.preferences,
            score_history: session.score_history.as_slice().to_vec(),
        }
    }

    /// Number of the active round.
    #[must_use]
    pub fn round_number<S>(session: &Session<S>) -> RoundNumber {
        session.round.number
    }

    /// Lifecycle phase of the active round.
    #[must_use]
    pub fn phase<S>(session: &Session<S>) -> RoundPhase {
        session.round.phase
    }

    /// Current reveal balance.
    #[must_use]
    pub fn reveal_count<S>(session: &Session<S>) -> u32 {
        session.economy.reveal_count()
    }

    /// Indicates whether a reveal would currently succeed.
    #[must_use]
    pub fn can_reveal<S>(session: &Session<S>) -> bool {
        session.economy.can_reveal()
    }

    /// Most recent score, if any.
    #[must_use]
    pub fn last_score<S>(session: &Session<S>) -> Option<Score> {
        session.last_score
    }

    /// Recent scores, most recent first.
    #[must_use]
    pub fn score_history<S>(session: &Session<S>) -> &[Score] {
        session.score_history.as_slice()
    }

    /// Active difficulty tier.
    #[must_use]
    pub fn difficulty<S>(session: &Session<S>) -> DifficultyTier {
        session.difficulty
    }

    /// Breakpoints of the active difficulty tier.
    #[must_use]
    pub fn thresholds<S>(session: &Session<S>) -> Thresholds {
        difficulty::thresholds_for(session.difficulty)
    }

    /// Active display preferences.
    #[must_use]
    pub fn preferences<S>(session: &Session<S>) -> Preferences {
        session.preferences
    }

    /// Policy the session was created with.
    #[must_use]
    pub fn policy<S>(session: &Session<S>) -> SessionPolicy {
        session.policy
    }
}

#[derive(Clone, Debug)]
struct Round {
    number: RoundNumber,
    target: Color,
    phase: RoundPhase,
    last_guess: Option<Color>,
}

impl Round {
    fn new(number: RoundNumber, target: Color) -> Self {
        Self {
            number,
            target,
            phase: RoundPhase::AwaitingGuess,
            last_guess: None,
        }
    }
}

/// Bounded score log ordered most recent first.
#[derive(Clone, Debug, Default)]
struct ScoreHistory {
    scores: Vec<Score>,
}

impl ScoreHistory {
    fn from_recent(mut scores: Vec<Score>) -> Self {
        scores.truncate(MAX_SCORE_HISTORY);
        Self { scores }
    }

    fn push(&mut self, score: Score) {
        self.scores.insert(0, score);
        self.scores.truncate(MAX_SCORE_HISTORY);
    }

    fn clear(&mut self) {
        self.scores.clear();
    }

    fn as_slice(&self) -> &[Score] {
        &self.scores
    }
}
