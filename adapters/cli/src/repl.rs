use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use color_match_core::{
    Color, ColorFormat, Command, DifficultyTier, Event, Preferences, RoundPhase, Theme,
    UnknownName,
};
use color_match_persistence::{KeyValueStore, Persistence};
use color_match_rendering::{describe_event, round_prompt, ColorLabel, StatusPanel};
use color_match_session::{apply, query, Session, SessionPolicy};
use color_match_system_sampler::ColorSampler;
use thiserror::Error;
use tracing::debug;

/// Slider position at startup, the middle of each channel.
const INITIAL_SLIDERS: Color = Color::from_rgb(128, 128, 128);

pub(crate) const HELP: &str = "\
Commands:
  set R G B          move the sliders to a color
  submit             score the slider color against the target
  guess R G B        move the sliders and submit in one step
  reveal             spend a reveal to show the target
  next               start the next round
  difficulty TIER    easy, medium or hard
  theme THEME        light or dark
  format FORMAT      rgb, hex or both
  reset              restore reveals, round and history
  status             show the session
  help               show this list
  quit               leave the game";

/// One line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    SetSliders(Color),
    Submit,
    Guess(Color),
    Reveal,
    Next,
    Difficulty(DifficultyTier),
    Theme(Theme),
    Format(ColorFormat),
    Reset,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum InputError {
    #[error("unknown command `{0}`; type `help` for a list")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },
    #[error("channel `{0}` must be a whole number from 0 to 255")]
    Channel(String),
    #[error(transparent)]
    Name(#[from] UnknownName),
}

/// Parses a line of input. Blank lines yield `None`.
pub(crate) fn parse_line(line: &str) -> Result<Option<Input>, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let arguments: Vec<&str> = words.collect();

    let input = match command.to_ascii_lowercase().as_str() {
        "set" => Input::SetSliders(color_argument("set", &arguments)?),
        "guess" => Input::Guess(color_argument("guess", &arguments)?),
        "submit" => bare("submit", &arguments, Input::Submit)?,
        "reveal" => bare("reveal", &arguments, Input::Reveal)?,
        "next" => bare("next", &arguments, Input::Next)?,
        "reset" => bare("reset", &arguments, Input::Reset)?,
        "status" => bare("status", &arguments, Input::Status)?,
        "help" => bare("help", &arguments, Input::Help)?,
        "quit" | "exit" => bare("quit", &arguments, Input::Quit)?,
        "difficulty" => Input::Difficulty(
            single_argument("difficulty", "one of easy, medium, hard", &arguments)?
                .parse::<DifficultyTier>()?,
        ),
        "theme" => Input::Theme(
            single_argument("theme", "one of light, dark", &arguments)?.parse::<Theme>()?,
        ),
        "format" => Input::Format(
            single_argument("format", "one of rgb, hex, both", &arguments)?
                .parse::<ColorFormat>()?,
        ),
        other => return Err(InputError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(input))
}

fn bare(command: &'static str, arguments: &[&str], input: Input) -> Result<Input, InputError> {
    if arguments.is_empty() {
        Ok(input)
    } else {
        Err(InputError::Arguments {
            command,
            expected: "no arguments",
        })
    }
}

fn single_argument<'a>(
    command: &'static str,
    expected: &'static str,
    arguments: &[&'a str],
) -> Result<&'a str, InputError> {
    match arguments {
        [value] => Ok(*value),
        _ => Err(InputError::Arguments { command, expected }),
    }
}

fn color_argument(command: &'static str, arguments: &[&str]) -> Result<Color, InputError> {
    let [red, green, blue] = arguments else {
        return Err(InputError::Arguments {
            command,
            expected: "three channels, e.g. `128 64 255`",
        });
    };
    Ok(Color::from_rgb(
        channel(red)?,
        channel(green)?,
        channel(blue)?,
    ))
}

fn channel(text: &str) -> Result<u8, InputError> {
    text.parse()
        .map_err(|_| InputError::Channel(text.to_owned()))
}

/// Whether the loop should keep reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end driving a session and saving its progress.
pub(crate) struct Repl<S, K> {
    session: Session<S>,
    persistence: Option<Persistence<K>>,
    sliders: Color,
    events: Vec<Event>,
}

impl<S: ColorSampler, K: KeyValueStore> Repl<S, K> {
    /// Resumes saved progress when persistence is enabled, otherwise starts fresh.
    pub(crate) fn start(
        sampler: S,
        policy: SessionPolicy,
        mut persistence: Option<Persistence<K>>,
    ) -> Self {
        let progress = persistence
            .as_mut()
            .map(Persistence::load)
            .unwrap_or_default();
        Self {
            session: Session::restore(sampler, policy, progress),
            persistence,
            sliders: INITIAL_SLIDERS,
            events: Vec::new(),
        }
    }

    /// Reads commands until `quit` or the end of input.
    pub(crate) fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<()> {
        writeln!(out, "{}", round_prompt(query::round_number(&self.session)))?;
        writeln!(out, "Type `help` for commands.")?;
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            match parse_line(&line) {
                Ok(None) => {}
                Ok(Some(input)) => {
                    if self.handle(input, &mut out)? == Flow::Quit {
                        break;
                    }
                }
                Err(error) => writeln!(out, "{error}")?,
            }
            out.flush()?;
        }
        Ok(())
    }

    pub(crate) fn handle(&mut self, input: Input, out: &mut impl Write) -> io::Result<Flow> {
        match input {
            Input::SetSliders(color) => {
                self.sliders = color;
                self.write_sliders(out)?;
            }
            Input::Submit => self.submit(out)?,
            Input::Guess(color) => {
                self.sliders = color;
                self.submit(out)?;
            }
            Input::Reveal => self.execute(Command::Reveal, out)?,
            Input::Next => self.execute(Command::AdvanceRound, out)?,
            Input::Difficulty(tier) => self.execute(Command::ChangeDifficulty { tier }, out)?,
            Input::Theme(theme) => {
                let preferences = Preferences {
                    theme,
                    ..query::preferences(&self.session)
                };
                self.execute(Command::ChangePreferences { preferences }, out)?;
            }
            Input::Format(color_format) => {
                let preferences = Preferences {
                    color_format,
                    ..query::preferences(&self.session)
                };
                self.execute(Command::ChangePreferences { preferences }, out)?;
            }
            Input::Reset => self.execute(Command::Reset, out)?,
            Input::Status => {
                writeln!(out, "{}", StatusPanel::from_snapshot(&query::snapshot(&self.session)))?;
                self.write_sliders(out)?;
            }
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn submit(&mut self, out: &mut impl Write) -> io::Result<()> {
        if query::phase(&self.session) == RoundPhase::Scored {
            return writeln!(out, "This round is already scored. Type `next` for a new color.");
        }
        self.execute(
            Command::SubmitGuess {
                guess: self.sliders,
            },
            out,
        )
    }

    fn execute(&mut self, command: Command, out: &mut impl Write) -> io::Result<()> {
        self.events.clear();
        apply(&mut self.session, command, &mut self.events);
        if self.events.is_empty() {
            return writeln!(out, "Nothing changed.");
        }

        let preferences = query::preferences(&self.session);
        for event in &self.events {
            for line in describe_event(event, preferences) {
                writeln!(out, "{line}")?;
            }
        }
        if self.events.iter().any(Event::changes_progress) {
            self.save();
        }
        Ok(())
    }

    fn save(&mut self) {
        match self.persistence.as_mut() {
            Some(persistence) => persistence.save(&query::saved_progress(&self.session)),
            None => debug!("saving disabled; progress kept in memory only"),
        }
    }

    fn write_sliders(&self, out: &mut impl Write) -> io::Result<()> {
        let format = query::preferences(&self.session).color_format;
        writeln!(out, "Sliders: {}", ColorLabel::new(Some(self.sliders), format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_match_core::{RevealError, SavedProgress, INITIAL_REVEALS};
    use color_match_persistence::{MemoryStore, STORAGE_KEY};
    use color_match_system_sampler::ScriptedSampler;

    const TARGET: Color = Color::from_rgb(200, 100, 50);

    fn repl(persistence: Option<Persistence<MemoryStore>>) -> Repl<ScriptedSampler, MemoryStore> {
        Repl::start(
            ScriptedSampler::new(vec![TARGET, Color::from_rgb(10, 20, 30)]),
            SessionPolicy::default(),
            persistence,
        )
    }

    fn play(repl: &mut Repl<ScriptedSampler, MemoryStore>, script: &str) -> String {
        let mut out = Vec::new();
        repl.run(script.as_bytes(), &mut out).expect("script runs");
        String::from_utf8(out).expect("output is UTF-8")
    }

    fn saved(repl: &Repl<ScriptedSampler, MemoryStore>) -> Option<String> {
        repl.persistence
            .as_ref()
            .and_then(|persistence| persistence.store().get(STORAGE_KEY).expect("memory get"))
    }

    #[test]
    fn parses_commands_case_insensitively() {
        assert_eq!(
            parse_line("  SET 1 2 3 "),
            Ok(Some(Input::SetSliders(Color::from_rgb(1, 2, 3))))
        );
        assert_eq!(parse_line("difficulty Hard"), Ok(Some(Input::Difficulty(DifficultyTier::Hard))));
        assert_eq!(parse_line("format hex"), Ok(Some(Input::Format(ColorFormat::Hex))));
        assert_eq!(parse_line("exit"), Ok(Some(Input::Quit)));
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            parse_line("jump"),
            Err(InputError::UnknownCommand("jump".to_owned()))
        );
        assert_eq!(
            parse_line("set 1 2 256"),
            Err(InputError::Channel("256".to_owned()))
        );
        assert!(matches!(
            parse_line("guess 1 2"),
            Err(InputError::Arguments { command: "guess", .. })
        ));
        assert!(matches!(parse_line("reveal now"), Err(InputError::Arguments { .. })));
        assert!(matches!(parse_line("theme sepia"), Err(InputError::Name(_))));
    }

    #[test]
    fn perfect_guess_reports_and_saves() {
        let mut repl = repl(Some(Persistence::new(MemoryStore::new())));

        let output = play(&mut repl, "guess 200 100 50\n");

        assert!(output.contains("Round 1! Match the color."));
        assert!(output.contains("Perfect Match!"));
        assert!(output.contains("Your score: 100% - Absolutely flawless!"));
        assert!(output.contains("+1 Reveal Earned!"));
        let progress = query::saved_progress(&repl.session);
        assert_eq!(progress.reveal_count, INITIAL_REVEALS + 1);
        let record = saved(&repl).expect("progress saved");
        assert!(record.contains("\"revealCount\":6"));
        assert!(record.contains("\"lastScore\":100"));
    }

    #[test]
    fn second_submission_in_a_round_is_refused() {
        let mut repl = repl(None);

        let output = play(&mut repl, "guess 0 0 0\nguess 200 100 50\n");

        assert!(output.contains("This round is already scored."));
        assert_eq!(query::score_history(&repl.session).len(), 1);
    }

    #[test]
    fn reveal_rejections_do_not_save() {
        let mut repl = repl(Some(Persistence::new(MemoryStore::new())));

        let output = play(&mut repl, "reveal\n");
        assert!(output.contains("Target revealed!"));
        assert!(output.contains("Target: (200, 100, 50)  #C86432"));
        let after_reveal = saved(&repl).expect("reveal saved");

        let output = play(&mut repl, "reveal\n");
        assert!(output.contains("Already revealed for this round."));
        assert_eq!(saved(&repl), Some(after_reveal));
        assert!(!query::snapshot(&repl.session).can_reveal);
    }

    #[test]
    fn exhausted_reveals_are_reported() {
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save(&SavedProgress {
            reveal_count: 0,
            ..SavedProgress::default()
        });
        let mut repl = repl(Some(persistence));

        let mut out = Vec::new();
        let flow = repl.handle(Input::Reveal, &mut out).expect("write");

        assert_eq!(flow, Flow::Continue);
        let output = String::from_utf8(out).expect("UTF-8");
        assert_eq!(
            output.trim(),
            color_match_rendering::reveal_rejection(RevealError::NoRevealsLeft)
        );
        assert_eq!(query::reveal_count(&repl.session), 0);
    }

    #[test]
    fn preferences_change_notation() {
        let mut repl = repl(None);

        let output = play(&mut repl, "format hex\nset 255 0 16\ntheme dark\nstatus\n");

        assert!(output.contains("Theme: light, format: hex"));
        assert!(output.contains("Sliders: #FF0010"));
        assert!(output.contains("Theme: dark, format: hex"));
        assert!(output.contains("Target: #??????"));
    }

    #[test]
    fn unchanged_difficulty_reports_nothing_changed() {
        let mut repl = repl(None);

        let output = play(&mut repl, "difficulty medium\ndifficulty easy\n");

        assert!(output.contains("Nothing changed."));
        assert!(output.contains("Difficulty changed to easy."));
        assert_eq!(query::difficulty(&repl.session), DifficultyTier::Easy);
    }

    #[test]
    fn quit_stops_reading_input() {
        let mut repl = repl(None);

        let output = play(&mut repl, "quit\nnext\n");

        assert!(!output.contains("Round 2!"));
        assert_eq!(query::round_number(&repl.session).get(), 1);
    }

    #[test]
    fn next_and_reset_renumber_rounds() {
        let mut repl = repl(Some(Persistence::new(MemoryStore::new())));

        let output = play(&mut repl, "next\nnext\nreset\n");

        assert!(output.contains("Round 3! Match the color."));
        assert!(output.contains("Game stats reset!"));
        let record = saved(&repl).expect("saved");
        assert!(record.contains("\"currentRound\":1"));
    }
}
