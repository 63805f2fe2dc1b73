//! Wire format of the persisted session record.
//!
//! The record is a flat JSON object using the field names of the browser
//! save format. Decoding is lenient: every field is validated on its
//! own, and a missing or unusable field falls back to its default without
//! affecting its neighbours.

use color_match_core::{
    ColorFormat, DifficultyTier, Preferences, RoundNumber, SavedProgress, Score, Theme,
    INITIAL_REVEALS, MAX_SCORE_HISTORY,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Placeholder stored in `lastScore` while no guess has been scored.
const UNSET_SCORE: &str = "-";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord<'a> {
    reveal_count: u32,
    current_round: u32,
    last_score: StoredScore,
    difficulty: DifficultyTier,
    theme: Theme,
    color_format: ColorFormat,
    score_history: &'a [Score],
}

#[derive(Serialize)]
#[serde(untagged)]
enum StoredScore {
    Scored(Score),
    Unset(&'static str),
}

/// Result of decoding a stored record.
#[derive(Debug)]
pub(crate) struct DecodedRecord {
    /// Progress reconstructed from the record.
    pub(crate) progress: SavedProgress,
    /// Names of fields that were present but unusable and fell back to defaults.
    pub(crate) fallbacks: Vec<&'static str>,
}

/// Serializes progress into the stored JSON representation.
pub(crate) fn encode(progress: &SavedProgress) -> Result<String, serde_json::Error> {
    let history_len = progress.score_history.len().min(MAX_SCORE_HISTORY);
    let record = StoredRecord {
        reveal_count: progress.reveal_count,
        current_round: progress.round.get(),
        last_score: progress
            .last_score
            .map_or(StoredScore::Unset(UNSET_SCORE), StoredScore::Scored),
        difficulty: progress.difficulty,
        theme: progress.preferences.theme,
        color_format: progress.preferences.color_format,
        score_history: &progress.score_history[..history_len],
    };
    serde_json::to_string(&record)
}

/// Parses a stored record, failing only when the text is not JSON at all.
pub(crate) fn decode(text: &str) -> Result<DecodedRecord, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    let empty = Map::new();
    let mut reader = match &value {
        Value::Object(fields) => FieldReader::new(fields),
        _ => {
            let mut reader = FieldReader::new(&empty);
            reader.fallbacks.push("record");
            reader
        }
    };

    let reveal_count = reader.read("revealCount", count).unwrap_or(INITIAL_REVEALS);
    let round = reader
        .read("currentRound", |value| count(value).and_then(RoundNumber::new))
        .unwrap_or(RoundNumber::FIRST);
    let last_score = reader
        .read("lastScore", |value| {
            if value.as_str() == Some(UNSET_SCORE) {
                Some(None)
            } else {
                score(value).map(Some)
            }
        })
        .flatten();
    let difficulty: DifficultyTier = reader.read("difficulty", named).unwrap_or_default();
    let theme: Theme = reader.read("theme", named).unwrap_or_default();
    let color_format: ColorFormat = reader.read("colorFormat", named).unwrap_or_default();
    let score_history = reader
        .read("scoreHistory", |value| {
            let entries = value.as_array()?;
            let history: Vec<Score> = entries.iter().filter_map(score).collect();
            Some((history.len() == entries.len(), history))
        })
        .map(|(intact, mut history)| {
            if !intact || history.len() > MAX_SCORE_HISTORY {
                reader.fallbacks.push("scoreHistory");
            }
            history.truncate(MAX_SCORE_HISTORY);
            history
        })
        .unwrap_or_default();

    Ok(DecodedRecord {
        progress: SavedProgress {
            reveal_count,
            round,
            last_score,
            difficulty,
            preferences: Preferences {
                theme,
                color_format,
            },
            score_history,
        },
        fallbacks: reader.fallbacks,
    })
}

/// Reads individual record fields while noting the ones that were unusable.
struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    fallbacks: Vec<&'static str>,
}

impl<'a> FieldReader<'a> {
    fn new(fields: &'a Map<String, Value>) -> Self {
        Self {
            fields,
            fallbacks: Vec::new(),
        }
    }

    /// Parses `name` when present. A present field that fails to parse is noted.
    fn read<T>(
        &mut self,
        name: &'static str,
        parse: impl FnOnce(&Value) -> Option<T>,
    ) -> Option<T> {
        let value = self.fields.get(name)?;
        let parsed = parse(value);
        if parsed.is_none() {
            self.fallbacks.push(name);
        }
        parsed
    }
}

/// Reads a non-negative integer from a JSON number or numeric string.
fn count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => {
            if let Some(integer) = number.as_u64() {
                return u32::try_from(integer).ok();
            }
            let float = number.as_f64()?;
            if float >= 0.0 && float.fract() == 0.0 && float <= f64::from(u32::MAX) {
                Some(float as u32)
            } else {
                None
            }
        }
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn score(value: &Value) -> Option<Score> {
    count(value)
        .and_then(|parsed| u8::try_from(parsed).ok())
        .and_then(Score::new)
}

fn named<T: std::str::FromStr>(value: &Value) -> Option<T> {
    value.as_str().and_then(|text| text.parse().ok())
}
