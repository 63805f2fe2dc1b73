use std::fs;

use color_match_core::{
    ColorFormat, DifficultyTier, Preferences, RoundNumber, SavedProgress, Score, Theme,
};
use color_match_persistence::{
    FileStore, KeyValueStore, MemoryStore, Persistence, PersistenceError, StoreError, STORAGE_KEY,
};

fn sample_progress() -> SavedProgress {
    SavedProgress {
        reveal_count: 3,
        round: RoundNumber::new(9).expect("valid round"),
        last_score: Score::new(91),
        difficulty: DifficultyTier::Easy,
        preferences: Preferences {
            theme: Theme::Dark,
            color_format: ColorFormat::Hex,
        },
        score_history: [91, 40, 77, 100, 12]
            .into_iter()
            .map(Score::saturating)
            .collect(),
    }
}

/// Store whose every operation fails.
#[derive(Debug, Default)]
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_owned()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_owned()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_owned()))
    }
}

fn store_with(value: &str) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.set(STORAGE_KEY, value).expect("memory store accepts writes");
    store
}

#[test]
fn saved_progress_round_trips() {
    let mut persistence = Persistence::new(MemoryStore::new());
    let progress = sample_progress();

    persistence.save(&progress);

    assert_eq!(persistence.load(), progress);
}

#[test]
fn unset_last_score_round_trips() {
    let mut persistence = Persistence::new(MemoryStore::new());
    let progress = SavedProgress {
        last_score: None,
        ..sample_progress()
    };

    persistence.try_save(&progress).expect("save succeeds");

    assert_eq!(persistence.try_load().expect("load succeeds"), Some(progress));
}

#[test]
fn missing_record_loads_defaults() {
    let mut persistence = Persistence::new(MemoryStore::new());
    assert!(persistence.try_load().expect("load succeeds").is_none());
    assert_eq!(persistence.load(), SavedProgress::default());
}

#[test]
fn single_corrupted_field_keeps_the_rest() {
    let mut persistence = Persistence::new(MemoryStore::new());
    persistence.save(&sample_progress());
    let stored = persistence
        .store()
        .get(STORAGE_KEY)
        .expect("get")
        .expect("record present");
    let corrupted = stored.replace("\"theme\":\"dark\"", "\"theme\":\"sepia\"");
    assert_ne!(corrupted, stored, "fixture must contain the theme field");

    let mut persistence = Persistence::new(store_with(&corrupted));
    let loaded = persistence.load();

    let expected = SavedProgress {
        preferences: Preferences {
            theme: Theme::Light,
            color_format: ColorFormat::Hex,
        },
        ..sample_progress()
    };
    assert_eq!(loaded, expected);
}

#[test]
fn browser_records_are_understood() {
    let text = r#"{"revealCount":7,"currentRound":23,"lastScore":"-","difficulty":"hard","theme":"dark","colorFormat":"rgb","scoreHistory":[88,97,64]}"#;
    let mut persistence = Persistence::new(store_with(text));

    let loaded = persistence.load();

    assert_eq!(loaded.reveal_count, 7);
    assert_eq!(loaded.round.get(), 23);
    assert_eq!(loaded.last_score, None);
    assert_eq!(loaded.difficulty, DifficultyTier::Hard);
    assert_eq!(loaded.preferences.theme, Theme::Dark);
    assert_eq!(loaded.preferences.color_format, ColorFormat::Rgb);
    let history: Vec<u8> = loaded.score_history.iter().map(Score::get).collect();
    assert_eq!(history, vec![88, 97, 64]);
}

#[test]
fn malformed_record_is_discarded() {
    let mut persistence = Persistence::new(store_with("{\"revealCount\": 4,"));

    assert!(matches!(
        persistence.try_load(),
        Err(PersistenceError::Malformed { .. })
    ));
    assert_eq!(persistence.load(), SavedProgress::default());
    assert!(persistence.store().is_empty(), "malformed record should be removed");
}

#[test]
fn broken_store_never_fails_the_caller() {
    let mut persistence = Persistence::new(BrokenStore);

    assert_eq!(persistence.load(), SavedProgress::default());
    persistence.save(&sample_progress());

    assert!(matches!(
        persistence.try_save(&sample_progress()),
        Err(PersistenceError::Write { .. })
    ));
    assert!(matches!(
        persistence.try_load(),
        Err(PersistenceError::Read { .. })
    ));
}

#[test]
fn file_store_persists_between_instances() {
    let directory = tempfile::tempdir().expect("temporary directory");
    let root = directory.path().join("state");

    let mut writer = Persistence::new(FileStore::new(&root));
    writer.save(&sample_progress());
    assert!(root.join(format!("{STORAGE_KEY}.json")).is_file());

    let mut reader = Persistence::new(FileStore::new(&root));
    assert_eq!(reader.load(), sample_progress());
}

#[test]
fn file_store_discards_corrupted_file() {
    let directory = tempfile::tempdir().expect("temporary directory");
    let path = directory.path().join(format!("{STORAGE_KEY}.json"));
    fs::write(&path, "not json at all").expect("write fixture");

    let mut persistence = Persistence::new(FileStore::new(directory.path()));

    assert_eq!(persistence.load(), SavedProgress::default());
    assert!(!path.exists());
}
