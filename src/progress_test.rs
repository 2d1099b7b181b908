use pretty_assertions::assert_eq;

use crate::progress::*;
use crate::wordle::Word;

fn word(s: &str) -> Word {
    s.parse().unwrap()
}

fn saved(json: &str) -> MemoryStorage {
    let mut storage = MemoryStorage::new();
    storage.set(PROGRESS_KEY, json).unwrap();
    storage
}

fn stored(storage: &MemoryStorage) -> Vec<SolvedWord> {
    serde_json::from_str(&storage.get(PROGRESS_KEY).unwrap().unwrap()).unwrap()
}

#[test]
fn worse_attempts_do_not_replace_best() {
    let storage = MemoryStorage::new();
    let mut progress = Progress::open(storage.clone());

    assert!(progress.add_or_improve(word("EARTH"), 3));
    assert!(!progress.add_or_improve(word("EARTH"), 5));

    assert_eq!(progress.get(&word("EARTH")).unwrap().attempts, 3);
    assert_eq!(stored(&storage)[0].attempts, 3);
}

#[test]
fn better_attempts_replace_and_keep_date() {
    let storage = MemoryStorage::new();
    let mut progress = Progress::open(storage.clone());

    progress.add_or_improve(word("EARTH"), 3);
    let first = progress.get(&word("EARTH")).unwrap().date;
    assert!(progress.add_or_improve(word("EARTH"), 2));

    let record = progress.get(&word("EARTH")).unwrap();
    assert_eq!(record.attempts, 2);
    assert_eq!(record.date, first);
    assert_eq!(progress.records().len(), 1);
    assert_eq!(stored(&storage)[0].attempts, 2);
}

#[test]
fn reopening_reads_saved_records() {
    let storage = MemoryStorage::new();
    {
        let mut progress = Progress::open(storage.clone());
        progress.add_or_improve(word("LILAC"), 4);
        progress.add_or_improve(word("TEETH"), 6);
    }

    let progress = Progress::open(storage);
    let words: Vec<_> = progress.records().iter().map(|r| r.word).collect();
    assert_eq!(words, vec![word("LILAC"), word("TEETH")]);
}

#[test]
fn corrupted_data_loads_empty() {
    let storage = saved("{not json");
    assert!(load(&storage).is_empty());

    let storage = saved(r#"[{"word":"TOOLONG","attempts":1}]"#);
    assert!(Progress::open(storage).records().is_empty());
}

#[test]
fn missing_data_loads_empty() {
    assert!(load(&MemoryStorage::new()).is_empty());
}

#[test]
fn duplicate_records_are_folded_on_load() {
    let json = r#"[
        {"word":"EARTH","attempts":4,"date":"2024-12-24T10:00:00Z"},
        {"word":"EARTH","attempts":2,"date":"2024-12-25T10:00:00Z"}
    ]"#;
    let records = load(&saved(json));

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].attempts, 2);
}

#[test]
fn impossible_attempts_are_dropped_on_load() {
    let json = r#"[
        {"word":"EARTH","attempts":0,"date":"2024-12-24T10:00:00Z"},
        {"word":"LILAC","attempts":99,"date":"2024-12-24T10:00:00Z"},
        {"word":"TEETH","attempts":6,"date":"2024-12-24T10:00:00Z"},
        {"word":"TEETH","attempts":7,"date":"2024-12-25T10:00:00Z"}
    ]"#;
    let progress = Progress::open(saved(json));

    let words: Vec<_> = progress.records().iter().map(|r| r.word).collect();
    assert_eq!(words, vec![word("TEETH")]);
    assert_eq!(progress.get(&word("TEETH")).unwrap().attempts, 6);
    assert_eq!(progress.summary(None).to_string(), "Solved 1, average 6.0 guesses");
}

#[test]
fn clear_removes_the_entry() {
    let storage = MemoryStorage::new();
    let mut progress = Progress::open(storage.clone());
    progress.add_or_improve(word("EARTH"), 1);

    progress.clear();

    assert!(progress.records().is_empty());
    assert_eq!(storage.get(PROGRESS_KEY).unwrap(), None);
}

#[test]
fn summary_over_targets_hides_unsolved() {
    let mut progress = Progress::in_memory();
    progress.add_or_improve(word("LILAC"), 2);
    progress.add_or_improve(word("HOUSE"), 6);
    progress.add_or_improve(word("TEETH"), 5);

    let targets = [word("EARTH"), word("LILAC"), word("TEETH")];
    let summary = progress.summary(Some(&targets));

    assert_eq!(summary.solved, 2);
    assert_eq!(summary.total, Some(3));
    assert_eq!(summary.average, 3.5);
    assert_eq!(summary.entries[0], Entry { word: None, attempts: None });
    assert_eq!(summary.entries[1].word, Some(word("LILAC")));
    assert_eq!(summary.to_string(), "Solved 2/3, average 3.5 guesses");
}

#[test]
fn summary_without_targets_counts_everything() {
    let mut progress = Progress::in_memory();
    assert_eq!(progress.summary(None).average, 0.0);

    progress.add_or_improve(word("HOUSE"), 3);
    progress.add_or_improve(word("WATER"), 4);

    let summary = progress.summary(None);
    assert_eq!(summary.solved, 2);
    assert_eq!(summary.total, None);
    assert_eq!(summary.entries.len(), 2);
}

#[test]
fn mark_solved_keeps_existing_records() {
    let mut progress = Progress::in_memory();
    progress.add_or_improve(word("LILAC"), 1);

    progress.mark_solved(&[word("EARTH"), word("LILAC"), word("TEETH")]);

    assert_eq!(progress.get(&word("EARTH")).unwrap().attempts, 2);
    assert_eq!(progress.get(&word("LILAC")).unwrap().attempts, 1);
    assert_eq!(progress.get(&word("TEETH")).unwrap().attempts, 4);
}

#[test]
fn mark_solved_stays_within_a_full_board() {
    let mut progress = Progress::in_memory();
    let targets: Vec<Word> = ["EARTH", "LILAC", "TEETH", "CRANE", "HOUSE", "WORLD", "GREAT"]
        .iter()
        .map(|w| word(w))
        .collect();

    progress.mark_solved(&targets);

    assert_eq!(progress.get(&word("HOUSE")).unwrap().attempts, 6);
    assert_eq!(progress.get(&word("WORLD")).unwrap().attempts, 6);
    assert_eq!(progress.get(&word("GREAT")).unwrap().attempts, 6);
    assert!(progress.records().iter().all(|r| r.attempts <= 6));
}

#[test]
fn file_storage_round_trips_and_removes() {
    let dir = std::env::temp_dir().join(format!("giftwordle-test-{}", std::process::id()));
    let mut storage = FileStorage::new(&dir).unwrap();

    assert_eq!(storage.get("missing").unwrap(), None);
    storage.set("key", "[]").unwrap();
    assert_eq!(storage.get("key").unwrap().as_deref(), Some("[]"));
    storage.remove("key").unwrap();
    storage.remove("key").unwrap();
    assert_eq!(storage.get("key").unwrap(), None);

    std::fs::remove_dir_all(dir).unwrap();
}
