/// Progress keeps track of which words a player has solved and in how many attempts. Data
/// is saved in JSON format under a single key of a small key-value store.
use std::{
    collections::HashMap,
    fmt::Display,
    fs,
    path::PathBuf,
    sync::{Arc, RwLock},
};

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Serialize};

use crate::board::ROWS;
use crate::wordle::Word;

/// Key the solved word list is stored under.
pub const PROGRESS_KEY: &str = "wordle-solved-words";

/// Storage is a durable string key-value store.
pub trait Storage: Send {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

/// FileStorage keeps one `<key>.json` file per key inside a save directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<FileStorage> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Error creating save directory {}", dir.display()))?;
        Ok(FileStorage { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let filename = self.path(key);
        if !filename.exists() {
            return Ok(None);
        }
        fs::read_to_string(&filename)
            .map(Some)
            .with_context(|| format!("Error reading file {}", filename.display()))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let filename = self.path(key);
        fs::write(&filename, value)
            .with_context(|| format!("Error writing file {}", filename.display()))
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        let filename = self.path(key);
        match fs::remove_file(&filename) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(e).with_context(|| format!("Error removing file {}", filename.display()))
            }
            _ => Ok(()),
        }
    }
}

/// MemoryStorage is an in-process store. Clones share the same entries, so a test can keep a
/// handle and look at what a game wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }

}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| anyhow!("storage lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.write().map_err(|_| anyhow!("storage lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.write().map_err(|_| anyhow!("storage lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// SolvedWord records the best result for one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedWord {
    pub word: Word,
    pub attempts: u8,
    /// When the word was first solved. Improving the attempts doesn't move it.
    pub date: DateTime<Utc>,
}

/// `load` reads the solved word list from `storage`. Missing or malformed data yields an empty
/// list; this never fails the caller.
pub fn load(storage: &dyn Storage) -> Vec<SolvedWord> {
    let text = match storage.get(PROGRESS_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Error loading progress: {:#}", e);
            return Vec::new();
        }
    };

    let records: Vec<SolvedWord> = match serde_json::from_str(&text) {
        Ok(records) => records,
        Err(e) => {
            warn!("Ignoring corrupted progress data: {}", e);
            return Vec::new();
        }
    };

    // Fold duplicates so there's at most one record per word.
    let mut solved: Vec<SolvedWord> = Vec::with_capacity(records.len());
    for record in records {
        if !(1..=ROWS as u8).contains(&record.attempts) {
            warn!(
                "Ignoring {} solved in {} attempts",
                record.word, record.attempts
            );
            continue;
        }
        match solved.iter_mut().find(|r| r.word == record.word) {
            Some(existing) => existing.attempts = existing.attempts.min(record.attempts),
            None => solved.push(record),
        }
    }
    solved
}

/// One line of the progress panel. Unsolved gift words are hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub word: Option<Word>,
    pub attempts: Option<u8>,
}

/// Summary is what the progress panel shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub entries: Vec<Entry>,
    pub solved: usize,
    /// Number of words to find, when there is a fixed set.
    pub total: Option<usize>,
    pub average: f32,
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.total {
            Some(total) => write!(f, "Solved {}/{}", self.solved, total)?,
            None => write!(f, "Solved {}", self.solved)?,
        }
        write!(f, ", average {:.1} guesses", self.average)
    }
}

/// Progress is the player's solved word list, backed by a `Storage`.
pub struct Progress {
    storage: Box<dyn Storage>,
    solved: Vec<SolvedWord>,
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("solved", &self.solved)
            .finish()
    }
}

impl Progress {
    /// Opens the progress saved in `storage`.
    pub fn open(storage: impl Storage + 'static) -> Progress {
        let storage: Box<dyn Storage> = Box::new(storage);
        let solved = load(storage.as_ref());
        debug!("Loaded {} solved words", solved.len());
        Progress { storage, solved }
    }

    /// Progress that lives only as long as the process.
    pub fn in_memory() -> Progress {
        Progress::open(MemoryStorage::new())
    }

    #[cfg(test)]
    pub fn records(&self) -> &[SolvedWord] {
        &self.solved
    }

    pub fn get(&self, word: &Word) -> Option<&SolvedWord> {
        self.solved.iter().find(|r| r.word == *word)
    }

    pub fn is_solved(&self, word: &Word) -> bool {
        self.get(word).is_some()
    }

    /// Records that `word` was solved in `attempts`. An existing record is only changed if
    /// `attempts` beats it. Returns true if anything changed.
    pub fn add_or_improve(&mut self, word: Word, attempts: u8) -> bool {
        let changed = match self.solved.iter_mut().find(|r| r.word == word) {
            Some(existing) if attempts < existing.attempts => {
                existing.attempts = attempts;
                true
            }
            Some(_) => false,
            None => {
                self.solved.push(SolvedWord {
                    word,
                    attempts,
                    date: Utc::now(),
                });
                true
            }
        };

        if changed {
            self.save();
        }
        changed
    }

    /// Marks every word in `targets` solved without touching existing records. Attempts vary
    /// with the position in the list (2, 3, 4, ...), up to a full board.
    pub fn mark_solved(&mut self, targets: &[Word]) {
        for (i, word) in targets.iter().enumerate() {
            if !self.is_solved(word) {
                self.solved.push(SolvedWord {
                    word: *word,
                    attempts: (i + 2).min(ROWS) as u8,
                    date: Utc::now(),
                });
            }
        }
        self.save();
    }

    /// Forgets every solved word and removes the stored entry.
    pub fn clear(&mut self) {
        self.solved.clear();
        if let Err(e) = self.storage.remove(PROGRESS_KEY) {
            error!("Error clearing progress: {:#}", e);
        }
    }

    /// Summarizes progress. With `targets`, only those words count and they're listed in
    /// order; otherwise every solved word is listed, most recent first.
    pub fn summary(&self, targets: Option<&[Word]>) -> Summary {
        let (entries, counted): (Vec<Entry>, Vec<&SolvedWord>) = match targets {
            Some(targets) => {
                let entries = targets
                    .iter()
                    .map(|w| match self.get(w) {
                        Some(r) => Entry {
                            word: Some(r.word),
                            attempts: Some(r.attempts),
                        },
                        None => Entry {
                            word: None,
                            attempts: None,
                        },
                    })
                    .collect();
                let counted = self
                    .solved
                    .iter()
                    .filter(|r| targets.contains(&r.word))
                    .collect();
                (entries, counted)
            }
            None => {
                let mut counted: Vec<&SolvedWord> = self.solved.iter().collect();
                counted.sort_by(|a, b| b.date.cmp(&a.date));
                let entries = counted
                    .iter()
                    .map(|r| Entry {
                        word: Some(r.word),
                        attempts: Some(r.attempts),
                    })
                    .collect();
                (entries, counted)
            }
        };

        let solved = counted.len();
        let average = if solved == 0 {
            0.0
        } else {
            counted.iter().map(|r| r.attempts as f32).sum::<f32>() / solved as f32
        };

        Summary {
            entries,
            solved,
            total: targets.map(<[Word]>::len),
            average,
        }
    }

    fn save(&mut self) {
        let result = serde_json::to_string(&self.solved)
            .context("Error serializing progress")
            .and_then(|json| self.storage.set(PROGRESS_KEY, &json));
        if let Err(e) = result {
            error!("Error saving progress: {:#}", e);
        }
    }
}
