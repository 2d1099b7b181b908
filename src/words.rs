/// Word lists: the dictionary of valid guesses, loaded once at startup.
use std::{collections::HashSet, path::Path};

use anyhow::{bail, Context};
use log::*;
use rand::{seq::SliceRandom, Rng};

use crate::wordle::Word;

/// Used when the word list file can't be read.
pub const FALLBACK_WORDS: [&str; 10] = [
    "ABOUT", "HOUSE", "WORLD", "GREAT", "RIGHT", "THINK", "PLACE", "WATER", "WHERE", "FIRST",
];

/// WordList holds every word a player may submit, in file order, plus an index for
/// membership checks.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<Word>,
    index: HashSet<Word>,
}

impl WordList {
    /// `load` reads the word list at `path`, falling back to the embedded list if the file is
    /// missing, unreadable or contains no usable words. It never fails.
    pub fn load(path: impl AsRef<Path>) -> WordList {
        let path = path.as_ref();
        match WordList::read(path) {
            Ok(words) => {
                info!("Loaded {} words from {}", words.len(), path.display());
                words
            }
            Err(e) => {
                warn!("Word list unavailable, using fallback words: {:#}", e);
                WordList::fallback()
            }
        }
    }

    /// `read` reads a file containing one word per line.
    pub fn read(path: impl AsRef<Path>) -> anyhow::Result<WordList> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Error reading word list {}", path.display()))?;

        let words = WordList::parse(&text);
        if words.is_empty() {
            bail!("no valid words found in {}", path.display());
        }
        Ok(words)
    }

    // `parse` filters out empty lines and lines that start with a '#'. Lines that aren't five
    // letter words are skipped.
    pub fn parse(text: &str) -> WordList {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|s| !s.starts_with('#'))
            .filter(|s| !s.is_empty())
            .filter_map(|s| match s.parse::<Word>() {
                Ok(word) => Some(word),
                Err(e) => {
                    debug!("Skipping word list entry {:?}: {}", s, e);
                    None
                }
            });
        WordList::from_words(words)
    }

    pub fn fallback() -> WordList {
        WordList::from_words(FALLBACK_WORDS.iter().filter_map(|w| w.parse().ok()))
    }

    pub fn from_words(words: impl IntoIterator<Item = Word>) -> WordList {
        let mut list = WordList::default();
        list.extend(words);
        list
    }

    /// Adds words to the list, skipping ones already present.
    pub fn extend(&mut self, words: impl IntoIterator<Item = Word>) {
        for word in words {
            if self.index.insert(word) {
                self.words.push(word);
            }
        }
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.index.contains(word)
    }

    /// Picks a word uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Word> {
        self.words.choose(rng).copied()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
