/// Wordle is a game where you have to guess a word. The word is chosen by the game, and you
/// have 6 attempts to guess it. After each attempt, the game tells you which letters you
/// guessed correctly, and which letters are in the word but in the wrong position.
///
/// This module holds the word type and the guess evaluator. Everything that has state lives
/// elsewhere.
use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of letters in every playable word.
pub const WORD_LEN: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WordError {
    #[error("word must be {} letters long, got {0}", WORD_LEN)]
    Length(usize),

    #[error("word contains invalid character {0:?}")]
    Character(char),
}

/// Word is a five letter, uppercase ASCII word. Once built it never changes, so it is cheap to
/// copy around between boards, sessions and the progress store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word([u8; WORD_LEN]);

impl Word {
    /// `from_letters` builds a word out of individual letters, e.g. the cells of a board row.
    pub fn from_letters(letters: &[char]) -> Result<Word, WordError> {
        if letters.len() != WORD_LEN {
            return Err(WordError::Length(letters.len()));
        }

        let mut bytes = [0u8; WORD_LEN];
        for (slot, c) in bytes.iter_mut().zip(letters) {
            if !c.is_ascii_alphabetic() {
                return Err(WordError::Character(*c));
            }
            *slot = c.to_ascii_uppercase() as u8;
        }

        Ok(Word(bytes))
    }

    pub fn letters(&self) -> [char; WORD_LEN] {
        self.0.map(char::from)
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters: Vec<char> = s.trim().chars().collect();
        Word::from_letters(&letters)
    }
}

impl TryFrom<String> for Word {
    type Error = WordError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Word> for String {
    fn from(word: Word) -> String {
        word.to_string()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.letters() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self)
    }
}

/// Mark is the feedback for a single letter. The ordering matters: a keyboard key only ever
/// moves up from `Absent` to `Present` to `Correct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mark {
    Absent,
    Present,
    Correct,
}

/// Letter represents the position of a single letter in an attempted
/// word.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub enum Letter {
    Correct(char),
    Present(char),
    Absent(char),
}

impl Letter {
    pub fn char(&self) -> char {
        match self {
            Letter::Correct(c) | Letter::Present(c) | Letter::Absent(c) => *c,
        }
    }

    pub fn mark(&self) -> Mark {
        match self {
            Letter::Correct(_) => Mark::Correct,
            Letter::Present(_) => Mark::Present,
            Letter::Absent(_) => Mark::Absent,
        }
    }
}

/// Per-position feedback for one guess.
pub type GuessResult = [Letter; WORD_LEN];

/// `evaluate` compares `guess` to `target` and returns the positional feedback.
///
/// Duplicates are handled as per the rules of Wordle: exact matches are claimed first, then
/// the remaining occurrences of each target letter are handed out left to right. A letter
/// guessed more often than it occurs in the target is `Absent` for the excess.
pub fn evaluate(guess: &Word, target: &Word) -> GuessResult {
    let guess = guess.letters();
    let target = target.letters();

    // Keep track of how many of each target letter are still unclaimed.
    let mut remaining = target.iter().fold(HashMap::new(), |mut acc, c| {
        *acc.entry(*c).or_insert(0) += 1;
        acc
    });

    let mut result = guess.map(Letter::Absent);

    for (i, (g, t)) in guess.iter().zip(target.iter()).enumerate() {
        if g == t {
            result[i] = Letter::Correct(*g);
            if let Some(count) = remaining.get_mut(g) {
                *count -= 1;
            }
        }
    }

    for (i, g) in guess.iter().enumerate() {
        if matches!(result[i], Letter::Correct(_)) {
            continue;
        }
        match remaining.get_mut(g) {
            Some(count) if *count > 0 => {
                *count -= 1;
                result[i] = Letter::Present(*g);
            }
            _ => {}
        }
    }

    result
}

/// `is_solved` returns true if every letter of the result is in its correct position.
pub fn is_solved(result: &[Letter]) -> bool {
    result.iter().all(|l| matches!(l, Letter::Correct(_)))
}
