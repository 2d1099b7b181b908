/// The letter arranging finale: the letters of the solved gift words are shuffled back into a
/// phrase. Tiles move between a pool and numbered slots; dragging them around is the view's
/// business, this only tracks which tile sits in which slot.
use std::collections::HashMap;

use log::*;
use thiserror::Error;

use crate::wordle::Word;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArrangeError {
    #[error("letters of {sources} don't spell {phrase}")]
    LetterMismatch { sources: String, phrase: String },

    #[error("no tile {0}")]
    UnknownTile(usize),

    #[error("no slot {0}")]
    UnknownSlot(usize),

    #[error("the letter game isn't unlocked yet")]
    Locked,
}

/// Result of checking an arrangement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Match,
    Incomplete { filled: usize },
    Mismatch { arranged: String },
}

impl Check {
    /// Feedback for the player, or None on a match.
    pub fn message(&self, slots: usize) -> Option<String> {
        match self {
            Check::Match => None,
            Check::Incomplete { filled: 0 } => Some("Please place some letters first!".into()),
            Check::Incomplete { filled } => Some(format!(
                "You need to fill all {} slots. Currently filled: {}",
                slots, filled
            )),
            Check::Mismatch { arranged } => Some(format!(
                "Not quite right! You have: \"{}\". Keep trying!",
                arranged.replace('_', " ")
            )),
        }
    }
}

/// `check_arrangement` compares slot contents to `phrase` position for position. Whitespace in
/// the phrase only separates segments and is ignored.
pub fn check_arrangement(slots: &[Option<char>], phrase: &str) -> Check {
    let target: Vec<char> = phrase
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let arranged: String = (0..target.len())
        .map(|i| slots.get(i).copied().flatten().unwrap_or('_'))
        .collect();
    let filled = arranged.chars().filter(|c| *c != '_').count();

    if arranged.chars().eq(target.iter().copied()) {
        Check::Match
    } else if filled < target.len() {
        Check::Incomplete { filled }
    } else {
        Check::Mismatch { arranged }
    }
}

/// A movable letter, remembering which word it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: usize,
    pub letter: char,
    pub source: Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    tiles: Vec<Tile>,
    /// Tile id per slot.
    slots: Vec<Option<usize>>,
    phrase: String,
    segments: Vec<usize>,
}

impl Arrangement {
    /// Builds the puzzle from the letters of `sources`. They must be exactly the letters of
    /// `phrase`, in any order.
    pub fn new(sources: &[Word], phrase: &str) -> Result<Arrangement, ArrangeError> {
        let phrase = phrase.trim().to_ascii_uppercase();
        let segments: Vec<usize> = phrase.split_whitespace().map(|s| s.chars().count()).collect();

        let tiles: Vec<Tile> = sources
            .iter()
            .flat_map(|w| w.letters().into_iter().map(move |c| (*w, c)))
            .enumerate()
            .map(|(id, (source, letter))| Tile { id, letter, source })
            .collect();

        if letter_counts(tiles.iter().map(|t| t.letter)) != letter_counts(phrase.chars()) {
            return Err(ArrangeError::LetterMismatch {
                sources: sources
                    .iter()
                    .map(Word::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                phrase,
            });
        }

        Ok(Arrangement {
            slots: vec![None; tiles.len()],
            tiles,
            phrase,
            segments,
        })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Slot counts per phrase word, e.g. 5/3/7 for "CHILL EAT THEATRE".
    pub fn segments(&self) -> &[usize] {
        &self.segments
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The tile in `slot`, if any.
    pub fn slot(&self, slot: usize) -> Option<&Tile> {
        self.slots.get(slot).copied().flatten().map(|id| &self.tiles[id])
    }

    /// Where `tile` sits, if it's placed.
    pub fn slot_of(&self, tile: usize) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(tile))
    }

    /// Tiles not placed in any slot, in their original order.
    pub fn pool(&self) -> impl Iterator<Item = &Tile> {
        self.tiles
            .iter()
            .filter(move |t| !self.slots.contains(&Some(t.id)))
    }

    /// Puts `tile` into `slot`. A tile already in the slot goes back to the pool and is
    /// returned.
    pub fn place(&mut self, tile: usize, slot: usize) -> Result<Option<usize>, ArrangeError> {
        if tile >= self.tiles.len() {
            return Err(ArrangeError::UnknownTile(tile));
        }
        if slot >= self.slots.len() {
            return Err(ArrangeError::UnknownSlot(slot));
        }

        if let Some(previous) = self.slot_of(tile) {
            self.slots[previous] = None;
        }
        let displaced = self.slots[slot].replace(tile);
        Ok(displaced.filter(|id| *id != tile))
    }

    /// Returns `tile` to the pool. Returns the slot it left, if it was placed.
    pub fn take(&mut self, tile: usize) -> Result<Option<usize>, ArrangeError> {
        if tile >= self.tiles.len() {
            return Err(ArrangeError::UnknownTile(tile));
        }
        let slot = self.slot_of(tile);
        if let Some(slot) = slot {
            self.slots[slot] = None;
        }
        Ok(slot)
    }

    /// Returns every tile to the pool.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Fills every slot with the right letter.
    pub fn autofill(&mut self) {
        self.reset();
        let phrase: Vec<char> = self.phrase.chars().filter(|c| !c.is_whitespace()).collect();
        let mut used = vec![false; self.tiles.len()];
        for (slot, c) in phrase.iter().enumerate() {
            if let Some(tile) = self
                .tiles
                .iter()
                .find(|t| t.letter == *c && !used[t.id])
            {
                used[tile.id] = true;
                self.slots[slot] = Some(tile.id);
            }
        }
        debug!("Autofilled arrangement: {}", self.arrangement());
    }

    /// Slot contents as letters.
    pub fn letters(&self) -> Vec<Option<char>> {
        (0..self.slots.len())
            .map(|i| self.slot(i).map(|t| t.letter))
            .collect()
    }

    /// Slot contents with `_` for empty slots.
    pub fn arrangement(&self) -> String {
        self.letters().iter().map(|c| c.unwrap_or('_')).collect()
    }

    pub fn check(&self) -> Check {
        check_arrangement(&self.letters(), &self.phrase)
    }
}

fn letter_counts(letters: impl Iterator<Item = char>) -> HashMap<char, usize> {
    letters.filter(|c| !c.is_whitespace()).fold(HashMap::new(), |mut acc, c| {
        *acc.entry(c).or_insert(0) += 1;
        acc
    })
}
