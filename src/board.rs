/// The guessing grid and the on-screen keyboard hints. A board belongs to exactly one game (or
/// one duel player) and is only changed through that owner.
use std::collections::BTreeMap;

use thiserror::Error;

use crate::wordle::{GuessResult, Letter, Mark, Word, WORD_LEN};

/// Rows on a board, i.e. the number of guesses a player gets.
pub const ROWS: usize = 6;

/// Columns on a board.
pub const COLS: usize = WORD_LEN;

/// Reasons a submitted row is turned down. None of them change any state; the player simply
/// edits the row and tries again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("Not enough letters")]
    IncompleteGuess,

    #[error("Not in word list")]
    InvalidWord(Word),

    /// Input arrived while the board is between words, finished, or waiting on the other
    /// player.
    #[error("Not accepting guesses right now")]
    NotAccepting,
}

/// A cell address on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Board is a 6x5 grid of typed letters, the evaluation of every submitted row, and the
/// cursor. `row` is the row being typed (6 once the board is used up) and `col` the next free
/// column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<char>; COLS]; ROWS],
    results: [Option<GuessResult>; ROWS],
    row: usize,
    col: usize,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// True once all six rows have been submitted.
    pub fn is_full(&self) -> bool {
        self.row >= ROWS
    }

    pub fn cell(&self, pos: Position) -> Option<char> {
        self.cells.get(pos.row)?.get(pos.col).copied().flatten()
    }

    pub fn result(&self, row: usize) -> Option<&GuessResult> {
        self.results.get(row)?.as_ref()
    }

    /// The word typed into `row`, if the row is complete.
    pub fn guess(&self, row: usize) -> Option<Word> {
        let letters = (0..COLS)
            .map(|col| self.cell(Position::new(row, col)))
            .collect::<Option<Vec<_>>>()?;
        Word::from_letters(&letters).ok()
    }

    /// Writes `c` at the cursor. Returns where it went, or None if the row is full.
    pub fn push(&mut self, c: char) -> Option<Position> {
        if self.row >= ROWS || self.col >= COLS {
            return None;
        }
        let pos = Position::new(self.row, self.col);
        self.cells[pos.row][pos.col] = Some(c);
        self.col += 1;
        Some(pos)
    }

    /// Clears the last typed cell of the current row. Returns the cleared position.
    pub fn pop(&mut self) -> Option<Position> {
        if self.col == 0 || self.row >= ROWS {
            return None;
        }
        self.col -= 1;
        let pos = Position::new(self.row, self.col);
        self.cells[pos.row][pos.col] = None;
        Some(pos)
    }

    /// The word in the current row, provided all five columns are filled.
    pub fn current_word(&self) -> Result<Word, GuessError> {
        if self.row >= ROWS || self.col != COLS {
            return Err(GuessError::IncompleteGuess);
        }
        self.guess(self.row).ok_or(GuessError::IncompleteGuess)
    }

    /// Stores the evaluation for the current row and moves to the next one. Returns the index
    /// of the row that was submitted.
    pub fn record(&mut self, result: GuessResult) -> usize {
        let row = self.commit();
        self.results[row] = Some(result);
        row
    }

    /// Moves to the next row without evaluating the current one. The row can be evaluated
    /// later with `reveal`.
    pub fn commit(&mut self) -> usize {
        let row = self.row;
        self.row += 1;
        self.col = 0;
        row
    }

    /// Attaches an evaluation to an already committed row.
    pub fn reveal(&mut self, row: usize, result: GuessResult) {
        if row < self.row {
            self.results[row] = Some(result);
        }
    }
}

/// Keyboard tracks the best known mark for every letter that has been evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: BTreeMap<char, Mark>,
}

impl Keyboard {
    /// Merges a guess into the keyboard. Keys only ever upgrade. Returns the keys that
    /// changed, in guess order.
    pub fn update(&mut self, result: &[Letter]) -> Vec<(char, Mark)> {
        let mut changed = Vec::new();
        for letter in result {
            let (c, mark) = (letter.char(), letter.mark());
            if matches!(self.keys.get(&c), Some(current) if *current >= mark) {
                continue;
            }
            self.keys.insert(c, mark);
            changed.retain(|(k, _)| *k != c);
            changed.push((c, mark));
        }
        changed
    }

    #[cfg(test)]
    pub fn get(&self, c: char) -> Option<Mark> {
        self.keys.get(&c.to_ascii_uppercase()).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = (char, Mark)> + '_ {
        self.keys.iter().map(|(c, m)| (*c, *m))
    }

    pub fn reset(&mut self) {
        self.keys.clear();
    }
}
