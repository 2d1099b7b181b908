/// Console is the terminal view. It applies the events coming out of the game, keeps enough of
/// a picture to redraw the board and keyboard, and hands back the text to print.
use std::collections::BTreeMap;

use crate::arrange::Arrangement;
use crate::board::{COLS, ROWS};
use crate::duel::{Phase, Player};
use crate::progress::Summary;
use crate::schedule::{Event, ModalAction};
use crate::wordle::Mark;

const KEY_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

/// emoji_letter takes a capital letter and returns the corresponding emoji letter
/// inside the Regional Indicator Symbol range.
pub fn emoji_letter(l: char) -> char {
    let base = 0x1F1E6;
    let a = 'A' as u32;
    let target = l.to_ascii_uppercase() as u32;

    std::char::from_u32(base + target - a).unwrap_or('?')
}

/// render_tile draws one letter the way the bot drew attempts: emoji for a correct letter,
/// code for a misplaced one, struck out for a miss.
pub fn render_tile(letter: Option<char>, mark: Option<Mark>) -> String {
    match (letter, mark) {
        (Some(c), Some(Mark::Correct)) => format!(" {} ", emoji_letter(c)),
        (Some(c), Some(Mark::Present)) => format!("`{}`", c),
        (Some(c), Some(Mark::Absent)) => format!("~{}~", c),
        (Some(c), None) => format!(" {} ", c),
        (None, _) => " _ ".to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cell {
    letter: Option<char>,
    mark: Option<Mark>,
}

type Grid = [[Cell; COLS]; ROWS];

/// Console state. Boards are keyed by seat: `None` is the single-player board.
#[derive(Debug, Default)]
pub struct Console {
    boards: BTreeMap<Option<Player>, Grid>,
    keys: BTreeMap<char, Mark>,
    seat: Option<Player>,
    shake: Option<usize>,
    modal: Option<ModalAction>,
    switch: Option<(Player, Phase)>,
    dirty: bool,
    out: Vec<String>,
}

impl Console {
    pub fn new() -> Console {
        Console::default()
    }

    /// The button of the modal on screen, if any.
    #[cfg(test)]
    pub fn modal(&self) -> Option<ModalAction> {
        self.modal
    }

    pub fn dismiss_modal(&mut self) -> Option<ModalAction> {
        self.modal.take()
    }

    /// The switch screen on display, if any.
    #[cfg(test)]
    pub fn switch_screen(&self) -> Option<(Player, Phase)> {
        self.switch
    }

    pub fn key(&self, letter: char) -> Option<Mark> {
        self.keys.get(&letter).copied()
    }

    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::Cell {
                seat,
                row,
                col,
                letter,
                mark,
            } => {
                let grid = self.boards.entry(*seat).or_default();
                if let Some(cell) = grid.get_mut(*row).and_then(|r| r.get_mut(*col)) {
                    *cell = Cell {
                        letter: *letter,
                        mark: *mark,
                    };
                }
                // Revealed rows are drawn once, after their last tile.
                if mark.is_none() || *col + 1 == COLS {
                    self.dirty = true;
                }
            }
            Event::Key { letter, mark } => {
                self.keys.insert(*letter, *mark);
            }
            Event::ResetKeyboard => self.keys.clear(),
            Event::ClearBoard { seat } => {
                self.boards.insert(*seat, Grid::default());
                self.dirty = true;
            }
            Event::Shake { row, .. } => {
                self.shake = Some(*row);
                self.dirty = true;
            }
            Event::Message { seat, text } => match seat {
                Some(player) => self.say(format!("{}: {}", player, text)),
                None => self.say(text.clone()),
            },
            Event::Modal {
                title,
                body,
                action,
            } => {
                self.modal = Some(*action);
                self.say(format!(
                    "*** {} ***\n{}\n[/go: {}]",
                    title,
                    body,
                    action.label()
                ));
            }
            Event::Progress(summary) => {
                self.say(render_summary(summary));
            }
            Event::SwitchScreen { player, phase } => {
                self.switch = Some((*player, *phase));
                let task = match phase {
                    Phase::SettingWord => {
                        format!("set a word for {} to guess", player.other())
                    }
                    Phase::Guessing => "it's your turn to guess".to_string(),
                };
                self.say(format!(
                    "Pass the device to {}. {}, {}. Type /go when ready.",
                    player, player, task
                ));
            }
            Event::ShowBoard { player } => {
                self.switch = None;
                self.seat = Some(*player);
                self.dirty = true;
            }
            Event::Target(target) => {
                if let Some(word) = target {
                    self.say(format!("[debug] target: {}", word));
                }
            }
            Event::Navigate(url) => {
                self.say(format!("Opening {}", url));
            }
        }
    }

    pub fn say(&mut self, text: impl Into<String>) {
        self.out.push(text.into());
    }

    /// Returns everything to print since the last flush, with a fresh drawing of the board if
    /// it changed. Boards stay hidden while the device is being handed over.
    pub fn flush(&mut self) -> Vec<String> {
        if self.dirty && self.switch.is_none() {
            self.dirty = false;
            let board = self.render_board();
            self.out.push(board);
            self.shake = None;
        }
        std::mem::take(&mut self.out)
    }

    /// render_board draws the board of the seat on screen and the keyboard under it.
    pub fn render_board(&self) -> String {
        let mut s = String::new();
        if let Some(player) = self.seat {
            s.push_str(&format!("{}'s board:\n", player));
        }
        let grid = self.boards.get(&self.seat).copied().unwrap_or_default();
        for (i, row) in grid.iter().enumerate() {
            for cell in row {
                s.push_str(&render_tile(cell.letter, cell.mark));
            }
            if self.shake == Some(i) {
                s.push_str("  <<");
            }
            s.push('\n');
        }
        s.push('\n');
        for keys in KEY_ROWS {
            let line: Vec<String> = keys
                .chars()
                .map(|c| render_tile(Some(c), self.key(c)))
                .collect();
            s.push_str(&line.join(""));
            s.push('\n');
        }
        s
    }
}

pub fn render_summary(summary: &Summary) -> String {
    let words: Vec<String> = summary
        .entries
        .iter()
        .map(|e| match (e.word, e.attempts) {
            (Some(word), Some(attempts)) => format!("{} ({})", word, attempts),
            (Some(word), None) => word.to_string(),
            _ => "?????".to_string(),
        })
        .collect();
    if words.is_empty() {
        summary.to_string()
    } else {
        format!("{}: {}", summary, words.join(" "))
    }
}

/// render_arrangement draws the phrase slots, grouped by phrase word, and the numbered tiles
/// still in the pool.
pub fn render_arrangement(puzzle: &Arrangement) -> String {
    let letters = puzzle.letters();
    let mut slots = Vec::new();
    let mut start = 0;
    for len in puzzle.segments() {
        let word: String = letters[start..start + len]
            .iter()
            .map(|c| c.unwrap_or('_'))
            .collect();
        slots.push(word);
        start += len;
    }

    let pool: Vec<String> = puzzle
        .pool()
        .map(|t| format!("{}:{}", t.id, t.letter))
        .collect();

    format!(
        "Slots: {}\nTiles: {}\n(/place <tile> <slot>, slots 0-{})",
        slots.join("  "),
        if pool.is_empty() {
            "(none)".to_string()
        } else {
            pool.join(" ")
        },
        puzzle.slot_count().saturating_sub(1)
    )
}
